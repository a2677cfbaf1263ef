use crate::foundation::core::{Canvas, Fps, approx_eq, fmt_sec};
use crate::graph::ast::{Filter, FilterChain, Pad};
use crate::script::beat::FillOption;

/// What feeds a visual segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VisualSource {
    /// Movie clip played at `speed`; frozen on its last frame if it runs out.
    Movie { speed: f64 },
    /// Still image input (already looped at the input level).
    Image,
}

impl VisualSource {
    fn is_movie(self) -> bool {
        matches!(self, Self::Movie { .. })
    }
}

/// Chain turning input `input` into a `segment`-second canvas-sized stream labelled `out`.
pub fn visual_chain(
    input: usize,
    source: VisualSource,
    segment: f64,
    fill: FillOption,
    canvas: Canvas,
    fps: Fps,
    out: Pad,
) -> FilterChain {
    let mut filters = Vec::new();
    match source {
        VisualSource::Movie { speed } => {
            let source_len = fmt_sec(segment * speed);
            filters.push(
                Filter::new("tpad")
                    .kv("stop_mode", "clone")
                    .kv("stop_duration", &source_len),
            );
            filters.push(Filter::new("trim").kv("duration", source_len));
            if approx_eq(speed, 1.0) {
                filters.push(Filter::new("setpts").value("PTS-STARTPTS"));
            } else {
                filters.push(
                    Filter::new("setpts").value(format!("(PTS-STARTPTS)/{}", fmt_sec(speed))),
                );
            }
        }
        VisualSource::Image => {
            filters.push(Filter::new("trim").kv("duration", fmt_sec(segment)));
            filters.push(Filter::new("setpts").value("PTS-STARTPTS"));
        }
    }
    filters.push(Filter::new("fps").kv("fps", fps.0));
    filters.extend(fit_filters(fill, canvas));
    filters.push(Filter::new("setsar").value(1));
    filters.push(Filter::new("format").value("yuv420p"));
    FilterChain::simple(Pad::video(input), filters, out)
}

/// Scale + pad (letterbox) or scale + crop onto the canvas.
pub fn fit_filters(fill: FillOption, canvas: Canvas) -> Vec<Filter> {
    let scale = |mode: &str| {
        Filter::new("scale")
            .kv("w", canvas.width)
            .kv("h", canvas.height)
            .kv("force_original_aspect_ratio", mode)
    };
    match fill {
        FillOption::AspectFit => vec![
            scale("decrease"),
            Filter::new("pad")
                .kv("w", canvas.width)
                .kv("h", canvas.height)
                .kv("x", "(ow-iw)/2")
                .kv("y", "(oh-ih)/2")
                .kv("color", "black"),
        ],
        FillOption::AspectFill => vec![
            scale("increase"),
            Filter::new("crop")
                .kv("w", canvas.width)
                .kv("h", canvas.height),
        ],
    }
}

/// Labels produced by [`add_split_and_extract_frames`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedFrames {
    /// Untouched stream, to be concatenated.
    pub main: Pad,
    /// First frame held on a canvas, starting at `t=0`.
    pub first: Option<Pad>,
    /// Last frame held on a canvas, starting at `t=0`.
    pub last: Option<Pad>,
}

/// Split beat `beat`'s stream and pull out single-frame layers for adjoining transitions.
///
/// `first` and `last` are the lengths of the layers to produce; `None` means that frame is not
/// needed. Each layer is the selected frame composited onto a blank canvas of that length, so
/// it can be time-shifted on its own without touching beat boundaries.
#[allow(clippy::too_many_arguments)]
pub fn add_split_and_extract_frames(
    chains: &mut Vec<FilterChain>,
    beat: usize,
    stream: Pad,
    source: VisualSource,
    first: Option<f64>,
    last: Option<f64>,
    canvas: Canvas,
    fps: Fps,
) -> ExtractedFrames {
    if first.is_none() && last.is_none() {
        return ExtractedFrames {
            main: stream,
            first: None,
            last: None,
        };
    }

    let main = Pad::label(format!("v{beat}_main"));
    let mut outputs = vec![main.clone()];
    if first.is_some() {
        outputs.push(Pad::label(format!("v{beat}_first_src")));
    }
    if last.is_some() {
        outputs.push(Pad::label(format!("v{beat}_last_src")));
    }
    chains.push(FilterChain::new(
        vec![stream],
        vec![Filter::new("split").value(outputs.len())],
        outputs,
    ));

    let first = first.map(|d| {
        let select = vec![
            Filter::new("select").expr("eq(n,0)"),
            Filter::new("setpts").value("PTS-STARTPTS"),
        ];
        hold_frame(chains, beat, "first", select, d, canvas, fps)
    });
    let last = last.map(|d| {
        let mut select = Vec::new();
        if source.is_movie() {
            // No reliable seek-to-last: reverse, take the new first frame.
            select.push(Filter::new("reverse"));
        }
        select.push(Filter::new("select").expr("eq(n,0)"));
        select.push(Filter::new("setpts").value("PTS-STARTPTS"));
        hold_frame(chains, beat, "last", select, d, canvas, fps)
    });

    ExtractedFrames { main, first, last }
}

fn hold_frame(
    chains: &mut Vec<FilterChain>,
    beat: usize,
    which: &str,
    select: Vec<Filter>,
    duration: f64,
    canvas: Canvas,
    fps: Fps,
) -> Pad {
    let src = Pad::label(format!("v{beat}_{which}_src"));
    let frame = Pad::label(format!("v{beat}_{which}_frame"));
    let bg = Pad::label(format!("v{beat}_{which}_canvas"));
    let out = Pad::label(format!("v{beat}_{which}"));

    chains.push(FilterChain::simple(src, select, frame.clone()));
    chains.push(FilterChain::source(
        vec![
            Filter::new("color")
                .kv("c", "black")
                .kv("size", format!("{}x{}", canvas.width, canvas.height))
                .kv("duration", fmt_sec(duration))
                .kv("rate", fps.0),
        ],
        bg.clone(),
    ));
    chains.push(FilterChain::new(
        vec![bg, frame],
        vec![
            Filter::new("overlay").kv("format", "auto"),
            Filter::new("fps").kv("fps", fps.0),
            Filter::new("format").value("yuva420p"),
        ],
        vec![out.clone()],
    ));
    out
}
