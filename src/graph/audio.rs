use crate::foundation::core::{approx_eq, fmt_sec};
use crate::graph::ast::{Filter, FilterChain, Pad};

/// Sample format shared by every audio chain before mixing.
pub const SAMPLE_FMT: &str = "fltp";
/// Sample rate shared by every audio chain before mixing.
pub const SAMPLE_RATE: u32 = 48_000;
/// Channel layout shared by every audio chain before mixing.
pub const CHANNEL_LAYOUT: &str = "stereo";

/// Lower bound of a single `atempo` stage.
const ATEMPO_MIN: f64 = 0.5;
/// Upper bound of a single `atempo` stage.
const ATEMPO_MAX: f64 = 100.0;

/// Common audio normalization.
pub fn aformat() -> Filter {
    Filter::new("aformat")
        .kv("sample_fmts", SAMPLE_FMT)
        .kv("sample_rates", SAMPLE_RATE)
        .kv("channel_layouts", CHANNEL_LAYOUT)
}

/// `atempo` stages whose product is `speed`, each within the filter's accepted range.
pub fn atempo_chain(speed: f64) -> Vec<Filter> {
    let mut out = Vec::new();
    if approx_eq(speed, 1.0) {
        return out;
    }
    let mut rest = speed;
    while rest < ATEMPO_MIN {
        out.push(Filter::new("atempo").value(fmt_sec(ATEMPO_MIN)));
        rest /= ATEMPO_MIN;
    }
    while rest > ATEMPO_MAX {
        out.push(Filter::new("atempo").value(fmt_sec(ATEMPO_MAX)));
        rest /= ATEMPO_MAX;
    }
    if !approx_eq(rest, 1.0) {
        out.push(Filter::new("atempo").value(fmt_sec(rest)));
    }
    out
}

/// Embedded movie audio of beat `beat`, trimmed to `duration` and delayed to `start`.
pub fn movie_audio_chain(
    input: usize,
    beat: usize,
    speed: f64,
    duration: f64,
    start: f64,
    volume: f64,
) -> (FilterChain, Pad) {
    let out = Pad::label(format!("a{beat}"));
    let delay_ms = (start * 1000.0).round().max(0.0) as u64;

    let mut filters = atempo_chain(speed);
    filters.push(Filter::new("atrim").kv("duration", fmt_sec(duration)));
    filters.push(Filter::new("asetpts").value("PTS-STARTPTS"));
    filters.push(Filter::new("adelay").kv("delays", delay_ms).kv("all", 1));
    filters.push(Filter::new("volume").value(fmt_sec(volume)));
    filters.push(aformat());

    (
        FilterChain::simple(Pad::audio(input), filters, out.clone()),
        out,
    )
}

/// The audio bed every other track is mixed under.
///
/// With no narration file the bed is silence lasting the whole video.
pub fn bed_chain(narration_input: Option<usize>, total: f64) -> (FilterChain, Pad) {
    let out = Pad::label("abed");
    let chain = match narration_input {
        Some(index) => FilterChain::simple(Pad::audio(index), vec![aformat()], out.clone()),
        None => FilterChain::source(
            vec![
                Filter::new("anullsrc")
                    .kv("channel_layout", CHANNEL_LAYOUT)
                    .kv("sample_rate", SAMPLE_RATE),
                Filter::new("atrim").kv("duration", fmt_sec(total)),
                aformat(),
            ],
            out.clone(),
        ),
    };
    (chain, out)
}

/// Mix `tracks` under `bed`. The output length follows the bed.
pub fn mix_chain(bed: Pad, tracks: Vec<Pad>) -> (FilterChain, Pad) {
    let out = Pad::label("aout");
    if tracks.is_empty() {
        return (
            FilterChain::simple(bed, vec![Filter::new("anull")], out.clone()),
            out,
        );
    }

    let mut inputs = vec![bed];
    inputs.extend(tracks);
    let filter = Filter::new("amix")
        .kv("inputs", inputs.len())
        .kv("duration", "first")
        .kv("dropout_transition", 2)
        .kv("normalize", 0);
    (
        FilterChain::new(inputs, vec![filter], vec![out.clone()]),
        out,
    )
}
