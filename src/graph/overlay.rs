use crate::foundation::core::{Canvas, fmt_sec};
use crate::foundation::error::{BeatreelError, BeatreelResult};
use crate::graph::ast::{Filter, FilterChain, Pad};
use crate::transition::kind::{SlideDir, TransitionKind};
use crate::transition::plan::TransitionPlanEntry;

fn between(start: f64, end: f64) -> String {
    format!("between(t,{},{})", fmt_sec(start), fmt_sec(end))
}

/// Shift a layer that starts at `t=0` so it starts at `at`.
fn shift_to(at: f64) -> Filter {
    Filter::new("setpts").value(format!("PTS-STARTPTS+{}/TB", fmt_sec(at)))
}

/// Overlay caption input `input` onto `acc` while `[start, end]`.
pub fn caption_chain(acc: Pad, input: usize, start: f64, end: f64, n: usize) -> (FilterChain, Pad) {
    let out = Pad::label(format!("cap{n}"));
    let chain = FilterChain::new(
        vec![acc, Pad::video(input)],
        vec![
            Filter::new("overlay")
                .kv("format", "auto")
                .kexpr("enable", between(start, end)),
        ],
        vec![out.clone()],
    );
    (chain, out)
}

/// Frame layers available to a transition.
#[derive(Clone, Debug)]
pub struct TransitionLayers {
    /// Last frame of the previous visual beat.
    pub prev_last: Pad,
    /// First frame of the incoming beat; only slide-ins use it.
    pub first: Option<Pad>,
}

/// Composite one transition onto `acc`, starting at `at` (absolute playback time).
///
/// Returns the label of the composited stream.
pub fn transition_chains(
    chains: &mut Vec<FilterChain>,
    acc: Pad,
    entry: &TransitionPlanEntry,
    at: f64,
    layers: TransitionLayers,
    canvas: Canvas,
) -> BeatreelResult<Pad> {
    let n = entry.beat;
    let w = entry.window();
    let enable = between(at, at + w);
    let out = Pad::label(format!("t{n}"));
    let layer = Pad::label(format!("t{n}_layer"));

    match entry.kind {
        TransitionKind::Fade => {
            chains.push(FilterChain::simple(
                layers.prev_last,
                vec![
                    Filter::new("fade")
                        .kv("t", "out")
                        .kv("st", 0)
                        .kv("d", fmt_sec(w))
                        .kv("alpha", 1),
                    shift_to(at),
                ],
                layer.clone(),
            ));
            chains.push(FilterChain::new(
                vec![acc, layer],
                vec![
                    Filter::new("overlay")
                        .kv("format", "auto")
                        .kexpr("enable", enable),
                ],
                vec![out.clone()],
            ));
        }
        TransitionKind::SlideOut(dir) => {
            chains.push(FilterChain::simple(
                layers.prev_last,
                vec![shift_to(at)],
                layer.clone(),
            ));
            chains.push(FilterChain::new(
                vec![acc, layer],
                vec![slide_overlay(slide_out_position(dir, at, w, canvas), &enable)],
                vec![out.clone()],
            ));
        }
        TransitionKind::SlideIn(dir) => {
            let first = layers.first.ok_or_else(|| {
                BeatreelError::invariant(format!("slide-in at beat {n} has no first-frame layer"))
            })?;
            let bg = Pad::label(format!("t{n}_bg"));
            let base = Pad::label(format!("t{n}_base"));

            chains.push(FilterChain::simple(
                layers.prev_last,
                vec![shift_to(at)],
                bg.clone(),
            ));
            chains.push(FilterChain::simple(first, vec![shift_to(at)], layer.clone()));
            chains.push(FilterChain::new(
                vec![acc, bg],
                vec![
                    Filter::new("overlay")
                        .kv("format", "auto")
                        .kexpr("enable", enable.clone()),
                ],
                vec![base.clone()],
            ));
            chains.push(FilterChain::new(
                vec![base, layer],
                vec![slide_overlay(slide_in_position(dir, at, w, canvas), &enable)],
                vec![out.clone()],
            ));
        }
    }
    Ok(out)
}

/// `(axis, expression)` of a moving overlay.
type Position = (&'static str, String);

fn slide_overlay((axis, expr): Position, enable: &str) -> Filter {
    let still = if axis == "x" { "y" } else { "x" };
    Filter::new("overlay")
        .kv("format", "auto")
        .kexpr(axis, expr)
        .kv(still, 0)
        .kexpr("enable", enable)
}

/// Layer leaves the canvas in `dir` over `w` seconds.
fn slide_out_position(dir: SlideDir, at: f64, w: f64, canvas: Canvas) -> Position {
    let (t, w) = (fmt_sec(at), fmt_sec(w));
    let (cw, ch) = (canvas.width, canvas.height);
    match dir {
        SlideDir::Left => ("x", format!("-(t-{t})*{cw}/{w}")),
        SlideDir::Right => ("x", format!("(t-{t})*{cw}/{w}")),
        SlideDir::Up => ("y", format!("-(t-{t})*{ch}/{w}")),
        SlideDir::Down => ("y", format!("(t-{t})*{ch}/{w}")),
    }
}

/// Layer enters from the opposite edge, moving in `dir`, and rests at the origin after `w`.
fn slide_in_position(dir: SlideDir, at: f64, w: f64, canvas: Canvas) -> Position {
    let (t, w) = (fmt_sec(at), fmt_sec(w));
    let (cw, ch) = (canvas.width, canvas.height);
    match dir {
        SlideDir::Left => ("x", format!("{cw}-(t-{t})*{cw}/{w}")),
        SlideDir::Right => ("x", format!("-{cw}+(t-{t})*{cw}/{w}")),
        SlideDir::Up => ("y", format!("{ch}-(t-{t})*{ch}/{w}")),
        SlideDir::Down => ("y", format!("-{ch}+(t-{t})*{ch}/{w}")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/overlay.rs"]
mod tests;
