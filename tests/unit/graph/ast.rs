use super::*;

#[test]
fn pads_render_in_filter_and_map_form() {
    assert_eq!(Pad::video(3).to_string(), "[3:v]");
    assert_eq!(Pad::audio(0).to_string(), "[0:a]");
    assert_eq!(Pad::label("vout").to_string(), "[vout]");
    assert_eq!(Pad::audio(2).map_arg(), "2:a");
    assert_eq!(Pad::label("aout").map_arg(), "[aout]");
}

#[test]
fn filter_arguments_use_colon_separators() {
    let f = Filter::new("scale")
        .kv("w", 1280)
        .kv("h", 720)
        .kv("force_original_aspect_ratio", "decrease");
    assert_eq!(
        f.to_string(),
        "scale=w=1280:h=720:force_original_aspect_ratio=decrease"
    );
    assert_eq!(Filter::new("reverse").to_string(), "reverse");
    assert_eq!(
        Filter::new("select").expr("eq(n,0)").to_string(),
        "select='eq(n,0)'"
    );
    assert_eq!(
        Filter::new("overlay")
            .kv("format", "auto")
            .kexpr("enable", "between(t,1,2)")
            .to_string(),
        "overlay=format=auto:enable='between(t,1,2)'"
    );
}

#[test]
fn chains_join_with_commas_and_graph_with_semicolons() {
    let graph = FilterGraph {
        inputs: vec![InputSpec::file("a.mp4")],
        chains: vec![
            FilterChain::simple(
                Pad::video(0),
                vec![Filter::new("fps").kv("fps", 30), Filter::new("setsar").value(1)],
                Pad::label("v0"),
            ),
            FilterChain::new(
                vec![Pad::label("v0")],
                vec![Filter::new("split").value(2)],
                vec![Pad::label("x"), Pad::label("y")],
            ),
        ],
        video_out: Pad::label("x"),
        audio_out: Pad::audio(0),
    };
    assert_eq!(
        graph.to_filter_complex(),
        "[0:v]fps=fps=30,setsar=1[v0];[v0]split=2[x][y]"
    );
    assert!(graph.producer_of("y").is_some());
    assert!(graph.producer_of("z").is_none());
}

#[test]
fn input_options_precede_the_file() {
    let args = InputSpec::looped_image("slide.png", 25).to_args();
    let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(args, vec!["-loop", "1", "-framerate", "25", "-i", "slide.png"]);
}
