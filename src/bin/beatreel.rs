use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use beatreel::{FfprobeProbe, FixedProbe, MediaProbe, Script};

#[derive(Parser, Debug)]
#[command(name = "beatreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the reconciled timeline as JSON.
    Timeline(InputArgs),
    /// Print the encoder argument vector as JSON.
    Graph(GraphArgs),
    /// Render the final MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// Script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Media facts JSON (one object per beat). Probes the files with `ffprobe` when omitted.
    #[arg(long)]
    facts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct GraphArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output path written into the argument vector.
    #[arg(long, default_value = "out.mp4")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("beatreel=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Timeline(args) => cmd_timeline(args),
        Command::Graph(args) => cmd_graph(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load(args: &InputArgs) -> anyhow::Result<(Script, Box<dyn MediaProbe>)> {
    let script = Script::from_path(&args.script)
        .with_context(|| format!("load script '{}'", args.script.display()))?;
    Ok((script, probe_for(args.facts.as_deref())?))
}

fn probe_for(facts: Option<&Path>) -> anyhow::Result<Box<dyn MediaProbe>> {
    let probe: Box<dyn MediaProbe> = match facts {
        Some(path) => Box::new(
            FixedProbe::from_path(path)
                .with_context(|| format!("load media facts '{}'", path.display()))?,
        ),
        None => Box::new(FfprobeProbe::new()),
    };
    Ok(probe)
}

fn cmd_timeline(args: InputArgs) -> anyhow::Result<()> {
    let (script, probe) = load(&args)?;
    let facts = beatreel::probe::probe_all(probe.as_ref(), &script.beats)?;
    let timeline = beatreel::reconcile(&script.beats, &facts, &script.policy)?;
    println!("{}", serde_json::to_string_pretty(&timeline)?);
    Ok(())
}

fn cmd_graph(args: GraphArgs) -> anyhow::Result<()> {
    let (script, probe) = load(&args.input)?;
    let prepared = beatreel::prepare(&script, probe.as_ref())?;
    let argv: Vec<String> = prepared
        .encoder_args(&script.settings, &args.out)
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    println!("{}", serde_json::to_string_pretty(&argv)?);
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (script, probe) = load(&args.input)?;
    let report = beatreel::render(&script, probe.as_ref(), &args.out)?;
    eprintln!(
        "wrote {} in {:.1}s",
        report.out_path.display(),
        report.elapsed.as_secs_f64()
    );
    Ok(())
}
