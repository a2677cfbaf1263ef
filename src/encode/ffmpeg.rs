use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::foundation::core::{Fps, fmt_sec};
use crate::foundation::error::{BeatreelError, BeatreelResult};
use crate::graph::ast::FilterGraph;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Output codec options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderSettings {
    pub video_codec: String,
    pub audio_codec: String,
    /// `-b:v`, encoder default when unset.
    pub video_bitrate: Option<String>,
    /// `-b:a`, encoder default when unset.
    pub audio_bitrate: Option<String>,
    /// Kill the encoder after this long.
    pub timeout: Option<Duration>,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            video_bitrate: None,
            audio_bitrate: Some("128k".to_string()),
            timeout: None,
        }
    }
}

/// Full encoder argument vector for one render.
pub fn encoder_args(
    graph: &FilterGraph,
    fps: Fps,
    total_duration: f64,
    settings: &EncoderSettings,
    out_path: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-loglevel".into(), "error".into()];
    for input in &graph.inputs {
        args.extend(input.to_args());
    }

    let mut push = |items: &[&str]| args.extend(items.iter().map(OsString::from));
    push(&["-filter_complex", &graph.to_filter_complex()]);
    push(&["-map", &graph.video_out.map_arg()]);
    push(&["-map", &graph.audio_out.map_arg()]);
    push(&["-c:v", &settings.video_codec]);
    if let Some(rate) = &settings.video_bitrate {
        push(&["-b:v", rate]);
    }
    push(&["-pix_fmt", "yuv420p", "-r", &fps.0.to_string()]);
    push(&["-c:a", &settings.audio_codec]);
    if let Some(rate) = &settings.audio_bitrate {
        push(&["-b:a", rate]);
    }
    push(&["-t", &fmt_sec(total_duration), "-movflags", "+faststart"]);
    args.push(out_path.as_os_str().to_owned());
    args
}

/// Outcome of a successful encoder run.
#[derive(Clone, Debug)]
pub struct EncodeReport {
    pub out_path: PathBuf,
    pub elapsed: Duration,
    /// Whatever the encoder logged at `-loglevel error` (usually empty).
    pub stderr: String,
}

/// Runs the external encoder exactly once per render.
#[derive(Clone, Debug)]
pub struct CompositionEngine {
    program: PathBuf,
    settings: EncoderSettings,
}

impl CompositionEngine {
    /// Engine using `ffmpeg` from `PATH`.
    pub fn new(settings: EncoderSettings) -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            settings,
        }
    }

    /// Use a different encoder executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    /// Run the encoder on `graph` and wait for it as one unit.
    ///
    /// Non-zero exit, timeout and a missing output file are all [`BeatreelError::Encoder`].
    pub fn encode(
        &self,
        graph: &FilterGraph,
        fps: Fps,
        total_duration: f64,
        out_path: &Path,
    ) -> BeatreelResult<EncodeReport> {
        ensure_parent_dir(out_path)?;
        let args = encoder_args(graph, fps, total_duration, &self.settings, out_path);

        tracing::info!(
            program = %self.program.display(),
            inputs = graph.inputs.len(),
            out = %out_path.display(),
            "starting encoder"
        );
        let started = Instant::now();

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                BeatreelError::encoder(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;

        let stdout_drain = drain(child.stdout.take());
        let stderr_drain = drain(child.stderr.take());
        let waited = wait_with_timeout(&mut child, self.settings.timeout);
        let stdout = join_drain(stdout_drain);
        let stderr = join_drain(stderr_drain);

        let status = match waited {
            Ok(Some(status)) => status,
            Ok(None) => {
                return Err(BeatreelError::Encoder {
                    status: format!(
                        "killed after timeout of {}s",
                        self.settings.timeout.unwrap_or_default().as_secs_f64()
                    ),
                    stdout,
                    stderr,
                });
            }
            Err(e) => {
                return Err(BeatreelError::Encoder {
                    status: format!("failed to wait for encoder: {e}"),
                    stdout,
                    stderr,
                });
            }
        };

        if !status.success() {
            return Err(BeatreelError::Encoder {
                status: status.to_string(),
                stdout,
                stderr,
            });
        }
        if !out_path.is_file() {
            return Err(BeatreelError::Encoder {
                status: format!(
                    "{status}, but output '{}' was not written",
                    out_path.display()
                ),
                stdout,
                stderr,
            });
        }

        let elapsed = started.elapsed();
        tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "encoder finished");
        Ok(EncodeReport {
            out_path: out_path.to_path_buf(),
            elapsed,
            stderr,
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<std::io::Result<Vec<u8>>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut bytes = Vec::new();
            pipe.read_to_end(&mut bytes)?;
            Ok(bytes)
        })
    })
}

fn join_drain(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> String {
    let bytes = match handle.map(JoinHandle::join) {
        Some(Ok(Ok(bytes))) => bytes,
        Some(Ok(Err(e))) => format!("<read failed: {e}>").into_bytes(),
        Some(Err(_)) => b"<drain thread panicked>".to_vec(),
        None => Vec::new(),
    };
    String::from_utf8_lossy(&bytes).into_owned()
}

/// `Ok(None)` means the child was killed on timeout.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Option<Duration>,
) -> std::io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            tracing::warn!(timeout_s = timeout.as_secs_f64(), "encoder timed out; killing");
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// `true` when an `ffmpeg` binary answers `-version`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the directory that will hold `path`.
pub fn ensure_parent_dir(path: &Path) -> BeatreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
