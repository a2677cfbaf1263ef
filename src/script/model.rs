use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, DEFAULT_FPS};
use crate::script::beat::FillOption;
use crate::timeline::padding::PaddingPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ScriptDef {
    #[serde(default)]
    pub(crate) settings: SettingsDef,
    /// Produced narration/BGM bed for the whole video.
    #[serde(default)]
    pub(crate) narration: Option<String>,
    pub(crate) beats: Vec<BeatDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SettingsDef {
    pub(crate) canvas: Canvas,
    pub(crate) fps: u32,
    pub(crate) fill_option: FillOption,
    pub(crate) default_transition: Option<TransitionDef>,
    pub(crate) caption: bool,
    pub(crate) padding: PaddingPolicy,
    pub(crate) encoder: EncoderDef,
}

impl Default for SettingsDef {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: DEFAULT_FPS,
            fill_option: FillOption::AspectFit,
            default_transition: None,
            caption: true,
            padding: PaddingPolicy::default(),
            encoder: EncoderDef::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct EncoderDef {
    pub(crate) video_codec: String,
    pub(crate) audio_codec: String,
    pub(crate) video_bitrate: Option<String>,
    pub(crate) audio_bitrate: Option<String>,
    pub(crate) timeout_sec: Option<f64>,
}

impl Default for EncoderDef {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            video_bitrate: None,
            audio_bitrate: Some("128k".to_string()),
            timeout_sec: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TransitionDef {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    #[serde(default = "default_transition_duration")]
    pub(crate) duration: f64,
}

fn default_transition_duration() -> f64 {
    0.3
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct AudioParamsDef {
    /// `Some(0.0)` must survive deserialization distinct from an absent key.
    #[serde(default)]
    pub(crate) padding: Option<f64>,
    #[serde(default)]
    pub(crate) movie_volume: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct BeatDef {
    #[serde(default)]
    pub(crate) duration: Option<f64>,
    #[serde(default)]
    pub(crate) audio_params: AudioParamsDef,
    #[serde(default)]
    pub(crate) image: Option<String>,
    #[serde(default)]
    pub(crate) movie: Option<String>,
    #[serde(default)]
    pub(crate) voice_over: bool,
    #[serde(default)]
    pub(crate) start_at: Option<f64>,
    #[serde(default)]
    pub(crate) audio: Option<String>,
    #[serde(default)]
    pub(crate) caption: Option<String>,
    #[serde(default)]
    pub(crate) transition: Option<TransitionDef>,
    #[serde(default)]
    pub(crate) fill_option: Option<FillOption>,
    #[serde(default)]
    pub(crate) speed: Option<f64>,
}
