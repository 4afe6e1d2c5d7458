use serde::{Deserialize, Serialize};

pub const DEFAULT_AUDIO_LATENCY_MS: i32 = 160;

fn default_audio_latency_ms() -> i32 {
    DEFAULT_AUDIO_LATENCY_MS
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

/// Persisted player settings. With defaults this serializes to
/// `{"audio_latency_ms": 160}`; the optional keys only appear once set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    #[serde(default = "default_audio_latency_ms")]
    pub audio_latency_ms: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soundfont_path: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub follow_tempo_map: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio_latency_ms: DEFAULT_AUDIO_LATENCY_MS,
            soundfont_path: None,
            follow_tempo_map: false,
        }
    }
}

pub trait ConfigStore: Send + Sync {
    fn load_config(&self) -> Result<PlayerConfig, StorageError>;
    fn save_config(&self, config: &PlayerConfig) -> Result<(), StorageError>;
}
