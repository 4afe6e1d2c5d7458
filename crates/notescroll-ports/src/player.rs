use crate::audio::AudioError;
use std::path::Path;

/// Position reported by [`AudioPlayerPort::position_ms`] before the first `play`.
pub const POSITION_NOT_STARTED: i64 = -1;

#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    #[error("load failed: {0}")]
    Load(String),
    #[error("nothing loaded")]
    NotLoaded,
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),
    #[error("backend error: {0}")]
    Backend(String),
}

/// The audio engine the display clock follows.
///
/// `position_ms` is polled once per frame and must not block.
pub trait AudioPlayerPort: Send {
    fn load(&mut self, path: &Path) -> Result<(), PlayerError>;

    /// Starts from the beginning of the loaded file.
    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self) -> Result<(), PlayerError>;
    fn unpause(&mut self) -> Result<(), PlayerError>;

    /// Milliseconds of audio played since the last `play`, or
    /// [`POSITION_NOT_STARTED`] if playback was never started.
    fn position_ms(&self) -> i64;
}
