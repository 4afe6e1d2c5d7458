use notescroll_ports::player::{AudioPlayerPort, PlayerError, POSITION_NOT_STARTED};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Stand-in engine for when no audio output is available: produces no sound,
/// reports elapsed wall-clock time as its position.
#[derive(Debug, Default)]
pub struct WallClockPlayer {
    loaded: bool,
    started: bool,
    running_since: Option<Instant>,
    elapsed: Duration,
}

impl WallClockPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self) -> Duration {
        self.elapsed + self.running_since.map(|t| t.elapsed()).unwrap_or_default()
    }
}

impl AudioPlayerPort for WallClockPlayer {
    fn load(&mut self, path: &Path) -> Result<(), PlayerError> {
        debug!(path = %path.display(), "wall clock player loaded");
        self.loaded = true;
        self.started = false;
        self.running_since = None;
        self.elapsed = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        if !self.loaded {
            return Err(PlayerError::NotLoaded);
        }
        self.started = true;
        self.elapsed = Duration::ZERO;
        self.running_since = Some(Instant::now());
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        if let Some(since) = self.running_since.take() {
            self.elapsed += since.elapsed();
        }
        Ok(())
    }

    fn unpause(&mut self) -> Result<(), PlayerError> {
        if self.started && self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
        Ok(())
    }

    fn position_ms(&self) -> i64 {
        if !self.started {
            return POSITION_NOT_STARTED;
        }
        self.position().as_millis() as i64
    }
}
