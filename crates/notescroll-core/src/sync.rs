use crate::tick_mapping::TickMapping;
use notescroll_ports::player::{AudioPlayerPort, PlayerError, POSITION_NOT_STARTED};
use serde::{Deserialize, Serialize};

/// Share of the remaining distance the display covers each frame.
pub const SMOOTHING_FACTOR: f64 = 0.4;
/// Beyond this distance the display jumps instead of gliding.
pub const SNAP_THRESHOLD_TICKS: f64 = 1000.0;
pub const LATENCY_STEP_MS: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState {
    Paused,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub display_tick: f64,
    pub state: ClockState,
    pub latency_offset_ms: i32,
}

/// Keeps the display tick following the audio engine's clock.
///
/// The only writer of [`PlaybackState`]. Call [`ClockSync::update`] once per
/// frame with the engine's raw position, before rendering.
#[derive(Clone, Debug)]
pub struct ClockSync {
    playback: PlaybackState,
    mapping: TickMapping,
}

impl ClockSync {
    pub fn new(mapping: TickMapping, latency_offset_ms: i32) -> Self {
        Self {
            playback: PlaybackState {
                display_tick: 0.0,
                state: ClockState::Paused,
                latency_offset_ms,
            },
            mapping,
        }
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn display_tick(&self) -> f64 {
        self.playback.display_tick
    }

    pub fn state(&self) -> ClockState {
        self.playback.state
    }

    pub fn is_playing(&self) -> bool {
        self.playback.state == ClockState::Playing
    }

    pub fn latency_offset_ms(&self) -> i32 {
        self.playback.latency_offset_ms
    }

    /// Moves the latency by whole steps. Unbounded in both directions.
    pub fn nudge_latency(&mut self, steps: i32) -> i32 {
        self.playback.latency_offset_ms = self
            .playback
            .latency_offset_ms
            .saturating_add(steps.saturating_mul(LATENCY_STEP_MS));
        self.playback.latency_offset_ms
    }

    /// Tick the audio is at once the latency correction is applied.
    pub fn target_tick(&self, raw_position_ms: i64) -> f64 {
        let ms = raw_position_ms
            .saturating_add(self.playback.latency_offset_ms as i64)
            .max(0);
        self.mapping.ms_to_tick(ms as f64)
    }

    /// Moves the display toward the engine's position. Ignored while paused,
    /// and held in place once the engine reports it has stopped.
    pub fn update(&mut self, raw_position_ms: i64) {
        if !self.is_playing() || raw_position_ms == POSITION_NOT_STARTED {
            return;
        }
        let target = self.target_tick(raw_position_ms);
        let delta = target - self.playback.display_tick;
        if delta.abs() > SNAP_THRESHOLD_TICKS {
            self.playback.display_tick = target;
        } else {
            self.playback.display_tick += delta * SMOOTHING_FACTOR;
        }
    }

    /// Flips between paused and playing, driving the engine accordingly.
    ///
    /// An engine that never started, or that has reached the end of the file,
    /// is started from the top and the display
    /// resets to 0; otherwise playback resumes where it stopped. On error the
    /// state is left as it was.
    pub fn toggle(&mut self, player: &mut dyn AudioPlayerPort) -> Result<ClockState, PlayerError> {
        match self.playback.state {
            ClockState::Paused => {
                if player.position_ms() == POSITION_NOT_STARTED {
                    player.play()?;
                    self.playback.display_tick = 0.0;
                } else {
                    player.unpause()?;
                }
                self.playback.state = ClockState::Playing;
            }
            ClockState::Playing => {
                player.pause()?;
                self.playback.state = ClockState::Paused;
            }
        }
        Ok(self.playback.state)
    }
}
