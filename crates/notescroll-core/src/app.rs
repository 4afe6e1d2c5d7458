use crate::command::Command;
use crate::projector::{HeaderView, Layout, PageView, RenderProjector};
use crate::sync::{ClockState, ClockSync};
use crate::tick_mapping::{TempoMap, TickMapping};
use crate::wall_clock::WallClockPlayer;
use notescroll_domain_score::{group_measures, import_midi_path, Measure, Timeline};
use notescroll_ports::player::{AudioPlayerPort, PlayerError};
use notescroll_ports::storage::{ConfigStore, PlayerConfig, StorageError};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("player error: {0}")]
    Player(#[from] PlayerError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("score load failed: {0}")]
    ScoreLoad(String),
}

/// Reads the persisted config, falling back to defaults on any failure.
pub fn load_config_or_default(storage: Option<&dyn ConfigStore>) -> PlayerConfig {
    let Some(storage) = storage else {
        return PlayerConfig::default();
    };
    match storage.load_config() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "config unreadable, using defaults");
            PlayerConfig::default()
        }
    }
}

/// The player without a window: timeline, measures, clock and projection.
///
/// Per frame the shell calls [`PlayerCore::frame`] and then reads
/// [`PlayerCore::page_view`]; input goes through [`PlayerCore::handle_command`].
pub struct PlayerCore {
    player: Box<dyn AudioPlayerPort>,
    storage: Option<Box<dyn ConfigStore>>,
    config: PlayerConfig,
    title: String,
    timeline: Timeline,
    measures: Vec<Measure>,
    clock: ClockSync,
    projector: RenderProjector,
}

impl PlayerCore {
    /// Imports `path` and hands it to the player. Import failures are fatal;
    /// if the player rejects the file the core continues on a
    /// [`WallClockPlayer`] without sound.
    pub fn open(
        path: &Path,
        mut player: Box<dyn AudioPlayerPort>,
        config: PlayerConfig,
        storage: Option<Box<dyn ConfigStore>>,
    ) -> Result<Self, AppError> {
        let timeline = import_midi_path(path).map_err(|e| AppError::ScoreLoad(e.to_string()))?;
        if let Err(err) = player.load(path) {
            warn!(error = %err, "player rejected the file, running visual-only");
            player = Box::new(WallClockPlayer::new());
            player.load(path)?;
        }
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(title, timeline, player, config, storage))
    }

    pub fn new(
        title: String,
        timeline: Timeline,
        player: Box<dyn AudioPlayerPort>,
        config: PlayerConfig,
        storage: Option<Box<dyn ConfigStore>>,
    ) -> Self {
        let ticks_per_measure = timeline.config.ticks_per_measure();
        let measures = group_measures(&timeline.notes, ticks_per_measure);

        let mapping = if config.follow_tempo_map {
            TickMapping::TempoMap(TempoMap::new(
                timeline.config.ticks_per_beat,
                timeline.tempo_map.clone(),
            ))
        } else {
            TickMapping::fixed(timeline.config.ticks_per_beat)
        };
        let clock = ClockSync::new(mapping, config.audio_latency_ms);
        let projector = RenderProjector::new(ticks_per_measure, Layout::default());

        info!(
            title = %title,
            notes = timeline.notes.len(),
            measures = measures.len(),
            ticks_per_beat = timeline.config.ticks_per_beat,
            latency_ms = config.audio_latency_ms,
            "timeline loaded"
        );

        Self {
            player,
            storage,
            config,
            title,
            timeline,
            measures,
            clock,
            projector,
        }
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), AppError> {
        match cmd {
            Command::TogglePlayback => {
                if self.measures.is_empty() {
                    debug!("nothing to play");
                    return Ok(());
                }
                let state = self.clock.toggle(self.player.as_mut())?;
                info!(?state, tick = self.clock.display_tick(), "playback toggled");
            }
            Command::NudgeLatency { steps } => {
                let ms = self.clock.nudge_latency(steps);
                self.config.audio_latency_ms = ms;
                info!(latency_ms = ms, "audio latency changed");
                self.save_config();
            }
        }
        Ok(())
    }

    /// Advances the display clock from the engine's position.
    pub fn frame(&mut self) {
        if !self.clock.is_playing() {
            return;
        }
        let position_ms = self.player.position_ms();
        self.clock.update(position_ms);
    }

    pub fn display_tick(&self) -> f64 {
        self.clock.display_tick()
    }

    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn latency_ms(&self) -> i32 {
        self.clock.latency_offset_ms()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The two measures of the current page; either may be absent.
    pub fn visible_measures(&self) -> (Option<&Measure>, Option<&Measure>) {
        let (first, second) = self.projector.visible_indices(self.clock.display_tick());
        (self.measures.get(first), self.measures.get(second))
    }

    pub fn page_view(&self) -> PageView {
        self.projector.project(
            &self.measures,
            self.clock.display_tick(),
            self.clock.is_playing(),
        )
    }

    pub fn header_view(&self) -> HeaderView {
        self.projector
            .header(&self.title, self.clock.is_playing(), self.clock.latency_offset_ms())
    }

    pub fn layout(&self) -> &Layout {
        self.projector.layout()
    }

    fn save_config(&self) {
        if let Some(storage) = self.storage.as_ref() {
            if let Err(err) = storage.save_config(&self.config) {
                warn!(error = %err, "config save failed");
            }
        }
    }
}
