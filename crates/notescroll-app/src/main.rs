mod view;

use eframe::egui;
use notescroll_core::{load_config_or_default, AppError, Command, PlayerCore, WallClockPlayer};
use notescroll_infra_audio_cpal::CpalAudioOutputPort;
use notescroll_infra_storage_fs::FsConfigStore;
use notescroll_infra_synth_rustysynth::SequencerPlayer;
use notescroll_ports::player::AudioPlayerPort;
use notescroll_ports::storage::{ConfigStore, PlayerConfig};
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const WINDOW_TITLE: &str = "MIDI Shorts Player - 2 Measures Mode";
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667); // 60 Hz

struct PlayerApp {
    core: PlayerCore,
}

impl PlayerApp {
    fn new(core: PlayerCore) -> Self {
        Self { core }
    }

    fn read_input(&mut self, ctx: &egui::Context) {
        let commands = ctx.input(|i| {
            let mut commands = Vec::new();
            if i.key_pressed(egui::Key::Space) {
                commands.push(Command::TogglePlayback);
            }
            if i.key_pressed(egui::Key::ArrowUp) {
                commands.push(Command::NudgeLatency { steps: 1 });
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                commands.push(Command::NudgeLatency { steps: -1 });
            }
            commands
        });

        for cmd in commands {
            if let Err(err) = self.core.handle_command(cmd) {
                warn!(error = %err, "command failed");
            }
        }
    }
}

impl eframe::App for PlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.read_input(ctx);
        self.core.frame();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(view::BACKGROUND))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                view::paint(ui.painter(), rect, &self.core);
            });

        ctx.request_repaint_after(FRAME_INTERVAL);
    }
}

impl Drop for PlayerApp {
    fn drop(&mut self) {
        info!("player closed");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn pick_midi_file() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select MIDI File")
        .add_filter("MIDI files", &["mid", "midi"])
        .add_filter("All files", &["*"])
        .pick_file()
}

/// The SoundFont-backed player when audio is available, otherwise a silent
/// clock so the notation still scrolls.
fn open_player(config: &PlayerConfig) -> Box<dyn AudioPlayerPort> {
    let Some(soundfont) = config.soundfont_path.as_deref() else {
        warn!("no soundfont configured, running visual-only");
        return Box::new(WallClockPlayer::new());
    };
    let output = CpalAudioOutputPort::new();
    match SequencerPlayer::open(&output, Path::new(soundfont)) {
        Ok(player) => Box::new(player),
        Err(err) => {
            warn!(error = %err, "audio unavailable, running visual-only");
            Box::new(WallClockPlayer::new())
        }
    }
}

fn open_core(path: &Path) -> Result<PlayerCore, AppError> {
    let storage = FsConfigStore::default();
    let config = load_config_or_default(Some(&storage as &dyn ConfigStore));
    let player = open_player(&config);
    PlayerCore::open(path, player, config, Some(Box::new(storage)))
}

fn main() -> ExitCode {
    init_tracing();

    let Some(path) = pick_midi_file() else {
        info!("no file selected");
        return ExitCode::SUCCESS;
    };

    let core = match open_core(&path) {
        Ok(core) => core,
        Err(err) => {
            error!(path = %path.display(), error = %err, "error loading MIDI");
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([view::CANVAS_WIDTH, view::CANVAS_HEIGHT])
            .with_resizable(false),
        ..Default::default()
    };

    let result = eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(PlayerApp::new(core)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "window failed");
            ExitCode::FAILURE
        }
    }
}
