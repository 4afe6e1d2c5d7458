use notescroll_ports::audio::{AudioOutputPort, AudioRenderCallback, AudioStreamHandle};
use notescroll_ports::player::{AudioPlayerPort, PlayerError, POSITION_NOT_STARTED};
use notescroll_ports::types::{AudioConfig, SampleTime};
use parking_lot::Mutex;
use rustysynth::{MidiFile, MidiFileSequencer, SoundFont, Synthesizer, SynthesizerSettings};
use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

const MASTER_VOLUME: f32 = 0.8;

/// State shared with the audio thread.
struct SequencerShared {
    sequencer: Mutex<MidiFileSequencer>,
    sample_rate_hz: u32,
    running: AtomicBool,
    started: AtomicBool,
    frames_played: AtomicU64,
}

impl SequencerShared {
    fn new(sequencer: MidiFileSequencer, sample_rate_hz: u32) -> Self {
        Self {
            sequencer: Mutex::new(sequencer),
            sample_rate_hz: sample_rate_hz.max(1),
            running: AtomicBool::new(false),
            started: AtomicBool::new(false),
            frames_played: AtomicU64::new(0),
        }
    }

    fn stop(&self) {
        self.running.store(false, Ordering::Release);
        self.started.store(false, Ordering::Release);
        self.frames_played.store(0, Ordering::Release);
    }

    fn position_ms(&self) -> i64 {
        if !self.started.load(Ordering::Acquire) {
            return POSITION_NOT_STARTED;
        }
        frames_to_ms(self.frames_played.load(Ordering::Acquire), self.sample_rate_hz)
    }
}

impl AudioRenderCallback for SequencerShared {
    fn render(&self, _sample_time_start: SampleTime, out_l: &mut [f32], out_r: &mut [f32]) {
        out_l.fill(0.0);
        out_r.fill(0.0);
        if !self.running.load(Ordering::Acquire) {
            return;
        }
        // never block the audio thread; a held lock costs one silent buffer
        let Some(mut sequencer) = self.sequencer.try_lock() else {
            return;
        };
        let frames = out_l.len().min(out_r.len());
        sequencer.render(&mut out_l[..frames], &mut out_r[..frames]);
        if sequencer.end_of_sequence() {
            // finished: report the never-started sentinel so the next play restarts
            self.stop();
            return;
        }
        self.frames_played
            .fetch_add(frames as u64, Ordering::AcqRel);
    }
}

fn frames_to_ms(frames: u64, sample_rate_hz: u32) -> i64 {
    (frames.saturating_mul(1000) / sample_rate_hz as u64) as i64
}

/// Plays a MIDI file through a SoundFont on the default output device.
///
/// The position is counted in rendered frames, so it tracks what the device
/// was actually fed rather than wall time.
pub struct SequencerPlayer {
    shared: Arc<SequencerShared>,
    stream: Option<Box<dyn AudioStreamHandle>>,
    midi_file: Option<Arc<MidiFile>>,
}

impl SequencerPlayer {
    pub fn open(output: &dyn AudioOutputPort, soundfont_path: &Path) -> Result<Self, PlayerError> {
        let mut file = File::open(soundfont_path).map_err(|e| PlayerError::Load(e.to_string()))?;
        let sound_font =
            Arc::new(SoundFont::new(&mut file).map_err(|e| PlayerError::Load(e.to_string()))?);

        let device = output.default_output()?;
        let config = AudioConfig {
            sample_rate_hz: device.default_config.sample_rate_hz,
            channels: 2,
            buffer_size_frames: None,
        };

        let mut settings = SynthesizerSettings::new(config.sample_rate_hz as i32);
        settings.enable_reverb_and_chorus = false;
        let mut synth = Synthesizer::new(&sound_font, &settings)
            .map_err(|e| PlayerError::Backend(e.to_string()))?;
        synth.set_master_volume(MASTER_VOLUME);

        let shared = Arc::new(SequencerShared::new(
            MidiFileSequencer::new(synth),
            config.sample_rate_hz,
        ));
        let stream = output.open_output(
            &device.id,
            config,
            shared.clone() as Arc<dyn AudioRenderCallback>,
        )?;

        info!(
            device = %device.name,
            sample_rate_hz = config.sample_rate_hz,
            soundfont = %soundfont_path.display(),
            "audio output ready"
        );

        Ok(Self {
            shared,
            stream: Some(stream),
            midi_file: None,
        })
    }

    pub fn close(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
    }
}

impl Drop for SequencerPlayer {
    fn drop(&mut self) {
        self.close();
    }
}

impl AudioPlayerPort for SequencerPlayer {
    fn load(&mut self, path: &Path) -> Result<(), PlayerError> {
        let mut file = File::open(path).map_err(|e| PlayerError::Load(e.to_string()))?;
        let midi_file = MidiFile::new(&mut file).map_err(|e| PlayerError::Load(e.to_string()))?;

        self.shared.stop();
        self.shared.sequencer.lock().stop();
        self.midi_file = Some(Arc::new(midi_file));
        debug!(path = %path.display(), "midi file loaded into sequencer");
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        let midi_file = self.midi_file.as_ref().ok_or(PlayerError::NotLoaded)?;
        if self.stream.is_none() {
            return Err(PlayerError::Backend("output closed".to_string()));
        }
        {
            let mut sequencer = self.shared.sequencer.lock();
            sequencer.play(midi_file, false);
            self.shared.frames_played.store(0, Ordering::Release);
        }
        self.shared.started.store(true, Ordering::Release);
        self.shared.running.store(true, Ordering::Release);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.shared.running.store(false, Ordering::Release);
        Ok(())
    }

    fn unpause(&mut self) -> Result<(), PlayerError> {
        if self.shared.started.load(Ordering::Acquire) {
            self.shared.running.store(true, Ordering::Release);
        }
        Ok(())
    }

    fn position_ms(&self) -> i64 {
        self.shared.position_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_convert_to_whole_milliseconds() {
        assert_eq!(frames_to_ms(0, 44_100), 0);
        assert_eq!(frames_to_ms(44_100, 44_100), 1000);
        assert_eq!(frames_to_ms(22_050, 44_100), 500);
        assert_eq!(frames_to_ms(47, 48_000), 0);
        assert_eq!(frames_to_ms(48, 48_000), 1);
    }
}
