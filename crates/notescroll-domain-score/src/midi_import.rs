use crate::keymap::{key_label, pitch_name};
use crate::model::{
    NoteEvent, RawEventKind, RawTrackEvent, TempoPoint, Timeline, TimelineConfig,
    DEFAULT_US_PER_QUARTER,
};
use midly::{Fps, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use notescroll_ports::types::Tick;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum MidiImportError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub fn import_midi_path(path: &Path) -> Result<Timeline, MidiImportError> {
    let data = std::fs::read(path).map_err(|e| MidiImportError::Io(e.to_string()))?;
    import_midi_bytes(&data)
}

pub fn import_midi_bytes(data: &[u8]) -> Result<Timeline, MidiImportError> {
    let smf = Smf::parse(data).map_err(|e| MidiImportError::Parse(e.to_string()))?;
    let (ticks_per_beat, tempo_override) = match smf.header.timing {
        Timing::Metrical(ticks) => (ticks.as_int(), None),
        Timing::Timecode(fps, ticks_per_frame) => {
            let (ppq, us_per_quarter) = timecode_ppq_and_tempo(fps, ticks_per_frame);
            (ppq, Some(us_per_quarter))
        }
    };

    let tracks: Vec<Vec<RawTrackEvent>> = smf.tracks.iter().map(|t| raw_track(t)).collect();
    let notes = extract_note_events(&tracks);
    let tempo_map = build_tempo_map(collect_tempo_points(&tracks), tempo_override);

    debug!(
        tracks = tracks.len(),
        notes = notes.len(),
        ticks_per_beat,
        "midi imported"
    );

    Ok(Timeline {
        config: TimelineConfig::new(ticks_per_beat),
        tempo_map,
        notes,
    })
}

/// Walks every track with its own running tick and keeps the sounding
/// note-ons, merged into one list ordered by tick.
///
/// The sort is stable, so notes on the same tick stay in track order.
pub fn extract_note_events(tracks: &[Vec<RawTrackEvent>]) -> Vec<NoteEvent> {
    let mut notes = Vec::new();
    for track in tracks {
        let mut tick: Tick = 0;
        for event in track {
            tick += event.delta as Tick;
            if let RawEventKind::NoteOn { key, velocity } = event.kind {
                // velocity 0 is a note-off
                if velocity > 0 {
                    notes.push(NoteEvent {
                        tick,
                        pitch: key,
                        name: pitch_name(key),
                        label: key_label(key),
                    });
                }
            }
        }
    }
    notes.sort_by_key(|n| n.tick);
    notes
}

fn raw_track(track: &[TrackEvent<'_>]) -> Vec<RawTrackEvent> {
    track
        .iter()
        .map(|event| {
            let kind = match &event.kind {
                TrackEventKind::Midi { message, .. } => match message {
                    MidiMessage::NoteOn { key, vel } => RawEventKind::NoteOn {
                        key: key.as_int(),
                        velocity: vel.as_int(),
                    },
                    _ => RawEventKind::Other,
                },
                TrackEventKind::Meta(MetaMessage::Tempo(us_per_quarter)) => RawEventKind::Tempo {
                    us_per_quarter: us_per_quarter.as_int(),
                },
                _ => RawEventKind::Other,
            };
            RawTrackEvent {
                delta: event.delta.as_int(),
                kind,
            }
        })
        .collect()
}

fn collect_tempo_points(tracks: &[Vec<RawTrackEvent>]) -> BTreeMap<Tick, u32> {
    let mut points = BTreeMap::new();
    for track in tracks {
        let mut tick: Tick = 0;
        for event in track {
            tick += event.delta as Tick;
            if let RawEventKind::Tempo { us_per_quarter } = event.kind {
                points.insert(tick, us_per_quarter);
            }
        }
    }
    points
}

fn build_tempo_map(
    tempo_points: BTreeMap<Tick, u32>,
    override_us_per_quarter: Option<u32>,
) -> Vec<TempoPoint> {
    if let Some(us_per_quarter) = override_us_per_quarter {
        return vec![TempoPoint {
            tick: 0,
            us_per_quarter,
        }];
    }

    let mut map: Vec<TempoPoint> = tempo_points
        .into_iter()
        .map(|(tick, us_per_quarter)| TempoPoint {
            tick,
            us_per_quarter,
        })
        .collect();

    if map.is_empty() || map[0].tick != 0 {
        map.insert(
            0,
            TempoPoint {
                tick: 0,
                us_per_quarter: DEFAULT_US_PER_QUARTER,
            },
        );
    }
    map
}

fn timecode_ppq_and_tempo(fps: Fps, ticks_per_frame: u8) -> (u16, u32) {
    let ticks_per_frame = ticks_per_frame.max(1) as u16;
    match fps {
        Fps::Fps24 => (24 * ticks_per_frame, 1_000_000),
        Fps::Fps25 => (25 * ticks_per_frame, 1_000_000),
        Fps::Fps30 => (30 * ticks_per_frame, 1_000_000),
        Fps::Fps29 => (30 * ticks_per_frame, 1_001_000),
    }
}
