use notescroll_ports::types::Tick;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key a note is played with on the on-screen keyboard layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyLabel {
    Key(char),
    /// Pitch outside the keyboard layout. Renders as `?`.
    Unmapped,
}

impl fmt::Display for KeyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyLabel::Key(c) => write!(f, "{c}"),
            KeyLabel::Unmapped => f.write_str("?"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub tick: Tick,
    pub pitch: u8,
    /// Scientific pitch name, e.g. `C4` for 60.
    pub name: String,
    pub label: KeyLabel,
}

/// Notes that start close enough together to be drawn as one chord.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordGroup {
    /// Tick of the note that opened the group.
    pub anchor_tick: Tick,
    /// Insertion order, at most one note per label.
    pub notes: Vec<NoteEvent>,
}

impl ChordGroup {
    pub fn new(first: NoteEvent) -> Self {
        Self {
            anchor_tick: first.tick,
            notes: vec![first],
        }
    }

    pub fn contains_label(&self, label: KeyLabel) -> bool {
        self.notes.iter().any(|n| n.label == label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub index: usize,
    /// Creation order.
    pub groups: Vec<ChordGroup>,
}

impl Measure {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoPoint {
    pub tick: Tick,
    pub us_per_quarter: u32,
}

pub const DEFAULT_US_PER_QUARTER: u32 = 500_000;
pub const BEATS_PER_MEASURE: Tick = 4; // 4/4 only

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub ticks_per_beat: u16,
}

impl TimelineConfig {
    pub fn new(ticks_per_beat: u16) -> Self {
        Self {
            ticks_per_beat: ticks_per_beat.max(1),
        }
    }

    pub fn ticks_per_measure(&self) -> Tick {
        self.ticks_per_beat as Tick * BEATS_PER_MEASURE
    }
}

/// Everything read out of a MIDI file that the player needs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Timeline {
    pub config: TimelineConfig,
    pub tempo_map: Vec<TempoPoint>,
    /// Sorted by tick; equal ticks keep track order.
    pub notes: Vec<NoteEvent>,
}

impl Timeline {
    pub fn max_tick(&self) -> Option<Tick> {
        self.notes.iter().map(|n| n.tick).max()
    }
}

/// A track event reduced to what the extractor looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawTrackEvent {
    pub delta: u32,
    pub kind: RawEventKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawEventKind {
    NoteOn { key: u8, velocity: u8 },
    Tempo { us_per_quarter: u32 },
    Other,
}
