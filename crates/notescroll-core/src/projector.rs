use notescroll_domain_score::{ChordGroup, Measure};
use notescroll_ports::types::Tick;
use serde::{Deserialize, Serialize};

pub const MEASURES_PER_PAGE: usize = 2;
/// A chord is highlighted while the display is closer than this to its anchor.
pub const ACTIVE_WINDOW_TICKS: f64 = 40.0;

/// Screen geometry of the vertical frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    /// Left/right inset of the tick span.
    pub span_margin: f32,
    /// Distance of each measure's centre line from the canvas middle.
    pub measure_offset: f32,
    pub pitch_center: f32,
    pub pitch_step: f32,
    pub note_radius: f32,
    pub label_top: f32,
    pub label_step: f32,
    pub playhead_half_height: f32,
    pub header_height: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: 540.0,
            height: 960.0,
            span_margin: 70.0,
            measure_offset: 180.0,
            pitch_center: 65.0,
            pitch_step: 4.5,
            note_radius: 10.0,
            label_top: 90.0,
            label_step: 45.0,
            playhead_half_height: 50.0,
            header_height: 140.0,
        }
    }
}

impl Layout {
    pub fn span_width(&self) -> f32 {
        self.width - 2.0 * self.span_margin
    }

    pub fn slot_center_y(&self, slot: usize) -> f32 {
        let middle = self.height / 2.0;
        if slot == 0 {
            middle - self.measure_offset
        } else {
            middle + self.measure_offset
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteHead {
    pub pitch: u8,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyLabelView {
    pub text: String,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChordView {
    pub anchor_tick: Tick,
    pub x: f32,
    pub active: bool,
    pub heads: Vec<NoteHead>,
    pub labels: Vec<KeyLabelView>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playhead {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasureView {
    pub index: usize,
    pub title: String,
    pub center_y: f32,
    pub chords: Vec<ChordView>,
    pub playhead: Option<Playhead>,
}

/// What one frame shows: up to two measures of the current page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub page: usize,
    pub measures: Vec<MeasureView>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeaderView {
    pub title: String,
    pub status: String,
    pub playing: bool,
    pub sync: String,
}

/// Turns the display tick and the measure list into screen coordinates.
#[derive(Clone, Debug)]
pub struct RenderProjector {
    ticks_per_measure: Tick,
    layout: Layout,
}

impl RenderProjector {
    pub fn new(ticks_per_measure: Tick, layout: Layout) -> Self {
        Self {
            ticks_per_measure: ticks_per_measure.max(1),
            layout,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn current_measure(&self, display_tick: f64) -> usize {
        (display_tick.max(0.0) / self.ticks_per_measure as f64).floor() as usize
    }

    pub fn page(&self, display_tick: f64) -> usize {
        self.current_measure(display_tick) / MEASURES_PER_PAGE
    }

    /// Indices of the two measures on screen; either may be past the end.
    pub fn visible_indices(&self, display_tick: f64) -> (usize, usize) {
        let first = self.page(display_tick) * MEASURES_PER_PAGE;
        (first, first + 1)
    }

    pub fn x_for_tick(&self, tick: f64) -> f32 {
        let tpm = self.ticks_per_measure as f64;
        let rel = tick.rem_euclid(tpm) / tpm;
        self.layout.span_margin + rel as f32 * self.layout.span_width()
    }

    pub fn y_for_pitch(&self, pitch: u8, center_y: f32) -> f32 {
        center_y - (pitch as f32 - self.layout.pitch_center) * self.layout.pitch_step
    }

    pub fn project(&self, measures: &[Measure], display_tick: f64, playing: bool) -> PageView {
        let page = self.page(display_tick);
        let (first, second) = self.visible_indices(display_tick);
        let views = [first, second]
            .into_iter()
            .enumerate()
            .filter_map(|(slot, index)| {
                self.project_measure(measures, index, slot, display_tick, playing)
            })
            .collect();
        PageView {
            page,
            measures: views,
        }
    }

    /// `None` when `index` is out of range.
    pub fn project_measure(
        &self,
        measures: &[Measure],
        index: usize,
        slot: usize,
        display_tick: f64,
        playing: bool,
    ) -> Option<MeasureView> {
        let measure = measures.get(index)?;
        let center_y = self.layout.slot_center_y(slot);

        let chords = measure
            .groups
            .iter()
            .map(|group| self.project_chord(group, center_y, display_tick, playing))
            .collect();

        let playhead = (playing && self.current_measure(display_tick) == index).then(|| Playhead {
            x: self.x_for_tick(display_tick),
            top: center_y - self.layout.playhead_half_height,
            bottom: center_y + self.layout.playhead_half_height,
        });

        Some(MeasureView {
            index,
            title: format!("M. {}", index + 1),
            center_y,
            chords,
            playhead,
        })
    }

    fn project_chord(
        &self,
        group: &ChordGroup,
        center_y: f32,
        display_tick: f64,
        playing: bool,
    ) -> ChordView {
        let heads = group
            .notes
            .iter()
            .map(|n| NoteHead {
                pitch: n.pitch,
                y: self.y_for_pitch(n.pitch, center_y),
            })
            .collect();
        let labels = group
            .notes
            .iter()
            .enumerate()
            .map(|(row, n)| KeyLabelView {
                text: n.label.to_string(),
                y: center_y + self.layout.label_top + row as f32 * self.layout.label_step,
            })
            .collect();

        ChordView {
            anchor_tick: group.anchor_tick,
            x: self.x_for_tick(group.anchor_tick as f64),
            active: playing && (display_tick - group.anchor_tick as f64).abs() < ACTIVE_WINDOW_TICKS,
            heads,
            labels,
        }
    }

    pub fn header(&self, title: &str, playing: bool, latency_ms: i32) -> HeaderView {
        let status = if playing {
            "RECORDING (2-MEASURE MODE)"
        } else {
            "PAUSED (SPACE)"
        };
        HeaderView {
            title: title.to_string(),
            status: status.to_string(),
            playing,
            sync: format!("Sync: {latency_ms}ms (UP/DOWN)"),
        }
    }
}
