use crate::model::{ChordGroup, Measure, NoteEvent};
use notescroll_ports::types::Tick;

/// Largest distance from a group's anchor at which a note still joins it.
pub const GROUPING_THRESHOLD_TICKS: Tick = 20;

/// Splits tick-sorted notes into fixed-length measures and clusters each
/// measure's notes into chord groups.
///
/// Every measure from 0 up to the one holding the last note is present, even
/// when silent. A note at exactly a measure boundary belongs to the later one.
///
/// A note joins the first group (in creation order) whose anchor lies within
/// [`GROUPING_THRESHOLD_TICKS`]. Distance is measured to the anchor only, so a
/// group's first and last notes may end up further apart than the threshold.
/// A note whose label is already in that group is dropped.
pub fn group_measures(notes: &[NoteEvent], ticks_per_measure: Tick) -> Vec<Measure> {
    let Some(max_tick) = notes.iter().map(|n| n.tick).max() else {
        return Vec::new();
    };
    let ticks_per_measure = ticks_per_measure.max(1);
    let count = (max_tick.max(0) / ticks_per_measure) as usize + 1;

    let mut buckets: Vec<Vec<&NoteEvent>> = vec![Vec::new(); count];
    for note in notes {
        let idx = (note.tick.max(0) / ticks_per_measure) as usize;
        buckets[idx].push(note);
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(index, bucket)| Measure {
            index,
            groups: group_chords(bucket),
        })
        .collect()
}

fn group_chords(notes: Vec<&NoteEvent>) -> Vec<ChordGroup> {
    let mut groups: Vec<ChordGroup> = Vec::new();
    for note in notes {
        let open = groups
            .iter_mut()
            .find(|g| (note.tick - g.anchor_tick).abs() <= GROUPING_THRESHOLD_TICKS);
        match open {
            Some(group) => {
                if !group.contains_label(note.label) {
                    group.notes.push(note.clone());
                }
            }
            None => groups.push(ChordGroup::new(note.clone())),
        }
    }
    groups
}

/// Measure index holding `tick`.
pub fn measure_index_for_tick(tick: Tick, ticks_per_measure: Tick) -> usize {
    (tick.max(0) / ticks_per_measure.max(1)) as usize
}
