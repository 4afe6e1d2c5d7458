use notescroll_domain_score::{
    group_measures, key_label, measure_index_for_tick, pitch_name, KeyLabel, NoteEvent,
    GROUPING_THRESHOLD_TICKS,
};
use pretty_assertions::assert_eq;

fn note(tick: i64, pitch: u8) -> NoteEvent {
    NoteEvent {
        tick,
        pitch,
        name: pitch_name(pitch),
        label: key_label(pitch),
    }
}

fn anchors(notes: &[NoteEvent], tpm: i64) -> Vec<Vec<(i64, Vec<u8>)>> {
    group_measures(notes, tpm)
        .into_iter()
        .map(|m| {
            m.groups
                .into_iter()
                .map(|g| (g.anchor_tick, g.notes.iter().map(|n| n.pitch).collect()))
                .collect()
        })
        .collect()
}

#[test]
fn near_notes_share_a_chord() {
    let notes = vec![note(0, 60), note(5, 64), note(500, 67)];
    assert_eq!(
        anchors(&notes, 1920),
        vec![vec![(0, vec![60, 64]), (500, vec![67])]]
    );
}

#[test]
fn threshold_is_inclusive() {
    let notes = vec![
        note(0, 60),
        note(GROUPING_THRESHOLD_TICKS, 64),
        note(100, 60),
        note(100 + GROUPING_THRESHOLD_TICKS + 1, 64),
    ];
    assert_eq!(
        anchors(&notes, 1920),
        vec![vec![(0, vec![60, 64]), (100, vec![60]), (121, vec![64])]]
    );
}

#[test]
fn grouping_measures_against_anchor_only() {
    // 0, 15, 30: 30 is 15 from the second note but 30 from the anchor
    let notes = vec![note(0, 60), note(15, 62), note(30, 64)];
    assert_eq!(
        anchors(&notes, 1920),
        vec![vec![(0, vec![60, 62]), (30, vec![64])]]
    );
}

#[test]
fn first_group_in_creation_order_wins() {
    // tick 30 is within reach of both anchors; 10 was opened first
    let notes = vec![note(10, 60), note(31, 62), note(30, 64)];
    assert_eq!(
        anchors(&notes, 1920),
        vec![vec![(10, vec![60, 64]), (31, vec![62])]]
    );
}

#[test]
fn duplicate_labels_are_dropped() {
    let notes = vec![note(0, 60), note(3, 60), note(6, 64)];
    let measures = group_measures(&notes, 1920);
    assert_eq!(measures[0].groups.len(), 1);
    let labels: Vec<_> = measures[0].groups[0].notes.iter().map(|n| n.label).collect();
    assert_eq!(labels, vec![KeyLabel::Key('s'), KeyLabel::Key('f')]);
}

#[test]
fn unmapped_notes_collapse_within_a_chord() {
    let notes = vec![note(0, 10), note(2, 120)];
    let measures = group_measures(&notes, 1920);
    assert_eq!(measures[0].groups[0].notes.len(), 1);
    assert_eq!(measures[0].groups[0].notes[0].label, KeyLabel::Unmapped);
}

#[test]
fn silent_measures_are_kept() {
    let notes = vec![note(0, 60), note(1920 * 3 + 10, 62)];
    let measures = group_measures(&notes, 1920);
    assert_eq!(measures.len(), 4);
    assert!(measures[1].is_empty());
    assert!(measures[2].is_empty());
    assert_eq!(measures[3].groups[0].anchor_tick, 1920 * 3 + 10);
    assert!(measures.iter().enumerate().all(|(i, m)| m.index == i));
}

#[test]
fn boundary_note_belongs_to_next_measure() {
    let notes = vec![note(1919, 60), note(1920, 62)];
    assert_eq!(
        anchors(&notes, 1920),
        vec![vec![(1919, vec![60])], vec![(1920, vec![62])]]
    );
}

#[test]
fn groups_never_span_a_measure_boundary() {
    let notes = vec![note(1910, 60), note(1925, 62)];
    let measures = group_measures(&notes, 1920);
    assert_eq!(measures[0].groups.len(), 1);
    assert_eq!(measures[1].groups.len(), 1);
}

#[test]
fn measure_count_and_assignment() {
    let tpm = 1920;
    let notes: Vec<_> = (0..40).map(|i| note(i * 337, 48 + (i % 24) as u8)).collect();
    let max_tick = notes.iter().map(|n| n.tick).max().unwrap_or(0);
    let measures = group_measures(&notes, tpm);

    assert_eq!(measures.len() as i64, max_tick / tpm + 1);
    for m in &measures {
        let start = m.index as i64 * tpm;
        for g in &m.groups {
            for n in &g.notes {
                assert!(start <= n.tick && n.tick < start + tpm);
                assert_eq!(measure_index_for_tick(n.tick, tpm), m.index);
            }
        }
    }
}

#[test]
fn only_tick_zero_gives_one_measure() {
    let measures = group_measures(&[note(0, 60)], 1920);
    assert_eq!(measures.len(), 1);
}

#[test]
fn no_notes_no_measures() {
    assert!(group_measures(&[], 1920).is_empty());
}

#[test]
fn grouping_is_deterministic() {
    let notes: Vec<_> = (0..64).map(|i| note(i * 7, 40 + (i % 30) as u8)).collect();
    assert_eq!(group_measures(&notes, 480), group_measures(&notes, 480));
}
