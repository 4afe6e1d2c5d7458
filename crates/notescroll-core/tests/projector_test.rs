use notescroll_core::{Layout, RenderProjector, ACTIVE_WINDOW_TICKS};
use notescroll_domain_score::{group_measures, key_label, pitch_name, Measure, NoteEvent};
use pretty_assertions::assert_eq;

const TPM: i64 = 1920;

fn note(tick: i64, pitch: u8) -> NoteEvent {
    NoteEvent {
        tick,
        pitch,
        name: pitch_name(pitch),
        label: key_label(pitch),
    }
}

fn measures() -> Vec<Measure> {
    let notes = vec![
        note(0, 60),
        note(5, 64),
        note(960, 65),
        note(TPM + 480, 67),
        note(2 * TPM, 72),
        note(3 * TPM + 100, 100),
    ];
    group_measures(&notes, TPM)
}

fn projector() -> RenderProjector {
    RenderProjector::new(TPM, Layout::default())
}

#[test]
fn two_measures_per_page() {
    let p = projector();
    assert_eq!(p.visible_indices(0.0), (0, 1));
    assert_eq!(p.visible_indices((TPM + 10) as f64), (0, 1));
    assert_eq!(p.visible_indices((2 * TPM) as f64), (2, 3));
    assert_eq!(p.visible_indices((5 * TPM + 1) as f64), (4, 5));
    assert_eq!(p.page((3 * TPM) as f64), 1);
}

#[test]
fn horizontal_mapping_spans_the_measure() {
    let p = projector();
    assert_eq!(p.x_for_tick(0.0), 70.0);
    assert_eq!(p.x_for_tick(960.0), 270.0);
    assert_eq!(p.x_for_tick((TPM + 960) as f64), 270.0);
}

#[test]
fn vertical_mapping_is_relative_to_the_center_line() {
    let p = projector();
    assert_eq!(p.y_for_pitch(65, 300.0), 300.0);
    assert_eq!(p.y_for_pitch(67, 300.0), 291.0);
    assert_eq!(p.y_for_pitch(60, 300.0), 322.5);
}

#[test]
fn page_layout_places_chords() {
    let page = projector().project(&measures(), 0.0, false);

    assert_eq!(page.page, 0);
    assert_eq!(page.measures.len(), 2);
    let top = &page.measures[0];
    assert_eq!(top.index, 0);
    assert_eq!(top.title, "M. 1");
    assert_eq!(top.center_y, 300.0);
    assert_eq!(page.measures[1].center_y, 660.0);

    assert_eq!(top.chords.len(), 2);
    let chord = &top.chords[0];
    assert_eq!(chord.anchor_tick, 0);
    assert_eq!(chord.x, 70.0);
    let labels: Vec<_> = chord.labels.iter().map(|l| (l.text.as_str(), l.y)).collect();
    assert_eq!(labels, vec![("s", 390.0), ("f", 435.0)]);
    assert_eq!(chord.heads.len(), 2);
}

#[test]
fn active_chords_and_playhead_only_while_playing() {
    let measures = measures();
    let p = projector();

    let paused = p.project(&measures, 10.0, false);
    assert!(paused.measures.iter().all(|m| m.playhead.is_none()));
    assert!(paused.measures[0].chords.iter().all(|c| !c.active));

    let playing = p.project(&measures, 10.0, true);
    assert!(playing.measures[0].chords[0].active);
    assert!(!playing.measures[0].chords[1].active);
    let playhead = playing.measures[0].playhead.expect("playhead in current measure");
    assert_eq!(playhead.top, 250.0);
    assert_eq!(playhead.bottom, 350.0);
    assert!(playing.measures[1].playhead.is_none());
}

#[test]
fn active_window_is_exclusive() {
    let measures = measures();
    let p = projector();
    let edge = p.project(&measures, 960.0 + ACTIVE_WINDOW_TICKS, true);
    assert!(!edge.measures[0].chords[1].active);
    let inside = p.project(&measures, 960.0 + ACTIVE_WINDOW_TICKS - 0.5, true);
    assert!(inside.measures[0].chords[1].active);
}

#[test]
fn playhead_follows_into_the_second_slot() {
    let page = projector().project(&measures(), (TPM + 480) as f64, true);
    assert!(page.measures[0].playhead.is_none());
    let playhead = page.measures[1].playhead.expect("playhead in second measure");
    assert_eq!(playhead.x, 170.0);
}

#[test]
fn pages_past_the_end_render_nothing() {
    let p = projector();
    let measures = measures();
    assert_eq!(measures.len(), 4);

    let last = p.project(&measures, (3 * TPM) as f64, true);
    assert_eq!(last.measures.len(), 2);

    let beyond = p.project(&measures, (4 * TPM) as f64, true);
    assert!(beyond.measures.is_empty());
    assert!(p.project_measure(&measures, 99, 0, 0.0, true).is_none());
}

#[test]
fn unmapped_pitches_render_as_question_marks() {
    let page = projector().project(&measures(), (3 * TPM) as f64, false);
    let labels: Vec<_> = page.measures[1].chords[0]
        .labels
        .iter()
        .map(|l| l.text.clone())
        .collect();
    assert_eq!(labels, vec!["?".to_string()]);
}

#[test]
fn empty_timeline_projects_an_empty_page() {
    let page = projector().project(&[], 0.0, true);
    assert!(page.measures.is_empty());
}

#[test]
fn header_reflects_state() {
    let p = projector();
    let header = p.header("song.mid", true, 170);
    assert_eq!(header.status, "RECORDING (2-MEASURE MODE)");
    assert_eq!(header.sync, "Sync: 170ms (UP/DOWN)");
    assert_eq!(p.header("song.mid", false, -20).status, "PAUSED (SPACE)");
}
