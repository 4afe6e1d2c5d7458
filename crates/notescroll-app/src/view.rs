use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};
use notescroll_core::{HeaderView, Layout, MeasureView, PlayerCore};

pub const CANVAS_WIDTH: f32 = 540.0;
pub const CANVAS_HEIGHT: f32 = 960.0;

pub const BACKGROUND: Color32 = Color32::WHITE;
const INK: Color32 = Color32::from_rgb(30, 41, 59);
const RED: Color32 = Color32::from_rgb(239, 68, 68);
const ORANGE: Color32 = Color32::from_rgb(255, 60, 0);
const YELLOW: Color32 = Color32::from_rgb(245, 158, 11);
const BLUE: Color32 = Color32::from_rgb(37, 99, 235);
const HEADER_FILL: Color32 = Color32::from_rgb(248, 250, 252);
const HEADER_RULE: Color32 = Color32::from_rgb(220, 225, 230);
const STAVE: Color32 = Color32::from_rgb(210, 210, 215);
const MEASURE_NUMBER: Color32 = Color32::from_rgb(180, 180, 190);
const LABEL_IDLE: Color32 = Color32::from_rgb(60, 60, 65);
const STATUS_IDLE: Color32 = Color32::from_rgb(120, 125, 130);

/// Maps canvas coordinates onto the panel, scaling if the window was resized.
struct Canvas<'a> {
    painter: &'a Painter,
    origin: Pos2,
    scale: f32,
}

impl Canvas<'_> {
    fn pos(&self, x: f32, y: f32) -> Pos2 {
        Pos2::new(self.origin.x + x * self.scale, self.origin.y + y * self.scale)
    }

    fn line(&self, from: (f32, f32), to: (f32, f32), width: f32, color: Color32) {
        self.painter.line_segment(
            [self.pos(from.0, from.1), self.pos(to.0, to.1)],
            Stroke::new(width * self.scale, color),
        );
    }

    fn text(&self, at: (f32, f32), anchor: Align2, text: &str, size: f32, color: Color32) {
        self.painter.text(
            self.pos(at.0, at.1),
            anchor,
            text,
            FontId::proportional(size * self.scale),
            color,
        );
    }
}

pub fn paint(painter: &Painter, rect: Rect, core: &PlayerCore) {
    let layout = core.layout();
    let canvas = Canvas {
        painter,
        origin: rect.min,
        scale: rect.width() / layout.width,
    };

    for measure in &core.page_view().measures {
        paint_measure(&canvas, layout, measure);
    }
    paint_header(&canvas, layout, &core.header_view());
}

fn paint_stave(canvas: &Canvas<'_>, layout: &Layout, center_y: f32) {
    for i in 0..5 {
        let y = center_y - 40.0 + i as f32 * 20.0;
        canvas.line((40.0, y), (layout.width - 40.0, y), 2.0, STAVE);
    }
}

fn paint_measure(canvas: &Canvas<'_>, layout: &Layout, measure: &MeasureView) {
    paint_stave(canvas, layout, measure.center_y);
    canvas.text(
        (45.0, measure.center_y - 70.0),
        Align2::LEFT_TOP,
        &measure.title,
        20.0,
        MEASURE_NUMBER,
    );

    for chord in &measure.chords {
        let (head, label) = if chord.active {
            (RED, YELLOW)
        } else {
            (INK, LABEL_IDLE)
        };
        for note in &chord.heads {
            canvas
                .painter
                .circle_filled(canvas.pos(chord.x, note.y), layout.note_radius * canvas.scale, head);
        }
        for key in &chord.labels {
            canvas.text((chord.x, key.y), Align2::CENTER_CENTER, &key.text, 32.0, label);
        }
    }

    if let Some(playhead) = measure.playhead {
        canvas.line(
            (playhead.x, playhead.top),
            (playhead.x, playhead.bottom),
            4.0,
            ORANGE,
        );
    }
}

fn paint_header(canvas: &Canvas<'_>, layout: &Layout, header: &HeaderView) {
    let band = Rect::from_min_max(
        canvas.pos(0.0, 0.0),
        canvas.pos(layout.width, layout.header_height),
    );
    canvas.painter.rect_filled(band, 0.0, HEADER_FILL);
    canvas.line(
        (0.0, layout.header_height),
        (layout.width, layout.header_height),
        2.0,
        HEADER_RULE,
    );

    canvas.text((30.0, 40.0), Align2::LEFT_TOP, &header.title, 24.0, INK);
    let status_color = if header.playing { RED } else { STATUS_IDLE };
    canvas.text((30.0, 75.0), Align2::LEFT_TOP, &header.status, 20.0, status_color);
    canvas.text((30.0, 105.0), Align2::LEFT_TOP, &header.sync, 20.0, BLUE);
}
