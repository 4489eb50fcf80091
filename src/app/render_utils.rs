use eframe::egui::ecolor::Hsva;
use eframe::egui::{Align2, Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use crate::ripple::{TextAnchor, Viewport};
use crate::util::stable_unit;

pub(super) const PRIMARY: Color32 = Color32::from_rgb(62, 156, 254);
pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub(super) const TOP_MARGIN: f32 = 30.0;

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.left_top() + pan;

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

pub(super) fn directory_color(directory: &str) -> Color32 {
    let hue = stable_unit(directory);
    Color32::from(Hsva::new(hue, 0.55, 0.82, 1.0))
}

pub(super) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn chart_to_screen(
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    viewport: &Viewport,
    x: f32,
    y: f32,
) -> Pos2 {
    let origin = vec2(viewport.origin_x, viewport.origin_y + TOP_MARGIN);
    rect.left_top() + pan + (origin + vec2(x, y)) * zoom
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn anchor_align(anchor: TextAnchor) -> Align2 {
    match anchor {
        TextAnchor::Start => Align2::LEFT_CENTER,
        TextAnchor::End => Align2::RIGHT_CENTER,
    }
}
