use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Rect, RichText, Sense, Shape, Stroke, Ui, vec2,
};

use crate::ripple::{Direction, Highlight, LayoutUnavailable, RippleLayout};
use crate::util::format_bytes;

use super::super::ViewModel;
use super::super::connector::{ConnectorPath, EndArrow};
use super::super::render_utils::{
    BACKGROUND, PRIMARY, anchor_align, circle_visible, directory_color, draw_background,
    with_alpha,
};

const LABEL_MIN_RADIUS: f32 = 8.0;
const CAPTION_LINE_LENGTH: f32 = 100.0;
const PATH_LINE_HEIGHT: f32 = 14.0;
const INCOMING: Color32 = Color32::from_rgb(232, 212, 26);
const EDGE_ALPHA: u8 = 128;

fn unavailable_message(reason: &LayoutUnavailable) -> String {
    match reason {
        LayoutUnavailable::NoSelection => {
            "Select a file from the list to see how it ripples through the bundle.".to_owned()
        }
        other => format!("Nothing to draw: {other}."),
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_ripple(&mut self, ui: &mut Ui) {
        if self.draw_ripple_header(ui) {
            self.set_selected(None);
        }
        self.ensure_layout();

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_chart_zoom(ui, rect, &response);
        self.handle_chart_pan(&response);

        let (viewport, hovered) = match self.layout_cache.as_ref().map(|cache| &cache.result) {
            Some(Ok(layout)) => (layout.viewport, self.hovered_node_id(ui, rect, layout)),
            Some(Err(reason)) => {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    unavailable_message(reason),
                    FontId::proportional(15.0),
                    Color32::from_gray(200),
                );
                return;
            }
            None => return,
        };
        self.update_hover(hovered.as_deref());

        if let Some(layout) = self.current_layout() {
            self.paint_rings(&painter, rect, layout);
            self.paint_center(&painter, rect, layout);
            if let Some(hover) = self.hover.hovered() {
                self.paint_highlight(&painter, rect, layout, &layout.highlight, hover);
                self.paint_hover_summary(&painter, rect, hover);
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
        }

        let clicked = if response.clicked_by(egui::PointerButton::Primary) {
            hovered
        } else {
            None
        };
        let fit_requested = self.hover.hovered().is_none() && response.double_clicked();

        if let Some(id) = clicked {
            self.set_selected(Some(id));
        } else if fit_requested {
            self.fit_view(rect, viewport);
        }
    }

    fn draw_ripple_header(&self, ui: &mut Ui) -> bool {
        let Some(selected) = self.selected.as_deref() else {
            ui.heading("Ripple Chart");
            ui.separator();
            return false;
        };

        let mut zoom_out = false;
        ui.horizontal(|ui| {
            ui.heading(RichText::new(selected).color(PRIMARY));
            if ui.button("x Zoom out").clicked() {
                zoom_out = true;
            }
        });
        ui.small("Scroll to zoom, right-drag to pan, double-click empty space to fit.");
        ui.label("How a file is linked to the entry points of the bundle. Files required by many others are harder to remove.");
        ui.separator();

        zoom_out
    }

    fn paint_rings(&self, painter: &Painter, rect: Rect, layout: &RippleLayout) {
        for ring in layout.rings() {
            let mut nodes = ring.nodes.iter().collect::<Vec<_>>();
            nodes.sort_by(|a, b| a.r.total_cmp(&b.r));

            for node in nodes {
                let position = self.node_screen_pos(rect, layout, node.x, node.y);
                let radius = node.r * self.zoom;
                if !circle_visible(rect, position, radius + 80.0) {
                    continue;
                }

                painter.circle_filled(position, radius, directory_color(&node.directory));
                painter.circle_stroke(position, radius, Stroke::new(1.0, Color32::WHITE));

                if node.r > LABEL_MIN_RADIUS {
                    let align = match ring.direction {
                        Direction::Inbound => Align2::RIGHT_CENTER,
                        Direction::Outbound => Align2::LEFT_CENTER,
                    };
                    painter.text(
                        position,
                        align,
                        node.file_name.as_str(),
                        FontId::proportional(12.0),
                        Color32::from_gray(238),
                    );
                }
            }
        }
    }

    fn paint_center(&self, painter: &Painter, rect: Rect, layout: &RippleLayout) {
        let center = &layout.center;
        let position = self.node_screen_pos(rect, layout, 0.0, 0.0);
        let radius = center.r * self.zoom;
        let zoom = self.zoom;

        painter.circle_filled(position, radius, directory_color(&center.directory));
        painter.circle_stroke(position, radius, Stroke::new(2.0, PRIMARY));

        let caption_font = FontId::proportional(11.0);
        let caption_color = Color32::from_gray(235);
        let Some(node) = self.graph.node(&layout.selected) else {
            return;
        };

        if !layout.required_by.is_empty() {
            let start = position + vec2(radius, 0.0);
            painter.line_segment(
                [start, start + vec2(CAPTION_LINE_LENGTH * zoom, 0.0)],
                Stroke::new(1.0, PRIMARY),
            );
            painter.text(
                start + vec2(5.0, -3.0),
                Align2::LEFT_BOTTOM,
                "Required by",
                caption_font.clone(),
                caption_color,
            );
            painter.text(
                start + vec2(5.0, 3.0),
                Align2::LEFT_TOP,
                format!("{} files", node.count.transitive_required_by.len()),
                caption_font.clone(),
                caption_color,
            );
        }

        if !layout.requires.is_empty() {
            let start = position - vec2(radius, 0.0);
            painter.line_segment(
                [start, start - vec2(CAPTION_LINE_LENGTH * zoom, 0.0)],
                Stroke::new(1.0, PRIMARY),
            );
            painter.text(
                start + vec2(-8.0, -3.0),
                Align2::RIGHT_BOTTOM,
                "Requires",
                caption_font.clone(),
                caption_color,
            );
            painter.text(
                start + vec2(-8.0, 3.0),
                Align2::RIGHT_TOP,
                format!("{} files/modules", node.count.requires.len()),
                caption_font,
                caption_color,
            );
        }

        let segments = layout.selected.split('/').collect::<Vec<_>>();
        let top = position.y - radius - PATH_LINE_HEIGHT * (segments.len() as f32 + 1.0);
        for (index, segment) in segments.iter().enumerate() {
            let text = if index + 1 < segments.len() {
                format!("{segment}/")
            } else {
                (*segment).to_owned()
            };
            painter.text(
                egui::pos2(position.x, top + PATH_LINE_HEIGHT * (index as f32 + 1.0)),
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(12.0),
                PRIMARY,
            );
        }
    }

    fn paint_highlight(
        &self,
        painter: &Painter,
        rect: Rect,
        layout: &RippleLayout,
        highlight: &Highlight,
        hover: &str,
    ) {
        painter.rect_filled(rect, 0.0, with_alpha(BACKGROUND, 200));

        let arrow = EndArrow::default();
        for edge in &highlight.edges {
            let (Some(source), Some(target)) =
                (layout.position_of(&edge.source), layout.position_of(&edge.target))
            else {
                continue;
            };

            let start = self.node_screen_pos(rect, layout, source.x, source.y);
            let end = self.node_screen_pos(rect, layout, target.x, target.y);
            let middle = start + (end - start) * (2.0 / 3.0);
            let color = if edge.source == hover {
                with_alpha(PRIMARY, EDGE_ALPHA)
            } else {
                with_alpha(INCOMING, EDGE_ALPHA)
            };
            let stroke = Stroke::new(1.5, color);

            painter.line_segment([start, end], stroke);
            painter.circle_stroke(start, source.r * self.zoom, stroke);
            painter.circle_stroke(end, target.r * self.zoom, stroke);

            let marker = arrow.path(start, middle, 1.5);
            if !marker.is_empty() {
                painter.add(Shape::convex_polygon(marker, color, Stroke::new(1.0, color)));
            }
        }

        for anchored in &highlight.anchors {
            let Some(node) = layout.position_of(&anchored.id) else {
                continue;
            };
            painter.text(
                self.node_screen_pos(rect, layout, node.x, node.y),
                anchor_align(anchored.anchor),
                node.file_name.as_str(),
                FontId::proportional(12.0),
                Color32::from_gray(245),
            );
        }
    }

    fn paint_hover_summary(&self, painter: &Painter, rect: Rect, hover: &str) {
        let Some(node) = self.graph.node(hover) else {
            return;
        };

        let text = format!(
            "{}  |  {}  |  requires {}  |  required by {}",
            node.id,
            format_bytes(node.total_bytes),
            node.count.requires.len(),
            node.count.required_by.len()
        );
        painter.text(
            rect.left_top() + vec2(10.0, 10.0),
            Align2::LEFT_TOP,
            text,
            FontId::proportional(13.0),
            Color32::from_gray(240),
        );
    }
}
