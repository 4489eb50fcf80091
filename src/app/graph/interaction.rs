use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use crate::ripple::{RippleLayout, Viewport};

use super::super::ViewModel;
use super::super::render_utils::{TOP_MARGIN, chart_to_screen};

const MIN_ZOOM: f32 = 0.2;
const MAX_ZOOM: f32 = 4.0;

impl ViewModel {
    const MIN_HIT_RADIUS: f32 = 4.0;

    pub(in crate::app) fn handle_chart_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let anchored = (pointer - rect.left_top() - self.pan) / self.zoom;

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - rect.left_top() - (anchored * self.zoom);
    }

    pub(in crate::app) fn handle_chart_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn fit_view(&mut self, rect: Rect, viewport: Viewport) {
        let width = viewport.width();
        let height = viewport.height() + TOP_MARGIN;
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        self.zoom = (rect.width() / width)
            .min(rect.height() / height)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = Vec2::ZERO;
    }

    pub(in crate::app) fn hovered_node_id(
        &self,
        ui: &Ui,
        rect: Rect,
        layout: &RippleLayout,
    ) -> Option<String> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }

        layout
            .rings()
            .flat_map(|ring| ring.nodes.iter())
            .filter_map(|node| {
                let position = self.node_screen_pos(rect, layout, node.x, node.y);
                let radius = (node.r * self.zoom).max(Self::MIN_HIT_RADIUS);
                let distance = position.distance(pointer);
                (distance <= radius).then_some((node, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| node.id.clone())
    }

    pub(in crate::app) fn node_screen_pos(
        &self,
        rect: Rect,
        layout: &RippleLayout,
        x: f32,
        y: f32,
    ) -> Pos2 {
        chart_to_screen(rect, self.pan, self.zoom, &layout.viewport, x, y)
    }
}
