use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::bundle::BundleGraph;
use crate::ripple::{HoverState, RippleConfig, RippleLayout, RippleState, compute_layout};

use super::super::{LayoutCache, ViewModel};

impl ViewModel {
    pub(in crate::app) const INITIAL_LIST_ROWS: usize = 40;
    pub(in crate::app) const LIST_PAGE_ROWS: usize = 40;
    pub(in crate::app) const LIST_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn new(graph: BundleGraph, config: RippleConfig) -> Self {
        let top_by_size = graph
            .top_by_size()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let directories = graph
            .directories()
            .into_iter()
            .map(str::to_owned)
            .collect();

        Self {
            graph,
            config,
            selected: None,
            hover: HoverState::Idle,
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            layout_cache: None,
            search_match_cache: None,
            top_by_size,
            directories,
            list_rows_visible: Self::INITIAL_LIST_ROWS,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        graph_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.ensure_layout();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("bundle-ripple");
                    ui.separator();
                    ui.label(format!("graph: {graph_path}"));
                    ui.label(format!("files: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload graph"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(summary) = self.layout_summary_text() {
                            ui.label(summary);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading bundle graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_ripple(ui);
            }
        });
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }

        tracing::debug!(selected = ?selected, "selection changed");
        self.selected = selected;
        self.hover.leave();
        self.pan = Vec2::ZERO;
    }

    // Keyed on the selection only; a reload builds a fresh view model.
    pub(in crate::app) fn ensure_layout(&mut self) {
        if self
            .layout_cache
            .as_ref()
            .is_some_and(|cache| cache.selected == self.selected)
        {
            return;
        }

        let state = RippleState {
            selection: self.selected.clone(),
            hover: self.hover.hovered().map(str::to_owned),
        };
        let result = compute_layout(&state, &self.graph, self.graph.domain_max(), &self.config);
        if let Err(reason) = &result {
            tracing::debug!(%reason, "no ripple layout for the current selection");
        }

        self.layout_cache = Some(LayoutCache {
            selected: self.selected.clone(),
            result,
        });
    }

    pub(in crate::app) fn update_hover(&mut self, hovered: Option<&str>) {
        if self.hover.hovered() == hovered {
            return;
        }

        match hovered {
            Some(id) => self.hover.enter(id),
            None => self.hover.leave(),
        }
        if let Some(LayoutCache {
            result: Ok(layout), ..
        }) = self.layout_cache.as_mut()
        {
            layout.set_hover(self.hover.hovered());
        }
    }

    pub(in crate::app) fn current_layout(&self) -> Option<&RippleLayout> {
        self.layout_cache
            .as_ref()
            .and_then(|cache| cache.result.as_ref().ok())
    }

    fn layout_summary_text(&self) -> Option<String> {
        let layout = self.current_layout()?;
        Some(format!(
            "requires: {}  |  required by: {}  |  levels: {}",
            layout.requires.len(),
            layout.required_by.len(),
            layout.level_count()
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::bundle::Node;

    use super::*;

    fn model() -> ViewModel {
        let graph = BundleGraph::from_nodes(vec![
            Node::new("src/a.js", 10).with_required_by(["src/b.js"]),
            Node::new("src/b.js", 20).with_requires(["src/a.js"]),
        ]);
        ViewModel::new(graph, RippleConfig::default())
    }

    #[test]
    fn hover_drives_the_cached_highlight() {
        let mut model = model();
        model.set_selected(Some("src/a.js".to_owned()));
        model.ensure_layout();

        model.update_hover(Some("src/b.js"));
        assert_eq!(model.hover.hovered(), Some("src/b.js"));
        let layout = model.current_layout().unwrap();
        assert_eq!(layout.highlight.edges.len(), 1);
        assert_eq!(layout.highlight.edges[0].target, "src/b.js");

        model.update_hover(None);
        assert_eq!(model.hover, HoverState::Idle);
        assert!(model.current_layout().unwrap().highlight.edges.is_empty());
    }

    #[test]
    fn new_selection_starts_without_hover() {
        let mut model = model();
        model.set_selected(Some("src/a.js".to_owned()));
        model.ensure_layout();
        model.update_hover(Some("src/b.js"));

        model.set_selected(Some("src/b.js".to_owned()));
        model.ensure_layout();

        assert_eq!(model.hover, HoverState::Idle);
        let layout = model.current_layout().unwrap();
        assert_eq!(layout.selected, "src/b.js");
        assert!(layout.highlight.edges.is_empty());
    }
}
