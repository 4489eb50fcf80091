use eframe::egui::{self, RichText, Ui};

use crate::ripple::Direction;
use crate::util::{format_bytes, format_percent};

use super::super::ViewModel;

const NEIGHBOR_LIST_HEIGHT: f32 = 180.0;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select a file from the list or the chart.");
            return;
        };

        let Some(node) = self.graph.node(&selected_id) else {
            ui.label("Selected file is not part of the loaded graph.");
            return;
        };

        ui.label(RichText::new(node.file_name.as_str()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        if !node.directory.is_empty() {
            ui.label(format!("Directory: {}", node.directory));
        }
        ui.label(format!(
            "Size: {} ({} of bundle)",
            format_bytes(node.total_bytes),
            format_percent(node.total_bytes, self.graph.total_bytes())
        ));
        ui.label(format!("Direct requires: {}", node.count.requires.len()));
        ui.label(format!(
            "All requires: {} ({})",
            node.count.transitive_requires.len(),
            format_bytes(node.count.transitive_requires_size)
        ));
        ui.label(format!("Direct required by: {}", node.count.required_by.len()));
        ui.label(format!(
            "All required by: {}",
            node.count.transitive_required_by.len()
        ));

        let requires = node.count.requires.clone();
        let required_by = node.count.required_by.clone();

        if let Some(layout) = self.current_layout() {
            ui.separator();
            ui.label(RichText::new("Ripple").strong());
            ui.label(format!("Requires ring: {} files", layout.requires.len()));
            ui.label(format!("Required-by ring: {} files", layout.required_by.len()));
            ui.label(format!(
                "Outer levels: {} ({} files)",
                layout.level_count(),
                layout.levels.iter().map(|ring| ring.len()).sum::<usize>()
            ));
            let inbound = layout
                .edges
                .iter()
                .filter(|edge| edge.direction == Direction::Inbound)
                .count();
            ui.label(format!(
                "Edges: {} ({} into the selection)",
                layout.edges.len(),
                inbound
            ));
        }

        let mut next_selection = None;

        ui.separator();
        ui.label(RichText::new("Requires").strong());
        if let Some(id) = self.draw_neighbor_links(ui, "requires_links_scroll", &requires) {
            next_selection = Some(id);
        }

        ui.separator();
        ui.label(RichText::new("Required by").strong());
        if let Some(id) = self.draw_neighbor_links(ui, "required_by_links_scroll", &required_by) {
            next_selection = Some(id);
        }

        if let Some(id) = next_selection {
            self.set_selected(Some(id));
        }
    }

    fn draw_neighbor_links(&self, ui: &mut Ui, salt: &str, ids: &[String]) -> Option<String> {
        if ids.is_empty() {
            ui.label("None.");
            return None;
        }

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt(salt)
            .max_height(NEIGHBOR_LIST_HEIGHT)
            .auto_shrink([false, true])
            .show_rows(ui, 20.0, ids.len(), |ui, row_range| {
                for index in row_range {
                    let Some(id) = ids.get(index) else {
                        continue;
                    };
                    let label = match self.graph.node(id) {
                        Some(neighbor) => format!(
                            "{}  ({})",
                            neighbor.file_name,
                            format_bytes(neighbor.total_bytes)
                        ),
                        None => id.clone(),
                    };

                    if ui.link(label).on_hover_text(id.as_str()).clicked() {
                        clicked = Some(id.clone());
                    }
                }
            });

        clicked
    }
}
