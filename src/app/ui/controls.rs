use eframe::egui::{self, Align, Layout, RichText, Sense, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::bundle::BundleGraph;
use crate::util::format_bytes;

use super::super::render_utils::directory_color;
use super::super::{SearchMatchCache, ViewModel};

const SEARCH_RESULT_LIMIT: usize = 50;
const ROW_HEIGHT: f32 = 22.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn search_matches(graph: &BundleGraph, query: &str) -> Vec<String> {
    let matcher = SkimMatcherV2::default();
    let mut scored = graph
        .nodes()
        .iter()
        .filter_map(|node| {
            fuzzy_match_score(&matcher, &node.id, query).map(|score| (score, node.id.as_str()))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(SEARCH_RESULT_LIMIT)
        .map(|(_, id)| id.to_owned())
        .collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Files");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (file path)")
            .on_hover_text("Fuzzy-match file ids, then click one to center the chart on it.");
        ui.text_edit_singleline(&mut self.search);

        let mut selected_id = None;
        let query = self.search.trim().to_owned();
        if !query.is_empty() {
            ui.add_space(4.0);
            selected_id = self.draw_search_results(ui, &query);
        }

        ui.separator();
        egui::CollapsingHeader::new("Largest files")
            .default_open(true)
            .show(ui, |ui| {
                if let Some(id) = self.draw_size_ranking(ui) {
                    selected_id = Some(id);
                }
            });

        ui.separator();
        egui::CollapsingHeader::new("Directories")
            .default_open(false)
            .show(ui, |ui| self.draw_directory_legend(ui));

        if let Some(id) = selected_id {
            self.set_selected(Some(id));
        }
    }

    fn search_results(&mut self, query: &str) -> &[String] {
        let stale = self
            .search_match_cache
            .as_ref()
            .is_none_or(|cached| cached.query != query);
        if stale {
            let matches = search_matches(&self.graph, query);
            tracing::trace!(query, matches = matches.len(), "search refreshed");
            self.search_match_cache = Some(SearchMatchCache {
                query: query.to_owned(),
                matches,
            });
        }

        self.search_match_cache
            .as_ref()
            .map(|cached| cached.matches.as_slice())
            .unwrap_or_default()
    }

    fn draw_search_results(&mut self, ui: &mut Ui, query: &str) -> Option<String> {
        let matches = self.search_results(query).to_vec();
        if matches.is_empty() {
            ui.label("No files match the search.");
            return None;
        }

        let mut selected_id = None;
        egui::ScrollArea::vertical()
            .id_salt("search_results_scroll")
            .max_height(160.0)
            .auto_shrink([false, true])
            .show_rows(ui, ROW_HEIGHT, matches.len(), |ui, row_range| {
                for index in row_range {
                    let Some(id) = matches.get(index) else {
                        continue;
                    };
                    let is_selected = self.selected.as_deref() == Some(id.as_str());
                    if ui.selectable_label(is_selected, id.as_str()).clicked() {
                        selected_id = Some(id.clone());
                    }
                }
            });

        selected_id
    }

    fn draw_size_ranking(&mut self, ui: &mut Ui) -> Option<String> {
        let ids_len = self.top_by_size.len();
        let row_count = ids_len.min(self.list_rows_visible);
        let mut should_load_more = false;
        let mut selected_id = None;

        egui::ScrollArea::vertical()
            .id_salt("size_ranking_scroll")
            .max_height(360.0)
            .auto_shrink([false, false])
            .show_rows(ui, ROW_HEIGHT, row_count, |ui, row_range| {
                if row_range.end + Self::LIST_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for index in row_range {
                    let Some(id) = self.top_by_size.get(index) else {
                        continue;
                    };
                    let Some(node) = self.graph.node(id) else {
                        continue;
                    };

                    let is_selected = self.selected.as_deref() == Some(id.as_str());
                    let size_label = format_bytes(node.total_bytes);

                    let clicked = ui
                        .horizontal(|ui| {
                            let clicked = ui
                                .selectable_label(is_selected, node.file_name.as_str())
                                .on_hover_text(id.as_str())
                                .clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(size_label);
                            });
                            clicked
                        })
                        .inner;

                    if clicked {
                        selected_id = Some(id.clone());
                    }
                }
            });

        if should_load_more && row_count < ids_len {
            self.list_rows_visible = (row_count + Self::LIST_PAGE_ROWS).min(ids_len);
        }

        selected_id
    }

    fn draw_directory_legend(&self, ui: &mut Ui) {
        if self.directories.is_empty() {
            ui.label("No directories in this graph.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("directory_legend_scroll")
            .max_height(220.0)
            .auto_shrink([false, true])
            .show_rows(ui, ROW_HEIGHT, self.directories.len(), |ui, row_range| {
                for index in row_range {
                    let Some(directory) = self.directories.get(index) else {
                        continue;
                    };
                    ui.horizontal(|ui| {
                        let (rect, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
                        ui.painter().circle_filled(
                            rect.center(),
                            5.0,
                            directory_color(directory),
                        );
                        let label = if directory.is_empty() {
                            RichText::new("(root)").italics()
                        } else {
                            RichText::new(directory.as_str())
                        };
                        ui.label(label);
                    });
                }
            });
    }
}
