use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::bundle::{BundleGraph, load_bundle_graph};
use crate::ripple::{HoverState, LayoutUnavailable, RippleConfig, RippleLayout};

mod connector;
mod graph;
mod render_utils;
mod ui;

pub struct BundleRippleApp {
    graph_path: PathBuf,
    config: RippleConfig,
    initial_selection: Option<String>,
    state: AppState,
    reload_rx: Option<Receiver<Result<BundleGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<BundleGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: BundleGraph,
    config: RippleConfig,
    selected: Option<String>,
    hover: HoverState,
    search: String,
    pan: Vec2,
    zoom: f32,
    layout_cache: Option<LayoutCache>,
    search_match_cache: Option<SearchMatchCache>,
    top_by_size: Vec<String>,
    directories: Vec<String>,
    list_rows_visible: usize,
}

struct LayoutCache {
    selected: Option<String>,
    result: Result<RippleLayout, LayoutUnavailable>,
}

struct SearchMatchCache {
    query: String,
    matches: Vec<String>,
}

impl BundleRippleApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        graph_path: PathBuf,
        config: RippleConfig,
        initial_selection: Option<String>,
    ) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            config,
            initial_selection,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: PathBuf) -> Receiver<Result<BundleGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_bundle_graph(&graph_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }

    fn ready(&self, graph: BundleGraph, previous_selection: Option<String>) -> AppState {
        let selection = previous_selection
            .or_else(|| self.initial_selection.clone())
            .filter(|id| {
                let known = graph.contains(id);
                if !known {
                    tracing::warn!(id = %id, "selected file is not part of the bundle graph");
                }
                known
            });
        let mut model = ViewModel::new(graph, self.config);
        model.set_selected(selection);
        AppState::Ready(Box::new(model))
    }
}

impl eframe::App for BundleRippleApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => self.ready(graph, None),
                        Err(error) => {
                            tracing::error!(%error, "failed to load bundle graph");
                            AppState::Error(error)
                        }
                    });
                } else {
                    ctx.request_repaint();
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading bundle graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load bundle graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.graph_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                let path_label = self.graph_path.display().to_string();
                model.show(ctx, &path_label, &mut reload_requested, is_reloading);
                let previous_selection = model.selected.clone();

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(graph)) => {
                            transition = Some(self.ready(graph, previous_selection));
                        }
                        Ok(Err(error)) => {
                            tracing::error!(%error, "failed to reload bundle graph");
                            transition = Some(AppState::Error(error));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
