use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context};
use linkmap::people::{Dataset, load_dataset, parse_dataset};
use linkmap::{GraphEvent, LayoutMode, NetworkScene, NodeIndex};
use tracing::{debug, error};

mod canvas;
mod ui;

const SAMPLE_NETWORK: &str = include_str!("../../demos/sample_network.json");

/// What to load and how to show it, fixed for the lifetime of the window.
#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub data: Option<PathBuf>,
    pub ego: Option<String>,
    pub mode: LayoutMode,
    pub derive_relations: bool,
}

impl LaunchOptions {
    fn source_label(&self) -> String {
        match &self.data {
            Some(path) => path.display().to_string(),
            None => "bundled sample".to_owned(),
        }
    }
}

pub struct NetworkApp {
    launch: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<Result<Dataset, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Dataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    scene: NetworkScene,
    search: String,
    keyword_query: String,
    selected: Option<NodeIndex>,
    show_grid: bool,
    pointer_inside: bool,
    events: Vec<GraphEvent>,
}

impl NetworkApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, launch: LaunchOptions) -> Self {
        let state = Self::start_load(&launch);
        Self {
            launch,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(launch: &LaunchOptions) -> Receiver<Result<Dataset, String>> {
        let (tx, rx) = mpsc::channel();
        let launch = launch.clone();

        thread::spawn(move || {
            let result = read_dataset(&launch).map_err(report);
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(launch: &LaunchOptions) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(launch),
        }
    }
}

fn read_dataset(launch: &LaunchOptions) -> Result<Dataset> {
    let mut dataset = match &launch.data {
        Some(path) => load_dataset(path)?,
        None => parse_dataset(SAMPLE_NETWORK).context("bundled sample network is invalid")?,
    };
    if let Some(ego) = &launch.ego {
        dataset.ego = Some(ego.clone());
    }
    Ok(dataset)
}

fn report(error: anyhow::Error) -> String {
    let message = format!("{error:#}");
    error!(error = %message, "failed to load network");
    message
}

impl eframe::App for NetworkApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    let ready = result.and_then(|dataset| {
                        ViewModel::new(&self.launch, &dataset).map_err(report)
                    });
                    transition = Some(match ready {
                        Ok(model) => AppState::Ready(Box::new(model)),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the network");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.launch));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                let source = self.launch.source_label();
                model.show(ctx, &source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    debug!(source = %source, "reloading network");
                    self.reload_rx = Some(Self::spawn_load(&self.launch));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            let reloaded = result.and_then(|dataset| {
                                model.reload(&source, &dataset).map_err(report)
                            });
                            if let Err(error) = reloaded {
                                transition = Some(AppState::Error(error));
                            }
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
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
