use anyhow::{Context as _, Result};
use eframe::egui::{self, Align, Context, Layout};
use linkmap::people::Dataset;
use linkmap::{GraphEvent, LayoutMode, NetworkScene, NodeIndex, SceneConfig};
use tracing::debug;

use super::super::{LaunchOptions, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(launch: &LaunchOptions, dataset: &Dataset) -> Result<Self> {
        let config = SceneConfig {
            derive_relations: launch.derive_relations,
            ..SceneConfig::default()
        };
        let show_grid = config.render.show_grid;
        let mut scene = NetworkScene::new(config);
        scene.set_mode(launch.mode);
        scene
            .load(dataset)
            .with_context(|| format!("failed to build network from {}", launch.source_label()))?;

        Ok(Self {
            scene,
            search: String::new(),
            keyword_query: String::new(),
            selected: None,
            show_grid,
            pointer_inside: false,
            events: Vec::new(),
        })
    }

    /// Swaps in a freshly loaded dataset; pan and zoom survive.
    pub(in crate::app) fn reload(&mut self, source: &str, dataset: &Dataset) -> Result<()> {
        self.scene
            .load(dataset)
            .with_context(|| format!("failed to rebuild network from {source}"))?;
        self.selected = None;
        Ok(())
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("linkmap");
                    ui.separator();
                    ui.label(format!("source: {source}"));
                    ui.label(format!("people: {}", self.scene.full_graph().len()));
                    ui.label(format!("relations: {}", self.scene.full_graph().edges().len()));
                    ui.label(format!("on map: {}", self.scene.graph().len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload network"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.separator();
                    let mut mode = self.scene.mode();
                    for option in [LayoutMode::Radial, LayoutMode::Clusters] {
                        ui.selectable_value(&mut mode, option, option.label());
                    }
                    if mode != self.scene.mode() {
                        self.set_mode(mode);
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let scale = self.scene.viewport().transform().scale;
                        ui.label(format!("zoom: {:.0}%", scale * 100.0));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));

        self.drain_events();
    }

    pub(in crate::app) fn set_mode(&mut self, mode: LayoutMode) {
        self.scene.set_mode(mode);
        self.selected = None;
    }

    /// Selects `index` and eases the camera onto it.
    pub(in crate::app) fn select(&mut self, index: NodeIndex) {
        self.scene.focus(index);
        self.selected = Some(index);
    }

    pub(in crate::app) fn clear_selection(&mut self) {
        self.scene.clear_focus();
        self.selected = None;
    }

    fn drain_events(&mut self) {
        for event in self.events.drain(..) {
            match event {
                GraphEvent::NodeSelected { index, id } => {
                    debug!(node = %id, "node selected");
                    self.selected = Some(index);
                }
                GraphEvent::BackgroundClicked => self.selected = None,
                GraphEvent::NodeHovered(_) | GraphEvent::ViewportChanged(_) => {}
            }
        }
    }
}
