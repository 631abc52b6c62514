use eframe::egui::{self, RichText, Ui};
use linkmap::NodeIndex;

use super::super::ViewModel;

const VIA_NAMES: usize = 3;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Network Controls");
        ui.separator();
        ui.add_space(4.0);

        self.draw_search(ui);
        ui.separator();
        self.draw_keyword_highlight(ui);
        ui.separator();
        self.draw_view_controls(ui);
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label("Find a person")
            .on_hover_text("Matches name, company, role and keywords of people you can reach.");
        ui.text_edit_singleline(&mut self.search);

        let hits = self.scene.search(&self.search);
        if self.search.trim().is_empty() {
            return;
        }
        if hits.is_empty() {
            ui.small("Nobody in your network matches.");
            return;
        }

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("search_hits_scroll")
            .max_height(260.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for hit in &hits {
                    let Some(node) = self.scene.graph().node(hit.index) else {
                        continue;
                    };
                    let label = format!("{}  ({})", node.name, degree_label(hit.degree));
                    if ui.link(label).on_hover_text(node.company.as_str()).clicked() {
                        clicked = Some(hit.index);
                    }
                    if let Some(via) = self.via_text(&hit.path) {
                        ui.small(via);
                    }
                }
            });

        if let Some(index) = clicked {
            self.select(index);
        }
    }

    fn draw_keyword_highlight(&mut self, ui: &mut Ui) {
        ui.label("Highlight keyword")
            .on_hover_text("Dim everyone who does not carry the chosen keyword.");
        ui.text_edit_singleline(&mut self.keyword_query);

        let mut chosen = None;
        ui.horizontal_wrapped(|ui| {
            for keyword in self.scene.keyword_suggestions(&self.keyword_query) {
                let holders = self.scene.search_index().keyword_holders(&keyword);
                if ui
                    .button(format!("{keyword} ({holders})"))
                    .on_hover_text("Highlight people with this keyword.")
                    .clicked()
                {
                    chosen = Some(keyword);
                }
            }
        });
        if let Some(keyword) = chosen {
            self.scene.highlight_keyword(Some(&keyword));
            self.keyword_query = keyword;
        }

        let active = self
            .scene
            .viewport()
            .interaction()
            .highlighted_keyword
            .clone();
        if let Some(keyword) = active {
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("Highlighting: {keyword}")).strong());
                if ui.small_button("Clear").clicked() {
                    self.scene.highlight_keyword(None);
                }
            });
        }
    }

    fn draw_view_controls(&mut self, ui: &mut Ui) {
        ui.label("View");
        ui.horizontal(|ui| {
            if ui.button("-").on_hover_text("Zoom out").clicked() {
                self.scene.viewport_mut().zoom_out(&mut self.events);
            }
            if ui.button("+").on_hover_text("Zoom in").clicked() {
                self.scene.viewport_mut().zoom_in(&mut self.events);
            }
            if ui.button("Reset").on_hover_text("Back to 100% centered on you").clicked() {
                self.scene.viewport_mut().reset(&mut self.events);
            }
            if ui.button("Fit").on_hover_text("Show the whole map").clicked() {
                self.scene.fit(&mut self.events);
            }
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui
                .button("Relayout")
                .on_hover_text("Recompute positions, dropping nodes you dragged.")
                .clicked()
            {
                self.scene.relayout();
            }
            if ui.button("Clear focus").clicked() {
                self.clear_selection();
            }
        });

        if ui
            .checkbox(&mut self.show_grid, "Show grid")
            .on_hover_text("Draw the background grid behind the map.")
            .changed()
        {
            self.scene.set_show_grid(self.show_grid);
        }
    }

    /// "via A → B" for the people between the ego and the path's end.
    pub(in crate::app) fn via_text(&self, path: &[NodeIndex]) -> Option<String> {
        if path.len() <= 2 {
            return None;
        }

        let between = &path[1..path.len() - 1];
        let mut names = between
            .iter()
            .take(VIA_NAMES)
            .filter_map(|&index| self.scene.graph().node(index))
            .map(|node| node.name.as_str())
            .collect::<Vec<_>>()
            .join(" → ");
        if between.len() > VIA_NAMES {
            names.push_str(" → …");
        }
        Some(format!("via {names}"))
    }
}

pub(in crate::app) fn degree_label(degree: u32) -> String {
    match degree {
        0 => "you".to_owned(),
        1 => "1st".to_owned(),
        2 => "2nd".to_owned(),
        3 => "3rd".to_owned(),
        n => format!("{n}th"),
    }
}
