use eframe::egui::{self, RichText, Ui};
use linkmap::NodeIndex;

use super::super::ViewModel;
use super::controls::degree_label;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("details_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Selection Details");
                ui.add_space(6.0);
                clicked = self.draw_selection(ui);

                ui.separator();
                ui.label(RichText::new("Suggested introductions").strong());
                clicked = self.draw_recommendations(ui).or(clicked);
            });

        if let Some(index) = clicked {
            self.select(index);
        }
    }

    fn draw_selection(&self, ui: &mut Ui) -> Option<NodeIndex> {
        let Some(index) = self.selected else {
            ui.label("Select a person on the map or from the search results.");
            return None;
        };
        let Some(node) = self.scene.graph().node(index) else {
            ui.label("Selected person is no longer on the map.");
            return None;
        };

        let mut clicked = None;
        ui.label(RichText::new(node.name.as_str()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        if !node.company.is_empty() {
            ui.label(format!("Company: {}", node.company));
        }
        if !node.role.is_empty() {
            ui.label(format!("Role: {}", node.role));
        }
        ui.label(format!("Category: {}", node.category.label()));
        if !node.keywords.is_empty() {
            ui.label(format!("Keywords: {}", node.keywords.join(", ")));
        }
        match node.degree {
            Some(degree) => ui.label(format!("Degree: {}", degree_label(degree))),
            None => ui.label("Degree: not connected to you"),
        };
        ui.label(format!("Connections: {}", node.connection_count));
        if node.is_hub {
            ui.label(format!("Hub with {} colleagues", node.hub_score));
        }

        ui.separator();
        ui.label(RichText::new("Introduction path").strong());
        let path = self.scene.path_from_ego(index);
        if path.is_empty() {
            ui.label("No chain of contacts reaches this person.");
        } else {
            ui.horizontal_wrapped(|ui| {
                for (position, &step) in path.iter().enumerate() {
                    if position > 0 {
                        ui.label("→");
                    }
                    let Some(person) = self.scene.graph().node(step) else {
                        continue;
                    };
                    if step == index {
                        ui.label(person.name.as_str());
                    } else if ui.link(person.name.as_str()).clicked() {
                        clicked = Some(step);
                    }
                }
            });
        }

        let colleagues = self.scene.colleagues(index);
        if !colleagues.is_empty() {
            ui.separator();
            ui.label(RichText::new("Same affiliation").strong());
            for colleague in colleagues {
                let Some(person) = self.scene.graph().node(colleague) else {
                    continue;
                };
                if ui
                    .link(person.name.as_str())
                    .on_hover_text(person.role.as_str())
                    .clicked()
                {
                    clicked = Some(colleague);
                }
            }
        }

        clicked
    }

    fn draw_recommendations(&self, ui: &mut Ui) -> Option<NodeIndex> {
        let recommendations = self.scene.recommendations();
        if recommendations.is_empty() {
            ui.label("No second-degree contacts to suggest.");
            return None;
        }

        let mut clicked = None;
        for recommendation in &recommendations {
            let Some(person) = self.scene.graph().node(recommendation.index) else {
                continue;
            };
            let label = format!("{}  ({:.0}%)", person.name, recommendation.score * 100.0);
            if ui.link(label).on_hover_text(person.company.as_str()).clicked() {
                clicked = Some(recommendation.index);
            }

            let mut detail = format!("{} mutual", recommendation.mutual);
            if let Some(via) = self.via_text(&recommendation.path) {
                detail.push_str(" · ");
                detail.push_str(&via);
            }
            ui.small(detail);
        }
        clicked
    }
}
