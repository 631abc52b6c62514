use eframe::egui::{Pos2, Vec2};
use tracing::{info, warn};

use crate::error::DataError;
use crate::graph::{Graph, NodeIndex, shortest_path};
use crate::layout::{self, Layout, LayoutConfig, LayoutMode};
use crate::people::{Dataset, RelationKind, with_derived_relations};
use crate::render::{Frame, FrameClock, RenderConfig, RenderEngine, Surface};
use crate::search::{Recommendation, SearchConfig, SearchHit, SearchIndex};
use crate::view::{GraphObserver, ViewportConfig, ViewportController};

const FIT_MARGIN: f32 = 40.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneConfig {
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub search: SearchConfig,
    pub render: RenderConfig,
    /// Add shared-affiliation and shared-keyword relations before building.
    pub derive_relations: bool,
}

/// Graph, layout, search and viewport for one network, kept in step.
pub struct NetworkScene {
    config: SceneConfig,
    full: Graph,
    graph: Graph,
    ego_id: Option<String>,
    mode: LayoutMode,
    layout: Layout,
    search: SearchIndex,
    viewport: ViewportController,
    renderer: RenderEngine,
}

impl NetworkScene {
    pub fn new(config: SceneConfig) -> Self {
        let graph = Graph::default();
        Self {
            search: SearchIndex::with_config(&graph, config.search.clone()),
            viewport: ViewportController::new(config.viewport.clone()),
            renderer: RenderEngine::new(config.render.clone()),
            full: graph.clone(),
            graph,
            ego_id: None,
            mode: LayoutMode::default(),
            layout: Layout::default(),
            config,
        }
    }

    pub fn from_dataset(dataset: &Dataset, config: SceneConfig) -> Result<Self, DataError> {
        let mut scene = Self::new(config);
        scene.load(dataset)?;
        Ok(scene)
    }

    /// Rebuilds everything from `dataset`; the pan/zoom transform is kept.
    pub fn load(&mut self, dataset: &Dataset) -> Result<(), DataError> {
        let derived;
        let dataset = if self.config.derive_relations {
            derived = with_derived_relations(dataset.clone());
            &derived
        } else {
            dataset
        };

        let full = Graph::build(&dataset.people, &dataset.relations)?;
        let ego_id = match dataset.ego.as_deref() {
            Some(id) if full.index_of(id).is_some() => Some(id.to_owned()),
            requested => {
                let fallback = full.nodes().first().map(|node| node.id.clone());
                if let Some(id) = requested {
                    warn!(requested = id, fallback = ?fallback, "unknown ego, using first person");
                }
                fallback
            }
        };

        self.full = full;
        self.ego_id = ego_id;
        self.rebuild_view()?;
        info!(
            people = self.full.len(),
            relations = self.full.edges().len(),
            visible = self.graph.len(),
            ego = ?self.ego_id,
            "network scene loaded"
        );
        Ok(())
    }

    pub fn set_ego(&mut self, ego_id: &str) -> Result<(), DataError> {
        if self.full.index_of(ego_id).is_none() {
            return Err(DataError::UnknownPerson {
                id: ego_id.to_owned(),
            });
        }
        self.ego_id = Some(ego_id.to_owned());
        self.rebuild_view()
    }

    pub fn set_mode(&mut self, mode: LayoutMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        if let Err(error) = self.rebuild_view() {
            warn!(%error, "view rebuild failed after mode change");
        }
    }

    fn rebuild_view(&mut self) -> Result<(), DataError> {
        self.graph = match (&self.ego_id, self.mode) {
            (Some(ego), LayoutMode::Radial) => self.full.ego_view(ego)?,
            (Some(ego), LayoutMode::Clusters) => self.full.with_degrees(ego)?,
            (None, _) => self.full.clone(),
        };
        self.layout = layout::compute(&self.graph, self.mode, &self.config.layout);
        self.search = SearchIndex::with_config(&self.graph, self.config.search.clone());

        self.viewport.cancel_animation();
        let interaction = self.viewport.interaction_mut();
        let keyword = interaction.highlighted_keyword.take();
        *interaction = Default::default();
        interaction.highlighted_keyword = keyword;
        Ok(())
    }

    /// Recomputes positions, discarding dragged placements.
    pub fn relayout(&mut self) {
        self.layout = layout::compute(&self.graph, self.mode, &self.config.layout);
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.config.render.show_grid = show;
        self.renderer = RenderEngine::new(self.config.render.clone());
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn full_graph(&self) -> &Graph {
        &self.full
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn search_index(&self) -> &SearchIndex {
        &self.search
    }

    pub fn ego_id(&self) -> Option<&str> {
        self.ego_id.as_deref()
    }

    pub fn ego_index(&self) -> Option<NodeIndex> {
        self.graph.ego()
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        match self.ego_index() {
            Some(ego) => self.search.search(&self.graph, ego, query),
            None => Vec::new(),
        }
    }

    pub fn keyword_suggestions(&self, query: &str) -> Vec<String> {
        self.search.keyword_suggestions(query)
    }

    pub fn recommendations(&self) -> Vec<Recommendation> {
        match self.ego_index() {
            Some(ego) => self.search.recommend(
                &self.graph,
                ego,
                self.config.search.recommendation_count,
            ),
            None => Vec::new(),
        }
    }

    /// Introduction chain from the ego to `index`.
    pub fn path_from_ego(&self, index: NodeIndex) -> Vec<NodeIndex> {
        match self.ego_index() {
            Some(ego) => shortest_path(&self.graph, ego, index),
            None => Vec::new(),
        }
    }

    /// People linked to `index` through a shared affiliation.
    pub fn colleagues(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .edges_of(index)
            .filter(|edge| edge.kind == RelationKind::SharedAffiliation)
            .filter_map(|edge| edge.other(index))
            .collect()
    }

    pub fn highlight_keyword(&mut self, keyword: Option<&str>) {
        self.viewport
            .interaction_mut()
            .set_highlighted_keyword(keyword);
    }

    pub fn focus(&mut self, index: NodeIndex) {
        self.viewport.focus_on(index, &self.layout);
    }

    pub fn clear_focus(&mut self) {
        self.viewport.interaction_mut().clear_focus();
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.viewport.set_size(size);
    }

    pub fn advance(&mut self, dt: f32, observer: &mut dyn GraphObserver) -> bool {
        self.viewport.advance(dt, observer)
    }

    pub fn fit(&mut self, observer: &mut dyn GraphObserver) {
        if let Some(bounds) = self.layout.bounds() {
            self.viewport.fit(bounds, FIT_MARGIN, observer);
        }
    }

    pub fn pointer_moved(&mut self, screen: Pos2, observer: &mut dyn GraphObserver) {
        self.viewport
            .pointer_moved(screen, &self.graph, &self.layout, observer);
    }

    pub fn pointer_left(&mut self, observer: &mut dyn GraphObserver) {
        self.viewport.pointer_left(observer);
    }

    pub fn pointer_pressed(&mut self, screen: Pos2) {
        self.viewport
            .pointer_pressed(screen, &self.graph, &self.layout);
    }

    pub fn pointer_dragged(&mut self, screen: Pos2, observer: &mut dyn GraphObserver) {
        self.viewport
            .pointer_dragged(screen, &mut self.layout, observer);
    }

    pub fn pointer_released(&mut self, screen: Pos2, observer: &mut dyn GraphObserver) {
        self.viewport
            .pointer_released(screen, &self.graph, &mut self.layout, observer);
    }

    pub fn scrolled(&mut self, delta: f32, anchor: Pos2, observer: &mut dyn GraphObserver) {
        self.viewport.scrolled(delta, anchor, observer);
    }

    pub fn draw(&self, surface: &mut dyn Surface, elapsed: f32) {
        self.renderer.draw(
            surface,
            &Frame {
                graph: &self.graph,
                layout: &self.layout,
                viewport: &self.viewport,
                clock: FrameClock::at(elapsed),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::people::{PersonRecord, RelationRecord};
    use crate::view::GraphEvent;

    fn dataset() -> Dataset {
        Dataset {
            ego: Some("ego".to_owned()),
            people: vec![
                PersonRecord::new("ego", "Evelyn").with_company("Acme Labs"),
                PersonRecord::new("b", "Bora").with_company("Acme Labs"),
                PersonRecord::new("c", "Chris").with_keywords(["climate"]),
                PersonRecord::new("island", "Ines"),
            ],
            relations: vec![
                RelationRecord::direct("ego", "b"),
                RelationRecord::direct("b", "c"),
            ],
        }
    }

    #[test]
    fn radial_mode_shows_only_the_reachable_network() {
        let scene = NetworkScene::from_dataset(&dataset(), SceneConfig::default())
            .expect("scene loads");
        assert_eq!(scene.graph().len(), 3);
        assert_eq!(scene.full_graph().len(), 4);
        assert_eq!(scene.ego_index(), Some(0));
        assert_eq!(scene.path_from_ego(2), vec![0, 1, 2]);
        assert_eq!(scene.search("climate")[0].degree, 2);
    }

    #[test]
    fn contacts_mode_keeps_everyone() {
        let mut scene = NetworkScene::from_dataset(&dataset(), SceneConfig::default())
            .expect("scene loads");
        scene.set_mode(LayoutMode::Clusters);

        assert_eq!(scene.graph().len(), 4);
        assert!(!scene.layout().clusters.is_empty());
        let island = scene.graph().index_of("island").expect("island exists");
        assert_eq!(scene.graph().nodes()[island].degree, None);
    }

    #[test]
    fn derived_relations_link_colleagues() {
        let config = SceneConfig {
            derive_relations: true,
            ..SceneConfig::default()
        };
        let scene = NetworkScene::from_dataset(&dataset(), config).expect("scene loads");
        assert_eq!(scene.colleagues(0), vec![1]);
    }

    #[test]
    fn unknown_ego_falls_back_to_first_person() {
        let mut data = dataset();
        data.ego = Some("nobody".to_owned());
        let mut scene = NetworkScene::from_dataset(&data, SceneConfig::default())
            .expect("scene loads");
        assert_eq!(scene.ego_id(), Some("ego"));
        assert!(scene.set_ego("ghost").is_err());
        scene.set_ego("c").expect("c exists");
        assert_eq!(scene.graph().nodes()[0].id, "ego");
        assert_eq!(scene.graph().ego().map(|index| scene.graph().nodes()[index].id.as_str()), Some("c"));
    }

    #[test]
    fn bad_relations_surface_as_errors() {
        let mut data = dataset();
        data.relations.push(RelationRecord::direct("ego", "ghost"));
        assert!(NetworkScene::from_dataset(&data, SceneConfig::default()).is_err());
    }

    #[test]
    fn clicking_a_node_through_the_scene_selects_it() {
        let mut scene = NetworkScene::from_dataset(&dataset(), SceneConfig::default())
            .expect("scene loads");
        scene.set_size(vec2(800.0, 600.0));
        let target = scene.viewport().world_to_screen(scene.layout().positions[1]);
        let mut events = Vec::new();

        scene.pointer_pressed(target);
        scene.pointer_released(target, &mut events);

        assert!(matches!(
            events.first(),
            Some(GraphEvent::NodeSelected { index: 1, .. })
        ));
        assert!(scene.viewport().is_animating());
    }

    #[test]
    fn switching_views_stops_the_focus_animation() {
        let mut scene = NetworkScene::from_dataset(&dataset(), SceneConfig::default())
            .expect("scene loads");
        scene.set_size(vec2(800.0, 600.0));
        scene.focus(1);
        assert!(scene.viewport().is_animating());

        let before = scene.viewport().transform();
        scene.set_mode(LayoutMode::Clusters);
        assert!(!scene.viewport().is_animating());
        assert!(!scene.advance(0.1, &mut ()));
        assert_eq!(scene.viewport().transform(), before);
    }
}
