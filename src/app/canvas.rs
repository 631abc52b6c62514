use eframe::egui::{PointerButton, Pos2, Rect, Response, Sense, Ui};
use linkmap::render::PainterSurface;

use super::ViewModel;

impl ViewModel {
    pub(super) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.scene.set_size(rect.size());

        self.handle_pointer(ui, rect, &response);
        self.handle_scroll(ui, rect, &response);

        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        self.scene.advance(frame_delta_seconds, &mut self.events);

        let painter = ui.painter_at(rect);
        let mut surface = PainterSurface::new(&painter, rect);
        let elapsed = ui.ctx().input(|input| input.time) as f32;
        self.scene.draw(&mut surface, elapsed);

        // Ego pulse and edge flow never settle.
        ui.ctx().request_repaint();
    }

    fn handle_pointer(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        let local = |pos: Pos2| Pos2::ZERO + (pos - rect.min);

        match response.hover_pos() {
            Some(pos) => {
                self.pointer_inside = true;
                self.scene.pointer_moved(local(pos), &mut self.events);
            }
            None if self.pointer_inside => {
                self.pointer_inside = false;
                self.scene.pointer_left(&mut self.events);
            }
            None => {}
        }

        let pointer = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|input| input.pointer.latest_pos()));

        if response.clicked_by(PointerButton::Primary)
            && let Some(pos) = pointer
        {
            self.scene.pointer_pressed(local(pos));
            self.scene.pointer_released(local(pos), &mut self.events);
        }

        if response.drag_started_by(PointerButton::Primary)
            && let Some(origin) = ui.input(|input| input.pointer.press_origin()).or(pointer)
        {
            self.scene.pointer_pressed(local(origin));
        }
        if response.dragged_by(PointerButton::Primary)
            && let Some(pos) = pointer
        {
            self.scene.pointer_dragged(local(pos), &mut self.events);
        }
        if response.drag_stopped_by(PointerButton::Primary)
            && let Some(pos) = pointer
        {
            self.scene.pointer_released(local(pos), &mut self.events);
        }

        if response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            self.scene
                .viewport_mut()
                .pan(response.drag_delta(), &mut self.events);
        }
    }

    fn handle_scroll(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let anchor = response.hover_pos().unwrap_or_else(|| rect.center());
        self.scene
            .scrolled(scroll, Pos2::ZERO + (anchor - rect.min), &mut self.events);
    }
}
