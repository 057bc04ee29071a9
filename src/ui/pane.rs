//! egui adapter for synchronized scroll areas
//!
//! A [`ScrollPane`] pairs an egui [`ScrollArea`] with a [`Viewport`]. Every
//! frame it pushes pending synchronizer writes into the widget, then reports
//! what the widget ended up showing so the synchronizer sees user scrolling.

use egui::{ScrollArea, Ui, Vec2};
use lockstep::{ElementRef, Extent, ScrollMetrics, ScrollOffset, Viewport};
use std::rc::Rc;

/// One scroll container on screen.
#[derive(Debug)]
pub struct ScrollPane {
    id: egui::Id,
    pub(super) viewport: Rc<Viewport>,
}

impl ScrollPane {
    /// Create a pane whose widget state is keyed by `id_source`.
    pub fn new(id_source: impl std::hash::Hash, content: Extent) -> Self {
        Self {
            id: egui::Id::new(id_source),
            viewport: Rc::new(Viewport::new(content, Extent::default())),
        }
    }

    /// Handle to register with the synchronizer.
    pub fn element(&self) -> Option<ElementRef> {
        let element: ElementRef = self.viewport.clone();
        Some(element)
    }

    /// Whether a synchronizer write still has to reach the widget.
    pub fn needs_repaint(&self) -> bool {
        self.viewport.has_programmatic_write()
    }

    /// Show the pane in a region of `size`, filling it with `add_contents`.
    pub fn show(&self, ui: &mut Ui, size: Vec2, add_contents: impl FnOnce(&mut Ui)) {
        let mut area = ScrollArea::both()
            .id_source(self.id)
            .auto_shrink([false, false])
            .max_width(size.x)
            .max_height(size.y);

        if let Some(offset) = self.viewport.take_programmatic_write() {
            area = area.scroll_offset(egui::vec2(offset.x, offset.y));
        }

        let output = area.show(ui, add_contents);

        let viewport = output.inner_rect.size();
        self.viewport.report(ScrollMetrics::new(
            ScrollOffset::new(output.state.offset.x, output.state.offset.y),
            Extent::new(output.content_size.x, output.content_size.y),
            Extent::new(viewport.x, viewport.y),
        ));
    }
}
