//! Demo page: three containers of different sizes scrolled in lockstep

use super::pane::ScrollPane;
use eframe::egui::{self, Color32, FontId, RichText, Sense, Stroke, Ui};
use lockstep::{ElementRef, Extent, SyncStats};

/// Layout of one container's contents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSpec {
    pub title: &'static str,
    pub items: usize,
    pub item_height: f32,
    pub item_width: f32,
}

impl ContainerSpec {
    /// Total content size of the container.
    pub fn content(&self) -> Extent {
        Extent::new(self.item_width, self.items as f32 * self.item_height)
    }
}

/// The containers shown on the demo page.
pub const CONTAINERS: [ContainerSpec; 3] = [
    ContainerSpec {
        title: "Container 1",
        items: 20,
        item_height: 100.0,
        item_width: 500.0,
    },
    ContainerSpec {
        title: "Container 2",
        items: 20,
        item_height: 60.0,
        item_width: 900.0,
    },
    ContainerSpec {
        title: "Container 3",
        items: 10,
        item_height: 80.0,
        item_width: 1200.0,
    },
];

const PANE_SPACING: f32 = 12.0;
const HEADER_HEIGHT: f32 = 24.0;

/// Demo page state.
#[derive(Debug)]
pub struct DemoPage {
    panes: Vec<(ContainerSpec, ScrollPane)>,
}

impl Default for DemoPage {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoPage {
    pub fn new() -> Self {
        let panes = CONTAINERS
            .iter()
            .enumerate()
            .map(|(index, container)| {
                let pane = ScrollPane::new(("demo_pane", index), container.content());
                (*container, pane)
            })
            .collect();
        Self { panes }
    }

    /// Element handles in display order.
    pub fn elements(&self) -> Vec<Option<ElementRef>> {
        self.panes.iter().map(|(_, pane)| pane.element()).collect()
    }

    /// Whether any pane has a synchronizer write it has not shown yet.
    pub fn needs_repaint(&self) -> bool {
        self.panes.iter().any(|(_, pane)| pane.needs_repaint())
    }

    pub fn show(&self, ui: &mut Ui, synced: bool, stats: SyncStats) {
        ui.horizontal(|ui| {
            ui.heading("Synchronized containers");
            let status = if synced {
                RichText::new("● synced").color(Color32::from_rgb(60, 170, 90))
            } else {
                RichText::new("○ not synced").weak()
            };
            ui.label(status);
        });
        ui.label(
            RichText::new(format!(
                "passes {} · writes {} · suppressed {} · dropped echoes {}",
                stats.passes,
                stats.writes,
                stats.suppressed,
                stats.reentrant_dropped + stats.echoes_dropped
            ))
            .small()
            .weak(),
        );
        ui.add_space(8.0);

        let count = self.panes.len() as f32;
        let available = ui.available_size();
        let width = ((available.x - PANE_SPACING * (count - 1.0)) / count).max(80.0);
        let height = (available.y - HEADER_HEIGHT).max(80.0);

        ui.horizontal_top(|ui| {
            ui.spacing_mut().item_spacing.x = PANE_SPACING;
            for (container, pane) in &self.panes {
                ui.vertical(|ui| {
                    ui.set_width(width);
                    ui.label(RichText::new(container.title).strong());
                    pane.show(ui, egui::vec2(width, height), |ui| paint_items(ui, container));
                });
            }
        });
    }
}

fn paint_items(ui: &mut Ui, container: &ContainerSpec) {
    let content = container.content();
    let (rect, _) =
        ui.allocate_exact_size(egui::vec2(content.width, content.height), Sense::hover());
    let painter = ui.painter_at(rect);
    let visuals = ui.visuals();
    let stroke = Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color);

    for index in 0..container.items {
        let top = rect.top() + index as f32 * container.item_height;
        let item = egui::Rect::from_min_size(
            egui::pos2(rect.left(), top),
            egui::vec2(container.item_width, container.item_height),
        );
        if !ui.clip_rect().intersects(item) {
            continue;
        }
        let fill = if index % 2 == 0 {
            visuals.faint_bg_color
        } else {
            visuals.extreme_bg_color
        };
        painter.rect(item.shrink(1.0), 2.0, fill, stroke);
        painter.text(
            item.left_center() + egui::vec2(12.0, 0.0),
            egui::Align2::LEFT_CENTER,
            format!("Item {}", index + 1),
            FontId::proportional(14.0),
            visuals.text_color(),
        );
        painter.text(
            item.right_center() - egui::vec2(12.0, 0.0),
            egui::Align2::RIGHT_CENTER,
            format!("{} × {}", container.item_width, container.item_height),
            FontId::monospace(11.0),
            visuals.weak_text_color(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep::ScrollElement;

    #[test]
    fn test_container_content_sizes() {
        let sizes: Vec<Extent> = CONTAINERS.iter().map(ContainerSpec::content).collect();
        assert_eq!(sizes[0], Extent::new(500.0, 2000.0));
        assert_eq!(sizes[1], Extent::new(900.0, 1200.0));
        assert_eq!(sizes[2], Extent::new(1200.0, 800.0));
    }

    #[test]
    fn test_elements_are_stable_across_calls() {
        let page = DemoPage::new();
        let first = page.elements();
        let second = page.elements();
        assert_eq!(first.len(), 3);
        for (a, b) in first.iter().zip(&second) {
            match (a, b) {
                (Some(a), Some(b)) => assert!(lockstep::same_element(a, b)),
                _ => panic!("demo panes always provide an element"),
            }
        }
    }

    #[test]
    fn test_pane_write_requests_repaint() {
        let page = DemoPage::new();
        assert!(!page.needs_repaint());

        let pane = &page.panes[0].1;
        pane.viewport.set_viewport_size(Extent::new(300.0, 400.0));
        let element = pane.element().unwrap();
        assert!(element.set_offset(lockstep::Axis::Y, 120.0));
        assert!(page.needs_repaint());

        assert!(pane.viewport.take_programmatic_write().is_some());
        assert!(!page.needs_repaint());
    }
}
