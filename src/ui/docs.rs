//! API documentation page

use eframe::egui::{self, RichText, Ui};

const USAGE_EXAMPLE: &str = r#"use lockstep::{attach, ElementRef, Extent, SyncOptions, Viewport};
use std::rc::Rc;

let left = Rc::new(Viewport::new(Extent::new(400.0, 2000.0), Extent::new(400.0, 400.0)));
let right = Rc::new(Viewport::new(Extent::new(400.0, 1200.0), Extent::new(400.0, 400.0)));
let elements: Vec<Option<ElementRef>> = vec![Some(left.clone()), Some(right.clone())];

let mut handle = attach(&elements, SyncOptions::default());
left.scroll_axis(lockstep::Axis::Y, 800.0);
assert_eq!(right.offset().y, 400.0);

handle.detach();"#;

struct Entry {
    signature: &'static str,
    summary: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        signature: "attach(elements: &[Option<ElementRef>], options: SyncOptions) -> SyncHandle",
        summary: "Start synchronizing the given scroll containers. Absent, duplicate and \
                  disposed entries are skipped. With fewer than two usable containers the \
                  returned handle is inert.",
    },
    Entry {
        signature: "SyncHandle::detach(&mut self)",
        summary: "Remove every listener the synchronizer installed and cancel a pending \
                  throttled pass. Calling it again does nothing. Dropping the handle detaches.",
    },
    Entry {
        signature: "SyncHandle::stats(&self) -> SyncStats",
        summary: "Counters for passes, writes, suppressed writes and dropped echo events.",
    },
    Entry {
        signature: "SyncOptions { min_delta, dispatch }",
        summary: "min_delta is the smallest offset change (at least 1 px) treated as motion. \
                  dispatch is Immediate, or Throttled with a delay and a Scheduler.",
    },
    Entry {
        signature: "trait ScrollElement",
        summary: "What a host container provides: metrics() for offset, content and viewport \
                  size, set_offset(axis, value), and scroll listener registration.",
    },
    Entry {
        signature: "SyncBinding::bind(&mut self, elements, options) -> bool",
        summary: "Re-attach only when the element set or the options changed. Stale \
                  listeners are removed before new ones are installed.",
    },
];

/// Static reference for the public API.
pub fn show(ui: &mut Ui) {
    egui::ScrollArea::vertical()
        .id_source("api_docs")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.heading("API Documentation");
            ui.add_space(4.0);
            ui.label(
                "Scrolling any synchronized container moves the others to the same \
                 relative position on both axes. Containers whose content fits on an \
                 axis are left alone on that axis.",
            );
            ui.add_space(12.0);

            for entry in ENTRIES {
                ui.label(RichText::new(entry.signature).monospace().strong());
                ui.label(entry.summary);
                ui.add_space(10.0);
            }

            ui.separator();
            ui.label(RichText::new("Example").strong());
            ui.add_space(4.0);
            let mut code = USAGE_EXAMPLE;
            ui.add(
                egui::TextEdit::multiline(&mut code)
                    .code_editor()
                    .desired_width(f32::INFINITY),
            );
        });
}
