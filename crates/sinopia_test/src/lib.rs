//! Shared fixtures and pump helpers for cross-crate inspector scenarios.
//!
//! The tests here play the host application's role: build a tree, mutate it,
//! drain the change bus, and route every delivery to the overlay and the
//! grabber the way an embedding host loop would.

use image::RgbaImage;
use sinopia::{FrameSource, OverlayItem, SceneEvent, WindowGrabber};
use sinopia_core::{ItemId, Point, Rect, SceneTree, Size, WindowId};

pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::new(Point::new(x, y), Size::new(w, h))
}

/// A window with one plain item under its root, the most common scenario
/// starting point.
pub fn window_with_item(tree: &mut SceneTree) -> (WindowId, ItemId, ItemId) {
    let window = tree.new_window(Size::new(800.0, 600.0), 1.0);
    let root = tree.window_root(window).unwrap();
    let item = tree.spawn_item(root, rect(10.0, 10.0, 100.0, 80.0));
    (window, root, item)
}

/// An item with an attached layout holding `columns` equal-width children
/// that span the layout's height. With `columns` covering the full width the
/// layout has no dead space.
pub fn item_with_layout(
    tree: &mut SceneTree,
    parent: ItemId,
    columns: usize,
    covered: usize,
) -> (ItemId, ItemId, Vec<ItemId>) {
    let item = tree.spawn_item(parent, rect(0.0, 0.0, 100.0, 100.0));
    let layout = tree.spawn_layout(item, rect(0.0, 0.0, 100.0, 100.0));
    tree.set_layout(item, Some(layout));

    let width = 100.0 / columns as f32;
    let children = (0..covered)
        .map(|i| tree.spawn_item(layout, rect(i as f32 * width, 0.0, width, 100.0)))
        .collect();
    (item, layout, children)
}

/// Frame source that rasterizes the window as a solid color at its device
/// resolution. Stands in for the host's real surface readback.
pub struct SolidFrameSource {
    pub color: [u8; 4],
}

impl Default for SolidFrameSource {
    fn default() -> Self {
        Self {
            color: [24, 24, 24, 255],
        }
    }
}

impl FrameSource for SolidFrameSource {
    fn grab_window(&mut self, tree: &SceneTree, window: WindowId) -> Option<RgbaImage> {
        let size = tree.window_size(window)?;
        let dpr = tree.device_pixel_ratio(window)?;
        Some(RgbaImage::from_pixel(
            (size.width * dpr) as u32,
            (size.height * dpr) as u32,
            image::Rgba(self.color),
        ))
    }
}

/// Drain the bus and route every delivery to the overlay, repeating until
/// the tree settles (overlay handling can publish follow-up changes).
pub fn pump(tree: &mut SceneTree, overlay: &mut OverlayItem) {
    loop {
        let deliveries = tree.drain_changes();
        if deliveries.is_empty() {
            return;
        }
        for delivery in &deliveries {
            overlay.handle_change(tree, delivery);
        }
    }
}

/// Full host loop turn: route deliveries to both the overlay and the
/// grabber, collecting the grabber's outbound events.
pub fn pump_all(
    tree: &mut SceneTree,
    overlay: &mut OverlayItem,
    grabber: &mut WindowGrabber,
    source: &mut dyn FrameSource,
) -> Vec<SceneEvent> {
    let mut events = Vec::new();
    loop {
        let deliveries = tree.drain_changes();
        if deliveries.is_empty() {
            return events;
        }
        for delivery in &deliveries {
            overlay.handle_change(tree, delivery);
            if let Some(event) = grabber.handle_frame(tree, overlay, source, delivery) {
                events.push(event);
            }
        }
    }
}
