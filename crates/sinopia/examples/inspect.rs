//! End-to-end walkthrough: build a small scene, pick an item, track it
//! through mutations, and capture a clean frame.
//!
//! Run with `RUST_LOG=debug` to watch the overlay's placement decisions.

use image::RgbaImage;
use sinopia::{pick_item_at, FrameSource, OverlayItem, SceneEvent, WindowGrabber};
use sinopia_core::{DisplayList, Point, Rect, SceneTree, Size, WindowId};

/// Fake surface readback: a solid dark frame at device resolution. A real
/// host would copy its swapchain here instead.
struct SolidSource;

impl FrameSource for SolidSource {
    fn grab_window(&mut self, tree: &SceneTree, window: WindowId) -> Option<RgbaImage> {
        let size = tree.window_size(window)?;
        let dpr = tree.device_pixel_ratio(window)?;
        Some(RgbaImage::from_pixel(
            (size.width * dpr) as u32,
            (size.height * dpr) as u32,
            image::Rgba([30, 30, 30, 255]),
        ))
    }
}

fn pump(
    tree: &mut SceneTree,
    overlay: &mut OverlayItem,
    grabber: &mut WindowGrabber,
    source: &mut dyn FrameSource,
) {
    loop {
        let deliveries = tree.drain_changes();
        if deliveries.is_empty() {
            return;
        }
        for delivery in &deliveries {
            overlay.handle_change(tree, delivery);
            match grabber.handle_frame(tree, overlay, source, delivery) {
                Some(SceneEvent::Changed) => println!("scene changed"),
                Some(SceneEvent::Grabbed(frame)) => println!(
                    "grabbed {}x{} frame at dpr {}",
                    frame.image.width(),
                    frame.image.height(),
                    frame.device_pixel_ratio
                ),
                None => {}
            }
        }
    }
}

fn main() {
    env_logger::init();

    let mut tree = SceneTree::new();
    let window = tree.new_window(Size::new(800.0, 600.0), 2.0);
    let root = tree.window_root(window).unwrap();
    let sidebar = tree.spawn_item(root, Rect::new(Point::new(0.0, 0.0), Size::new(200.0, 600.0)));
    let button = tree.spawn_item(
        sidebar,
        Rect::new(Point::new(20.0, 40.0), Size::new(160.0, 32.0)),
    );

    let mut overlay = OverlayItem::new();
    let mut grabber = WindowGrabber::new();
    let mut source = SolidSource;

    // Select whatever sits under the cursor.
    let hit = pick_item_at(&tree, window, Point::new(100.0, 50.0));
    assert_eq!(hit, Some(button));
    overlay.place_on(&mut tree, hit);
    grabber.set_window(&mut tree, &mut overlay, Some(window));
    pump(&mut tree, &mut overlay, &mut grabber, &mut source);
    println!("tracking {:?}", overlay.geometry().item_rect);

    // The host keeps mutating; the overlay follows.
    tree.set_position(button, Point::new(20.0, 80.0));
    pump(&mut tree, &mut overlay, &mut grabber, &mut source);
    println!("moved to {:?}", overlay.geometry().item_rect);

    let mut list = DisplayList::new();
    overlay.paint(&tree, &mut list);
    println!("decoration ops: {}", list.len());

    // Grab one undecorated frame.
    grabber.request_grab(&mut overlay);
    tree.present_frame(window);
    pump(&mut tree, &mut overlay, &mut grabber, &mut source);
}
