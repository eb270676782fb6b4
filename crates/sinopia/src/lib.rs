//! In-process scene inspection overlay for sinopia scene trees.
//!
//! Attaches to a live scene tree owned by the host application, tracks one
//! item (or layout) through geometry changes, reparenting, and window moves,
//! and renders diagnostic decorations — bounding boxes, anchor lines, layout
//! dead-space shading — into a display list the host draws above its own
//! content. A companion grabber coordinates clean (undecorated) frame
//! captures.
//!
//! # Quick start
//!
//! ```no_run
//! use sinopia::{OverlayItem, pick_item_at};
//! use sinopia_core::{DisplayList, Point, SceneTree, Size};
//!
//! let mut tree = SceneTree::new();
//! let window = tree.new_window(Size::new(800.0, 600.0), 2.0);
//! let mut overlay = OverlayItem::new();
//!
//! // On a selection click:
//! let hit = pick_item_at(&tree, window, Point::new(120.0, 80.0));
//! overlay.place_on(&mut tree, hit);
//!
//! // Each host loop turn, after mutating the tree:
//! for delivery in tree.drain_changes() {
//!     overlay.handle_change(&mut tree, &delivery);
//! }
//!
//! // During the host's render pass:
//! let mut list = DisplayList::new();
//! overlay.paint(&tree, &mut list);
//! ```

pub mod decoration;
pub mod grabber;
pub mod overlay;
pub mod pick;
pub mod snapshot;
pub mod target;

pub use grabber::{write_frame_png, FrameSource, GrabbedFrame, SceneEvent, WindowGrabber};
pub use overlay::{OverlayConfig, OverlayItem};
pub use pick::pick_item_at;
pub use snapshot::{ItemGeometry, LayoutRegion};
pub use target::InspectTarget;
