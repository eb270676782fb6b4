//! Topmost-item hit testing, the selection gesture that feeds
//! [`OverlayItem::place_on`](crate::overlay::OverlayItem::place_on).

use sinopia_core::{ItemId, Point, Rect, RectExt, SceneTree, WindowId};

/// The topmost visible, non-decoration item under `point` (window
/// coordinates), or the window's root when nothing else is hit. `None` when
/// the point is outside the window.
pub fn pick_item_at(tree: &SceneTree, window: WindowId, point: Point) -> Option<ItemId> {
    let root = tree.window_root(window)?;
    let size = tree.window_size(window)?;

    if let Some(hit) = pick_in(tree, root, point) {
        return Some(hit);
    }
    Rect::new(Point::new(0.0, 0.0), size)
        .contains(point)
        .then_some(root)
}

/// Depth-first search in painter's order: highest z first, insertion order
/// breaking ties (the later sibling draws on top).
fn pick_in(tree: &SceneTree, item: ItemId, point: Point) -> Option<ItemId> {
    let mut children: Vec<ItemId> = tree.children(item).to_vec();
    children.sort_by(|a, b| {
        let za = tree.item(*a).map(|i| i.z).unwrap_or(0.0);
        let zb = tree.item(*b).map(|i| i.z).unwrap_or(0.0);
        za.total_cmp(&zb)
    });

    for child in children.iter().rev() {
        let child_item = match tree.item(*child) {
            Some(item) => item,
            None => continue,
        };
        if child_item.decoration || !child_item.visible {
            continue;
        }

        let local = Point::new(point.x - child_item.position.x, point.y - child_item.position.y);
        if let Some(hit) = pick_in(tree, *child, local) {
            return Some(hit);
        }
        let bounds = Rect::new(Point::new(0.0, 0.0), tree.geometry(*child).size);
        if bounds.contains(local) {
            return Some(*child);
        }
    }
    None
}
