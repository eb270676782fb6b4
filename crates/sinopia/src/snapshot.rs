//! Derived geometry snapshots.
//!
//! [`ItemGeometry`] and [`LayoutRegion`] are recomputed from the tree in one
//! shot every time a relevant change arrives; they are never patched
//! incrementally. Both serialize, so an out-of-process inspector UI can
//! consume them as-is.

use serde::{Deserialize, Serialize};
use sinopia_core::{
    transformed_bounds, Anchors, ItemTransform, Point, Rect, RectExt, Region, SceneTree, Size,
    Vector,
};

use crate::target::InspectTarget;

/// Border between a layout's outer rect and the region shading, so the
/// outline stays visible next to flush children.
const LAYOUT_INSET: f32 = 1.0;

fn empty_rect() -> Rect {
    Rect::new(Point::new(0.0, 0.0), Size::new(0.0, 0.0))
}

/// Everything the decoration renderer needs about the tracked target, in
/// top-level container coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGeometry {
    /// Pre-transform rect (after the zero-size children-rect fallback).
    pub item_rect: Rect,
    /// Axis-aligned bounds after the item's own rotation/scale.
    pub bounding_rect: Rect,
    /// Union of the children's rects.
    pub children_rect: Rect,
    pub transform: ItemTransform,
    /// Transform origin, already mapped into container coordinates.
    pub transform_origin: Point,
    pub anchors: Anchors,
    /// Raw position in parent coordinates, for the x/y axis labels.
    pub x: f32,
    pub y: f32,
}

impl Default for ItemGeometry {
    fn default() -> Self {
        Self {
            item_rect: empty_rect(),
            bounding_rect: empty_rect(),
            children_rect: empty_rect(),
            transform: ItemTransform::default(),
            transform_origin: Point::new(0.0, 0.0),
            anchors: Anchors::default(),
            x: 0.0,
            y: 0.0,
        }
    }
}

impl ItemGeometry {
    /// Fresh snapshot of `target`'s current state. Dead or windowless
    /// targets yield the default (empty) snapshot.
    pub fn capture(tree: &SceneTree, target: &InspectTarget) -> Self {
        let id = target.id();
        let (item, offset) = match (tree.item(id), tree.container_offset(id)) {
            (Some(item), Some(offset)) => (item, offset),
            _ => return Self::default(),
        };

        let item_rect = Rect::new(Point::new(offset.x, offset.y), tree.geometry(id).size);
        let transform = ItemTransform {
            rotation: item.rotation,
            scale: item.scale,
            origin: item.transform_origin,
        };
        let transform_origin = Point::new(
            item_rect.origin.x + transform.origin.x,
            item_rect.origin.y + transform.origin.y,
        );

        Self {
            item_rect,
            bounding_rect: transformed_bounds(item_rect, &transform, transform_origin),
            children_rect: tree
                .children_rect(id)
                .translated(Vector::new(offset.x, offset.y)),
            transform,
            transform_origin,
            anchors: item.anchors,
            x: item.position.x,
            y: item.position.y,
        }
    }

    /// True when a raw-x positional label applies: no competing horizontal
    /// anchor and a non-zero offset.
    pub fn shows_x_label(&self) -> bool {
        self.anchors.left.is_none()
            && self.anchors.h_center.is_none()
            && self.anchors.right.is_none()
            && self.x != 0.0
    }

    /// Vertical counterpart of [`shows_x_label`](Self::shows_x_label);
    /// baseline competes with the y label too.
    pub fn shows_y_label(&self) -> bool {
        self.anchors.top.is_none()
            && self.anchors.v_center.is_none()
            && self.anchors.bottom.is_none()
            && self.anchors.baseline.is_none()
            && self.y != 0.0
    }
}

/// Dead space inside a layout: the layout's outer rect minus its visible
/// children, shaded by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRegion {
    /// Layout rect in container coordinates, inset by the outline border.
    pub outer: Rect,
    /// Visible, non-layout children, same coordinates. Kept raw so the
    /// outline-only fallback can stroke them individually.
    pub inner: Vec<Rect>,
    pub region: Region,
    /// Set when the children fully cover the outer rect: the renderer then
    /// strokes outlines and shades nothing.
    pub outline_only: bool,
}

impl Default for LayoutRegion {
    fn default() -> Self {
        Self {
            outer: empty_rect(),
            inner: Vec::new(),
            region: Region::default(),
            outline_only: false,
        }
    }
}

impl LayoutRegion {
    /// Fresh layout-region snapshot for `target`. Targets without a layout in
    /// play yield the default (nothing to shade).
    pub fn capture(tree: &SceneTree, target: &InspectTarget) -> Self {
        let layout = match target.layout(tree) {
            Some(layout) => layout,
            None => return Self::default(),
        };
        let offset = match tree.container_offset(layout) {
            Some(offset) => offset,
            None => return Self::default(),
        };

        let outer = Rect::new(Point::new(offset.x, offset.y), tree.geometry(layout).size)
            .inset(LAYOUT_INSET);
        if outer.is_empty() {
            return Self::default();
        }

        let mut inner = Vec::new();
        for child in tree.children(layout) {
            let child_item = match tree.item(*child) {
                Some(item) => item,
                None => continue,
            };
            if child_item.decoration
                || !child_item.visible
                || tree.is_layout(*child)
            {
                continue;
            }
            inner.push(
                tree.geometry(*child)
                    .translated(Vector::new(offset.x, offset.y)),
            );
        }

        let region = Region::subtract(outer, &inner);
        Self {
            outline_only: region.is_empty(),
            outer,
            inner,
            region,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinopia_core::{ItemId, SceneTree, Size, WindowId};

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Point::new(x, y), Size::new(w, h))
    }

    fn fixture() -> (SceneTree, WindowId, ItemId) {
        let mut tree = SceneTree::new();
        let window = tree.new_window(Size::new(800.0, 600.0), 1.0);
        let root = tree.window_root(window).unwrap();
        (tree, window, root)
    }

    #[test]
    fn capture_maps_into_container_coordinates() {
        let (mut tree, _, root) = fixture();
        let panel = tree.spawn_item(root, rect(100.0, 50.0, 400.0, 300.0));
        let item = tree.spawn_item(panel, rect(20.0, 10.0, 60.0, 40.0));
        let target = InspectTarget::resolve(&tree, item).unwrap();

        let geometry = ItemGeometry::capture(&tree, &target);
        assert_eq!(geometry.item_rect, rect(120.0, 60.0, 60.0, 40.0));
        assert_eq!(geometry.bounding_rect, geometry.item_rect);
        assert_eq!(geometry.x, 20.0);
        assert_eq!(geometry.y, 10.0);
    }

    #[test]
    fn zero_size_target_falls_back_to_children_rect() {
        let (mut tree, _, root) = fixture();
        let group = tree.spawn_item(root, rect(10.0, 10.0, 0.0, 0.0));
        tree.spawn_item(group, rect(0.0, 0.0, 30.0, 20.0));
        tree.spawn_item(group, rect(30.0, 0.0, 30.0, 20.0));
        let target = InspectTarget::resolve(&tree, group).unwrap();

        let geometry = ItemGeometry::capture(&tree, &target);
        assert_eq!(geometry.item_rect.size, Size::new(60.0, 20.0));
    }

    #[test]
    fn transform_expands_bounding_rect() {
        let (mut tree, _, root) = fixture();
        let item = tree.spawn_item(root, rect(100.0, 100.0, 50.0, 50.0));
        tree.set_transform_origin(item, Point::new(25.0, 25.0));
        tree.set_scale(item, 2.0);
        let target = InspectTarget::resolve(&tree, item).unwrap();

        let geometry = ItemGeometry::capture(&tree, &target);
        assert_eq!(geometry.item_rect, rect(100.0, 100.0, 50.0, 50.0));
        assert_eq!(geometry.transform_origin, Point::new(125.0, 125.0));
        assert_eq!(geometry.bounding_rect, rect(75.0, 75.0, 100.0, 100.0));
        assert!(!geometry.transform.is_identity());
    }

    #[test]
    fn label_rules_exclude_competing_anchors() {
        let mut geometry = ItemGeometry {
            x: 15.0,
            y: 0.0,
            ..Default::default()
        };
        assert!(geometry.shows_x_label());
        assert!(!geometry.shows_y_label());

        geometry.anchors.left = Some(8.0);
        assert!(!geometry.shows_x_label());

        geometry.anchors.left = None;
        geometry.y = 4.0;
        geometry.anchors.baseline = Some(12.0);
        assert!(geometry.shows_x_label());
        assert!(!geometry.shows_y_label());
    }

    #[test]
    fn capture_is_idempotent() {
        let (mut tree, _, root) = fixture();
        let item = tree.spawn_item(root, rect(10.0, 20.0, 100.0, 50.0));
        tree.set_rotation(item, 30.0);
        let layout = tree.spawn_layout(item, rect(0.0, 0.0, 100.0, 50.0));
        tree.set_layout(item, Some(layout));
        tree.spawn_item(layout, rect(0.0, 0.0, 40.0, 50.0));
        let target = InspectTarget::resolve(&tree, item).unwrap();

        let first = ItemGeometry::capture(&tree, &target);
        let second = ItemGeometry::capture(&tree, &target);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let region_a = LayoutRegion::capture(&tree, &target);
        let region_b = LayoutRegion::capture(&tree, &target);
        assert_eq!(region_a, region_b);
        assert_eq!(
            serde_json::to_string(&region_a).unwrap(),
            serde_json::to_string(&region_b).unwrap()
        );
    }

    #[test]
    fn partial_coverage_shades_the_dead_space() {
        let (mut tree, _, root) = fixture();
        let item = tree.spawn_item(root, rect(0.0, 0.0, 100.0, 100.0));
        let layout = tree.spawn_layout(item, rect(0.0, 0.0, 100.0, 100.0));
        tree.set_layout(item, Some(layout));
        tree.spawn_item(layout, rect(0.0, 0.0, 50.0, 100.0));
        let target = InspectTarget::resolve(&tree, item).unwrap();

        let region = LayoutRegion::capture(&tree, &target);
        assert!(!region.outline_only);
        assert!(!region.region.is_empty());
        assert_eq!(region.inner.len(), 1);
    }

    #[test]
    fn full_coverage_flips_to_outline_only() {
        let (mut tree, _, root) = fixture();
        let item = tree.spawn_item(root, rect(0.0, 0.0, 100.0, 100.0));
        let layout = tree.spawn_layout(item, rect(0.0, 0.0, 100.0, 100.0));
        tree.set_layout(item, Some(layout));
        tree.spawn_item(layout, rect(0.0, 0.0, 50.0, 100.0));
        tree.spawn_item(layout, rect(50.0, 0.0, 50.0, 100.0));
        let target = InspectTarget::resolve(&tree, item).unwrap();

        let region = LayoutRegion::capture(&tree, &target);
        assert!(region.outline_only);
        assert!(region.region.is_empty());
        assert_eq!(region.inner.len(), 2);
    }

    #[test]
    fn hidden_and_nested_layout_children_are_not_holes() {
        let (mut tree, _, root) = fixture();
        let item = tree.spawn_item(root, rect(0.0, 0.0, 100.0, 100.0));
        let layout = tree.spawn_layout(item, rect(0.0, 0.0, 100.0, 100.0));
        tree.set_layout(item, Some(layout));
        let hidden = tree.spawn_item(layout, rect(0.0, 0.0, 100.0, 100.0));
        tree.set_visible(hidden, false);
        tree.spawn_layout(layout, rect(0.0, 0.0, 100.0, 100.0));
        let target = InspectTarget::resolve(&tree, item).unwrap();

        let region = LayoutRegion::capture(&tree, &target);
        assert!(region.inner.is_empty());
        assert!(!region.outline_only);
        assert_eq!(region.region.area(), 98.0 * 98.0);
    }

    #[test]
    fn target_without_layout_yields_default_region() {
        let (mut tree, _, root) = fixture();
        let item = tree.spawn_item(root, rect(0.0, 0.0, 100.0, 100.0));
        let target = InspectTarget::resolve(&tree, item).unwrap();

        assert_eq!(LayoutRegion::capture(&tree, &target), LayoutRegion::default());
    }

    #[test]
    fn dead_target_yields_default_snapshot() {
        let (mut tree, _, root) = fixture();
        let item = tree.spawn_item(root, rect(5.0, 5.0, 10.0, 10.0));
        let target = InspectTarget::resolve(&tree, item).unwrap();
        tree.remove_item(item);

        assert_eq!(ItemGeometry::capture(&tree, &target), ItemGeometry::default());
        assert_eq!(LayoutRegion::capture(&tree, &target), LayoutRegion::default());
    }
}
