//! The host-facing scene tree.
//!
//! Items and windows live in generational arenas, so an [`ItemId`] held by an
//! observer is a weak handle: once the host removes the item, the id fails
//! `contains` and every query returns the empty answer. The inspected
//! application owns and mutates the tree; inspector code only ever holds ids
//! and reads through them.
//!
//! Every mutator compares against the current value and publishes nothing for
//! no-op writes. This is load-bearing: the overlay syncs its own decoration
//! node from inside change handling, and the compare-and-skip is what makes
//! that feedback settle.

use crate::change::{ChangeBus, ChangeEvent, ChangeKind, Delivery};
use crate::{Point, Rect, RectExt, Size, Vector};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use smallvec::SmallVec;

slotmap::new_key_type! {
    /// Weak, generational handle to an item. Never extends the item's life.
    pub struct ItemId;
    /// Weak, generational handle to a window.
    pub struct WindowId;
}

/// What kind of node an item is. Layouts are items too; they just manage
/// their children's placement and are recognized by capability queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Plain,
    Layout,
}

/// Active anchor constraints on an item, one optional margin/offset per line.
///
/// `Some(margin)` means the anchor is bound; the value is the margin (edges),
/// center offset (centers), or baseline offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchors {
    pub left: Option<f32>,
    pub h_center: Option<f32>,
    pub right: Option<f32>,
    pub top: Option<f32>,
    pub v_center: Option<f32>,
    pub bottom: Option<f32>,
    pub baseline: Option<f32>,
}

/// One node of the scene tree. Read through [`SceneTree::item`]; mutate
/// through the tree's setters so changes are published.
#[derive(Debug, Clone)]
pub struct Item {
    pub kind: ItemKind,
    pub position: Point,
    pub size: Size,
    pub rotation: f32,
    pub scale: f32,
    pub transform_origin: Point,
    pub z: f32,
    pub visible: bool,
    pub anchors: Anchors,
    /// Attached layout, if any. Always a child of this item with
    /// `ItemKind::Layout`.
    pub layout: Option<ItemId>,
    pub parent: Option<ItemId>,
    pub window: Option<WindowId>,
    pub children: SmallVec<[ItemId; 4]>,
    /// Inspector-owned overlay node. Skipped by children-rect, picking, and
    /// parent change fan-out so decorating a scene never perturbs it.
    pub decoration: bool,
}

impl Item {
    fn new(kind: ItemKind, position: Point, size: Size, window: Option<WindowId>) -> Self {
        Self {
            kind,
            position,
            size,
            rotation: 0.0,
            scale: 1.0,
            transform_origin: Point::new(0.0, 0.0),
            z: 0.0,
            visible: true,
            anchors: Anchors::default(),
            layout: None,
            parent: None,
            window,
            children: SmallVec::new(),
            decoration: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Window {
    pub root: ItemId,
    pub size: Size,
    pub device_pixel_ratio: f32,
}

#[derive(Default)]
pub struct SceneTree {
    items: SlotMap<ItemId, Item>,
    windows: SlotMap<WindowId, Window>,
    bus: ChangeBus,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Windows ──────────────────────────────────────────────────────────

    /// Create a window with a root content item covering its bounds.
    pub fn new_window(&mut self, size: Size, device_pixel_ratio: f32) -> WindowId {
        let window = self.windows.insert(Window {
            root: ItemId::default(),
            size,
            device_pixel_ratio,
        });
        let root = self.items.insert(Item::new(
            ItemKind::Plain,
            Point::new(0.0, 0.0),
            size,
            Some(window),
        ));
        self.windows[window].root = root;
        window
    }

    pub fn window_root(&self, window: WindowId) -> Option<ItemId> {
        self.windows.get(window).map(|w| w.root)
    }

    pub fn window_size(&self, window: WindowId) -> Option<Size> {
        self.windows.get(window).map(|w| w.size)
    }

    pub fn device_pixel_ratio(&self, window: WindowId) -> Option<f32> {
        self.windows.get(window).map(|w| w.device_pixel_ratio)
    }

    pub fn resize_window(&mut self, window: WindowId, size: Size) {
        let root = match self.windows.get_mut(window) {
            Some(w) if w.size != size => {
                w.size = size;
                w.root
            }
            _ => return,
        };
        if let Some(item) = self.items.get_mut(root) {
            item.size = size;
        }
        self.bus.publish(ChangeEvent::Item {
            item: root,
            kind: ChangeKind::Size,
        });
    }

    /// Announce that the host presented a frame for `window`.
    pub fn present_frame(&mut self, window: WindowId) {
        if self.windows.contains_key(window) {
            self.bus.publish(ChangeEvent::FramePresented { window });
        }
    }

    // ── Spawning and removal ─────────────────────────────────────────────

    pub fn spawn_item(&mut self, parent: ItemId, rect: Rect) -> ItemId {
        self.spawn(parent, ItemKind::Plain, rect, false)
    }

    pub fn spawn_layout(&mut self, parent: ItemId, rect: Rect) -> ItemId {
        self.spawn(parent, ItemKind::Layout, rect, false)
    }

    /// Spawn an inspector-owned node, excluded from inspection queries.
    pub fn spawn_decoration(&mut self, parent: ItemId) -> ItemId {
        self.spawn(
            parent,
            ItemKind::Plain,
            Rect::new(Point::new(0.0, 0.0), Size::new(0.0, 0.0)),
            true,
        )
    }

    fn spawn(&mut self, parent: ItemId, kind: ItemKind, rect: Rect, decoration: bool) -> ItemId {
        let window = match self.items.get(parent) {
            Some(item) => item.window,
            None => return ItemId::default(),
        };
        let mut item = Item::new(kind, rect.origin, rect.size, window);
        item.parent = Some(parent);
        item.decoration = decoration;
        let id = self.items.insert(item);
        self.items[parent].children.push(id);
        if !decoration {
            self.fan_out_children_rect(Some(parent));
        }
        id
    }

    /// Remove an item and its whole subtree. Ids into the subtree become
    /// stale and fail `contains` from now on.
    pub fn remove_item(&mut self, id: ItemId) {
        let (parent, decoration) = match self.items.get(id) {
            Some(item) => (item.parent, item.decoration),
            None => return,
        };

        if let Some(parent) = parent {
            if let Some(parent_item) = self.items.get_mut(parent) {
                parent_item.children.retain(|child| *child != id);
                if parent_item.layout == Some(id) {
                    parent_item.layout = None;
                }
            }
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(item) = self.items.remove(next) {
                pending.extend(item.children);
            }
        }

        if !decoration {
            self.fan_out_children_rect(parent);
        }
    }

    // ── Item mutators ────────────────────────────────────────────────────

    pub fn set_position(&mut self, id: ItemId, position: Point) {
        self.set_field(id, ChangeKind::Position, true, |item| {
            if item.position == position {
                return false;
            }
            item.position = position;
            true
        });
    }

    pub fn set_size(&mut self, id: ItemId, size: Size) {
        self.set_field(id, ChangeKind::Size, true, |item| {
            if item.size == size {
                return false;
            }
            item.size = size;
            true
        });
    }

    pub fn set_rotation(&mut self, id: ItemId, rotation: f32) {
        self.set_field(id, ChangeKind::Rotation, true, |item| {
            if item.rotation == rotation {
                return false;
            }
            item.rotation = rotation;
            true
        });
    }

    pub fn set_scale(&mut self, id: ItemId, scale: f32) {
        self.set_field(id, ChangeKind::Scale, true, |item| {
            if item.scale == scale {
                return false;
            }
            item.scale = scale;
            true
        });
    }

    pub fn set_transform_origin(&mut self, id: ItemId, origin: Point) {
        // The origin only matters under rotation/scale; publish it as one.
        self.set_field(id, ChangeKind::Rotation, true, |item| {
            if item.transform_origin == origin {
                return false;
            }
            item.transform_origin = origin;
            true
        });
    }

    pub fn set_z(&mut self, id: ItemId, z: f32) {
        self.set_field(id, ChangeKind::Z, false, |item| {
            if item.z == z {
                return false;
            }
            item.z = z;
            true
        });
    }

    pub fn set_visible(&mut self, id: ItemId, visible: bool) {
        // Visibility feeds the children-rect fan-out because hidden children
        // drop out of children-rect and layout inner-region queries.
        self.set_field(id, ChangeKind::Visibility, true, |item| {
            if item.visible == visible {
                return false;
            }
            item.visible = visible;
            true
        });
    }

    pub fn set_anchors(&mut self, id: ItemId, anchors: Anchors) {
        // Anchors reposition the item, so they surface as a position change.
        self.set_field(id, ChangeKind::Position, true, |item| {
            if item.anchors == anchors {
                return false;
            }
            item.anchors = anchors;
            true
        });
    }

    /// Attach (or detach) a layout to an item. The layout must be a child of
    /// the item with `ItemKind::Layout`; anything else is ignored.
    pub fn set_layout(&mut self, id: ItemId, layout: Option<ItemId>) {
        if let Some(layout_id) = layout {
            let valid = self
                .items
                .get(layout_id)
                .map(|l| l.kind == ItemKind::Layout && l.parent == Some(id))
                .unwrap_or(false);
            if !valid {
                return;
            }
        }
        self.set_field(id, ChangeKind::ChildrenRect, false, |item| {
            if item.layout == layout {
                return false;
            }
            item.layout = layout;
            true
        });
    }

    /// Move an item (and its subtree) under a new parent, possibly crossing
    /// windows. Publishes a parent change, and a window change when the move
    /// crosses windows.
    pub fn set_parent(&mut self, id: ItemId, new_parent: ItemId) {
        let (old_parent, old_window, decoration) = match self.items.get(id) {
            Some(item) => (item.parent, item.window, item.decoration),
            None => return,
        };
        if old_parent == Some(new_parent) {
            return;
        }
        let new_window = match self.items.get(new_parent) {
            Some(parent) => parent.window,
            None => return,
        };

        if let Some(old_parent) = old_parent {
            if let Some(parent_item) = self.items.get_mut(old_parent) {
                parent_item.children.retain(|child| *child != id);
            }
        }
        self.items[new_parent].children.push(id);
        self.items[id].parent = Some(new_parent);
        if old_window != new_window {
            self.retarget_window(id, new_window);
        }

        self.bus.publish(ChangeEvent::Item {
            item: id,
            kind: ChangeKind::Parent,
        });
        if old_window != new_window {
            self.bus.publish(ChangeEvent::Item {
                item: id,
                kind: ChangeKind::Window,
            });
        }
        if !decoration {
            self.fan_out_children_rect(old_parent);
            self.fan_out_children_rect(Some(new_parent));
        }
    }

    fn retarget_window(&mut self, id: ItemId, window: Option<WindowId>) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(item) = self.items.get_mut(next) {
                item.window = window;
                pending.extend(item.children.iter().copied());
            }
        }
    }

    /// Apply `write` to the item; when it reports a change, publish `kind`
    /// and optionally fan a children-rect change out through the ancestors.
    fn set_field(
        &mut self,
        id: ItemId,
        kind: ChangeKind,
        affects_parent: bool,
        write: impl FnOnce(&mut Item) -> bool,
    ) {
        let (changed, parent, decoration) = match self.items.get_mut(id) {
            Some(item) => (write(item), item.parent, item.decoration),
            None => return,
        };
        if !changed {
            return;
        }
        self.bus.publish(ChangeEvent::Item { item: id, kind });
        if affects_parent && !decoration {
            self.fan_out_children_rect(parent);
        }
    }

    /// Geometry changes bubble a children-rect change up the whole ancestor
    /// chain, so a container-level subscription sees deep mutations too.
    fn fan_out_children_rect(&mut self, from: Option<ItemId>) {
        let mut current = from;
        while let Some(id) = current {
            let parent = match self.items.get(id) {
                Some(item) => item.parent,
                None => return,
            };
            self.bus.publish(ChangeEvent::Item {
                item: id,
                kind: ChangeKind::ChildrenRect,
            });
            current = parent;
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn is_layout(&self, id: ItemId) -> bool {
        self.items
            .get(id)
            .map(|item| item.kind == ItemKind::Layout)
            .unwrap_or(false)
    }

    pub fn window_of(&self, id: ItemId) -> Option<WindowId> {
        self.items.get(id).and_then(|item| item.window)
    }

    /// Root content item of the window containing `id`.
    pub fn container_of(&self, id: ItemId) -> Option<ItemId> {
        self.window_of(id).and_then(|w| self.window_root(w))
    }

    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.items
            .get(id)
            .map(|item| item.children.as_slice())
            .unwrap_or(&[])
    }

    /// Item rect in parent coordinates, falling back to the children rect's
    /// size for zero-size items.
    pub fn geometry(&self, id: ItemId) -> Rect {
        let item = match self.items.get(id) {
            Some(item) => item,
            None => return Rect::new(Point::new(0.0, 0.0), Size::new(0.0, 0.0)),
        };
        let mut size = item.size;
        if size.width == 0.0 && size.height == 0.0 {
            size = self.children_rect(id).size;
        }
        Rect::new(item.position, size)
    }

    /// Union of the visible, non-decoration children's rects, in `id`'s own
    /// coordinate space.
    pub fn children_rect(&self, id: ItemId) -> Rect {
        let mut rect = Rect::new(Point::new(0.0, 0.0), Size::new(0.0, 0.0));
        for child in self.children(id) {
            let child_item = match self.items.get(*child) {
                Some(item) => item,
                None => continue,
            };
            if child_item.decoration || !child_item.visible {
                continue;
            }
            rect = rect.union(&Rect::new(child_item.position, child_item.size));
        }
        rect
    }

    /// Offset of `id`'s origin in its top-level container's coordinates:
    /// the sum of positions from `id` up to (and excluding) the window root.
    /// `None` when the item is dead or windowless.
    pub fn container_offset(&self, id: ItemId) -> Option<Vector> {
        let root = self.container_of(id)?;
        let mut offset = Vector::new(0.0, 0.0);
        let mut current = id;
        while current != root {
            let item = self.items.get(current)?;
            offset.x += item.position.x;
            offset.y += item.position.y;
            current = item.parent?;
        }
        Some(offset)
    }

    // ── Change bus ───────────────────────────────────────────────────────

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut ChangeBus {
        &mut self.bus
    }

    /// Take everything published since the last drain.
    pub fn drain_changes(&mut self) -> Vec<Delivery> {
        self.bus.drain()
    }
}
