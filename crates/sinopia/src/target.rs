//! Uniform accessor over "a visual item" and "a layout attached to an item".
//!
//! Whether an id names a layout can only be learned from the tree, so the
//! kind is queried once at resolution time and stored as the variant tag;
//! after that, callers never repeat the capability check.

use sinopia_core::{ItemId, Point, Rect, SceneTree};

/// The currently inspected thing: either a plain item or a layout.
///
/// Holds only a weak id. Every accessor re-checks liveness against the tree
/// and yields the empty answer for a dead target, never a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectTarget {
    Item(ItemId),
    Layout(ItemId),
}

impl InspectTarget {
    /// Decide the variant for `id` from the tree's capability query. `None`
    /// for dead ids.
    pub fn resolve(tree: &SceneTree, id: ItemId) -> Option<Self> {
        if !tree.contains(id) {
            return None;
        }
        if tree.is_layout(id) {
            Some(Self::Layout(id))
        } else {
            Some(Self::Item(id))
        }
    }

    /// The underlying id, regardless of kind.
    pub fn id(&self) -> ItemId {
        match self {
            Self::Item(id) | Self::Layout(id) => *id,
        }
    }

    pub fn is_alive(&self, tree: &SceneTree) -> bool {
        tree.contains(self.id())
    }

    /// The anchoring item: the item itself, or the layout's parent item.
    pub fn item(&self, tree: &SceneTree) -> Option<ItemId> {
        match self {
            Self::Item(id) => tree.contains(*id).then_some(*id),
            Self::Layout(id) => tree.item(*id).and_then(|layout| layout.parent),
        }
    }

    /// The layout in play: the layout itself, or the item's attached layout.
    pub fn layout(&self, tree: &SceneTree) -> Option<ItemId> {
        match self {
            Self::Layout(id) => tree.contains(*id).then_some(*id),
            Self::Item(id) => tree.item(*id).and_then(|item| item.layout),
        }
    }

    /// Geometry of whichever kind is held, in parent coordinates.
    pub fn geometry(&self, tree: &SceneTree) -> Rect {
        tree.geometry(self.id())
    }

    /// Offset of the tracked geometry inside the anchoring item: a layout
    /// sits at its own position, a plain item at its origin.
    pub fn pos(&self, tree: &SceneTree) -> Point {
        match self {
            Self::Layout(id) => tree.geometry(*id).origin,
            Self::Item(_) => Point::new(0.0, 0.0),
        }
    }

    pub fn is_visible(&self, tree: &SceneTree) -> bool {
        self.item(tree)
            .and_then(|id| tree.item(id))
            .map(|item| item.visible)
            .unwrap_or(false)
    }
}
