//! Overlay placement and geometry tracking.
//!
//! [`OverlayItem`] follows one tracked target around the host's scene tree:
//! it owns a decoration node parented under the target's top-level container,
//! re-subscribes and re-parents when the target crosses windows, and
//! recomputes its geometry snapshots on every relevant change. It never owns
//! the target; every notification is liveness-checked before use.

use log::{debug, trace};
use sinopia_core::{
    ChangeEvent, ChangeKind, ChangeMask, Delivery, DisplayList, Interest, ItemId, Point, Rect,
    SceneTree, SubscriptionId,
};

use crate::decoration;
use crate::snapshot::{ItemGeometry, LayoutRegion};
use crate::target::InspectTarget;

/// Which decorations the overlay produces. Stands in for the host-backend
/// feature differences; everything defaults to on.
#[derive(Debug, Clone, Copy)]
pub struct OverlayConfig {
    pub draw_anchors: bool,
    pub draw_layout_region: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            draw_anchors: true,
            draw_layout_region: true,
        }
    }
}

/// Placement state. A window move is the `Tracking -> Tracking` transition
/// with a container swap, re-entered through [`OverlayItem::place_on`] rather
/// than recursive callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Idle,
    Tracking {
        target: InspectTarget,
        container: ItemId,
    },
}

pub struct OverlayItem {
    placement: Placement,
    /// The overlay's own decoration node in the host tree, created lazily on
    /// first placement and re-parented across containers afterwards.
    node: Option<ItemId>,
    target_sub: Option<SubscriptionId>,
    container_sub: Option<SubscriptionId>,
    geometry: ItemGeometry,
    layout_region: LayoutRegion,
    grabbing: bool,
    dirty: bool,
    config: OverlayConfig,
}

impl Default for OverlayItem {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayItem {
    pub fn new() -> Self {
        Self::with_config(OverlayConfig::default())
    }

    pub fn with_config(config: OverlayConfig) -> Self {
        Self {
            placement: Placement::Idle,
            node: None,
            target_sub: None,
            container_sub: None,
            geometry: ItemGeometry::default(),
            layout_region: LayoutRegion::default(),
            grabbing: false,
            dirty: false,
            config,
        }
    }

    // ── Placement ────────────────────────────────────────────────────────

    /// Place the overlay on `target`, replacing any previous placement.
    /// `None` (and dead or windowless ids) fully detaches. Idempotent in
    /// both directions.
    pub fn place_on(&mut self, tree: &mut SceneTree, target: Option<ItemId>) {
        let resolved = target
            .and_then(|id| InspectTarget::resolve(tree, id))
            .and_then(|target| {
                let anchor = target.item(tree)?;
                let container = tree.container_of(anchor)?;
                Some((target, container))
            });
        let (target, container) = match resolved {
            Some(pair) => pair,
            None => {
                self.detach(tree);
                return;
            }
        };

        if let Some(sub) = self.target_sub.take() {
            tree.bus_mut().unsubscribe(sub);
        }

        let previous = match self.placement {
            Placement::Tracking { container, .. } => Some(container),
            Placement::Idle => None,
        };
        if previous != Some(container) {
            if let Some(sub) = self.container_sub.take() {
                tree.bus_mut().unsubscribe(sub);
            }
            self.ensure_node(tree, container);
            self.sync_node(tree, container);
            self.container_sub = Some(tree.bus_mut().subscribe(Interest::Item {
                item: container,
                mask: ChangeMask::CONTAINER,
            }));
            if let Some(node) = self.node {
                tree.set_visible(node, true);
            }
            debug!("overlay adopted container {container:?}");
        }

        // Subscribe before the recompute so no change can slip between them.
        self.target_sub = Some(tree.bus_mut().subscribe(Interest::Item {
            item: target.id(),
            mask: ChangeMask::TARGET,
        }));
        self.placement = Placement::Tracking { target, container };

        self.update_positions(tree);
    }

    fn detach(&mut self, tree: &mut SceneTree) {
        for sub in [self.target_sub.take(), self.container_sub.take()]
            .into_iter()
            .flatten()
        {
            tree.bus_mut().unsubscribe(sub);
        }
        self.placement = Placement::Idle;
        self.geometry = ItemGeometry::default();
        self.layout_region = LayoutRegion::default();
        if let Some(node) = self.node {
            tree.set_visible(node, false);
        }
        self.dirty = true;
        debug!("overlay detached");
    }

    fn ensure_node(&mut self, tree: &mut SceneTree, container: ItemId) {
        match self.node {
            Some(node) if tree.contains(node) => tree.set_parent(node, container),
            _ => self.node = Some(tree.spawn_decoration(container)),
        }
    }

    /// Copy the container's bounds and transform onto the overlay node so
    /// decoration coordinates line up with the container's frame.
    fn sync_node(&mut self, tree: &mut SceneTree, container: ItemId) {
        let (rotation, scale, origin) = match tree.item(container) {
            Some(item) => (item.rotation, item.scale, item.transform_origin),
            None => return,
        };
        let size = tree.geometry(container).size;
        if let Some(node) = self.node {
            tree.set_rotation(node, rotation);
            tree.set_scale(node, scale);
            tree.set_transform_origin(node, origin);
            tree.set_position(node, Point::new(0.0, 0.0));
            tree.set_size(node, size);
        }
    }

    fn update_overlay(&mut self, tree: &mut SceneTree) {
        if let Placement::Tracking { container, .. } = self.placement {
            self.sync_node(tree, container);
        }
        self.update_positions(tree);
    }

    fn update_positions(&mut self, tree: &SceneTree) {
        let target = match self.placement {
            Placement::Tracking { target, .. } => target,
            Placement::Idle => return,
        };
        if !target.is_alive(tree) {
            return;
        }
        self.geometry = ItemGeometry::capture(tree, &target);
        self.layout_region = if self.config.draw_layout_region {
            LayoutRegion::capture(tree, &target)
        } else {
            LayoutRegion::default()
        };
        self.dirty = true;
    }

    // ── Change handling ──────────────────────────────────────────────────

    /// Route one drained delivery. Deliveries for subscriptions this overlay
    /// does not hold are dropped; so is anything arriving after the target
    /// died (the placement resets instead).
    pub fn handle_change(&mut self, tree: &mut SceneTree, delivery: &Delivery) {
        let is_target = self.target_sub == Some(delivery.subscription);
        let is_container = self.container_sub == Some(delivery.subscription);
        if !is_target && !is_container {
            trace!("dropping delivery for unknown subscription {:?}", delivery.subscription);
            return;
        }

        let target = match self.placement {
            Placement::Tracking { target, .. } => target,
            Placement::Idle => return,
        };
        if !target.is_alive(tree) {
            debug!("tracked item destroyed, clearing overlay");
            self.place_on(tree, None);
            return;
        }

        match delivery.event {
            ChangeEvent::Item {
                kind: ChangeKind::Parent | ChangeKind::Window,
                ..
            } if is_target => {
                // Crossing windows invalidates the container relationship;
                // re-place on the same target to swap and re-subscribe.
                self.place_on(tree, Some(target.id()));
            }
            ChangeEvent::Item { .. } => self.update_overlay(tree),
            ChangeEvent::FramePresented { .. } => {}
        }
    }

    // ── Painting ─────────────────────────────────────────────────────────

    /// Lower the current snapshots into `list`. Suppressed entirely while in
    /// grabbing mode so captured frames are clean.
    pub fn paint(&self, tree: &SceneTree, list: &mut DisplayList) {
        if self.grabbing {
            return;
        }
        let target = match self.placement {
            Placement::Tracking { target, .. } => target,
            Placement::Idle => return,
        };
        let size = match target
            .item(tree)
            .and_then(|item| tree.window_of(item))
            .and_then(|window| tree.window_size(window))
        {
            Some(size) => size,
            None => return,
        };
        let viewport = Rect::new(Point::new(0.0, 0.0), size);

        if self.config.draw_layout_region {
            decoration::draw_layout_region(list, &self.layout_region);
        }
        decoration::draw_decoration(list, &self.geometry, viewport, 1.0, &self.config);
    }

    // ── Grabbing mode ────────────────────────────────────────────────────

    pub fn is_grabbing(&self) -> bool {
        self.grabbing
    }

    /// While grabbing, [`paint`](Self::paint) emits nothing for one capture
    /// cycle.
    pub fn set_grabbing(&mut self, grabbing: bool) {
        if self.grabbing == grabbing {
            return;
        }
        self.grabbing = grabbing;
        self.dirty = true;
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn is_tracking(&self) -> bool {
        matches!(self.placement, Placement::Tracking { .. })
    }

    pub fn target(&self) -> Option<InspectTarget> {
        match self.placement {
            Placement::Tracking { target, .. } => Some(target),
            Placement::Idle => None,
        }
    }

    pub fn container(&self) -> Option<ItemId> {
        match self.placement {
            Placement::Tracking { container, .. } => Some(container),
            Placement::Idle => None,
        }
    }

    /// The overlay's decoration node, once created. Stays alive across
    /// placements; detaching only hides it.
    pub fn node(&self) -> Option<ItemId> {
        self.node
    }

    pub fn geometry(&self) -> &ItemGeometry {
        &self.geometry
    }

    pub fn layout_region(&self) -> &LayoutRegion {
        &self.layout_region
    }

    /// True when anything changed since the last take; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
