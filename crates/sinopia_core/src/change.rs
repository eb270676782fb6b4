//! Change bus: typed, masked notifications from the scene tree to observers.
//!
//! Observers register an [`Interest`] and get back a generational
//! [`SubscriptionId`]. Every mutation the tree performs publishes a
//! [`ChangeEvent`]; events matching an interest are queued as [`Delivery`]s
//! until the host drains them. Delivery is cooperative and single-threaded:
//! the host mutates, drains, and routes each delivery in turn.

use crate::tree::{ItemId, WindowId};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle for one registered interest. Stale handles fail to unsubscribe
    /// silently, so observers can hold them across tree rebuilds.
    pub struct SubscriptionId;
}

/// One kind of observable item mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Position,
    Size,
    Rotation,
    Scale,
    Z,
    Visibility,
    ChildrenRect,
    Parent,
    Window,
}

impl ChangeKind {
    const fn bit(self) -> u16 {
        match self {
            ChangeKind::Position => 1 << 0,
            ChangeKind::Size => 1 << 1,
            ChangeKind::Rotation => 1 << 2,
            ChangeKind::Scale => 1 << 3,
            ChangeKind::Z => 1 << 4,
            ChangeKind::Visibility => 1 << 5,
            ChangeKind::ChildrenRect => 1 << 6,
            ChangeKind::Parent => 1 << 7,
            ChangeKind::Window => 1 << 8,
        }
    }
}

/// Which [`ChangeKind`]s a subscription wants to see.
///
/// Subscribing with one mask per tracked object (rather than one connection
/// per signal) is what makes unsubscription a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeMask(u16);

impl ChangeMask {
    pub const EMPTY: Self = Self(0);
    /// Everything a geometry tracker cares about on its target.
    pub const TARGET: Self = Self(0x1FF);
    /// What a tracker watches on the top-level container: the container only
    /// establishes the coordinate frame, so position/z/visibility/parent
    /// changes on it are irrelevant.
    pub const CONTAINER: Self = Self(
        ChangeKind::Size.bit()
            | ChangeKind::Rotation.bit()
            | ChangeKind::Scale.bit()
            | ChangeKind::ChildrenRect.bit(),
    );

    pub fn contains(&self, kind: ChangeKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

/// An event published by the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Item { item: ItemId, kind: ChangeKind },
    FramePresented { window: WindowId },
}

/// What a subscription matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    Item { item: ItemId, mask: ChangeMask },
    Frames { window: WindowId },
}

impl Interest {
    fn matches(&self, event: &ChangeEvent) -> bool {
        match (self, event) {
            (Interest::Item { item, mask }, ChangeEvent::Item { item: changed, kind }) => {
                item == changed && mask.contains(*kind)
            }
            (Interest::Frames { window }, ChangeEvent::FramePresented { window: presented }) => {
                window == presented
            }
            _ => false,
        }
    }
}

/// One queued (subscription, event) pair.
#[derive(Debug, Clone, Copy)]
pub struct Delivery {
    pub subscription: SubscriptionId,
    pub event: ChangeEvent,
}

#[derive(Default)]
pub struct ChangeBus {
    subscriptions: SlotMap<SubscriptionId, Interest>,
    queue: Vec<Delivery>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, interest: Interest) -> SubscriptionId {
        self.subscriptions.insert(interest)
    }

    pub fn unsubscribe(&mut self, subscription: SubscriptionId) {
        self.subscriptions.remove(subscription);
    }

    pub fn is_subscribed(&self, subscription: SubscriptionId) -> bool {
        self.subscriptions.contains_key(subscription)
    }

    pub fn publish(&mut self, event: ChangeEvent) {
        for (subscription, interest) in &self.subscriptions {
            if interest.matches(&event) {
                self.queue.push(Delivery { subscription, event });
            }
        }
    }

    /// Take all queued deliveries, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.queue)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SceneTree;

    fn ids() -> (ItemId, WindowId) {
        // Real keys from a throwaway tree; the bus itself never inspects them.
        let mut tree = SceneTree::new();
        let window = tree.new_window(crate::Size::new(100.0, 100.0), 1.0);
        let root = tree.window_root(window).unwrap();
        (root, window)
    }

    #[test]
    fn masked_subscription_filters_kinds() {
        let (item, _) = ids();
        let mut bus = ChangeBus::new();
        bus.subscribe(Interest::Item {
            item,
            mask: ChangeMask::CONTAINER,
        });

        bus.publish(ChangeEvent::Item {
            item,
            kind: ChangeKind::Position,
        });
        assert_eq!(bus.pending(), 0);

        bus.publish(ChangeEvent::Item {
            item,
            kind: ChangeKind::Size,
        });
        assert_eq!(bus.pending(), 1);
    }

    #[test]
    fn unsubscribe_stops_deliveries() {
        let (item, _) = ids();
        let mut bus = ChangeBus::new();
        let sub = bus.subscribe(Interest::Item {
            item,
            mask: ChangeMask::TARGET,
        });
        bus.unsubscribe(sub);
        bus.publish(ChangeEvent::Item {
            item,
            kind: ChangeKind::Position,
        });
        assert_eq!(bus.pending(), 0);
        assert!(!bus.is_subscribed(sub));
    }

    #[test]
    fn frame_interest_matches_only_its_window() {
        // Both windows must come from the same tree: keys from two separate
        // slotmaps are bitwise-identical and would compare equal.
        let mut tree = SceneTree::new();
        let window = tree.new_window(crate::Size::new(100.0, 100.0), 1.0);
        let other = tree.new_window(crate::Size::new(100.0, 100.0), 1.0);
        let mut bus = ChangeBus::new();
        bus.subscribe(Interest::Frames { window });

        bus.publish(ChangeEvent::FramePresented { window: other });
        assert_eq!(bus.pending(), 0);

        bus.publish(ChangeEvent::FramePresented { window });
        assert_eq!(bus.pending(), 1);
    }

    #[test]
    fn drain_empties_the_queue() {
        let (item, _) = ids();
        let mut bus = ChangeBus::new();
        let sub = bus.subscribe(Interest::Item {
            item,
            mask: ChangeMask::TARGET,
        });
        bus.publish(ChangeEvent::Item {
            item,
            kind: ChangeKind::Z,
        });

        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].subscription, sub);
        assert_eq!(bus.pending(), 0);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn target_mask_contains_every_kind() {
        for kind in [
            ChangeKind::Position,
            ChangeKind::Size,
            ChangeKind::Rotation,
            ChangeKind::Scale,
            ChangeKind::Z,
            ChangeKind::Visibility,
            ChangeKind::ChildrenRect,
            ChangeKind::Parent,
            ChangeKind::Window,
        ] {
            assert!(ChangeMask::TARGET.contains(kind));
        }
        assert!(!ChangeMask::CONTAINER.contains(ChangeKind::Position));
        assert!(!ChangeMask::EMPTY.contains(ChangeKind::Position));
    }
}
