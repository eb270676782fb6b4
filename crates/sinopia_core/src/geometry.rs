//! Core geometry primitives for sinopia.

use serde::{Deserialize, Serialize};

/// Logical pixels - DPI-independent coordinate space.
pub struct LogicalPixels;

impl glamour::Unit for LogicalPixels {
    type Scalar = f32;
}

/// Device pixels - physical pixel coordinate space.
pub struct DevicePixels;

impl glamour::Unit for DevicePixels {
    type Scalar = f32;
}

pub type Point = glamour::Point2<LogicalPixels>;
pub type Size = glamour::Size2<LogicalPixels>;
pub type Rect = glamour::Rect<LogicalPixels>;
pub type Vector = glamour::Vector2<LogicalPixels>;

pub type DevicePoint = glamour::Point2<DevicePixels>;
pub type DeviceSize = glamour::Size2<DevicePixels>;
pub type DeviceRect = glamour::Rect<DevicePixels>;

/// Ratio of device pixels to logical pixels for a window's backing store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactor(pub f32);

impl ScaleFactor {
    pub fn scale_point(&self, point: Point) -> DevicePoint {
        DevicePoint::new(point.x * self.0, point.y * self.0)
    }

    pub fn scale_size(&self, size: Size) -> DeviceSize {
        DeviceSize::new(size.width * self.0, size.height * self.0)
    }

    pub fn scale_rect(&self, rect: Rect) -> DeviceRect {
        DeviceRect::new(self.scale_point(rect.origin), self.scale_size(rect.size))
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Rotation/scale applied by an item around its transform origin.
///
/// Rotation is in degrees, matching how hosts usually expose it. The origin is
/// in the item's own coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemTransform {
    pub rotation: f32,
    pub scale: f32,
    pub origin: Point,
}

impl ItemTransform {
    pub fn is_identity(&self) -> bool {
        self.rotation == 0.0 && self.scale == 1.0
    }
}

impl Default for ItemTransform {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale: 1.0,
            origin: Point::new(0.0, 0.0),
        }
    }
}

/// Rect accessors and algebra that the glamour type does not carry itself.
pub trait RectExt: Sized {
    fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self;
    fn left(&self) -> f32;
    fn top(&self) -> f32;
    fn right(&self) -> f32;
    fn bottom(&self) -> f32;
    fn center(&self) -> Point;
    fn is_empty(&self) -> bool;
    fn contains(&self, point: Point) -> bool;
    fn translated(&self, offset: Vector) -> Self;
    fn inset(&self, amount: f32) -> Self;
    fn union(&self, other: &Self) -> Self;
    fn intersection(&self, other: &Self) -> Option<Self>;
}

impl RectExt for Rect {
    fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Rect::new(Point::new(left, top), Size::new(right - left, bottom - top))
    }

    fn left(&self) -> f32 {
        self.origin.x
    }

    fn top(&self) -> f32 {
        self.origin.y
    }

    fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }

    fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    fn translated(&self, offset: Vector) -> Self {
        Rect::new(
            Point::new(self.origin.x + offset.x, self.origin.y + offset.y),
            self.size,
        )
    }

    fn inset(&self, amount: f32) -> Self {
        let width = (self.size.width - 2.0 * amount).max(0.0);
        let height = (self.size.height - 2.0 * amount).max(0.0);
        Rect::new(
            Point::new(self.origin.x + amount, self.origin.y + amount),
            Size::new(width, height),
        )
    }

    fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left < right && top < bottom {
            Some(Rect::from_edges(left, top, right, bottom))
        } else {
            None
        }
    }
}

/// Axis-aligned bounding rect of `rect` after applying `transform`, with the
/// transform origin given in the same coordinate space as `rect`.
pub fn transformed_bounds(rect: Rect, transform: &ItemTransform, origin: Point) -> Rect {
    if transform.is_identity() {
        return rect;
    }

    let (sin, cos) = transform.rotation.to_radians().sin_cos();
    let corners = [
        Point::new(rect.left(), rect.top()),
        Point::new(rect.right(), rect.top()),
        Point::new(rect.right(), rect.bottom()),
        Point::new(rect.left(), rect.bottom()),
    ];

    let mut left = f32::MAX;
    let mut top = f32::MAX;
    let mut right = f32::MIN;
    let mut bottom = f32::MIN;
    for corner in corners {
        let dx = (corner.x - origin.x) * transform.scale;
        let dy = (corner.y - origin.y) * transform.scale;
        let x = origin.x + dx * cos - dy * sin;
        let y = origin.y + dx * sin + dy * cos;
        left = left.min(x);
        top = top.min(y);
        right = right.max(x);
        bottom = bottom.max(y);
    }

    Rect::from_edges(left, top, right, bottom)
}
