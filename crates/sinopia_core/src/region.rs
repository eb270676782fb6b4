//! Axis-aligned rectangle regions, used to shade dead space inside layouts.

use crate::{Point, Rect, RectExt, Size};
use serde::{Deserialize, Serialize};

/// A set of non-overlapping rects produced by subtracting holes from an outer
/// rect.
///
/// Subtraction is a deterministic band decomposition: every hole splits each
/// remaining rect into at most four remainder bands (top, bottom, left,
/// right). The same inputs always yield the same rects in the same order,
/// which is what makes recompute idempotence testable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Region covering `outer` minus every rect in `holes`.
    pub fn subtract(outer: Rect, holes: &[Rect]) -> Self {
        if outer.is_empty() {
            return Self::default();
        }

        let mut rects = vec![outer];
        for hole in holes {
            if hole.is_empty() {
                continue;
            }
            let mut next = Vec::with_capacity(rects.len() + 3);
            for rect in &rects {
                split_around_hole(*rect, *hole, &mut next);
            }
            rects = next;
        }

        Self { rects }
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn area(&self) -> f32 {
        self.rects
            .iter()
            .map(|r| r.size.width * r.size.height)
            .sum()
    }

    pub fn bounding_rect(&self) -> Rect {
        self.rects
            .iter()
            .fold(Rect::new(Point::new(0.0, 0.0), Size::new(0.0, 0.0)), |acc, r| {
                acc.union(r)
            })
    }

    pub fn contains(&self, point: Point) -> bool {
        self.rects.iter().any(|r| r.contains(point))
    }
}

/// Push the parts of `rect` not covered by `hole` onto `out`.
fn split_around_hole(rect: Rect, hole: Rect, out: &mut Vec<Rect>) {
    let overlap = match rect.intersection(&hole) {
        Some(overlap) => overlap,
        None => {
            out.push(rect);
            return;
        }
    };

    // Top and bottom bands span the full width; left and right bands fill the
    // middle rows beside the overlap.
    let top = Rect::from_edges(rect.left(), rect.top(), rect.right(), overlap.top());
    let bottom = Rect::from_edges(rect.left(), overlap.bottom(), rect.right(), rect.bottom());
    let left = Rect::from_edges(rect.left(), overlap.top(), overlap.left(), overlap.bottom());
    let right = Rect::from_edges(overlap.right(), overlap.top(), rect.right(), overlap.bottom());

    for band in [top, bottom, left, right] {
        if !band.is_empty() {
            out.push(band);
        }
    }
}
