//! Decoration rendering: pure lowering of geometry snapshots to paint ops.
//!
//! Everything here is a function of the last computed [`ItemGeometry`] /
//! [`LayoutRegion`] plus the viewport and zoom; no tree access, no state.
//! Measurements shown in labels are divided by the zoom so they always read
//! as logical pixels, whatever magnification the inspector UI applies.

use sinopia_core::{DisplayList, FillPattern, LineStyle, PaintOp, Point, Rect, RectExt, Srgba};

use crate::overlay::OverlayConfig;
use crate::snapshot::{ItemGeometry, LayoutRegion};

/// The fixed decoration palette.
pub mod colors {
    use super::Srgba;

    pub const BOUNDING_STROKE: Srgba = Srgba::new(0.910, 0.341, 0.322, 0.667);
    pub const BOUNDING_FILL: Srgba = Srgba::new(0.910, 0.341, 0.322, 0.373);
    pub const ITEM_RECT: Srgba = Srgba::new(0.502, 0.502, 0.502, 1.0);
    pub const CHILDREN_STROKE: Srgba = Srgba::new(0.0, 0.388, 0.757, 0.667);
    pub const CHILDREN_FILL: Srgba = Srgba::new(0.0, 0.388, 0.757, 0.373);
    pub const TRANSFORM_ORIGIN: Srgba = Srgba::new(0.612, 0.059, 0.337, 0.667);
    pub const AXIS_LABEL: Srgba = Srgba::new(0.533, 0.533, 0.533, 1.0);
    pub const ANCHOR: Srgba = Srgba::new(0.545, 0.702, 0.0, 1.0);
    pub const LAYOUT_STROKE: Srgba = Srgba::new(0.341, 0.322, 0.910, 0.667);
    pub const LAYOUT_FILL: Srgba = Srgba::new(0.341, 0.322, 0.910, 0.235);
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Horizontal,
    Vertical,
}

/// Lower an item-geometry snapshot into decoration paint ops.
///
/// Order matters and is part of the contract: bounding box, pre-transform
/// item rect, children rect, transform origin, axis labels, anchors.
pub fn draw_decoration(
    list: &mut DisplayList,
    geometry: &ItemGeometry,
    viewport: Rect,
    zoom: f32,
    config: &OverlayConfig,
) {
    let item_rect = geometry.item_rect;
    let bounding = geometry.bounding_rect;

    // Bounding box.
    if !bounding.is_empty() {
        list.push(PaintOp::Rect {
            rect: bounding,
            fill: Some(colors::BOUNDING_FILL),
            pattern: FillPattern::Solid,
            stroke: Some(colors::BOUNDING_STROKE),
            stroke_width: 1.0,
        });
    }

    // Original (pre-transform) geometry, hatched when it differs.
    if item_rect != bounding && !item_rect.is_empty() {
        list.push(PaintOp::Rect {
            rect: item_rect,
            fill: Some(colors::ITEM_RECT),
            pattern: FillPattern::Hatch,
            stroke: Some(colors::ITEM_RECT),
            stroke_width: 1.0,
        });
    }

    // Children rect. Under a non-identity transform this would be drawn in
    // the wrong place, so it is skipped there.
    if item_rect != bounding
        && geometry.transform.is_identity()
        && !geometry.children_rect.is_empty()
    {
        list.push(PaintOp::Rect {
            rect: geometry.children_rect,
            fill: Some(colors::CHILDREN_FILL),
            pattern: FillPattern::Solid,
            stroke: Some(colors::CHILDREN_STROKE),
            stroke_width: 1.0,
        });
    }

    // Transform origin crosshair.
    if item_rect != bounding {
        let origin = geometry.transform_origin;
        list.push(PaintOp::Ellipse {
            center: origin,
            radius: 2.5,
            color: colors::TRANSFORM_ORIGIN,
        });
        list.line(
            Point::new(origin.x, origin.y - 6.0),
            Point::new(origin.x, origin.y + 6.0),
            colors::TRANSFORM_ORIGIN,
            1.0,
            LineStyle::Solid,
        );
        list.line(
            Point::new(origin.x - 6.0, origin.y),
            Point::new(origin.x + 6.0, origin.y),
            colors::TRANSFORM_ORIGIN,
            1.0,
            LineStyle::Solid,
        );
    }

    // Raw x/y, only where no anchor already pins that axis.
    if geometry.shows_x_label() {
        let parent_end = Point::new(item_rect.left() - geometry.x, item_rect.top());
        let item_end = item_rect.origin;
        draw_arrow(list, parent_end, item_end, colors::AXIS_LABEL);
        list.label(
            Point::new((parent_end.x + item_end.x) / 2.0, parent_end.y + 10.0),
            format!("x: {}px", geometry.x / zoom),
            colors::AXIS_LABEL,
        );
    }
    if geometry.shows_y_label() {
        let parent_end = Point::new(item_rect.left(), item_rect.top() - geometry.y);
        let item_end = item_rect.origin;
        draw_arrow(list, parent_end, item_end, colors::AXIS_LABEL);
        list.label(
            Point::new(parent_end.x + 10.0, (parent_end.y + item_end.y) / 2.0),
            format!("y: {}px", geometry.y / zoom),
            colors::AXIS_LABEL,
        );
    }

    if !config.draw_anchors {
        return;
    }

    let anchors = &geometry.anchors;
    if let Some(margin) = anchors.left {
        draw_anchor(
            list,
            &item_rect,
            viewport,
            zoom,
            Orientation::Horizontal,
            item_rect.left(),
            margin,
            format!("margin: {}px", margin / zoom),
        );
    }
    if let Some(offset) = anchors.h_center {
        draw_anchor(
            list,
            &item_rect,
            viewport,
            zoom,
            Orientation::Horizontal,
            (item_rect.left() + item_rect.right()) / 2.0,
            offset,
            format!("offset: {}px", offset / zoom),
        );
    }
    if let Some(margin) = anchors.right {
        draw_anchor(
            list,
            &item_rect,
            viewport,
            zoom,
            Orientation::Horizontal,
            item_rect.right(),
            -margin,
            format!("margin: {}px", margin / zoom),
        );
    }
    if let Some(margin) = anchors.top {
        draw_anchor(
            list,
            &item_rect,
            viewport,
            zoom,
            Orientation::Vertical,
            item_rect.top(),
            margin,
            format!("margin: {}px", margin / zoom),
        );
    }
    if let Some(offset) = anchors.v_center {
        draw_anchor(
            list,
            &item_rect,
            viewport,
            zoom,
            Orientation::Vertical,
            (item_rect.top() + item_rect.bottom()) / 2.0,
            offset,
            format!("offset: {}px", offset / zoom),
        );
    }
    if let Some(margin) = anchors.bottom {
        draw_anchor(
            list,
            &item_rect,
            viewport,
            zoom,
            Orientation::Vertical,
            item_rect.bottom(),
            -margin,
            format!("margin: {}px", margin / zoom),
        );
    }
    if let Some(offset) = anchors.baseline {
        draw_anchor(
            list,
            &item_rect,
            viewport,
            zoom,
            Orientation::Vertical,
            item_rect.top(),
            offset,
            format!("offset: {}px", offset / zoom),
        );
    }
}

/// Shade a layout's dead space, or stroke outlines only when the children
/// fully cover it.
pub fn draw_layout_region(list: &mut DisplayList, region: &LayoutRegion) {
    if region.outer.is_empty() {
        return;
    }
    if region.outline_only {
        list.stroked_rect(region.outer, colors::LAYOUT_STROKE, None);
        for inner in &region.inner {
            list.stroked_rect(*inner, colors::LAYOUT_STROKE, None);
        }
    } else {
        list.push(PaintOp::RegionFill {
            region: region.region.clone(),
            color: colors::LAYOUT_FILL,
        });
        list.stroked_rect(region.outer, colors::LAYOUT_STROKE, None);
    }
}

/// Double-headed arrow between two points. Zero-length arrows are skipped.
fn draw_arrow(list: &mut DisplayList, from: Point, to: Point, color: Srgba) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return;
    }

    list.line(from, to, color, 1.0, LineStyle::Solid);

    let (ux, uy) = (dx / length, dy / length);
    let (sin, cos) = 30.0_f32.to_radians().sin_cos();
    let head = 10.0;
    let v1 = (head * (ux * cos - uy * sin), head * (ux * sin + uy * cos));
    let v2 = (head * (ux * cos + uy * sin), head * (-ux * sin + uy * cos));
    for (vx, vy) in [v1, v2] {
        list.line(
            from,
            Point::new(from.x + vx, from.y + vy),
            color,
            1.0,
            LineStyle::Solid,
        );
        list.line(
            to,
            Point::new(to.x - vx, to.y - vy),
            color,
            1.0,
            LineStyle::Solid,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_anchor(
    list: &mut DisplayList,
    item_rect: &Rect,
    viewport: Rect,
    zoom: f32,
    orientation: Orientation,
    own_line: f32,
    offset: f32,
    label: String,
) {
    let foreign_line = own_line - offset;

    // Margin arrow and label, only when there is a margin to show.
    if offset != 0.0 {
        match orientation {
            Orientation::Horizontal => {
                let mid = (item_rect.top() + item_rect.bottom()) / 2.0;
                draw_arrow(
                    list,
                    Point::new(foreign_line, mid),
                    Point::new(own_line, mid),
                    colors::ANCHOR,
                );
                list.label(
                    Point::new((foreign_line + own_line) / 2.0, mid + 10.0),
                    label,
                    colors::ANCHOR,
                );
            }
            Orientation::Vertical => {
                let mid = (item_rect.left() + item_rect.right()) / 2.0;
                draw_arrow(
                    list,
                    Point::new(mid, foreign_line),
                    Point::new(mid, own_line),
                    colors::ANCHOR,
                );
                list.label(
                    Point::new(mid + 10.0, (foreign_line + own_line) / 2.0),
                    label,
                    colors::ANCHOR,
                );
            }
        }
    }

    // Solid line on the item's own anchor edge.
    match orientation {
        Orientation::Horizontal => list.line(
            Point::new(own_line, item_rect.top()),
            Point::new(own_line, item_rect.bottom()),
            colors::ANCHOR,
            2.0,
            LineStyle::Solid,
        ),
        Orientation::Vertical => list.line(
            Point::new(item_rect.left(), own_line),
            Point::new(item_rect.right(), own_line),
            colors::ANCHOR,
            2.0,
            LineStyle::Solid,
        ),
    }

    // Dotted line where the foreign edge sits, across the whole viewport.
    match orientation {
        Orientation::Horizontal => list.line(
            Point::new(foreign_line, 0.0),
            Point::new(foreign_line, viewport.size.height * zoom),
            colors::ANCHOR,
            1.0,
            LineStyle::Dotted,
        ),
        Orientation::Vertical => list.line(
            Point::new(0.0, foreign_line),
            Point::new(viewport.size.width * zoom, foreign_line),
            colors::ANCHOR,
            1.0,
            LineStyle::Dotted,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinopia_core::{ItemTransform, Region, Size};

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Point::new(x, y), Size::new(w, h))
    }

    fn viewport() -> Rect {
        rect(0.0, 0.0, 800.0, 600.0)
    }

    fn base_geometry() -> ItemGeometry {
        ItemGeometry {
            item_rect: rect(100.0, 100.0, 50.0, 50.0),
            bounding_rect: rect(100.0, 100.0, 50.0, 50.0),
            ..Default::default()
        }
    }

    fn labels(list: &DisplayList) -> Vec<&str> {
        list.ops()
            .iter()
            .filter_map(|op| match op {
                PaintOp::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn bounding_box_comes_first() {
        let mut list = DisplayList::new();
        draw_decoration(
            &mut list,
            &base_geometry(),
            viewport(),
            1.0,
            &OverlayConfig::default(),
        );
        assert!(matches!(
            list.ops()[0],
            PaintOp::Rect {
                fill: Some(fill),
                ..
            } if fill == colors::BOUNDING_FILL
        ));
    }

    #[test]
    fn empty_geometry_draws_nothing() {
        let mut list = DisplayList::new();
        draw_decoration(
            &mut list,
            &ItemGeometry::default(),
            viewport(),
            1.0,
            &OverlayConfig::default(),
        );
        assert!(list.is_empty());
    }

    #[test]
    fn identical_rects_skip_item_rect_and_origin() {
        let mut list = DisplayList::new();
        draw_decoration(
            &mut list,
            &base_geometry(),
            viewport(),
            1.0,
            &OverlayConfig::default(),
        );
        // Only the bounding box and the x/y annotations apply.
        let rects = list
            .ops()
            .iter()
            .filter(|op| matches!(op, PaintOp::Rect { .. }))
            .count();
        assert_eq!(rects, 1);
        assert!(!list
            .ops()
            .iter()
            .any(|op| matches!(op, PaintOp::Ellipse { .. })));
    }

    #[test]
    fn transformed_item_gets_hatch_and_crosshair_but_no_children_rect() {
        let mut list = DisplayList::new();
        let geometry = ItemGeometry {
            item_rect: rect(100.0, 100.0, 50.0, 50.0),
            bounding_rect: rect(75.0, 75.0, 100.0, 100.0),
            children_rect: rect(100.0, 100.0, 40.0, 40.0),
            transform: ItemTransform {
                scale: 2.0,
                ..Default::default()
            },
            transform_origin: Point::new(125.0, 125.0),
            ..Default::default()
        };
        draw_decoration(&mut list, &geometry, viewport(), 1.0, &OverlayConfig::default());

        assert!(list.ops().iter().any(|op| matches!(
            op,
            PaintOp::Rect {
                pattern: FillPattern::Hatch,
                ..
            }
        )));
        assert!(list
            .ops()
            .iter()
            .any(|op| matches!(op, PaintOp::Ellipse { .. })));
        // Children rect is misleading under transform, so it is skipped.
        assert!(!list.ops().iter().any(|op| matches!(
            op,
            PaintOp::Rect { fill: Some(fill), .. } if *fill == colors::CHILDREN_FILL
        )));
    }

    #[test]
    fn x_label_drawn_only_without_competing_anchor() {
        let mut geometry = base_geometry();
        geometry.x = 100.0;

        let mut list = DisplayList::new();
        draw_decoration(&mut list, &geometry, viewport(), 1.0, &OverlayConfig::default());
        assert_eq!(labels(&list), vec!["x: 100px"]);

        geometry.anchors.left = Some(100.0);
        let mut list = DisplayList::new();
        draw_decoration(&mut list, &geometry, viewport(), 1.0, &OverlayConfig::default());
        assert_eq!(labels(&list), vec!["margin: 100px"]);
    }

    #[test]
    fn labels_report_logical_pixels_under_zoom() {
        let mut geometry = base_geometry();
        geometry.y = 50.0;
        geometry.anchors.left = Some(20.0);

        let mut list = DisplayList::new();
        draw_decoration(&mut list, &geometry, viewport(), 2.0, &OverlayConfig::default());
        let labels = labels(&list);
        assert!(labels.contains(&"y: 25px"));
        assert!(labels.contains(&"margin: 10px"));
    }

    #[test]
    fn anchor_emits_own_and_foreign_lines() {
        let mut geometry = base_geometry();
        geometry.anchors.left = Some(20.0);

        let mut list = DisplayList::new();
        draw_decoration(&mut list, &geometry, viewport(), 1.0, &OverlayConfig::default());

        // Solid 2px line on the item's left edge.
        assert!(list.ops().iter().any(|op| matches!(
            op,
            PaintOp::Line { from, width, style: LineStyle::Solid, .. }
                if from.x == 100.0 && *width == 2.0
        )));
        // Dotted line at the foreign edge, spanning the viewport height.
        assert!(list.ops().iter().any(|op| matches!(
            op,
            PaintOp::Line { from, to, style: LineStyle::Dotted, .. }
                if from.x == 80.0 && to.y == 600.0
        )));
    }

    #[test]
    fn zero_margin_anchor_has_lines_but_no_arrow_or_label() {
        let mut geometry = base_geometry();
        geometry.anchors.top = Some(0.0);

        let mut list = DisplayList::new();
        draw_decoration(&mut list, &geometry, viewport(), 1.0, &OverlayConfig::default());
        assert!(labels(&list).is_empty());
        // Own solid line and foreign dotted line remain.
        assert!(list.ops().iter().any(|op| matches!(
            op,
            PaintOp::Line { width, style: LineStyle::Solid, .. } if *width == 2.0
        )));
        assert!(list
            .ops()
            .iter()
            .any(|op| matches!(op, PaintOp::Line { style: LineStyle::Dotted, .. })));
    }

    #[test]
    fn anchors_can_be_configured_off() {
        let mut geometry = base_geometry();
        geometry.anchors.left = Some(20.0);

        let mut list = DisplayList::new();
        let config = OverlayConfig {
            draw_anchors: false,
            ..Default::default()
        };
        draw_decoration(&mut list, &geometry, viewport(), 1.0, &config);
        assert!(labels(&list).is_empty());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn layout_region_shades_dead_space() {
        let region = LayoutRegion {
            outer: rect(1.0, 1.0, 98.0, 98.0),
            inner: vec![rect(1.0, 1.0, 50.0, 98.0)],
            region: Region::subtract(rect(1.0, 1.0, 98.0, 98.0), &[rect(1.0, 1.0, 50.0, 98.0)]),
            outline_only: false,
        };

        let mut list = DisplayList::new();
        draw_layout_region(&mut list, &region);
        assert!(matches!(list.ops()[0], PaintOp::RegionFill { .. }));
        assert!(matches!(list.ops()[1], PaintOp::Rect { fill: None, .. }));
    }

    #[test]
    fn outline_only_mode_strokes_and_never_shades() {
        let region = LayoutRegion {
            outer: rect(1.0, 1.0, 98.0, 98.0),
            inner: vec![rect(1.0, 1.0, 49.0, 98.0), rect(50.0, 1.0, 49.0, 98.0)],
            region: Region::default(),
            outline_only: true,
        };

        let mut list = DisplayList::new();
        draw_layout_region(&mut list, &region);
        assert_eq!(list.len(), 3);
        assert!(!list
            .ops()
            .iter()
            .any(|op| matches!(op, PaintOp::RegionFill { .. })));
        assert!(list
            .ops()
            .iter()
            .all(|op| matches!(op, PaintOp::Rect { fill: None, .. })));
    }

    #[test]
    fn default_region_draws_nothing() {
        let mut list = DisplayList::new();
        draw_layout_region(&mut list, &LayoutRegion::default());
        assert!(list.is_empty());
    }
}
