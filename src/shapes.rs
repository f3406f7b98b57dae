//! Parametric shapes drawn from a gesture origin to the current pointer.
//!
//! Geometry is computed by [`geometry`] without touching any pixels, then
//! [`render`] strokes each path with its own style. A dashed path never
//! shares a stroke with a solid one, so the dash pattern cannot leak.

use std::f32::consts::{FRAC_PI_6, PI};

use egui::{Color32, Pos2, pos2, vec2};

use crate::raster::{self, Dash};
use crate::surface::{RasterSurface, StrokeStyle};

/// Dash pattern of the dotted line, in logical pixels
pub const DASH_PATTERN: Dash = Dash { on: 10.0, off: 10.0 };

/// Shortest arrowhead edge, in logical pixels
pub const MIN_ARROW_HEAD: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    DottedLine,
    Arrow,
    DoubleArrow,
    Rectangle,
    Circle,
}

/// One stroked path of a shape
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePath {
    pub points: Vec<Pos2>,
    pub dashed: bool,
}

impl ShapePath {
    fn solid(points: Vec<Pos2>) -> Self {
        Self { points, dashed: false }
    }
}

pub fn arrow_head_length(brush_width: f32) -> f32 {
    MIN_ARROW_HEAD.max(brush_width * 2.0)
}

/// The two outer corners of an arrowhead whose tip is at `tip` and whose
/// shaft points along `angle` (radians, toward the tip).
pub fn arrow_head(tip: Pos2, angle: f32, length: f32) -> [Pos2; 2] {
    let edge = |a: f32| tip - vec2(a.cos(), a.sin()) * length;
    [edge(angle - FRAC_PI_6), edge(angle + FRAC_PI_6)]
}

fn arrow_head_path(tip: Pos2, angle: f32, length: f32) -> ShapePath {
    let [left, right] = arrow_head(tip, angle, length);
    ShapePath::solid(vec![tip, left, right, tip])
}

/// Radius of a circle dragged out from its center
pub fn circle_radius(origin: Pos2, current: Pos2) -> f32 {
    origin.distance(current)
}

/// Every path needed to draw `kind` from `origin` to `current`
pub fn geometry(kind: ShapeKind, origin: Pos2, current: Pos2, brush_width: f32) -> Vec<ShapePath> {
    match kind {
        ShapeKind::Line => vec![ShapePath::solid(vec![origin, current])],
        ShapeKind::DottedLine => vec![ShapePath {
            points: vec![origin, current],
            dashed: true,
        }],
        ShapeKind::Arrow | ShapeKind::DoubleArrow => {
            let angle = (current.y - origin.y).atan2(current.x - origin.x);
            let length = arrow_head_length(brush_width);
            let mut paths = vec![
                ShapePath::solid(vec![origin, current]),
                arrow_head_path(current, angle, length),
            ];
            if kind == ShapeKind::DoubleArrow {
                paths.push(arrow_head_path(origin, angle + PI, length));
            }
            paths
        }
        ShapeKind::Rectangle => {
            if origin == current {
                return Vec::new();
            }
            // Signed corners, so any drag direction works
            vec![ShapePath::solid(vec![
                origin,
                pos2(current.x, origin.y),
                current,
                pos2(origin.x, current.y),
                origin,
            ])]
        }
        ShapeKind::Circle => {
            vec![ShapePath::solid(raster::circle_points(origin, circle_radius(origin, current)))]
        }
    }
}

/// Stroke a shape onto the surface with rounded caps and joins
pub fn render(surface: &mut RasterSurface, kind: ShapeKind, origin: Pos2, current: Pos2, color: Color32, brush_width: f32) {
    let solid = StrokeStyle::solid(color, brush_width);
    for path in geometry(kind, origin, current, brush_width) {
        let style = if path.dashed { solid.with_dash(DASH_PATTERN) } else { solid };
        surface.stroke_polyline(&path.points, &style);
    }
}
