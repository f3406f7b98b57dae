//! Software rasterization onto an RGBA bitmap.
//!
//! Strokes and fills are first accumulated into a [`CoverageMask`] (the
//! maximum coverage per pixel across every piece of the path), then
//! composited onto the bitmap in a single pass. Overlapping segments of one
//! stroke therefore never double-blend.
//!
//! All coordinates here are physical pixels; callers scale logical
//! coordinates before handing them over.

use egui::{Color32, Pos2, Vec2, pos2, vec2};
use image::{Rgba, RgbaImage};

/// How source pixels combine with what is already on the bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Paint over existing content
    #[default]
    SourceOver,
    /// Remove existing content in proportion to coverage. Color channels are
    /// left alone; only alpha drops.
    DestinationOut,
}

/// An on/off dash pattern, in the same units as the path it applies to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub on: f32,
    pub off: f32,
}

impl Dash {
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            on: self.on * factor,
            off: self.off * factor,
        }
    }
}

/// Per-pixel coverage in `0.0..=1.0` over a clipped rectangle of the target
#[derive(Debug, Clone)]
pub struct CoverageMask {
    x0: i32,
    y0: i32,
    width: usize,
    height: usize,
    alpha: Vec<f32>,
}

impl CoverageMask {
    /// A mask spanning `min..max`, clipped to a `clip_width` x `clip_height`
    /// target. Returns `None` when nothing of the area is on the target.
    pub fn new(min: Pos2, max: Pos2, clip_width: u32, clip_height: u32) -> Option<Self> {
        let x0 = (min.x.min(max.x).floor() as i32).max(0);
        let y0 = (min.y.min(max.y).floor() as i32).max(0);
        let x1 = (min.x.max(max.x).ceil() as i32).min(clip_width as i32);
        let y1 = (min.y.max(max.y).ceil() as i32).min(clip_height as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        let (width, height) = ((x1 - x0) as usize, (y1 - y0) as usize);
        Some(Self {
            x0,
            y0,
            width,
            height,
            alpha: vec![0.0; width * height],
        })
    }

    /// A mask large enough for a stroke of `half_width` around `points`
    pub fn around(points: &[Pos2], half_width: f32, clip_width: u32, clip_height: u32) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points.iter().fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        let reach = vec2(half_width + 1.0, half_width + 1.0);
        Self::new(min - reach, max + reach, clip_width, clip_height)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (lx, ly) = (x - self.x0, y - self.y0);
        if lx < 0 || ly < 0 || lx as usize >= self.width || ly as usize >= self.height {
            return None;
        }
        Some(ly as usize * self.width + lx as usize)
    }

    pub fn coverage(&self, x: i32, y: i32) -> f32 {
        self.index(x, y).map_or(0.0, |i| self.alpha[i])
    }

    /// Raise the coverage of one pixel; coverage never decreases.
    pub fn add(&mut self, x: i32, y: i32, coverage: f32) {
        if let Some(i) = self.index(x, y) {
            let slot = &mut self.alpha[i];
            *slot = slot.max(coverage.clamp(0.0, 1.0));
        }
    }

    /// Stamp a capsule of radius `half_width` around the segment `a..b`.
    /// The capsule shape gives round caps and round joins for free.
    pub fn stamp_segment(&mut self, a: Pos2, b: Pos2, half_width: f32) {
        if half_width <= 0.0 {
            return;
        }
        let reach = half_width + 1.0;
        let min_x = ((a.x.min(b.x) - reach).floor() as i32).max(self.x0);
        let min_y = ((a.y.min(b.y) - reach).floor() as i32).max(self.y0);
        let max_x = ((a.x.max(b.x) + reach).ceil() as i32).min(self.x0 + self.width as i32);
        let max_y = ((a.y.max(b.y) + reach).ceil() as i32).min(self.y0 + self.height as i32);
        // Hairlines fade instead of snapping to a full pixel
        let thinness = (half_width * 2.0).min(1.0);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = pos2(x as f32 + 0.5, y as f32 + 0.5);
                let distance = distance_to_segment(center, a, b);
                let coverage = (half_width + 0.5 - distance).clamp(0.0, 1.0) * thinness;
                if coverage > 0.0 {
                    self.add(x, y, coverage);
                }
            }
        }
    }

    /// Stamp every segment of an open polyline. A single point becomes a dot.
    pub fn stamp_polyline(&mut self, points: &[Pos2], half_width: f32) {
        match points {
            [] => {}
            [point] => self.stamp_segment(*point, *point, half_width),
            _ => {
                for pair in points.windows(2) {
                    self.stamp_segment(pair[0], pair[1], half_width);
                }
            }
        }
    }

    /// Cover an axis-aligned rectangle, with fractional coverage on its edges
    pub fn fill_rect(&mut self, a: Pos2, b: Pos2) {
        let (min, max) = (a.min(b), a.max(b));
        let min_x = (min.x.floor() as i32).max(self.x0);
        let min_y = (min.y.floor() as i32).max(self.y0);
        let max_x = (max.x.ceil() as i32).min(self.x0 + self.width as i32);
        let max_y = (max.y.ceil() as i32).min(self.y0 + self.height as i32);
        let overlap = |lo: f32, hi: f32, cell: i32| {
            (hi.min(cell as f32 + 1.0) - lo.max(cell as f32)).clamp(0.0, 1.0)
        };
        for y in min_y..max_y {
            let cover_y = overlap(min.y, max.y, y);
            for x in min_x..max_x {
                self.add(x, y, overlap(min.x, max.x, x) * cover_y);
            }
        }
    }

    /// Blend `color` onto `image` wherever the mask has coverage
    pub fn composite(&self, image: &mut RgbaImage, color: Color32, mode: BlendMode) {
        let source = color.to_srgba_unmultiplied();
        for ly in 0..self.height {
            let y = self.y0 as u32 + ly as u32;
            if y >= image.height() {
                break;
            }
            for lx in 0..self.width {
                let x = self.x0 as u32 + lx as u32;
                if x >= image.width() {
                    break;
                }
                let coverage = self.alpha[ly * self.width + lx];
                if coverage > 0.0 {
                    blend_pixel(image.get_pixel_mut(x, y), source, coverage, mode);
                }
            }
        }
    }
}

/// Blend one unmultiplied RGBA source color into `dst`
pub fn blend_pixel(dst: &mut Rgba<u8>, source: [u8; 4], coverage: f32, mode: BlendMode) {
    let src_a = source[3] as f32 / 255.0 * coverage;
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst[3] as f32 / 255.0;
    match mode {
        BlendMode::SourceOver => {
            let out_a = src_a + dst_a * (1.0 - src_a);
            if out_a <= 0.0 {
                *dst = Rgba([0, 0, 0, 0]);
                return;
            }
            for channel in 0..3 {
                let value = (source[channel] as f32 * src_a
                    + dst[channel] as f32 * dst_a * (1.0 - src_a))
                    / out_a;
                dst[channel] = value.round().clamp(0.0, 255.0) as u8;
            }
            dst[3] = (out_a * 255.0).round() as u8;
        }
        BlendMode::DestinationOut => {
            let out_a = dst_a * (1.0 - src_a);
            dst[3] = (out_a * 255.0).round() as u8;
        }
    }
}

/// Draw `source` over `target` with its top-left corner at the origin.
/// Whatever does not fit is dropped.
pub fn draw_over(target: &mut RgbaImage, source: &RgbaImage) {
    let width = target.width().min(source.width());
    let height = target.height().min(source.height());
    for y in 0..height {
        for x in 0..width {
            let pixel = source.get_pixel(x, y).0;
            blend_pixel(target.get_pixel_mut(x, y), pixel, 1.0, BlendMode::SourceOver);
        }
    }
}

/// An opaque copy of `image` composited over a solid background
pub fn flatten_over(image: &RgbaImage, background: Color32) -> RgbaImage {
    let [r, g, b, _] = background.to_srgba_unmultiplied();
    let mut flat = RgbaImage::from_pixel(image.width(), image.height(), Rgba([r, g, b, 255]));
    draw_over(&mut flat, image);
    flat
}

pub fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    (a + ab * t).distance(p)
}

/// Flatten a quadratic Bézier into a polyline, including both endpoints
pub fn flatten_quadratic(from: Pos2, ctrl: Pos2, to: Pos2, tolerance: f32) -> Vec<Pos2> {
    let rough_length = from.distance(ctrl) + ctrl.distance(to);
    let steps = ((rough_length / tolerance.max(0.1)).ceil() as usize).clamp(1, 256);
    (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            let mt = 1.0 - t;
            let v: Vec2 = from.to_vec2() * (mt * mt) + ctrl.to_vec2() * (2.0 * mt * t) + to.to_vec2() * (t * t);
            v.to_pos2()
        })
        .collect()
}

/// Closed polyline approximating a circle
pub fn circle_points(center: Pos2, radius: f32) -> Vec<Pos2> {
    if radius <= 0.0 {
        return vec![center];
    }
    let segments = ((std::f32::consts::TAU * radius / 2.0).ceil() as usize).clamp(16, 2048);
    (0..=segments)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Split a polyline into its visible dashes. The pattern starts "on" at the
/// first point and carries across vertices.
pub fn dash_polyline(points: &[Pos2], dash: Dash) -> Vec<Vec<Pos2>> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    if dash.on <= 0.0 {
        return Vec::new();
    }
    if dash.off <= 0.0 {
        return vec![points.to_vec()];
    }

    let mut dashes = Vec::new();
    let mut current = vec![first];
    let mut drawing = true;
    let mut remaining = dash.on;

    for pair in points.windows(2) {
        let (mut a, b) = (pair[0], pair[1]);
        let mut segment = a.distance(b);
        while segment > remaining {
            let split = a + (b - a) * (remaining / segment);
            if drawing {
                current.push(split);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![split];
            }
            drawing = !drawing;
            segment -= remaining;
            remaining = if drawing { dash.on } else { dash.off };
            a = split;
        }
        remaining -= segment;
        if drawing {
            current.push(b);
        }
    }
    if drawing && current.len() > 1 {
        dashes.push(current);
    }
    dashes
}
