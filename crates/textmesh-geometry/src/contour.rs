//! Outline flattening and contour classification

use glam::Vec2;
use textmesh_font::OutlineCommand;

pub(crate) const EPSILON: f32 = 1e-6;

/// A closed polyline. The closing edge from the last point back to the
/// first is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Vec2>,
    /// True when the contour cuts a hole out of a surrounding solid
    pub is_hole: bool,
}

/// Flatten outline commands into closed polylines.
///
/// Curves are sampled with `curve_segments` subdivisions. Repeated points and
/// an explicit closing point are dropped; contours with fewer than three
/// points or no area are discarded.
pub fn flatten_outline(commands: &[OutlineCommand], curve_segments: u32) -> Vec<Vec<Vec2>> {
    let segments = curve_segments.max(1);
    let mut contours = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    let mut pen = Vec2::ZERO;

    for command in commands {
        match *command {
            OutlineCommand::MoveTo(p) => {
                finish_contour(&mut contours, std::mem::take(&mut current));
                current.push(p);
                pen = p;
            }
            OutlineCommand::LineTo(p) => {
                if current.is_empty() {
                    current.push(pen);
                }
                current.push(p);
                pen = p;
            }
            OutlineCommand::QuadTo { ctrl, to } => {
                if current.is_empty() {
                    current.push(pen);
                }
                let from = pen;
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    let mt = 1.0 - t;
                    current.push(from * (mt * mt) + ctrl * (2.0 * mt * t) + to * (t * t));
                }
                pen = to;
            }
            OutlineCommand::CubicTo { ctrl1, ctrl2, to } => {
                if current.is_empty() {
                    current.push(pen);
                }
                let from = pen;
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    let mt = 1.0 - t;
                    current.push(
                        from * (mt * mt * mt)
                            + ctrl1 * (3.0 * mt * mt * t)
                            + ctrl2 * (3.0 * mt * t * t)
                            + to * (t * t * t),
                    );
                }
                pen = to;
            }
        }
    }
    finish_contour(&mut contours, current);

    contours
}

fn finish_contour(contours: &mut Vec<Vec<Vec2>>, points: Vec<Vec2>) {
    let mut cleaned: Vec<Vec2> = Vec::with_capacity(points.len());
    for p in points {
        if cleaned
            .last()
            .map_or(true, |last| last.distance_squared(p) > EPSILON * EPSILON)
        {
            cleaned.push(p);
        }
    }
    while cleaned.len() > 1 {
        let first = cleaned[0];
        match cleaned.last() {
            Some(last) if last.distance_squared(first) <= EPSILON * EPSILON => {
                cleaned.pop();
            }
            _ => break,
        }
    }

    if cleaned.len() >= 3 && signed_area(&cleaned).abs() > EPSILON {
        contours.push(cleaned);
    }
}

/// Shoelace area; positive for counter-clockwise rings
pub fn signed_area(ring: &[Vec2]) -> f32 {
    let n = ring.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

/// Even-odd point in polygon test
pub fn point_in_ring(p: Vec2, ring: &[Vec2]) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Classify one glyph's rings into solids and holes and orient them.
///
/// A ring nested inside an odd number of the glyph's other rings is a hole.
/// Solids come out counter-clockwise and holes clockwise, so the right-hand
/// normal of every edge points away from the filled region.
pub fn classify_rings(rings: Vec<Vec<Vec2>>) -> Vec<Contour> {
    let depths: Vec<usize> = rings
        .iter()
        .enumerate()
        .map(|(i, ring)| {
            let probe = ring[0];
            rings
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && point_in_ring(probe, other))
                .count()
        })
        .collect();

    rings
        .into_iter()
        .zip(depths)
        .map(|(mut points, depth)| {
            let is_hole = depth % 2 == 1;
            let ccw = signed_area(&points) > 0.0;
            if ccw == is_hole {
                points.reverse();
            }
            Contour { points, is_hole }
        })
        .collect()
}

/// Mitred outward normals for each vertex of an oriented ring.
///
/// Offsetting a vertex by `normal * d` moves both adjacent edges outward by
/// `d`. The miter length is capped at `sqrt(2)` so spikes at sharp corners
/// stay bounded.
pub fn miter_normals(ring: &[Vec2]) -> Vec<Vec2> {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let prev = ring[(i + n - 1) % n];
            let cur = ring[i];
            let next = ring[(i + 1) % n];

            let n0 = edge_normal(prev, cur);
            let n1 = edge_normal(cur, next);
            let bisector = n0 + n1;
            if bisector.length_squared() <= EPSILON {
                return n0;
            }
            let dir = bisector.normalize();
            let cos_half = dir.dot(n0).max(EPSILON);
            let miter = dir / cos_half;
            let max_len = std::f32::consts::SQRT_2;
            if miter.length() > max_len {
                dir * max_len
            } else {
                miter
            }
        })
        .collect()
}

/// Right-hand unit normal of the edge `a -> b`
fn edge_normal(a: Vec2, b: Vec2) -> Vec2 {
    let d = b - a;
    let len = d.length();
    if len <= EPSILON {
        Vec2::ZERO
    } else {
        Vec2::new(d.y / len, -d.x / len)
    }
}
