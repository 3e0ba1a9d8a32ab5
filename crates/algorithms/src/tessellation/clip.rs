//! Convex polygon clipping against half-planes
//!
//! One Sutherland-Hodgman step: a convex ring clipped by a closed
//! half-plane stays a convex ring (possibly empty).

use geo::Coord;

/// Closed half-plane `a·x + b·y <= c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    a: f64,
    b: f64,
    c: f64,
}

impl HalfPlane {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Locations at least as close to `site` as to `other`.
    ///
    /// The boundary is the perpendicular bisector of the two sites.
    pub fn bisector(site: Coord<f64>, other: Coord<f64>) -> Self {
        let a = other.x - site.x;
        let b = other.y - site.y;
        let c = 0.5 * ((other.x * other.x + other.y * other.y) - (site.x * site.x + site.y * site.y));
        Self { a, b, c }
    }

    /// Positive outside, negative inside, zero on the boundary
    #[inline]
    fn signed(&self, p: &Coord<f64>) -> f64 {
        self.a * p.x + self.b * p.y - self.c
    }

    pub fn contains(&self, p: &Coord<f64>) -> bool {
        self.signed(p) <= 0.0
    }

    fn intersect(&self, p: &Coord<f64>, q: &Coord<f64>) -> Coord<f64> {
        let sp = self.signed(p);
        let sq = self.signed(q);
        let t = sp / (sp - sq);
        Coord {
            x: p.x + t * (q.x - p.x),
            y: p.y + t * (q.y - p.y),
        }
    }
}

/// Clip an open convex ring (no repeated closing vertex) by `plane`
pub fn clip_convex(vertices: &[Coord<f64>], plane: &HalfPlane) -> Vec<Coord<f64>> {
    if vertices.is_empty() {
        return Vec::new();
    }

    let n = vertices.len();
    let mut output = Vec::with_capacity(n + 1);

    for i in 0..n {
        let current = &vertices[i];
        let next = &vertices[(i + 1) % n];

        match (plane.contains(current), plane.contains(next)) {
            (true, true) => output.push(*next),
            (true, false) => output.push(plane.intersect(current, next)),
            (false, true) => {
                output.push(plane.intersect(current, next));
                output.push(*next);
            }
            (false, false) => {}
        }
    }

    output
}

/// Drop consecutive vertices closer than `tolerance`, including across
/// the wrap from last to first.
pub fn dedup_ring(vertices: &mut Vec<Coord<f64>>, tolerance: f64) {
    let tol_sq = tolerance * tolerance;
    let close = |p: &Coord<f64>, q: &Coord<f64>| {
        let dx = p.x - q.x;
        let dy = p.y - q.y;
        dx * dx + dy * dy <= tol_sq
    };

    vertices.dedup_by(|a, b| close(a, b));
    while vertices.len() > 1 {
        let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
        if close(&first, &last) {
            vertices.pop();
        } else {
            break;
        }
    }
}
