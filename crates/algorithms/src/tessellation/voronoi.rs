//! Voronoi tessellation clipped to a rectangular extent
//!
//! Each cell is built independently by half-plane intersection: start
//! from the clip rectangle and cut it with the perpendicular bisector to
//! every neighbour, nearest first. Once the next neighbour is more than
//! twice the cell's radius away from the generator, no later bisector can
//! touch the cell and the search stops. Neighbours come from a k-d tree
//! in batches that double in size.
//!
//! Cell geometry is computed relative to the generator to keep precision
//! for projected coordinates in the hundreds of kilometres.

use geo::{Coord, LineString};
use crate::kdtree::KdTree;
use crate::maybe_rayon::*;
use crate::tessellation::clip::{clip_convex, dedup_ring, HalfPlane};
use geopattern_core::{
    Algorithm, AttributeValue, BoundingExtent, Error, Point, PointSet, Polygon, Result, Zone,
    ZonePartition, CRS,
};
use tracing::{debug, trace};

/// First neighbour batch size per cell
const INITIAL_NEIGHBOURS: usize = 16;

/// Relative tolerance for merging cell vertices, scaled by the smaller of
/// the extent diagonal and the distance to the generator's nearest neighbour
const VERTEX_TOLERANCE: f64 = 1e-12;

/// One Voronoi cell and the point that generated it
#[derive(Debug, Clone)]
pub struct VoronoiCell {
    generator: usize,
    point: Point,
    polygon: Polygon,
}

impl VoronoiCell {
    /// Index of the generating point in the input point set
    pub fn generator(&self) -> usize {
        self.generator
    }

    /// The generating point, attributes included
    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    /// Attribute of the generating point
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.point.attribute(key)
    }
}

/// Voronoi cells of a point set, one per point in input order
#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    cells: Vec<VoronoiCell>,
    extent: BoundingExtent,
    crs: CRS,
    index: KdTree,
}

impl VoronoiDiagram {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, generator: usize) -> Option<&VoronoiCell> {
        self.cells.get(generator)
    }

    pub fn cells(&self) -> &[VoronoiCell] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VoronoiCell> {
        self.cells.iter()
    }

    /// The clip extent
    pub fn extent(&self) -> &BoundingExtent {
        &self.extent
    }

    pub fn crs(&self) -> &CRS {
        &self.crs
    }

    /// Sum of cell areas; equals the clip extent area up to rounding
    pub fn total_area(&self) -> f64 {
        self.cells.iter().map(VoronoiCell::area).sum()
    }

    /// Cell whose generator is nearest to (x, y).
    ///
    /// On a shared boundary the cell with the lowest generator index wins.
    /// `None` outside the clip extent.
    pub fn cell_containing(&self, x: f64, y: f64) -> Option<&VoronoiCell> {
        if !self.extent.contains(x, y) {
            return None;
        }
        let nearest = self.index.nearest(x, y)?;
        self.cells.get(nearest.index)
    }

    /// Cells as zones keyed by generator index, carrying the generator's
    /// attributes, for use with zonal aggregation.
    pub fn to_zone_partition(&self) -> ZonePartition {
        let zones = self
            .cells
            .iter()
            .map(|cell| {
                cell.point.attributes().iter().fold(
                    Zone::new(cell.generator.to_string(), cell.polygon.clone()),
                    |zone, (k, v)| zone.with_attribute(k.clone(), v.clone()),
                )
            })
            .collect();
        ZonePartition::new(zones, self.crs.clone())
    }
}

/// Voronoi tessellation as an [`Algorithm`]
#[derive(Debug, Clone, Default)]
pub struct Voronoi;

impl Algorithm for Voronoi {
    type Input = (PointSet, BoundingExtent);
    type Output = VoronoiDiagram;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Voronoi"
    }

    fn description(&self) -> &'static str {
        "Nearest-generator partition of a rectangular extent by half-plane intersection"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        let (points, extent) = input;
        voronoi(&points, &extent)
    }
}

/// Partition `clip_extent` into the Voronoi cells of `points`.
///
/// Every point gets exactly one non-empty convex cell; cells only share
/// boundaries and together cover the extent.
///
/// # Errors
/// - [`Error::EmptyInput`] for an empty point set
/// - [`Error::InvalidGeometry`] for a clip extent with zero area
/// - [`Error::IncompatibleExtent`] for a point outside the clip extent
/// - [`Error::DegenerateInput`] for two coincident points, or two points
///   so close that their cells cannot be told apart at `f64` precision of
///   the input coordinates (a few ulps apart)
pub fn voronoi(points: &PointSet, clip_extent: &BoundingExtent) -> Result<VoronoiDiagram> {
    if points.is_empty() {
        return Err(Error::EmptyInput { what: "point set" });
    }
    if clip_extent.area() <= 0.0 {
        return Err(Error::InvalidGeometry(format!(
            "clip extent [{}, {}, {}, {}] has zero area",
            clip_extent.xmin(),
            clip_extent.ymin(),
            clip_extent.xmax(),
            clip_extent.ymax()
        )));
    }
    if let Some((i, p)) = points
        .iter()
        .enumerate()
        .find(|(_, p)| !clip_extent.contains(p.x(), p.y()))
    {
        return Err(Error::IncompatibleExtent {
            expected: format!(
                "generators within [{}, {}, {}, {}]",
                clip_extent.xmin(),
                clip_extent.ymin(),
                clip_extent.xmax(),
                clip_extent.ymax()
            ),
            found: format!("point {} at ({}, {})", i, p.x(), p.y()),
        });
    }

    let index = KdTree::from_points(points);
    for (i, p) in points.iter().enumerate() {
        if let Some(nb) = index.nearest_excluding(p.x(), p.y(), i) {
            if nb.distance_sq == 0.0 {
                return Err(Error::DegenerateInput(format!(
                    "points {} and {} coincide at ({}, {})",
                    i.min(nb.index),
                    i.max(nb.index),
                    p.x(),
                    p.y()
                )));
            }
        }
    }

    let n = points.len();
    let diagonal = clip_extent.width().hypot(clip_extent.height());
    debug!(points = n, "voronoi tessellation");

    let pts = points.points();
    let cells = (0..n)
        .into_par_iter()
        .map(|i| {
            let polygon = build_cell(&index, pts, i, clip_extent, diagonal)?;
            Ok(VoronoiCell {
                generator: i,
                point: pts[i].clone(),
                polygon,
            })
        })
        .collect::<Result<Vec<VoronoiCell>>>()?;

    Ok(VoronoiDiagram {
        cells,
        extent: *clip_extent,
        crs: points.crs().clone(),
        index,
    })
}

fn build_cell(
    index: &KdTree,
    pts: &[Point],
    i: usize,
    extent: &BoundingExtent,
    diagonal: f64,
) -> Result<Polygon> {
    let site = pts[i].coord();
    let origin = Coord { x: 0.0, y: 0.0 };
    let mut cell: Vec<Coord<f64>> = extent
        .corners()
        .iter()
        .map(|c| Coord { x: c.x - site.x, y: c.y - site.y })
        .collect();

    let n = index.len();
    let mut k = INITIAL_NEIGHBOURS.min(n);
    let mut visited = 0;
    let mut scale = diagonal;

    loop {
        let neighbours = index.k_nearest(site.x, site.y, k);
        if visited == 0 {
            if let Some(nb) = neighbours.iter().find(|nb| nb.index != i) {
                scale = scale.min(nb.distance());
            }
        }
        let mut settled = false;

        for nb in &neighbours[visited..] {
            if nb.index == i {
                continue;
            }
            let radius_sq = cell
                .iter()
                .map(|v| v.x * v.x + v.y * v.y)
                .fold(0.0, f64::max);
            if nb.distance_sq > 4.0 * radius_sq {
                settled = true;
                break;
            }

            let other = pts[nb.index].coord();
            let plane = HalfPlane::bisector(origin, Coord { x: other.x - site.x, y: other.y - site.y });
            cell = clip_convex(&cell, &plane);
            if cell.is_empty() {
                return Err(too_close(index, i, site));
            }
        }

        if settled || k >= n {
            break;
        }
        visited = neighbours.len();
        k = (k * 2).min(n);
        trace!(generator = i, k, "expanding voronoi neighbour search");
    }

    dedup_ring(&mut cell, VERTEX_TOLERANCE * scale);
    let mut ring: Vec<Coord<f64>> = cell
        .into_iter()
        .map(|v| Coord { x: v.x + site.x, y: v.y + site.y })
        .collect();
    // Shifting back can round neighbouring vertices onto each other
    dedup_ring(&mut ring, 0.0);
    if ring.len() < 3 {
        return Err(too_close(index, i, site));
    }
    ring.push(ring[0]);

    // A ring that survives the shift but fails validation lost its shape
    // to coordinate rounding as well
    Polygon::new(LineString::new(ring), vec![]).map_err(|_| too_close(index, i, site))
}

fn too_close(index: &KdTree, i: usize, site: Coord<f64>) -> Error {
    let neighbour = index
        .nearest_excluding(site.x, site.y, i)
        .map_or(i, |nb| nb.index);
    Error::DegenerateInput(format!(
        "points {} and {} are too close to separate at ({}, {})",
        i.min(neighbour),
        i.max(neighbour),
        site.x,
        site.y
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> BoundingExtent {
        BoundingExtent::new(0.0, 0.0, size, size).unwrap()
    }

    fn projected(coords: &[(f64, f64)]) -> PointSet {
        let pts = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Point::new(x, y).with_attribute("id", i as i64))
            .collect();
        PointSet::new(pts, CRS::british_national_grid()).unwrap()
    }

    #[test]
    fn test_single_point_owns_extent() {
        let d = voronoi(&projected(&[(3.0, 4.0)]), &square(10.0)).unwrap();
        assert_eq!(d.len(), 1);
        assert_relative_eq!(d.total_area(), 100.0);
    }

    #[test]
    fn test_two_points_split_in_half() {
        let d = voronoi(&projected(&[(2.5, 5.0), (7.5, 5.0)]), &square(10.0)).unwrap();
        assert_relative_eq!(d.get(0).unwrap().area(), 50.0, epsilon = 1e-9);
        assert_relative_eq!(d.get(1).unwrap().area(), 50.0, epsilon = 1e-9);
        let e = d.get(0).unwrap().polygon().bounding_extent();
        assert_relative_eq!(e.xmax(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lattice_cells_are_equal() {
        let mut coords = Vec::new();
        for r in 0..5 {
            for c in 0..5 {
                coords.push((c as f64 * 2.0 + 1.0, r as f64 * 2.0 + 1.0));
            }
        }
        let d = voronoi(&projected(&coords), &square(10.0)).unwrap();
        assert_eq!(d.len(), 25);
        for cell in d.iter() {
            assert_relative_eq!(cell.area(), 4.0, epsilon = 1e-9);
        }
        assert_relative_eq!(d.total_area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_generator_inside_own_cell() {
        let coords = [(1.0, 1.0), (8.0, 2.0), (4.0, 9.0), (5.0, 5.0), (9.5, 9.5), (0.0, 10.0)];
        let d = voronoi(&projected(&coords), &square(10.0)).unwrap();
        for (i, &(x, y)) in coords.iter().enumerate() {
            let cell = d.get(i).unwrap();
            assert_eq!(cell.generator(), i);
            assert!(cell.polygon().contains_xy(x, y));
            assert_eq!(cell.attribute("id").and_then(|v| v.as_f64()), Some(i as f64));
        }
        assert_relative_eq!(d.total_area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cell_containing() {
        let d = voronoi(&projected(&[(2.5, 5.0), (7.5, 5.0)]), &square(10.0)).unwrap();
        assert_eq!(d.cell_containing(1.0, 1.0).unwrap().generator(), 0);
        assert_eq!(d.cell_containing(9.0, 9.0).unwrap().generator(), 1);
        // Shared boundary goes to the lower index
        assert_eq!(d.cell_containing(5.0, 3.0).unwrap().generator(), 0);
        assert!(d.cell_containing(11.0, 5.0).is_none());
    }

    #[test]
    fn test_far_from_origin() {
        let base = (530_000.0, 180_000.0);
        let coords: Vec<(f64, f64)> = [(100.0, 100.0), (300.0, 150.0), (200.0, 350.0)]
            .iter()
            .map(|&(x, y)| (base.0 + x, base.1 + y))
            .collect();
        let extent = BoundingExtent::new(base.0, base.1, base.0 + 400.0, base.1 + 400.0).unwrap();
        let d = voronoi(&projected(&coords), &extent).unwrap();
        assert_relative_eq!(d.total_area(), 160_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_coincident_points() {
        let err = voronoi(&projected(&[(1.0, 1.0), (5.0, 5.0), (1.0, 1.0)]), &square(10.0)).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(msg) if msg.contains("points 0 and 2")));
    }

    #[test]
    fn test_closely_spaced_generators() {
        let pts = projected(&[(0.5, 0.5), (0.5 + 1e-13, 0.5), (0.5 + 2e-13, 0.5)]);
        let diagram = voronoi(&pts, &square(1.0)).unwrap();

        assert_eq!(diagram.len(), 3);
        assert!(diagram.iter().all(|c| c.area() > 0.0));
        // The middle cell is a 1e-13 wide strip
        assert_relative_eq!(diagram.get(1).unwrap().area(), 1e-13, max_relative = 1e-3);
        assert_relative_eq!(diagram.total_area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_generators_ulps_apart() {
        let ulp = |k: u64| f64::from_bits(0.5f64.to_bits() + k);
        let pts = projected(&[(ulp(0), 0.5), (ulp(1), 0.5), (ulp(2), 0.5), (ulp(3), 0.5)]);
        match voronoi(&pts, &square(1.0)) {
            Ok(diagram) => assert!(diagram.iter().all(|c| c.area() > 0.0)),
            Err(err) => assert!(matches!(err, Error::DegenerateInput(msg) if msg.contains("too close"))),
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let empty = PointSet::empty(CRS::british_national_grid());
        assert!(matches!(voronoi(&empty, &square(1.0)), Err(Error::EmptyInput { .. })));

        let flat = BoundingExtent::new(0.0, 0.0, 10.0, 0.0).unwrap();
        assert!(matches!(
            voronoi(&projected(&[(1.0, 0.0)]), &flat),
            Err(Error::InvalidGeometry(_))
        ));

        assert!(matches!(
            voronoi(&projected(&[(1.0, 1.0), (12.0, 1.0)]), &square(10.0)),
            Err(Error::IncompatibleExtent { .. })
        ));
    }

    #[test]
    fn test_zone_partition_from_cells() {
        let d = voronoi(&projected(&[(2.5, 5.0), (7.5, 5.0)]), &square(10.0)).unwrap();
        let zones = d.to_zone_partition();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones.get(1).unwrap().key(), "1");
        assert_eq!(zones.get(1).unwrap().attribute("id").and_then(|v| v.as_f64()), Some(1.0));
    }

    #[test]
    fn test_algorithm_trait() {
        let out = Voronoi
            .execute_default((projected(&[(1.0, 1.0), (2.0, 2.0)]), square(4.0)))
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(Voronoi.name(), "Voronoi");
    }
}
