//! Geometric helpers for shape classification: closed-ring polygon
//! approximation and the minimal enclosing circle.

use geo_types::{Coord, LineString, MultiPoint, Point};

const CONTAINMENT_EPSILON: f64 = 1e-7;

/// Douglas-Peucker approximation of a closed ring.
///
/// The ring is split at its first point and the point farthest from it, each
/// half is simplified as an open chain, and the halves are joined again. The
/// returned vertices do not repeat the first point at the end.
pub fn approximate_closed_polygon(ring: &[Coord<f64>], epsilon: f64) -> Vec<Coord<f64>> {
    use geo::Simplify;

    if ring.len() < 3 {
        return ring.to_vec();
    }

    let start = ring[0];
    let split = ring
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, 0.0), |(best, best_dist), (i, c)| {
            let dist = distance_squared(start, *c);
            if dist > best_dist { (i, dist) } else { (best, best_dist) }
        })
        .0;

    if split == 0 {
        // Every point coincides with the first one
        return vec![start];
    }

    let first_half = LineString::new(ring[..=split].to_vec()).simplify(&epsilon);
    let mut second_chain = ring[split..].to_vec();
    second_chain.push(start);
    let second_half = LineString::new(second_chain).simplify(&epsilon);

    let mut vertices: Vec<Coord<f64>> = first_half.0;
    let inner = second_half.0.len().saturating_sub(1);
    vertices.extend(second_half.0.into_iter().take(inner).skip(1));
    vertices
}

/// Circle given by centre and radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnclosingCircle {
    pub center: Coord<f64>,
    pub radius: f64,
}

impl EnclosingCircle {
    fn contains(&self, point: Coord<f64>) -> bool {
        distance_squared(self.center, point).sqrt()
            <= self.radius + CONTAINMENT_EPSILON * self.radius.max(1.0)
    }

    fn from_two(a: Coord<f64>, b: Coord<f64>) -> Self {
        let center = Coord { x: (a.x + b.x) / 2.0, y: (a.y + b.y) / 2.0 };
        Self { center, radius: distance_squared(a, b).sqrt() / 2.0 }
    }

    fn from_three(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> Self {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d.abs() < f64::EPSILON {
            // Collinear: the widest pair spans the other point
            return [Self::from_two(a, b), Self::from_two(a, c), Self::from_two(b, c)]
                .into_iter()
                .fold(Self::from_two(a, b), |widest, circle| {
                    if circle.radius > widest.radius { circle } else { widest }
                });
        }

        let a_sq = a.x * a.x + a.y * a.y;
        let b_sq = b.x * b.x + b.y * b.y;
        let c_sq = c.x * c.x + c.y * c.y;
        let center = Coord {
            x: (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d,
            y: (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d,
        };
        Self { center, radius: distance_squared(center, a).sqrt() }
    }
}

/// Smallest circle containing every point, or `None` for an empty set.
///
/// Runs the incremental Welzl construction over the convex hull, which has
/// the same enclosing circle as the full point set.
pub fn min_enclosing_circle(points: &[Coord<f64>]) -> Option<EnclosingCircle> {
    use geo::ConvexHull;

    let first = *points.first()?;
    let hull_input = MultiPoint::new(points.iter().map(|&c| Point::from(c)).collect());
    let mut hull: Vec<Coord<f64>> = hull_input.convex_hull().exterior().0.clone();
    if hull.is_empty() {
        hull.push(first);
    }

    let mut circle = EnclosingCircle { center: hull[0], radius: 0.0 };
    for i in 1..hull.len() {
        if circle.contains(hull[i]) {
            continue;
        }
        circle = EnclosingCircle { center: hull[i], radius: 0.0 };
        for j in 0..i {
            if circle.contains(hull[j]) {
                continue;
            }
            circle = EnclosingCircle::from_two(hull[i], hull[j]);
            for k in 0..j {
                if !circle.contains(hull[k]) {
                    circle = EnclosingCircle::from_three(hull[i], hull[j], hull[k]);
                }
            }
        }
    }

    Some(circle)
}

fn distance_squared(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    /// Dense ring along the edges of a polygon, one point per unit step
    fn densify(corners: &[Coord<f64>]) -> Vec<Coord<f64>> {
        let mut ring = Vec::new();
        for (i, &a) in corners.iter().enumerate() {
            let b = corners[(i + 1) % corners.len()];
            let steps = distance_squared(a, b).sqrt().ceil() as usize;
            for s in 0..steps {
                let t = s as f64 / steps as f64;
                ring.push(c(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
            }
        }
        ring
    }

    #[test]
    fn test_square_ring_reduces_to_four_corners() {
        let ring = densify(&[c(0.0, 0.0), c(40.0, 0.0), c(40.0, 40.0), c(0.0, 40.0)]);
        let approx = approximate_closed_polygon(&ring, 0.04 * 160.0);
        assert_eq!(approx.len(), 4);
    }

    #[test]
    fn test_triangle_ring_reduces_to_three_corners() {
        let ring = densify(&[c(25.0, 0.0), c(50.0, 43.0), c(0.0, 43.0)]);
        let approx = approximate_closed_polygon(&ring, 0.04 * 150.0);
        assert_eq!(approx.len(), 3);
    }

    #[test]
    fn test_circle_ring_keeps_more_than_four_vertices() {
        let ring: Vec<Coord<f64>> = (0..180)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / 180.0;
                c(50.0 + 30.0 * angle.cos(), 50.0 + 30.0 * angle.sin())
            })
            .collect();
        let perimeter = std::f64::consts::TAU * 30.0;
        let approx = approximate_closed_polygon(&ring, 0.04 * perimeter);
        assert!(approx.len() > 4, "got {} vertices", approx.len());
    }

    #[test]
    fn test_degenerate_rings() {
        assert_eq!(approximate_closed_polygon(&[c(1.0, 1.0)], 1.0).len(), 1);
        let same = vec![c(2.0, 2.0); 5];
        assert_eq!(approximate_closed_polygon(&same, 1.0), vec![c(2.0, 2.0)]);
    }

    #[test]
    fn test_enclosing_circle_of_square() {
        let circle = min_enclosing_circle(&[c(0.0, 0.0), c(2.0, 0.0), c(2.0, 2.0), c(0.0, 2.0)])
            .expect("Should fit a circle");
        assert!((circle.center.x - 1.0).abs() < 1e-9);
        assert!((circle.center.y - 1.0).abs() < 1e-9);
        assert!((circle.radius - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_enclosing_circle_of_obtuse_triangle_uses_longest_side() {
        let circle = min_enclosing_circle(&[c(0.0, 0.0), c(10.0, 0.0), c(5.0, 1.0)])
            .expect("Should fit a circle");
        assert!((circle.radius - 5.0).abs() < 1e-9);
        assert!((circle.center.x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_enclosing_circle_of_single_point_has_zero_radius() {
        let circle = min_enclosing_circle(&[c(3.0, 4.0), c(3.0, 4.0)]).expect("Should fit");
        assert_eq!(circle.radius, 0.0);
        assert!(min_enclosing_circle(&[]).is_none());
    }
}
