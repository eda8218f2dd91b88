//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use crate::math::{Point, Transform};

/// An axis-aligned bounding box in either local or scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounds of an axis-aligned rectangle with its top-left at the origin.
    pub fn from_rect(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Bounds of an ellipse centered on the origin.
    pub fn from_ellipse(rx: f64, ry: f64) -> Self {
        Self::new(-rx, -ry, rx, ry)
    }

    /// An empty box ready to be grown with [`Bounds::include`].
    pub fn empty() -> Self {
        Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        )
    }

    /// Whether this box has been grown to cover at least one point.
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Grows the box to cover `p`.
    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Containment test, boundary inclusive.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// The four corners in clockwise order starting at the minimum corner:
    /// top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    /// Maps the four corners through `transform` and returns the axis-aligned
    /// box covering the result.
    pub fn transformed(&self, transform: &Transform) -> Bounds {
        let mut out = Bounds::empty();
        for corner in self.corners() {
            out.include(transform.apply(corner));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_boundary_inclusive() {
        let b = Bounds::from_rect(100.0, 50.0);
        assert!(b.contains(Point::new(0.0, 0.0)));
        assert!(b.contains(Point::new(100.0, 50.0)));
        assert!(!b.contains(Point::new(100.1, 25.0)));
    }

    #[test]
    fn include_grows_from_empty() {
        let mut b = Bounds::empty();
        assert!(!b.is_valid());
        b.include(Point::new(3.0, -2.0));
        b.include(Point::new(-1.0, 4.0));
        assert!(b.is_valid());
        assert_eq!(b, Bounds::new(-1.0, -2.0, 3.0, 4.0));
    }

    #[test]
    fn transformed_covers_rotated_corners() {
        let b = Bounds::from_rect(10.0, 10.0);
        let rotated = b.transformed(&Transform::rotate(std::f64::consts::PI / 4.0));
        let diag = 10.0 * std::f64::consts::SQRT_2;
        assert!((rotated.max_y - diag).abs() < 1e-9);
        assert!((rotated.width() - diag).abs() < 1e-9);
    }
}
