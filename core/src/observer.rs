//! Observer space

use crate::base::*;
use crate::geometry::*;

/// Ordered, equally spaced viewer positions on a line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObserverSpace {
    /// First viewer position.
    pub start: Point3f,

    /// Offset between consecutive positions.
    pub step: Vector3f,

    /// Number of positions.
    pub count: usize,
}

impl Default for ObserverSpace {
    /// A single viewer at the origin.
    fn default() -> Self {
        Self::new(Point3f::zero(), Vector3f::zero(), 1)
    }
}

impl ObserverSpace {
    /// Create a new `ObserverSpace`.
    ///
    /// * `start` - First viewer position.
    /// * `step`  - Offset between consecutive positions.
    /// * `count` - Number of positions.
    pub fn new(start: Point3f, step: Vector3f, count: usize) -> Self {
        Self { start, step, count }
    }

    /// Returns the number of viewer positions.
    pub fn num_positions(&self) -> usize {
        self.count
    }

    /// Returns the position with the given index.
    ///
    /// * `index` - Position index.
    pub fn position(&self, index: usize) -> Point3f {
        self.start + self.step * index as Float
    }

    /// Returns all positions in order.
    pub fn positions(&self) -> Vec<Point3f> {
        (0..self.count).map(|i| self.position(i)).collect()
    }

    /// Returns the index of the position whose x coordinate is closest to
    /// `x`, or `None` for an empty space.
    ///
    /// * `x` - The x coordinate.
    pub fn nearest_by_x(&self, x: Float) -> Option<usize> {
        (0..self.count).min_by(|a, b| {
            let da = abs(self.position(*a).x - x);
            let db = abs(self.position(*b).x - x);
            da.total_cmp(&db)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_step_from_start() {
        let o = ObserverSpace::new(Point3f::new(-1.0, 0.0, 0.0), Vector3f::new(0.5, 0.0, 0.0), 5);
        assert_eq!(o.num_positions(), 5);
        assert_eq!(o.position(0), Point3f::new(-1.0, 0.0, 0.0));
        assert_eq!(o.position(4), Point3f::new(1.0, 0.0, 0.0));
        assert_eq!(o.positions().len(), 5);
    }

    #[test]
    fn nearest_position_by_x() {
        let o = ObserverSpace::new(Point3f::new(-1.0, 0.0, 0.0), Vector3f::new(0.5, 0.0, 0.0), 5);
        assert_eq!(o.nearest_by_x(0.1), Some(2));
        assert_eq!(o.nearest_by_x(-7.0), Some(0));
        assert_eq!(o.nearest_by_x(0.8), Some(4));
        let empty = ObserverSpace::new(Point3f::zero(), Vector3f::zero(), 0);
        assert_eq!(empty.nearest_by_x(0.0), None);
    }
}
