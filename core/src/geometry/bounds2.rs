//! 2-D Axis Aligned Bounding Boxes.

use super::{Point2, Point2i};
use crate::base::*;
use itertools::{iproduct, Product};
use num_traits::Num;
use std::fmt;
use std::ops::Range;

/// 2-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Bounds2<T> {
    /// Minimum bounds (inclusive).
    pub p_min: Point2<T>,

    /// Maximum bounds (exclusive for integer iteration).
    pub p_max: Point2<T>,
}

/// 2-D bounding box containing `Int` points.
pub type Bounds2i = Bounds2<Int>;

impl<T: Num + PartialOrd + Copy> Bounds2<T> {
    /// Creates a new 2-D bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point2<T>, p2: Point2<T>) -> Self {
        Self {
            p_min: Point2::new(min(p1.x, p2.x), min(p1.y, p2.y)),
            p_max: Point2::new(max(p1.x, p2.x), max(p1.y, p2.y)),
        }
    }

    /// Returns true if the bounding box encloses no area.
    pub fn is_empty(&self) -> bool {
        self.p_min.x >= self.p_max.x || self.p_min.y >= self.p_max.y
    }

    /// Returns the vector from `p_min` to `p_max`.
    pub fn diagonal(&self) -> Point2<T> {
        self.p_max - self.p_min
    }

    /// Returns the area of the bounding box.
    pub fn area(&self) -> T {
        if self.is_empty() {
            T::zero()
        } else {
            let d = self.diagonal();
            d.x * d.y
        }
    }

    /// Returns true if a point is inside the bounding box, where the upper
    /// boundary is considered out of bounds.
    ///
    /// * `p` - The point.
    pub fn contains_exclusive(&self, p: &Point2<T>) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }

    /// Returns the overlap with another bounding box. The result may be empty.
    ///
    /// * `other` - The other bounding box.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.max(&other.p_min),
            p_max: self.p_max.min(&other.p_max),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Bounds2<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.p_min, self.p_max)
    }
}

impl<T: fmt::Debug> fmt::Debug for Bounds2<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bounds2")
            .field("p_min", &self.p_min)
            .field("p_max", &self.p_max)
            .finish()
    }
}

/// Iterator over the pixels of a `Bounds2i` in row-major order.
pub struct Bounds2iIterator {
    /// The iterator that will supply points.
    p: Product<Range<Int>, Range<Int>>,
}

impl IntoIterator for Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2iIterator;

    /// Create an iterator for `Bounds2i`. Empty bounds yield nothing.
    fn into_iter(self) -> Self::IntoIter {
        let (max_x, max_y) = if self.is_empty() {
            (self.p_min.x, self.p_min.y)
        } else {
            (self.p_max.x, self.p_max.y)
        };
        Bounds2iIterator {
            p: iproduct!(self.p_min.y..max_y, self.p_min.x..max_x),
        }
    }
}

impl Iterator for Bounds2iIterator {
    type Item = Point2i;

    /// Get the next point.
    fn next(&mut self) -> Option<Self::Item> {
        self.p.next().map(|(y, x)| Point2i::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn iterating_empty_bounds2i_returns_none() {
        let b = Bounds2::new(Point2::new(3, 3), Point2::new(3, 7));
        assert!(b.into_iter().next().is_none());
    }

    #[test]
    fn iteration_is_row_major() {
        let b = Bounds2::new(Point2::new(0, 0), Point2::new(2, 2));
        let pts: Vec<Point2i> = b.into_iter().collect();
        assert_eq!(
            pts,
            vec![Point2::new(0, 0), Point2::new(1, 0), Point2::new(0, 1), Point2::new(1, 1)]
        );
    }

    #[test]
    fn intersection_clips_to_overlap() {
        let a = Bounds2::new(Point2::new(0, 0), Point2::new(16, 16));
        let b = Bounds2::new(Point2::new(8, 4), Point2::new(20, 10));
        let c = a.intersect(&b);
        assert_eq!(c.p_min, Point2::new(8, 4));
        assert_eq!(c.p_max, Point2::new(16, 10));
        assert_eq!(c.area(), 48);
    }

    proptest! {
        #[test]
        fn bounds2i_sorts_x_and_y_components(
            x1 in -100..100i32, y1 in -100..100i32, x2 in -100..100i32, y2 in -100..100i32,
        ) {
            let p1 = Point2::new(x1, y1);
            let p2 = Point2::new(x2, y2);
            let b1 = Bounds2::new(p1, p2);
            let b2 = Bounds2::new(p2, p1);
            prop_assert_eq!(b1, b2);
            prop_assert_eq!(b1.p_min, Point2::new(min(x1, x2), min(y1, y2)));
            prop_assert_eq!(b1.p_max, Point2::new(max(x1, x2), max(y1, y2)));
        }

        #[test]
        fn iteration_visits_area_points_inside_bounds(
            x in -20..20i32, y in -20..20i32, dx in 0..8i32, dy in 0..8i32,
        ) {
            let b = Bounds2::new(Point2::new(x, y), Point2::new(x + dx, y + dy));
            let pts: Vec<Point2i> = b.into_iter().collect();
            prop_assert_eq!(pts.len() as i32, b.area());
            prop_assert!(pts.iter().all(|p| b.contains_exclusive(p)));
        }
    }
}
