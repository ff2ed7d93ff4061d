//! Integer geometry used by the widget tree and the layout engine.
//!
//! All coordinates are whole device pixels. A widget position is always
//! relative to its parent; see `WidgetTree::absolute_position` in the
//! `trellis` crate for the conversion to root coordinates.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The horizontal axis.
    X,
    /// The vertical axis.
    Y,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    /// The other axis.
    pub fn cross(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Index of the axis (0 for X, 1 for Y).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// Orientation of a linear layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Children flow left to right.
    #[default]
    Horizontal,
    /// Children flow top to bottom.
    Vertical,
}

impl Orientation {
    /// The axis children are stacked along.
    pub fn main_axis(self) -> Axis {
        match self {
            Orientation::Horizontal => Axis::X,
            Orientation::Vertical => Axis::Y,
        }
    }

    /// The axis perpendicular to the stacking direction.
    pub fn cross_axis(self) -> Axis {
        self.main_axis().cross()
    }

    /// The opposite orientation.
    pub fn cross(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// A point in integer device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Component along `axis`.
    pub fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Set the component along `axis`.
    pub fn set(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }

    /// Build a point from main/cross components for the given axis.
    pub fn from_axis(axis: Axis, main: i32, cross: i32) -> Self {
        match axis {
            Axis::X => Self::new(main, cross),
            Axis::Y => Self::new(cross, main),
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A width/height pair.
///
/// In the context of fixed sizes a component of `0` means "unconstrained".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// A zero size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Component along `axis`.
    pub fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Set the component along `axis`.
    pub fn set(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::X => self.width = value,
            Axis::Y => self.height = value,
        }
    }

    /// Build a size from main/cross components for the given axis.
    pub fn from_axis(axis: Axis, main: i32, cross: i32) -> Self {
        match axis {
            Axis::X => Self::new(main, cross),
            Axis::Y => Self::new(cross, main),
        }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Replace each component of `self` by the matching component of
    /// `fixed` when that component is positive.
    ///
    /// This is the "fixed size wins" rule every layout applies.
    pub fn overridden_by(self, fixed: Size) -> Size {
        Size::new(
            if fixed.width > 0 { fixed.width } else { self.width },
            if fixed.height > 0 { fixed.height } else { self.height },
        )
    }

    /// Check if either component is zero or negative.
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from its components.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Create a rectangle from an origin and a size.
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// A rectangle at the origin with the given size.
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    pub fn left(&self) -> i32 {
        self.origin.x
    }

    pub fn top(&self) -> i32 {
        self.origin.y
    }

    pub fn right(&self) -> i32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.height
    }

    /// Inclusive containment test: points on any edge are inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// The rectangle moved by `offset`.
    pub fn translate(&self, offset: Point) -> Rect {
        Rect::from_origin_size(self.origin + offset, self.size)
    }

    /// The center point, rounded toward the origin.
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2,
            self.origin.y + self.size.height / 2,
        )
    }
}

static_assertions::assert_impl_all!(Point: Copy, Send, Sync);
static_assertions::assert_impl_all!(Size: Copy, Send, Sync);
static_assertions::assert_impl_all!(Rect: Copy, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_inclusive() {
        let r = Rect::new(10, 10, 20, 5);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(30, 15)));
        assert!(!r.contains(Point::new(31, 15)));
        assert!(!r.contains(Point::new(9, 12)));
    }

    #[test]
    fn test_fixed_size_override() {
        let preferred = Size::new(80, 24);
        assert_eq!(preferred.overridden_by(Size::ZERO), preferred);
        assert_eq!(preferred.overridden_by(Size::new(0, 40)), Size::new(80, 40));
        assert_eq!(preferred.overridden_by(Size::new(12, 0)), Size::new(12, 24));
    }

    #[test]
    fn test_axis_accessors() {
        let mut s = Size::from_axis(Axis::Y, 7, 3);
        assert_eq!(s, Size::new(3, 7));
        s.set(Axis::X, 9);
        assert_eq!(s.get(Axis::X), 9);
        assert_eq!(Orientation::Vertical.main_axis(), Axis::Y);
        assert_eq!(Orientation::Horizontal.cross_axis(), Axis::Y);
        assert_eq!(Point::from_axis(Axis::X, 1, 2), Point::new(1, 2));
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3, 4);
        let b = Point::new(1, -2);
        assert_eq!(a + b, Point::new(4, 2));
        assert_eq!(a - b, Point::new(2, 6));
        assert_eq!(-a, Point::new(-3, -4));
    }
}
