//! Geometric primitives: Point, Size, Rect

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Straight-line distance to `other`.
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn max_dimension(&self) -> f32 {
        self.width.max(self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Square of side `diameter` centred on `center`.
    pub fn centered_square(center: Point, diameter: f32) -> Self {
        let half = diameter / 2.0;
        Self {
            x: center.x - half,
            y: center.y - half,
            width: diameter,
            height: diameter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn centered_square_surrounds_center() {
        let rect = Rect::centered_square(Point::new(10.0, 20.0), 8.0);
        assert_eq!(rect.x, 6.0);
        assert_eq!(rect.y, 16.0);
        assert_eq!(rect.width, 8.0);
        assert_eq!(Size::new(300.0, 120.0).max_dimension(), 300.0);
    }
}
