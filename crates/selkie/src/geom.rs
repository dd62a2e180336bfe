//! Geometry primitives shared by the store, drag and viewport code.

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;
pub type Box2 = euclid::Box2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(point(x, y), size(width, height))
}

/// `true` for values that are usable as coordinates (finite, not NaN).
pub fn is_numeric(n: f64) -> bool {
    n.is_finite()
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// A rectangular bound expressed as two corners, either absolute or parent-relative
/// depending on context.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoordinateExtent {
    pub min: Point,
    pub max: Point,
}

impl CoordinateExtent {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The unbounded extent. Clamping against it is a no-op.
    pub fn infinite() -> Self {
        Self {
            min: point(f64::NEG_INFINITY, f64::NEG_INFINITY),
            max: point(f64::INFINITY, f64::INFINITY),
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.min.x == f64::NEG_INFINITY
            && self.min.y == f64::NEG_INFINITY
            && self.max.x == f64::INFINITY
            && self.max.y == f64::INFINITY
    }

    /// Componentwise clamp of `p` into the extent.
    pub fn clamp_point(&self, p: Point) -> Point {
        point(
            clamp(p.x, self.min.x, self.max.x),
            clamp(p.y, self.min.y, self.max.y),
        )
    }

    /// Shifts both corners by `offset` (used to translate parent-relative extents into
    /// absolute space).
    pub fn translate(&self, offset: Vector) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Pulls the far corner in by `size` so that an item's far edge, not its origin point,
    /// respects the bound.
    pub fn shrink_by_size(&self, size: Size) -> Self {
        Self {
            min: self.min,
            max: point(self.max.x - size.width, self.max.y - size.height),
        }
    }
}

impl Default for CoordinateExtent {
    fn default() -> Self {
        Self::infinite()
    }
}

pub fn rect_to_box(r: Rect) -> Box2 {
    r.to_box2d()
}

pub fn box_to_rect(b: Box2) -> Rect {
    b.to_rect()
}

/// Union of two rects, as a rect.
pub fn bounds_of_rects(a: Rect, b: Rect) -> Rect {
    box_to_rect(rect_to_box(a).union(&rect_to_box(b)))
}

/// Area of the intersection of two rects; zero when they do not overlap.
pub fn overlapping_area(a: Rect, b: Rect) -> f64 {
    let x_overlap = (a.max_x().min(b.max_x()) - a.min_x().max(b.min_x())).max(0.0);
    let y_overlap = (a.max_y().min(b.max_y()) - a.min_y().max(b.min_y())).max(0.0);
    x_overlap * y_overlap
}
