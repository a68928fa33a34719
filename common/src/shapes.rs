use rand::Rng;

/// Axis-aligned rectangle anchored at its minimum corner.
///
/// `y` grows downward, so `top()` is the minimum y edge. Extents are expected
/// to be non-negative; use [`Rectangle::normalized`] on boxes from untrusted
/// sources.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_min_max(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Like [`Rectangle::from_min_max`], but the extents are widened until
    /// `right()` and `bottom()` reach `max_x` and `max_y` exactly or beyond.
    /// `x + (max_x - x)` can round below `max_x`.
    pub fn covering(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: extent_reaching(min_x, max_x),
            height: extent_reaching(min_y, max_y),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn top_left(&self) -> (f32, f32) {
        (self.left(), self.top())
    }

    pub fn bottom_right(&self) -> (f32, f32) {
        (self.right(), self.bottom())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Moves the corner so that both extents become non-negative.
    pub fn normalized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    // Edges may touch.
    pub fn contains_rectangle(&self, inner: &Rectangle) -> bool {
        self.left() <= inner.left()
            && self.right() >= inner.right()
            && self.top() <= inner.top()
            && self.bottom() >= inner.bottom()
    }

    /// Overlap test that treats touching edges as overlapping, so zero-extent
    /// boxes still report against anything they lie on.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    pub fn expand_to_include(&mut self, other: &Rectangle) {
        let left = f32::min(self.left(), other.left());
        let right = f32::max(self.right(), other.right());
        let top = f32::min(self.top(), other.top());
        let bottom = f32::max(self.bottom(), other.bottom());
        *self = Rectangle::covering(left, top, right, bottom);
    }

    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let mut union = *self;
        union.expand_to_include(other);
        union
    }

    /// Random rectangle of the given size placed fully inside `self` when it fits.
    pub fn get_random_rectangle_inside<R: Rng>(
        &self,
        width: f32,
        height: f32,
        rng: &mut R,
    ) -> Rectangle {
        Rectangle::new(
            self._safe_randf32(rng, self.left(), self.right() - width),
            self._safe_randf32(rng, self.top(), self.bottom() - height),
            width,
            height,
        )
    }

    fn _safe_randf32<R: Rng>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        if min > max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}

// Smallest stepwise extent with `origin + extent >= target`.
fn extent_reaching(origin: f32, target: f32) -> f32 {
    let mut extent = (target - origin).max(0.0);
    let step = 2.0 * f32::EPSILON * origin.abs().max(target.abs()).max(f32::MIN_POSITIVE);
    while origin + extent < target {
        extent += step;
    }
    extent
}
