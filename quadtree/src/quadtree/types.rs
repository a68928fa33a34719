use common::shapes::Rectangle;
use smallvec::SmallVec;

pub(crate) const ROOT: u32 = 0;
// The root is never a child, so index 0 doubles as "no children".
pub(crate) const NO_CHILDREN: u32 = 0;
pub(crate) const NO_PARENT: u32 = u32::MAX;

pub(crate) const FLAG_LEFT: u8 = 0b0001;
pub(crate) const FLAG_BOTTOM: u8 = 0b0010;
pub(crate) const FLAG_RIGHT: u8 = 0b0100;
pub(crate) const FLAG_TOP: u8 = 0b1000;
pub(crate) const FLAG_ALL: u8 = FLAG_LEFT | FLAG_BOTTOM | FLAG_RIGHT | FLAG_TOP;

/// (node index, ancestor count) pairs.
pub(crate) type NodeStack = SmallVec<[(u32, usize); 64]>;

/// Child slot of a subdivided node, in storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    TopRight = 0,
    TopLeft = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopRight,
        Quadrant::TopLeft,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Quarter of `parent` this quadrant covers.
    pub fn bounds_within(self, parent: &Rectangle) -> Rectangle {
        let half_width = parent.width / 2.0;
        let half_height = parent.height / 2.0;
        let center_x = parent.x + half_width;
        let center_y = parent.y + half_height;
        match self {
            Quadrant::TopRight => Rectangle::new(center_x, parent.y, half_width, half_height),
            Quadrant::TopLeft => Rectangle::new(parent.x, parent.y, half_width, half_height),
            Quadrant::BottomLeft => Rectangle::new(parent.x, center_y, half_width, half_height),
            Quadrant::BottomRight => Rectangle::new(center_x, center_y, half_width, half_height),
        }
    }

    /// Root edges this quadrant touches.
    #[inline(always)]
    pub(crate) fn edge_flags(self) -> u8 {
        match self {
            Quadrant::TopRight => FLAG_RIGHT | FLAG_TOP,
            Quadrant::TopLeft => FLAG_LEFT | FLAG_TOP,
            Quadrant::BottomLeft => FLAG_LEFT | FLAG_BOTTOM,
            Quadrant::BottomRight => FLAG_RIGHT | FLAG_BOTTOM,
        }
    }

    /// The single quadrant of `bounds` fully containing `bbox`, if any.
    ///
    /// Quadrants are half-open: the right/bottom side owns the center lines.
    /// A box that merely touches a center line from the left or top stays
    /// with the parent, so boxes in sibling subtrees never touch.
    pub fn containing(bounds: &Rectangle, bbox: &Rectangle) -> Option<Quadrant> {
        if !bounds.contains_rectangle(bbox) {
            return None;
        }
        let center_x = bounds.center_x();
        let center_y = bounds.center_y();

        let left = if bbox.right() < center_x {
            true
        } else if bbox.left() >= center_x {
            false
        } else {
            return None;
        };
        let top = if bbox.bottom() < center_y {
            true
        } else if bbox.top() >= center_y {
            false
        } else {
            return None;
        };

        let quadrant = match (left, top) {
            (false, true) => Quadrant::TopRight,
            (true, true) => Quadrant::TopLeft,
            (true, false) => Quadrant::BottomLeft,
            (false, false) => Quadrant::BottomRight,
        };
        // Far child edges are recomputed from the center and may round inward.
        if quadrant.bounds_within(bounds).contains_rectangle(bbox) {
            Some(quadrant)
        } else {
            None
        }
    }
}

/// Edges of `bounds` that `bbox` crosses.
#[inline(always)]
pub(crate) fn out_of_bounds_flags(bounds: &Rectangle, bbox: &Rectangle) -> u8 {
    let mut flags = 0;
    if bbox.left() < bounds.left() {
        flags |= FLAG_LEFT;
    }
    if bbox.right() > bounds.right() {
        flags |= FLAG_RIGHT;
    }
    if bbox.top() < bounds.top() {
        flags |= FLAG_TOP;
    }
    if bbox.bottom() > bounds.bottom() {
        flags |= FLAG_BOTTOM;
    }
    flags
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Memo {
    Unknown,
    Yes,
    No,
}

/// Read-only snapshot of one node, handed out by `QuadTree::for_each_node`.
#[derive(Debug)]
pub struct NodeView<'a, H> {
    pub bounds: Rectangle,
    pub level: u32,
    pub is_leaf: bool,
    pub objects: &'a [H],
}
