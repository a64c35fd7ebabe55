/// An axis-aligned rectangle in packing space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub pos: (u32, u32),
    pub size: (u32, u32),
}

impl Rect {
    #[inline]
    pub fn new(pos: (u32, u32), size: (u32, u32)) -> Self {
        Self { pos, size }
    }

    /// The exclusive bottom-right corner of the rectangle.
    #[inline]
    pub fn max(&self) -> (u32, u32) {
        (self.pos.0 + self.size.0, self.pos.1 + self.size.1)
    }

    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.size.0) * u64::from(self.size.1)
    }

    /// Tells whether a block of the given size fits inside this rectangle.
    #[inline]
    pub fn fits(&self, size: (u32, u32)) -> bool {
        size.0 <= self.size.0 && size.1 <= self.size.1
    }

    pub fn contains(&self, other: &Rect) -> bool {
        let (max_x, max_y) = self.max();
        let (other_max_x, other_max_y) = other.max();

        other.pos.0 >= self.pos.0
            && other.pos.1 >= self.pos.1
            && other_max_x <= max_x
            && other_max_y <= max_y
    }

    /// Tells whether two rectangles share any area. Rectangles that only
    /// touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.area() == 0 || other.area() == 0 {
            return false;
        }

        let (max_x, max_y) = self.max();
        let (other_max_x, other_max_y) = other.max();

        self.pos.0 < other_max_x
            && other.pos.0 < max_x
            && self.pos.1 < other_max_y
            && other.pos.1 < max_y
    }
}
