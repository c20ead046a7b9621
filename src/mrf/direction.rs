//! Border directions on the 4-connected patch grid
//!
//! Directions are ordered top, right, bottom, left so that the opposite
//! direction is always two steps away, matching the alignment rule between
//! facing patch borders.

/// One of the four grid directions, in top/right/bottom/left order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the previous grid row
    Top = 0,
    /// Toward the next grid column
    Right = 1,
    /// Toward the next grid row
    Bottom = 2,
    /// Toward the previous grid column
    Left = 3,
}

impl Direction {
    /// All directions in slot order
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The mutually opposite direction (two steps around the compass)
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Slot index used for message and neighbor storage
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row and column deltas of a step in this direction
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Top => (-1, 0),
            Self::Right => (0, 1),
            Self::Bottom => (1, 0),
            Self::Left => (0, -1),
        }
    }
}
