use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Steps a column index one position left or right, wrapping around.
    /// Vertical directions leave the index unchanged.
    pub fn step(self, i: usize, len: usize) -> usize {
        match self {
            Direction::Left => (i + len - 1) % len,
            Direction::Right => (i + 1) % len,
            Direction::Up | Direction::Down => i,
        }
    }

    pub fn is_horizontal(self) -> bool { matches!(self, Direction::Left | Direction::Right) }
}
