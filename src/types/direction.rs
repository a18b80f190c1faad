//! Direction and axis types for face and rotation handling.

use serde::{Deserialize, Serialize};

/// A face of the unit block, also used as a cull direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "bottom")]
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// All six directions in bucket order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Index of this direction into per-direction tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name as used in model and blockstate JSON.
    pub fn name(self) -> &'static str {
        ["down", "up", "north", "south", "west", "east"][self.index()]
    }

    /// Unit normal pointing out of the face.
    pub fn normal(&self) -> [f32; 3] {
        const NORMALS: [[f32; 3]; 6] = [
            [0.0, -1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, -1.0],
            [0.0, 0.0, 1.0],
            [-1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
        ];
        NORMALS[self.index()]
    }

    /// Direction closest to a (not necessarily unit) vector.
    pub fn from_vector(v: [f32; 3]) -> Direction {
        let [x, y, z] = v;
        if x.abs() >= y.abs() && x.abs() >= z.abs() {
            if x >= 0.0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if y.abs() >= z.abs() {
            if y >= 0.0 {
                Direction::Up
            } else {
                Direction::Down
            }
        } else if z >= 0.0 {
            Direction::South
        } else {
            Direction::North
        }
    }

    pub fn opposite(&self) -> Direction {
        // Opposite faces are adjacent in ALL.
        Direction::ALL[self.index() ^ 1]
    }

    pub fn axis(&self) -> Axis {
        [Axis::Y, Axis::Z, Axis::X][self.index() / 2]
    }

    /// Quarter turns about X. Seen from +X, a positive turn takes
    /// up to north, north to down.
    pub fn rotate_x(self, degrees: i32) -> Direction {
        const CYCLE: [Direction; 4] = [
            Direction::Up,
            Direction::North,
            Direction::Down,
            Direction::South,
        ];
        self.turn(&CYCLE, degrees)
    }

    /// Quarter turns about Y. Seen from above, a positive turn takes
    /// north to east, east to south.
    pub fn rotate_y(self, degrees: i32) -> Direction {
        const CYCLE: [Direction; 4] = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];
        self.turn(&CYCLE, degrees)
    }

    fn turn(self, cycle: &[Direction; 4], degrees: i32) -> Direction {
        let steps = (degrees / 90).rem_euclid(4) as usize;
        match cycle.iter().position(|&d| d == self) {
            Some(i) => cycle[(i + steps) % 4],
            None => self,
        }
    }

    /// Rotate by a variant transform: X first, then Y.
    pub fn rotate_by_transform(self, x_rot: i32, y_rot: i32) -> Direction {
        self.rotate_x(x_rot).rotate_y(y_rot)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}
