//! GridPosition — дискретная клетка тактической карты

use std::fmt;
use std::ops::{Add, Sub};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Клетка сетки (x, z)
///
/// Двойная роль:
/// - компонент: последняя известная клетка юнита/ящика (пишет только lifecycle код)
/// - value/ключ: адрес клетки в `LevelGrid`
#[derive(
    Component, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Reflect,
)]
#[reflect(Component)]
pub struct GridPosition {
    pub x: i32,
    pub z: i32,
}

impl GridPosition {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Manhattan distance in cells
    pub fn distance(&self, other: GridPosition) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }
}

impl Add for GridPosition {
    type Output = GridPosition;

    fn add(self, rhs: GridPosition) -> GridPosition {
        GridPosition::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for GridPosition {
    type Output = GridPosition;

    fn sub(self, rhs: GridPosition) -> GridPosition {
        GridPosition::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x: {}; z: {}", self.x, self.z)
    }
}
