//! LevelGrid — world ↔ grid конвертация + occupancy + walkability
//!
//! Occupancy хранится в обе стороны (cell → units, unit → cell).
//! Каждая мутация оставляет обе карты согласованными.
//! "Не больше одного юнита на клетку" — правило валидации движения, здесь не проверяется.

use std::collections::{BTreeMap, BTreeSet};

use bevy::prelude::*;

use super::GridPosition;
use crate::config::GridConfig;

#[derive(Resource, Debug, Clone)]
pub struct LevelGrid {
    width: i32,
    height: i32,
    cell_size: f32,
    /// cell → units (non-owning handles, порядок добавления)
    cells: BTreeMap<GridPosition, Vec<Entity>>,
    /// unit → cell (обратная сторона occupancy)
    unit_cells: BTreeMap<Entity, GridPosition>,
    /// Pathfinding-cost interop: клетки, закрытые препятствиями
    unwalkable: BTreeSet<GridPosition>,
}

impl Default for LevelGrid {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

impl LevelGrid {
    /// `cell_size` must be > 0 (SimulationConfig::validate guarantees it for configs)
    pub fn new(width: u32, height: u32, cell_size: f32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            cell_size,
            cells: BTreeMap::new(),
            unit_cells: BTreeMap::new(),
            unwalkable: BTreeSet::new(),
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.width, config.height, config.cell_size)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World → cell. Клетки центрированы на кратных cell_size (round, не floor).
    pub fn world_to_grid(&self, position: Vec3) -> GridPosition {
        GridPosition::new(
            (position.x / self.cell_size).round() as i32,
            (position.z / self.cell_size).round() as i32,
        )
    }

    /// Cell → world center (y = 0)
    pub fn grid_to_world(&self, position: GridPosition) -> Vec3 {
        Vec3::new(
            position.x as f32 * self.cell_size,
            0.0,
            position.z as f32 * self.cell_size,
        )
    }

    pub fn is_valid_grid_position(&self, position: GridPosition) -> bool {
        position.x >= 0 && position.z >= 0 && position.x < self.width && position.z < self.height
    }

    /// Register `unit` at `position`.
    ///
    /// Если unit уже числится в другой клетке — старая запись убирается,
    /// чтобы unit → cell осталось функцией.
    pub fn add_unit(&mut self, position: GridPosition, unit: Entity) {
        if let Some(previous) = self.unit_cells.get(&unit).copied() {
            if previous == position {
                return;
            }
            crate::log_warning(&format!(
                "LevelGrid::add_unit: {:?} already tracked at ({}), relocating to ({})",
                unit, previous, position
            ));
            self.detach(previous, unit);
        }

        self.cells.entry(position).or_default().push(unit);
        self.unit_cells.insert(unit, position);
    }

    /// Returns false (and logs) if `position` does not hold `unit`.
    pub fn remove_unit(&mut self, position: GridPosition, unit: Entity) -> bool {
        if !self.units_at(position).contains(&unit) {
            crate::log_warning(&format!(
                "LevelGrid::remove_unit: {:?} is not at ({})",
                unit, position
            ));
            return false;
        }

        self.detach(position, unit);
        true
    }

    /// Move `unit` from `from` to `to`.
    ///
    /// Stale `from` (unit там не стоит) → warning + no-op, возвращает false.
    pub fn move_unit(&mut self, unit: Entity, from: GridPosition, to: GridPosition) -> bool {
        if !self.units_at(from).contains(&unit) {
            crate::log_warning(&format!(
                "LevelGrid::move_unit: {:?} is not at source cell ({}), move to ({}) ignored",
                unit, from, to
            ));
            return false;
        }

        if from == to {
            return true;
        }

        self.detach(from, unit);
        self.cells.entry(to).or_default().push(unit);
        self.unit_cells.insert(unit, to);
        true
    }

    /// First unit registered at `position`
    pub fn unit_at(&self, position: GridPosition) -> Option<Entity> {
        self.units_at(position).first().copied()
    }

    pub fn units_at(&self, position: GridPosition) -> &[Entity] {
        self.cells.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_any_unit(&self, position: GridPosition) -> bool {
        !self.units_at(position).is_empty()
    }

    /// Cell currently holding `unit`
    pub fn cell_of(&self, unit: Entity) -> Option<GridPosition> {
        self.unit_cells.get(&unit).copied()
    }

    pub fn unit_count(&self) -> usize {
        self.unit_cells.len()
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.cells.keys().copied()
    }

    pub fn set_walkable(&mut self, position: GridPosition, walkable: bool) {
        if walkable {
            self.unwalkable.remove(&position);
        } else {
            self.unwalkable.insert(position);
        }
    }

    /// Out-of-bounds клетки всегда непроходимы
    pub fn is_walkable(&self, position: GridPosition) -> bool {
        self.is_valid_grid_position(position) && !self.unwalkable.contains(&position)
    }

    /// Both directions of the occupancy map agree
    pub fn is_consistent(&self) -> bool {
        let forward = self
            .cells
            .iter()
            .all(|(cell, units)| !units.is_empty() && units.iter().all(|unit| self.unit_cells.get(unit) == Some(cell)));
        let backward = self
            .unit_cells
            .iter()
            .all(|(unit, cell)| self.units_at(*cell).iter().filter(|u| *u == unit).count() == 1);

        forward && backward
    }

    fn detach(&mut self, position: GridPosition, unit: Entity) {
        if let Some(units) = self.cells.get_mut(&position) {
            units.retain(|u| *u != unit);
            if units.is_empty() {
                self.cells.remove(&position);
            }
        }
        if self.unit_cells.get(&unit) == Some(&position) {
            self.unit_cells.remove(&unit);
        }
    }
}
