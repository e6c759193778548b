//! Grid domain — дискретная тактическая сетка
//!
//! Содержит:
//! - GridPosition (клетка, компонент + ключ)
//! - LevelGrid (world ↔ grid, occupancy, walkability)
//! - WalkabilityChanged (event для внешнего pathfinder'а)

use bevy::prelude::*;

pub mod level_grid;
pub mod pathfinding;
pub mod position;


pub use level_grid::LevelGrid;
pub use pathfinding::{reopen_destroyed_obstacle_cells, WalkabilityChanged};
pub use position::GridPosition;

use crate::{SimulationConfig, SimulationSet};

/// Grid Plugin
///
/// LevelGrid строится из `SimulationConfig::grid` (config должен быть вставлен раньше).
pub struct GridPlugin;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        let grid = app
            .world()
            .get_resource::<SimulationConfig>()
            .map(|config| LevelGrid::from_config(&config.grid))
            .unwrap_or_default();

        app.insert_resource(grid)
            .add_event::<WalkabilityChanged>()
            .add_systems(
                FixedUpdate,
                reopen_destroyed_obstacle_cells.in_set(SimulationSet::Pathfinding),
            );
    }
}
