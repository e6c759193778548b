//! Pathfinding interop — walkability updates for the external pathfinder
//!
//! Сам pathfinder внешний: он читает `LevelGrid::is_walkable` и слушает `WalkabilityChanged`.

use bevy::prelude::*;

use super::{GridPosition, LevelGrid};
use crate::combat::ObstacleDestroyed;

/// Event: walkability клетки изменилась (для кэша путей внешнего pathfinder'а)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkabilityChanged {
    pub position: GridPosition,
    pub walkable: bool,
}

/// Система: уничтоженное препятствие → клетка снова проходима
pub fn reopen_destroyed_obstacle_cells(
    mut destroyed_events: EventReader<ObstacleDestroyed>,
    mut grid: ResMut<LevelGrid>,
    mut walkability_events: EventWriter<WalkabilityChanged>,
) {
    for event in destroyed_events.read() {
        grid.set_walkable(event.grid_position, true);

        walkability_events.write(WalkabilityChanged {
            position: event.grid_position,
            walkable: true,
        });

        crate::log(&format!(
            "Pathfinding: cell ({}) walkable again ({:?} destroyed)",
            event.grid_position, event.obstacle
        ));
    }
}
