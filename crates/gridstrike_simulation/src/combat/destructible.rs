//! Destructible crates — препятствия, привязанные к клетке
//!
//! Пока стоит: клетка непроходима. Health дошло до 0 → despawn,
//! `ObstacleDestroyed`, pathfinding updater открывает клетку.

use bevy::prelude::*;

use super::{Health, HealthDepleted};
use crate::grid::{GridPosition, LevelGrid, WalkabilityChanged};

/// Разрушаемый ящик
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    GridPosition,
    Transform,
    // Без Health ящик не разрушить, клетка закрыта навсегда
    Health = Health::new(DestructibleCrate::DEFAULT_HEALTH)
)]
pub struct DestructibleCrate;

impl DestructibleCrate {
    /// Один любой урон уничтожает ящик
    pub const DEFAULT_HEALTH: u32 = 1;

    pub fn bundle(translation: Vec3) -> (DestructibleCrate, Health, Transform) {
        (
            DestructibleCrate,
            Health::new(Self::DEFAULT_HEALTH),
            Transform::from_translation(translation),
        )
    }
}

/// Event: препятствие уничтожено (entity уже в очереди на despawn)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleDestroyed {
    pub obstacle: Entity,
    pub grid_position: GridPosition,
}

/// Система: новые ящики → клетка + непроходимость
pub fn register_spawned_crates(
    mut crates: Query<(Entity, &Transform, &mut GridPosition), Added<DestructibleCrate>>,
    mut grid: ResMut<LevelGrid>,
    mut walkability_events: EventWriter<WalkabilityChanged>,
) {
    for (entity, transform, mut grid_position) in crates.iter_mut() {
        let cell = grid.world_to_grid(transform.translation);
        *grid_position = cell;
        grid.set_walkable(cell, false);

        walkability_events.write(WalkabilityChanged {
            position: cell,
            walkable: false,
        });

        crate::log(&format!("📦 Crate {:?} blocks cell ({})", entity, cell));
    }
}

/// Система: HealthDepleted у ящика → despawn + ObstacleDestroyed
pub fn destroy_depleted_crates(
    mut commands: Commands,
    mut depleted_events: EventReader<HealthDepleted>,
    crates: Query<&GridPosition, With<DestructibleCrate>>,
    mut destroyed_events: EventWriter<ObstacleDestroyed>,
) {
    for event in depleted_events.read() {
        let Ok(grid_position) = crates.get(event.entity) else {
            continue; // Не ящик (юнит обрабатывается в unit domain)
        };

        commands.entity(event.entity).despawn();

        destroyed_events.write(ObstacleDestroyed {
            obstacle: event.entity,
            grid_position: *grid_position,
        });

        crate::log_info(&format!("💥 Crate {:?} destroyed at ({})", event.entity, grid_position));
    }
}
