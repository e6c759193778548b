//! Unit lifecycle systems: регистрация, сброс action points, синхронизация клетки, смерть

use bevy::prelude::*;

use super::{ActionPoints, ActionPointsChanged, Unit, UnitDied, UnitRegistry, UnitSpawned};
use crate::combat::HealthDepleted;
use crate::grid::{GridPosition, LevelGrid};
use crate::turn::TurnChanged;

/// Система: новые юниты → клетка, LevelGrid, UnitRegistry, UnitSpawned
pub fn register_spawned_units(
    mut spawned: Query<(Entity, &Unit, &Transform, &mut GridPosition), Added<Unit>>,
    mut grid: ResMut<LevelGrid>,
    mut registry: ResMut<UnitRegistry>,
    mut spawned_events: EventWriter<UnitSpawned>,
) {
    for (entity, unit, transform, mut grid_position) in spawned.iter_mut() {
        let cell = grid.world_to_grid(transform.translation);
        *grid_position = cell;

        grid.add_unit(cell, entity);
        registry.insert(entity, unit.faction);

        spawned_events.write(UnitSpawned {
            unit: entity,
            faction: unit.faction,
            grid_position: cell,
        });

        crate::log(&format!(
            "🪖 Unit {:?} ({:?}) spawned at ({})",
            entity, unit.faction, cell
        ));
    }
}

/// Система: TurnChanged → сброс action points активной фракции
///
/// Каждый TurnChanged несёт turn_number (generation); повторная доставка
/// того же перехода ничего не меняет. Юниты другой фракции не трогаются.
pub fn refresh_action_points_on_turn_changed(
    mut turn_events: EventReader<TurnChanged>,
    mut units: Query<(Entity, &Unit, &mut ActionPoints)>,
    mut points_events: EventWriter<ActionPointsChanged>,
) {
    for event in turn_events.read() {
        let active = event.phase.active_faction();

        for (entity, unit, mut points) in units.iter_mut() {
            if unit.faction != active {
                continue;
            }

            if points.refresh_for_turn(event.turn_number) {
                points_events.write(ActionPointsChanged {
                    unit: entity,
                    action_points: points.current(),
                });
            }
        }
    }
}

/// Система: Transform → GridPosition + LevelGrid occupancy
///
/// Пересчёт каждый тик. Клетка сменилась → move_unit(old, new).
/// Если LevelGrid не содержал юнита в старой клетке (рассинхрон),
/// move_unit логирует и возвращает false, occupancy восстанавливается add_unit.
pub fn sync_unit_grid_positions(
    mut units: Query<(Entity, &Transform, &mut GridPosition), With<Unit>>,
    mut grid: ResMut<LevelGrid>,
) {
    for (entity, transform, mut grid_position) in units.iter_mut() {
        let new_cell = grid.world_to_grid(transform.translation);
        if new_cell == *grid_position {
            continue;
        }

        let old_cell = *grid_position;
        if !grid.move_unit(entity, old_cell, new_cell) {
            grid.add_unit(new_cell, entity);
        }

        *grid_position = new_cell;
    }
}

/// Система: HealthDepleted у юнита → ordered teardown
///
/// Порядок важен:
/// 1. LevelGrid.remove_unit
/// 2. UnitRegistry.remove + despawn
/// 3. UnitDied (последним — слушатели видят уже консистентный мир)
pub fn handle_unit_deaths(
    mut commands: Commands,
    mut depleted_events: EventReader<HealthDepleted>,
    units: Query<(&Unit, &GridPosition, &Transform)>,
    mut grid: ResMut<LevelGrid>,
    mut registry: ResMut<UnitRegistry>,
    mut died_events: EventWriter<UnitDied>,
) {
    for event in depleted_events.read() {
        let Ok((unit, grid_position, transform)) = units.get(event.entity) else {
            continue; // Не юнит (ящик обрабатывается в combat domain)
        };

        if !registry.contains(event.entity) {
            continue; // Уже снят
        }

        // LevelGrid — источник истины, компонент мог разойтись
        let last_cell = grid.cell_of(event.entity).unwrap_or(*grid_position);
        if last_cell != *grid_position {
            crate::log_warning(&format!(
                "Dead unit {:?}: GridPosition ({}) diverged from grid ({})",
                event.entity, grid_position, last_cell
            ));
        }

        if !grid.remove_unit(last_cell, event.entity) {
            crate::log_warning(&format!(
                "Dead unit {:?} was not tracked at ({})",
                event.entity, last_cell
            ));
        }

        registry.remove(event.entity);
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.despawn();
        }

        died_events.write(UnitDied {
            unit: event.entity,
            faction: unit.faction,
            grid_position: last_cell,
            world_position: transform.translation,
            killer: event.source,
        });

        crate::log_info(&format!(
            "☠️ Unit {:?} ({:?}) died at ({}), killer: {:?}",
            event.entity, unit.faction, last_cell, event.source
        ));
    }
}
