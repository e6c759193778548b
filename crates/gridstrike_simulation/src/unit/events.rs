//! Unit lifecycle + action events
//!
//! Presentation (UI, VFX, звук) только читает эти события, state не трогает.

use bevy::prelude::*;

use super::{ActionKind, ActionRejection, Faction};
use crate::grid::GridPosition;

/// Event: юнит зарегистрирован (клетка назначена, в LevelGrid и UnitRegistry)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSpawned {
    pub unit: Entity,
    pub faction: Faction,
    pub grid_position: GridPosition,
}

/// Event: юнит умер
///
/// Пишется ПОСЛЕДНИМ шагом teardown: к моменту чтения юнита уже нет
/// ни в LevelGrid, ни в UnitRegistry, entity despawned.
/// world_position — для ragdoll на стороне presentation.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct UnitDied {
    pub unit: Entity,
    pub faction: Faction,
    pub grid_position: GridPosition,
    pub world_position: Vec3,
    pub killer: Option<Entity>,
}

/// Event: баланс action points изменился (трата или сброс)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPointsChanged {
    pub unit: Entity,
    pub action_points: u32,
}

/// Command: юнит хочет выполнить действие
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakeActionRequest {
    pub unit: Entity,
    pub action: ActionKind,
    pub target: GridPosition,
}

/// Event: действие принято, points списаны
///
/// Для всех действий кроме Grenade исполнение — на внешнем коллабораторе
/// (движение, анимация, hit-scan).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionStarted {
    pub unit: Entity,
    pub action: ActionKind,
    pub target: GridPosition,
    pub cost: u32,
}

/// Event: действие отклонено (ничего не списано)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRejected {
    pub unit: Entity,
    pub action: ActionKind,
    pub reason: ActionRejection,
}

/// Event: длительное действие (граната) завершилось
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCompleted {
    pub unit: Entity,
    pub action: ActionKind,
}
