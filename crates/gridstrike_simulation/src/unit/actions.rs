//! Action pipeline: TakeActionRequest → validation → spend → ActionStarted
//!
//! Порядок проверок фиксирован: faction turn → busy → capability → target → points.
//! Points списываются только если все проверки прошли.

use std::collections::BTreeSet;

use bevy::prelude::*;
use thiserror::Error;

use super::{
    ActionCompleted, ActionInProgress, ActionKind, ActionPoints, ActionPointsChanged,
    ActionRejected, ActionStarted, Faction, TakeActionRequest, Unit, UnitActions,
};
use crate::grid::{GridPosition, LevelGrid};
use crate::projectile::spawn_projectile;
use crate::turn::{TurnClock, TurnPhase};
use crate::SimulationConfig;

/// Почему действие отклонено
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRejection {
    #[error("unit is not alive")]
    UnknownUnit,

    #[error("{faction:?} cannot act during {phase:?}")]
    NotFactionTurn { faction: Faction, phase: TurnPhase },

    #[error("unit is busy with {0:?}")]
    Busy(ActionKind),

    #[error("unit has no {0:?} action")]
    MissingCapability(ActionKind),

    #[error("target cell ({0}) is outside the grid")]
    InvalidTarget(GridPosition),

    #[error("not enough action points: required {required}, available {available}")]
    InsufficientActionPoints { required: u32, available: u32 },
}

/// Pure validation. Ok(cost) → можно списывать.
#[allow(clippy::too_many_arguments)]
pub fn validate_action(
    unit: &Unit,
    actions: &UnitActions,
    points: &ActionPoints,
    busy: Option<ActionKind>,
    clock: &TurnClock,
    grid: &LevelGrid,
    action: ActionKind,
    target: GridPosition,
) -> Result<u32, ActionRejection> {
    if !clock.is_active(unit.faction) {
        return Err(ActionRejection::NotFactionTurn {
            faction: unit.faction,
            phase: clock.phase(),
        });
    }

    if let Some(current) = busy {
        return Err(ActionRejection::Busy(current));
    }

    let action = actions
        .get(action)
        .ok_or(ActionRejection::MissingCapability(action))?;

    if !grid.is_valid_grid_position(target) {
        return Err(ActionRejection::InvalidTarget(target));
    }

    let cost = action.action_point_cost();
    if !points.can_afford(cost) {
        return Err(ActionRejection::InsufficientActionPoints {
            required: cost,
            available: points.current(),
        });
    }

    Ok(cost)
}

/// Система: обработка TakeActionRequest
///
/// Grenade исполняется здесь же: юнит помечается ActionInProgress,
/// снаряд снимает маркер completion callback'ом.
/// Остальные действия только списывают points и публикуют ActionStarted.
#[allow(clippy::too_many_arguments)]
pub fn process_action_requests(
    mut commands: Commands,
    mut requests: EventReader<TakeActionRequest>,
    mut units: Query<(
        &Unit,
        &UnitActions,
        &mut ActionPoints,
        &Transform,
        Option<&ActionInProgress>,
    )>,
    clock: Res<TurnClock>,
    grid: Res<LevelGrid>,
    config: Res<SimulationConfig>,
    mut points_events: EventWriter<ActionPointsChanged>,
    mut started_events: EventWriter<ActionStarted>,
    mut rejected_events: EventWriter<ActionRejected>,
) {
    // ActionInProgress вставляется через Commands (применится после системы),
    // поэтому busy-юниты этого тика трекаются локально
    let mut busy_this_tick: BTreeSet<Entity> = BTreeSet::new();

    for request in requests.read() {
        let Ok((unit, actions, mut points, transform, in_progress)) = units.get_mut(request.unit)
        else {
            reject(&mut rejected_events, request, ActionRejection::UnknownUnit);
            continue;
        };

        let busy = in_progress.map(|marker| marker.action).or_else(|| {
            busy_this_tick
                .contains(&request.unit)
                .then_some(ActionKind::Grenade)
        });

        let cost = match validate_action(
            unit,
            actions,
            &points,
            busy,
            &clock,
            &grid,
            request.action,
            request.target,
        ) {
            Ok(cost) => cost,
            Err(reason) => {
                reject(&mut rejected_events, request, reason);
                continue;
            }
        };

        if !points.try_spend(cost) {
            // validate_action уже проверил баланс
            reject(
                &mut rejected_events,
                request,
                ActionRejection::InsufficientActionPoints {
                    required: cost,
                    available: points.current(),
                },
            );
            continue;
        }

        points_events.write(ActionPointsChanged {
            unit: request.unit,
            action_points: points.current(),
        });
        started_events.write(ActionStarted {
            unit: request.unit,
            action: request.action,
            target: request.target,
            cost,
        });

        crate::log(&format!(
            "▶️ {:?} {} → ({}), AP left: {}",
            request.unit,
            request.action.name(),
            request.target,
            points.current()
        ));

        if request.action == ActionKind::Grenade {
            start_grenade(
                &mut commands,
                &grid,
                &config,
                request.unit,
                transform.translation,
                request.target,
            );
            busy_this_tick.insert(request.unit);
        }
    }
}

fn reject(
    rejected_events: &mut EventWriter<ActionRejected>,
    request: &TakeActionRequest,
    reason: ActionRejection,
) {
    crate::log(&format!(
        "⛔ {:?} {} rejected: {}",
        request.unit,
        request.action.name(),
        reason
    ));

    rejected_events.write(ActionRejected {
        unit: request.unit,
        action: request.action,
        reason,
    });
}

/// Бросок гранаты: маркер занятости + снаряд с completion callback
fn start_grenade(
    commands: &mut Commands,
    grid: &LevelGrid,
    config: &SimulationConfig,
    thrower: Entity,
    origin: Vec3,
    target: GridPosition,
) {
    commands.entity(thrower).insert(ActionInProgress {
        action: ActionKind::Grenade,
    });

    spawn_projectile(
        commands,
        grid,
        &config.grenade,
        origin,
        target,
        Some(thrower),
        Some(Box::new(move |world: &mut World| {
            // Бросивший мог умереть, пока граната летела
            if let Ok(mut thrower_entity) = world.get_entity_mut(thrower) {
                thrower_entity.remove::<ActionInProgress>();
            }

            world.send_event(ActionCompleted {
                unit: thrower,
                action: ActionKind::Grenade,
            });
        })),
    );
}
