//! Unit domain
//!
//! ECS ответственность:
//! - Unit / Faction / ActionPoints / UnitActions компоненты
//! - UnitRegistry (живые юниты по фракциям)
//! - Action pipeline (TakeActionRequest → ActionStarted / ActionRejected)
//! - Lifecycle: регистрация, синхронизация клетки, ordered teardown при смерти

use bevy::prelude::*;

pub mod actions;
pub mod components;
pub mod events;
pub mod registry;
pub mod systems;


pub use actions::{process_action_requests, validate_action, ActionRejection};
pub use components::{
    ActionInProgress, ActionKind, ActionPoints, Faction, Unit, UnitActions, ACTION_POINTS_MAX,
};
pub use events::{
    ActionCompleted, ActionPointsChanged, ActionRejected, ActionStarted, TakeActionRequest,
    UnitDied, UnitSpawned,
};
pub use registry::UnitRegistry;
pub use systems::{
    handle_unit_deaths, refresh_action_points_on_turn_changed, register_spawned_units,
    sync_unit_grid_positions,
};

use crate::turn::process_end_turn_requests;
use crate::SimulationSet;

/// Unit Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. register_spawned_units (Spawn)
/// 2. refresh_action_points_on_turn_changed (Turn, после перехода хода)
/// 3. process_action_requests (Actions)
/// 4. sync_unit_grid_positions (Movement)
/// 5. handle_unit_deaths (Lifecycle)
pub struct UnitPlugin;

impl Plugin for UnitPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UnitRegistry>()
            .register_type::<Unit>()
            .register_type::<ActionPoints>()
            .register_type::<UnitActions>()
            .add_event::<UnitSpawned>()
            .add_event::<UnitDied>()
            .add_event::<ActionPointsChanged>()
            .add_event::<TakeActionRequest>()
            .add_event::<ActionStarted>()
            .add_event::<ActionRejected>()
            .add_event::<ActionCompleted>();

        app.add_systems(
            FixedUpdate,
            (
                register_spawned_units.in_set(SimulationSet::Spawn),
                refresh_action_points_on_turn_changed
                    .after(process_end_turn_requests)
                    .in_set(SimulationSet::Turn),
                process_action_requests.in_set(SimulationSet::Actions),
                sync_unit_grid_positions.in_set(SimulationSet::Movement),
                handle_unit_deaths.in_set(SimulationSet::Lifecycle),
            ),
        );
    }
}
