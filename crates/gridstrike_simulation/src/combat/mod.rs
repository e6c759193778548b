//! Combat domain
//!
//! ECS ответственность:
//! - Health (damageable capability), применение урона
//! - Area query для взрывов
//! - Разрушаемые препятствия
//! - Events: DamageRequest, DamageDealt, HealthDepleted, ObstacleDestroyed
//!
//! Смерть юнитов (ordered teardown) — в unit domain, тут только сигнал HealthDepleted.

use bevy::prelude::*;

pub mod area;
pub mod destructible;
pub mod health;

#[cfg(test)]
mod health_tests;

pub use area::{entities_in_radius, query_radius, AreaBodies};
pub use destructible::{DestructibleCrate, ObstacleDestroyed};
pub use health::{deal_damage, DamageDealt, DamageRequest, Health, HealthDepleted};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. register_spawned_crates (Spawn) — ящики закрывают клетки
/// 2. apply_damage_requests (Damage) — DamageRequest → Health
/// 3. destroy_depleted_crates (Lifecycle) — HealthDepleted у ящиков
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<HealthDepleted>()
            .add_event::<ObstacleDestroyed>();

        app.add_systems(
            FixedUpdate,
            (
                destructible::register_spawned_crates.in_set(SimulationSet::Spawn),
                health::apply_damage_requests.in_set(SimulationSet::Damage),
                destructible::destroy_depleted_crates.in_set(SimulationSet::Lifecycle),
            ),
        );
    }
}
