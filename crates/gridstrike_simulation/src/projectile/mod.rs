//! Projectile domain (гранаты)
//!
//! Снаряд летит к центру целевой клетки, при прибытии:
//! 1. Area query по радиусу → урон каждому damageable
//! 2. ProjectileExploded (один раз)
//! 3. Completion callback (один раз)
//! 4. Despawn

use bevy::prelude::*;

pub mod arc;
pub mod components;
pub mod systems;

pub use arc::{ArcCurve, ArcKey};
pub use components::{OnProjectileComplete, Projectile, ProjectileState, ProjectileStep};
pub use systems::{advance_projectiles, spawn_projectile, ProjectileExploded};

use crate::SimulationSet;

/// Projectile Plugin
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ProjectileExploded>().add_systems(
            FixedUpdate,
            advance_projectiles.in_set(SimulationSet::Projectiles),
        );
    }
}
