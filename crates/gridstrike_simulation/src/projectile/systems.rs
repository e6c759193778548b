//! Projectile systems: spawn, полёт, взрыв

use bevy::prelude::*;

use super::{OnProjectileComplete, Projectile};
use crate::combat::{deal_damage, query_radius, AreaBodies, DamageDealt, Health, HealthDepleted};
use crate::config::GrenadeConfig;
use crate::grid::{GridPosition, LevelGrid};

/// Event: граната взорвалась (ровно один раз на снаряд)
///
/// position — точка взрыва на земле (для VFX).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ProjectileExploded {
    pub projectile: Entity,
    pub thrower: Option<Entity>,
    pub position: Vec3,
    pub grid_position: GridPosition,
    /// Живые damageable entity в радиусе, отсортированы по Entity
    pub hits: Vec<Entity>,
}

/// Spawn + launch снаряда к клетке `target`
pub fn spawn_projectile(
    commands: &mut Commands,
    grid: &LevelGrid,
    tuning: &GrenadeConfig,
    origin: Vec3,
    target: GridPosition,
    thrower: Option<Entity>,
    on_complete: Option<OnProjectileComplete>,
) -> Entity {
    let mut projectile = Projectile::new(tuning.clone(), thrower);
    if let Some(on_complete) = on_complete {
        projectile = projectile.with_on_complete(on_complete);
    }
    projectile.launch(origin, target, grid);

    let entity = commands
        .spawn((projectile, Transform::from_translation(origin)))
        .id();

    crate::log(&format!(
        "🧨 Projectile {:?} launched from {:?} → ({})",
        entity, origin, target
    ));

    entity
}

/// Система: шаг полёта, при прибытии — урон по области, событие, callback, despawn
///
/// Шаг = fixed timestep (детерминизм).
#[allow(clippy::too_many_arguments)]
pub fn advance_projectiles(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
    bodies: AreaBodies,
    mut targets: Query<&mut Health>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut depleted_events: EventWriter<HealthDepleted>,
    mut exploded_events: EventWriter<ProjectileExploded>,
) {
    let delta = time.timestep().as_secs_f32();

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        let Some(step) = projectile.advance(delta) else {
            continue;
        };

        transform.translation = step.position;

        if !step.arrived {
            continue;
        }

        let center = projectile.target_position();
        let radius = projectile.tuning().damage_radius;
        let damage = projectile.tuning().damage;
        let thrower = projectile.thrower();

        let mut hits = Vec::new();
        for target in query_radius(&bodies, center, radius) {
            // Capability lookup: только damageable
            let Ok(mut health) = targets.get_mut(target) else {
                continue;
            };

            // Убит раньше в этом тике, teardown ещё не прошёл
            if !health.is_alive() {
                continue;
            }

            hits.push(target);
            deal_damage(
                target,
                &mut health,
                damage,
                thrower,
                &mut dealt_events,
                &mut depleted_events,
            );
        }

        crate::log_info(&format!(
            "💥 Projectile {:?} exploded at ({}), hits: {}",
            entity,
            projectile.target_cell(),
            hits.len()
        ));

        exploded_events.write(ProjectileExploded {
            projectile: entity,
            thrower,
            position: center,
            grid_position: projectile.target_cell(),
            hits,
        });

        if let Some(on_complete) = projectile.take_on_complete() {
            commands.queue(move |world: &mut World| on_complete(world));
        }

        commands.entity(entity).despawn();
    }
}
