//! Area query — логический эквивалент physics overlap sphere
//!
//! Возвращает entity в радиусе (по Transform), отсортированные по Entity
//! для детерминизма. Damageable-фильтр (наличие Health) делает вызывающий.

use bevy::prelude::*;

use crate::projectile::Projectile;

/// Тела для area query: всё с Transform, кроме самих снарядов
/// (граната не задевает себя и другие гранаты в полёте).
pub type AreaBodies<'w, 's> = Query<'w, 's, (Entity, &'static Transform), Without<Projectile>>;

/// Entity из `bodies` в радиусе точки
pub fn query_radius(bodies: &AreaBodies, center: Vec3, radius: f32) -> Vec<Entity> {
    entities_in_radius(
        bodies.iter().map(|(entity, transform)| (entity, transform.translation)),
        center,
        radius,
    )
}

/// Pure overlap: distance(position, center) ≤ radius
pub fn entities_in_radius(
    bodies: impl IntoIterator<Item = (Entity, Vec3)>,
    center: Vec3,
    radius: f32,
) -> Vec<Entity> {
    let radius_sq = radius * radius;

    let mut hits: Vec<Entity> = bodies
        .into_iter()
        .filter(|(_, position)| position.distance_squared(center) <= radius_sq)
        .map(|(entity, _)| entity)
        .collect();

    // Сортируем по Entity для детерминизма
    hits.sort();
    hits
}
