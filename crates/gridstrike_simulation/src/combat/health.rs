//! Health + damage application
//!
//! Health — damageable capability: entity "damageable" ⇔ у него есть `Health`.
//! Смерть (HealthDepleted) генерируется ровно один раз — на переходе >0 → 0.

use bevy::prelude::*;

/// Здоровье (юнит или разрушаемое препятствие)
///
/// Инвариант: 0 ≤ current ≤ max. Лечения нет.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Apply damage, clamped at zero.
    ///
    /// Returns true only for the hit that took health from >0 to 0.
    /// После смерти любые вызовы — no-op.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.current == 0 {
            return false;
        }

        self.current = self.current.saturating_sub(amount);
        self.current == 0
    }

    /// current / max in [0, 1]
    pub fn health_normalized(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

/// Command: нанести урон entity (внешние исполнители действий: shoot, sword)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: u32,
    /// Кто/что нанёс урон (юнит, граната)
    pub source: Option<Entity>,
}

/// Event: урон применён
///
/// Используется для UI (health bar), звуков, эффектов.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub target: Entity,
    pub source: Option<Entity>,
    /// Фактически снятое HP (≤ запрошенного)
    pub damage: u32,
    pub health_normalized: f32,
    pub target_died: bool,
}

/// Event: health дошло до нуля (один раз на entity)
///
/// Слушатели по типу владельца: юниты (ordered teardown), ящики (destroy + walkable).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthDepleted {
    pub entity: Entity,
    pub source: Option<Entity>,
}

/// Общая точка применения урона (и для DamageRequest, и для взрывов)
///
/// Returns true if this hit killed the target.
pub fn deal_damage(
    target: Entity,
    health: &mut Health,
    amount: u32,
    source: Option<Entity>,
    dealt_events: &mut EventWriter<DamageDealt>,
    depleted_events: &mut EventWriter<HealthDepleted>,
) -> bool {
    if !health.is_alive() {
        // Урон по мёртвому — no-op
        return false;
    }

    let before = health.current();
    let died = health.take_damage(amount);

    dealt_events.write(DamageDealt {
        target,
        source,
        damage: before - health.current(),
        health_normalized: health.health_normalized(),
        target_died: died,
    });

    if died {
        depleted_events.write(HealthDepleted { entity: target, source });
        crate::log_info(&format!("💀 {:?} health depleted (source: {:?})", target, source));
    }

    died
}

/// Система: DamageRequest → Health
pub fn apply_damage_requests(
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<&mut Health>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut depleted_events: EventWriter<HealthDepleted>,
) {
    for request in requests.read() {
        // Capability lookup: нет Health → не damageable
        let Ok(mut health) = targets.get_mut(request.target) else {
            crate::log(&format!(
                "DamageRequest: {:?} has no Health, ignored",
                request.target
            ));
            continue;
        };

        deal_damage(
            request.target,
            &mut health,
            request.amount,
            request.source,
            &mut dealt_events,
            &mut depleted_events,
        );
    }
}
