//! GRIDSTRIKE Simulation Core
//!
//! Пошаговая тактика на сетке, ECS на Bevy 0.16 (headless).
//!
//! Core отвечает только за правила: сетка, ходы, action points,
//! здоровье, гранаты. Presentation (камера, UI, анимации, звук)
//! читает события и в state не пишет.

use bevy::ecs::component::Tick;
use bevy::ecs::event::EventRegistry;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod combat;
pub mod config;
pub mod grid;
pub mod logger;
pub mod projectile;
pub mod turn;
pub mod unit;

// Re-exports для удобства
pub use combat::{
    deal_damage, CombatPlugin, DamageDealt, DamageRequest, DestructibleCrate, Health,
    HealthDepleted, ObstacleDestroyed,
};
pub use config::{ConfigError, GrenadeConfig, GridConfig, SimulationConfig};
pub use grid::{GridPlugin, GridPosition, LevelGrid, WalkabilityChanged};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level,
    set_logger, set_logger_if_needed, LogLevel, LogPrinter,
};
pub use projectile::{
    spawn_projectile, ArcCurve, Projectile, ProjectileExploded, ProjectilePlugin,
    ProjectileState,
};
pub use turn::{EndTurnRequested, TurnChanged, TurnClock, TurnPhase, TurnPlugin};
pub use unit::{
    ActionCompleted, ActionInProgress, ActionKind, ActionPoints, ActionPointsChanged,
    ActionRejected, ActionRejection, ActionStarted, Faction, TakeActionRequest, Unit,
    UnitActions, UnitDied, UnitPlugin, UnitRegistry, UnitSpawned, ACTION_POINTS_MAX,
};

/// Порядок фаз внутри одного simulation tick (FixedUpdate)
///
/// Переход хода (и сброс action points) всегда раньше валидации действий.
/// Смерти обрабатываются после всего урона тика.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Регистрация новых юнитов / препятствий
    Spawn,
    /// EndTurnRequested → TurnChanged → сброс action points
    Turn,
    /// TakeActionRequest → валидация, списание, запуск гранат
    Actions,
    /// Transform → GridPosition
    Movement,
    /// Полёт снарядов, взрывы
    Projectiles,
    /// DamageRequest → Health
    Damage,
    /// Смерть юнитов, уничтожение ящиков
    Lifecycle,
    /// Walkability для внешнего pathfinder'а
    Pathfinding,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Берёт `SimulationConfig` из World, если он уже вставлен, иначе default.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        app.insert_resource(config.clone())
            // Fixed timestep (детерминированный шаг снарядов)
            .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            // Детерминистичный RNG (seed из config)
            .insert_resource(DeterministicRng::new(config.seed))
            .init_resource::<EventMaintenance>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Spawn,
                    SimulationSet::Turn,
                    SimulationSet::Actions,
                    SimulationSet::Movement,
                    SimulationSet::Projectiles,
                    SimulationSet::Damage,
                    SimulationSet::Lifecycle,
                    SimulationSet::Pathfinding,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((GridPlugin, TurnPlugin, CombatPlugin, UnitPlugin, ProjectilePlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(config)
        .add_plugins(SimulationPlugin);

    app
}

/// Change tick последнего swap'а буферов событий
///
/// То же, что `Local<Tick>` у bevy `event_update_system`.
#[derive(Resource, Default)]
struct EventMaintenance {
    last_tick: Tick,
}

/// Один simulation tick вручную (тесты, headless прогон)
///
/// FixedUpdate напрямую, без накопления реального времени.
/// После тика — swap буферов `Events<T>` (обычно это делает `First`),
/// иначе события копятся всю сессию. Событие живёт два тика,
/// reader'ы, которые крутятся каждый тик, видят все.
pub fn run_simulation_tick(app: &mut App) {
    let world = app.world_mut();
    world.run_schedule(FixedUpdate);
    update_event_buffers(world);
}

fn update_event_buffers(world: &mut World) {
    if !world.contains_resource::<EventRegistry>() {
        return;
    }

    let last_tick = world
        .get_resource::<EventMaintenance>()
        .map(|maintenance| maintenance.last_tick)
        .unwrap_or_default();

    world.resource_scope(|world, mut registry: Mut<EventRegistry>| {
        registry.run_updates(world, last_tick);
    });

    let change_tick = world.change_tick();
    world.insert_resource(EventMaintenance {
        last_tick: change_tick,
    });
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
