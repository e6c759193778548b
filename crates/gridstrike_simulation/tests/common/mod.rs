//! Shared helpers для integration тестов

#![allow(dead_code)]

use bevy::prelude::*;
use gridstrike_simulation::*;

/// Helper: полный headless App с default config
pub fn create_test_app() -> App {
    create_headless_app(SimulationConfig::default())
}

/// Helper: spawn юнита в world position
pub fn spawn_unit(app: &mut App, faction: Faction, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((Unit::new(faction), Transform::from_translation(position)))
        .id()
}

/// Helper: N тиков подряд
pub fn run_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        run_simulation_tick(app);
    }
}

/// Все события типа E, прочитанные в конце каждого тика
#[derive(Resource)]
pub struct Recorded<E: Event + Clone>(pub Vec<E>);

impl<E: Event + Clone> Default for Recorded<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

fn record_events<E: Event + Clone>(mut reader: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(reader.read().cloned());
}

/// Helper: записывать события E (после всех SimulationSet)
pub fn record<E: Event + Clone>(app: &mut App) {
    app.init_resource::<Recorded<E>>().add_systems(
        FixedUpdate,
        record_events::<E>.after(SimulationSet::Pathfinding),
    );
}

pub fn recorded<E: Event + Clone>(app: &App) -> &[E] {
    &app.world().resource::<Recorded<E>>().0
}
