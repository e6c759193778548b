//! Simulation tick driver test
//!
//! Проверяем:
//! - Буферы событий не растут за долгую сессию
//! - Reader'ы, которые крутятся каждый тик, всё равно видят каждое событие

mod common;

use bevy::prelude::*;
use common::*;
use gridstrike_simulation::*;

const SESSION_TICKS: usize = 1000;

#[test]
fn test_event_buffers_stay_bounded_over_long_session() {
    let mut app = create_test_app();
    record::<DamageDealt>(&mut app);

    let unit = spawn_unit(&mut app, Faction::Player, Vec3::ZERO);
    run_simulation_tick(&mut app);

    for _ in 0..SESSION_TICKS {
        app.world_mut().send_event(DamageRequest {
            target: unit,
            amount: 0,
            source: None,
        });
        run_simulation_tick(&mut app);

        let world = app.world();
        assert!(world.resource::<Events<DamageRequest>>().len() <= 2);
        assert!(world.resource::<Events<DamageDealt>>().len() <= 2);
    }

    // Swap буферов не теряет событий
    assert_eq!(recorded::<DamageDealt>(&app).len(), SESSION_TICKS);
    assert_eq!(app.world().get::<Health>(unit).unwrap().current(), 100);
}

#[test]
fn test_events_written_between_ticks_are_read_once() {
    let mut app = create_test_app();
    record::<TurnChanged>(&mut app);
    run_simulation_tick(&mut app);

    app.world_mut().send_event(EndTurnRequested);
    run_ticks(&mut app, 5);

    assert_eq!(recorded::<TurnChanged>(&app).len(), 1);
    assert_eq!(
        app.world().resource::<TurnClock>().phase().active_faction(),
        Faction::Enemy
    );
}
