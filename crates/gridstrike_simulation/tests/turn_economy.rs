//! Turn + action points integration test
//!
//! Проверяем:
//! - Сброс action points ровно один раз на переход, только активной фракции
//! - Повторный TurnChanged того же хода не сбрасывает
//! - Переход хода обрабатывается раньше валидации действий в том же тике
//! - Отклонённые действия ничего не списывают

mod common;

use bevy::prelude::*;
use common::*;
use gridstrike_simulation::*;

fn points(app: &App, unit: Entity) -> u32 {
    app.world().get::<ActionPoints>(unit).unwrap().current()
}

fn spend(app: &mut App, unit: Entity, amount: u32) {
    let mut points = app.world_mut().get_mut::<ActionPoints>(unit).unwrap();
    assert!(points.try_spend(amount));
}

fn request(app: &mut App, unit: Entity, action: ActionKind, target: GridPosition) {
    app.world_mut().send_event(TakeActionRequest {
        unit,
        action,
        target,
    });
}

#[test]
fn test_end_turn_resets_only_new_active_faction_once() {
    let mut app = create_test_app();
    record::<ActionPointsChanged>(&mut app);
    record::<TurnChanged>(&mut app);

    let player = spawn_unit(&mut app, Faction::Player, Vec3::ZERO);
    let enemy_a = spawn_unit(&mut app, Faction::Enemy, Vec3::new(8.0, 0.0, 0.0));
    let enemy_b = spawn_unit(&mut app, Faction::Enemy, Vec3::new(8.0, 0.0, 4.0));
    run_simulation_tick(&mut app);

    spend(&mut app, player, 3);
    spend(&mut app, enemy_a, 9);
    spend(&mut app, enemy_b, 2);

    app.world_mut().send_event(EndTurnRequested);
    run_simulation_tick(&mut app);

    let clock = app.world().resource::<TurnClock>();
    assert_eq!(clock.phase(), TurnPhase::EnemyTurn);
    assert_eq!(clock.turn_number(), 2);

    assert_eq!(points(&app, enemy_a), ACTION_POINTS_MAX);
    assert_eq!(points(&app, enemy_b), ACTION_POINTS_MAX);
    assert_eq!(points(&app, player), 6, "Игрок не в своём ходу — без сброса");

    let changes = recorded::<ActionPointsChanged>(&app);
    assert_eq!(changes.len(), 2);
    assert!(changes.iter().all(|change| change.unit != player));
    assert_eq!(recorded::<TurnChanged>(&app).len(), 1);
}

#[test]
fn test_duplicate_turn_changed_is_idempotent() {
    let mut app = create_test_app();
    record::<ActionPointsChanged>(&mut app);

    let enemy = spawn_unit(&mut app, Faction::Enemy, Vec3::ZERO);
    run_simulation_tick(&mut app);

    app.world_mut().send_event(EndTurnRequested);
    run_simulation_tick(&mut app);
    let delivered = app.world().resource::<TurnClock>().turn_number();

    spend(&mut app, enemy, 4);

    // Повторная доставка того же перехода
    app.world_mut().send_event(TurnChanged {
        phase: TurnPhase::EnemyTurn,
        turn_number: delivered,
    });
    run_simulation_tick(&mut app);

    assert_eq!(points(&app, enemy), ACTION_POINTS_MAX - 4);
    assert_eq!(recorded::<ActionPointsChanged>(&app).len(), 1);
}

#[test]
fn test_turn_transition_precedes_action_validation() {
    let mut app = create_test_app();
    record::<ActionStarted>(&mut app);
    record::<ActionRejected>(&mut app);

    let player = spawn_unit(&mut app, Faction::Player, Vec3::ZERO);
    run_simulation_tick(&mut app);

    // Ход врага, игрок с нулём points
    app.world_mut().send_event(EndTurnRequested);
    run_simulation_tick(&mut app);
    spend(&mut app, player, ACTION_POINTS_MAX);

    // В одном тике: конец хода + действие игрока
    app.world_mut().send_event(EndTurnRequested);
    request(&mut app, player, ActionKind::Move, GridPosition::new(1, 0));
    run_simulation_tick(&mut app);

    assert!(recorded::<ActionRejected>(&app).is_empty());
    assert_eq!(recorded::<ActionStarted>(&app).len(), 1);
    assert_eq!(points(&app, player), ACTION_POINTS_MAX - 1);
}

#[test]
fn test_rejected_actions_spend_nothing() {
    let mut app = create_test_app();
    record::<ActionRejected>(&mut app);
    record::<ActionPointsChanged>(&mut app);

    let enemy = spawn_unit(&mut app, Faction::Enemy, Vec3::ZERO);
    let player = spawn_unit(&mut app, Faction::Player, Vec3::new(2.0, 0.0, 0.0));
    let sword_only = app
        .world_mut()
        .spawn((
            Unit::player(),
            UnitActions::new([ActionKind::Sword]),
            Transform::from_xyz(4.0, 0.0, 0.0),
        ))
        .id();
    run_simulation_tick(&mut app);

    request(&mut app, enemy, ActionKind::Shoot, GridPosition::new(1, 0));
    request(&mut app, player, ActionKind::Shoot, GridPosition::new(10, 10));
    request(&mut app, sword_only, ActionKind::Grenade, GridPosition::new(1, 0));
    run_simulation_tick(&mut app);

    let reasons: Vec<ActionRejection> = recorded::<ActionRejected>(&app)
        .iter()
        .map(|rejected| rejected.reason)
        .collect();

    assert_eq!(
        reasons,
        vec![
            ActionRejection::NotFactionTurn {
                faction: Faction::Enemy,
                phase: TurnPhase::PlayerTurn,
            },
            ActionRejection::InvalidTarget(GridPosition::new(10, 10)),
            ActionRejection::MissingCapability(ActionKind::Grenade),
        ]
    );

    for unit in [enemy, player, sword_only] {
        assert_eq!(points(&app, unit), ACTION_POINTS_MAX);
    }
    assert!(recorded::<ActionPointsChanged>(&app).is_empty());
}

#[test]
fn test_spending_down_to_zero_then_rejects() {
    let mut app = create_test_app();
    record::<ActionStarted>(&mut app);
    record::<ActionRejected>(&mut app);

    let player = spawn_unit(&mut app, Faction::Player, Vec3::ZERO);
    run_simulation_tick(&mut app);

    for _ in 0..ACTION_POINTS_MAX + 2 {
        request(&mut app, player, ActionKind::Spin, GridPosition::new(0, 0));
    }
    run_simulation_tick(&mut app);

    assert_eq!(recorded::<ActionStarted>(&app).len(), ACTION_POINTS_MAX as usize);
    assert_eq!(recorded::<ActionRejected>(&app).len(), 2);
    assert_eq!(
        recorded::<ActionRejected>(&app)[0].reason,
        ActionRejection::InsufficientActionPoints {
            required: 1,
            available: 0,
        }
    );
    assert_eq!(points(&app, player), 0);
}
