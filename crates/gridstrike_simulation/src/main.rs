//! Headless симуляция GRIDSTRIKE
//!
//! Seeded skirmish без рендера: юниты по очереди бросают гранаты
//! в противника, пока одна из сторон не кончится (или лимит ходов).
//!
//! Usage: gridstrike_simulation [config.json]

use std::collections::BTreeSet;
use std::ops::Range;

use bevy::prelude::*;
use rand::Rng;

use gridstrike_simulation::{
    create_headless_app, run_simulation_tick, ActionKind, DestructibleCrate, DeterministicRng,
    EndTurnRequested, Faction, GridPosition, LevelGrid, Projectile, SimulationConfig,
    TakeActionRequest, TurnClock, Unit, UnitRegistry,
};

const MAX_TURNS: u32 = 20;
const UNITS_PER_FACTION: usize = 3;
const CRATE_COUNT: usize = 4;
/// Страховка от бесконечного полёта
const MAX_FLIGHT_TICKS: u32 = 600;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    println!(
        "Starting GRIDSTRIKE headless skirmish (seed: {})",
        config.seed
    );

    let mut app = create_headless_app(config);
    place_skirmish(&mut app);
    run_simulation_tick(&mut app);

    let mut ticks: u32 = 1;

    while app.world().resource::<TurnClock>().turn_number() <= MAX_TURNS {
        let active = app.world().resource::<TurnClock>().phase().active_faction();

        let attackers = app.world().resource::<UnitRegistry>().units_of(active);
        if attackers.is_empty() || defenders(&app, active).is_empty() {
            break;
        }

        for attacker in attackers {
            // Атакующий мог погибнуть от гранаты союзника
            if !app.world().resource::<UnitRegistry>().contains(attacker) {
                continue;
            }

            let Some(target) = pick_target(&mut app, active) else {
                break;
            };

            app.world_mut().send_event(TakeActionRequest {
                unit: attacker,
                action: ActionKind::Grenade,
                target,
            });
            run_simulation_tick(&mut app);
            ticks += 1;
            ticks += settle_projectiles(&mut app);
        }

        app.world_mut().send_event(EndTurnRequested);
        run_simulation_tick(&mut app);
        ticks += 1;
    }

    let registry = app.world().resource::<UnitRegistry>();
    let clock = app.world().resource::<TurnClock>();

    println!(
        "Skirmish over after {} turns ({} ticks): {} player / {} enemy units left",
        clock.turn_number(),
        ticks,
        registry.friendly_units().len(),
        registry.enemy_units().len()
    );
}

/// Юниты по краям сетки, ящики посередине (детерминированно от seed)
fn place_skirmish(app: &mut App) {
    let world = app.world_mut();
    let (width, height, cell_size) = {
        let grid = world.resource::<LevelGrid>();
        (grid.width(), grid.height(), grid.cell_size())
    };

    let half = (width / 2).max(1);
    let player_columns = 0..half;
    let enemy_columns = (width - half)..width;

    let mut used = BTreeSet::new();
    let mut placements: Vec<(GridPosition, Option<Faction>)> = Vec::new();

    {
        let mut rng = world.resource_mut::<DeterministicRng>();

        for (faction, columns) in [
            (Faction::Player, player_columns),
            (Faction::Enemy, enemy_columns),
        ] {
            for _ in 0..UNITS_PER_FACTION {
                if let Some(cell) = random_free_cell(&mut rng.rng, &mut used, columns.clone(), height) {
                    placements.push((cell, Some(faction)));
                }
            }
        }

        for _ in 0..CRATE_COUNT {
            if let Some(cell) = random_free_cell(&mut rng.rng, &mut used, 0..width, height) {
                placements.push((cell, None));
            }
        }
    }

    for (cell, faction) in placements {
        let translation = Vec3::new(cell.x as f32 * cell_size, 0.0, cell.z as f32 * cell_size);

        match faction {
            Some(faction) => {
                world.spawn((Unit::new(faction), Transform::from_translation(translation)));
            }
            None => {
                world.spawn(DestructibleCrate::bundle(translation));
            }
        }
    }
}

fn random_free_cell(
    rng: &mut impl Rng,
    used: &mut BTreeSet<GridPosition>,
    columns: Range<i32>,
    height: i32,
) -> Option<GridPosition> {
    for _ in 0..1000 {
        let cell = GridPosition::new(rng.gen_range(columns.clone()), rng.gen_range(0..height));
        if used.insert(cell) {
            return Some(cell);
        }
    }

    None
}

fn defenders(app: &App, active: Faction) -> Vec<Entity> {
    app.world()
        .resource::<UnitRegistry>()
        .units_of(active.opponent())
}

/// Случайный живой противник → его клетка
fn pick_target(app: &mut App, active: Faction) -> Option<GridPosition> {
    let candidates = defenders(app, active);
    if candidates.is_empty() {
        return None;
    }

    let index = app
        .world_mut()
        .resource_mut::<DeterministicRng>()
        .rng
        .gen_range(0..candidates.len());

    app.world().get::<GridPosition>(candidates[index]).copied()
}

/// Тикаем, пока все гранаты не взорвутся. Returns число тиков.
fn settle_projectiles(app: &mut App) -> u32 {
    let mut ticks = 0;

    while ticks < MAX_FLIGHT_TICKS {
        let mut projectiles = app.world_mut().query::<&Projectile>();
        if projectiles.iter(app.world()).next().is_none() {
            break;
        }

        run_simulation_tick(app);
        ticks += 1;
    }

    ticks
}
