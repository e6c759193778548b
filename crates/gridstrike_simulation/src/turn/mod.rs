//! Turn domain — двухфазная машина ходов (Player ↔ Enemy)
//!
//! Нет таймеров и автоматических переходов: ход заканчивает внешний код
//! через `EndTurnRequested`. Переход синхронный в пределах тика:
//! `TurnChanged` обрабатывается (сброс action points) до любых проверок действий.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::unit::Faction;
use crate::SimulationSet;

/// Активная фаза хода
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum TurnPhase {
    #[default]
    PlayerTurn,
    EnemyTurn,
}

impl TurnPhase {
    pub fn next(self) -> TurnPhase {
        match self {
            TurnPhase::PlayerTurn => TurnPhase::EnemyTurn,
            TurnPhase::EnemyTurn => TurnPhase::PlayerTurn,
        }
    }

    /// Faction that acts during this phase
    pub fn active_faction(self) -> Faction {
        match self {
            TurnPhase::PlayerTurn => Faction::Player,
            TurnPhase::EnemyTurn => Faction::Enemy,
        }
    }
}

/// Session-wide turn state
///
/// `turn_number` монотонно растёт на каждом переходе фазы и служит
/// generation-счётчиком для идемпотентного сброса action points.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct TurnClock {
    phase: TurnPhase,
    turn_number: u32,
}

impl Default for TurnClock {
    fn default() -> Self {
        Self {
            phase: TurnPhase::PlayerTurn,
            turn_number: 1,
        }
    }
}

impl TurnClock {
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn is_player_turn(&self) -> bool {
        self.phase == TurnPhase::PlayerTurn
    }

    pub fn is_active(&self, faction: Faction) -> bool {
        self.phase.active_faction() == faction
    }

    /// Flip the phase. Returns the notification to broadcast.
    pub fn end_turn(&mut self) -> TurnChanged {
        self.phase = self.phase.next();
        self.turn_number += 1;

        TurnChanged {
            phase: self.phase,
            turn_number: self.turn_number,
        }
    }
}

/// Command: закончить текущий ход
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct EndTurnRequested;

/// Event: фаза сменилась (новая фаза + её generation)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnChanged {
    pub phase: TurnPhase,
    pub turn_number: u32,
}

/// Система: EndTurnRequested → TurnClock::end_turn → TurnChanged
///
/// Каждый запрос — отдельный переход (два запроса за тик = два flip'а).
pub fn process_end_turn_requests(
    mut requests: EventReader<EndTurnRequested>,
    mut clock: ResMut<TurnClock>,
    mut turn_events: EventWriter<TurnChanged>,
) {
    for _ in requests.read() {
        let changed = clock.end_turn();

        crate::log_info(&format!(
            "🔄 Turn {}: {:?}",
            changed.turn_number, changed.phase
        ));

        turn_events.write(changed);
    }
}

/// Turn Plugin
///
/// Ставит переход хода в начало `SimulationSet::Turn`;
/// сброс action points (unit domain) идёт следом в том же сете.
pub struct TurnPlugin;

impl Plugin for TurnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TurnClock>()
            .add_event::<EndTurnRequested>()
            .add_event::<TurnChanged>()
            .add_systems(
                FixedUpdate,
                process_end_turn_requests.in_set(SimulationSet::Turn),
            );
    }
}
