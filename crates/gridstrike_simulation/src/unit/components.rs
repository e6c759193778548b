//! Unit components: Unit, Faction, ActionPoints, UnitActions

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::Health;
use crate::grid::GridPosition;

/// Максимум action points за ход
pub const ACTION_POINTS_MAX: u32 = 9;

/// Сторона конфликта
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum Faction {
    #[default]
    Player,
    Enemy,
}

impl Faction {
    pub fn opponent(self) -> Faction {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }
}

/// Юнит (игрок или враг)
///
/// Автоматически добавляет Health, ActionPoints, UnitActions, GridPosition, Transform
/// через Required Components. GridPosition заполняется при регистрации в LevelGrid.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, ActionPoints, UnitActions, GridPosition, Transform)]
pub struct Unit {
    pub faction: Faction,
}

impl Unit {
    pub fn new(faction: Faction) -> Self {
        Self { faction }
    }

    pub fn player() -> Self {
        Self::new(Faction::Player)
    }

    pub fn enemy() -> Self {
        Self::new(Faction::Enemy)
    }

    pub fn is_enemy(&self) -> bool {
        self.faction == Faction::Enemy
    }
}

/// Action points юнита
///
/// Инвариант: 0 ≤ current ≤ max.
/// `refreshed_turn` — generation последнего сброса (см. TurnClock::turn_number),
/// повторный TurnChanged того же хода не сбрасывает дважды.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ActionPoints {
    current: u32,
    max: u32,
    refreshed_turn: u32,
}

impl Default for ActionPoints {
    fn default() -> Self {
        Self::new(ACTION_POINTS_MAX)
    }
}

impl ActionPoints {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            refreshed_turn: 0,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn refreshed_turn(&self) -> u32 {
        self.refreshed_turn
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Atomic check-and-spend. Недостаточно → false, баланс не меняется.
    pub fn try_spend(&mut self, cost: u32) -> bool {
        if self.can_afford(cost) {
            self.current -= cost;
            true
        } else {
            false
        }
    }

    pub fn reset_to_max(&mut self) {
        self.current = self.max;
    }

    /// Reset for the turn generation `turn_number`.
    ///
    /// Returns false if this (or a later) generation was already applied.
    pub fn refresh_for_turn(&mut self, turn_number: u32) -> bool {
        if turn_number <= self.refreshed_turn {
            return false;
        }

        self.reset_to_max();
        self.refreshed_turn = turn_number;
        true
    }
}

/// Action capability (фиксированный набор, lookup по тегу)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Reflect)]
pub enum ActionKind {
    Move,
    Spin,
    Shoot,
    Grenade,
    Sword,
    Interact,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Move,
        ActionKind::Spin,
        ActionKind::Shoot,
        ActionKind::Grenade,
        ActionKind::Sword,
        ActionKind::Interact,
    ];

    pub fn action_point_cost(self) -> u32 {
        1
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Move => "Move",
            ActionKind::Spin => "Spin",
            ActionKind::Shoot => "Shoot",
            ActionKind::Grenade => "Grenade",
            ActionKind::Sword => "Sword",
            ActionKind::Interact => "Interact",
        }
    }
}

/// Доступные юниту действия
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct UnitActions {
    actions: Vec<ActionKind>,
}

impl Default for UnitActions {
    fn default() -> Self {
        Self::new(ActionKind::ALL)
    }
}

impl UnitActions {
    pub fn new(actions: impl IntoIterator<Item = ActionKind>) -> Self {
        let mut actions: Vec<ActionKind> = actions.into_iter().collect();
        actions.sort();
        actions.dedup();
        Self { actions }
    }

    pub fn get(&self, kind: ActionKind) -> Option<ActionKind> {
        self.actions.iter().copied().find(|action| *action == kind)
    }

    pub fn has(&self, kind: ActionKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.actions.iter().copied()
    }
}

/// Маркер: юнит выполняет длительное действие (граната в полёте)
///
/// Снимается completion callback'ом снаряда.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionInProgress {
    pub action: ActionKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_points_default_max() {
        let points = ActionPoints::default();
        assert_eq!(points.current(), ACTION_POINTS_MAX);
        assert_eq!(points.max(), 9);
    }

    #[test]
    fn test_can_afford_matches_try_spend() {
        // Для всех балансов и стоимостей: can_afford == успех try_spend
        for balance_spent in 0..=ACTION_POINTS_MAX {
            for cost in 0..=ACTION_POINTS_MAX + 3 {
                let mut points = ActionPoints::default();
                assert!(points.try_spend(balance_spent));
                let before = points.current();

                let predicted = points.can_afford(cost);
                let spent = points.try_spend(cost);

                assert_eq!(predicted, spent, "balance {} cost {}", before, cost);
                if spent {
                    assert_eq!(points.current(), before - cost);
                } else {
                    assert_eq!(points.current(), before);
                }
            }
        }
    }

    #[test]
    fn test_try_spend_never_goes_negative() {
        let mut points = ActionPoints::new(3);

        assert!(points.try_spend(2));
        assert!(!points.try_spend(2));
        assert_eq!(points.current(), 1);
        assert!(points.try_spend(1));
        assert!(!points.try_spend(1));
        assert_eq!(points.current(), 0);
    }

    #[test]
    fn test_refresh_is_idempotent_per_generation() {
        let mut points = ActionPoints::default();
        points.try_spend(5);

        assert!(points.refresh_for_turn(3));
        assert_eq!(points.current(), ACTION_POINTS_MAX);

        points.try_spend(4);
        assert!(!points.refresh_for_turn(3)); // Дубликат того же хода
        assert!(!points.refresh_for_turn(1)); // Устаревший ход
        assert_eq!(points.current(), ACTION_POINTS_MAX - 4);

        assert!(points.refresh_for_turn(5));
        assert_eq!(points.current(), ACTION_POINTS_MAX);
        assert_eq!(points.refreshed_turn(), 5);
    }

    #[test]
    fn test_unit_actions_lookup_by_tag() {
        let actions = UnitActions::new([ActionKind::Move, ActionKind::Grenade, ActionKind::Move]);

        assert_eq!(actions.get(ActionKind::Grenade), Some(ActionKind::Grenade));
        assert!(actions.has(ActionKind::Move));
        assert!(!actions.has(ActionKind::Sword));
        assert_eq!(actions.iter().count(), 2);
    }

    #[test]
    fn test_default_actions_cover_all_kinds() {
        let actions = UnitActions::default();
        for kind in ActionKind::ALL {
            assert!(actions.has(kind), "{} missing", kind.name());
        }
    }

    #[test]
    fn test_unit_faction_helpers() {
        assert!(Unit::enemy().is_enemy());
        assert!(!Unit::player().is_enemy());
        assert_eq!(Faction::Player.opponent(), Faction::Enemy);
        assert_eq!(Faction::Enemy.opponent(), Faction::Player);
    }
}
