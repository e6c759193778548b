//! UnitRegistry — множество живых юнитов

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::Faction;

/// Live units keyed by entity
///
/// Мутируется только lifecycle системами (регистрация / teardown).
#[derive(Resource, Debug, Clone, Default)]
pub struct UnitRegistry {
    units: BTreeMap<Entity, Faction>,
}

impl UnitRegistry {
    pub fn insert(&mut self, unit: Entity, faction: Faction) {
        self.units.insert(unit, faction);
    }

    pub fn remove(&mut self, unit: Entity) -> Option<Faction> {
        self.units.remove(&unit)
    }

    pub fn contains(&self, unit: Entity) -> bool {
        self.units.contains_key(&unit)
    }

    pub fn faction_of(&self, unit: Entity) -> Option<Faction> {
        self.units.get(&unit).copied()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// All live units, ordered by entity
    pub fn units(&self) -> impl Iterator<Item = Entity> + '_ {
        self.units.keys().copied()
    }

    pub fn units_of(&self, faction: Faction) -> Vec<Entity> {
        self.units
            .iter()
            .filter(|(_, unit_faction)| **unit_faction == faction)
            .map(|(unit, _)| *unit)
            .collect()
    }

    pub fn friendly_units(&self) -> Vec<Entity> {
        self.units_of(Faction::Player)
    }

    pub fn enemy_units(&self) -> Vec<Entity> {
        self.units_of(Faction::Enemy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lists_by_faction() {
        let mut registry = UnitRegistry::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let c = Entity::from_raw(3);

        registry.insert(a, Faction::Player);
        registry.insert(b, Faction::Enemy);
        registry.insert(c, Faction::Player);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.friendly_units(), vec![a, c]);
        assert_eq!(registry.enemy_units(), vec![b]);
        assert_eq!(registry.faction_of(b), Some(Faction::Enemy));
    }

    #[test]
    fn test_registry_remove() {
        let mut registry = UnitRegistry::default();
        let a = Entity::from_raw(1);
        registry.insert(a, Faction::Enemy);

        assert_eq!(registry.remove(a), Some(Faction::Enemy));
        assert_eq!(registry.remove(a), None);
        assert!(!registry.contains(a));
        assert!(registry.is_empty());
    }
}
