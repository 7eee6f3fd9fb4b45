//! Level-gated tables used to pick the archetype of each wave enemy.

use road_rush_core::{Archetype, ConfigError, SpawnTableRevision};

/// Single cumulative threshold of a [`SpawnTable`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRule {
    /// Archetype produced when the rule matches.
    pub archetype: Archetype,
    /// Lowest level at which the rule applies.
    pub min_level: u32,
    /// Exclusive upper bound on the roll for the rule to match.
    pub below: f32,
}

impl SpawnRule {
    /// Creates a rule matching rolls under `below` from `min_level` on.
    #[must_use]
    pub const fn new(archetype: Archetype, min_level: u32, below: f32) -> Self {
        Self {
            archetype,
            min_level,
            below,
        }
    }

    fn matches(&self, level: u32, roll: f32) -> bool {
        level >= self.min_level && roll < self.below
    }
}

/// Ordered rules checked first to last, with a fallback for unmatched rolls.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnTable {
    rules: Vec<SpawnRule>,
    fallback: Archetype,
}

impl SpawnTable {
    /// Builds a table, rejecting one without a usable rule.
    pub fn new(rules: Vec<SpawnRule>, fallback: Archetype) -> Result<Self, ConfigError> {
        let usable = rules
            .iter()
            .any(|rule| rule.below > 0.0 && rule.below <= 1.0);
        if !usable {
            return Err(ConfigError::EmptySpawnTable);
        }
        Ok(Self { rules, fallback })
    }

    /// One of the tables shipped with the game.
    #[must_use]
    pub fn for_revision(revision: SpawnTableRevision) -> Self {
        let rules = match revision {
            SpawnTableRevision::Classic => vec![
                SpawnRule::new(Archetype::Armored, 4, 0.15),
                SpawnRule::new(Archetype::Shooter, 3, 0.25),
                SpawnRule::new(Archetype::Blocker, 2, 0.35),
                SpawnRule::new(Archetype::Chaser, 1, 0.6),
            ],
            SpawnTableRevision::Rammer => vec![
                SpawnRule::new(Archetype::Armored, 4, 0.12),
                SpawnRule::new(Archetype::Rammer, 3, 0.22),
                SpawnRule::new(Archetype::Shooter, 3, 0.32),
                SpawnRule::new(Archetype::Blocker, 2, 0.42),
                SpawnRule::new(Archetype::Chaser, 1, 0.65),
            ],
        };
        Self {
            rules,
            fallback: Archetype::Motorcycle,
        }
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[SpawnRule] {
        &self.rules
    }

    /// Archetype for a roll in `0..1` at the given one-based level.
    #[must_use]
    pub fn pick(&self, level: u32, roll: f32) -> Archetype {
        self.rules
            .iter()
            .find(|rule| rule.matches(level, roll))
            .map_or(self.fallback, |rule| rule.archetype)
    }
}

impl Default for SpawnTable {
    fn default() -> Self {
        Self::for_revision(SpawnTableRevision::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_only_sees_chasers_and_motorcycles() {
        let table = SpawnTable::default();
        assert_eq!(table.pick(1, 0.0), Archetype::Chaser);
        assert_eq!(table.pick(1, 0.59), Archetype::Chaser);
        assert_eq!(table.pick(1, 0.6), Archetype::Motorcycle);
    }

    #[test]
    fn later_levels_unlock_heavier_archetypes() {
        let table = SpawnTable::for_revision(SpawnTableRevision::Classic);
        assert_eq!(table.pick(2, 0.3), Archetype::Blocker);
        assert_eq!(table.pick(3, 0.2), Archetype::Shooter);
        assert_eq!(table.pick(4, 0.1), Archetype::Armored);
        assert_eq!(table.pick(3, 0.1), Archetype::Shooter);
    }

    #[test]
    fn rammer_revision_gates_rammers_at_level_three() {
        let table = SpawnTable::for_revision(SpawnTableRevision::Rammer);
        assert_eq!(table.pick(2, 0.2), Archetype::Blocker);
        assert_eq!(table.pick(3, 0.2), Archetype::Rammer);
        assert_eq!(table.pick(5, 0.7), Archetype::Motorcycle);
    }

    #[test]
    fn tables_without_usable_rules_are_rejected() {
        assert_eq!(
            SpawnTable::new(Vec::new(), Archetype::Chaser),
            Err(ConfigError::EmptySpawnTable)
        );
        assert_eq!(
            SpawnTable::new(
                vec![SpawnRule::new(Archetype::Chaser, 1, 0.0)],
                Archetype::Chaser
            ),
            Err(ConfigError::EmptySpawnTable)
        );
        assert!(SpawnTable::new(
            vec![SpawnRule::new(Archetype::Rammer, 1, 0.5)],
            Archetype::Chaser
        )
        .is_ok());
    }
}
