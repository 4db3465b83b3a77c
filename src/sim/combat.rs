//! Combat resolution: one exchange between the active player and an enemy.
//!
//! The world only depends on `CombatResolver`. `ExchangeResolver` is the stock
//! rule set; any `FnMut(&mut Player, &mut Enemy) -> BattleResult` also works,
//! which is how scripted encounters and tests pin outcomes.

use std::fmt;

use crate::domain::entity::{Enemy, Fightable, Player};

/// Outcome of one exchange, as recorded in the world's battle log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleResult {
    pub attacker: String,
    pub defender: String,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub attacker_health: u32,
    pub defender_health: u32,
}

impl BattleResult {
    /// Snapshot both sides after damage has been applied.
    pub fn observe(attacker: &dyn Fightable, defender: &dyn Fightable, dealt: u32, taken: u32) -> Self {
        BattleResult {
            attacker: attacker.label(),
            defender: defender.label(),
            damage_dealt: dealt,
            damage_taken: taken,
            attacker_health: attacker.health(),
            defender_health: defender.health(),
        }
    }

    pub fn attacker_defeated(&self) -> bool {
        self.attacker_health == 0
    }

    pub fn defender_defeated(&self) -> bool {
        self.defender_health == 0
    }
}

impl fmt::Display for BattleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hits {} for {} ({} hp left); takes {} ({} hp left)",
            self.attacker, self.defender, self.damage_dealt, self.defender_health,
            self.damage_taken, self.attacker_health,
        )
    }
}

pub trait CombatResolver {
    fn resolve(&mut self, attacker: &mut Player, defender: &mut Enemy) -> BattleResult;
}

impl<F> CombatResolver for F
where
    F: FnMut(&mut Player, &mut Enemy) -> BattleResult,
{
    fn resolve(&mut self, attacker: &mut Player, defender: &mut Enemy) -> BattleResult {
        self(attacker, defender)
    }
}

/// Attack minus defense, never below 1.
pub fn strike_damage(attacker: &dyn Fightable, defender: &dyn Fightable) -> u32 {
    attacker.attack_power().saturating_sub(defender.defense()).max(1)
}

/// Player strikes first; a surviving enemy strikes back. A running power
/// boost is spent on the player's strike.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExchangeResolver;

impl CombatResolver for ExchangeResolver {
    fn resolve(&mut self, attacker: &mut Player, defender: &mut Enemy) -> BattleResult {
        let dealt = defender.take_damage(strike_damage(&*attacker, &*defender));
        attacker.consume_boost();

        let taken = if defender.is_dead() {
            0
        } else {
            attacker.take_damage(strike_damage(&*defender, &*attacker))
        };

        tracing::debug!(
            "combat: {} dealt {}, took {} (enemy hp {}, player hp {})",
            attacker.name, dealt, taken, defender.health(), attacker.health(),
        );
        BattleResult::observe(&*attacker, &*defender, dealt, taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{EnemyKind, EntityId, PlayerClass};
    use crate::domain::item::GameItem;
    use crate::domain::position::Position;

    fn setup() -> (Player, Enemy) {
        (
            Player::new(EntityId(0), "Ayla", PlayerClass::Warrior, Position::new(1, 1)),
            Enemy::new(EntityId(1), EnemyKind::Goblin, Position::new(1, 2)),
        )
    }

    #[test]
    fn exchange_both_sides_take_damage() {
        let (mut p, mut g) = setup();
        let r = ExchangeResolver.resolve(&mut p, &mut g);
        // warrior atk 6 - goblin def 1 = 5; goblin atk 3 - warrior def 3 -> 1
        assert_eq!(r.damage_dealt, 5);
        assert_eq!(r.damage_taken, 1);
        assert_eq!(g.health(), 5);
        assert_eq!(p.health(), 29);
        assert!(!r.defender_defeated());
    }

    #[test]
    fn dead_enemy_does_not_strike_back() {
        let (mut p, g) = setup();
        let mut g = g.with_health(3);
        let r = ExchangeResolver.resolve(&mut p, &mut g);
        assert!(r.defender_defeated());
        assert_eq!(r.damage_taken, 0);
        assert_eq!(p.health(), p.max_health());
    }

    #[test]
    fn power_boost_doubles_and_is_spent() {
        let (mut p, mut g) = setup();
        p.add_to_inventory(GameItem::power_potion(EntityId(7), Position::new(0, 0)));
        assert!(p.use_power_potion());
        let before = p.power_boost_remaining();
        let r = ExchangeResolver.resolve(&mut p, &mut g);
        assert_eq!(r.damage_dealt, 10);
        assert_eq!(p.power_boost_remaining(), before - 1);
    }

    #[test]
    fn closures_resolve_too() {
        let (mut p, mut g) = setup();
        let mut wipe = |a: &mut Player, d: &mut Enemy| {
            let dealt = d.take_damage(u32::MAX);
            BattleResult::observe(&*a, &*d, dealt, 0)
        };
        let r = wipe.resolve(&mut p, &mut g);
        assert!(r.defender_defeated());
        assert_eq!(r.defender, "Goblin");
    }
}
