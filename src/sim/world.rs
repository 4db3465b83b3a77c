//! World: the authoritative game state and the only place actions happen.
//!
//! ## Ownership
//!
//!   - `players`: control order; index 0 is the active player for every action
//!   - `enemies`: exactly the enemies placed on the map
//!   - `items`  : exactly the items lying on the map
//!   - `map`    : occupancy + fog, owned here and driven through `WorldMap`
//!
//! ## Action protocol
//!
//! Every action method validates, delegates to the map / combat resolver,
//! mutates the collections, records `last_action` / `last_action_pos`, then
//! notifies observers once. Rejected actions change nothing and notify no one.
//!
//! `World` is not meant for concurrent action dispatch: actions take
//! `&mut self`, so a caller that shares one across threads must serialize
//! access itself. Only the observer registry is safe to touch from
//! anywhere, including from inside a notification.

use std::fmt;
use std::sync::Arc;

use crate::domain::entity::{Enemy, EntityId, Fightable, IdAllocator, Player};
use crate::domain::item::{GameItem, ItemKind, PotionKind};
use crate::domain::position::{Direction, Position};
use super::audio::{AudioSink, SilentAudio, SoundClip};
use super::combat::{BattleResult, CombatResolver, ExchangeResolver};
use super::error::WorldError;
use super::event::{Action, AttackOutcome};
use super::map::{GridMap, WorldMap};
use super::observer::{ObserverRegistry, WorldObserver};

/// Index of the player every action applies to.
const ACTIVE_PLAYER: usize = 0;

pub struct World<M: WorldMap = GridMap> {
    players: Vec<Player>,
    enemies: Vec<Enemy>,
    items: Vec<GameItem>,
    map: M,

    battle_results: Vec<BattleResult>,
    last_action: Option<Action>,
    last_action_pos: Option<Position>,

    observers: ObserverRegistry,
    combat: Box<dyn CombatResolver>,
    audio: Box<dyn AudioSink>,
    ids: IdAllocator,
}

// ── Construction ──

impl<M: WorldMap> World<M> {
    /// Build a world and place every entity on `map` at its own position.
    /// Uses `ExchangeResolver` and silent audio until told otherwise.
    pub fn new(
        mut players: Vec<Player>,
        mut enemies: Vec<Enemy>,
        mut items: Vec<GameItem>,
        mut map: M,
    ) -> Result<Self, WorldError> {
        if players.is_empty() {
            return Err(WorldError::NoPlayers);
        }
        for p in &mut players {
            let at = p.position;
            map.add_entity(at, p)?;
        }
        for e in &mut enemies {
            let at = e.position;
            map.add_entity(at, e)?;
        }
        for i in &mut items {
            let at = i.position;
            map.add_entity(at, i)?;
        }
        if let Some(p) = players.get(ACTIVE_PLAYER) {
            map.reveal_nearby(p.position);
        }

        let ids = IdAllocator::after(
            players.iter().map(|p| &p.id)
                .chain(enemies.iter().map(|e| &e.id))
                .chain(items.iter().map(|i| &i.id)),
        );

        tracing::debug!(
            "world created: {} players, {} enemies, {} items",
            players.len(), enemies.len(), items.len(),
        );

        Ok(World {
            players,
            enemies,
            items,
            map,
            battle_results: Vec::new(),
            last_action: None,
            last_action_pos: None,
            observers: ObserverRegistry::new(),
            combat: Box::new(ExchangeResolver),
            audio: Box::new(SilentAudio),
            ids,
        })
    }

    pub fn with_combat(mut self, combat: impl CombatResolver + 'static) -> Self {
        self.combat = Box::new(combat);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }
}

// ── Read accessors ──

impl<M: WorldMap> World<M> {
    pub fn players(&self) -> &[Player] { &self.players }
    pub fn active_player(&self) -> &Player { &self.players[ACTIVE_PLAYER] }
    pub fn enemies(&self) -> &[Enemy] { &self.enemies }
    pub fn items(&self) -> &[GameItem] { &self.items }
    pub fn map(&self) -> &M { &self.map }
    pub fn battle_results(&self) -> &[BattleResult] { &self.battle_results }
    pub fn last_action(&self) -> Option<Action> { self.last_action }
    pub fn last_action_pos(&self) -> Option<Position> { self.last_action_pos }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn item(&self, id: EntityId) -> Option<&GameItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn enemy_at(&self, pos: Position) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.position == pos)
    }

    pub fn item_at(&self, pos: Position) -> Option<&GameItem> {
        self.items.iter().find(|i| i.position == pos)
    }
}

// ── Observers ──

impl<M: WorldMap> World<M> {
    pub fn register_observer(&self, observer: Arc<dyn WorldObserver>) {
        self.observers.register(observer);
    }

    pub fn unregister_observer(&self, observer: &Arc<dyn WorldObserver>) {
        self.observers.unregister(observer);
    }

    /// Handle for observers that need to (un)register from inside a callback.
    pub fn observers(&self) -> ObserverRegistry {
        self.observers.clone()
    }

    fn notify_observers(&self) {
        let called = self.observers.notify();
        tracing::trace!("notified {} observers", called);
    }

    fn record(&mut self, action: Action, pos: Position) {
        self.last_action = Some(action);
        self.last_action_pos = Some(pos);
    }
}

// ── Actions ──

impl<M: WorldMap> World<M> {
    /// Collect an item lying on the map. Potions go to the active player's
    /// inventory, treasure is cashed in immediately.
    ///
    /// `None`, or an id no longer in the world (already collected), is a
    /// no-op returning `false`. The item need not be under the player.
    pub fn pick_up_item(&mut self, item: Option<EntityId>) -> bool {
        let Some(id) = item else { return false };
        let Some(idx) = self.items.iter().position(|i| i.id == id) else {
            tracing::debug!("pickup ignored: item {} not in world", id);
            return false;
        };

        let item = self.items.remove(idx);
        self.map.remove_entity(&item);
        let at = item.position;

        let player = &mut self.players[ACTIVE_PLAYER];
        match item.kind {
            ItemKind::Potion(_) => {
                tracing::debug!("{} stows a {}", player.name, item.name());
                player.add_to_inventory(item);
            }
            ItemKind::Treasure { value } => {
                player.update_treasure_points(value);
                tracing::debug!("{} collects {} treasure points", player.name, value);
                self.audio.play(SoundClip::Treasure);
            }
        }

        self.record(Action::Pickup, at);
        self.notify_observers();
        true
    }

    /// Drink a potion from the active player's inventory. The player decides
    /// whether the potion can be used; a refusal changes nothing.
    pub fn use_item(&mut self, item: Option<&GameItem>) -> bool {
        let Some(item) = item else { return false };

        let player = &mut self.players[ACTIVE_PLAYER];
        let used = match item.kind {
            ItemKind::Potion(PotionKind::Healing) => {
                let ok = player.use_potion();
                self.audio.play(SoundClip::DrinkPotion);
                ok
            }
            ItemKind::Potion(PotionKind::Power) => {
                let ok = player.use_power_potion();
                self.audio.play(SoundClip::DrinkPotion);
                ok
            }
            ItemKind::Treasure { .. } => false,
        };

        if !used {
            tracing::info!("Can't use {}", item.display_symbol());
            return false;
        }

        let at = player.position;
        self.map.reveal_nearby(at);
        self.record(Action::Pickup, at);
        self.notify_observers();
        true
    }

    /// One combat exchange between the active player and `enemy`.
    ///
    /// The result is always logged. If the player dies, the call ends there:
    /// an enemy killed in the same exchange stays in the world and drops no
    /// loot. Otherwise a dead enemy is replaced on the map by its loot; if the
    /// loot cannot be created or placed, the enemy stays where it fell and the
    /// error is returned.
    pub fn attack(&mut self, enemy: EntityId) -> Result<AttackOutcome, WorldError> {
        let idx = self
            .enemies
            .iter()
            .position(|e| e.id == enemy)
            .ok_or(WorldError::UnknownEnemy(enemy))?;

        let player = &mut self.players[ACTIVE_PLAYER];
        if let Some(clip) = SoundClip::attack_for(&player.class) {
            self.audio.play(clip);
        }

        let foe = &mut self.enemies[idx];
        let result = self.combat.resolve(player, foe);
        tracing::debug!("battle: {}", result);
        self.battle_results.push(result);

        let foe_pos = foe.position;
        self.last_action = Some(Action::Combat);
        self.last_action_pos = Some(foe_pos);

        if !foe.is_dead() {
            if let Some(clip) = SoundClip::retaliation_for(foe.kind) {
                self.audio.play(clip);
            }
        }

        if player.is_dead() {
            tracing::warn!("Game Over! {} was defeated.", player.name);
            self.audio.play(SoundClip::GameOver);
            self.notify_observers();
            return Ok(AttackOutcome::PlayerDefeated);
        }

        let mut outcome = AttackOutcome::Exchanged;
        if foe.is_dead() {
            tracing::info!("{} defeated!", foe.description());
            self.audio.play(SoundClip::EnemyDie);

            // The enemy leaves the world only once its loot is on the map.
            let loot_id = self.ids.allocate().ok_or(WorldError::IdsExhausted)?;
            let mut loot = foe.defeat(loot_id);
            let at = foe.position;
            self.map.remove_entity(&*foe);
            if let Err(e) = self.map.add_entity(at, &mut loot) {
                if let Err(restore) = self.map.add_entity(at, foe) {
                    tracing::error!("could not put enemy {} back at {}: {}", enemy, at, restore);
                }
                return Err(e.into());
            }
            self.enemies.remove(idx);
            self.items.push(loot);
            outcome = AttackOutcome::EnemyDefeated { loot: loot_id };
        }

        let at = self.players[ACTIVE_PLAYER].position;
        self.map.reveal_nearby(at);
        self.notify_observers();
        Ok(outcome)
    }

    /// Step the active player to an orthogonally adjacent cell.
    /// Anything else (same cell, diagonal, further away) is refused outright;
    /// the map decides whether the step itself is allowed.
    pub fn move_player(&mut self, to: Position) -> bool {
        let from = self.players[ACTIVE_PLAYER].position;
        let Some(dir) = Direction::between(from, to) else {
            tracing::debug!("move refused: {} -> {} is not a single step", from, to);
            return false;
        };

        let player = &mut self.players[ACTIVE_PLAYER];
        if !self.map.move_entity(player, dir) {
            tracing::debug!("move {} blocked at {}", dir.name(), to);
            return false;
        }

        let now = player.position;
        self.record(Action::Move, to);
        self.map.reveal_nearby(now);
        self.audio.play(SoundClip::Footsteps);
        self.notify_observers();
        true
    }
}

impl<M: WorldMap> fmt::Display for World<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Game World Summary ===")?;
        writeln!(f, "Players: {}", self.players.len())?;
        writeln!(f, "Enemies: {}", self.enemies.len())?;
        writeln!(f, "Items:   {}", self.items.len())?;
        writeln!(f, "Map:     {}", self.map)
    }
}
