//! Sound cues raised by the world.
//! Playback is fire-and-forget: a sink never reports back and never fails
//! the action that triggered it.

use crate::domain::entity::{EnemyKind, PlayerClass};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SoundClip {
    Treasure,
    DrinkPotion,
    WarriorAttack,
    MageAttack,
    ArcherAttack,
    GoblinAttack,
    OrcAttack,
    DragonAttack,
    GameOver,
    EnemyDie,
    Footsteps,
}

impl SoundClip {
    /// Asset name for sinks that play files.
    pub fn file_name(self) -> &'static str {
        match self {
            SoundClip::Treasure      => "treasure-sound.wav",
            SoundClip::DrinkPotion   => "drink_potion.wav",
            SoundClip::WarriorAttack => "warrior_attack.wav",
            SoundClip::MageAttack    => "mage_attack.wav",
            SoundClip::ArcherAttack  => "archer_attack.wav",
            SoundClip::GoblinAttack  => "goblin_attack.wav",
            SoundClip::OrcAttack     => "org_attack.wav",
            SoundClip::DragonAttack  => "dragon_attack.wav",
            SoundClip::GameOver      => "game_over.wav",
            SoundClip::EnemyDie      => "enemy_die.wav",
            SoundClip::Footsteps     => "footsteps.wav",
        }
    }

    /// Attack cue for a player class. Classes without one stay silent.
    pub fn attack_for(class: &PlayerClass) -> Option<SoundClip> {
        match class {
            PlayerClass::Warrior => Some(SoundClip::WarriorAttack),
            PlayerClass::Mage    => Some(SoundClip::MageAttack),
            PlayerClass::Archer  => Some(SoundClip::ArcherAttack),
            PlayerClass::Rogue   => None,
        }
    }

    /// Retaliation cue for an enemy kind. Kinds without one stay silent.
    pub fn retaliation_for(kind: EnemyKind) -> Option<SoundClip> {
        match kind {
            EnemyKind::Goblin   => Some(SoundClip::GoblinAttack),
            EnemyKind::Orc      => Some(SoundClip::OrcAttack),
            EnemyKind::Dragon   => Some(SoundClip::DragonAttack),
            EnemyKind::Skeleton => None,
        }
    }
}

pub trait AudioSink {
    fn play(&self, clip: SoundClip);
}

/// Sink that drops every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&self, clip: SoundClip) {
        tracing::trace!("audio muted: {}", clip.file_name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_tags_are_silent() {
        assert_eq!(SoundClip::attack_for(&PlayerClass::Rogue), None);
        assert_eq!(SoundClip::retaliation_for(EnemyKind::Skeleton), None);
        assert_eq!(SoundClip::attack_for(&PlayerClass::Mage), Some(SoundClip::MageAttack));
        assert_eq!(SoundClip::retaliation_for(EnemyKind::Orc).map(SoundClip::file_name), Some("org_attack.wav"));
    }
}
