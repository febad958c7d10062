//! Simulation configuration.

use crate::combat::{Action, Combatant, Encounter};
use crate::service::{CharacterSheet, MonsterSheet};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// How the simulated player picks an action each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    AlwaysAttack,
    /// Hide while at or below half health, attack otherwise
    Cautious,
    Random,
}

impl Policy {
    pub fn name(self) -> &'static str {
        match self {
            Policy::AlwaysAttack => "always-attack",
            Policy::Cautious => "cautious",
            Policy::Random => "random",
        }
    }

    pub fn choose(self, encounter: &Encounter, rng: &mut impl Rng) -> Action {
        match self {
            Policy::AlwaysAttack => Action::Attack,
            Policy::Cautious => {
                let character = &encounter.character;
                if character.current_hp() * 2 <= character.max_hp() {
                    Action::Hide
                } else {
                    Action::Attack
                }
            }
            Policy::Random => Action::ALL[rng.gen_range(0..Action::ALL.len())],
        }
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always-attack" | "attack" => Ok(Policy::AlwaysAttack),
            "cautious" => Ok(Policy::Cautious),
            "random" => Ok(Policy::Random),
            other => Err(format!("unknown policy '{}'", other)),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of battles to fight
    pub num_battles: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Rounds after which a battle counts as timed out
    pub max_rounds: u32,

    pub policy: Policy,

    pub character: CharacterSheet,

    pub monster: MonsterSheet,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_battles: 1000,
            seed: None,
            max_rounds: 100,
            policy: Policy::AlwaysAttack,
            character: CharacterSheet {
                name: None,
                hp: Some(10),
                strength: Some(0),
                dexterity: Some(0),
            },
            monster: MonsterSheet {
                name: Some("Goblin".to_string()),
                hit_dice_count: Some(2),
                armor_class: Some(11),
                attack_bonus: Some(0),
                damage_expression: Some("1d6".to_string()),
            },
        }
    }
}

impl SimConfig {
    /// Quick config for comparing policies against the default goblin
    pub fn policy_comparison(policy: Policy, seed: u64) -> Self {
        Self {
            num_battles: 200,
            seed: Some(seed),
            policy,
            ..Default::default()
        }
    }

    /// A one-hit-die rat with a 1d4 bite
    pub fn rat_hunt(num_battles: u32) -> Self {
        Self {
            num_battles,
            monster: MonsterSheet {
                name: Some("Rat".to_string()),
                hit_dice_count: Some(1),
                armor_class: Some(10),
                attack_bonus: Some(0),
                damage_expression: Some("1d4".to_string()),
            },
            ..Default::default()
        }
    }
}
