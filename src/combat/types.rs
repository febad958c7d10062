use crate::core::constants::*;
use crate::dice::DiceExpr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared view over the two sides of an encounter.
pub trait Combatant {
    fn name(&self) -> &str;
    fn max_hp(&self) -> i32;
    fn current_hp(&self) -> i32;

    /// HP may dip below zero; anything at or under zero counts as down.
    fn is_defeated(&self) -> bool {
        self.current_hp() <= 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    /// Added to attack rolls
    #[serde(default)]
    pub strength: i32,
    /// Added to stealth rolls
    #[serde(default)]
    pub dexterity: i32,
}

impl Character {
    pub fn new(name: String, hp: i32) -> Self {
        Self {
            name,
            max_hp: hp,
            current_hp: hp,
            strength: 0,
            dexterity: 0,
        }
    }

    pub fn with_strength(mut self, strength: i32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_dexterity(mut self, dexterity: i32) -> Self {
        self.dexterity = dexterity;
        self
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }
}

impl Combatant for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_hp(&self) -> i32 {
        self.max_hp
    }

    fn current_hp(&self) -> i32 {
        self.current_hp
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monster {
    pub name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    pub armor_class: i32,
    pub attack_bonus: i32,
    pub damage: DiceExpr,
}

impl Monster {
    /// Creates a monster at full health with the default stat line.
    pub fn new(name: String, max_hp: i32) -> Self {
        Self {
            name,
            max_hp,
            current_hp: max_hp,
            armor_class: DEFAULT_MONSTER_ARMOR_CLASS,
            attack_bonus: 0,
            damage: DiceExpr::D6,
        }
    }

    /// Health granted by a hit-dice count; zero or missing hit dice fall back to the default.
    pub fn hp_for_hit_dice(hit_dice: Option<u32>) -> i32 {
        match hit_dice {
            Some(count) if count > 0 => {
                i32::try_from(count).map_or(i32::MAX, |c| c.saturating_mul(HP_PER_HIT_DIE))
            }
            _ => DEFAULT_MONSTER_HP,
        }
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = armor_class;
        self
    }

    pub fn with_attack_bonus(mut self, attack_bonus: i32) -> Self {
        self.attack_bonus = attack_bonus;
        self
    }

    pub fn with_damage(mut self, damage: DiceExpr) -> Self {
        self.damage = damage;
        self
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }
}

impl Combatant for Monster {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_hp(&self) -> i32 {
        self.max_hp
    }

    fn current_hp(&self) -> i32 {
        self.current_hp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterStatus {
    Ongoing,
    Won,
    Lost,
}

impl EncounterStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, EncounterStatus::Ongoing)
    }
}

/// The actions a player may choose between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Attack,
    Defend,
    Hide,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Attack, Action::Defend, Action::Hide];

    /// Matches an action name exactly; anything else is unrecognized.
    pub fn from_name(name: &str) -> Option<Action> {
        match name {
            "attack" => Some(Action::Attack),
            "defend" => Some(Action::Defend),
            "hide" => Some(Action::Hide),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Attack => "attack",
            Action::Defend => "defend",
            Action::Hide => "hide",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One combat session between a character and a monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub character: Character,
    pub monster: Monster,
    pub round: u32,
    pub status: EncounterStatus,
    /// Set by a successful hide; suppresses the monster's next attack
    pub pending_evasion: bool,
}

impl Encounter {
    pub fn new(character: Character, monster: Monster) -> Self {
        Self {
            character,
            monster,
            round: STARTING_ROUND,
            status: EncounterStatus::Ongoing,
            pending_evasion: false,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.status == EncounterStatus::Ongoing
    }
}

/// Something that happened during a round, in resolution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatEvent {
    PlayerHit { monster: String, damage: u32 },
    PlayerMissed,
    Defended,
    HideSucceeded,
    HideFailed,
    UnrecognizedAction { action: String },
    /// The monster lost track of a hidden character and skipped its attack
    MonsterBlinded { monster: String },
    MonsterHit { monster: String, damage: u32 },
    MonsterMissed { monster: String },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::PlayerHit { monster, damage } => {
                write!(f, "You attacked the {} and dealt {} damage.", monster, damage)
            }
            CombatEvent::PlayerMissed => f.write_str("Your attack missed."),
            CombatEvent::Defended => {
                f.write_str("You brace yourself to defend.")
            }
            CombatEvent::HideSucceeded => {
                f.write_str("You hide successfully and avoid the next attack.")
            }
            CombatEvent::HideFailed => f.write_str("The monster spotted you. You could not hide!"),
            CombatEvent::UnrecognizedAction { action } => {
                write!(f, "Action not recognized: '{}'.", action)
            }
            CombatEvent::MonsterBlinded { monster } => {
                write!(f, "The {} cannot find you and does not attack.", monster)
            }
            CombatEvent::MonsterHit { monster, damage } => {
                write!(f, "The {} attacks you and deals {} damage.", monster, damage)
            }
            CombatEvent::MonsterMissed { monster } => {
                write!(f, "The {} misses its attack.", monster)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monster_hp_from_hit_dice() {
        assert_eq!(Monster::hp_for_hit_dice(Some(1)), 4);
        assert_eq!(Monster::hp_for_hit_dice(Some(5)), 20);
        assert_eq!(Monster::hp_for_hit_dice(Some(0)), DEFAULT_MONSTER_HP);
        assert_eq!(Monster::hp_for_hit_dice(None), DEFAULT_MONSTER_HP);
    }

    #[test]
    fn test_huge_hit_dice_saturate_instead_of_wrapping() {
        assert_eq!(Monster::hp_for_hit_dice(Some(600_000_000)), i32::MAX);
        assert_eq!(Monster::hp_for_hit_dice(Some(3_000_000_000)), i32::MAX);
        assert_eq!(Monster::hp_for_hit_dice(Some(u32::MAX)), i32::MAX);
    }

    #[test]
    fn test_take_damage_saturates_at_i32_min() {
        let mut character = Character::new("Hero".to_string(), i32::MIN + 1);
        character.take_damage(5);
        assert_eq!(character.current_hp, i32::MIN);

        let mut monster = Monster::new("Rat".to_string(), i32::MIN + 2);
        monster.take_damage(6);
        assert_eq!(monster.current_hp, i32::MIN);
    }

    #[test]
    fn test_new_encounter_starts_ongoing_at_round_one() {
        let encounter = Encounter::new(
            Character::new("Hero".to_string(), 12),
            Monster::new("Goblin".to_string(), 8),
        );
        assert_eq!(encounter.round, 1);
        assert!(encounter.is_ongoing());
        assert!(!encounter.pending_evasion);
        assert_eq!(encounter.character.current_hp, 12);
        assert_eq!(encounter.monster.current_hp, encounter.monster.max_hp);
    }

    #[test]
    fn test_defeated_at_or_below_zero() {
        let mut monster = Monster::new("Goblin".to_string(), 3);
        monster.take_damage(2);
        assert!(!monster.is_defeated());
        monster.take_damage(1);
        assert!(monster.is_defeated());
        monster.take_damage(4);
        assert_eq!(monster.current_hp, -4);
        assert!(monster.is_defeated());
    }

    #[test]
    fn test_action_names_match_exactly() {
        assert_eq!(Action::from_name("attack"), Some(Action::Attack));
        assert_eq!(Action::from_name("hide"), Some(Action::Hide));
        assert_eq!(Action::from_name("Attack"), None);
        assert_eq!(Action::from_name("flee"), None);
        assert_eq!(Action::Defend.to_string(), "defend");
    }

    #[test]
    fn test_status_terminality() {
        assert!(!EncounterStatus::Ongoing.is_terminal());
        assert!(EncounterStatus::Won.is_terminal());
        assert!(EncounterStatus::Lost.is_terminal());
    }

    #[test]
    fn test_event_text_names_the_monster() {
        let event = CombatEvent::MonsterHit {
            monster: "Rat".to_string(),
            damage: 2,
        };
        assert_eq!(event.to_string(), "The Rat attacks you and deals 2 damage.");
    }
}
