use super::types::{Action, Combatant, CombatEvent, Encounter, EncounterStatus};
use crate::core::constants::{HIDE_DIFFICULTY, MONSTER_HIT_THRESHOLD};
use crate::dice::{roll_d20, DiceExpr, Roller};

/// Everything a single round produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub events: Vec<CombatEvent>,
    /// Encounter status after the termination check
    pub status: EncounterStatus,
}

impl RoundOutcome {
    /// Human-readable log, one line per event.
    pub fn log(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}

/// Resolves one round: the player's action, then the monster's response,
/// then the round counter and the termination check.
///
/// Unrecognized action names are logged and otherwise ignored; the monster
/// still takes its turn. Victory is checked before defeat, so if both sides
/// drop in the same round the player wins.
pub fn resolve_round(
    encounter: &mut Encounter,
    action: &str,
    roller: &mut impl Roller,
) -> RoundOutcome {
    let mut events = Vec::new();

    match Action::from_name(action) {
        Some(Action::Attack) => player_attack(encounter, roller, &mut events),
        Some(Action::Defend) => events.push(CombatEvent::Defended),
        Some(Action::Hide) => player_hide(encounter, roller, &mut events),
        None => events.push(CombatEvent::UnrecognizedAction {
            action: action.to_string(),
        }),
    }

    if !encounter.monster.is_defeated() {
        monster_turn(encounter, roller, &mut events);
    }
    // Evasion only ever covers the round it was earned in
    encounter.pending_evasion = false;

    encounter.round += 1;
    encounter.status = if encounter.monster.is_defeated() {
        EncounterStatus::Won
    } else if encounter.character.is_defeated() {
        EncounterStatus::Lost
    } else {
        EncounterStatus::Ongoing
    };

    RoundOutcome {
        events,
        status: encounter.status,
    }
}

fn player_attack(
    encounter: &mut Encounter,
    roller: &mut impl Roller,
    events: &mut Vec<CombatEvent>,
) {
    let attack_roll = roll_d20(roller).saturating_add(encounter.character.strength);
    if attack_roll >= encounter.monster.armor_class {
        let damage = DiceExpr::D6.roll(roller).total;
        encounter.monster.take_damage(damage as i32);
        events.push(CombatEvent::PlayerHit {
            monster: encounter.monster.name.clone(),
            damage,
        });
    } else {
        events.push(CombatEvent::PlayerMissed);
    }
}

fn player_hide(
    encounter: &mut Encounter,
    roller: &mut impl Roller,
    events: &mut Vec<CombatEvent>,
) {
    let stealth_roll = roll_d20(roller).saturating_add(encounter.character.dexterity);
    if stealth_roll >= HIDE_DIFFICULTY {
        encounter.pending_evasion = true;
        events.push(CombatEvent::HideSucceeded);
    } else {
        events.push(CombatEvent::HideFailed);
    }
}

fn monster_turn(
    encounter: &mut Encounter,
    roller: &mut impl Roller,
    events: &mut Vec<CombatEvent>,
) {
    let monster_name = encounter.monster.name.clone();

    if encounter.pending_evasion {
        encounter.pending_evasion = false;
        events.push(CombatEvent::MonsterBlinded {
            monster: monster_name,
        });
        return;
    }

    let attack_roll = roll_d20(roller).saturating_add(encounter.monster.attack_bonus);
    if attack_roll >= MONSTER_HIT_THRESHOLD {
        // Dice totals are bounded well inside i32 by the expression limits
        let damage = encounter.monster.damage.roll(roller).total;
        encounter.character.take_damage(damage as i32);
        events.push(CombatEvent::MonsterHit {
            monster: monster_name,
            damage,
        });
    } else {
        events.push(CombatEvent::MonsterMissed {
            monster: monster_name,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::types::{Character, Monster};
    use crate::dice::ScriptedRoller;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rat_encounter() -> Encounter {
        Encounter::new(
            Character::new("Hero".to_string(), 20),
            Monster::new("Rat".to_string(), Monster::hp_for_hit_dice(Some(1)))
                .with_armor_class(10)
                .with_attack_bonus(0)
                .with_damage("1d4".parse().unwrap()),
        )
    }

    #[test]
    fn test_attack_hit_damages_monster() {
        let mut encounter = rat_encounter();
        // attack 10 vs AC 10, damage 3, monster attack 1 misses
        let mut roller = ScriptedRoller::new([10, 3, 1]);

        let outcome = resolve_round(&mut encounter, "attack", &mut roller);

        assert_eq!(encounter.monster.current_hp, 1);
        assert_eq!(encounter.character.current_hp, 20);
        assert_eq!(encounter.round, 2);
        assert_eq!(outcome.status, EncounterStatus::Ongoing);
        assert_eq!(
            outcome.events,
            vec![
                CombatEvent::PlayerHit {
                    monster: "Rat".to_string(),
                    damage: 3
                },
                CombatEvent::MonsterMissed {
                    monster: "Rat".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_attack_miss_below_armor_class() {
        let mut encounter = rat_encounter();
        let mut roller = ScriptedRoller::new([9, 1]);

        let outcome = resolve_round(&mut encounter, "attack", &mut roller);

        assert_eq!(encounter.monster.current_hp, 4);
        assert_eq!(outcome.events[0], CombatEvent::PlayerMissed);
    }

    #[test]
    fn test_strength_is_added_to_attack() {
        let mut encounter = rat_encounter();
        encounter.character.strength = 3;
        // 7 + 3 meets AC 10
        let mut roller = ScriptedRoller::new([7, 2, 1]);

        resolve_round(&mut encounter, "attack", &mut roller);

        assert_eq!(encounter.monster.current_hp, 2);
    }

    #[test]
    fn test_killing_blow_skips_monster_turn() {
        let mut encounter = rat_encounter();
        encounter.monster.current_hp = 1;
        let mut roller = ScriptedRoller::new([15, 1]);

        let outcome = resolve_round(&mut encounter, "attack", &mut roller);

        assert_eq!(outcome.status, EncounterStatus::Won);
        assert_eq!(encounter.status, EncounterStatus::Won);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(encounter.round, 2);
        // The monster never rolled
        assert_eq!(roller.remaining(), 0);
    }

    #[test]
    fn test_monster_hit_damages_character() {
        let mut encounter = rat_encounter();
        // defend, monster rolls 12 (hits), deals 4
        let mut roller = ScriptedRoller::new([12, 4]);

        let outcome = resolve_round(&mut encounter, "defend", &mut roller);

        assert_eq!(encounter.character.current_hp, 16);
        assert_eq!(
            outcome.log(),
            vec![
                "You brace yourself to defend.".to_string(),
                "The Rat attacks you and deals 4 damage.".to_string(),
            ]
        );
    }

    #[test]
    fn test_monster_attack_bonus_reaches_threshold() {
        let mut encounter = rat_encounter();
        encounter.monster.attack_bonus = 2;
        let mut roller = ScriptedRoller::new([10, 1]);

        resolve_round(&mut encounter, "defend", &mut roller);

        assert_eq!(encounter.character.current_hp, 19);
    }

    #[test]
    fn test_defend_has_no_mechanical_effect() {
        let mut encounter = rat_encounter();
        let mut roller = ScriptedRoller::new([11]);

        resolve_round(&mut encounter, "defend", &mut roller);

        assert_eq!(encounter.character.current_hp, 20);
        assert_eq!(encounter.monster.current_hp, 4);
        assert!(!encounter.pending_evasion);
    }

    #[test]
    fn test_successful_hide_blocks_monster_this_round_only() {
        let mut encounter = rat_encounter();
        // stealth 15 succeeds; monster never rolls this round
        let mut roller = ScriptedRoller::new([15]);

        let outcome = resolve_round(&mut encounter, "hide", &mut roller);

        assert_eq!(
            outcome.events,
            vec![
                CombatEvent::HideSucceeded,
                CombatEvent::MonsterBlinded {
                    monster: "Rat".to_string()
                },
            ]
        );
        assert_eq!(encounter.character.current_hp, 20);
        assert!(!encounter.pending_evasion);

        // Next round the monster attacks normally
        let mut roller = ScriptedRoller::new([20, 2]);
        resolve_round(&mut encounter, "defend", &mut roller);
        assert_eq!(encounter.character.current_hp, 18);
    }

    #[test]
    fn test_failed_hide_lets_monster_attack() {
        let mut encounter = rat_encounter();
        encounter.character.dexterity = 1;
        // 13 + 1 falls short of 15
        let mut roller = ScriptedRoller::new([13, 12, 3]);

        let outcome = resolve_round(&mut encounter, "hide", &mut roller);

        assert_eq!(outcome.events[0], CombatEvent::HideFailed);
        assert_eq!(encounter.character.current_hp, 17);
    }

    #[test]
    fn test_dexterity_is_added_to_stealth() {
        let mut encounter = rat_encounter();
        encounter.character.dexterity = 2;
        let mut roller = ScriptedRoller::new([13]);

        let outcome = resolve_round(&mut encounter, "hide", &mut roller);

        assert_eq!(outcome.events[0], CombatEvent::HideSucceeded);
    }

    #[test]
    fn test_unrecognized_action_still_advances_round() {
        let mut encounter = rat_encounter();
        let mut roller = ScriptedRoller::new([12, 1]);

        let outcome = resolve_round(&mut encounter, "dance", &mut roller);

        assert_eq!(
            outcome.events[0],
            CombatEvent::UnrecognizedAction {
                action: "dance".to_string()
            }
        );
        assert_eq!(encounter.character.current_hp, 19);
        assert_eq!(encounter.round, 2);
    }

    #[test]
    fn test_character_drop_is_defeat() {
        let mut encounter = rat_encounter();
        encounter.character.current_hp = 2;
        let mut roller = ScriptedRoller::new([12, 4]);

        let outcome = resolve_round(&mut encounter, "defend", &mut roller);

        assert_eq!(outcome.status, EncounterStatus::Lost);
        assert_eq!(encounter.character.current_hp, -2);
    }

    #[test]
    fn test_victory_wins_ties() {
        let mut encounter = rat_encounter();
        encounter.monster.current_hp = 1;
        encounter.character.current_hp = 0;
        let mut roller = ScriptedRoller::new([20, 6]);

        let outcome = resolve_round(&mut encounter, "attack", &mut roller);

        assert_eq!(outcome.status, EncounterStatus::Won);
    }

    #[test]
    fn test_round_increments_by_one_for_every_branch() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for action in ["attack", "defend", "hide", "shout"] {
            let mut encounter = rat_encounter();
            encounter.monster.current_hp = 1_000;
            encounter.character.current_hp = 1_000;
            for expected in 2..=20 {
                resolve_round(&mut encounter, action, &mut rng);
                assert_eq!(encounter.round, expected, "action {}", action);
            }
        }
    }

    #[test]
    fn test_extreme_modifiers_saturate() {
        let mut encounter = rat_encounter();
        encounter.character.strength = i32::MAX;
        encounter.monster.armor_class = 30;
        encounter.monster.current_hp = 1_000;
        // attack 20 + max strength hits for 1, monster misses on 1
        let mut roller = ScriptedRoller::new([20, 1, 1]);
        resolve_round(&mut encounter, "attack", &mut roller);
        assert_eq!(encounter.monster.current_hp, 999);

        encounter.character.dexterity = i32::MAX;
        let mut roller = ScriptedRoller::new([20]);
        let outcome = resolve_round(&mut encounter, "hide", &mut roller);
        assert_eq!(outcome.events[0], CombatEvent::HideSucceeded);

        encounter.character.strength = i32::MIN;
        let mut roller = ScriptedRoller::new([20, 1]);
        let outcome = resolve_round(&mut encounter, "attack", &mut roller);
        assert_eq!(outcome.events[0], CombatEvent::PlayerMissed);
    }

    #[test]
    fn test_monster_hit_on_extreme_hp_does_not_overflow() {
        let mut encounter = rat_encounter();
        encounter.monster.attack_bonus = i32::MAX;
        encounter.character.current_hp = i32::MIN + 1;
        // defend, then the monster hits on 1 thanks to its bonus for 4
        let mut roller = ScriptedRoller::new([1, 4]);

        let outcome = resolve_round(&mut encounter, "defend", &mut roller);

        assert_eq!(encounter.character.current_hp, i32::MIN);
        assert_eq!(outcome.status, EncounterStatus::Lost);
    }

    #[test]
    fn test_seeded_rounds_are_reproducible() {
        let mut first = rat_encounter();
        let mut second = rat_encounter();
        let mut rng1 = ChaCha8Rng::seed_from_u64(7);
        let mut rng2 = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..3 {
            let a = resolve_round(&mut first, "attack", &mut rng1);
            let b = resolve_round(&mut second, "attack", &mut rng2);
            assert_eq!(a, b);
        }
        assert_eq!(first, second);
    }
}
