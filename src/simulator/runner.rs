//! Battle runner driving the real `BattleService`.
//!
//! Every simulated battle goes through the same start/action path a client
//! would use, so the numbers reflect actual rules rather than a copy of them.

use super::config::SimConfig;
use super::report::SimReport;
use crate::service::{
    ActionRequest, ActionResponse, BattleError, BattleService, RoundReport, StartRequest,
};
use crate::session::MemorySessionStore;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

const SIM_CLIENT_ID: &str = "simulator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Won,
    Lost,
    TimedOut,
}

/// Result of one simulated battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleStats {
    pub outcome: BattleOutcome,
    pub rounds: u32,
    pub character_hp_left: i32,
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport, BattleError> {
    let mut battles = Vec::with_capacity(config.num_battles as usize);

    for battle_idx in 0..config.num_battles {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(battle_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let stats = simulate_single_battle(config, rng)?;
        debug!(
            battle = battle_idx + 1,
            outcome = ?stats.outcome,
            rounds = stats.rounds,
            "battle simulated"
        );
        battles.push(stats);
    }

    Ok(SimReport::from_battles(&battles, config))
}

/// Fights one battle to completion or until `max_rounds`.
pub fn simulate_single_battle(
    config: &SimConfig,
    mut rng: ChaCha8Rng,
) -> Result<BattleStats, BattleError> {
    // Policy choices get their own stream so they never shift the dice
    let mut policy_rng = ChaCha8Rng::seed_from_u64(rng.gen());
    let service = BattleService::new(MemorySessionStore::new(), rng);

    service.start(StartRequest {
        character: Some(config.character.clone()),
        monster: Some(config.monster.clone()),
        client_id: Some(SIM_CLIENT_ID.to_string()),
    })?;

    let mut character_hp_left = 0;
    for _ in 0..config.max_rounds {
        let Some(encounter) = service.encounter(SIM_CLIENT_ID) else {
            break;
        };
        character_hp_left = encounter.character.current_hp;

        let action = config.policy.choose(&encounter, &mut policy_rng);
        let response = service.act(ActionRequest::new(SIM_CLIENT_ID, action.as_str()))?;

        match response {
            ActionResponse::Resolved(RoundReport::Victory {
                round,
                character_hp,
                ..
            }) => {
                return Ok(BattleStats {
                    outcome: BattleOutcome::Won,
                    rounds: round - 1,
                    character_hp_left: character_hp,
                });
            }
            ActionResponse::Resolved(RoundReport::Defeat { round, .. }) => {
                return Ok(BattleStats {
                    outcome: BattleOutcome::Lost,
                    rounds: round - 1,
                    character_hp_left: 0,
                });
            }
            ActionResponse::Resolved(RoundReport::Ongoing { character_hp, .. }) => {
                character_hp_left = character_hp;
            }
            ActionResponse::NoActiveEncounter { .. } => break,
        }
    }

    Ok(BattleStats {
        outcome: BattleOutcome::TimedOut,
        rounds: config.max_rounds,
        character_hp_left,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::config::Policy;

    #[test]
    fn test_seeded_simulation_is_reproducible() {
        let config = SimConfig::policy_comparison(Policy::Random, 42);

        let first = run_simulation(&config).unwrap();
        let second = run_simulation(&config).unwrap();

        assert_eq!(first.wins, second.wins);
        assert_eq!(first.losses, second.losses);
        assert_eq!(first.round_distribution, second.round_distribution);
    }

    #[test]
    fn test_every_battle_is_accounted_for() {
        let mut config = SimConfig::rat_hunt(50);
        config.seed = Some(7);

        let report = run_simulation(&config).unwrap();

        assert_eq!(report.num_battles, 50);
        assert_eq!(report.wins + report.losses + report.timeouts, 50);
    }

    #[test]
    fn test_single_round_cap_times_out() {
        let mut config = SimConfig::default();
        config.max_rounds = 1;
        config.monster.hit_dice_count = Some(100);

        let stats = simulate_single_battle(&config, ChaCha8Rng::seed_from_u64(3)).unwrap();

        assert_eq!(stats.rounds, 1);
        assert_ne!(stats.outcome, BattleOutcome::Won);
    }

    #[test]
    fn test_invalid_monster_fails_the_run() {
        let mut config = SimConfig::rat_hunt(3);
        config.monster.damage_expression = Some("bite".to_string());

        assert!(matches!(
            run_simulation(&config),
            Err(BattleError::InvalidDiceExpression(_))
        ));
    }
}
