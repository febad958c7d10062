//! Simulation report generation.

use super::config::SimConfig;
use super::runner::{BattleOutcome, BattleStats};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from a batch of simulated battles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimReport {
    pub num_battles: u32,
    pub policy: String,
    pub monster: String,
    pub seed: Option<u64>,

    pub wins: u32,
    pub losses: u32,
    pub timeouts: u32,

    pub win_rate: f64,
    /// Over won and lost battles only
    pub avg_rounds: f64,
    pub avg_hp_left_on_win: f64,

    /// Rounds played -> battles finishing in that many rounds
    pub round_distribution: BTreeMap<u32, u32>,
}

impl SimReport {
    pub fn from_battles(battles: &[BattleStats], config: &SimConfig) -> Self {
        let num_battles = battles.len() as u32;
        let count = |outcome: BattleOutcome| {
            battles.iter().filter(|b| b.outcome == outcome).count() as u32
        };
        let wins = count(BattleOutcome::Won);
        let losses = count(BattleOutcome::Lost);
        let timeouts = count(BattleOutcome::TimedOut);

        let finished: Vec<&BattleStats> = battles
            .iter()
            .filter(|b| b.outcome != BattleOutcome::TimedOut)
            .collect();
        let avg_rounds = finished.iter().map(|b| b.rounds as f64).sum::<f64>()
            / finished.len().max(1) as f64;

        let avg_hp_left_on_win = battles
            .iter()
            .filter(|b| b.outcome == BattleOutcome::Won)
            .map(|b| b.character_hp_left as f64)
            .sum::<f64>()
            / wins.max(1) as f64;

        let mut round_distribution = BTreeMap::new();
        for battle in &finished {
            *round_distribution.entry(battle.rounds).or_insert(0) += 1;
        }

        Self {
            num_battles,
            policy: config.policy.name().to_string(),
            monster: config
                .monster
                .name
                .clone()
                .unwrap_or_else(|| "?".to_string()),
            seed: config.seed,
            wins,
            losses,
            timeouts,
            win_rate: wins as f64 / num_battles.max(1) as f64,
            avg_rounds,
            avg_hp_left_on_win,
            round_distribution,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    BATTLE SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Battles: {} vs {} (policy: {})\n\n",
            self.num_battles, self.monster, self.policy
        ));

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Wins:       {:>6} ({:.1}%)\n",
            self.wins,
            self.win_rate * 100.0
        ));
        report.push_str(&format!("  Losses:     {:>6}\n", self.losses));
        report.push_str(&format!("  Timeouts:   {:>6}\n\n", self.timeouts));

        report.push_str("── PACING ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Rounds:        {:.2}\n", self.avg_rounds));
        report.push_str(&format!(
            "  Avg HP Left (win): {:.2}\n\n",
            self.avg_hp_left_on_win
        ));

        report.push_str("── ROUND DISTRIBUTION ───────────────────────────────────────────\n");
        let finished = (self.wins + self.losses).max(1) as f64;
        for (rounds, battles) in &self.round_distribution {
            let pct = (*battles as f64 / finished) * 100.0;
            let bar: String = "█".repeat((pct / 2.0) as usize);
            report.push_str(&format!("  {:3} rounds: {:>5.1}% {}\n", rounds, pct, bar));
        }
        report.push('\n');

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let rating = if self.win_rate > 0.9 {
            "TOO EASY - The monster rarely wins"
        } else if self.win_rate > 0.6 {
            "GOOD - Dangerous but winnable"
        } else if self.win_rate > 0.3 {
            "HARD - Coin flip or worse"
        } else {
            "TOO HARD - The character usually dies"
        };
        report.push_str(&format!("  Rating: {}\n", rating));

        report
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
