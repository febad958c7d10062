//! Monte Carlo balance simulator.
//!
//! Plays many seeded battles against one monster sheet to measure:
//! - Win and loss rates per player policy
//! - How many rounds a fight lasts
//! - How much health the character keeps after a win
//!
//! Battles run through `BattleService`, so results match what a client sees.

mod config;
mod report;
mod runner;

pub use config::{Policy, SimConfig};
pub use report::SimReport;
pub use runner::{run_simulation, simulate_single_battle, BattleOutcome, BattleStats};
