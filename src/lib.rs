//! Knave Battle - turn-based combat encounters between a character and a monster.
//!
//! This crate exposes the combat engine for the server binary, the balance
//! simulator, and tests.

pub mod combat;
pub mod core;
pub mod dice;
pub mod service;
pub mod session;
pub mod simulator;

#[cfg(feature = "web")]
pub mod web;

pub use combat::{resolve_round, Action, CombatEvent, Encounter, EncounterStatus};
pub use dice::{DiceError, DiceExpr, Roller, ScriptedRoller};
pub use service::{
    ActionRequest, ActionResponse, BattleError, BattleService, RoundReport, StartRequest,
};
pub use session::{MemorySessionStore, SessionStore};
