//! Start and action operations over a session store and a dice roller.
//!
//! [`BattleService`] owns both collaborators. Each operation holds the store
//! lock from lookup to write-back, so two actions for the same client never
//! interleave and a rejected request never touches the store.

use crate::combat::{resolve_round, Action, Character, Encounter, EncounterStatus, Monster};
use crate::core::constants::DEFAULT_CHARACTER_NAME;
use crate::dice::{DiceError, DiceExpr, Roller};
use crate::session::SessionStore;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const NO_ACTIVE_ENCOUNTER_MESSAGE: &str = "No active battle. Start a new battle first.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid monster damage: {0}")]
    InvalidDiceExpression(#[from] DiceError),
}

// =============================================================================
// Requests
// =============================================================================

/// Character data supplied when starting a battle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    pub name: Option<String>,
    pub hp: Option<i32>,
    #[serde(alias = "fuerza")]
    pub strength: Option<i32>,
    #[serde(alias = "destreza")]
    pub dexterity: Option<i32>,
}

/// Monster data supplied when starting a battle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterSheet {
    pub name: Option<String>,
    #[serde(alias = "hd")]
    pub hit_dice_count: Option<u32>,
    #[serde(alias = "ac")]
    pub armor_class: Option<i32>,
    pub attack_bonus: Option<i32>,
    #[serde(alias = "damage")]
    pub damage_expression: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub character: Option<CharacterSheet>,
    pub monster: Option<MonsterSheet>,
    #[serde(
        default,
        alias = "telegramId",
        deserialize_with = "deserialize_client_id"
    )]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(
        default,
        alias = "telegramId",
        deserialize_with = "deserialize_client_id"
    )]
    pub client_id: Option<String>,
    pub action: Option<String>,
}

impl ActionRequest {
    pub fn new(client_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            action: Some(action.into()),
        }
    }
}

/// Client identifiers arrive as JSON strings or integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawClientId {
    Text(String),
    Number(i64),
}

fn deserialize_client_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawClientId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawClientId::Text(text) => text,
        RawClientId::Number(number) => number.to_string(),
    }))
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub message: String,
    pub monster_name: String,
    pub round: u32,
    pub status: EncounterStatus,
    pub next_actions: Vec<Action>,
}

/// Result of a resolved round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum RoundReport {
    Victory {
        message: String,
        log: Vec<String>,
        round: u32,
        #[serde(rename = "characterHP")]
        character_hp: i32,
    },
    Defeat {
        message: String,
        log: Vec<String>,
        round: u32,
        /// Always reported as zero
        #[serde(rename = "characterHP")]
        character_hp: i32,
    },
    Ongoing {
        log: Vec<String>,
        round: u32,
        #[serde(rename = "characterHP")]
        character_hp: i32,
        #[serde(rename = "monsterHP")]
        monster_hp: i32,
        #[serde(rename = "nextActions")]
        next_actions: Vec<Action>,
    },
}

impl RoundReport {
    pub fn round(&self) -> u32 {
        match self {
            RoundReport::Victory { round, .. }
            | RoundReport::Defeat { round, .. }
            | RoundReport::Ongoing { round, .. } => *round,
        }
    }

    pub fn log(&self) -> &[String] {
        match self {
            RoundReport::Victory { log, .. }
            | RoundReport::Defeat { log, .. }
            | RoundReport::Ongoing { log, .. } => log,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Resolved(RoundReport),
    /// Not an error: the caller should start a battle first
    NoActiveEncounter { message: String },
}

impl ActionResponse {
    pub fn no_active_encounter() -> Self {
        ActionResponse::NoActiveEncounter {
            message: NO_ACTIVE_ENCOUNTER_MESSAGE.to_string(),
        }
    }

    pub fn report(&self) -> Option<&RoundReport> {
        match self {
            ActionResponse::Resolved(report) => Some(report),
            ActionResponse::NoActiveEncounter { .. } => None,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

pub struct BattleService<S, R> {
    store: Mutex<S>,
    roller: Mutex<R>,
}

/// Ignores poisoning: encounters are only written back whole.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Treats absent and empty strings alike.
fn require_text(value: Option<String>, field: &'static str) -> Result<String, BattleError> {
    match value {
        Some(text) if !text.is_empty() => Ok(text),
        _ => {
            warn!(field, "request rejected: missing field");
            Err(BattleError::MissingField(field))
        }
    }
}

fn build_character(sheet: CharacterSheet) -> Result<Character, BattleError> {
    let hp = sheet.hp.ok_or(BattleError::MissingField("character.hp"))?;
    let name = sheet
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_CHARACTER_NAME.to_string());

    Ok(Character::new(name, hp)
        .with_strength(sheet.strength.unwrap_or(0))
        .with_dexterity(sheet.dexterity.unwrap_or(0)))
}

fn build_monster(sheet: MonsterSheet) -> Result<Monster, BattleError> {
    let name = require_text(sheet.name, "monster.name")?;
    let damage = match sheet.damage_expression {
        Some(text) => text.parse::<DiceExpr>().inspect_err(|err| {
            warn!(monster = %name, error = %err, "request rejected: bad damage expression");
        })?,
        None => DiceExpr::D6,
    };

    let mut monster = Monster::new(name, Monster::hp_for_hit_dice(sheet.hit_dice_count))
        .with_attack_bonus(sheet.attack_bonus.unwrap_or(0))
        .with_damage(damage);
    if let Some(armor_class) = sheet.armor_class {
        monster = monster.with_armor_class(armor_class);
    }
    Ok(monster)
}

impl<S, R> BattleService<S, R>
where
    S: SessionStore,
    R: Roller,
{
    pub fn new(store: S, roller: R) -> Self {
        Self {
            store: Mutex::new(store),
            roller: Mutex::new(roller),
        }
    }

    /// Starts a battle, replacing any battle the client already had.
    pub fn start(&self, request: StartRequest) -> Result<StartResponse, BattleError> {
        let character = request
            .character
            .ok_or(BattleError::MissingField("character"))?;
        let monster = request.monster.ok_or(BattleError::MissingField("monster"))?;
        let client_id = require_text(request.client_id, "clientId")?;

        let encounter = Encounter::new(build_character(character)?, build_monster(monster)?);
        let response = StartResponse {
            message: format!("You face a {}! What do you do?", encounter.monster.name),
            monster_name: encounter.monster.name.clone(),
            round: encounter.round,
            status: encounter.status,
            next_actions: Action::ALL.to_vec(),
        };

        let replaced = lock(&self.store).put(&client_id, encounter);
        info!(
            client_id = %client_id,
            monster = %response.monster_name,
            replaced = replaced.is_some(),
            "battle started"
        );

        Ok(response)
    }

    /// Resolves one round of the client's battle.
    pub fn act(&self, request: ActionRequest) -> Result<ActionResponse, BattleError> {
        let client_id = require_text(request.client_id, "clientId")?;
        let action = require_text(request.action, "action")?;

        let mut store = lock(&self.store);
        let Some(mut encounter) = store.get(&client_id).filter(Encounter::is_ongoing) else {
            debug!(client_id = %client_id, action = %action, "no active battle");
            return Ok(ActionResponse::no_active_encounter());
        };

        let outcome = {
            let mut roller = lock(&self.roller);
            resolve_round(&mut encounter, &action, &mut *roller)
        };
        debug!(
            client_id = %client_id,
            action = %action,
            round = encounter.round,
            character_hp = encounter.character.current_hp,
            monster_hp = encounter.monster.current_hp,
            "round resolved"
        );

        let log = outcome.log();
        let report = match outcome.status {
            EncounterStatus::Won => {
                store.remove(&client_id);
                info!(client_id = %client_id, round = encounter.round, "battle won");
                RoundReport::Victory {
                    message: format!("You defeated the {}!", encounter.monster.name),
                    log,
                    round: encounter.round,
                    character_hp: encounter.character.current_hp.max(0),
                }
            }
            EncounterStatus::Lost => {
                store.remove(&client_id);
                info!(client_id = %client_id, round = encounter.round, "battle lost");
                RoundReport::Defeat {
                    message: format!("You were defeated by the {}.", encounter.monster.name),
                    log,
                    round: encounter.round,
                    character_hp: 0,
                }
            }
            EncounterStatus::Ongoing => {
                let report = RoundReport::Ongoing {
                    log,
                    round: encounter.round,
                    character_hp: encounter.character.current_hp,
                    monster_hp: encounter.monster.current_hp,
                    next_actions: Action::ALL.to_vec(),
                };
                store.put(&client_id, encounter);
                report
            }
        };

        Ok(ActionResponse::Resolved(report))
    }

    /// Snapshot of the client's active battle.
    pub fn encounter(&self, client_id: &str) -> Option<Encounter> {
        lock(&self.store).get(client_id)
    }

    pub fn active_battles(&self) -> usize {
        lock(&self.store).len()
    }
}
