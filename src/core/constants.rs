// Dice
pub const D20_SIDES: u32 = 20;
pub const D6_SIDES: u32 = 6;
pub const MAX_DICE_COUNT: u32 = 100;
pub const MAX_DIE_SIDES: u32 = 1000;

// Hit and stealth thresholds
pub const MONSTER_HIT_THRESHOLD: i32 = 12;
pub const HIDE_DIFFICULTY: i32 = 15;
pub const DEFAULT_MONSTER_ARMOR_CLASS: i32 = 11;

// Monster health
pub const HP_PER_HIT_DIE: i32 = 4;
pub const DEFAULT_MONSTER_HP: i32 = 20;

// Encounter bookkeeping
pub const STARTING_ROUND: u32 = 1;
pub const DEFAULT_CHARACTER_NAME: &str = "Adventurer";
