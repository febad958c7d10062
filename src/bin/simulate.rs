//! Battle balance simulator CLI.
//!
//! Plays many battles between one character sheet and one monster sheet.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                         # 1000 battles vs a goblin
//!   cargo run --bin simulate -- -n 200 -p cautious   # 200 battles, hide when hurt
//!   cargo run --bin simulate -- --seed 42 --json     # Reproducible, JSON output

use knave_battle::simulator::{run_simulation, SimConfig};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let (config, json) = parse_args(&args)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let report = run_simulation(&config)?;

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              KNAVE BATTLE SIMULATOR                           ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Battles:        {}", config.num_battles);
    println!("  Policy:         {}", config.policy);
    println!("  Max Rounds:     {}", config.max_rounds);
    println!("  Character HP:   {}", config.character.hp.unwrap_or_default());
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("{}", report.to_text());

    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<(SimConfig, bool)> {
    let mut config = SimConfig::default();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--json" => json = true,
            "--rat" => config = SimConfig::rat_hunt(config.num_battles),
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                let Some(value) = args.get(i + 1) else {
                    anyhow::bail!("unknown or incomplete option '{}'", flag);
                };
                apply_option(&mut config, flag, value)?;
                i += 1;
            }
        }
        i += 1;
    }

    Ok((config, json))
}

fn apply_option(config: &mut SimConfig, flag: &str, value: &str) -> anyhow::Result<()> {
    let number = |v: &str| -> anyhow::Result<i32> {
        v.parse()
            .map_err(|_| anyhow::anyhow!("'{}' expects a number, got '{}'", flag, v))
    };

    match flag {
        "-n" | "--battles" => config.num_battles = number(value)?.max(0) as u32,
        "-s" | "--seed" => {
            config.seed = Some(
                value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("invalid seed '{}'", value))?,
            )
        }
        "-p" | "--policy" => config.policy = value.parse().map_err(anyhow::Error::msg)?,
        "-r" | "--max-rounds" => config.max_rounds = number(value)?.max(1) as u32,
        "--hp" => config.character.hp = Some(number(value)?),
        "--strength" => config.character.strength = Some(number(value)?),
        "--dexterity" => config.character.dexterity = Some(number(value)?),
        "--monster" => config.monster.name = Some(value.to_string()),
        "--hd" => config.monster.hit_dice_count = Some(number(value)?.max(0) as u32),
        "--ac" => config.monster.armor_class = Some(number(value)?),
        "--attack-bonus" => config.monster.attack_bonus = Some(number(value)?),
        "--damage" => config.monster.damage_expression = Some(value.to_string()),
        _ => anyhow::bail!("unknown option '{}'", flag),
    }
    Ok(())
}

fn print_help() {
    println!("Knave Battle Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --battles <N>      Number of battles (default: 1000)");
    println!("    -s, --seed <S>         Random seed for reproducibility");
    println!("    -p, --policy <P>       always-attack, cautious or random");
    println!("    -r, --max-rounds <R>   Rounds before a battle times out (default: 100)");
    println!("    --hp <HP>              Character hit points (default: 10)");
    println!("    --strength <S>         Character attack bonus");
    println!("    --dexterity <D>        Character stealth bonus");
    println!("    --monster <NAME>       Monster name (default: Goblin)");
    println!("    --hd <N>               Monster hit dice");
    println!("    --ac <AC>              Monster armor class");
    println!("    --attack-bonus <B>     Monster attack bonus");
    println!("    --damage <EXPR>        Monster damage dice, e.g. 1d8");
    println!("    --rat                  Fight a 1d4 rat instead of a goblin");
    println!("    --json                 Print the report as JSON");
    println!("    -h, --help             Show this help");
}
