use std::sync::Arc;

use knave_battle::web::{create_router, Server, ServerConfig};
use knave_battle::{BattleService, MemorySessionStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = ServerConfig::from_env();

    if args.len() > 1 {
        match args[1].as_str() {
            "--serve" => {}
            arg if arg.starts_with("--serve=") => {
                let port = &arg["--serve=".len()..];
                config = config.with_port(
                    port.parse()
                        .map_err(|_| anyhow::anyhow!("invalid port '{}'", port))?,
                );
            }
            "--version" | "-v" => {
                println!("knave-battle {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run 'knave-battle --help' for usage.");
                std::process::exit(2);
            }
        }
    }

    init_tracing();

    tracing::info!("Knave Battle - Starting Server");

    let service = BattleService::new(MemorySessionStore::new(), StdRng::from_entropy());
    let router = create_router(Arc::new(service));

    Server::new(config).run(router).await
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("knave_battle=debug,tower_http=debug,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn print_help() {
    println!("Knave Battle - turn-based combat server\n");
    println!("Usage: knave-battle [OPTIONS]\n");
    println!("Options:");
    println!("  --serve[=PORT]  Start the HTTP server (default port from PORT or 3000)");
    println!("  -v, --version   Show version");
    println!("  -h, --help      Show this help\n");
    println!("Environment:");
    println!("  HOST, PORT      Listen address (default 0.0.0.0:3000)");
    println!("  RUST_LOG        Log filter (default knave_battle=debug,tower_http=debug,info)");
}
