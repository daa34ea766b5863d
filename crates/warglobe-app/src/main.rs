//! Headless WARGLOBE runner: reads actions from stdin, drives the frame
//! loop, and prints status lines as they happen.

use std::process;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use warglobe_app::config::AppConfig;
use warglobe_app::game_loop::spawn_game_loop;
use warglobe_app::runner::{Runner, USAGE};
use warglobe_app::services::{ChatAttackResolver, NominatimResolver};
use warglobe_geo::CountryIndex;
use warglobe_sim::EngineConfig;

#[tokio::main]
async fn main() {
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let countries = match &config.countries_path {
        Some(path) => CountryIndex::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "country data unavailable");
            CountryIndex::default()
        }),
        None => {
            tracing::warn!("WARGLOBE_COUNTRIES not set; attacks cannot resolve countries");
            CountryIndex::default()
        }
    };
    tracing::info!(countries = countries.len(), "country index ready");

    let (locations, attacks) = match (
        NominatimResolver::new(&config),
        ChatAttackResolver::new(&config),
    ) {
        (Ok(locations), Ok(attacks)) => (locations, attacks),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let spawned = spawn_game_loop(
        EngineConfig::default(),
        countries,
        config.frame_rate,
        |snapshot| {
            for status in &snapshot.status {
                println!("[{:?}] {}", status.kind, status.message);
            }
        },
    );
    let (handle, frame_loop) = match spawned {
        Ok(spawned) => spawned,
        Err(e) => {
            eprintln!("Error: failed to start frame loop: {e}");
            process::exit(1);
        }
    };

    let runner = Runner::new(handle.clone(), Arc::new(locations), Arc::new(attacks));
    println!("{USAGE}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if !runner.handle_line(&line) {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        }
    }

    handle.shutdown();
    if frame_loop.join().is_err() {
        tracing::warn!("frame loop panicked");
    }
}
