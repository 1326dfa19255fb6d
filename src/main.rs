//! Strictly Fortune - hot-seat terminal game
//!
//! Players share one terminal and type `name: guess` to play.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use strictly_fortune::{
    ConsoleBroadcaster, GameConfig, NoPacing, Pacing, Player, PlayerId, SessionRegistry,
    TokioPacing,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            players,
            config,
            phrases,
            seed,
            rounds,
            no_pacing,
        } => {
            let mut config = load_config(config, phrases)?;
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(rounds) = rounds {
                config = config.with_round_cap(rounds);
            }
            config.validate()?;
            run_play(config, players, no_pacing).await
        }
        Command::Phrases { config, phrases } => list_phrases(load_config(config, phrases)?),
    }
}

fn load_config(path: Option<PathBuf>, phrases: Option<PathBuf>) -> Result<GameConfig> {
    let config = match path {
        Some(path) => GameConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    Ok(match phrases {
        Some(phrases) => config.with_phrases_path(phrases),
        None => config,
    })
}

/// Print every phrase in the corpus
fn list_phrases(config: GameConfig) -> Result<()> {
    let phrases = config.load_phrases()?;
    for phrase in phrases.phrases() {
        println!(
            "{:<12} {:<40} {} letters",
            phrase.category().unwrap_or("-"),
            phrase.text(),
            phrase.scoreable_len()
        );
    }
    println!("{} phrases", phrases.len());
    Ok(())
}

/// Run a hot-seat game on stdin/stdout
#[instrument(skip_all, fields(players = names.len()))]
async fn run_play(config: GameConfig, names: Vec<String>, no_pacing: bool) -> Result<()> {
    let players: Vec<Player> = names
        .iter()
        .enumerate()
        .map(|(i, name)| Player::new(i as u64 + 1, name.trim()))
        .collect();

    let phrases = config.load_phrases()?;
    let pacing: Arc<dyn Pacing> = if no_pacing {
        Arc::new(NoPacing)
    } else {
        Arc::new(TokioPacing::new(*config.pacing()))
    };
    let registry = SessionRegistry::new(config, phrases, pacing);

    let console = ConsoleBroadcaster::new(&players);
    let session = registry.start_session(players.clone(), Arc::new(console)).await?;
    let Some(handle) = registry.get(session).await else {
        bail!("{session} vanished before play began");
    };
    info!(%session, "Game started");
    println!("Type `name: letter`, `name: whole phrase` or `name: /leave`.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = handle.wait_finished() => break,
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                let Some((player, input)) = parse_line(&players, &line) else {
                    if !line.trim().is_empty() {
                        println!(
                            "Who is that? Start the line with a player name, e.g. `{}: e`",
                            players[0].name
                        );
                    }
                    continue;
                };
                let sent = if input.eq_ignore_ascii_case("/leave") {
                    handle.player_left(player)
                } else {
                    handle.submit_guess(player, input)
                };
                if let Err(e) = sent {
                    warn!(error = %e, "Session no longer accepts input");
                    break;
                }
            }
        }
    }

    info!(reaped = registry.reap_finished().await, "Game over");
    Ok(())
}

/// Split `name: text` into the named player and their input.
fn parse_line<'a>(players: &[Player], line: &'a str) -> Option<(PlayerId, &'a str)> {
    let (name, text) = line.split_once(':')?;
    let name = name.trim();
    players
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| (p.id, text.trim()))
}
