//! Command-line interface for strictly_fortune.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Fortune - spin the wheel, guess the phrase
#[derive(Parser, Debug)]
#[command(name = "strictly_fortune")]
#[command(about = "Turn-based phrase-guessing game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a hot-seat game in this terminal
    Play {
        /// Player name (repeat for each player)
        #[arg(short, long = "player", required = true)]
        players: Vec<String>,

        /// Path to a TOML game config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Phrase corpus file, one `category | phrase` per line
        #[arg(long)]
        phrases: Option<PathBuf>,

        /// Seed for a reproducible game
        #[arg(long)]
        seed: Option<u64>,

        /// Number of rounds
        #[arg(long)]
        rounds: Option<u32>,

        /// Skip the pauses between announcements
        #[arg(long)]
        no_pacing: bool,
    },

    /// Validate a phrase corpus and list its phrases
    Phrases {
        /// Path to a TOML game config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Phrase corpus file (defaults to the built-in corpus)
        #[arg(long)]
        phrases: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_collects_repeated_players() {
        let cli = Cli::parse_from([
            "strictly_fortune",
            "play",
            "--player",
            "Ada",
            "-p",
            "Grace",
            "--seed",
            "42",
            "--no-pacing",
        ]);
        match cli.command {
            Command::Play {
                players,
                seed,
                no_pacing,
                ..
            } => {
                assert_eq!(players, vec!["Ada", "Grace"]);
                assert_eq!(seed, Some(42));
                assert!(no_pacing);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn play_requires_players() {
        assert!(Cli::try_parse_from(["strictly_fortune", "play"]).is_err());
    }
}
