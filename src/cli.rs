//! Command-line interface for secret_santa.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use secret_santa::{GroupId, ParticipantId};

/// Secret Santa - draw gift-exchange pairs and reveal them one at a time
#[derive(Parser, Debug)]
#[command(name = "secret_santa")]
#[command(about = "Gift-exchange draws with one-time reveals", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "secret_santa.toml", global = true)]
    pub config: PathBuf,

    /// Path to the database file (overrides the configuration)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new exchange group
    Create {
        /// Group title
        title: String,

        /// Spending limit per gift
        #[arg(short, long, default_value = "0")]
        budget: f64,

        /// Date of the exchange (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// House rules shown to participants
        #[arg(short, long, default_value = "")]
        rules: String,

        /// Participant name (repeat for each participant)
        #[arg(short, long = "participant")]
        participants: Vec<String>,
    },

    /// Add a participant to a draft group
    Add {
        /// Group id
        group: GroupId,

        /// Participant name
        name: String,

        /// Contact information
        #[arg(long)]
        contact: Option<String>,

        /// Avatar file name or URL
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Remove a participant from a draft group
    Remove {
        /// Group id
        group: GroupId,

        /// Participant id
        participant: ParticipantId,
    },

    /// List all groups, latest event first
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a group and its participants (never recipients)
    Show {
        /// Group id
        group: GroupId,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Draw pairs for a group and lock it
    Draw {
        /// Group id
        group: GroupId,
    },

    /// Reveal who a participant gives to
    Reveal {
        /// Group id
        group: GroupId,

        /// Participant id
        participant: ParticipantId,
    },

    /// Delete a group and its participants
    Delete {
        /// Group id
        group: GroupId,
    },
}
