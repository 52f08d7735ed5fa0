//! Secret Santa - command-line front end
//!
//! Thin presentation layer over [`secret_santa::ExchangeService`].

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use secret_santa::{
    ExchangeGroup, ExchangeService, GroupStatus, GroupSummary, NewGroup, NewParticipant,
    SantaConfig, SqliteGroupStore,
};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let mut config = SantaConfig::load_or_default(&cli.config)?;
    if let Some(db_path) = cli.db_path {
        info!(db_path = %db_path, "Overriding database path");
        config = config.with_db_path(db_path);
    }

    let store = SqliteGroupStore::open(config.db_path().clone(), *config.busy_timeout_ms())?;
    let service = ExchangeService::from_entropy(Arc::new(store), config.policy());

    run(&service, cli.command)
}

#[instrument(skip(service))]
fn run(service: &ExchangeService<SqliteGroupStore>, command: Command) -> Result<()> {
    match command {
        Command::Create {
            title,
            budget,
            date,
            rules,
            participants,
        } => {
            let id = service.create_group(NewGroup::new(title, budget, date, rules, participants))?;
            if !service.minimum_size_satisfied(&id)? {
                println!(
                    "Note: add at least {} participants before drawing.",
                    service.policy().min_participants()
                );
            }
            println!("{id}");
        }
        Command::Add {
            group,
            name,
            contact,
            avatar,
        } => {
            let mut details = NewParticipant::named(name);
            if let Some(contact) = contact {
                details = details.with_contact_info(contact);
            }
            if let Some(avatar) = avatar {
                details = details.with_avatar_ref(avatar);
            }
            let id = service.add_participant_details(&group, details)?;
            println!("{id}");
        }
        Command::Remove { group, participant } => {
            let removed = service.remove_participant(&group, &participant)?;
            println!("Removed {}", removed.name());
        }
        Command::List { json } => {
            let groups = service.list_groups()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else if groups.is_empty() {
                println!("No groups yet.");
            } else {
                for summary in &groups {
                    print_summary(summary);
                }
            }
        }
        Command::Show { group, json } => {
            let group = service.group(&group)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&GroupSummary::from(&group))?);
            } else {
                print_group(&group);
            }
        }
        Command::Draw { group } => {
            service.generate_assignment(&group)?;
            println!("Pairs drawn. Each participant can now reveal their recipient.");
        }
        Command::Reveal { group, participant } => {
            let giver = service
                .group(&group)?
                .participant(&participant)
                .map(|p| p.name().clone());
            let recipient = service.reveal(&group, &participant)?;
            match giver {
                Some(giver) => println!("{giver}, you are Secret Santa for: {recipient}"),
                None => println!("You are Secret Santa for: {recipient}"),
            }
        }
        Command::Delete { group } => {
            service.delete_group(&group)?;
            println!("Deleted {group}");
        }
    }
    Ok(())
}

fn print_summary(summary: &GroupSummary) {
    println!(
        "{}  {}  {}  {} participants  ${:.0} limit  [{}]",
        summary.id(),
        summary.event_date(),
        summary.title(),
        summary.participant_count(),
        summary.budget(),
        summary.status()
    );
}

fn print_group(group: &ExchangeGroup) {
    println!("{} ({})", group.title(), group.id());
    println!(
        "{}  {} participants  ${:.0} limit  [{}]",
        group.event_date(),
        group.participants().len(),
        group.budget(),
        group.status()
    );
    if !group.rules().is_empty() {
        println!("Rules: {}", group.rules());
    }
    for participant in group.participants() {
        let state = match (group.status(), *participant.revealed()) {
            (GroupStatus::Draft, _) => "",
            (GroupStatus::Assigned, false) => "  hidden",
            (GroupStatus::Assigned, true) => "  seen",
        };
        println!("  {}  {}{}", participant.id(), participant.name(), state);
    }
}

#[instrument]
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,secret_santa=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Tracing initialized");
}
