use clap::Subcommand;
use pong_tournament_core::{TournamentRecord, TournamentStore};

use crate::store::JsonStore;
use crate::utils::Prompt;
use crate::Result;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all finished tournaments.
    List,
    /// Delete all finished tournaments.
    Clear {
        /// Don't ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

impl Command {
    pub fn run(&self, store: &mut JsonStore) -> Result<()> {
        match self {
            Self::List => {
                let records = store.list()?;
                if records.is_empty() {
                    println!("No tournaments played yet");
                    return Ok(());
                }

                println!("ID | Date | Players | Winner | Matches");
                for record in records {
                    println!("{}", summary(&record));
                }
            }
            Self::Clear { yes } => {
                if !yes
                    && !Prompt::new("Are you sure you want to clear all tournament history? [y/N]")
                        .confirm()?
                {
                    return Ok(());
                }

                store.clear()?;
                println!("Cleared {}", store.path().display());
            }
        }

        Ok(())
    }
}

fn summary(record: &TournamentRecord) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        record.id,
        record.date.format("%Y-%m-%d %H:%M"),
        record.entrants.len(),
        record.winner.alias,
        record.matches_played()
    )
}
