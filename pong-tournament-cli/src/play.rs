use clap::Args;
use pong_tournament_core::{
    BracketEngine, EntrantId, EntrantSpot, Error as TournamentError, Match, Seeding, TiePolicy,
    TournamentStore, MAX_ENTRANTS, MIN_ENTRANTS,
};

use crate::config::Config;
use crate::utils::Prompt;
use crate::{Error, Result};

#[derive(Debug, Args)]
pub struct Command {
    /// Seed the bracket in registration order instead of shuffling.
    #[arg(long)]
    seed_in_order: bool,
    /// Award tied matches to the second player instead of asking again.
    #[arg(long)]
    allow_ties: bool,
    /// The aliases of the entrants. Asks for them if none are given.
    aliases: Vec<String>,
}

impl Command {
    pub fn run<S>(&self, config: &Config, store: &mut S) -> Result<()>
    where
        S: TournamentStore<Error = Error>,
    {
        let mut options = config.engine;
        if self.seed_in_order {
            options.seeding = Seeding::Registration;
        }

        if self.allow_ties {
            options.tie_policy = TiePolicy::SecondPlayer;
        }

        let mut engine = BracketEngine::with_options(options);

        if self.aliases.is_empty() {
            register(&mut engine)?;
        } else {
            for alias in &self.aliases {
                engine.add_entrant(alias.as_str())?;
            }
        }

        engine.generate_bracket()?;

        while let Some(index) = engine.next_match_index() {
            print_bracket(&engine);

            let r#match = &engine.bracket()[index];
            println!();
            println!("Next up: {}", describe_match(&engine, r#match));

            let first = entrant_name(&engine, r#match.player1());
            let second = entrant_name(&engine, r#match.player2());

            loop {
                let score1 = Prompt::new(&format!("Score for {}", first)).read_valid()?;
                let score2 = Prompt::new(&format!("Score for {}", second)).read_valid()?;

                match engine.record_match_result(index, score1, score2) {
                    Ok(_) => break,
                    Err(err @ TournamentError::Tie { .. }) => println!("{}", err),
                    Err(err) => return Err(err.into()),
                }
            }
        }

        print_bracket(&engine);

        let Some(record) = engine.record() else {
            log::warn!("No playable match left but the tournament is not complete");
            return Ok(());
        };

        println!();
        println!("Tournament winner: {}", record.winner.alias);

        store.append(record)?;

        Ok(())
    }
}

/// Reads aliases until the tournament is full or an empty line is entered.
fn register(engine: &mut BracketEngine) -> Result<()> {
    println!(
        "Register {} to {} players. Enter an empty alias to start.",
        MIN_ENTRANTS, MAX_ENTRANTS
    );

    while engine.entrant_count() < MAX_ENTRANTS {
        let msg = format!("Player {}", engine.entrant_count() + 1);
        let alias = Prompt::new(&msg).read_line()?;
        let alias = alias.trim();

        if alias.is_empty() {
            if engine.entrant_count() >= MIN_ENTRANTS {
                break;
            }

            println!("At least {} players are required", MIN_ENTRANTS);
            continue;
        }

        engine.add_entrant(alias)?;
    }

    Ok(())
}

fn print_bracket(engine: &BracketEngine) {
    let rounds = engine.round_count();

    for (index, round) in engine.rounds().enumerate() {
        let number = index as u32 + 1;

        println!();
        if number == rounds {
            println!("Final");
        } else {
            println!("Round {}", number);
        }

        for r#match in round {
            println!("  {}", describe_match(engine, r#match));
        }
    }
}

fn describe_match(engine: &BracketEngine, r#match: &Match) -> String {
    let first = entrant_name(engine, r#match.player1());
    let second = entrant_name(engine, r#match.player2());

    let mut line = format!("{}. {} vs {}", r#match.match_number, first, second);

    if r#match.complete {
        match r#match.winner.and_then(|id| engine.entrant(id)) {
            Some(winner) => line.push_str(&format!(
                " ({}-{}, {} advances)",
                r#match.score.player1, r#match.score.player2, winner.alias
            )),
            None => line.push_str(" (no winner)"),
        }
    }

    line
}

fn entrant_name(engine: &BracketEngine, spot: &EntrantSpot<EntrantId>) -> String {
    match spot {
        EntrantSpot::Entrant(id) => match engine.entrant(*id) {
            Some(entrant) => entrant.alias.clone(),
            None => format!("#{}", id),
        },
        EntrantSpot::Empty => String::from("(bye)"),
        EntrantSpot::TBD => String::from("TBD"),
    }
}

#[cfg(test)]
mod tests {
    use pong_tournament_core::{BracketEngine, EngineOptions, EntrantId, EntrantSpot, Seeding};

    use super::{describe_match, entrant_name};

    fn engine() -> BracketEngine {
        let mut engine =
            BracketEngine::with_options(EngineOptions::new().seeding(Seeding::Registration));
        for alias in ["Alice", "Bob", "Carol"] {
            engine.add_entrant(alias).unwrap();
        }

        engine.generate_bracket().unwrap();
        engine
    }

    #[test]
    fn test_entrant_name() {
        let engine = engine();

        assert_eq!(
            entrant_name(&engine, &EntrantSpot::Entrant(EntrantId(2))),
            "Bob"
        );
        assert_eq!(
            entrant_name(&engine, &EntrantSpot::Entrant(EntrantId(9))),
            "#9"
        );
        assert_eq!(entrant_name(&engine, &EntrantSpot::Empty), "(bye)");
        assert_eq!(entrant_name(&engine, &EntrantSpot::TBD), "TBD");
    }

    #[test]
    fn test_describe_match() {
        let mut engine = engine();

        let bracket = engine.bracket();
        assert_eq!(
            describe_match(&engine, &bracket[0]),
            "1. Alice vs (bye) (5-0, Alice advances)"
        );
        assert_eq!(describe_match(&engine, &bracket[1]), "2. Bob vs Carol");
        assert_eq!(describe_match(&engine, &bracket[2]), "1. Alice vs TBD");

        engine.record_match_result(1, 3, 5).unwrap();
        assert_eq!(
            describe_match(&engine, &engine.bracket()[1]),
            "2. Bob vs Carol (3-5, Carol advances)"
        );
    }
}
