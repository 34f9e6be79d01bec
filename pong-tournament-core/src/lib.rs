//! # pong-tournament-core
//!
//! This crate contains the bracket engine behind the Pong tournament: a single elimination
//! bracket for 2 to 8 entrants with automatic byes.
//!
//! Important types:
//! - [`BracketEngine`]: Owns the entrants and the bracket of a single tournament. Registers
//! entrants, generates the bracket, records results and advances winners.
//! - [`Entrant`]: A registered competitor with its win and loss counters.
//! - [`Match`]: A *match* of two parties within the bracket.
//! - [`EntrantSpot`]: A *spot* within a match, which can contain an entrant, be permanently empty
//! or contain a to-be-done spot.
//! - [`TournamentRecord`]: The immutable snapshot of a finished tournament.
//! - [`TournamentStore`]: A place to keep [`TournamentRecord`]s after the tournament ends.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to almost all types.
//!
mod bracket;
mod id;
pub mod options;
mod record;
mod utils;

pub use bracket::{BracketEngine, Progress, Rounds, State};
pub use id::{EntrantId, TournamentId};
pub use options::{EngineOptions, Seeding, TiePolicy};
pub use record::{MemoryStore, TournamentRecord, TournamentStore};

use thiserror::Error;

use std::ops::{Index, IndexMut};
use std::result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The maximum number of entrants a tournament accepts.
pub const MAX_ENTRANTS: usize = 8;

/// The minimum number of entrants required to generate a bracket.
pub const MIN_ENTRANTS: usize = 2;

/// The score awarded to an entrant advancing through a bye.
pub const BYE_SCORE: u32 = 5;

/// A registered competitor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entrant {
    pub id: EntrantId,
    pub alias: String,
    pub wins: u32,
    pub losses: u32,
}

impl Entrant {
    /// Creates a new `Entrant` without any wins or losses.
    #[inline]
    pub fn new<S>(id: EntrantId, alias: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            id,
            alias: alias.into(),
            wins: 0,
            losses: 0,
        }
    }
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("tournament is full: at most {max} entrants are allowed")]
    CapacityExceeded { max: usize },
    #[error("not enough entrants: expected at least {min}, found {found}")]
    InsufficientEntrants { min: usize, found: usize },
    #[error("invalid match: index {index} but the bracket only has {length} matches")]
    InvalidMatch { index: usize, length: usize },
    #[error("match {index} is still waiting for its entrants")]
    MatchNotReady { index: usize },
    #[error("match {index} is already complete")]
    MatchAlreadyComplete { index: usize },
    #[error("match {index} cannot end in a tie ({score}-{score})")]
    Tie { index: usize, score: u32 },
    #[error("unknown entrant: {0}")]
    UnknownEntrant(EntrantId),
    #[error("not allowed while the tournament is {0}")]
    InvalidState(State),
}

/// The score of a [`Match`]. `player1` belongs to the first spot, `player2` to the second.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Score {
    pub player1: u32,
    pub player2: u32,
}

impl Score {
    #[inline]
    pub const fn new(player1: u32, player2: u32) -> Self {
        Self { player1, player2 }
    }

    /// Returns the score of a bye won by the entrant at `position`.
    #[inline]
    pub const fn bye(position: usize) -> Self {
        if position == 0 {
            Self::new(BYE_SCORE, 0)
        } else {
            Self::new(0, BYE_SCORE)
        }
    }
}

/// A match of two parties within the bracket.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    /// The round of the match, starting at 1.
    pub round: u32,
    /// The position of the match within its round, starting at 1.
    pub match_number: u32,
    pub entrants: [EntrantSpot<EntrantId>; 2],
    pub winner: Option<EntrantId>,
    pub complete: bool,
    pub score: Score,
}

impl Match {
    #[inline]
    pub fn new(round: u32, match_number: u32, entrants: [EntrantSpot<EntrantId>; 2]) -> Self {
        Self {
            round,
            match_number,
            entrants,
            winner: None,
            complete: false,
            score: Score::default(),
        }
    }

    /// Creates a match whose entrants are both still to be decided.
    #[inline]
    pub fn placeholder(round: u32, match_number: u32) -> Self {
        Self::new(round, match_number, [EntrantSpot::TBD, EntrantSpot::TBD])
    }

    /// Returns the spot of the first player.
    #[inline]
    pub fn player1(&self) -> &EntrantSpot<EntrantId> {
        &self.entrants[0]
    }

    /// Returns the spot of the second player.
    #[inline]
    pub fn player2(&self) -> &EntrantSpot<EntrantId> {
        &self.entrants[1]
    }

    /// Returns `true` if the match is not complete and both spots contain an entrant.
    #[inline]
    pub fn is_playable(&self) -> bool {
        !self.complete && self.entrants.iter().all(EntrantSpot::is_entrant)
    }

    /// Returns the losing entrant of a played match. Byes have no loser.
    pub fn loser(&self) -> Option<EntrantId> {
        let winner = self.winner?;

        self.entrants
            .iter()
            .filter_map(EntrantSpot::entrant)
            .copied()
            .find(|id| *id != winner)
    }

    /// Completes the match if it can never be played: a single entrant facing a permanently
    /// empty spot wins with a [`Score::bye`], two empty spots complete without a winner.
    ///
    /// Returns `true` if the match was completed.
    pub(crate) fn resolve_bye(&mut self) -> bool {
        if self.complete {
            return false;
        }

        match self.entrants {
            [EntrantSpot::Entrant(id), EntrantSpot::Empty] => {
                self.winner = Some(id);
                self.score = Score::bye(0);
            }
            [EntrantSpot::Empty, EntrantSpot::Entrant(id)] => {
                self.winner = Some(id);
                self.score = Score::bye(1);
            }
            [EntrantSpot::Empty, EntrantSpot::Empty] => {
                self.winner = None;
            }
            _ => return false,
        }

        self.complete = true;
        true
    }
}

impl Index<usize> for Match {
    type Output = EntrantSpot<EntrantId>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.entrants[index]
    }
}

impl IndexMut<usize> for Match {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.entrants[index]
    }
}

/// A spot for an Entrant in the bracket.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntrantSpot<T> {
    Entrant(T),
    /// The spot will never be filled. An entrant facing it advances with a bye.
    Empty,
    /// The spot waits for the result of an earlier match.
    TBD,
}

impl<T> EntrantSpot<T> {
    /// Creates a new `EntrantSpot` from an [`Option`]. A `Some(T)` value will translate into
    /// a `Entrant(T)` value, a `None` value will translate into a `Empty` value.
    pub fn new(entrant: Option<T>) -> Self {
        match entrant {
            Some(entrant) => Self::Entrant(entrant),
            None => Self::Empty,
        }
    }

    /// Returns `true` if the `EntrantSpot` is [`Entrant`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use pong_tournament_core::EntrantSpot;
    /// let spot = EntrantSpot::Entrant(());
    /// assert!(spot.is_entrant());
    /// ```
    /// [`Entrant`]: Self::Entrant
    pub fn is_entrant(&self) -> bool {
        matches!(self, Self::Entrant(_))
    }

    /// Returns `true` if the `EntrantSpot` is [`Empty`].
    ///
    /// [`Empty`]: Self::Empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if the `EntrantSpot` is [`TBD`].
    ///
    /// [`TBD`]: Self::TBD
    pub fn is_tbd(&self) -> bool {
        matches!(self, Self::TBD)
    }

    /// Returns a reference to the entrant, or `None` if the spot holds none.
    pub fn entrant(&self) -> Option<&T> {
        match self {
            Self::Entrant(entrant) => Some(entrant),
            _ => None,
        }
    }

    /// Converts an `&EntrantSpot<T>` into an `EntrantSpot<&T>`.
    pub fn as_ref(&self) -> EntrantSpot<&T> {
        match *self {
            Self::Entrant(ref entrant) => EntrantSpot::Entrant(entrant),
            Self::Empty => EntrantSpot::Empty,
            Self::TBD => EntrantSpot::TBD,
        }
    }

    /// Maps `EntrantSpot<T>` to `EntrantSpot<U>` by applying `f` on it.
    pub fn map<U, F>(self, f: F) -> EntrantSpot<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Entrant(entrant) => EntrantSpot::Entrant(f(entrant)),
            Self::Empty => EntrantSpot::Empty,
            Self::TBD => EntrantSpot::TBD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EntrantId, EntrantSpot, Match, Score};

    #[test]
    fn test_match_resolve_bye() {
        let mut r#match = Match::new(
            1,
            1,
            [EntrantSpot::Entrant(EntrantId(3)), EntrantSpot::Empty],
        );
        assert!(r#match.resolve_bye());
        assert!(r#match.complete);
        assert_eq!(r#match.winner, Some(EntrantId(3)));
        assert_eq!(r#match.score, Score::new(5, 0));
        assert_eq!(r#match.loser(), None);

        // Already resolved.
        assert!(!r#match.resolve_bye());

        let mut r#match = Match::new(
            1,
            2,
            [EntrantSpot::Empty, EntrantSpot::Entrant(EntrantId(1))],
        );
        assert!(r#match.resolve_bye());
        assert_eq!(r#match.winner, Some(EntrantId(1)));
        assert_eq!(r#match.score, Score::new(0, 5));

        let mut r#match = Match::new(1, 3, [EntrantSpot::Empty, EntrantSpot::Empty]);
        assert!(r#match.resolve_bye());
        assert!(r#match.complete);
        assert_eq!(r#match.winner, None);
        assert_eq!(r#match.score, Score::default());

        // A spot waiting for an earlier match is never a bye.
        let mut r#match = Match::new(2, 1, [EntrantSpot::Entrant(EntrantId(1)), EntrantSpot::TBD]);
        assert!(!r#match.resolve_bye());
        assert!(!r#match.complete);

        let mut r#match = Match::placeholder(2, 1);
        assert!(!r#match.resolve_bye());
    }

    #[test]
    fn test_match_playable() {
        let mut r#match = Match::new(
            1,
            1,
            [
                EntrantSpot::Entrant(EntrantId(1)),
                EntrantSpot::Entrant(EntrantId(2)),
            ],
        );
        assert!(r#match.is_playable());

        r#match.complete = true;
        r#match.winner = Some(EntrantId(2));
        assert!(!r#match.is_playable());
        assert_eq!(r#match.loser(), Some(EntrantId(1)));

        let r#match = Match::new(2, 1, [EntrantSpot::Entrant(EntrantId(1)), EntrantSpot::TBD]);
        assert!(!r#match.is_playable());
    }

    #[test]
    fn test_entrant_spot() {
        let spot = EntrantSpot::new(Some(1));
        assert!(spot.is_entrant());
        assert_eq!(spot.entrant(), Some(&1));
        assert_eq!(spot.map(|n| n * 2), EntrantSpot::Entrant(2));

        let spot: EntrantSpot<i32> = EntrantSpot::new(None);
        assert!(spot.is_empty());
        assert_eq!(spot.entrant(), None);

        let spot: EntrantSpot<i32> = EntrantSpot::TBD;
        assert!(spot.is_tbd());
        assert_eq!(spot.as_ref(), EntrantSpot::TBD);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_match_serde() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(
            &EntrantSpot::Entrant(EntrantId(4)),
            &[
                Token::NewtypeVariant {
                    name: "EntrantSpot",
                    variant: "Entrant",
                },
                Token::U32(4),
            ],
        );
        assert_tokens(
            &EntrantSpot::<EntrantId>::TBD,
            &[Token::UnitVariant {
                name: "EntrantSpot",
                variant: "TBD",
            }],
        );
        assert_tokens(
            &Score::new(5, 0),
            &[
                Token::Struct {
                    name: "Score",
                    len: 2,
                },
                Token::Str("player1"),
                Token::U32(5),
                Token::Str("player2"),
                Token::U32(0),
                Token::StructEnd,
            ],
        );
    }
}
