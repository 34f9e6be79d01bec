use crate::options::{EngineOptions, Seeding, TiePolicy};
use crate::utils::NumExt;
use crate::{Entrant, EntrantId, EntrantSpot, Error, Match, Result, Score, TournamentId};
use crate::{TournamentRecord, MAX_ENTRANTS, MIN_ENTRANTS};

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::iter::FusedIterator;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// The lifecycle of a [`BracketEngine`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// Accepting entrants, but not enough to generate a bracket.
    Registering,
    /// Accepting entrants and enough are registered to generate a bracket.
    Ready,
    /// The bracket has been generated and the final is not decided yet.
    InProgress,
    /// The final has a winner.
    Complete,
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Registering => "registering",
            Self::Ready => "ready",
            Self::InProgress => "in progress",
            Self::Complete => "complete",
        })
    }
}

/// The outcome of a recorded match result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    /// There are still matches left to play.
    Continue,
    /// The result decided the final. See [`BracketEngine::record`].
    Complete,
}

/// A single elimination tournament for up to [`MAX_ENTRANTS`] entrants.
///
/// The bracket is stored as a flat list of matches, round after round. Round `r` contains
/// `bracket_size / 2^r` matches and the last match is the final.
#[derive(Clone, Debug)]
pub struct BracketEngine {
    id: TournamentId,
    entrants: Vec<Entrant>,
    last_id: u32,
    matches: Vec<Match>,
    bracket_size: usize,
    state: State,
    winner: Option<EntrantId>,
    completed_at: Option<DateTime<Utc>>,
    options: EngineOptions,
}

impl BracketEngine {
    /// Creates a new `BracketEngine` using the default [`EngineOptions`].
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        let id = TournamentId(Utc::now().timestamp_millis());
        log::debug!("Creating tournament {} using options: {:?}", id, options);

        Self {
            id,
            entrants: Vec::new(),
            last_id: 0,
            matches: Vec::new(),
            bracket_size: 0,
            state: State::Registering,
            winner: None,
            completed_at: None,
            options,
        }
    }

    #[inline]
    pub fn id(&self) -> TournamentId {
        self.id
    }

    #[inline]
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    /// Registers a new entrant and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if [`MAX_ENTRANTS`] entrants are already registered
    /// and [`Error::InvalidState`] if the bracket has already been generated.
    pub fn add_entrant<S>(&mut self, alias: S) -> Result<EntrantId>
    where
        S: Into<String>,
    {
        self.ensure_registering()?;

        if self.entrants.len() >= MAX_ENTRANTS {
            return Err(Error::CapacityExceeded { max: MAX_ENTRANTS });
        }

        self.last_id += 1;
        let entrant = Entrant::new(EntrantId(self.last_id), alias);
        log::debug!("Registering entrant {} ({})", entrant.id, entrant.alias);

        let id = entrant.id;
        self.entrants.push(entrant);
        self.update_registration_state();

        Ok(id)
    }

    /// Removes a registered entrant before the bracket is generated. The id of the removed
    /// entrant is not handed out again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntrant`] if no entrant with `id` exists and
    /// [`Error::InvalidState`] if the bracket has already been generated.
    pub fn remove_entrant(&mut self, id: EntrantId) -> Result<Entrant> {
        self.ensure_registering()?;

        let index = self
            .entrants
            .iter()
            .position(|entrant| entrant.id == id)
            .ok_or(Error::UnknownEntrant(id))?;

        let entrant = self.entrants.remove(index);
        log::debug!("Removed entrant {} ({})", entrant.id, entrant.alias);

        self.update_registration_state();
        Ok(entrant)
    }

    /// Returns the number of registered entrants.
    #[inline]
    pub fn entrant_count(&self) -> usize {
        self.entrants.len()
    }

    #[inline]
    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    pub fn entrant(&self, id: EntrantId) -> Option<&Entrant> {
        self.entrants.iter().find(|entrant| entrant.id == id)
    }

    /// Generates the bracket, seeding the entrants according to [`EngineOptions::seeding`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientEntrants`] if less than [`MIN_ENTRANTS`] entrants are
    /// registered and [`Error::InvalidState`] if the bracket has already been generated.
    #[inline]
    pub fn generate_bracket(&mut self) -> Result<()> {
        self.generate_bracket_with_rng(&mut rand::thread_rng())
    }

    /// Generates the bracket using `rng` for a shuffled seeding.
    ///
    /// # Errors
    ///
    /// See [`generate_bracket`].
    ///
    /// [`generate_bracket`]: Self::generate_bracket
    pub fn generate_bracket_with_rng<R>(&mut self, rng: &mut R) -> Result<()>
    where
        R: Rng + ?Sized,
    {
        self.ensure_registering()?;

        if self.entrants.len() < MIN_ENTRANTS {
            return Err(Error::InsufficientEntrants {
                min: MIN_ENTRANTS,
                found: self.entrants.len(),
            });
        }

        let bracket_size = self.entrants.len().next_power_of_two();
        let rounds = bracket_size.ilog2_ceil();

        let mut seeds: Vec<EntrantId> = self.entrants.iter().map(|entrant| entrant.id).collect();
        if self.options.seeding == Seeding::Shuffle {
            seeds.shuffle(rng);
        }

        log::debug!(
            "Creating new bracket of size {} with {} entrants over {} rounds",
            bracket_size,
            seeds.len(),
            rounds
        );

        let mut matches = Vec::with_capacity(bracket_size - 1);

        // Seed `i` faces seed `bracket_size - 1 - i`. Seeds past the last entrant are byes.
        for index in 0..bracket_size / 2 {
            let first = EntrantSpot::new(seeds.get(index).copied());
            let second = EntrantSpot::new(seeds.get(bracket_size - 1 - index).copied());

            let mut r#match = Match::new(1, index as u32 + 1, [first, second]);
            if r#match.resolve_bye() {
                log::debug!("Match 1-{} is a bye", r#match.match_number);
            }

            matches.push(r#match);
        }

        for round in 2..=rounds {
            for match_number in 1..=(bracket_size >> round) {
                matches.push(Match::placeholder(round, match_number as u32));
            }
        }

        self.matches = matches;
        self.bracket_size = bracket_size;
        self.state = State::InProgress;

        self.advance();

        Ok(())
    }

    /// Returns the size of the bracket, the smallest power of two that fits all entrants.
    /// Returns `0` before the bracket is generated.
    #[inline]
    pub fn bracket_size(&self) -> usize {
        self.bracket_size
    }

    /// Returns the number of rounds in the bracket. The last round is the final.
    #[inline]
    pub fn round_count(&self) -> u32 {
        self.bracket_size.ilog2_ceil()
    }

    /// Returns all matches of the bracket, ordered by round and match number.
    #[inline]
    pub fn bracket(&self) -> &[Match] {
        &self.matches
    }

    /// Returns an iterator over the rounds of the bracket.
    #[inline]
    pub fn rounds(&self) -> Rounds<'_> {
        Rounds {
            matches: &self.matches,
            len: self.bracket_size / 2,
        }
    }

    /// Returns the matches of `round`, starting at round 1.
    pub fn round(&self, round: u32) -> Option<&[Match]> {
        if round == 0 || round > self.round_count() {
            return None;
        }

        let start = self.bracket_size.round_offset(round);
        let end = start + (self.bracket_size >> round);

        self.matches.get(start..end)
    }

    /// Returns the match with `match_number` in `round`.
    pub fn get_match(&self, round: u32, match_number: u32) -> Option<&Match> {
        if match_number == 0 {
            return None;
        }

        self.round(round)?.get(match_number as usize - 1)
    }

    /// Returns the first match in bracket order that is not complete and has both entrants.
    #[inline]
    pub fn next_match(&self) -> Option<&Match> {
        self.next_match_index().map(|index| &self.matches[index])
    }

    /// Returns the index of the match returned by [`next_match`].
    ///
    /// [`next_match`]: Self::next_match
    #[inline]
    pub fn next_match_index(&self) -> Option<usize> {
        self.matches.iter().position(Match::is_playable)
    }

    /// Records the result of the match at `index`, advances the winner and reports whether the
    /// tournament is now complete.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMatch`] if `index` is out-of-bounds,
    /// [`Error::MatchAlreadyComplete`] if the match has already been decided,
    /// [`Error::MatchNotReady`] if the match does not have two entrants yet and [`Error::Tie`]
    /// if both scores are equal and [`TiePolicy::Reject`] is used. The engine is left unchanged
    /// in all of these cases.
    pub fn record_match_result(
        &mut self,
        index: usize,
        score1: u32,
        score2: u32,
    ) -> Result<Progress> {
        let r#match = self.matches.get(index).ok_or(Error::InvalidMatch {
            index,
            length: self.matches.len(),
        })?;

        if r#match.complete {
            return Err(Error::MatchAlreadyComplete { index });
        }

        let (first, second) = match r#match.entrants {
            [EntrantSpot::Entrant(first), EntrantSpot::Entrant(second)] => (first, second),
            _ => return Err(Error::MatchNotReady { index }),
        };

        let (winner, loser) = match score1.cmp(&score2) {
            Ordering::Greater => (first, second),
            Ordering::Less => (second, first),
            Ordering::Equal => match self.options.tie_policy {
                TiePolicy::Reject => return Err(Error::Tie { index, score: score1 }),
                TiePolicy::SecondPlayer => (second, first),
            },
        };

        log::debug!(
            "Match {}-{} ended {}-{}, winner: {}",
            r#match.round,
            r#match.match_number,
            score1,
            score2,
            winner
        );

        let r#match = &mut self.matches[index];
        r#match.score = Score::new(score1, score2);
        r#match.winner = Some(winner);
        r#match.complete = true;

        if let Some(entrant) = self.entrant_mut(winner) {
            entrant.wins += 1;
        }

        if let Some(entrant) = self.entrant_mut(loser) {
            entrant.losses += 1;
        }

        self.advance();

        if self.is_complete() {
            Ok(Progress::Complete)
        } else {
            Ok(Progress::Continue)
        }
    }

    /// Returns the champion once the final has been decided.
    #[inline]
    pub fn winner(&self) -> Option<&Entrant> {
        self.winner.and_then(|id| self.entrant(id))
    }

    /// Returns the snapshot of the finished tournament. Returns `None` until the final is
    /// decided.
    pub fn record(&self) -> Option<TournamentRecord> {
        let winner = self.winner()?.clone();
        let date = self.completed_at?;

        Some(TournamentRecord {
            id: self.id,
            date,
            entrants: self.entrants.clone(),
            winner,
            bracket: self.matches.clone(),
        })
    }

    /// Moves the outcome of every decided match into the match following it until nothing
    /// changes anymore. Matches left with a single entrant and a permanently empty spot are
    /// completed as byes on the way.
    fn advance(&mut self) {
        // Every scan settles at least one more round.
        let max_scans = self.round_count() + 1;

        for _ in 0..max_scans {
            let mut changed = false;

            for index in 0..self.matches.len() {
                let Some((next_index, position)) = self.next_slot(index) else {
                    continue;
                };

                let (complete, winner) = {
                    let r#match = &self.matches[index];
                    (r#match.complete, r#match.winner)
                };

                if !complete {
                    continue;
                }

                let next = &mut self.matches[next_index];
                if next[position].is_tbd() {
                    next[position] = EntrantSpot::new(winner);
                    changed = true;

                    log::debug!(
                        "Advancing {:?} into match {}-{}",
                        next[position],
                        next.round,
                        next.match_number
                    );
                }

                if next.resolve_bye() {
                    changed = true;

                    log::debug!("Match {}-{} is a bye", next.round, next.match_number);
                }
            }

            if !changed {
                break;
            }
        }

        if self.state != State::InProgress {
            return;
        }

        if let Some(r#final) = self.matches.last() {
            if let (true, Some(winner)) = (r#final.complete, r#final.winner) {
                self.state = State::Complete;
                self.winner = Some(winner);
                self.completed_at = Some(Utc::now());

                log::info!("Tournament {} complete, winner: {}", self.id, winner);
            }
        }
    }

    /// Returns the index of the match that the winner of the match at `index` advances into
    /// together with the spot it takes. The final has no following match.
    fn next_slot(&self, index: usize) -> Option<(usize, usize)> {
        if index + 1 >= self.matches.len() {
            None
        } else {
            Some((self.bracket_size / 2 + index / 2, index % 2))
        }
    }

    fn entrant_mut(&mut self, id: EntrantId) -> Option<&mut Entrant> {
        self.entrants.iter_mut().find(|entrant| entrant.id == id)
    }

    fn ensure_registering(&self) -> Result<()> {
        match self.state {
            State::Registering | State::Ready => Ok(()),
            state => Err(Error::InvalidState(state)),
        }
    }

    fn update_registration_state(&mut self) {
        self.state = if self.entrants.len() >= MIN_ENTRANTS {
            State::Ready
        } else {
            State::Registering
        };
    }
}

impl Default for BracketEngine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the rounds of a [`BracketEngine`]. Each item holds the matches of a single
/// round.
#[derive(Clone, Debug)]
pub struct Rounds<'a> {
    matches: &'a [Match],
    len: usize,
}

impl<'a> Iterator for Rounds<'a> {
    type Item = &'a [Match];

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.len.min(self.matches.len());
        if len == 0 {
            return None;
        }

        let (round, rest) = self.matches.split_at(len);
        self.matches = rest;
        self.len = (self.len / 2).max(1);

        Some(round)
    }
}

impl<'a> FusedIterator for Rounds<'a> {}
