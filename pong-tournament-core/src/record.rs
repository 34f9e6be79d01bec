use std::convert::Infallible;

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Entrant, EntrantId, Match, TournamentId};

/// The snapshot of a finished tournament, created once the final is decided.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TournamentRecord {
    pub id: TournamentId,
    /// The point in time the final was decided.
    pub date: DateTime<Utc>,
    pub entrants: Vec<Entrant>,
    pub winner: Entrant,
    pub bracket: Vec<Match>,
}

impl TournamentRecord {
    pub fn entrant(&self, id: EntrantId) -> Option<&Entrant> {
        self.entrants.iter().find(|entrant| entrant.id == id)
    }

    /// Returns the number of matches that were actually played. Byes are not included.
    pub fn matches_played(&self) -> usize {
        self.bracket
            .iter()
            .filter(|r#match| r#match.complete && r#match.loser().is_some())
            .count()
    }
}

/// A durable list of [`TournamentRecord`]s, ordered by their id.
pub trait TournamentStore {
    type Error;

    /// Appends a finished tournament.
    fn append(&mut self, record: TournamentRecord) -> Result<(), Self::Error>;

    /// Returns all stored tournaments, oldest first.
    fn list(&self) -> Result<Vec<TournamentRecord>, Self::Error>;

    /// Removes all stored tournaments.
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// A [`TournamentStore`] that keeps the records in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Vec<TournamentRecord>,
}

impl MemoryStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TournamentStore for MemoryStore {
    type Error = Infallible;

    fn append(&mut self, record: TournamentRecord) -> Result<(), Self::Error> {
        log::debug!("Storing tournament {}", record.id);

        let index = self.records.partition_point(|r| r.id <= record.id);
        self.records.insert(index, record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<TournamentRecord>, Self::Error> {
        Ok(self.records.clone())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStore, TournamentStore};
    use crate::{BracketEngine, EngineOptions, EntrantId, Seeding, TournamentId};

    fn finished(entrants: usize) -> BracketEngine {
        let mut engine =
            BracketEngine::with_options(EngineOptions::new().seeding(Seeding::Registration));
        for index in 0..entrants {
            engine.add_entrant(format!("player{}", index + 1)).unwrap();
        }

        engine.generate_bracket().unwrap();
        while let Some(index) = engine.next_match_index() {
            engine.record_match_result(index, 1, 5).unwrap();
        }

        engine
    }

    #[test]
    fn test_record_matches_played() {
        let record = finished(3).record().unwrap();
        assert_eq!(record.bracket.len(), 3);
        assert_eq!(record.matches_played(), 2);
        assert_eq!(record.entrant(EntrantId(2)).unwrap().alias, "player2");
        assert!(record.entrant(EntrantId(4)).is_none());

        let record = finished(8).record().unwrap();
        assert_eq!(record.matches_played(), 7);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.list().unwrap().is_empty());

        let mut first = finished(2).record().unwrap();
        first.id = TournamentId(20);
        let mut second = finished(4).record().unwrap();
        second.id = TournamentId(10);

        store.append(first).unwrap();
        store.append(second).unwrap();
        assert_eq!(store.len(), 2);

        let ids: Vec<TournamentId> = store.list().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![TournamentId(10), TournamentId(20)]);

        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
