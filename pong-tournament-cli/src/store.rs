use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pong_tournament_core::{TournamentRecord, TournamentStore};

use crate::{Error, Result};

/// A [`TournamentStore`] keeping all records as a single JSON array in a file.
#[derive(Clone, Debug)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, records: &[TournamentRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let buf = serde_json::to_vec_pretty(records)?;
        fs::write(&self.path, buf)?;

        Ok(())
    }
}

impl TournamentStore for JsonStore {
    type Error = Error;

    fn append(&mut self, record: TournamentRecord) -> Result<()> {
        log::debug!(
            "Appending tournament {} to {}",
            record.id,
            self.path.display()
        );

        let mut records = self.list()?;
        records.push(record);
        records.sort_by_key(|record| record.id);

        self.write(&records)
    }

    fn list(&self) -> Result<Vec<TournamentRecord>> {
        match fs::read(&self.path) {
            Ok(buf) => Ok(serde_json::from_slice(&buf)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn clear(&mut self) -> Result<()> {
        log::debug!("Clearing tournament history at {}", self.path.display());

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    use pong_tournament_core::{
        BracketEngine, EngineOptions, Seeding, TournamentId, TournamentRecord, TournamentStore,
    };

    use super::JsonStore;
    use crate::Error;

    fn scratch(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!(
            "pong-tournament-{}-{}.json",
            std::process::id(),
            name
        ));
        let _ = fs::remove_file(&path);
        path
    }

    fn record(id: i64) -> TournamentRecord {
        let mut engine =
            BracketEngine::with_options(EngineOptions::new().seeding(Seeding::Registration));
        for alias in ["left", "middle", "right"] {
            engine.add_entrant(alias).unwrap();
        }

        engine.generate_bracket().unwrap();
        while let Some(index) = engine.next_match_index() {
            engine.record_match_result(index, 5, 2).unwrap();
        }

        let mut record = engine.record().unwrap();
        record.id = TournamentId(id);
        record
    }

    #[test]
    fn test_json_store() {
        let path = scratch("store");
        let mut store = JsonStore::new(&path);

        assert!(store.list().unwrap().is_empty());

        let first = record(1);
        let second = record(2);
        store.append(second.clone()).unwrap();
        store.append(first.clone()).unwrap();

        let records = store.list().unwrap();
        assert_eq!(records, vec![first, second]);
        assert_eq!(records[1].winner.alias, "left");

        // A second store on the same file sees the same history.
        assert_eq!(JsonStore::new(&path).list().unwrap(), records);

        store.clear().unwrap();
        assert!(!path.exists());
        assert!(store.list().unwrap().is_empty());

        // Clearing an empty history is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_json_store_invalid_file() {
        let path = scratch("invalid");
        fs::write(&path, b"not json").unwrap();

        let store = JsonStore::new(&path);
        assert!(matches!(store.list().unwrap_err(), Error::Json(_)));

        fs::remove_file(&path).unwrap();
    }
}
