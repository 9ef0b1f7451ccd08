use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub title: String,
    pub serial: Option<String>,
}

/// Game id -> title lookup built from `Game_DB.csv`.
///
/// Every non-empty cell of a row is a key for that row, so a game can be
/// found by serial, by alternate ids, or by the title itself. Keys are stored
/// raw and normalised; the first row to claim a key keeps it.
#[derive(Debug, Clone, Default)]
pub struct GameDb {
    entries: HashMap<String, GameRecord>,
}

impl GameDb {
    /// Loads the CSV at `path`. A missing or unreadable file leaves the
    /// database empty, which only means every id falls through to the
    /// device-reported name.
    pub fn load(path: &Path) -> Self {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "game database not loaded");
                return Self::default();
            }
        };
        match Self::from_reader(file) {
            Ok(db) => {
                info!(path = %path.display(), keys = db.len(), "loaded game database");
                db
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "game database unreadable");
                Self::default()
            }
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = csv
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
            .collect();
        let title_col = headers.iter().position(|h| h == "title");
        let serial_col = headers.iter().position(|h| h == "serial");

        let mut db = Self::default();
        for row in csv.records() {
            let row = row?;
            let title = title_col
                .and_then(|i| row.get(i))
                .map(str::trim)
                .unwrap_or_default();
            if title.is_empty() {
                continue;
            }
            let serial = serial_col
                .and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let record = GameRecord {
                title: title.to_string(),
                serial,
            };
            for cell in row.iter().filter(|c| !c.is_empty()) {
                db.entries
                    .entry(cell.to_string())
                    .or_insert_with(|| record.clone());
                db.entries
                    .entry(normalize(cell))
                    .or_insert_with(|| record.clone());
            }
        }
        Ok(db)
    }

    /// Exact key first, then the normalised form.
    pub fn lookup(&self, game_id: &str) -> Option<&GameRecord> {
        self.entries
            .get(game_id)
            .or_else(|| self.entries.get(&normalize(game_id)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Case and surrounding-whitespace insensitive form used for id matching.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}title,serial,alt_id\n\
God of War,SCUS-97399,SCUS_973.99\n\
Ico,SCUS-97113,\n\
God of War (Greatest Hits),SCUS-97399,\n\
,SLUS-00000,orphan\n";

    fn sample() -> GameDb {
        GameDb::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn finds_by_serial_and_alternate_id() {
        let db = sample();
        let gow = db.lookup("SCUS-97399").unwrap();
        assert_eq!(gow.title, "God of War");
        assert_eq!(gow.serial.as_deref(), Some("SCUS-97399"));
        assert_eq!(db.lookup("SCUS_973.99").unwrap().title, "God of War");
    }

    #[test]
    fn normalised_lookup_ignores_case_and_padding() {
        let db = sample();
        assert_eq!(db.lookup(" scus-97113 ").unwrap().title, "Ico");
    }

    #[test]
    fn first_row_keeps_a_shared_key() {
        let db = sample();
        assert_eq!(db.lookup("SCUS-97399").unwrap().title, "God of War");
        assert_eq!(
            db.lookup("God of War (Greatest Hits)").unwrap().title,
            "God of War (Greatest Hits)"
        );
    }

    #[test]
    fn rows_without_title_are_ignored() {
        let db = sample();
        assert!(db.lookup("SLUS-00000").is_none());
        assert!(db.lookup("orphan").is_none());
    }

    #[test]
    fn missing_file_is_an_empty_database() {
        let db = GameDb::load(Path::new("/no/such/Game_DB.csv"));
        assert!(db.is_empty());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Game_DB.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        let db = GameDb::load(&path);
        assert_eq!(db.lookup("SCUS-97113").unwrap().title, "Ico");
    }
}
