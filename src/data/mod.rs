pub mod cache;
pub mod dates;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{Result, StatsError};
use crate::faction::Faction;
use crate::logging::{log, log_load, obj, v_str, Domain, Level};

pub use dates::parse_mixed_date;

pub const DEFAULT_GAMES_CSV: &str = "Finished Games.csv";

pub const COL_GAME_NAME: &str = "Game Name";
pub const COL_START_DATE: &str = "Start Date";
pub const COL_END_DATE: &str = "End Date";
pub const COL_WINNING_FACTION: &str = "Winning Faction";
pub const COL_ALIGNMENTS: &str = "Alignments Present";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_GAME_NAME,
    COL_START_DATE,
    COL_END_DATE,
    COL_WINNING_FACTION,
    COL_ALIGNMENTS,
];

/// One finished game. `end_date` is inclusive and never before `start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub winning_faction: String,
    pub alignments_present: String,
}

impl GameRecord {
    /// Inclusive length in days.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// All finished games in source order (not chronological).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameHistory {
    records: Vec<GameRecord>,
}

impl GameHistory {
    pub fn new(records: Vec<GameRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    /// (earliest start, latest end), or `None` for an empty history.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min_start = self.records.iter().map(|r| r.start_date).min()?;
        let max_end = self.records.iter().map(|r| r.end_date).max()?;
        Some((min_start, max_end))
    }
}

impl<'a> IntoIterator for &'a GameHistory {
    type Item = &'a GameRecord;
    type IntoIter = std::slice::Iter<'a, GameRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

struct ColumnMap {
    game_name: usize,
    start_date: usize,
    end_date: usize,
    winning_faction: usize,
    alignments: usize,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| StatsError::data_format(None, name, "required column is missing"))
        };
        Ok(Self {
            game_name: find(COL_GAME_NAME)?,
            start_date: find(COL_START_DATE)?,
            end_date: find(COL_END_DATE)?,
            winning_faction: find(COL_WINNING_FACTION)?,
            alignments: find(COL_ALIGNMENTS)?,
        })
    }
}

fn field<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("").trim()
}

fn parse_date_field(
    record: &StringRecord,
    idx: usize,
    row: usize,
    column: &str,
) -> Result<NaiveDate> {
    let raw = field(record, idx);
    parse_mixed_date(raw).ok_or_else(|| {
        StatsError::data_format(Some(row), column, format!("cannot parse date `{}`", raw))
    })
}

/// Parse a games table from any reader. Blank rows are skipped; faction text
/// is kept verbatim.
pub fn parse_history<R: Read>(reader: R) -> Result<GameHistory> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let header = rdr.headers()?.clone();
    let cols = ColumnMap::from_header(&header)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let start_date = parse_date_field(&record, cols.start_date, row, COL_START_DATE)?;
        let end_date = parse_date_field(&record, cols.end_date, row, COL_END_DATE)?;
        if end_date < start_date {
            return Err(StatsError::data_format(
                Some(row),
                COL_END_DATE,
                format!("end date {} is before start date {}", end_date, start_date),
            ));
        }
        records.push(GameRecord {
            game_name: field(&record, cols.game_name).to_string(),
            start_date,
            end_date,
            winning_faction: field(&record, cols.winning_faction).to_string(),
            alignments_present: field(&record, cols.alignments).to_string(),
        });
    }
    Ok(GameHistory::new(records))
}

pub fn load_history(path: &Path) -> Result<GameHistory> {
    let started = Instant::now();
    let file = File::open(path).map_err(|e| StatsError::io(path, e))?;
    let history = parse_history(file)?;
    log_load(
        &path.display().to_string(),
        history.len(),
        started.elapsed().as_millis() as u64,
    );
    Ok(history)
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| StatsError::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| StatsError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

// =============================================================================
// Manifest
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryManifest {
    pub path: String,
    pub hash_sha256: String,
    pub row_count: u64,
    pub min_start_date: Option<NaiveDate>,
    pub max_end_date: Option<NaiveDate>,
    pub columns: Vec<String>,
    pub warnings: Vec<String>,
    pub generated_at: String,
}

/// Fingerprint a games table and flag rows whose faction text the engines
/// will not recognise. Format errors still fail the whole analysis.
pub fn analyze_history(path: &Path, generated_at: &str) -> Result<HistoryManifest> {
    let hash = file_sha256(path)?;
    let file = File::open(path).map_err(|e| StatsError::io(path, e))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);
    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let history = load_history(path)?;
    let mut warnings = Vec::new();
    for col in &columns {
        if !REQUIRED_COLUMNS.contains(&col.as_str()) {
            warnings.push(format!("extra_column: {}", col));
        }
    }
    for record in &history {
        let named_winner = Faction::ALL
            .iter()
            .any(|f| f.is_named_in_ignore_case(&record.winning_faction));
        if !named_winner {
            warnings.push(format!(
                "unknown_winner: {} ({:?})",
                record.game_name, record.winning_faction
            ));
        }
        let any_present = Faction::ALL
            .iter()
            .any(|f| f.is_present_in(&record.alignments_present));
        if !any_present {
            warnings.push(format!("no_alignments: {}", record.game_name));
        }
    }
    for w in &warnings {
        log(Level::Warn, Domain::Data, "manifest_warning", obj(&[("msg", v_str(w))]));
    }

    let (min_start_date, max_end_date) = match history.date_span() {
        Some((lo, hi)) => (Some(lo), Some(hi)),
        None => (None, None),
    };

    Ok(HistoryManifest {
        path: path.display().to_string(),
        hash_sha256: hash,
        row_count: history.len() as u64,
        min_start_date,
        max_end_date,
        columns,
        warnings,
        generated_at: generated_at.to_string(),
    })
}

pub fn default_manifest_path(dataset_path: &Path) -> PathBuf {
    let mut p = dataset_path.to_path_buf();
    let fname = dataset_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("games.csv");
    p.set_file_name(format!("{}.manifest.json", fname));
    p
}
