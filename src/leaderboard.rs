use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ImportError, StorageError};
use crate::storage::ScoreStore;

/// Fixed key the score blob is persisted under.
pub const STORAGE_KEY: &str = "cybersnake_leaderboard";

/// The board keeps only the top N records.
pub const MAX_RECORDS: usize = 10;

const EXPORT_VERSION: &str = "1.0";

/// One recorded result. Immutable once created; serde round-trips the exact
/// stored layout (`score`, `player`, ISO-8601 `date`, epoch-ms `timestamp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    pub player: String,
    pub date: String,
    pub timestamp: i64,
}

/// Row shape handed to the leaderboard scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedScore {
    pub rank: usize,
    pub score: u32,
    pub player: String,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total_games: usize,
    pub average_score: u32,
    pub high_score: u32,
    pub total_score: u64,
}

/// Export/import payload. `version` gates imports; unknown shapes are
/// rejected without touching the existing records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPayload {
    pub version: String,
    pub export_date: String,
    pub scores: Vec<ScoreRecord>,
}

/// Top-10 score list persisted through a [`ScoreStore`].
///
/// Loaded once at construction; every mutation re-sorts (stable, descending
/// by score), truncates to [`MAX_RECORDS`], and persists best-effort.
pub struct Leaderboard {
    store: Box<dyn ScoreStore>,
    scores: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        let scores = load_scores(store.as_ref());
        log::info!("leaderboard loaded: {} record(s)", scores.len());
        Self { store, scores }
    }

    /// Records a result and returns its 1-based rank.
    ///
    /// The rank is the record's position after sorting but before the top-10
    /// cap is applied, so a result that falls off the board still reports
    /// where it landed (11 or worse).
    pub fn add_score(&mut self, score: u32, player: &str) -> usize {
        let now = Utc::now();
        self.scores.push(ScoreRecord {
            score,
            player: player.to_string(),
            date: now.to_rfc3339(),
            timestamp: now.timestamp_millis(),
        });

        // Stable sort: among equal scores the earlier insertion wins, so the
        // record just pushed is the last one carrying its score.
        self.scores.sort_by(|a, b| b.score.cmp(&a.score));
        let rank = self
            .scores
            .iter()
            .rposition(|r| r.score == score)
            .map(|i| i + 1)
            .unwrap_or(self.scores.len());

        self.scores.truncate(MAX_RECORDS);
        self.save();
        rank
    }

    /// Highest recorded score, 0 when the board is empty.
    pub fn get_high_score(&self) -> u32 {
        self.scores.first().map(|r| r.score).unwrap_or(0)
    }

    /// True iff `score` beats every recorded score.
    pub fn is_new_record(&self, score: u32) -> bool {
        score > self.get_high_score()
    }

    /// True iff `score` would stay on the board after the cap.
    pub fn is_top_score(&self, score: u32) -> bool {
        self.scores.len() < MAX_RECORDS
            || self.scores.last().map(|r| score > r.score).unwrap_or(true)
    }

    /// Ranked rows with human-friendly dates, ready for display.
    pub fn get_leaderboard(&self) -> Vec<RankedScore> {
        let now = Utc::now();
        self.scores
            .iter()
            .enumerate()
            .map(|(i, r)| RankedScore {
                rank: i + 1,
                score: r.score,
                player: r.player.clone(),
                date: format_date(&r.date, now),
            })
            .collect()
    }

    pub fn get_stats(&self) -> Stats {
        if self.scores.is_empty() {
            return Stats::default();
        }
        let total_score: u64 = self.scores.iter().map(|r| u64::from(r.score)).sum();
        Stats {
            total_games: self.scores.len(),
            average_score: (total_score as f64 / self.scores.len() as f64).round() as u32,
            high_score: self.get_high_score(),
            total_score,
        }
    }

    pub fn clear(&mut self) {
        self.scores.clear();
        self.save();
    }

    pub fn export_data(&self) -> ExportPayload {
        ExportPayload {
            version: EXPORT_VERSION.to_string(),
            export_date: Utc::now().to_rfc3339(),
            scores: self.scores.clone(),
        }
    }

    /// Replaces the record set wholesale from an exported payload.
    ///
    /// Rejects payloads missing `version` or carrying a non-array `scores`
    /// field; a rejected import leaves existing records untouched.
    pub fn import_data(&mut self, data: &serde_json::Value) -> Result<(), ImportError> {
        if data.get("version").map(|v| v.is_null()).unwrap_or(true) {
            return Err(ImportError::MissingVersion);
        }
        let scores = data
            .get("scores")
            .filter(|v| v.is_array())
            .ok_or(ImportError::BadScores)?;
        let scores: Vec<ScoreRecord> =
            serde_json::from_value(scores.clone()).map_err(|_| ImportError::BadScores)?;

        self.scores = scores;
        self.save();
        Ok(())
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.scores
    }

    fn save(&mut self) {
        let json = match serde_json::to_string(&self.scores) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("failed to encode scores: {e}");
                return;
            }
        };
        if let Err(e) = self.store.write(STORAGE_KEY, &json) {
            log::warn!("failed to save scores: {e}");
        }
    }
}

fn load_scores(store: &dyn ScoreStore) -> Vec<ScoreRecord> {
    let stored = match store.read(STORAGE_KEY) {
        Ok(stored) => stored,
        Err(e) => {
            log::warn!("failed to load scores: {e}");
            return Vec::new();
        }
    };
    let Some(text) = stored else {
        return Vec::new();
    };
    match serde_json::from_str(&text) {
        Ok(scores) => scores,
        Err(e) => {
            let err = StorageError::Corrupt {
                key: STORAGE_KEY.to_string(),
                message: e.to_string(),
            };
            log::warn!("{err}, starting empty");
            Vec::new()
        }
    }
}

/// "Today" / "Yesterday" / "N days ago" for the past week, plain date after.
fn format_date(date: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(date) else {
        return date.to_string();
    };
    let days = (now - then.with_timezone(&Utc)).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        _ => then.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BrokenStore, FileStore, MemStore, ScoreStore};
    use chrono::Duration;

    fn empty_board() -> Leaderboard {
        Leaderboard::new(Box::new(MemStore::default()))
    }

    #[test]
    fn ranks_follow_score_order() {
        let mut board = empty_board();

        assert_eq!(board.add_score(100, "A"), 1);
        assert_eq!(board.get_high_score(), 100);

        assert_eq!(board.add_score(50, "B"), 2);
        let scores: Vec<u32> = board.records().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![100, 50]);

        assert_eq!(board.add_score(150, "C"), 1);
        let scores: Vec<u32> = board.records().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![150, 100, 50]);
    }

    #[test]
    fn board_is_capped_and_sorted() {
        let mut board = empty_board();
        for i in 0..15u32 {
            let _ = board.add_score(i * 10, "P");
        }

        assert_eq!(board.records().len(), MAX_RECORDS);
        let scores: Vec<u32> = board.records().iter().map(|r| r.score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted);
        // The five lowest results fell off the board.
        assert_eq!(scores.last(), Some(&50));
    }

    #[test]
    fn rank_is_pre_truncation_position() {
        let mut board = empty_board();
        for _ in 0..MAX_RECORDS {
            let _ = board.add_score(100, "P");
        }

        let rank = board.add_score(5, "late");
        assert_eq!(rank, 11);
        assert!(board.records().iter().all(|r| r.player != "late"));
    }

    #[test]
    fn equal_scores_keep_insertion_order() {
        let mut board = empty_board();
        assert_eq!(board.add_score(70, "first"), 1);
        assert_eq!(board.add_score(70, "second"), 2);

        let players: Vec<&str> = board.records().iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, vec!["first", "second"]);
    }

    #[test]
    fn new_record_detection_on_empty_board() {
        let board = empty_board();
        assert_eq!(board.get_high_score(), 0);
        assert!(board.is_new_record(1));
        assert!(!board.is_new_record(0));
    }

    #[test]
    fn top_score_admits_until_full_then_compares_minimum() {
        let mut board = empty_board();
        assert!(board.is_top_score(0));

        for i in 0..MAX_RECORDS as u32 {
            let _ = board.add_score(100 + i, "P");
        }
        assert!(!board.is_top_score(100));
        assert!(board.is_top_score(101));
    }

    #[test]
    fn stats_are_zero_when_empty_and_computed_otherwise() {
        let mut board = empty_board();
        assert_eq!(board.get_stats(), Stats::default());

        let _ = board.add_score(100, "A");
        let _ = board.add_score(51, "B");
        let stats = board.get_stats();
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.total_score, 151);
        assert_eq!(stats.high_score, 100);
        // 75.5 rounds up.
        assert_eq!(stats.average_score, 76);
    }

    #[test]
    fn export_import_round_trips_records() {
        let mut board = empty_board();
        let _ = board.add_score(100, "A");
        let _ = board.add_score(50, "B");
        let before = board.records().to_vec();

        let payload = serde_json::to_value(board.export_data()).expect("payload encodes");
        let mut restored = empty_board();
        restored.import_data(&payload).expect("import should succeed");
        assert_eq!(restored.records(), before.as_slice());
    }

    #[test]
    fn import_rejects_missing_version_without_mutation() {
        let mut board = empty_board();
        let _ = board.add_score(42, "keep");

        let payload = serde_json::json!({ "scores": [] });
        assert_eq!(board.import_data(&payload), Err(ImportError::MissingVersion));
        assert_eq!(board.records().len(), 1);
    }

    #[test]
    fn import_rejects_malformed_scores_without_mutation() {
        let mut board = empty_board();
        let _ = board.add_score(42, "keep");

        let not_an_array = serde_json::json!({ "version": "1.0", "scores": "nope" });
        assert_eq!(board.import_data(&not_an_array), Err(ImportError::BadScores));

        let bad_records = serde_json::json!({ "version": "1.0", "scores": [{ "score": "NaN" }] });
        assert_eq!(board.import_data(&bad_records), Err(ImportError::BadScores));

        assert_eq!(board.records().len(), 1);
    }

    #[test]
    fn corrupt_stored_value_loads_as_empty() {
        let mut store = MemStore::default();
        store
            .write(STORAGE_KEY, "{ not json")
            .expect("seed write should succeed");

        let board = Leaderboard::new(Box::new(store));
        assert!(board.records().is_empty());
    }

    #[test]
    fn broken_store_degrades_without_raising() {
        let mut board = Leaderboard::new(Box::new(BrokenStore));
        assert_eq!(board.add_score(10, "A"), 1);
        assert_eq!(board.get_high_score(), 10);
        board.clear();
        assert!(board.records().is_empty());
    }

    #[test]
    fn scores_survive_a_reload() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "cybersnake_board_{}_{nanos}",
            std::process::id()
        ));

        let mut board = Leaderboard::new(Box::new(FileStore::new(&dir)));
        let _ = board.add_score(100, "A");
        let _ = board.add_score(50, "B");
        let before = board.records().to_vec();
        drop(board);

        let reloaded = Leaderboard::new(Box::new(FileStore::new(&dir)));
        assert_eq!(reloaded.records(), before.as_slice());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn clear_empties_the_board() {
        let mut board = empty_board();
        let _ = board.add_score(10, "A");
        board.clear();
        assert!(board.records().is_empty());
        assert_eq!(board.get_high_score(), 0);
    }

    #[test]
    fn dates_format_relative_to_now() {
        let now = Utc::now();
        let iso = |ago: Duration| (now - ago).to_rfc3339();

        assert_eq!(format_date(&iso(Duration::hours(1)), now), "Today");
        assert_eq!(format_date(&iso(Duration::days(1)), now), "Yesterday");
        assert_eq!(format_date(&iso(Duration::days(3)), now), "3 days ago");

        let old = now - Duration::days(30);
        assert_eq!(
            format_date(&old.to_rfc3339(), now),
            old.format("%Y-%m-%d").to_string()
        );
        assert_eq!(format_date("garbage", now), "garbage");
    }
}
