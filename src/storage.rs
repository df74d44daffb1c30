//! SQLite storage layer for persisting vocabulary snapshots
//!
//! The persisted shape is a single `{ words, common }` snapshot stored as
//! JSON under a fixed key. Writes normally go through [`DebouncedWriter`],
//! which coalesces rapid edits into one write per flush interval.

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::migrations::run_migrations;
use crate::types::VocabularySnapshot;

const SNAPSHOT_KEY: &str = "top-words";

/// How long the debounced writer coalesces saves by default
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Storage backend using SQLite
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        run_migrations(&conn)?;
        info!("Vocabulary database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (useful for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Save the vocabulary snapshot, replacing any previous one
    pub fn save_snapshot(&self, snapshot: &VocabularySnapshot) -> Result<()> {
        let payload = serde_json::to_string(snapshot)?;
        let conn = self.conn.lock();
        conn.execute(
            r#"
            INSERT INTO snapshots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![SNAPSHOT_KEY, payload, Utc::now().to_rfc3339()],
        )?;
        debug!(
            "Saved snapshot: {} words, {} common",
            snapshot.words.len(),
            snapshot.common.len()
        );
        Ok(())
    }

    /// Load the stored snapshot.
    ///
    /// An absent or unparsable payload yields the empty default rather
    /// than an error.
    pub fn load_snapshot(&self) -> Result<VocabularySnapshot> {
        let conn = self.conn.lock();
        let payload: Option<String> = conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1",
                params![SNAPSHOT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            None => Ok(VocabularySnapshot::default()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(snapshot) => Ok(snapshot),
                Err(e) => {
                    warn!("Stored snapshot is unparsable, starting empty: {}", e);
                    Ok(VocabularySnapshot::default())
                }
            },
        }
    }
}

/// Default location for the vocabulary database
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordsift")
        .join("vocabulary.db")
}

struct WriterState {
    pending: Option<VocabularySnapshot>,
    last_flush: Option<Instant>,
}

/// Coalescing, last-write-wins snapshot writer.
///
/// `save` records the snapshot and only hits SQLite when the flush
/// interval has elapsed since the previous write; otherwise the snapshot
/// stays pending and is overwritten by the next save. Pending data is
/// flushed on `flush` and on drop. Persistence is fire-and-forget: write
/// failures are logged, never returned.
pub struct DebouncedWriter {
    storage: Arc<Storage>,
    interval: Duration,
    state: Mutex<WriterState>,
}

impl DebouncedWriter {
    pub fn new(storage: Arc<Storage>, interval: Duration) -> Self {
        Self {
            storage,
            interval,
            state: Mutex::new(WriterState {
                pending: None,
                last_flush: None,
            }),
        }
    }

    /// Record a snapshot for writing, coalescing with any pending one
    pub fn save(&self, snapshot: VocabularySnapshot) {
        let mut state = self.state.lock();
        state.pending = Some(snapshot);

        let due = match state.last_flush {
            None => true,
            Some(at) => at.elapsed() >= self.interval,
        };
        if due {
            Self::flush_locked(&self.storage, &mut state);
        }
    }

    /// Write any pending snapshot out immediately
    pub fn flush(&self) {
        let mut state = self.state.lock();
        Self::flush_locked(&self.storage, &mut state);
    }

    /// Whether a snapshot is waiting for its flush window
    pub fn has_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    fn flush_locked(storage: &Storage, state: &mut WriterState) {
        let Some(snapshot) = state.pending.take() else {
            return;
        };
        state.last_flush = Some(Instant::now());
        if let Err(e) = storage.save_snapshot(&snapshot) {
            warn!("Failed to persist vocabulary snapshot: {}", e);
        }
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Word;

    fn snapshot(entries: &[(&str, u32)]) -> VocabularySnapshot {
        VocabularySnapshot {
            words: entries.iter().map(|(t, u)| Word::new(*t, *u)).collect(),
            common: vec![],
        }
    }

    #[test]
    fn test_load_from_empty_database() {
        let storage = Storage::in_memory().unwrap();
        let loaded = storage.load_snapshot().unwrap();
        assert_eq!(loaded, VocabularySnapshot::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let storage = Storage::in_memory().unwrap();
        let mut snap = snapshot(&[("собака", 3), ("кошка", 1)]);
        snap.common.push("привет".to_string());

        storage.save_snapshot(&snap).unwrap();
        let loaded = storage.load_snapshot().unwrap();

        assert_eq!(loaded, snap);
    }

    #[test]
    fn test_second_save_replaces_first() {
        let storage = Storage::in_memory().unwrap();
        storage.save_snapshot(&snapshot(&[("один", 1)])).unwrap();
        storage.save_snapshot(&snapshot(&[("два", 2)])).unwrap();

        let loaded = storage.load_snapshot().unwrap();
        assert_eq!(loaded.words.len(), 1);
        assert_eq!(loaded.words[0].text, "два");
    }

    #[test]
    fn test_corrupt_payload_loads_as_empty() {
        let storage = Storage::in_memory().unwrap();
        {
            let conn = storage.conn.lock();
            conn.execute(
                "INSERT INTO snapshots (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![SNAPSHOT_KEY, "{not json", Utc::now().to_rfc3339()],
            )
            .unwrap();
        }

        let loaded = storage.load_snapshot().unwrap();
        assert_eq!(loaded, VocabularySnapshot::default());
    }

    #[test]
    fn test_debounced_writer_coalesces() {
        let storage = Arc::new(Storage::in_memory().unwrap());
        let writer = DebouncedWriter::new(Arc::clone(&storage), Duration::from_secs(60));

        // first save writes through immediately
        writer.save(snapshot(&[("один", 1)]));
        assert!(!writer.has_pending());
        assert_eq!(storage.load_snapshot().unwrap().words[0].text, "один");

        // further saves within the window stay pending, last write wins
        writer.save(snapshot(&[("два", 2)]));
        writer.save(snapshot(&[("три", 3)]));
        assert!(writer.has_pending());
        assert_eq!(storage.load_snapshot().unwrap().words[0].text, "один");

        writer.flush();
        assert!(!writer.has_pending());
        assert_eq!(storage.load_snapshot().unwrap().words[0].text, "три");
    }

    #[test]
    fn test_debounced_writer_flushes_on_drop() {
        let storage = Arc::new(Storage::in_memory().unwrap());
        {
            let writer = DebouncedWriter::new(Arc::clone(&storage), Duration::from_secs(60));
            writer.save(snapshot(&[("один", 1)]));
            writer.save(snapshot(&[("два", 2)]));
        }
        assert_eq!(storage.load_snapshot().unwrap().words[0].text, "два");
    }

    #[test]
    fn test_zero_interval_always_writes() {
        let storage = Arc::new(Storage::in_memory().unwrap());
        let writer = DebouncedWriter::new(Arc::clone(&storage), Duration::ZERO);

        writer.save(snapshot(&[("один", 1)]));
        writer.save(snapshot(&[("два", 2)]));
        assert!(!writer.has_pending());
        assert_eq!(storage.load_snapshot().unwrap().words[0].text, "два");
    }
}
