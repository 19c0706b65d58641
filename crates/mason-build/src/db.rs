//! Persistent record of what each compiled output was built from
//!
//! For every output the store keeps the command that produced it and the
//! modification time of every input read during that compilation. The next
//! build compares those against the filesystem to decide what is stale.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("No compilation recorded for output {0}")]
    UnknownOutput(PathBuf),

    #[error("Failed to prepare database directory {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

pub type DbResult<T> = Result<T, DbError>;

/// An input of a recorded compilation, with its mtime at that time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFileInfo {
    pub path: PathBuf,
    pub last_mtime: SystemTime,
}

/// Storage for compilation records
///
/// Writes for one output should be grouped with [`DepsStore::transaction`]
/// so a reader never sees a command with a half-written input set.
pub trait DepsStore {
    /// Insert or replace the command recorded for `output`
    fn record_compilation(&mut self, output: &Path, command: &str) -> DbResult<()>;

    /// Drop every input recorded for `output`
    fn forget_inputs_of(&mut self, output: &Path) -> DbResult<()>;

    /// Drop the whole record of `output`, so it reads as never built
    fn forget_compilation(&mut self, output: &Path) -> DbResult<()>;

    /// Record that `output` was built from `input` as it was at `mtime`.
    /// The output's compilation must already be recorded.
    fn record_dep(&mut self, input: &Path, output: &Path, mtime: SystemTime) -> DbResult<()>;

    fn command_of(&self, output: &Path) -> DbResult<Option<String>>;

    /// Inputs recorded for `output`; empty when nothing is recorded
    fn inputs_of(&self, output: &Path) -> DbResult<Vec<InputFileInfo>>;

    fn begin(&mut self) -> DbResult<()>;
    fn commit(&mut self) -> DbResult<()>;
    fn rollback(&mut self) -> DbResult<()>;

    /// Run `f` atomically. Changes made by `f` are rolled back if it fails.
    fn transaction<T, F>(&mut self, f: F) -> DbResult<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> DbResult<T>,
    {
        self.begin()?;
        match f(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = self.rollback() {
                    tracing::error!("Failed to roll back deps transaction: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

fn mtime_to_nanos(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_nanos()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_nanos()).unwrap_or(i64::MAX),
    }
}

fn nanos_to_mtime(nanos: i64) -> SystemTime {
    let magnitude = Duration::from_nanos(nanos.unsigned_abs());
    if nanos >= 0 {
        UNIX_EPOCH + magnitude
    } else {
        UNIX_EPOCH - magnitude
    }
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// SQLite-backed store
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|error| DbError::Io {
                path: parent.to_path_buf(),
                error,
            })?;
        }
        tracing::debug!("Opening deps database at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS compilations (
                output TEXT PRIMARY KEY,
                command TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS deps (
                output TEXT NOT NULL
                    REFERENCES compilations(output) ON DELETE CASCADE,
                input_path TEXT NOT NULL,
                mtime INTEGER NOT NULL,
                UNIQUE (output, input_path)
            );

            CREATE INDEX IF NOT EXISTS idx_deps_output ON deps(output);
            "#,
        )?;
        Ok(Self { conn })
    }
}

impl DepsStore for Database {
    fn record_compilation(&mut self, output: &Path, command: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO compilations (output, command) VALUES (?1, ?2)
             ON CONFLICT(output) DO UPDATE SET command = excluded.command",
            params![path_key(output), command],
        )?;
        Ok(())
    }

    fn forget_inputs_of(&mut self, output: &Path) -> DbResult<()> {
        self.conn.execute(
            "DELETE FROM deps WHERE output = ?1",
            params![path_key(output)],
        )?;
        Ok(())
    }

    fn forget_compilation(&mut self, output: &Path) -> DbResult<()> {
        self.conn.execute(
            "DELETE FROM compilations WHERE output = ?1",
            params![path_key(output)],
        )?;
        Ok(())
    }

    fn record_dep(&mut self, input: &Path, output: &Path, mtime: SystemTime) -> DbResult<()> {
        if self.command_of(output)?.is_none() {
            return Err(DbError::UnknownOutput(output.to_path_buf()));
        }
        self.conn.execute(
            "INSERT INTO deps (output, input_path, mtime) VALUES (?1, ?2, ?3)
             ON CONFLICT(output, input_path) DO UPDATE SET mtime = excluded.mtime",
            params![path_key(output), path_key(input), mtime_to_nanos(mtime)],
        )?;
        Ok(())
    }

    fn command_of(&self, output: &Path) -> DbResult<Option<String>> {
        let command = self
            .conn
            .query_row(
                "SELECT command FROM compilations WHERE output = ?1",
                params![path_key(output)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(command)
    }

    fn inputs_of(&self, output: &Path) -> DbResult<Vec<InputFileInfo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT input_path, mtime FROM deps WHERE output = ?1 ORDER BY rowid")?;
        let rows = stmt.query_map(params![path_key(output)], |row| {
            let path: String = row.get(0)?;
            let nanos: i64 = row.get(1)?;
            Ok(InputFileInfo {
                path: PathBuf::from(path),
                last_mtime: nanos_to_mtime(nanos),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn begin(&mut self) -> DbResult<()> {
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    fn commit(&mut self) -> DbResult<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> DbResult<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    commands: HashMap<PathBuf, String>,
    inputs: HashMap<PathBuf, Vec<InputFileInfo>>,
}

/// In-process store, for tests and one-shot planning
#[derive(Debug, Default)]
pub struct MemoryDepsStore {
    state: MemoryState,
    snapshot: Option<MemoryState>,
}

impl MemoryDepsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DepsStore for MemoryDepsStore {
    fn record_compilation(&mut self, output: &Path, command: &str) -> DbResult<()> {
        self.state
            .commands
            .insert(output.to_path_buf(), command.to_string());
        Ok(())
    }

    fn forget_inputs_of(&mut self, output: &Path) -> DbResult<()> {
        self.state.inputs.remove(output);
        Ok(())
    }

    fn forget_compilation(&mut self, output: &Path) -> DbResult<()> {
        self.state.commands.remove(output);
        self.state.inputs.remove(output);
        Ok(())
    }

    fn record_dep(&mut self, input: &Path, output: &Path, mtime: SystemTime) -> DbResult<()> {
        if !self.state.commands.contains_key(output) {
            return Err(DbError::UnknownOutput(output.to_path_buf()));
        }
        let inputs = self.state.inputs.entry(output.to_path_buf()).or_default();
        match inputs.iter_mut().find(|info| info.path == input) {
            Some(info) => info.last_mtime = mtime,
            None => inputs.push(InputFileInfo {
                path: input.to_path_buf(),
                last_mtime: mtime,
            }),
        }
        Ok(())
    }

    fn command_of(&self, output: &Path) -> DbResult<Option<String>> {
        Ok(self.state.commands.get(output).cloned())
    }

    fn inputs_of(&self, output: &Path) -> DbResult<Vec<InputFileInfo>> {
        Ok(self.state.inputs.get(output).cloned().unwrap_or_default())
    }

    fn begin(&mut self) -> DbResult<()> {
        self.snapshot = Some(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> DbResult<()> {
        self.snapshot = None;
        Ok(())
    }

    fn rollback(&mut self) -> DbResult<()> {
        if let Some(snapshot) = self.snapshot.take() {
            self.state = snapshot;
        }
        Ok(())
    }
}
