//! Concrete notification sinks: console and append-only log file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use brawl_core::{Observer, ObserverError};
use brawl_engine::{GridSnapshot, SnapshotSink};

/// Default log file used by the binary.
pub const DEFAULT_LOG_FILE: &str = "log.txt";

fn fight_line(attacker: &str, defender: &str, defender_died: bool) -> String {
    if defender_died {
        format!("[FIGHT] {attacker} attacks {defender} and kills it!")
    } else {
        format!("[FIGHT] {attacker} attacks {defender}, but {defender} survives!")
    }
}

fn die_line(name: &str) -> String {
    format!("[DEATH] {name} died!")
}

fn move_line(name: &str, x: f64, y: f64) -> String {
    format!("[MOVE] {name} moved to ({x}, {y})")
}

/// Prints fights and deaths. Moves are too noisy for a terminal and are
/// ignored.
pub struct ConsoleObserver<W: Write + Send = Stdout> {
    out: Mutex<W>,
}

impl ConsoleObserver<Stdout> {
    /// Observer writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    /// Observer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn line(&self, line: &str) -> Result<(), ObserverError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> Observer for ConsoleObserver<W> {
    fn on_fight(
        &self,
        attacker: &str,
        defender: &str,
        defender_died: bool,
    ) -> Result<(), ObserverError> {
        self.line(&fight_line(attacker, defender, defender_died))
    }

    fn on_die(&self, name: &str) -> Result<(), ObserverError> {
        self.line(&die_line(name))
    }
}

/// Appends every event, moves included, to a log file.
pub struct FileObserver {
    file: Mutex<BufWriter<File>>,
}

impl FileObserver {
    /// Open `path` for appending, creating it if needed.
    ///
    /// Failing to open is a startup error for the caller.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            file: Mutex::new(BufWriter::new(file)),
        })
    }

    fn line(&self, line: &str) -> Result<(), ObserverError> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(file, "{line}")?;
        file.flush()?;
        Ok(())
    }
}

impl Observer for FileObserver {
    fn on_fight(
        &self,
        attacker: &str,
        defender: &str,
        defender_died: bool,
    ) -> Result<(), ObserverError> {
        self.line(&fight_line(attacker, defender, defender_died))
    }

    fn on_move(&self, name: &str, x: f64, y: f64) -> Result<(), ObserverError> {
        self.line(&move_line(name, x, y))
    }

    fn on_die(&self, name: &str) -> Result<(), ObserverError> {
        self.line(&die_line(name))
    }
}

/// Prints every grid snapshot to standard output.
#[derive(Debug, Default)]
pub struct ConsoleSnapshotSink;

impl SnapshotSink for ConsoleSnapshotSink {
    fn publish(&self, snapshot: &GridSnapshot) {
        let mut out = io::stdout().lock();
        if writeln!(out, "\n{snapshot}\n").is_err() {
            tracing::warn!("failed to print snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_observer_formats_fights_and_deaths() {
        let obs = ConsoleObserver::new(Vec::new());
        obs.on_fight("Smaug", "Ferdinand", true).unwrap();
        obs.on_fight("Ferdinand", "Lily", false).unwrap();
        obs.on_die("Ferdinand").unwrap();
        obs.on_move("Smaug", 1.0, 2.0).unwrap();
        let text = String::from_utf8(obs.into_inner()).unwrap();
        assert_eq!(
            text,
            "[FIGHT] Smaug attacks Ferdinand and kills it!\n\
             [FIGHT] Ferdinand attacks Lily, but Lily survives!\n\
             [DEATH] Ferdinand died!\n"
        );
    }

    #[test]
    fn file_observer_appends_moves_too() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, "earlier\n").unwrap();

        let obs = FileObserver::open(&path).unwrap();
        obs.on_move("Toady", 3.0, 4.5).unwrap();
        obs.on_die("Toady").unwrap();
        drop(obs);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "earlier\n[MOVE] Toady moved to (3, 4.5)\n[DEATH] Toady died!\n"
        );
    }

    #[test]
    fn file_observer_open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileObserver::open(dir.path().join("no/such/dir/log.txt")).is_err());
    }
}
