//! Coarse textual grid snapshots of the population.

use std::fmt;
use std::time::Duration;

use brawl_core::{Entity, Kind, KindCounts, WORLD_MAX, WORLD_MIN};

/// Point-in-time picture of the world bucketed into square cells.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSnapshot {
    cells: usize,
    grid: Vec<Option<Kind>>,
    counts: KindCounts,
    alive: usize,
    total: usize,
    fights: u64,
    elapsed: Duration,
}

impl GridSnapshot {
    /// Bucket the living entities into a `cells × cells` grid.
    ///
    /// When several entities share a cell the last one in registry order
    /// is shown.
    pub fn capture(entities: &[Entity], cells: usize, fights: u64, elapsed: Duration) -> Self {
        let cells = cells.max(1);
        let mut grid = vec![None; cells * cells];
        let mut counts = KindCounts::default();
        for e in entities.iter().filter(|e| e.is_alive()) {
            let col = cell_index(e.x(), cells);
            let row = cell_index(e.y(), cells);
            grid[row * cells + col] = Some(e.kind());
            counts.add(e.kind());
        }
        Self {
            cells,
            grid,
            alive: counts.total(),
            counts,
            total: entities.len(),
            fights,
            elapsed,
        }
    }

    /// Cells per axis.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Kind shown at `(col, row)`, if any.
    pub fn cell(&self, col: usize, row: usize) -> Option<Kind> {
        if col >= self.cells || row >= self.cells {
            return None;
        }
        self.grid[row * self.cells + col]
    }

    /// Living entities by kind.
    pub fn counts(&self) -> KindCounts {
        self.counts
    }

    /// Living entities.
    pub fn alive(&self) -> usize {
        self.alive
    }

    /// All entities, living or dead.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Contests rolled so far.
    pub fn fights(&self) -> u64 {
        self.fights
    }

    /// Time since the simulation started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

fn cell_index(coord: f64, cells: usize) -> usize {
    let width = (WORLD_MAX - WORLD_MIN) / cells as f64;
    let idx = ((coord - WORLD_MIN) / width) as usize;
    idx.min(cells - 1)
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== dungeon at {:.1}s ===", self.elapsed.as_secs_f64())?;
        let legend: Vec<String> = Kind::ALL
            .iter()
            .map(|k| format!("{}={} ({})", k.symbol(), k, self.counts.get(*k)))
            .collect();
        writeln!(f, "{}", legend.join("  "))?;

        write!(f, "   ")?;
        for col in 0..self.cells {
            write!(f, "{:>2}", col % 100)?;
        }
        writeln!(f)?;
        for row in 0..self.cells {
            write!(f, "{:>2} ", row % 100)?;
            for col in 0..self.cells {
                let symbol = self.cell(col, row).map_or('.', Kind::symbol);
                write!(f, "{symbol:>2}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "alive {}/{}  fights {}",
            self.alive, self.total, self.fights
        )
    }
}

/// Receives every published snapshot.
pub trait SnapshotSink: Send + Sync {
    /// Called from the supervisor thread.
    fn publish(&self, snapshot: &GridSnapshot);
}
