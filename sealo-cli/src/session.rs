//! Level session: one game on one board, with its timer
//!
//! The timer starts on the first update tick and freezes on the first
//! terminal outcome. Best-time bookkeeping happens here, never in the engine.

use std::time::{Duration, Instant};

use sealo_core::{BoardState, Cell, MoveOutcome, TapOutcome, Topology};

use crate::records::{RecordError, RecordStore};

/// What a win did to the stored best time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BestTimeUpdate {
    /// Stored; `previous` is `None` on the first recorded win
    NewBest { previous: Option<Duration> },
    /// Slower than (or equal to) the stored best
    NotBest { best: Duration },
}

/// A new time beats the stored one when none exists or it is strictly lower
pub fn is_new_best(previous: Option<Duration>, elapsed: Duration) -> bool {
    previous.map_or(true, |best| elapsed < best)
}

/// Compare a winning time against the store and commit a new best
pub fn record_win<S: RecordStore + ?Sized>(
    store: &mut S,
    topology: Topology,
    elapsed: Duration,
) -> Result<BestTimeUpdate, RecordError> {
    let previous = store.best_time(topology);

    if !is_new_best(previous, elapsed) {
        // is_new_best only fails when a previous time exists
        let best = previous.unwrap_or(elapsed);
        return Ok(BestTimeUpdate::NotBest { best });
    }

    store.set_best_time(topology, elapsed);
    store.commit()?;
    tracing::info!("New best time for {}: {:.1}s", topology, elapsed.as_secs_f64());
    Ok(BestTimeUpdate::NewBest { previous })
}

/// Board plus timer for one game
#[derive(Clone, Debug)]
pub struct LevelSession {
    board: BoardState,
    started_at: Option<Instant>,
    finished: Option<Duration>,
}

impl LevelSession {
    pub fn new(board: BoardState) -> Self {
        Self {
            board,
            started_at: None,
            finished: None,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Update tick from the presentation loop; the first one starts the timer
    pub fn tick(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Time since the first tick, frozen once the game ends
    pub fn elapsed(&self, now: Instant) -> Duration {
        if let Some(done) = self.finished {
            return done;
        }
        self.started_at
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start))
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    /// Forward a tap to the board
    pub fn tap(&mut self, cell: Cell, now: Instant) -> TapOutcome {
        self.tick(now);
        let outcome = self.board.tap(cell);
        if let TapOutcome::Moved(moved) = outcome {
            self.observe(moved, now);
        }
        outcome
    }

    /// Forward an explicit move to the board
    pub fn attempt_move(&mut self, from: Cell, to: Cell, now: Instant) -> MoveOutcome {
        self.tick(now);
        let outcome = self.board.attempt_move(from, to);
        self.observe(outcome, now);
        outcome
    }

    fn observe(&mut self, outcome: MoveOutcome, now: Instant) {
        if outcome.is_terminal() && self.finished.is_none() {
            self.finished = Some(self.elapsed(now));
        }
    }
}
