//! Play command - interactive game on stdin/stdout
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: PlayLoop::run() - read, dispatch, render
//! - Level 3: one handler per Action
//! - Level 4: formatting utilities

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;

use sealo_core::{GameStatus, Level, MoveOutcome, Solver, TapOutcome, Topology};

use crate::action::{Action, HELP};
use crate::config::SealoConfig;
use crate::records::RecordStore;
use crate::session::{record_win, BestTimeUpdate, LevelSession};
use crate::start::starting_level;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board shape: cross, triangle or triangle:<rows>
    #[arg(long)]
    pub shape: Option<Topology>,

    /// Start from a level file instead of the standard layout
    #[arg(long, value_name = "FILE")]
    pub level: Option<PathBuf>,

    /// Read the record file but never write it
    #[arg(long)]
    pub guest: bool,
}

/// Whether the loop keeps reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Pick the starting level (file, flag, stored preference, config)
/// 2. Remember an explicit shape choice
/// 3. Hand stdin/stdout to the play loop
pub fn run<S: RecordStore>(args: PlayArgs, config: &SealoConfig, store: &mut S) -> Result<()> {
    let fallback = store.record().preferred_shape.unwrap_or(config.default_shape);
    let level = starting_level(args.shape, args.level.as_deref(), fallback)?;

    if let Some(shape) = args.shape {
        remember_shape(store, shape);
    }

    tracing::info!("Starting game on {}", level.topology);

    let solver = Solver::new(config.solver_node_budget);
    let mut game = PlayLoop::new(level, solver)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    game.run(stdin.lock(), stdout.lock(), store)
}

// ============================================================================
// LEVEL 2 - PLAY LOOP
// ============================================================================

/// Line-oriented presentation layer around one [`LevelSession`]
pub struct PlayLoop {
    level: Level,
    session: LevelSession,
    solver: Solver,
}

impl PlayLoop {
    pub fn new(level: Level, solver: Solver) -> Result<Self> {
        let session = LevelSession::new(level.to_board()?);
        Ok(Self {
            level,
            session,
            solver,
        })
    }

    pub fn session(&self) -> &LevelSession {
        &self.session
    }

    /// Read actions until `quit` or end of input
    pub fn run<R, W, S>(&mut self, input: R, mut out: W, store: &mut S) -> Result<()>
    where
        R: BufRead,
        W: Write,
        S: RecordStore + ?Sized,
    {
        self.session.tick(Instant::now());
        self.show_intro(&mut out)?;

        for line in input.lines() {
            let line = line?;

            let flow = match line.parse::<Action>() {
                Ok(action) => self.handle(action, &mut out, store)?,
                Err(crate::action::ActionParseError::Empty) => Flow::Continue,
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                break;
            }
            write!(out, "> ")?;
            out.flush()?;
        }

        writeln!(out)?;
        Ok(())
    }

    // ========================================================================
    // LEVEL 3 - ACTION HANDLERS
    // ========================================================================

    fn handle<W, S>(&mut self, action: Action, out: &mut W, store: &mut S) -> Result<Flow>
    where
        W: Write,
        S: RecordStore + ?Sized,
    {
        let now = Instant::now();
        match action {
            Action::Tap(cell) => match self.session.tap(cell, now) {
                TapOutcome::Selected(cell) => {
                    writeln!(out, "Selected {}", cell)?;
                    write!(out, "{}", self.session.board())?;
                }
                TapOutcome::Ignored => writeln!(out, "No peg at {}", cell)?,
                TapOutcome::Moved(outcome) => self.report_move(outcome, now, out, store)?,
            },
            Action::Move(from, to) => {
                let outcome = self.session.attempt_move(from, to, now);
                self.report_move(outcome, now, out, store)?;
            }
            Action::Hint => self.show_hint(out)?,
            Action::Restart => {
                self.restart()?;
                self.show_intro(out)?;
            }
            Action::Shape(topology) => {
                self.level = Level::standard(topology);
                remember_shape(store, topology);
                self.restart()?;
                self.show_intro(out)?;
            }
            Action::Save(path) => self.save_position(&path, out)?,
            Action::Board => write!(out, "{}", self.session.board())?,
            Action::Help => writeln!(out, "{}", HELP)?,
            Action::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn report_move<W, S>(
        &self,
        outcome: MoveOutcome,
        now: Instant,
        out: &mut W,
        store: &mut S,
    ) -> Result<()>
    where
        W: Write,
        S: RecordStore + ?Sized,
    {
        let board = self.session.board();
        match outcome {
            MoveOutcome::Invalid => {
                writeln!(out, "That jump is not allowed")?;
            }
            MoveOutcome::Applied { removed, .. } => {
                write!(out, "{}", board)?;
                writeln!(out, "Removed {}, {} pegs left", removed, board.peg_count())?;
            }
            MoveOutcome::AppliedWin => {
                write!(out, "{}", board)?;
                let elapsed = self.session.elapsed(now);
                writeln!(out, "You win! Time: {}", format_time(elapsed))?;
                self.report_best_time(elapsed, out, store)?;
            }
            MoveOutcome::AppliedStalemate => {
                write!(out, "{}", board)?;
                writeln!(
                    out,
                    "Game over: no jumps left with {} pegs. Type 'restart' to try again.",
                    board.peg_count()
                )?;
            }
        }
        Ok(())
    }

    fn report_best_time<W, S>(&self, elapsed: Duration, out: &mut W, store: &mut S) -> Result<()>
    where
        W: Write,
        S: RecordStore + ?Sized,
    {
        if self.level.pegs.is_some() {
            writeln!(out, "Custom level: best times are kept for standard boards only")?;
            return Ok(());
        }

        match record_win(store, self.level.topology, elapsed) {
            Ok(BestTimeUpdate::NewBest { previous: None }) => {
                writeln!(out, "First win on this board!")?;
            }
            Ok(BestTimeUpdate::NewBest { previous: Some(old) }) => {
                writeln!(out, "New best time (was {})", format_time(old))?;
            }
            Ok(BestTimeUpdate::NotBest { best }) => {
                writeln!(out, "Best time: {}", format_time(best))?;
            }
            Err(e) => tracing::warn!("Could not save best time: {}", e),
        }
        Ok(())
    }

    fn show_hint<W: Write>(&self, out: &mut W) -> Result<()> {
        let board = self.session.board();
        if board.status() != GameStatus::InProgress {
            writeln!(out, "The game is over. Type 'restart' to play again.")?;
            return Ok(());
        }

        match self.solver.hint(board) {
            Some(mv) => writeln!(out, "Try {}", mv)?,
            None => writeln!(out, "No winning line from here")?,
        }
        Ok(())
    }

    fn save_position<W: Write>(&self, path: &Path, out: &mut W) -> Result<()> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "saved".to_string());
        let level = Level::from_board(&name, self.session.board());

        match level.save(path) {
            Ok(()) => writeln!(out, "Saved to {}", path.display())?,
            Err(e) => writeln!(out, "Could not save: {:#}", e)?,
        }
        Ok(())
    }

    fn restart(&mut self) -> Result<()> {
        self.session = LevelSession::new(self.level.to_board()?);
        self.session.tick(Instant::now());
        Ok(())
    }

    fn show_intro<W: Write>(&self, out: &mut W) -> Result<()> {
        let board = self.session.board();
        writeln!(
            out,
            "{} board, {} pegs. Type 'help' for commands.",
            self.level.topology,
            board.peg_count()
        )?;
        write!(out, "{}", board)?;
        write!(out, "> ")?;
        out.flush()?;
        Ok(())
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn remember_shape<S: RecordStore + ?Sized>(store: &mut S, shape: Topology) {
    store.record_mut().preferred_shape = Some(shape);
    if let Err(e) = store.commit() {
        tracing::warn!("Could not save board preference: {}", e);
    }
}

/// Seconds with one decimal, as shown on the in-game timer
pub fn format_time(time: Duration) -> String {
    format!("{:.1}s", time.as_secs_f64())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MemoryRecordStore;
    use sealo_core::Cell;
    use std::io::Cursor;

    fn play(level: Level, script: &str, store: &mut MemoryRecordStore) -> (PlayLoop, String) {
        let mut game = PlayLoop::new(level, Solver::default()).unwrap();
        let mut out = Vec::new();
        game.run(Cursor::new(script.to_string()), &mut out, store).unwrap();
        (game, String::from_utf8(out).unwrap())
    }

    fn two_peg_level() -> Level {
        Level {
            name: "finale".to_string(),
            topology: Topology::Cross,
            pegs: Some(vec![Cell::new(3, 2), Cell::new(3, 3)]),
        }
    }

    #[test]
    fn test_select_then_jump() {
        let mut store = MemoryRecordStore::default();
        let (game, out) = play(Level::standard(Topology::Cross), "1 3\n3 3\nquit\n", &mut store);

        assert!(out.contains("cross board, 32 pegs"));
        assert!(out.contains("Selected (1,3)"));
        assert!(out.contains("Removed (2,3), 31 pegs left"));
        assert_eq!(game.session().board().peg_count(), 31);
    }

    #[test]
    fn test_invalid_jump_leaves_board() {
        let mut store = MemoryRecordStore::default();
        let (game, out) = play(Level::standard(Topology::Cross), "0 3 2 3\n", &mut store);

        assert!(out.contains("That jump is not allowed"));
        assert_eq!(game.session().board().peg_count(), 32);
    }

    /// Script that plays the solver's line on the standard layout
    fn winning_script(topology: Topology) -> String {
        let board = Level::standard(topology).to_board().unwrap();
        let result = Solver::default().solve(&board);
        result
            .moves()
            .unwrap()
            .iter()
            .map(|mv| format!("{} {} {} {}\n", mv.from.row, mv.from.col, mv.to.row, mv.to.col))
            .collect()
    }

    #[test]
    fn test_standard_win_records_best_time() {
        let mut store = MemoryRecordStore::default();
        let script = winning_script(Topology::triangle());
        let (game, out) = play(Level::standard(Topology::triangle()), &script, &mut store);

        assert!(out.contains("You win!"));
        assert!(out.contains("First win on this board!"));
        assert!(game.session().is_finished());
        assert!(store.best_time(Topology::triangle()).is_some());
        assert_eq!(store.commits, 1);
    }

    #[test]
    fn test_custom_level_win_keeps_best_time() {
        let mut store = MemoryRecordStore::default();
        store.set_best_time(Topology::Cross, Duration::from_secs(600));
        let (game, out) = play(two_peg_level(), "3 2 3 4\n", &mut store);

        assert!(out.contains("You win!"));
        assert!(out.contains("best times are kept for standard boards only"));
        assert!(game.session().is_finished());
        assert_eq!(store.best_time(Topology::Cross), Some(Duration::from_secs(600)));
        assert_eq!(store.commits, 0);
    }

    #[test]
    fn test_slower_win_keeps_best() {
        let mut store = MemoryRecordStore::default();
        store.set_best_time(Topology::triangle(), Duration::ZERO);
        let script = winning_script(Topology::triangle());
        let (_, out) = play(Level::standard(Topology::triangle()), &script, &mut store);

        assert!(out.contains("Best time: 0.0s"));
        assert_eq!(store.best_time(Topology::triangle()), Some(Duration::ZERO));
        assert_eq!(store.commits, 0);
    }

    #[test]
    fn test_timer_runs_from_first_display() {
        let mut store = MemoryRecordStore::default();
        let (game, _) = play(Level::standard(Topology::Cross), "", &mut store);

        let later = Instant::now() + Duration::from_secs(2);
        assert!(game.session().elapsed(later) >= Duration::from_secs(2));
    }

    #[test]
    fn test_stalemate_message() {
        let level = Level {
            name: "stuck".to_string(),
            topology: Topology::Cross,
            pegs: Some(vec![Cell::new(3, 2), Cell::new(3, 3), Cell::new(0, 2)]),
        };
        let mut store = MemoryRecordStore::default();
        let (_, out) = play(level, "3 2 3 4\nhint\n", &mut store);

        assert!(out.contains("Game over: no jumps left with 2 pegs"));
        assert!(out.contains("The game is over"));
        assert!(store.best_time(Topology::Cross).is_none());
    }

    #[test]
    fn test_hint_restart_and_shape() {
        let mut store = MemoryRecordStore::default();
        let script = "hint\n1 3 3 3\nrestart\nshape triangle\nbogus\n";
        let (game, out) = play(Level::standard(Topology::Cross), script, &mut store);

        assert!(out.contains("Try "));
        assert!(out.contains("triangle:5 board, 14 pegs"));
        assert!(out.contains("unknown command 'bogus'"));
        assert_eq!(game.session().board().topology(), Topology::triangle());
        assert_eq!(store.record().preferred_shape, Some(Topology::triangle()));
    }

    #[test]
    fn test_save_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mid.json");
        let mut store = MemoryRecordStore::default();
        let script = format!("1 3 3 3\nsave {}\n", path.display());
        let (game, out) = play(Level::standard(Topology::Cross), &script, &mut store);

        assert!(out.contains("Saved to"));
        let saved = Level::load(&path).unwrap();
        assert_eq!(saved.name, "mid");
        assert_eq!(&saved.to_board().unwrap(), game.session().board());
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::from_millis(12_345)), "12.3s");
    }
}
