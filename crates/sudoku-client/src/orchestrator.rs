//! User-initiated actions: solve, import, reset and clear.
//!
//! All state lives on the caller's thread. A network request runs on a
//! worker thread and posts its result back over a channel; [`Orchestrator::poll`]
//! (or [`Orchestrator::wait`]) applies it. The operation tag is held by an
//! [`OperationGuard`] stored with the pending request, so it is released
//! after the terminal branch runs, whatever that branch is.

use crate::alert::AlertCenter;
use crate::board::Board;
use crate::grid::Grid;
use crate::operations::{Operation, OperationGuard, OperationTracker};
use crate::service::{
    Algorithm, Difficulty, PuzzleService, ServiceError, ServiceResult, SolveRequest,
};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

pub const NO_SOLUTION_TITLE: &str = "No solution";
pub const NO_SOLUTION_MESSAGE: &str = "No solution found :(";
pub const ERROR_TITLE: &str = "Error";
pub const ERROR_MESSAGE: &str = "The fetching was unsuccessful";

/// Shared handles injected into the orchestrator
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub operations: OperationTracker,
    pub alerts: AlertCenter,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Result posted back by a request worker
#[derive(Debug)]
enum Completion {
    Solve(ServiceResult<Option<Grid>>),
    Import(ServiceResult<String>),
}

impl Completion {
    fn failed(op: Operation, error: ServiceError) -> Self {
        match op {
            Operation::Solve => Completion::Solve(Err(error)),
            Operation::Import => Completion::Import(Err(error)),
        }
    }
}

/// A request that has been issued and not yet applied
struct InFlight {
    guard: OperationGuard,
    rx: Receiver<Completion>,
}

/// How a finished request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    EmptyResult,
    Failure,
}

pub struct Orchestrator {
    board: Board,
    ctx: Context,
    service: Arc<dyn PuzzleService>,
    algorithm: Algorithm,
    difficulty: Difficulty,
    in_flight: Option<InFlight>,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn PuzzleService>, ctx: Context) -> Self {
        Self {
            board: Board::new(),
            ctx,
            service,
            algorithm: Algorithm::default(),
            difficulty: Difficulty::default(),
            in_flight: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn operations(&self) -> &OperationTracker {
        &self.ctx.operations
    }

    pub fn alerts(&self) -> &AlertCenter {
        &self.ctx.alerts
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn backend_name(&self) -> &'static str {
        self.service.backend_name()
    }

    /// Solve is offered while the board is editable and nothing is in flight
    pub fn can_solve(&self) -> bool {
        !self.board.is_disabled() && !self.ctx.operations.is_busy()
    }

    /// Import is offered while nothing is in flight
    pub fn can_import(&self) -> bool {
        !self.ctx.operations.is_busy()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Send the entered grid to the solver. Returns false if not allowed now.
    pub fn solve(&mut self) -> bool {
        if !self.can_solve() {
            warn!(
                disabled = self.board.is_disabled(),
                busy = self.ctx.operations.is_busy(),
                "solve ignored"
            );
            return false;
        }

        // Lock edits for the duration of the request
        self.board.set_disabled(true);
        let guard = self.ctx.operations.begin(Operation::Solve);
        let request = SolveRequest::new(*self.board.entered(), self.algorithm);
        info!(algorithm = %request.algorithm, filled = request.grid.filled_count(), "solve requested");

        self.dispatch(guard, move |service| {
            Completion::Solve(service.solve(&request))
        });
        true
    }

    /// Fetch a new puzzle for the chosen difficulty. Returns false if not allowed now.
    pub fn import(&mut self) -> bool {
        if !self.can_import() {
            warn!("import ignored while another request is in flight");
            return false;
        }

        let guard = self.ctx.operations.begin(Operation::Import);
        let difficulty = self.difficulty;
        info!(difficulty = difficulty.id(), "import requested");

        self.dispatch(guard, move |service| {
            Completion::Import(service.fetch_mission(difficulty))
        });
        true
    }

    /// Remove the displayed solution, keeping entries
    pub fn reset(&mut self) {
        info!("reset");
        self.board.reset_solution();
    }

    /// Blank the whole board
    pub fn clear(&mut self) {
        info!("clear");
        self.board.clear();
    }

    /// Apply a finished request if there is one. Never blocks.
    pub fn poll(&mut self) -> Option<Outcome> {
        let flight = self.in_flight.as_ref()?;
        let completion = match flight.rx.try_recv() {
            Ok(completion) => completion,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                Completion::failed(flight.guard.operation(), ServiceError::Worker)
            }
        };
        let flight = self.in_flight.take()?;
        Some(self.finish(flight.guard, completion))
    }

    /// Block until the pending request (if any) finishes and apply it
    pub fn wait(&mut self) -> Option<Outcome> {
        let flight = self.in_flight.take()?;
        let completion = flight
            .rx
            .recv()
            .unwrap_or_else(|_| Completion::failed(flight.guard.operation(), ServiceError::Worker));
        Some(self.finish(flight.guard, completion))
    }

    fn dispatch<F>(&mut self, guard: OperationGuard, call: F)
    where
        F: FnOnce(&dyn PuzzleService) -> Completion + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let service = Arc::clone(&self.service);
        let op = guard.operation();

        let spawned = thread::Builder::new()
            .name(format!("sudoku-{op}"))
            .spawn(move || {
                // The receiver may be gone if the UI shut down first
                let _ = tx.send(call(service.as_ref()));
            });
        if let Err(e) = spawned {
            // The sender went down with the closure, so the next poll sees a
            // disconnected channel and takes the failure branch.
            error!(op = op.tag(), error = %e, "failed to start request worker");
        }

        self.in_flight = Some(InFlight { guard, rx });
    }

    fn finish(&mut self, guard: OperationGuard, completion: Completion) -> Outcome {
        let outcome = match completion {
            Completion::Solve(result) => self.finish_solve(result),
            Completion::Import(result) => self.finish_import(result),
        };
        info!(op = guard.operation().tag(), ?outcome, "request finished");
        drop(guard);
        outcome
    }

    fn finish_solve(&mut self, result: ServiceResult<Option<Grid>>) -> Outcome {
        match result {
            Ok(Some(solution)) => {
                self.board.apply_solution(solution);
                Outcome::Success
            }
            Ok(None) => {
                self.board.set_disabled(false);
                warn!("solver found no solution");
                self.ctx.alerts.alert(NO_SOLUTION_TITLE, NO_SOLUTION_MESSAGE);
                Outcome::EmptyResult
            }
            Err(e) => {
                error!(error = %e, "solve request failed");
                self.ctx.alerts.alert(ERROR_TITLE, ERROR_MESSAGE);
                self.board.set_disabled(false);
                Outcome::Failure
            }
        }
    }

    fn finish_import(&mut self, result: ServiceResult<String>) -> Outcome {
        let grid = result.and_then(|mission| Grid::from_mission(&mission).map_err(ServiceError::from));
        match grid {
            Ok(grid) => {
                self.board.load_entered(grid);
                Outcome::Success
            }
            Err(e) => {
                error!(error = %e, "import request failed");
                self.ctx.alerts.alert(ERROR_TITLE, ERROR_MESSAGE);
                Outcome::Failure
            }
        }
    }
}
