//! Interaction core of the Sudoku solver client.
//!
//! - [`grid`]: the 9x9 digit grid value and cell positions
//! - [`board`]: entered digits, service solution and the disabled latch
//! - [`navigation`]: selection cursor, keyboard and pointer protocol
//! - [`operations`]: tracker of in-flight requests
//! - [`alert`]: the user-facing notification record
//! - [`service`] / [`http`]: the solver and import service boundary
//! - [`orchestrator`]: solve, import, reset and clear

pub mod alert;
pub mod board;
pub mod grid;
pub mod http;
pub mod navigation;
pub mod operations;
pub mod orchestrator;
pub mod service;

pub use alert::{Alert, AlertCenter};
pub use board::Board;
pub use grid::{Grid, GridError, Position};
pub use http::{HttpPuzzleService, ServiceConfig};
pub use navigation::{Direction, NavKey, Navigator, Selection};
pub use operations::{Operation, OperationGuard, OperationTracker};
pub use orchestrator::{Context, Orchestrator, Outcome};
pub use service::{
    Algorithm, Difficulty, MockService, PuzzleService, ServiceError, ServiceResult, SolveRequest,
};
