//! Boundary to the external solving and puzzle-import services.
//!
//! The orchestrator only talks to a [`PuzzleService`]. Production uses the
//! HTTP implementation in [`crate::http`]; tests use
//! [`MockService`].

use crate::grid::{Grid, GridError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Result type for service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures talking to a service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Connection, DNS, TLS or timeout failure
    #[error("network error: {0}")]
    Network(String),
    /// Non-success status code
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// Body was not the JSON shape we expect
    #[error("invalid response: {0}")]
    Decode(String),
    /// The mission string could not be turned into a grid
    #[error("invalid mission: {0}")]
    InvalidMission(#[from] GridError),
    /// The request worker went away without reporting a result
    #[error("request worker stopped without a result")]
    Worker,
}

/// Solving strategy requested from the remote solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Backtracking,
    Evolutionary,
    TabuSearch,
}

impl Algorithm {
    pub fn all() -> &'static [Algorithm] {
        &[
            Algorithm::Backtracking,
            Algorithm::Evolutionary,
            Algorithm::TabuSearch,
        ]
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Backtracking => "Backtracking",
            Algorithm::Evolutionary => "Evolutionary",
            Algorithm::TabuSearch => "Tabu search",
        }
    }

    /// Wire identifier: the name lowercased with words joined by `_`
    pub fn id(&self) -> String {
        self.name()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        Algorithm::all()
            .iter()
            .copied()
            .find(|a| a.id() == wanted)
            .ok_or_else(|| format!("unknown algorithm '{s}'"))
    }
}

/// Difficulty of an imported puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Expert,
    Extreme,
}

impl Difficulty {
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
            Difficulty::Extreme,
        ]
    }

    /// Wire identifier
    pub fn id(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Extreme => "extreme",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Difficulty::all()
            .iter()
            .copied()
            .find(|d| d.id() == wanted)
            .ok_or_else(|| format!("unknown difficulty '{s}'"))
    }
}

/// Body of a solve request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveRequest {
    #[serde(rename = "table")]
    pub grid: Grid,
    pub algorithm: String,
}

impl SolveRequest {
    pub fn new(grid: Grid, algorithm: Algorithm) -> Self {
        Self {
            grid,
            algorithm: algorithm.id(),
        }
    }
}

/// Body of an import response
#[derive(Debug, Clone, Deserialize)]
pub struct MissionResponse {
    pub mission: String,
}

/// Interpret the `solution` field of a solve response
///
/// Accepts `{"table": [[..]]}` or a bare 9x9 array. A missing, null or
/// empty value (or a missing or empty table) means the solver found nothing.
pub fn decode_solution(solution: Option<serde_json::Value>) -> ServiceResult<Option<Grid>> {
    use serde_json::Value;

    let table = match solution {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(mut map)) => match map.remove("table") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(rows)) if rows.is_empty() => return Ok(None),
            Some(table) => table,
        },
        Some(Value::Array(rows)) if rows.is_empty() => return Ok(None),
        Some(other @ Value::Array(_)) => other,
        Some(other) => {
            return Err(ServiceError::Decode(format!(
                "unexpected solution value: {other}"
            )))
        }
    };

    serde_json::from_value::<Grid>(table)
        .map(Some)
        .map_err(|e| ServiceError::Decode(e.to_string()))
}

/// Remote solving and import operations
///
/// Calls are blocking; the orchestrator runs them off the UI thread.
pub trait PuzzleService: Send + Sync {
    /// Ask for a solution. `Ok(None)` means the solver found none.
    fn solve(&self, request: &SolveRequest) -> ServiceResult<Option<Grid>>;

    /// Fetch a puzzle as an 81-character mission string
    fn fetch_mission(&self, difficulty: Difficulty) -> ServiceResult<String>;

    /// Backend name for display and logs
    fn backend_name(&self) -> &'static str;
}

// ==================== Mock Backend ====================

/// In-memory service with canned responses
///
/// Requests can be held open with [`MockService::hold`] to observe the
/// pending state.
pub struct MockService {
    solve_response: Mutex<ServiceResult<Option<Grid>>>,
    mission_response: Mutex<ServiceResult<String>>,
    requests: Mutex<Vec<SolveRequest>>,
    missions: Mutex<Vec<Difficulty>>,
    gate: Mutex<Option<Receiver<()>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockService {
    /// Solver finds nothing and no mission is configured
    pub fn new() -> Self {
        Self {
            solve_response: Mutex::new(Ok(None)),
            mission_response: Mutex::new(Err(ServiceError::Http {
                status: 404,
                body: "no mission configured".to_string(),
            })),
            requests: Mutex::new(Vec::new()),
            missions: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        }
    }

    pub fn with_solution(self, solution: Grid) -> Self {
        *lock(&self.solve_response) = Ok(Some(solution));
        self
    }

    pub fn with_solve_error(self, error: ServiceError) -> Self {
        *lock(&self.solve_response) = Err(error);
        self
    }

    pub fn with_mission(self, mission: &str) -> Self {
        *lock(&self.mission_response) = Ok(mission.to_string());
        self
    }

    pub fn with_mission_error(self, error: ServiceError) -> Self {
        *lock(&self.mission_response) = Err(error);
        self
    }

    /// Block every request until the returned sender fires or is dropped
    pub fn hold(&self) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        *lock(&self.gate) = Some(rx);
        tx
    }

    /// Solve requests received so far
    pub fn solve_requests(&self) -> Vec<SolveRequest> {
        lock(&self.requests).clone()
    }

    /// Difficulties requested so far
    pub fn mission_requests(&self) -> Vec<Difficulty> {
        lock(&self.missions).clone()
    }

    fn wait_for_gate(&self) {
        if let Some(rx) = lock(&self.gate).as_ref() {
            let _ = rx.recv();
        }
    }
}

impl PuzzleService for MockService {
    fn solve(&self, request: &SolveRequest) -> ServiceResult<Option<Grid>> {
        lock(&self.requests).push(request.clone());
        self.wait_for_gate();
        lock(&self.solve_response).clone()
    }

    fn fetch_mission(&self, difficulty: Difficulty) -> ServiceResult<String> {
        lock(&self.missions).push(difficulty);
        self.wait_for_gate();
        lock(&self.mission_response).clone()
    }

    fn backend_name(&self) -> &'static str {
        "Mock"
    }
}
