//! HTTP implementation of [`PuzzleService`].
//!
//! Blocking reqwest client (no Tokio runtime required). One attempt per
//! call; failures are reported, never retried.

use crate::grid::Grid;
use crate::service::{
    decode_solution, Difficulty, MissionResponse, PuzzleService, ServiceError, ServiceResult,
    SolveRequest,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Endpoint addressing for the solver and import services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL of the solving backend; requests go to `{backend_url}/solve`
    pub backend_url: String,
    /// Base URL of the puzzle source; requests go to `{import_url}/{difficulty}`
    pub import_url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            import_url: "http://localhost:8000/import".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Solver and import client over HTTP
#[derive(Clone)]
pub struct HttpPuzzleService {
    http: reqwest::blocking::Client,
    solve_url: String,
    import_base: String,
}

/// Raw solve response; only the `solution` field matters
#[derive(Deserialize)]
struct SolveResponse {
    #[serde(default)]
    solution: Option<serde_json::Value>,
}

impl HttpPuzzleService {
    pub fn new(config: &ServiceConfig) -> ServiceResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("sudoku-solver/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            http,
            solve_url: format!("{}/solve", config.backend_url.trim_end_matches('/')),
            import_base: config.import_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn solve_url(&self) -> &str {
        &self.solve_url
    }

    fn check(response: reqwest::blocking::Response) -> ServiceResult<reqwest::blocking::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl PuzzleService for HttpPuzzleService {
    #[instrument(skip_all, fields(algorithm = %request.algorithm))]
    fn solve(&self, request: &SolveRequest) -> ServiceResult<Option<Grid>> {
        let response = self
            .http
            .post(&self.solve_url)
            .json(request)
            .send()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        let response = Self::check(response)?;

        let body: SolveResponse = response
            .json()
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        let solution = decode_solution(body.solution)?;
        debug!(found = solution.is_some(), "solve response decoded");
        Ok(solution)
    }

    #[instrument(skip(self), fields(difficulty = difficulty.id()))]
    fn fetch_mission(&self, difficulty: Difficulty) -> ServiceResult<String> {
        let url = format!("{}/{}", self.import_base, difficulty.id());
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        let response = Self::check(response)?;

        let body: MissionResponse = response
            .json()
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(body.mission)
    }

    fn backend_name(&self) -> &'static str {
        "HTTP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Algorithm;
    use httpmock::prelude::*;
    use serde_json::json;

    const MISSION: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    fn client(server: &MockServer) -> HttpPuzzleService {
        HttpPuzzleService::new(&ServiceConfig {
            backend_url: server.base_url(),
            import_url: server.url("/import"),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_solve_posts_table_and_algorithm() {
        let server = MockServer::start();
        let puzzle = Grid::from_mission(MISSION).unwrap();
        let solved = vec![vec![4u8; 9]; 9];

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/solve")
                .json_body(json!({
                    "table": Vec::<Vec<u8>>::from(puzzle),
                    "algorithm": "evolutionary",
                }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "solution": { "table": solved } }));
        });

        let result = client(&server)
            .solve(&SolveRequest::new(puzzle, Algorithm::Evolutionary))
            .unwrap();

        mock.assert();
        assert_eq!(result.unwrap().row(0), &[4; 9]);
    }

    #[test]
    fn test_solve_without_solution() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/solve");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "solution": null }));
        });

        let result = client(&server)
            .solve(&SolveRequest::new(Grid::EMPTY, Algorithm::Backtracking))
            .unwrap();

        mock.assert();
        assert_eq!(result, None);
    }

    #[test]
    fn test_solve_with_empty_table() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/solve");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "solution": { "table": [] } }));
        });

        let result = client(&server)
            .solve(&SolveRequest::new(Grid::EMPTY, Algorithm::TabuSearch))
            .unwrap();

        mock.assert();
        assert_eq!(result, None);
    }

    #[test]
    fn test_solve_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/solve");
            then.status(500).body("boom");
        });

        let err = client(&server)
            .solve(&SolveRequest::new(Grid::EMPTY, Algorithm::Backtracking))
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Http {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_solve_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/solve");
            then.status(200).body("<html>not json</html>");
        });

        let err = client(&server)
            .solve(&SolveRequest::new(Grid::EMPTY, Algorithm::Backtracking))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
    }

    #[test]
    fn test_fetch_mission_by_difficulty() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/import/expert");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "mission": MISSION }));
        });

        let mission = client(&server).fetch_mission(Difficulty::Expert).unwrap();

        mock.assert();
        assert_eq!(mission, MISSION);
    }

    #[test]
    fn test_unreachable_backend() {
        // Nothing listens on the discard port
        let service = HttpPuzzleService::new(&ServiceConfig {
            backend_url: "http://127.0.0.1:9".to_string(),
            import_url: "http://127.0.0.1:9/import".to_string(),
            timeout_secs: 2,
        })
        .unwrap();

        let err = service.fetch_mission(Difficulty::Easy).unwrap_err();
        assert!(matches!(err, ServiceError::Network(_)));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let service = HttpPuzzleService::new(&ServiceConfig {
            backend_url: "http://solver.local/api/".to_string(),
            ..ServiceConfig::default()
        })
        .unwrap();
        assert_eq!(service.solve_url(), "http://solver.local/api/solve");
    }
}
