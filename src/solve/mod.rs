pub mod client;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod solution;
pub mod state;

pub use client::{GeminiSolveClient, SolveClient};
pub use error::{SolveError, SOLVE_FALLBACK_MESSAGE};
pub use history::{SolutionHistory, DEFAULT_HISTORY_LIMIT};
pub use orchestrator::{PrimaryView, SolveOrchestrator, SubmitOutcome};
pub use solution::MathSolution;
pub use state::SessionStatus;
