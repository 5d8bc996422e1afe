use crate::solve::client::SolveClient;
use crate::solve::error::{SolveError, SOLVE_FALLBACK_MESSAGE};
use crate::solve::history::SolutionHistory;
use crate::solve::solution::MathSolution;
use crate::solve::state::{can_transition, SessionStatus};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// A solve is already in flight; the request was ignored.
    RejectedBusy,
}

/// Which of the mutually exclusive primary views the GUI should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryView {
    Empty,
    Processing,
    Solution,
    ErrorBanner,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SolveStarted,
    SolveSucceeded(MathSolution),
    SolveFailed(String),
    ErrorDismissed,
    HistorySelected(MathSolution),
    HistoryCleared,
}

/// The single authoritative UI state, mutated only through [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub solution: Option<MathSolution>,
    pub error: Option<String>,
    pub history: SolutionHistory,
}

impl SessionState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            status: SessionStatus::Idle,
            solution: None,
            error: None,
            history: SolutionHistory::with_limit(history_limit),
        }
    }

    pub fn primary_view(&self) -> PrimaryView {
        match self.status {
            SessionStatus::Solving => PrimaryView::Processing,
            SessionStatus::Error => PrimaryView::ErrorBanner,
            SessionStatus::Idle | SessionStatus::Success => {
                if self.solution.is_some() {
                    PrimaryView::Solution
                } else {
                    PrimaryView::Empty
                }
            }
        }
    }
}

pub fn reduce(state: &mut SessionState, event: SessionEvent) {
    match event {
        SessionEvent::SolveStarted => {
            if state.status == SessionStatus::Solving {
                tracing::warn!("ignoring solve request while one is in flight");
                return;
            }
            state.error = None;
            state.status = SessionStatus::Solving;
        }
        SessionEvent::SolveSucceeded(solution) => {
            if state.status != SessionStatus::Solving {
                tracing::debug!("discarding solve result outside an active solve");
                return;
            }
            state.history.record(solution.clone());
            state.solution = Some(solution);
            state.status = SessionStatus::Success;
        }
        SessionEvent::SolveFailed(message) => {
            if !can_transition(state.status, SessionStatus::Error) {
                tracing::warn!(status = ?state.status, "cannot enter error state");
                return;
            }
            state.error = Some(if message.trim().is_empty() {
                SOLVE_FALLBACK_MESSAGE.to_string()
            } else {
                message
            });
            state.status = SessionStatus::Error;
        }
        SessionEvent::ErrorDismissed => {
            if state.status != SessionStatus::Error {
                return;
            }
            state.error = None;
            state.status = SessionStatus::Idle;
        }
        SessionEvent::HistorySelected(solution) => {
            state.solution = Some(solution);
            state.error = None;
            state.status = SessionStatus::Success;
        }
        SessionEvent::HistoryCleared => {
            state.history.clear();
        }
    }
}

struct SolveReply {
    seq: u64,
    result: Result<MathSolution, SolveError>,
}

/// Owns the session state and the single in-flight request. Requests run on
/// a worker thread; replies come back over a channel drained by [`poll`] on
/// the UI thread, tagged with a sequence number so a reply that is no longer
/// the latest is discarded.
///
/// [`poll`]: SolveOrchestrator::poll
pub struct SolveOrchestrator {
    state: SessionState,
    client: Arc<dyn SolveClient>,
    reply_tx: Sender<SolveReply>,
    reply_rx: Receiver<SolveReply>,
    seq: u64,
}

impl SolveOrchestrator {
    pub fn new(client: Arc<dyn SolveClient>, history_limit: usize) -> Self {
        let (reply_tx, reply_rx) = channel();
        Self {
            state: SessionState::new(history_limit),
            client,
            reply_tx,
            reply_rx,
            seq: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_solving(&self) -> bool {
        self.state.status.is_solving()
    }

    /// Start solving the encoded image. Rejected without side effects while a
    /// request is already in flight.
    pub fn submit(&mut self, image: String) -> SubmitOutcome {
        if self.state.status == SessionStatus::Solving {
            tracing::debug!("rejecting submit while a solve is in flight");
            return SubmitOutcome::RejectedBusy;
        }
        self.seq += 1;
        let seq = self.seq;
        reduce(&mut self.state, SessionEvent::SolveStarted);

        let client = Arc::clone(&self.client);
        let reply_tx = self.reply_tx.clone();
        thread::spawn(move || {
            let result = client.solve(&image);
            // The receiver only goes away when the app shuts down.
            let _ = reply_tx.send(SolveReply { seq, result });
        });
        SubmitOutcome::Accepted
    }

    /// Drain pending replies. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(reply) = self.reply_rx.try_recv() {
            if reply.seq != self.seq {
                tracing::debug!(seq = reply.seq, latest = self.seq, "discarding stale solve reply");
                continue;
            }
            match reply.result {
                Ok(solution) => {
                    tracing::info!(equation = %solution.equation, "solve succeeded");
                    reduce(&mut self.state, SessionEvent::SolveSucceeded(solution));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "solve failed");
                    reduce(&mut self.state, SessionEvent::SolveFailed(err.display_message()));
                }
            }
            changed = true;
        }
        changed
    }

    /// Surface a local failure (e.g. an unreadable upload) in the same error
    /// banner the solve path uses.
    pub fn report_failure(&mut self, message: String) {
        reduce(&mut self.state, SessionEvent::SolveFailed(message));
    }

    pub fn dismiss_error(&mut self) {
        reduce(&mut self.state, SessionEvent::ErrorDismissed);
    }

    /// Re-display a past solution without touching the external service.
    pub fn select_history_item(&mut self, index: usize) {
        if let Some(solution) = self.state.history.get(index).cloned() {
            reduce(&mut self.state, SessionEvent::HistorySelected(solution));
        }
    }

    pub fn clear_history(&mut self) {
        reduce(&mut self.state, SessionEvent::HistoryCleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(tag: &str) -> MathSolution {
        MathSolution {
            equation: tag.to_string(),
            latex: tag.to_string(),
            result: "4".into(),
            steps: vec![],
            explanation: String::new(),
        }
    }

    fn state() -> SessionState {
        SessionState::new(10)
    }

    #[test]
    fn solve_started_clears_the_previous_error() {
        let mut state = state();
        reduce(&mut state, SessionEvent::SolveFailed("boom".into()));
        assert_eq!(state.status, SessionStatus::Error);

        reduce(&mut state, SessionEvent::SolveStarted);
        assert_eq!(state.status, SessionStatus::Solving);
        assert_eq!(state.error, None);
    }

    #[test]
    fn success_records_history_and_current_solution() {
        let mut state = state();
        reduce(&mut state, SessionEvent::SolveStarted);
        reduce(&mut state, SessionEvent::SolveSucceeded(solution("2+2")));
        assert_eq!(state.status, SessionStatus::Success);
        assert_eq!(state.solution, Some(solution("2+2")));
        assert_eq!(state.history.get(0), Some(&solution("2+2")));
    }

    #[test]
    fn success_outside_a_solve_is_discarded() {
        let mut state = state();
        reduce(&mut state, SessionEvent::SolveSucceeded(solution("2+2")));
        assert_eq!(state.status, SessionStatus::Idle);
        assert!(state.history.is_empty());
    }

    #[test]
    fn empty_failure_message_gets_the_fallback() {
        let mut state = state();
        reduce(&mut state, SessionEvent::SolveStarted);
        reduce(&mut state, SessionEvent::SolveFailed(String::new()));
        assert_eq!(state.error.as_deref(), Some(SOLVE_FALLBACK_MESSAGE));
    }

    #[test]
    fn dismiss_is_a_no_op_outside_the_error_state() {
        let mut state = state();
        reduce(&mut state, SessionEvent::ErrorDismissed);
        assert_eq!(state.status, SessionStatus::Idle);

        reduce(&mut state, SessionEvent::SolveStarted);
        reduce(&mut state, SessionEvent::ErrorDismissed);
        assert_eq!(state.status, SessionStatus::Solving);
    }

    #[test]
    fn history_selection_wins_from_any_state() {
        let mut state = state();
        reduce(&mut state, SessionEvent::SolveStarted);
        reduce(&mut state, SessionEvent::HistorySelected(solution("x=1")));
        assert_eq!(state.status, SessionStatus::Success);
        assert_eq!(state.solution, Some(solution("x=1")));
    }

    #[test]
    fn clearing_history_keeps_the_current_solution() {
        let mut state = state();
        reduce(&mut state, SessionEvent::SolveStarted);
        reduce(&mut state, SessionEvent::SolveSucceeded(solution("2+2")));
        reduce(&mut state, SessionEvent::HistoryCleared);
        assert!(state.history.is_empty());
        assert_eq!(state.status, SessionStatus::Success);
        assert_eq!(state.solution, Some(solution("2+2")));
    }

    #[test]
    fn primary_view_tracks_the_status() {
        let mut state = state();
        assert_eq!(state.primary_view(), PrimaryView::Empty);

        reduce(&mut state, SessionEvent::SolveStarted);
        assert_eq!(state.primary_view(), PrimaryView::Processing);

        reduce(&mut state, SessionEvent::SolveSucceeded(solution("2+2")));
        assert_eq!(state.primary_view(), PrimaryView::Solution);

        reduce(&mut state, SessionEvent::SolveFailed("boom".into()));
        assert_eq!(state.primary_view(), PrimaryView::ErrorBanner);

        // Dismissing keeps the last solution on screen.
        reduce(&mut state, SessionEvent::ErrorDismissed);
        assert_eq!(state.primary_view(), PrimaryView::Solution);
    }
}
