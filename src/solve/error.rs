/// Shown when a failure carries no message of its own.
pub const SOLVE_FALLBACK_MESSAGE: &str = "Failed to solve the equation. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// An uploaded file could not be read or was empty.
    UnreadableFile,
    /// The solve call returned no usable payload.
    EmptyResponse,
    /// Transport, HTTP, quota, or malformed-response failure with the
    /// service's own message.
    Service(String),
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::UnreadableFile => write!(f, "The selected file could not be read."),
            SolveError::EmptyResponse => write!(f, "The solver returned an empty response."),
            SolveError::Service(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for SolveError {}

impl SolveError {
    /// The message surfaced in the error banner; falls back to a generic
    /// string when the failure carries none.
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            SOLVE_FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_surface_their_own_message() {
        let err = SolveError::Service("quota exceeded".into());
        assert_eq!(err.display_message(), "quota exceeded");
    }

    #[test]
    fn blank_service_message_falls_back_to_generic_text() {
        let err = SolveError::Service("   ".into());
        assert_eq!(err.display_message(), SOLVE_FALLBACK_MESSAGE);
    }
}
