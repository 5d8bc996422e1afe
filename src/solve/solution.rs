use serde::{Deserialize, Serialize};

/// Structured result of solving one equation. All fields are required in the
/// solver's reply; deserialization fails when any is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathSolution {
    pub equation: String,
    pub latex: String,
    pub result: String,
    pub steps: Vec<String>,
    pub explanation: String,
}
