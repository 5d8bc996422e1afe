use crate::solve::solution::MathSolution;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Bounded, most-recent-first list of past solutions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionHistory {
    entries: Vec<MathSolution>,
    limit: usize,
}

impl Default for SolutionHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl SolutionHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Prepend a solution and truncate to the limit.
    pub fn record(&mut self, solution: MathSolution) {
        self.entries.insert(0, solution);
        self.entries.truncate(self.limit);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, index: usize) -> Option<&MathSolution> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[MathSolution] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(tag: usize) -> MathSolution {
        MathSolution {
            equation: format!("eq{tag}"),
            latex: format!("eq_{tag}"),
            result: tag.to_string(),
            steps: vec![format!("step {tag}")],
            explanation: String::new(),
        }
    }

    #[test]
    fn newest_entry_comes_first() {
        let mut history = SolutionHistory::default();
        history.record(solution(1));
        history.record(solution(2));
        assert_eq!(history.get(0), Some(&solution(2)));
        assert_eq!(history.get(1), Some(&solution(1)));
    }

    #[test]
    fn recording_past_the_limit_drops_the_oldest() {
        let mut history = SolutionHistory::with_limit(3);
        for tag in 1..=5 {
            history.record(solution(tag));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.get(0), Some(&solution(5)));
        assert_eq!(history.get(2), Some(&solution(3)));
    }

    #[test]
    fn clear_empties_the_list() {
        let mut history = SolutionHistory::default();
        history.record(solution(1));
        history.clear();
        assert!(history.is_empty());
    }
}
