// 🔎 Progressive Filter Engine
// Pure, stable filters over a candidate list plus the stage classification
// that decides whether narrowing continues, stops, or falls back.

use crate::catalog::Park;
use std::collections::BTreeSet;

// ============================================================================
// FILTERS
// ============================================================================

/// Parks whose state list contains `state_code` (case-insensitive)
pub fn filter_by_state(parks: &[Park], state_code: &str) -> Vec<Park> {
    parks
        .iter()
        .filter(|p| p.in_state(state_code))
        .cloned()
        .collect()
}

/// Parks having at least one of the selected topics
pub fn filter_by_topics(parks: &[Park], selected: &[String]) -> Vec<Park> {
    parks
        .iter()
        .filter(|p| p.has_any_topic(selected))
        .cloned()
        .collect()
}

/// Parks offering at least one of the selected activities
pub fn filter_by_activities(parks: &[Park], selected: &[String]) -> Vec<Park> {
    parks
        .iter()
        .filter(|p| p.has_any_activity(selected))
        .cloned()
        .collect()
}

// ============================================================================
// CHOICE LISTS
// ============================================================================

/// Sorted union of topics across the current candidates
pub fn available_topics(parks: &[Park]) -> Vec<String> {
    parks
        .iter()
        .flat_map(|p| p.topics.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted union of activities across the current candidates
pub fn available_activities(parks: &[Park]) -> Vec<String> {
    parks
        .iter()
        .flat_map(|p| p.activities.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 1-based numbering for presentation; recomputed at every stage
pub fn numbered(options: &[String]) -> Vec<(usize, &str)> {
    options
        .iter()
        .enumerate()
        .map(|(i, o)| (i + 1, o.as_str()))
        .collect()
}

// ============================================================================
// STAGE OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// More than one park left; narrowing may continue
    Narrowed(Vec<Park>),

    /// Exactly one park left; go straight to the final interaction
    Terminal(Park),

    /// Nothing matched; the final interaction uses the previous candidates
    Empty { fallback: Vec<Park> },
}

impl StageOutcome {
    /// Classify a filter result against the candidates it was computed from
    pub fn classify(previous: &[Park], mut result: Vec<Park>) -> Self {
        match result.len() {
            0 => StageOutcome::Empty {
                fallback: previous.to_vec(),
            },
            1 => StageOutcome::Terminal(result.remove(0)),
            _ => StageOutcome::Narrowed(result),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StageOutcome::Terminal(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StageOutcome::Empty { .. })
    }

    /// The list the game continues (or finishes) with
    pub fn candidates(&self) -> Vec<Park> {
        match self {
            StageOutcome::Narrowed(parks) => parks.clone(),
            StageOutcome::Terminal(park) => vec![park.clone()],
            StageOutcome::Empty { fallback } => fallback.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
