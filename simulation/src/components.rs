//! Patient identity and life-history types

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(pub u64);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// States
// ============================================================================

/// Health states a patient can enter during one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientState {
    Healthy,
    Cancer,
    OtherDeath,
}

impl PatientState {
    pub fn label(&self) -> &'static str {
        match self {
            PatientState::Healthy => "Healthy",
            PatientState::Cancer => "Cancer",
            PatientState::OtherDeath => "Other Death",
        }
    }
}

impl fmt::Display for PatientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// History
// ============================================================================

/// Ages (in years) at which a patient entered each state.
///
/// `cancer_onset_age` is only set when onset happened no later than death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientHistory {
    pub healthy_age: u32,
    pub cancer_onset_age: Option<u32>,
    pub death_age: u32,
}

impl PatientHistory {
    pub fn has_cancer(&self) -> bool {
        self.cancer_onset_age.is_some()
    }

    /// States in order of entry, with the age of entry.
    pub fn states(&self) -> impl Iterator<Item = (PatientState, u32)> + '_ {
        std::iter::once((PatientState::Healthy, self.healthy_age))
            .chain(self.cancer_onset_age.map(|age| (PatientState::Cancer, age)))
            .chain(std::iter::once((PatientState::OtherDeath, self.death_age)))
    }
}

impl fmt::Display for PatientHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (state, age)) in self.states().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", state, age)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_without_cancer() {
        let history = PatientHistory {
            healthy_age: 40,
            cancer_onset_age: None,
            death_age: 71,
        };
        let states: Vec<_> = history.states().collect();
        assert_eq!(
            states,
            vec![(PatientState::Healthy, 40), (PatientState::OtherDeath, 71)]
        );
        assert!(!history.has_cancer());
    }

    #[test]
    fn test_display_lists_states_in_order() {
        let history = PatientHistory {
            healthy_age: 0,
            cancer_onset_age: Some(55),
            death_age: 80,
        };
        assert_eq!(
            history.to_string(),
            "{Healthy: 0, Cancer: 55, Other Death: 80}"
        );
    }
}
