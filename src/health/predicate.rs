//! Success predicate for probe responses.
//!
//! # Responsibilities
//! - Decide whether an observed response means "ready"
//! - Flag responses that retries cannot fix (fatal statuses)
//!
//! # Design Decisions
//! - Default is the 2xx range
//! - Fatal statuses are opt-in; with none configured every non-ready
//!   response is treated as transient
//! - A custom closure can replace the status-set check for library callers

use std::fmt;
use std::sync::Arc;

use crate::health::attempt::ProbeObservation;

/// How a single observation is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ready,
    NotReady,
    Fatal,
}

type CustomCheck = Arc<dyn Fn(&ProbeObservation) -> bool + Send + Sync>;

/// Judges probe observations.
#[derive(Clone, Default)]
pub struct SuccessPredicate {
    accepted: Vec<u16>,
    fatal: Vec<u16>,
    custom: Option<CustomCheck>,
}

impl SuccessPredicate {
    /// Predicate from accepted and fatal status sets. Empty `accepted` means 2xx.
    pub fn from_statuses(accepted: Vec<u16>, fatal: Vec<u16>) -> Self {
        Self {
            accepted,
            fatal,
            custom: None,
        }
    }

    /// Replace the accepted-status check with a caller-supplied function.
    ///
    /// Fatal statuses are still checked first.
    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&ProbeObservation) -> bool + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(check));
        self
    }

    pub fn evaluate(&self, observation: &ProbeObservation) -> Verdict {
        if self.fatal.contains(&observation.status) {
            return Verdict::Fatal;
        }

        let ready = match &self.custom {
            Some(check) => check(observation),
            None if self.accepted.is_empty() => (200..=299).contains(&observation.status),
            None => self.accepted.contains(&observation.status),
        };

        if ready {
            Verdict::Ready
        } else {
            Verdict::NotReady
        }
    }
}

impl fmt::Debug for SuccessPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuccessPredicate")
            .field("accepted", &self.accepted)
            .field("fatal", &self.fatal)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(status: u16) -> ProbeObservation {
        ProbeObservation { status }
    }

    #[test]
    fn test_default_is_2xx() {
        let predicate = SuccessPredicate::default();
        assert_eq!(predicate.evaluate(&obs(200)), Verdict::Ready);
        assert_eq!(predicate.evaluate(&obs(204)), Verdict::Ready);
        assert_eq!(predicate.evaluate(&obs(299)), Verdict::Ready);
        assert_eq!(predicate.evaluate(&obs(199)), Verdict::NotReady);
        assert_eq!(predicate.evaluate(&obs(301)), Verdict::NotReady);
        assert_eq!(predicate.evaluate(&obs(503)), Verdict::NotReady);
    }

    #[test]
    fn test_explicit_accepted_set() {
        let predicate = SuccessPredicate::from_statuses(vec![200, 401], vec![]);
        assert_eq!(predicate.evaluate(&obs(401)), Verdict::Ready);
        assert_eq!(predicate.evaluate(&obs(204)), Verdict::NotReady);
    }

    #[test]
    fn test_fatal_wins() {
        let predicate = SuccessPredicate::from_statuses(vec![], vec![404])
            .with_check(|_| true);
        assert_eq!(predicate.evaluate(&obs(404)), Verdict::Fatal);
        assert_eq!(predicate.evaluate(&obs(500)), Verdict::Ready);
    }

    #[test]
    fn test_custom_check() {
        let predicate = SuccessPredicate::default().with_check(|o| o.status == 418);
        assert_eq!(predicate.evaluate(&obs(418)), Verdict::Ready);
        assert_eq!(predicate.evaluate(&obs(200)), Verdict::NotReady);
    }
}
