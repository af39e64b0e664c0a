// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure retry policy: delay schedules computed from failure counters, with no
//! clocks or I/O, so the schedule itself is unit-testable.

use std::time::Duration;

use artifex_core::{ErrorClass, ProviderKind};

/// Terminal error message when a policy gives up. Distinct wording from
/// provider errors so callers can tell exhaustion apart from a hard failure.
pub const MAX_RETRIES_MESSAGE: &str = "maximum retries reached, try again later";

/// Failure counters tracked across attempts of one item.
///
/// The consecutive counter resets whenever the failure class changes, so a
/// burst of rate limits followed by a network blip restarts the flat phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryState {
    pub attempts: u32,
    pub consecutive: u32,
    last_class: Option<ErrorClass>,
}

impl RetryState {
    pub fn record_failure(&mut self, class: ErrorClass) {
        self.attempts += 1;
        if self.last_class == Some(class) {
            self.consecutive += 1;
        } else {
            self.consecutive = 1;
            self.last_class = Some(class);
        }
    }
}

/// Delay schedule parameters.
///
/// The first `flat_failures` consecutive same-class failures wait `initial`;
/// after that the delay doubles per failure, capped at `max_interval`. The
/// policy gives up entirely once `max_attempts` is reached.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub initial: Duration,
    pub flat_failures: u32,
    pub max_interval: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Patient schedule for providers with long-lived quota windows: 5s flat
    /// for ten consecutive failures, then doubling up to a day, effectively
    /// retrying until quota returns.
    pub fn conservative() -> Self {
        Self {
            initial: Duration::from_secs(5),
            flat_failures: 10,
            max_interval: Duration::from_secs(24 * 60 * 60),
            max_attempts: 1000,
        }
    }

    /// Short schedule for pay-per-request providers: three seconds flat,
    /// five attempts total.
    pub fn bounded() -> Self {
        Self {
            initial: Duration::from_secs(3),
            flat_failures: 5,
            max_interval: Duration::from_secs(3),
            max_attempts: 5,
        }
    }

    pub fn for_provider(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Gemini => Self::conservative(),
            ProviderKind::OpenAi | ProviderKind::OpenRouter => Self::bounded(),
        }
    }

    /// Whether the attempt budget is spent.
    pub fn exhausted(&self, state: &RetryState) -> bool {
        state.attempts >= self.max_attempts
    }

    /// Delay before the next attempt, given the current failure counters.
    pub fn next_interval(&self, state: &RetryState) -> Duration {
        if state.consecutive <= self.flat_failures {
            return self.initial;
        }
        let mut interval = self.initial;
        for _ in self.flat_failures..state.consecutive {
            interval = interval.saturating_mul(2);
            if interval >= self.max_interval {
                return self.max_interval;
            }
        }
        interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conservative_stays_flat_through_ten_failures() {
        let policy = RetryPolicy::conservative();
        let mut state = RetryState::default();
        for _ in 0..10 {
            state.record_failure(ErrorClass::TransientServer);
            assert_eq!(policy.next_interval(&state), Duration::from_secs(5));
        }
        state.record_failure(ErrorClass::TransientServer);
        assert_eq!(policy.next_interval(&state), Duration::from_secs(10));
        state.record_failure(ErrorClass::TransientServer);
        assert_eq!(policy.next_interval(&state), Duration::from_secs(20));
    }

    #[test]
    fn conservative_caps_at_one_day() {
        let policy = RetryPolicy::conservative();
        let mut state = RetryState::default();
        for _ in 0..100 {
            state.record_failure(ErrorClass::TransientServer);
        }
        assert_eq!(policy.next_interval(&state), Duration::from_secs(86_400));
        assert!(!policy.exhausted(&state));
    }

    #[test]
    fn class_change_resets_consecutive_counter() {
        let policy = RetryPolicy::conservative();
        let mut state = RetryState::default();
        for _ in 0..15 {
            state.record_failure(ErrorClass::TransientServer);
        }
        assert!(policy.next_interval(&state) > Duration::from_secs(5));

        state.record_failure(ErrorClass::TransientNetwork);
        assert_eq!(state.consecutive, 1);
        assert_eq!(policy.next_interval(&state), Duration::from_secs(5));
        assert_eq!(state.attempts, 16, "total attempts keep counting");
    }

    #[test]
    fn bounded_exhausts_after_five_attempts() {
        let policy = RetryPolicy::bounded();
        let mut state = RetryState::default();
        for _ in 0..4 {
            state.record_failure(ErrorClass::TransientServer);
            assert!(!policy.exhausted(&state));
        }
        state.record_failure(ErrorClass::TransientServer);
        assert!(policy.exhausted(&state));
        assert_eq!(policy.next_interval(&state), Duration::from_secs(3));
    }

    #[test]
    fn provider_mapping() {
        assert_eq!(
            RetryPolicy::for_provider(ProviderKind::Gemini).max_attempts,
            1000
        );
        assert_eq!(
            RetryPolicy::for_provider(ProviderKind::OpenAi).max_attempts,
            5
        );
        assert_eq!(
            RetryPolicy::for_provider(ProviderKind::OpenRouter).max_attempts,
            5
        );
    }
}
