//! Retry logic.
//!
//! # Responsibilities
//! - Run one disbursement attempt per loop iteration
//! - Retry only rate-limited failures, with exponential backoff
//! - Contain every failure at the account boundary
//!
//! # State Machine
//! ```text
//! Attempting → Succeeded        (Sent)
//! Attempting → SkippedTerminal  (balance too small)
//! Attempting → FailedTerminal   (fatal error, or rate limited with no attempts left)
//! Attempting → Attempting       (rate limited, attempts left; sleep then double delay)
//! ```
//!
//! # Design Decisions
//! - Classification uses `ChainError::is_rate_limited`, never message text
//! - Every rate-limited attempt is followed by its backoff sleep, the last one
//!   included, so the endpoint cools down before the next account
//! - Exhaustion is logged once as `[ERR]` with the attempt count

use std::time::Duration;

use tracing::{error, warn};

use crate::blockchain::adapter::ChainAdapter;
use crate::blockchain::types::AccountKey;
use crate::config::RetryConfig;
use crate::disburse::procedure::{disburse, DisburseSettings};
use crate::disburse::types::AttemptOutcome;
use crate::resilience::backoff::calculate_backoff;

/// Bounds on retrying one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per account, at least one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.initial_delay_ms),
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(2000))
    }
}

/// Progress through one account's retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// 1-based index of the current attempt.
    pub attempt_index: u32,
    /// Attempts left, counting the current one.
    pub remaining_attempts: u32,
    /// Delay applied if the current attempt is rate limited.
    pub current_delay: Duration,
}

impl RetryState {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt_index: 1,
            remaining_attempts: policy.max_attempts,
            current_delay: policy.initial_delay,
        }
    }

    /// Move to the next attempt. Returns false when the budget is spent.
    fn advance(&mut self, policy: &RetryPolicy) -> bool {
        self.remaining_attempts = self.remaining_attempts.saturating_sub(1);
        if self.remaining_attempts == 0 {
            return false;
        }
        self.attempt_index += 1;
        self.current_delay = calculate_backoff(self.attempt_index, policy.initial_delay);
        true
    }
}

/// What happened to one account under the retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryReport {
    pub outcome: AttemptOutcome,
    /// Attempts actually made.
    pub attempts: u32,
    /// Backoff sleeps taken, in order.
    pub delays: Vec<Duration>,
}

/// Process one account, retrying rate-limited attempts.
///
/// Never fails: fatal errors and exhaustion come back as
/// [`AttemptOutcome::Failed`].
pub async fn run_with_retry<A: ChainAdapter>(
    adapter: &A,
    settings: &DisburseSettings,
    key: &AccountKey,
    policy: &RetryPolicy,
) -> RetryReport {
    let account = match adapter.derive_identity(key) {
        Ok(account) => account,
        Err(err) => {
            error!(error = %err, "[ERR] <invalid key> | {}", err);
            return RetryReport {
                outcome: AttemptOutcome::Failed(err),
                attempts: 1,
                delays: Vec::new(),
            };
        }
    };
    let address = account.address.as_str();

    let mut state = RetryState::new(policy);
    let mut delays = Vec::new();

    loop {
        let err = match disburse(adapter, settings, &account).await {
            Ok(outcome) => {
                return RetryReport {
                    outcome,
                    attempts: state.attempt_index,
                    delays,
                }
            }
            Err(err) => err,
        };

        if !err.is_rate_limited() {
            error!(address = %address, error = %err, "[ERR] {} | {}", address, err);
            return RetryReport {
                outcome: AttemptOutcome::Failed(err),
                attempts: state.attempt_index,
                delays,
            };
        }

        let delay = state.current_delay;
        warn!(
            address = %address,
            attempt = state.attempt_index,
            max_attempts = policy.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "[RETRY] Rate limit. Attempt {}/{} for {}, backing off {}ms",
            state.attempt_index,
            policy.max_attempts,
            address,
            delay.as_millis()
        );
        tokio::time::sleep(delay).await;
        delays.push(delay);

        let attempts = state.attempt_index;
        if !state.advance(policy) {
            error!(
                address = %address,
                attempts = attempts,
                error = %err,
                "[ERR] {} | giving up after {} rate-limited attempts: {}",
                address,
                attempts,
                err
            );
            return RetryReport {
                outcome: AttemptOutcome::Failed(err),
                attempts,
                delays,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock::{MockChainClient, MockEvent, MockOp};
    use crate::blockchain::types::{ChainError, RpcErrorKind, TxHash};
    use crate::disburse::denom::Denomination;
    use crate::disburse::fee::FeeSpec;
    use rust_decimal::Decimal;

    const KEY: &str = "b2";

    fn settings() -> DisburseSettings {
        DisburseSettings {
            recipient: "addr-recipient".to_string(),
            denomination: Denomination {
                base: "uzig".into(),
                display: "ZIG".into(),
                decimals: 6,
            },
            fee: FeeSpec::new(Decimal::new(25, 3), 200_000).unwrap(),
            explorer_tx_url: "https://zigscan.org/tx/".into(),
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    async fn run(mock: &MockChainClient, key: &str) -> RetryReport {
        run_with_retry(mock, &settings(), &AccountKey::new(key), &RetryPolicy::default()).await
    }

    #[test]
    fn test_policy_defaults_and_floor() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, ms(2000));

        assert_eq!(RetryPolicy::new(0, ms(10)).max_attempts, 1);
    }

    #[test]
    fn test_state_advances_geometrically() {
        let policy = RetryPolicy::default();
        let mut state = RetryState::new(&policy);
        assert_eq!(state.current_delay, ms(2000));

        assert!(state.advance(&policy));
        assert_eq!(state.attempt_index, 2);
        assert_eq!(state.current_delay, ms(4000));

        assert!(state.advance(&policy));
        assert_eq!(state.current_delay, ms(8000));

        assert!(!state.advance(&policy));
        assert_eq!(state.remaining_attempts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_account_is_abandoned_after_budget() {
        let mock = MockChainClient::new();
        mock.set_balance(KEY, 1_005_000);
        mock.rate_limit(KEY, 3);

        let start = tokio::time::Instant::now();
        let report = run(&mock, KEY).await;

        assert_eq!(report.attempts, 3);
        assert_eq!(report.delays, vec![ms(2000), ms(4000), ms(8000)]);
        assert!(matches!(
            &report.outcome,
            AttemptOutcome::Failed(e) if e.is_rate_limited()
        ));
        assert!(mock.sent_transfers().is_empty());

        let times = mock.connect_times(KEY);
        assert_eq!(times.len(), 3);
        assert_eq!(times[1] - times[0], ms(2000));
        assert_eq!(times[2] - times[1], ms(4000));
        assert_eq!(start.elapsed(), ms(14_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_rate_limit() {
        let mock = MockChainClient::new();
        mock.set_balance(KEY, 1_005_000);
        mock.rate_limit(KEY, 2);

        let report = run(&mock, KEY).await;

        assert_eq!(report.outcome, AttemptOutcome::Sent(TxHash("0xmock0001".into())));
        assert_eq!(report.attempts, 3);
        assert_eq!(report.delays, vec![ms(2000), ms(4000)]);

        // Balance is re-queried on every attempt.
        let balance_queries = mock
            .events()
            .iter()
            .filter(|e| matches!(e, MockEvent::Balance { .. }))
            .count();
        assert_eq!(balance_queries, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_short_circuits() {
        let mock = MockChainClient::new();
        mock.set_balance(KEY, 1_005_000);
        mock.fail_next(
            KEY,
            MockOp::Balance,
            ChainError::rpc(RpcErrorKind::Other, "internal error"),
        );

        let start = tokio::time::Instant::now();
        let report = run(&mock, KEY).await;

        assert_eq!(report.attempts, 1);
        assert!(report.delays.is_empty());
        assert!(matches!(
            report.outcome,
            AttemptOutcome::Failed(ChainError::Rpc { .. })
        ));
        assert_eq!(mock.connect_times(KEY).len(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_connect_is_retried() {
        let mock = MockChainClient::new();
        mock.set_balance(KEY, 1_005_000);
        mock.fail_next(
            KEY,
            MockOp::Connect,
            ChainError::Connection {
                message: "HTTP 429".into(),
                rate_limited: true,
            },
        );

        let report = run(&mock, KEY).await;
        assert!(report.outcome.is_sent());
        assert_eq!(report.attempts, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_key_is_not_retried() {
        let mock = MockChainClient::new();

        let report = run(&mock, "nothex").await;
        assert_eq!(report.attempts, 1);
        assert!(matches!(
            report.outcome,
            AttemptOutcome::Failed(ChainError::InvalidKey(_))
        ));
        assert!(mock.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_is_terminal() {
        let mock = MockChainClient::new();
        mock.set_balance(KEY, 4999);

        let report = run(&mock, KEY).await;
        assert!(matches!(report.outcome, AttemptOutcome::Skipped(_)));
        assert_eq!(report.attempts, 1);
    }
}
