//! Sequential multi-account orchestration.

use std::time::Duration;

use tracing::{info, info_span, Instrument};

use crate::blockchain::adapter::ChainAdapter;
use crate::blockchain::types::AccountKey;
use crate::config::SweeperConfig;
use crate::disburse::fee::FeeError;
use crate::disburse::procedure::DisburseSettings;
use crate::disburse::types::AttemptOutcome;
use crate::resilience::retries::{run_with_retry, RetryPolicy};

/// Outcome counts for one run. Logged once; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &AttemptOutcome) {
        self.total += 1;
        match outcome {
            AttemptOutcome::Sent(_) => self.sent += 1,
            AttemptOutcome::Skipped(_) => self.skipped += 1,
            AttemptOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Processes accounts one at a time, in input order.
pub struct BatchRunner<A> {
    adapter: A,
    settings: DisburseSettings,
    policy: RetryPolicy,
    /// Wait between consecutive accounts, independent of retry backoff.
    pacing: Duration,
}

impl<A: ChainAdapter> BatchRunner<A> {
    pub fn new(
        adapter: A,
        settings: DisburseSettings,
        policy: RetryPolicy,
        pacing: Duration,
    ) -> Self {
        Self {
            adapter,
            settings,
            policy,
            pacing,
        }
    }

    /// Build a runner from validated configuration.
    pub fn from_config(adapter: A, config: &SweeperConfig) -> Result<Self, FeeError> {
        Ok(Self::new(
            adapter,
            DisburseSettings::from_config(config)?,
            RetryPolicy::from_config(&config.retries),
            Duration::from_millis(config.pacing.account_delay_ms),
        ))
    }

    /// Sweep every key into the recipient.
    ///
    /// Failures never stop the batch; each key gets its own retry budget.
    pub async fn run(&self, keys: &[AccountKey]) -> BatchSummary {
        let total = keys.len();
        let mut summary = BatchSummary::default();

        info!(
            accounts = total,
            recipient = %self.settings.recipient,
            flat_fee = %self.settings.fee.flat_fee,
            denom = %self.settings.denomination.base,
            "Starting sweep"
        );

        for (i, key) in keys.iter().enumerate() {
            let span = info_span!("account", index = i + 1, total = total);
            let report = run_with_retry(&self.adapter, &self.settings, key, &self.policy)
                .instrument(span)
                .await;
            summary.record(&report.outcome);

            if i + 1 < total {
                tokio::time::sleep(self.pacing).await;
            }
        }

        info!(
            total = summary.total,
            sent = summary.sent,
            skipped = summary.skipped,
            failed = summary.failed,
            "Sweep finished"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock::MockChainClient;

    fn runner(mock: MockChainClient) -> BatchRunner<MockChainClient> {
        let mut config = SweeperConfig::default();
        config.transfer.recipient = "addr-recipient".into();
        config.fee.gas_price = "0.025".into();
        config.fee.gas_limit = 200_000;
        BatchRunner::from_config(mock, &config).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch() {
        let runner = runner(MockChainClient::new());
        let start = tokio::time::Instant::now();

        let summary = runner.run(&[]).await;
        assert_eq!(summary, BatchSummary::default());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_between_accounts_only() {
        let mock = MockChainClient::new();
        let runner = runner(mock.clone());
        let keys = vec![AccountKey::new("a1"), AccountKey::new("b2"), AccountKey::new("c3")];
        let start = tokio::time::Instant::now();

        let summary = runner.run(&keys).await;
        assert_eq!(summary.total, 3);
        assert_eq!(summary.skipped, 3);
        assert_eq!(start.elapsed(), Duration::from_millis(4000));

        let b = mock.connect_times("b2")[0];
        let c = mock.connect_times("c3")[0];
        assert_eq!(c - b, Duration::from_millis(2000));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchSummary::default();
        summary.record(&AttemptOutcome::Skipped(crate::disburse::SkipReason::BalanceTooSmall));
        summary.record(&AttemptOutcome::Failed(crate::blockchain::ChainError::Timeout(5)));
        assert_eq!(
            summary,
            BatchSummary {
                total: 2,
                sent: 0,
                skipped: 1,
                failed: 1
            }
        );
    }
}
