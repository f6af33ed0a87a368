//! One complete disbursement attempt for one account.
//!
//! # Steps
//! ```text
//! Account (derived once per account by the retry scheduler)
//!     → connect session
//!     → query balance → skip if balance <= flat fee
//!     → build TransferPlan → send
//!     → disconnect (every path once connected)
//! ```
//!
//! Errors are returned unclassified; the retry scheduler decides retryability.

use tracing::{info, warn};

use crate::blockchain::adapter::{ChainAdapter, ChainSession};
use crate::blockchain::types::{Account, ChainResult};
use crate::config::SweeperConfig;
use crate::disburse::denom::Denomination;
use crate::disburse::fee::{compute_send_amount, FeeError, FeeSpec, SendAmount};
use crate::disburse::types::{AttemptOutcome, SkipReason, TransferPlan};

/// Read-only parameters shared by every account in a run.
#[derive(Debug, Clone)]
pub struct DisburseSettings {
    pub recipient: String,
    pub denomination: Denomination,
    pub fee: FeeSpec,
    /// Explorer URL prefix; the transaction hash is appended.
    pub explorer_tx_url: String,
}

impl DisburseSettings {
    /// Resolve settings from configuration, deriving the flat fee once.
    pub fn from_config(config: &SweeperConfig) -> Result<Self, FeeError> {
        Ok(Self {
            recipient: config.transfer.recipient.trim().to_string(),
            denomination: Denomination::from_config(&config.denomination),
            fee: FeeSpec::from_config(&config.fee)?,
            explorer_tx_url: config.transfer.explorer_tx_url.clone(),
        })
    }

    pub fn explorer_url(&self, tx_hash: &str) -> String {
        format!("{}{}", self.explorer_tx_url, tx_hash)
    }
}

/// Run one attempt for `account`.
///
/// Returns `Skipped` or `Sent` on completion. The session is released on
/// every exit path after a successful connect; release failures are logged.
pub async fn disburse<A: ChainAdapter>(
    adapter: &A,
    settings: &DisburseSettings,
    account: &Account,
) -> ChainResult<AttemptOutcome> {
    let session = adapter.connect(account).await?;

    let result = sweep(&session, account, settings).await;

    if let Err(e) = session.disconnect().await {
        warn!(address = %account.address, error = %e, "Disconnect failed");
    }

    result
}

async fn sweep<S: ChainSession>(
    session: &S,
    account: &Account,
    settings: &DisburseSettings,
) -> ChainResult<AttemptOutcome> {
    let denom = &settings.denomination;
    let balance = session.get_balance(&account.address, &denom.base).await?;

    let send_amount = match compute_send_amount(balance.amount, settings.fee.flat_fee) {
        SendAmount::Sendable(amount) => amount,
        SendAmount::Insufficient => {
            let reason = SkipReason::BalanceTooSmall;
            info!(
                address = %account.address,
                balance = %balance.amount,
                fee = %settings.fee.flat_fee,
                "[SKIP] {} | {}: {} {} ({} {})",
                account.address,
                reason,
                denom.format(balance.amount),
                denom.display,
                balance.amount,
                balance.denom
            );
            return Ok(AttemptOutcome::Skipped(reason));
        }
    };

    let plan = TransferPlan {
        from: account.address.clone(),
        to: settings.recipient.clone(),
        send_amount,
        fee: settings.fee,
    };

    info!(
        address = %plan.from,
        amount = %plan.send_amount,
        fee = %plan.fee.flat_fee,
        gas_limit = plan.fee.gas_limit,
        "[SEND] {} => {} | {} {} ({} {}, fee {} {})",
        plan.from,
        plan.to,
        denom.format(plan.send_amount),
        denom.display,
        plan.send_amount,
        denom.base,
        plan.fee.flat_fee,
        denom.base
    );

    let tx_hash = session.send_tokens(&plan).await?;

    info!(
        address = %plan.from,
        tx_hash = %tx_hash,
        "[OK] {} | {} {} sent | TX Hash: {}",
        plan.from,
        denom.format(plan.send_amount),
        denom.display,
        settings.explorer_url(&tx_hash.0)
    );

    Ok(AttemptOutcome::Sent(tx_hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock::{MockChainClient, MockEvent, MockOp};
    use crate::blockchain::types::{AccountKey, ChainError, TxHash};
    use rust_decimal::Decimal;

    const KEY: &str = "a1";
    const RECIPIENT: &str = "addr-recipient";

    fn settings() -> DisburseSettings {
        DisburseSettings {
            recipient: RECIPIENT.to_string(),
            denomination: Denomination {
                base: "uzig".into(),
                display: "ZIG".into(),
                decimals: 6,
            },
            // 0.025 * 200000 = 5000
            fee: FeeSpec::new(Decimal::new(25, 3), 200_000).unwrap(),
            explorer_tx_url: "https://zigscan.org/tx/".into(),
        }
    }

    async fn attempt(mock: &MockChainClient) -> ChainResult<AttemptOutcome> {
        let account = mock.derive_identity(&AccountKey::new(KEY))?;
        disburse(mock, &settings(), &account).await
    }

    fn disconnects(mock: &MockChainClient) -> usize {
        mock.events()
            .iter()
            .filter(|e| matches!(e, MockEvent::Disconnect { .. }))
            .count()
    }

    #[tokio::test]
    async fn test_sends_balance_minus_fee() {
        let mock = MockChainClient::new();
        mock.set_balance(KEY, 1_005_000);

        let outcome = attempt(&mock).await.unwrap();
        assert_eq!(outcome, AttemptOutcome::Sent(TxHash("0xmock0001".into())));

        let sent = mock.sent_transfers();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, MockChainClient::address_for(KEY));
        assert_eq!(sent[0].to, RECIPIENT);
        assert_eq!(sent[0].send_amount, 1_000_000);
        assert_eq!(sent[0].fee.flat_fee, 5000);
        assert_eq!(sent[0].fee.gas_limit, 200_000);
        assert_eq!(mock.balance_of(KEY), 0);
        assert_eq!(disconnects(&mock), 1);
    }

    #[tokio::test]
    async fn test_balance_equal_to_fee_is_skipped() {
        let mock = MockChainClient::new();
        mock.set_balance(KEY, 5000);

        let outcome = attempt(&mock).await.unwrap();
        assert_eq!(outcome, AttemptOutcome::Skipped(SkipReason::BalanceTooSmall));
        assert!(mock.sent_transfers().is_empty());
        assert_eq!(disconnects(&mock), 1);
    }

    #[tokio::test]
    async fn test_disconnects_after_balance_failure() {
        let mock = MockChainClient::new();
        mock.set_balance(KEY, 1_005_000);
        mock.rate_limit(KEY, 1);

        let err = attempt(&mock).await.unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(disconnects(&mock), 1);
    }

    #[tokio::test]
    async fn test_disconnects_after_rejected_broadcast() {
        let mock = MockChainClient::new();
        mock.set_balance(KEY, 1_005_000);
        mock.fail_next(
            KEY,
            MockOp::Send,
            ChainError::BroadcastRejected("account sequence mismatch".into()),
        );

        let err = attempt(&mock).await.unwrap_err();
        assert_eq!(
            err,
            ChainError::BroadcastRejected("account sequence mismatch".into())
        );
        assert!(mock.sent_transfers().is_empty());
        assert_eq!(mock.balance_of(KEY), 1_005_000);
        assert_eq!(disconnects(&mock), 1);
    }

    #[tokio::test]
    async fn test_failed_connect_has_nothing_to_release() {
        let mock = MockChainClient::new();
        mock.fail_next(
            KEY,
            MockOp::Connect,
            ChainError::Connection {
                message: "refused".into(),
                rate_limited: false,
            },
        );

        let err = attempt(&mock).await.unwrap_err();
        assert!(matches!(err, ChainError::Connection { .. }));
        assert_eq!(disconnects(&mock), 0);
    }

    #[test]
    fn test_explorer_url() {
        assert_eq!(
            settings().explorer_url("ABC123"),
            "https://zigscan.org/tx/ABC123"
        );
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = SweeperConfig::default();
        config.transfer.recipient = " 0xabc ".into();
        config.fee.gas_price = "0.025".into();
        config.fee.gas_limit = 200_000;

        let settings = DisburseSettings::from_config(&config).unwrap();
        assert_eq!(settings.recipient, "0xabc");
        assert_eq!(settings.fee.flat_fee, 5000);

        config.fee.gas_price = "cheap".into();
        assert!(DisburseSettings::from_config(&config).is_err());
    }
}
