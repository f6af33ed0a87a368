//! In-memory chain adapter for tests and dry runs without a node.
//!
//! Keys made of hex digits map to the address `addr-<key>`. Balances are
//! preloaded per key; failures are scripted per key and operation and are
//! consumed in FIFO order. Every call is recorded as a [`MockEvent`].
//!
//! Lock errors (poisoned mutex) surface as `ChainError::Rpc` without panicking.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::blockchain::adapter::{ChainAdapter, ChainSession};
use crate::blockchain::types::{
    Account, AccountKey, Balance, ChainError, ChainResult, RpcErrorKind, TxHash,
};
use crate::disburse::types::TransferPlan;

/// Chain operation a scripted failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    Connect,
    Balance,
    Send,
}

/// A call observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Connect { address: String, at: Instant },
    Balance { address: String },
    Send { plan: TransferPlan },
    Disconnect { address: String },
}

#[derive(Default)]
struct MockState {
    balances: HashMap<String, u128>,
    failures: HashMap<(String, MockOp), VecDeque<ChainError>>,
    events: Vec<MockEvent>,
    sent: u64,
}

/// Scripted chain adapter.
#[derive(Clone, Default)]
pub struct MockChainClient {
    state: Arc<Mutex<MockState>>,
}

impl MockChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the mock derives for `key`.
    pub fn address_for(key: &str) -> String {
        format!("addr-{}", key.trim().to_lowercase())
    }

    /// Preload the balance held by `key`'s address.
    pub fn set_balance(&self, key: &str, amount: u128) {
        if let Ok(mut state) = self.state.lock() {
            state.balances.insert(Self::address_for(key), amount);
        }
    }

    /// Fail the next `op` for `key` with `error`.
    pub fn fail_next(&self, key: &str, op: MockOp, error: ChainError) {
        if let Ok(mut state) = self.state.lock() {
            state
                .failures
                .entry((Self::address_for(key), op))
                .or_default()
                .push_back(error);
        }
    }

    /// Fail the next `count` balance queries for `key` with HTTP 429.
    pub fn rate_limit(&self, key: &str, count: usize) {
        for _ in 0..count {
            self.fail_next(
                key,
                MockOp::Balance,
                ChainError::rpc(RpcErrorKind::RateLimited, "HTTP 429 Too Many Requests"),
            );
        }
    }

    /// Current balance of `key`'s address.
    pub fn balance_of(&self, key: &str) -> u128 {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.balances.get(&Self::address_for(key)).copied())
            .unwrap_or(0)
    }

    pub fn events(&self) -> Vec<MockEvent> {
        self.state
            .lock()
            .map(|state| state.events.clone())
            .unwrap_or_default()
    }

    /// Transfers broadcast so far, in order.
    pub fn sent_transfers(&self) -> Vec<TransferPlan> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MockEvent::Send { plan } => Some(plan),
                _ => None,
            })
            .collect()
    }

    /// Addresses in the order sessions were opened.
    pub fn connect_order(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MockEvent::Connect { address, .. } => Some(address),
                _ => None,
            })
            .collect()
    }

    /// Times at which sessions for `key` were opened.
    pub fn connect_times(&self, key: &str) -> Vec<Instant> {
        let wanted = Self::address_for(key);
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MockEvent::Connect { address, at } if address == wanted => Some(at),
                _ => None,
            })
            .collect()
    }

    fn lock(state: &Mutex<MockState>) -> ChainResult<MutexGuard<'_, MockState>> {
        state
            .lock()
            .map_err(|e| ChainError::rpc(RpcErrorKind::Other, format!("mutex poisoned: {}", e)))
    }
}

impl MockState {
    fn take_failure(&mut self, address: &str, op: MockOp) -> Option<ChainError> {
        self.failures
            .get_mut(&(address.to_string(), op))
            .and_then(VecDeque::pop_front)
    }
}

#[async_trait]
impl ChainAdapter for MockChainClient {
    type Session = MockSession;

    fn derive_identity(&self, key: &AccountKey) -> ChainResult<Account> {
        let raw = key.expose_secret().trim();
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChainError::InvalidKey("key is not hex-encoded".to_string()));
        }
        Ok(Account {
            address: Self::address_for(raw),
            key: key.clone(),
        })
    }

    fn validate_address(&self, address: &str) -> ChainResult<()> {
        if address.trim().is_empty() {
            return Err(ChainError::InvalidAddress {
                address: address.to_string(),
                reason: "empty".to_string(),
            });
        }
        Ok(())
    }

    async fn connect(&self, account: &Account) -> ChainResult<MockSession> {
        let mut state = Self::lock(&self.state)?;
        state.events.push(MockEvent::Connect {
            address: account.address.clone(),
            at: Instant::now(),
        });
        if let Some(err) = state.take_failure(&account.address, MockOp::Connect) {
            return Err(err);
        }
        Ok(MockSession {
            state: Arc::clone(&self.state),
            address: account.address.clone(),
        })
    }
}

/// Session handed out by [`MockChainClient`].
pub struct MockSession {
    state: Arc<Mutex<MockState>>,
    address: String,
}

#[async_trait]
impl ChainSession for MockSession {
    async fn get_balance(&self, address: &str, denom: &str) -> ChainResult<Balance> {
        let mut state = MockChainClient::lock(&self.state)?;
        state.events.push(MockEvent::Balance {
            address: address.to_string(),
        });
        if let Some(err) = state.take_failure(address, MockOp::Balance) {
            return Err(err);
        }
        Ok(Balance {
            amount: state.balances.get(address).copied().unwrap_or(0),
            denom: denom.to_string(),
        })
    }

    async fn send_tokens(&self, plan: &TransferPlan) -> ChainResult<TxHash> {
        let mut state = MockChainClient::lock(&self.state)?;
        if let Some(err) = state.take_failure(&plan.from, MockOp::Send) {
            return Err(err);
        }
        state.events.push(MockEvent::Send { plan: plan.clone() });

        let spent = plan.send_amount + plan.fee.flat_fee;
        let from_balance = state.balances.entry(plan.from.clone()).or_insert(0);
        *from_balance = from_balance.saturating_sub(spent);
        let to_balance = state.balances.entry(plan.to.clone()).or_insert(0);
        *to_balance = to_balance.saturating_add(plan.send_amount);

        state.sent += 1;
        Ok(TxHash(format!("0xmock{:04}", state.sent)))
    }

    async fn disconnect(self) -> ChainResult<()> {
        let mut state = MockChainClient::lock(&self.state)?;
        state.events.push(MockEvent::Disconnect {
            address: self.address.clone(),
        });
        Ok(())
    }
}
