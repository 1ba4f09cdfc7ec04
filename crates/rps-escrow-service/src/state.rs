//! Application state management.

use crate::config::ServiceConfig;
use rps_escrow_core::{Clock, Escrow, ManualClock, SystemClock};
use rps_token::{Address, MockTokenClient, RpcTokenClient, TokenClient};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    escrow: Arc<Escrow>,
    /// Set when running on simulated time (for timeout testing)
    clock: Option<Arc<ManualClock>>,
    /// In-memory token ledger, present when no token node is configured
    faucet: Option<MockTokenClient>,
}

impl AppState {
    pub fn new(escrow: Arc<Escrow>) -> Self {
        Self {
            escrow,
            clock: None,
            faucet: None,
        }
    }

    /// Fully in-memory state: mock tokens, faucet and simulated clock
    pub fn in_memory(start: u64) -> Self {
        let token = MockTokenClient::new(Address::random());
        let clock = Arc::new(ManualClock::new(start));
        let escrow = Arc::new(Escrow::new(Arc::new(token.clone()), clock.clone()));
        Self::new(escrow)
            .with_simulated_clock(clock)
            .with_faucet(token)
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        let custody = config.custody.unwrap_or_else(Address::random);

        let (token, faucet) = match &config.token_rpc_url {
            Some(url) => {
                tracing::info!(%url, %custody, "settling against token node");
                let rpc: Arc<dyn TokenClient> = Arc::new(RpcTokenClient::new(url.clone(), custody));
                (rpc, None)
            }
            None => {
                tracing::info!(%custody, "token node not configured, using in-memory tokens (set TOKEN_RPC_URL to enable)");
                let mock = MockTokenClient::new(custody);
                let shared: Arc<dyn TokenClient> = Arc::new(mock.clone());
                (shared, Some(mock))
            }
        };

        let manual = config.simulated_clock.then(|| {
            tracing::info!("simulated clock enabled, advance it with /api/system/tick");
            Arc::new(ManualClock::starting_now())
        });
        let clock: Arc<dyn Clock> = match &manual {
            Some(manual) => manual.clone(),
            None => Arc::new(SystemClock::new()),
        };

        Self {
            escrow: Arc::new(Escrow::new(token, clock)),
            clock: manual,
            faucet,
        }
    }

    pub fn with_simulated_clock(mut self, clock: Arc<ManualClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_faucet(mut self, token: MockTokenClient) -> Self {
        self.faucet = Some(token);
        self
    }

    pub fn escrow(&self) -> &Escrow {
        &self.escrow
    }

    /// The in-memory token ledger, if tokens are simulated
    pub fn faucet(&self) -> Option<&MockTokenClient> {
        self.faucet.as_ref()
    }

    /// Advance simulated time by seconds. `None` on wall-clock time.
    pub fn advance_time(&self, seconds: u64) -> Option<u64> {
        self.clock.as_ref().map(|clock| clock.advance(seconds))
    }
}
