//! # Checkout Flow
//!
//! Turns the current cart into exactly one order sink call.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            submit()                 sink Ok                             │
//! │   ┌──────┐ ───────► ┌────────────┐ ───────► ┌─────────────┐            │
//! │   │ Idle │          │ Submitting │          │  Succeeded  │──┐         │
//! │   └──────┘          └────────────┘          └─────────────┘  │         │
//! │      ▲  │               │    ▲                               │         │
//! │      │  │ empty cart    │    └── submit() while here:        │         │
//! │      │  │               │        AlreadySubmitting,          │         │
//! │      │  ▼   sink Err /  ▼        state untouched             │         │
//! │      │ ┌─────────────────────┐                               │         │
//! │      │ │ Failed(CheckoutErr) │                               │         │
//! │      │ └─────────────────────┘                               │         │
//! │      │          │                                            │         │
//! │      └──────────┴──── acknowledge() ◄────────────────────────┘         │
//! │                                                                         │
//! │  submit() from Succeeded/Failed starts a fresh cycle directly.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Side Effects
//! - Success: the cart is cleared BEFORE `Succeeded` is published.
//! - Failure: the cart is untouched, so the user can simply retry.
//! - No automatic retry. One sink call per `submit()`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use morsel_core::{OrderSnapshot, TaxRate};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::StorefrontConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::sink::OrderSink;
use crate::store::CartStore;

/// Observable phase of the checkout flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        order_id: String,
    },
    Failed(CheckoutError),
}

impl CheckoutState {
    /// True for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Succeeded { .. } | CheckoutState::Failed(_))
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, CheckoutState::Submitting)
    }
}

/// Order submission orchestrator.
///
/// Cheap to clone; clones share the same state, so a second tap on
/// "Place order" from anywhere in the UI hits the same guard.
#[derive(Clone)]
pub struct CheckoutFlow {
    cart: CartStore,
    sink: Arc<dyn OrderSink>,
    tax_rate: TaxRate,
    sink_timeout: Option<Duration>,
    state: Arc<watch::Sender<CheckoutState>>,
}

impl CheckoutFlow {
    /// Creates an idle flow with no bound on the sink call.
    pub fn new(cart: CartStore, sink: Arc<dyn OrderSink>, tax_rate: TaxRate) -> Self {
        let (tx, _) = watch::channel(CheckoutState::Idle);
        CheckoutFlow {
            cart,
            sink,
            tax_rate,
            sink_timeout: None,
            state: Arc::new(tx),
        }
    }

    /// Creates a flow using the configured tax rate and sink timeout.
    pub fn from_config(cart: CartStore, sink: Arc<dyn OrderSink>, config: &StorefrontConfig) -> Self {
        let flow = Self::new(cart, sink, config.tax_rate());
        match config.sink_timeout() {
            Some(limit) => flow.with_sink_timeout(limit),
            None => flow,
        }
    }

    /// Fails a submission whose sink call takes longer than `limit`.
    pub fn with_sink_timeout(mut self, limit: Duration) -> Self {
        self.sink_timeout = Some(limit);
        self
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Current phase.
    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    /// Subscribes to phase changes.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    /// Collapses `Succeeded`/`Failed` back to `Idle` once the UI has shown it.
    ///
    /// Returns false if there was nothing to acknowledge.
    pub fn acknowledge(&self) -> bool {
        self.state.send_if_modified(|state| {
            if !state.is_terminal() {
                return false;
            }
            *state = CheckoutState::Idle;
            true
        })
    }

    /// Submits the current cart as one order.
    ///
    /// ## Errors
    /// - [`CheckoutError::AlreadySubmitting`]: another submission is in
    ///   flight; nothing else happens
    /// - [`CheckoutError::EmptyCart`]: no lines; the sink is not called
    /// - [`CheckoutError::Sink`]: the sink's own message, cart preserved
    /// - [`CheckoutError::SinkTimeout`]: configured bound exceeded, cart preserved
    pub async fn submit(&self) -> CheckoutResult<OrderSnapshot> {
        let order = self.begin()?;
        let guard = InFlight { state: &self.state };

        info!(
            order_id = %order.id(),
            lines = order.lines().len(),
            subtotal = %order.subtotal(),
            tax = %order.tax(),
            total = %order.total(),
            "Submitting order"
        );

        let outcome = self.call_sink(&order).await;
        guard.settle();

        match outcome {
            Ok(()) => {
                self.cart.clear();
                self.state.send_replace(CheckoutState::Succeeded {
                    order_id: order.id().to_string(),
                });
                info!(order_id = %order.id(), "Order placed");
                Ok(order)
            }
            Err(e) => {
                warn!(order_id = %order.id(), error = %e, "Order submission failed");
                self.state.send_replace(CheckoutState::Failed(e.clone()));
                Err(e)
            }
        }
    }

    /// The entry guard: one atomic step on the state channel.
    ///
    /// Rejects while `Submitting`; otherwise snapshots the cart and moves
    /// to `Submitting`, or straight to `Failed(EmptyCart)`.
    fn begin(&self) -> CheckoutResult<OrderSnapshot> {
        let mut outcome = Err(CheckoutError::AlreadySubmitting);

        self.state.send_if_modified(|state| {
            if state.is_submitting() {
                return false;
            }

            let lines = self.cart.with_cart(|cart| cart.lines().to_vec());
            if lines.is_empty() {
                *state = CheckoutState::Failed(CheckoutError::EmptyCart);
                outcome = Err(CheckoutError::EmptyCart);
                return true;
            }

            *state = CheckoutState::Submitting;
            outcome = Ok(OrderSnapshot::new(lines, self.tax_rate, Utc::now()));
            true
        });

        if let Err(ref e) = outcome {
            warn!(error = %e, "Order submission rejected");
        }
        outcome
    }

    async fn call_sink(&self, order: &OrderSnapshot) -> CheckoutResult<()> {
        let call = self.sink.submit(order);

        match self.sink_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| CheckoutError::SinkTimeout(limit.as_secs()))?
                .map_err(CheckoutError::from),
            None => call.await.map_err(CheckoutError::from),
        }
    }
}

impl std::fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("tax_rate", &self.tax_rate)
            .field("sink_timeout", &self.sink_timeout)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

/// Returns the flow to `Idle` if a `submit()` future is dropped mid-call.
struct InFlight<'a> {
    state: &'a watch::Sender<CheckoutState>,
}

impl InFlight<'_> {
    /// The submission reached a verdict; the caller publishes it.
    fn settle(self) {
        std::mem::forget(self);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        warn!("Order submission abandoned before the sink answered");
        self.state.send_if_modified(|state| {
            if !state.is_submitting() {
                return false;
            }
            *state = CheckoutState::Idle;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;
    use async_trait::async_trait;
    use morsel_core::MenuEntry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(id: &str, price_cents: i64) -> MenuEntry {
        MenuEntry {
            id: id.to_string(),
            name: format!("Dish {}", id),
            description: String::new(),
            price_cents,
            image_url: String::new(),
            category: None,
            is_available: Some(true),
        }
    }

    /// Counts calls and answers with a fixed result.
    #[derive(Default)]
    struct ScriptedSink {
        calls: AtomicUsize,
        fail_with: Option<String>,
    }

    impl ScriptedSink {
        fn failing(message: &str) -> Self {
            ScriptedSink {
                calls: AtomicUsize::new(0),
                fail_with: Some(message.to_string()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OrderSink for ScriptedSink {
        async fn submit(&self, _order: &OrderSnapshot) -> Result<(), SinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(message) => Err(SinkError::new(message.clone())),
                None => Ok(()),
            }
        }
    }

    /// Never answers.
    struct HungSink;

    #[async_trait]
    impl OrderSink for HungSink {
        async fn submit(&self, _order: &OrderSnapshot) -> Result<(), SinkError> {
            std::future::pending().await
        }
    }

    fn flow_with(sink: Arc<dyn OrderSink>) -> (CartStore, CheckoutFlow) {
        let cart = CartStore::new();
        let flow = CheckoutFlow::new(cart.clone(), sink, TaxRate::from_bps(800));
        (cart, flow)
    }

    #[tokio::test]
    async fn test_successful_submission_computes_totals_and_clears_cart() {
        let sink = Arc::new(ScriptedSink::default());
        let (cart, flow) = flow_with(sink.clone());
        let a = entry("a", 1000);
        cart.add(&a);
        cart.add(&a);

        let order = flow.submit().await.unwrap();

        assert_eq!(order.subtotal().cents(), 2000);
        assert_eq!(order.tax().cents(), 160);
        assert_eq!(order.total().cents(), 2160);
        assert_eq!(sink.calls(), 1);
        assert!(cart.snapshot().is_empty());
        assert_eq!(
            flow.state(),
            CheckoutState::Succeeded {
                order_id: order.id().to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_cart_never_calls_sink() {
        let sink = Arc::new(ScriptedSink::default());
        let (_cart, flow) = flow_with(sink.clone());

        let result = flow.submit().await;

        assert_eq!(result.unwrap_err(), CheckoutError::EmptyCart);
        assert_eq!(sink.calls(), 0);
        assert_eq!(flow.state(), CheckoutState::Failed(CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_sink_failure_preserves_cart_and_message() {
        let sink = Arc::new(ScriptedSink::failing("7 PERMISSION_DENIED: Missing or insufficient permissions."));
        let (cart, flow) = flow_with(sink.clone());
        cart.add(&entry("a", 1000));
        let before = cart.snapshot();

        let err = flow.submit().await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "7 PERMISSION_DENIED: Missing or insufficient permissions."
        );
        assert_eq!(cart.snapshot(), before);
        assert_eq!(sink.calls(), 1);
        assert!(matches!(flow.state(), CheckoutState::Failed(CheckoutError::Sink(_))));
    }

    #[tokio::test]
    async fn test_retry_after_failure_is_a_fresh_cycle() {
        let failing: Arc<dyn OrderSink> = Arc::new(ScriptedSink::failing("offline"));
        let cart = CartStore::new();
        cart.add(&entry("a", 500));

        let flow = CheckoutFlow::new(cart.clone(), failing, TaxRate::zero());
        assert!(flow.submit().await.is_err());

        let recovered = CheckoutFlow {
            sink: Arc::new(ScriptedSink::default()),
            ..flow.clone()
        };
        let order = recovered.submit().await.unwrap();

        assert_eq!(order.total().cents(), 500);
        assert!(cart.snapshot().is_empty());
        assert!(matches!(flow.state(), CheckoutState::Succeeded { .. }));
    }

    #[tokio::test]
    async fn test_acknowledge_collapses_terminal_states() {
        let (cart, flow) = flow_with(Arc::new(ScriptedSink::default()));
        assert!(!flow.acknowledge());

        cart.add(&entry("a", 100));
        flow.submit().await.unwrap();
        assert!(flow.state().is_terminal());

        assert!(flow.acknowledge());
        assert_eq!(flow.state(), CheckoutState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_timeout_fails_and_keeps_cart() {
        let (cart, flow) = flow_with(Arc::new(HungSink));
        let flow = flow.with_sink_timeout(Duration::from_secs(10));
        cart.add(&entry("a", 100));

        let err = flow.submit().await.unwrap_err();

        assert_eq!(err, CheckoutError::SinkTimeout(10));
        assert_eq!(cart.snapshot().len(), 1);
        assert_eq!(flow.state(), CheckoutState::Failed(CheckoutError::SinkTimeout(10)));
    }

    #[tokio::test]
    async fn test_dropped_submission_returns_to_idle() {
        let (cart, flow) = flow_with(Arc::new(HungSink));
        cart.add(&entry("a", 100));

        let abandoned = tokio::time::timeout(Duration::from_millis(20), flow.submit()).await;

        assert!(abandoned.is_err());
        assert_eq!(flow.state(), CheckoutState::Idle);
        assert_eq!(cart.snapshot().len(), 1);
    }

    #[test]
    fn test_from_config_applies_timeout() {
        let config = StorefrontConfig {
            sink_timeout_secs: Some(3),
            ..StorefrontConfig::default()
        };
        let flow = CheckoutFlow::from_config(CartStore::new(), Arc::new(HungSink), &config);

        assert_eq!(flow.sink_timeout, Some(Duration::from_secs(3)));
        assert_eq!(flow.tax_rate().bps(), 800);
    }
}
