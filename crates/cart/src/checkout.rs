//! Checkout orchestration.
//!
//! Checkout reads the cart snapshot, asks the payment provider to create and
//! then confirm a payment for its total, and clears the cart only once the
//! provider reports success. Provider wire protocols live behind
//! [`PaymentGateway`].

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use sanekey_core::{PaymentId, PaymentMethod, PaymentStatus, Price, UserId};

use crate::catalog::ProductCatalog;
use crate::error::CheckoutError;
use crate::session::UserSession;
use crate::storage::Storage;
use crate::store::CartStore;

/// Errors reported by a payment provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The provider refused the payment.
    #[error("payment declined: {0}")]
    Declined(String),

    /// The provider could not be reached or answered garbage.
    #[error("payment provider unavailable: {0}")]
    Unavailable(String),
}

/// What checkout asks the provider to charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Price,
    pub description: String,
    pub method: PaymentMethod,
    pub user_id: UserId,
}

/// A created, not yet confirmed, payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub id: PaymentId,
    pub method: PaymentMethod,
    pub amount: Price,
    pub status: PaymentStatus,
}

/// Provider's answer to a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub payment_id: PaymentId,
    pub amount: Price,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub confirmed_at: DateTime<Utc>,
}

/// External payment provider.
pub trait PaymentGateway {
    /// Create a payment for `request`.
    fn create_payment(
        &self,
        request: &PaymentRequest,
    ) -> impl Future<Output = Result<PaymentIntent, GatewayError>> + Send;

    /// Confirm a previously created payment.
    fn confirm_payment(
        &self,
        intent: &PaymentIntent,
    ) -> impl Future<Output = Result<PaymentReceipt, GatewayError>> + Send;
}

/// Checkout flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checkout;

impl Checkout {
    /// Charge the cart total and clear the cart on confirmed success.
    ///
    /// The cart is left untouched on any failure.
    ///
    /// # Errors
    ///
    /// - `NotSignedIn` if the session has no user
    /// - `EmptyCart` if there is nothing to pay for
    /// - `Payment` if the provider fails to create or confirm
    /// - `NotConfirmed` if confirmation comes back without success
    #[instrument(skip(cart, session, gateway))]
    pub async fn run<S, C>(
        cart: &mut CartStore<S, C>,
        session: &impl UserSession,
        gateway: &impl PaymentGateway,
        method: PaymentMethod,
    ) -> Result<PaymentReceipt, CheckoutError>
    where
        S: Storage,
        C: ProductCatalog,
    {
        let user = session.current_user().ok_or(CheckoutError::NotSignedIn)?;

        let snapshot = cart.snapshot();
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let request = PaymentRequest {
            amount: snapshot.total,
            description: format!("Purchase of {} items", snapshot.items.len()),
            method,
            user_id: user.id,
        };

        let intent = gateway.create_payment(&request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Payment creation failed");
        })?;
        tracing::info!(payment_id = %intent.id, amount = %intent.amount, "Payment created");

        let receipt = gateway.confirm_payment(&intent).await.inspect_err(|e| {
            tracing::warn!(payment_id = %intent.id, error = %e, "Payment confirmation failed");
        })?;

        if receipt.status != PaymentStatus::Succeeded {
            tracing::warn!(payment_id = %receipt.payment_id, status = ?receipt.status, "Payment not confirmed");
            return Err(CheckoutError::NotConfirmed(receipt.status));
        }

        cart.clear_cart();
        tracing::info!(payment_id = %receipt.payment_id, "Checkout complete, cart cleared");
        Ok(receipt)
    }
}

// =============================================================================
// Simulated provider
// =============================================================================

/// Step at which a [`SimulatedGateway`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Create,
    Confirm,
    /// Confirmation returns a receipt with `Failed` status.
    Decline,
}

/// Calls seen by a [`SimulatedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Create(PaymentRequest),
    Confirm(PaymentId),
}

/// In-process provider that approves everything unless told otherwise.
#[derive(Debug, Default)]
pub struct SimulatedGateway {
    fail_at: Option<FailAt>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl SimulatedGateway {
    /// A gateway that approves every payment.
    #[must_use]
    pub fn approving() -> Self {
        Self::default()
    }

    /// A gateway that fails at `step`.
    #[must_use]
    pub fn failing_at(step: FailAt) -> Self {
        Self {
            fail_at: Some(step),
            calls: Mutex::default(),
        }
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: GatewayCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl PaymentGateway for SimulatedGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentIntent, GatewayError> {
        self.record(GatewayCall::Create(request.clone()));
        if self.fail_at == Some(FailAt::Create) {
            return Err(GatewayError::Unavailable("simulated outage".to_string()));
        }
        Ok(PaymentIntent {
            id: PaymentId::generate(),
            method: request.method,
            amount: request.amount,
            status: PaymentStatus::Pending,
        })
    }

    async fn confirm_payment(&self, intent: &PaymentIntent) -> Result<PaymentReceipt, GatewayError> {
        self.record(GatewayCall::Confirm(intent.id));
        let status = match self.fail_at {
            Some(FailAt::Confirm) => {
                return Err(GatewayError::Declined("card declined".to_string()));
            }
            Some(FailAt::Decline) => PaymentStatus::Failed,
            _ => PaymentStatus::Succeeded,
        };
        Ok(PaymentReceipt {
            payment_id: intent.id,
            amount: intent.amount,
            method: intent.method,
            status,
            confirmed_at: Utc::now(),
        })
    }
}
