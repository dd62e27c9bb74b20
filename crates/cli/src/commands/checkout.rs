//! Checkout command.
//!
//! Pays through the in-process simulated gateway; the cart is cleared only
//! after the gateway confirms.

use sanekey_cart::{CartConfig, Checkout, CurrentUser, SimulatedGateway, StaticSession};
use sanekey_core::PaymentMethod;
use tracing::info;

use super::cart;

/// Check out the local cart as `user`.
///
/// # Errors
///
/// Returns an error if no user is given, the cart is empty, or the payment fails.
#[allow(clippy::print_stdout)]
pub async fn run(
    config: &CartConfig,
    user: Option<&str>,
    method: PaymentMethod,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = cart::open(config).await?;
    let session = user.map_or_else(StaticSession::anonymous, |id| {
        StaticSession::signed_in(CurrentUser::new(id))
    });
    let gateway = SimulatedGateway::approving();

    let receipt = Checkout::run(&mut cart, &session, &gateway, method).await?;
    cart::warn_unsaved(&cart);

    info!(payment_id = %receipt.payment_id, %method, "Payment confirmed");
    println!(
        "Payment {} confirmed: {} via {}",
        receipt.payment_id, receipt.amount, receipt.method
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config(dir: &std::path::Path) -> CartConfig {
        CartConfig {
            data_dir: dir.join("data"),
            catalog_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("catalog.yaml"),
            ..CartConfig::default()
        }
    }

    #[tokio::test]
    async fn test_checkout_requires_user() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        cart::add(&config, "men-1", 1).await.unwrap();

        let err = run(&config, None, PaymentMethod::Stripe).await.unwrap_err();
        assert!(err.to_string().contains("sign in"));
        assert!(!cart::open(&config).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_clears_persisted_cart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        cart::add(&config, "men-1", 1).await.unwrap();

        run(&config, Some("u-1"), PaymentMethod::Paypal).await.unwrap();
        assert!(cart::open(&config).await.unwrap().is_empty());
    }
}
