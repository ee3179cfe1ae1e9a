//! Payment gateway client.
//!
//! Talks to the external payment provider's charge endpoint. A checkout
//! attempt always resolves to exactly one of three outcomes: completed,
//! cancelled by the shopper, or failed. Callers branch on the outcome
//! rather than inferring it from side channels.

use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PaymentConfig;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("Gateway error: {status} - {message}")]
    Gateway { status: u16, message: String },

    /// Failed to parse the gateway response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// The resolved result of a checkout attempt.
///
/// Every attempt ends in exactly one of these. `Cancelled` is a normal
/// outcome, not an error; the cart is left untouched so the shopper can
/// retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Payment was captured.
    Completed {
        /// Provider-side reference for the captured charge.
        provider_reference: String,
    },
    /// The shopper backed out before paying.
    Cancelled,
    /// The provider declined or errored.
    Failed {
        /// Provider-supplied reason, when one was given.
        reason: String,
    },
}

/// A charge request sent to the gateway.
#[derive(Debug, Serialize)]
struct ChargeRequest<'a> {
    amount: Decimal,
    currency: &'a str,
    reference: &'a str,
    customer_email: &'a str,
}

/// The gateway's charge response.
#[derive(Debug, Deserialize)]
struct ChargeResponse {
    status: String,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Payment gateway client.
#[derive(Clone)]
pub struct PaymentClient {
    client: reqwest::Client,
    gateway_url: String,
}

impl PaymentClient {
    /// Create a new payment gateway client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| PaymentError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            gateway_url: config.gateway_url.clone(),
        })
    }

    /// Submit a charge and await its resolution.
    ///
    /// `reference` is our side's idempotency handle for the attempt (the
    /// shopper's user id plus a cart snapshot works fine).
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` only when the gateway could not be reached or
    /// answered with something unintelligible. A declined charge is NOT an
    /// error; it resolves to `CheckoutOutcome::Failed`.
    pub async fn charge(
        &self,
        amount: Decimal,
        currency: &str,
        reference: &str,
        customer_email: &str,
    ) -> Result<CheckoutOutcome, PaymentError> {
        let body = ChargeRequest {
            amount,
            currency,
            reference,
            customer_email,
        };

        let response = self
            .client
            .post(&self.gateway_url)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        let charge: ChargeResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        Ok(resolve_outcome(charge))
    }
}

/// Map the gateway's status string onto the three-way outcome.
///
/// Anything we don't recognize is treated as a failure rather than a
/// success; the shopper can retry and nothing was cleared on our side.
fn resolve_outcome(charge: ChargeResponse) -> CheckoutOutcome {
    match charge.status.as_str() {
        "completed" | "succeeded" => CheckoutOutcome::Completed {
            provider_reference: charge.reference.unwrap_or_default(),
        },
        "cancelled" | "canceled" => CheckoutOutcome::Cancelled,
        _ => CheckoutOutcome::Failed {
            reason: charge
                .reason
                .unwrap_or_else(|| format!("gateway returned status '{}'", charge.status)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: &str, reference: Option<&str>, reason: Option<&str>) -> ChargeResponse {
        ChargeResponse {
            status: status.to_string(),
            reference: reference.map(String::from),
            reason: reason.map(String::from),
        }
    }

    #[test]
    fn test_completed_carries_provider_reference() {
        let outcome = resolve_outcome(response("completed", Some("ch_123"), None));
        assert_eq!(
            outcome,
            CheckoutOutcome::Completed {
                provider_reference: "ch_123".to_string()
            }
        );
    }

    #[test]
    fn test_cancelled_both_spellings() {
        assert_eq!(
            resolve_outcome(response("cancelled", None, None)),
            CheckoutOutcome::Cancelled
        );
        assert_eq!(
            resolve_outcome(response("canceled", None, None)),
            CheckoutOutcome::Cancelled
        );
    }

    #[test]
    fn test_declined_is_failed_with_reason() {
        let outcome = resolve_outcome(response("declined", None, Some("insufficient funds")));
        assert_eq!(
            outcome,
            CheckoutOutcome::Failed {
                reason: "insufficient funds".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_status_is_failed_not_completed() {
        let outcome = resolve_outcome(response("pending_maybe", None, None));
        assert!(matches!(outcome, CheckoutOutcome::Failed { .. }));
    }
}
