//! Sale notification delivery over an SMS gateway.
//!
//! Uses `reqwest` for the gateway call. Delivery is best-effort: callers log
//! failures and never let them affect the posted sale.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

use crate::config::NotificationConfig;

/// Notification errors.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// No recipient to send to.
    #[error("No recipients for notification")]
    NoRecipients,
    /// Failed to build the HTTP client.
    #[error("Failed to build notification client: {0}")]
    ClientError(String),
    /// Gateway request failed or returned a non-success status.
    #[error("Failed to send notification: {0}")]
    SendError(String),
}

/// A completed sale to announce to the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleNotice {
    /// Customer contact number, if one was captured.
    pub customer_contact: Option<String>,
    /// Amount charged after discount.
    pub amount: Decimal,
}

/// Sends the post-sale message.
#[async_trait]
pub trait SaleNotifier: Send + Sync {
    /// Delivers the notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be delivered.
    async fn notify_sale(&self, notice: &SaleNotice) -> Result<(), NotificationError>;
}

/// Notifier that drops every message. Used when notifications are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl SaleNotifier for NoopNotifier {
    async fn notify_sale(&self, _notice: &SaleNotice) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// SMS gateway notifier.
#[derive(Debug, Clone)]
pub struct SmsNotifier {
    config: NotificationConfig,
    client: reqwest::Client,
}

impl SmsNotifier {
    /// Creates a new SMS notifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: NotificationConfig) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotificationError::ClientError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Builds the message text for a sale amount.
    #[must_use]
    pub fn message(&self, amount: Decimal) -> String {
        sale_message(&self.config.currency_label, amount)
    }

    /// Recipient list: the customer first, then the configured copies.
    #[must_use]
    pub fn recipients(&self, customer_contact: Option<&str>) -> Vec<String> {
        customer_contact
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string)
            .into_iter()
            .chain(self.config.copy_to.iter().cloned())
            .collect()
    }
}

#[async_trait]
impl SaleNotifier for SmsNotifier {
    async fn notify_sale(&self, notice: &SaleNotice) -> Result<(), NotificationError> {
        let recipients = self.recipients(notice.customer_contact.as_deref());
        if recipients.is_empty() {
            return Err(NotificationError::NoRecipients);
        }

        let destination = recipients.join(",");
        let message = self.message(notice.amount);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("destination", destination.as_str()),
                ("q", self.config.api_key.as_str()),
                ("message", message.as_str()),
            ])
            .send()
            .await
            .map_err(|e| NotificationError::SendError(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| NotificationError::SendError(e.to_string()))?;

        tracing::debug!(recipients = recipients.len(), "sale notification sent");
        Ok(())
    }
}

/// Builds the thank-you text. The amount is truncated to whole units.
#[must_use]
pub fn sale_message(currency_label: &str, amount: Decimal) -> String {
    let whole = amount.trunc().to_i64().unwrap_or_default();
    format!(
        "Dear Customer, Thank you for your purchase of {currency_label} {}. We look forward to serving you again",
        with_thousands_separator(whole)
    )
}

/// Formats an integer with comma thousands separators.
#[must_use]
pub fn with_thousands_separator(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn config(copy_to: Vec<&str>) -> NotificationConfig {
        NotificationConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:9/send".to_string(),
            api_key: "key".to_string(),
            copy_to: copy_to.into_iter().map(String::from).collect(),
            ..NotificationConfig::default()
        }
    }

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(1_234_567, "1,234,567")]
    #[case(-45_000, "-45,000")]
    fn test_thousands_separator(#[case] value: i64, #[case] expected: &str) {
        assert_eq!(with_thousands_separator(value), expected);
    }

    #[test]
    fn test_sale_message_truncates() {
        assert_eq!(
            sale_message("LKR", dec!(12345.99)),
            "Dear Customer, Thank you for your purchase of LKR 12,345. We look forward to serving you again"
        );
    }

    #[test]
    fn test_recipients_customer_first() {
        let notifier = SmsNotifier::new(config(vec!["0711111111", "0722222222"])).unwrap();
        assert_eq!(
            notifier.recipients(Some(" 0770000000 ")),
            vec!["0770000000", "0711111111", "0722222222"]
        );
        assert_eq!(notifier.recipients(Some("")), vec!["0711111111", "0722222222"]);
    }

    #[tokio::test]
    async fn test_no_recipients_rejected() {
        let notifier = SmsNotifier::new(config(vec![])).unwrap();
        let notice = SaleNotice {
            customer_contact: None,
            amount: dec!(10),
        };
        assert!(matches!(
            notifier.notify_sale(&notice).await,
            Err(NotificationError::NoRecipients)
        ));
    }

    #[tokio::test]
    async fn test_noop_always_succeeds() {
        let notice = SaleNotice {
            customer_contact: Some("0770000000".into()),
            amount: dec!(10),
        };
        assert!(NoopNotifier.notify_sale(&notice).await.is_ok());
    }
}
