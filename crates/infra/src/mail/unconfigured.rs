//! 未設定時の送信実装

use async_trait::async_trait;
use contact_domain::mail::{DeliveryError, OutboundEmail, SendReceipt};

use super::MailSender;

/// 送信手段が設定されていないことを表す送信実装
///
/// [`is_configured`](MailSender::is_configured) は常に `false` を返す。
#[derive(Debug, Clone)]
pub struct UnconfiguredMailSender;

#[async_trait]
impl MailSender for UnconfiguredMailSender {
    fn is_configured(&self) -> bool {
        false
    }

    async fn send_email(&self, _email: &OutboundEmail) -> Result<SendReceipt, DeliveryError> {
        Err(DeliveryError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use contact_domain::mail::RenderedMessage;

    use super::*;

    #[tokio::test]
    async fn test_送信はnot_configuredエラーになる() {
        let sender = UnconfiguredMailSender;
        let email = OutboundEmail::new(vec![], RenderedMessage::default(), None);

        let result = sender.send_email(&email).await;

        assert!(!sender.is_configured());
        assert!(matches!(result, Err(DeliveryError::NotConfigured)));
    }
}
