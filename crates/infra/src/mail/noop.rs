//! Noop 送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! ローカル開発でフォームの疎通だけを確認したい場合に使用する。

use async_trait::async_trait;
use contact_domain::mail::{DeliveryError, OutboundEmail, SendReceipt};

use super::MailSender;

/// Noop 送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopMailSender;

#[async_trait]
impl MailSender for NoopMailSender {
    async fn send_email(&self, email: &OutboundEmail) -> Result<SendReceipt, DeliveryError> {
        tracing::info!(
            to = ?email.to,
            subject = %email.subject,
            "Noop: メール送信をスキップ"
        );
        Ok(SendReceipt {
            accepted:   email.to.clone(),
            message_id: None,
        })
    }
}
