//! # メール送信
//!
//! お問い合わせメールの送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailSender` trait でメール送信を抽象化
//! - **4 つの実装**: SMTP、SES（本番用）、Noop（開発用）、Unconfigured（未設定）
//! - **環境変数切替**: `MAIL_BACKEND` でランタイム選択。必要な設定が欠けている場合は
//!   Unconfigured にフォールバックし、リクエスト時に 503 として報告される

mod noop;
mod ses;
mod smtp;
mod unconfigured;

use std::sync::Arc;

use async_trait::async_trait;
use contact_domain::mail::{DeliveryError, OutboundEmail, SendReceipt};
pub use noop::NoopMailSender;
pub use ses::SesMailSender;
pub use smtp::{SmtpMailSender, SmtpSettings, SmtpTls};
pub use unconfigured::UnconfiguredMailSender;

/// メール送信トレイト
///
/// 送信は 1 リクエストにつき 1 回だけ呼ばれ、リトライは行わない。
#[async_trait]
pub trait MailSender: Send + Sync {
    /// 送信可能な状態かどうか
    ///
    /// `false` の場合、呼び出し元は送信を試みずに設定不備として扱う。
    fn is_configured(&self) -> bool {
        true
    }

    /// メールを送信する
    async fn send_email(&self, email: &OutboundEmail) -> Result<SendReceipt, DeliveryError>;
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MailBackend {
    Smtp,
    Ses,
    Noop,
}

/// メール送信の設定
#[derive(Debug, Clone, Default)]
pub struct MailSettings {
    /// 送信バックエンド（未設定なら Unconfigured）
    pub backend:      Option<MailBackend>,
    /// 送信元メールアドレス
    pub from_address: Option<String>,
    /// SMTP 設定（backend=smtp の場合に使用）
    pub smtp:         Option<SmtpSettings>,
}

/// 設定から送信実装を組み立てる
///
/// 必要な設定が欠けている場合は警告を出し、[`UnconfiguredMailSender`] を返す。
pub async fn build_mail_sender(settings: &MailSettings) -> Arc<dyn MailSender> {
    let Some(backend) = settings.backend else {
        tracing::warn!("MAIL_BACKEND が設定されていません。メール送信は無効です");
        return Arc::new(UnconfiguredMailSender);
    };

    match backend {
        MailBackend::Noop => Arc::new(NoopMailSender),
        MailBackend::Smtp => {
            let (Some(smtp), Some(from_address)) = (&settings.smtp, &settings.from_address) else {
                tracing::warn!("SMTP_HOST または MAIL_FROM_ADDRESS が未設定です。メール送信は無効です");
                return Arc::new(UnconfiguredMailSender);
            };
            match SmtpMailSender::new(smtp, from_address.clone()) {
                Ok(sender) => Arc::new(sender),
                Err(e) => {
                    tracing::warn!(error = %e, "SMTP 送信の初期化に失敗しました。メール送信は無効です");
                    Arc::new(UnconfiguredMailSender)
                }
            }
        }
        MailBackend::Ses => {
            let Some(from_address) = &settings.from_address else {
                tracing::warn!("MAIL_FROM_ADDRESS が未設定です。メール送信は無効です");
                return Arc::new(UnconfiguredMailSender);
            };
            Arc::new(SesMailSender::from_env(from_address.clone()).await)
        }
    }
}
