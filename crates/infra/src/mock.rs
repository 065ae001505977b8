//! # テスト用モック
//!
//! ユースケース・ハンドラテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! contact-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use contact_domain::mail::{DeliveryError, OutboundEmail, SendReceipt};

use crate::{
    directory::{DirectoryError, TeamDirectory},
    mail::MailSender,
};

// ===== MockMailSender =====

#[derive(Clone, Default)]
enum MockMode {
    #[default]
    Accept,
    Fail(DeliveryError),
    Unconfigured,
}

/// 送信されたメールを記録するモック
///
/// `Clone` しても記録は共有される。
#[derive(Clone, Default)]
pub struct MockMailSender {
    sent:       Arc<Mutex<Vec<OutboundEmail>>>,
    mode:       MockMode,
    message_id: Option<String>,
}

impl MockMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信を常に失敗させる
    pub fn failing(error: DeliveryError) -> Self {
        Self {
            mode: MockMode::Fail(error),
            ..Self::default()
        }
    }

    /// 未設定として振る舞う
    pub fn unconfigured() -> Self {
        Self {
            mode: MockMode::Unconfigured,
            ..Self::default()
        }
    }

    /// 受理時に返す Message-ID を設定する
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// 送信を試みたメールの一覧
    pub fn sent_emails(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for MockMailSender {
    fn is_configured(&self) -> bool {
        !matches!(self.mode, MockMode::Unconfigured)
    }

    async fn send_email(&self, email: &OutboundEmail) -> Result<SendReceipt, DeliveryError> {
        self.sent.lock().unwrap().push(email.clone());
        match &self.mode {
            MockMode::Accept => Ok(SendReceipt {
                accepted:   email.to.clone(),
                message_id: self.message_id.clone(),
            }),
            MockMode::Fail(error) => Err(error.clone()),
            MockMode::Unconfigured => Err(DeliveryError::NotConfigured),
        }
    }
}

// ===== StubTeamDirectory =====

/// 固定のアドレスを返すチームディレクトリ
///
/// 呼び出し回数を記録する。
#[derive(Clone, Default)]
pub struct StubTeamDirectory {
    emails:  Vec<String>,
    failing: bool,
    calls:   Arc<AtomicUsize>,
}

impl StubTeamDirectory {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// 常にエラーを返す
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TeamDirectory for StubTeamDirectory {
    async fn member_emails(&self) -> Result<Vec<String>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(DirectoryError::Status(500));
        }
        Ok(self.emails.clone())
    }
}
