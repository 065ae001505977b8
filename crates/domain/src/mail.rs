//! # 送信メール
//!
//! レンダリング結果、送信メール、送信結果、送信エラーを定義する。
//!
//! ## 設計方針
//!
//! - **送信手段に依存しない**: SMTP / SES などの差異はインフラ層の送信実装が吸収する
//! - **ステータスコードの保持**: 送信手段が HTTP ステータスを返した場合は
//!   [`DeliveryError::Rejected`] に保持し、呼び出し元がレスポンスに反映できるようにする

use thiserror::Error;

/// お問い合わせメールであることを示す固定ヘッダ名
pub const CONTACT_FORM_HEADER: &str = "X-Contact-Form";

/// [`CONTACT_FORM_HEADER`] の値
pub const CONTACT_FORM_HEADER_VALUE: &str = "website";

/// 送信失敗時のステータスコード（送信手段が妥当な値を返さなかった場合）
const FALLBACK_STATUS: u16 = 500;

/// レンダリング済みメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedMessage {
    /// 件名（固定プレフィックス付き）
    pub subject: String,
    /// プレーンテキスト本文
    pub text:    String,
    /// HTML 本文
    pub html:    String,
}

/// 追加ヘッダ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailHeader {
    pub name:  String,
    pub value: String,
}

impl MailHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name:  name.into(),
            value: value.into(),
        }
    }

    /// お問い合わせフォーム由来であることを示すヘッダ
    pub fn contact_form() -> Self {
        Self::new(CONTACT_FORM_HEADER, CONTACT_FORM_HEADER_VALUE)
    }
}

/// 送信メール
///
/// 送信手段（`MailSender`）に渡される完成済みのメール。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// 宛先メールアドレス
    pub to:        Vec<String>,
    /// 件名
    pub subject:   String,
    /// プレーンテキスト本文
    pub text_body: String,
    /// HTML 本文
    pub html_body: String,
    /// 返信先（送信者のアドレス）
    pub reply_to:  Option<String>,
    /// 追加ヘッダ
    pub headers:   Vec<MailHeader>,
}

impl OutboundEmail {
    /// レンダリング結果から送信メールを組み立てる
    pub fn new(to: Vec<String>, rendered: RenderedMessage, reply_to: Option<String>) -> Self {
        Self {
            to,
            subject: rendered.subject,
            text_body: rendered.text,
            html_body: rendered.html,
            reply_to,
            headers: vec![MailHeader::contact_form()],
        }
    }
}

/// 送信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// 送信手段が受け付けた宛先
    pub accepted:   Vec<String>,
    /// 送信手段が採番したメッセージ ID
    pub message_id: Option<String>,
}

/// メール送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// 送信手段が設定されていない
    #[error("メール送信が設定されていません")]
    NotConfigured,

    /// メッセージの組み立てに失敗（アドレス不正など）
    #[error("メッセージ構築に失敗: {0}")]
    InvalidMessage(String),

    /// 送信手段が送信を拒否した、または通信に失敗した
    #[error("メール送信に失敗: {message}")]
    Rejected {
        /// 送信手段が返したステータスコード（あれば）
        status:  Option<u16>,
        /// 送信手段が返したエラー内容
        message: String,
    },
}

impl DeliveryError {
    /// 呼び出し元に返す HTTP ステータスコード
    ///
    /// 送信手段が 400〜599 のステータスを返した場合はそれを使い、
    /// それ以外は 500 とする。
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Rejected {
                status: Some(status),
                ..
            } if (400..=599).contains(status) => *status,
            _ => FALLBACK_STATUS,
        }
    }

    /// 呼び出し元に返すエラー内容
    pub fn detail(&self) -> String {
        match self {
            Self::NotConfigured => "mail transport is not configured".to_string(),
            Self::InvalidMessage(message) | Self::Rejected { message, .. } => message.clone(),
        }
    }
}
