//! # お問い合わせ送信内容
//!
//! フォームから届いた JSON を解析し、必須項目を検証する。
//!
//! ## 処理の流れ
//!
//! ```text
//! リクエストボディ ──from_json──→ RawSubmission ──validate──→ Submission
//!                    (JSON 不正)                  (必須項目・形式)
//! ```
//!
//! 検証は件名 → 本文 → メールアドレスの順に行い、最初の違反で打ち切る。

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::normalize::{is_plausible_email, normalize_text};

/// 送信内容の解析・検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// リクエストボディが JSON として解釈できない
    #[error("リクエストボディが JSON として不正です: {0}")]
    InvalidJson(String),

    /// 件名が空
    #[error("件名は必須です")]
    SubjectRequired,

    /// 本文が空
    #[error("本文は必須です")]
    MessageRequired,

    /// メールアドレスが空
    #[error("メールアドレスは必須です")]
    EmailRequired,

    /// メールアドレスの形式が不正
    #[error("メールアドレスの形式が不正です")]
    InvalidEmail,
}

/// 検証前の送信内容
///
/// 各フィールドは正規化済み（トリム済み、文字列以外は空文字列）だが、
/// 必須項目の検証はまだ行っていない。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawSubmission {
    pub name:    String,
    pub email:   String,
    pub subject: String,
    pub message: String,
}

impl RawSubmission {
    /// リクエストボディを解析する
    ///
    /// 空または空白のみのボディは `{}` として扱う。このため
    /// [`SubmissionError::InvalidJson`] ではなく、検証時に
    /// [`SubmissionError::SubjectRequired`] として報告される。
    /// JSON オブジェクト以外の値（配列や文字列）もフィールドを持たないものとして扱う。
    pub fn from_json(body: &[u8]) -> Result<Self, SubmissionError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| SubmissionError::InvalidJson(e.to_string()))?;

        Ok(match value {
            Value::Object(fields) => Self::from_fields(&fields),
            _ => Self::default(),
        })
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            name:    normalize_text(fields.get("name")),
            email:   normalize_text(fields.get("email")),
            subject: normalize_text(fields.get("subject")),
            message: normalize_text(fields.get("message")),
        }
    }

    /// 必須項目と形式を検証し、受付時刻を付与する
    pub fn validate(self, submitted_at: DateTime<Utc>) -> Result<Submission, SubmissionError> {
        if self.subject.is_empty() {
            return Err(SubmissionError::SubjectRequired);
        }
        if self.message.is_empty() {
            return Err(SubmissionError::MessageRequired);
        }
        if self.email.is_empty() {
            return Err(SubmissionError::EmailRequired);
        }
        if !is_plausible_email(&self.email) {
            return Err(SubmissionError::InvalidEmail);
        }

        Ok(Submission {
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            submitted_at,
        })
    }
}

/// 検証済みの送信内容
///
/// `subject` と `message` は空でなく、`email` は形式チェックを通過している。
/// `name` は任意項目のため空文字列になりうる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name:         String,
    pub email:        String,
    pub subject:      String,
    pub message:      String,
    pub submitted_at: DateTime<Utc>,
}
