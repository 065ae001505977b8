//! # Contact Service エラー定義
//!
//! 受付パイプラインで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | 分類 | バリアント | ステータス |
//! |------|-----------|-----------|
//! | 不正な入力・必須項目・形式 | `Submission` | 400 |
//! | 設定不備 | `MailNotConfigured` / `NoRecipients` | 503 |
//! | 送信失敗 | `Delivery` | 送信手段のステータス（なければ 500） |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contact_domain::{DeliveryError, SubmissionError};
use contact_shared::ErrorResponse;
use thiserror::Error;

/// Contact Service で発生するエラー
#[derive(Debug, Error)]
pub enum ContactError {
    /// メール送信手段が設定されていない
    #[error("メール送信が設定されていません")]
    MailNotConfigured,

    /// 入力不正
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// 宛先が 1 件も解決できない
    #[error("通知先が設定されていません")]
    NoRecipients,

    /// 送信失敗
    #[error("メール送信に失敗しました: {0}")]
    Delivery(#[source] DeliveryError),

    /// テンプレートのレンダリング失敗
    #[error("テンプレートのレンダリングに失敗しました: {0}")]
    Template(String),
}

impl ContactError {
    /// 呼び出し元に返すステータスコード
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MailNotConfigured | Self::NoRecipients => StatusCode::SERVICE_UNAVAILABLE,
            Self::Submission(_) => StatusCode::BAD_REQUEST,
            Self::Delivery(e) => StatusCode::from_u16(e.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            Self::MailNotConfigured => ErrorResponse::new("Email service is not configured"),
            Self::Submission(e) => ErrorResponse::new(match e {
                SubmissionError::InvalidJson(_) => "Invalid JSON body",
                SubmissionError::SubjectRequired => "Subject is required",
                SubmissionError::MessageRequired => "Message is required",
                SubmissionError::EmailRequired => "Email is required",
                SubmissionError::InvalidEmail => "Invalid email address",
            }),
            Self::NoRecipients => ErrorResponse::new("No notification recipients are configured"),
            Self::Delivery(e) => ErrorResponse::with_details("Failed to send message", e.detail()),
            Self::Template(_) => ErrorResponse::new("Failed to render message"),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SubmissionError::InvalidJson("eof".to_string()), "Invalid JSON body")]
    #[case(SubmissionError::SubjectRequired, "Subject is required")]
    #[case(SubmissionError::MessageRequired, "Message is required")]
    #[case(SubmissionError::EmailRequired, "Email is required")]
    #[case(SubmissionError::InvalidEmail, "Invalid email address")]
    fn test_入力エラーは400と利用者向けメッセージになる(
        #[case] error: SubmissionError,
        #[case] expected: &str,
    ) {
        let error = ContactError::from(error);

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.body(), ErrorResponse::new(expected));
    }

    #[rstest]
    #[case(ContactError::MailNotConfigured)]
    #[case(ContactError::NoRecipients)]
    fn test_設定不備は503になる(#[case] error: ContactError) {
        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[rstest]
    #[case(Some(429), StatusCode::TOO_MANY_REQUESTS)]
    #[case(Some(200), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(None, StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_送信失敗は送信手段のステータスを引き継ぐ(
        #[case] status: Option<u16>,
        #[case] expected: StatusCode,
    ) {
        let error = ContactError::Delivery(DeliveryError::Rejected {
            status,
            message: "throttled".to_string(),
        });

        assert_eq!(error.status_code(), expected);
        assert_eq!(
            error.body(),
            ErrorResponse::with_details("Failed to send message", "throttled")
        );
    }
}
