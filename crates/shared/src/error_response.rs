//! # エラーレスポンス
//!
//! フォーム送信元のクライアントに返すエラーレスポンスの本文。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - HTTP ステータスは本文に含めず、axum の `IntoResponse` 変換側で設定する
//! - `details` は送信失敗時など補足情報がある場合のみ出力する

use serde::{Deserialize, Serialize};

/// エラーレスポンス本文
///
/// ```json
/// { "error": "Failed to send message", "details": "Too many requests" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error:   String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// 補足情報なしのエラー
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error:   error.into(),
            details: None,
        }
    }

    /// 補足情報付きのエラー
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error:   error.into(),
            details: Some(details.into()),
        }
    }
}
