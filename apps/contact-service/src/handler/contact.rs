//! # お問い合わせハンドラ
//!
//! リクエストボディをそのままユースケースに渡す。
//! JSON の解析はユースケースのフェーズの一部なので、ここでは `Json` extractor を使わない。

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};

use crate::{error::ContactError, usecase::ContactUseCase};

/// お問い合わせハンドラの State
pub struct ContactState {
    pub usecase: Arc<dyn ContactUseCase>,
}

/// 送信成功レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success:    bool,
    pub sent_to:    Vec<String>,
    pub message_id: Option<String>,
}

/// POST / および POST /api/contact
///
/// ## レスポンス
///
/// - `200 OK`: 送信成功
/// - `400 Bad Request`: 入力不正
/// - `503 Service Unavailable`: 送信手段・宛先の設定不備
/// - その他: 送信手段が返したステータス（なければ 500）
pub async fn submit_contact(
    State(state): State<Arc<ContactState>>,
    body: Bytes,
) -> Result<Json<ContactResponse>, ContactError> {
    let outcome = state.usecase.submit(&body).await?;

    Ok(Json(ContactResponse {
        success:    true,
        sent_to:    outcome.sent_to,
        message_id: outcome.message_id,
    }))
}
