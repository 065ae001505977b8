//! # ヘルスチェックハンドラ
//!
//! レスポンス型は [`contact_shared::HealthResponse`] を参照。

use axum::Json;
use contact_shared::HealthResponse;

/// Contact Service のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
