//! # Contact Service ライブラリ
//!
//! Web サイトのお問い合わせフォームを受け付け、通知メールを送信する API サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラーと HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `usecase`: 受付パイプライン（宛先解決、テンプレート、送信）

pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use handler::{ContactState, health_check, submit_contact};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// ルーターを構築する
///
/// `allowed_origins` が空の場合はすべてのオリジンを許可する。
pub fn build_router(state: Arc<ContactState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", post(submit_contact))
        .route("/api/contact", post(submit_contact))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "CORS オリジンの値が不正なため無視します");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
