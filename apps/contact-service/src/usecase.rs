//! # ユースケース層
//!
//! Contact Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: ハンドラはトレイト越しにユースケースを呼ぶ
//! - **依存性注入**: 送信手段・チームディレクトリ・時刻は外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約

pub mod contact;
pub mod recipient;
pub mod template_renderer;

use async_trait::async_trait;
pub use contact::{ContactService, DispatchOutcome};
pub use recipient::{RecipientConfig, RecipientResolver, RecipientSource};
pub use template_renderer::TemplateRenderer;

use crate::error::ContactError;

/// お問い合わせ受付ユースケーストレイト
#[async_trait]
pub trait ContactUseCase: Send + Sync {
    /// フォームから送られたリクエストボディを受け付け、通知メールを送信する
    ///
    /// ## 戻り値
    ///
    /// - `Ok(DispatchOutcome)`: 送信手段が受け付けた宛先とメッセージ ID
    /// - `Err(ContactError)`: 最初に失敗したフェーズのエラー
    async fn submit(&self, body: &[u8]) -> Result<DispatchOutcome, ContactError>;
}
