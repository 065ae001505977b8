//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `contact`: お問い合わせフォームの受付

pub mod contact;
pub mod health;

pub use contact::{ContactResponse, ContactState, submit_contact};
pub use health::health_check;
