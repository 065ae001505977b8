//! # お問い合わせサービス インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **メール送信**: SMTP / SES / Noop の送信実装と、未設定時の送信実装
//! - **チームディレクトリ**: 通知先候補となるメンバーのアドレス取得
//!
//! ## 依存関係
//!
//! ```text
//! contact-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。
//!
//! ## モジュール構成
//!
//! - [`mail`] - `MailSender` トレイトと送信実装
//! - [`directory`] - `TeamDirectory` トレイトと HTTP 実装
//! - `mock` - テスト用のインメモリ実装（`test-utils` feature）

pub mod directory;
pub mod mail;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use directory::{DirectoryError, HttpTeamDirectory, TeamDirectory};
pub use mail::{MailBackend, MailSender, MailSettings, build_mail_sender};
