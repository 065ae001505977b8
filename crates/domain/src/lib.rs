//! # お問い合わせドメイン層
//!
//! お問い合わせフォーム送信の中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋関数中心**: 正規化・検証・重複排除は副作用を持たない
//! - **外部依存なし**: メール送信やチームディレクトリはインフラ層が担当する
//! - **Result による失敗表現**: 入力不備は [`SubmissionError`]、送信失敗は
//!   [`DeliveryError`] として呼び出し元に返す
//!
//! ## 依存関係の方向
//!
//! ```text
//! contact-service → infra → domain
//!        ↘                    ↑
//!         └───────────────────┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`normalize`] - 入力値の正規化とメールアドレスの形式チェック
//! - [`submission`] - 送信内容の解析と必須項目の検証
//! - [`recipient`] - 通知先アドレスの分割と重複排除
//! - [`mail`] - 送信メール・送信結果・送信エラー
//! - [`clock`] - 時刻プロバイダ
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::Utc;
//! use contact_domain::{recipient::RecipientSet, submission::RawSubmission};
//!
//! let raw = RawSubmission::from_json(br#"{"email":"a@b.com","subject":"Hi","message":"Hello"}"#)?;
//! let submission = raw.validate(Utc::now())?;
//! assert_eq!(submission.subject, "Hi");
//!
//! let recipients = RecipientSet::from_lists(["Ops@Example.com; ops@example.com"]);
//! assert_eq!(recipients.as_slice(), ["Ops@Example.com"]);
//! # Ok::<(), contact_domain::SubmissionError>(())
//! ```

pub mod clock;
pub mod mail;
pub mod normalize;
pub mod recipient;
pub mod submission;

pub use mail::DeliveryError;
pub use submission::SubmissionError;
