//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンでお問い合わせメールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**: `Website contact: {subject}`（既に付いていれば付け直さない）
//! - **HTML エスケープ**: 利用者の入力はすべて `& < > " '` をエスケープする。
//!   本文の改行は `<br>` に変換するため、エスケープ済みの値を `safe` で埋め込む
//! - **任意項目**: 名前・メールアドレスが空の場合は行ごと出力しない

use chrono::SecondsFormat;
use contact_domain::{mail::RenderedMessage, submission::Submission};
use tera::{Context, Tera};

use crate::error::ContactError;

/// 件名に付与する固定プレフィックス
pub const SUBJECT_PREFIX: &str = "Website contact: ";

const TEXT_TEMPLATE: &str = "contact_submission.txt";
const HTML_TEMPLATE: &str = "contact_submission.html";

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    pub fn new() -> Result<Self, ContactError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    TEXT_TEMPLATE,
                    include_str!("../../templates/contact_submission.txt"),
                ),
                (
                    HTML_TEMPLATE,
                    include_str!("../../templates/contact_submission.html"),
                ),
            ])
            .map_err(|e| ContactError::Template(e.to_string()))?;
        engine.set_escape_fn(escape_html);

        Ok(Self { engine })
    }

    /// 検証済みの送信内容からメッセージを生成する
    pub fn render(&self, submission: &Submission) -> Result<RenderedMessage, ContactError> {
        let mut context = Context::new();
        context.insert(
            "submitted_at",
            &submission
                .submitted_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        context.insert("name", &submission.name);
        context.insert("email", &submission.email);
        context.insert("message", &submission.message);
        context.insert("message_html", &message_to_html(&submission.message));

        let text = self
            .engine
            .render(TEXT_TEMPLATE, &context)
            .map_err(|e| ContactError::Template(e.to_string()))?;

        let html = self
            .engine
            .render(HTML_TEMPLATE, &context)
            .map_err(|e| ContactError::Template(e.to_string()))?;

        Ok(RenderedMessage {
            subject: format_subject(&submission.subject),
            text,
            html,
        })
    }
}

/// 件名に固定プレフィックスを付与する
pub fn format_subject(subject: &str) -> String {
    if subject.starts_with(SUBJECT_PREFIX) {
        subject.to_string()
    } else {
        format!("{SUBJECT_PREFIX}{subject}")
    }
}

/// HTML の特殊文字をエスケープする
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn message_to_html(message: &str) -> String {
    escape_html(message)
        .replace("\r\n", "\n")
        .replace('\n', "<br>\n")
}
