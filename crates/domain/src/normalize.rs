//! # 入力値の正規化
//!
//! フォームから届いた生の JSON 値を扱いやすい文字列に揃える。
//!
//! - 文字列以外（数値、null、配列、未指定）はすべて空文字列として扱う
//! - 比較用キーは小文字化するが、送信に使う値そのものは変更しない
//! - メールアドレスの形式チェックは最低限の構文確認のみ（RFC 準拠ではない）

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// `local@domain.tld` 相当の最小限の形
static PLAUSIBLE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("正規表現が不正です"));

/// JSON 値をトリム済み文字列に正規化する
///
/// 文字列以外の値や未指定の場合は空文字列を返す。
pub fn normalize_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// JSON 値をメールアドレスの比較用キーに正規化する
pub fn normalize_email_address(value: Option<&Value>) -> String {
    normalize_text(value).to_lowercase()
}

/// 文字列のメールアドレスから比較用キーを作る
pub fn email_key(address: &str) -> String {
    address.trim().to_lowercase()
}

/// メールアドレスとして最低限の形をしているか
pub fn is_plausible_email(value: &str) -> bool {
    PLAUSIBLE_EMAIL.is_match(value.trim())
}
