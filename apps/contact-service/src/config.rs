//! # Contact Service 設定
//!
//! 環境変数から Contact Service の設定を読み込む。
//!
//! テストでは [`ContactConfig::from_lookup`] に任意の参照関数を渡して、
//! プロセスの環境変数に触れずに設定を組み立てる。

use std::env;

use contact_infra::mail::{MailBackend, MailSettings, SmtpSettings, SmtpTls};
use thiserror::Error;

/// 宛先リストとして読む環境変数（優先順）
pub const RECIPIENT_LIST_VARS: [&str; 3] = [
    "CONTACT_RECIPIENTS",
    "CONTACT_TO_EMAIL",
    "TEAM_NOTIFICATION_EMAILS",
];

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} の値が不正です: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// チームディレクトリの接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub url:   String,
    pub token: Option<String>,
}

/// Contact Service の設定
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// バインドアドレス
    pub host:            String,
    /// ポート番号
    pub port:            u16,
    /// CORS で許可するオリジン（空なら全許可）
    pub allowed_origins: Vec<String>,
    /// 宛先リスト設定の値（[`RECIPIENT_LIST_VARS`] の順）
    pub recipient_lists: Vec<String>,
    /// チームディレクトリ
    pub directory:       Option<DirectoryConfig>,
    /// 最終手段の宛先（送信元アドレス）
    pub fallback:        Option<String>,
    /// メール送信設定
    pub mail:            MailSettings,
}

impl ContactConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 参照関数から設定を読み込む
    ///
    /// 空文字列（空白のみを含む）の値は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match get("CONTACT_PORT") {
            Some(value) => parse_value("CONTACT_PORT", value)?,
            None => 8080,
        };

        let allowed_origins = get("CONTACT_ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let recipient_lists = RECIPIENT_LIST_VARS.iter().filter_map(|name| get(name)).collect();

        let directory = get("TEAM_DIRECTORY_URL").map(|url| DirectoryConfig {
            url,
            token: get("TEAM_DIRECTORY_TOKEN"),
        });

        let from_address = get("MAIL_FROM_ADDRESS");

        // 不明なバックエンドは起動を止めず、未設定として 503 で報告する
        let backend = get("MAIL_BACKEND").and_then(|value| match value.parse::<MailBackend>() {
            Ok(backend) => Some(backend),
            Err(_) => {
                tracing::warn!(value = %value, "MAIL_BACKEND の値が不明です");
                None
            }
        });

        let smtp = match get("SMTP_HOST") {
            Some(host) => {
                let mut smtp = SmtpSettings::new(host);
                if let Some(port) = get("SMTP_PORT") {
                    smtp.port = parse_value("SMTP_PORT", port)?;
                }
                if let Some(tls) = get("SMTP_TLS") {
                    smtp.tls = parse_value::<SmtpTls>("SMTP_TLS", tls)?;
                }
                smtp.username = get("SMTP_USERNAME");
                smtp.password = get("SMTP_PASSWORD");
                Some(smtp)
            }
            None => None,
        };

        Ok(Self {
            host: get("CONTACT_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            allowed_origins,
            recipient_lists,
            directory,
            fallback: from_address.clone(),
            mail: MailSettings {
                backend,
                from_address,
                smtp,
            },
        })
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}
