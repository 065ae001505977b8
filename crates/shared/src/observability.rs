//! # ログ出力の初期化
//!
//! `LOG_FORMAT` で JSON / Pretty を切り替え、`RUST_LOG` でレベルを絞る。
//! 起動時に [`init_tracing`] が返すルートスパンに入っておくと、
//! 以降のログにはすべてサービス名（`span.service`）が付く。

use strum::{Display, EnumString};

/// `RUST_LOG` が未設定のときのフィルタ
pub const DEFAULT_FILTER: &str = "info,contact=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// JSON（1 行 1 イベント）
    Json,
    /// 人間向け
    #[default]
    Pretty,
}

impl LogFormat {
    /// 不明な値は Pretty として扱う
    ///
    /// サブスクライバ初期化前に呼ばれるので警告は stderr に直接書く。
    pub fn parse(value: &str) -> Self {
        value.trim().parse().unwrap_or_else(|_| {
            eprintln!("WARNING: unknown LOG_FORMAT={value:?}, falling back to pretty");
            Self::Pretty
        })
    }
}

/// ログ出力の設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// ルートスパンの `service` フィールドに入るサービス名
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// 任意の参照関数から `LOG_FORMAT` を読む
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let log_format = lookup("LOG_FORMAT")
            .map(|value| LogFormat::parse(&value))
            .unwrap_or_default();
        Self::new(service_name, log_format)
    }

    /// サービス名を持つルートスパン
    pub fn root_span(&self) -> tracing::Span {
        tracing::info_span!("app", service = %self.service_name)
    }
}

/// グローバルサブスクライバを設定し、ルートスパンを返す
///
/// 返したスパンは呼び出し元が `entered()` して main の終わりまで保持する。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) -> tracing::Span {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer(config.log_format, std::io::stdout))
        .init();

    config.root_span()
}

#[cfg(feature = "observability")]
fn fmt_layer<S, W>(
    format: LogFormat,
    writer: W,
) -> Box<dyn tracing_subscriber::Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::Layer as _;

    let layer = tracing_subscriber::fmt::layer().with_writer(writer);
    match format {
        LogFormat::Json => layer
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => layer.boxed(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case(" JSON ", LogFormat::Json)]
    #[case("pretty", LogFormat::Pretty)]
    #[case("yaml", LogFormat::Pretty)]
    #[case("", LogFormat::Pretty)]
    fn test_ログ形式をパースし不明な値はprettyにする(
        #[case] value: &str,
        #[case] expected: LogFormat,
    ) {
        assert_eq!(LogFormat::parse(value), expected);
    }

    #[test]
    fn test_log_formatが未設定ならprettyになる() {
        let config = TracingConfig::from_lookup("contact-service", |_| None);

        assert_eq!(config.service_name, "contact-service");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_log_formatを参照関数から読む() {
        let config = TracingConfig::from_lookup("contact-service", |key| {
            (key == "LOG_FORMAT").then(|| "json".to_string())
        });

        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_ルートスパンはserviceフィールドを持つ() {
        let span = TracingConfig::new("contact-service", LogFormat::Pretty).root_span();

        let metadata = span.metadata().unwrap();
        assert_eq!(metadata.name(), "app");
        assert!(metadata.fields().field("service").is_some());
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_json出力にサービス名が入る() {
        use std::{
            io,
            sync::{Arc, Mutex},
        };

        use tracing_subscriber::layer::SubscriberExt;

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::registry()
            .with(fmt_layer(LogFormat::Json, move || writer.clone()));
        let config = TracingConfig::new("contact-service", LogFormat::Json);

        tracing::subscriber::with_default(subscriber, || {
            let _guard = config.root_span().entered();
            tracing::info!("started");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let line: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(line["span"]["service"], "contact-service");
        assert_eq!(line["span"]["name"], "app");
        assert_eq!(line["message"], "started");
    }
}
