//! SMTP 送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 開発環境では Mailpit などのローカル SMTP サーバーに `SMTP_TLS=none` で接続する。

use async_trait::async_trait;
use contact_domain::mail::{DeliveryError, OutboundEmail, SendReceipt};
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{
        Mailbox,
        Message,
        MultiPart,
        SinglePart,
        header::{ContentType, HeaderName, HeaderValue},
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use uuid::Uuid;

use super::MailSender;

/// SMTP 接続の暗号化方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SmtpTls {
    /// 平文で接続後に STARTTLS で昇格（ポート 587）
    #[default]
    StartTls,
    /// 接続時から TLS（ポート 465）
    Tls,
    /// 暗号化なし（ローカル開発用）
    None,
}

/// SMTP 接続設定
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host:     String,
    pub port:     u16,
    pub tls:      SmtpTls,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SmtpSettings {
    /// 既定のポート（587）と STARTTLS で設定を作る
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host:     host.into(),
            port:     587,
            tls:      SmtpTls::default(),
            username: None,
            password: None,
        }
    }
}

/// SMTP 送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpMailSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// 接続はここでは行わず、最初の送信時に確立する。
    pub fn new(settings: &SmtpSettings, from_address: String) -> Result<Self, DeliveryError> {
        let builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host).port(settings.port);

        let builder = match settings.tls {
            SmtpTls::None => builder,
            SmtpTls::StartTls => builder.tls(Tls::Required(tls_parameters(&settings.host)?)),
            SmtpTls::Tls => builder.tls(Tls::Wrapper(tls_parameters(&settings.host)?)),
        };

        let builder = match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from_address,
        })
    }

    /// 送信メールから lettre のメッセージを組み立てる
    ///
    /// Message-ID は送信結果として返すため、ここで採番する。
    fn build_message(&self, email: &OutboundEmail) -> Result<(Message, String), DeliveryError> {
        let from = parse_mailbox(&self.from_address, "送信元")?;
        let message_id = format!("<{}@{}>", Uuid::now_v7(), from.email.domain());

        let mut builder = Message::builder()
            .from(from)
            .subject(&email.subject)
            .message_id(Some(message_id.clone()));

        for to in &email.to {
            builder = builder.to(parse_mailbox(to, "宛先")?);
        }

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to, "返信先")?);
        }

        for header in &email.headers {
            let name = HeaderName::new_from_ascii(header.name.clone()).map_err(|e| {
                DeliveryError::InvalidMessage(format!("ヘッダ名不正 '{}': {e}", header.name))
            })?;
            builder = builder.raw_header(HeaderValue::new(name, header.value.clone()));
        }

        let message = builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| DeliveryError::InvalidMessage(format!("メッセージ構築失敗: {e}")))?;

        Ok((message, message_id))
    }
}

fn tls_parameters(host: &str) -> Result<TlsParameters, DeliveryError> {
    TlsParameters::new(host.to_string())
        .map_err(|e| DeliveryError::InvalidMessage(format!("TLS 設定失敗: {e}")))
}

fn parse_mailbox(address: &str, role: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|e| DeliveryError::InvalidMessage(format!("{role}アドレス不正 '{address}': {e}")))
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send_email(&self, email: &OutboundEmail) -> Result<SendReceipt, DeliveryError> {
        let (message, message_id) = self.build_message(email)?;

        // SMTP は HTTP ステータスを持たないため status は常に None
        self.transport
            .send(message)
            .await
            .map_err(|e| DeliveryError::Rejected {
                status:  None,
                message: format!("SMTP 送信失敗: {e}"),
            })?;

        Ok(SendReceipt {
            accepted:   email.to.clone(),
            message_id: Some(message_id),
        })
    }
}
