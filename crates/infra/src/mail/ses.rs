//! SES 送信実装
//!
//! AWS SES v2 API を使用してメールを送信する。

use async_trait::async_trait;
use aws_sdk_sesv2::{
    Client,
    types::{Body, Content, Destination, EmailContent, Message, MessageHeader},
};
use contact_domain::mail::{DeliveryError, OutboundEmail, SendReceipt};

use super::MailSender;

/// SES 送信
///
/// `aws_sdk_sesv2::Client` をラップする。
pub struct SesMailSender {
    client:       Client,
    from_address: String,
}

impl SesMailSender {
    /// 新しい SES 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `client`: AWS SES v2 クライアント
    /// - `from_address`: 送信元メールアドレス（SES で検証済みであること）
    pub fn new(client: Client, from_address: String) -> Self {
        Self {
            client,
            from_address,
        }
    }

    /// 環境変数（`AWS_REGION` など）から AWS 設定を読み込んで作成
    pub async fn from_env(from_address: String) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(Client::new(&config), from_address)
    }
}

fn content(data: &str, part: &str) -> Result<Content, DeliveryError> {
    Content::builder()
        .data(data)
        .build()
        .map_err(|e| DeliveryError::InvalidMessage(format!("{part}構築失敗: {e}")))
}

fn build_content(email: &OutboundEmail) -> Result<EmailContent, DeliveryError> {
    let mut message = Message::builder()
        .subject(content(&email.subject, "件名")?)
        .body(
            Body::builder()
                .html(content(&email.html_body, "HTML 本文")?)
                .text(content(&email.text_body, "テキスト本文")?)
                .build(),
        );

    for header in &email.headers {
        message = message.headers(
            MessageHeader::builder()
                .name(&header.name)
                .value(&header.value)
                .build()
                .map_err(|e| DeliveryError::InvalidMessage(format!("ヘッダ構築失敗: {e}")))?,
        );
    }

    Ok(EmailContent::builder().simple(message.build()).build())
}

#[async_trait]
impl MailSender for SesMailSender {
    async fn send_email(&self, email: &OutboundEmail) -> Result<SendReceipt, DeliveryError> {
        let destination = email
            .to
            .iter()
            .fold(Destination::builder(), |builder, to| builder.to_addresses(to))
            .build();

        let mut request = self
            .client
            .send_email()
            .from_email_address(&self.from_address)
            .destination(destination)
            .content(build_content(email)?);

        if let Some(reply_to) = &email.reply_to {
            request = request.reply_to_addresses(reply_to);
        }

        let output = request.send().await.map_err(|e| DeliveryError::Rejected {
            status:  e.raw_response().map(|response| response.status().as_u16()),
            message: format!("SES 送信失敗: {e}"),
        })?;

        Ok(SendReceipt {
            accepted:   email.to.clone(),
            message_id: output.message_id().map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use contact_domain::mail::RenderedMessage;

    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SesMailSender>();
    }

    #[test]
    fn test_本文と固定ヘッダを含むコンテンツを構築できる() {
        let email = OutboundEmail::new(
            vec!["x@y.com".to_string()],
            RenderedMessage {
                subject: "Website contact: Hi".to_string(),
                text:    "Hello".to_string(),
                html:    "<p>Hello</p>".to_string(),
            },
            None,
        );

        let content = build_content(&email).unwrap();

        let message = content.simple().unwrap();
        assert_eq!(message.subject().unwrap().data(), "Website contact: Hi");
        let headers = message.headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].name(), "X-Contact-Form");
        assert_eq!(headers[0].value(), "website");
    }
}
