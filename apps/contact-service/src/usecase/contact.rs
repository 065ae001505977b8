//! # お問い合わせ受付ユースケース
//!
//! リクエストボディを受け取り、次のフェーズを順に進める。
//! いずれかのフェーズが失敗した時点で、以降のフェーズは実行しない。
//!
//! ```text
//! CheckConfiguration → Parse → Validate → ResolveRecipients → Dispatch
//! ```
//!
//! 外部呼び出し（ディレクトリ参照、メール送信）は `ResolveRecipients` 以降でのみ行う。

use std::sync::Arc;

use async_trait::async_trait;
use contact_domain::{
    clock::Clock,
    mail::OutboundEmail,
    recipient::RecipientSet,
    submission::{RawSubmission, Submission},
};
use contact_infra::MailSender;
use contact_shared::{
    event_log::{error as log_error, event},
    log_business_event,
};

use super::{ContactUseCase, RecipientResolver, TemplateRenderer};
use crate::error::ContactError;

/// 送信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// 送信手段が受け付けた宛先
    pub sent_to:    Vec<String>,
    /// 送信手段が採番したメッセージ ID
    pub message_id: Option<String>,
}

/// 受付パイプラインのフェーズ
enum Phase {
    CheckConfiguration,
    Parse,
    Validate(RawSubmission),
    ResolveRecipients(Submission),
    Dispatch {
        submission: Submission,
        recipients: RecipientSet,
    },
}

/// お問い合わせ受付サービス
pub struct ContactService {
    sender:   Arc<dyn MailSender>,
    resolver: RecipientResolver,
    renderer: TemplateRenderer,
    clock:    Arc<dyn Clock>,
}

impl ContactService {
    pub fn new(
        sender: Arc<dyn MailSender>,
        resolver: RecipientResolver,
        renderer: TemplateRenderer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sender,
            resolver,
            renderer,
            clock,
        }
    }

    async fn run(&self, body: &[u8]) -> Result<DispatchOutcome, ContactError> {
        let mut phase = Phase::CheckConfiguration;
        loop {
            phase = match phase {
                Phase::CheckConfiguration => {
                    if !self.sender.is_configured() {
                        return Err(ContactError::MailNotConfigured);
                    }
                    Phase::Parse
                }
                Phase::Parse => Phase::Validate(RawSubmission::from_json(body)?),
                Phase::Validate(raw) => Phase::ResolveRecipients(raw.validate(self.clock.now())?),
                Phase::ResolveRecipients(submission) => {
                    let recipients = self.resolver.resolve().await;
                    if recipients.is_empty() {
                        return Err(ContactError::NoRecipients);
                    }
                    Phase::Dispatch {
                        submission,
                        recipients,
                    }
                }
                Phase::Dispatch {
                    submission,
                    recipients,
                } => return self.dispatch(&submission, recipients).await,
            };
        }
    }

    async fn dispatch(
        &self,
        submission: &Submission,
        recipients: RecipientSet,
    ) -> Result<DispatchOutcome, ContactError> {
        let rendered = self.renderer.render(submission)?;
        let email = OutboundEmail::new(
            recipients.into_vec(),
            rendered,
            Some(submission.email.clone()),
        );

        log_business_event!(
            event.category = event::category::CONTACT,
            event.action = event::action::CONTACT_SUBMITTED,
            event.result = event::result::SUCCESS,
            recipients = email.to.len(),
            "お問い合わせを送信します"
        );

        let receipt = self
            .sender
            .send_email(&email)
            .await
            .map_err(ContactError::Delivery)?;

        Ok(DispatchOutcome {
            sent_to:    receipt.accepted,
            message_id: receipt.message_id,
        })
    }
}

#[async_trait]
impl ContactUseCase for ContactService {
    async fn submit(&self, body: &[u8]) -> Result<DispatchOutcome, ContactError> {
        let result = self.run(body).await;

        match &result {
            Ok(outcome) => log_business_event!(
                event.category = event::category::CONTACT,
                event.action = event::action::CONTACT_SENT,
                event.result = event::result::SUCCESS,
                sent_to = outcome.sent_to.len(),
                message_id = outcome.message_id.as_deref().unwrap_or(""),
                "お問い合わせを送信しました"
            ),
            Err(e @ (ContactError::Delivery(_) | ContactError::Template(_))) => {
                let kind = match e {
                    ContactError::Template(_) => log_error::kind::TEMPLATE,
                    _ => log_error::kind::MAIL_DELIVERY,
                };
                tracing::error!(
                    error.category = log_error::category::EXTERNAL_SERVICE,
                    error.kind = kind,
                    error = %e,
                    "お問い合わせの送信に失敗しました"
                );
                log_business_event!(
                    event.category = event::category::CONTACT,
                    event.action = event::action::CONTACT_FAILED,
                    event.result = event::result::FAILURE,
                    status = e.status_code().as_u16(),
                    "お問い合わせの送信に失敗しました"
                );
            }
            Err(e) => {
                if matches!(e, ContactError::MailNotConfigured | ContactError::NoRecipients) {
                    tracing::warn!(
                        error.category = log_error::category::CONFIGURATION,
                        error = %e,
                        "設定不備のためお問い合わせを受け付けられません"
                    );
                }
                log_business_event!(
                    event.category = event::category::CONTACT,
                    event.action = event::action::CONTACT_REJECTED,
                    event.result = event::result::FAILURE,
                    reason = %e,
                    "お問い合わせを受け付けませんでした"
                );
            }
        }

        result
    }
}
