//! # Contact Service サーバー
//!
//! Web サイトのお問い合わせフォームから送られた内容を検証し、
//! 設定された通知先へメールで転送する API サーバー。
//!
//! ## 処理の流れ
//!
//! ```text
//! ┌──────────────┐  POST /   ┌─────────────────┐        ┌──────────────────┐
//! │ Web フォーム │──────────→│ Contact Service │───────→│ SMTP / SES       │
//! └──────────────┘           └─────────────────┘        └──────────────────┘
//!                                     │
//!                                     ↓（宛先リスト未設定時）
//!                            ┌─────────────────┐
//!                            │ チームディレクトリ │
//!                            └─────────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CONTACT_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `CONTACT_PORT` | No | ポート番号（デフォルト: `8080`） |
//! | `CONTACT_ALLOWED_ORIGINS` | No | CORS で許可するオリジン（カンマ区切り） |
//! | `CONTACT_RECIPIENTS` / `CONTACT_TO_EMAIL` / `TEAM_NOTIFICATION_EMAILS` | No | 通知先アドレス |
//! | `TEAM_DIRECTORY_URL` / `TEAM_DIRECTORY_TOKEN` | No | チームディレクトリ |
//! | `MAIL_BACKEND` | No | `smtp` / `ses` / `noop`（未設定なら送信無効） |
//! | `MAIL_FROM_ADDRESS` | No | 送信元アドレス（最終手段の通知先を兼ねる） |
//! | `SMTP_HOST` / `SMTP_PORT` / `SMTP_TLS` / `SMTP_USERNAME` / `SMTP_PASSWORD` | No | SMTP 設定 |
//!
//! ## 起動方法
//!
//! ```bash
//! MAIL_BACKEND=smtp SMTP_HOST=localhost SMTP_TLS=none \
//!   MAIL_FROM_ADDRESS=noreply@example.com CONTACT_RECIPIENTS=ops@example.com \
//!   cargo run -p contact-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use contact_domain::clock::SystemClock;
use contact_infra::{HttpTeamDirectory, TeamDirectory, mail::build_mail_sender};
use contact_service::{
    build_router,
    config::ContactConfig,
    handler::ContactState,
    usecase::{ContactService, RecipientConfig, RecipientResolver, TemplateRenderer},
};
use contact_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Contact Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let _tracing_guard = init_tracing(&TracingConfig::from_env("contact-service")).entered();

    // 設定読み込み
    let config = ContactConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Contact Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // 依存コンポーネントを初期化
    let sender = build_mail_sender(&config.mail).await;
    let directory = config.directory.as_ref().map(|directory| {
        Arc::new(HttpTeamDirectory::new(&directory.url, directory.token.clone()))
            as Arc<dyn TeamDirectory>
    });
    let resolver = RecipientResolver::new(RecipientConfig {
        lists: config.recipient_lists.clone(),
        directory,
        fallback: config.fallback.clone(),
    });
    let renderer = TemplateRenderer::new().context("テンプレートの初期化に失敗しました")?;
    let service = ContactService::new(sender, resolver, renderer, Arc::new(SystemClock));
    let state = Arc::new(ContactState {
        usecase: Arc::new(service),
    });

    let app = build_router(state, &config.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Contact Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
