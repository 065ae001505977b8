//! # チームディレクトリ
//!
//! 通知先候補となるチームメンバーのメールアドレスを外部 API から取得する。
//!
//! エンドポイントは `[{"email": "..."}]` 形式の JSON 配列を返す。
//! `email` を持たない要素は無視する。

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// ディレクトリ取得エラー
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// 接続・レスポンスのデコードに失敗
    #[error("チームディレクトリへのリクエストに失敗: {0}")]
    Request(#[from] reqwest::Error),

    /// 2xx 以外のステータス
    #[error("チームディレクトリが異常なステータスを返した: {0}")]
    Status(u16),
}

/// チームディレクトリ
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    /// メンバーのメールアドレスを取得する（未加工のまま返す）
    async fn member_emails(&self) -> Result<Vec<String>, DirectoryError>;
}

#[derive(Debug, Deserialize)]
struct DirectoryMember {
    #[serde(default)]
    email: Option<String>,
}

/// HTTP 経由のチームディレクトリ
pub struct HttpTeamDirectory {
    client: reqwest::Client,
    url:    String,
    token:  Option<String>,
}

impl HttpTeamDirectory {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            token,
        }
    }
}

#[async_trait]
impl TeamDirectory for HttpTeamDirectory {
    async fn member_emails(&self) -> Result<Vec<String>, DirectoryError> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }

        let members: Vec<DirectoryMember> = response.json().await?;
        Ok(members.into_iter().filter_map(|m| m.email).collect())
    }
}
