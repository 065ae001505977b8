//! # 宛先解決
//!
//! 複数の宛先ソースを優先順に評価し、最初に 1 件以上の宛先が得られたソースの結果を返す。
//!
//! 1. 宛先リスト設定（複数の設定値をまとめて 1 ソースとして扱う）
//! 2. チームディレクトリ
//! 3. 送信元アドレス（最終手段、分割せず 1 件として扱う）
//!
//! どのソースからも宛先が得られない場合は空の [`RecipientSet`] を返す。
//! 空であることの扱いは呼び出し元（[`ContactService`](super::ContactService)）が決める。

use std::sync::Arc;

use contact_domain::recipient::RecipientSet;
use contact_infra::TeamDirectory;
use contact_shared::event_log::error::{category, kind};

/// 宛先ソース
#[derive(Clone)]
pub enum RecipientSource {
    /// 固定の宛先リスト（各要素はカンマ・セミコロン・空白区切りの複数アドレス）
    List(Vec<String>),
    /// チームディレクトリ
    Directory(Arc<dyn TeamDirectory>),
    /// 単一のアドレス（分割しない。表示名付きの `Name <addr>` もそのまま 1 件として扱う）
    Address(String),
}

impl RecipientSource {
    async fn collect(&self) -> RecipientSet {
        match self {
            Self::List(lists) => RecipientSet::from_lists(lists),
            Self::Directory(directory) => match directory.member_emails().await {
                Ok(emails) => RecipientSet::from_candidates(emails),
                Err(e) => {
                    // ディレクトリの障害は「宛先なし」として次のソースへ進む
                    tracing::warn!(
                        error.category = category::EXTERNAL_SERVICE,
                        error.kind = kind::DIRECTORY_LOOKUP,
                        error = %e,
                        "チームディレクトリから宛先を取得できませんでした"
                    );
                    RecipientSet::default()
                }
            },
            Self::Address(address) => RecipientSet::from_candidates([address]),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Directory(_) => "directory",
            Self::Address(_) => "address",
        }
    }
}

/// 宛先解決の設定
#[derive(Clone, Default)]
pub struct RecipientConfig {
    /// 宛先リスト設定の値（優先順）
    pub lists:     Vec<String>,
    /// チームディレクトリ
    pub directory: Option<Arc<dyn TeamDirectory>>,
    /// 最終手段の宛先
    pub fallback:  Option<String>,
}

/// 宛先リゾルバ
pub struct RecipientResolver {
    sources: Vec<RecipientSource>,
}

impl RecipientResolver {
    pub fn new(config: RecipientConfig) -> Self {
        let mut sources = vec![RecipientSource::List(config.lists)];
        if let Some(directory) = config.directory {
            sources.push(RecipientSource::Directory(directory));
        }
        if let Some(fallback) = config.fallback {
            sources.push(RecipientSource::Address(fallback));
        }
        Self { sources }
    }

    /// 宛先を解決する
    pub async fn resolve(&self) -> RecipientSet {
        for source in &self.sources {
            let recipients = source.collect().await;
            if !recipients.is_empty() {
                tracing::debug!(
                    source = source.label(),
                    count = recipients.len(),
                    "宛先を解決しました"
                );
                return recipients;
            }
        }
        RecipientSet::default()
    }
}
