//! # 通知先アドレス
//!
//! 設定値やディレクトリから集めた候補アドレスを、順序付きで重複のない
//! [`RecipientSet`] にまとめる。
//!
//! ## 重複排除ルール
//!
//! - 比較キーはトリム + 小文字化したアドレス
//! - 最初に現れた表記（大文字小文字を含む）と順序を保持する
//! - 空文字列は捨てる

use derive_more::Deref;
use itertools::Itertools;

use crate::normalize::email_key;

/// 複数アドレスを含む設定値を分割する
///
/// カンマ、セミコロン、空白のいずれも区切り文字として扱う。
pub fn split_recipient_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// 順序付きで重複のない通知先アドレスの集合
#[derive(Debug, Clone, PartialEq, Eq, Default, Deref)]
pub struct RecipientSet(Vec<String>);

impl RecipientSet {
    /// 候補アドレスから集合を作る（分割は行わない）
    pub fn from_candidates<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = candidates
            .into_iter()
            .map(|candidate| candidate.as_ref().trim().to_string())
            .filter(|address| !address.is_empty())
            .unique_by(|address| email_key(address))
            .collect();

        Self(addresses)
    }

    /// 複数アドレスを含む設定値の並びから集合を作る
    ///
    /// すべての設定値を分割・平坦化してから重複排除する。
    pub fn from_lists<I, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lists: Vec<S> = lists.into_iter().collect();
        Self::from_candidates(
            lists
                .iter()
                .flat_map(|list| split_recipient_list(list.as_ref())),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
