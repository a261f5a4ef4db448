//! エラー定義
//!
//! 認証・送信で発生した失敗はすべてここで分類され、診断シンクに記録される。
//! どのエラーもその1回の操作だけで完結し、ホストには伝播しない。

use std::fmt;

use thiserror::Error;

use crate::transport::TransportError;

/// 失敗した通信の種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `/authenticate` への認証リクエスト
    Authenticate,
    /// `/playerdata` へのスキルデータ送信
    Report { subject: String },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Authenticate => write!(f, "authentication"),
            Operation::Report { subject } => write!(f, "skill data for player {}", subject),
        }
    }
}

/// 送信パイプラインのエラー
#[derive(Debug, Error)]
pub enum ReportError {
    /// ユーザー名またはパスワードが未設定（認証をスキップ）
    #[error("username or password not set in config")]
    ConfigIncomplete,

    /// ネットワークレベルの失敗
    #[error("failed to send {operation}: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: TransportError,
    },

    /// `/authenticate` が2xx以外を返した
    #[error("authentication failed: unexpected code {status}")]
    AuthenticationFailed { status: u16 },

    /// `/playerdata` が2xx以外を返した
    #[error("failed to send skill data for player {subject}: unexpected code {status}")]
    ReportFailed { subject: String, status: u16 },

    /// カウンタ数がスキル一覧と一致しない
    #[error("skill counter count mismatch: expected {expected}, got {actual}")]
    Serialization { expected: usize, actual: usize },

    /// JSONエンコード失敗
    #[error("failed to encode payload: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl ReportError {
    /// 警告扱いで済むエラーかどうか
    pub fn is_warning(&self) -> bool {
        matches!(self, ReportError::ConfigIncomplete)
    }
}
