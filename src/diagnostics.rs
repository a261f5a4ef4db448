//! 診断出力
//!
//! 送信結果やエラーは呼び出し元に返さず、ここを通してログに流す。

use chrono::{DateTime, Utc};

use crate::error::ReportError;

/// 診断イベント
#[derive(Debug)]
pub enum Diagnostic {
    /// プラグイン開始
    Activated,
    /// プラグイン停止
    Stopped,
    /// 認証成功（レスポンスボディは読めた場合のみ）
    Authenticated { body: Option<String> },
    /// 送信直前のペイロード（`captured_at` はカウンタを読んだ時刻）
    PayloadPrepared {
        subject: String,
        payload: String,
        captured_at: DateTime<Utc>,
    },
    /// スキルデータ送信成功
    ReportSent { subject: String },
    /// 失敗
    Failure(ReportError),
}

/// 診断イベントの出力先
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// tracingに出力するシンク
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::Activated => tracing::info!("Plugin activated!"),
            Diagnostic::Stopped => tracing::info!("Plugin stopped!"),
            Diagnostic::Authenticated { body } => {
                tracing::info!(
                    response = body.as_deref().unwrap_or("<unreadable>"),
                    "Authentication succeeded"
                );
            }
            Diagnostic::PayloadPrepared {
                subject,
                payload,
                captured_at,
            } => {
                tracing::debug!(
                    player = %subject,
                    captured_at = %captured_at.to_rfc3339(),
                    payload = %payload,
                    "Sending skill data"
                );
            }
            Diagnostic::ReportSent { subject } => {
                tracing::info!(player = %subject, "Skill data sent successfully");
            }
            Diagnostic::Failure(error) if error.is_warning() => tracing::warn!("{}", error),
            Diagnostic::Failure(error) => tracing::error!("{}", error),
        }
    }
}
