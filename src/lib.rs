//! account-tracker: プレイヤーのスキル経験値トラッカー
//!
//! ゲームティックごとにプレイヤーの23スキルの経験値を取得し、
//! JSONにしてサーバーへ送信する。起動時には一度だけ認証リクエストを送る。

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod reporter;
pub mod skills;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// 主要な型の再エクスポート
pub use config::{Config, ConfigProvider, Credentials, SharedConfig};
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{Operation, ReportError};
pub use host::{HostEnvironment, PlayerProfile, ProfileHost, Ticker, TrackerPlugin};
pub use reporter::{Authenticator, Disposition, Reporter};
pub use skills::{CounterSource, Skill, SkillSnapshot, SKILL_COUNT};
pub use transport::{HttpTransport, SharedTransport, Transport, TransportError};

/// バージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// デフォルトの送信先URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
