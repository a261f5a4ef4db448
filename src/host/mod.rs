//! ホスト環境との接点
//!
//! プレイヤー名とスキル経験値はホストから読み取り、
//! ティックはホスト（またはTicker）から届く。

pub mod plugin;
pub mod profile;
pub mod ticker;

use crate::skills::CounterSource;

pub use plugin::TrackerPlugin;
pub use profile::{PlayerProfile, ProfileHost};
pub use ticker::Ticker;

/// ホスト環境
///
/// ホストがスレッド固定を要求する場合でも、
/// 読み取りはティック処理の中で同期的に行われる。
pub trait HostEnvironment: CounterSource {
    /// ログイン中のプレイヤー名（いなければNone）
    fn local_player_name(&self) -> Option<String>;
}
