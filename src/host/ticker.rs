use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};

use super::{HostEnvironment, TrackerPlugin};
use crate::config::{SharedConfig, TickerConfig};

/// 一定間隔でティックを配送するドライバ
pub struct Ticker {
    period: Duration,
    reload_every: Option<Duration>,
    max_ticks: Option<u64>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            reload_every: None,
            max_ticks: None,
        }
    }

    /// 設定からドライバを作成
    pub fn from_config(config: &TickerConfig) -> Self {
        let reload_every =
            (config.reload_secs > 0).then(|| Duration::from_secs(config.reload_secs));
        Self {
            period: Duration::from_millis(config.interval_ms.max(1)),
            reload_every,
            max_ticks: None,
        }
    }

    /// 指定回数で停止する
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// ティックを配送する
    ///
    /// `poll_host` は毎ティック呼ばれ、その時点のホスト状態を返す。
    /// `shutdown` が完了するか上限に達するまで続け、配送したティック数を返す。
    pub async fn run<F, H, S>(
        &self,
        plugin: &TrackerPlugin,
        mut poll_host: F,
        config: &SharedConfig,
        shutdown: S,
    ) -> u64
    where
        F: FnMut() -> H,
        H: HostEnvironment,
        S: Future<Output = ()>,
    {
        let mut ticks = interval(self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut reload = self.reload_every.map(|period| {
            let mut reload = interval_at(Instant::now() + period, period);
            reload.set_missed_tick_behavior(MissedTickBehavior::Skip);
            reload
        });

        tokio::pin!(shutdown);
        let mut delivered = 0;

        loop {
            if self.max_ticks.is_some_and(|max| delivered >= max) {
                break;
            }

            // 停止要求をティックより先に見る
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested after {} ticks", delivered);
                    break;
                }
                _ = ticks.tick() => {
                    let host = poll_host();
                    // 送信完了は待たない
                    let _ = plugin.on_tick(&host);
                    delivered += 1;
                }
                _ = next_reload(&mut reload) => {
                    if let Err(e) = config.reload() {
                        tracing::warn!("Failed to reload config: {:#}", e);
                    }
                }
            }
        }

        delivered
    }
}

async fn next_reload(reload: &mut Option<Interval>) {
    match reload {
        Some(reload) => {
            reload.tick().await;
        }
        None => std::future::pending().await,
    }
}
