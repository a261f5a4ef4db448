use std::sync::Arc;

use tokio::task::JoinHandle;

use super::HostEnvironment;
use crate::config::ConfigProvider;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::ReportError;
use crate::reporter::{Authenticator, Disposition, Reporter};
use crate::transport::SharedTransport;

/// ホストに組み込まれるトラッカー本体
///
/// 起動時に認証を1回だけ投げ、以降はティックごとにスキルデータを送る。
/// 認証の成否は送信を止めない。
pub struct TrackerPlugin {
    authenticator: Authenticator,
    reporter: Reporter,
    config: Arc<dyn ConfigProvider>,
    sink: Arc<dyn DiagnosticSink>,
}

impl TrackerPlugin {
    pub fn new(
        transport: SharedTransport,
        config: Arc<dyn ConfigProvider>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            authenticator: Authenticator::new(
                transport.clone(),
                Arc::clone(&config),
                Arc::clone(&sink),
            ),
            reporter: Reporter::new(transport, Arc::clone(&config), Arc::clone(&sink)),
            config,
            sink,
        }
    }

    /// 起動処理
    ///
    /// 認証情報が揃っていなければ警告して認証をスキップする。
    /// 認証の完了は待たない。
    pub fn start_up(&self) -> Option<JoinHandle<Disposition>> {
        self.sink.record(Diagnostic::Activated);

        let credentials = self.config.credentials();
        if !credentials.is_complete() {
            self.sink.record(Diagnostic::Failure(ReportError::ConfigIncomplete));
            return None;
        }

        self.authenticator.authenticate(&credentials)
    }

    /// ティック処理
    pub fn on_tick(&self, host: &dyn HostEnvironment) -> Option<JoinHandle<Disposition>> {
        self.reporter.on_trigger(host)
    }

    /// 停止処理（送信中のリクエストはそのまま完了させる）
    pub fn shut_down(&self) {
        self.sink.record(Diagnostic::Stopped);
    }
}
