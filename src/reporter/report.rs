use std::sync::Arc;

use tokio::task::JoinHandle;

use super::Disposition;
use crate::config::ConfigProvider;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Operation, ReportError};
use crate::host::HostEnvironment;
use crate::skills::{serialize, SkillSnapshot};
use crate::transport::{HttpRequest, HttpResponse, SharedTransport, TransportError};

/// スキルデータ送信エンドポイントのパス
pub const PLAYERDATA_PATH: &str = "/playerdata";

/// ティックごとにスキルデータを送信する
///
/// 送信は投げっぱなしで、前回の送信の完了は待たない。
pub struct Reporter {
    transport: SharedTransport,
    config: Arc<dyn ConfigProvider>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Reporter {
    pub fn new(
        transport: SharedTransport,
        config: Arc<dyn ConfigProvider>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            transport,
            config,
            sink,
        }
    }

    /// ティック時の処理
    ///
    /// ホストからの読み取りはこの呼び出しの中で同期的に行う。
    /// プレイヤーがいない、またはシリアライズに失敗した場合はNone。
    pub fn on_trigger(&self, host: &dyn HostEnvironment) -> Option<JoinHandle<Disposition>> {
        let subject = host.local_player_name();
        let snapshot = SkillSnapshot::capture(subject.as_deref(), host)?;
        self.report(snapshot)
    }

    /// 取得済みのスナップショットを送信
    pub fn report(&self, snapshot: SkillSnapshot) -> Option<JoinHandle<Disposition>> {
        let payload = match serialize(&snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                self.sink.record(Diagnostic::Failure(e));
                return None;
            }
        };

        let subject = snapshot.subject().to_string();
        self.sink.record(Diagnostic::PayloadPrepared {
            subject: subject.clone(),
            payload: payload.clone(),
            captured_at: snapshot.captured_at(),
        });

        let url = format!("{}{}", self.config.server_url(), PLAYERDATA_PATH);
        let request = HttpRequest::post_json(url, payload);
        let sink = Arc::clone(&self.sink);
        Some(
            self.transport
                .dispatch(request, move |result| complete(sink.as_ref(), subject, result)),
        )
    }
}

fn complete(
    sink: &dyn DiagnosticSink,
    subject: String,
    result: Result<HttpResponse, TransportError>,
) -> Disposition {
    match result {
        Ok(response) if response.is_success() => {
            sink.record(Diagnostic::ReportSent { subject });
            Disposition::Ok
        }
        Ok(response) => {
            sink.record(Diagnostic::Failure(ReportError::ReportFailed {
                subject,
                status: response.status,
            }));
            Disposition::Failed
        }
        Err(source) => {
            sink.record(Diagnostic::Failure(ReportError::Transport {
                operation: Operation::Report { subject },
                source,
            }));
            Disposition::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SharedConfig};
    use crate::skills::{Skill, SKILL_COUNT};
    use crate::testing::{is_report_failed_for, FixedHost, MemorySink, StubReply, StubTransport};
    use tokio::runtime::Handle;

    fn reporter_with(
        reply: StubReply,
        config: Arc<dyn ConfigProvider>,
    ) -> (Reporter, Arc<StubTransport>, Arc<MemorySink>) {
        let stub = Arc::new(StubTransport::new(reply));
        let sink = Arc::new(MemorySink::new());
        let reporter = Reporter::new(
            SharedTransport::new(stub.clone(), Handle::current()),
            config,
            sink.clone(),
        );
        (reporter, stub, sink)
    }

    fn reporter(reply: StubReply) -> (Reporter, Arc<StubTransport>, Arc<MemorySink>) {
        reporter_with(reply, Arc::new(Config::default()))
    }

    #[tokio::test]
    async fn test_sends_expected_payload() {
        let (reporter, stub, sink) = reporter(StubReply::Status(200));
        let host = FixedHost::new(Some("Zezima")).with(Skill::Attack, 1000);

        let disposition = reporter.on_trigger(&host).unwrap().await.unwrap();
        assert_eq!(disposition, Disposition::Ok);

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://localhost:8080/playerdata");
        assert_eq!(requests[0].content_type, "application/json");
        let prefix = r#"{"playerName":"Zezima","agility_xp":0,"attack_xp":1000,"#;
        assert!(requests[0].body.starts_with(prefix));
        assert!(requests[0].body.ends_with(r#""woodcutting_xp":0}"#));
        assert!(!requests[0].read_body);

        assert_eq!(
            sink.count(|d| matches!(d, Diagnostic::ReportSent { subject } if subject == "Zezima")),
            1
        );
    }

    #[tokio::test]
    async fn test_payload_diagnostic_carries_capture_time() {
        let (reporter, stub, sink) = reporter(StubReply::Status(200));
        let host = FixedHost::new(Some("Zezima")).with(Skill::Magic, 42);
        let snapshot = SkillSnapshot::capture(Some("Zezima"), &host).unwrap();
        let captured_at = snapshot.captured_at();

        reporter.report(snapshot).unwrap().await.unwrap();

        let payload = stub.requests()[0].body.clone();
        assert_eq!(
            sink.count(|d| matches!(
                d,
                Diagnostic::PayloadPrepared { subject, payload: p, captured_at: at }
                    if subject == "Zezima" && *p == payload && *at == captured_at
            )),
            1
        );
    }

    #[tokio::test]
    async fn test_no_player_is_noop() {
        let (reporter, stub, sink) = reporter(StubReply::Status(200));

        assert!(reporter.on_trigger(&FixedHost::new(None)).is_none());
        assert!(reporter.on_trigger(&FixedHost::new(Some(""))).is_none());

        assert!(stub.requests().is_empty());
        assert_eq!(sink.len(), 0);
    }

    #[tokio::test]
    async fn test_server_error_logs_one_failure() {
        let (reporter, _stub, sink) = reporter(StubReply::Status(500));
        let host = FixedHost::new(Some("Zezima"));

        let disposition = reporter.on_trigger(&host).unwrap().await.unwrap();

        assert_eq!(disposition, Disposition::Failed);
        assert_eq!(sink.count(is_report_failed_for("Zezima")), 1);
        assert_eq!(
            sink.count(|d| matches!(
                d,
                Diagnostic::Failure(ReportError::ReportFailed { status: 500, .. })
            )),
            1
        );
    }

    #[tokio::test]
    async fn test_transport_failure_names_player() {
        let (reporter, _stub, sink) = reporter(StubReply::Unreachable);

        let disposition = reporter
            .on_trigger(&FixedHost::new(Some("Woox")))
            .unwrap()
            .await
            .unwrap();

        assert_eq!(disposition, Disposition::Failed);
        assert_eq!(
            sink.count(|d| matches!(
                d,
                Diagnostic::Failure(ReportError::Transport {
                    operation: Operation::Report { subject },
                    ..
                }) if subject == "Woox"
            )),
            1
        );
    }

    #[tokio::test]
    async fn test_wrong_counter_count_is_not_sent() {
        let (reporter, stub, sink) = reporter(StubReply::Status(200));

        let handle = reporter.report(SkillSnapshot::new("Zezima", vec![0; SKILL_COUNT - 3]));

        assert!(handle.is_none());
        assert!(stub.requests().is_empty());
        assert_eq!(
            sink.count(|d| matches!(d, Diagnostic::Failure(ReportError::Serialization { .. }))),
            1
        );
    }

    #[tokio::test]
    async fn test_overlapping_triggers_are_independent() {
        let (reporter, stub, sink) = reporter(StubReply::Status(500));

        let handles: Vec<_> = ["A", "B", "A"]
            .iter()
            .filter_map(|name| reporter.on_trigger(&FixedHost::new(Some(*name))))
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap(), Disposition::Failed);
        }

        assert_eq!(stub.requests().len(), 3);
        assert_eq!(sink.count(is_report_failed_for("A")), 2);
        assert_eq!(sink.count(is_report_failed_for("B")), 1);
    }

    #[tokio::test]
    async fn test_server_url_is_read_per_request() {
        let shared = SharedConfig::new(Config::default());
        let (reporter, stub, _sink) = reporter_with(StubReply::Status(200), Arc::new(shared.clone()));
        let host = FixedHost::new(Some("Zezima"));

        reporter.on_trigger(&host).unwrap().await.unwrap();

        let mut updated = Config::default();
        updated.server.url = "http://tracker.example".to_string();
        shared.replace(updated);
        reporter.on_trigger(&host).unwrap().await.unwrap();

        let urls: Vec<String> = stub.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:8080/playerdata".to_string(),
                "http://tracker.example/playerdata".to_string(),
            ]
        );
    }
}
