//! テスト用のスタブ

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::ReportError;
use crate::host::HostEnvironment;
use crate::skills::{CounterSource, Skill, SKILL_COUNT};
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

/// 記録した診断イベントを保持するシンク
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 条件に合うイベントの数
    pub fn count(&self, predicate: impl Fn(&Diagnostic) -> bool) -> usize {
        self.records.lock().unwrap().iter().filter(|d| predicate(d)).count()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, diagnostic: Diagnostic) {
        self.records.lock().unwrap().push(diagnostic);
    }
}

pub fn is_report_failed_for(subject: &str) -> impl Fn(&Diagnostic) -> bool + '_ {
    move |d: &Diagnostic| {
        matches!(
            d,
            Diagnostic::Failure(ReportError::ReportFailed { subject: s, .. }) if s == subject
        )
    }
}

pub fn is_config_incomplete(d: &Diagnostic) -> bool {
    matches!(d, Diagnostic::Failure(ReportError::ConfigIncomplete))
}

/// スタブの応答
#[derive(Debug, Clone, Copy)]
pub enum StubReply {
    Status(u16),
    Unreachable,
}

/// 送信内容を記録し、決まった応答を返すトランスポート
pub struct StubTransport {
    reply: StubReply,
    requests: Mutex<Vec<HttpRequest>>,
    gate: watch::Sender<bool>,
}

impl StubTransport {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
            gate: watch::Sender::new(true),
        }
    }

    /// `release` が呼ばれるまで応答を返さないトランスポート
    pub fn gated(reply: StubReply) -> Self {
        Self {
            gate: watch::Sender::new(false),
            ..Self::new(reply)
        }
    }

    /// 保留中の応答を返す
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests().into_iter().filter(|r| r.url == url).collect()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let read_body = request.read_body;
        self.requests.lock().unwrap().push(request);

        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;

        match self.reply {
            StubReply::Status(status) => Ok(HttpResponse {
                status,
                body: read_body.then(|| "ok".to_string()),
            }),
            StubReply::Unreachable => Err(TransportError::Simulated(
                "connection refused".to_string(),
            )),
        }
    }
}

/// 固定値を返すホスト
pub struct FixedHost {
    pub name: Option<String>,
    pub counters: [u32; SKILL_COUNT],
}

impl FixedHost {
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            counters: [0; SKILL_COUNT],
        }
    }

    pub fn with(mut self, skill: Skill, value: u32) -> Self {
        self.counters[skill.index()] = value;
        self
    }
}

impl CounterSource for FixedHost {
    fn experience(&self, skill: Skill) -> u32 {
        self.counters[skill.index()]
    }
}

impl HostEnvironment for FixedHost {
    fn local_player_name(&self) -> Option<String> {
        self.name.clone()
    }
}
