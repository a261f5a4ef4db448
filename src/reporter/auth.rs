use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use super::Disposition;
use crate::config::{ConfigProvider, Credentials};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Operation, ReportError};
use crate::transport::{HttpRequest, HttpResponse, SharedTransport, TransportError};

/// 認証エンドポイントのパス
pub const AUTHENTICATE_PATH: &str = "/authenticate";

#[derive(Serialize)]
struct AuthenticateRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// 起動時に一度だけ認証リクエストを送る
pub struct Authenticator {
    transport: SharedTransport,
    config: Arc<dyn ConfigProvider>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Authenticator {
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

    /// 認証リクエストを投げる
    ///
    /// 完了を待たずに戻る。リクエストを組み立てられなかった場合はNone。
    pub fn authenticate(&self, credentials: &Credentials) -> Option<JoinHandle<Disposition>> {
        let body = match serde_json::to_string(&AuthenticateRequest {
            username: &credentials.username,
            password: &credentials.password,
        }) {
            Ok(body) => body,
            Err(e) => {
                self.sink.record(Diagnostic::Failure(e.into()));
                return None;
            }
        };

        let url = format!("{}{}", self.config.server_url(), AUTHENTICATE_PATH);
        tracing::debug!(user = %credentials.username, url = %url, "Sending authentication request");

        let request = HttpRequest::post_json(url, body).with_body_read();
        let sink = Arc::clone(&self.sink);
        Some(
            self.transport
                .dispatch(request, move |result| complete(sink.as_ref(), result)),
        )
    }
}

fn complete(
    sink: &dyn DiagnosticSink,
    result: Result<HttpResponse, TransportError>,
) -> Disposition {
    match result {
        Ok(response) if response.is_success() => {
            sink.record(Diagnostic::Authenticated {
                body: response.body,
            });
            Disposition::Ok
        }
        Ok(response) => {
            sink.record(Diagnostic::Failure(ReportError::AuthenticationFailed {
                status: response.status,
            }));
            Disposition::Failed
        }
        Err(source) => {
            sink.record(Diagnostic::Failure(ReportError::Transport {
                operation: Operation::Authenticate,
                source,
            }));
            Disposition::Failed
        }
    }
}
