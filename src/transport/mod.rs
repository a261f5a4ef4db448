//! HTTP送信層
//!
//! 認証とスキル送信で共有する単一のHTTPクライアントと、
//! 完了を待たずに送信を投げるためのディスパッチャを提供する。

pub mod client;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub use client::HttpTransport;

/// JSONのContent-Type
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// 送信するPOSTリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub content_type: &'static str,
    pub body: String,
    /// レスポンスボディを読むかどうか（読まない場合は破棄して接続を解放）
    pub read_body: bool,
}

impl HttpRequest {
    /// JSONボディのPOSTリクエストを作成
    pub fn post_json(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: JSON_CONTENT_TYPE,
            body: body.into(),
            read_body: false,
        }
    }

    /// レスポンスボディも受け取る
    pub fn with_body_read(mut self) -> Self {
        self.read_body = true;
        self
    }
}

/// 受信済みのレスポンス
///
/// 接続はすでに解放されている。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// ボディ（読まなかった・読み取りに失敗した場合はNone）
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// ネットワークレベルのエラー
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[cfg(test)]
    #[error("simulated network failure: {0}")]
    Simulated(String),
}

/// HTTP送信トレイト
#[async_trait]
pub trait Transport: Send + Sync {
    /// リクエストを送信し、ステータス（と要求されたボディ）を受信する
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// プロセス全体で共有する送信口
///
/// 送信は生成時に渡したランタイム上で実行されるため、
/// ランタイム外のスレッド（ホストのティックスレッド）からでも呼び出せる。
#[derive(Clone)]
pub struct SharedTransport {
    inner: Arc<dyn Transport>,
    runtime: Handle,
}

impl SharedTransport {
    pub fn new(inner: Arc<dyn Transport>, runtime: Handle) -> Self {
        Self { inner, runtime }
    }

    /// リクエストを非同期に送信し、完了時に `on_complete` を呼ぶ
    ///
    /// 呼び出しは即座に戻る。返されたハンドルは待っても捨ててもよい。
    pub fn dispatch<T, F>(&self, request: HttpRequest, on_complete: F) -> JoinHandle<T>
    where
        F: FnOnce(Result<HttpResponse, TransportError>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        self.runtime.spawn(async move { on_complete(inner.send(request).await) })
    }
}
