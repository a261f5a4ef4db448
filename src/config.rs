//! 設定ファイル管理モジュール
//!
//! default.tomlから設定を読み込み、送信先URLと認証情報を提供します。
//! 送信先URLはリクエストごとに読み直すため、再読み込みした設定は次の送信から反映されます。

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// アプリケーション全体の設定
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// 送信先サーバー設定
    #[serde(default)]
    pub server: ServerConfig,
    /// 認証設定
    #[serde(default)]
    pub auth: AuthConfig,
    /// ティック設定
    #[serde(default)]
    pub ticker: TickerConfig,
}

/// 送信先サーバー設定
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// サーバーのベースURL（末尾スラッシュなし）
    #[serde(default = "default_server_url")]
    pub url: String,
}

/// 認証設定
#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// ティック設定
#[derive(Debug, Clone, Deserialize)]
pub struct TickerConfig {
    /// ティック間隔（ミリ秒）
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// 設定ファイルの再読み込み間隔（秒）、0で無効
    #[serde(default = "default_reload_secs")]
    pub reload_secs: u64,
}

/// 認証情報
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// ユーザー名とパスワードが両方設定されているか
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

// パスワードはログに出さない
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AuthConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

// デフォルト値を返す関数群
fn default_server_url() -> String {
    crate::DEFAULT_SERVER_URL.to_string()
}

fn default_interval_ms() -> u64 {
    600 // 1ゲームティック
}

fn default_reload_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            reload_secs: default_reload_secs(),
        }
    }
}

impl Config {
    /// TOMLファイルから設定を読み込む
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// TOML文字列から設定をパース
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML config")
    }

    /// デフォルト設定ファイルパスを取得
    pub fn default_config_path() -> PathBuf {
        if let Ok(config_path) = std::env::var("ACCOUNT_TRACKER_CONFIG") {
            return PathBuf::from(config_path);
        }

        // カレントディレクトリのconfig/default.toml
        let cwd_config = PathBuf::from("config/default.toml");
        if cwd_config.exists() {
            return cwd_config;
        }

        // ホームディレクトリの.account-tracker/config.toml
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".account-tracker").join("config.toml");
            if home_config.exists() {
                return home_config;
            }
        }

        PathBuf::from("config/default.toml")
    }

    /// デフォルト設定ファイルから読み込み（存在しない場合は自動生成）
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            if let Err(e) = Self::create_default_config(&config_path) {
                tracing::warn!("Failed to create default config: {}", e);
            } else {
                tracing::info!("Created default config at {}", config_path.display());
            }
            Ok(Self::default())
        }
    }

    /// デフォルト設定ファイルを生成
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let default_content = r#"# account-tracker default configuration

[server]
url = "http://localhost:8080"   # no trailing slash

[auth]
username = ""
password = ""

[ticker]
interval_ms = 600   # one game tick
reload_secs = 30    # 0 disables config reload
"#;

        std::fs::write(path, default_content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

/// 読み取り専用の設定プロバイダ
///
/// 呼び出しごとに現在の値を返す。
pub trait ConfigProvider: Send + Sync {
    /// 送信先のベースURL
    fn server_url(&self) -> String;

    /// 認証情報
    fn credentials(&self) -> Credentials;
}

impl ConfigProvider for Config {
    fn server_url(&self) -> String {
        self.server.url.clone()
    }

    fn credentials(&self) -> Credentials {
        self.auth.credentials()
    }
}

/// 実行中に差し替え可能な共有設定
#[derive(Clone)]
pub struct SharedConfig {
    current: Arc<RwLock<Config>>,
    source: Option<PathBuf>,
}

impl SharedConfig {
    pub fn new(config: Config) -> Self {
        Self {
            current: Arc::new(RwLock::new(config)),
            source: None,
        }
    }

    /// 再読み込み元のファイルを指定して作成
    pub fn with_source(config: Config, source: impl Into<PathBuf>) -> Self {
        Self {
            current: Arc::new(RwLock::new(config)),
            source: Some(source.into()),
        }
    }

    /// 現在の設定のコピー
    pub fn snapshot(&self) -> Config {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 設定を差し替える
    pub fn replace(&self, config: Config) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// 元のファイルから読み直す
    ///
    /// 読み込み元がない場合はfalseを返す。失敗時は現在の設定を維持する。
    pub fn reload(&self) -> Result<bool> {
        let Some(path) = &self.source else {
            return Ok(false);
        };

        let config = Config::load_from_file(path)?;
        self.replace(config);
        tracing::debug!("Reloaded config from {}", path.display());
        Ok(true)
    }
}

impl ConfigProvider for SharedConfig {
    fn server_url(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .server
            .url
            .clone()
    }

    fn credentials(&self) -> Credentials {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .auth
            .credentials()
    }
}
