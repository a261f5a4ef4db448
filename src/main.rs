use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;

use account_tracker::{
    config::Config, HttpTransport, ProfileHost, SharedConfig, SharedTransport, Ticker,
    TracingSink, TrackerPlugin,
};

#[derive(Parser, Debug)]
#[command(name = "account-tracker")]
#[command(about = "スキル経験値をサーバーへ送信するトラッカー")]
#[command(version)]
struct Args {
    /// 設定ファイルパス
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,

    /// 送信先サーバーURL（指定時は設定の再読み込みを行わない）
    #[arg(long)]
    server_url: Option<String>,

    /// プレイヤー状態を読むプロファイルJSON
    #[arg(short, long, default_value = "profile.json")]
    profile: PathBuf,

    /// ティック間隔（ミリ秒）
    #[arg(long)]
    interval_ms: Option<u64>,

    /// 1回だけ送信して終了
    #[arg(long)]
    once: bool,

    /// 詳細ログを表示 (INFO level)
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // トレーシング初期化（デフォルトはWARN、--verboseでINFO）
    let args = Args::parse();
    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    // 設定ファイルを読み込み
    let (mut config, source) = if args.config.exists() {
        match Config::load_from_file(&args.config) {
            Ok(config) => (config, Some(args.config.clone())),
            Err(e) => {
                tracing::warn!("Failed to load config file: {}, using defaults", e);
                (Config::default(), None)
            }
        }
    } else {
        let config = Config::load_default().unwrap_or_else(|e| {
            tracing::warn!("Failed to load default config: {}, using defaults", e);
            Config::default()
        });
        (config, Some(Config::default_config_path()))
    };

    // コマンドライン引数で設定を上書き
    if let Some(url) = &args.server_url {
        config.server.url = url.clone();
    }
    if let Some(interval_ms) = args.interval_ms {
        config.ticker.interval_ms = interval_ms;
    }

    tracing::info!("account-tracker v{} starting...", account_tracker::VERSION);
    tracing::info!("Server URL: {}", config.server.url);
    tracing::info!("Profile: {}", args.profile.display());
    tracing::info!("Tick interval: {}ms", config.ticker.interval_ms);

    let ticker_config = config.ticker.clone();
    let shared = match source.filter(|_| args.server_url.is_none()) {
        Some(path) if path.exists() => SharedConfig::with_source(config, path),
        _ => SharedConfig::new(config),
    };

    // HTTPクライアントはプロセス全体で1つ
    let transport = SharedTransport::new(Arc::new(HttpTransport::new()), Handle::current());
    let plugin = TrackerPlugin::new(transport, Arc::new(shared.clone()), Arc::new(TracingSink));
    let host = ProfileHost::new(&args.profile);

    let auth = plugin.start_up();

    if args.once {
        // 終了前に送信完了を待つ
        if let Some(handle) = auth {
            handle.await?;
        }
        if let Some(handle) = plugin.on_tick(&host.poll()) {
            handle.await?;
        } else {
            tracing::warn!("No player in {}, nothing sent", host.path().display());
        }
    } else {
        let ticker = Ticker::from_config(&ticker_config);
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        };
        let delivered = ticker.run(&plugin, || host.poll(), &shared, shutdown).await;
        tracing::info!("Delivered {} ticks", delivered);
    }

    plugin.shut_down();
    Ok(())
}
