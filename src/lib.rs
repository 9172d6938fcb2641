pub mod api;
pub mod cms;
pub mod config;
pub mod content;
pub mod error;
pub mod pagination;
pub mod state;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use config::Settings;
use state::AppState;

/// 初始化日志，日志级别由 `ZEROBLOG_LOG` 控制
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("ZEROBLOG_LOG"))
        .init();
}

pub async fn run() -> error::Result<()> {
    init_tracing();

    let settings = Settings::from_env()?;
    let cms = settings.cms_client()?;
    let listen = settings.server.listen.clone();

    let app = AppState::new(cms, settings);

    api::run_server(app, &listen).await
}
