use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use rustcost_console::{AppState, config, routes};

const DEFAULT_CONFIG_PATH: &str = "/etc/rustcost-console/config.yaml";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rustcost_console=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let explicit_path = args
        .iter()
        .position(|a| a == "-config" || a == "--config")
        .and_then(|i| args.get(i + 1).cloned())
        .or_else(|| args.first().filter(|a| !a.starts_with('-')).cloned());

    let cfg = match &explicit_path {
        Some(path) => config::Config::load(&PathBuf::from(path)).unwrap_or_else(|e| {
            eprintln!("error loading config: {}", e);
            std::process::exit(1);
        }),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                config::Config::load(&default_path).unwrap_or_else(|e| {
                    eprintln!("error loading config: {}", e);
                    std::process::exit(1);
                })
            } else {
                config::Config::default()
            }
        }
    };

    info!("using metrics backend {}", cfg.backend.base_url);

    let listen_addr = cfg.listen_addr();
    let state = AppState::new(cfg);
    let router = routes::build_router(state);

    let listener = TcpListener::bind(&listen_addr).await.unwrap_or_else(|e| {
        eprintln!("failed to bind {}: {}", listen_addr, e);
        std::process::exit(1);
    });

    info!("rustcost-console listening on {}", listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            eprintln!("server error: {}", e);
            std::process::exit(1);
        });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
