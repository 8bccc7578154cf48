//! Diabetes risk prediction service.
//!
//! Loads the model artefact once, then serves `POST /predict` until Ctrl-C.

use std::process;

use diabetes_predictor::api;
use diabetes_predictor::common::config::AppCfg;
use diabetes_predictor::common::log;
use diabetes_predictor::{ModelHandle, Predictor};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cfg = AppCfg::load();
    log::init(&cfg.log_filter, cfg.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        model_path = %cfg.model_path.display(),
        bind_addr = %cfg.bind_addr,
        strictness = ?cfg.strictness,
        "starting diabetes-predictor"
    );

    let model = match ModelHandle::load(&cfg.model_path) {
        Ok(model) => model,
        Err(err) => {
            error!(ev = "startup_failed", code = err.code().as_u32(), error = %err);
            eprintln!("Startup Error: {err}");
            process::exit(2);
        }
    };

    let app = api::router(Predictor::new(model, cfg.strictness));

    let listener = match tokio::net::TcpListener::bind(&cfg.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(ev = "bind_failed", bind_addr = %cfg.bind_addr, error = %err);
            eprintln!("Bind Error: cannot listen on {}: {err}", cfg.bind_addr);
            process::exit(1);
        }
    };
    info!(ev = "listening", bind_addr = %cfg.bind_addr, "ready to serve");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(ev = "server_failed", error = %err);
        process::exit(1);
    }
    info!(ev = "shutdown", "server stopped");
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(ev = "signal_failed", error = %err);
        std::future::pending::<()>().await;
    }
}
