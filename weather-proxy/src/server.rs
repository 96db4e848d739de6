use std::{convert::Infallible, sync::Arc};

use anyhow::{Context, Result};
use warp::{
    Filter, Rejection, Reply,
    http::{StatusCode, header::CONTENT_TYPE},
};

use crate::{
    config::ProxyConfig,
    relay::{RelayOutcome, relay},
    upstream::Upstream,
};

/// `GET /api/weather?city=..` or `GET /api/weather?lat=..&lon=..`.
pub fn routes(
    upstream: Arc<Upstream>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::get()
        .and(warp::path!("api" / "weather"))
        .and(warp::query::<Vec<(String, String)>>())
        .and(warp::any().map(move || upstream.clone()))
        .and_then(|params: Vec<(String, String)>, upstream: Arc<Upstream>| async move {
            let outcome = relay(&upstream, &params).await;
            Ok::<_, Infallible>(into_response(outcome))
        })
        .with(warp::trace::named("weather"))
}

fn into_response(outcome: RelayOutcome) -> warp::reply::Response {
    match outcome {
        RelayOutcome::Forward { status, body } => {
            let status = StatusCode::from_u16(status)
                .unwrap_or(StatusCode::BAD_GATEWAY);
            let body = warp::reply::with_header(body, CONTENT_TYPE, "application/json");
            warp::reply::with_status(body, status).into_response()
        }
        RelayOutcome::Failure { status, body } => {
            let status = StatusCode::from_u16(status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            warp::reply::with_status(warp::reply::json(&body), status)
                .into_response()
        }
    }
}

/// Serve until Ctrl-C.
pub async fn run(config: ProxyConfig) -> Result<()> {
    let upstream = Arc::new(Upstream::new(
        config.upstream_url.clone(),
        config.api_key.clone(),
    ));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
    };

    let (addr, server) = warp::serve(routes(upstream))
        .try_bind_with_graceful_shutdown(config.listen, shutdown)
        .with_context(|| format!("Failed to bind {}", config.listen))?;

    tracing::info!("Weather proxy listening on http://{}", addr);
    tracing::info!("Forwarding to {}", config.upstream_url);
    server.await;
    tracing::info!("Weather proxy stopped");

    Ok(())
}
