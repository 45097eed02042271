use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use cut_policy::efficiency::efficiency;
use cut_policy::env::{CuttingEnv, Episode};
use cut_policy::selector::{GreedyBestFit, Selector};
use cut_policy::stock::Stock;
use cut_policy::types::{Decision, Observation};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

const DEFAULT_MAX_STEPS: usize = 10_000;

#[derive(Deserialize, Serialize)]
struct RunRequest {
    #[serde(flatten)]
    observation: Observation,
    #[serde(default = "default_max_steps")]
    max_steps: usize,
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

#[derive(Serialize)]
struct RunResponse {
    #[serde(flatten)]
    episode: Episode,
    stocks: Vec<Stock>,
    efficiency: Vec<Option<f64>>,
}

#[derive(Serialize)]
struct EfficiencyResponse {
    efficiency: Option<f64>,
}

fn bad_request(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

async fn select(
    Json(observation): Json<Observation>,
) -> Result<Json<Decision>, (StatusCode, String)> {
    tracing::info!(
        products = observation.products.len(),
        stocks = observation.stocks.len(),
        "POST /select"
    );
    observation.validate().map_err(bad_request)?;
    Ok(Json(GreedyBestFit::default().select(&observation)))
}

async fn stock_efficiency(Json(stock): Json<Stock>) -> Json<EfficiencyResponse> {
    tracing::info!(size = %stock.size(), "POST /efficiency");
    Json(EfficiencyResponse {
        efficiency: efficiency(&stock),
    })
}

async fn run(Json(req): Json<RunRequest>) -> Result<Json<RunResponse>, (StatusCode, String)> {
    tracing::info!(
        products = req.observation.products.len(),
        stocks = req.observation.stocks.len(),
        max_steps = req.max_steps,
        "POST /run"
    );

    let mut env = CuttingEnv::from_observation(req.observation).map_err(bad_request)?;
    let episode = env.run(&GreedyBestFit::default(), req.max_steps);
    let stocks = env.into_observation().stocks;
    let efficiency: Vec<Option<f64>> = stocks.iter().map(efficiency).collect();

    Ok(Json(RunResponse {
        episode,
        stocks,
        efficiency,
    }))
}

fn main() {
    let _sentry = sentry::init((
        std::env::var("SENTRY_DSN").ok(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(serve());
}

async fn serve() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/select", post(select))
        .route("/efficiency", post(stock_efficiency))
        .route("/run", post(run))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
