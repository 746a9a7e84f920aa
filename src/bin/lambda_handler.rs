//! AWS Lambda handler for running a single illustration
//!
//! Accepts an illustration request as JSON and returns the formatted
//! ledger response. Invalid input yields a 400 with `{"error": ...}`.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use annuity_illustration::projection::IndexReturnModel;
use annuity_illustration::{IllustrationConfig, IllustrationRequest, IllustrationRunner, ProductConstants};
use lambda_http::http::StatusCode;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;

/// Request envelope: the illustration request plus optional run settings
#[derive(Debug, Deserialize)]
struct LambdaRequest {
    #[serde(flatten)]
    request: IllustrationRequest,

    /// Seed for the FIA index return stub
    #[serde(default)]
    seed: Option<u64>,
}

fn cors(builder: lambda_http::http::response::Builder) -> lambda_http::http::response::Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn json_response(status: StatusCode, body: String) -> Result<Response<Body>, Error> {
    Ok(cors(Response::builder())
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(body))?)
}

fn error_response(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    json_response(status, json!({ "error": message }).to_string())
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(cors(Response::builder()).status(StatusCode::OK).body(Body::Empty)?);
    }

    if event.method().as_str() != "POST" {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, "Only POST is supported");
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let envelope: LambdaRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => {
            warn!("Invalid request JSON: {}", e);
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON: {}", e));
        }
    };

    let mut config = IllustrationConfig::default();
    if let Some(seed) = envelope.seed {
        config.index_returns = IndexReturnModel::Stochastic { seed };
    }
    let runner = IllustrationRunner::with_constants(ProductConstants::default()).with_config(config);

    let response = match runner.run(&envelope.request) {
        Ok(response) => response,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    info!("Illustration completed in {} ms", start.elapsed().as_millis());

    json_response(StatusCode::OK, serde_json::to_string(&response)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
