//! AWS Lambda handler for running simulations
//!
//! Accepts a simulation request as JSON and returns the full report with the
//! comparison table and export summary.
//!
//! Supports API Gateway proxy integrations and Lambda Function URLs.

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use aws_lambda_events::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use aws_lambda_events::http::{HeaderMap, HeaderValue, Method};
use invest_projection::catalog::{AssetCatalog, OfflineLookup};
use invest_projection::report::export_summary;
use invest_projection::simulator::{compare, ComparisonRow};
use invest_projection::{MarketAssumptions, SimulationParams, SimulationReport, Simulator};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Input for one simulation
#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    #[serde(flatten)]
    pub params: SimulationParams,

    /// Replaces the reference assumptions when given
    #[serde(default)]
    pub assumptions: Option<MarketAssumptions>,
}

/// Output of one simulation
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub report: SimulationReport,
    pub comparison: Vec<ComparisonRow>,
    pub summary: Vec<(String, String)>,
    pub execution_time_ms: u64,
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers
}

fn respond(status: i64, body: Option<String>) -> ApiGatewayProxyResponse {
    let mut headers = cors_headers();
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    ApiGatewayProxyResponse {
        status_code: status,
        headers,
        body: body.map(Body::Text),
        ..Default::default()
    }
}

fn error_response(status: i64, message: &str) -> ApiGatewayProxyResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    respond(status, Some(body))
}

/// Run a parsed request
fn simulate(request: SimulationRequest) -> invest_projection::Result<SimulationResponse> {
    let start = std::time::Instant::now();
    let assumptions = request
        .assumptions
        .unwrap_or_else(MarketAssumptions::default_reference);

    let simulator = Simulator::new(assumptions, AssetCatalog::seeded(), OfflineLookup);
    let report = simulator.run(&request.params)?;

    Ok(SimulationResponse {
        comparison: compare(&report),
        summary: export_summary(&report),
        report,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

/// Lambda handler function
async fn handler(
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let request = event.payload;

    // Handle CORS preflight
    if request.http_method == Method::OPTIONS {
        return Ok(respond(200, None));
    }

    if request.is_base64_encoded {
        return Ok(error_response(400, "Base64-encoded bodies are not supported"));
    }

    let body = request.body.as_deref().unwrap_or("{}");
    let parsed: SimulationRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            warn!("Rejected request: {}", e);
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    match simulate(parsed) {
        Ok(response) => {
            info!(
                "Simulated {} modalities in {} ms",
                response.report.modalities.len(),
                response.execution_time_ms
            );
            Ok(respond(200, Some(serde_json::to_string(&response)?)))
        }
        Err(e) => Ok(error_response(400, &e.to_string())),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_with_defaults() {
        let json = r#"{
            "monthly_investment": 1000.0,
            "start": "2024-01-01",
            "end": "2029-01-01",
            "modalities": ["selic", "cdb"],
            "financial_goal": 100000.0
        }"#;
        let request: SimulationRequest = serde_json::from_str(json).unwrap();
        assert!(request.assumptions.is_none());

        let response = simulate(request).unwrap();
        assert_eq!(response.report.modalities.len(), 2);
        assert_eq!(response.comparison.len(), 2);
        assert_eq!(response.summary[0].0, "Economic scenario");
    }

    #[test]
    fn test_inverted_dates_fail() {
        let json = r#"{"monthly_investment": 100.0, "start": "2029-01-01", "end": "2024-01-01"}"#;
        let request: SimulationRequest = serde_json::from_str(json).unwrap();
        assert!(simulate(request).is_err());
    }

    #[test]
    fn test_error_body() {
        let response = error_response(400, "Invalid JSON: oops");
        assert_eq!(response.status_code, 400);
        match response.body {
            Some(Body::Text(text)) => assert_eq!(text, r#"{"error":"Invalid JSON: oops"}"#),
            other => panic!("unexpected body {other:?}"),
        }
    }
}
