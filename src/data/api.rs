//! Forecast service API integration.
//!
//! The service exposes three JSON endpoints:
//!
//! - `GET  /countries`         : available origin countries
//! - `POST /forecast`          : aggregate forecast across all countries
//! - `POST /forecast_country`  : per-country forecast
//!
//! Both forecast endpoints answer with `{ "forecast": [...] }` on success or
//! `{ "error": "..." }` when the model cannot serve the request. Points carry
//! `predicted_arrivals` as a number, a numeric string, or null; the wire
//! types here tolerate all three and leave the defaulting to the normalizer.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::domain::{CountrySelection, ForecastParams};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const ENV_API_URL: &str = "TOURCAST_API_URL";

/// Why a fetch did not produce a usable payload.
///
/// Missing or malformed `forecast` arrays are NOT errors: the decode absorbs
/// them into an absent point list and the normalizer turns that into an empty
/// (successful) series.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection-level failure before an HTTP response was read.
    #[error("forecast service unreachable: {0}")]
    Transport(String),
    /// The service answered, but with a failure: non-2xx status, an
    /// unreadable body, or an explicit `error` field in the payload.
    #[error("{0}")]
    Api(String),
}

/// A forecast point exactly as the service returned it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastPoint {
    pub year: i32,
    pub month: u32,
    #[serde(default, deserialize_with = "de_predicted_arrivals")]
    pub predicted_arrivals: Option<f64>,
}

/// Decoded body of a forecast response.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    /// `None` when the field is missing or not an array; entries that are not
    /// point objects are dropped during decode.
    #[serde(default, deserialize_with = "de_forecast_points")]
    pub forecast: Option<Vec<RawForecastPoint>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountriesPayload {
    countries: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AggregateRequest {
    start_year: i32,
    start_month: u32,
    horizon: u32,
}

#[derive(Debug, Serialize)]
struct CountryRequest {
    country: String,
    start_year: i32,
    start_month: u32,
    horizon: u32,
}

/// The seam between the orchestrator and the network.
///
/// `ForecastClient` is the production implementation; tests substitute stub
/// sources to drive request sequencing deterministically.
pub trait ForecastSource: Send + Sync {
    fn fetch_forecast(&self, params: &ForecastParams) -> Result<ForecastPayload, FetchError>;
}

#[derive(Clone)]
pub struct ForecastClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ForecastClient {
    /// Resolve the base URL: explicit override, then `TOURCAST_API_URL`
    /// (after loading `.env`), then the localhost default.
    pub fn from_env(cli_override: Option<&str>) -> Self {
        dotenvy::dotenv().ok();
        let base_url = cli_override
            .map(str::to_string)
            .or_else(|| std::env::var(ENV_API_URL).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::blocking::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the origin-country catalog.
    pub fn fetch_countries(&self) -> Result<Vec<String>, FetchError> {
        let resp = self
            .client
            .get(format!("{}/countries", self.base_url))
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(api_failure(&body, status));
        }

        let payload: CountriesPayload = resp
            .json()
            .map_err(|e| FetchError::Api(format!("unreadable country list: {e}")))?;
        Ok(payload.countries)
    }

    /// Issue the single logical forecast request for a parameter snapshot:
    /// the aggregate endpoint for `Total`, the per-country endpoint otherwise.
    pub fn fetch_forecast(&self, params: &ForecastParams) -> Result<ForecastPayload, FetchError> {
        let req = match &params.country {
            CountrySelection::Total => self
                .client
                .post(format!("{}/forecast", self.base_url))
                .json(&AggregateRequest {
                    start_year: params.start_year,
                    start_month: params.start_month,
                    horizon: params.horizon.months(),
                }),
            CountrySelection::Named(name) => self
                .client
                .post(format!("{}/forecast_country", self.base_url))
                .json(&CountryRequest {
                    country: name.clone(),
                    start_year: params.start_year,
                    start_month: params.start_month,
                    horizon: params.horizon.months(),
                }),
        };

        let resp = req.send().map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(api_failure(&body, status));
        }

        let payload: ForecastPayload = resp
            .json()
            .map_err(|e| FetchError::Api(format!("unreadable forecast response: {e}")))?;

        if let Some(message) = &payload.error {
            return Err(FetchError::Api(message.clone()));
        }

        Ok(payload)
    }
}

impl ForecastSource for ForecastClient {
    fn fetch_forecast(&self, params: &ForecastParams) -> Result<ForecastPayload, FetchError> {
        ForecastClient::fetch_forecast(self, params)
    }
}

/// Build the most specific failure message available for a non-2xx response:
/// the server-supplied `detail`/`error` field when the body is JSON, else the
/// HTTP status.
fn api_failure(body: &str, status: reqwest::StatusCode) -> FetchError {
    let detail = error_detail(body);
    FetchError::Api(detail.unwrap_or_else(|| format!("forecast service returned HTTP {status}")))
}

fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail").or_else(|| value.get("error"))? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Coerce `predicted_arrivals`: number as-is, numeric string parsed, anything
/// else (null, objects, garbage text) to `None`.
fn de_predicted_arrivals<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(de)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

/// Accept the `forecast` field only when it is an array; drop entries that do
/// not decode as points.
fn de_forecast_points<'de, D>(de: D) -> Result<Option<Vec<RawForecastPoint>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(de)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<RawForecastPoint>(item).ok())
                .collect(),
        ),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_decodes_numeric_string_and_null_arrivals() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{"forecast":[
                {"year":2026,"month":1,"predicted_arrivals":150000.5},
                {"year":2026,"month":2,"predicted_arrivals":"160000"},
                {"year":2026,"month":3,"predicted_arrivals":null},
                {"year":2026,"month":4}
            ]}"#,
        )
        .unwrap();

        let points = payload.forecast.unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].predicted_arrivals, Some(150000.5));
        assert_eq!(points[1].predicted_arrivals, Some(160000.0));
        assert_eq!(points[2].predicted_arrivals, None);
        assert_eq!(points[3].predicted_arrivals, None);
    }

    #[test]
    fn payload_absorbs_missing_or_wrong_typed_forecast_field() {
        let missing: ForecastPayload = serde_json::from_str(r#"{}"#).unwrap();
        assert!(missing.forecast.is_none());

        let wrong_type: ForecastPayload =
            serde_json::from_str(r#"{"forecast":"not an array"}"#).unwrap();
        assert!(wrong_type.forecast.is_none());
    }

    #[test]
    fn payload_drops_entries_that_are_not_points() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{"forecast":[{"year":2026,"month":1,"predicted_arrivals":10}, "junk", 42]}"#,
        )
        .unwrap();
        let points = payload.forecast.unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].year, 2026);
    }

    #[test]
    fn payload_surfaces_error_field() {
        let payload: ForecastPayload =
            serde_json::from_str(r#"{"error":"Country not found"}"#).unwrap();
        assert_eq!(payload.error.as_deref(), Some("Country not found"));
    }

    #[test]
    fn error_detail_prefers_server_text() {
        assert_eq!(
            error_detail(r#"{"detail":"model not loaded"}"#),
            Some("model not loaded".to_string())
        );
        assert_eq!(
            error_detail(r#"{"error":"Country not found"}"#),
            Some("Country not found".to_string())
        );
        // Structured detail (FastAPI validation errors) is serialized rather
        // than dropped.
        assert_eq!(
            error_detail(r#"{"detail":[{"loc":["body","horizon"]}]}"#),
            Some(r#"[{"loc":["body","horizon"]}]"#.to_string())
        );
        assert_eq!(error_detail("<html>oops</html>"), None);
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        let client = ForecastClient::new("http://example.test:8000/");
        assert_eq!(client.base_url(), "http://example.test:8000");
    }
}
