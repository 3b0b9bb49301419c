//! End-to-end: HTTP router → aggregator → providers → mock upstream.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use multiweather::engine::Aggregator;
use multiweather::geocoding::google::GoogleGeocoder;
use multiweather::geocoding::Geocoder;
use multiweather::providers::forecastio::ForecastIo;
use multiweather::providers::openweathermap::OpenWeatherMap;
use multiweather::providers::weather_underground::WeatherUnderground;
use multiweather::providers::TemperatureProvider;
use multiweather::server::{build_router, ServiceState};

use crate::mock_upstream;
use crate::providers::{all_providers, geocoder, london_readings};

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn app(readings: mock_upstream::Readings) -> axum::Router {
    let up = mock_upstream::spawn(readings).await;
    let aggregator = Aggregator::new(all_providers(&up)).unwrap();
    build_router(Arc::new(ServiceState::new(Arc::new(aggregator), geocoder(&up))))
}

#[tokio::test]
async fn weather_route_serves_aggregate() {
    let (status, body) = get(app(london_readings()).await, "/weather/London").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["city"], "London");
    let temp = json["temp"].as_f64().unwrap();
    assert!((temp - 285.483_333_333_333_3).abs() < 1e-9);
    assert!(json["took"].as_str().is_some());
}

#[tokio::test]
async fn weather_route_fails_whole_request_on_one_failure() {
    let mut readings = london_readings();
    readings.owm_down.push("London".into());
    let (status, body) = get(app(readings).await, "/weather/London").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("OpenWeatherMap API error"), "{body}");
}

#[tokio::test]
async fn location_route_serves_coordinates() {
    let (status, body) = get(app(london_readings()).await, "/location/London").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["latitude"].as_f64().unwrap(), 51.5074);
    assert_eq!(json["longitude"].as_f64().unwrap(), -0.1278);
}

#[tokio::test]
async fn location_route_unknown_city_is_500() {
    let (status, body) = get(app(london_readings()).await, "/location/Atlantis").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("No geocoding results for Atlantis"), "{body}");
}

// -- Error bodies never carry API keys -------------------------------------

/// Nothing listens on the discard port, so every request fails in transport.
const UNREACHABLE: &str = "http://127.0.0.1:9";
const SHORT: Duration = Duration::from_millis(500);

fn key(s: &str) -> SecretString {
    SecretString::new(s.to_string())
}

async fn failing_weather_body(provider: Arc<dyn TemperatureProvider>, geo: Arc<dyn Geocoder>) -> String {
    let aggregator = Aggregator::new(vec![provider]).unwrap();
    let app = build_router(Arc::new(ServiceState::new(Arc::new(aggregator), geo)));
    let (status, body) = get(app, "/weather/London").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    body
}

fn unreachable_geocoder(secret: &str) -> Arc<dyn Geocoder> {
    Arc::new(GoogleGeocoder::new(Some(key(secret)), SHORT).unwrap().with_base_url(UNREACHABLE))
}

#[tokio::test]
async fn weather_underground_key_absent_from_error_body() {
    let wu = WeatherUnderground::new(key("WU-SECRET-KEY"), "uk".into(), SHORT)
        .unwrap()
        .with_base_url(UNREACHABLE);
    let body = failing_weather_body(Arc::new(wu), unreachable_geocoder("GEO-SECRET-KEY")).await;
    assert!(body.contains("Weather Underground request failed"), "{body}");
    assert!(!body.contains("WU-SECRET-KEY"), "{body}");
}

#[tokio::test]
async fn openweathermap_key_absent_from_error_body() {
    let owm = OpenWeatherMap::new(Some(key("OWM-SECRET-KEY")), SHORT)
        .unwrap()
        .with_base_url(UNREACHABLE);
    let body = failing_weather_body(Arc::new(owm), unreachable_geocoder("GEO-SECRET-KEY")).await;
    assert!(body.contains("OpenWeatherMap request failed"), "{body}");
    assert!(!body.contains("OWM-SECRET-KEY"), "{body}");
}

#[tokio::test]
async fn forecastio_key_absent_from_error_body() {
    // Geocoding succeeds against the mock; the forecast call cannot connect.
    let up = mock_upstream::spawn(london_readings()).await;
    let fio = ForecastIo::new(key("FIO-SECRET-KEY"), geocoder(&up), SHORT)
        .unwrap()
        .with_base_url(UNREACHABLE);
    let body = failing_weather_body(Arc::new(fio), geocoder(&up)).await;
    assert!(body.contains("Forecast.io request failed"), "{body}");
    assert!(!body.contains("FIO-SECRET-KEY"), "{body}");
}

#[tokio::test]
async fn geocoding_key_absent_from_location_error_body() {
    let owm = OpenWeatherMap::new(None, SHORT).unwrap().with_base_url(UNREACHABLE);
    let aggregator = Aggregator::new(vec![Arc::new(owm) as Arc<dyn TemperatureProvider>]).unwrap();
    let state = ServiceState::new(Arc::new(aggregator), unreachable_geocoder("GEO-SECRET-KEY"));
    let (status, body) = get(build_router(Arc::new(state)), "/location/London").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Geocoding request failed"), "{body}");
    assert!(!body.contains("GEO-SECRET-KEY"), "{body}");
}
