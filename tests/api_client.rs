//! HTTP-level tests of the weather API client against a mock provider

mod common;

use common::{current_payload, forecast_payload, test_api_config};
use skycast::{SkycastError, WeatherApiClient};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_weather_and_forecast(server: &MockServer, days: usize) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_payload("London", "GB", 51.5074, -0.1278, 14.3)),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_payload(days)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_by_coordinates_joins_current_and_forecast() {
    let server = MockServer::start().await;
    mount_weather_and_forecast(&server, 6).await;

    let client = WeatherApiClient::new(test_api_config(&server)).expect("client");
    let bundle = client.fetch_by_coordinates(51.5074, -0.1278).await.expect("bundle");

    assert_eq!(bundle.current.temperature, 14.3);
    assert_eq!(bundle.current.condition, 803);

    // Six provider days aggregate to the five-day cap
    assert_eq!(bundle.forecast.len(), 5);
    for day in &bundle.forecast {
        assert!(!day.samples.is_empty());
        assert!(day.summary.temp_min <= day.summary.temp_max);
    }

    // The caller's coordinates win; the provider confirms the name
    assert_eq!(bundle.location.name, "London");
    assert_eq!(bundle.location.country, "GB");
    assert_eq!(bundle.location.coordinates(), Some((51.5074, -0.1278)));
}

#[tokio::test]
async fn fetch_by_city_resolves_coordinates_from_response() {
    let server = MockServer::start().await;
    mount_weather_and_forecast(&server, 2).await;

    let client = WeatherApiClient::new(test_api_config(&server)).expect("client");
    let bundle = client.fetch_by_city("London").await.expect("bundle");

    assert_eq!(bundle.location.coordinates(), Some((51.5074, -0.1278)));
    // Fewer than five provider days yield fewer summaries, never padding
    assert_eq!(bundle.forecast.len(), 2);
}

#[tokio::test]
async fn not_found_is_classified_distinctly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404", "message": "city not found"
        })))
        .mount(&server)
        .await;

    let client = WeatherApiClient::new(test_api_config(&server)).expect("client");
    let err = client.fetch_by_city("Nowhereville").await.unwrap_err();
    assert_eq!(err, SkycastError::LocationNotFound);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn forecast_failure_fails_the_whole_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_payload("London", "GB", 51.5074, -0.1278, 14.3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = WeatherApiClient::new(test_api_config(&server)).expect("client");
    let err = client.fetch_by_coordinates(51.5074, -0.1278).await.unwrap_err();
    assert!(matches!(err, SkycastError::Provider { status: 500, .. }));
}

#[tokio::test]
async fn slow_provider_times_out_with_distinct_error() {
    let server = MockServer::start().await;
    // The test config uses a 1s request timeout
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_payload("London", "GB", 51.5074, -0.1278, 14.3))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = WeatherApiClient::new(test_api_config(&server)).expect("client");
    let err = client.fetch_by_coordinates(51.5074, -0.1278).await.unwrap_err();
    assert_eq!(err, SkycastError::RequestTimeout { seconds: 1 });
    assert!(err.is_retryable());
}

#[tokio::test]
async fn search_cities_maps_geocoding_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Springfield"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "Springfield", "lat": 39.8, "lon": -89.6, "country": "US", "state": "IL"},
            {"name": "Springfield", "lat": 42.1, "lon": -72.5, "country": "US", "state": "MA"}
        ])))
        .mount(&server)
        .await;

    let client = WeatherApiClient::new(test_api_config(&server)).expect("client");
    let results = client.search_cities("Springfield", 5).await.expect("results");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Springfield, IL");
    assert_eq!(results[1].name, "Springfield, MA");
}

#[tokio::test]
async fn reverse_geocode_returns_first_result_or_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "Greenwich", "lat": 51.48, "lon": 0.0, "country": "GB"}
        ])))
        .mount(&server)
        .await;

    let client = WeatherApiClient::new(test_api_config(&server)).expect("client");
    let location = client.reverse_geocode(51.48, 0.0).await.expect("result");
    assert_eq!(location.map(|l| l.name), Some("Greenwich".to_string()));

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let location = client.reverse_geocode(0.0, 0.0).await.expect("result");
    assert!(location.is_none());
}
