//! End-to-end scan tests against a wiremock lightning provider.
//!
//! Each station is routed by its `lightning/{lat},{lon}` path so tests can
//! give stations different responses inside one scan.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;
use strikewatch_core::{ProviderCredentials, Station};
use strikewatch_lightning::{
    haversine_km, ScanError, ScanOrchestrator, ScanRequest, StrikeClient, StrikeType,
};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator(base_url: &str) -> ScanOrchestrator {
    let credentials = ProviderCredentials {
        client_id: "test-id".to_string(),
        client_secret: "test-secret".to_string(),
    };
    let client =
        StrikeClient::with_base_url(Some(credentials), 5, "strikewatch-test/0.1", base_url)
            .expect("client construction should not fail");
    ScanOrchestrator::new(client, 4)
}

fn station(name: &str, lat: f64, lon: f64) -> Station {
    Station {
        name: name.to_string(),
        lat,
        lon,
    }
}

fn strike(lat: f64, lon: f64, ts: &str, kind: &str) -> serde_json::Value {
    json!({
        "lat": lat,
        "lon": lon,
        "dateTime": ts,
        "type": kind,
        "amp": -9_800.0,
        "polarity": "-"
    })
}

fn ok_body(strikes: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "success": true, "error": null, "response": strikes })
}

async fn mount_station(server: &MockServer, lat_lon: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/lightning/{lat_lon}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 3, 30, 0).unwrap()
}

#[tokio::test]
async fn single_station_reports_nearest_distance_and_point() {
    let server = MockServer::start().await;
    mount_station(
        &server,
        "-42,147",
        ok_body(vec![strike(-42.01, 147.01, "2025-01-15T03:10:00Z", "cg")]),
    )
    .await;

    let stations = vec![station("A", -42.0, 147.0)];
    let request = ScanRequest::new(30, 50.0, false).unwrap();
    let result = orchestrator(&server.uri())
        .scan_at(&request, &stations, now())
        .await
        .expect("scan should succeed");

    assert_eq!(result.updated_at, "2025-01-15T03:30:00Z");
    assert_eq!(result.minutes, 30);
    assert_eq!(result.results.len(), 1);
    let nearest = result.results[0].nearest_km.expect("nearest distance");
    assert!((nearest - 1.4).abs() < 0.05, "got {nearest}");
    assert_eq!(result.points.len(), 1);
    assert!(result.results[0].error.is_none());
}

#[tokio::test]
async fn station_without_strikes_has_null_nearest() {
    let server = MockServer::start().await;
    mount_station(&server, "-42,147", ok_body(vec![])).await;

    let stations = vec![station("A", -42.0, 147.0)];
    let request = ScanRequest::new(15, 20.0, false).unwrap();
    let result = orchestrator(&server.uri())
        .scan_at(&request, &stations, now())
        .await
        .unwrap();

    assert_eq!(result.results[0].nearest_km, None);
    assert!(result.results[0].strikes.is_empty());
    assert!(result.points.is_empty());
}

#[tokio::test]
async fn shared_strike_across_stations_appears_once_in_points() {
    let server = MockServer::start().await;
    let shared = strike(-41.5, 146.5, "2025-01-15T03:12:00Z", "cg");
    mount_station(&server, "-42,147", ok_body(vec![shared.clone()])).await;
    mount_station(&server, "-41,146", ok_body(vec![shared])).await;

    let stations = vec![station("A", -42.0, 147.0), station("B", -41.0, 146.0)];
    let request = ScanRequest::new(30, 100.0, false).unwrap();
    let result = orchestrator(&server.uri())
        .scan_at(&request, &stations, now())
        .await
        .unwrap();

    assert_eq!(result.results[0].strikes.len(), 1);
    assert_eq!(result.results[1].strikes.len(), 1);
    assert_eq!(result.points.len(), 1);

    let keys: HashSet<String> = result
        .points
        .iter()
        .map(|p| format!("{:.4}|{:.4}|{}", p.lat, p.lon, p.date_time))
        .collect();
    assert_eq!(keys.len(), result.points.len());
}

#[tokio::test]
async fn nearest_is_minimum_over_own_strikes_only() {
    let server = MockServer::start().await;
    mount_station(
        &server,
        "-42,147",
        ok_body(vec![
            strike(-42.3, 147.0, "t1", "cg"),
            strike(-42.05, 147.0, "t2", "cg"),
        ]),
    )
    .await;
    mount_station(
        &server,
        "-41,146",
        ok_body(vec![strike(-41.001, 146.0, "t3", "cg")]),
    )
    .await;

    let stations = vec![station("A", -42.0, 147.0), station("B", -41.0, 146.0)];
    let request = ScanRequest::new(30, 50.0, false).unwrap();
    let result = orchestrator(&server.uri())
        .scan_at(&request, &stations, now())
        .await
        .unwrap();

    let expected_a = haversine_km(-42.0, 147.0, -42.05, 147.0);
    let nearest_a = result.results[0].nearest_km.unwrap();
    assert!((nearest_a - expected_a).abs() < 1e-9);
    assert!(nearest_a.is_finite() && nearest_a >= 0.0);
    assert_eq!(result.points.len(), 3);
}

#[tokio::test]
async fn provider_failure_for_one_station_does_not_affect_others() {
    let server = MockServer::start().await;
    mount_station(
        &server,
        "-42,147",
        json!({
            "success": false,
            "error": { "code": "maxhits_min", "description": "Maximum hits per minute exceeded" }
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/lightning/-43,148"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;
    mount_station(
        &server,
        "-41,146",
        ok_body(vec![strike(-41.02, 146.02, "t1", "cg")]),
    )
    .await;

    let stations = vec![
        station("A", -42.0, 147.0),
        station("C", -43.0, 148.0),
        station("B", -41.0, 146.0),
    ];
    let request = ScanRequest::new(30, 50.0, false).unwrap();
    let result = orchestrator(&server.uri())
        .scan_at(&request, &stations, now())
        .await
        .expect("per-station failures must not fail the scan");

    let a = &result.results[0];
    assert_eq!(a.station, "A");
    assert!(a.strikes.is_empty());
    assert_eq!(a.nearest_km, None);
    let a_err = a.error.as_ref().expect("A degraded");
    assert_eq!(a_err.code.as_deref(), Some("maxhits_min"));
    assert_eq!(a_err.description, "Maximum hits per minute exceeded");

    let c = &result.results[1];
    assert_eq!(
        c.error.as_ref().map(|e| e.description.as_str()),
        Some("request failed")
    );

    let b = &result.results[2];
    assert!(b.error.is_none());
    assert_eq!(b.strikes.len(), 1);
    assert!(b.nearest_km.is_some());
    assert_eq!(result.points.len(), 1);
}

#[tokio::test]
async fn results_keep_station_order_when_responses_arrive_out_of_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lightning/-42,147"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body(vec![strike(-42.01, 147.0, "slow", "cg")]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_station(
        &server,
        "-41,146",
        ok_body(vec![strike(-41.01, 146.0, "fast", "cg")]),
    )
    .await;

    let stations = vec![station("Slow", -42.0, 147.0), station("Fast", -41.0, 146.0)];
    let request = ScanRequest::new(30, 50.0, false).unwrap();
    let result = orchestrator(&server.uri())
        .scan_at(&request, &stations, now())
        .await
        .unwrap();

    let names: Vec<&str> = result.results.iter().map(|r| r.station.as_str()).collect();
    assert_eq!(names, vec!["Slow", "Fast"]);
    let order: Vec<&str> = result.points.iter().map(|p| p.date_time.as_str()).collect();
    assert_eq!(order, vec!["slow", "fast"]);
}

#[tokio::test]
async fn default_scan_requests_cloud_to_ground_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("filter", "cg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body(vec![strike(-42.01, 147.0, "t1", "cg")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let stations = vec![station("A", -42.0, 147.0)];
    let request = ScanRequest::new(30, 50.0, false).unwrap();
    let result = orchestrator(&server.uri())
        .scan_at(&request, &stations, now())
        .await
        .unwrap();

    assert!(result.results[0]
        .strikes
        .iter()
        .all(|s| s.kind == Some(StrikeType::CloudToGround)));
}

#[tokio::test]
async fn strikes_with_missing_amplitude_or_polarity_still_count() {
    let server = MockServer::start().await;
    mount_station(
        &server,
        "-42,147",
        ok_body(vec![
            json!({ "lat": -42.01, "lon": 147.01, "dateTime": "t1", "type": "cg", "amp": null, "polarity": "-" }),
            json!({ "lat": -42.02, "lon": 147.02, "dateTime": "t2", "type": "cg", "amp": -4_000.0 }),
            json!({ "lat": -42.03, "lon": 147.03, "dateTime": "t3", "type": "cg", "amp": 1_000.0, "polarity": "0" }),
        ]),
    )
    .await;

    let stations = vec![station("A", -42.0, 147.0)];
    let request = ScanRequest::new(30, 50.0, false).unwrap();
    let result = orchestrator(&server.uri())
        .scan_at(&request, &stations, now())
        .await
        .unwrap();

    let station_result = &result.results[0];
    assert_eq!(station_result.strikes.len(), 3);
    assert!(station_result.error.is_none());
    let nearest = station_result.nearest_km.expect("nearest distance");
    assert!((nearest - haversine_km(-42.0, 147.0, -42.01, 147.01)).abs() < 1e-9);
    assert_eq!(result.points.len(), 3);
}

#[tokio::test]
async fn include_ic_drops_the_type_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param_is_missing("filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(vec![
            strike(-42.01, 147.0, "t1", "cg"),
            strike(-42.02, 147.0, "t2", "ic"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let stations = vec![station("A", -42.0, 147.0)];
    let request = ScanRequest::new(30, 50.0, true).unwrap();
    let result = orchestrator(&server.uri())
        .scan_at(&request, &stations, now())
        .await
        .unwrap();

    let kinds: Vec<Option<&StrikeType>> = result.results[0]
        .strikes
        .iter()
        .map(|s| s.kind.as_ref())
        .collect();
    assert_eq!(
        kinds,
        vec![Some(&StrikeType::CloudToGround), Some(&StrikeType::IntraCloud)]
    );
}

#[tokio::test]
async fn unreachable_provider_for_every_station_is_a_network_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let stations = vec![station("A", -42.0, 147.0), station("B", -41.0, 146.0)];
    let request = ScanRequest::new(30, 50.0, false).unwrap();
    let err = orchestrator(&uri)
        .scan_at(&request, &stations, now())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScanError::Network { failed: 2, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn empty_station_list_yields_empty_result() {
    let stations: Vec<Station> = vec![];
    let request = ScanRequest::new(30, 50.0, false).unwrap();
    let result = orchestrator("http://127.0.0.1:9")
        .scan_at(&request, &stations, now())
        .await
        .expect("nothing to query");
    assert!(result.results.is_empty());
    assert!(result.points.is_empty());
}
