//! End-to-end tests against an in-process stub of the backend.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use logwatch_client::types::{
    AlertStatus, PageRequest, RecentErrorsFilter, TimeRange, TrendInterval,
};
use logwatch_client::{ApiClient, ApiError, CancelToken};

async fn spawn_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let io = TokioIo::new(stream);
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(io, service_fn(handle_request))
                    .await;
            });
        }
    });

    addr
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| v.to_string())
    })
}

fn envelope(data: Value) -> Value {
    json!({
        "success": true,
        "message": "OK",
        "data": data,
        "timestamp": "2025-10-20T08:00:00Z"
    })
}

fn event(id: u32) -> Value {
    json!({
        "id": format!("e-{}", id),
        "serviceName": "checkout",
        "env": "PROD",
        "tenant": "acme",
        "level": "ERROR",
        "message": "payment declined",
        "traceId": "abc123",
        "timestamp": "2025-10-20T08:15:00"
    })
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or_default().to_string();
    let body = req
        .into_body()
        .collect()
        .await
        .map(|b| b.to_bytes())
        .unwrap_or_default();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let (status, payload) = match path.as_str() {
        "/api/errors/trend" => {
            let interval = query_param(&query, "interval").unwrap_or_default();
            let data = json!({
                "trendPoints": [{"bucketStart": "2025-01-01T00:00:00Z", "count": 5}],
                "interval": interval
            });
            (StatusCode::OK, envelope(data))
        }
        "/api/errors/severity" => {
            if body["from"] == "1970-01-01T00:00:00Z" {
                let failed = json!({"success": false, "message": "range too large", "data": null});
                (StatusCode::OK, failed)
            } else {
                (StatusCode::OK, envelope(json!({"error": 3, "warn": 1, "info": 0})))
            }
        }
        "/api/errors/byService" => {
            let top: usize = query_param(&query, "top")
                .and_then(|t| t.parse().ok())
                .unwrap_or(5);
            let ranked: Vec<Value> = (0..top)
                .map(|i| json!({"serviceName": format!("svc-{}", i), "count": 100 - i}))
                .collect();
            (StatusCode::OK, envelope(Value::Array(ranked)))
        }
        "/api/errors/recent" => {
            let page: u32 = query_param(&query, "page")
                .and_then(|p| p.parse().ok())
                .unwrap_or(0);
            let size: u32 = query_param(&query, "size")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10);
            // One more item than asked for, to exercise normalization.
            let items: Vec<Value> = (0..=size).map(event).collect();
            let data = json!({"items": items, "total": 42, "page": page, "size": size});
            (StatusCode::OK, envelope(data))
        }
        "/api/logs/search" => {
            let failed = json!({"success": false, "message": "index missing"});
            (StatusCode::NOT_FOUND, failed)
        }
        "/api/alerts/active" => {
            let alerts = json!([{
                "id": "a-1",
                "ruleId": "error.rate.high",
                "serviceName": "billing",
                "severity": "HIGH",
                "status": "OPEN",
                "observed": 42.0,
                "threshold": 20.0,
                "openedAt": "2025-10-20T08:00:00Z"
            }]);
            (StatusCode::OK, alerts)
        }
        "/api/alerts/trend" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, json!([{"day": "2025-10-20", "count": 1}]))
        }
        "/api/dashboard/summary" => {
            let summary = json!({"totalLogsToday": 120, "errorsLast5m": 4, "activeAlerts": 1});
            (StatusCode::OK, summary)
        }
        "/ping" => {
            return Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "text/plain")
                .body(Full::new(Bytes::from("pong\n")))
                .unwrap());
        }
        _ => {
            return Ok(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "text/html")
                .body(Full::new(Bytes::from("<html>boom</html>")))
                .unwrap());
        }
    };

    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(payload.to_string())))
        .unwrap())
}

async fn client() -> ApiClient {
    let addr = spawn_backend().await;
    ApiClient::builder()
        .base_url(format!("http://{}", addr))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_error_trend_unwraps_envelope() {
    let client = client().await;
    let trend = client
        .error_trend(TrendInterval::Minute, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(trend.interval, TrendInterval::Minute);
    assert_eq!(trend.trend_points.len(), 1);
    assert_eq!(trend.trend_points[0].count, 5);
}

#[tokio::test]
async fn test_success_false_surfaces_server_message() {
    let client = client().await;
    let range = TimeRange::new("1970-01-01T00:00:00Z", "2025-10-22T12:00:00Z");
    let err = client
        .severity_counts(&range, &CancelToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "range too large");
}

#[tokio::test]
async fn test_severity_counts() {
    let client = client().await;
    let range = TimeRange::new("2025-10-18T00:00:00Z", "2025-10-22T12:00:00Z");
    let counts = client
        .severity_counts(&range, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!((counts.error, counts.warn, counts.info), (3, 1, 0));
}

#[tokio::test]
async fn test_errors_by_service_passes_top() {
    let client = client().await;
    let range = TimeRange::new("2025-10-18T00:00:00Z", "2025-10-22T12:00:00Z");
    let ranked = client
        .errors_by_service(&range, 3, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(ranked.len(), 3);
    assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
}

#[tokio::test]
async fn test_recent_errors_page_is_normalized() {
    let client = client().await;
    let page = client
        .recent_errors(
            &RecentErrorsFilter::default(),
            PageRequest::new(2, 4),
            &CancelToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(page.page, 2);
    assert_eq!(page.size, 4);
    assert_eq!(page.items.len(), 4);
    assert_eq!(page.total, 42);
    assert!(page.is_consistent());
}

#[tokio::test]
async fn test_error_status_with_envelope_message() {
    let client = client().await;
    let err = client
        .search_logs(&Default::default(), &CancelToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Server {
            status: 404,
            message: "index missing".to_string()
        }
    );
}

#[tokio::test]
async fn test_error_status_without_envelope() {
    let client = client().await;
    let err = client.recent_logs(&CancelToken::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status code 500");
}

#[tokio::test]
async fn test_raw_endpoints() {
    let client = client().await;
    let cancel = CancelToken::new();

    let alerts = client.active_alerts(&cancel).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].status, AlertStatus::Open);

    let summary = client.dashboard_summary(&cancel).await.unwrap();
    assert_eq!(summary.total_logs_today, 120);

    assert_eq!(client.ping(&cancel).await.unwrap(), "pong");
}

#[tokio::test]
async fn test_cancel_in_flight_request() {
    let client = client().await;
    let cancel = CancelToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = client.alert_trend(14, &cancel).await.unwrap_err();

    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_timeout_is_an_error_not_a_cancel() {
    let addr = spawn_backend().await;
    let client = ApiClient::builder()
        .base_url(format!("http://{}", addr))
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client
        .alert_trend(14, &CancelToken::new())
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Timeout);
    assert!(!err.is_cancelled());
}

#[tokio::test]
async fn test_unreachable_backend() {
    let client = ApiClient::builder()
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let err = client.recent_logs(&CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Connection(_)));
}
