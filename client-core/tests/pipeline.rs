//! End-to-end: monitor + orchestrator + HTTP backend against an in-process server

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

use prediction_client::{
    extractor_for, fetch_history, fetch_popular, Backend, ClientConfig, Domain, ExtractionError,
    HealthMonitor, HealthState, HttpBackend, Label, Orchestrator, PredictionError, RawInput,
    RequestState,
};

/// Predict calls seen by the fake server
#[derive(Clone, Default)]
struct Calls(Arc<AtomicUsize>);

impl Calls {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fake backend: `health` answers the health path, every predict call is
/// counted and answered with `(status, body)`.
async fn serve(
    health_path: &str,
    health: Option<Value>,
    predict_path: &str,
    status: StatusCode,
    body: Value,
) -> (String, Calls) {
    let calls = Calls::default();

    let mut router = Router::new().route(
        predict_path,
        post(move |State(calls): State<Calls>, Json(_payload): Json<Value>| {
            let body = body.clone();
            async move {
                calls.0.fetch_add(1, Ordering::SeqCst);
                (status, Json(body))
            }
        }),
    );
    if let Some(health) = health {
        router = router.route(health_path, get(move || async move { Json(health) }));
    }
    let router: Router = router.with_state(calls.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), calls)
}

fn client(domain: Domain, base: &str) -> (Arc<dyn Backend>, HealthMonitor) {
    let mut config = ClientConfig::new(domain, base).unwrap();
    config.poll_interval = Duration::from_millis(100);
    config.request_timeout = Duration::from_secs(2);
    config.probe_timeout = Duration::from_millis(500);

    let poll_interval = config.poll_interval;
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(config).unwrap());
    let monitor = HealthMonitor::start(backend.clone(), poll_interval);
    (backend, monitor)
}

#[tokio::test]
async fn phishing_url_round_trip() {
    let (base, calls) = serve(
        "/health",
        Some(json!({"status": "healthy", "model_loaded": true})),
        "/predict",
        StatusCode::OK,
        json!({
            "success": true,
            "prediction": 0,
            "confidence": 0.87,
            "probabilities": {"legitimate": 0.13, "phishing": 0.87}
        }),
    )
    .await;

    let (backend, monitor) = client(Domain::Phishing, &base);
    assert_eq!(monitor.first_probe().await, HealthState::Online);

    let orch = Orchestrator::new(extractor_for(Domain::Phishing), backend, monitor.subscribe());
    let result = assert_ok!(
        orch.submit(&RawInput::Url("http://192.168.0.1/login@verify".into())).await
    );

    assert_eq!(result.label, Label::class("phishing"));
    assert_eq!(result.confidence_percent(), "87.00%");
    assert_eq!(calls.count(), 1);
    assert!(matches!(orch.state(), RequestState::Succeeded(_)));

    monitor.stop().await;
}

#[tokio::test]
async fn unreachable_health_blocks_submit() {
    // No health route: every probe is a 404
    let (base, calls) = serve(
        "/",
        None,
        "/predict",
        StatusCode::OK,
        json!({"is_spam": false, "confidence": 0.9, "spam_probability": 0.1}),
    )
    .await;

    let (backend, monitor) = client(Domain::Spam, &base);
    assert_eq!(monitor.first_probe().await, HealthState::Offline);
    assert!(monitor.status().last_error.is_some());

    let orch = Orchestrator::new(extractor_for(Domain::Spam), backend, monitor.subscribe());
    let err = assert_err!(orch.submit(&RawInput::Text("hello there".into())).await);

    assert_eq!(err, PredictionError::BackendUnavailable);
    assert_eq!(calls.count(), 0);

    monitor.stop().await;
}

#[tokio::test]
async fn error_body_on_200_is_reported() {
    let (base, calls) = serve(
        "/",
        Some(json!({"status": "ok"})),
        "/predict",
        StatusCode::OK,
        json!({"error": "model not loaded"}),
    )
    .await;

    let (backend, monitor) = client(Domain::Fraud, &base);
    monitor.first_probe().await;

    let orch = Orchestrator::new(extractor_for(Domain::Fraud), backend, monitor.subscribe());
    let fields = (0..10).map(|i| format!("{}", i as f64 * 0.1)).collect();
    let err = orch.submit(&RawInput::Fields(fields)).await.unwrap_err();

    assert_eq!(err, PredictionError::BackendReportedError("model not loaded".into()));
    assert_eq!(calls.count(), 1);

    monitor.stop().await;
}

#[tokio::test]
async fn empty_numeric_field_never_reaches_backend() {
    let (base, calls) = serve(
        "/",
        Some(json!({"status": "ok"})),
        "/predict",
        StatusCode::OK,
        json!({"is_fraud": false, "confidence": 0.7, "risk_score": 0.3}),
    )
    .await;

    let (backend, monitor) = client(Domain::Fraud, &base);
    monitor.first_probe().await;

    let orch = Orchestrator::new(extractor_for(Domain::Fraud), backend, monitor.subscribe());
    let mut fields: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    fields[0].clear();
    fields[9] = "ten".into();

    let err = orch.submit(&RawInput::Fields(fields)).await.unwrap_err();
    assert_eq!(
        err,
        PredictionError::ValidationFailed(vec![
            ExtractionError::missing_index(0),
            ExtractionError::NotANumber { index: 9, value: "ten".into() },
        ])
    );
    assert_eq!(calls.count(), 0);

    monitor.stop().await;
}

#[tokio::test]
async fn stock_error_status_carries_backend_message() {
    let (base, calls) = serve(
        "/",
        Some(json!({"status": "ok"})),
        "/api/predict",
        StatusCode::BAD_REQUEST,
        json!({"error": "Could not fetch data for ZZZZ"}),
    )
    .await;

    let (backend, monitor) = client(Domain::Stock, &base);
    monitor.first_probe().await;

    let orch = Orchestrator::new(extractor_for(Domain::Stock), backend, monitor.subscribe());
    let err = orch.submit(&RawInput::Symbol(" zzzz ".into())).await.unwrap_err();

    assert_eq!(
        err,
        PredictionError::TransportError {
            status: Some(400),
            message: "Could not fetch data for ZZZZ".into()
        }
    );
    assert_eq!(calls.count(), 1);

    monitor.stop().await;
}

#[tokio::test]
async fn recommendations_keep_order_end_to_end() {
    let (base, _calls) = serve(
        "/",
        Some(json!({"status": "ok"})),
        "/predict",
        StatusCode::OK,
        json!({
            "user": "bob",
            "recommendations": [
                {"item": "Product D", "rating": 5},
                {"item": "Product A", "rating": 2.5}
            ],
            "total_items": 2
        }),
    )
    .await;

    let (backend, monitor) = client(Domain::Recommendation, &base);
    monitor.first_probe().await;

    let orch = Orchestrator::new(extractor_for(Domain::Recommendation), backend, monitor.subscribe());
    let result = assert_ok!(orch.submit(&RawInput::User("bob".into())).await);

    match result.label {
        Label::Recommendations { user, items, .. } => {
            assert_eq!(user, "bob");
            assert_eq!(items[0].item, "Product D");
            assert_eq!(items[1].score, 0.5);
        }
        other => panic!("unexpected label {:?}", other),
    }
    assert_eq!(result.confidence, 1.0);

    monitor.stop().await;
}

/// Stock backend: forecast, history and popular symbols
async fn serve_market() -> String {
    let router = Router::new()
        .route("/", get(|| async { Json(json!({"status": "ok"})) }))
        .route(
            "/api/predict",
            post(|Json(payload): Json<Value>| async move {
                Json(json!({
                    "symbol": payload["symbol"],
                    "company_name": "Apple Inc.",
                    "current_price": 190.0,
                    "predicted_price": 192.4,
                    "prediction_date": "2024-04-02"
                }))
            }),
        )
        .route(
            "/api/historical/:symbol",
            get(|Path(symbol): Path<String>, Query(query): Query<HashMap<String, String>>| async move {
                if symbol != "AAPL" {
                    return (StatusCode::BAD_REQUEST, Json(json!({"error": format!("No data for {}", symbol)})));
                }
                let days = match query.get("period").map(String::as_str) {
                    Some("3mo") => 3,
                    _ => 1,
                };
                let data: Vec<Value> = (0..days)
                    .map(|i| json!({
                        "date": format!("2024-0{}-01", i + 1),
                        "open": 180.0 + i as f64,
                        "high": 185.0 + i as f64,
                        "low": 178.0 + i as f64,
                        "close": 182.0 + 4.0 * i as f64,
                        "volume": 50_000_000 + i
                    }))
                    .collect();
                (StatusCode::OK, Json(json!({"symbol": symbol, "data": data})))
            }),
        )
        .route(
            "/api/stocks/popular",
            get(|| async {
                Json(json!([
                    {"symbol": "AAPL", "name": "Apple Inc."},
                    {"symbol": "GOOGL", "name": "Alphabet Inc."},
                    {"symbol": "MSFT", "name": "Microsoft Corporation"}
                ]))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn stock_forecast_then_history() {
    let base = serve_market().await;
    let (backend, monitor) = client(Domain::Stock, &base);
    assert_eq!(monitor.first_probe().await, HealthState::Online);

    let orch = Orchestrator::new(extractor_for(Domain::Stock), backend.clone(), monitor.subscribe());
    let result = assert_ok!(orch.submit(&RawInput::Symbol("aapl".into())).await);
    let symbol = match &result.label {
        Label::Price(forecast) => forecast.symbol.clone(),
        other => panic!("unexpected label {:?}", other),
    };
    assert_eq!(symbol, "AAPL");

    let history = assert_ok!(fetch_history(backend.as_ref(), &symbol, "3mo").await);
    assert_eq!(history.points.len(), 3);
    assert_eq!(history.latest().map(|day| day.close), Some(190.0));

    // Forecast state is untouched by market calls
    assert!(matches!(orch.state(), RequestState::Succeeded(_)));

    monitor.stop().await;
}

#[tokio::test]
async fn history_errors_and_popular_list() {
    let base = serve_market().await;
    let (backend, monitor) = client(Domain::Stock, &base);

    let err = assert_err!(fetch_history(backend.as_ref(), "zzzz", "1mo").await);
    assert_eq!(
        err,
        PredictionError::TransportError { status: Some(400), message: "No data for ZZZZ".into() }
    );

    let err = assert_err!(fetch_history(backend.as_ref(), "AAPL", "fortnight").await);
    assert_eq!(
        err,
        PredictionError::ValidationFailed(vec![ExtractionError::InvalidPeriod("fortnight".into())])
    );

    let stocks = assert_ok!(fetch_popular(backend.as_ref()).await);
    let symbols: Vec<&str> = stocks.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, ["AAPL", "GOOGL", "MSFT"]);

    monitor.stop().await;
}
