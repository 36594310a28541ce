use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use crate::config::Config;
use crate::models::{PredictionForm, FIELDS};
use crate::pipeline::testing::{stub_pipeline, FailingRegressor, PanickingRegressor, StubTransformer};
use crate::pipeline::Pipeline;
use crate::{create_router, AppState};

fn app(pipeline: Pipeline) -> Router {
    create_router(AppState {
        pipeline,
        config: Config::default(),
    })
}

fn scenario_form() -> Vec<(&'static str, String)> {
    let values = [
        "Ordinary cement", "Limestone aggregate", "350", "700", "1100", "45", "0", "2.0", "0",
        "0", "10000", "50", "60", "20", "40", "28", "10", "90",
    ];
    FIELDS.iter().zip(values).map(|(f, v)| (f.key, v.to_string())).collect()
}

fn urlencode(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&")
}

fn with(pairs: &[(&'static str, String)], key: &str, value: &str) -> Vec<(&'static str, String)> {
    pairs
        .iter()
        .map(|(k, v)| (*k, if *k == key { value.to_string() } else { v.clone() }))
        .collect()
}

async fn post_form(app: Router, uri: &str, body: String) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    read(app.oneshot(request).await.unwrap()).await
}

async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, text) = read(app.oneshot(request).await.unwrap()).await;
    (status, serde_json::from_str(&text).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    read(app.oneshot(request).await.unwrap()).await
}

async fn read(response: axum::response::Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_index_renders_all_widgets() {
    let (status, html) = get(app(stub_pipeline()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Creep Strain Prediction App"));
    assert_eq!(html.matches("<select ").count(), 2);
    assert_eq!(html.matches(r#"<input type="number""#).count(), 16);
    assert!(html.contains(r#"name="relative_humidity_percent" value="0" min="0" max="100""#));
    assert!(html.contains(r#"name="temperature_c" value="-50" min="-50" max="100""#));
    assert!(html.contains("User Input Parameters"));
    assert!(!html.contains("Predicted Creep Strain Value"));
}

#[tokio::test]
async fn test_number_widgets_accept_any_decimal() {
    let (_, html) = get(app(stub_pipeline()), "/").await;

    assert_eq!(html.matches(r#"step="any""#).count(), 16);
    assert!(!html.contains(r#"step="1""#));
    assert!(!html.contains(r#"step="0.1""#));
}

#[tokio::test]
async fn test_fractional_values_predicted() {
    let pairs = with(&scenario_form(), "wc_ratio_percent", "45.5");
    let pairs = with(&pairs, "relative_humidity_percent", "62.5");
    let pairs = with(&pairs, "temperature_c", "20.5");
    let pairs = with(&pairs, "admixture_lit_per_m3", "2.05");

    let (status, html) = post_form(app(stub_pipeline()), "/predict", urlencode(&pairs)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<div class="success">"#));
    assert!(html.contains(r#"name="wc_ratio_percent" value="45.5""#));
}

#[tokio::test]
async fn test_panicking_model_rendered_as_error() {
    let pipeline = Pipeline::new(Arc::new(StubTransformer::new()), Arc::new(PanickingRegressor));
    let app = app(pipeline);

    let (status, html) = post_form(app.clone(), "/predict", urlencode(&scenario_form())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("An error occurred: Task failed"));

    let (status, _) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_preview_echoes_without_predicting() {
    let transformer = Arc::new(StubTransformer::new());
    let pipeline = Pipeline::new(transformer.clone(), Arc::new(FailingRegressor));

    let (status, html) = post_form(app(pipeline), "/", urlencode(&scenario_form())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<td>Ordinary cement</td>"));
    assert!(html.contains("<td>1100</td>"));
    assert!(html.contains("<th>Fine  (Kg/m³)</th>"));
    assert!(!html.contains("An error occurred"));
    assert_eq!(transformer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_predict_renders_result() {
    let (status, html) = post_form(app(stub_pipeline()), "/predict", urlencode(&scenario_form())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<div class="success">Predicted Creep Strain Value: "#));
    assert!(html.contains(" μm</div>"));
    assert!(html.contains(r#"<option value="Ordinary cement" selected>"#));
}

#[tokio::test]
async fn test_predict_failure_is_rendered() {
    let pipeline = Pipeline::new(Arc::new(StubTransformer::new()), Arc::new(FailingRegressor));
    let app = app(pipeline);

    let (status, html) = post_form(app.clone(), "/predict", urlencode(&scenario_form())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("An error occurred: booster is not fitted"));

    // Session keeps serving
    let (status, _) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_out_of_range_never_reaches_pipeline() {
    let transformer = Arc::new(StubTransformer::new());
    let pipeline = Pipeline::new(transformer.clone(), Arc::new(FailingRegressor));

    let body = urlencode(&with(&scenario_form(), "relative_humidity_percent", "101"));
    let (status, html) = post_form(app(pipeline), "/predict", body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("An error occurred: Relative Humidity (%) must be between 0 and 100"));
    assert_eq!(transformer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_humidity_edges_accepted() {
    for rh in ["0", "100"] {
        let body = urlencode(&with(&scenario_form(), "relative_humidity_percent", rh));
        let (_, html) = post_form(app(stub_pipeline()), "/predict", body).await;
        assert!(html.contains(r#"<div class="success">"#), "RH {} rejected", rh);
    }
}

#[tokio::test]
async fn test_unknown_option_rejected_by_form() {
    let body = urlencode(&with(&scenario_form(), "cement_type", "Free text cement"));
    let (status, html) = post_form(app(stub_pipeline()), "/predict", body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<div class="error">An error occurred: "#));
    assert!(!html.contains("Predicted Creep Strain Value"));
}

#[tokio::test]
async fn test_api_predict() {
    let body = serde_json::to_value(PredictionForm {
        relative_humidity_percent: 60.0,
        cement_kg_per_m3: 350.0,
        ..PredictionForm::default()
    })
    .unwrap();

    let (status, json) = post_json(app(stub_pipeline()), "/api/v1/predict", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["unit"], "μm");
    assert!(json["prediction"].as_f64().unwrap().is_finite());
    assert!(json["display"].as_str().unwrap().starts_with("Predicted Creep Strain Value: "));
    assert_eq!(json["record"]["relative_humidity_percent"], 60.0);
}

#[tokio::test]
async fn test_api_errors() {
    let mut body = serde_json::to_value(PredictionForm::default()).unwrap();
    body["steel_fiber_percent"] = serde_json::json!(120.0);
    let (status, json) = post_json(app(stub_pipeline()), "/api/v1/predict", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let pipeline = Pipeline::new(Arc::new(StubTransformer::new()), Arc::new(FailingRegressor));
    let body = serde_json::to_value(PredictionForm::default()).unwrap();
    let (status, json) = post_json(app(pipeline), "/api/v1/predict", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "booster is not fitted");
}

#[tokio::test]
async fn test_schema_endpoint() {
    let (status, text) = get(app(stub_pipeline()), "/api/v1/schema").await;
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(status, StatusCode::OK);
    let fields = json.as_array().unwrap();
    assert_eq!(fields.len(), 18);
    assert_eq!(fields[0]["column"], "cement type");
    assert_eq!(fields[0]["kind"], "select");
    assert_eq!(fields[12]["column"], "RH (%)");
    assert_eq!(fields[12]["max"], 100.0);
    assert_eq!(fields[2]["max"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_health() {
    let (status, text) = get(app(stub_pipeline()), "/health").await;
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_path"], "./models/xgboost_final_model_new.onnx");
}
