mod common;

use common::{without, TestApp, EXPECTED_PREDICTION_1, EXPECTED_PREDICTION_2, OBSERVATION_1, OBSERVATION_2};
use reqwest::StatusCode;

const FEATURES: [&str; 13] = [
    "danceability",
    "energy",
    "loudness",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
    "duration_ms",
    "key",
    "mode",
    "time_signature",
];

async fn predicted(response: reqwest::Response) -> f64 {
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    body["Prediccion_popularidad"]
        .as_f64()
        .expect("prediction should be a number")
}

#[tokio::test]
async fn predict_returns_model_output() {
    let app = TestApp::spawn().await;

    let first = predicted(app.get("/predict/", &OBSERVATION_1).await).await;
    let second = predicted(app.get("/predict/", &OBSERVATION_2).await).await;

    assert!((first - EXPECTED_PREDICTION_1).abs() < 1e-9);
    assert!((second - EXPECTED_PREDICTION_2).abs() < 1e-9);

    app.cleanup();
}

#[tokio::test]
async fn predict_without_trailing_slash_is_served() {
    let app = TestApp::spawn().await;

    let with_slash = predicted(app.get("/predict/", &OBSERVATION_1).await).await;
    let without_slash = predicted(app.get("/predict", &OBSERVATION_1).await).await;

    assert_eq!(with_slash, without_slash);

    app.cleanup();
}

#[tokio::test]
async fn predict_ignores_parameter_order() {
    let app = TestApp::spawn().await;

    let mut reversed = OBSERVATION_1.to_vec();
    reversed.reverse();

    let in_order = predicted(app.get("/predict/", &OBSERVATION_1).await).await;
    let out_of_order = predicted(app.get("/predict/", &reversed).await).await;

    assert_eq!(in_order, out_of_order);

    app.cleanup();
}

#[tokio::test]
async fn predict_ignores_unknown_parameters() {
    let app = TestApp::spawn().await;

    let mut query = OBSERVATION_1.to_vec();
    query.push(("artist", "somebody"));

    let prediction = predicted(app.get("/predict/", &query).await).await;

    assert!((prediction - EXPECTED_PREDICTION_1).abs() < 1e-9);

    app.cleanup();
}

#[tokio::test]
async fn predict_is_deterministic() {
    let app = TestApp::spawn().await;

    let first = predicted(app.get("/predict/", &OBSERVATION_2).await).await;
    let second = predicted(app.get("/predict/", &OBSERVATION_2).await).await;

    assert_eq!(first, second);

    app.cleanup();
}

#[tokio::test]
async fn predict_rejects_each_missing_feature() {
    let app = TestApp::spawn().await;

    for feature in FEATURES {
        let response = app.get("/predict/", &without(&OBSERVATION_1, feature)).await;

        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "missing {} should be rejected",
            feature
        );
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["error"], "Validation error");
        assert!(body["details"].as_str().unwrap_or_default().contains(feature));
    }

    app.cleanup();
}

#[tokio::test]
async fn predict_rejects_empty_query() {
    let app = TestApp::spawn().await;

    let response = app.get("/predict/", &[]).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    app.cleanup();
}

#[tokio::test]
async fn predict_rejects_non_numeric_float() {
    let app = TestApp::spawn().await;

    let mut query = without(&OBSERVATION_1, "energy");
    query.push(("energy", "loud"));

    let response = app.get("/predict/", &query).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["details"].as_str().unwrap_or_default().contains("energy"));

    app.cleanup();
}

#[tokio::test]
async fn predict_rejects_fractional_integer_feature() {
    let app = TestApp::spawn().await;

    let mut query = without(&OBSERVATION_1, "key");
    query.push(("key", "9.5"));

    let response = app.get("/predict/", &query).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["details"].as_str().unwrap_or_default().contains("key"));

    app.cleanup();
}

#[tokio::test]
async fn failed_request_does_not_affect_later_requests() {
    let app = TestApp::spawn().await;

    let response = app.get("/predict/", &without(&OBSERVATION_1, "tempo")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let prediction = predicted(app.get("/predict/", &OBSERVATION_1).await).await;
    assert!((prediction - EXPECTED_PREDICTION_1).abs() < 1e-9);

    app.cleanup();
}

#[tokio::test]
async fn concurrent_predictions_agree() {
    let app = TestApp::spawn().await;

    let requests = (0..16).map(|i| {
        let query = if i % 2 == 0 { OBSERVATION_1 } else { OBSERVATION_2 };
        let address = app.address.clone();
        tokio::spawn(async move {
            let response = reqwest::Client::new()
                .get(format!("{}/predict/", address))
                .query(&query)
                .send()
                .await
                .expect("Failed to execute request");
            (i, predicted(response).await)
        })
    });

    for handle in requests.collect::<Vec<_>>() {
        let (i, prediction) = handle.await.expect("request task panicked");
        let expected = if i % 2 == 0 {
            EXPECTED_PREDICTION_1
        } else {
            EXPECTED_PREDICTION_2
        };
        assert!((prediction - expected).abs() < 1e-9);
    }

    app.cleanup();
}
