//! End-to-end classification through the orchestrator against local HTTP stand-ins

mod common;

use axum::http::StatusCode;
use common::{catalog, dead_address, rows, spawn_model, spawn_store, ModelScript};
use hakim_classifiers::heuristic::JUNK_REJECTION_REASON;
use hakim_classifiers::{AiConfig, CatalogConfig, ClassifierConfig, Orchestrator};
use hakim_classifiers::ai::GENERIC_REJECTION_REASON;
use hakim_core::{Outcome, Priority, Tier};
use serde_json::json;
use std::time::Duration;

const TITLE: &str = "Street lighting broken";
const DESCRIPTION: &str = "Street lighting on our road has been off for a week";

fn config(model_url: &str, store_url: &str) -> ClassifierConfig {
    ClassifierConfig {
        ai: AiConfig {
            api_key: Some("sk-test".to_string()),
            base_url: model_url.to_string(),
            timeout_ms: 2_000,
            ..Default::default()
        },
        catalog: CatalogConfig {
            base_url: store_url.to_string(),
            api_key: "service-key".to_string(),
            ..Default::default()
        },
    }
}

fn verdict_json(category: &str, priority: &str, confidence: f64) -> String {
    json!({
        "rejected": false,
        "rejection_reason": "",
        "category_name": category,
        "priority": priority,
        "confidence": confidence,
        "summary_ar": "الإنارة معطلة منذ أسبوع",
        "sentiment": "frustrated",
        "image_analysis": ""
    })
    .to_string()
}

#[tokio::test]
async fn test_ai_tier_classifies_fenced_json() {
    let cats = catalog();
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let content = format!("```json\n{}\n```", verdict_json("Roads", "high", 0.9));
    let (model_url, recorded) = spawn_model(ModelScript::content(&content)).await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    let result = outcome.as_classified().expect("classified");
    assert_eq!(result.tier, Tier::Ai);
    assert_eq!(result.category_id(), Some(cats[1].id));
    assert_eq!(result.department_id(), Some(cats[1].department_id));
    assert_eq!(result.priority, Priority::High);
    assert!((result.confidence() - 0.9).abs() < 1e-6);
    assert_eq!(result.summary, "الإنارة معطلة منذ أسبوع");
    assert!(result.image_analysis.is_none());

    let body = recorded.body();
    assert_eq!(body["model"], "openai/gpt-5.1-codex-max");
    assert_eq!(body["max_tokens"], 2000);
    assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body["messages"][1]["content"].is_string());
    assert!(body["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains("- الطرق (Roads)"));

    assert_eq!(recorded.header("authorization").as_deref(), Some("Bearer sk-test"));
    assert_eq!(recorded.header("x-title").as_deref(), Some("HAKIM Complaint System"));
    assert_eq!(recorded.header("http-referer").as_deref(), Some("https://hakim.sa"));
}

#[tokio::test]
async fn test_images_sent_as_structured_parts() {
    let cats = catalog();
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let (model_url, recorded) =
        spawn_model(ModelScript::content(&verdict_json("Water", "medium", 0.7))).await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let images = vec![
        "https://cdn.example/leak-1.jpg".to_string(),
        "https://cdn.example/leak-2.jpg".to_string(),
    ];
    let outcome = orchestrator.classify(TITLE, DESCRIPTION, &images).await;
    assert_eq!(outcome.as_classified().unwrap().tier, Tier::Ai);

    let body = recorded.body();
    let parts = body["messages"][1]["content"].as_array().unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0]["type"], "text");
    assert_eq!(parts[1]["type"], "image_url");
    assert_eq!(parts[1]["image_url"]["url"], "https://cdn.example/leak-1.jpg");
    assert_eq!(parts[1]["image_url"]["detail"], "high");
    assert_eq!(parts[2]["image_url"]["url"], "https://cdn.example/leak-2.jpg");
}

#[tokio::test]
async fn test_http_500_falls_back_to_heuristic() {
    let cats = catalog();
    let (store_url, store_hits) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let (model_url, recorded) = spawn_model(ModelScript::status(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"error":{"message":"upstream exploded"}}"#,
    ))
    .await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    let result = outcome.as_classified().expect("heuristic result");
    assert_eq!(result.tier, Tier::Heuristic);
    assert_eq!(result.category_id(), Some(cats[2].id));
    assert!((result.confidence() - 0.8).abs() < 1e-6);
    assert_eq!(recorded.hits(), 1);
    assert_eq!(store_hits.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_non_json_output_falls_back_to_heuristic() {
    let cats = catalog();
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let (model_url, _) =
        spawn_model(ModelScript::content("I think this belongs to the roads department.")).await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    assert_eq!(outcome.as_classified().unwrap().tier, Tier::Heuristic);
}

#[tokio::test]
async fn test_error_object_falls_back_to_heuristic() {
    let cats = catalog();
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let (model_url, _) = spawn_model(ModelScript::status(
        StatusCode::OK,
        r#"{"error":{"message":"model overloaded"}}"#,
    ))
    .await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    assert_eq!(outcome.as_classified().unwrap().tier, Tier::Heuristic);
}

#[tokio::test]
async fn test_timeout_falls_back_to_heuristic() {
    let cats = catalog();
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let (model_url, _) = spawn_model(
        ModelScript::content(&verdict_json("Roads", "high", 0.9)).delayed(Duration::from_secs(3)),
    )
    .await;

    let mut config = config(&model_url, &store_url);
    config.ai.timeout_ms = 300;

    let orchestrator = Orchestrator::from_config(&config).unwrap();
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    assert_eq!(outcome.as_classified().unwrap().tier, Tier::Heuristic);
}

#[tokio::test]
async fn test_unreachable_model_falls_back_to_heuristic() {
    let cats = catalog();
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let model_url = dead_address().await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    assert_eq!(outcome.as_classified().unwrap().tier, Tier::Heuristic);
}

#[tokio::test]
async fn test_ai_rejection_is_final() {
    let cats = catalog();
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let content = json!({
        "rejected": true,
        "rejection_reason": "هذه شكوى شخصية لا تتعلق بالخدمات الحكومية",
        "category_name": "",
        "priority": "low",
        "confidence": 0.0,
        "summary_ar": "",
        "sentiment": "neutral"
    })
    .to_string();
    let (model_url, _) = spawn_model(ModelScript::content(&content)).await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    // The heuristic tier would accept this complaint
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    match outcome {
        Outcome::Rejected(rejection) => {
            assert_eq!(rejection.tier, Tier::Ai);
            assert_eq!(rejection.reason, "هذه شكوى شخصية لا تتعلق بالخدمات الحكومية");
        }
        other => panic!("Expected AI rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ai_rejection_without_reason_gets_generic_reason() {
    let cats = catalog();
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let (model_url, _) = spawn_model(ModelScript::content(r#"{"rejected": true}"#)).await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    assert_eq!(outcome.as_rejected().unwrap().reason, GENERIC_REJECTION_REASON);
}

#[tokio::test]
async fn test_unknown_category_degrades_confidence() {
    let cats = catalog();
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let (model_url, _) =
        spawn_model(ModelScript::content(&verdict_json("Public Health", "critical", 0.6))).await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    let result = outcome.as_classified().unwrap();
    assert_eq!(result.tier, Tier::Ai);
    assert_eq!(result.category_id(), Some(cats[0].id));
    assert!((result.confidence() - 0.3).abs() < 1e-6);
    assert_eq!(result.priority, Priority::Critical);
}

#[tokio::test]
async fn test_empty_catalog_skips_model_call() {
    let (store_url, _) = spawn_store(StatusCode::OK, json!([])).await;
    let (model_url, recorded) =
        spawn_model(ModelScript::content(&verdict_json("Roads", "high", 0.9))).await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    let result = outcome.as_classified().unwrap();
    assert_eq!(result.tier, Tier::Heuristic);
    assert!(result.category_id().is_none());
    assert!(result.department_id().is_none());
    assert_eq!(recorded.hits(), 0);
}

#[tokio::test]
async fn test_catalog_down_is_unavailable() {
    let (store_url, store_hits) =
        spawn_store(StatusCode::SERVICE_UNAVAILABLE, json!({"message": "maintenance"})).await;
    let (model_url, recorded) =
        spawn_model(ModelScript::content(&verdict_json("Roads", "high", 0.9))).await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let outcome = orchestrator.classify_text(TITLE, DESCRIPTION).await;

    match outcome {
        Outcome::Unavailable { reason } => assert!(reason.contains("503")),
        other => panic!("Expected unavailable, got {:?}", other),
    }
    assert_eq!(store_hits.load(std::sync::atomic::Ordering::SeqCst), 2);
    assert_eq!(recorded.hits(), 0);
}

#[tokio::test]
async fn test_heuristic_junk_rejection_after_fallback() {
    let cats = catalog();
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;
    let (model_url, _) =
        spawn_model(ModelScript::status(StatusCode::BAD_GATEWAY, "bad gateway")).await;

    let orchestrator = Orchestrator::from_config(&config(&model_url, &store_url)).unwrap();
    let outcome = orchestrator.classify_text("test test test", "asdf asdf").await;

    let rejection = outcome.as_rejected().unwrap();
    assert_eq!(rejection.tier, Tier::Heuristic);
    assert_eq!(rejection.reason, JUNK_REJECTION_REASON);
}

#[tokio::test]
async fn test_inactive_rows_are_ignored() {
    let mut cats = catalog();
    cats[0].is_active = false;
    let (store_url, _) = spawn_store(StatusCode::OK, rows(&cats)).await;

    let mut config = config("http://unused", &store_url);
    config.ai.api_key = None;

    let orchestrator = Orchestrator::from_config(&config).unwrap();
    let outcome = orchestrator
        .classify_text("Parks need benches", "The neighbourhood park has no benches for the elderly")
        .await;

    // First active row is Roads, not the inactive Water row
    let result = outcome.as_classified().unwrap();
    assert_eq!(result.category_id(), Some(cats[1].id));
    assert!((result.confidence() - 0.5).abs() < 1e-6);
}

#[tokio::test]
async fn test_null_store_columns_do_not_break_the_catalog() {
    let store_rows = json!([
        {
            "id": "00000000-0000-0000-0000-000000000001",
            "department_id": "00000000-0000-0000-0000-000000000101",
            "name": "Water",
            "name_ar": "المياه",
            "description": "Water supply and leaks",
            "icon": "droplet",
            "is_active": true
        },
        {
            "id": "00000000-0000-0000-0000-000000000002",
            "department_id": "00000000-0000-0000-0000-000000000102",
            "name": "Roads",
            "name_ar": null,
            "description": null,
            "icon": null,
            "is_active": true,
            "sla_days": null
        }
    ]);
    let (store_url, _) = spawn_store(StatusCode::OK, store_rows).await;

    let mut config = config("http://unused", &store_url);
    config.ai.api_key = None;

    let orchestrator = Orchestrator::from_config(&config).unwrap();
    let outcome = orchestrator
        .classify_text("Water pipe burst", "Water has been leaking onto the street for three days")
        .await;

    let result = outcome.as_classified().expect("classified despite null columns");
    assert_eq!(
        result.category_id().map(|id| id.to_string()).as_deref(),
        Some("00000000-0000-0000-0000-000000000001")
    );
}

#[tokio::test]
async fn test_long_store_error_page_is_truncated() {
    let page = format!("<html><body>{}</body></html>", "maintenance ".repeat(200));
    let (store_url, _) = spawn_store(StatusCode::SERVICE_UNAVAILABLE, json!(page)).await;

    let mut config = config("http://unused", &store_url);
    config.ai.api_key = None;

    let orchestrator = Orchestrator::from_config(&config).unwrap();
    match orchestrator.classify_text(TITLE, DESCRIPTION).await {
        Outcome::Unavailable { reason } => {
            assert!(reason.contains("503"));
            assert!(reason.chars().count() < 300);
            assert!(reason.ends_with("..."));
        }
        other => panic!("Expected unavailable, got {:?}", other),
    }
}
