//! End-to-end action tests over a seeded catalog

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use tempfile::TempDir;

use auction_lister::application::dto::{CsrfToken, SessionContext};
use auction_lister::commands::{DispatchOutcome, Dispatcher};
use auction_lister::domain::entities::{NewProhibitedKeyword, Product, RiskLevel};
use auction_lister::domain::funnel::WorkflowStage;
use auction_lister::domain::repositories::{CatalogRepository, KeywordRepository};
use auction_lister::infrastructure::{
    DatabaseConnection, SqliteCatalogRepository, SqliteKeywordRepository,
};

const TEST_TOKEN: &str = "b8f7c2d1-session-token";

struct Harness {
    _dir: TempDir,
    catalog: Arc<SqliteCatalogRepository>,
    keywords: Arc<SqliteKeywordRepository>,
    dispatcher: Dispatcher,
    session: SessionContext,
}

async fn harness(search_cap: u32) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("dashboard.db").display());
    let db = DatabaseConnection::new(&url).await.unwrap();
    db.migrate().await.unwrap();

    let catalog = Arc::new(SqliteCatalogRepository::new(db.pool().clone()));
    let keywords = Arc::new(SqliteKeywordRepository::new(db.pool().clone()));
    let dispatcher = Dispatcher::new(
        Arc::clone(&catalog) as Arc<dyn CatalogRepository>,
        Arc::clone(&keywords) as Arc<dyn KeywordRepository>,
        search_cap,
    );

    Harness {
        _dir: dir,
        catalog,
        keywords,
        dispatcher,
        session: SessionContext::with_token(CsrfToken::from_value(TEST_TOKEN)),
    }
}

fn product(id: &str, title: &str, price: f64, stage: WorkflowStage) -> Product {
    Product {
        id: id.to_string(),
        sku: (stage >= WorkflowStage::Ready).then(|| format!("SKU-{id}")),
        title: title.to_string(),
        current_price: price,
        stage,
        risk_level: RiskLevel::Low,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

async fn dispatch_json(h: &Harness, params: Value) -> Value {
    match h.dispatcher.dispatch(&params, &h.session).await {
        DispatchOutcome::Json(response) => serde_json::to_value(response).unwrap(),
        DispatchOutcome::RenderPage => panic!("expected a JSON outcome"),
    }
}

#[tokio::test]
async fn request_without_action_takes_the_render_path() {
    let h = harness(200).await;
    let outcome = h
        .dispatcher
        .dispatch(&json!({ "tab": "overview" }), &h.session)
        .await;
    assert!(matches!(outcome, DispatchOutcome::RenderPage));
}

#[tokio::test]
async fn dashboard_stats_reconcile_against_a_seeded_catalog() {
    let h = harness(200).await;
    let seeds = [
        ("p1", WorkflowStage::Scraped),
        ("p2", WorkflowStage::Scraped),
        ("p3", WorkflowStage::Calculated),
        ("p4", WorkflowStage::Ready),
        ("p5", WorkflowStage::Listed),
    ];
    for (id, stage) in seeds {
        h.catalog
            .insert_product(&product(id, "lot item", 10.0, stage))
            .await
            .unwrap();
    }

    let envelope = dispatch_json(&h, json!({ "action": "get_dashboard_stats" })).await;
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["action"], json!("get_dashboard_stats"));

    let data = &envelope["data"];
    assert_eq!(data["total"], json!(5));
    assert_eq!(data["scraped"], json!(5));
    assert_eq!(data["calculated"], json!(3));
    assert_eq!(data["filtered"], json!(2));
    assert_eq!(data["ready"], json!(2));
    assert_eq!(data["listed"], json!(1));

    // Cumulative shape: scraped covers the catalog, counts never
    // increase along the funnel.
    let series = ["scraped", "calculated", "filtered", "ready", "listed"];
    let counts: Vec<u64> = series.iter().map(|k| data[k].as_u64().unwrap()).collect();
    assert_eq!(counts[0], data["total"].as_u64().unwrap());
    assert!(counts.windows(2).all(|w| w[1] <= w[0]));
}

#[tokio::test]
async fn empty_search_is_a_no_criteria_signal_not_a_dump() {
    let h = harness(200).await;
    h.catalog
        .insert_product(&product("p1", "vintage camera", 80.0, WorkflowStage::Ready))
        .await
        .unwrap();

    let empty = dispatch_json(
        &h,
        json!({ "action": "search_products", "term": "", "filters": {} }),
    )
    .await;
    assert_eq!(empty["success"], json!(false));
    assert_eq!(empty["message"], json!("no search criteria supplied"));
    assert_eq!(empty["data"], Value::Null);

    let termed = dispatch_json(&h, json!({ "action": "search_products", "term": "camera" })).await;
    assert_eq!(termed["success"], json!(true));
    assert_eq!(termed["data"].as_array().unwrap().len(), 1);
    assert_eq!(termed["data"][0]["id"], json!("p1"));
    assert_eq!(termed["data"][0]["sku"], json!("SKU-p1"));
}

#[tokio::test]
async fn search_matches_case_insensitively_and_orders_by_price_desc() {
    let h = harness(200).await;
    h.catalog
        .insert_product(&product("p1", "Canon EOS Camera", 250.0, WorkflowStage::Ready))
        .await
        .unwrap();
    h.catalog
        .insert_product(&product("p2", "camera tripod", 30.0, WorkflowStage::Scraped))
        .await
        .unwrap();
    h.catalog
        .insert_product(&product("p3", "CAMERA bag", 45.0, WorkflowStage::Listed))
        .await
        .unwrap();
    h.catalog
        .insert_product(&product("p4", "microphone", 90.0, WorkflowStage::Ready))
        .await
        .unwrap();

    let envelope = dispatch_json(&h, json!({ "action": "search_products", "term": "CaMeRa" })).await;
    let ids: Vec<&str> = envelope["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["p1", "p3", "p2"]);
}

#[tokio::test]
async fn search_result_size_never_exceeds_the_cap() {
    let h = harness(5).await;
    for i in 0..8 {
        h.catalog
            .insert_product(&product(
                &format!("p{i}"),
                "boxed lego set",
                10.0 + f64::from(i),
                WorkflowStage::Scraped,
            ))
            .await
            .unwrap();
    }

    let first = dispatch_json(&h, json!({ "action": "search_products", "term": "lego" })).await;
    assert_eq!(first["data"].as_array().unwrap().len(), 5);

    let second = dispatch_json(
        &h,
        json!({ "action": "search_products", "term": "lego", "offset": 5 }),
    )
    .await;
    assert_eq!(second["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn search_filters_intersect_with_the_term() {
    let h = harness(200).await;
    h.catalog
        .insert_product(&product("p1", "drill kit", 40.0, WorkflowStage::Ready))
        .await
        .unwrap();
    h.catalog
        .insert_product(&product("p2", "drill press", 300.0, WorkflowStage::Scraped))
        .await
        .unwrap();

    let envelope = dispatch_json(
        &h,
        json!({
            "action": "search_products",
            "term": "drill",
            "filters": { "stage": "ready", "max_price": 100.0 }
        }),
    )
    .await;
    let data = envelope["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], json!("p1"));
}

#[tokio::test]
async fn mutation_without_valid_csrf_token_leaves_the_catalog_unchanged() {
    let h = harness(200).await;
    h.catalog
        .insert_product(&product("p1", "sealed headset", 55.0, WorkflowStage::Ready))
        .await
        .unwrap();

    for params in [
        json!({
            "action": "approve_products",
            "ids": ["p1"],
            "decision": "approve",
            "reviewer": "reviewerA"
        }),
        json!({
            "action": "approve_products",
            "ids": ["p1"],
            "decision": "approve",
            "reviewer": "reviewerA",
            "csrf_token": "wrong-token"
        }),
    ] {
        let envelope = dispatch_json(&h, params).await;
        assert_eq!(envelope["success"], json!(false));
        assert_eq!(envelope["message"], json!("csrf token missing or mismatched"));
    }

    let after = h
        .catalog
        .find_by_ids(&["p1".to_string()])
        .await
        .unwrap();
    assert_eq!(after[0].stage, WorkflowStage::Ready);
}

#[tokio::test]
async fn approval_advances_one_step_and_skips_terminal_products() {
    let h = harness(200).await;
    h.catalog
        .insert_product(&product("p1", "record player", 75.0, WorkflowStage::Ready))
        .await
        .unwrap();
    h.catalog
        .insert_product(&product("p2", "speaker pair", 120.0, WorkflowStage::Listed))
        .await
        .unwrap();

    let envelope = dispatch_json(
        &h,
        json!({
            "action": "approve_products",
            "ids": ["p1", "p2", "ghost"],
            "decision": "approve",
            "reviewer": "reviewerA",
            "csrf_token": TEST_TOKEN
        }),
    )
    .await;
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["data"]["approved"], json!(1));

    let after = h
        .catalog
        .find_by_ids(&["p1".to_string(), "p2".to_string()])
        .await
        .unwrap();
    assert!(after.iter().all(|p| p.stage == WorkflowStage::Listed));
}

#[tokio::test]
async fn non_approve_decision_applies_nothing() {
    let h = harness(200).await;
    h.catalog
        .insert_product(&product("p1", "games bundle", 25.0, WorkflowStage::Filtered))
        .await
        .unwrap();

    let envelope = dispatch_json(
        &h,
        json!({
            "action": "approve_products",
            "ids": ["p1"],
            "decision": "reject",
            "reviewer": "reviewerB",
            "csrf_token": TEST_TOKEN
        }),
    )
    .await;
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["data"]["approved"], json!(0));

    let after = h.catalog.find_by_ids(&["p1".to_string()]).await.unwrap();
    assert_eq!(after[0].stage, WorkflowStage::Filtered);
}

#[tokio::test]
async fn keyword_lifecycle_over_the_dispatcher() {
    let h = harness(200).await;

    let added = dispatch_json(
        &h,
        json!({
            "action": "add_prohibited_keyword",
            "keyword": "replica",
            "category": "counterfeit",
            "priority": 5,
            "status": "active",
            "description": "marketplace policy",
            "csrf_token": TEST_TOKEN
        }),
    )
    .await;
    assert_eq!(added["success"], json!(true));
    assert_eq!(added["data"], json!(true));

    let duplicate = dispatch_json(
        &h,
        json!({
            "action": "add_prohibited_keyword",
            "keyword": "replica",
            "category": "counterfeit",
            "csrf_token": TEST_TOKEN
        }),
    )
    .await;
    assert_eq!(duplicate["success"], json!(false));
    assert_eq!(
        duplicate["message"],
        json!("keyword 'replica' already exists for category 'counterfeit'")
    );

    let stored = h.keywords.find_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    let id = stored[0].id;

    let updated = dispatch_json(
        &h,
        json!({
            "action": "update_prohibited_keyword",
            "id": id,
            "status": "paused",
            "csrf_token": TEST_TOKEN
        }),
    )
    .await;
    assert_eq!(updated["success"], json!(true));
    assert_eq!(h.keywords.find_all().await.unwrap()[0].status, "paused");

    let deleted = dispatch_json(
        &h,
        json!({
            "action": "delete_prohibited_keyword",
            "id": id,
            "csrf_token": TEST_TOKEN
        }),
    )
    .await;
    assert_eq!(deleted["success"], json!(true));
    assert!(h.keywords.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_an_unknown_keyword_reports_not_found_and_changes_nothing() {
    let h = harness(200).await;
    h.keywords
        .insert(&NewProhibitedKeyword {
            keyword: "autograph".to_string(),
            category: "authenticity".to_string(),
            priority: 1,
            status: "active".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let envelope = dispatch_json(
        &h,
        json!({
            "action": "delete_prohibited_keyword",
            "id": 4242,
            "csrf_token": TEST_TOKEN
        }),
    )
    .await;
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["message"], json!("prohibited keyword not found: 4242"));
    assert_eq!(h.keywords.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_database_action_reports_the_record_count() {
    let h = harness(200).await;
    h.catalog
        .insert_product(&product("p1", "lot item", 5.0, WorkflowStage::Scraped))
        .await
        .unwrap();

    let envelope = dispatch_json(&h, json!({ "action": "test_database" })).await;
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["data"]["status"], json!("connected"));
    assert_eq!(envelope["data"]["total_records"], json!(1));
}

#[tokio::test]
async fn unknown_action_yields_an_error_envelope() {
    let h = harness(200).await;
    let envelope = dispatch_json(&h, json!({ "action": "drop_everything" })).await;
    assert_eq!(envelope["success"], json!(false));
    assert!(
        envelope["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid request")
    );
}
