//! Database-backed behavior. Needs Docker for the Postgres container:
//!
//! ```text
//! cargo test -p portal-server --test db_tests -- --ignored
//! ```

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use test_context::test_context;

use crate::common::{create_test_entry, test_record, TestApp, TestHarness};
use portal_core::domains::directory::{
    actions as directory, record_exposures, DirectoryEntry, EntryTier, PgExposureStore,
};
use portal_core::domains::news::models::{CategoryRow, NewsDocument};
use portal_core::domains::news::{actions as news, NewsCategory};
use portal_core::kernel::{PgViewCountSink, ViewTarget};

// ============================================================================
// Directory
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn new_entries_start_with_zero_counters(ctx: &TestHarness) {
    let entry = create_test_entry(&ctx.db_pool, "Som Tam House", EntryTier::Regular)
        .await
        .unwrap();

    assert_eq!(entry.view_count, 0);
    assert_eq!(entry.exposure_count, 0);
    assert_eq!(entry.exposure_weight, 1.0);
    assert!(entry.last_exposed_at.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn exposures_are_recorded_per_card(ctx: &TestHarness) {
    let a = create_test_entry(&ctx.db_pool, "Exposure A", EntryTier::Premium)
        .await
        .unwrap();
    let b = create_test_entry(&ctx.db_pool, "Exposure B", EntryTier::Regular)
        .await
        .unwrap();
    let at = Utc::now();

    let store = PgExposureStore::new(ctx.db_pool.clone());
    let report = record_exposures(&store, &[a.id, b.id, a.id], at).await;
    assert_eq!(report.recorded, 3);

    let a = DirectoryEntry::find_by_id(a.id, &ctx.db_pool).await.unwrap().unwrap();
    let b = DirectoryEntry::find_by_id(b.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(a.exposure_count, 2);
    assert_eq!(b.exposure_count, 1);
    let stamped = a.last_exposed_at.unwrap();
    assert!((stamped - at).num_milliseconds().abs() < 1);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn buffered_views_land_in_the_counter(ctx: &TestHarness) {
    let entry = create_test_entry(&ctx.db_pool, "Viewed Cafe", EntryTier::Regular)
        .await
        .unwrap();
    let deps = ctx.server_deps();

    for _ in 0..3 {
        assert!(directory::get_entry(entry.id, &deps).await.unwrap().is_some());
    }
    assert_eq!(deps.view_buffer.pending_for(ViewTarget::Entry(entry.id)), 3);

    let report = deps
        .view_buffer
        .flush(&PgViewCountSink::new(ctx.db_pool.clone()))
        .await;
    assert_eq!(report.written, 1);

    let stored = DirectoryEntry::find_by_id(entry.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(stored.view_count, 3);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn admin_updates_and_reset(ctx: &TestHarness) {
    let entry = create_test_entry(&ctx.db_pool, "Admin Target", EntryTier::Regular)
        .await
        .unwrap();
    let deps = ctx.server_deps();

    let updated = directory::update_weight(entry.id, 2.5, &deps).await.unwrap().unwrap();
    assert_eq!(updated.exposure_weight, 2.5);

    let expires = Utc::now() + Duration::days(30);
    let premium = directory::set_tier(entry.id, EntryTier::Premium, Some(expires), &deps)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(premium.tier, EntryTier::Premium);
    assert!(premium.is_premium_active(Utc::now()));

    DirectoryEntry::record_exposure(entry.id, Utc::now(), &ctx.db_pool).await.unwrap();
    DirectoryEntry::add_views(entry.id, 7, &ctx.db_pool).await.unwrap();

    let reset = directory::reset_counters(entry.id, &deps).await.unwrap().unwrap();
    assert_eq!(reset.exposure_count, 0);
    assert_eq!(reset.view_count, 0);
    assert!(reset.last_exposed_at.is_none());
    assert_eq!(reset.exposure_weight, 2.5);

    let missing = directory::reset_counters(portal_core::common::EntryId::new(), &deps)
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ============================================================================
// News
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn publishing_reuses_categories_and_tags(ctx: &TestHarness) {
    let deps = ctx.server_deps();

    let first = news::publish(
        &test_record("BTS 스카이트레인 연장", NewsCategory::Lifestyle, &["방콕", "교통"]),
        Some("https://news.example.com/bts"),
        None,
        &deps,
    )
    .await
    .unwrap();
    let second = news::publish(
        &test_record("MRT 요금 인하", NewsCategory::Lifestyle, &["교통", "요금", "교통"]),
        None,
        None,
        &deps,
    )
    .await
    .unwrap();

    assert_eq!(first.document.category, "생활");
    assert_eq!(second.document.category, "생활");
    assert_eq!(first.tags, vec!["교통", "방콕"]);
    assert_eq!(second.tags, vec!["교통", "요금"]);
    assert!(first.document.is_translated);

    let lifestyle_rows = CategoryRow::find_all(&ctx.db_pool)
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.name == "생활")
        .count();
    assert_eq!(lifestyle_rows, 1);

    let (tag_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM news_tags WHERE name = '교통'")
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(tag_rows, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn concurrent_publishes_share_new_tag(ctx: &TestHarness) {
    let deps = ctx.server_deps();
    let tag = format!("태그-{}", uuid::Uuid::new_v4());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let deps = deps.clone();
            let record = test_record(&format!("동시 기사 {i}"), NewsCategory::Society, &[&tag]);
            tokio::spawn(async move { news::publish(&record, None, None, &deps).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM news_tags WHERE name = $1")
        .bind(&tag)
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn news_listing_filters_by_category(ctx: &TestHarness) {
    let deps = ctx.server_deps();
    let politics = news::publish(
        &test_record("총선 일정 발표", NewsCategory::Politics, &["총선"]),
        None,
        None,
        &deps,
    )
    .await
    .unwrap();

    let listed = news::list_news(Some(NewsCategory::Politics), 100, 0, &deps)
        .await
        .unwrap();
    assert!(listed.iter().all(|d| d.category == "정치"));
    assert!(listed.iter().any(|d| d.id == politics.document.id));

    let detail = news::get_news(politics.document.id, &deps).await.unwrap().unwrap();
    assert_eq!(detail.tags, vec!["총선"]);
    assert_eq!(
        deps.view_buffer.pending_for(ViewTarget::News(politics.document.id)),
        1
    );

    deps.view_buffer
        .flush(&PgViewCountSink::new(ctx.db_pool.clone()))
        .await;
    let stored = NewsDocument::find_by_id(politics.document.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.view_count, 1);
}

// ============================================================================
// HTTP over the real database
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn directory_listing_over_http(ctx: &TestHarness) {
    let app = TestApp::new(ctx.mocks.clone(), ctx.db_pool.clone());
    let token = app.admin_token().await;

    let (status, created) = app
        .request(
            Method::POST,
            "/api/admin/directory",
            Some(&token),
            Some(json!({ "name": "Thonglor Korean BBQ", "tier": "premium" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = app.get("/api/directory?limit=500").await;
    assert_eq!(status, StatusCode::OK);
    let cards = listed.as_array().unwrap();
    assert!(cards.len() <= 60);

    let (status, card) = app.get(&format!("/api/directory/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["name"], "Thonglor Korean BBQ");
    assert_eq!(card["premium_active"], true);

    let (status, _) = app
        .get(&format!("/api/directory/{}", portal_core::common::EntryId::new()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
