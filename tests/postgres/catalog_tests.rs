//! Tag and stage catalog tests for `PostgreSQL`.

use crate::postgres::helpers::{
    CleanupGuard, count_rows, database_name, ensure_template, setup_pool, test_runtime,
};
use activity_import::task::{
    adapters::postgres::{PostgresStageCatalog, PostgresTagCatalog},
    domain::{StageLabel, StandardStage, TagCategory, TagLabel},
    ports::{StageCatalog, TagCatalog},
};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

#[rstest]
fn repeated_tag_get_or_create_returns_one_tag(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_tag_repeat");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let catalog = PostgresTagCatalog::new(pool.clone());
    let label = TagLabel::new("Sopralluogo").expect("valid label");

    let rt = test_runtime();
    let first = rt
        .block_on(catalog.get_or_create(&label, TagCategory::MacroType))
        .expect("first get_or_create");
    let second = rt
        .block_on(catalog.get_or_create(&label, TagCategory::MacroType))
        .expect("second get_or_create");

    assert_eq!(first.id(), second.id());
    let listed = rt
        .block_on(catalog.list(TagCategory::MacroType))
        .expect("list tags");
    assert_eq!(listed.len(), 1);
    assert_eq!(count_rows(&pool, "task_tags"), 1);
}

#[rstest]
fn same_label_is_distinct_per_category(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_tag_category");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let catalog = PostgresTagCatalog::new(pool.clone());
    let label = TagLabel::new("Manutenzione").expect("valid label");

    let rt = test_runtime();
    let macro_tag = rt
        .block_on(catalog.get_or_create(&label, TagCategory::MacroType))
        .expect("macro tag");
    let activity_tag = rt
        .block_on(catalog.get_or_create(&label, TagCategory::ActivityType))
        .expect("activity tag");

    assert_ne!(macro_tag.id(), activity_tag.id());
    let found = rt
        .block_on(catalog.find(&label, TagCategory::ActivityType))
        .expect("find tag")
        .expect("tag should exist");
    assert_eq!(found.id(), activity_tag.id());
    assert_eq!(count_rows(&pool, "task_tags"), 2);
}

#[rstest]
fn concurrent_tag_get_or_create_leaves_single_row(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_tag_concurrent");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let catalog = PostgresTagCatalog::new(pool.clone());
    let label = TagLabel::new("Collaudo").expect("valid label");

    let rt = test_runtime();
    let ids = rt.block_on(async {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let worker = catalog.clone();
                let wanted = label.clone();
                tokio::spawn(async move {
                    worker
                        .get_or_create(&wanted, TagCategory::ActivityType)
                        .await
                })
            })
            .collect();
        let mut ids = Vec::new();
        for handle in handles {
            let tag = handle
                .await
                .expect("task should not panic")
                .expect("get_or_create");
            ids.push(tag.id());
        }
        ids
    });

    assert!(ids.windows(2).all(|pair| pair.first() == pair.last()));
    assert_eq!(count_rows(&pool, "task_tags"), 1);
}

#[rstest]
fn stage_reuse_ignores_label_case(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_stage_case");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("pool setup");
    let catalog = PostgresStageCatalog::new(pool.clone());

    let rt = test_runtime();
    let completed = rt
        .block_on(catalog.get_or_create(&StageLabel::from(StandardStage::Completed)))
        .expect("create stage");
    let shouted = rt
        .block_on(catalog.get_or_create(&StageLabel::new("COMPLETATA").expect("valid label")))
        .expect("reuse stage");

    assert_eq!(completed.id(), shouted.id());
    assert_eq!(shouted.label().as_str(), "Completata");
    assert!(shouted.is_folded());
    assert_eq!(count_rows(&pool, "task_stages"), 1);

    let loaded = rt
        .block_on(catalog.find_by_id(completed.id()))
        .expect("find stage")
        .expect("stage should exist");
    assert_eq!(loaded.label().as_str(), "Completata");
}
