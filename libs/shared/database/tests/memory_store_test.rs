use serde_json::json;

use shared_database::{
    Aggregation, Document, DocumentStore, Filter, FindOptions, MemoryStore, SortOrder, UpdateOptions,
};

fn doc(value: serde_json::Value) -> Document {
    value.as_object().cloned().unwrap()
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for (id, email, price) in [("p1", "a@x.com", 30), ("p2", "b@x.com", 45), ("p3", "a@x.com", 25)] {
        store
            .insert_one("payments", doc(json!({ "id": id, "email": email, "price": price })))
            .await
            .unwrap();
    }
    store
}

#[tokio::test]
async fn test_insert_assigns_id_when_missing() {
    let store = MemoryStore::new();

    let result = store
        .insert_one("newsletter", doc(json!({ "email": "n@x.com" })))
        .await
        .unwrap();

    assert!(result.acknowledged);
    let found = store
        .find_one("newsletter", &Filter::by_id(&result.inserted_id))
        .await
        .unwrap()
        .expect("inserted document");
    assert_eq!(found["email"], "n@x.com");
}

#[tokio::test]
async fn test_find_sorts_pages_and_projects() {
    let store = seeded_store().await;

    let options = FindOptions::default()
        .sort_by("price", SortOrder::Descending)
        .page(1, 1)
        .project(&["price"]);
    let page = store.find("payments", &Filter::new(), &options).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"], "p1");
    assert_eq!(page[0]["price"], 30);
    assert!(page[0].get("email").is_none());
}

#[tokio::test]
async fn test_update_one_reports_counts() {
    let store = seeded_store().await;

    let mut set = Document::new();
    set.insert("price".to_string(), json!(99));
    let result = store
        .update_one("payments", &Filter::by_id("p2"), set.clone(), UpdateOptions::default())
        .await
        .unwrap();
    assert_eq!(result.matched_count, 1);
    assert_eq!(result.modified_count, 1);

    // same value again: matched but not modified
    let result = store
        .update_one("payments", &Filter::by_id("p2"), set, UpdateOptions::default())
        .await
        .unwrap();
    assert_eq!(result.matched_count, 1);
    assert_eq!(result.modified_count, 0);
}

#[tokio::test]
async fn test_update_one_without_match_leaves_store_unchanged() {
    let store = seeded_store().await;
    let before = store.dump("payments").await;

    let mut set = Document::new();
    set.insert("price".to_string(), json!(1));
    let result = store
        .update_one("payments", &Filter::by_id("missing"), set, UpdateOptions::default())
        .await
        .unwrap();

    assert_eq!(result.matched_count, 0);
    assert_eq!(result.upserted_id, None);
    assert_eq!(store.dump("payments").await, before);
}

#[tokio::test]
async fn test_upsert_seeds_from_filter() {
    let store = MemoryStore::new();

    let mut set = Document::new();
    set.insert("role".to_string(), json!("member"));
    let result = store
        .update_one(
            "users",
            &Filter::new().eq("email", "new@x.com"),
            set,
            UpdateOptions { upsert: true },
        )
        .await
        .unwrap();

    assert!(result.upserted_id.is_some());
    let user = store
        .find_one("users", &Filter::new().eq("email", "new@x.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user["role"], "member");
}

#[tokio::test]
async fn test_delete_one_removes_a_single_match() {
    let store = seeded_store().await;

    let result = store
        .delete_one("payments", &Filter::new().eq("email", "a@x.com"))
        .await
        .unwrap();

    assert_eq!(result.deleted_count, 1);
    assert_eq!(store.count_documents("payments", &Filter::new()).await.unwrap(), 2);

    let result = store.delete_one("payments", &Filter::by_id("missing")).await.unwrap();
    assert_eq!(result.deleted_count, 0);
}

#[tokio::test]
async fn test_counts_and_aggregates() {
    let store = seeded_store().await;

    assert_eq!(store.estimated_document_count("payments").await.unwrap(), 3);
    assert_eq!(store.estimated_document_count("unknown").await.unwrap(), 0);
    assert_eq!(
        store
            .count_documents("payments", &Filter::new().eq("email", "a@x.com"))
            .await
            .unwrap(),
        2
    );

    let revenue = store
        .aggregate("payments", &Filter::new(), &Aggregation::Sum("price".into()))
        .await
        .unwrap();
    assert_eq!(revenue.as_f64(), Some(100.0));

    let members = store
        .aggregate("payments", &Filter::new(), &Aggregation::CountDistinct("email".into()))
        .await
        .unwrap();
    assert_eq!(members.as_u64(), Some(2));
}
