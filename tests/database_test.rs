//! Achievement store behaviour against an on-disk SQLite database

use chrono::{TimeZone, Utc};
use loyalty_points::db::Database;
use loyalty_points::models::NewAchievement;
use loyalty_points::repository::{AchievementStore, SqliteAchievementStore};
use tempfile::{tempdir, TempDir};

fn open_store() -> (TempDir, SqliteAchievementStore) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let db = Database::new(&db_url).expect("Failed to create database");
    (temp_dir, SqliteAchievementStore::new(db))
}

async fn seed(store: &SqliteAchievementStore, employee: &str, department: &str, point: &str) -> i64 {
    store
        .insert(NewAchievement::new(employee, department, "did something", point))
        .await
        .expect("Failed to insert achievement")
        .id
}

#[test]
fn test_database_creation_and_initialization() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("nested").join("test.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let db = Database::new(&db_url).expect("Failed to create database");

    let _conn = db.get_connection().expect("Failed to get database connection");
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_ids_strictly_increase() {
    let (_dir, store) = open_store();

    let mut previous = 0;
    for i in 0..5 {
        let id = seed(&store, &format!("Employee {i}"), "R&D", "1").await;
        assert!(id > previous, "id {id} not greater than {previous}");
        previous = id;
    }
}

#[tokio::test]
async fn test_insert_accepts_empty_fields() {
    let (_dir, store) = open_store();

    let row = store
        .insert(NewAchievement::new("", "", "", ""))
        .await
        .expect("Failed to insert achievement");

    assert_eq!(row.employee, "");
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_ts_is_stable_across_reads() {
    let (_dir, store) = open_store();

    let inserted = store
        .insert(NewAchievement::new("Smith", "Sales", "Closed deal", "4"))
        .await
        .unwrap();

    let first = store.search(None).await.unwrap();
    let second = store.search(Some("Smith".to_string())).await.unwrap();

    assert_eq!(first[0].update_ts, inserted.update_ts);
    assert_eq!(second[0].update_ts, inserted.update_ts);
}

#[tokio::test]
async fn test_supplied_timestamp_is_kept() {
    let (_dir, store) = open_store();
    let ts = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 58).unwrap();

    let mut new = NewAchievement::new("Smith", "Sales", "Closed deal", "4");
    new.update_ts = Some(ts);
    store.insert(new).await.unwrap();

    let rows = store.search(None).await.unwrap();
    assert_eq!(rows[0].update_ts, ts);
    assert_eq!(rows[0].update_ts_display(), "2023-12-31T23:59:58+00:00");
}

#[tokio::test]
async fn test_most_recent_department_prefers_highest_id() {
    let (_dir, store) = open_store();

    seed(&store, "Ivanov", "Sales", "1").await;
    seed(&store, "Ivanov", "R&D", "1").await;
    seed(&store, "Petrov", "Design", "1").await;

    let department = store.most_recent_department("Ivanov".to_string()).await.unwrap();

    assert_eq!(department.as_deref(), Some("R&D"));
}

#[tokio::test]
async fn test_most_recent_department_requires_exact_name() {
    let (_dir, store) = open_store();

    seed(&store, "Ivanov Ivan", "R&D", "1").await;

    assert_eq!(store.most_recent_department("Ivanov".to_string()).await.unwrap(), None);
    assert_eq!(store.most_recent_department("ivanov ivan".to_string()).await.unwrap(), None);
}

#[tokio::test]
async fn test_most_recent_department_none_for_unknown_employee() {
    let (_dir, store) = open_store();

    assert_eq!(store.most_recent_department("Nobody".to_string()).await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_or_absent_filter_returns_everything() {
    let (_dir, store) = open_store();

    seed(&store, "John Smith", "Sales", "1").await;
    seed(&store, "Ivanov", "R&D", "2").await;
    seed(&store, "Anna Smithson", "Design", "3").await;

    let all = store.search(None).await.unwrap();
    let empty = store.search(Some(String::new())).await.unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(all, empty);
    assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[tokio::test]
async fn test_search_matches_substring() {
    let (_dir, store) = open_store();

    seed(&store, "John Smith", "Sales", "1").await;
    seed(&store, "Ivanov", "R&D", "2").await;
    seed(&store, "Anna Smithson", "Design", "3").await;

    let rows = store.search(Some("Smith".to_string())).await.unwrap();

    let names: Vec<_> = rows.iter().map(|row| row.employee.as_str()).collect();
    assert_eq!(names, ["John Smith", "Anna Smithson"]);
}

#[tokio::test]
async fn test_search_is_case_sensitive() {
    let (_dir, store) = open_store();

    seed(&store, "John Smith", "Sales", "1").await;

    assert!(store.search(Some("smith".to_string())).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let (_dir, store) = open_store();

    seed(&store, "John Smith", "Sales", "1").await;
    seed(&store, "100%_Kim", "Sales", "1").await;

    let percent = store.search(Some("%".to_string())).await.unwrap();
    let underscore = store.search(Some("J_hn".to_string())).await.unwrap();

    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].employee, "100%_Kim");
    assert!(underscore.is_empty());
}

#[tokio::test]
async fn test_delete_missing_id_is_noop() {
    let (_dir, store) = open_store();

    let id = seed(&store, "Ivanov", "R&D", "1").await;

    assert!(!store.delete_by_id(id + 100).await.unwrap());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_existing_id_removes_one_row() {
    let (_dir, store) = open_store();

    let keep = seed(&store, "Ivanov", "R&D", "1").await;
    let gone = seed(&store, "Ivanov", "R&D", "2").await;

    assert!(store.delete_by_id(gone).await.unwrap());

    assert_eq!(store.count().await.unwrap(), 1);
    let rows = store.search(Some("Ivanov".to_string())).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, keep);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_url = format!("sqlite:{}", temp_dir.path().join("test.db").display());

    {
        let store = SqliteAchievementStore::new(Database::new(&db_url).unwrap());
        seed(&store, "Ivanov", "R&D", "5").await;
    }

    let store = SqliteAchievementStore::new(Database::new(&db_url).unwrap());
    assert_eq!(store.count().await.unwrap(), 1);
}
