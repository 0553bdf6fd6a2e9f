use chrono::Duration;
use maglab_core::time::fixed_now;
use storage::repository::{ActivityLogRepository, NewActivityRow, Storage};
use storage::sqlite::SqliteRepository;

fn row(source: &str, fields: &[&str], minutes: i64) -> NewActivityRow {
    NewActivityRow {
        source: source.into(),
        fields: fields.iter().map(|f| (*f).to_string()).collect(),
        logged_at: fixed_now() + Duration::minutes(minutes),
    }
}

#[tokio::test]
async fn sqlite_keeps_cell_order_and_blanks() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_cells?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let fields = [
        "20301",
        "Kim",
        "3",
        "report submitted (23-11-14 22:13)",
        "first",
        "",
        "third",
        "nice work",
        "",
    ];
    let id = repo.append_row(&row("report", &fields, 0)).await.unwrap();

    let recent = repo.list_recent(5).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, id);
    assert_eq!(recent[0].source, "report");
    assert_eq!(recent[0].fields, fields);
    assert_eq!(recent[0].logged_at, fixed_now());
}

#[tokio::test]
async fn sqlite_lists_newest_first_with_limit() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_recent?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    for i in 0..4 {
        let tag = i.to_string();
        repo.append_row(&row("wrap-up", &[tag.as_str(), "x"], i))
            .await
            .unwrap();
    }

    let recent = repo.list_recent(3).await.unwrap();
    let firsts: Vec<_> = recent.iter().map(|r| r.field(0).unwrap().to_owned()).collect();
    assert_eq!(firsts, vec!["3", "2", "1"]);
    assert!(recent.iter().all(|r| r.fields.len() == 2));
    assert_eq!(repo.count_rows().await.unwrap(), 4);
}

#[tokio::test]
async fn migrate_twice_is_harmless() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.count_rows().await.unwrap(), 0);
}

#[tokio::test]
async fn storage_facade_uses_sqlite() {
    let storage = Storage::sqlite("sqlite:file:memdb_facade?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .activity
        .append_row(&row("inquiry", &["20301", "Kim"], 0))
        .await
        .unwrap();
    assert_eq!(storage.activity.count_rows().await.unwrap(), 1);
}
