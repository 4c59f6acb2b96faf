//! 検索履歴テスト
//!
//! 履歴ファイルの保存・再読み込み・破損時の動作を検証

use dtc_search::history::{HistoryStore, PersistenceSink};
use tempfile::tempdir;

/// 履歴ファイルがなければ空
#[test]
fn test_history_missing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = HistoryStore::load(&dir.path().join("history.json"));

    assert!(store.files_for_user(1).is_empty());
    assert!(store.searches_for_user(1).is_empty());
}

/// 登録と検索記録の保存・再読み込み
#[test]
fn test_history_save_and_reload() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("history.json");

    let mut store = HistoryStore::load(&path);
    let file = store.register_file(1, "tickets.xlsx", "abc123", 120).unwrap();
    assert_eq!(file.id, 1);
    store
        .record_search(1, "abc123", "p15be", "[]", "Vérifier le fusible F26")
        .unwrap();

    let reloaded = HistoryStore::load(&path);
    let files = reloaded.files_for_user(1);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "tickets.xlsx");
    assert_eq!(files[0].row_count, 120);

    let searches = reloaded.searches_for_user(1);
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].file_id, 1);
    assert_eq!(searches[0].search_code, "p15be");
    assert_eq!(searches[0].ai_summary, "Vérifier le fusible F26");
}

/// 同じ内容のファイルは二重登録しない
#[test]
fn test_register_file_dedup() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = HistoryStore::load(&dir.path().join("history.json"));

    let first = store.register_file(1, "a.xlsx", "same", 10).unwrap();
    let second = store.register_file(1, "b.xlsx", "same", 10).unwrap();
    let other_user = store.register_file(2, "a.xlsx", "same", 10).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.file_name, "a.xlsx");
    assert_ne!(first.id, other_user.id);
    assert_eq!(store.files_for_user(1).len(), 1);
    assert_eq!(store.files_for_user(2).len(), 1);
}

/// 未登録ファイルの検索は file_id 0
#[test]
fn test_search_for_unknown_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = HistoryStore::load(&dir.path().join("history.json"));

    store.record_search(5, "unknown", "P20EE", "[]", "").unwrap();

    let searches = store.searches_for_user(5);
    assert_eq!(searches[0].file_id, 0);
    assert!(store.searches_for_user(1).is_empty());
}

/// 新しい順に並ぶ
#[test]
fn test_searches_newest_first() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = HistoryStore::load(&dir.path().join("history.json"));

    for code in ["A1", "B2", "C3"] {
        store.record_search(1, "k", code, "[]", "").unwrap();
    }

    let codes: Vec<_> = store
        .searches_for_user(1)
        .iter()
        .map(|s| s.search_code.clone())
        .collect();
    assert_eq!(codes, vec!["C3", "B2", "A1"]);
}

/// 壊れた履歴は .bak に退避して空として扱い、次の保存で作り直す
#[test]
fn test_history_corrupted_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("history.json");
    std::fs::write(&path, "{ invalid json }").unwrap();

    let mut store = HistoryStore::load(&path);
    assert!(store.searches_for_user(1).is_empty());

    // 元の内容は退避先に残る
    let backup = dir.path().join("history.json.bak");
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), "{ invalid json }");

    store.record_search(1, "k", "P15BE", "[]", "").unwrap();
    let reloaded = HistoryStore::load(&path);
    assert_eq!(reloaded.searches_for_user(1).len(), 1);
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), "{ invalid json }");
}

/// バージョン違いの履歴は読み込まず、退避する
#[test]
fn test_history_version_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("history.json");
    let old = r#"{"version": 99, "files": [], "searches": []}"#;
    std::fs::write(&path, old).unwrap();

    let store = HistoryStore::load(&path);
    assert!(store.files_for_user(1).is_empty());
    assert!(!path.exists());
    assert_eq!(std::fs::read_to_string(dir.path().join("history.json.bak")).unwrap(), old);
}

/// 書き込めない場所でも登録失敗は None で続行できる
#[test]
fn test_try_register_file_unwritable() {
    let dir = tempdir().expect("Failed to create temp dir");
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "file").unwrap();

    let mut store = HistoryStore::load(&blocker.join("history.json"));
    assert!(store.register_file(1, "a.xlsx", "k", 3).is_err());
    assert!(store.try_register_file(1, "b.xlsx", "k2", 3).is_none());
}
