//! Integration tests for the bibliography store.
//!
//! These tests run the save/list/delete/export lifecycle against a real
//! SQLite database with migrations applied, including account scoping and
//! the cross-user ownership rules.

use std::io::Read;

use foliocite_core::{
    AccountError, Accounts, Article, Bibliography, BibliographyError, Book, CitationStyle,
    Database, EntryFilter, ExportFormat, SourceRecord, Website,
};
use tempfile::TempDir;

/// Helper to create a test database with migrations applied.
async fn setup_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let db = Database::new(&db_path)
        .await
        .expect("Failed to create database");

    (db, temp_dir)
}

async fn create_user(db: &Database, username: &str) -> i64 {
    Accounts::new(db.clone())
        .create(username, "argon2-test-hash")
        .await
        .expect("Failed to create user")
}

fn book(title: &str) -> SourceRecord {
    SourceRecord::Book(Book {
        title: title.to_string(),
        authors: vec!["Dawkins, Richard".to_string()],
        year: Some(1976),
        publisher: Some("Oxford University Press".to_string()),
        place: Some("Oxford".to_string()),
    })
}

fn article(title: &str) -> SourceRecord {
    SourceRecord::Article(Article {
        title: title.to_string(),
        authors: vec!["Hopfield, John J.".to_string()],
        year: Some(1982),
        journal: Some("PNAS".to_string()),
        volume: Some("79".to_string()),
        issue: Some("8".to_string()),
        pages: Some("2554-2558".to_string()),
        doi: Some("10.1073/pnas.79.8.2554".to_string()),
    })
}

fn website(title: &str) -> SourceRecord {
    SourceRecord::Website(Website {
        title: title.to_string(),
        authors: vec!["Matsakis, Niko".to_string()],
        year: Some(2015),
        site_name: Some("Rust Blog".to_string()),
        url: Some("https://blog.rust-lang.org/".to_string()),
        accessed: Some("12 Jan 2026".to_string()),
    })
}

// ==================== Accounts ====================

#[tokio::test]
async fn test_create_account_and_find_it_back() {
    let (db, _temp_dir) = setup_test_db().await;
    let accounts = Accounts::new(db);

    let id = accounts
        .create("alice", "argon2-test-hash")
        .await
        .expect("Failed to create user");
    assert!(id > 0);

    let user = accounts
        .find_by_username("alice")
        .await
        .expect("Failed to look up user")
        .expect("User should exist");
    assert_eq!(user.id, id);
    assert_eq!(user.username, "alice");
    assert_eq!(user.password_hash, "argon2-test-hash");
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let (db, _temp_dir) = setup_test_db().await;
    let accounts = Accounts::new(db);

    accounts
        .create("alice", "hash-one")
        .await
        .expect("Failed to create user");
    let err = accounts
        .create("alice", "hash-two")
        .await
        .expect_err("Second create should fail");

    assert!(matches!(err, AccountError::UsernameTaken(ref name) if name == "alice"));
}

#[tokio::test]
async fn test_ensure_reuses_the_existing_account() {
    let (db, _temp_dir) = setup_test_db().await;
    let accounts = Accounts::new(db);

    let first = accounts.ensure("alice").await.expect("Failed to ensure");
    let second = accounts.ensure("alice").await.expect("Failed to ensure");

    assert_eq!(first.id, second.id);
}

// ==================== Saving & Listing ====================

#[tokio::test]
async fn test_save_assigns_increasing_ids() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    let first = store
        .save(user_id, &book("Algorithms"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");
    let second = store
        .save(user_id, &book("Zen of Persistence"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");

    assert!(first > 0);
    assert!(second > first);
}

#[tokio::test]
async fn test_save_rejects_a_blank_title() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    let err = store
        .save(user_id, &book("   "), CitationStyle::Apa, None)
        .await
        .expect_err("Blank title should be rejected");

    assert!(matches!(err, BibliographyError::Validation(_)));
}

#[tokio::test]
async fn test_list_sorts_case_insensitively_by_title() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    for title in ["zen of Rust", "Algorithms", "macroeconomics"] {
        store
            .save(user_id, &book(title), CitationStyle::Apa, None)
            .await
            .expect("Failed to save");
    }

    let entries = store
        .list(user_id, EntryFilter::All)
        .await
        .expect("Failed to list");
    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Algorithms", "macroeconomics", "zen of Rust"]);
}

#[tokio::test]
async fn test_list_filters_by_source_kind() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    store
        .save(user_id, &book("A Book"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");
    store
        .save(user_id, &article("An Article"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");
    store
        .save(user_id, &website("A Page"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");

    let books = store
        .list(user_id, EntryFilter::Books)
        .await
        .expect("Failed to list");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "A Book");

    let articles = store
        .list(user_id, EntryFilter::Articles)
        .await
        .expect("Failed to list");
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "An Article");

    let websites = store
        .list(user_id, EntryFilter::Websites)
        .await
        .expect("Failed to list");
    assert_eq!(websites.len(), 1);
    assert_eq!(websites[0].title, "A Page");

    let all = store
        .list(user_id, EntryFilter::All)
        .await
        .expect("Failed to list");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_saved_entry_keeps_style_and_note() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    let id = store
        .save(
            user_id,
            &article("Spin Glasses"),
            CitationStyle::Vancouver,
            Some("first printing"),
        )
        .await
        .expect("Failed to save");

    let entry = store.get(user_id, id).await.expect("Failed to get");
    assert_eq!(entry.style(), CitationStyle::Vancouver);
    assert_eq!(entry.note.as_deref(), Some("first printing"));
    assert_eq!(entry.record(), article("Spin Glasses"));
}

#[tokio::test]
async fn test_entries_are_scoped_to_their_user() {
    let (db, _temp_dir) = setup_test_db().await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    let store = Bibliography::new(db);

    store
        .save(alice, &book("Alice's Book"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");
    store
        .save(alice, &article("Alice's Article"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");
    store
        .save(bob, &book("Bob's Book"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");

    let alice_entries = store
        .list(alice, EntryFilter::All)
        .await
        .expect("Failed to list");
    assert_eq!(alice_entries.len(), 2);

    let bob_entries = store
        .list(bob, EntryFilter::All)
        .await
        .expect("Failed to list");
    assert_eq!(bob_entries.len(), 1);
    assert_eq!(bob_entries[0].title, "Bob's Book");
}

// ==================== Ownership ====================

#[tokio::test]
async fn test_get_rejects_another_users_entry() {
    let (db, _temp_dir) = setup_test_db().await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    let store = Bibliography::new(db);

    let id = store
        .save(alice, &book("Private Notes"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");

    let err = store
        .get(bob, id)
        .await
        .expect_err("Cross-user read should fail");
    assert!(matches!(err, BibliographyError::Forbidden { entry_id } if entry_id == id));
}

#[tokio::test]
async fn test_delete_rejects_another_users_entry() {
    let (db, _temp_dir) = setup_test_db().await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    let store = Bibliography::new(db);

    let id = store
        .save(alice, &book("Keep Me"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");

    let err = store
        .delete(bob, id)
        .await
        .expect_err("Cross-user delete should fail");
    assert!(matches!(err, BibliographyError::Forbidden { .. }));

    let entries = store
        .list(alice, EntryFilter::All)
        .await
        .expect("Failed to list");
    assert_eq!(entries.len(), 1, "Entry should survive the rejected delete");
}

#[tokio::test]
async fn test_delete_removes_the_entry() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    let id = store
        .save(user_id, &book("Ephemeral"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");

    store.delete(user_id, id).await.expect("Failed to delete");

    let err = store
        .get(user_id, id)
        .await
        .expect_err("Deleted entry should be gone");
    assert!(matches!(err, BibliographyError::EntryNotFound(found) if found == id));
}

#[tokio::test]
async fn test_delete_unknown_id_reports_not_found() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    let err = store
        .delete(user_id, 9999)
        .await
        .expect_err("Unknown id should fail");
    assert!(matches!(err, BibliographyError::EntryNotFound(9999)));
}

#[tokio::test]
async fn test_clear_only_touches_the_callers_entries() {
    let (db, _temp_dir) = setup_test_db().await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    let store = Bibliography::new(db);

    store
        .save(alice, &book("One"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");
    store
        .save(alice, &book("Two"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");
    store
        .save(bob, &book("Bob's"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");

    let removed = store.clear(alice).await.expect("Failed to clear");
    assert_eq!(removed, 2);

    let alice_entries = store
        .list(alice, EntryFilter::All)
        .await
        .expect("Failed to list");
    assert!(alice_entries.is_empty());

    let bob_entries = store
        .list(bob, EntryFilter::All)
        .await
        .expect("Failed to list");
    assert_eq!(bob_entries.len(), 1);
}

#[tokio::test]
async fn test_update_note_sets_clears_and_respects_ownership() {
    let (db, _temp_dir) = setup_test_db().await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    let store = Bibliography::new(db);

    let id = store
        .save(alice, &book("Annotated"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");

    store
        .update_note(alice, id, Some("second printing"))
        .await
        .expect("Failed to set note");
    let entry = store.get(alice, id).await.expect("Failed to get");
    assert_eq!(entry.note.as_deref(), Some("second printing"));

    store
        .update_note(alice, id, None)
        .await
        .expect("Failed to clear note");
    let entry = store.get(alice, id).await.expect("Failed to get");
    assert_eq!(entry.note, None);

    let err = store
        .update_note(bob, id, Some("not yours"))
        .await
        .expect_err("Cross-user note update should fail");
    assert!(matches!(err, BibliographyError::Forbidden { .. }));
}

// ==================== Exports ====================

#[tokio::test]
async fn test_txt_export_renders_one_citation_per_line() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    store
        .save(user_id, &book("The Selfish Gene"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");
    store
        .save(
            user_id,
            &article("Neural networks and physical systems"),
            CitationStyle::Vancouver,
            None,
        )
        .await
        .expect("Failed to save");

    let bytes = store
        .export(user_id, ExportFormat::Txt)
        .await
        .expect("Failed to export");
    let text = String::from_utf8(bytes).expect("Export should be UTF-8");

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.contains(&"Dawkins, R. (1976). The Selfish Gene. Oxford University Press."));
    assert!(lines.contains(
        &"Hopfield JJ. Neural networks and physical systems. PNAS. 1982;79(8):2554-2558."
    ));
}

#[tokio::test]
async fn test_exports_leave_personal_notes_out() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    store
        .save(
            user_id,
            &book("Shared Reading"),
            CitationStyle::Apa,
            Some("do not share this remark"),
        )
        .await
        .expect("Failed to save");

    let txt = store
        .export(user_id, ExportFormat::Txt)
        .await
        .expect("Failed to export txt");
    assert!(!String::from_utf8_lossy(&txt).contains("do not share this remark"));

    let bib = store
        .export(user_id, ExportFormat::Bib)
        .await
        .expect("Failed to export bib");
    assert!(!String::from_utf8_lossy(&bib).contains("do not share this remark"));
}

#[tokio::test]
async fn test_bib_export_disambiguates_duplicate_keys() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    store
        .save(user_id, &book("The Selfish Gene"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");
    store
        .save(user_id, &book("The Extended Phenotype"), CitationStyle::Apa, None)
        .await
        .expect("Failed to save");

    let bytes = store
        .export(user_id, ExportFormat::Bib)
        .await
        .expect("Failed to export");
    let text = String::from_utf8(bytes).expect("Export should be UTF-8");

    assert!(text.contains("@book{dawkins1976a,"), "got:\n{text}");
    assert!(text.contains("@book{dawkins1976b,"), "got:\n{text}");
}

#[tokio::test]
async fn test_docx_export_is_a_word_package() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    store
        .save(
            user_id,
            &book("The Selfish Gene"),
            CitationStyle::Apa,
            Some("private remark"),
        )
        .await
        .expect("Failed to save");

    let bytes = store
        .export(user_id, ExportFormat::Docx)
        .await
        .expect("Failed to export");
    assert!(bytes.starts_with(b"PK"), "docx should be a zip archive");

    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor).expect("Failed to open docx");
    let mut part = archive
        .by_name("word/document.xml")
        .expect("Missing document part");
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("Failed to read part");

    assert!(xml.contains("The Selfish Gene"), "got:\n{xml}");
    assert!(!xml.contains("private remark"), "got:\n{xml}");
}

#[tokio::test]
async fn test_exporting_an_empty_bibliography_yields_empty_text() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = create_user(&db, "alice").await;
    let store = Bibliography::new(db);

    let txt = store
        .export(user_id, ExportFormat::Txt)
        .await
        .expect("Failed to export txt");
    assert!(txt.is_empty());

    let bib = store
        .export(user_id, ExportFormat::Bib)
        .await
        .expect("Failed to export bib");
    assert!(bib.is_empty());
}
