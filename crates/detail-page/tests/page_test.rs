use detail_page::mock::{wait_for_snapshot, MockField, MockSettings, RecordingShell};
use detail_page::{
    DynamicRecord, EntityPage, PageClient, PageKey, PageView, Route, ServiceError,
};
use detail_page::{EntityRecord, FieldError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

type AssetMock = MockSettings<DynamicRecord>;

fn asset(code: &str, name: &str) -> DynamicRecord {
    DynamicRecord::new("code")
        .with_field("code", json!(code))
        .with_field("name", json!(name))
}

fn blank_asset() -> DynamicRecord {
    DynamicRecord::new("code")
}

fn spawn_page(mock: &AssetMock, shell: &RecordingShell) -> PageClient<AssetMock> {
    let (page, client) = EntityPage::new(mock.clone(), Arc::new(shell.clone()), 32);
    tokio::spawn(page.run());
    client
}

async fn wait_for_calls(mock: &AssetMock, count: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while mock.calls().len() < count {
        if tokio::time::Instant::now() >= deadline {
            panic!(
                "expected {count} service calls, saw {:?}",
                mock.calls()
            );
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

// --- Mount & Navigation ---

#[tokio::test]
async fn mount_with_path_code_reads_and_resets_layout() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();

    let snapshot = wait_for_snapshot(&client, |s| s.record.is_some()).await;
    assert!(!snapshot.layout.blocking);
    assert!(!snapshot.layout.is_new_entity);
    assert!(!snapshot.layout.is_modified);
    assert_eq!(snapshot.read_error, None);
    assert_eq!(
        snapshot.record.unwrap().code(),
        Some("P1".to_owned())
    );
    mock.verify();
}

#[tokio::test]
async fn mount_without_code_initializes_new_entity() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_init().return_ok(blank_asset());
    let client = spawn_page(&mock, &shell);

    client.mount(Route::new("loc-1")).await.unwrap();

    let snapshot = wait_for_snapshot(&client, |s| s.record.is_some()).await;
    assert!(snapshot.layout.is_new_entity);
    assert!(!snapshot.layout.blocking);
    assert!(matches!(snapshot.view, PageView::Form(_)));
    mock.verify();
}

#[tokio::test]
async fn mount_with_query_code_redirects_without_loading() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    let client = spawn_page(&mock, &shell);

    client
        .mount(
            Route::new("loc-1")
                .with_path_code("P1")
                .with_query_code("B2"),
        )
        .await
        .unwrap();
    // Snapshot is processed after the mount, so this is deterministic.
    client.snapshot().await.unwrap();

    assert_eq!(shell.log().navigations, vec!["/assets/B2".to_owned()]);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn rerender_of_same_location_triggers_no_read() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    // Same location key: a re-render, not a route change.
    client
        .navigate(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    client.snapshot().await.unwrap();

    assert_eq!(mock.calls(), vec!["read_entity".to_owned()]);
    mock.verify();
}

#[tokio::test]
async fn navigation_with_unchanged_identifier_triggers_no_read() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    // New location key, same identifier.
    client
        .navigate(Route::new("loc-2").with_path_code("P1"))
        .await
        .unwrap();
    client.snapshot().await.unwrap();

    assert_eq!(mock.calls(), vec!["read_entity".to_owned()]);
    mock.verify();
}

#[tokio::test]
async fn navigation_to_new_identifier_reads_it() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    mock.expect_read("P2").return_ok(asset("P2", "Valve"));
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    client
        .navigate(Route::new("loc-2").with_path_code("P2"))
        .await
        .unwrap();

    let snapshot =
        wait_for_snapshot(&client, |s| {
            s.record.as_ref().and_then(EntityRecord::code) == Some("P2".to_owned())
        })
        .await;
    assert!(!snapshot.layout.blocking);
    mock.verify();
}

#[tokio::test]
async fn navigation_to_empty_identifier_initializes_new_entity() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    mock.expect_init().return_ok(blank_asset());
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    client.navigate(Route::new("loc-2")).await.unwrap();

    let snapshot = wait_for_snapshot(&client, |s| s.layout.is_new_entity).await;
    assert_eq!(snapshot.record.unwrap().code(), None);
    mock.verify();
}

// --- Cancellation Discipline ---

#[tokio::test]
async fn superseded_read_never_mutates_state() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    let gate_a = mock.expect_read("A").return_ok_held(asset("A", "First"));
    let gate_b = mock.expect_read("B").return_ok_held(asset("B", "Second"));
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("A"))
        .await
        .unwrap();
    wait_for_calls(&mock, 1).await;

    client
        .navigate(Route::new("loc-2").with_path_code("B"))
        .await
        .unwrap();
    wait_for_calls(&mock, 2).await;

    // Resolve in inverted order: B first, then the superseded A.
    gate_b.release();
    let snapshot = wait_for_snapshot(&client, |s| s.record.is_some()).await;
    assert_eq!(snapshot.record.unwrap().code(), Some("B".to_owned()));

    gate_a.release();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let snapshot = client.snapshot().await.unwrap();
    assert_eq!(snapshot.record.unwrap().code(), Some("B".to_owned()));
    assert!(!snapshot.layout.blocking);
    // The cancelled read was swallowed, not surfaced.
    assert!(shell.log().handled_errors.is_empty());
}

#[tokio::test]
async fn read_supersedes_pending_new_entity_init() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    let init_gate = mock.expect_init().return_ok_held(blank_asset());
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    let client = spawn_page(&mock, &shell);

    client.mount(Route::new("loc-1")).await.unwrap();
    wait_for_calls(&mock, 1).await;

    client
        .navigate(Route::new("loc-2").with_path_code("P1"))
        .await
        .unwrap();
    let snapshot = wait_for_snapshot(&client, |s| s.record.is_some()).await;
    assert!(!snapshot.layout.is_new_entity);

    // The init resolves late; its completion belongs to a superseded load.
    init_gate.release();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let snapshot = client.snapshot().await.unwrap();
    assert!(!snapshot.layout.is_new_entity);
    assert_eq!(snapshot.record.unwrap().code(), Some("P1".to_owned()));
}

#[tokio::test]
async fn new_entity_init_supersedes_pending_read() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    let read_gate = mock.expect_read("P1").return_ok_held(asset("P1", "Pump"));
    mock.expect_init().return_ok(blank_asset());
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    wait_for_calls(&mock, 1).await;

    // Navigating to the bare detail URL while the read is outstanding.
    client.navigate(Route::new("loc-2")).await.unwrap();
    let snapshot = wait_for_snapshot(&client, |s| s.record.is_some()).await;
    assert!(snapshot.layout.is_new_entity);

    // The superseded read resolves as cancelled and is swallowed.
    read_gate.release();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let snapshot = client.snapshot().await.unwrap();
    assert!(snapshot.layout.is_new_entity);
    assert_eq!(snapshot.record.unwrap().code(), None);
    assert!(shell.log().handled_errors.is_empty());
}

// --- Field Edits ---

#[tokio::test]
async fn update_field_merges_user_defined_fields_only() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("P1").return_ok(
        asset("P1", "Pump")
            .with_field("userDefinedFields", json!({"UDF01": "a", "UDF02": "b"})),
    );
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    client
        .update_field("userDefinedFields.UDF01", json!("edited"))
        .await
        .unwrap();

    let snapshot = client.snapshot().await.unwrap();
    assert!(snapshot.layout.is_modified);
    let record = snapshot.record.unwrap();
    assert_eq!(record.user_defined("UDF01"), Some(&json!("edited")));
    assert_eq!(record.user_defined("UDF02"), Some(&json!("b")));
    assert_eq!(record.get("name"), Some(&json!("Pump")));
    assert_eq!(record.code(), Some("P1".to_owned()));
}

// --- Save, Create & Update ---

#[tokio::test]
async fn create_flow_stores_record_rewrites_url_and_notifies() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_init().return_ok(blank_asset());
    mock.expect_create().return_ok(asset("P1", "Pump"));
    let client = spawn_page(&mock, &shell);

    client.mount(Route::new("loc-1")).await.unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    client.update_field("name", json!("Pump")).await.unwrap();
    client.save().await.unwrap();

    let snapshot = wait_for_snapshot(&client, |s| !s.layout.is_new_entity).await;
    assert!(!snapshot.layout.blocking);
    assert!(!snapshot.layout.is_modified);
    let record = snapshot.record.unwrap();
    assert_eq!(record.code(), Some("P1".to_owned()));
    assert_eq!(record.get("name"), Some(&json!("Pump")));

    let log = shell.log();
    assert_eq!(log.rewrites, vec!["/assets/P1".to_owned()]);
    assert_eq!(log.navigations, Vec::<String>::new());
    assert!(log.notifications[0].contains("P1"));
    assert!(log.notifications[0].contains("created"));

    // The submitted record was the edited one, still without a code.
    let submitted = &mock.submissions()[0];
    assert_eq!(submitted.get("name"), Some(&json!("Pump")));
    assert_eq!(submitted.code(), None);
    mock.verify();
}

#[tokio::test]
async fn update_flow_notifies_and_keeps_location() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    mock.expect_update().return_ok(asset("P1", "Pump XL"));
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    client.update_field("name", json!("Pump XL")).await.unwrap();
    client.save().await.unwrap();

    let snapshot = wait_for_snapshot(&client, |s| !s.layout.is_modified).await;
    assert_eq!(
        snapshot.record.unwrap().get("name"),
        Some(&json!("Pump XL"))
    );

    let log = shell.log();
    assert!(log.notifications[0].contains("updated"));
    assert!(log.rewrites.is_empty());
    mock.verify();
}

#[tokio::test]
async fn failed_validation_blocks_save_without_network_calls() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_init().return_ok(blank_asset());
    let client = spawn_page(&mock, &shell);

    let (failing, _) = MockField::full(false);
    let (passing, _) = MockField::full(true);
    client.register_child("name", failing).await.unwrap();
    client.register_child("department", passing).await.unwrap();

    client.mount(Route::new("loc-1")).await.unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    client.save().await.unwrap();
    client.snapshot().await.unwrap();

    assert_eq!(
        shell.log().error_toasts,
        vec!["Several errors have occurred".to_owned()]
    );
    assert_eq!(mock.calls(), vec!["init_new_entity".to_owned()]);
    mock.verify();
}

#[tokio::test]
async fn confirm_key_triggers_save() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_init().return_ok(blank_asset());
    mock.expect_create().return_ok(asset("P1", "Pump"));
    let client = spawn_page(&mock, &shell);

    client.mount(Route::new("loc-1")).await.unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    client.press_key(PageKey::Other).await.unwrap();
    client.press_key(PageKey::Enter).await.unwrap();

    wait_for_snapshot(&client, |s| !s.layout.is_new_entity).await;
    mock.verify();
}

#[tokio::test]
async fn rejected_create_maps_field_errors_onto_children() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_init().return_ok(blank_asset());
    mock.expect_create().return_err(ServiceError::Rejected {
        message: "Asset could not be created".to_owned(),
        errors: vec![
            FieldError::new("name", "Name is mandatory"),
            FieldError::new("somewhere.else", "No child registered here"),
        ],
    });
    let client = spawn_page(&mock, &shell);

    let (name, name_probe) = MockField::full(true);
    client.register_child("name", name).await.unwrap();

    client.mount(Route::new("loc-1")).await.unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    client.save().await.unwrap();

    let snapshot = wait_for_snapshot(&client, |s| !s.layout.blocking).await;
    assert!(snapshot.layout.is_new_entity, "create failed, still new");
    assert!(name_probe.has_error());
    assert_eq!(
        name_probe.helper_text(),
        Some("Name is mandatory".to_owned())
    );
    assert_eq!(
        shell.log().handled_errors,
        vec!["Asset could not be created".to_owned()]
    );
    mock.verify();
}

// --- Read Failures & Access ---

#[tokio::test]
async fn read_failure_replaces_form_with_page_level_error() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("MISSING")
        .return_err(ServiceError::rejected("Asset MISSING not found"));
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("MISSING"))
        .await
        .unwrap();

    let snapshot = wait_for_snapshot(&client, |s| s.read_error.is_some()).await;
    assert!(!snapshot.layout.blocking);
    assert_eq!(
        snapshot.view,
        PageView::ReadError(vec!["Asset MISSING not found".to_owned()])
    );
}

#[tokio::test]
async fn successful_read_clears_previous_read_error() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("MISSING")
        .return_err(ServiceError::rejected("Asset MISSING not found"));
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("MISSING"))
        .await
        .unwrap();
    wait_for_snapshot(&client, |s| s.read_error.is_some()).await;

    client
        .navigate(Route::new("loc-2").with_path_code("P1"))
        .await
        .unwrap();

    let snapshot = wait_for_snapshot(&client, |s| s.record.is_some()).await;
    assert_eq!(snapshot.read_error, None);
    assert!(matches!(snapshot.view, PageView::Form(_)));
}

#[tokio::test]
async fn denied_access_never_issues_network_calls() {
    let mock = AssetMock::new("Asset", "/assets/");
    mock.deny_access();
    let shell = RecordingShell::new();
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    let snapshot = client.snapshot().await.unwrap();

    assert_eq!(
        snapshot.view,
        PageView::AccessDenied {
            entity_desc: "Asset".to_owned()
        }
    );
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn read_only_screen_disables_registered_children() {
    let mock = AssetMock::new("Asset", "/assets/");
    mock.read_only();
    let shell = RecordingShell::new();
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    let client = spawn_page(&mock, &shell);

    let (name, probe) = MockField::full(true);
    client.register_child("name", name).await.unwrap();

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    assert!(!probe.is_enabled());
}

// --- Delete ---

#[tokio::test]
async fn delete_notifies_and_navigates_to_listing() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    mock.expect_delete("P1").return_ok();
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    client.delete("P1").await.unwrap();
    client.snapshot().await.unwrap();

    let log = shell.log();
    assert!(log.notifications[0].contains("deleted"));
    assert_eq!(log.navigations, vec!["/assets/".to_owned()]);
    mock.verify();
}

#[tokio::test]
async fn failed_delete_surfaces_error_and_unblocks() {
    let mock = AssetMock::new("Asset", "/assets/");
    let shell = RecordingShell::new();
    mock.expect_read("P1").return_ok(asset("P1", "Pump"));
    mock.expect_delete("P1")
        .return_err(ServiceError::Transport("connection reset".to_owned()));
    let client = spawn_page(&mock, &shell);

    client
        .mount(Route::new("loc-1").with_path_code("P1"))
        .await
        .unwrap();
    wait_for_snapshot(&client, |s| s.record.is_some()).await;

    client.delete("P1").await.unwrap();
    let snapshot = client.snapshot().await.unwrap();

    assert!(!snapshot.layout.blocking);
    assert_eq!(
        shell.log().handled_errors,
        vec!["transport failure: connection reset".to_owned()]
    );
    assert!(shell.log().navigations.is_empty());
}
