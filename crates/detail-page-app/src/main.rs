//! # Asset Page Demo
//!
//! Drives one asset detail page through its full lifecycle the way the
//! router glue and the render layer would: mount in "new" mode, edit fields,
//! save, re-read the created asset, update it, and delete it.
//!
//! Run with `RUST_LOG=info cargo run` for compact logs, `RUST_LOG=debug` for
//! full detail.

use detail_page::tracing::setup_tracing;
use detail_page::{EntityPage, EntityRecord, PageClient, Route};
use detail_page_app::service::AssetService;
use detail_page_app::settings::AssetSettings;
use detail_page_app::shell::ConsoleShell;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Poll the page until the outstanding load/save settles.
async fn settled(client: &PageClient<AssetSettings>) -> detail_page::PageSnapshot<detail_page_app::model::Asset> {
    loop {
        let snapshot = client.snapshot().await.expect("page closed");
        if !snapshot.layout.blocking && snapshot.record.is_some() {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    info!("Starting asset detail-page demo");

    let service = Arc::new(AssetService::new());
    let (page, client) = EntityPage::new(
        AssetSettings::new(Arc::clone(&service)),
        Arc::new(ConsoleShell),
        32,
    );
    let page_handle = tokio::spawn(page.run());

    // Mount with no identifier: new-entity mode.
    client
        .mount(Route::new("loc-1"))
        .await
        .map_err(|e| e.to_string())?;
    settled(&client).await;

    // Edit a few fields, including one user-defined field.
    client
        .update_field("description", json!("Main feed pump"))
        .await
        .map_err(|e| e.to_string())?;
    client
        .update_field("department", json!("MAINT"))
        .await
        .map_err(|e| e.to_string())?;
    client
        .update_field("userDefinedFields.UDF01", json!("warehouse 3"))
        .await
        .map_err(|e| e.to_string())?;

    client.save().await.map_err(|e| e.to_string())?;
    let snapshot = settled(&client).await;
    let code = snapshot
        .record
        .as_ref()
        .and_then(EntityRecord::code)
        .ok_or("create did not assign a code")?;
    info!(%code, "Asset created");

    // Navigate to the created asset, as if the user followed a link.
    client
        .navigate(Route::new("loc-2").with_path_code(&code))
        .await
        .map_err(|e| e.to_string())?;
    settled(&client).await;

    client
        .update_field("description", json!("Main feed pump (refurbished)"))
        .await
        .map_err(|e| e.to_string())?;
    client.save().await.map_err(|e| e.to_string())?;
    settled(&client).await;
    info!(%code, "Asset updated");

    client.delete(&code).await.map_err(|e| e.to_string())?;
    client.snapshot().await.map_err(|e| e.to_string())?;
    info!(%code, "Asset deleted");

    // Dropping the client shuts the page loop down.
    drop(client);
    page_handle.await.map_err(|e| e.to_string())?;

    info!("Demo completed");
    Ok(())
}
