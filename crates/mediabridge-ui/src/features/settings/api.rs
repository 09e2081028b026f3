//! Settings data access: load, re-sync, and bulk save.

use mediabridge_client::{ApiResult, QueryClient, QueryResult};
use tracing::{info, warn};

use crate::features::dashboard::state::StatusSummary;
use crate::features::settings::editor::SettingsEditor;

/// Result of a save attempt that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The draft was written and is clean again.
    Saved,
    /// The draft had no unsaved edits; nothing was sent.
    NothingToSave,
}

/// Build an editor from the configuration query; `None` when the backend has
/// no configuration.
///
/// # Errors
///
/// Returns the query failure after retries.
pub async fn load_editor(client: &QueryClient) -> QueryResult<Option<SettingsEditor>> {
    Ok(client
        .config()
        .await?
        .map(|config| SettingsEditor::from_server(&config)))
}

/// Monitor status line shown above the settings form.
///
/// # Errors
///
/// Returns the query failure after retries.
pub async fn load_status_line(client: &QueryClient) -> QueryResult<Option<StatusSummary>> {
    Ok(client.status().await?.as_ref().map(StatusSummary::from))
}

/// Re-read the configuration and replace a clean draft with it.
///
/// Returns whether the draft was replaced.
///
/// # Errors
///
/// Returns the query failure after retries.
pub async fn refresh_editor(client: &QueryClient, editor: &mut SettingsEditor) -> QueryResult<bool> {
    let Some(config) = client.config().await? else {
        return Ok(false);
    };
    Ok(editor.sync_from_server(&config))
}

/// Write the draft as one bulk update.
///
/// Clean drafts send nothing. On failure the draft stays dirty with the error
/// recorded so the user can retry.
///
/// # Errors
///
/// Propagates the backend failure.
pub async fn save(client: &QueryClient, editor: &mut SettingsEditor) -> ApiResult<SaveOutcome> {
    let Some(request) = editor.begin_save() else {
        return Ok(SaveOutcome::NothingToSave);
    };
    match client.update_config(&request).await {
        Ok(_) => {
            editor.finish_save(Ok(()));
            info!("settings saved");
            if let Some(config) = client.config().await.ok().flatten() {
                editor.sync_from_server(&config);
            }
            Ok(SaveOutcome::Saved)
        }
        Err(err) => {
            warn!(error = %err, "settings save failed; draft kept");
            editor.finish_save(Err(err.to_string()));
            Err(err)
        }
    }
}
