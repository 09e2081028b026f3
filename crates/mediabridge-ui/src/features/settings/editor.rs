//! Draft editor state machine.

use mediabridge_api_models::{ConfigResponse, UpdateConfigRequest};
use thiserror::Error;
use tracing::debug;

use crate::features::settings::logic::{
    library_from_form, normalize_format, normalize_keyword, parse_u32, parse_u64,
};
use crate::features::settings::state::{
    ConfirmPrompt, DraftConfig, DraftField, DraftPhase, LibraryForm, PendingAction,
};

/// Edits the editor refused to apply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// A required field was blank.
    #[error("{field} must not be empty")]
    Blank {
        /// Field name.
        field: &'static str,
    },
    /// A numeric field did not parse.
    #[error("{field} must be a non-negative integer, got '{value}'")]
    InvalidNumber {
        /// Field name.
        field: &'static str,
        /// Raw input.
        value: String,
    },
    /// The entry being edited is not in the draft.
    #[error("{0} not found")]
    NotFound(String),
    /// A confirmation prompt must be answered first.
    #[error("a confirmation is pending")]
    PromptPending,
    /// `confirm` was called with nothing to confirm.
    #[error("nothing to confirm")]
    NoPrompt,
    /// The draft is being saved.
    #[error("a save is in progress")]
    SaveInFlight,
}

/// Result of a list edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The draft changed.
    Applied,
    /// A prompt was opened; see [`SettingsEditor::prompt`].
    NeedsConfirmation,
}

/// Local draft of the configuration with dirty tracking and confirmation flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsEditor {
    draft: DraftConfig,
    phase: DraftPhase,
    prompt: Option<ConfirmPrompt>,
    last_error: Option<String>,
}

impl SettingsEditor {
    /// Start clean from the server copy.
    #[must_use]
    pub fn from_server(config: &ConfigResponse) -> Self {
        Self {
            draft: DraftConfig::from_server(config),
            ..Self::default()
        }
    }

    /// Current draft.
    #[must_use]
    pub const fn draft(&self) -> &DraftConfig {
        &self.draft
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> DraftPhase {
        self.phase
    }

    /// Whether unsaved edits exist (the save control is shown).
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        matches!(self.phase, DraftPhase::Dirty | DraftPhase::Saving)
    }

    /// Open confirmation prompt, if any.
    #[must_use]
    pub const fn prompt(&self) -> Option<&ConfirmPrompt> {
        self.prompt.as_ref()
    }

    /// Message from the last failed save.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the draft with fresh server data. Ignored unless `Clean`.
    ///
    /// Returns whether the draft was replaced.
    pub fn sync_from_server(&mut self, config: &ConfigResponse) -> bool {
        if self.phase != DraftPhase::Clean {
            debug!(phase = ?self.phase, "kept local draft over server copy");
            return false;
        }
        self.draft = DraftConfig::from_server(config);
        true
    }

    /// Set a scalar field from text input.
    ///
    /// # Errors
    ///
    /// Rejects non-numeric input, or any edit while a prompt or save is open.
    pub fn set_field(&mut self, field: DraftField, value: &str) -> Result<(), EditError> {
        self.ensure_editable()?;
        match field {
            DraftField::IntervalMin => self.draft.interval_min = parse_u32(field.name(), value)?,
            DraftField::IntervalMax => self.draft.interval_max = parse_u32(field.name(), value)?,
            DraftField::MinTransferSize => {
                self.draft.min_transfer_size = parse_u64(field.name(), value)?;
            }
        }
        self.mark_dirty();
        Ok(())
    }

    /// Add a video format; a duplicate opens a prompt.
    ///
    /// # Errors
    ///
    /// Rejects blank input, or any edit while a prompt or save is open.
    pub fn add_format(&mut self, input: &str) -> Result<EditOutcome, EditError> {
        self.ensure_editable()?;
        let format = normalize_format(input)?;
        if self.draft.video_formats.contains(&format) {
            return Ok(self.park(PendingAction::AddFormat(format)));
        }
        self.draft.video_formats.push(format);
        Ok(self.applied())
    }

    /// Rename every `current` format; renaming onto another existing value
    /// opens a prompt.
    ///
    /// # Errors
    ///
    /// Rejects blank input, an unknown `current`, or any edit while a prompt
    /// or save is open.
    pub fn rename_format(&mut self, current: &str, input: &str) -> Result<EditOutcome, EditError> {
        self.ensure_editable()?;
        let format = normalize_format(input)?;
        if !self.draft.video_formats.iter().any(|entry| entry == current) {
            return Err(EditError::NotFound(current.to_string()));
        }
        let collides = format != current && self.draft.video_formats.contains(&format);
        let action = PendingAction::RenameFormat {
            from: current.to_string(),
            to: format,
        };
        if collides {
            return Ok(self.park(action));
        }
        action.apply(&mut self.draft);
        Ok(self.applied())
    }

    /// Ask to delete a format.
    ///
    /// # Errors
    ///
    /// Rejects an unknown format, or any edit while a prompt or save is open.
    pub fn request_delete_format(&mut self, format: &str) -> Result<EditOutcome, EditError> {
        self.ensure_editable()?;
        if !self.draft.video_formats.iter().any(|entry| entry == format) {
            return Err(EditError::NotFound(format.to_string()));
        }
        Ok(self.park(PendingAction::DeleteFormat(format.to_string())))
    }

    /// Add a library; a name collision opens a prompt that overwrites the
    /// existing entry in place on confirm.
    ///
    /// # Errors
    ///
    /// Rejects an incomplete form, or any edit while a prompt or save is open.
    pub fn add_library(&mut self, form: &LibraryForm) -> Result<EditOutcome, EditError> {
        self.ensure_editable()?;
        let library = library_from_form(form)?;
        if let Some(index) = self
            .draft
            .libraries
            .iter()
            .position(|entry| entry.name == library.name)
        {
            return Ok(self.park(PendingAction::ReplaceLibrary { index, library }));
        }
        self.draft.libraries.push(library);
        Ok(self.applied())
    }

    /// Update the library at `index`; renaming onto another entry's name
    /// opens a prompt.
    ///
    /// # Errors
    ///
    /// Rejects an incomplete form, an out-of-range index, or any edit while a
    /// prompt or save is open.
    pub fn update_library(
        &mut self,
        index: usize,
        form: &LibraryForm,
    ) -> Result<EditOutcome, EditError> {
        self.ensure_editable()?;
        let library = library_from_form(form)?;
        let Some(current) = self.draft.libraries.get(index) else {
            return Err(EditError::NotFound(format!("library #{index}")));
        };
        if current.name != library.name
            && let Some(target) = self
                .draft
                .libraries
                .iter()
                .position(|entry| entry.name == library.name)
        {
            return Ok(self.park(PendingAction::MergeLibrary {
                edited: index,
                target,
                library,
            }));
        }
        self.draft.libraries[index] = library;
        Ok(self.applied())
    }

    /// Ask to delete the library at `index`.
    ///
    /// # Errors
    ///
    /// Rejects an out-of-range index, or any edit while a prompt or save is
    /// open.
    pub fn request_delete_library(&mut self, index: usize) -> Result<EditOutcome, EditError> {
        self.ensure_editable()?;
        let Some(library) = self.draft.libraries.get(index) else {
            return Err(EditError::NotFound(format!("library #{index}")));
        };
        let name = library.name.clone();
        Ok(self.park(PendingAction::DeleteLibrary { index, name }))
    }

    /// Add a cleanup keyword; a duplicate opens a prompt.
    ///
    /// # Errors
    ///
    /// Rejects blank input, or any edit while a prompt or save is open.
    pub fn add_keyword(&mut self, input: &str) -> Result<EditOutcome, EditError> {
        self.ensure_editable()?;
        let keyword = normalize_keyword(input)?;
        if self.draft.remove_keywords.contains(&keyword) {
            return Ok(self.park(PendingAction::AddKeyword(keyword)));
        }
        self.draft.remove_keywords.push(keyword);
        Ok(self.applied())
    }

    /// Rename every `current` keyword; renaming onto another existing value
    /// opens a prompt.
    ///
    /// # Errors
    ///
    /// Rejects blank input, an unknown `current`, or any edit while a prompt
    /// or save is open.
    pub fn rename_keyword(&mut self, current: &str, input: &str) -> Result<EditOutcome, EditError> {
        self.ensure_editable()?;
        let keyword = normalize_keyword(input)?;
        if !self.draft.remove_keywords.iter().any(|entry| entry == current) {
            return Err(EditError::NotFound(current.to_string()));
        }
        let collides = keyword != current && self.draft.remove_keywords.contains(&keyword);
        let action = PendingAction::RenameKeyword {
            from: current.to_string(),
            to: keyword,
        };
        if collides {
            return Ok(self.park(action));
        }
        action.apply(&mut self.draft);
        Ok(self.applied())
    }

    /// Ask to delete a keyword.
    ///
    /// # Errors
    ///
    /// Rejects an unknown keyword, or any edit while a prompt or save is open.
    pub fn request_delete_keyword(&mut self, keyword: &str) -> Result<EditOutcome, EditError> {
        self.ensure_editable()?;
        if !self.draft.remove_keywords.iter().any(|entry| entry == keyword) {
            return Err(EditError::NotFound(keyword.to_string()));
        }
        Ok(self.park(PendingAction::DeleteKeyword(keyword.to_string())))
    }

    /// Apply the parked edit.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoPrompt`] when nothing is pending.
    pub fn confirm(&mut self) -> Result<(), EditError> {
        let prompt = self.prompt.take().ok_or(EditError::NoPrompt)?;
        debug!(title = prompt.title, "confirmed pending edit");
        prompt.action.apply(&mut self.draft);
        self.mark_dirty();
        Ok(())
    }

    /// Discard the parked edit, leaving the draft unchanged.
    pub fn cancel(&mut self) -> Option<PendingAction> {
        self.prompt.take().map(|prompt| prompt.action)
    }

    /// Enter `Saving` and return the bulk update. Only `Dirty` drafts produce
    /// a request; `Clean` and `Saving` never write.
    pub fn begin_save(&mut self) -> Option<UpdateConfigRequest> {
        if self.phase != DraftPhase::Dirty {
            return None;
        }
        self.phase = DraftPhase::Saving;
        Some(self.draft.to_update_request())
    }

    /// Settle an in-flight save. Success returns to `Clean`; failure returns
    /// to `Dirty` keeping the draft and the error message.
    pub fn finish_save(&mut self, outcome: Result<(), String>) {
        if self.phase != DraftPhase::Saving {
            return;
        }
        match outcome {
            Ok(()) => {
                self.phase = DraftPhase::Clean;
                self.last_error = None;
            }
            Err(message) => {
                self.phase = DraftPhase::Dirty;
                self.last_error = Some(message);
            }
        }
    }

    const fn ensure_editable(&self) -> Result<(), EditError> {
        if self.prompt.is_some() {
            return Err(EditError::PromptPending);
        }
        if matches!(self.phase, DraftPhase::Saving) {
            return Err(EditError::SaveInFlight);
        }
        Ok(())
    }

    fn park(&mut self, action: PendingAction) -> EditOutcome {
        self.prompt = Some(action.into_prompt());
        EditOutcome::NeedsConfirmation
    }

    fn applied(&mut self) -> EditOutcome {
        self.mark_dirty();
        EditOutcome::Applied
    }

    const fn mark_dirty(&mut self) {
        self.phase = DraftPhase::Dirty;
    }
}
