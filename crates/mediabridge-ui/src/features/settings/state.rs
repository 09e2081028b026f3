//! Settings draft state.
//!
//! # Design
//! - `DraftConfig` mirrors exactly the fields a save writes back.
//! - `PendingAction` is data, not a closure, so a parked edit can be inspected
//!   and tested before it is applied.

use mediabridge_api_models::{
    ConfigResponse, LibraryItem, MediaConfigPatch, P115ConfigPatch, UpdateConfigRequest,
    XxConfigPatch,
};

/// Lifecycle of the draft relative to the server copy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DraftPhase {
    /// Draft mirrors the last-fetched server state.
    #[default]
    Clean,
    /// Local edits exist that have not been saved.
    Dirty,
    /// A bulk update is in flight.
    Saving,
}

/// Editable copy of the configuration aggregate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftConfig {
    /// Lower monitor polling bound in seconds.
    pub interval_min: u32,
    /// Upper monitor polling bound in seconds.
    pub interval_max: u32,
    /// Global minimum transfer size in MB.
    pub min_transfer_size: u64,
    /// Recognised video extensions; duplicates allowed after confirmation.
    pub video_formats: Vec<String>,
    /// Ordered library list.
    pub libraries: Vec<LibraryItem>,
    /// Filename cleanup keywords; duplicates allowed after confirmation.
    pub remove_keywords: Vec<String>,
}

impl DraftConfig {
    /// Copy the server aggregate into a draft.
    #[must_use]
    pub fn from_server(config: &ConfigResponse) -> Self {
        Self {
            interval_min: config.p115.rotation_training_interval_min,
            interval_max: config.p115.rotation_training_interval_max,
            min_transfer_size: config.media.min_transfer_size,
            video_formats: config.media.video_formats.clone(),
            libraries: config.media.libraries.clone(),
            remove_keywords: config.media.xx.remove_keywords.clone(),
        }
    }

    /// Bulk update carrying every draft field.
    #[must_use]
    pub fn to_update_request(&self) -> UpdateConfigRequest {
        UpdateConfigRequest {
            p115: Some(P115ConfigPatch {
                rotation_training_interval_min: Some(self.interval_min),
                rotation_training_interval_max: Some(self.interval_max),
            }),
            media: Some(MediaConfigPatch {
                min_transfer_size: Some(self.min_transfer_size),
                video_formats: Some(self.video_formats.clone()),
                libraries: Some(self.libraries.clone()),
                xx: Some(XxConfigPatch {
                    remove_keywords: Some(self.remove_keywords.clone()),
                }),
            }),
        }
    }
}

/// Scalar draft fields edited from text input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftField {
    /// `interval_min`.
    IntervalMin,
    /// `interval_max`.
    IntervalMax,
    /// `min_transfer_size`.
    MinTransferSize,
}

impl DraftField {
    /// Every scalar field.
    pub const ALL: [Self; 3] = [Self::IntervalMin, Self::IntervalMax, Self::MinTransferSize];

    /// Field name used in messages and by text front-ends.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IntervalMin => "interval_min",
            Self::IntervalMax => "interval_max",
            Self::MinTransferSize => "min_transfer_size",
        }
    }

    /// Look a field up by [`DraftField::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name.trim())
    }
}

/// Raw library dialog input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LibraryForm {
    /// Library name.
    pub name: String,
    /// Download directory.
    pub download_path: String,
    /// Organized target directory.
    pub target_path: String,
    /// Type tag; blank means `system`.
    pub kind: String,
    /// Minimum transfer size in MB; blank means 0.
    pub min_transfer_size: String,
}

impl From<&LibraryItem> for LibraryForm {
    fn from(library: &LibraryItem) -> Self {
        Self {
            name: library.name.clone(),
            download_path: library.download_path.clone(),
            target_path: library.target_path.clone(),
            kind: library.kind.clone(),
            min_transfer_size: library.min_transfer_size.to_string(),
        }
    }
}

/// Edit parked behind a confirmation prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingAction {
    /// Append a format that already exists.
    AddFormat(String),
    /// Rename every `from` entry to an existing `to`.
    RenameFormat {
        /// Value being edited.
        from: String,
        /// New value that collides.
        to: String,
    },
    /// Remove every entry equal to the format.
    DeleteFormat(String),
    /// Overwrite the library at `index` with a same-named new entry.
    ReplaceLibrary {
        /// Position of the existing entry.
        index: usize,
        /// Replacement.
        library: LibraryItem,
    },
    /// Rename the library at `edited` onto the name held at `target`.
    MergeLibrary {
        /// Position of the entry being edited; removed on confirm.
        edited: usize,
        /// Position of the colliding entry; overwritten on confirm.
        target: usize,
        /// Edited values.
        library: LibraryItem,
    },
    /// Remove the library at `index`.
    DeleteLibrary {
        /// Position in the list.
        index: usize,
        /// Name shown in the prompt.
        name: String,
    },
    /// Append a keyword that already exists.
    AddKeyword(String),
    /// Rename every `from` entry to an existing `to`.
    RenameKeyword {
        /// Value being edited.
        from: String,
        /// New value that collides.
        to: String,
    },
    /// Remove every entry equal to the keyword.
    DeleteKeyword(String),
}

impl PendingAction {
    /// Apply the edit to `draft`.
    pub(crate) fn apply(self, draft: &mut DraftConfig) {
        match self {
            Self::AddFormat(format) => draft.video_formats.push(format),
            Self::RenameFormat { from, to } => rename_all(&mut draft.video_formats, &from, &to),
            Self::DeleteFormat(format) => draft.video_formats.retain(|entry| *entry != format),
            Self::ReplaceLibrary { index, library } => {
                if let Some(slot) = draft.libraries.get_mut(index) {
                    *slot = library;
                }
            }
            Self::MergeLibrary {
                edited,
                target,
                library,
            } => {
                if let Some(slot) = draft.libraries.get_mut(target) {
                    *slot = library;
                    if edited != target && edited < draft.libraries.len() {
                        draft.libraries.remove(edited);
                    }
                }
            }
            Self::DeleteLibrary { index, .. } => {
                if index < draft.libraries.len() {
                    draft.libraries.remove(index);
                }
            }
            Self::AddKeyword(keyword) => draft.remove_keywords.push(keyword),
            Self::RenameKeyword { from, to } => rename_all(&mut draft.remove_keywords, &from, &to),
            Self::DeleteKeyword(keyword) => draft.remove_keywords.retain(|entry| *entry != keyword),
        }
    }

    /// Build the prompt describing this action.
    #[must_use]
    pub fn into_prompt(self) -> ConfirmPrompt {
        let (kind, title, description) = match &self {
            Self::AddFormat(format) => (
                PromptKind::Add,
                "格式已存在",
                format!("格式 \"{format}\" 已存在，是否仍要添加？"),
            ),
            Self::RenameFormat { to, .. } => (
                PromptKind::Edit,
                "格式已存在",
                format!("格式 \"{to}\" 已存在，是否仍要修改？"),
            ),
            Self::DeleteFormat(format) => (
                PromptKind::Delete,
                "删除视频格式",
                format!("确定要删除视频格式 \"{format}\" 吗？此操作可能会影响文件整理功能。"),
            ),
            Self::ReplaceLibrary { library, .. } => (
                PromptKind::Add,
                "媒体库已存在",
                format!("媒体库 \"{}\" 已存在，是否仍要添加？", library.name),
            ),
            Self::MergeLibrary { library, .. } => (
                PromptKind::Edit,
                "媒体库已存在",
                format!("媒体库 \"{}\" 已存在，是否仍要修改？", library.name),
            ),
            Self::DeleteLibrary { name, .. } => (
                PromptKind::Delete,
                "删除媒体库",
                format!("确定要删除媒体库 \"{name}\" 吗？此操作可能会影响文件整理功能。"),
            ),
            Self::AddKeyword(keyword) => (
                PromptKind::Add,
                "关键词已存在",
                format!("关键词 \"{keyword}\" 已存在，是否仍要添加？"),
            ),
            Self::RenameKeyword { to, .. } => (
                PromptKind::Edit,
                "关键词已存在",
                format!("关键词 \"{to}\" 已存在，是否仍要修改？"),
            ),
            Self::DeleteKeyword(keyword) => (
                PromptKind::Delete,
                "删除关键词",
                format!("确定要删除关键词 \"{keyword}\" 吗？包含此关键词的文件名将不会被清理。"),
            ),
        };
        ConfirmPrompt {
            kind,
            title,
            description,
            action: self,
        }
    }
}

fn rename_all(entries: &mut [String], from: &str, to: &str) {
    for entry in entries.iter_mut().filter(|entry| entry.as_str() == from) {
        *entry = to.to_string();
    }
}

/// What a prompt is asking about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    /// Adding a colliding entry.
    Add,
    /// Renaming onto a colliding entry.
    Edit,
    /// Removing an entry.
    Delete,
}

impl PromptKind {
    /// Label on the confirm button.
    #[must_use]
    pub const fn confirm_label(self) -> &'static str {
        match self {
            Self::Add => "仍要添加",
            Self::Edit => "仍要修改",
            Self::Delete => "确认删除",
        }
    }
}

/// Open confirmation prompt and the edit it guards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmPrompt {
    /// Prompt category.
    pub kind: PromptKind,
    /// Dialog title.
    pub title: &'static str,
    /// Dialog body.
    pub description: String,
    /// Edit applied on confirm.
    pub action: PendingAction,
}

impl ConfirmPrompt {
    /// Label on the confirm button.
    #[must_use]
    pub const fn confirm_label(&self) -> &'static str {
        self.kind.confirm_label()
    }
}
