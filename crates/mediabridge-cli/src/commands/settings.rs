//! `settings show` and the interactive `settings edit` session.
//!
//! The session reads one command per line and drives a [`SettingsEditor`].
//! Edits stay local until `save` sends them as a single bulk update; a failed
//! save keeps the draft so the user can retry.

use std::io::{BufRead, Write};

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use mediabridge_ui::SettingsEditor;
use mediabridge_ui::StatusSummary;
use mediabridge_ui::features::settings::api::{
    SaveOutcome, load_editor, load_status_line, refresh_editor, save,
};
use mediabridge_ui::features::settings::editor::{EditError, EditOutcome};
use mediabridge_ui::features::settings::state::{DraftField, LibraryForm};
use tracing::warn;

use crate::client::{AppContext, CliError, CliResult, emit, say};
use crate::commands::prompt::{ask_yes_no, read_line, show_prompt, split_args};
use crate::output::{render_prompt, render_settings};

pub(crate) async fn handle_settings_show<W: Write>(ctx: &AppContext, out: &mut W) -> CliResult<()> {
    let editor = load_required_editor(ctx).await?;
    let status = status_line(ctx).await;
    emit(
        out,
        &render_settings(editor.draft(), status.as_ref(), false, ctx.output)?,
    )
}

pub(crate) async fn handle_settings_edit<R: BufRead, W: Write>(
    ctx: &AppContext,
    input: &mut R,
    out: &mut W,
) -> CliResult<()> {
    let mut editor = load_required_editor(ctx).await?;
    let status = status_line(ctx).await;
    emit(
        out,
        &render_settings(editor.draft(), status.as_ref(), false, ctx.output)?,
    )?;
    say(out, "type `help` for commands")?;
    run_session(ctx, &mut editor, input, out).await
}

async fn load_required_editor(ctx: &AppContext) -> CliResult<SettingsEditor> {
    load_editor(&ctx.query)
        .await
        .map_err(|err| CliError::request("failed to load configuration", err))?
        .ok_or_else(|| CliError::failure(anyhow!("server returned no configuration")))
}

/// The status line is decoration; a failure only hides it.
async fn status_line(ctx: &AppContext) -> Option<StatusSummary> {
    match load_status_line(&ctx.query).await {
        Ok(status) => status,
        Err(err) => {
            warn!(error = %err, "monitor status unavailable");
            None
        }
    }
}

#[derive(Parser)]
#[command(name = "settings", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Print the draft.
    Show,
    /// Set interval_min, interval_max, or min_transfer_size.
    Set { field: String, value: String },
    /// Edit video formats.
    #[command(subcommand)]
    Format(ListEdit),
    /// Edit filename cleanup keywords.
    #[command(subcommand)]
    Keyword(ListEdit),
    /// Edit media libraries.
    #[command(subcommand)]
    Library(LibraryEdit),
    /// Send the draft to the server.
    Save,
    /// Reload the server copy when there are no unsaved changes.
    Reload,
    /// Leave the session.
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand)]
enum ListEdit {
    Add { value: String },
    Rename { current: String, value: String },
    Rm { value: String },
}

#[derive(Subcommand)]
enum LibraryEdit {
    Add(LibraryFields),
    /// Edit the library at a 1-based position.
    Edit {
        position: usize,
        #[command(flatten)]
        fields: LibraryFields,
    },
    Rm { position: usize },
}

#[derive(Args)]
struct LibraryFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    download: Option<String>,
    #[arg(long)]
    target: Option<String>,
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    min_size: Option<String>,
}

impl LibraryFields {
    fn apply_to(self, mut form: LibraryForm) -> LibraryForm {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(download) = self.download {
            form.download_path = download;
        }
        if let Some(target) = self.target {
            form.target_path = target;
        }
        if let Some(kind) = self.kind {
            form.kind = kind;
        }
        if let Some(min_size) = self.min_size {
            form.min_transfer_size = min_size;
        }
        form
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Read commands until `quit` or end of input.
pub(crate) async fn run_session<R: BufRead, W: Write>(
    ctx: &AppContext,
    editor: &mut SettingsEditor,
    input: &mut R,
    out: &mut W,
) -> CliResult<()> {
    loop {
        let marker = if editor.is_dirty() { "*" } else { "" };
        show_prompt(out, &format!("settings{marker}> "))?;
        let Some(line) = read_line(input)? else {
            if editor.is_dirty() {
                say(out, "")?;
                say(out, "unsaved changes discarded")?;
            }
            return Ok(());
        };
        let words = match split_args(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(err) => {
                say(out, err.display_message())?;
                continue;
            }
        };
        let command = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                emit(out, &err.render().to_string())?;
                continue;
            }
        };
        if matches!(
            execute(ctx, editor, command, input, out).await?,
            Flow::Quit
        ) {
            return Ok(());
        }
    }
}

async fn execute<R: BufRead, W: Write>(
    ctx: &AppContext,
    editor: &mut SettingsEditor,
    command: SessionCommand,
    input: &mut R,
    out: &mut W,
) -> CliResult<Flow> {
    match command {
        SessionCommand::Show => {
            let status = status_line(ctx).await;
            emit(
                out,
                &render_settings(editor.draft(), status.as_ref(), editor.is_dirty(), ctx.output)?,
            )?;
        }
        SessionCommand::Set { field, value } => {
            let Some(field) = DraftField::from_name(&field) else {
                let known: Vec<&str> = DraftField::ALL.iter().map(|field| field.name()).collect();
                say(
                    out,
                    format!("unknown field '{field}' (expected {})", known.join(", ")),
                )?;
                return Ok(Flow::Continue);
            };
            let result = editor.set_field(field, &value).map(|()| EditOutcome::Applied);
            settle(editor, result, input, out)?;
        }
        SessionCommand::Format(edit) => {
            let result = match edit {
                ListEdit::Add { value } => editor.add_format(&value),
                ListEdit::Rename { current, value } => editor.rename_format(&current, &value),
                ListEdit::Rm { value } => editor.request_delete_format(&value),
            };
            settle(editor, result, input, out)?;
        }
        SessionCommand::Keyword(edit) => {
            let result = match edit {
                ListEdit::Add { value } => editor.add_keyword(&value),
                ListEdit::Rename { current, value } => editor.rename_keyword(&current, &value),
                ListEdit::Rm { value } => editor.request_delete_keyword(&value),
            };
            settle(editor, result, input, out)?;
        }
        SessionCommand::Library(edit) => {
            let result = edit_library(editor, edit);
            settle(editor, result, input, out)?;
        }
        SessionCommand::Save => match save(&ctx.query, editor).await {
            Ok(SaveOutcome::Saved) => say(out, "saved")?,
            Ok(SaveOutcome::NothingToSave) => say(out, "nothing to save")?,
            Err(err) => say(
                out,
                format!("save failed: {err}; changes kept, run `save` to retry"),
            )?,
        },
        SessionCommand::Reload => match refresh_editor(&ctx.query, editor).await {
            Ok(true) => say(out, "reloaded from server")?,
            Ok(false) if editor.is_dirty() => {
                say(out, "unsaved changes kept; save them before reloading")?;
            }
            Ok(false) => say(out, "server returned no configuration")?,
            Err(err) => say(out, format!("reload failed: {err}"))?,
        },
        SessionCommand::Quit => {
            if editor.is_dirty() && !ask_yes_no(input, out, "discard unsaved changes?")? {
                return Ok(Flow::Continue);
            }
            return Ok(Flow::Quit);
        }
    }
    Ok(Flow::Continue)
}

fn edit_library(editor: &mut SettingsEditor, edit: LibraryEdit) -> Result<EditOutcome, EditError> {
    match edit {
        LibraryEdit::Add(fields) => editor.add_library(&fields.apply_to(LibraryForm::default())),
        LibraryEdit::Edit { position, fields } => {
            let index = library_index(editor, position)?;
            let current = LibraryForm::from(&editor.draft().libraries[index]);
            editor.update_library(index, &fields.apply_to(current))
        }
        LibraryEdit::Rm { position } => {
            let index = library_index(editor, position)?;
            editor.request_delete_library(index)
        }
    }
}

/// Map a 1-based position from the listing onto the draft.
fn library_index(editor: &SettingsEditor, position: usize) -> Result<usize, EditError> {
    let count = editor.draft().libraries.len();
    if position == 0 || position > count {
        return Err(EditError::NotFound(format!("library #{position}")));
    }
    Ok(position - 1)
}

/// Report an edit, asking for confirmation when the editor parked it.
fn settle<R: BufRead, W: Write>(
    editor: &mut SettingsEditor,
    result: Result<EditOutcome, EditError>,
    input: &mut R,
    out: &mut W,
) -> CliResult<()> {
    match result {
        Ok(EditOutcome::Applied) => say(out, "ok"),
        Ok(EditOutcome::NeedsConfirmation) => {
            let Some((text, label)) = editor
                .prompt()
                .map(|prompt| (render_prompt(prompt), prompt.confirm_label()))
            else {
                return Ok(());
            };
            say(out, text)?;
            if ask_yes_no(input, out, &format!("{label}?"))? {
                match editor.confirm() {
                    Ok(()) => say(out, "ok"),
                    Err(err) => say(out, format!("rejected: {err}")),
                }
            } else {
                editor.cancel();
                say(out, "cancelled")
            }
        }
        Err(err) => say(out, format!("rejected: {err}")),
    }
}
