use std::io::{BufRead, Write};

use mediabridge_ui::features::dashboard::api::submit_add_task;
use mediabridge_ui::features::dashboard::state::AddTaskError;
use mediabridge_ui::features::tasks::api::{delete_confirmed, load_tasks};
use mediabridge_ui::features::tasks::logic::{filter_tasks, tab_counts};
use mediabridge_ui::{AddTaskForm, TasksState};
use serde_json::json;

use crate::cli::{OutputFormat, TaskAddArgs, TaskListArgs, TaskRemoveArgs};
use crate::client::{AppContext, CliError, CliResult, emit, say};
use crate::commands::prompt::ask_yes_no;
use crate::output::render_task_list;

pub(crate) async fn handle_task_list<W: Write>(
    ctx: &AppContext,
    args: TaskListArgs,
    out: &mut W,
) -> CliResult<()> {
    let list = load_tasks(&ctx.query)
        .await
        .map_err(|err| CliError::request("failed to load tasks", err))?;
    let counts = tab_counts(&list.tasks);
    let visible = filter_tasks(&list.tasks, args.status);
    emit(out, &render_task_list(&visible, &counts, args.status, ctx.output)?)
}

pub(crate) async fn handle_task_add<W: Write>(
    ctx: &AppContext,
    args: TaskAddArgs,
    out: &mut W,
) -> CliResult<()> {
    let mut form = AddTaskForm {
        magnet: args.magnet,
        library_name: args.library,
        name: args.name.unwrap_or_default(),
    };
    let request = form.to_request().map_err(add_error)?;

    let libraries = ctx
        .query
        .libraries()
        .await
        .map_err(|err| CliError::request("failed to load libraries", err))?;
    if !libraries
        .iter()
        .any(|library| library.name == request.library_name)
    {
        let known: Vec<&str> = libraries.iter().map(|library| library.name.as_str()).collect();
        return Err(CliError::validation(format!(
            "unknown library '{}' (available: {})",
            request.library_name,
            if known.is_empty() {
                "none".to_string()
            } else {
                known.join(", ")
            }
        )));
    }

    submit_add_task(&ctx.query, &mut form)
        .await
        .map_err(add_error)?;
    match ctx.output {
        OutputFormat::Json => emit(
            out,
            &json!({"submitted": true, "library": request.library_name}).to_string(),
        ),
        OutputFormat::Table => say(
            out,
            format!("task submitted to library '{}'", request.library_name),
        ),
    }
}

fn add_error(err: AddTaskError) -> CliError {
    match err {
        AddTaskError::MissingMagnet | AddTaskError::MissingLibrary => {
            CliError::validation(err.to_string())
        }
        AddTaskError::Api(api) => CliError::request("failed to submit task", api),
    }
}

pub(crate) async fn handle_task_remove<R: BufRead, W: Write>(
    ctx: &AppContext,
    args: TaskRemoveArgs,
    input: &mut R,
    out: &mut W,
) -> CliResult<()> {
    let TaskRemoveArgs { task_id, yes } = args;
    let task_id = task_id.trim();
    if task_id.is_empty() {
        return Err(CliError::validation("task id must not be empty"));
    }

    let mut state = TasksState::default();
    state.request_delete(task_id);
    if !yes && !ask_yes_no(input, out, &format!("确认删除任务 {task_id}?"))? {
        state.cancel_delete();
        return say(out, "cancelled");
    }

    match delete_confirmed(&ctx.query, &mut state)
        .await
        .map_err(|err| CliError::request("failed to delete task", err))?
    {
        Some(deleted) => say(out, format!("deleted task {deleted}")),
        None => Ok(()),
    }
}
