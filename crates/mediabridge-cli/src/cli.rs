//! Argument parsing and command dispatch.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mediabridge_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging, invocation_span,
};
use mediabridge_ui::{RecordFilter, TaskFilter};
use tracing::{Instrument, debug};
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::dashboard::handle_dashboard;
use crate::commands::records::handle_records;
use crate::commands::settings::{handle_settings_edit, handle_settings_show};
use crate::commands::tasks::{handle_task_add, handle_task_list, handle_task_remove};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build_sha: build_sha(),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: logging disabled: {err}");
    }

    let span = invocation_span(command_name, &trace_id);
    let result = dispatch(cli, &trace_id).instrument(span).await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let ctx = AppContext::connect(
        cli.api_url,
        Duration::from_secs(cli.timeout),
        trace_id,
        cli.output,
    )?;
    debug!(api_url = %ctx.query.api().base_url(), "dispatching command");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    match cli.command {
        Command::Dashboard(args) => handle_dashboard(&ctx, args, &mut stdout).await,
        Command::Tasks(tasks) => match tasks {
            TasksCommand::List(args) => handle_task_list(&ctx, args, &mut stdout).await,
            TasksCommand::Add(args) => handle_task_add(&ctx, args, &mut stdout).await,
            TasksCommand::Rm(args) => {
                handle_task_remove(&ctx, args, &mut stdin.lock(), &mut stdout).await
            }
        },
        Command::Records(args) => handle_records(&ctx, args, &mut stdout).await,
        Command::Settings(settings) => match settings {
            SettingsCommand::Show => handle_settings_show(&ctx, &mut stdout).await,
            SettingsCommand::Edit => {
                handle_settings_edit(&ctx, &mut stdin.lock(), &mut stdout).await
            }
        },
    }
}

#[derive(Parser)]
#[command(
    name = "mediabridge",
    about = "Offline download and media organization dashboard"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "MEDIABRIDGE_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "MEDIABRIDGE_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "MEDIABRIDGE_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "MEDIABRIDGE_LOG_FORMAT",
        value_parser = parse_log_format
    )]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Monitor status, task counts, and recent activity.
    Dashboard(DashboardArgs),
    /// Offline download tasks.
    #[command(subcommand)]
    Tasks(TasksCommand),
    /// Organize history.
    Records(RecordsArgs),
    /// System configuration.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Clone, Copy, Default)]
pub(crate) struct DashboardArgs {
    /// Keep running and reprint whenever the monitor status refreshes.
    #[arg(long)]
    pub(crate) watch: bool,
}

#[derive(Subcommand)]
pub(crate) enum TasksCommand {
    /// List tasks, optionally narrowed to one status tab.
    List(TaskListArgs),
    /// Submit a magnet link.
    Add(TaskAddArgs),
    /// Delete a task.
    Rm(TaskRemoveArgs),
}

#[derive(Args, Clone, Copy, Default)]
pub(crate) struct TaskListArgs {
    #[arg(long, value_parser = parse_task_filter, default_value = "all")]
    pub(crate) status: TaskFilter,
}

#[derive(Args)]
pub(crate) struct TaskAddArgs {
    #[arg(help = "Magnet URI")]
    pub(crate) magnet: String,
    #[arg(long, help = "Target library name")]
    pub(crate) library: String,
    #[arg(long, help = "Optional display name")]
    pub(crate) name: Option<String>,
}

#[derive(Args)]
pub(crate) struct TaskRemoveArgs {
    pub(crate) task_id: String,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub(crate) yes: bool,
}

#[derive(Args, Clone, Copy)]
pub(crate) struct RecordsArgs {
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    #[arg(long, value_parser = parse_record_filter, default_value = "all")]
    pub(crate) status: RecordFilter,
}

impl Default for RecordsArgs {
    fn default() -> Self {
        Self {
            page: 1,
            status: RecordFilter::All,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum SettingsCommand {
    /// Print the current configuration.
    Show,
    /// Edit the configuration interactively and save it in one request.
    Edit,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Dashboard(args) => {
            if args.watch {
                "dashboard_watch"
            } else {
                "dashboard"
            }
        }
        Command::Tasks(TasksCommand::List(_)) => "tasks_list",
        Command::Tasks(TasksCommand::Add(_)) => "tasks_add",
        Command::Tasks(TasksCommand::Rm(_)) => "tasks_rm",
        Command::Records(_) => "records",
        Command::Settings(SettingsCommand::Show) => "settings_show",
        Command::Settings(SettingsCommand::Edit) => "settings_edit",
    }
}

fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input.parse::<LogFormat>().map_err(|err| err.to_string())
}

fn parse_task_filter(input: &str) -> Result<TaskFilter, String> {
    TaskFilter::from_value(input).ok_or_else(|| {
        format!("unknown task status '{input}' (expected all, pending, completed, failed)")
    })
}

fn parse_record_filter(input: &str) -> Result<RecordFilter, String> {
    RecordFilter::from_value(input)
        .ok_or_else(|| format!("unknown record status '{input}' (expected all, success, failed)"))
}

/// Reject out-of-range page numbers before any request is made.
pub(crate) fn validate_page(page: u32) -> CliResult<u32> {
    if page == 0 {
        return Err(CliError::validation("page numbers start at 1"));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_url_rejects_invalid_input() {
        let err = parse_url("not-a-url").expect_err("invalid URL should fail");
        assert!(err.contains("invalid URL"));
    }

    #[test]
    fn filters_accept_both_languages() {
        assert_eq!(parse_task_filter("failed"), Ok(TaskFilter::Failed));
        assert_eq!(parse_task_filter("完成"), Ok(TaskFilter::Completed));
        assert!(parse_task_filter("paused").is_err());
        assert_eq!(parse_record_filter("success"), Ok(RecordFilter::Success));
        assert!(parse_record_filter("maybe").is_err());
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mediabridge",
            "records",
            "--page",
            "3",
            "--status",
            "failed",
            "--output",
            "json",
            "--api-url",
            "http://nas.local:8000",
        ])
        .expect("valid arguments");
        assert!(matches!(cli.output, OutputFormat::Json));
        assert_eq!(cli.api_url.as_str(), "http://nas.local:8000/");
        let Command::Records(args) = cli.command else {
            panic!("expected records command");
        };
        assert_eq!(args.page, 3);
        assert_eq!(args.status, RecordFilter::Failed);
    }

    #[test]
    fn task_add_requires_library() {
        let result = Cli::try_parse_from(["mediabridge", "tasks", "add", "magnet:?xt=urn:btih:a"]);
        assert!(result.is_err());
    }

    #[test]
    fn command_label_matches_variants() {
        assert_eq!(
            command_label(&Command::Dashboard(DashboardArgs { watch: true })),
            "dashboard_watch"
        );
        assert_eq!(
            command_label(&Command::Tasks(TasksCommand::Rm(TaskRemoveArgs {
                task_id: "t-1".into(),
                yes: false,
            }))),
            "tasks_rm"
        );
        assert_eq!(
            command_label(&Command::Settings(SettingsCommand::Edit)),
            "settings_edit"
        );
    }

    #[test]
    fn page_zero_is_rejected() {
        assert!(validate_page(0).is_err());
        assert_eq!(validate_page(2).expect("valid page"), 2);
    }
}
