//! Shared context and error types for command handlers.

use std::fmt::{self, Display, Formatter};
use std::io::Write;
use std::time::Duration;

use anyhow::anyhow;
use mediabridge_client::{ApiClient, QueryClient, QueryPolicy};
use url::Url;

use crate::cli::OutputFormat;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// Backend failure with a short description of what was being attempted.
    pub(crate) fn request(
        context: &'static str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Failure(anyhow::Error::new(error).context(context))
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Application context passed to command handlers.
#[derive(Clone, Debug)]
pub(crate) struct AppContext {
    pub(crate) query: QueryClient,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Build the HTTP stack for one invocation; every request carries `trace_id`.
    pub(crate) fn connect(
        base_url: Url,
        timeout: Duration,
        trace_id: &str,
        output: OutputFormat,
    ) -> CliResult<Self> {
        let api = ApiClient::new(base_url, timeout, Some(trace_id)).map_err(CliError::failure)?;
        Ok(Self {
            query: QueryClient::new(api, QueryPolicy::default()),
            output,
        })
    }
}

/// Write one line of output.
pub(crate) fn say<W: Write>(out: &mut W, text: impl Display) -> CliResult<()> {
    writeln!(out, "{text}")
        .map_err(|err| CliError::failure(anyhow!("failed to write output: {err}")))
}

/// Write pre-rendered output, adding a trailing newline when missing.
pub(crate) fn emit<W: Write>(out: &mut W, rendered: &str) -> CliResult<()> {
    let result = if rendered.ends_with('\n') {
        out.write_all(rendered.as_bytes())
    } else {
        writeln!(out, "{rendered}")
    };
    result.map_err(|err| CliError::failure(anyhow!("failed to write output: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_helpers_map_exit_codes() {
        let validation = CliError::validation("bad input");
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(validation.display_message(), "bad input");

        let failure = CliError::failure(anyhow!("boom").context("loading tasks"));
        assert_eq!(failure.exit_code(), 3);
        assert_eq!(failure.display_message(), "loading tasks: boom");
        assert_eq!(failure.to_string(), "cli error");
    }

    #[test]
    fn emit_terminates_lines() {
        let mut out = Vec::new();
        emit(&mut out, "a").expect("write");
        emit(&mut out, "b\n").expect("write");
        say(&mut out, 3).expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "a\nb\n3\n");
    }

    #[test]
    fn connect_builds_context() {
        let base_url: Url = "http://127.0.0.1:9".parse().expect("url");
        let ctx = AppContext::connect(base_url, Duration::from_secs(1), "trace", OutputFormat::Json)
            .expect("context");
        assert_eq!(ctx.query.api().base_url().as_str(), "http://127.0.0.1:9/");
        assert!(matches!(ctx.output, OutputFormat::Json));
    }
}
