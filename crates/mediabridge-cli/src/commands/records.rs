use std::io::Write;

use mediabridge_ui::RecordsState;
use mediabridge_ui::features::records::api::load_records;

use crate::cli::{RecordsArgs, validate_page};
use crate::client::{AppContext, CliError, CliResult, emit};
use crate::output::render_records;

pub(crate) async fn handle_records<W: Write>(
    ctx: &AppContext,
    args: RecordsArgs,
    out: &mut W,
) -> CliResult<()> {
    let page = validate_page(args.page)?;
    let mut state = RecordsState::default();
    state.set_filter(args.status);
    // Total is unknown until the first response; clamp after it arrives.
    state.go_to(page, u64::MAX);

    let view = load_records(&ctx.query, &state)
        .await
        .map_err(|err| CliError::request("failed to load organize records", err))?;
    if page > 1 && page > view.total_pages {
        return Err(CliError::validation(format!(
            "page {page} is out of range (last page is {})",
            view.total_pages.max(1)
        )));
    }
    emit(out, &render_records(&view, state.filter(), ctx.output)?)
}
