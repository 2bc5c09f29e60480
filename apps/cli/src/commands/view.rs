//! `duka view`: the saved report selection.

use chrono::Utc;
use duka_core::ViewState;
use std::io::Write;

use super::{emit, emit_json, Context};
use crate::cli::ViewCommand;
use crate::error::{AppError, AppResult};
use crate::render::caption;

pub async fn run<W: Write>(ctx: &Context, action: ViewCommand, out: &mut W) -> AppResult<()> {
    let repo = ctx.db.view_state();
    match action {
        ViewCommand::Save { selection } => {
            if !selection.is_explicit() {
                return Err(AppError::validation(
                    "Nothing to save: give --period or --from/--to",
                ));
            }
            let filter = selection.to_filter();
            repo.save(&ViewState::capture(&filter, Utc::now())).await?;
            emit(out, &format!("Saved view: {}\n", caption(&filter)))
        }
        ViewCommand::Show { json } => match repo.load().await? {
            Some(state) if json => emit_json(out, &state),
            Some(state) => {
                let filter = state.to_filter()?;
                let mut text = format!("Saved view: {}\n", caption(&filter));
                if !state.timestamp.is_empty() {
                    text.push_str(&format!("Saved at {}\n", state.timestamp));
                }
                emit(out, &text)
            }
            None => emit(out, "No saved view\n"),
        },
        ViewCommand::Clear => {
            if repo.clear().await? {
                emit(out, "Cleared saved view\n")
            } else {
                emit(out, "No saved view\n")
            }
        }
    }
}
