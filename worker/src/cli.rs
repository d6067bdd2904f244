use anstyle::{AnsiColor, Style};
use clap::builder::Styles;
use error_stack::{Result, ResultExt};
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;

/// Connect the cancellation token to the ctrl-c handler.
pub fn set_ctrlc_handler(ct: CancellationToken) -> Result<(), WorkerError> {
    ctrlc::set_handler({
        move || {
            ct.cancel();
        }
    })
    .change_context(WorkerError::Configuration)
    .attach_printable("failed to install ctrl-c handler")?;

    Ok(())
}

/// A clap style for the Lodestone CLI.
pub fn lodestone_cli_style() -> Styles {
    Styles::styled()
        .header(Style::new().bold().fg_color(Some(AnsiColor::Yellow.into())))
        .error(Style::new().bold().fg_color(Some(AnsiColor::Red.into())))
        .usage(Style::new().bold().fg_color(Some(AnsiColor::Yellow.into())))
        .literal(Style::new().fg_color(Some(AnsiColor::BrightCyan.into())))
        .placeholder(Style::new())
        .valid(Style::new().fg_color(Some(AnsiColor::BrightBlue.into())))
        .invalid(
            Style::new()
                .underline()
                .fg_color(Some(AnsiColor::Red.into())),
        )
}
