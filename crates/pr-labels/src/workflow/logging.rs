//! Logging setup for the action.
//!
//! Events are written to stdout as GitHub Actions workflow commands so the
//! runner can classify them:
//!
//! | level        | rendered as        |
//! |--------------|--------------------|
//! | ERROR        | `::error::msg`     |
//! | WARN         | `::warning::msg`   |
//! | INFO         | `msg`              |
//! | DEBUG, TRACE | `::debug::msg`     |
//!
//! Debug commands are always emitted; the runner only shows them when step
//! debug logging is enabled.

use std::fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{prelude::*, EnvFilter};

use super::escape_data;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "pr_labels=debug,warn";

/// Formats events as workflow commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowCommandFormat;

impl<S, N> FormatEvent<S, N> for WorkflowCommandFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.field_format()
            .format_fields(Writer::new(&mut message), event)?;

        match *event.metadata().level() {
            Level::ERROR => writeln!(writer, "::error::{}", escape_data(&message)),
            Level::WARN => writeln!(writer, "::warning::{}", escape_data(&message)),
            Level::INFO => writeln!(writer, "{message}"),
            _ => writeln!(writer, "::debug::{}", escape_data(&message)),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence; `verbose` enables debug output for every
/// target.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(WorkflowCommandFormat)
                .with_writer(std::io::stdout),
        )
        .with(filter)
        .init();
}
