use crate::cli::LoggerArgs;
use anyhow::{Context, Result};
use quicklogs::{Level, Registry};
use std::io::BufRead;

/// Log `messages`, or every line of `input` when there are none.
///
/// Returns how many records were handed to the logger.
pub fn handle(
    registry: &Registry,
    args: &LoggerArgs,
    at: Level,
    messages: &[String],
    input: impl BufRead,
) -> Result<usize> {
    let logger = registry
        .get_logger(args.name(), &args.options())
        .context("building logger")?;

    let mut count = 0;
    if messages.is_empty() {
        for line in input.lines() {
            logger.log(at, line.context("reading stdin")?);
            count += 1;
        }
    } else {
        for message in messages {
            logger.log(at, message);
            count += 1;
        }
    }
    logger.flush().context("flushing log file")?;

    tracing::debug!(count, level = %at, "emitted records");
    Ok(count)
}
