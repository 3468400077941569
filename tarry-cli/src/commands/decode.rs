//! Decode command - decode a persisted value with the standard registries.

use super::{Family, print_json, read_input};
use anyhow::Result;

/// Run the decode command.
pub fn run(family: Family, input: &str) -> Result<()> {
    let data = read_input(input)?;
    tracing::debug!(%family, input, bytes = data.len(), "Decoding");

    match family {
        Family::Wait => print_json(&tarry_waits::read_wait(&data)?),
        Family::Activated => print_json(&tarry_waits::read_activated_wait(&data)?),
        Family::Resume => print_json(&tarry_waits::read_resume(&data)?),
        Family::Hint => print_json(&tarry_waits::read_hint(&data)?),
    }
}
