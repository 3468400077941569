//! Check command - see whether a wait can be ended with a resume.

use super::read_input;
use anyhow::{Context, Result};

/// Run the check command.
pub fn run(wait_file: &str, resume_file: &str) -> Result<()> {
    let wait = tarry_waits::read_wait(&read_input(wait_file)?)
        .with_context(|| format!("Invalid wait in {}", wait_file))?;
    let resume = tarry_waits::read_resume(&read_input(resume_file)?)
        .with_context(|| format!("Invalid resume in {}", resume_file))?;

    match wait.end(&resume) {
        Ok(()) => {
            println!(
                "✓ wait '{}' accepts resume '{}'",
                wait.type_name(),
                resume.type_name()
            );
            Ok(())
        }
        Err(e) => {
            println!("✗ {}", e);
            anyhow::bail!("Resume rejected ({})", e.code())
        }
    }
}
