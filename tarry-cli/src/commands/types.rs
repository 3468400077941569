//! Types command - list what the standard registries can decode.

use anyhow::Result;

/// Run the types command.
pub fn run() -> Result<()> {
    let registries = tarry_waits::registry::standard()?;

    for (family, tags) in registries.families() {
        println!("{}:", family);
        for tag in tags {
            println!("  {}", tag);
        }
    }
    Ok(())
}
