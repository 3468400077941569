//! Test doubles for the collaborators the wait core runs against.
//!
//! Production runs are owned by the flow executor. These stand-ins let the
//! wait/resume protocol be exercised without one.

pub mod run;
pub mod template;

pub use run::TestRun;
pub use template::MiniTemplates;
