//! Tarry Waits
//!
//! The wait/resume protocol of a flow run.
//!
//! # Overview
//!
//! A [`Wait`] belongs to a flow node. When a run reaches the node,
//! [`Wait::begin`] evaluates the wait against the run and produces an
//! [`ActivatedWait`], which the run persists while it is suspended. When an
//! external event arrives it is decoded as a [`Resume`], checked with
//! [`Wait::end`] and applied to the run with [`Resume::apply`]. Everything
//! that happens along the way is logged as an [`Event`].
//!
//! Every family is persisted as JSON tagged by `type` and is decoded through
//! the standard registries in [`registry`].
//!
//! # Example
//!
//! ```
//! use tarry_core::testing::TestRun;
//! use tarry_core::FlowRun;
//! use tarry_core::types::{FlowKind, RunStatus};
//! use tarry_waits::{read_resume, read_wait, Event};
//!
//! let wait = read_wait(br#"{"type": "msg", "hint": {"type": "image"}}"#)?;
//! let mut run = TestRun::new(FlowKind::Messaging);
//! let mut events: Vec<Event> = Vec::new();
//!
//! let activated = wait.begin(&mut run, &mut events);
//! assert!(activated.is_some());
//! assert_eq!(run.status(), RunStatus::Waiting);
//!
//! let resume = read_resume(br#"{
//!     "type": "run_expiration",
//!     "resumed_on": "2024-01-15T10:30:00Z"
//! }"#)?;
//! wait.end(&resume)?;
//! resume.apply(&mut run, &mut events);
//! assert_eq!(run.status(), RunStatus::Expired);
//! # Ok::<(), tarry_core::TarryError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activated;
mod decode;
pub mod events;
pub mod hints;
pub mod registry;
pub mod resumes;
pub mod waits;

pub use activated::{ActivatedDialWait, ActivatedMsgWait, ActivatedWait, ActivatedWaitKind};
pub use events::{Event, EventLog, EventSink};
pub use hints::Hint;
pub use registry::{
    Registries, read_activated_wait, read_activated_wait_value, read_hint, read_hint_value,
    read_resume, read_resume_value, read_wait, read_wait_value,
};
pub use resumes::{Resume, ResumeKind};
pub use waits::{DialWait, MsgWait, Timeout, Wait, WaitKind};
