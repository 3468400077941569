//! Tarry Core Library
//!
//! Shared model for the Tarry wait/resume core: the pieces a flow runtime
//! needs to suspend a run at a wait and later resume it with an external
//! event.
//!
//! # Key Components
//!
//! - **Types**: identifiers, flow kinds, run statuses, telephony URNs and the
//!   payloads of resumption events
//! - **Run**: the [`FlowRun`] view of a run that waits and resumes act on
//! - **Registry**: tag-dispatched decoding of persisted JSON families
//! - **Settings**: dial limits and expiry fallbacks
//! - **Testing**: an in-memory run and a small template evaluator
//!
//! # Example
//!
//! ```
//! use tarry_core::prelude::*;
//!
//! let urn = Urn::from_phone("0979123456", Country::parse("EC").ok().as_ref())?;
//! assert_eq!(urn.as_str(), "tel:+593979123456");
//! # Ok::<(), TarryError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod observability;
pub mod prelude;
pub mod registry;
pub mod run;
pub mod settings;
pub mod testing;
pub mod types;

pub use error::{Result, TarryError};
pub use registry::{ReadFn, TypeRegistry};
pub use run::{Environment, Evaluated, FlowInfo, FlowRun, Input, SessionInfo, TemplateEvaluator};
pub use settings::WaitSettings;
