//! Prelude for convenient imports.
//!
//! ```
//! use tarry_core::prelude::*;
//! ```

pub use crate::error::{Result, TarryError};
pub use crate::registry::{ReadFn, TypeRegistry};
pub use crate::run::{
    Environment, Evaluated, FlowInfo, FlowRun, Input, SessionInfo, TemplateEvaluator,
};
pub use crate::settings::WaitSettings;
pub use crate::types::{
    CategoryUuid, Country, Dial, DialStatus, FlowKind, FlowUuid, MsgIn, MsgUuid, RunStatus,
    RunUuid, TriggerKind, Urn,
};
