//! Core types for Tarry.
//!
//! This module provides strongly-typed identifiers, flow/run classification,
//! telephony URNs and the payloads carried by resumption events.

mod flow;
mod ids;
mod msg;
mod urn;

pub use flow::{FlowKind, RunStatus, TriggerKind};
pub use ids::{CategoryUuid, FlowUuid, MsgUuid, RunUuid};
pub use msg::{Dial, DialStatus, MsgIn};
pub use urn::{Country, Urn};
