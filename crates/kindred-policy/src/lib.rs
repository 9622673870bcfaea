//! Access decisions for the kindred relationship graph.
//!
//! Everything here is a pure function over the actor and (at most) the
//! record being acted on. The engine never reads storage itself; callers
//! feed it data in the order the checks want it, which is what lets a
//! refusal happen before any row is loaded.

pub mod decision;
pub mod engine;

pub use decision::{Decision, DenyReason, Gate};
pub use engine::{
  Action, Resource, authorize_loaded, resource_rule, screen, tenant_gate,
};
