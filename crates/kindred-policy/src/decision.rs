//! Decision types returned by the engine.

use serde::Serialize;

// ─── Deny reason ─────────────────────────────────────────────────────────────

/// Why access was refused. Carried up to the API layer so refusals can be
/// reported and logged without leaking record contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DenyReason {
  /// The actor's role grants no graph access at all.
  RoleForbidden,
  /// The record belongs to a different agency than the actor.
  TenantMismatch,
  /// The relationship is sealed and the actor is not an administrator.
  SealedRecord,
  /// The person is retired and the action would grow their graph.
  RetiredRecord,
}

impl std::fmt::Display for DenyReason {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Self::RoleForbidden => "role does not permit graph access",
      Self::TenantMismatch => "record belongs to another agency",
      Self::SealedRecord => "record is sealed",
      Self::RetiredRecord => "record is retired",
    })
  }
}

// ─── Decision ────────────────────────────────────────────────────────────────

/// Outcome of a completed evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Allow,
  Deny(DenyReason),
}

impl Decision {
  pub fn is_allow(&self) -> bool { matches!(self, Self::Allow) }

  /// Turn the decision into a `Result`, mapping a refusal through `f`.
  pub fn require<E>(self, f: impl FnOnce(DenyReason) -> E) -> Result<(), E> {
    match self {
      Self::Allow => Ok(()),
      Self::Deny(reason) => Err(f(reason)),
    }
  }
}

// ─── Gate ────────────────────────────────────────────────────────────────────

/// Outcome of the role screen, which runs before any store read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
  /// Full access. Tenant and record rules do not apply.
  Granted,
  /// No access. Nothing may be read from the store on this actor's behalf.
  Refused(DenyReason),
  /// Access depends on the record's tenant; evaluation must continue.
  NeedsTenant,
}
