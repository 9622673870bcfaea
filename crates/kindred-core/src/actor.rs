//! Actors — who is asking.
//!
//! Every operation takes the acting user as an explicit argument. There is
//! no ambient "current user"; a missing actor is a compile error, not a
//! silent privilege escalation.

use serde::{Deserialize, Serialize};

use crate::id::AgencyId;

// ─── Role ────────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
  /// Cross-agency oversight. Sees everything, including sealed edges.
  Administrator,
  /// Agency staff. Scoped to their own agency's records.
  CaseWorker,
  /// Support accounts with no graph visibility at all.
  Restricted,
}

impl Role {
  /// Parse the wire form used in headers and config.
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "administrator" => Some(Self::Administrator),
      "case-worker" => Some(Self::CaseWorker),
      "restricted" => Some(Self::Restricted),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Administrator => "administrator",
      Self::CaseWorker => "case-worker",
      Self::Restricted => "restricted",
    }
  }
}

// ─── Actor ───────────────────────────────────────────────────────────────────

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub role:   Role,
  /// Home agency. Administrators may act without one.
  pub agency: Option<AgencyId>,
}

impl Actor {
  pub fn administrator() -> Self {
    Self {
      role:   Role::Administrator,
      agency: None,
    }
  }

  pub fn case_worker(agency: AgencyId) -> Self {
    Self {
      role:   Role::CaseWorker,
      agency: Some(agency),
    }
  }

  pub fn restricted(agency: AgencyId) -> Self {
    Self {
      role:   Role::Restricted,
      agency: Some(agency),
    }
  }
}
