//! Lifecycle hook points
//!
//! This module defines the points around a write operation at which
//! registered callbacks run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in an entity write at which callbacks are invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookPoint {
    BeforeInsert,
    AfterInsert,
    BeforeUpdate,
    AfterUpdate,
    BeforeDelete,
    AfterDelete,
}

impl HookPoint {
    pub const ALL: [HookPoint; 6] = [
        HookPoint::BeforeInsert,
        HookPoint::AfterInsert,
        HookPoint::BeforeUpdate,
        HookPoint::AfterUpdate,
        HookPoint::BeforeDelete,
        HookPoint::AfterDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HookPoint::BeforeInsert => "before_insert",
            HookPoint::AfterInsert => "after_insert",
            HookPoint::BeforeUpdate => "before_update",
            HookPoint::AfterUpdate => "after_update",
            HookPoint::BeforeDelete => "before_delete",
            HookPoint::AfterDelete => "after_delete",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
