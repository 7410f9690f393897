//! Order status workflow
//!
//! ```text
//! new ──► preparing ──► ready ──► completed
//! ```
//!
//! The progression is strictly linear: no skipping ahead, no going back, and
//! `completed` is terminal. There is no cancelled state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    New,
    Preparing,
    Ready,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::New,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ];

    /// Wire/storage representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown enum string read from storage or a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(OrderStatus::New),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(ParseEnumError {
                kind: "order status",
                value: other.to_string(),
            }),
        }
    }
}

/// Rejected status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move order from {from} to {to}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Legal transitions of the order workflow
pub struct OrderStatusMachine;

impl OrderStatusMachine {
    /// The single status reachable from `current`, `None` once completed
    pub const fn next_status(current: OrderStatus) -> Option<OrderStatus> {
        match current {
            OrderStatus::New => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    /// Label for the button that performs the next transition
    pub const fn action_label(current: OrderStatus) -> Option<&'static str> {
        match current {
            OrderStatus::New => Some("Accept Order"),
            OrderStatus::Preparing => Some("Mark Ready"),
            OrderStatus::Ready => Some("Complete"),
            OrderStatus::Completed => None,
        }
    }

    /// True only when `to` is exactly the next status of `from`
    pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
        Self::next_status(from) == Some(to)
    }

    pub fn check_transition(from: OrderStatus, to: OrderStatus) -> Result<(), TransitionError> {
        if Self::can_transition(from, to) {
            Ok(())
        } else {
            Err(TransitionError { from, to })
        }
    }
}
