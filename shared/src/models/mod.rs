//! Data models
//!
//! Shared between the domain core and pos-server (and the frontend via API).
//! JSON field names are camelCase.

pub mod menu;
pub mod order;

pub use menu::*;
pub use order::*;
