//! Core types for the spacedav gateway.
//!
//! This crate holds everything the other spacedav crates agree on:
//! - tenant and dataset identifiers
//! - roles, statuses and per-membership access modes
//! - the 3-valued [`Permission`] the resolver produces
//! - request-scoped [`Claims`] decoded from a bearer token
//! - the [`GatewayError`] taxonomy shared across the gateway
//! - the [`SpaceConfig`] namespace/prefix configuration
//!
//! It deliberately owns no I/O: catalog and filesystem access live behind
//! traits in `spacedav-catalog` and `spacedav-fs`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod claims;
mod config;
mod error;
mod id;
mod permission;

pub use claims::Claims;
pub use config::SpaceConfig;
pub use error::{GatewayError, GatewayResult, NotFoundKind};
pub use id::{AccountId, DatasetId, UserId};
pub use permission::{AccessMode, Permission, Role, Status};
