//! Path virtualization and access control for the spacedav gateway.
//!
//! A client-visible path selects a namespace with its first segment
//! (`public`, `user`, `account`, the `admin-*` mirrors, or `dataset`/`model`
//! sub-namespaces); the rest is tenant-relative. This crate turns such paths
//! into effective permissions and real filesystem locations, and coordinates
//! the multi-step relocations that must keep the filesystem and the dataset
//! record in agreement.
//!
//! Components:
//! - [`PermissionResolver`] — (virtual path, claims) → [`Permission`],
//!   fail-closed on every ambiguity.
//! - [`PathRedirector`] — (virtual path, claims) → real path.
//! - [`RelocationCoordinator`] — conflict check, parent provisioning,
//!   atomic rename, record update, in strict order.
//! - [`GatewayFront`] — per-request gate composing the above before the
//!   request is forwarded to the protocol engine.
//!
//! [`Permission`]: spacedav_core::Permission

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod front;
mod namespace;
mod redirect;
mod relocate;
pub mod response;
mod resolver;

pub use front::{DavMethod, GatewayFront, UnknownMethod};
pub use namespace::{Namespace, VirtualPath};
pub use redirect::PathRedirector;
pub use relocate::RelocationCoordinator;
pub use resolver::PermissionResolver;
