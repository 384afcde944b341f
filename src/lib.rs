//! Typed operations and a re-arming watch bridge over the callback-based
//! client API of a ZooKeeper-style coordination store.
//!
//! The store's own client is asynchronous and callback-driven, with
//! one-shot watches. This crate turns that surface into ordinary `async`
//! Rust: leaf operations ([`SetDataOperation`], [`CreateOperation`],
//! [`GetDataOperation`], [`GetChildrenOperation`], [`ExistsOperation`])
//! that deliver a typed [`OperationResult`], watch-driven operations
//! ([`DataChangedOperation`], [`ChildrenChangedOperation`],
//! [`ExistenceChangedOperation`]) that survive the one-shot watch
//! semantics, and a [`Producer`] implementing the write-path policy on top
//! of them. The session itself stays outside, behind [`StoreSession`].

mod config;
mod constants;
mod errors;
mod message;
mod operations;
mod producer;
mod session;

pub use config::*;
pub use constants::ANY_VERSION;
pub use errors::*;
pub use message::*;
pub use operations::*;
pub use producer::*;
pub use session::*;

//-----------------------------------------------------------
// Test utils
