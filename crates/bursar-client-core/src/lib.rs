//! Stores functionality that should be shared between different clients: the
//! session store, the route guard and the client for the authentication
//! service.
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library that talk to the network are called

#![warn(unused_crate_dependencies)]


mod auth_service;
mod client;
pub mod configuration;
pub mod guard;
pub mod router;
mod session_store;
pub mod storage;

pub use auth_service::AuthService;
pub use client::{Client, UiCallBack};
pub use guard::{NavDecision, RouteGuard};
pub use router::{NavContext, Resolution, Router};
pub use session_store::{SessionHandle, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
