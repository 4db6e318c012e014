//! Code shared by the Bursar back office clients: identities, roles, the route
//! policy table and the access rules evaluated against a session

#![warn(unused_crate_dependencies)]

pub mod const_config;
pub mod errors;
pub mod id;
mod macros;
pub mod req_args;
pub mod routes;
pub mod session;
pub mod token;
pub mod uac;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
