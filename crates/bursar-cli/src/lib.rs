#![warn(unused_crate_dependencies)]

mod warning_suppress {
    // Only used in binary and triggers unused warning
    use tokio as _;
}

pub mod cli;
pub mod commands;
pub mod tracing;
