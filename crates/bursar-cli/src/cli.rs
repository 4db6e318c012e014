use std::{convert::Infallible, path::PathBuf};

use clap::{Parser, Subcommand};
use secrecy::SecretString;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    #[arg(
        long,
        default_value = "configuration",
        help = "Folder holding base.toml and the per environment overrides"
    )]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and keep the session for later commands
    Login {
        #[arg(short, long)]
        username: String,
        /// Prompted for on stdin when not given
        #[arg(long, env = "BURSAR_PASSWORD", hide_env_values = true, value_parser = secret_from_str)]
        password: Option<SecretString>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami {
        /// Ask the service for the current profile first
        #[arg(short, long)]
        refresh: bool,
    },
    /// Show where a navigation to PATH would end up
    Navigate { path: String },
    /// List the pages and the outcome of navigating to each
    Routes,
    /// Check a permission rule such as `admin`, `/invoice`, `3` or `1,2`
    Permit { rule: String },
}

fn secret_from_str(value: &str) -> Result<SecretString, Infallible> {
    Ok(value.to_string().into())
}
