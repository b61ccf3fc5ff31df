//! Command line argument parsing

use clap::{ArgAction, Parser};
use std::ffi::OsString;

#[derive(Parser, Debug, Clone)]
#[command(author, version, long_about = None)]
#[command(name = "netota")]
#[command(about = "📡 Over-the-air sketch uploader for network-connected boards")]
pub struct Cli {
    /// The address of the board
    #[arg(long, default_value = "localhost")]
    pub address: String,

    /// The board needs to be listening on this port
    #[arg(long, default_value_t = 80)]
    pub port: u16,

    /// Username for authentication
    #[arg(long)]
    pub username: Option<String>,

    /// Password for authentication
    #[arg(long)]
    pub password: Option<String>,

    /// Sketch path
    #[arg(long, value_name = "PATH")]
    pub sketch: Option<String>,

    /// Upload endpoint (upload phase is skipped when unset)
    #[arg(long, value_name = "PATH")]
    pub upload: Option<String>,

    /// Reset endpoint (reset phase is skipped when unset)
    #[arg(long, value_name = "PATH")]
    pub reset: Option<String>,

    /// Sync endpoint (sync phase is skipped when unset)
    #[arg(long, value_name = "PATH")]
    pub sync: Option<String>,

    /// Upload binary mode
    #[arg(
        short = 'b',
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub binary: bool,

    /// Verbose flag
    #[arg(
        short = 'v',
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub verbose: bool,

    /// Quiet flag (only errors are logged)
    #[arg(
        short = 'q',
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub quiet: bool,

    /// Any non-empty value switches to https
    #[arg(long)]
    pub ssl: Option<String>,

    /// Sync expected return code in format code:string
    #[arg(long = "sync_exp", value_name = "CODE:STRING")]
    pub sync_exp: Option<String>,

    /// Serve the sketch locally and let the board download it
    #[arg(
        short = 'd',
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub serve: bool,

    /// Port for the self-serve file server (defaults to the board port)
    #[arg(long = "serve_port", value_name = "PORT")]
    pub serve_port: Option<u16>,

    /// Upload timeout in seconds
    #[arg(short = 't', default_value_t = 10, value_name = "SECONDS")]
    pub timeout: u64,
}

impl Cli {
    /// Parse the process arguments, accepting Go style `-flag value` spellings
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_flag_style(std::env::args_os()))
    }
}

/// Rewrite single-dash long flags (`-address`, `-sync_exp=200:OK`) to
/// `--address` and double-dash single letters (`--b`) to `-b`.
///
/// The first item is the program name and is left alone, as is everything
/// after a bare `--`.
pub fn normalize_flag_style<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;

    for (index, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if index == 0 || passthrough {
            normalized.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };

        if text == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        let rewritten = if let Some(rest) = text.strip_prefix("--") {
            if flag_name(rest).chars().count() == 1 {
                Some(format!("-{}", rest))
            } else {
                None
            }
        } else if let Some(rest) = text.strip_prefix('-') {
            if flag_name(rest).chars().count() > 1 {
                Some(format!("--{}", rest))
            } else {
                None
            }
        } else {
            None
        };

        normalized.push(rewritten.map(OsString::from).unwrap_or(arg));
    }

    normalized
}

fn flag_name(flag: &str) -> &str {
    flag.split_once('=').map(|(name, _)| name).unwrap_or(flag)
}
