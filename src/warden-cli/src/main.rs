//! Warden CLI entry point.
//!
//! Collects network allow flags, applies them to a fresh permission set,
//! then either evaluates candidate requests or prints the permission
//! tables.

use std::io;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use warden_net::{NetPermission, NetScope};

#[derive(Debug, Parser)]
#[command(name = "warden", version, about = "Evaluate network egress permissions")]
struct Cli {
    /// Allow UDP egress matching SPEC (repeatable; SPEC may be a
    /// comma-separated list of grants).
    #[arg(long = "allow-net-udp", value_name = "SPEC")]
    allow_net_udp: Vec<String>,

    /// Allow TCP egress matching SPEC (repeatable; SPEC may be a
    /// comma-separated list of grants).
    #[arg(long = "allow-net-tcp", value_name = "SPEC")]
    allow_net_tcp: Vec<String>,

    /// Print the permission tables once the grants are applied.
    #[arg(long)]
    debug_permissions: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate candidates against one scope, exiting non-zero on any
    /// denial.
    Check {
        #[arg(value_enum)]
        scope: ScopeArg,
        /// Candidates in `address` or `address/port` form.
        #[arg(required = true)]
        candidates: Vec<String>,
    },
    /// Print the permission tables.
    Dump,
}

/// Scope names accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    Udp,
    Tcp,
}

impl From<ScopeArg> for NetScope {
    fn from(scope: ScopeArg) -> NetScope {
        match scope {
            ScopeArg::Udp => NetScope::Udp,
            ScopeArg::Tcp => NetScope::Tcp,
        }
    }
}

/// Reject candidate shapes the permission engine treats as caller bugs.
fn validate_candidate(candidate: &str) -> Result<()> {
    let segments = candidate.split('/').filter(|segment| !segment.is_empty()).count();
    if segments == 1 || segments == 2 {
        Ok(())
    } else {
        bail!("candidate must be `address` or `address/port`: {candidate:?}");
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut permission = NetPermission::new();
    permission.apply(NetScope::Udp, &cli.allow_net_udp);
    permission.apply(NetScope::Tcp, &cli.allow_net_tcp);

    if cli.debug_permissions {
        permission.write_debug_snapshot(&mut io::stdout())?;
    }

    match cli.command {
        Command::Check { scope, candidates } => {
            let scope = NetScope::from(scope);
            let mut denied = 0usize;
            for candidate in &candidates {
                validate_candidate(candidate)?;
                let verdict = if permission.is_granted(scope, candidate) {
                    "granted"
                } else {
                    denied += 1;
                    "denied"
                };
                println!("{scope} {candidate}: {verdict}");
            }
            if denied > 0 {
                std::process::exit(1);
            }
        }
        Command::Dump => permission.write_debug_snapshot(&mut io::stdout())?,
    }
    Ok(())
}
