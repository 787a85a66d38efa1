//! # Command-Line Interface
//!
//! The argument vector has three sections:
//!
//! ```text
//! lbaas-batchops [flags] -- <lbaas subcommand and arguments> [++ name:spec ...]
//! ```
//!
//! Flags before `--` are parsed with clap. Everything between `--` and `++`
//! is the command template (the control-plane binary is prefixed later).
//! Everything after `++` is a variable assignment.

use crate::config::BatchConfig;
use crate::constants::cli::{TEMPLATE_MARKER, VARIABLES_MARKER};
use crate::error::{BatchError, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

const EXAMPLE: &str = "Example:

    lbaas-batchops --output-filepath /dev/stdout --check-lb lb-web \\
        -- lbaas-member-create --name mb-%{x} --subnet %{y} --address 10.0.0.%{x} --protocol-port 80 pool-web \\
        ++ x:1-5 y:private-subnet";

/// Flags accepted before the `--` marker
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "lbaas-batchops")]
#[command(about = "Generate and run batches of LBaaS control-plane commands")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(override_usage = "lbaas-batchops [OPTIONS] -- <LBAAS COMMAND AND ARGUMENTS> [++ VARIABLE-DEFINITION...]")]
#[command(after_help = EXAMPLE)]
pub struct CliArgs {
    /// Output the JSON results to this file (appended), or /dev/stdout
    #[arg(long)]
    pub output_filepath: Option<String>,

    /// Max pending checks before giving up on the load balancer
    #[arg(long)]
    pub max_check_times: Option<u32>,

    /// Load balancer name or id to check before each command
    #[arg(long)]
    pub check_lb: Option<String>,

    /// Database username
    #[arg(long)]
    pub db_username: Option<String>,

    /// Database password
    #[arg(long)]
    pub db_password: Option<String>,

    /// Database name
    #[arg(long)]
    pub db_dbname: Option<String>,

    /// Database hostname
    #[arg(long)]
    pub db_hostname: Option<String>,

    /// Database port
    #[arg(long)]
    pub db_tcpport: Option<u64>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Check the load balancer after each successful create/update/delete
    #[arg(long)]
    pub post_check: bool,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// Layer the flags that were given over `config`
    pub fn apply_to(&self, config: &mut BatchConfig) {
        if let Some(path) = &self.output_filepath {
            config.output_path = path.clone();
        }
        if let Some(max) = self.max_check_times {
            config.readiness.max_check_times = max;
        }
        if let Some(lb) = &self.check_lb {
            config.check_lb = lb.clone();
        }
        if let Some(username) = &self.db_username {
            config.database.username = Some(username.clone());
        }
        if let Some(password) = &self.db_password {
            config.database.password = Some(password.clone());
        }
        if let Some(dbname) = &self.db_dbname {
            config.database.dbname = Some(dbname.clone());
        }
        if let Some(hostname) = &self.db_hostname {
            config.database.hostname = Some(hostname.clone());
        }
        if let Some(port) = self.db_tcpport {
            config.database.port = Some(port);
        }
        if self.post_check {
            config.readiness.post_check_enabled = true;
        }
    }
}

/// The argument vector split at the `--` and `++` markers
#[derive(Debug, Clone, PartialEq, Eq)]
struct Sections {
    flags: Vec<OsString>,
    template: Option<Vec<OsString>>,
    assignments: Vec<OsString>,
}

impl Sections {
    fn split(argv: Vec<OsString>) -> Self {
        let Some(template_at) = argv.iter().position(|a| a == TEMPLATE_MARKER) else {
            return Self {
                flags: argv,
                template: None,
                assignments: Vec::new(),
            };
        };

        let mut flags = argv;
        let rest = flags.split_off(template_at + 1);
        flags.pop();

        let (template, assignments) = match rest.iter().position(|a| a == VARIABLES_MARKER) {
            Some(vars_at) => (rest[..vars_at].to_vec(), rest[vars_at + 1..].to_vec()),
            None => (rest, Vec::new()),
        };

        Self {
            flags,
            template: Some(template),
            assignments,
        }
    }
}

/// Template tokens and assignments end up in command lines, so they must be UTF-8
fn into_strings(args: Vec<OsString>) -> Result<Vec<String>> {
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|raw| {
                BatchError::configuration(format!("argument {raw:?} is not valid UTF-8"))
            })
        })
        .collect()
}

/// A fully parsed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub args: CliArgs,
    /// Template tokens, without the control-plane binary
    pub template_tokens: Vec<String>,
    /// Raw `name:spec` assignments
    pub assignments: Vec<String>,
}

impl Invocation {
    /// Parse the process arguments; clap handles `--help` and bad flags by exiting
    pub fn parse_from<I, T>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let sections = Sections::split(argv.into_iter().map(Into::into).collect());
        let args = CliArgs::parse_from(&sections.flags);
        Self::assemble(args, sections)
    }

    /// Like [`Invocation::parse_from`], reporting flag errors instead of exiting
    pub fn try_parse_from<I, T>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let sections = Sections::split(argv.into_iter().map(Into::into).collect());
        let args = CliArgs::try_parse_from(&sections.flags)
            .map_err(|e| BatchError::configuration(e.to_string()))?;
        Self::assemble(args, sections)
    }

    fn assemble(args: CliArgs, sections: Sections) -> Result<Self> {
        let template_tokens = sections
            .template
            .filter(|tokens| !tokens.is_empty())
            .ok_or(BatchError::MissingCommandTemplate)?;

        Ok(Self {
            args,
            template_tokens: into_strings(template_tokens)?,
            assignments: into_strings(sections.assignments)?,
        })
    }
}

/// Usage and example text shown when the template is missing
pub fn usage(program: &str) -> String {
    format!(
        "Usage:\n\n    {program} [command arguments] -- <lbaas command and arguments>[ ++ variable-definition]\n\n{EXAMPLE}\n\nRun `{program} --help` for all command arguments.\n"
    )
}
