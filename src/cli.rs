//! 命令行界面定义
//!
//! 定义了主程序的命令行参数和选项
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use warden_common::Role;

#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(version)]
#[command(about = "Tenant isolation, RBAC, audit log and field protection toolkit")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub(crate) config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Tenant identifier utilities
    Tenant {
        #[command(subcommand)]
        command: TenantCommands,
    },

    /// Print the role-permission table
    Roles {
        /// Only print this role
        #[arg(long)]
        role: Option<Role>,
    },

    /// Mask a value for display
    Mask {
        value: String,

        /// Number of trailing characters left visible
        #[arg(long, default_value_t = 4)]
        keep: usize,
    },

    /// Generate a new vault master key (hex)
    Keygen,

    /// Encrypt a field value with a tenant's derived key
    Encrypt {
        #[arg(long)]
        tenant: String,
        plaintext: String,
    },

    /// Decrypt a field value with a tenant's derived key
    Decrypt {
        #[arg(long)]
        tenant: String,
        value: String,
    },

    /// Inspect the audit log
    Audit {
        #[command(subcommand)]
        command: AuditCommands,
    },

    /// Test configuration file
    Check {
        /// Configuration file path (optional, defaults to --config)
        #[arg(index = 1)]
        config_file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum TenantCommands {
    /// Exit with status 1 when the identifier is invalid
    Validate { id: String },

    /// Print a fresh tenant identifier
    Generate,

    /// Normalize arbitrary text into a tenant slug
    Slug { raw: String },
}

#[derive(Subcommand, Debug)]
pub(crate) enum AuditCommands {
    /// Print a tenant's audit entries as JSON lines
    List {
        #[arg(long)]
        tenant: String,

        #[arg(long)]
        action: Option<String>,

        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        offset: Option<usize>,
    },

    /// Verify a tenant's audit hash chain
    Verify {
        #[arg(long)]
        tenant: String,
    },
}
