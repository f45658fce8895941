//! Clap derive structures for the `petadmin` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// petadmin -- administer pets and tutors in a pet registry
#[derive(Debug, Parser)]
#[command(
    name = "petadmin",
    version,
    about = "Manage pet registry records from the command line",
    long_about = "Browse, search, and edit pets and tutors held by a pet registry \
        backend, and link tutors to the pets they are responsible for.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "PETADMIN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'u', env = "PETADMIN_URL", global = true)]
    pub url: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, env = "PETADMIN_USERNAME", global = true, hide_env = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PETADMIN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PETADMIN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PETADMIN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage pets
    #[command(alias = "p")]
    Pets(PetsArgs),

    /// Manage tutors and their pet links
    #[command(alias = "t")]
    Tutors(TutorsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Shared pagination and search arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Zero-based page index
    #[arg(long, default_value = "0")]
    pub page: u32,

    /// Records per page (overrides profile)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Filter by name
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Walk every page instead of one
    #[arg(long, short = 'a', conflicts_with = "page")]
    pub all: bool,
}

// ── Pets ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PetsArgs {
    #[command(subcommand)]
    pub command: PetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PetsCommand {
    /// List pets
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a pet and its tutors
    Get {
        /// Pet ID
        id: u64,
    },

    /// Register a new pet
    Create {
        /// Pet name
        #[arg(long)]
        name: String,

        /// Breed
        #[arg(long, default_value = "")]
        breed: String,

        /// Age in years
        #[arg(long, default_value = "0")]
        age: u32,

        /// Photo to upload after the record is saved
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Update an existing pet (unset fields keep their current value)
    Update {
        /// Pet ID
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        breed: Option<String>,

        #[arg(long)]
        age: Option<u32>,

        /// Photo to upload after the record is saved
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Delete a pet
    #[command(alias = "rm")]
    Delete {
        /// Pet ID
        id: u64,
    },
}

// ── Tutors ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TutorsArgs {
    #[command(subcommand)]
    pub command: TutorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TutorsCommand {
    /// List tutors
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a tutor and their pets
    Get {
        /// Tutor ID
        id: u64,
    },

    /// Register a new tutor
    Create {
        /// Full name
        #[arg(long)]
        name: String,

        /// Phone with area code (10 or 11 digits)
        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// CPF (punctuation optional)
        #[arg(long)]
        cpf: Option<String>,

        /// Photo to upload after the record is saved
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Update an existing tutor (unset fields keep their current value)
    Update {
        /// Tutor ID
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        cpf: Option<String>,

        /// Photo to upload after the record is saved
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Delete a tutor
    #[command(alias = "rm")]
    Delete {
        /// Tutor ID
        id: u64,
    },

    /// Link a pet to a tutor
    Link {
        /// Tutor ID
        tutor: u64,
        /// Pet ID
        pet: u64,
    },

    /// Remove a pet from a tutor
    Unlink {
        /// Tutor ID
        tutor: u64,
        /// Pet ID
        pet: u64,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a profile value
    Set {
        /// Key (api_url, username, password_env, insecure, timeout, ca_cert,
        /// page_size, search_debounce_ms)
        key: String,
        /// Value
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile to store the password for (defaults to the active one)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
