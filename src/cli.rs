use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "sitework")]
#[command(about = "Construction project management from the terminal")]
#[command(version)]
pub struct Cli {
    /// Serve every request from seeded in-process data
    #[arg(long, global = true)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subcontractor bids
    Bids {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Requests for information
    Rfis {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Submittals and their review cycle
    Submittals {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Vendor invoices
    Invoices {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Outgoing payments
    Payments {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Vendor quotes
    Quotes {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Approval requests
    Approvals {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Project documents
    #[command(visible_alias = "docs")]
    Documents {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Project email
    Emails {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Show a Kanban board, optionally moving one card
    Board {
        /// Which board to show
        #[arg(value_enum)]
        board: BoardKind,

        /// Project ID (defaults to the configured default project)
        #[arg(short, long)]
        project: Option<String>,

        /// Move a card to the top of another column (e.g. bid-001=won)
        #[arg(long = "move", value_name = "ID=STATUS", value_parser = parse_key_value)]
        move_card: Option<(String, String)>,
    },

    /// Ask the project assistant a question
    Ask {
        /// Project ID the question is about
        #[arg(short, long)]
        project: Option<String>,

        /// Question text
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },

    /// Status counts across the main collections of a project
    Overview {
        /// Project ID (defaults to the configured default project)
        #[arg(short, long)]
        project: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoardKind {
    Bids,
    Rfis,
}

/// Operations shared by every entity collection
#[derive(Subcommand)]
pub enum EntityAction {
    /// List records
    #[command(visible_alias = "list")]
    Ls(ListArgs),

    /// Display one record
    Show {
        /// Record ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a record from field values
    Create {
        /// Field value as key=value; values that parse as JSON are sent as JSON
        #[arg(short, long = "field", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,

        /// Project ID (defaults to the configured default project)
        #[arg(short, long)]
        project: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change fields of a record
    Update {
        /// Record ID
        id: String,

        /// Field value as key=value
        #[arg(short, long = "field", value_name = "KEY=VALUE", value_parser = parse_key_value, required = true)]
        fields: Vec<(String, String)>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a record
    #[command(visible_alias = "rm")]
    Delete {
        /// Record ID
        id: String,
    },

    /// List files attached to a record
    Attachments {
        /// Record ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a file as an attachment
    Attach {
        /// Record ID
        id: String,

        /// File to upload
        file: PathBuf,
    },

    /// Download a record's file
    Download {
        /// Record ID
        id: String,

        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List comments on a record
    Comments {
        /// Record ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a comment to a record
    Comment {
        /// Record ID
        id: String,

        /// Comment text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Run a named action (e.g. submit, approve) on one or more records
    Action {
        /// Action name
        action: String,

        /// Record IDs; more than one runs a bulk action
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Project ID (defaults to the configured default project)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Case-insensitive text search
    #[arg(short, long)]
    pub query: Option<String>,

    /// Exact-match filter as key=value (repeatable)
    #[arg(short, long = "filter", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Only show records with this status
    #[arg(short, long)]
    pub status: Option<String>,

    /// Sort key
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        /// Config key (e.g. api.base_url, default_project)
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the configuration file path
    Path,
}

/// Parse `key=value`, splitting on the first `=`
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("status=won").unwrap(),
            ("status".to_string(), "won".to_string())
        );
        assert_eq!(
            parse_key_value("title=a=b").unwrap(),
            ("title".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("status").is_err());
        assert!(parse_key_value("=won").is_err());
    }

    #[test]
    fn test_ls_flags() {
        let cli = Cli::try_parse_from([
            "sitework", "bids", "ls", "--filter", "trade=Concrete", "--sort", "amount", "--desc",
        ])
        .unwrap();
        match cli.command {
            Commands::Bids {
                action: EntityAction::Ls(args),
            } => {
                assert_eq!(args.filters, vec![("trade".to_string(), "Concrete".to_string())]);
                assert_eq!(args.sort.as_deref(), Some("amount"));
                assert!(args.desc);
            }
            _ => panic!("expected bids ls"),
        }
    }

    #[test]
    fn test_desc_requires_sort() {
        assert!(Cli::try_parse_from(["sitework", "bids", "ls", "--desc"]).is_err());
    }
}
