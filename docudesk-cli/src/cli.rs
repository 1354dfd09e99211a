//! Command-line arguments.

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use docudesk_lib::api::ExportFormat;
use docudesk_lib::model::CallStatus;
use docudesk_lib::model::DocumentType;
use docudesk_lib::model::FolderStatus;
use docudesk_lib::query::DEFAULT_LIMIT;
use docudesk_lib::query::ListParams;
use docudesk_lib::query::SortDirection;

#[derive(Debug, Parser)]
#[command(name = "docudesk", version, about = "Administration console for folders, documents and call logs")]
pub struct Opts {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// config.json location, as a URL or a file path.
    #[arg(long, env = "DOCUDESK_CONFIG", global = true)]
    pub config: Option<String>,

    /// Overrides API_BASE_URL from the config.
    #[arg(long, env = "DOCUDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token to use instead of the stored session.
    #[arg(long, env = "DOCUDESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Where the settings database lives.
    #[arg(long, env = "DOCUDESK_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Keep settings in memory for this run only.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = 30, global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the bearer token issued by the sign-in provider.
    Login {
        /// The token; read from stdin when omitted.
        access_token: Option<String>,
        /// Expiry as an RFC 3339 timestamp.
        #[arg(long, conflicts_with = "expires_in")]
        expires_at: Option<String>,
        /// Expiry in seconds from now.
        #[arg(long)]
        expires_in: Option<i64>,
    },
    /// Forget the stored token.
    Logout,
    /// Show or change the UI language.
    Language {
        /// Language code, e.g. `fr` or `pt-BR`.
        code: Option<String>,
    },
    /// Show the effective configuration.
    Config,
    #[command(subcommand)]
    Folders(FolderCommand),
    #[command(subcommand)]
    Documents(DocumentCommand),
    #[command(subcommand)]
    Calls(CallCommand),
    #[command(subcommand)]
    Notes(NoteCommand),
}

#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    List(ListArgs),
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type", default_value = "invoice")]
        document_type: DocumentType,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "active")]
        status: FolderStatus,
    },
    /// Change a folder. Unset options keep their current value.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        document_type: Option<DocumentType>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<FolderStatus>,
    },
    Delete {
        id: i64,
    },
    /// List the documents of a folder.
    Documents {
        id: i64,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    Show {
        id: i64,
    },
    Rename {
        id: i64,
        name: String,
    },
    /// Replace the corrected data of a document.
    Correct {
        id: i64,
        /// Inline JSON object.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        json: Option<String>,
        /// File holding a JSON object.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    Delete {
        id: i64,
    },
    /// Queue documents for processing and follow their status.
    Process {
        /// Folder the documents belong to.
        #[arg(long)]
        folder: i64,
        #[arg(required = true)]
        ids: Vec<i64>,
        /// Poll interval in milliseconds.
        #[arg(long, default_value_t = 5000)]
        interval_ms: u64,
        /// How often to resume polling after a failed status check.
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Download documents as a spreadsheet.
    Export {
        #[arg(required = true)]
        ids: Vec<i64>,
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// Extracted field to include; repeatable.
        #[arg(long = "field")]
        fields: Vec<String>,
        #[arg(long = "type")]
        document_type: Option<DocumentType>,
        /// Directory to save into.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum CallCommand {
    /// List the calls of a clinic.
    List {
        clinic: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    Show {
        id: i64,
    },
    Update {
        id: i64,
        #[arg(long)]
        status: Option<CallStatus>,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        summary: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum NoteCommand {
    /// Show the notes of a call.
    List {
        call: i64,
    },
    Add {
        call: i64,
        content: String,
    },
    Edit {
        id: i64,
        content: String,
    },
    Delete {
        id: i64,
    },
}

/// Search, filter, page and sort options shared by list commands.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[arg(long, default_value = "")]
    pub search: String,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,
    /// Column to sort by, e.g. `name` or `created_at`.
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort ascending instead of descending.
    #[arg(long)]
    pub asc: bool,
    /// Only show loaded rows containing this text.
    #[arg(long)]
    pub filter: Option<String>,
}

impl ListArgs {
    pub fn params(&self) -> ListParams {
        let defaults = ListParams::default();
        ListParams {
            search: self.search.clone(),
            status: self.status.clone().filter(|s| !s.is_empty()),
            page: self.page.max(1),
            limit: self.limit.max(1),
            order_by: self.sort.clone().unwrap_or(defaults.order_by),
            order_direction: if self.asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_consistent() {
        Opts::command().debug_assert();
    }

    #[test]
    fn list_args_become_params() {
        let opts = Opts::parse_from([
            "docudesk", "folders", "list", "--search", "acme", "--page", "2", "--sort", "name",
            "--asc",
        ]);
        let Command::Folders(FolderCommand::List(list)) = opts.command else {
            panic!("expected folders list");
        };
        let params = list.params();
        assert_eq!(params.search, "acme");
        assert_eq!(params.page, 2);
        assert_eq!(params.order_by, "name");
        assert_eq!(params.order_direction, SortDirection::Asc);
        assert_eq!(params.to_query(), "search=acme&page=2&limit=20&orderBy=name&orderDirection=asc");
    }

    #[test]
    fn correct_needs_json_or_file() {
        assert!(Opts::try_parse_from(["docudesk", "documents", "correct", "5"]).is_err());
        assert!(
            Opts::try_parse_from(["docudesk", "documents", "correct", "5", "--json", "{}"]).is_ok()
        );
    }
}
