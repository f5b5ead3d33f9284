use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Track household chores, points, and rewards from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Household ID or unique ID prefix (defaults to the only local household)
    #[arg(long, global = true, value_name = "ID")]
    pub household: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a household with its first admin member
    Init {
        /// Household name
        name: String,
        /// Display name of the admin member
        #[arg(long, value_name = "NAME")]
        admin: String,
    },
    /// Manage household members
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },
    /// Manage chores
    Chore {
        #[command(subcommand)]
        command: ChoreCommands,
    },
    /// Manage rewards
    Reward {
        #[command(subcommand)]
        command: RewardCommands,
    },
    /// Sync with the remote service, or inspect sync state
    Sync {
        #[command(subcommand)]
        command: Option<SyncCommands>,
    },
    /// Export the household's active records
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a member to the household
    Add {
        /// Display name
        name: String,
        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
    /// List members with their point balances
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ChoreCommands {
    /// Create a new chore
    #[command(alias = "new")]
    Add {
        /// Chore title
        title: String,
        /// Points awarded on completion
        #[arg(long, default_value = "1")]
        points: i64,
        /// Member ID or prefix to assign the chore to
        #[arg(long, value_name = "MEMBER")]
        assign: Option<String>,
        /// Due timestamp in Unix milliseconds
        #[arg(long, value_name = "MS")]
        due: Option<i64>,
    },
    /// List chores
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a completion for a chore
    Done {
        /// Chore ID or unique ID prefix
        id: String,
        /// Member ID or prefix who completed it
        #[arg(long, value_name = "MEMBER")]
        member: String,
    },
    /// Delete a chore (soft delete unless --hard)
    Delete {
        /// Chore ID or unique ID prefix
        id: String,
        /// Physically remove the record instead of tombstoning it
        #[arg(long)]
        hard: bool,
    },
}

#[derive(Subcommand)]
pub enum RewardCommands {
    /// Create a new reward
    Add {
        /// Reward title
        title: String,
        /// Point cost per redemption
        #[arg(long)]
        cost: i64,
        /// Limited stock; unlimited when omitted
        #[arg(long)]
        quantity: Option<u32>,
    },
    /// List rewards
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Redeem a reward for a member
    Redeem {
        /// Reward ID or unique ID prefix
        id: String,
        /// Member ID or prefix redeeming it
        #[arg(long, value_name = "MEMBER")]
        member: String,
    },
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Show per-collection watermarks and configuration state
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recently resolved sync conflicts
    Conflicts {
        /// Number of conflicts to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for hearth_core::export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
