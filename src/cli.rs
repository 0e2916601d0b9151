use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Brawl Stars scrim tracker")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Scan battle logs every 10 minutes and post the weekly report
    Watch {
        /// Log messages instead of posting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a single scan cycle
    Scan {
        /// Log messages instead of posting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Post, archive and reset the weekly statistics now
    Report {
        /// Log messages instead of posting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Start the HTTP server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Print the current statistics of a mode, e.g. "Gem Grab"
    Stats {
        community: String,
        mode: String,
        /// One line per brawler, for narrow screens
        #[arg(long)]
        compact: bool,
    },
    /// Manage the tracked players and settings of a community
    Community {
        #[clap(subcommand)]
        action: CommunityCommand,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum CommunityCommand {
    /// Track a player by tag
    AddPlayer { community: String, tag: String },
    /// Stop tracking a player
    RemovePlayer { community: String, tag: String },
    /// List tracked players
    Players { community: String },
    /// Set the channel finished scrims are posted to; omit to unset
    SetRoom {
        community: String,
        channel: Option<String>,
    },
    /// Set the channel weekly statistics are posted to; omit to unset
    SetStatsRoom {
        community: String,
        channel: Option<String>,
    },
    /// Set how many brawlers the statistics show (at most 25)
    SetStatsCount { community: String, count: usize },
}
