use clap::{CommandFactory, Parser, Subcommand};
use civicpin::model::{Category, Coordinates, Status};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "civicpin",
    bin_name = "civicpin",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Report neighbourhood issues and follow them to resolution", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding issues, photos, config and session
    #[arg(
        long,
        global = true,
        env = "CIVICPIN_HOME",
        value_name = "DIR",
        help_heading = "Options"
    )]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Core,
    Issue,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Core => "Core Commands:",
            CommandGroup::Issue => "Per-Issue Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "report" | "list" => Some(CommandGroup::Core),
            "show" | "upvote" | "progress" | "resolve" | "note" | "delete" => {
                Some(CommandGroup::Issue)
            }
            "locate" | "whoami" | "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[CommandGroup::Core, CommandGroup::Issue, CommandGroup::Misc]
    }
}

pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("civicpin {version}\n"));
    output.push_str("Report neighbourhood issues and follow them to resolution\n");
    output.push('\n');
    output.push_str("Usage: civicpin [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --data-dir <DIR>  Data directory [env: CIVICPIN_HOME]\n");
    output.push_str("  -v, --verbose         Verbose output\n");
    output.push_str("  -h, --help            Print help\n");
    output.push_str("  -V, --version         Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a command by name, falling back to the grouped help.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            let help = subcmd.render_help();
            print!("{}", help);
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Report { .. } => "report",
        Commands::List { .. } => "list",
        Commands::Show { .. } => "show",
        Commands::Upvote { .. } => "upvote",
        Commands::Progress { .. } => "progress",
        Commands::Resolve { .. } => "resolve",
        Commands::Note { .. } => "note",
        Commands::Delete { .. } => "delete",
        Commands::Locate => "locate",
        Commands::Whoami => "whoami",
        Commands::Config { .. } => "config",
        Commands::Help { .. } => "help",
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report a new issue
    #[command(alias = "new", display_order = 1)]
    Report {
        /// Short title
        #[arg(short, long)]
        title: String,

        /// What is wrong, in a sentence or two
        #[arg(short, long)]
        description: String,

        /// roads, lighting, waste, water, safety or other
        #[arg(short, long, default_value = "other")]
        category: Category,

        /// Position as LAT,LNG
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true, conflicts_with = "here")]
        at: Option<Coordinates>,

        /// Use the approximate position of this machine
        #[arg(long)]
        here: bool,

        /// Street address; when it can be geocoded it wins over --at
        #[arg(short, long)]
        address: Option<String>,

        /// Photo to attach
        #[arg(long, value_name = "FILE")]
        photo: Option<PathBuf>,
    },

    /// List issues, open ones first
    #[command(alias = "ls", display_order = 2)]
    List {
        #[arg(short, long)]
        category: Option<Category>,

        /// open, in_progress or resolved
        #[arg(long)]
        status: Option<Status>,

        /// Text to look for in title, description and address
        #[arg(short, long)]
        search: Option<String>,

        /// Only issues reported from this session
        #[arg(long)]
        mine: bool,

        /// Do not geocode issues that have an address but no position
        #[arg(long)]
        no_backfill: bool,
    },

    /// Show one issue with its update log
    #[command(alias = "v", display_order = 10)]
    Show {
        /// Issue id or a unique prefix of it
        id: String,
    },

    /// Add a vote to an issue
    #[command(alias = "+1", display_order = 11)]
    Upvote {
        /// Issue id or a unique prefix of it
        id: String,
    },

    /// Mark an issue as in progress
    #[command(display_order = 12)]
    Progress {
        /// Issue id or a unique prefix of it
        id: String,
    },

    /// Mark an issue as resolved
    #[command(display_order = 13)]
    Resolve {
        /// Issue id or a unique prefix of it
        id: String,
    },

    /// Append a note to an issue's update log
    #[command(display_order = 14)]
    Note {
        /// Issue id or a unique prefix of it
        id: String,

        /// Move the issue to this status as well
        #[arg(long)]
        status: Option<Status>,

        /// Note words (joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Delete an issue you reported
    #[command(alias = "rm", display_order = 15)]
    Delete {
        /// Issue id or a unique prefix of it
        id: String,
    },

    /// Print the approximate position of this machine
    #[command(display_order = 30)]
    Locate,

    /// Print this session's id
    #[command(display_order = 31)]
    Whoami,

    /// Get or set configuration
    #[command(display_order = 32)]
    Config {
        /// Configuration key (e.g., default-center)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for civicpin or a subcommand
    #[command(display_order = 33)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_parses_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "civicpin", "report", "-t", "Pothole", "-d", "Deep", "-c", "roads", "--at",
            "-33.86,151.2",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Report { category, at, .. }) => {
                assert_eq!(category, Category::Roads);
                assert_eq!(at, Some(Coordinates::new(-33.86, 151.2)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn report_rejects_unknown_category() {
        assert!(Cli::try_parse_from([
            "civicpin", "report", "-t", "x", "-d", "y", "-c", "potholes"
        ])
        .is_err());
    }

    #[test]
    fn list_filters_parse() {
        let cli = Cli::try_parse_from(["civicpin", "ls", "--status", "in-progress", "--mine"])
            .unwrap();
        match cli.command {
            Some(Commands::List { status, mine, .. }) => {
                assert_eq!(status, Some(Status::InProgress));
                assert!(mine);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn every_command_has_a_group() {
        let cmd = Cli::command();
        for sc in cmd.get_subcommands() {
            assert!(
                CommandGroup::for_command(sc.get_name()).is_some(),
                "{} has no help group",
                sc.get_name()
            );
        }
    }
}
