//! # CLI Layer
//!
//! This module is **one possible UI client** for civicpin.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Decides where log output goes
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with API, session and configuration
//! - `handle_*()`: Per-command handlers that call the API and format output

use super::print::{print_full_issue, print_issues, print_messages};
use super::setup::{
    command_name, print_grouped_help, print_help_for_command, Cli, Commands,
};
use clap::Parser;
use civicpin::api::{CivicApi, ConfigAction, DataPaths};
use civicpin::config::{CivicConfig, CONFIG_KEYS};
use civicpin::error::{CivicError, Result};
use civicpin::filter::IssueFilter;
use civicpin::geocode::NominatimGeocoder;
use civicpin::locate::IpApiLocator;
use civicpin::model::{Category, Coordinates, NewIssue, PhotoUpload, Status};
use civicpin::session::SessionIdentity;
use civicpin::store::FileStore;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CIVICPIN_LOG";

struct AppContext {
    api: CivicApi<FileStore, NominatimGeocoder, IpApiLocator>,
    session: SessionIdentity,
    config: CivicConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.help {
        match &cli.command {
            Some(command) => print_help_for_command(command_name(command)),
            None => print_grouped_help(),
        }
        return Ok(());
    }
    if let Some(Commands::Help { command }) = &cli.command {
        return handle_help(command.clone());
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Report {
            title,
            description,
            category,
            at,
            here,
            address,
            photo,
        }) => handle_report(
            &mut ctx,
            ReportArgs {
                title,
                description,
                category,
                at,
                here,
                address,
                photo,
            },
        ),
        Some(Commands::List {
            category,
            status,
            search,
            mine,
            no_backfill,
        }) => handle_list(&mut ctx, category, status, search, mine, !no_backfill),
        Some(Commands::Show { id }) => handle_show(&ctx, &id),
        Some(Commands::Upvote { id }) => handle_upvote(&mut ctx, &id),
        Some(Commands::Progress { id }) => handle_progress(&mut ctx, &id),
        Some(Commands::Resolve { id }) => handle_resolve(&mut ctx, &id),
        Some(Commands::Note { id, status, text }) => {
            handle_note(&mut ctx, &id, &text.join(" "), status)
        }
        Some(Commands::Delete { id }) => handle_delete(&mut ctx, &id),
        Some(Commands::Locate) => handle_locate(&ctx),
        Some(Commands::Whoami) => handle_whoami(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        // Dispatched before the context is built
        Some(Commands::Help { .. }) => Ok(()),
        None => handle_list(&mut ctx, None, None, None, false, true),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    let proj_dirs = ProjectDirs::from("org", "civicpin", "civicpin")
        .ok_or_else(|| CivicError::Api("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let root = data_dir(cli)?;
    debug!(root = %root.display(), "using data directory");

    let config = CivicConfig::load(&root).unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, using defaults");
        CivicConfig::default()
    });
    let session = SessionIdentity::load_or_create(&root)?;

    let store = FileStore::open(root.clone());
    let geocoder = NominatimGeocoder::from_config(&config)?;
    let locator = IpApiLocator::from_config(&config)?;
    let api = CivicApi::new(store, geocoder, locator, DataPaths::new(root));

    Ok(AppContext {
        api,
        session,
        config,
    })
}

struct ReportArgs {
    title: String,
    description: String,
    category: Category,
    at: Option<Coordinates>,
    here: bool,
    address: Option<String>,
    photo: Option<PathBuf>,
}

fn handle_report(ctx: &mut AppContext, args: ReportArgs) -> Result<()> {
    let location = match (args.at, args.here) {
        (Some(at), _) => at,
        (None, true) => {
            let located = ctx.api.locate(ctx.config.default_center);
            print_messages(&located.messages);
            located.location.unwrap_or(ctx.config.default_center)
        }
        (None, false) => ctx.config.default_center,
    };

    let mut draft = NewIssue::new(args.title, args.description, args.category)
        .with_location(location);
    if let Some(address) = args.address {
        draft = draft.with_address(address);
    }
    if let Some(path) = args.photo {
        draft = draft.with_photo(read_photo(&path)?);
    }

    let result = ctx.api.report_issue(draft, ctx.session.id())?;
    print_messages(&result.messages);
    if let Some(issue) = result.affected_issues.first() {
        println!("{}", issue.id);
    }
    Ok(())
}

fn read_photo(path: &Path) -> Result<PhotoUpload> {
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(PhotoUpload::new(file_name, bytes))
}

fn handle_list(
    ctx: &mut AppContext,
    category: Option<Category>,
    status: Option<Status>,
    search: Option<String>,
    mine: bool,
    backfill: bool,
) -> Result<()> {
    let mut criteria = IssueFilter::default();
    if let Some(category) = category {
        criteria = criteria.with_category(category);
    }
    if let Some(status) = status {
        criteria = criteria.with_status(status);
    }
    if let Some(text) = search {
        criteria = criteria.with_text(text);
    }
    if mine {
        criteria = criteria.owned_by(ctx.session.id());
    }

    let result = ctx.api.list_issues(&criteria, backfill)?;
    print_issues(&result.listed_issues);
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.view_issue(id)?;
    for issue in &result.listed_issues {
        let photo = issue
            .image_path
            .as_deref()
            .map(|handle| ctx.api.photo_path(handle).display().to_string());
        print_full_issue(issue, photo);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_upvote(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.upvote_issue(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_progress(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.mark_in_progress(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_resolve(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.resolve_issue(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_note(ctx: &mut AppContext, id: &str, text: &str, status: Option<Status>) -> Result<()> {
    if text.trim().is_empty() {
        return Err(CivicError::Validation("Note text cannot be empty".into()));
    }
    let result = ctx.api.add_update(id, text.trim(), status)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.delete_issue(id, ctx.session.id())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_locate(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.locate(ctx.config.default_center);
    if let Some(coords) = result.location {
        println!("{},{}", coords.lat, coords.lng);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_whoami(ctx: &AppContext) -> Result<()> {
    println!("{}", ctx.session.id());
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key.clone(), value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if key.is_none() {
        if let Some(config) = &result.config {
            for k in CONFIG_KEYS {
                println!("{} = {}", k, config.get(k).unwrap_or_default());
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_help(command: Option<String>) -> Result<()> {
    match command {
        Some(cmd) => print_help_for_command(&cmd),
        None => print_grouped_help(),
    }
    Ok(())
}
