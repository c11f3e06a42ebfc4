//! # Command Layer
//!
//! This module contains the **core business logic** of civicpin. Each command
//! lives in its own submodule and implements plain Rust functions that operate
//! on a [`DataStore`](crate::store::DataStore).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Validate input and apply the mutation contract (load, locate, patch, save)
//! - Return structured [`CmdResult`] values with affected issues and messages
//! - Stay UI-agnostic: no stdout, no prompts, no exit codes
//!
//! ## Testing Strategy
//!
//! Command tests use `InMemoryStore` so they exercise the full
//! serialize/deserialize path without touching the filesystem.
//!
//! ## Command Modules
//!
//! - [`create`]: File a new issue
//! - [`list`]: Filter and order issues for display
//! - [`view`]: Fetch one issue
//! - [`upvote`]: Add a vote
//! - [`update`]: Append to the update log, optionally moving the status
//! - [`delete`]: Remove an issue (reporter only)
//! - [`backfill`]: Fill in coordinates for issues that lack them
//! - [`config`]: Read and change settings
//! - [`helpers`]: Id resolution and the patch primitive

use crate::config::CivicConfig;
use crate::model::{Coordinates, Issue};
use std::path::PathBuf;

pub mod backfill;
pub mod config;
pub mod create;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod update;
pub mod upvote;
pub mod view;

/// Where civicpin keeps its files.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Issues created or changed by the command, in their post-command state.
    pub affected_issues: Vec<Issue>,
    /// Issues to display, already in display order.
    pub listed_issues: Vec<Issue>,
    pub messages: Vec<CmdMessage>,
    pub config: Option<CivicConfig>,
    pub location: Option<Coordinates>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_issues(mut self, issues: Vec<Issue>) -> Self {
        self.listed_issues = issues;
        self
    }

    pub fn with_config(mut self, config: CivicConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_location(mut self, location: Coordinates) -> Self {
        self.location = Some(location);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}
