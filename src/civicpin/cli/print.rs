use chrono::{DateTime, Utc};
use civicpin::api::{CmdMessage, MessageLevel};
use civicpin::commands::helpers::short_id;
use civicpin::model::{Category, Issue, Status};
use colored::{ColoredString, Colorize};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 12;
const VOTE_MARKER: &str = "▲";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        println!("No issues found.");
        return;
    }

    for issue in issues {
        let id_str = format!("{} ", short_id(&issue.id));
        let votes_str = format!("{} {:>3}  ", VOTE_MARKER, issue.votes);
        let status_str = format!("{:<width$}", issue.status.label(), width = STATUS_WIDTH);
        let time_ago = format_time_ago(issue.created_at);

        let title_content = format!("{} [{}]", issue.title, issue.category.label());

        let fixed_width = id_str.width() + votes_str.width() + STATUS_WIDTH + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title_display = truncate_to_width(&title_content, available);
        let padding = available.saturating_sub(title_display.width());

        let title_colored = if issue.is_resolved() {
            title_display.dimmed()
        } else {
            title_display.normal()
        };

        println!(
            "{}{}{}{}{}{}",
            id_str.yellow(),
            votes_str,
            title_colored,
            " ".repeat(padding),
            status_colored(issue.status, &status_str),
            time_ago.dimmed()
        );
    }
}

pub(super) fn print_full_issue(issue: &Issue, photo: Option<String>) {
    println!("{} {}", short_id(&issue.id).yellow(), issue.title.bold());
    println!("--------------------------------");
    println!("{}", issue.description);
    println!();
    println!("Category:  {}", category_colored(issue.category));
    println!(
        "Status:    {}",
        status_colored(issue.status, issue.status.label())
    );
    println!("Votes:     {}", issue.votes);
    match issue.coordinates() {
        Some(coords) => println!("Location:  {}", coords),
        None => println!("Location:  {}", "unknown".dimmed()),
    }
    if !issue.address.is_empty() {
        println!("Address:   {}", issue.address);
    }
    if let Some(photo) = photo {
        println!("Photo:     {}", photo);
    }
    println!("Reported:  {}", format_time_ago(issue.created_at).trim());
    println!("Id:        {}", issue.id.to_string().dimmed());

    println!();
    println!("Updates:");
    for entry in &issue.updates {
        println!(
            "  {}  {}  {}",
            entry
                .timestamp
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .dimmed(),
            status_colored(
                entry.status,
                &format!("{:<width$}", entry.status.label(), width = STATUS_WIDTH)
            ),
            entry.text
        );
    }
}

fn status_colored(status: Status, text: &str) -> ColoredString {
    match status {
        Status::Open => text.red(),
        Status::InProgress => text.yellow(),
        Status::Resolved => text.green(),
    }
}

fn category_colored(category: Category) -> ColoredString {
    let hex = category.color().trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => category.label().truecolor(r, g, b),
        _ => category.label().normal(),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
