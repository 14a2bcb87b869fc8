use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use listshare_core::persistence::ExportFormat;
use listshare_core::share::SharePermission;
use listshare_core::views::ListFilter;
use listshare_core::views::ListSort;
use listshare_core::views::TodoFilter;
use listshare_core::views::TodoSort;
use listshare_core::Priority;

/// listshare - todo lists you can share, from the terminal.
#[derive(Parser, Debug)]
#[command(name = "listshare")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    LISTSHARE_CONFIG    Config file (default: <config dir>/listshare/config.toml)
    LISTSHARE_STORE     Store file (default: <data dir>/listshare/store.json)
    RUST_LOG            Log filter for stderr output (default: warn)

EXAMPLES:
    listshare login ada --password secret1
    listshare list add Groceries --description \"weekly shop\"
    listshare todo add 1700000000000 Milk --due 2025-06-10 --priority high
    listshare share link 1700000000000 --permission edit --copy
")]
pub struct Cli {
    /// Store file, overriding LISTSHARE_STORE and the config file.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Config file, overriding LISTSHARE_CONFIG.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with a username and password.
    Login {
        #[arg(default_value = "")]
        username: String,
        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// Create an account and sign in.
    Register {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        /// Password confirmation.
        #[arg(long, default_value = "")]
        confirm: String,
    },

    /// End the session and clear all local data.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Show or edit the profile. With no options, behaves like `whoami`.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },

    /// Show every list with its progress.
    Lists(ListsArgs),

    /// Manage a single list.
    List {
        #[command(subcommand)]
        command: ListCommand,
    },

    /// Manage tasks.
    Todo {
        #[command(subcommand)]
        command: TodoCommand,
    },

    /// Share a list by link or email.
    Share {
        #[command(subcommand)]
        command: ShareCommand,
    },

    /// Dashboard totals.
    Stats,

    /// Print the stored snapshot.
    Export {
        #[arg(long, value_parser = export_format, default_value = "json")]
        format: ExportFormat,
    },
}

#[derive(Args, Debug)]
pub struct ListsArgs {
    #[arg(long, default_value = "")]
    pub search: String,
    /// all, shared or private.
    #[arg(long, value_parser = list_filter, default_value = "all")]
    pub filter: ListFilter,
    /// recent, name or todos. Defaults to `[views] list_sort`.
    #[arg(long, value_parser = list_sort)]
    pub sort: Option<ListSort>,
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Share level; 1 means private.
        #[arg(long)]
        shared: Option<u32>,
    },
    Delete {
        id: u64,
    },
    /// Show a list and its tasks.
    Show {
        id: u64,
        #[arg(long, default_value = "")]
        search: String,
        /// all, completed, pending, high-priority or overdue.
        #[arg(long, value_parser = todo_filter, default_value = "all")]
        filter: TodoFilter,
        /// createdAt, title, dueDate, priority or completed.
        #[arg(long, value_parser = todo_sort)]
        sort: Option<TodoSort>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TodoCommand {
    Add {
        list_id: u64,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// YYYY-MM-DD.
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
        #[arg(long, value_parser = priority)]
        priority: Option<Priority>,
        #[arg(long)]
        assignee: Option<String>,
    },
    Toggle {
        id: u64,
    },
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// YYYY-MM-DD; an empty value clears the date.
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
        #[arg(long, value_parser = priority)]
        priority: Option<Priority>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long, value_parser = BoolishValueParser::new())]
        completed: Option<bool>,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShareCommand {
    /// Print a share link for a list.
    Link {
        list_id: u64,
        #[arg(long, value_parser = permission, default_value = "view")]
        permission: SharePermission,
        /// Also copy the link to the clipboard.
        #[arg(long)]
        copy: bool,
    },
    /// Describe an email invitation for a list.
    Email {
        list_id: u64,
        /// Comma separated addresses.
        #[arg(long)]
        to: String,
        #[arg(long)]
        message: Option<String>,
        #[arg(long, value_parser = permission, default_value = "view")]
        permission: SharePermission,
    },
}

fn list_filter(text: &str) -> Result<ListFilter, String> {
    ListFilter::from_label(text).ok_or_else(|| format!("unknown list filter: {text}"))
}

fn list_sort(text: &str) -> Result<ListSort, String> {
    ListSort::from_label(text).ok_or_else(|| format!("unknown list sort: {text}"))
}

fn todo_filter(text: &str) -> Result<TodoFilter, String> {
    TodoFilter::from_label(text).ok_or_else(|| format!("unknown todo filter: {text}"))
}

fn todo_sort(text: &str) -> Result<TodoSort, String> {
    TodoSort::from_label(text).ok_or_else(|| format!("unknown todo sort: {text}"))
}

fn priority(text: &str) -> Result<Priority, String> {
    Priority::from_label(text).ok_or_else(|| format!("unknown priority: {text}"))
}

fn permission(text: &str) -> Result<SharePermission, String> {
    SharePermission::from_label(text).ok_or_else(|| format!("unknown permission: {text}"))
}

fn export_format(text: &str) -> Result<ExportFormat, String> {
    ExportFormat::from_label(text).ok_or_else(|| format!("unknown format: {text}"))
}
