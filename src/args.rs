//! These structs provide the CLI interface for the paylens CLI.

use crate::api::Resource;
use crate::commands::OutputFormat;
use crate::model::QueryStatus;
use crate::pipeline::{DateRange, FilterCriteria, SortKey};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// paylens: A command-line client for the admin panel of a home-services business.
///
/// It fetches payment history, contact queries, users and employees from the admin REST API and
/// lets you search, filter, sort and summarize payments, move contact queries through their
/// new -> read -> resolved workflow, and delete records.
///
/// Run `paylens init --api-url <URL>` first. Set PAYLENS_IN_TEST_MODE=1 to run against built-in
/// sample data instead of a server.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration files.
    ///
    /// - Decide what directory you want to store data in and pass this as --paylens-home. By
    ///   default it will be $HOME/paylens.
    ///
    /// - Pass the base URL of the admin API as --api-url.
    ///
    /// - Optionally pass the bearer token as --token. It is saved to .secrets/token with
    ///   owner-only permissions. You can also write that file yourself later.
    Init(InitArgs),
    /// Browse, summarize and delete payments.
    Payments(PaymentsArgs),
    /// List contact queries and change their status.
    Queries(QueriesArgs),
    /// List registered users.
    Users(DirectoryArgs),
    /// List service employees.
    Employees(DirectoryArgs),
    /// Show dashboard counts and total revenue.
    Stats,
    /// Delete any record by resource and id.
    Delete(DeleteArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where paylens configuration is held. Defaults to ~/paylens
    #[arg(long, env = "PAYLENS_HOME", default_value_t = default_paylens_home())]
    paylens_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, paylens_home: PathBuf) -> Self {
        Self {
            log_level,
            paylens_home: paylens_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn paylens_home(&self) -> &DisplayPath {
        &self.paylens_home
    }
}

/// (Not shown): Args for the `paylens init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the admin REST API, e.g. https://admin.example.com/api/
    #[arg(long)]
    api_url: String,

    /// The bearer token to send with every request.
    #[arg(long)]
    token: Option<String>,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// (Not shown): Args for the `paylens payments` command.
#[derive(Debug, Parser, Clone)]
pub struct PaymentsArgs {
    #[command(subcommand)]
    action: PaymentsSubcommand,
}

impl PaymentsArgs {
    pub fn new(action: PaymentsSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &PaymentsSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum PaymentsSubcommand {
    /// List payments matching the criteria in the requested order.
    List(ViewArgs),
    /// Show the count and total amount of the payments matching the criteria.
    Summary(ViewArgs),
    /// Delete a payment, then reload the list from the server.
    Delete(IdArgs),
}

/// Search, filter, sort and output options for payment views.
#[derive(Debug, Default, Parser, Clone)]
pub struct ViewArgs {
    /// Case-insensitive text matched against the transaction id, customer name and service.
    #[arg(long, default_value = "")]
    search: String,

    /// Only payments made with exactly this method, e.g. UPI, Card or Cash.
    #[arg(long, default_value = "")]
    method: String,

    /// Only payments made within this period, relative to now.
    #[arg(long, value_enum, default_value_t = DateRange::None)]
    range: DateRange,

    /// The order of the list.
    #[arg(long, value_enum, default_value_t = SortKey::Newest)]
    sort: SortKey,

    /// The output format of the list.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ViewArgs {
    pub fn new(search: impl Into<String>, method: impl Into<String>, range: DateRange) -> Self {
        Self {
            search: search.into(),
            method: method.into(),
            range,
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// The filter criteria described by these arguments.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(&self.search, &self.method, self.range)
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `paylens queries` command.
#[derive(Debug, Parser, Clone)]
pub struct QueriesArgs {
    #[command(subcommand)]
    action: QueriesSubcommand,
}

impl QueriesArgs {
    pub fn new(action: QueriesSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &QueriesSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum QueriesSubcommand {
    /// List contact queries, optionally only those with one status.
    List(QueryListArgs),
    /// Move a contact query forward to `read` or `resolved`.
    Mark(MarkArgs),
}

#[derive(Debug, Default, Parser, Clone)]
pub struct QueryListArgs {
    /// Only list queries with this status.
    #[arg(long, value_enum)]
    status: Option<QueryStatus>,

    /// The output format of the list.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl QueryListArgs {
    pub fn new(status: Option<QueryStatus>, format: OutputFormat) -> Self {
        Self { status, format }
    }

    pub fn status(&self) -> Option<QueryStatus> {
        self.status
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

#[derive(Debug, Parser, Clone)]
pub struct MarkArgs {
    /// The id of the contact query.
    id: String,

    /// The new status. Statuses only move forward: new -> read -> resolved.
    #[arg(value_enum)]
    status: QueryStatus,
}

impl MarkArgs {
    pub fn new(id: impl Into<String>, status: QueryStatus) -> Self {
        Self {
            id: id.into(),
            status,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }
}

/// (Not shown): Args for the `paylens users` and `paylens employees` commands.
#[derive(Debug, Parser, Clone)]
pub struct DirectoryArgs {
    #[command(subcommand)]
    action: DirectorySubcommand,
}

impl DirectoryArgs {
    pub fn new(action: DirectorySubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &DirectorySubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum DirectorySubcommand {
    /// List everyone, optionally only those matching a search.
    List(DirectoryListArgs),
}

#[derive(Debug, Default, Parser, Clone)]
pub struct DirectoryListArgs {
    /// Case-insensitive text matched against the id, name, email and phone (and skill, for
    /// employees).
    #[arg(long, default_value = "")]
    search: String,

    /// The output format of the list.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl DirectoryListArgs {
    pub fn new(search: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            search: search.into(),
            format,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

#[derive(Debug, Parser, Clone)]
pub struct IdArgs {
    /// The id of the record.
    id: String,
}

impl IdArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// (Not shown): Args for the `paylens delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The kind of record to delete.
    #[arg(value_enum)]
    resource: Resource,

    /// The id of the record.
    id: String,
}

impl DeleteArgs {
    pub fn new(resource: Resource, id: impl Into<String>) -> Self {
        Self {
            resource,
            id: id.into(),
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

fn default_paylens_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("paylens"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --paylens-home or PAYLENS_HOME instead of relying on the \
                default paylens home directory.",
            );
            PathBuf::from("paylens")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
