//! Rendering of record lists as a markdown table, JSON or CSV.

use crate::commands::OutputFormat;
use crate::error::Res;
use crate::model::{ContactQuery, Employee, Record, Timestamp, User};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// Rows in the requested output format.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rows {
    /// JSON array of objects, one per record.
    Json(serde_json::Value),
    /// Markdown table as a single formatted string.
    Table(String),
    /// CSV data as a properly escaped string.
    Csv(String),
}

impl Debug for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => write!(f, "Rows::Json({:?})", v),
            Rows::Table(s) => write!(f, "Rows::Table({} chars)", s.len()),
            Rows::Csv(s) => write!(f, "Rows::Csv({} chars)", s.len()),
        }
    }
}

impl Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => {
                if let Ok(s) = serde_json::to_string_pretty(v) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "{:?}", v)
                }
            }
            Rows::Table(s) => write!(f, "{}", s),
            Rows::Csv(s) => write!(f, "{}", s),
        }
    }
}

/// Something that can be shown as one row of a table.
pub trait Tabular: Serialize {
    /// Column headers, in the same order as `cells`.
    const COLUMNS: &'static [&'static str];

    /// The cell text of this row. Missing values are empty strings.
    fn cells(&self) -> Vec<String>;
}

fn opt(s: Option<&str>) -> String {
    s.unwrap_or_default().to_string()
}

fn date(d: Option<Timestamp>) -> String {
    d.map(|d| d.wall_clock().format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

impl Tabular for Record {
    const COLUMNS: &'static [&'static str] = &[
        "Transaction ID",
        "Name",
        "Email",
        "Service",
        "Amount",
        "Method",
        "Date",
        "Status",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            opt(self.name()),
            opt(self.email()),
            opt(self.service()),
            self.amount().map(|a| a.to_string()).unwrap_or_default(),
            opt(self.method()),
            date(self.paid_at()),
            opt(self.status()),
        ]
    }
}

impl Tabular for ContactQuery {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Name", "Email", "Subject", "Status", "Received"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            opt(self.name()),
            opt(self.email()),
            opt(self.subject()),
            self.status().to_string(),
            date(self.created_at()),
        ]
    }
}

impl Tabular for User {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Email", "Phone", "Role", "Joined"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            opt(self.name()),
            opt(self.email()),
            opt(self.phone()),
            opt(self.role()),
            date(self.created_at()),
        ]
    }
}

impl Tabular for Employee {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Skill", "Phone", "Email"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            opt(self.name()),
            opt(self.skill()),
            opt(self.phone()),
            opt(self.email()),
        ]
    }
}

impl Rows {
    /// Renders `items` in `format`.
    pub(crate) fn build<T: Tabular>(items: &[T], format: OutputFormat) -> Res<Self> {
        Ok(match format {
            OutputFormat::Json => {
                Rows::Json(serde_json::to_value(items).context("Unable to serialize rows")?)
            }
            OutputFormat::Table => Rows::Table(markdown(T::COLUMNS, items)),
            OutputFormat::Csv => Rows::Csv(csv(T::COLUMNS, items)?),
        })
    }
}

fn markdown<T: Tabular>(columns: &[&str], items: &[T]) -> String {
    let mut out = String::new();
    out.push_str(&markdown_line(columns.iter().map(|c| c.to_string())));
    out.push_str(&markdown_line(columns.iter().map(|_| "---".to_string())));
    for item in items {
        out.push_str(&markdown_line(item.cells().into_iter()));
    }
    out
}

fn markdown_line(cells: impl Iterator<Item = String>) -> String {
    let cells: Vec<String> = cells.map(|c| c.replace('|', "\\|")).collect();
    format!("| {} |\n", cells.join(" | "))
}

fn csv<T: Tabular>(columns: &[&str], items: &[T]) -> Res<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns)
        .context("Unable to write CSV header")?;
    for item in items {
        writer
            .write_record(item.cells())
            .context("Unable to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}
