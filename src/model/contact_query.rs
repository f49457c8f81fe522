use crate::error::Res;
use crate::model::{lenient_id, lenient_opt_string};
use crate::model::timestamp::{deserialize_lenient, Timestamp};
use anyhow::bail;
use serde::{Deserialize, Serialize};

/// The life cycle of a contact query: `new -> read -> resolved`. Transitions only move forward.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    #[default]
    New,
    Read,
    Resolved,
}

serde_plain::derive_display_from_serialize!(QueryStatus);
serde_plain::derive_fromstr_from_deserialize!(QueryStatus);

impl QueryStatus {
    /// Returns `next` if moving from `self` to `next` is allowed. Staying put is allowed and is a
    /// no-op; moving backwards is an error.
    pub fn advance_to(self, next: QueryStatus) -> Res<QueryStatus> {
        if next < self {
            bail!("A contact query cannot move from '{self}' back to '{next}'");
        }
        Ok(next)
    }

    /// Whether the query still needs attention.
    pub fn is_open(self) -> bool {
        self != QueryStatus::Resolved
    }
}

/// A message sent through the public contact form.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactQuery {
    #[serde(alias = "_id", deserialize_with = "lenient_id")]
    id: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    email: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    subject: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    message: Option<String>,
    /// Unknown status strings are read as `new` so the query shows up as needing attention.
    #[serde(default, deserialize_with = "lenient_status")]
    status: QueryStatus,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    created_at: Option<Timestamp>,
}

impl ContactQuery {
    pub fn new(id: impl Into<String>, status: QueryStatus) -> Self {
        Self {
            id: id.into(),
            status,
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<QueryStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?
        .and_then(|s| s.trim().to_lowercase().parse().ok())
        .unwrap_or_default())
}
