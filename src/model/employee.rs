use crate::model::timestamp::{deserialize_lenient, Timestamp};
use crate::model::{lenient_id, lenient_opt_string};
use serde::{Deserialize, Serialize};

/// A service professional who can be assigned to bookings.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(alias = "_id", deserialize_with = "lenient_id")]
    id: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    email: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    phone: Option<String>,
    /// The trade this employee is booked for, e.g. "Plumbing". Some backends call it `service`.
    #[serde(
        default,
        alias = "service",
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    skill: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    created_at: Option<Timestamp>,
}

impl Employee {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
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

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn skill(&self) -> Option<&str> {
        self.skill.as_deref()
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_employee() {
        let e: Employee = serde_json::from_value(json!({
            "_id": 12,
            "name": "Ramesh Kumar",
            "service": "Plumbing",
            "phone": "+91 90000 00001"
        }))
        .unwrap();
        assert_eq!(e.id(), "12");
        assert_eq!(e.skill(), Some("Plumbing"));
        assert_eq!(e.phone(), Some("+91 90000 00001"));
        assert!(e.email().is_none());
    }

    #[test]
    fn test_employee_without_id_fails() {
        assert!(serde_json::from_value::<Employee>(json!({"name": "Sunita"})).is_err());
    }
}
