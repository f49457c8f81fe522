use crate::model::timestamp::{deserialize_lenient, Timestamp};
use crate::model::{lenient_id, lenient_opt_string};
use serde::{Deserialize, Serialize};

/// A registered account on the customer site.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id", deserialize_with = "lenient_id")]
    id: String,
    #[serde(
        default,
        alias = "userName",
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    name: Option<String>,
    #[serde(
        default,
        alias = "userEmail",
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
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    role: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    created_at: Option<Timestamp>,
}

impl User {
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

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
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

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
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
    fn test_deserialize_user() {
        let user: User = serde_json::from_value(json!({
            "_id": "U-1",
            "userName": "Asha Rao",
            "email": "asha@example.com",
            "phone": 9000000001u64,
            "role": "customer",
            "createdAt": "2024-01-02"
        }))
        .unwrap();
        assert_eq!(user.id(), "U-1");
        assert_eq!(user.name(), Some("Asha Rao"));
        assert_eq!(user.phone(), Some("9000000001"));
        assert_eq!(user.role(), Some("customer"));
        assert!(user.created_at().is_some());
    }

    #[test]
    fn test_user_without_id_fails() {
        assert!(serde_json::from_value::<User>(json!({"name": "Nobody"})).is_err());
        assert!(serde_json::from_value::<User>(json!({"id": null})).is_err());
    }

    #[test]
    fn test_serialize_skips_missing_fields() {
        let value = serde_json::to_value(User::new("U-9").with_email("u9@example.com")).unwrap();
        assert_eq!(value, json!({"id": "U-9", "email": "u9@example.com"}));
    }
}
