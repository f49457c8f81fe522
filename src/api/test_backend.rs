//! Implements the `Backend` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a server. Set `PAYLENS_IN_TEST_MODE=1` to use it.

use crate::api::{Backend, Resource};
use crate::error::Res;
use anyhow::{bail, Context};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

/// An implementation of the `Backend` trait that holds each collection as a list of JSON values.
/// By default it is seeded with a small, realistic data set.
#[derive(Debug, Clone)]
pub struct TestBackend {
    data: HashMap<Resource, Vec<Value>>,
    offline: bool,
}

impl TestBackend {
    /// Create a new `TestBackend` holding `data`. Collections missing from the map are empty.
    pub fn new(data: HashMap<Resource, Vec<Value>>) -> Self {
        Self {
            data,
            offline: false,
        }
    }

    /// When offline, every call fails the way an unreachable server would.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Replace one collection.
    pub fn set(&mut self, resource: Resource, items: Vec<Value>) {
        self.data.insert(resource, items);
    }

    fn ensure_online(&self) -> Res<()> {
        if self.offline {
            bail!("error sending request: connection refused (test backend is offline)");
        }
        Ok(())
    }

    fn position(&self, resource: Resource, id: &str) -> Res<usize> {
        self.data
            .get(&resource)
            .and_then(|items| items.iter().position(|item| item_id(item).as_deref() == Some(id)))
            .with_context(|| format!("404 Not Found: no {resource} with id '{id}'"))
    }
}

/// Reads `id`, `_id` or `transactionId` from an item, accepting numbers as well as strings. This is
/// the same precedence the models decode with.
fn item_id(item: &Value) -> Option<String> {
    let id = item
        .get("id")
        .or_else(|| item.get("_id"))
        .or_else(|| item.get("transactionId"))?;
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait::async_trait]
impl Backend for TestBackend {
    async fn list(&mut self, resource: Resource) -> Res<Vec<Value>> {
        self.ensure_online()?;
        Ok(self.data.get(&resource).cloned().unwrap_or_default())
    }

    async fn update(&mut self, resource: Resource, id: &str, body: &Value) -> Res<()> {
        self.ensure_online()?;
        let Value::Object(changes) = body else {
            bail!("400 Bad Request: the update body must be a JSON object");
        };
        let ix = self.position(resource, id)?;
        if let Some(Value::Object(item)) = self.data.get_mut(&resource).and_then(|v| v.get_mut(ix))
        {
            merge(item, changes);
        }
        Ok(())
    }

    async fn delete(&mut self, resource: Resource, id: &str) -> Res<()> {
        self.ensure_online()?;
        let ix = self.position(resource, id)?;
        if let Some(items) = self.data.get_mut(&resource) {
            items.remove(ix);
        }
        Ok(())
    }
}

fn merge(item: &mut Map<String, Value>, changes: &Map<String, Value>) {
    for (k, v) in changes {
        item.insert(k.clone(), v.clone());
    }
}

impl Default for TestBackend {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::new(default_data())
    }
}

/// Provides the seed data from this module.
fn default_data() -> HashMap<Resource, Vec<Value>> {
    [
        (Resource::Payments, PAYMENT_DATA),
        (Resource::ContactQueries, CONTACT_QUERY_DATA),
        (Resource::Users, USER_DATA),
        (Resource::Employees, EMPLOYEE_DATA),
    ]
    .into_iter()
    .map(|(resource, json)| (resource, seed(json)))
    .collect()
}

/// Parses a seed constant. The constants are static, so a parse failure is a bug in this file; it
/// is logged and the collection starts empty.
fn seed(json: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            warn!("Test backend seed data is not a JSON array, starting empty: {other}");
            Vec::new()
        }
        Err(e) => {
            warn!("Unable to parse test backend seed data, starting empty: {e}");
            Vec::new()
        }
    }
}

/// Seed payment data. The shapes are deliberately mixed: `_id` vs `id`, `paymentMethod` vs
/// `method`, numeric and string amounts, and one entry without a date.
const PAYMENT_DATA: &str = r##"[
  {"_id": "TXN-1001", "userName": "Asha Rao", "userEmail": "asha@example.com", "service": "Deep Cleaning", "amount": 2499, "paymentMethod": "UPI", "paidAt": "2024-01-14T10:20:00Z", "status": "success"},
  {"_id": "TXN-1002", "userName": "Vikram Shah", "userEmail": "vikram@example.com", "service": "Plumbing", "amount": 650, "paymentMethod": "Cash", "paidAt": "2024-02-03T16:05:00Z", "status": "success"},
  {"_id": "TXN-1003", "userName": "Meera Iyer", "userEmail": "meera@example.com", "service": "AC Repair", "amount": "1,200.00", "paymentMethod": "Card", "paidAt": "2024-02-19T09:45:00Z", "status": "success"},
  {"id": "TXN-1004", "name": "Rohan Gupta", "email": "rohan@example.com", "service": "Pest Control", "amount": 899.5, "method": "UPI", "createdAt": "2024-03-08 11:00:00", "status": "pending"},
  {"_id": "TXN-1005", "userName": "Asha Rao", "userEmail": "asha@example.com", "service": "Sofa Cleaning", "amount": 1499, "paymentMethod": "UPI", "paidAt": "2024-03-21T18:30:00Z", "status": "success"},
  {"_id": "TXN-1006", "userName": "Kabir Singh", "userEmail": "kabir@example.com", "service": "Electrician", "amount": 350, "paymentMethod": "Cash", "status": "failed"}
]"##;

/// Seed contact query data.
const CONTACT_QUERY_DATA: &str = r##"[
  {"_id": "Q-1", "name": "Neha Kapoor", "email": "neha@example.com", "subject": "Reschedule", "message": "Can I move my booking to Friday?", "status": "new", "createdAt": "2024-03-01T08:00:00Z"},
  {"_id": "Q-2", "name": "Arjun Mehta", "email": "arjun@example.com", "subject": "Refund", "message": "I was charged twice.", "status": "read", "createdAt": "2024-03-02T12:30:00Z"},
  {"_id": "Q-3", "name": "Sara Khan", "email": "sara@example.com", "subject": "Thanks", "message": "Great service!", "status": "resolved", "createdAt": "2024-03-03T17:15:00Z"}
]"##;

/// Seed user data.
const USER_DATA: &str = r##"[
  {"_id": "U-1", "name": "Asha Rao", "email": "asha@example.com", "role": "customer"},
  {"_id": "U-2", "name": "Vikram Shah", "email": "vikram@example.com", "role": "customer"},
  {"_id": "U-3", "name": "Admin", "email": "admin@example.com", "role": "admin"}
]"##;

/// Seed employee data.
const EMPLOYEE_DATA: &str = r##"[
  {"_id": "E-1", "name": "Ramesh Kumar", "skill": "Plumbing", "phone": "+91 90000 00001"},
  {"_id": "E-2", "name": "Sunita Devi", "skill": "Cleaning", "phone": "+91 90000 00002"}
]"##;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_data_parses() {
        let backend = TestBackend::default();
        assert_eq!(backend.data[&Resource::Payments].len(), 6);
        assert_eq!(backend.data[&Resource::ContactQueries].len(), 3);
        assert_eq!(backend.data[&Resource::Users].len(), 3);
        assert_eq!(backend.data[&Resource::Employees].len(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let mut backend = TestBackend::default();
        backend
            .update(Resource::ContactQueries, "Q-1", &json!({"status": "read"}))
            .await
            .unwrap();
        let items = backend.list(Resource::ContactQueries).await.unwrap();
        assert_eq!(items[0]["status"], json!("read"));
        assert_eq!(items[0]["subject"], json!("Reschedule"));
    }

    #[tokio::test]
    async fn test_delete_removes_item() {
        let mut backend = TestBackend::default();
        backend.delete(Resource::Payments, "TXN-1004").await.unwrap();
        let items = backend.list(Resource::Payments).await.unwrap();
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| item_id(i).as_deref() != Some("TXN-1004")));
    }

    #[tokio::test]
    async fn test_items_keyed_by_transaction_id() {
        let mut backend = TestBackend::default();
        backend.set(
            Resource::Payments,
            vec![
                json!({"transactionId": "TX-9", "amount": 10}),
                json!({"transactionId": 77, "amount": 20}),
            ],
        );
        backend.delete(Resource::Payments, "TX-9").await.unwrap();
        backend
            .update(Resource::Payments, "77", &json!({"status": "refunded"}))
            .await
            .unwrap();
        let items = backend.list(Resource::Payments).await.unwrap();
        assert_eq!(items, vec![json!({"transactionId": 77, "amount": 20, "status": "refunded"})]);
    }

    #[test]
    fn test_bad_seed_starts_empty() {
        assert!(seed("not json").is_empty());
        assert!(seed(r#"{"id": "U-1"}"#).is_empty());
        assert_eq!(seed(r#"[{"id": "U-1"}]"#).len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let mut backend = TestBackend::default();
        let err = backend.delete(Resource::Users, "U-404").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let mut backend = TestBackend::default();
        backend.set_offline(true);
        assert!(backend.list(Resource::Payments).await.is_err());
        assert!(backend.delete(Resource::Payments, "TXN-1001").await.is_err());
    }
}
