use crate::model::timestamp::{deserialize_lenient, Timestamp};
use crate::model::{lenient_amount, lenient_opt_string, Amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One payment transaction as served by the backend.
///
/// Only the identifier is required. Every other field is optional because backends omit them
/// freely; predicates that need a missing field simply do not match. Records are read-only once
/// fetched, so there are getters but no setters.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRecord")]
pub struct Record {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Amount>,
    /// The payment method, e.g. `UPI`, `Cash`, `Card`. This is the category used by the filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paid_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

/// The wire shape of a payment. Backends disagree on field names (and some send several of them
/// at once, e.g. both `paidAt` and `createdAt`), so every spelling gets its own slot and the first
/// present one wins.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "lenient_opt_string")]
    underscore_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    transaction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    user_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    email: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    user_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    service: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    service_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    amount: Option<Amount>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    method: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    payment_method: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    paid_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    date: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    status: Option<String>,
}

impl TryFrom<RawRecord> for Record {
    type Error = String;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.underscore_id)
            .or(raw.transaction_id)
            .ok_or_else(|| String::from("record has no 'id', '_id' or 'transactionId'"))?;
        Ok(Self {
            id,
            name: raw.name.or(raw.user_name).or(raw.customer_name),
            email: raw.email.or(raw.user_email),
            service: raw.service.or(raw.service_name),
            amount: raw.amount,
            method: raw.method.or(raw.payment_method),
            paid_at: raw.paid_at.or(raw.created_at).or(raw.date),
            status: raw.status,
        })
    }
}

impl Record {
    /// Creates a record with only an identifier. Use the `with_*` builders to fill in the rest.
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

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<Amount>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_paid_at(mut self, paid_at: impl Into<Timestamp>) -> Self {
        self.paid_at = Some(paid_at.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
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

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    /// The amount's value, or zero when the record has no amount.
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.map(|a| a.value()).unwrap_or(Decimal::ZERO)
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn paid_at(&self) -> Option<Timestamp> {
        self.paid_at
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_deserialize_full_record() {
        let record: Record = serde_json::from_value(json!({
            "_id": "T1",
            "userName": "Asha Rao",
            "userEmail": "asha@example.com",
            "service": "Deep Cleaning",
            "amount": 100,
            "paymentMethod": "UPI",
            "paidAt": "2024-01-01T00:00:00Z",
            "status": "success"
        }))
        .unwrap();

        assert_eq!(record.id(), "T1");
        assert_eq!(record.name(), Some("Asha Rao"));
        assert_eq!(record.email(), Some("asha@example.com"));
        assert_eq!(record.service(), Some("Deep Cleaning"));
        assert_eq!(record.amount_or_zero(), Decimal::from(100));
        assert_eq!(record.method(), Some("UPI"));
        assert_eq!(
            record.paid_at(),
            Some(Timestamp::Instant(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            ))
        );
        assert_eq!(record.status(), Some("success"));
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let record: Record = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(record.id(), "42");
        assert!(record.name().is_none());
        assert!(record.amount().is_none());
        assert_eq!(record.amount_or_zero(), Decimal::ZERO);
        assert!(record.paid_at().is_none());
    }

    #[test]
    fn test_bad_fields_become_absent() {
        let record: Record = serde_json::from_value(json!({
            "id": "T9",
            "amount": "n/a",
            "paidAt": "someday",
            "method": null
        }))
        .unwrap();
        assert!(record.amount().is_none());
        assert!(record.paid_at().is_none());
        assert!(record.method().is_none());
    }

    #[test]
    fn test_first_present_spelling_wins() {
        let record: Record = serde_json::from_value(json!({
            "_id": "abc",
            "paidAt": "2024-06-01",
            "createdAt": "2024-05-30",
            "method": "Cash",
            "paymentMethod": "UPI"
        }))
        .unwrap();
        assert_eq!(record.id(), "abc");
        assert_eq!(record.method(), Some("Cash"));
        assert_eq!(
            record.paid_at(),
            Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().into())
        );
    }

    #[test]
    fn test_missing_id_fails() {
        assert!(serde_json::from_value::<Record>(json!({"amount": 5})).is_err());
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let record = Record::new("T1").with_amount(Decimal::from(5));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"id": "T1", "amount": "5"}));
    }
}
