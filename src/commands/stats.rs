//! The dashboard overview.

use crate::api::{self, Backend, Mode};
use crate::commands::directory::{fetch_employees, fetch_users};
use crate::commands::queries::fetch_queries;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::Amount;
use crate::pipeline::{self, fetch_payments};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};

/// Record counts and revenue across the admin panel.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub users: usize,
    pub employees: usize,
    pub contact_queries: usize,
    /// Contact queries that are not resolved yet.
    pub open_queries: usize,
    pub payments: usize,
    /// The sum of all payment amounts.
    pub revenue: Amount,
}

/// Fetches every collection and reports the dashboard counts.
pub async fn stats(config: Config, mode: Mode) -> Result<Out<Stats>> {
    let mut backend = api::backend(&config, mode).pub_result(ErrorType::Config)?;
    collect(backend.as_mut()).await
}

pub(super) async fn collect(backend: &mut (dyn Backend + Send)) -> Result<Out<Stats>> {
    let users = fetch_users(backend).await.pub_result(ErrorType::Fetch)?;
    let employees = fetch_employees(backend).await.pub_result(ErrorType::Fetch)?;
    let queries = fetch_queries(backend).await.pub_result(ErrorType::Fetch)?;
    let payments = fetch_payments(backend).await.pub_result(ErrorType::Fetch)?;

    let stats = Stats {
        users: users.len(),
        employees: employees.len(),
        contact_queries: queries.len(),
        open_queries: queries.iter().filter(|q| q.status().is_open()).count(),
        payments: pipeline::count(&payments),
        revenue: Amount::new(pipeline::total_amount(&payments)),
    };

    let message = format!(
        "Users: {}\nEmployees: {}\nContact queries: {} ({} open)\nPayments: {}\nRevenue: {}",
        stats.users,
        stats.employees,
        stats.contact_queries,
        stats.open_queries,
        stats.payments,
        stats.revenue
    );
    Ok(Out::new(message, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Resource, TestBackend};
    use rust_decimal::Decimal;
    use serde_json::json;

    #[tokio::test]
    async fn test_stats_from_seed_data() {
        let mut backend = TestBackend::default();
        let out = collect(&mut backend).await.unwrap();
        let stats = out.structure().unwrap();
        assert_eq!(stats.users, 3);
        assert_eq!(stats.employees, 2);
        assert_eq!(stats.contact_queries, 3);
        assert_eq!(stats.open_queries, 2);
        assert_eq!(stats.payments, 6);
        assert_eq!(stats.revenue.value(), Decimal::new(70975, 1));
        assert!(out.message().contains("Contact queries: 3 (2 open)"));
    }

    #[tokio::test]
    async fn test_stats_skips_malformed_payments() {
        let mut backend = TestBackend::default();
        backend.set(
            Resource::Payments,
            vec![json!({"id": "A", "amount": "abc"}), json!(42)],
        );
        let stats = collect(&mut backend).await.unwrap();
        let stats = stats.structure().unwrap();
        assert_eq!(stats.payments, 1);
        assert!(stats.revenue.is_zero());
    }

    #[tokio::test]
    async fn test_stats_counts_only_decodable_people() {
        let mut backend = TestBackend::default();
        backend.set(
            Resource::Users,
            vec![json!({"_id": "U-1"}), json!(42), json!({"name": "No id"})],
        );
        backend.set(
            Resource::Employees,
            vec![json!("junk"), json!({"id": 7, "skill": "Painting"})],
        );
        let out = collect(&mut backend).await.unwrap();
        let stats = out.structure().unwrap();
        assert_eq!(stats.users, 1);
        assert_eq!(stats.employees, 1);
        assert!(out.message().starts_with("Users: 1\nEmployees: 1\n"));
    }

    #[tokio::test]
    async fn test_stats_offline() {
        let mut backend = TestBackend::default();
        backend.set_offline(true);
        let err = collect(&mut backend).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Fetch);
    }
}
