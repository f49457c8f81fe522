//! The payment-history pipeline.
//!
//! Data flows one way: `RecordStore` -> `filter` -> `sort` -> `aggregate`. Every stage except the
//! store is a pure function over slices, and nothing is recomputed incrementally.

pub mod aggregate;
pub mod filter;
pub mod sort;
mod store;
mod view;

pub use aggregate::{count, summarize, total_amount, Summary};
pub use filter::{DateRange, FilterCriteria};
pub use sort::{sort, SortKey};
pub use store::{RecordStore, ReloadOutcome, ReloadTicket};
pub use view::View;

pub(crate) use store::fetch_payments;
