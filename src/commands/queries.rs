//! Contact query commands.
//!
//! Queries move through `new -> read -> resolved` and never backwards. Every change is sent to the
//! server and then the list is fetched again, so what is reported is what the server holds.

use crate::api::{self, Backend, Mode, Resource};
use crate::args::{MarkArgs, QueryListArgs};
use crate::commands::{Out, Rows};
use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{decode_batch, ContactQuery, QueryStatus};
use crate::{Config, Result};
use anyhow::Context;
use serde_json::json;
use tracing::{debug, info};

/// Lists contact queries, optionally only those with the status in `args`.
pub async fn queries_list(config: Config, mode: Mode, args: QueryListArgs) -> Result<Out<Rows>> {
    let mut backend = api::backend(&config, mode).pub_result(ErrorType::Config)?;
    list(backend.as_mut(), &args).await
}

/// Moves a contact query forward to the status in `args`.
pub async fn queries_mark(config: Config, mode: Mode, args: MarkArgs) -> Result<Out<ContactQuery>> {
    let mut backend = api::backend(&config, mode).pub_result(ErrorType::Config)?;
    mark(backend.as_mut(), args.id(), args.status()).await
}

pub(crate) async fn fetch_queries(backend: &mut (dyn Backend + Send)) -> Res<Vec<ContactQuery>> {
    let values = backend
        .list(Resource::ContactQueries)
        .await
        .context("Failed to load contact queries")?;
    Ok(decode_batch("contact query", values))
}

pub(super) async fn list(
    backend: &mut (dyn Backend + Send),
    args: &QueryListArgs,
) -> Result<Out<Rows>> {
    let all = fetch_queries(backend).await.pub_result(ErrorType::Fetch)?;
    let total = all.len();
    let shown: Vec<ContactQuery> = match args.status() {
        Some(status) => all.into_iter().filter(|q| q.status() == status).collect(),
        None => all,
    };
    let rows = Rows::build(&shown, args.format()).pub_result(ErrorType::Io)?;
    let message = format!(
        "Showing {} of {total} contact quer{}",
        shown.len(),
        if total == 1 { "y" } else { "ies" }
    );
    Ok(Out::new(message, rows))
}

pub(super) async fn mark(
    backend: &mut (dyn Backend + Send),
    id: &str,
    status: QueryStatus,
) -> Result<Out<ContactQuery>> {
    let current = find(backend, id).await?;
    let next = current
        .status()
        .advance_to(status)
        .pub_result(ErrorType::Validation)?;

    if next == current.status() {
        debug!("Contact query '{id}' is already '{next}'");
        return Ok(Out::new(
            format!("Contact query '{id}' is already '{next}'"),
            current,
        ));
    }

    backend
        .update(Resource::ContactQueries, id, &json!({ "status": next }))
        .await
        .with_context(|| format!("Failed to mark contact query '{id}' as '{next}'"))
        .pub_result(ErrorType::Mutation)?;
    info!("Marked contact query '{id}' as '{next}'");

    // One fetch after the update gives both the stored query and the open count.
    let queries = fetch_queries(backend).await.pub_result(ErrorType::Fetch)?;
    let open = queries.iter().filter(|q| q.status().is_open()).count();
    debug!("{open} of {} contact queries are open", queries.len());
    let updated = queries
        .into_iter()
        .find(|q| q.id() == id)
        .with_context(|| format!("Contact query '{id}' is missing after the update"))
        .pub_result(ErrorType::Fetch)?;

    let message = format!(
        "Contact query '{id}' is now '{}', {open} open quer{} left",
        updated.status(),
        if open == 1 { "y" } else { "ies" }
    );
    Ok(Out::new(message, updated))
}

async fn find(backend: &mut (dyn Backend + Send), id: &str) -> Result<ContactQuery> {
    fetch_queries(backend)
        .await
        .pub_result(ErrorType::Fetch)?
        .into_iter()
        .find(|q| q.id() == id)
        .with_context(|| format!("There is no contact query with id '{id}'"))
        .pub_result(ErrorType::Validation)
}
