//! Payment history commands: list, summary and delete.

use crate::api::{self, Backend, Mode};
use crate::args::ViewArgs;
use crate::commands::{Out, Rows};
use crate::error::{Error, ErrorType, IntoResult};
use crate::pipeline::{Summary, View};
use crate::utils::plural;
use crate::{Config, Result};
use anyhow::anyhow;
use chrono::{DateTime, Local, TimeZone};

/// Fetches all payments and shows those matching the criteria in `args`, in the requested order
/// and format.
pub async fn payments_list(config: Config, mode: Mode, args: ViewArgs) -> Result<Out<Rows>> {
    let mut backend = api::backend(&config, mode).pub_result(ErrorType::Config)?;
    list(backend.as_mut(), &args, Local::now()).await
}

/// Fetches all payments and reports the count and total amount of those matching the criteria.
pub async fn payments_summary(config: Config, mode: Mode, args: ViewArgs) -> Result<Out<Summary>> {
    let mut backend = api::backend(&config, mode).pub_result(ErrorType::Config)?;
    summary(backend.as_mut(), &args, Local::now()).await
}

/// Deletes a payment and reloads the list from the server.
pub async fn payments_delete(config: Config, mode: Mode, id: &str) -> Result<Out<usize>> {
    let mut backend = api::backend(&config, mode).pub_result(ErrorType::Config)?;
    delete(backend.as_mut(), id).await
}

async fn loaded_view(
    backend: &mut (dyn Backend + Send),
    args: &ViewArgs,
) -> Result<View> {
    let mut view = View::new(args.criteria(), args.sort());
    view.reload(backend).await.pub_result(ErrorType::Fetch)?;
    Ok(view)
}

pub(super) async fn list<Tz: TimeZone>(
    backend: &mut (dyn Backend + Send),
    args: &ViewArgs,
    now: DateTime<Tz>,
) -> Result<Out<Rows>> {
    let view = loaded_view(backend, args).await?;
    let visible = view.visible_at(now);
    let rows = Rows::build(&visible, args.format()).pub_result(ErrorType::Io)?;
    let total = view.store().records().len();
    let message = format!(
        "Showing {} of {total} payment{}",
        visible.len(),
        plural(total)
    );
    Ok(Out::new(message, rows))
}

pub(super) async fn summary<Tz: TimeZone>(
    backend: &mut (dyn Backend + Send),
    args: &ViewArgs,
    now: DateTime<Tz>,
) -> Result<Out<Summary>> {
    let view = loaded_view(backend, args).await?;
    let summary = view.summary_at(now);
    let message = format!(
        "{} payment{} totalling {}",
        summary.count,
        plural(summary.count),
        summary.total
    );
    Ok(Out::new(message, summary))
}

pub(super) async fn delete(backend: &mut (dyn Backend + Send), id: &str) -> Result<Out<usize>> {
    let mut view = View::default();
    view.reload(backend).await.pub_result(ErrorType::Fetch)?;
    if !view.store().records().iter().any(|r| r.id() == id) {
        return Err(Error::new(
            ErrorType::Validation,
            anyhow!("There is no payment with id '{id}'"),
        ));
    }
    let remaining = view
        .delete(backend, id)
        .await
        .pub_result(ErrorType::Mutation)?;
    let message = format!(
        "Deleted payment '{id}', {remaining} payment{} remain{}",
        plural(remaining),
        if remaining == 1 { "s" } else { "" }
    );
    Ok(Out::new(message, remaining))
}
