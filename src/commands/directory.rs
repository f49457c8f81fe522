//! Listing of the people known to the admin panel: customer accounts and service employees.

use crate::api::{self, Backend, Mode, Resource};
use crate::args::DirectoryListArgs;
use crate::commands::{Out, Rows, Tabular};
use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{decode_batch, Employee, User};
use crate::{Config, Result};
use anyhow::Context;
use tracing::debug;

/// Lists users, optionally only those matching the search in `args`.
pub async fn users_list(config: Config, mode: Mode, args: DirectoryListArgs) -> Result<Out<Rows>> {
    let mut backend = api::backend(&config, mode).pub_result(ErrorType::Config)?;
    list_users(backend.as_mut(), &args).await
}

/// Lists employees, optionally only those matching the search in `args`.
pub async fn employees_list(
    config: Config,
    mode: Mode,
    args: DirectoryListArgs,
) -> Result<Out<Rows>> {
    let mut backend = api::backend(&config, mode).pub_result(ErrorType::Config)?;
    list_employees(backend.as_mut(), &args).await
}

pub(crate) async fn fetch_users(backend: &mut (dyn Backend + Send)) -> Res<Vec<User>> {
    let values = backend
        .list(Resource::Users)
        .await
        .context("Failed to load users")?;
    Ok(decode_batch("user", values))
}

pub(crate) async fn fetch_employees(backend: &mut (dyn Backend + Send)) -> Res<Vec<Employee>> {
    let values = backend
        .list(Resource::Employees)
        .await
        .context("Failed to load employees")?;
    Ok(decode_batch("employee", values))
}

pub(super) async fn list_users(
    backend: &mut (dyn Backend + Send),
    args: &DirectoryListArgs,
) -> Result<Out<Rows>> {
    let all = fetch_users(backend).await.pub_result(ErrorType::Fetch)?;
    let total = all.len();
    let shown: Vec<User> = all
        .into_iter()
        .filter(|u| matches_search(args.search(), &[Some(u.id()), u.name(), u.email(), u.phone()]))
        .collect();
    finish(&shown, total, "user", "users", args)
}

pub(super) async fn list_employees(
    backend: &mut (dyn Backend + Send),
    args: &DirectoryListArgs,
) -> Result<Out<Rows>> {
    let all = fetch_employees(backend).await.pub_result(ErrorType::Fetch)?;
    let total = all.len();
    let shown: Vec<Employee> = all
        .into_iter()
        .filter(|e| {
            matches_search(
                args.search(),
                &[Some(e.id()), e.name(), e.email(), e.phone(), e.skill()],
            )
        })
        .collect();
    finish(&shown, total, "employee", "employees", args)
}

fn finish<T: Tabular>(
    shown: &[T],
    total: usize,
    one: &str,
    many: &str,
    args: &DirectoryListArgs,
) -> Result<Out<Rows>> {
    debug!("{} of {total} {many} match '{}'", shown.len(), args.search());
    let rows = Rows::build(shown, args.format()).pub_result(ErrorType::Io)?;
    let noun = if total == 1 { one } else { many };
    Ok(Out::new(
        format!("Showing {} of {total} {noun}", shown.len()),
        rows,
    ))
}

/// Case-insensitive substring match of `search` against any present field. A blank search
/// matches everything.
fn matches_search(search: &str, fields: &[Option<&str>]) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty()
        || fields
            .iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
}
