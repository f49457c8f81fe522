//! Delete command handler.

use crate::api::{self, Backend, Mode, Resource};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::utils::plural;
use crate::{Config, Result};
use anyhow::Context;
use tracing::info;

/// Deletes one record of `resource` by id, then lists `resource` again and reports how many
/// records the server now holds.
pub async fn delete(config: Config, mode: Mode, resource: Resource, id: &str) -> Result<Out<usize>> {
    let mut backend = api::backend(&config, mode).pub_result(ErrorType::Config)?;
    delete_and_reload(backend.as_mut(), resource, id).await
}

pub(super) async fn delete_and_reload(
    backend: &mut (dyn Backend + Send),
    resource: Resource,
    id: &str,
) -> Result<Out<usize>> {
    backend
        .delete(resource, id)
        .await
        .with_context(|| format!("Failed to delete '{id}' from {resource}"))
        .pub_result(ErrorType::Mutation)?;
    info!("Deleted '{id}' from {resource}");

    let remaining = backend
        .list(resource)
        .await
        .with_context(|| format!("Deleted '{id}' but failed to reload {resource}"))
        .pub_result(ErrorType::Fetch)?
        .len();

    let message = format!(
        "Deleted '{id}' from {resource}, {remaining} record{} left",
        plural(remaining)
    );
    Ok(Out::new(message, remaining))
}
