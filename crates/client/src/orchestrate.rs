//! Multi-request flows built on the collaborator traits.
//!
//! Independent fetches run concurrently; results are only combined once
//! every fetch has resolved, so a failure never yields a partial view.

use futures::future::try_join;
use monconsole_core::columns::{list_for, ListOptions};
use monconsole_core::diff::{diff, FieldDiff};
use monconsole_core::history::{compare_versions, VersionComparison};
use monconsole_core::listing::TabularList;
use monconsole_core::record::Record;
use monconsole_core::schema::EntityType;

use crate::api::ApiError;
use crate::source::RecordSource;

/// Records and dropdown options of one list view, fetched concurrently.
pub async fn load_list<S>(
    source: &S,
    entity: EntityType,
) -> Result<(Vec<Record>, ListOptions), ApiError>
where
    S: RecordSource + ?Sized,
{
    try_join(source.fetch_many(entity), source.fetch_options(entity)).await
}

/// A loaded list view for `entity`.
pub async fn build_list<S>(
    source: &S,
    entity: EntityType,
    selectable: bool,
    page_size: usize,
) -> Result<TabularList<Record>, ApiError>
where
    S: RecordSource + ?Sized,
{
    let (records, options) = load_list(source, entity).await?;
    let mut list = list_for(entity, &options, selectable, page_size);
    list.load(records);
    Ok(list)
}

/// Diff two records of the same entity type.
///
/// Both records are requested at once; the differ runs after both arrive.
pub async fn compare_records<S>(
    source: &S,
    entity: EntityType,
    before: &str,
    after: &str,
) -> Result<Vec<FieldDiff>, ApiError>
where
    S: RecordSource + ?Sized,
{
    let (before, after) =
        try_join(source.fetch_one(entity, before), source.fetch_one(entity, after)).await?;
    Ok(diff(entity.schema(), &before, &after))
}

/// Diff two revisions of one record, fetching the history once.
pub async fn compare_history_versions<S>(
    source: &S,
    entity: EntityType,
    name: &str,
    v1: &str,
    v2: &str,
) -> Result<VersionComparison, ApiError>
where
    S: RecordSource + ?Sized,
{
    let history = source.fetch_version_history(entity, name).await?;
    tracing::debug!(entity = %entity, name, revisions = history.len(), "Comparing revisions");
    Ok(compare_versions(entity, name, &history, v1, v2)?)
}
