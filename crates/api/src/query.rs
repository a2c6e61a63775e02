//! Shared query and body parameter types for list handlers.

use std::collections::{BTreeMap, HashMap};

use monconsole_core::error::CoreError;
use monconsole_core::listing::{clamp_page_size, SortSpec, TabularList};
use serde::Deserialize;

use crate::error::AppError;

/// Query keys that are not column filters.
const RESERVED: [&str; 4] = ["page", "page_size", "sort", "order"];

/// Filter, sort and page parameters of a list view.
///
/// From a query string every non-reserved key is a column filter:
/// `?name=ams&group=EGI&sort=name&order=desc&page=1&page_size=20`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewParams {
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    pub sort: Option<SortSpec>,
    /// 0-based page index.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ViewParams {
    pub fn from_query(query: HashMap<String, String>) -> Result<Self, AppError> {
        let parse = |key: &str| -> Result<Option<usize>, AppError> {
            query
                .get(key)
                .map(|v| {
                    v.parse::<usize>().map_err(|_| {
                        AppError::BadRequest(format!("'{key}' must be a non-negative integer"))
                    })
                })
                .transpose()
        };

        let descending = match query.get("order").map(String::as_str) {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "'order' must be 'asc' or 'desc', got '{other}'"
                )))
            }
        };

        Ok(Self {
            page: parse("page")?,
            page_size: parse("page_size")?,
            sort: query.get("sort").map(|column| SortSpec {
                column: column.clone(),
                descending,
            }),
            filters: query
                .iter()
                .filter(|(k, _)| !RESERVED.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    pub fn page_size(&self, default: usize) -> usize {
        clamp_page_size(self.page_size, default)
    }

    /// Apply filters, then sort, then the page (clamped to the last page).
    pub fn apply<R>(&self, list: &mut TabularList<R>) -> Result<(), CoreError> {
        for (column, value) in &self.filters {
            list.set_filter_text(column, value)?;
        }
        list.set_sort(self.sort.clone())?;
        if let Some(page) = self.page {
            list.set_page(page);
        }
        Ok(())
    }
}
