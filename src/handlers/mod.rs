//! HTTP handlers. Thin adapters: extract, call a service, wrap the
//! result in the `{"success": true, "data": ...}` envelope.

pub mod academic_groups;
pub mod applications;
pub mod auth;
pub mod group_moders;
pub mod group_users;
pub mod groups;
pub mod health;
pub mod subjects;
pub mod tasks;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    /// Resolves to (limit, offset), clamping the page size to the
    /// configured maximum. Pages are 1-based.
    pub fn limits(&self) -> (i64, i64) {
        let pagination = &config::config().pagination;
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(pagination.default_page_size)
            .clamp(1, pagination.max_page_size);
        (page_size, (page - 1) * page_size)
    }
}

pub(crate) fn success(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

pub(crate) fn success_page(data: Value, total: i64, query: &PageQuery) -> Value {
    let (page_size, offset) = query.limits();
    json!({
        "success": true,
        "data": data,
        "total": total,
        "page": offset / page_size + 1,
        "page_size": page_size
    })
}
