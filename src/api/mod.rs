pub mod attendance;
pub mod cheque;
pub mod employee;
pub mod leave_request;
pub mod overtime;
pub mod payroll;
pub mod report;
pub mod review;

use actix_web::{error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppResult;
use crate::store::Store;

/// Runs a store operation on the blocking pool; store calls do file I/O.
pub(crate) async fn with_store<T, F>(store: &web::Data<Store>, f: F) -> actix_web::Result<T>
where
    F: FnOnce(&Store) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = store.clone();
    let result = web::block(move || f(&store)).await.map_err(|e| {
        tracing::error!(error = %e, "Store task failed");
        ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(result?)
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u32>,
    #[schema(example = 20)]
    /// Items per page
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
}

pub(crate) fn paginate<T>(items: Vec<T>, page: Option<u32>, per_page: Option<u32>) -> Paginated<T> {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(20).clamp(1, 100);
    let total = items.len();
    let offset = ((page - 1) as usize).saturating_mul(per_page as usize);

    Paginated {
        data: items
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect(),
        page,
        per_page,
        total,
    }
}

/// Optional body of approve/reject calls.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DecisionBody {
    #[schema(example = "Welcome aboard")]
    pub comments: Option<String>,
}

impl DecisionBody {
    pub(crate) fn comments(body: Option<web::Json<DecisionBody>>) -> Option<String> {
        body.and_then(|b| b.into_inner().comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginates_and_clamps() {
        let items: Vec<u32> = (1..=45).collect();

        let first = paginate(items.clone(), None, None);
        assert_eq!(first.data.len(), 20);
        assert_eq!(first.total, 45);

        let last = paginate(items.clone(), Some(3), Some(20));
        assert_eq!(last.data, vec![41, 42, 43, 44, 45]);

        let clamped = paginate(items, Some(0), Some(1000));
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.per_page, 100);
        assert_eq!(clamped.data.len(), 45);
    }
}
