//! Handler bodies shared by the leave and overtime endpoints.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::api::{DecisionBody, paginate, with_store};
use crate::auth::session::AuthUser;
use crate::model::RequestStatus;
use crate::store::Store;
use crate::workflow::Verdict;
use crate::workflow::requests::{self, ReviewableRequest};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RequestQuery {
    #[schema(example = "PENDING")]
    /// Filter by status
    pub status: Option<RequestStatus>,
    #[schema(example = "EMP1001")]
    /// Filter by employee ID
    pub employee_id: Option<String>,
    /// Pagination page number (start with 1)
    pub page: Option<u32>,
    /// Items per page
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum View {
    Pending,
    Current,
    History,
}

pub(crate) async fn submit<R>(
    auth: AuthUser,
    store: web::Data<Store>,
    request: R,
) -> actix_web::Result<HttpResponse>
where
    R: ReviewableRequest + Send + 'static,
{
    let actor = auth.actor();
    let submission = with_store(&store, move |s| requests::submit(s, &actor, request)).await?;

    let message = if submission.queued {
        format!("{} submitted", R::LABEL)
    } else {
        format!("{} approved", R::LABEL)
    };
    Ok(HttpResponse::Created().json(json!({
        "message": message,
        "id": submission.id,
        "status": submission.status
    })))
}

pub(crate) async fn list<R>(
    store: web::Data<Store>,
    query: RequestQuery,
) -> actix_web::Result<HttpResponse>
where
    R: ReviewableRequest + Send + 'static,
{
    let RequestQuery {
        status,
        employee_id,
        page,
        per_page,
    } = query;

    let found = with_store(&store, move |s| {
        requests::list::<R>(s, status, employee_id.as_deref())
    })
    .await?;
    Ok(HttpResponse::Ok().json(paginate(found, page, per_page)))
}

pub(crate) async fn view<R>(store: web::Data<Store>, view: View) -> actix_web::Result<HttpResponse>
where
    R: ReviewableRequest + Send + 'static,
{
    let found = with_store(&store, move |s| match view {
        View::Pending => requests::list_pending::<R>(s, None),
        View::Current => requests::list_current::<R>(s),
        View::History => requests::list_history::<R>(s),
    })
    .await?;
    Ok(HttpResponse::Ok().json(found))
}

pub(crate) async fn get<R>(store: web::Data<Store>, id: String) -> actix_web::Result<HttpResponse>
where
    R: ReviewableRequest + Send + 'static,
{
    let request = with_store(&store, move |s| requests::get::<R>(s, &id)).await?;
    Ok(HttpResponse::Ok().json(request))
}

pub(crate) async fn decide<R>(
    auth: AuthUser,
    store: web::Data<Store>,
    id: String,
    verdict: Verdict,
    body: Option<web::Json<DecisionBody>>,
) -> actix_web::Result<HttpResponse>
where
    R: ReviewableRequest + Send + 'static,
{
    let actor = auth.actor();
    let comments = DecisionBody::comments(body);

    let decided = with_store(&store, move |s| {
        requests::decide::<R>(s, &actor, &id, verdict, comments)
    })
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{} {}", R::LABEL, verdict),
        "request": decided.record,
        "notification": decided.notification
    })))
}
