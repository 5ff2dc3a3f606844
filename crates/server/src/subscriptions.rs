use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use common::types::TotalCost;
use serde::Deserialize;
use service::subscription::domain::{Subscription, SubscriptionInput};
use tracing::{info, warn};
use utoipa::IntoParams;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Subscription identifier (hyphenated UUID).
    pub id: Option<String>,
}

impl IdQuery {
    fn require(self) -> Result<String, JsonApiError> {
        match self.id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => {
                warn!("request without id parameter");
                Err(JsonApiError::bad_request("missing id parameter"))
            }
        }
    }
}

/// Body extraction failures (bad JSON, wrong field types, missing
/// content-type) become a JSON 400 like any other validation error.
fn read_body(payload: Result<Json<SubscriptionInput>, JsonRejection>) -> Result<SubscriptionInput, JsonApiError> {
    payload.map(|Json(input)| input).map_err(|rejection| {
        warn!(status = %rejection.status(), error = %rejection.body_text(), "request body rejected");
        JsonApiError::bad_request("invalid request body")
    })
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct ListQuery {
    /// Only subscriptions of this user; empty means any.
    pub user_id: String,
    /// Only subscriptions with exactly this name; empty means any.
    pub service_name: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct TotalCostQuery {
    /// First month of the period, `MM-YYYY`.
    pub start: String,
    /// Last month of the period, `MM-YYYY`.
    pub end: String,
    pub user_id: String,
    pub service_name: String,
}

#[utoipa::path(
    post,
    path = "/subs/create",
    tag = "subscriptions",
    request_body = crate::openapi::SubscriptionInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Validation failed", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<SubscriptionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Subscription>), JsonApiError> {
    let input = read_body(payload)?;
    info!(user_id = %input.user_id, service_name = %input.service_name, "create subscription requested");
    let sub = state.subs.create(input).await?;
    Ok((StatusCode::CREATED, Json(sub)))
}

#[utoipa::path(
    get,
    path = "/subs/getById",
    tag = "subscriptions",
    params(IdQuery),
    responses(
        (status = 200, description = "OK", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Missing or malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_by_id(
    State(state): State<ServerState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<Subscription>, JsonApiError> {
    let id = q.require()?;
    Ok(Json(state.subs.get_by_id(&id).await?))
}

#[utoipa::path(
    get,
    path = "/subs/listAll",
    tag = "subscriptions",
    params(ListQuery),
    responses(
        (status = 200, description = "OK", body = [crate::openapi::SubscriptionDoc]),
        (status = 400, description = "Malformed user_id", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_all(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Subscription>>, JsonApiError> {
    Ok(Json(state.subs.list_all(&q.user_id, &q.service_name).await?))
}

#[utoipa::path(
    put,
    path = "/subs/update",
    tag = "subscriptions",
    params(IdQuery),
    request_body = crate::openapi::SubscriptionInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Validation failed", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Query(q): Query<IdQuery>,
    payload: Result<Json<SubscriptionInput>, JsonRejection>,
) -> Result<Json<Subscription>, JsonApiError> {
    let id = q.require()?;
    let input = read_body(payload)?;
    Ok(Json(state.subs.update(&id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/subs/delete",
    tag = "subscriptions",
    params(IdQuery),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Missing or malformed id", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Query(q): Query<IdQuery>,
) -> Result<StatusCode, JsonApiError> {
    let id = q.require()?;
    state.subs.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/subs/totalCost",
    tag = "subscriptions",
    params(TotalCostQuery),
    responses(
        (status = 200, description = "OK", body = crate::openapi::TotalCostDoc),
        (status = 400, description = "Malformed period or filter", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn total_cost(
    State(state): State<ServerState>,
    Query(q): Query<TotalCostQuery>,
) -> Result<Json<TotalCost>, JsonApiError> {
    let total_cost = state
        .subs
        .total_cost(&q.start, &q.end, &q.user_id, &q.service_name)
        .await?;
    Ok(Json(TotalCost { total_cost }))
}
