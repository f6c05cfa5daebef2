use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Local, Utc};
use planner_shared::{DashboardStats, Event, Guest, MessageResponse, Record, Task, Vendor};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::dashboard::compute_stats;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiPath};
use crate::store::SharedStore;

/// Request body for creates and partial updates: any top-level fields.
type Body = ApiJson<Map<String, Value>>;

#[derive(Debug, Deserialize)]
pub struct VendorFilter {
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GuestFilter {
    event_id: Option<String>,
}

pub async fn list_events(State(store): State<SharedStore>) -> Json<Vec<Event>> {
    let store = store.read().await;
    Json(store.events().to_vec())
}

pub async fn create_event(
    State(store): State<SharedStore>,
    ApiJson(body): Body,
) -> (StatusCode, Json<Event>) {
    let event = store.write().await.create_event(&body, Utc::now());
    tracing::info!(event_id = event.id, "created event");
    (StatusCode::CREATED, Json(event))
}

pub async fn get_event(
    ApiPath(id): ApiPath<u64>,
    State(store): State<SharedStore>,
) -> ApiResult<Json<Event>> {
    let store = store.read().await;
    store
        .event(id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound("Event"))
}

pub async fn update_event(
    ApiPath(id): ApiPath<u64>,
    State(store): State<SharedStore>,
    ApiJson(patch): Body,
) -> ApiResult<Json<Event>> {
    let event = store.write().await.update_event(id, patch)?;
    tracing::info!(event_id = id, "updated event");
    Ok(Json(event))
}

pub async fn delete_event(
    ApiPath(id): ApiPath<u64>,
    State(store): State<SharedStore>,
) -> Json<MessageResponse> {
    let removed = store.write().await.delete_event(id);
    tracing::info!(event_id = id, removed, "deleted event");
    Json(MessageResponse::new("Event deleted successfully"))
}

pub async fn list_vendors(
    State(store): State<SharedStore>,
    Query(filter): Query<VendorFilter>,
) -> Json<Vec<Vendor>> {
    let category = filter.category.as_deref().filter(|c| !c.is_empty());
    let store = store.read().await;
    Json(store.list_vendors(category))
}

pub async fn create_vendor(
    State(store): State<SharedStore>,
    ApiJson(body): Body,
) -> (StatusCode, Json<Vendor>) {
    let vendor = store.write().await.create_vendor(&body);
    tracing::info!(vendor_id = vendor.id, "created vendor");
    (StatusCode::CREATED, Json(vendor))
}

pub async fn list_guests(
    State(store): State<SharedStore>,
    Query(filter): Query<GuestFilter>,
) -> ApiResult<Json<Vec<Guest>>> {
    let event_id = match filter.event_id.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| ApiError::InvalidFilter {
            name: "event_id",
            value: raw.to_string(),
        })?),
        None => None,
    };
    let store = store.read().await;
    Ok(Json(store.list_guests(event_id)))
}

pub async fn create_guest(
    State(store): State<SharedStore>,
    ApiJson(body): Body,
) -> (StatusCode, Json<Guest>) {
    let guest = store.write().await.create_guest(&body);
    tracing::info!(guest_id = guest.id, event_id = ?guest.field("event_id"), "registered guest");
    (StatusCode::CREATED, Json(guest))
}

pub async fn update_guest(
    ApiPath(id): ApiPath<u64>,
    State(store): State<SharedStore>,
    ApiJson(patch): Body,
) -> ApiResult<Json<Guest>> {
    let guest = store.write().await.update_guest(id, patch)?;
    tracing::info!(guest_id = id, status = ?guest.field("status"), "updated guest");
    Ok(Json(guest))
}

pub async fn add_task(
    ApiPath(event_id): ApiPath<u64>,
    State(store): State<SharedStore>,
    ApiJson(body): Body,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = store.write().await.add_task(event_id, &body)?;
    tracing::info!(event_id, task_id = task.id, "added task");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    ApiPath((event_id, task_id)): ApiPath<(u64, u64)>,
    State(store): State<SharedStore>,
    ApiJson(patch): Body,
) -> ApiResult<Json<Task>> {
    let task = store.write().await.update_task(event_id, task_id, patch)?;
    tracing::info!(event_id, task_id, completed = ?task.field("completed"), "updated task");
    Ok(Json(task))
}

pub async fn dashboard_stats(State(store): State<SharedStore>) -> ApiResult<Json<DashboardStats>> {
    let today = Local::now().date_naive();
    let store = store.read().await;
    let stats = compute_stats(&store, today)?;
    Ok(Json(stats))
}
