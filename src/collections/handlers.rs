use actix_web::{web, HttpResponse};
use tracing::error;

use crate::auth::Identity;
use crate::db::Collection;
use crate::error::AppError;
use crate::AppState;

pub async fn list(
    path: web::Path<Collection>,
    identity: Identity,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let collection = path.into_inner();
    let items = state
        .collections
        .list(identity.id(), collection)
        .await
        .map_err(|e| {
            error!("Listing {} failed for user {}: {}", collection, identity.id(), e);
            e
        })?;
    Ok(HttpResponse::Ok().json(items))
}

pub async fn add(
    path: web::Path<(Collection, String)>,
    identity: Identity,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (collection, item_id) = path.into_inner();
    let items = state
        .collections
        .add(identity.id(), collection, &item_id)
        .await
        .map_err(|e| {
            error!("Adding {} to {} failed for user {}: {}", item_id, collection, identity.id(), e);
            e
        })?;
    Ok(HttpResponse::Ok().json(items))
}

pub async fn remove(
    path: web::Path<(Collection, String)>,
    identity: Identity,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (collection, item_id) = path.into_inner();
    let items = state
        .collections
        .remove(identity.id(), collection, &item_id)
        .await
        .map_err(|e| {
            error!("Removing {} from {} failed for user {}: {}", item_id, collection, identity.id(), e);
            e
        })?;
    Ok(HttpResponse::Ok().json(items))
}
