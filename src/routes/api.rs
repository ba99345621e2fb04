//! Read-only JSON API.

use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::entries::EntryListParams;
use crate::services::ServiceError;
use crate::services::categories::list_categories;
use crate::services::entries::{EntryFilters, list_entries, show_entry};
use crate::services::tags::list_tags;

/// Register the API routes; mounted under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_v1_entries)
        .service(api_v1_entry)
        .service(api_v1_categories)
        .service(api_v1_tags);
}

#[get("/v1/entries")]
pub async fn api_v1_entries(
    params: web::Query<EntryListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let filters = EntryFilters::from(&params.into_inner());

    match list_entries(&filters, repo.get_ref()) {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => {
            log::error!("Failed to list entries: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/entries/{entry_id}")]
pub async fn api_v1_entry(
    entry_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_entry(entry_id.into_inner(), repo.get_ref()) {
        Ok(entry) => HttpResponse::Ok().json(entry),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to get entry: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/categories")]
pub async fn api_v1_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_categories(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/tags")]
pub async fn api_v1_tags(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_tags(repo.get_ref()) {
        Ok(tags) => HttpResponse::Ok().json(tags),
        Err(e) => {
            log::error!("Failed to list tags: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
