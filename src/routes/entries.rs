use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::auth::LOGIN_URL;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::entry::EntryView;
use crate::domain::types::EntryStatus;
use crate::forms::comments::CommentForm;
use crate::forms::entries::{EntryForm, EntryFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::categories::list_categories as list_categories_service;
use crate::services::comments::post_comment as post_comment_service;
use crate::services::entries::{
    EntryFilters, create_entry as create_entry_service, delete_entry as delete_entry_service,
    entry_form_options, get_owned_entry, like_entry as like_entry_service, list_entries,
    list_my_entries, show_entry as show_entry_service, update_entry as update_entry_service,
};
use crate::services::tags::list_tags as list_tags_service;

/// Raw listing query string. Values that do not parse are dropped.
#[derive(Debug, Default, Deserialize)]
pub struct EntryListParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub page: Option<String>,
}

fn parse_param<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Page numbers too large for `usize` saturate so they clamp to the last page.
fn parse_page(value: Option<&str>) -> Option<usize> {
    let value = value?.trim();
    match value.parse() {
        Ok(page) => Some(page),
        Err(_) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
            Some(usize::MAX)
        }
        Err(_) => None,
    }
}

impl From<&EntryListParams> for EntryFilters {
    fn from(params: &EntryListParams) -> Self {
        Self {
            search: params.q.clone(),
            category_id: parse_param(params.category.as_deref()),
            tag_id: parse_param(params.tag.as_deref()),
            page: parse_page(params.page.as_deref()).unwrap_or(1),
        }
    }
}

fn entry_url(entry_id: i32) -> String {
    format!("/entry/{entry_id}")
}

fn internal_error(action: &str, err: &ServiceError) -> HttpResponse {
    log::error!("Failed to {action}: {err}");
    HttpResponse::InternalServerError().finish()
}

#[get("/")]
pub async fn index(
    params: web::Query<EntryListParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let filters = EntryFilters::from(&params.into_inner());

    let entries = match list_entries(&filters, repo.get_ref()) {
        Ok(entries) => entries,
        Err(err) => return internal_error("list entries", &err),
    };
    let categories = list_categories_service(repo.get_ref()).unwrap_or_else(|err| {
        log::error!("Failed to load categories for entry listing: {err}");
        vec![]
    });
    let tags = list_tags_service(repo.get_ref()).unwrap_or_else(|err| {
        log::error!("Failed to load tags for entry listing: {err}");
        vec![]
    });

    let mut context = base_context(&flash_messages, user.as_ref(), "index");
    context.insert("entries", &entries);
    context.insert("categories", &categories);
    context.insert("tags", &tags);
    context.insert("query", &filters.search.unwrap_or_default());
    context.insert("selected_category", &filters.category_id);
    context.insert("selected_tag", &filters.tag_id);
    render_template(&tera, "entries/index.html", &context)
}

#[get("/entry/{entry_id}")]
pub async fn show_entry(
    entry_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_entry_service(entry_id.into_inner(), repo.get_ref()) {
        Ok(entry) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "entry");
            context.insert("entry", &entry);
            render_template(&tera, "entries/detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => internal_error("show entry", &err),
    }
}

#[post("/entry/{entry_id}")]
pub async fn post_comment(
    entry_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CommentForm>,
) -> impl Responder {
    let entry_id = entry_id.into_inner();

    match post_comment_service(entry_id, form, user.as_ref(), repo.get_ref()) {
        Ok(_) => FlashMessage::success("Comment added.").send(),
        Err(ServiceError::Unauthenticated) => return redirect(LOGIN_URL),
        Err(ServiceError::NotFound) => return HttpResponse::NotFound().finish(),
        Err(ServiceError::Validation(message)) => FlashMessage::error(message).send(),
        Err(err) => return internal_error("post comment", &err),
    }

    redirect(&entry_url(entry_id))
}

#[post("/entry/{entry_id}/like")]
pub async fn like_entry(
    entry_id: web::Path<i32>,
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let entry_id = entry_id.into_inner();

    match like_entry_service(entry_id, repo.get_ref()) {
        Ok(()) => redirect(&entry_url(entry_id)),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => internal_error("like entry", &err),
    }
}

fn render_entry_form(
    tera: &Tera,
    mut context: Context,
    entry: Option<&EntryView>,
    repo: &DieselRepository,
) -> HttpResponse {
    let (categories, tags) = match entry_form_options(repo) {
        Ok(options) => options,
        Err(err) => return internal_error("load entry form options", &err),
    };
    let statuses: Vec<&str> = EntryStatus::ALL.iter().map(|s| s.as_str()).collect();
    let selected_tags: Vec<i32> = entry
        .map(|e| e.tags.iter().map(|t| t.id.get()).collect())
        .unwrap_or_default();

    context.insert("entry", &entry);
    context.insert("categories", &categories);
    context.insert("tags", &tags);
    context.insert("statuses", &statuses);
    context.insert("selected_tags", &selected_tags);
    render_template(tera, "entries/form.html", &context)
}

fn parse_entry_form(pairs: Vec<(String, String)>) -> Result<EntryFormPayload, String> {
    EntryForm::from_pairs(pairs)
        .and_then(EntryFormPayload::try_from)
        .map_err(|e| e.to_string())
}

#[get("/entry/create")]
pub async fn new_entry(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, Some(&user), "create");
    render_entry_form(&tera, context, None, repo.get_ref())
}

#[post("/entry/create")]
pub async fn create_entry(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let payload = match parse_entry_form(pairs) {
        Ok(payload) => payload,
        Err(message) => {
            FlashMessage::error(message).send();
            return redirect("/entry/create");
        }
    };

    match create_entry_service(payload, &user, repo.get_ref()) {
        Ok(entry) if entry.status.is_published() => {
            FlashMessage::success("Entry published.").send();
            redirect(&entry_url(entry.id.get()))
        }
        Ok(_) => {
            FlashMessage::success("Entry saved.").send();
            redirect("/my-entries")
        }
        Err(ServiceError::Validation(message)) => {
            FlashMessage::error(message).send();
            redirect("/entry/create")
        }
        Err(err) => internal_error("create entry", &err),
    }
}

#[get("/entry/{entry_id}/edit")]
pub async fn edit_entry(
    entry_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match get_owned_entry(entry_id.into_inner(), &user, repo.get_ref()) {
        Ok(entry) => {
            let context = base_context(&flash_messages, Some(&user), "edit");
            render_entry_form(&tera, context, Some(&entry), repo.get_ref())
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => internal_error("load entry for editing", &err),
    }
}

#[post("/entry/{entry_id}/edit")]
pub async fn update_entry(
    entry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let entry_id = entry_id.into_inner();
    let edit_url = format!("/entry/{entry_id}/edit");

    let payload = match parse_entry_form(pairs) {
        Ok(payload) => payload,
        Err(message) => {
            FlashMessage::error(message).send();
            return redirect(&edit_url);
        }
    };

    match update_entry_service(entry_id, payload, &user, repo.get_ref()) {
        Ok(entry) if entry.status.is_published() => {
            FlashMessage::success("Entry updated.").send();
            redirect(&entry_url(entry_id))
        }
        Ok(_) => {
            FlashMessage::success("Entry updated.").send();
            redirect("/my-entries")
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Validation(message)) => {
            FlashMessage::error(message).send();
            redirect(&edit_url)
        }
        Err(err) => internal_error("update entry", &err),
    }
}

#[get("/entry/{entry_id}/delete")]
pub async fn confirm_delete_entry(
    entry_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match get_owned_entry(entry_id.into_inner(), &user, repo.get_ref()) {
        Ok(entry) => {
            let mut context = base_context(&flash_messages, Some(&user), "delete");
            context.insert("entry", &entry);
            render_template(&tera, "entries/delete.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => internal_error("load entry for deletion", &err),
    }
}

#[post("/entry/{entry_id}/delete")]
pub async fn delete_entry(
    entry_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_entry_service(entry_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Entry deleted.").send();
            redirect("/my-entries")
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => internal_error("delete entry", &err),
    }
}

#[get("/my-entries")]
pub async fn my_entries(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_my_entries(&user, repo.get_ref()) {
        Ok(entries) => {
            let mut context = base_context(&flash_messages, Some(&user), "my_entries");
            context.insert("entries", &entries);
            render_template(&tera, "entries/mine.html", &context)
        }
        Err(err) => internal_error("list own entries", &err),
    }
}
