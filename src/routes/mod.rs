use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;

pub mod api;
pub mod auth;
pub mod categories;
pub mod entries;
pub mod tags;

/// Register every HTML and JSON route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(entries::index)
        .service(entries::new_entry)
        .service(entries::create_entry)
        .service(entries::my_entries)
        .service(entries::show_entry)
        .service(entries::post_comment)
        .service(entries::like_entry)
        .service(entries::edit_entry)
        .service(entries::update_entry)
        .service(entries::confirm_delete_entry)
        .service(entries::delete_entry)
        .service(categories::show_categories)
        .service(tags::show_tags)
        .service(auth::login_page)
        .service(auth::login)
        .service(auth::register_page)
        .service(auth::register)
        .service(auth::logout)
        .service(web::scope("/api").configure(api::configure));
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info => "info",
        Level::Debug => "secondary",
    }
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirects_with_see_other() {
        let response = redirect("/login");
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[test]
    fn maps_error_level_to_danger() {
        assert_eq!(alert_level_to_str(&Level::Error), "danger");
        assert_eq!(alert_level_to_str(&Level::Success), "success");
    }
}
