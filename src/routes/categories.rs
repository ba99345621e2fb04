use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::categories::list_categories;

#[get("/categories")]
pub async fn show_categories(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_categories(repo.get_ref()) {
        Ok(categories) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "categories");
            context.insert("categories", &categories);
            render_template(&tera, "categories/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render categories page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
