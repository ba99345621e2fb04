use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::tags::list_tags;

#[get("/tags")]
pub async fn show_tags(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_tags(repo.get_ref()) {
        Ok(tags) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "tags");
            context.insert("tags", &tags);
            render_template(&tera, "tags/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render tags page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
