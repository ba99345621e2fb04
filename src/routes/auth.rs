use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::{LOGIN_URL, start_session};
use crate::domain::auth::AuthenticatedUser;
use crate::forms::auth::{LoginForm, LoginFormPayload, RegisterForm, RegisterFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{login as login_service, register as register_service};

const REGISTER_URL: &str = "/register";

fn begin_session(req: &HttpRequest, user: &AuthenticatedUser) -> HttpResponse {
    match start_session(req, user) {
        Ok(()) => {
            FlashMessage::success(format!("Welcome, {}.", user.username)).send();
            redirect("/")
        }
        Err(e) => {
            log::error!("Failed to start session for user {}: {e}", user.id);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/login")]
pub async fn login_page(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let payload: LoginFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(LOGIN_URL);
        }
    };

    match login_service(payload, repo.get_ref()) {
        Ok(user) => begin_session(&req, &user),
        Err(ServiceError::Validation(message)) => {
            FlashMessage::error(message).send();
            redirect(LOGIN_URL)
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/register")]
pub async fn register_page(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "register");
    render_template(&tera, "auth/register.html", &context)
}

#[post("/register")]
pub async fn register(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    let payload: RegisterFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(REGISTER_URL);
        }
    };

    match register_service(payload, repo.get_ref()) {
        Ok(user) => begin_session(&req, &user),
        Err(ServiceError::Conflict(message)) | Err(ServiceError::Validation(message)) => {
            FlashMessage::error(message).send();
            redirect(REGISTER_URL)
        }
        Err(err) => {
            log::error!("Failed to register user: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
        FlashMessage::info("You have been logged out.").send();
    }
    redirect("/")
}
