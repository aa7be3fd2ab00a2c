//! HTTP handlers and the helpers they share.

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web::web;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};
use uuid::Uuid;

use crate::services::{ServiceError, ServiceResult};

pub mod certificate;
pub mod main;
pub mod org_units;
pub mod period;
pub mod report;

const REPORT_SESSION_KEY: &str = "report_session";

/// Maps flash message levels to the alert classes used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Context every page starts from: pending alerts and the active page.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

/// Id of the server-side report state of this browser, issued on first visit.
pub fn report_session(session: &Session) -> Uuid {
    match session.get::<Uuid>(REPORT_SESSION_KEY) {
        Ok(Some(id)) => return id,
        Ok(None) => {}
        Err(err) => log::warn!("Discarding unreadable report session: {err}"),
    }
    let id = Uuid::new_v4();
    if let Err(err) = session.insert(REPORT_SESSION_KEY, id) {
        log::error!("Failed to store report session: {err}");
    }
    id
}

/// Runs a service that talks to the remote API on the blocking pool.
pub async fn run_blocking<F, T>(f: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f).await.map_err(|err| {
        log::error!("Blocking task failed: {err}");
        ServiceError::Internal(err.to_string())
    })?
}
