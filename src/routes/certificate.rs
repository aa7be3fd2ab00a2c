use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::catalog::ReportProfile;
use crate::routes::{base_context, redirect, render_template, report_session};
use crate::services::certificate as certificate_service;
use crate::sessions::ReportStore;

#[get("/report/event/{event_id}")]
/// Printable certificate of one row of the current page.
pub async fn show_certificate(
    event_id: web::Path<String>,
    session: Session,
    store: web::Data<ReportStore>,
    profile: web::Data<ReportProfile>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let session_id = report_session(&session);
    let event_id = event_id.into_inner();

    match certificate_service::open_certificate(&store, session_id, &event_id, &profile) {
        Ok(certificate) => {
            let mut context = base_context(&flash_messages, "certificate");
            context.insert("certificate", &certificate);
            render_template(&tera, "report/certificate.html", &context)
        }
        Err(err) => {
            log::warn!("Failed to open certificate {event_id}: {err}");
            FlashMessage::error(err.to_string()).send();
            redirect("/")
        }
    }
}

#[post("/report/close")]
pub async fn close_certificate(
    session: Session,
    store: web::Data<ReportStore>,
) -> impl Responder {
    let session_id = report_session(&session);
    certificate_service::close_certificate(&store, session_id);
    redirect("/")
}
