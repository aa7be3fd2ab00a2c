use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::catalog::ReportProfile;
use crate::routes::{base_context, render_template, report_session};
use crate::services::report as report_service;
use crate::sessions::ReportStore;

#[get("/")]
/// Report page: current selections, the table and its pagination.
pub async fn show_index(
    session: Session,
    store: web::Data<ReportStore>,
    profile: web::Data<ReportProfile>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let session_id = report_session(&session);
    let data = report_service::load_index_page(&store, session_id, &profile);

    let mut context = base_context(&flash_messages, "index");
    context.insert("report", &data);

    render_template(&tera, "main/index.html", &context)
}
