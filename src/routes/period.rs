use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use tera::Tera;

use crate::domain::report::ReportError;
use crate::forms::period::PeriodForm;
use crate::routes::{base_context, redirect, render_template, report_session};
use crate::services::{ServiceError, period as period_service};
use crate::sessions::ReportStore;

#[get("/period")]
pub async fn show_period(
    session: Session,
    store: web::Data<ReportStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let session_id = report_session(&session);
    let today = Local::now().date_naive();
    let data = period_service::load_period_page(&store, session_id, today);

    let mut context = base_context(&flash_messages, "period");
    context.insert("period", &data);

    render_template(&tera, "period/index.html", &context)
}

#[post("/period/save")]
pub async fn save_period(
    session: Session,
    store: web::Data<ReportStore>,
    web::Form(form): web::Form<PeriodForm>,
) -> impl Responder {
    let session_id = report_session(&session);
    let today = Local::now().date_naive();

    match period_service::save_period(&store, session_id, form, today) {
        Ok(period) => {
            FlashMessage::success(format!("Period {} selected.", period.label())).send();
            redirect("/")
        }
        Err(ServiceError::Report(ReportError::OrgUnitRequired)) => {
            FlashMessage::error("Select an organisation unit first.").send();
            redirect("/org-units")
        }
        Err(err) => {
            log::warn!("Rejected period: {err}");
            FlashMessage::error(err.to_string()).send();
            redirect("/period")
        }
    }
}
