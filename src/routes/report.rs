//! Report generation and pagination.
//!
//! Each action issues one remote fetch and returns to the report page, which
//! shows whatever state the fetch left behind.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::domain::report::FetchOutcome;
use crate::forms::report::{PageForm, PageSizeForm};
use crate::repository::Dhis2Repository;
use crate::routes::{redirect, report_session, run_blocking};
use crate::services::{ServiceResult, report as report_service};
use crate::sessions::ReportStore;

fn finish_fetch(result: ServiceResult<FetchOutcome>) -> HttpResponse {
    match result {
        Ok(FetchOutcome::Applied) => {}
        Ok(FetchOutcome::Stale) => {
            log::info!("A newer report request superseded this one");
        }
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
        }
    }
    redirect("/")
}

#[post("/report/generate")]
pub async fn generate_report(
    session: Session,
    repo: web::Data<Dhis2Repository>,
    store: web::Data<ReportStore>,
) -> impl Responder {
    let session_id = report_session(&session);
    let result = run_blocking(move || {
        report_service::generate_report(repo.get_ref(), store.get_ref(), session_id)
    })
    .await;
    finish_fetch(result)
}

#[post("/report/page")]
pub async fn change_page(
    session: Session,
    repo: web::Data<Dhis2Repository>,
    store: web::Data<ReportStore>,
    web::Form(form): web::Form<PageForm>,
) -> impl Responder {
    let session_id = report_session(&session);
    let result = run_blocking(move || {
        report_service::change_page(repo.get_ref(), store.get_ref(), session_id, form)
    })
    .await;
    finish_fetch(result)
}

#[post("/report/page-size")]
pub async fn change_page_size(
    session: Session,
    repo: web::Data<Dhis2Repository>,
    store: web::Data<ReportStore>,
    web::Form(form): web::Form<PageSizeForm>,
) -> impl Responder {
    let session_id = report_session(&session);
    let result = run_blocking(move || {
        report_service::change_page_size(repo.get_ref(), store.get_ref(), session_id, form)
    })
    .await;
    finish_fetch(result)
}
