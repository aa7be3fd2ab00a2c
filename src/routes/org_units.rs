//! Routes of the organisation unit picker.

use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::org_units::{HighlightOrgUnitForm, TreePathForm};
use crate::repository::Dhis2Repository;
use crate::routes::{base_context, redirect, render_template, report_session, run_blocking};
use crate::services::{ServiceError, org_units as org_units_service};
use crate::sessions::ReportStore;

#[get("/org-units")]
pub async fn show_org_units(
    session: Session,
    repo: web::Data<Dhis2Repository>,
    store: web::Data<ReportStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let session_id = report_session(&session);
    let result = run_blocking(move || {
        org_units_service::load_org_unit_page(repo.get_ref(), store.get_ref(), session_id)
    })
    .await;

    match result {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "org_units");
            context.insert("tree", &data);
            render_template(&tera, "org_units/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load organisation units: {err}");
            FlashMessage::error(format!("Failed to load organisation units: {err}")).send();
            redirect("/")
        }
    }
}

#[post("/org-units/expand")]
pub async fn expand_org_unit(
    session: Session,
    store: web::Data<ReportStore>,
    web::Form(form): web::Form<TreePathForm>,
) -> impl Responder {
    let session_id = report_session(&session);
    if let Err(err) = org_units_service::expand_org_unit(&store, session_id, form) {
        log::warn!("Rejected tree expansion: {err}");
        FlashMessage::error(err.to_string()).send();
    }
    redirect("/org-units")
}

#[post("/org-units/collapse")]
pub async fn collapse_org_unit(
    session: Session,
    store: web::Data<ReportStore>,
    web::Form(form): web::Form<TreePathForm>,
) -> impl Responder {
    let session_id = report_session(&session);
    if let Err(err) = org_units_service::collapse_org_unit(&store, session_id, form) {
        log::warn!("Rejected tree collapse: {err}");
        FlashMessage::error(err.to_string()).send();
    }
    redirect("/org-units")
}

#[post("/org-units/highlight")]
pub async fn highlight_org_unit(
    session: Session,
    store: web::Data<ReportStore>,
    web::Form(form): web::Form<HighlightOrgUnitForm>,
) -> impl Responder {
    let session_id = report_session(&session);
    if let Err(err) = org_units_service::highlight_org_unit(&store, session_id, form) {
        log::warn!("Rejected organisation unit: {err}");
        FlashMessage::error(err.to_string()).send();
    }
    redirect("/org-units")
}

#[post("/org-units/save")]
/// Confirms the highlighted unit after classifying its scope remotely.
pub async fn save_org_unit(
    session: Session,
    repo: web::Data<Dhis2Repository>,
    store: web::Data<ReportStore>,
) -> impl Responder {
    let session_id = report_session(&session);
    let result = run_blocking(move || {
        org_units_service::confirm_org_unit(repo.get_ref(), store.get_ref(), session_id)
    })
    .await;

    match result {
        Ok(org_unit) => {
            FlashMessage::success(format!(
                "Organisation unit {} selected.",
                org_unit.display_name
            ))
            .send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/org-units")
        }
        Err(err) => {
            FlashMessage::error(format!("ERROR: {err}")).send();
            redirect("/org-units")
        }
    }
}
