//! Printable certificate of a single birth notification.

use qrcode::QrCode;
use qrcode::render::svg;
use uuid::Uuid;

use crate::domain::catalog::{
    CHILD_NAME, CatalogField, CellSource, DATE_OF_BIRTH, FATHER_FULL_NAME, FATHER_NATIONALITY, FieldKind,
    MOTHER_FULL_NAME, MOTHER_NATIONALITY, ReportProfile, SEX,
};
use crate::domain::event::EventRecord;
use crate::dto::certificate::{
    Certificate, CertificateCellView, CertificateSectionView, QrPayload,
};
use crate::services::{ServiceError, ServiceResult};
use crate::sessions::ReportStore;

/// Verification data of a record. The date of birth uses the display format,
/// every other value is taken as stored.
pub fn qr_payload(record: &EventRecord, profile: &ReportProfile) -> QrPayload {
    let raw = |field: CatalogField| record.value_or_placeholder(field.id).to_string();
    QrPayload {
        child_name: raw(CHILD_NAME),
        sex: raw(SEX),
        dob: profile.display_value(FieldKind::Date, record.value_or_placeholder(DATE_OF_BIRTH.id)),
        mother_full_name: raw(MOTHER_FULL_NAME),
        mother_nationality: raw(MOTHER_NATIONALITY),
        father_full_name: raw(FATHER_FULL_NAME),
        father_nationality: raw(FATHER_NATIONALITY),
        facility: record.facility().to_string(),
        certificate_verified_url: profile.verification_url.clone(),
    }
}

fn render_qr(payload: &str, size: u32) -> ServiceResult<String> {
    let code = QrCode::new(payload.as_bytes()).map_err(|err| {
        log::error!("Failed to encode certificate QR code: {err}");
        ServiceError::Internal(format!("QR code: {err}"))
    })?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(size, size)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// Lays the record out as the certificate table and encodes its QR code.
pub fn present(record: &EventRecord, profile: &ReportProfile) -> ServiceResult<Certificate> {
    let sections = profile
        .catalog
        .certificate
        .iter()
        .map(|section| {
            let cells: Vec<CertificateCellView> = section
                .cells
                .iter()
                .map(|cell| CertificateCellView {
                    label: cell.label.to_string(),
                    lines: match cell.source {
                        CellSource::Field(field) => profile
                            .display_lines(field.kind, record.value_or_placeholder(field.id)),
                        CellSource::Facility => vec![record.facility().to_string()],
                    },
                })
                .collect();
            CertificateSectionView {
                title: section.title.map(str::to_string),
                rows: cells.chunks(2).map(<[_]>::to_vec).collect(),
            }
        })
        .collect();

    let qr_payload = qr_payload(record, profile).encode().map_err(|err| {
        log::error!("Failed to serialize certificate QR payload: {err}");
        ServiceError::Internal(err.to_string())
    })?;
    let qr_svg = render_qr(&qr_payload, profile.qr_size)?;

    Ok(Certificate {
        event_id: record.event_id.clone(),
        logo_url: profile.logo_url.clone(),
        sections,
        qr_payload,
        qr_svg,
        qr_size: profile.qr_size,
    })
}

/// Opens the certificate of a row on the current page.
pub fn open_certificate(
    store: &ReportStore,
    session_id: Uuid,
    event_id: &str,
    profile: &ReportProfile,
) -> ServiceResult<Certificate> {
    let record = store.with_state(session_id, |state| {
        state.open_record(event_id).map(EventRecord::clone)
    })?;
    present(&record, profile)
}

/// Leaves the detail view; selections and pagination stay as they are.
pub fn close_certificate(store: &ReportStore, session_id: Uuid) {
    store.with_state(session_id, |state| state.close_record());
}
