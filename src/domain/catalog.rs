//! Static field catalog of the birth notification program.
//!
//! The catalog is the only place that knows remote data element ids. Table
//! columns and the certificate layout both reference the same entries.

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::Serialize;

use crate::domain::event::PLACEHOLDER;
use crate::domain::period::ISO_DATE_FORMAT;
use crate::domain::types::{PageSize, TypeConstraintError, Uid};

/// How a field value is turned into display text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Text,
    /// Rendered with the configured display format.
    Date,
    /// First word, line break, remainder.
    Nationality,
}

/// A data element of the program together with its display label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogField {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn field(id: &'static str, label: &'static str, kind: FieldKind) -> CatalogField {
    CatalogField { id, label, kind }
}

pub const CHILD_NAME: CatalogField = field("ZVlvCTT6G4A", "Name of the Child", FieldKind::Text);
pub const SEX: CatalogField = field("cJ1lAdSRdOn", "Sex", FieldKind::Text);
pub const DATE_OF_BIRTH: CatalogField = field("FQTIz54NLN4", "Date of Birth", FieldKind::Date);
pub const TIME_OF_BIRTH: CatalogField = field("yxqZmHDnCWf", "Time of Birth", FieldKind::Text);
pub const MOTHER_FULL_NAME: CatalogField =
    field("J9i1DFTGnpb", "Mother Full Name", FieldKind::Text);
pub const MOTHER_NATIONALITY: CatalogField =
    field("Ej58X2a6ZBA", "Mother Nationality", FieldKind::Nationality);
pub const MOTHER_STATE: CatalogField = field("t8g5g9jtk84", "Mother State", FieldKind::Text);
pub const MOTHER_COUNTY: CatalogField = field("RvYMn4U8sVo", "Mother County", FieldKind::Text);
pub const MOTHER_PAYAM: CatalogField = field("UCrKivG7NBR", "Mother Payam", FieldKind::Text);
pub const MOTHER_BOMA: CatalogField = field("WCKiK2E56ML", "Mother Boma", FieldKind::Text);
pub const FATHER_FULL_NAME: CatalogField =
    field("uh1CxrbOqfW", "Father Full Name", FieldKind::Text);
pub const FATHER_NATIONALITY: CatalogField =
    field("sn6kx28cLYb", "Father Nationality", FieldKind::Nationality);
pub const FATHER_STATE: CatalogField = field("G9iUp4gocu9", "Father State", FieldKind::Text);
pub const FATHER_COUNTY: CatalogField = field("iavApfZQmht", "Father County", FieldKind::Text);
pub const FATHER_PAYAM: CatalogField = field("rZG3YsDjzBJ", "Father Payam", FieldKind::Text);
pub const FATHER_BOMA: CatalogField = field("g0nf4TliiBp", "Father Boma", FieldKind::Text);
pub const NOTIFIER_NAME: CatalogField =
    field("QXjGgP1OGrP", "Notifier Name in Full", FieldKind::Text);
pub const NOTIFIER_OCCUPATION: CatalogField =
    field("Fe9NLNTucAU", "Notifier Occupation", FieldKind::Text);
pub const MIDWIFE_NAME: CatalogField = field("OCI82CIDA6X", "Midwife Name", FieldKind::Text);
pub const MIDWIFE_DATE: CatalogField = field("OLQWApHJ81N", "Midwife Date", FieldKind::Date);
pub const CERTIFICATE_NUMBER: CatalogField =
    field("IUjYj4e02QZ", "Certificate Number", FieldKind::Text);

/// Columns of the report table, after "Event Date" and "Org Unit".
pub const TABLE_COLUMNS: &[CatalogField] = &[
    CHILD_NAME,
    SEX,
    DATE_OF_BIRTH,
    MOTHER_FULL_NAME,
    MOTHER_NATIONALITY,
    FATHER_FULL_NAME,
    FATHER_NATIONALITY,
];

/// Where a certificate cell takes its value from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellSource {
    Field(CatalogField),
    /// Org-unit name of the event.
    Facility,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CertificateCell {
    pub label: &'static str,
    pub source: CellSource,
}

const fn cell(label: &'static str, field: CatalogField) -> CertificateCell {
    CertificateCell {
        label,
        source: CellSource::Field(field),
    }
}

/// A titled block of the certificate table, laid out two cells per row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CertificateSection {
    pub title: Option<&'static str>,
    pub cells: &'static [CertificateCell],
}

pub const CERTIFICATE_LAYOUT: &[CertificateSection] = &[
    CertificateSection {
        title: None,
        cells: &[
            cell("Notification No", CERTIFICATE_NUMBER),
            cell("Date of Birth", DATE_OF_BIRTH),
            CertificateCell {
                label: "Facility",
                source: CellSource::Facility,
            },
            cell("Child Name", CHILD_NAME),
            cell("Sex", SEX),
            cell("Time of Birth", TIME_OF_BIRTH),
        ],
    },
    CertificateSection {
        title: Some("Mother"),
        cells: &[
            cell("Mother Name", MOTHER_FULL_NAME),
            cell("Mother Nationality", MOTHER_NATIONALITY),
            cell("Mother State", MOTHER_STATE),
            cell("Mother County", MOTHER_COUNTY),
            cell("Mother Payam", MOTHER_PAYAM),
            cell("Mother Boma", MOTHER_BOMA),
        ],
    },
    CertificateSection {
        title: Some("Father"),
        cells: &[
            cell("Father Name", FATHER_FULL_NAME),
            cell("Father Nationality", FATHER_NATIONALITY),
            cell("Father State", FATHER_STATE),
            cell("Father County", FATHER_COUNTY),
            cell("Father Payam", FATHER_PAYAM),
            cell("Father Boma", FATHER_BOMA),
        ],
    },
    CertificateSection {
        title: Some("Informant / Notifier"),
        cells: &[
            cell("Name and Surname", NOTIFIER_NAME),
            cell("Occupation", NOTIFIER_OCCUPATION),
        ],
    },
    CertificateSection {
        title: Some("Clerk / Midwife"),
        cells: &[
            cell("Name and Surname", MIDWIFE_NAME),
            cell("Date", MIDWIFE_DATE),
        ],
    },
];

/// Immutable view over the program's table columns and certificate layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldCatalog {
    pub table_columns: &'static [CatalogField],
    pub certificate: &'static [CertificateSection],
}

impl FieldCatalog {
    pub const fn birth_notification() -> Self {
        Self {
            table_columns: TABLE_COLUMNS,
            certificate: CERTIFICATE_LAYOUT,
        }
    }

    /// Columns of the rendered table, fixed ones included.
    pub fn column_count(&self) -> usize {
        2 + self.table_columns.len()
    }

    /// Every distinct field referenced by the table or the certificate.
    pub fn fields(&self) -> Vec<CatalogField> {
        let mut fields: Vec<CatalogField> = self.table_columns.to_vec();
        let certificate_fields = self
            .certificate
            .iter()
            .flat_map(|section| section.cells.iter())
            .filter_map(|cell| match cell.source {
                CellSource::Field(field) => Some(field),
                CellSource::Facility => None,
            });
        for field in certificate_fields {
            if !fields.iter().any(|known| known.id == field.id) {
                fields.push(field);
            }
        }
        fields
    }
}

/// Process-wide report settings, built once at startup and shared by handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportProfile {
    pub program_id: Uid,
    pub verification_url: String,
    pub date_format: String,
    pub qr_size: u32,
    pub default_page_size: PageSize,
    /// Emblem shown in the certificate header.
    pub logo_url: Option<String>,
    pub catalog: FieldCatalog,
}

impl ReportProfile {
    pub fn new(
        program_id: Uid,
        verification_url: impl Into<String>,
        date_format: impl Into<String>,
        qr_size: u32,
        default_page_size: PageSize,
    ) -> Result<Self, TypeConstraintError> {
        let date_format = date_format.into();
        if date_format.is_empty()
            || StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(TypeConstraintError::InvalidValue(format!(
                "date format `{date_format}`"
            )));
        }
        if qr_size == 0 {
            return Err(TypeConstraintError::InvalidValue("qr size".to_string()));
        }
        Ok(Self {
            program_id,
            verification_url: verification_url.into(),
            date_format,
            qr_size,
            default_page_size,
            logo_url: None,
            catalog: FieldCatalog::birth_notification(),
        })
    }

    /// Renders a value of the given kind as a single line.
    pub fn display_value(&self, kind: FieldKind, raw: &str) -> String {
        match kind {
            FieldKind::Date => format_date(raw, &self.date_format),
            FieldKind::Text | FieldKind::Nationality => raw.to_string(),
        }
    }

    /// Renders a value of the given kind as display lines.
    pub fn display_lines(&self, kind: FieldKind, raw: &str) -> Vec<String> {
        match kind {
            FieldKind::Nationality => split_nationality(raw),
            _ => vec![self.display_value(kind, raw)],
        }
    }
}

/// Reformats a `YYYY-MM-DD[THH:MM:SS…]` value. The placeholder and anything
/// unparseable pass through untouched.
pub fn format_date(raw: &str, display_format: &str) -> String {
    if raw == PLACEHOLDER {
        return raw.to_string();
    }
    raw.trim()
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, ISO_DATE_FORMAT).ok())
        .map(|date| date.format(display_format).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `"South Sudanese"` becomes `["South", "Sudanese"]`; single words and the
/// placeholder stay on one line.
pub fn split_nationality(raw: &str) -> Vec<String> {
    let mut words = raw.split_whitespace();
    match (words.next(), words.next()) {
        (Some(first), Some(second)) => {
            let rest = std::iter::once(second)
                .chain(words)
                .collect::<Vec<_>>()
                .join(" ");
            vec![first.to_string(), rest]
        }
        _ => vec![raw.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ReportProfile {
        ReportProfile::new(
            Uid::new("UxeePXLdng7").unwrap(),
            "https://dev.southsudanhis.org",
            "%d/%m/%Y",
            80,
            PageSize::default(),
        )
        .unwrap()
    }

    #[test]
    fn catalog_ids_are_platform_identifiers() {
        for field in FieldCatalog::birth_notification().fields() {
            assert!(Uid::new(field.id).is_ok(), "bad id {}", field.id);
        }
    }

    #[test]
    fn catalog_fields_are_unique() {
        let fields = FieldCatalog::birth_notification().fields();
        let mut ids: Vec<_> = fields.iter().map(|f| f.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), fields.len());
        assert_eq!(fields.len(), 21);
    }

    #[test]
    fn table_has_fixed_columns_plus_catalog() {
        let catalog = FieldCatalog::birth_notification();
        assert_eq!(catalog.column_count(), 9);
        assert_eq!(catalog.table_columns[0].label, "Name of the Child");
    }

    #[test]
    fn certificate_sections_fill_whole_rows() {
        for section in CERTIFICATE_LAYOUT {
            assert_eq!(section.cells.len() % 2, 0);
        }
    }

    #[test]
    fn dates_are_reformatted() {
        assert_eq!(format_date("2024-01-15", "%d/%m/%Y"), "15/01/2024");
        assert_eq!(
            format_date("2024-01-15T10:20:00.000", "%d/%m/%Y"),
            "15/01/2024"
        );
    }

    #[test]
    fn placeholder_and_garbage_dates_pass_through() {
        assert_eq!(format_date(PLACEHOLDER, "%d/%m/%Y"), PLACEHOLDER);
        assert_eq!(format_date("yesterday", "%d/%m/%Y"), "yesterday");
        assert_eq!(format_date("2024-13-45", "%d/%m/%Y"), "2024-13-45");
    }

    #[test]
    fn nationality_splits_on_first_word() {
        assert_eq!(split_nationality("South Sudanese"), vec!["South", "Sudanese"]);
        assert_eq!(
            split_nationality("Central  African Republic"),
            vec!["Central", "African Republic"]
        );
    }

    #[test]
    fn single_word_nationality_is_unchanged() {
        assert_eq!(split_nationality("Sudanese"), vec!["Sudanese"]);
        assert_eq!(split_nationality(PLACEHOLDER), vec![PLACEHOLDER]);
    }

    #[test]
    fn display_lines_follow_field_kind() {
        let profile = profile();
        assert_eq!(
            profile.display_lines(FieldKind::Date, "2024-01-15"),
            vec!["15/01/2024"]
        );
        assert_eq!(
            profile.display_lines(FieldKind::Nationality, "South Sudanese"),
            vec!["South", "Sudanese"]
        );
        assert_eq!(
            profile.display_value(FieldKind::Nationality, "South Sudanese"),
            "South Sudanese"
        );
    }

    #[test]
    fn profile_rejects_broken_date_format() {
        let result = ReportProfile::new(
            Uid::new("UxeePXLdng7").unwrap(),
            "https://dev.southsudanhis.org",
            "%Q",
            80,
            PageSize::default(),
        );
        assert!(result.is_err());
    }
}
