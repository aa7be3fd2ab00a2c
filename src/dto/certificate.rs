//! View models of the printable birth notification certificate.

use serde::Serialize;

/// Verification data embedded in the QR code. Field order is the key order of
/// the encoded JSON.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub child_name: String,
    pub sex: String,
    pub dob: String,
    pub mother_full_name: String,
    pub mother_nationality: String,
    pub father_full_name: String,
    pub father_nationality: String,
    pub facility: String,
    pub certificate_verified_url: String,
}

impl QrPayload {
    /// Compact JSON text encoded into the QR code.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CertificateCellView {
    pub label: String,
    /// Rendered with a line break between entries.
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CertificateSectionView {
    pub title: Option<String>,
    /// Two cells per row.
    pub rows: Vec<Vec<CertificateCellView>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Certificate {
    pub event_id: String,
    /// Header emblem, omitted when not configured.
    pub logo_url: Option<String>,
    pub sections: Vec<CertificateSectionView>,
    pub qr_payload: String,
    /// Inline SVG markup of the QR code.
    pub qr_svg: String,
    pub qr_size: u32,
}
