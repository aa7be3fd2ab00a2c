//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::domain::catalog::ReportProfile;
use crate::domain::types::{PageSize, TypeConstraintError, Uid};

fn default_timeout_secs() -> u64 {
    30
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_qr_size() -> u32 {
    80
}

fn default_session_idle_minutes() -> u64 {
    120
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    /// Cookie signing key, at least 64 bytes.
    pub secret: String,
    /// Base URL of the remote instance, without the `/api` suffix.
    pub dhis2_url: String,
    #[serde(default)]
    pub dhis2_username: Option<String>,
    #[serde(default)]
    pub dhis2_password: Option<String>,
    /// Personal access token; takes precedence over username/password.
    #[serde(default)]
    pub dhis2_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub dhis2_timeout_secs: u64,
    pub program_id: String,
    pub verification_url: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_qr_size")]
    pub qr_size: u32,
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,
    /// URL of the certificate header emblem, e.g. `/assets/moh.png`.
    #[serde(default)]
    pub certificate_logo_url: Option<String>,
}

impl TryFrom<&ServerConfig> for ReportProfile {
    type Error = TypeConstraintError;

    fn try_from(config: &ServerConfig) -> Result<Self, Self::Error> {
        let mut profile = ReportProfile::new(
            Uid::new(config.program_id.as_str())?,
            config.verification_url.as_str(),
            config.date_format.as_str(),
            config.qr_size,
            PageSize::new(config.default_page_size)?,
        )?;
        profile.logo_url = config.certificate_logo_url.clone();
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            address: "127.0.0.1".into(),
            port: 8080,
            templates_dir: "templates/**/*".into(),
            secret: "x".repeat(64),
            dhis2_url: "https://dhis2.example.org".into(),
            dhis2_username: Some("clerk".into()),
            dhis2_password: Some("secret".into()),
            dhis2_token: None,
            dhis2_timeout_secs: 30,
            program_id: "UxeePXLdng7".into(),
            verification_url: "https://dev.southsudanhis.org".into(),
            date_format: default_date_format(),
            default_page_size: default_page_size(),
            qr_size: default_qr_size(),
            session_idle_minutes: default_session_idle_minutes(),
            certificate_logo_url: Some("/assets/moh.png".into()),
        }
    }

    #[test]
    fn profile_is_built_from_config() {
        let profile = ReportProfile::try_from(&config()).expect("valid profile");
        assert_eq!(profile.program_id.as_str(), "UxeePXLdng7");
        assert_eq!(profile.default_page_size.get(), 10);
        assert_eq!(profile.qr_size, 80);
        assert_eq!(profile.logo_url.as_deref(), Some("/assets/moh.png"));
    }

    #[test]
    fn invalid_program_id_is_rejected() {
        let mut config = config();
        config.program_id = "not-a-uid".into();
        assert!(ReportProfile::try_from(&config).is_err());
    }

    #[test]
    fn unsupported_page_size_is_rejected() {
        let mut config = config();
        config.default_page_size = 11;
        assert_eq!(
            ReportProfile::try_from(&config),
            Err(TypeConstraintError::InvalidPageSize(11))
        );
    }
}
