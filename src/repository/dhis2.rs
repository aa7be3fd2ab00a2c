//! Blocking HTTP client for the remote DHIS2 Web API.
//!
//! All methods block the calling thread. Inside Actix handlers they must run
//! on the blocking pool (`web::block`), and the repository itself has to be
//! constructed outside of an async context.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;

use crate::domain::event::EventPage;
use crate::domain::org_unit::OrgUnitNode;
use crate::domain::period::ISO_DATE_FORMAT;
use crate::domain::report::EventQuery;
use crate::domain::types::Uid;
use crate::models::config::ServerConfig;
use crate::models::dhis2::{
    EventsResponse, OrganisationUnitChildIds, OrganisationUnitChildren, OrganisationUnitsResponse,
    into_nodes,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{EventReader, OrgUnitReader};

const EVENT_FIELDS: &str = "event,eventDate,dataValues[dataElement,value],orgUnit,orgUnitName";
const ROOT_FIELDS: &str = "id,displayName,path,children::isNotEmpty";
const CHILD_ID_FIELDS: &str = "id,displayName,children[id]";
const CHILD_NODE_FIELDS: &str = "children[id,displayName,path,children::isNotEmpty]";

/// How requests authenticate against the remote instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Anonymous,
    Basic { username: String, password: String },
    /// Personal access token, sent as `Authorization: ApiToken <token>`.
    Token(String),
}

impl Credentials {
    pub fn from_config(config: &ServerConfig) -> Self {
        if let Some(token) = config.dhis2_token.as_ref().filter(|t| !t.is_empty()) {
            return Credentials::Token(token.clone());
        }
        match (&config.dhis2_username, &config.dhis2_password) {
            (Some(username), Some(password)) if !username.is_empty() => Credentials::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            _ => Credentials::Anonymous,
        }
    }
}

#[derive(Clone)]
pub struct Dhis2Repository {
    client: Client,
    api_url: String,
    program_id: Uid,
    credentials: Credentials,
}

impl Dhis2Repository {
    pub fn new(
        base_url: &str,
        program_id: Uid,
        credentials: Credentials,
        timeout: Duration,
    ) -> RepositoryResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: format!("{}/api", base_url.trim_end_matches('/')),
            program_id,
            credentials,
        })
    }

    pub fn from_config(config: &ServerConfig) -> RepositoryResult<Self> {
        Self::new(
            &config.dhis2_url,
            Uid::new(config.program_id.as_str())?,
            Credentials::from_config(config),
            Duration::from_secs(config.dhis2_timeout_secs),
        )
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> RepositoryResult<T> {
        let url = format!("{}/{}", self.api_url, path);
        let request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(query);
        let request = match &self.credentials {
            Credentials::Anonymous => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Token(token) => request.header(AUTHORIZATION, format!("ApiToken {token}")),
        };

        let response = request.send().map_err(|err| {
            log::error!("Request to {url} failed: {err}");
            RepositoryError::from(err)
        })?;
        let response = response.error_for_status().map_err(|err| {
            log::error!("Request to {url} was rejected: {err}");
            RepositoryError::from(err)
        })?;
        response.json::<T>().map_err(|err| {
            log::error!("Unexpected response from {url}: {err}");
            RepositoryError::Decode(err.to_string())
        })
    }
}

impl OrgUnitReader for Dhis2Repository {
    fn list_root_org_units(&self) -> RepositoryResult<Vec<OrgUnitNode>> {
        let response: OrganisationUnitsResponse = self.get(
            "organisationUnits",
            &[
                ("fields", ROOT_FIELDS.to_string()),
                ("paging", "false".to_string()),
                ("level", "1".to_string()),
            ],
        )?;
        Ok(into_nodes(response.organisation_units))
    }

    fn list_org_unit_children(&self, id: &Uid) -> RepositoryResult<Vec<OrgUnitNode>> {
        let response: OrganisationUnitChildren = self.get(
            &format!("organisationUnits/{id}"),
            &[("fields", CHILD_NODE_FIELDS.to_string())],
        )?;
        Ok(into_nodes(response.children))
    }

    fn count_org_unit_children(&self, id: &Uid) -> RepositoryResult<usize> {
        let response: OrganisationUnitChildIds = self.get(
            &format!("organisationUnits/{id}"),
            &[("fields", CHILD_ID_FIELDS.to_string())],
        )?;
        Ok(response.children.len())
    }
}

impl EventReader for Dhis2Repository {
    fn list_events(&self, query: &EventQuery) -> RepositoryResult<EventPage> {
        let response: EventsResponse = self.get(
            "events",
            &[
                ("program", self.program_id.to_string()),
                ("page", query.page.to_string()),
                ("pageSize", query.page_size.to_string()),
                ("totalPages", "true".to_string()),
                ("orgUnit", query.org_unit_id.to_string()),
                ("ouMode", query.scope_mode.as_str().to_string()),
                (
                    "startDate",
                    query.start_date.format(ISO_DATE_FORMAT).to_string(),
                ),
                ("endDate", query.end_date.format(ISO_DATE_FORMAT).to_string()),
                ("fields", EVENT_FIELDS.to_string()),
            ],
        )?;
        Ok(EventPage::from(response))
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
            dhis2_url: "https://dhis2.example.org/".into(),
            dhis2_username: Some("clerk".into()),
            dhis2_password: Some("district".into()),
            dhis2_token: None,
            dhis2_timeout_secs: 30,
            program_id: "UxeePXLdng7".into(),
            verification_url: "https://dev.southsudanhis.org".into(),
            date_format: "%d/%m/%Y".into(),
            default_page_size: 10,
            qr_size: 80,
            session_idle_minutes: 60,
            certificate_logo_url: None,
        }
    }

    #[test]
    fn token_takes_precedence_over_basic_auth() {
        let mut config = config();
        assert_eq!(
            Credentials::from_config(&config),
            Credentials::Basic {
                username: "clerk".into(),
                password: "district".into()
            }
        );
        config.dhis2_token = Some("d2pat_abc".into());
        assert_eq!(
            Credentials::from_config(&config),
            Credentials::Token("d2pat_abc".into())
        );
    }

    #[test]
    fn missing_credentials_mean_anonymous() {
        let mut config = config();
        config.dhis2_username = None;
        assert_eq!(Credentials::from_config(&config), Credentials::Anonymous);
    }
}
