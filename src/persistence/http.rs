use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{PersistenceError, PersistenceResult, ProjectRecord, ProjectStore, SaveRequest, SavedProject};

/// `{ success, message, data }` as sent by the backend
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CreatedProject {
    id: Option<String>,
    share_token: Option<String>,
}

/// Talks to the site backend's `/visualiser` endpoints
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    api_url: String,
}

fn transport(e: reqwest::Error) -> PersistenceError {
    PersistenceError::Transport(e.to_string())
}

impl HttpStore {
    pub fn new(api_url: impl Into<String>) -> PersistenceResult<Self> {
        let client = Client::builder().build().map_err(transport)?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("{}/visualiser{}", self.api_url, suffix)
    }

    fn read_envelope<T: DeserializeOwned>(response: Response) -> PersistenceResult<Option<T>> {
        let status = response.status();
        let body = response.text().map_err(transport)?;
        let envelope: Option<Envelope<T>> = serde_json::from_str(&body).ok();
        if !status.is_success() {
            let message = envelope
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_owned());
            return Err(PersistenceError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        match envelope {
            Some(envelope) => Ok(envelope.data),
            None => Err(PersistenceError::Transport(format!(
                "unexpected response body from {}",
                status
            ))),
        }
    }
}

impl ProjectStore for HttpStore {
    fn save(&self, id: Option<&str>, request: &SaveRequest) -> PersistenceResult<SavedProject> {
        if let Some(id) = id {
            // the backend only exposes create; every save gets a fresh id
            log::debug!("Backend cannot overwrite project {}, creating a new one", id);
        }
        let response = self
            .client
            .post(self.endpoint(""))
            .json(request)
            .send()
            .map_err(transport)?;
        let created: Option<CreatedProject> = Self::read_envelope(response)?;
        created
            .and_then(|c| c.id.or(c.share_token))
            .map(|id| SavedProject { id })
            .ok_or_else(|| PersistenceError::Transport("response did not include a project id".to_owned()))
    }

    fn fetch(&self, id: &str) -> PersistenceResult<ProjectRecord> {
        let response = self
            .client
            .get(self.endpoint(&format!("/{}", id)))
            .send()
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(PersistenceError::NotFound(id.to_owned()));
        }
        Self::read_envelope(response)?.ok_or_else(|| PersistenceError::NotFound(id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_ignore_trailing_slash() {
        let store = HttpStore::new("http://localhost:4000/api/").unwrap();
        assert_eq!(store.endpoint(""), "http://localhost:4000/api/visualiser");
        assert_eq!(store.endpoint("/abc"), "http://localhost:4000/api/visualiser/abc");
    }

    #[test]
    fn created_project_falls_back_to_share_token() {
        let body = r#"{"success":true,"message":"Project saved","data":{"share_token":"tok"}}"#;
        let envelope: Envelope<CreatedProject> = serde_json::from_str(body).unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.id.or(data.share_token).as_deref(), Some("tok"));
    }
}
