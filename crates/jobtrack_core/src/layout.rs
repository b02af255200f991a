use thiserror::Error;
use url::Url;

use crate::{Credentials, JobHandle, PASSWORD_FIELD, USERNAME_FIELD};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("invalid server url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("server url {0} cannot carry endpoint paths")]
    NotABase(String),
}

/// Endpoint paths relative to the server base, `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPaths {
    pub submit: String,
    pub status: String,
    pub fields: String,
    pub download: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            submit: "api/jobs".to_string(),
            status: "api/jobs".to_string(),
            fields: "api/excel/headers".to_string(),
            download: "download".to_string(),
        }
    }
}

/// Where each backend endpoint lives. Dynamic segments are percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiLayout {
    base: Url,
    paths: EndpointPaths,
}

impl ApiLayout {
    pub fn new(base_url: &str, paths: EndpointPaths) -> Result<Self, LayoutError> {
        let base = Url::parse(base_url).map_err(|source| LayoutError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(LayoutError::NotABase(base_url.to_string()));
        }
        Ok(Self { base, paths })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn submit_url(&self) -> Url {
        self.endpoint(&self.paths.submit, &[])
    }

    pub fn status_url(&self, handle: &JobHandle, credentials: &Credentials) -> Url {
        let mut url = self.endpoint(&self.paths.status, &[handle.as_str()]);
        append_credentials(&mut url, credentials);
        url
    }

    pub fn fields_url(&self) -> Url {
        self.endpoint(&self.paths.fields, &[])
    }

    pub fn download_url(&self, token: &str, artifact: &str, credentials: &Credentials) -> Url {
        let mut url = self.endpoint(&self.paths.download, &[token, artifact]);
        append_credentials(&mut url, credentials);
        url
    }

    fn endpoint(&self, path: &str, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        // `new` rejects cannot-be-a-base urls, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|segment| !segment.is_empty()))
                .extend(tail);
        }
        url
    }
}

fn append_credentials(url: &mut Url, credentials: &Credentials) {
    url.query_pairs_mut()
        .append_pair(USERNAME_FIELD, credentials.username())
        .append_pair(PASSWORD_FIELD, credentials.password());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(base: &str) -> ApiLayout {
        ApiLayout::new(base, EndpointPaths::default()).expect("valid base")
    }

    #[test]
    fn endpoints_join_onto_bare_host() {
        let layout = layout("http://127.0.0.1:8000");
        assert_eq!(layout.submit_url().as_str(), "http://127.0.0.1:8000/api/jobs");
        assert_eq!(
            layout.fields_url().as_str(),
            "http://127.0.0.1:8000/api/excel/headers"
        );
    }

    #[test]
    fn endpoints_keep_base_prefix() {
        let layout = layout("https://tools.example.com/pob/");
        assert_eq!(
            layout.submit_url().as_str(),
            "https://tools.example.com/pob/api/jobs"
        );
    }

    #[test]
    fn status_url_encodes_id_and_credentials() {
        let layout = layout("http://localhost:8000");
        let url = layout.status_url(
            &JobHandle::new("a/b c"),
            &Credentials::new("op", "p&ss word"),
        );
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/jobs/a%2Fb%20c?app_username=op&app_password=p%26ss+word"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert_eq!(
            ApiLayout::new("mailto:ops@example.com", EndpointPaths::default()),
            Err(LayoutError::NotABase("mailto:ops@example.com".to_string()))
        );
        assert!(matches!(
            ApiLayout::new("not a url", EndpointPaths::default()),
            Err(LayoutError::InvalidUrl { .. })
        ));
    }
}
