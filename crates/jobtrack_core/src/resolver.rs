//! Result Resolver: download locators for a completed job.

use crate::{ApiLayout, Credentials};

/// Output artifacts of every completed job, in display order.
pub const ARTIFACTS: [&str; 2] = ["excel1", "excel2"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub artifact: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDescriptor {
    pub links: [DownloadLink; 2],
}

/// Pure construction; the same inputs always give the same locators.
pub fn resolve_downloads(
    layout: &ApiLayout,
    download_token: &str,
    credentials: &Credentials,
) -> DownloadDescriptor {
    DownloadDescriptor {
        links: ARTIFACTS.map(|artifact| DownloadLink {
            artifact: artifact.to_string(),
            url: layout
                .download_url(download_token, artifact, credentials)
                .to_string(),
        }),
    }
}
