use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use jobtrack_core::{EndpointPaths, FormField, PollSchedule, UPLOAD_SLOTS};
use jobtrack_engine::HttpSettings;
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "./jobtrack.ron";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub file: Option<PathBuf>,
    pub column: String,
}

/// Values typed into the form before pressing Start.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub username: String,
    pub password: String,
    pub vessel: String,
    pub uploads: Vec<UploadConfig>,
}

impl FormConfig {
    pub fn text_fields(&self) -> Vec<(FormField, String)> {
        let mut fields = vec![
            (FormField::Username, self.username.clone()),
            (FormField::Password, self.password.clone()),
            (FormField::Target, self.vessel.clone()),
        ];
        fields.extend(
            self.uploads
                .iter()
                .take(UPLOAD_SLOTS)
                .enumerate()
                .map(|(slot, upload)| (FormField::Column(slot), upload.column.clone())),
        );
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub submit_path: String,
    pub status_path: String,
    pub fields_path: String,
    pub download_path: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub first_poll_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub log_destination: LogDestination,
    pub verbose: bool,
    pub form: FormConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let paths = EndpointPaths::default();
        let schedule = PollSchedule::default();
        let http = HttpSettings::default();
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            submit_path: paths.submit,
            status_path: paths.status,
            fields_path: paths.fields,
            download_path: paths.download,
            connect_timeout_ms: millis(http.connect_timeout),
            request_timeout_ms: millis(http.request_timeout),
            first_poll_delay_ms: millis(schedule.first_delay),
            poll_interval_ms: millis(schedule.interval),
            log_destination: LogDestination::default(),
            verbose: false,
            form: FormConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn endpoint_paths(&self) -> EndpointPaths {
        EndpointPaths {
            submit: self.submit_path.clone(),
            status: self.status_path.clone(),
            fields: self.fields_path.clone(),
            download: self.download_path.clone(),
        }
    }

    pub fn poll_schedule(&self) -> PollSchedule {
        PollSchedule {
            first_delay: Duration::from_millis(self.first_poll_delay_ms),
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

/// Loads the config; a missing file yields defaults, a malformed one is an error.
pub fn load(path: &Path) -> anyhow::Result<(ClientConfig, bool)> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok((ClientConfig::default(), false));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };
    let config = ron::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok((config, true))
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let (config, found) = load(&temp.path().join("absent.ron")).unwrap();
        assert!(!found);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.poll_schedule(), PollSchedule::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jobtrack.ron");
        fs::write(
            &path,
            r#"(
                server_url: "https://pob.example.com",
                poll_interval_ms: 500,
                log_destination: Both,
                form: (
                    username: "operator",
                    vessel: "Aurora",
                    uploads: [(file: Some("crew.xlsx"), column: "NED")],
                ),
            )"#,
        )
        .unwrap();

        let (config, found) = load(&path).unwrap();
        assert!(found);
        assert_eq!(config.server_url, "https://pob.example.com");
        assert_eq!(config.poll_schedule().interval, Duration::from_millis(500));
        assert_eq!(config.poll_schedule().first_delay, Duration::from_secs(1));
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.form.uploads[0].file, Some(PathBuf::from("crew.xlsx")));
        assert_eq!(
            config.form.text_fields().last(),
            Some(&(FormField::Column(0), "NED".to_string()))
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jobtrack.ron");
        fs::write(&path, "(server_url: 42").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().starts_with("parsing config"));
    }
}
