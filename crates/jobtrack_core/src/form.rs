//! Form Collector: turns raw form input into validated request values.
//!
//! Validation never touches the network. The order of checks is fixed:
//! credentials, files, column selections, target.

use std::path::{Path, PathBuf};

use crate::{Credentials, ValidationError};

pub const USERNAME_FIELD: &str = "app_username";
pub const PASSWORD_FIELD: &str = "app_password";
pub const TARGET_FIELD: &str = "vessel";
/// File part name used by the field discovery endpoint.
pub const DISCOVERY_FILE_FIELD: &str = "excel";
/// Label of the leading empty entry of a column select control.
pub const COLUMN_PLACEHOLDER: &str = "Select column…";

pub const UPLOAD_SLOTS: usize = 2;
const FILE_FIELDS: [&str; UPLOAD_SLOTS] = ["excel1", "excel2"];
const COLUMN_FIELDS: [&str; UPLOAD_SLOTS] = ["col1", "col2"];

/// Editable text inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Username,
    Password,
    Target,
    Column(usize),
}

/// One file input paired with the column chosen from that file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadSlot {
    pub file: Option<PathBuf>,
    pub column: String,
}

/// Current, unvalidated values of every form input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    pub username: String,
    pub password: String,
    pub target: String,
    pub uploads: [UploadSlot; UPLOAD_SLOTS],
}

impl FormInput {
    pub fn set(&mut self, field: FormField, value: String) -> bool {
        match field {
            FormField::Username => self.username = value,
            FormField::Password => self.password = value,
            FormField::Target => self.target = value,
            FormField::Column(slot) => match self.uploads.get_mut(slot) {
                Some(upload) => upload.column = value,
                None => return false,
            },
        }
        true
    }

    fn credentials(&self) -> Credentials {
        Credentials::new(self.username.as_str(), self.password.as_str())
    }
}

/// A local file bound to the multipart field it is sent under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    field: String,
    path: PathBuf,
}

impl FileHandle {
    pub fn new(field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            field: field.into(),
            path: path.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name sent with the part; falls back to the field name.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.field.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub value: String,
}

/// Validated job submission. Only obtainable through [`collect_job_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    credentials: Credentials,
    target: String,
    selections: Vec<Selection>,
    files: Vec<FileHandle>,
}

impl JobRequest {
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }
}

/// Validated "list the columns of this file" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRequest {
    credentials: Credentials,
    file: FileHandle,
}

impl FieldRequest {
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn file(&self) -> &FileHandle {
        &self.file
    }
}

pub fn collect_job_request(form: &FormInput) -> Result<JobRequest, ValidationError> {
    let credentials = form.credentials();
    if !credentials.is_complete() {
        return Err(ValidationError::MissingCredentials);
    }

    let files = form
        .uploads
        .iter()
        .zip(FILE_FIELDS)
        .map(|(upload, field)| upload.file.as_ref().map(|path| FileHandle::new(field, path)))
        .collect::<Option<Vec<_>>>()
        .ok_or(ValidationError::MissingFiles)?;

    let selections = form
        .uploads
        .iter()
        .zip(COLUMN_FIELDS)
        .map(|(upload, name)| {
            (!upload.column.trim().is_empty()).then(|| Selection {
                name: name.to_string(),
                value: upload.column.clone(),
            })
        })
        .collect::<Option<Vec<_>>>()
        .ok_or(ValidationError::MissingSelections)?;

    if form.target.trim().is_empty() {
        return Err(ValidationError::MissingTarget);
    }

    Ok(JobRequest {
        credentials,
        target: form.target.clone(),
        selections,
        files,
    })
}

pub fn collect_field_request(
    form: &FormInput,
    slot: usize,
) -> Result<FieldRequest, ValidationError> {
    let credentials = form.credentials();
    if !credentials.is_complete() {
        return Err(ValidationError::MissingCredentials);
    }
    let path = form
        .uploads
        .get(slot)
        .and_then(|upload| upload.file.as_ref())
        .ok_or(ValidationError::MissingFiles)?;

    Ok(FieldRequest {
        credentials,
        file: FileHandle::new(DISCOVERY_FILE_FIELD, path),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Options for a column select control, placeholder first.
pub fn select_options(fields: &[String]) -> Vec<SelectOption> {
    let mut options = Vec::with_capacity(fields.len() + 1);
    options.push(SelectOption {
        value: String::new(),
        label: COLUMN_PLACEHOLDER.to_string(),
    });
    options.extend(fields.iter().map(|field| SelectOption {
        value: field.clone(),
        label: field.clone(),
    }));
    options
}
