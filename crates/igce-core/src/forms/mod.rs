//! Upload forms
//!
//! Each form declares its fields (`FieldSpec`) for rendering and binds submitted text values
//! into a typed struct. Checks shared by every upload form (file presence, target database,
//! schema permission) live in [`FormSubmission::validate`].

mod errors;
mod field;
mod igce;
mod pricing_history;

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::access::{is_schema_allowed, SchemaPolicy, SecurityManager};
use crate::catalog::DatabaseCatalog;
use crate::error::AppError;
use crate::models::{Database, UploadKind, UploadTarget, UploadedFile, UserContext};

pub use errors::{
    FormErrors, EXTENSION_NOT_ALLOWED, NOT_A_VALID_CHOICE, NOT_A_VALID_DATE, REQUIRED, TOO_LONG,
};
pub use field::{FieldKind, FieldSpec};
pub use igce::IgceUploadForm;
pub use pricing_history::{PricingHistoryUploadForm, VendorName};

pub const FILE_FIELD: &str = "location";
/// Longest client filename the upload log can store
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const DATABASE_FIELD: &str = "database";
pub const SCHEMA_FIELD: &str = "schema";

/// Submitted text values keyed by field name
pub type FormValues = HashMap<String, String>;

pub trait UploadForm: Serialize + Sized + Send + Sync {
    const KIND: UploadKind;
    const TITLE: &'static str;
    const POLICY: SchemaPolicy;

    /// Field declarations, with defaults evaluated now
    fn fields() -> Vec<FieldSpec>;

    /// Bind and validate the form's own fields
    fn bind(values: &FormValues) -> Result<Self, FormErrors>;

    fn target(&self) -> UploadTarget;

    fn metadata(&self) -> Result<serde_json::Value, AppError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Default values of `F` for a fresh form
pub fn default_values<F: UploadForm>() -> FormValues {
    F::fields()
        .into_iter()
        .filter_map(|field| field.default.map(|value| (field.name.to_string(), value)))
        .collect()
}

/// A form that passed every check, ready for ingestion
#[derive(Debug)]
pub struct ValidatedUpload<F> {
    pub form: F,
    pub database: Database,
    pub schema: Option<String>,
    pub file: UploadedFile,
}

/// A rejected submission; the uploaded file has already been discarded
#[derive(Debug)]
pub struct RejectedSubmission {
    pub values: FormValues,
    pub errors: FormErrors,
}

/// Everything received on a POST
#[derive(Debug, Default)]
pub struct FormSubmission {
    pub values: FormValues,
    pub file: Option<UploadedFile>,
}

impl FormSubmission {
    /// Run the form validators, the file checks and the target database checks.
    ///
    /// `Err` carries collaborator failures; a rejected form is `Ok(Err(_))`.
    pub async fn validate<F: UploadForm>(
        self,
        user: &UserContext,
        catalog: &dyn DatabaseCatalog,
        security: &dyn SecurityManager,
        allowed_extensions: &[String],
    ) -> Result<Result<ValidatedUpload<F>, RejectedSubmission>, AppError> {
        let FormSubmission { values, file } = self;
        let mut errors = FormErrors::default();

        if let Err(message) = check_file(file.as_ref(), allowed_extensions) {
            errors.add(FILE_FIELD, message);
        }

        let form = match F::bind(&values) {
            Ok(form) => Some(form),
            Err(form_errors) => {
                errors.merge(form_errors);
                None
            }
        };

        let mut database = None;
        if let Some(ref form) = form {
            let target = form.target();
            let found = catalog.get_database(target.database_id).await?;
            let permitted = match found {
                Some(ref db) if db.allow_csv_upload => {
                    F::POLICY.upload_allowed(security, user, db).await?
                }
                _ => false,
            };
            match found {
                Some(db) if permitted => {
                    if is_schema_allowed(security, user, &db, target.schema.as_deref()).await? {
                        database = Some(db);
                    } else {
                        errors.add(
                            SCHEMA_FIELD,
                            format!(
                                "Schema \"{}\" is not allowed for csv uploads in database \"{}\".",
                                target.schema.as_deref().unwrap_or_default(),
                                db.database_name
                            ),
                        );
                    }
                }
                _ => errors.add(DATABASE_FIELD, NOT_A_VALID_CHOICE),
            }
        }

        match (form, database, file) {
            (Some(form), Some(database), Some(file)) if errors.is_empty() => {
                let schema = form.target().schema;
                Ok(Ok(ValidatedUpload {
                    form,
                    database,
                    schema,
                    file,
                }))
            }
            _ => Ok(Err(RejectedSubmission { values, errors })),
        }
    }
}

/// File must be attached with a filename and an allowed extension
pub fn check_file(
    file: Option<&UploadedFile>,
    allowed_extensions: &[String],
) -> Result<(), &'static str> {
    let file = match file {
        Some(file) if !file.original_filename.trim().is_empty() => file,
        _ => return Err(REQUIRED),
    };
    if file.original_filename.chars().count() > MAX_FILENAME_LENGTH {
        return Err(TOO_LONG);
    }
    match file.extension() {
        Some(ext) if allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)) => Ok(()),
        _ => Err(EXTENSION_NOT_ALLOWED),
    }
}

/// Trimmed value of a required text field
fn required_text(values: &FormValues, field: &str, errors: &mut FormErrors) -> String {
    let value = values
        .get(field)
        .map(|v| v.trim().to_string())
        .unwrap_or_default();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    }
    value
}

fn optional_text(values: &FormValues, field: &str) -> Option<String> {
    values
        .get(field)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_database_id(values: &FormValues, errors: &mut FormErrors) -> i32 {
    let raw = required_text(values, DATABASE_FIELD, errors);
    if raw.is_empty() {
        return 0;
    }
    match raw.parse::<i32>() {
        Ok(id) => id,
        Err(_) => {
            errors.add(DATABASE_FIELD, NOT_A_VALID_CHOICE);
            0
        }
    }
}

fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), format).ok()
}
