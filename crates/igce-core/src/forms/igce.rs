use serde::Serialize;
use validator::Validate;

use super::{
    optional_text, required_database_id, required_text, FieldSpec, FormErrors, FormValues,
    UploadForm, DATABASE_FIELD, FILE_FIELD, SCHEMA_FIELD,
};
use crate::access::SchemaPolicy;
use crate::models::{UploadKind, UploadTarget};

pub const DEFAULT_DEPARTMENT: &str = "Department of Treasury";
pub const DEFAULT_AGENCY: &str = "IRS";

/// Independent Government Cost Estimate upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct IgceUploadForm {
    #[validate(length(max = 255, message = "Field cannot be longer than 255 characters."))]
    pub department: String,
    #[validate(length(max = 255, message = "Field cannot be longer than 255 characters."))]
    pub agency: String,
    #[validate(length(max = 255, message = "Field cannot be longer than 255 characters."))]
    pub solicitation: String,
    pub database_id: i32,
    #[validate(length(max = 255, message = "Field cannot be longer than 255 characters."))]
    pub schema: Option<String>,
}

impl UploadForm for IgceUploadForm {
    const KIND: UploadKind = UploadKind::Igce;
    const TITLE: &'static str = "IGCE Upload Form";
    const POLICY: SchemaPolicy = SchemaPolicy::Igce;

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("department", "Department").with_default(DEFAULT_DEPARTMENT),
            FieldSpec::text("agency", "Agency").with_default(DEFAULT_AGENCY),
            FieldSpec::text("solicitation", "Solicitation"),
            FieldSpec::database(DATABASE_FIELD, "Database"),
            FieldSpec::schema(SCHEMA_FIELD, "Schema")
                .optional()
                .with_description("Leave empty to upload into the default schema"),
            FieldSpec::file(FILE_FIELD, "File"),
        ]
    }

    fn bind(values: &FormValues) -> Result<Self, FormErrors> {
        let mut errors = FormErrors::default();
        let form = IgceUploadForm {
            department: required_text(values, "department", &mut errors),
            agency: required_text(values, "agency", &mut errors),
            solicitation: required_text(values, "solicitation", &mut errors),
            database_id: required_database_id(values, &mut errors),
            schema: optional_text(values, SCHEMA_FIELD),
        };
        if let Err(validation) = form.validate() {
            errors.merge(validation.into());
        }
        errors.into_result(form)
    }

    fn target(&self) -> UploadTarget {
        UploadTarget {
            database_id: self.database_id,
            schema: self.schema.clone(),
        }
    }
}
