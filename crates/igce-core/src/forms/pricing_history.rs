use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use validator::Validate;

use super::{
    optional_text, parse_date, required_database_id, required_text, FieldSpec, FormErrors,
    FormValues, UploadForm, DATABASE_FIELD, FILE_FIELD, NOT_A_VALID_CHOICE, NOT_A_VALID_DATE,
    SCHEMA_FIELD,
};
use crate::access::SchemaPolicy;
use crate::models::{UploadKind, UploadTarget};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const PERFORMANCE_DATE_REQUIRED: &str = "please select performance date";

/// Offeror or vendor a pricing history belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorName {
    Vendor1,
    Vendor2,
    Vendor3,
}

impl VendorName {
    pub const ALL: [VendorName; 3] = [VendorName::Vendor1, VendorName::Vendor2, VendorName::Vendor3];

    pub fn as_str(&self) -> &'static str {
        match self {
            VendorName::Vendor1 => "vendor1",
            VendorName::Vendor2 => "vendor2",
            VendorName::Vendor3 => "vendor3",
        }
    }

    pub fn label(&self) -> &'static str {
        self.as_str()
    }

    fn choices() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|v| (v.as_str(), v.label())).collect()
    }
}

impl FromStr for VendorName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

/// Pricing-history upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingHistoryUploadForm {
    pub name_of_vendor: VendorName,
    pub performance_date: NaiveDate,
    pub rep_rfq: String,
    pub project_name: String,
    pub database_id: i32,
    pub schema: Option<String>,
}

/// Free-text fields, length-checked whether or not vendor and date parse
#[derive(Validate)]
struct TextFields {
    #[validate(length(max = 255, message = "Field cannot be longer than 255 characters."))]
    rep_rfq: String,
    #[validate(length(max = 255, message = "Field cannot be longer than 255 characters."))]
    project_name: String,
    #[validate(length(max = 255, message = "Field cannot be longer than 255 characters."))]
    schema: Option<String>,
}

/// Today's date in the form's date format
pub fn default_performance_date() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

impl UploadForm for PricingHistoryUploadForm {
    const KIND: UploadKind = UploadKind::PricingHistory;
    const TITLE: &'static str = "CSV to Database configuration";
    const POLICY: SchemaPolicy = SchemaPolicy::PricingHistory;

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::select(
                "name_of_vendor",
                "Name of Offeror or Vendor",
                VendorName::choices(),
            )
            .with_description("Name of Offeror/Vendor"),
            FieldSpec::date("performance_date", "Performance Date", DATE_FORMAT)
                .with_default(default_performance_date()),
            FieldSpec::text("rep_rfq", "RFP/RFQ#"),
            FieldSpec::text("project_name", "Project Name"),
            FieldSpec::database(DATABASE_FIELD, "Database"),
            FieldSpec::schema(SCHEMA_FIELD, "Schema").optional(),
            FieldSpec::file(FILE_FIELD, "File"),
        ]
    }

    fn bind(values: &FormValues) -> Result<Self, FormErrors> {
        let mut errors = FormErrors::default();

        let vendor_raw = required_text(values, "name_of_vendor", &mut errors);
        let name_of_vendor = match vendor_raw.parse::<VendorName>() {
            Ok(vendor) => Some(vendor),
            Err(()) => {
                if !vendor_raw.is_empty() {
                    errors.add("name_of_vendor", NOT_A_VALID_CHOICE);
                }
                None
            }
        };

        let date_raw = optional_text(values, "performance_date");
        let performance_date = match date_raw {
            None => {
                errors.add("performance_date", PERFORMANCE_DATE_REQUIRED);
                None
            }
            Some(ref raw) => {
                let parsed = parse_date(raw, DATE_FORMAT);
                if parsed.is_none() {
                    errors.add("performance_date", NOT_A_VALID_DATE);
                }
                parsed
            }
        };

        let text = TextFields {
            rep_rfq: required_text(values, "rep_rfq", &mut errors),
            project_name: required_text(values, "project_name", &mut errors),
            schema: optional_text(values, SCHEMA_FIELD),
        };
        if let Err(validation) = text.validate() {
            errors.merge(validation.into());
        }
        let database_id = required_database_id(values, &mut errors);

        let (Some(name_of_vendor), Some(performance_date)) = (name_of_vendor, performance_date)
        else {
            return Err(errors);
        };

        errors.into_result(PricingHistoryUploadForm {
            name_of_vendor,
            performance_date,
            rep_rfq: text.rep_rfq,
            project_name: text.project_name,
            database_id,
            schema: text.schema,
        })
    }

    fn target(&self) -> UploadTarget {
        UploadTarget {
            database_id: self.database_id,
            schema: self.schema.clone(),
        }
    }
}
