//! Server-rendered HTML pages

use igce_core::forms::{FieldKind, FieldSpec, FormErrors, FormValues};
use igce_core::models::{Database, UploadRecord};

use crate::flash::Flash;

/// Escape text for use in element content and quoted attributes
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, username: &str, flash: Option<&Flash>, body: &str) -> String {
    let flash_html = flash
        .map(|f| {
            format!(
                "<div class=\"alert alert-{}\" role=\"alert\">{}</div>\n",
                f.category,
                escape(&f.message)
            )
        })
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<header><span class=\"user\">{user}</span></header>\n<main>\n{flash}<h1>{title}</h1>\n{body}</main>\n</body>\n</html>\n",
        title = escape(title),
        user = escape(username),
        flash = flash_html,
        body = body,
    )
}

/// An upload form, fresh or redisplayed with errors
pub struct FormPage<'a> {
    pub title: &'a str,
    pub action: &'a str,
    pub username: &'a str,
    pub fields: &'a [FieldSpec],
    pub values: &'a FormValues,
    pub errors: &'a FormErrors,
    /// Choices for the database field
    pub databases: &'a [Database],
    pub flash: Option<&'a Flash>,
}

impl FormPage<'_> {
    pub fn render(&self) -> String {
        let mut body = format!(
            "<form method=\"post\" action=\"{}\" enctype=\"multipart/form-data\">\n",
            escape(self.action)
        );
        for field in self.fields {
            body.push_str(&self.render_field(field));
        }
        body.push_str("<button type=\"submit\">Save</button>\n</form>\n");
        layout(self.title, self.username, self.flash, &body)
    }

    fn render_field(&self, field: &FieldSpec) -> String {
        let value = self.values.get(field.name).map(String::as_str).unwrap_or("");
        let required = if field.required { " required" } else { "" };
        let name = escape(field.name);

        let input = match &field.kind {
            FieldKind::Text => format!(
                "<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\"{required}>",
                escape(value)
            ),
            FieldKind::Date { .. } => format!(
                "<input type=\"date\" id=\"{name}\" name=\"{name}\" value=\"{}\"{required}>",
                escape(value)
            ),
            FieldKind::Schema => {
                let mut schemas: Vec<&str> = self
                    .databases
                    .iter()
                    .flat_map(|db| db.schemas_allowed_for_csv_upload.iter().map(String::as_str))
                    .collect();
                schemas.sort_unstable();
                schemas.dedup();
                let options = schemas
                    .iter()
                    .map(|s| format!("<option value=\"{}\">", escape(s)))
                    .collect::<String>();
                format!(
                    "<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\" list=\"{name}-options\"{required}><datalist id=\"{name}-options\">{options}</datalist>",
                    escape(value)
                )
            }
            FieldKind::File => format!(
                "<input type=\"file\" id=\"{name}\" name=\"{name}\" accept=\".csv\"{required}>"
            ),
            FieldKind::Select(choices) => {
                let options = choices
                    .iter()
                    .map(|(choice, label)| option(choice, label, value))
                    .collect::<String>();
                format!("<select id=\"{name}\" name=\"{name}\"{required}>{options}</select>")
            }
            FieldKind::Database => {
                let options = self
                    .databases
                    .iter()
                    .map(|db| option(&db.id.to_string(), &db.database_name, value))
                    .collect::<String>();
                format!("<select id=\"{name}\" name=\"{name}\"{required}>{options}</select>")
            }
        };

        let description = field
            .description
            .map(|d| format!("<small class=\"help\">{}</small>", escape(d)))
            .unwrap_or_default();
        let errors = self.errors.get(field.name);
        let errors_html = if errors.is_empty() {
            String::new()
        } else {
            let items = errors
                .iter()
                .map(|e| format!("<li>{}</li>", escape(e)))
                .collect::<String>();
            format!("<ul class=\"errors\">{}</ul>", items)
        };

        format!(
            "<div class=\"field\">\n<label for=\"{name}\">{}</label>\n{input}\n{description}{errors_html}\n</div>\n",
            escape(field.label)
        )
    }
}

fn option(value: &str, label: &str, selected: &str) -> String {
    let selected = if value == selected { " selected" } else { "" };
    format!(
        "<option value=\"{}\"{}>{}</option>",
        escape(value),
        selected,
        escape(label)
    )
}

/// IGCE landing page listing the user's latest uploads
pub fn render_upload_index(
    username: &str,
    flash: Option<&Flash>,
    uploads: &[UploadRecord],
    upload_path: &str,
) -> String {
    let mut body = format!(
        "<p><a href=\"{}\">Upload a new IGCE</a></p>\n",
        escape(upload_path)
    );
    if uploads.is_empty() {
        body.push_str("<p class=\"empty\">No uploads yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>File</th><th>Solicitation</th><th>Schema</th><th>Size</th><th>Uploaded</th></tr></thead>\n<tbody>\n",
        );
        for upload in uploads {
            let solicitation = upload
                .metadata
                .get("solicitation")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&upload.original_filename),
                escape(solicitation),
                escape(upload.schema_name.as_deref().unwrap_or("")),
                upload.size_bytes,
                upload.uploaded_at.format("%Y-%m-%d %H:%M"),
            ));
        }
        body.push_str("</tbody>\n</table>\n");
    }
    layout("IGCE", username, flash, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use igce_core::forms::{default_values, UploadForm};
    use igce_core::IgceUploadForm;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<a href=\"x\">&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_form_renders_defaults_errors_and_choices() {
        let fields = IgceUploadForm::fields();
        let mut values = default_values::<IgceUploadForm>();
        values.insert("database".to_string(), "2".to_string());
        let mut errors = FormErrors::default();
        errors.add("solicitation", "This field is required.");
        let databases = vec![Database {
            id: 2,
            database_name: "warehouse".to_string(),
            allow_csv_upload: true,
            schemas_allowed_for_csv_upload: vec!["ops".to_string(), "finance".to_string()],
        }];

        let html = FormPage {
            title: IgceUploadForm::TITLE,
            action: "/igce/upload",
            username: "analyst",
            fields: &fields,
            values: &values,
            errors: &errors,
            databases: &databases,
            flash: None,
        }
        .render();

        assert!(html.contains("<title>IGCE Upload Form</title>"));
        assert!(html.contains("value=\"Department of Treasury\""));
        assert!(html.contains("<option value=\"2\" selected>warehouse</option>"));
        assert!(html.contains("<li>This field is required.</li>"));
        assert!(html.contains("type=\"file\" id=\"location\" name=\"location\""));
        assert!(html.contains(
            "<datalist id=\"schema-options\"><option value=\"finance\"><option value=\"ops\"></datalist>"
        ));
    }

    #[test]
    fn test_index_shows_flash_and_empty_state() {
        let flash = Flash::success("Uploaded <estimate.csv>");
        let html = render_upload_index("analyst", Some(&flash), &[], "/igce/upload");
        assert!(html.contains("alert-success"));
        assert!(html.contains("Uploaded &lt;estimate.csv&gt;"));
        assert!(html.contains("No uploads yet."));
    }
}
