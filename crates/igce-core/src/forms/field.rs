//! Field declarations shared by rendering and validation

/// Input widget and value type of a form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Fixed option set as `(value, label)` pairs
    Select(Vec<(&'static str, &'static str)>),
    Date { format: &'static str },
    /// Select populated with the databases the user may upload into
    Database,
    /// Free-text schema name, suggested from the listed databases' schema allow-lists
    Schema,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub description: Option<&'static str>,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<String>,
}

impl FieldSpec {
    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            description: None,
            kind: FieldKind::Text,
            required: true,
            default: None,
        }
    }

    pub fn select(
        name: &'static str,
        label: &'static str,
        choices: Vec<(&'static str, &'static str)>,
    ) -> Self {
        Self {
            kind: FieldKind::Select(choices),
            ..Self::text(name, label)
        }
    }

    pub fn date(name: &'static str, label: &'static str, format: &'static str) -> Self {
        Self {
            kind: FieldKind::Date { format },
            ..Self::text(name, label)
        }
    }

    pub fn database(name: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Database,
            ..Self::text(name, label)
        }
    }

    pub fn schema(name: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Schema,
            ..Self::text(name, label)
        }
    }

    pub fn file(name: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::File,
            ..Self::text(name, label)
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}
