//! Declarative model of the user form: field descriptors, their current
//! values, the inline error regions and the custom-property insertion point.

use crate::properties::property_label;
use crate::record::{UserRecord, ADMIN_ROLE};
use std::collections::HashMap;

/// Suffix that marks an element as data-bearing.
pub const FIELD_SUFFIX: &str = "_field";

/// Element id of the hidden identifier input.
pub const USER_ID_INPUT: &str = "user_id";

/// Element id after which custom property rows are inserted.
pub const PROPERTY_MARKER: &str = "property_marker";

/// Property names every user form starts with.
pub const BASE_PROPERTIES: &[&str] = &[
    "title",
    "firstname",
    "lastname",
    "email",
    "password",
    "middlename",
    "nickname",
    "gender",
    "phone",
    "picture",
    "website",
    "profile",
    "zoneinfo",
    "street",
    "locality",
    "region",
    "postalCode",
    "password_repeat",
];

/// Strip the trailing data suffix from an element id. Ids that do not end
/// with the suffix are not data-bearing and produce nothing.
pub fn process_input(element_id: &str, value: Option<&str>) -> Option<(String, Option<String>)> {
    let name = element_id.strip_suffix(FIELD_SUFFIX)?;
    Some((name.to_string(), value.map(|v| v.to_string())))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
    Select,
    Checkbox,
}

/// One data-bearing element of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub element_id: String,
    pub kind: FieldKind,
    pub label: String,
}

impl FieldDescriptor {
    pub fn new(name: &str, kind: FieldKind, label: &str) -> Self {
        Self {
            name: name.to_string(),
            element_id: format!("{}{}", name, FIELD_SUFFIX),
            kind,
            label: label.to_string(),
        }
    }

    /// Markup of a custom property row as inserted after the marker.
    pub fn render_row(&self) -> String {
        format!(
            "<div class=\"row\"><label class=\"span2\" for=\"{id}\">{label}</label>\
             <input id=\"{id}\" class=\"span4\" size=\"40\" value=\"\"></div>",
            id = escape_html(&self.element_id),
            label = escape_html(&self.label),
        )
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorRegion {
    Email,
    Password,
}

impl ErrorRegion {
    pub fn element_id(&self) -> &'static str {
        match self {
            ErrorRegion::Email => "email_errors",
            ErrorRegion::Password => "password_errors",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRow {
    Field(FieldDescriptor),
    Marker,
}

/// The live state of the page's form.
#[derive(Debug, Clone)]
pub struct UserForm {
    user_id: String,
    rows: Vec<FormRow>,
    values: HashMap<String, Option<String>>,
    admin_checked: bool,
    errors: HashMap<ErrorRegion, String>,
}

impl UserForm {
    /// The user form with the base property set, the marker after it, and the
    /// admin checkbox.
    pub fn standard(user_id: &str) -> Self {
        let mut rows: Vec<FormRow> = BASE_PROPERTIES
            .iter()
            .map(|name| FormRow::Field(FieldDescriptor::new(name, base_kind(name), &base_label(name))))
            .collect();
        rows.push(FormRow::Marker);
        rows.push(FormRow::Field(FieldDescriptor::new(
            ADMIN_ROLE,
            FieldKind::Checkbox,
            "Administrator",
        )));

        let mut values = HashMap::new();
        for row in &rows {
            if let FormRow::Field(field) = row {
                let initial = match field.kind {
                    // an unchecked checkbox still reports its value attribute
                    FieldKind::Checkbox => "on",
                    _ => "",
                };
                values.insert(field.element_id.clone(), Some(initial.to_string()));
            }
        }

        Self {
            user_id: user_id.to_string(),
            rows,
            values,
            admin_checked: false,
            errors: HashMap::new(),
        }
    }

    pub fn user_id_input(&self) -> &str {
        &self.user_id
    }

    pub fn set_user_id_input(&mut self, value: &str) {
        self.user_id = value.to_string();
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.rows.iter().filter_map(|row| match row {
            FormRow::Field(field) => Some(field),
            FormRow::Marker => None,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|f| f.name == name)
    }

    /// Set a field's value by property name. Returns false for unknown fields.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        let Some(element_id) = self.field(name).map(|f| f.element_id.clone()) else {
            return false;
        };
        self.values.insert(element_id, Some(value.to_string()));
        true
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        let field = self.field(name)?;
        self.values.get(&field.element_id).and_then(|v| v.as_deref())
    }

    pub fn set_admin(&mut self, checked: bool) {
        self.admin_checked = checked;
    }

    /// Whether the admin checkbox exists and is checked.
    pub fn admin_checked(&self) -> bool {
        self.admin_checked
            && self
                .fields()
                .any(|f| f.name == ADMIN_ROLE && f.kind == FieldKind::Checkbox)
    }

    /// Insert a row directly after the marker, ahead of earlier insertions.
    pub fn insert_after_marker(&mut self, field: FieldDescriptor) {
        let at = self
            .rows
            .iter()
            .position(|row| *row == FormRow::Marker)
            .map(|idx| idx + 1)
            .unwrap_or(self.rows.len());
        self.values.insert(field.element_id.clone(), Some(String::new()));
        self.rows.insert(at, FormRow::Field(field));
    }

    pub fn set_error(&mut self, region: ErrorRegion, text: &str) {
        self.errors.insert(region, text.to_string());
    }

    pub fn error_text(&self, region: ErrorRegion) -> &str {
        self.errors.get(&region).map(String::as_str).unwrap_or("")
    }

    /// Collect every data-bearing field into a fresh record.
    pub fn scan(&self) -> UserRecord {
        let mut record = UserRecord::new();
        for field in self.fields() {
            let value = self.values.get(&field.element_id).and_then(|v| v.as_deref());
            if let Some((key, value)) = process_input(&field.element_id, value) {
                record.set(key, value);
            }
        }
        record
    }

    /// Fill values from a stored record. Unknown keys get a custom row.
    pub fn prefill(&mut self, record: &UserRecord) {
        for (key, value) in record.iter() {
            if key == ADMIN_ROLE {
                self.admin_checked = value.is_some();
                continue;
            }
            if self.field(key).is_none() {
                self.insert_after_marker(FieldDescriptor::new(
                    key,
                    FieldKind::Text,
                    &property_label(key),
                ));
            }
            self.set_value(key, value.as_deref().unwrap_or(""));
        }
    }
}

fn base_kind(name: &str) -> FieldKind {
    match name {
        "password" | "password_repeat" => FieldKind::Password,
        "gender" => FieldKind::Select,
        _ => FieldKind::Text,
    }
}

fn base_label(name: &str) -> String {
    match name {
        "firstname" => "First name".to_string(),
        "lastname" => "Last name".to_string(),
        "middlename" => "Middle name".to_string(),
        "password_repeat" => "Repeat password".to_string(),
        "postalCode" => "Postal code".to_string(),
        "zoneinfo" => "Time zone".to_string(),
        "street" => "Street address".to_string(),
        "locality" => "City".to_string(),
        _ => {
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}
