//! Property names known to the form and the normalization applied to
//! names added at runtime.

use crate::form::BASE_PROPERTIES;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("Property can't be an empty string")]
    Empty,

    #[error("That property already exists")]
    Duplicate(String),
}

/// Lower-case the name and replace its first space with an underscore.
/// Later spaces are kept as-is.
pub fn normalize_property_name(raw: &str) -> String {
    raw.to_lowercase().replacen(' ', "_", 1)
}

/// Label shown next to a property's input: first underscore back to a space,
/// first character upper-cased.
pub fn property_label(name: &str) -> String {
    let spaced = name.replacen('_', " ", 1);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered, append-only list of property names for the page session.
#[derive(Debug, Clone)]
pub struct PropertyList {
    names: Vec<String>,
}

impl Default for PropertyList {
    fn default() -> Self {
        Self {
            names: BASE_PROPERTIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Record a name that already exists on the stored user, without
    /// normalizing it.
    pub fn register(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_string());
        }
    }

    /// Normalize `raw` and append it. Returns the stored name.
    pub fn add(&mut self, raw: &str) -> Result<String, PropertyError> {
        if raw.is_empty() {
            return Err(PropertyError::Empty);
        }
        let name = normalize_property_name(raw);
        if self.contains(&name) {
            return Err(PropertyError::Duplicate(name));
        }
        self.names.push(name.clone());
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_first_space_only() {
        assert_eq!(normalize_property_name("Home Town"), "home_town");
        assert_eq!(normalize_property_name("Home Town Area"), "home_town area");
        assert_eq!(normalize_property_name("SHOE"), "shoe");
    }

    #[test]
    fn test_label() {
        assert_eq!(property_label("home_town"), "Home town");
        assert_eq!(property_label("home_town area"), "Home town area");
        assert_eq!(property_label("x"), "X");
        assert_eq!(property_label(""), "");
    }

    #[test]
    fn test_add_and_duplicates() {
        let mut list = PropertyList::new();
        let before = list.len();

        assert_eq!(list.add("Home Town").unwrap(), "home_town");
        assert_eq!(list.len(), before + 1);

        assert_eq!(
            list.add("HOME TOWN"),
            Err(PropertyError::Duplicate("home_town".to_string()))
        );
        assert_eq!(
            list.add("Email"),
            Err(PropertyError::Duplicate("email".to_string()))
        );
        assert_eq!(list.len(), before + 1);
    }

    #[test]
    fn test_add_case_sensitive_after_normalization() {
        let mut list = PropertyList::new();
        // base entry is "postalCode"; normalization lower-cases the new one
        assert_eq!(list.add("postalCode").unwrap(), "postalcode");
    }

    #[test]
    fn test_add_empty() {
        let mut list = PropertyList::new();
        assert_eq!(list.add(""), Err(PropertyError::Empty));
        assert_eq!(list.len(), BASE_PROPERTIES.len());
    }
}
