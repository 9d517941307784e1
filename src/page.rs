//! Page context and the side effects a page can perform.

/// Path of the user list, relative to the base path.
pub const USER_LIST_PATH: &str = "users/manageUsers";

/// Per-page state handed to the controller at setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    base_path: String,
}

impl PageContext {
    pub fn init(base_path: &str) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a relative path against the base path.
    pub fn resolve(&self, relative: &str) -> String {
        format!("{}/{}", self.base_path, relative.trim_start_matches("./"))
    }

    pub fn user_list_url(&self) -> String {
        self.resolve(USER_LIST_PATH)
    }
}

/// User-visible side effects: blocking alerts and full-page redirects.
pub trait Page {
    fn alert(&self, message: &str);
    fn redirect(&self, url: &str);
}
