//! userform - create and edit user records
//!
//! This library provides the form model, validation and persistence used by
//! the `userform` editor and the `userform-stub` endpoint.

pub mod cli;
pub mod config;
pub mod controller;
pub mod form;
pub mod logging;
pub mod page;
pub mod properties;
pub mod record;
pub mod rules;
pub mod store;
pub mod stub;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

pub use cli::Args;
pub use controller::UserFormController;
