//! Submission checks on a collected user record.

use crate::form::{ErrorRegion, UserForm};
use crate::record::{UserId, UserRecord};
use crate::rules::PasswordRule;

pub const EMAIL_REQUIRED: &str = "You must enter an email address";
pub const PASSWORD_REQUIRED: &str = "You must set a password for a new user";
pub const PASSWORDS_MISMATCH: &str = "The passwords given must match";

/// Outcome of running every check. A region holding `None` passed and is
/// cleared when the report is applied to the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    pub fn message(&self, region: ErrorRegion) -> Option<&str> {
        match region {
            ErrorRegion::Email => self.email.as_deref(),
            ErrorRegion::Password => self.password.as_deref(),
        }
    }

    /// Write failing messages into their regions and clear the passing ones.
    pub fn apply(&self, form: &mut UserForm) {
        for region in [ErrorRegion::Email, ErrorRegion::Password] {
            form.set_error(region, self.message(region).unwrap_or(""));
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Run all checks; none short-circuits. When several checks on the password
/// region fail, the last one's message is kept.
pub fn validate(record: &UserRecord, id: UserId, rules: &[Box<dyn PasswordRule>]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if is_blank(record.get("email")) {
        report.email = Some(EMAIL_REQUIRED.to_string());
    }

    let password = record.get("password");
    let repeat = record.get("password_repeat");

    if id.is_new() && is_blank(password) {
        report.password = Some(PASSWORD_REQUIRED.to_string());
    }

    if let Some(pw) = password.filter(|p| !p.trim().is_empty()) {
        for rule in rules {
            if let Err(message) = rule.accept(pw) {
                report.password = Some(message);
            }
        }
    }

    if password != repeat {
        report.password = Some(PASSWORDS_MISMATCH.to_string());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::MinLength;

    fn record(email: Option<&str>, pw: Option<&str>, repeat: Option<&str>) -> UserRecord {
        let mut r = UserRecord::new();
        r.set("email", email.map(String::from));
        r.set("password", pw.map(String::from));
        r.set("password_repeat", repeat.map(String::from));
        r
    }

    #[test]
    fn test_email_required() {
        let report = validate(&record(Some("   "), Some("x"), Some("x")), UserId::New, &[]);
        assert_eq!(report.email.as_deref(), Some(EMAIL_REQUIRED));
        assert!(!report.is_ok());

        let report = validate(&record(None, Some("x"), Some("x")), UserId::Existing(1), &[]);
        assert_eq!(report.email.as_deref(), Some(EMAIL_REQUIRED));

        let report = validate(&record(Some("a@b"), Some("x"), Some("x")), UserId::New, &[]);
        assert!(report.is_ok());
    }

    #[test]
    fn test_password_required_only_for_new_users() {
        let blank = record(Some("a@b"), Some(""), Some(""));

        let report = validate(&blank, UserId::New, &[]);
        assert_eq!(report.password.as_deref(), Some(PASSWORD_REQUIRED));

        assert!(validate(&blank, UserId::Existing(4), &[]).is_ok());
        assert!(validate(&blank, UserId::Unparsed, &[]).is_ok());
    }

    #[test]
    fn test_mismatch_always_checked() {
        let mismatched = record(Some("a@b"), Some("one"), Some("two"));
        for id in [UserId::New, UserId::Existing(0), UserId::Unparsed] {
            let report = validate(&mismatched, id, &[]);
            assert_eq!(report.password.as_deref(), Some(PASSWORDS_MISMATCH));
            assert!(report.email.is_none());
        }

        // null and null are equal, null and empty are not
        assert!(validate(&record(Some("a@b"), None, None), UserId::Existing(1), &[]).is_ok());
        let report = validate(&record(Some("a@b"), None, Some("")), UserId::Existing(1), &[]);
        assert_eq!(report.password.as_deref(), Some(PASSWORDS_MISMATCH));
    }

    #[test]
    fn test_mismatch_overrides_required_message() {
        let report = validate(&record(Some("a@b"), Some(""), Some("x")), UserId::New, &[]);
        assert_eq!(report.password.as_deref(), Some(PASSWORDS_MISMATCH));
    }

    #[test]
    fn test_password_rules_run_on_set_passwords() {
        let rules: Vec<Box<dyn PasswordRule>> = vec![Box::new(MinLength(8))];

        let report = validate(&record(Some("a@b"), Some("short"), Some("short")), UserId::New, &rules);
        assert!(report.password.unwrap().contains("at least 8"));

        // blank password on an existing user is left alone
        assert!(validate(&record(Some("a@b"), Some(""), Some("")), UserId::Existing(2), &rules).is_ok());
    }

    #[test]
    fn test_apply_clears_stale_messages() {
        let mut form = UserForm::standard("-1");
        let failing = validate(&record(None, Some(""), Some("")), UserId::New, &[]);
        failing.apply(&mut form);
        assert_eq!(form.error_text(ErrorRegion::Email), EMAIL_REQUIRED);
        assert_eq!(form.error_text(ErrorRegion::Password), PASSWORD_REQUIRED);

        ValidationReport::default().apply(&mut form);
        assert_eq!(form.error_text(ErrorRegion::Email), "");
        assert_eq!(form.error_text(ErrorRegion::Password), "");
    }
}
