//! Password acceptability rules.

use crate::config::PasswordRulesConfig;

/// A rule that decides whether a password is acceptable.
pub trait PasswordRule: Send + Sync {
    /// `Err` carries the message shown under the password field.
    fn accept(&self, password: &str) -> Result<(), String>;
}

pub struct MinLength(pub usize);

impl PasswordRule for MinLength {
    fn accept(&self, password: &str) -> Result<(), String> {
        if password.chars().count() < self.0 {
            return Err(format!("The password must be at least {} characters long", self.0));
        }
        Ok(())
    }
}

pub struct RequireUppercase;

impl PasswordRule for RequireUppercase {
    fn accept(&self, password: &str) -> Result<(), String> {
        if !password.chars().any(|c| c.is_uppercase()) {
            return Err("The password must contain an uppercase letter".to_string());
        }
        Ok(())
    }
}

pub struct RequireDigit;

impl PasswordRule for RequireDigit {
    fn accept(&self, password: &str) -> Result<(), String> {
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err("The password must contain a digit".to_string());
        }
        Ok(())
    }
}

/// Build the configured rules. An all-default config yields no rules.
pub fn from_config(cfg: &PasswordRulesConfig) -> Vec<Box<dyn PasswordRule>> {
    let mut rules: Vec<Box<dyn PasswordRule>> = Vec::new();
    if let Some(min) = cfg.min_length.filter(|m| *m > 0) {
        rules.push(Box::new(MinLength(min)));
    }
    if cfg.require_uppercase {
        rules.push(Box::new(RequireUppercase));
    }
    if cfg.require_digit {
        rules.push(Box::new(RequireDigit));
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules() {
        assert!(MinLength(8).accept("short").is_err());
        assert!(MinLength(8).accept("longenough").is_ok());
        assert!(RequireUppercase.accept("lower").is_err());
        assert!(RequireUppercase.accept("Upper").is_ok());
        assert!(RequireDigit.accept("nodigit").is_err());
        assert!(RequireDigit.accept("d1git").is_ok());
    }

    #[test]
    fn test_from_config() {
        assert!(from_config(&PasswordRulesConfig::default()).is_empty());

        let cfg = PasswordRulesConfig {
            min_length: Some(8),
            require_uppercase: true,
            require_digit: true,
        };
        let rules = from_config(&cfg);
        assert_eq!(rules.len(), 3);
        assert!(rules.iter().all(|r| r.accept("Passw0rdOk").is_ok()));
        assert!(rules.iter().any(|r| r.accept("password").is_err()));
    }
}
