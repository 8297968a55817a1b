//! Admin entry gate.
//!
//! A literal comparison against the configured password, re-checked on
//! every request. Nothing is stored between requests.

/// Result of checking a submitted password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAccess {
    /// Exact match: show the entry portal
    Granted,
    /// Non-empty mismatch
    Denied,
    /// Nothing entered yet
    Prompt,
}

impl AdminAccess {
    pub fn check(input: &str, password: &str) -> Self {
        if input == password {
            AdminAccess::Granted
        } else if input.is_empty() {
            AdminAccess::Prompt
        } else {
            AdminAccess::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_granted() {
        assert_eq!(AdminAccess::check("admin123", "admin123"), AdminAccess::Granted);
    }

    #[test]
    fn test_mismatch_denied() {
        assert_eq!(AdminAccess::check("admin", "admin123"), AdminAccess::Denied);
        assert_eq!(AdminAccess::check("admin123 ", "admin123"), AdminAccess::Denied);
        assert_eq!(AdminAccess::check("ADMIN123", "admin123"), AdminAccess::Denied);
    }

    #[test]
    fn test_empty_prompts() {
        assert_eq!(AdminAccess::check("", "admin123"), AdminAccess::Prompt);
    }
}
