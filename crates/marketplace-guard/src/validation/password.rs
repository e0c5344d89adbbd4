use serde::{Deserialize, Serialize};

/// Minimum strength a password must reach before an account is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_upper: bool,
    pub require_lower: bool,
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_upper: true,
            require_lower: true,
            require_digit: true,
        }
    }
}

/// Score on a 0..=6 scale plus every rule the password missed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub unmet: Vec<String>,
}

impl PasswordStrength {
    pub const MAX_SCORE: u8 = 6;

    pub fn is_acceptable(&self) -> bool {
        self.unmet.is_empty()
    }

    /// One sentence covering every unmet rule, e.g.
    /// "Password must be at least 8 characters long and contain a number".
    pub fn summary(&self) -> Option<String> {
        match self.unmet.as_slice() {
            [] => None,
            [only] => Some(format!("Password must {only}")),
            [head @ .., last] => Some(format!("Password must {} and {last}", head.join(", "))),
        }
    }
}

const STRONG_LENGTH: usize = 12;

impl PasswordPolicy {
    pub fn assess(&self, password: &str) -> PasswordStrength {
        let length = password.chars().count();
        let has_upper = password.chars().any(char::is_uppercase);
        let has_lower = password.chars().any(char::is_lowercase);
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_symbol = password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

        let score = [
            length >= self.min_length,
            length >= STRONG_LENGTH,
            has_upper,
            has_lower,
            has_digit,
            has_symbol,
        ]
        .iter()
        .filter(|met| **met)
        .count() as u8;

        let mut unmet = Vec::new();
        if length < self.min_length {
            unmet.push(format!("be at least {} characters long", self.min_length));
        }
        if self.require_upper && !has_upper {
            unmet.push("contain an uppercase letter".to_string());
        }
        if self.require_lower && !has_lower {
            unmet.push("contain a lowercase letter".to_string());
        }
        if self.require_digit && !has_digit {
            unmet.push("contain a number".to_string());
        }

        PasswordStrength { score, unmet }
    }
}

/// True when the password embeds any of the given personal details, ignoring case.
pub fn contains_personal_info(password: &str, details: &[&str]) -> bool {
    let lowered = password.to_lowercase();
    details
        .iter()
        .map(|detail| detail.trim().to_lowercase())
        .filter(|detail| !detail.is_empty())
        .any(|detail| lowered.contains(&detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_scores_full_marks() {
        let strength = PasswordPolicy::default().assess("Correct-Horse-42");
        assert_eq!(strength.score, PasswordStrength::MAX_SCORE);
        assert!(strength.is_acceptable());
        assert_eq!(strength.summary(), None);
    }

    #[test]
    fn weak_password_collects_every_unmet_rule_in_one_message() {
        let strength = PasswordPolicy::default().assess("abc");
        assert_eq!(strength.unmet.len(), 3);
        assert_eq!(
            strength.summary().as_deref(),
            Some(
                "Password must be at least 8 characters long, contain an uppercase letter and contain a number"
            )
        );
        assert_eq!(strength.score, 1);
    }

    #[test]
    fn single_unmet_rule_reads_naturally() {
        let strength = PasswordPolicy::default().assess("longenough1");
        assert_eq!(
            strength.summary().as_deref(),
            Some("Password must contain an uppercase letter")
        );
    }

    #[test]
    fn personal_info_match_ignores_case_and_blanks() {
        assert!(contains_personal_info("SuperANN2024", &["ann", "lee"]));
        assert!(!contains_personal_info("Harbour2024", &["", "  "]));
    }
}
