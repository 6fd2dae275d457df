use super::super::result::Classification;

/// Any issue makes the proposal non-exempt; otherwise any condition makes it conditional.
pub fn classify(issues: &[String], conditions: &[String]) -> Classification {
    if !issues.is_empty() {
        Classification::NonExempt
    } else if !conditions.is_empty() {
        Classification::Conditional
    } else {
        Classification::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_dominate_conditions() {
        let issues = vec!["Height exceeds limit".to_string()];
        let conditions = vec!["Heritage consent".to_string()];
        assert_eq!(classify(&issues, &conditions), Classification::NonExempt);
        assert_eq!(classify(&[], &conditions), Classification::Conditional);
        assert_eq!(classify(&[], &[]), Classification::Approved);
    }
}
