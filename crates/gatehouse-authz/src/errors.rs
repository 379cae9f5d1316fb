use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("invalid permission: {0}")]
    InvalidPermission(String),
    #[error("policy not found: {0}")]
    PolicyNotFound(String),
    #[error("jwt error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("token signing secret is empty")]
    MissingSecret,
}

pub type AuthzResult<T> = Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_variants() {
        let errors = vec![
            AuthzError::InvalidPermission("bad".to_string()),
            AuthzError::PolicyNotFound("admin".to_string()),
            AuthzError::Token(jsonwebtoken::errors::ErrorKind::InvalidToken.into()),
            AuthzError::MissingSecret,
        ];

        for error in errors {
            let rendered = error.to_string();
            assert!(!rendered.is_empty());
        }
    }

    #[test]
    fn policy_not_found_names_the_policy() {
        let err = AuthzError::PolicyNotFound("reports".to_string());
        assert_eq!(err.to_string(), "policy not found: reports");
    }
}
