/// Failure modes of a game metadata lookup.
///
/// A missing icon is not an error: it degrades to `icon_url: None` inside the
/// resolver and never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Rejected before any network call.
    InvalidInput(String),
    /// An upstream catalog step found nothing.
    NotFound(String),
    /// Anything unexpected along the lookup chain.
    Internal(String),
}

impl ResolveError {
    /// HTTP status code this error maps to at the API boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(m) | Self::NotFound(m) | Self::Internal(m) => m,
        }
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ResolveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ResolveError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(ResolveError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ResolveError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn display_is_message() {
        let err = ResolveError::NotFound("Game not found".to_string());
        assert_eq!(err.to_string(), "Game not found");
    }
}
