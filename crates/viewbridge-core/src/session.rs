//! Session configuration seam.

/// Where the sync manager learns about the session's remote authority.
///
/// Read once at construction time; a surface's authority is fixed for its
/// lifetime. Re-create the manager to re-home a surface.
pub trait SessionConfig {
    /// The remote authority this session is attached to, if any.
    fn remote_authority(&self) -> Option<String>;
}

/// Fixed-value session configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSessionConfig {
    remote_authority: Option<String>,
}

impl StaticSessionConfig {
    /// A purely local session.
    pub fn local() -> Self {
        Self {
            remote_authority: None,
        }
    }

    /// A session attached to `authority`.
    pub fn remote(authority: impl Into<String>) -> Self {
        Self {
            remote_authority: Some(authority.into()),
        }
    }
}

impl SessionConfig for StaticSessionConfig {
    fn remote_authority(&self) -> Option<String> {
        self.remote_authority.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_session_has_no_authority() {
        assert_eq!(StaticSessionConfig::local().remote_authority(), None);
    }

    #[test]
    fn remote_session_reports_its_authority() {
        assert_eq!(
            StaticSessionConfig::remote("ssh-remote+box").remote_authority(),
            Some("ssh-remote+box".to_string())
        );
    }
}
