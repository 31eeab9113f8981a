use crate::state::UserRole;
use serde::{Deserialize, Serialize};

/// Sentinel user id meaning "no identity"
pub const ANONYMOUS_USER: &str = "anonymous";

/// `config.configurable` block of a run request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configurable {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub configurable: Configurable,
}

/// Execution context handed to every node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub run_id: String,
    pub thread_id: String,
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
    pub user_role: UserRole,
}

impl RunContext {
    pub fn new(run_id: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            thread_id: thread_id.into(),
            tenant_id: None,
            user_id: None,
            user_role: UserRole::Public,
        }
    }

    /// Resolve identity and effective role from the request
    ///
    /// `configurable.user_role` wins over the input role; both are normalized.
    pub fn from_request(
        run_id: impl Into<String>,
        thread_id: impl Into<String>,
        configurable: &Configurable,
        input_role: Option<&str>,
    ) -> Self {
        let role = configurable.user_role.as_deref().or(input_role);
        Self {
            run_id: run_id.into(),
            thread_id: thread_id.into(),
            tenant_id: configurable.tenant_id.clone(),
            user_id: configurable.user_id.clone(),
            user_role: UserRole::normalize(role),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.user_role = role;
        self
    }

    /// User id, or the anonymous sentinel
    pub fn user_id(&self) -> &str {
        match self.user_id.as_deref() {
            Some(id) if !id.trim().is_empty() => id,
            _ => ANONYMOUS_USER,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id() == ANONYMOUS_USER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configurable_role_wins() {
        let configurable = Configurable {
            user_role: Some("private".to_string()),
            ..Default::default()
        };
        let ctx = RunContext::from_request("r", "t", &configurable, Some("public"));
        assert_eq!(ctx.user_role, UserRole::Private);

        let ctx = RunContext::from_request("r", "t", &Configurable::default(), Some("private"));
        assert_eq!(ctx.user_role, UserRole::Private);
    }

    #[test]
    fn test_anonymous_identity() {
        assert!(RunContext::new("r", "t").is_anonymous());
        assert!(RunContext::new("r", "t").with_user("").is_anonymous());
        assert!(RunContext::new("r", "t").with_user("anonymous").is_anonymous());
        assert!(!RunContext::new("r", "t").with_user("u-1").is_anonymous());
    }
}
