use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";

/// Authenticated user attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl UserContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_match_is_case_insensitive() {
        let user = UserContext {
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
            roles: vec!["Admin".to_string()],
        };
        assert!(user.is_admin());
        assert!(!user.has_role("gamma"));
    }
}
