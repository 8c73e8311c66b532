//! # User Module
//!
//! Người dùng của hệ thống quản trị. Quyền của user được suy ra từ `role`
//! qua bảng phân quyền; user bị vô hiệu hóa không có quyền nào.

use crate::error::{CoreError, CoreResult};
use crate::rbac::Subject;
use crate::role::UserRole;
use crate::validation::{check_email, check_length};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Tạo User mới (active) với ID ngẫu nhiên
    pub fn new(username: &str, email: &str, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.trim().to_string(),
            email: email.trim().to_lowercase(),
            role,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    pub fn subject(&self) -> Subject {
        Subject::new(self.role, self.is_active)
    }

    /// Tên hiển thị trên navbar
    pub fn display_name(&self) -> &str {
        &self.username
    }

    /// Chữ cái viết tắt cho avatar (tối đa 2 ký tự)
    pub fn initials(&self) -> String {
        self.username
            .split(|c: char| c == '.' || c == '_' || c == '-' || c.is_whitespace())
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_length("username", &self.username, 3, 64)?;
        if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(CoreError::validation(
                "username",
                "only letters, digits, '_', '.' and '-' are allowed",
            ));
        }
        check_length("email", &self.email, 5, 254)?;
        check_email("email", &self.email)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("amina.yusuf", "Amina@NVCBank.com ", UserRole::ComplianceOfficer);
        assert!(user.is_active);
        assert_eq!(user.email, "amina@nvcbank.com");
        assert_eq!(user.initials(), "AY");
        assert!(user.validate().is_ok());
        assert_eq!(user.to_string(), "amina.yusuf (compliance_officer)");
    }

    #[test]
    fn test_user_validation() {
        assert!(User::new("ab", "ab@nvcbank.com", UserRole::Customer)
            .validate()
            .is_err());
        assert!(User::new("bad name!", "x@nvcbank.com", UserRole::Customer)
            .validate()
            .is_err());
        assert!(User::new("valid_name", "not-an-email", UserRole::Customer)
            .validate()
            .is_err());
    }

    #[test]
    fn test_subject() {
        let mut user = User::new("ops", "ops@nvcbank.com", UserRole::Admin);
        assert_eq!(user.subject(), Subject::active(UserRole::Admin));
        user.is_active = false;
        assert!(!user.subject().is_active);
    }
}
