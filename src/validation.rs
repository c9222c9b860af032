use crate::error::{LoyaltyError, Result};
use crate::models::Achievement;

/// Validation of submitted form fields
///
/// Point and id values arrive as text from the forms; this is the one place
/// where they are turned into integers.
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate employee name
    pub fn validate_employee_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(LoyaltyError::Validation("employee name cannot be empty".to_string()));
        }

        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(LoyaltyError::Validation(
                "employee name contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate achievement description
    pub fn validate_achievement(text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(LoyaltyError::Validation(
                "achievement description cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse a submitted point value
    ///
    /// Surrounding whitespace and a leading sign are accepted.
    pub fn parse_point(value: &str) -> Result<i64> {
        value.trim().parse().map_err(|_| LoyaltyError::InvalidPoint {
            value: value.to_string(),
            id: None,
        })
    }

    /// Parse a submitted achievement id
    pub fn parse_id(value: &str) -> Result<i64> {
        value.trim().parse().map_err(|_| LoyaltyError::InvalidId {
            value: value.to_string(),
        })
    }

    /// Sum the point values of `achievements`
    ///
    /// Fails on the first row whose point is not an integer, naming that
    /// row, and on overflow.
    pub fn sum_points(achievements: &[Achievement]) -> Result<i64> {
        achievements.iter().try_fold(0_i64, |total, row| {
            let invalid = || LoyaltyError::InvalidPoint {
                value: row.point.clone(),
                id: Some(row.id),
            };
            let point: i64 = row.point.trim().parse().map_err(|_| invalid())?;
            total.checked_add(point).ok_or_else(invalid)
        })
    }
}
