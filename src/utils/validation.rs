use regex::Regex;
use crate::error::{AppError, AppResult};

fn compile(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern).map_err(|e| AppError::InternalError(format!("Invalid pattern: {e}")))
}

/// 规范化邮箱（去空格、小写）
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 验证邮箱格式
pub fn validate_email(email: &str) -> AppResult<()> {
    let email_regex = compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?;

    if email.len() > 255 || !email_regex.is_match(email) {
        return Err(AppError::ValidationError(
            "Invalid email address".to_string(),
        ));
    }

    Ok(())
}

/// 验证手机号：可选的 + 前缀，8-15 位数字，允许空格和短横线
pub fn validate_phone_number(phone: &str) -> AppResult<()> {
    let phone_regex = compile(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$")?;
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();

    if !phone_regex.is_match(phone) || !(8..=15).contains(&digits) {
        return Err(AppError::ValidationError(
            "Invalid phone number".to_string(),
        ));
    }

    Ok(())
}

/// 验证必填文本字段
pub fn validate_required(field: &str, value: &str, max_len: usize) -> AppResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::ValidationError(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

/// 空字符串视为未填写
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@gym.com").is_ok());
        assert!(validate_email("member.contoh@mail.co.id").is_ok());
        assert!(validate_email("admin@gym").is_err());
        assert!(validate_email("admin gym@gym.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@Gym.COM "), "admin@gym.com");
    }

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("08123456789").is_ok());
        assert!(validate_phone_number("+62 812-3456-789").is_ok());
        assert!(validate_phone_number("12345").is_err());
        assert!(validate_phone_number("0812abc6789").is_err());
        assert!(validate_phone_number("+1234567890123456").is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("name", "Super Admin", 255).is_ok());
        assert!(validate_required("name", "   ", 255).is_err());
        assert!(validate_required("name", "abcdef", 5).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  Jl. Merdeka ".into())), Some("Jl. Merdeka".into()));
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(None), None);
    }
}
