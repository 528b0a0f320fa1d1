// ==========================================
// 护理实习管理系统 - API层错误类型
// ==========================================
// 职责: 定义远端后端调用的错误类型，保留后端返回的错误信息
// ==========================================

use serde::Deserialize;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401/403: 令牌无效或权限不足
    #[error("未授权 (status={status}): {}", .message.as_deref().unwrap_or("-"))]
    Unauthorized {
        status: u16,
        message: Option<String>,
    },

    /// 后端返回非 2xx 状态码
    #[error("后端返回错误 (status={status}): {}", .message.as_deref().unwrap_or("-"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("网络请求失败: {0}")]
    Transport(String),

    #[error("请求超时: {0}")]
    Timeout(String),

    #[error("响应解析失败: {0}")]
    Decode(String),

    #[error("无效的后端地址: {0}")]
    InvalidEndpoint(String),
}

impl ApiError {
    /// 后端错误负载中的提示信息（若有）
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message, .. } | ApiError::Server { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// 根据状态码与响应体构造错误
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_error_message(body);
        match status {
            401 | 403 => ApiError::Unauthorized { status, message },
            _ => ApiError::Server { status, message },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidEndpoint(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

// ==========================================
// 后端错误负载
// ==========================================
// 兼容两种形态:
// - { "message": "Email already exists" }
// - { "message": ["email must be an email", "role must be ..."], "error": "Bad Request" }
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<serde_json::Value>,
    error: Option<String>,
}

/// 从响应体中提取提示信息；无法解析时返回 None
pub fn extract_error_message(body: &str) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_str(body).ok()?;

    let from_message = match payload.message {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Array(items)) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    };

    from_message
        .or(payload.error)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_string_message() {
        let body = r#"{"message":"Email already exists","statusCode":409}"#;
        assert_eq!(
            extract_error_message(body),
            Some("Email already exists".to_string())
        );
    }

    #[test]
    fn test_extract_array_message() {
        let body = r#"{"message":["email must be an email","role is invalid"],"error":"Bad Request"}"#;
        assert_eq!(
            extract_error_message(body),
            Some("email must be an email; role is invalid".to_string())
        );
    }

    #[test]
    fn test_extract_falls_back_to_error_field() {
        let body = r#"{"error":"Internal Server Error"}"#;
        assert_eq!(
            extract_error_message(body),
            Some("Internal Server Error".to_string())
        );
    }

    #[test]
    fn test_extract_non_json_body() {
        assert_eq!(extract_error_message("<html>502</html>"), None);
        assert_eq!(extract_error_message(""), None);
    }

    #[test]
    fn test_from_status_classification() {
        let err = ApiError::from_status(401, r#"{"message":"jwt expired"}"#);
        assert!(matches!(err, ApiError::Unauthorized { status: 401, .. }));
        assert_eq!(err.server_message(), Some("jwt expired"));

        let err = ApiError::from_status(500, "oops");
        assert!(matches!(err, ApiError::Server { status: 500, message: None }));
        assert_eq!(err.server_message(), None);
    }
}
