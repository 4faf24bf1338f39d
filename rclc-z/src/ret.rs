use std::fmt::Display;

/// Return type shared with C callers.
#[allow(non_camel_case_types)]
pub type rcl_ret_t = i32;

/// Result codes surfaced by every facade operation.
///
/// The numeric values match the classic client library so C callers can
/// compare against their own constants.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::FromRepr, strum::Display)]
pub enum RetCode {
    Ok = 0,
    Error = 1,
    Timeout = 2,
    Unsupported = 3,
    InvalidArgument = 11,
}

impl From<RetCode> for rcl_ret_t {
    fn from(value: RetCode) -> Self {
        value as rcl_ret_t
    }
}

#[derive(Debug)]
pub enum RclError {
    InvalidArgument(String),
    Error(String),
    Timeout,
    Unsupported(String),
}

impl RclError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn code(&self) -> RetCode {
        match self {
            Self::InvalidArgument(_) => RetCode::InvalidArgument,
            Self::Error(_) => RetCode::Error,
            Self::Timeout => RetCode::Timeout,
            Self::Unsupported(_) => RetCode::Unsupported,
        }
    }
}

impl Display for RclError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Error(msg) => write!(f, "error: {msg}"),
            Self::Timeout => write!(f, "timed out"),
            Self::Unsupported(msg) => write!(f, "unsupported: {msg}"),
        }
    }
}

impl std::error::Error for RclError {}

impl From<zenoh::Error> for RclError {
    fn from(value: zenoh::Error) -> Self {
        Self::Error(value.to_string())
    }
}

impl From<cdr::Error> for RclError {
    fn from(value: cdr::Error) -> Self {
        Self::Error(format!("cdr: {value}"))
    }
}

pub type Result<T = ()> = std::result::Result<T, RclError>;

/// Converts a fallible block into a C return code, logging the failure.
#[macro_export]
macro_rules! rclc_try {
    ($($body:tt)*) => {{
        let x = || -> $crate::ret::Result<()> {
            $($body)*
            Ok(())
        };
        match x() {
            Ok(_) => $crate::ret::RetCode::Ok as $crate::ret::rcl_ret_t,
            Err(err) => {
                ::tracing::error!("{err}");
                err.code() as $crate::ret::rcl_ret_t
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_rcl_values() {
        assert_eq!(RetCode::Ok as i32, 0);
        assert_eq!(RetCode::Error as i32, 1);
        assert_eq!(RetCode::Timeout as i32, 2);
        assert_eq!(RetCode::Unsupported as i32, 3);
        assert_eq!(RetCode::InvalidArgument as i32, 11);
        assert_eq!(RetCode::from_repr(11), Some(RetCode::InvalidArgument));
        assert_eq!(RetCode::from_repr(4), None);
    }

    #[test]
    fn test_error_to_code() {
        assert_eq!(RclError::invalid_argument("x").code(), RetCode::InvalidArgument);
        assert_eq!(RclError::Timeout.code(), RetCode::Timeout);
        let zerr: zenoh::Error = "boom".into();
        let err = RclError::from(zerr);
        assert_eq!(err.code(), RetCode::Error);
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_rclc_try() {
        let ok: rcl_ret_t = crate::rclc_try! {};
        assert_eq!(ok, 0);
        let bad: rcl_ret_t = crate::rclc_try! {
            return Err(RclError::unsupported("nope"));
        };
        assert_eq!(bad, RetCode::Unsupported as i32);
    }
}
