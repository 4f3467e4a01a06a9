//! The `{success, message, data, timestamp}` response envelope.

/// Wrapper the backend puts around most responses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApiResponse<T> {
    #[cfg_attr(feature = "serde", serde(default))]
    pub success: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub message: String,
    pub data: Option<T>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: "OK".to_string(),
            data: Some(data),
            timestamp: None,
        }
    }

    /// A failed envelope carrying only a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            timestamp: None,
        }
    }

    /// The message, if the server supplied a non-blank one.
    pub fn message(&self) -> Option<&str> {
        let message = self.message.trim();
        (!message.is_empty()).then_some(message)
    }

    /// Split into the payload or the server's failure.
    ///
    /// A `success: false` envelope yields `Err` with its message (possibly
    /// blank). A successful envelope yields its `data`, which may be absent.
    pub fn into_data(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.message)
        }
    }
}
