use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Hotkey monitor error: {0}")]
    HotkeyMonitor(String),

    #[error("Focused element error: {0}")]
    FocusedElement(String),

    #[error("Attribute {attribute} failed (AXError {code})")]
    Attribute { attribute: String, code: i32 },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn attribute(attribute: &str, code: i32) -> Self {
        AppError::Attribute {
            attribute: attribute.to_string(),
            code,
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
