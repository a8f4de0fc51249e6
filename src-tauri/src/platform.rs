#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Platform {
    Darwin,
    Win32,
    Other,
}

impl Platform {
    pub(crate) fn current() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Accepts both Node-style (`darwin`, `win32`) and Rust-style (`macos`,
    /// `windows`) identifiers.
    pub(crate) fn from_identifier(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Self::Darwin,
            "win32" | "windows" => Self::Win32,
            _ => Self::Other,
        }
    }

    pub(crate) fn keeps_running_without_windows(self) -> bool {
        self == Self::Darwin
    }
}
