//! Redaction wrapper for configuration secrets.
use std::fmt;

const REDACTION_MARKER: &str = "[redacted]";

/// Holds a sensitive value (the API secret, a signing key) so that formatting a containing struct, e.g. logging
/// the server config at startup, can never leak it. Both `Debug` and `Display` print a fixed marker; the wrapped
/// value is only reachable through an explicit [`Secret::reveal`] call, which keeps secret usage easy to audit.
pub struct Secret<T>(T);

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Grants read access to the wrapped value.
    pub fn reveal(&self) -> &T {
        &self.0
    }

    /// Unwraps the secret, for handing the value to an API that takes ownership.
    pub fn reveal_into(self) -> T {
        self.0
    }
}

impl<T> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: Clone> Clone for Secret<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Default> Default for Secret<T> {
    fn default() -> Self {
        Self(T::default())
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTION_MARKER)
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTION_MARKER)
    }
}
