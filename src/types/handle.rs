//! Object handles (group code 5)

use std::fmt;

/// Hexadecimal object handle as written in group code 5
///
/// Handle 0 is reserved and never identifies an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Handle(u64);

impl Handle {
    /// The null handle
    pub const NULL: Handle = Handle(0);

    /// Create a new handle from a u64 value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    /// Parse the hexadecimal text form
    pub fn from_hex(text: &str) -> Option<Self> {
        u64::from_str_radix(text.trim(), 16).ok().map(Handle)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check if this is the null handle
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Handle::from_hex("1F"), Some(Handle::new(31)));
        assert_eq!(Handle::from_hex(" 2a "), Some(Handle::new(42)));
        assert_eq!(Handle::from_hex("zz"), None);
    }

    #[test]
    fn test_display_uppercase_hex() {
        assert_eq!(Handle::new(255).to_string(), "FF");
        assert!(Handle::NULL.is_null());
    }
}
