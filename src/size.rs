use std::fmt;

pub const KB: u64 = 1024;
pub const MB: u64 = KB * 1024;
pub const GB: u64 = MB * 1024;

/// Byte count rendered for humans.
///
/// A unit is only used once the size is strictly larger than it, so exactly
/// 1024 bytes still prints as `1024 bytes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0;
        if bytes > GB {
            write!(f, "{:.2} GB", bytes as f64 / GB as f64)
        } else if bytes > MB {
            write!(f, "{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes > KB {
            write!(f, "{:.2} KB", bytes as f64 / KB as f64)
        } else {
            write!(f, "{} bytes", bytes)
        }
    }
}
