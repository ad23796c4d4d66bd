use std::fmt;

/// Which half of a codec raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Serializing,
    Deserializing,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Serializing => write!(f, "serializing"),
            Direction::Deserializing => write!(f, "deserializing"),
        }
    }
}

/// Root cause of a [`CodecError`], independent of how much context was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Truncated,
    Overflow,
    Malformed,
    LengthMismatch,
    TooLarge,
    Io,
}

/// Errors that can occur while serializing or deserializing a value.
///
/// Container codecs never swallow an element failure. They wrap it in
/// [`CodecError::Context`], so the rendered message reads like a call stack
/// with the root cause first and one `while ... object of type T` line per
/// enclosing container.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The stream ended before the expected bytes were available.
    #[error("error deserializing object of type {ty}: stream ended early")]
    Truncated { ty: &'static str },

    /// An encoded integer does not fit the receiving type.
    #[error("error deserializing object of type {ty}: encoded value does not fit ({declared} magnitude bytes)")]
    Overflow { ty: &'static str, declared: u8 },

    /// The bytes on the wire are structurally invalid for the type.
    #[error("error {direction} object of type {ty}: {reason}")]
    Malformed {
        direction: Direction,
        ty: &'static str,
        reason: &'static str,
    },

    /// A fixed-length array record declared a different element count.
    #[error("error deserializing {ty}, lengths do not match (expected {expected}, found {found})")]
    LengthMismatch {
        ty: &'static str,
        expected: usize,
        found: usize,
    },

    /// A framed payload exceeds the 32-bit length prefix or the configured limit.
    #[error("error {direction} object of type {ty}: payload too large ({size} bytes, max {max})")]
    TooLarge {
        direction: Direction,
        ty: &'static str,
        size: u64,
        max: usize,
    },

    /// The underlying stream failed.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An element failure annotated with the enclosing container type.
    #[error("{inner}\n   while {direction} object of type {ty}")]
    Context {
        direction: Direction,
        ty: &'static str,
        inner: Box<CodecError>,
    },
}

impl CodecError {
    pub(crate) fn malformed(direction: Direction, ty: &'static str, reason: &'static str) -> Self {
        CodecError::Malformed {
            direction,
            ty,
            reason,
        }
    }

    /// Wrap this error with one more layer of container context.
    pub fn context(self, direction: Direction, ty: &'static str) -> Self {
        CodecError::Context {
            direction,
            ty,
            inner: Box::new(self),
        }
    }

    /// The innermost error, skipping every context layer.
    pub fn root(&self) -> &CodecError {
        let mut err = self;
        while let CodecError::Context { inner, .. } = err {
            err = inner;
        }
        err
    }

    /// Root cause classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Truncated { .. } => ErrorKind::Truncated,
            CodecError::Overflow { .. } => ErrorKind::Overflow,
            CodecError::Malformed { .. } => ErrorKind::Malformed,
            CodecError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            CodecError::TooLarge { .. } => ErrorKind::TooLarge,
            CodecError::Io(_) => ErrorKind::Io,
            CodecError::Context { inner, .. } => inner.kind(),
        }
    }

    /// Container types this error passed through, innermost first.
    pub fn trace(&self) -> Vec<&'static str> {
        let mut types = Vec::new();
        let mut err = self;
        while let CodecError::Context { ty, inner, .. } = err {
            types.push(*ty);
            err = inner;
        }
        types.reverse();
        types
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Adds container context to element results at each recursive boundary.
pub(crate) trait ResultExt<T> {
    fn while_serializing(self, ty: &'static str) -> Result<T>;
    fn while_deserializing(self, ty: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn while_serializing(self, ty: &'static str) -> Result<T> {
        self.map_err(|err| err.context(Direction::Serializing, ty))
    }

    fn while_deserializing(self, ty: &'static str) -> Result<T> {
        self.map_err(|err| err.context(Direction::Deserializing, ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_appends_one_line_per_layer() {
        let err = CodecError::Truncated { ty: "u32" }
            .context(Direction::Deserializing, "Vec")
            .context(Direction::Deserializing, "BTreeMap");

        let message = err.to_string();
        assert!(message.starts_with("error deserializing object of type u32: stream ended early"));
        assert!(message.ends_with("while deserializing object of type BTreeMap"));
        assert_eq!(message.lines().count(), 3);
    }

    #[test]
    fn kind_and_root_see_through_context() {
        let err = CodecError::Overflow {
            ty: "u16",
            declared: 4,
        }
        .context(Direction::Deserializing, "Vec");

        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert!(matches!(err.root(), CodecError::Overflow { ty: "u16", .. }));
    }

    #[test]
    fn trace_lists_containers_outermost_last() {
        let err = CodecError::malformed(Direction::Deserializing, "bool", "expected '0' or '1'")
            .context(Direction::Deserializing, "tuple")
            .context(Direction::Deserializing, "Vec");

        assert_eq!(err.trace(), vec!["tuple", "Vec"]);
    }

    #[test]
    fn io_errors_convert() {
        let err: CodecError = std::io::Error::from(std::io::ErrorKind::BrokenPipe).into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.trace().is_empty());
    }
}
