use std::fmt;

use super::types::{GL_INVALID_ENUM, GL_INVALID_OPERATION, GL_INVALID_VALUE, GL_NO_ERROR, GLenum};

/// Recoverable API error. None of these are fatal; the failing call leaves
/// state untouched.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GlError {
    /// Unrecognized token for an enumerated parameter.
    InvalidEnum,
    /// Numeric argument outside its domain.
    InvalidValue,
    /// Call not allowed in the current phase.
    InvalidOperation,
}

impl GlError {
    #[inline]
    pub const fn code(self) -> GLenum {
        match self {
            GlError::InvalidEnum => GL_INVALID_ENUM,
            GlError::InvalidValue => GL_INVALID_VALUE,
            GlError::InvalidOperation => GL_INVALID_OPERATION,
        }
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GlError::InvalidEnum => "GL_INVALID_ENUM",
            GlError::InvalidValue => "GL_INVALID_VALUE",
            GlError::InvalidOperation => "GL_INVALID_OPERATION",
        };
        write!(f, "{name} (0x{:04X})", self.code())
    }
}

impl std::error::Error for GlError {}

pub type GlResult<T = ()> = Result<T, GlError>;

/// Single-slot sticky error latch behind `glGetError`.
///
/// The first error recorded is kept until [`ErrorSlot::take`] reads it; errors
/// raised while the slot is occupied are dropped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ErrorSlot {
    latched: Option<GlError>,
}

impl ErrorSlot {
    #[inline]
    pub const fn new() -> Self {
        Self { latched: None }
    }

    pub fn record(&mut self, err: GlError) {
        if self.latched.is_none() {
            self.latched = Some(err);
        }
    }

    #[inline]
    pub fn peek(&self) -> Option<GlError> {
        self.latched
    }

    /// Returns and clears the latched error.
    #[inline]
    pub fn take(&mut self) -> Option<GlError> {
        self.latched.take()
    }

    /// `glGetError` semantics: returns the code and clears the slot.
    #[inline]
    pub fn take_code(&mut self) -> GLenum {
        self.take().map_or(GL_NO_ERROR, GlError::code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_reports_no_error() {
        let mut slot = ErrorSlot::new();
        assert_eq!(slot.take_code(), GL_NO_ERROR);
    }

    #[test]
    fn first_error_wins_until_read() {
        let mut slot = ErrorSlot::new();
        slot.record(GlError::InvalidValue);
        slot.record(GlError::InvalidEnum);
        assert_eq!(slot.take(), Some(GlError::InvalidValue));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn slot_rearms_after_read() {
        let mut slot = ErrorSlot::new();
        slot.record(GlError::InvalidOperation);
        assert_eq!(slot.take_code(), GL_INVALID_OPERATION);
        slot.record(GlError::InvalidEnum);
        assert_eq!(slot.take_code(), GL_INVALID_ENUM);
    }

    #[test]
    fn empty_slot_reads_no_error() {
        let mut slot = ErrorSlot::new();
        assert_eq!(slot.take_code(), GL_NO_ERROR);
        assert_eq!(GlError::InvalidValue.code(), GL_INVALID_VALUE);
    }
}
