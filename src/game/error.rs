use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A game was configured with a value outside its allowed range.
    InvalidConfiguration {
        field:  &'static str,
        reason: &'static str,
    },
    /// A direction index outside `0..=3`.
    InvalidDirection(i64),
}

impl Error {
    pub(crate) const fn config(
        field: &'static str,
        reason: &'static str,
    ) -> Self {
        Self::InvalidConfiguration { field, reason }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { field, reason } => {
                write!(f, "invalid configuration: {field} {reason}")
            },
            Self::InvalidDirection(value) => write!(
                f,
                "invalid direction {value}: expected 0 (up) to 3 (left) in \
                 clockwise order"
            ),
        }
    }
}

impl std::error::Error for Error {}
