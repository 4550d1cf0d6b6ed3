use std::fmt;

/// The error taxonomy shared by the geometry model and the algorithm crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A geometry contains NaN/infinite ordinates, a ring is unclosed, or an
    /// operation received arguments it cannot interpret.
    InvalidInput(String),

    /// The operation does not support the supplied geometry kind (e.g.
    /// overlay of a `GeometryCollection`).
    UnsupportedGeometry {
        operation: &'static str,
        found: &'static str,
    },

    /// Noding failed to converge, labelling is inconsistent, or polygon
    /// assembly could not find a valid ring walk. Retryable: the overlay and
    /// buffer entry points catch this and retry under reduced precision
    /// before re-raising.
    Topology(String),

    /// A homogeneous-coordinate intersection overflowed. Handled internally
    /// by the nearest-endpoint fallback and not normally surfaced.
    NotRepresentable,
}

impl Error {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// True for errors the overlay precision-retry loop may recover from.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Topology(_))
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Error::UnsupportedGeometry { operation, found } => {
                write!(f, "{} does not support {}", operation, found)
            }
            Error::Topology(msg) => write!(f, "topology error: {}", msg),
            Error::NotRepresentable => {
                write!(f, "intersection is not representable in double precision")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let err = Error::UnsupportedGeometry {
            operation: "overlay",
            found: "GeometryCollection",
        };
        assert_eq!(err.to_string(), "overlay does not support GeometryCollection");
        assert!(!err.is_retryable());
        assert!(Error::Topology("no outgoing dirEdge found".into()).is_retryable());
    }
}
