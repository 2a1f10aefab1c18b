use overlay_core::AccessError;
use owo_colors::OwoColorize;

/// Why a field name was rejected at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameProblem {
    /// The empty string is not a field name.
    Empty,
    /// The name is claimed by the instance surface.
    Reserved,
    /// A field with this name is already registered.
    Duplicate,
}

/// Errors raised while building a union type or driving one of its
/// instances. All of these are precondition violations surfaced at the
/// offending call; none leave the descriptor or instance half-changed.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum UnionError {
    /// Field registration was attempted after the first instance was
    /// constructed; the field set is frozen from that point on.
    AlreadyFinalized {
        /// The field that was being registered.
        field: String,
    },

    /// The field name is empty, reserved, or already taken.
    InvalidName {
        /// The rejected name.
        name: String,
        /// What is wrong with it.
        problem: NameProblem,
    },

    /// The type specifier did not resolve to a usable descriptor.
    InvalidType {
        /// The field the specifier was given for.
        field: String,
        /// The specifier, as written.
        spec: String,
    },

    /// A caller-supplied backing buffer is shorter than the union's size.
    BufferTooSmall {
        /// Bytes the layout requires.
        required: usize,
        /// Bytes the buffer actually has.
        actual: usize,
    },

    /// An initializer record or accessor call named a field that is not
    /// registered.
    UnknownField {
        /// The name that matched nothing.
        name: String,
    },

    /// A failure propagated from a field type's own get/set codec.
    Access(AccessError),
}

impl From<AccessError> for UnionError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::UnknownField { name } => UnionError::UnknownField { name },
            other => UnionError::Access(other),
        }
    }
}

impl core::fmt::Display for UnionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UnionError::AlreadyFinalized { field } => {
                write!(
                    f,
                    "Cannot register field {} after an instance has been constructed",
                    field.yellow()
                )
            }
            UnionError::InvalidName { name, problem } => match problem {
                NameProblem::Empty => write!(f, "Field names must be non-empty"),
                NameProblem::Reserved => {
                    write!(
                        f,
                        "Field name {} is reserved by the instance surface",
                        name.red()
                    )
                }
                NameProblem::Duplicate => {
                    write!(f, "A field named {} is already registered", name.red())
                }
            },
            UnionError::InvalidType { field, spec } => {
                write!(
                    f,
                    "Field {}: {} does not resolve to a usable type",
                    field.yellow(),
                    spec.red()
                )
            }
            UnionError::BufferTooSmall { required, actual } => {
                write!(
                    f,
                    "Backing buffer too small: the layout needs {} bytes, got {}",
                    required.green(),
                    actual.red()
                )
            }
            UnionError::UnknownField { name } => {
                write!(f, "No field named {}", name.red())
            }
            UnionError::Access(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for UnionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            UnionError::Access(err) => Some(err),
            _ => None,
        }
    }
}
