use thiserror::Error;

/// Errors raised at a construction call site.
///
/// These signal programmer errors (constructing a type that must not be
/// constructed), not operational failures. None of them is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypexError {
    /// The type forbids direct instantiation: a [`Static`](crate::Static) marker
    /// or an abstract singleton/multiton base.
    #[error("cannot instantiate {type_name}: {reason}")]
    InvalidUse {
        type_name: &'static str,
        reason: &'static str,
    },

    /// The type still has required methods without an override.
    #[error("cannot instantiate {type_name}: missing overrides for {}", .missing.join(", "))]
    IncompleteType {
        type_name: &'static str,
        missing: Vec<&'static str>,
    },

    /// The instance was requested again from inside its own constructor.
    /// Also raised when waiting for the instance would deadlock on constructors
    /// running in other threads.
    #[error(
        "{type_name} was requested while its constructor was still running{}",
        instance_suffix(.instance_name)
    )]
    RecursiveConstruction {
        type_name: &'static str,
        instance_name: Option<String>,
    },
}

/// The ` (instance "name")` tail of a multiton error message.
fn instance_suffix(instance_name: &Option<String>) -> String {
    match instance_name {
        Some(name) => format!(" (instance {name:?})"),
        None => String::new(),
    }
}

impl TypexError {
    pub(crate) fn abstract_base<T: ?Sized>() -> Self {
        TypexError::InvalidUse {
            type_name: std::any::type_name::<T>(),
            reason: "abstract pattern bases cannot be instantiated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_use_display() {
        let err = TypexError::InvalidUse {
            type_name: "app::Paths",
            reason: "static types cannot be instantiated",
        };
        assert_eq!(
            err.to_string(),
            "cannot instantiate app::Paths: static types cannot be instantiated"
        );
    }

    #[test]
    fn test_incomplete_type_display() {
        let err = TypexError::IncompleteType {
            type_name: "app::Codec",
            missing: vec!["encode", "decode"],
        };
        assert_eq!(
            err.to_string(),
            "cannot instantiate app::Codec: missing overrides for encode, decode"
        );
    }

    #[test]
    fn test_recursive_construction_display() {
        let err = TypexError::RecursiveConstruction {
            type_name: "app::Pool",
            instance_name: None,
        };
        assert_eq!(
            err.to_string(),
            "app::Pool was requested while its constructor was still running"
        );

        let err = TypexError::RecursiveConstruction {
            type_name: "app::Worker",
            instance_name: Some("a".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "app::Worker was requested while its constructor was still running (instance \"a\")"
        );
    }

    #[test]
    fn test_abstract_base_names_the_type() {
        let err = TypexError::abstract_base::<u8>();
        assert_eq!(
            err,
            TypexError::InvalidUse {
                type_name: "u8",
                reason: "abstract pattern bases cannot be instantiated",
            }
        );
    }

    #[test]
    fn test_error_trait() {
        let err: &dyn std::error::Error = &TypexError::abstract_base::<u8>();
        assert!(err.source().is_none());
        assert_eq!(
            err.to_string(),
            "cannot instantiate u8: abstract pattern bases cannot be instantiated"
        );
    }
}
