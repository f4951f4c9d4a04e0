//! Instantiation markers.
//!
//! The compile-time form of both markers is plain Rust: a namespace is an
//! enum with no variants, and an abstract method is a required trait method.
//! The traits here cover the runtime case, where a type is asked to produce a
//! value through a generic path and must refuse.

use crate::TypexError;

/// A type used only as a namespace for associated functions and constants.
///
/// ```
/// use typex::{Static, TypexError};
///
/// enum Paths {}
///
/// impl Paths {
///     pub const CONFIG: &'static str = "/etc/app.toml";
/// }
///
/// impl Static for Paths {}
///
/// assert!(matches!(Paths::instantiate(), Err(TypexError::InvalidUse { .. })));
/// ```
pub trait Static: 'static {
    /// Always fails with [`TypexError::InvalidUse`].
    fn instantiate() -> Result<Self, TypexError>
    where
        Self: Sized,
    {
        Err(TypexError::InvalidUse {
            type_name: std::any::type_name::<Self>(),
            reason: "static types cannot be instantiated",
        })
    }
}

/// A type that declares methods its implementors must provide, checked when an
/// instance is requested.
pub trait Abstract {
    /// Names of the methods that must be overridden.
    const REQUIRED: &'static [&'static str];

    /// Names of the methods this type actually overrides.
    fn provided() -> &'static [&'static str];

    /// Required methods without an override, in declaration order.
    fn missing() -> Vec<&'static str> {
        let provided = Self::provided();
        Self::REQUIRED
            .iter()
            .copied()
            .filter(|name| !provided.contains(name))
            .collect()
    }

    /// Fails with [`TypexError::IncompleteType`] while any required method is missing.
    fn ensure_complete() -> Result<(), TypexError> {
        let missing = Self::missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TypexError::IncompleteType {
                type_name: std::any::type_name::<Self>(),
                missing,
            })
        }
    }

    /// Builds a value with `build` once the type is complete.
    fn instantiate_with<T>(build: impl FnOnce() -> T) -> Result<T, TypexError> {
        Self::ensure_complete()?;
        Ok(build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Namespace {}
    impl Static for Namespace {}

    #[test]
    fn test_static_cannot_be_instantiated() {
        match Namespace::instantiate() {
            Err(TypexError::InvalidUse { type_name, .. }) => {
                assert!(type_name.ends_with("Namespace"))
            }
            _ => panic!("static type was instantiated"),
        }
    }

    struct Codec;

    impl Abstract for Codec {
        const REQUIRED: &'static [&'static str] = &["encode", "decode", "name"];

        fn provided() -> &'static [&'static str] {
            &["name"]
        }
    }

    struct Complete;

    impl Abstract for Complete {
        const REQUIRED: &'static [&'static str] = &["run"];

        fn provided() -> &'static [&'static str] {
            &["run"]
        }
    }

    #[test]
    fn test_missing_overrides_are_listed_in_order() {
        assert_eq!(Codec::missing(), vec!["encode", "decode"]);
        let err = Codec::ensure_complete().unwrap_err();
        assert_eq!(
            err,
            TypexError::IncompleteType {
                type_name: std::any::type_name::<Codec>(),
                missing: vec!["encode", "decode"],
            }
        );
    }

    #[test]
    fn test_incomplete_type_is_not_built() {
        let mut built = false;
        let result = Codec::instantiate_with(|| built = true);
        assert!(result.is_err());
        assert!(!built);
    }

    #[test]
    fn test_complete_type_is_built() {
        assert!(Complete::missing().is_empty());
        assert_eq!(Complete::instantiate_with(|| 5).unwrap(), 5);
    }
}
