use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! constrained {
    (
        $(#[$meta:meta])*
        $name:ident($inner:ty = $inner_name:literal), $constraint:literal, |$v:ident| $check:expr
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
        #[serde(try_from = $inner_name, into = $inner_name)]
        pub struct $name($inner);

        impl $name {
            /// Human-readable constraint this type enforces.
            pub const CONSTRAINT: &'static str = $constraint;

            /// Construct a checked value.
            pub fn new($v: $inner) -> Result<Self, TypeError> {
                if $check {
                    Ok(Self($v))
                } else {
                    Err(TypeError::ConstraintViolation {
                        constraint: $constraint,
                        value: $v.to_string(),
                    })
                }
            }

            /// The underlying primitive.
            pub fn get(&self) -> $inner {
                self.0
            }
        }

        impl TryFrom<$inner> for $name {
            type Error = TypeError;

            fn try_from(value: $inner) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

constrained!(
    /// Integer `>= 0` (plane coordinates, well row/column, IFD offsets).
    NonNegativeInteger(i64 = "i64"), "non-negative integer (>= 0)", |v| v >= 0
);

constrained!(
    /// Integer `> 0` (dimension sizes, significant bits, samples per pixel).
    PositiveInteger(i64 = "i64"), "positive integer (> 0)", |v| v > 0
);

constrained!(
    /// Finite float `> 0.0` (physical sizes, wavelengths).
    PositiveFloat(f64 = "f64"), "positive float (> 0.0)", |v| v.is_finite() && v > 0.0
);

constrained!(
    /// Fraction in `[0.0, 1.0]` (attenuation, humidity, transmittance).
    PercentFraction(f64 = "f64"), "percent fraction in [0.0, 1.0]", |v| (0.0..=1.0).contains(&v)
);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn positive_integer_rejects_zero() {
        let err = PositiveInteger::new(0).unwrap_err();
        assert!(matches!(err, TypeError::ConstraintViolation { .. }));
        assert_eq!(PositiveInteger::new(512).unwrap().get(), 512);
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(NonNegativeInteger::new(0).unwrap().get(), 0);
        assert!(NonNegativeInteger::new(-1).is_err());
    }

    #[test]
    fn percent_fraction_bounds_are_inclusive() {
        assert!(PercentFraction::new(0.0).is_ok());
        assert!(PercentFraction::new(1.0).is_ok());
        assert!(PercentFraction::new(1.0001).is_err());
        assert!(PercentFraction::new(-0.1).is_err());
        assert!(PercentFraction::new(f64::NAN).is_err());
    }

    #[test]
    fn positive_float_rejects_non_finite() {
        assert!(PositiveFloat::new(f64::INFINITY).is_err());
        assert!(PositiveFloat::new(0.0).is_err());
        assert!(PositiveFloat::new(0.065).is_ok());
    }

    #[test]
    fn deserialize_enforces_constraint() {
        let ok: PositiveInteger = serde_json::from_str("3").unwrap();
        assert_eq!(ok.get(), 3);
        assert!(serde_json::from_str::<PositiveInteger>("0").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "3");
    }

    proptest! {
        #[test]
        fn positive_integer_accepts_exactly_positive(v in any::<i64>()) {
            prop_assert_eq!(PositiveInteger::new(v).is_ok(), v > 0);
        }

        #[test]
        fn percent_fraction_accepts_unit_interval(v in -2.0f64..2.0) {
            prop_assert_eq!(PercentFraction::new(v).is_ok(), (0.0..=1.0).contains(&v));
        }
    }
}
