use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::enums::{EnumDomain, EnumValue};
use crate::error::TypeError;
use crate::numeric::{NonNegativeInteger, PercentFraction, PositiveFloat, PositiveInteger};
use crate::timestamp::Timestamp;

/// Declared semantic kind of a schema property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    String,
    Boolean,
    Integer,
    Double,
    NonNegativeInteger,
    PositiveInteger,
    PositiveFloat,
    PercentFraction,
    Timestamp,
    Color,
    Enum(EnumDomain),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
            Self::Integer => write!(f, "integer"),
            Self::Double => write!(f, "double"),
            Self::NonNegativeInteger => write!(f, "non-negative integer"),
            Self::PositiveInteger => write!(f, "positive integer"),
            Self::PositiveFloat => write!(f, "positive float"),
            Self::PercentFraction => write!(f, "percent fraction"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::Color => write!(f, "color"),
            Self::Enum(domain) => write!(f, "{domain}"),
        }
    }
}

/// A property value as held in the metadata tree.
///
/// Stored values are always in the canonical representation of their
/// property's [`ValueKind`]; see [`Value::coerce`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    String(String),
    Boolean(bool),
    Integer(i64),
    Double(f64),
    NonNegativeInteger(NonNegativeInteger),
    PositiveInteger(PositiveInteger),
    PositiveFloat(PositiveFloat),
    PercentFraction(PercentFraction),
    Timestamp(Timestamp),
    Color(Color),
    Enum(EnumValue),
}

impl Value {
    /// The kind this value currently carries.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Double(_) => ValueKind::Double,
            Value::NonNegativeInteger(_) => ValueKind::NonNegativeInteger,
            Value::PositiveInteger(_) => ValueKind::PositiveInteger,
            Value::PositiveFloat(_) => ValueKind::PositiveFloat,
            Value::PercentFraction(_) => ValueKind::PercentFraction,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Color(_) => ValueKind::Color,
            Value::Enum(e) => ValueKind::Enum(e.domain),
        }
    }

    /// Convert into the canonical representation for `target`.
    ///
    /// Admitted conversions beyond identity:
    /// - strings parse into enumerations and timestamps
    /// - integers widen into doubles, positive floats and percent fractions
    /// - integers check into non-negative / positive integers
    /// - doubles check into positive floats and percent fractions
    /// - integers pack into colours
    ///
    /// Anything else is a [`TypeError::TypeMismatch`].
    pub fn coerce(self, target: ValueKind) -> Result<Value, TypeError> {
        let found = self.kind();
        let mismatch = || TypeError::TypeMismatch {
            expected: target.to_string(),
            found: found.to_string(),
        };

        Ok(match (target, self) {
            (ValueKind::String, v @ Value::String(_)) => v,
            (ValueKind::Boolean, v @ Value::Boolean(_)) => v,
            (ValueKind::Integer, v @ Value::Integer(_)) => v,
            (ValueKind::Double, v @ Value::Double(_)) => v,
            (ValueKind::Double, Value::Integer(i)) => Value::Double(i as f64),

            (ValueKind::NonNegativeInteger, v @ Value::NonNegativeInteger(_)) => v,
            (ValueKind::NonNegativeInteger, Value::Integer(i)) => {
                Value::NonNegativeInteger(NonNegativeInteger::new(i)?)
            }
            (ValueKind::PositiveInteger, v @ Value::PositiveInteger(_)) => v,
            (ValueKind::PositiveInteger, Value::Integer(i)) => {
                Value::PositiveInteger(PositiveInteger::new(i)?)
            }
            (ValueKind::PositiveFloat, v @ Value::PositiveFloat(_)) => v,
            (ValueKind::PositiveFloat, Value::Double(d)) => {
                Value::PositiveFloat(PositiveFloat::new(d)?)
            }
            (ValueKind::PositiveFloat, Value::Integer(i)) => {
                Value::PositiveFloat(PositiveFloat::new(i as f64)?)
            }
            (ValueKind::PercentFraction, v @ Value::PercentFraction(_)) => v,
            (ValueKind::PercentFraction, Value::Double(d)) => {
                Value::PercentFraction(PercentFraction::new(d)?)
            }
            (ValueKind::PercentFraction, Value::Integer(i)) => {
                Value::PercentFraction(PercentFraction::new(i as f64)?)
            }

            (ValueKind::Timestamp, v @ Value::Timestamp(_)) => v,
            (ValueKind::Timestamp, Value::String(s)) => Value::Timestamp(s.parse()?),

            (ValueKind::Color, v @ Value::Color(_)) => v,
            (ValueKind::Color, Value::Integer(i)) => {
                let packed = i32::try_from(i).map_err(|_| TypeError::ConstraintViolation {
                    constraint: "color fits in 32 bits",
                    value: i.to_string(),
                })?;
                Value::Color(Color::from_packed(packed))
            }

            (ValueKind::Enum(domain), Value::Enum(e)) if e.domain == domain => Value::Enum(e),
            (ValueKind::Enum(domain), Value::String(s)) => Value::Enum(domain.parse(&s)?),

            _ => return Err(mismatch()),
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::NonNegativeInteger(v) => write!(f, "{v}"),
            Value::PositiveInteger(v) => write!(f, "{v}"),
            Value::PositiveFloat(v) => write!(f, "{v}"),
            Value::PercentFraction(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{v}"),
            Value::Color(v) => write!(f, "{v}"),
            Value::Enum(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions in
// ---------------------------------------------------------------------------

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

/// Saturates at `i64::MAX`.
impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Integer(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<NonNegativeInteger> for Value {
    fn from(v: NonNegativeInteger) -> Self {
        Value::NonNegativeInteger(v)
    }
}

impl From<PositiveInteger> for Value {
    fn from(v: PositiveInteger) -> Self {
        Value::PositiveInteger(v)
    }
}

impl From<PositiveFloat> for Value {
    fn from(v: PositiveFloat) -> Self {
        Value::PositiveFloat(v)
    }
}

impl From<PercentFraction> for Value {
    fn from(v: PercentFraction) -> Self {
        Value::PercentFraction(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Color(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Value::Enum(v)
    }
}

// ---------------------------------------------------------------------------
// Conversions out
// ---------------------------------------------------------------------------

/// Extract a typed Rust value from a stored [`Value`].
///
/// Returns `None` when the stored representation does not match.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value {
    ($ty:ty, $variant:ident) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

from_value!(String, String);
from_value!(bool, Boolean);
from_value!(i64, Integer);
from_value!(f64, Double);
from_value!(NonNegativeInteger, NonNegativeInteger);
from_value!(PositiveInteger, PositiveInteger);
from_value!(PositiveFloat, PositiveFloat);
from_value!(PercentFraction, PercentFraction);
from_value!(Timestamp, Timestamp);
from_value!(Color, Color);
from_value!(EnumValue, Enum);

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}
