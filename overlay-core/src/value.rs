//! The dynamic value model
//!
//! Every get/set boundary in overlay trades in [`Value`]: scalars read out
//! of a buffer, strings reconstructed from a stored pointer, records used
//! to initialize composites, and tagged views standing in for nested
//! composite instances.

use alloc::string::String;
use indexmap::IndexMap;

use crate::Buffer;

/// A dynamically-typed value crossing a get/set boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating-point number.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// An owned string (the pointee of a C string field).
    Str(String),
    /// An initializer record: member name to value, in insertion order.
    Record(IndexMap<String, Value>),
    /// A typed view into some backing storage, e.g. a nested composite.
    Buffer(Buffer),
    /// A null pointer.
    Null,
}

impl Value {
    /// The name of this value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Record(_) => "record",
            Value::Buffer(_) => "buffer",
            Value::Null => "null",
        }
    }

    /// This value as a signed integer, C conversion rules (floats
    /// truncate, booleans become 0/1). `None` for non-numeric kinds.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => Some(*v as i64),
            Value::Float(v) => Some(*v as i64),
            Value::Bool(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// This value as an unsigned integer, C conversion rules.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(v) => Some(*v as u64),
            Value::UInt(v) => Some(*v),
            Value::Float(v) => Some(*v as u64),
            Value::Bool(v) => Some(*v as u64),
            _ => None,
        }
    }

    /// This value as a float, C conversion rules.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(v) => Some(*v as u8 as f64),
            _ => None,
        }
    }

    /// Builds a [`Value::Record`] from name/value pairs, preserving their
    /// order.
    pub fn record<N: Into<String>>(entries: impl IntoIterator<Item = (N, Value)>) -> Self {
        Value::Record(
            entries
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

macro_rules! value_from {
    ($($from:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$from> for Value {
                fn from(v: $from) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    i8 => Int, i16 => Int, i32 => Int, i64 => Int,
    u8 => UInt, u16 => UInt, u32 => UInt, u64 => UInt,
    f32 => Float, f64 => Float,
    bool => Bool,
    String => Str,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.into())
    }
}
