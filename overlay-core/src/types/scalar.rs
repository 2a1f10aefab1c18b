//! Scalar primitives
//!
//! One unit type per C scalar, each implementing [`NativeType`] with a
//! native-endian byte codec. Setters apply C conversion rules to numeric
//! values; anything non-numeric is a [`ValueMismatch`](crate::AccessError).

use crate::{AccessError, Buffer, NativeType, Value};

macro_rules! scalar_type {
    ($(#[$doc:meta])* $name:ident, $prim:ty, $tag:literal, $variant:ident, $as:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl NativeType for $name {
            fn name(&self) -> &str {
                $tag
            }

            fn size(&self) -> usize {
                size_of::<$prim>()
            }

            fn alignment(&self) -> Option<usize> {
                Some(align_of::<$prim>())
            }

            fn get(&self, buffer: &Buffer, offset: usize) -> Result<Value, AccessError> {
                let raw = buffer.read_array::<{ size_of::<$prim>() }>(offset)?;
                Ok(Value::$variant(<$prim>::from_ne_bytes(raw) as _))
            }

            fn set(&self, buffer: &Buffer, offset: usize, value: Value) -> Result<(), AccessError> {
                let n = value.$as().ok_or(AccessError::ValueMismatch {
                    expected: $tag,
                    actual: value.kind(),
                })?;
                buffer.write_at(offset, &(n as $prim).to_ne_bytes())
            }
        }
    };
}

scalar_type! {
    /// Signed 8-bit integer (`int8_t`).
    Int8, i8, "int8", Int, as_i64
}
scalar_type! {
    /// Signed 16-bit integer (`int16_t`).
    Int16, i16, "int16", Int, as_i64
}
scalar_type! {
    /// Signed 32-bit integer (`int32_t`).
    Int32, i32, "int32", Int, as_i64
}
scalar_type! {
    /// Signed 64-bit integer (`int64_t`).
    Int64, i64, "int64", Int, as_i64
}
scalar_type! {
    /// Unsigned 8-bit integer (`uint8_t`).
    UInt8, u8, "uint8", UInt, as_u64
}
scalar_type! {
    /// Unsigned 16-bit integer (`uint16_t`).
    UInt16, u16, "uint16", UInt, as_u64
}
scalar_type! {
    /// Unsigned 32-bit integer (`uint32_t`).
    UInt32, u32, "uint32", UInt, as_u64
}
scalar_type! {
    /// Unsigned 64-bit integer (`uint64_t`).
    UInt64, u64, "uint64", UInt, as_u64
}
scalar_type! {
    /// 32-bit IEEE 754 float (`float`).
    Float32, f32, "float32", Float, as_f64
}
scalar_type! {
    /// 64-bit IEEE 754 float (`double`).
    Float64, f64, "float64", Float, as_f64
}

/// One-byte boolean. Reads treat any nonzero byte as `true`; writes store
/// 0 or 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bool;

impl NativeType for Bool {
    fn name(&self) -> &str {
        "bool"
    }

    fn size(&self) -> usize {
        1
    }

    fn alignment(&self) -> Option<usize> {
        Some(1)
    }

    fn get(&self, buffer: &Buffer, offset: usize) -> Result<Value, AccessError> {
        let [raw] = buffer.read_array::<1>(offset)?;
        Ok(Value::Bool(raw != 0))
    }

    fn set(&self, buffer: &Buffer, offset: usize, value: Value) -> Result<(), AccessError> {
        let n = value.as_i64().ok_or(AccessError::ValueMismatch {
            expected: "bool",
            actual: value.kind(),
        })?;
        buffer.write_at(offset, &[(n != 0) as u8])
    }
}
