//! NUL-terminated string pointers
//!
//! A [`CStringPointer`] field stores an *address* in the buffer, not the
//! characters themselves: it has pointer depth 2 (pointer to `char`). The
//! pointee is allocated on write and pinned to the buffer's storage so the
//! stored address stays valid for the storage's lifetime.

use alloc::borrow::ToOwned;
use alloc::ffi::CString;
use alloc::rc::Rc;
use alloc::string::ToString;
use core::ffi::CStr;

use log::trace;

use crate::{AccessError, Buffer, NativeType, POINTER_ALIGN, POINTER_SIZE, Value};

/// Pointer to a NUL-terminated C string (`char *`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CStringPointer;

impl NativeType for CStringPointer {
    fn name(&self) -> &str {
        "cstring"
    }

    fn size(&self) -> usize {
        POINTER_SIZE
    }

    fn alignment(&self) -> Option<usize> {
        Some(POINTER_ALIGN)
    }

    fn indirection(&self) -> u32 {
        2
    }

    fn get(&self, buffer: &Buffer, offset: usize) -> Result<Value, AccessError> {
        let raw = buffer.read_array::<POINTER_SIZE>(offset)?;
        let address = usize::from_ne_bytes(raw);
        if address == 0 {
            return Ok(Value::Null);
        }
        // SAFETY: a nonzero address in a cstring field was either written
        // by `set` below, in which case the pointee is pinned in the
        // buffer's attachment registry, or placed there by foreign code
        // that guarantees a live NUL-terminated string. Both are
        // preconditions of reading through this field.
        let chars = unsafe { CStr::from_ptr(address as *const core::ffi::c_char) };
        let text = chars
            .to_str()
            .map_err(|_| AccessError::BadPointer { address })?;
        Ok(Value::Str(text.to_owned()))
    }

    fn set(&self, buffer: &Buffer, offset: usize, value: Value) -> Result<(), AccessError> {
        match value {
            Value::Null => buffer.write_at(offset, &0usize.to_ne_bytes()),
            Value::Str(text) => {
                let owned = CString::new(text).map_err(|e| AccessError::InvalidString {
                    reason: e.to_string(),
                })?;
                let owned = Rc::new(owned);
                let address = owned.as_ptr() as usize;
                trace!(
                    "pinning {}-byte C string at {address:#x}",
                    owned.as_bytes().len()
                );
                buffer.write_at(offset, &address.to_ne_bytes())?;
                // The address is only good while the allocation lives, so
                // pin it to the storage the address was written into.
                buffer.attach(owned);
                Ok(())
            }
            other => Err(AccessError::ValueMismatch {
                expected: "cstring",
                actual: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_stored_pointer() {
        let buffer = Buffer::alloc(POINTER_SIZE);
        CStringPointer
            .set(&buffer, 0, Value::Str("hello".into()))
            .unwrap();
        assert_ne!(buffer.to_vec(), vec![0u8; POINTER_SIZE]);
        assert_eq!(
            CStringPointer.get(&buffer, 0).unwrap(),
            Value::Str("hello".into())
        );
    }

    #[test]
    fn null_pointers_read_back_as_null() {
        let buffer = Buffer::alloc(POINTER_SIZE);
        assert_eq!(CStringPointer.get(&buffer, 0).unwrap(), Value::Null);
        CStringPointer.set(&buffer, 0, Value::Null).unwrap();
        assert_eq!(buffer.to_vec(), vec![0u8; POINTER_SIZE]);
    }

    #[test]
    fn interior_nul_bytes_are_rejected() {
        let buffer = Buffer::alloc(POINTER_SIZE);
        let err = CStringPointer
            .set(&buffer, 0, Value::Str("a\0b".into()))
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidString { .. }));
    }
}
