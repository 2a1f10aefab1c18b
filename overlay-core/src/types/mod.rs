//! The typed-memory-access contract
//!
//! A [`NativeType`] describes one foreign type well enough to place it in a
//! composite layout and to move values of it in and out of raw bytes. The
//! composite builders implement this trait too, which is what lets a union
//! or struct be used as a field of an enclosing composite.

use alloc::rc::Rc;
use alloc::string::{String, ToString};

use crate::{AccessError, Buffer, Value};

mod scalar;
pub use scalar::*;

mod cstring;
pub use cstring::*;

/// Width of a pointer on the host target.
pub const POINTER_SIZE: usize = size_of::<*const ()>();

/// Alignment of a pointer on the host target.
pub const POINTER_ALIGN: usize = align_of::<*const ()>();

/// A runtime type descriptor: size, alignment, pointer depth, and the
/// codec moving values of the type in and out of raw bytes.
pub trait NativeType {
    /// Short name of the type, for diagnostics.
    fn name(&self) -> &str;

    /// Byte size of a direct value of this type.
    fn size(&self) -> usize;

    /// Declared alignment. `None` means the type declares no alignment of
    /// its own and the pointer alignment applies.
    fn alignment(&self) -> Option<usize>;

    /// Pointer depth. `1` is a direct value; greater means the stored
    /// representation is an address.
    fn indirection(&self) -> u32 {
        1
    }

    /// Reads a value of this type out of `buffer` at `offset`.
    fn get(&self, buffer: &Buffer, offset: usize) -> Result<Value, AccessError>;

    /// Writes `value`'s byte representation into `buffer` at `offset`.
    fn set(&self, buffer: &Buffer, offset: usize, value: Value) -> Result<(), AccessError>;

    /// The footprint a field of this type occupies inside a composite: an
    /// indirected field stores an address, so it takes pointer-width
    /// storage regardless of the pointee's size.
    fn stored_size(&self) -> usize {
        if self.indirection() > 1 {
            POINTER_SIZE
        } else {
            self.size()
        }
    }

    /// The alignment a field of this type requires inside a composite.
    fn stored_alignment(&self) -> usize {
        if self.indirection() > 1 {
            POINTER_ALIGN
        } else {
            self.alignment().unwrap_or(POINTER_ALIGN)
        }
    }
}

/// A type specifier: something that resolves to a [`NativeType`]
/// descriptor. Implemented for already-resolved descriptors and for
/// well-known type tags like `"int32"`.
pub trait ResolveType {
    /// Human-readable form of the specifier, for diagnostics.
    fn describe(&self) -> String;

    /// Resolves to a full descriptor, or `None` if the specifier does not
    /// name one.
    fn resolve(self) -> Option<Rc<dyn NativeType>>;
}

impl ResolveType for Rc<dyn NativeType> {
    fn describe(&self) -> String {
        self.name().to_string()
    }

    fn resolve(self) -> Option<Rc<dyn NativeType>> {
        Some(self)
    }
}

impl<T: NativeType + 'static> ResolveType for Rc<T> {
    fn describe(&self) -> String {
        self.name().to_string()
    }

    fn resolve(self) -> Option<Rc<dyn NativeType>> {
        Some(self)
    }
}

impl ResolveType for &str {
    fn describe(&self) -> String {
        self.to_string()
    }

    fn resolve(self) -> Option<Rc<dyn NativeType>> {
        lookup(self)
    }
}

impl ResolveType for String {
    fn describe(&self) -> String {
        self.clone()
    }

    fn resolve(self) -> Option<Rc<dyn NativeType>> {
        lookup(&self)
    }
}

/// Resolves a well-known type tag to its descriptor.
///
/// Tags follow the usual C aliases: `"int"` is `"int32"`, `"double"` is
/// `"float64"`, and so on.
pub fn lookup(tag: &str) -> Option<Rc<dyn NativeType>> {
    Some(match tag {
        "int8" | "char" => Rc::new(Int8),
        "uint8" | "uchar" | "byte" => Rc::new(UInt8),
        "int16" | "short" => Rc::new(Int16),
        "uint16" | "ushort" => Rc::new(UInt16),
        "int32" | "int" => Rc::new(Int32),
        "uint32" | "uint" => Rc::new(UInt32),
        "int64" | "longlong" => Rc::new(Int64),
        "uint64" | "ulonglong" => Rc::new(UInt64),
        "float" | "float32" => Rc::new(Float32),
        "double" | "float64" => Rc::new(Float64),
        "bool" => Rc::new(Bool),
        "cstring" | "string" => Rc::new(CStringPointer),
        _ => return None,
    })
}
