//! Union instances
//!
//! A [`UnionInstance`] binds a union descriptor to a backing buffer and
//! exposes each registered field as a typed accessor over that one shared
//! region. Reading a field reinterprets whatever bytes the last write
//! (through any field) left behind; that hazard is the contract, and
//! nothing here tags or checks which member is "active".

use alloc::rc::Rc;
use alloc::string::ToString;

use log::trace;
use overlay_core::{AccessError, Buffer, NativeType, Value};

use crate::{UnionError, UnionField, UnionType};

/// One live union value over a backing buffer.
///
/// Instances are view handles: constructing one over a caller-supplied
/// buffer adopts the buffer without copying, and every write through the
/// instance lands in the original storage. A nested read
/// ([`NativeType::get`] on the descriptor) hands back a tagged sub-view
/// that [`UnionType::instance_in`] rebinds into a full instance.
pub struct UnionInstance {
    ty: Rc<UnionType>,
    buffer: Buffer,
}

impl UnionInstance {
    /// Fresh zero-filled backing buffer of exactly the union's size.
    pub(crate) fn allocate(ty: Rc<UnionType>) -> Self {
        let mut buffer = Buffer::alloc(ty.layout().size);
        buffer.set_type(ty.rc());
        ty.seal();
        Self { ty, buffer }
    }

    /// Adopts `buffer` as backing storage, without copying.
    pub(crate) fn adopt(ty: Rc<UnionType>, mut buffer: Buffer) -> Result<Self, UnionError> {
        let required = ty.layout().size;
        if buffer.len() < required {
            return Err(UnionError::BufferTooSmall {
                required,
                actual: buffer.len(),
            });
        }
        buffer.set_type(ty.rc());
        ty.seal();
        Ok(Self { ty, buffer })
    }

    /// Rebinds a view that is already known to fit the layout (the nested
    /// set protocol carves it out of the containing buffer itself).
    pub(crate) fn over(ty: Rc<UnionType>, buffer: Buffer) -> Self {
        ty.seal();
        Self { ty, buffer }
    }

    /// The owning type descriptor.
    pub fn union_type(&self) -> &Rc<UnionType> {
        &self.ty
    }

    /// The backing buffer, as a reference handle rather than a copy.
    /// Suitable for handing across an interop boundary.
    pub fn buffer(&self) -> Buffer {
        self.buffer.clone()
    }

    /// Reads the field `name`, reinterpreting the shared region under that
    /// field's type.
    pub fn get(&self, name: &str) -> Result<Value, UnionError> {
        self.get_raw(name).map_err(UnionError::from)
    }

    /// Writes `value` through the field `name`, overwriting whatever the
    /// previously active field held.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), UnionError> {
        self.set_raw(name, value).map_err(UnionError::from)
    }

    /// Copies a whole union value into this instance: another instance of
    /// the same type (single bulk byte copy) or a plain record (applied
    /// field-wise, in record order).
    pub fn copy_from(&mut self, value: Value) -> Result<(), UnionError> {
        self.ty
            .set(&self.buffer, 0, value)
            .map_err(UnionError::from)
    }

    /// Copies another instance of the same union type into this one.
    pub fn assign(&mut self, other: &UnionInstance) -> Result<(), UnionError> {
        self.copy_from(Value::Buffer(other.buffer()))
    }

    pub(crate) fn apply<N, I>(&mut self, init: I) -> Result<(), UnionError>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, Value)>,
    {
        for (name, value) in init {
            self.set(name.as_ref(), value)?;
        }
        Ok(())
    }

    pub(crate) fn get_raw(&self, name: &str) -> Result<Value, AccessError> {
        let field = self.field(name)?;
        field.ty.get(&self.buffer, field.offset)
    }

    pub(crate) fn set_raw(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        let field = self.field(name)?;
        trace!("setting union field `{name}` ({})", field.ty.name());
        field.ty.set(&self.buffer, field.offset, value)
    }

    fn field(&self, name: &str) -> Result<UnionField, AccessError> {
        self.ty.field(name).ok_or_else(|| AccessError::UnknownField {
            name: name.to_string(),
        })
    }
}

impl core::fmt::Debug for UnionInstance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UnionInstance")
            .field("ty", &self.ty)
            .field("len", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
