//! Union type descriptors
//!
//! A [`UnionType`] accumulates field descriptors in declaration order and
//! recomputes its layout after every registration: size is the largest
//! member footprint rounded up to the largest member alignment, and every
//! member sits at offset 0. Constructing the first instance freezes the
//! field set for good.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use indexmap::IndexMap;
use log::{debug, trace};
use overlay_core::{AccessError, Buffer, NativeType, ResolveType, Value};

use crate::{NameProblem, UnionError, UnionInstance};

/// Field names claimed by the instance surface: the buffer-reference
/// accessor and the backing-storage attribute. Registration rejects both.
pub const RESERVED_NAMES: [&str; 2] = ["ref", "buffer"];

/// One registered union member. Members all overlap: `offset` is always 0.
#[derive(Clone)]
pub struct UnionField {
    /// The member's name, unique within the owning union.
    pub name: String,

    /// The member's type descriptor.
    pub ty: Rc<dyn NativeType>,

    /// Where the member starts inside the union. Unions put every member
    /// at 0; this is the defining property of the layout.
    pub offset: usize,
}

impl core::fmt::Debug for UnionField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UnionField")
            .field("name", &self.name)
            .field("ty", &self.ty.name())
            .field("offset", &self.offset)
            .finish()
    }
}

/// A computed union layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnionLayout {
    /// Total size in bytes: the largest member footprint, rounded up to a
    /// multiple of `alignment`.
    pub size: usize,

    /// The largest member alignment. 0 while no fields are registered.
    pub alignment: usize,
}

/// A runtime-built C-union type descriptor.
///
/// The descriptor plays two roles: it is the factory its instances are
/// constructed through ([`instance`](UnionType::instance) and friends),
/// and it is itself a [`NativeType`], so a union can be registered as a
/// field of an enclosing composite.
pub struct UnionType {
    fields: RefCell<IndexMap<String, UnionField>>,
    layout: Cell<UnionLayout>,
    sealed: Cell<bool>,
    me: Weak<UnionType>,
}

impl UnionType {
    /// Creates an empty, open union descriptor.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            fields: RefCell::new(IndexMap::new()),
            layout: Cell::new(UnionLayout::default()),
            sealed: Cell::new(false),
            me: me.clone(),
        })
    }

    /// Creates a descriptor from ordered (name, type specifier) pairs.
    pub fn with_fields<N, S>(pairs: impl IntoIterator<Item = (N, S)>) -> Result<Rc<Self>, UnionError>
    where
        N: Into<String>,
        S: ResolveType,
    {
        let union = Self::new();
        for (name, spec) in pairs {
            union.register_field(name, spec)?;
        }
        Ok(union)
    }

    /// Registers a new field and recomputes the layout.
    ///
    /// Fails with [`UnionError::AlreadyFinalized`] once any instance
    /// exists, with [`UnionError::InvalidName`] for empty, reserved, or
    /// duplicate names, and with [`UnionError::InvalidType`] for
    /// specifiers that do not resolve to a usable descriptor. On failure
    /// the descriptor is left unchanged.
    pub fn register_field(
        &self,
        name: impl Into<String>,
        spec: impl ResolveType,
    ) -> Result<(), UnionError> {
        let name = name.into();
        if self.sealed.get() {
            return Err(UnionError::AlreadyFinalized { field: name });
        }
        if name.is_empty() {
            return Err(UnionError::InvalidName {
                name,
                problem: NameProblem::Empty,
            });
        }
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(UnionError::InvalidName {
                name,
                problem: NameProblem::Reserved,
            });
        }
        if self.fields.borrow().contains_key(&name) {
            return Err(UnionError::InvalidName {
                name,
                problem: NameProblem::Duplicate,
            });
        }
        let spec_text = spec.describe();
        let Some(ty) = spec.resolve() else {
            return Err(UnionError::InvalidType {
                field: name,
                spec: spec_text,
            });
        };
        if ty.indirection() == 1 && ty.size() == 0 {
            // A zero-size direct value cannot occupy storage.
            return Err(UnionError::InvalidType {
                field: name,
                spec: spec_text,
            });
        }
        trace!("registering union field `{name}`: {}", ty.name());
        let field = UnionField {
            name: name.clone(),
            ty,
            offset: 0,
        };
        self.fields.borrow_mut().insert(name, field);
        self.recompute_layout();
        Ok(())
    }

    /// Derives the layout from the full current field set.
    ///
    /// Always a from-scratch recomputation rather than an incremental
    /// patch of the previous result, so repeated calls cannot drift.
    fn recompute_layout(&self) {
        let mut fields = self.fields.borrow_mut();

        // Pass 1: alignment is the largest effective member alignment.
        let mut alignment = 0usize;
        for field in fields.values() {
            alignment = alignment.max(field.ty.stored_alignment());
        }

        // Pass 2: size is the largest effective member footprint, and
        // every member sits at the start of the shared region.
        let mut size = 0usize;
        for field in fields.values_mut() {
            size = size.max(field.ty.stored_size());
            field.offset = 0;
        }

        // Trailing padding: round the size up to the alignment boundary.
        if alignment > 0 {
            size = size.next_multiple_of(alignment);
        }

        self.layout.set(UnionLayout { size, alignment });
        trace!("union layout recomputed: size={size} alignment={alignment}");
    }

    /// The current computed layout.
    pub fn layout(&self) -> UnionLayout {
        self.layout.get()
    }

    /// Whether the field set is frozen (an instance has been constructed).
    pub fn is_sealed(&self) -> bool {
        self.sealed.get()
    }

    /// Number of registered fields.
    pub fn field_count(&self) -> usize {
        self.fields.borrow().len()
    }

    /// Registered field names, in declaration order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.borrow().keys().cloned().collect()
    }

    /// Looks up one field descriptor by name.
    pub fn field(&self, name: &str) -> Option<UnionField> {
        self.fields.borrow().get(name).cloned()
    }

    /// All field descriptors, in declaration order.
    pub fn fields(&self) -> Vec<UnionField> {
        self.fields.borrow().values().cloned().collect()
    }

    /// Constructs an instance over a fresh zero-filled buffer of exactly
    /// the union's size. Freezes the field set.
    pub fn instance(self: &Rc<Self>) -> UnionInstance {
        UnionInstance::allocate(Rc::clone(self))
    }

    /// Constructs an instance over a fresh buffer and applies an
    /// initializer record in its iteration order.
    pub fn instance_with<N, I>(self: &Rc<Self>, init: I) -> Result<UnionInstance, UnionError>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, Value)>,
    {
        let mut instance = self.instance();
        instance.apply(init)?;
        Ok(instance)
    }

    /// Constructs an instance over a caller-supplied buffer, adopted
    /// without copying. Fails with [`UnionError::BufferTooSmall`] if the
    /// buffer cannot hold the layout.
    pub fn instance_in(self: &Rc<Self>, buffer: Buffer) -> Result<UnionInstance, UnionError> {
        UnionInstance::adopt(Rc::clone(self), buffer)
    }

    /// Constructs an instance over a caller-supplied buffer and applies an
    /// initializer record in its iteration order.
    pub fn instance_in_with<N, I>(
        self: &Rc<Self>,
        buffer: Buffer,
        init: I,
    ) -> Result<UnionInstance, UnionError>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, Value)>,
    {
        let mut instance = self.instance_in(buffer)?;
        instance.apply(init)?;
        Ok(instance)
    }

    pub(crate) fn seal(&self) {
        if !self.sealed.get() {
            let layout = self.layout.get();
            debug!(
                "union field set frozen by first instance (size={}, alignment={})",
                layout.size, layout.alignment
            );
            self.sealed.set(true);
        }
    }

    /// The `Rc` this descriptor was created in. Descriptors are only
    /// reachable through that `Rc` (`new` is the sole constructor), so the
    /// upgrade cannot fail while `&self` exists.
    pub(crate) fn rc(&self) -> Rc<UnionType> {
        self.me.upgrade().expect("descriptor outlived its Rc")
    }

    fn is_self(&self, tag: &Rc<dyn NativeType>) -> bool {
        core::ptr::eq(
            Rc::as_ptr(tag) as *const (),
            self as *const UnionType as *const (),
        )
    }
}

impl core::fmt::Debug for UnionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UnionType")
            .field("fields", &self.field_names())
            .field("layout", &self.layout.get())
            .field("sealed", &self.sealed.get())
            .finish()
    }
}

impl NativeType for UnionType {
    fn name(&self) -> &str {
        "union"
    }

    fn size(&self) -> usize {
        self.layout.get().size
    }

    fn alignment(&self) -> Option<usize> {
        let alignment = self.layout.get().alignment;
        (alignment != 0).then_some(alignment)
    }

    /// Reads a nested union value: a zero-copy sub-view of `buffer`,
    /// tagged with this descriptor. Mutations through the returned view
    /// are visible in the containing buffer.
    fn get(&self, buffer: &Buffer, offset: usize) -> Result<Value, AccessError> {
        let mut view = buffer.view(offset, self.layout.get().size)?;
        view.set_type(self.rc());
        Ok(Value::Buffer(view))
    }

    /// Writes a nested union value in place.
    ///
    /// An instance of this same union type is assigned as a single bulk
    /// byte copy: a union value is exactly its raw bytes, and all members
    /// overlap, so copying member-by-member would only ever re-serialize
    /// the last member anyway. A record is applied field-by-field through
    /// a temporary instance over the sub-view, in record order.
    fn set(&self, buffer: &Buffer, offset: usize, value: Value) -> Result<(), AccessError> {
        let size = self.layout.get().size;
        let mut view = buffer.view(offset, size)?;
        view.set_type(self.rc());
        match value {
            Value::Buffer(src) if src.type_tag().is_some_and(|tag| self.is_self(tag)) => {
                view.copy_from(&src, size)
            }
            Value::Record(entries) => {
                let mut scratch = UnionInstance::over(self.rc(), view);
                for (name, field_value) in entries {
                    scratch.set_raw(&name, field_value)?;
                }
                Ok(())
            }
            other => Err(AccessError::ValueMismatch {
                expected: "a record or an instance of the same union type",
                actual: other.kind(),
            }),
        }
    }
}
