//! Value types.
//!
//! A [`ValueType`] describes the type of a variable, argument, return value
//! or expression: a primitive, a user class/struct, or an unresolved name,
//! plus const/pointer flags.

use std::{collections::HashMap, fmt::Display};

use bitflags::bitflags;
use indexmap::IndexMap;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref PRIMITIVE_LOOKUP: HashMap<&'static str, Primitive> = {
        let mut map = HashMap::new();
        map.insert("int8", Primitive::Int8);
        map.insert("int16", Primitive::Int16);
        map.insert("int32", Primitive::Int32);
        map.insert("int64", Primitive::Int64);
        map.insert("uint8", Primitive::UInt8);
        map.insert("uint16", Primitive::UInt16);
        map.insert("uint32", Primitive::UInt32);
        map.insert("uint64", Primitive::UInt64);
        map.insert("float32", Primitive::Float32);
        map.insert("float64", Primitive::Float64);
        map.insert("bool", Primitive::Bool);
        map.insert("void", Primitive::Void);
        // Aliases
        map.insert("int", Primitive::Int32);
        map.insert("uint", Primitive::UInt32);
        map.insert("float", Primitive::Float32);
        map.insert("double", Primitive::Float64);
        map
    };
}

/// Size in bytes of a pointer on every supported target.
pub const POINTER_SIZE: usize = 8;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        const CONST = 1;
        const POINTER = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Class,
    Struct,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Bool,
    Void,
    /// Opaque tag carried by user-defined types.
    Complex,
}

/// Byte width and signedness of an integer primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerSize {
    pub bytes: u8,
    pub signed: bool,
}

impl IntegerSize {
    pub fn bits(&self) -> u32 {
        self.bytes as u32 * 8
    }

    pub fn min(&self) -> i128 {
        if self.signed {
            -(1i128 << (self.bits() - 1))
        } else {
            0
        }
    }

    pub fn max(&self) -> i128 {
        if self.signed {
            (1i128 << (self.bits() - 1)) - 1
        } else {
            (1i128 << self.bits()) - 1
        }
    }

    pub fn contains(&self, value: i128) -> bool {
        (self.min()..=self.max()).contains(&value)
    }

    /// Bits of magnitude, i.e. without the sign bit.
    pub fn value_bits(&self) -> u32 {
        if self.signed {
            self.bits() - 1
        } else {
            self.bits()
        }
    }
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Int8 => "int8",
            Primitive::Int16 => "int16",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::UInt8 => "uint8",
            Primitive::UInt16 => "uint16",
            Primitive::UInt32 => "uint32",
            Primitive::UInt64 => "uint64",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::Bool => "bool",
            Primitive::Void => "void",
            Primitive::Complex => "complex",
        }
    }

    pub fn from_name(name: &str) -> Option<Primitive> {
        PRIMITIVE_LOOKUP.get(name).copied()
    }

    pub fn integer_size(&self) -> Option<IntegerSize> {
        let (bytes, signed) = match self {
            Primitive::Int8 => (1, true),
            Primitive::Int16 => (2, true),
            Primitive::Int32 => (4, true),
            Primitive::Int64 => (8, true),
            Primitive::UInt8 => (1, false),
            Primitive::UInt16 => (2, false),
            Primitive::UInt32 => (4, false),
            Primitive::UInt64 => (8, false),
            _ => return None,
        };
        Some(IntegerSize { bytes, signed })
    }

    pub fn byte_size(&self) -> usize {
        match self {
            Primitive::Float32 => 4,
            Primitive::Float64 => 8,
            Primitive::Bool => 1,
            Primitive::Void => 0,
            Primitive::Complex => POINTER_SIZE,
            integer => integer.integer_size().map_or(0, |size| size.bytes as usize),
        }
    }

    /// Significand bits, for floating primitives.
    pub fn mantissa_bits(&self) -> Option<u32> {
        match self {
            Primitive::Float32 => Some(24),
            Primitive::Float64 => Some(53),
            _ => None,
        }
    }

    pub fn mangled(&self) -> &'static str {
        match self {
            Primitive::Int8 => "c",
            Primitive::Int16 => "s",
            Primitive::Int32 => "i",
            Primitive::Int64 => "l",
            Primitive::UInt8 => "h",
            Primitive::UInt16 => "t",
            Primitive::UInt32 => "j",
            Primitive::UInt64 => "m",
            Primitive::Float32 => "f",
            Primitive::Float64 => "d",
            Primitive::Bool => "b",
            Primitive::Void => "v",
            Primitive::Complex => "u",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValueType {
    pub kind: TypeKind,
    pub primitive: Option<Primitive>,
    pub flags: TypeFlags,
    pub name: Option<String>,
    pub properties: Option<IndexMap<String, ValueType>>,
}

/// Identity: kind, primitive, flags and name. Properties are not compared.
impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.primitive == other.primitive
            && self.flags == other.flags
            && self.name == other.name
    }
}

impl Eq for ValueType {}

impl ValueType {
    pub fn primitive(primitive: Primitive) -> Self {
        ValueType {
            kind: TypeKind::Primitive,
            primitive: Some(primitive),
            flags: TypeFlags::empty(),
            name: None,
            properties: None,
        }
    }

    pub fn int32() -> Self {
        ValueType::primitive(Primitive::Int32)
    }

    pub fn float64() -> Self {
        ValueType::primitive(Primitive::Float64)
    }

    pub fn bool() -> Self {
        ValueType::primitive(Primitive::Bool)
    }

    pub fn void() -> Self {
        ValueType::primitive(Primitive::Void)
    }

    pub fn class(name: &str, properties: IndexMap<String, ValueType>) -> Self {
        ValueType::user(TypeKind::Class, name, properties)
    }

    pub fn structure(name: &str, properties: IndexMap<String, ValueType>) -> Self {
        ValueType::user(TypeKind::Struct, name, properties)
    }

    fn user(kind: TypeKind, name: &str, properties: IndexMap<String, ValueType>) -> Self {
        ValueType {
            kind,
            primitive: Some(Primitive::Complex),
            flags: TypeFlags::empty(),
            name: Some(name.to_string()),
            properties: Some(properties),
        }
    }

    /// Placeholder for a type name that could not be resolved.
    pub fn unknown(name: &str) -> Self {
        ValueType {
            kind: TypeKind::Unknown,
            primitive: None,
            flags: TypeFlags::empty(),
            name: Some(name.to_string()),
            properties: None,
        }
    }

    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn without_flags(mut self, flags: TypeFlags) -> Self {
        self.flags.remove(flags);
        self
    }

    pub fn is_const(&self) -> bool {
        self.flags.contains(TypeFlags::CONST)
    }

    pub fn is_pointer(&self) -> bool {
        self.flags.contains(TypeFlags::POINTER)
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == TypeKind::Unknown
    }

    fn value_primitive(&self) -> Option<Primitive> {
        if self.is_pointer() || self.kind != TypeKind::Primitive {
            None
        } else {
            self.primitive
        }
    }

    pub fn integer_size(&self) -> Option<IntegerSize> {
        self.value_primitive().and_then(|primitive| primitive.integer_size())
    }

    pub fn is_integer_type(&self) -> bool {
        self.integer_size().is_some()
    }

    pub fn is_signed_integer(&self) -> bool {
        self.integer_size().is_some_and(|size| size.signed)
    }

    pub fn is_unsigned_integer(&self) -> bool {
        self.integer_size().is_some_and(|size| !size.signed)
    }

    pub fn is_floating_type(&self) -> bool {
        matches!(
            self.value_primitive(),
            Some(Primitive::Float32) | Some(Primitive::Float64)
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer_type() || self.is_floating_type()
    }

    pub fn is_boolean_type(&self) -> bool {
        self.value_primitive() == Some(Primitive::Bool)
    }

    pub fn is_void(&self) -> bool {
        self.value_primitive() == Some(Primitive::Void)
    }

    /// Equality on the underlying primitive, ignoring const/pointer flags.
    pub fn same_primitive(&self, other: &ValueType) -> bool {
        self.kind == other.kind && self.primitive == other.primitive && self.name == other.name
    }

    pub fn byte_size(&self) -> usize {
        if self.is_pointer() {
            return POINTER_SIZE;
        }
        match self.kind {
            TypeKind::Primitive => self.primitive.map_or(0, |primitive| primitive.byte_size()),
            TypeKind::Class | TypeKind::Struct => self
                .properties
                .as_ref()
                .map_or(0, |properties| properties.values().map(ValueType::byte_size).sum()),
            TypeKind::Unknown => 0,
        }
    }

    pub fn is_same_size(&self, other: &ValueType) -> bool {
        self.byte_size() == other.byte_size()
    }

    /// True iff every value representable by `self` is representable by
    /// `other`.
    pub fn will_fit_into(&self, other: &ValueType) -> bool {
        if self.is_pointer() || other.is_pointer() {
            return self.is_pointer() && other.is_pointer() && self.same_primitive(other);
        }

        if let Some(from) = self.integer_size() {
            if let Some(to) = other.integer_size() {
                return match (from.signed, to.signed) {
                    (true, false) => false,
                    (false, true) => from.bytes < to.bytes,
                    _ => from.bytes <= to.bytes,
                };
            }
            return other
                .value_primitive()
                .and_then(|primitive| primitive.mantissa_bits())
                .is_some_and(|mantissa| from.value_bits() <= mantissa);
        }

        if self.is_boolean_type() {
            return other.is_numeric() || other.is_boolean_type();
        }

        if self.is_floating_type() && other.is_floating_type() {
            return self.byte_size() <= other.byte_size();
        }

        self.same_primitive(other)
    }

    /// Identifier used inside mangled function names.
    pub fn get_mangled_name(&self) -> String {
        let mut mangled = String::new();
        if self.is_const() {
            mangled.push('K');
        }
        if self.is_pointer() {
            mangled.push('P');
        }
        match (self.kind, &self.name) {
            (TypeKind::Primitive, _) => {
                mangled.push_str(self.primitive.map_or("v", |primitive| primitive.mangled()))
            }
            (_, Some(name)) => mangled.push_str(&format!("{}{}", name.len(), name)),
            (_, None) => mangled.push('u'),
        }
        mangled
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_const() {
            write!(f, "const ")?;
        }
        match (&self.name, self.primitive) {
            (Some(name), _) => write!(f, "{}", name)?,
            (None, Some(primitive)) => write!(f, "{}", primitive.name())?,
            (None, None) => write!(f, "<unknown>")?,
        }
        if self.is_pointer() {
            write!(f, "*")?;
        }
        Ok(())
    }
}
