//! Field-type registry and block arity.
//!
//! The registry is the closed, ordered set of 20 wire types the template
//! language can name. Its order is part of the format: the legacy loader
//! fell back to entry 0 for unknown names, and [`FieldType::lookup_or_default`]
//! keeps that behavior available for lenient parsing.

use std::fmt;

/// Wire type of a template field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer, little-endian.
    U16,
    /// Unsigned 32-bit integer, little-endian.
    U32,
    /// Unsigned 64-bit integer, little-endian.
    U64,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer, little-endian.
    I16,
    /// Signed 32-bit integer, little-endian.
    I32,
    /// Signed 64-bit integer, little-endian.
    I64,
    /// 32-bit float, little-endian.
    F32,
    /// 64-bit float, little-endian.
    F64,
    /// 16-byte identifier.
    Uuid,
    /// Boolean stored as one byte.
    Bool,
    /// Three f32 components.
    Vector3,
    /// Three f64 components.
    Vector3d,
    /// Four f32 components.
    Vector4,
    /// Four f32 components.
    Quaternion,
    /// IPv4 address, 4 bytes little-endian.
    IpAddr,
    /// Port number, 2 bytes big-endian.
    IpPort,
    /// Length-prefixed byte string.
    Variable,
    /// Byte string of declared length.
    Fixed,
}

/// Legacy spellings accepted in addition to the canonical names.
const ALIASES: [(&str, FieldType); 9] = [
    ("LLUUID", FieldType::Uuid),
    ("S8", FieldType::I8),
    ("S16", FieldType::I16),
    ("S32", FieldType::I32),
    ("S64", FieldType::I64),
    ("LLVector3", FieldType::Vector3),
    ("LLVector3d", FieldType::Vector3d),
    ("LLVector4", FieldType::Vector4),
    ("LLQuaternion", FieldType::Quaternion),
];

impl FieldType {
    /// Registry entries in index order.
    pub const ALL: [Self; 20] = [
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
        Self::Uuid,
        Self::Bool,
        Self::Vector3,
        Self::Vector3d,
        Self::Vector4,
        Self::Quaternion,
        Self::IpAddr,
        Self::IpPort,
        Self::Variable,
        Self::Fixed,
    ];

    /// Returns the canonical template name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::U8 => "U8",
            Self::U16 => "U16",
            Self::U32 => "U32",
            Self::U64 => "U64",
            Self::I8 => "I8",
            Self::I16 => "I16",
            Self::I32 => "I32",
            Self::I64 => "I64",
            Self::F32 => "F32",
            Self::F64 => "F64",
            Self::Uuid => "UUID",
            Self::Bool => "BOOL",
            Self::Vector3 => "Vector3",
            Self::Vector3d => "Vector3d",
            Self::Vector4 => "Vector4",
            Self::Quaternion => "Quaternion",
            Self::IpAddr => "IPADDR",
            Self::IpPort => "IPPORT",
            Self::Variable => "Variable",
            Self::Fixed => "Fixed",
        }
    }

    /// Returns the registry width in bytes, 0 for the data-dependent types.
    #[must_use]
    pub const fn width(&self) -> usize {
        match self {
            Self::U8 | Self::I8 | Self::Bool => 1,
            Self::U16 | Self::I16 | Self::IpPort => 2,
            Self::U32 | Self::I32 | Self::F32 | Self::IpAddr => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
            Self::Vector3 => 12,
            Self::Uuid | Self::Vector4 | Self::Quaternion => 16,
            Self::Vector3d => 24,
            Self::Variable | Self::Fixed => 0,
        }
    }

    /// Returns the position of this type in the registry.
    #[must_use]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or_default()
    }

    /// Returns the registry entry at `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Resolves a template type name, canonical names first.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|t| t.name() == name)
            .copied()
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|&(_, t)| t)
            })
    }

    /// Resolves a type name, falling back to registry entry 0.
    ///
    /// This reproduces the legacy loader and silently mistypes the field;
    /// only lenient parsing uses it.
    #[must_use]
    pub fn lookup_or_default(name: &str) -> Self {
        Self::lookup(name).unwrap_or(Self::ALL[0])
    }

    /// Returns true for the two types whose width depends on the data.
    #[must_use]
    pub const fn is_data_dependent(&self) -> bool {
        matches!(self, Self::Variable | Self::Fixed)
    }

    /// Returns true for the one big-endian scalar.
    #[must_use]
    pub const fn is_big_endian(&self) -> bool {
        matches!(self, Self::IpPort)
    }

    /// Returns the Rust type generated code uses for this field type.
    #[must_use]
    pub const fn rust_type(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 | Self::IpPort => "u16",
            Self::U32 | Self::IpAddr => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Uuid => "Uuid",
            Self::Bool => "bool",
            Self::Vector3 => "Vector3",
            Self::Vector3d => "Vector3d",
            Self::Vector4 => "Vector4",
            Self::Quaternion => "Quaternion",
            Self::Variable | Self::Fixed => "Vec<u8>",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Repeat arity of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockArity {
    /// Exactly one instance, no count on the wire.
    Single,
    /// Exactly N instances, no count on the wire.
    Multiple(usize),
    /// 0-255 instances preceded by a one-byte count.
    Variable,
}

impl BlockArity {
    /// Returns the instance count when it is known without reading data.
    #[must_use]
    pub const fn static_count(&self) -> Option<usize> {
        match self {
            Self::Single => Some(1),
            Self::Multiple(n) => Some(*n),
            Self::Variable => None,
        }
    }

    /// Returns the template keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Multiple(_) => "Multiple",
            Self::Variable => "Variable",
        }
    }
}

impl fmt::Display for BlockArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Multiple(n) => write!(f, "Multiple {n}"),
            other => f.write_str(other.keyword()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_widths_in_order() {
        let widths: Vec<usize> = FieldType::ALL.iter().map(FieldType::width).collect();
        assert_eq!(
            widths,
            vec![1, 2, 4, 8, 1, 2, 4, 8, 4, 8, 16, 1, 12, 24, 16, 16, 4, 2, 0, 0]
        );
    }

    #[test]
    fn test_lookup_canonical_and_alias() {
        assert_eq!(FieldType::lookup("U32"), Some(FieldType::U32));
        assert_eq!(FieldType::lookup("IPPORT"), Some(FieldType::IpPort));
        assert_eq!(FieldType::lookup("LLUUID"), Some(FieldType::Uuid));
        assert_eq!(FieldType::lookup("S16"), Some(FieldType::I16));
        assert_eq!(FieldType::lookup("u32"), None);
    }

    #[test]
    fn test_lookup_or_default_falls_back_to_first_entry() {
        assert_eq!(FieldType::lookup_or_default("Bogus"), FieldType::U8);
        assert_eq!(FieldType::lookup_or_default("F64"), FieldType::F64);
    }

    #[test]
    fn test_index_round_trip() {
        for (i, t) in FieldType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
            assert_eq!(FieldType::from_index(i), Some(*t));
        }
        assert_eq!(FieldType::from_index(20), None);
    }

    #[test]
    fn test_endianness_flags() {
        assert!(FieldType::IpPort.is_big_endian());
        assert!(!FieldType::U16.is_big_endian());
        assert!(FieldType::Fixed.is_data_dependent());
        assert!(!FieldType::Uuid.is_data_dependent());
    }

    #[test]
    fn test_block_arity() {
        assert_eq!(BlockArity::Single.static_count(), Some(1));
        assert_eq!(BlockArity::Multiple(4).static_count(), Some(4));
        assert_eq!(BlockArity::Variable.static_count(), None);
        assert_eq!(BlockArity::Multiple(4).to_string(), "Multiple 4");
        assert_eq!(BlockArity::Variable.to_string(), "Variable");
    }
}
