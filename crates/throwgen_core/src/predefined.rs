//! Define the C# predefined types: a stable identifier ([`PredefinedType`]) plus a const table
//! ([`PREDEFINED_TYPES`]) pairing each keyword with its metadata name.
//!
//! ## Notes
//! - Fully qualified display of a predefined type is its keyword (`string`, never
//!   `global::System.String`). Lookups in both directions go through this table.
//!
//! ## Examples
//! ```rust
//! use throwgen_core::predefined::{self, PredefinedType};
//!
//! assert_eq!(predefined::from_keyword("int"), Some(PredefinedType::Int32));
//! assert_eq!(predefined::from_metadata_name("System.String"), Some(PredefinedType::String));
//! assert_eq!(PredefinedType::Int32.keyword(), "int");
//! ```

/// Stable identifier for every predefined type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedType {
    Object,
    String,
    Bool,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    Void,
}

/// Metadata for one predefined type.
#[derive(Debug, Clone, Copy)]
pub struct PredefinedInfo {
    pub id: PredefinedType,
    /// Keyword spelling used in emitted source.
    pub keyword: &'static str,
    /// Namespace-qualified metadata name.
    pub metadata_name: &'static str,
}

const fn info(id: PredefinedType, keyword: &'static str, metadata_name: &'static str) -> PredefinedInfo {
    PredefinedInfo {
        id,
        keyword,
        metadata_name,
    }
}

/// Registry of all predefined types.
pub const PREDEFINED_TYPES: &[PredefinedInfo] = &[
    info(PredefinedType::Object, "object", "System.Object"),
    info(PredefinedType::String, "string", "System.String"),
    info(PredefinedType::Bool, "bool", "System.Boolean"),
    info(PredefinedType::Char, "char", "System.Char"),
    info(PredefinedType::SByte, "sbyte", "System.SByte"),
    info(PredefinedType::Byte, "byte", "System.Byte"),
    info(PredefinedType::Int16, "short", "System.Int16"),
    info(PredefinedType::UInt16, "ushort", "System.UInt16"),
    info(PredefinedType::Int32, "int", "System.Int32"),
    info(PredefinedType::UInt32, "uint", "System.UInt32"),
    info(PredefinedType::Int64, "long", "System.Int64"),
    info(PredefinedType::UInt64, "ulong", "System.UInt64"),
    info(PredefinedType::Single, "float", "System.Single"),
    info(PredefinedType::Double, "double", "System.Double"),
    info(PredefinedType::Decimal, "decimal", "System.Decimal"),
    info(PredefinedType::Void, "void", "System.Void"),
];

impl PredefinedType {
    /// Registry entry for this type.
    pub fn info(self) -> &'static PredefinedInfo {
        // Table order follows variant order.
        &PREDEFINED_TYPES[self as usize]
    }

    /// Keyword spelling (`int`).
    pub fn keyword(self) -> &'static str {
        self.info().keyword
    }

    /// Metadata name (`System.Int32`).
    pub fn metadata_name(self) -> &'static str {
        self.info().metadata_name
    }

    /// Simple metadata name (`Int32`).
    pub fn simple_name(self) -> &'static str {
        let full = self.metadata_name();
        full.rsplit('.').next().unwrap_or(full)
    }
}

/// Look up a predefined type by keyword.
pub fn from_keyword(keyword: &str) -> Option<PredefinedType> {
    PREDEFINED_TYPES.iter().find(|i| i.keyword == keyword).map(|i| i.id)
}

/// Look up a predefined type by metadata name.
pub fn from_metadata_name(name: &str) -> Option<PredefinedType> {
    PREDEFINED_TYPES.iter().find(|i| i.metadata_name == name).map(|i| i.id)
}
