//! Element type table
//!
//! Maps an element type identifier to its byte width, display name and
//! scalar layout. Identifiers use the ANARI logical type numbering so that
//! dumps stay wire compatible with ANARI based producers.
//!
//! Unrecognized identifiers are never an error: they report a size of 0,
//! the name `ANARI_UNKNOWN` and an `(0, ScalarKind::Unknown)` layout.

use hashbrown::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Element type identifier (ANARI logical type number).
///
/// Any `u32` is a valid value; see [`ElementType::is_known`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementType(pub u32);

/// Primitive component used to decode a type for display and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    U8,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Unknown,
}

impl ScalarKind {
    /// True for the two floating point kinds.
    pub fn is_float(self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }

    /// True for kinds that are decoded with sign extension.
    pub fn is_signed(self) -> bool {
        matches!(self, ScalarKind::I32 | ScalarKind::I64)
    }
}

impl ElementType {
    pub const UNKNOWN: Self = Self(0);

    // Object kinds (used for the document object type tag)
    pub const DATA_TYPE: Self = Self(100);
    pub const STRING: Self = Self(101);
    pub const VOID_POINTER: Self = Self(102);
    pub const LIBRARY: Self = Self(500);
    pub const DEVICE: Self = Self(501);
    pub const OBJECT: Self = Self(502);
    pub const ARRAY: Self = Self(503);
    pub const ARRAY1D: Self = Self(504);
    pub const ARRAY2D: Self = Self(505);
    pub const ARRAY3D: Self = Self(506);
    pub const CAMERA: Self = Self(507);
    pub const FRAME: Self = Self(508);
    pub const GEOMETRY: Self = Self(509);
    pub const GROUP: Self = Self(510);
    pub const INSTANCE: Self = Self(511);
    pub const LIGHT: Self = Self(512);
    pub const MATERIAL: Self = Self(513);
    pub const RENDERER: Self = Self(514);
    pub const SURFACE: Self = Self(515);
    pub const SAMPLER: Self = Self(516);
    pub const SPATIAL_FIELD: Self = Self(517);
    pub const VOLUME: Self = Self(518);
    pub const WORLD: Self = Self(519);

    // Numeric element types: blocks of four (scalar, vec2, vec3, vec4)
    pub const BOOL: Self = Self(103);
    pub const INT8: Self = Self(1000);
    pub const UINT8: Self = Self(1004);
    pub const INT16: Self = Self(1008);
    pub const UINT16: Self = Self(1012);
    pub const INT32: Self = Self(1016);
    pub const INT32_VEC2: Self = Self(1017);
    pub const INT32_VEC3: Self = Self(1018);
    pub const INT32_VEC4: Self = Self(1019);
    pub const UINT32: Self = Self(1020);
    pub const UINT32_VEC2: Self = Self(1021);
    pub const UINT32_VEC3: Self = Self(1022);
    pub const UINT32_VEC4: Self = Self(1023);
    pub const INT64: Self = Self(1024);
    pub const UINT64: Self = Self(1028);
    pub const FLOAT32: Self = Self(1068);
    pub const FLOAT32_VEC2: Self = Self(1069);
    pub const FLOAT32_VEC3: Self = Self(1070);
    pub const FLOAT32_VEC4: Self = Self(1071);
    pub const FLOAT64: Self = Self(1072);
    pub const FLOAT32_MAT3: Self = Self(2013);
    pub const FLOAT32_MAT4: Self = Self(2014);

    /// Raw numeric identifier.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Byte width of one value of this type (0 for unrecognized types).
    pub const fn size_of(self) -> usize {
        match self {
            Self::BOOL => 4,
            Self::INT8 | Self::UINT8 => 1,
            Self::INT16 | Self::UINT16 => 2,
            Self::INT32 | Self::UINT32 | Self::FLOAT32 => 4,
            Self::INT32_VEC2 | Self::UINT32_VEC2 | Self::FLOAT32_VEC2 => 8,
            Self::INT32_VEC3 | Self::UINT32_VEC3 | Self::FLOAT32_VEC3 => 12,
            Self::INT32_VEC4 | Self::UINT32_VEC4 | Self::FLOAT32_VEC4 => 16,
            Self::INT64 | Self::UINT64 | Self::FLOAT64 => 8,
            Self::FLOAT32_MAT3 => 36,
            Self::FLOAT32_MAT4 => 64,
            _ => 0,
        }
    }

    /// Display name, e.g. `ANARI_FLOAT32_VEC3`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DATA_TYPE => "ANARI_DATA_TYPE",
            Self::STRING => "ANARI_STRING",
            Self::VOID_POINTER => "ANARI_VOID_POINTER",
            Self::LIBRARY => "ANARI_LIBRARY",
            Self::DEVICE => "ANARI_DEVICE",
            Self::OBJECT => "ANARI_OBJECT",
            Self::ARRAY => "ANARI_ARRAY",
            Self::ARRAY1D => "ANARI_ARRAY1D",
            Self::ARRAY2D => "ANARI_ARRAY2D",
            Self::ARRAY3D => "ANARI_ARRAY3D",
            Self::CAMERA => "ANARI_CAMERA",
            Self::FRAME => "ANARI_FRAME",
            Self::GEOMETRY => "ANARI_GEOMETRY",
            Self::GROUP => "ANARI_GROUP",
            Self::INSTANCE => "ANARI_INSTANCE",
            Self::LIGHT => "ANARI_LIGHT",
            Self::MATERIAL => "ANARI_MATERIAL",
            Self::RENDERER => "ANARI_RENDERER",
            Self::SURFACE => "ANARI_SURFACE",
            Self::SAMPLER => "ANARI_SAMPLER",
            Self::SPATIAL_FIELD => "ANARI_SPATIAL_FIELD",
            Self::VOLUME => "ANARI_VOLUME",
            Self::WORLD => "ANARI_WORLD",
            Self::BOOL => "ANARI_BOOL",
            Self::INT8 => "ANARI_INT8",
            Self::UINT8 => "ANARI_UINT8",
            Self::INT16 => "ANARI_INT16",
            Self::UINT16 => "ANARI_UINT16",
            Self::INT32 => "ANARI_INT32",
            Self::INT32_VEC2 => "ANARI_INT32_VEC2",
            Self::INT32_VEC3 => "ANARI_INT32_VEC3",
            Self::INT32_VEC4 => "ANARI_INT32_VEC4",
            Self::UINT32 => "ANARI_UINT32",
            Self::UINT32_VEC2 => "ANARI_UINT32_VEC2",
            Self::UINT32_VEC3 => "ANARI_UINT32_VEC3",
            Self::UINT32_VEC4 => "ANARI_UINT32_VEC4",
            Self::INT64 => "ANARI_INT64",
            Self::UINT64 => "ANARI_UINT64",
            Self::FLOAT32 => "ANARI_FLOAT32",
            Self::FLOAT32_VEC2 => "ANARI_FLOAT32_VEC2",
            Self::FLOAT32_VEC3 => "ANARI_FLOAT32_VEC3",
            Self::FLOAT32_VEC4 => "ANARI_FLOAT32_VEC4",
            Self::FLOAT64 => "ANARI_FLOAT64",
            Self::FLOAT32_MAT3 => "ANARI_FLOAT32_MAT3",
            Self::FLOAT32_MAT4 => "ANARI_FLOAT32_MAT4",
            _ => "ANARI_UNKNOWN",
        }
    }

    /// Decompose into `(component_count, kind)`.
    ///
    /// 8-bit types display as unsigned bytes and 16-bit integers are
    /// promoted to their 32-bit kind.
    pub const fn scalar_layout(self) -> (usize, ScalarKind) {
        match self {
            Self::BOOL | Self::INT8 | Self::UINT8 => (1, ScalarKind::U8),
            Self::INT16 | Self::INT32 => (1, ScalarKind::I32),
            Self::UINT16 | Self::UINT32 => (1, ScalarKind::U32),
            Self::INT64 => (1, ScalarKind::I64),
            Self::UINT64 => (1, ScalarKind::U64),
            Self::FLOAT32 => (1, ScalarKind::F32),
            Self::FLOAT64 => (1, ScalarKind::F64),
            Self::FLOAT32_VEC2 => (2, ScalarKind::F32),
            Self::FLOAT32_VEC3 => (3, ScalarKind::F32),
            Self::FLOAT32_VEC4 => (4, ScalarKind::F32),
            Self::INT32_VEC2 => (2, ScalarKind::I32),
            Self::INT32_VEC3 => (3, ScalarKind::I32),
            Self::INT32_VEC4 => (4, ScalarKind::I32),
            Self::UINT32_VEC2 => (2, ScalarKind::U32),
            Self::UINT32_VEC3 => (3, ScalarKind::U32),
            Self::UINT32_VEC4 => (4, ScalarKind::U32),
            Self::FLOAT32_MAT3 => (9, ScalarKind::F32),
            Self::FLOAT32_MAT4 => (16, ScalarKind::F32),
            _ => (0, ScalarKind::Unknown),
        }
    }

    /// Byte width of a single component as stored (e.g. 2 for `INT16`).
    ///
    /// Returns 0 when the layout is unknown.
    pub const fn component_width(self) -> usize {
        match self.scalar_layout() {
            (0, _) => 0,
            (count, _) => self.size_of() / count,
        }
    }

    /// True when the table has an entry for this identifier.
    pub fn is_known(self) -> bool {
        self.name() != "ANARI_UNKNOWN"
    }

    /// Reverse lookup by display name.
    ///
    /// Accepts `ANARI_FLOAT32_VEC3`, `FLOAT32_VEC3` or `float32_vec3`.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let key = upper.strip_prefix("ANARI_").unwrap_or(upper.as_str());
        name_index().get(key).copied()
    }
}

impl From<u32> for ElementType {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ElementType> for u32 {
    fn from(t: ElementType) -> Self {
        t.0
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every identifier the table knows about.
pub const KNOWN_TYPES: &[ElementType] = &[
    ElementType::DATA_TYPE,
    ElementType::STRING,
    ElementType::VOID_POINTER,
    ElementType::LIBRARY,
    ElementType::DEVICE,
    ElementType::OBJECT,
    ElementType::ARRAY,
    ElementType::ARRAY1D,
    ElementType::ARRAY2D,
    ElementType::ARRAY3D,
    ElementType::CAMERA,
    ElementType::FRAME,
    ElementType::GEOMETRY,
    ElementType::GROUP,
    ElementType::INSTANCE,
    ElementType::LIGHT,
    ElementType::MATERIAL,
    ElementType::RENDERER,
    ElementType::SURFACE,
    ElementType::SAMPLER,
    ElementType::SPATIAL_FIELD,
    ElementType::VOLUME,
    ElementType::WORLD,
    ElementType::BOOL,
    ElementType::INT8,
    ElementType::UINT8,
    ElementType::INT16,
    ElementType::UINT16,
    ElementType::INT32,
    ElementType::INT32_VEC2,
    ElementType::INT32_VEC3,
    ElementType::INT32_VEC4,
    ElementType::UINT32,
    ElementType::UINT32_VEC2,
    ElementType::UINT32_VEC3,
    ElementType::UINT32_VEC4,
    ElementType::INT64,
    ElementType::UINT64,
    ElementType::FLOAT32,
    ElementType::FLOAT32_VEC2,
    ElementType::FLOAT32_VEC3,
    ElementType::FLOAT32_VEC4,
    ElementType::FLOAT64,
    ElementType::FLOAT32_MAT3,
    ElementType::FLOAT32_MAT4,
];

/// Name -> type index, built on first use. Keys have the `ANARI_` prefix removed.
fn name_index() -> &'static HashMap<&'static str, ElementType> {
    static INDEX: OnceLock<HashMap<&'static str, ElementType>> = OnceLock::new();
    INDEX.get_or_init(|| {
        KNOWN_TYPES
            .iter()
            .map(|&t| (t.name().trim_start_matches("ANARI_"), t))
            .collect()
    })
}

/// Byte width of `t` (free-function form of [`ElementType::size_of`]).
#[inline]
pub fn size_of(t: ElementType) -> usize {
    t.size_of()
}

/// Display name of `t` (free-function form of [`ElementType::name`]).
#[inline]
pub fn type_name(t: ElementType) -> &'static str {
    t.name()
}
