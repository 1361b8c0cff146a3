//! Element kinds for primitive-array buffers

/// Element kind of a single buffer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DType {
    Bool = 0x01,
    I8 = 0x02,
    U8 = 0x03,
    I16 = 0x04,
    U16 = 0x05,
    I32 = 0x06,
    U32 = 0x07,
    I64 = 0x08,
    U64 = 0x09,
    F16 = 0x0A,
    F32 = 0x0B,
    F64 = 0x0C,
    Complex64 = 0x0D,
    Complex128 = 0x0E,
}

impl DType {
    /// Size in bytes of a single element
    pub fn element_size(self) -> usize {
        match self {
            DType::Bool | DType::U8 | DType::I8 => 1,
            DType::U16 | DType::I16 | DType::F16 => 2,
            DType::U32 | DType::I32 | DType::F32 => 4,
            DType::U64 | DType::I64 | DType::F64 | DType::Complex64 => 8,
            DType::Complex128 => 16,
        }
    }

    /// Try to convert from u8 tag
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(DType::Bool),
            0x02 => Some(DType::I8),
            0x03 => Some(DType::U8),
            0x04 => Some(DType::I16),
            0x05 => Some(DType::U16),
            0x06 => Some(DType::I32),
            0x07 => Some(DType::U32),
            0x08 => Some(DType::I64),
            0x09 => Some(DType::U64),
            0x0A => Some(DType::F16),
            0x0B => Some(DType::F32),
            0x0C => Some(DType::F64),
            0x0D => Some(DType::Complex64),
            0x0E => Some(DType::Complex128),
            _ => None,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            DType::I8
                | DType::U8
                | DType::I16
                | DType::U16
                | DType::I32
                | DType::U32
                | DType::I64
                | DType::U64
        )
    }

    pub fn is_signed(self) -> bool {
        matches!(self, DType::I8 | DType::I16 | DType::I32 | DType::I64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, DType::F16 | DType::F32 | DType::F64)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, DType::Complex64 | DType::Complex128)
    }

    /// NumPy-style name used in schema exports
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::I8 => "int8",
            DType::U8 => "uint8",
            DType::I16 => "int16",
            DType::U16 => "uint16",
            DType::I32 => "int32",
            DType::U32 => "uint32",
            DType::I64 => "int64",
            DType::U64 => "uint64",
            DType::F16 => "float16",
            DType::F32 => "float32",
            DType::F64 => "float64",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip() {
        for tag in 0x01..=0x0E {
            let dtype = DType::from_u8(tag).unwrap();
            assert_eq!(dtype as u8, tag);
        }
        assert_eq!(DType::from_u8(0x00), None);
        assert_eq!(DType::from_u8(0x0F), None);
    }

    #[test]
    fn element_sizes() {
        assert_eq!(DType::Bool.element_size(), 1);
        assert_eq!(DType::F16.element_size(), 2);
        assert_eq!(DType::Complex64.element_size(), 8);
        assert_eq!(DType::Complex128.element_size(), 16);
    }

    #[test]
    fn predicates() {
        assert!(DType::I32.is_integer());
        assert!(DType::I32.is_signed());
        assert!(!DType::U32.is_signed());
        assert!(DType::F16.is_float());
        assert!(DType::Complex128.is_complex());
        assert!(!DType::Bool.is_integer());
    }
}
