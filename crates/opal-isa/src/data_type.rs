//! Primitive data types visible to VM programs
//!
//! The VM computes on 64-bit operand slots. `i32` and friends name raw
//! bit widths, not signedness: an `i32` operand is a 32-bit integer that
//! individual instructions interpret as signed or unsigned.

use std::fmt;

/// Raw 64-bit operand slot.
pub type Operand = [u8; 8];

/// Width of an operand slot in bytes.
pub const OPERAND_SIZE_IN_BYTES: usize = 8;

/// Data type of function parameters, results and instruction operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperandDataType {
    I32 = 0x0,
    I64,
    F32,
    F64,
}

/// Data type of local variables and data section items.
///
/// `Bytes` covers raw byte arrays with an explicit length and alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MemoryDataType {
    I32 = 0x0,
    I64,
    F32,
    F64,
    Bytes,
}

/// Kind of a data section in a module image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataSectionType {
    /// Initialized, immutable (".rodata")
    ReadOnly = 0x0,
    /// Initialized, mutable (".data")
    ReadWrite,
    /// Zero-initialized at load time (".bss")
    Uninit,
}

impl OperandDataType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x0 => Some(OperandDataType::I32),
            0x1 => Some(OperandDataType::I64),
            0x2 => Some(OperandDataType::F32),
            0x3 => Some(OperandDataType::F64),
            _ => None,
        }
    }
}

impl MemoryDataType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x0 => Some(MemoryDataType::I32),
            0x1 => Some(MemoryDataType::I64),
            0x2 => Some(MemoryDataType::F32),
            0x3 => Some(MemoryDataType::F64),
            0x4 => Some(MemoryDataType::Bytes),
            _ => None,
        }
    }
}

impl DataSectionType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x0 => Some(DataSectionType::ReadOnly),
            0x1 => Some(DataSectionType::ReadWrite),
            0x2 => Some(DataSectionType::Uninit),
            _ => None,
        }
    }
}

impl fmt::Display for OperandDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandDataType::I32 => f.write_str("i32"),
            OperandDataType::I64 => f.write_str("i64"),
            OperandDataType::F32 => f.write_str("f32"),
            OperandDataType::F64 => f.write_str("f64"),
        }
    }
}

impl fmt::Display for MemoryDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryDataType::I32 => f.write_str("i32"),
            MemoryDataType::I64 => f.write_str("i64"),
            MemoryDataType::F32 => f.write_str("f32"),
            MemoryDataType::F64 => f.write_str("f64"),
            MemoryDataType::Bytes => f.write_str("byte[]"),
        }
    }
}

impl fmt::Display for DataSectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSectionType::ReadOnly => "read_only",
            DataSectionType::ReadWrite => "read_write",
            DataSectionType::Uninit => "uninit",
        };
        f.write_str(name)
    }
}

/// Value crossing the FFI boundary.
///
/// Used when the host calls a VM function or receives its results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForeignValue {
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl ForeignValue {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ForeignValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ForeignValue::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ForeignValue::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ForeignValue::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Data type of the wrapped value.
    pub fn data_type(&self) -> OperandDataType {
        match self {
            ForeignValue::U32(_) => OperandDataType::I32,
            ForeignValue::U64(_) => OperandDataType::I64,
            ForeignValue::F32(_) => OperandDataType::F32,
            ForeignValue::F64(_) => OperandDataType::F64,
        }
    }

    /// Little-endian operand slot representation.
    pub fn to_operand(&self) -> Operand {
        let mut slot = [0u8; OPERAND_SIZE_IN_BYTES];
        match self {
            ForeignValue::U32(v) => slot[..4].copy_from_slice(&v.to_le_bytes()),
            ForeignValue::U64(v) => slot.copy_from_slice(&v.to_le_bytes()),
            ForeignValue::F32(v) => slot[..4].copy_from_slice(&v.to_le_bytes()),
            ForeignValue::F64(v) => slot.copy_from_slice(&v.to_le_bytes()),
        }
        slot
    }
}
