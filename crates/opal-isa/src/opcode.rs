//! Opcode definitions for the Opal VM
//!
//! This module defines the complete instruction set for the VM.
//! Instructions are variable-length: 16, 32, 64, 96 or 128 bits,
//! encoded little-endian with the following layouts:
//!
//! | length  | layout                                                       |
//! |---------|--------------------------------------------------------------|
//! | 16-bit  | [opcode]                                                     |
//! | 32-bit  | [opcode] [i16]                                               |
//! | 64-bit  | [opcode] [padding] [i32]                                     |
//! | 64-bit  | [opcode] [i16] [i32]                                         |
//! | 96-bit  | [opcode] [padding] [i32] [i32]                               |
//! | 128-bit | [opcode] [padding] [i32] [i32] [i32]                         |
//!
//! The opcode itself is a 16-bit number: the high byte is the category
//! and the low byte is the item within the category. Any instruction
//! that carries an i32 parameter must start on a 4-byte boundary; a
//! `nop` is inserted in front of it when alignment is required.
//!
//! The VM addresses functions, data and local variables by index, never
//! by raw address. An index carries the kind, data type and boundary of
//! the object it names, so every access can be verified.

use std::fmt;

/// Upper bound (exclusive) of the opcode value space.
///
/// Dispatch tables indexed by opcode can be sized with this constant.
pub const MAX_OPCODE_NUMBER: usize = 0x0c_00;

/// Virtual machine instruction
///
/// Operands for binary instructions are popped right-hand side first:
/// the first pop yields the right operand, the second the left. Unless
/// stated otherwise, integer results narrower than 64 bits are
/// sign-extended to i64 on the operand stack, and comparison results
/// are pushed as i64 `1` (true) or `0` (false).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Opcode {
    // ===== Fundamental =====
    /// Do nothing. Used as padding to keep i32-bearing instructions
    /// 4-byte aligned.
    Nop = 0x01_00,
    /// Push an immediate i32 (sign-extended to i64): (param number:i32) -> i32
    ImmI32,
    /// Push an immediate i64: (param low:i32 high:i32) -> i64
    ///
    /// `imm_i64`, `imm_f32` and `imm_f64` are pseudo-instructions:
    /// instruction parameters only support i16 and i32, so wider
    /// immediates are split across two i32 parameters. Immediates live
    /// inside the instruction stream, there is no constant pool.
    ImmI64,
    /// Push an immediate f32: (param bits:i32) -> f32
    ImmF32,
    /// Push an immediate f64: (param bits_low:i32 bits_high:i32) -> f64
    ImmF64,

    // ===== Local variables =====
    //
    // Function arguments are local variables: with 2 parameters and 4
    // locals the indices run 0..=1 for the arguments and 2..=5 for the
    // locals. The `layers` parameter selects the frame the index is
    // resolved against: 0 is the current block frame, 1 its parent, and
    // so on up to the function frame. Locals are 8-byte aligned.
    /// Load an i64 local: (param layers:i16 index:i32) -> i64
    LocalLoadI64 = 0x02_00,
    /// Load an i32 local, sign-extended: (param layers:i16 index:i32) -> i32
    LocalLoadI32S,
    /// Load an i32 local, zero-extended: (param layers:i16 index:i32) -> i32
    LocalLoadI32U,
    /// Load an i16 local, sign-extended: (param layers:i16 index:i32) -> i16
    LocalLoadI16S,
    /// Load an i16 local, zero-extended: (param layers:i16 index:i32) -> i16
    LocalLoadI16U,
    /// Load an i8 local, sign-extended: (param layers:i16 index:i32) -> i8
    LocalLoadI8S,
    /// Load an i8 local, zero-extended: (param layers:i16 index:i32) -> i8
    LocalLoadI8U,
    /// Load an f64 local with a float validity check: (param layers:i16 index:i32) -> f64
    LocalLoadF64,
    /// Load an f32 local with a float validity check: (param layers:i16 index:i32) -> f32
    ///
    /// The high half of the f32 operand on the stack is undefined.
    LocalLoadF32,
    /// Pop one operand into an i64 local: (param layers:i16 index:i32) (operand value:i64)
    LocalStoreI64,
    /// Pop one operand into an i32 local: (param layers:i16 index:i32) (operand value:i32)
    LocalStoreI32,
    /// Pop one operand into an i16 local: (param layers:i16 index:i32) (operand value:i32)
    LocalStoreI16,
    /// Pop one operand into an i8 local: (param layers:i16 index:i32) (operand value:i32)
    LocalStoreI8,
    /// Pop one operand into an f64 local: (param layers:i16 index:i32) (operand value:f64)
    LocalStoreF64,
    /// Pop one operand into an f32 local: (param layers:i16 index:i32) (operand value:f32)
    LocalStoreF32,

    // ===== Data =====
    //
    // The data public index is a unified index covering imported and
    // internal read-only, read-write and uninitialized data items plus
    // dynamically allocated memory, in that order. The `offset` of a
    // load or store must be a multiple of the natural alignment of the
    // accessed type (1 for i8, 2 for i16, 4 for i32/f32, 8 for i64/f64).
    /// Load i64 data: (param offset:i16 data_public_index:i32) -> i64
    DataLoadI64 = 0x03_00,
    /// Load i32 data, sign-extended: (param offset:i16 data_public_index:i32) -> i32
    DataLoadI32S,
    /// Load i32 data, zero-extended: (param offset:i16 data_public_index:i32) -> i32
    DataLoadI32U,
    /// Load i16 data, sign-extended: (param offset:i16 data_public_index:i32) -> i16
    DataLoadI16S,
    /// Load i16 data, zero-extended: (param offset:i16 data_public_index:i32) -> i16
    DataLoadI16U,
    /// Load i8 data, sign-extended: (param offset:i16 data_public_index:i32) -> i8
    DataLoadI8S,
    /// Load i8 data, zero-extended: (param offset:i16 data_public_index:i32) -> i8
    DataLoadI8U,
    /// Load f64 data with a float validity check: (param offset:i16 data_public_index:i32) -> f64
    DataLoadF64,
    /// Load f32 data with a float validity check: (param offset:i16 data_public_index:i32) -> f32
    DataLoadF32,
    /// Store i64 data: (param offset:i16 data_public_index:i32) (operand value:i64)
    DataStoreI64,
    /// Store i32 data: (param offset:i16 data_public_index:i32) (operand value:i32)
    DataStoreI32,
    /// Store i16 data: (param offset:i16 data_public_index:i32) (operand value:i32)
    DataStoreI16,
    /// Store i8 data: (param offset:i16 data_public_index:i32) (operand value:i32)
    DataStoreI8,
    /// Store f64 data: (param offset:i16 data_public_index:i32) (operand value:f64)
    DataStoreF64,
    /// Store f32 data: (param offset:i16 data_public_index:i32) (operand value:f32)
    DataStoreF32,
    /// Load i64 data with a 64-bit offset operand: (param data_public_index:i32) (operand offset:i64) -> i64
    DataLoadExtendI64,
    /// (param data_public_index:i32) (operand offset:i64) -> i32
    DataLoadExtendI32S,
    /// (param data_public_index:i32) (operand offset:i64) -> i32
    DataLoadExtendI32U,
    /// (param data_public_index:i32) (operand offset:i64) -> i16
    DataLoadExtendI16S,
    /// (param data_public_index:i32) (operand offset:i64) -> i16
    DataLoadExtendI16U,
    /// (param data_public_index:i32) (operand offset:i64) -> i8
    DataLoadExtendI8S,
    /// (param data_public_index:i32) (operand offset:i64) -> i8
    DataLoadExtendI8U,
    /// (param data_public_index:i32) (operand offset:i64) -> f64
    DataLoadExtendF64,
    /// (param data_public_index:i32) (operand offset:i64) -> f32
    DataLoadExtendF32,
    /// (param data_public_index:i32) (operand value:i64 offset:i64)
    DataStoreExtendI64,
    /// (param data_public_index:i32) (operand value:i32 offset:i64)
    DataStoreExtendI32,
    /// (param data_public_index:i32) (operand value:i32 offset:i64)
    DataStoreExtendI16,
    /// (param data_public_index:i32) (operand value:i32 offset:i64)
    DataStoreExtendI8,
    /// (param data_public_index:i32) (operand value:f64 offset:i64)
    DataStoreExtendF64,
    /// (param data_public_index:i32) (operand value:f32 offset:i64)
    DataStoreExtendF32,
    /// Load with module, index and offset all dynamic:
    /// (operand module_index:i32 data_public_index:i32 offset:i64) -> i64
    DataLoadDynamicI64,
    /// (operand module_index:i32 data_public_index:i32 offset:i64) -> i32
    DataLoadDynamicI32S,
    /// (operand module_index:i32 data_public_index:i32 offset:i64) -> i32
    DataLoadDynamicI32U,
    /// (operand module_index:i32 data_public_index:i32 offset:i64) -> i16
    DataLoadDynamicI16S,
    /// (operand module_index:i32 data_public_index:i32 offset:i64) -> i16
    DataLoadDynamicI16U,
    /// (operand module_index:i32 data_public_index:i32 offset:i64) -> i8
    DataLoadDynamicI8S,
    /// (operand module_index:i32 data_public_index:i32 offset:i64) -> i8
    DataLoadDynamicI8U,
    /// (operand module_index:i32 data_public_index:i32 offset:i64) -> f64
    DataLoadDynamicF64,
    /// (operand module_index:i32 data_public_index:i32 offset:i64) -> f32
    DataLoadDynamicF32,
    /// (operand value:i64 module_index:i32 data_public_index:i32 offset:i64)
    DataStoreDynamicI64,
    /// (operand value:i32 module_index:i32 data_public_index:i32 offset:i64)
    DataStoreDynamicI32,
    /// (operand value:i32 module_index:i32 data_public_index:i32 offset:i64)
    DataStoreDynamicI16,
    /// (operand value:i32 module_index:i32 data_public_index:i32 offset:i64)
    DataStoreDynamicI8,
    /// (operand value:f64 module_index:i32 data_public_index:i32 offset:i64)
    DataStoreDynamicF64,
    /// (operand value:f32 module_index:i32 data_public_index:i32 offset:i64)
    DataStoreDynamicF32,

    // ===== Arithmetic =====
    //
    // Integer add/sub/mul wrap on overflow. Remainder takes the sign of
    // the dividend: remainder(a, b) = a - b * trunc(a / b).
    /// Wrapping addition: (operand left:i32 right:i32) -> i32
    AddI32 = 0x04_00,
    /// Wrapping subtraction: (operand left:i32 right:i32) -> i32
    SubI32,
    /// Wrapping increment by an immediate: (param imm:i16) (operand number:i32) -> i32
    AddImmI32,
    /// Wrapping decrement by an immediate: (param imm:i16) (operand number:i32) -> i32
    SubImmI32,
    /// Wrapping multiplication: (operand left:i32 right:i32) -> i32
    MulI32,
    /// Signed division: (operand left:i32 right:i32) -> i32
    DivI32S,
    /// Unsigned division: (operand left:i32 right:i32) -> i32
    DivI32U,
    /// Signed remainder: (operand left:i32 right:i32) -> i32
    RemI32S,
    /// Unsigned remainder: (operand left:i32 right:i32) -> i32
    RemI32U,
    /// Wrapping addition: (operand left:i64 right:i64) -> i64
    AddI64,
    /// Wrapping subtraction: (operand left:i64 right:i64) -> i64
    SubI64,
    /// Wrapping increment by an immediate: (param imm:i16) (operand number:i64) -> i64
    AddImmI64,
    /// Wrapping decrement by an immediate: (param imm:i16) (operand number:i64) -> i64
    SubImmI64,
    /// Wrapping multiplication: (operand left:i64 right:i64) -> i64
    MulI64,
    /// Signed division: (operand left:i64 right:i64) -> i64
    DivI64S,
    /// Unsigned division: (operand left:i64 right:i64) -> i64
    DivI64U,
    /// Signed remainder: (operand left:i64 right:i64) -> i64
    RemI64S,
    /// Unsigned remainder: (operand left:i64 right:i64) -> i64
    RemI64U,
    /// (operand left:f32 right:f32) -> f32
    AddF32,
    /// (operand left:f32 right:f32) -> f32
    SubF32,
    /// (operand left:f32 right:f32) -> f32
    MulF32,
    /// (operand left:f32 right:f32) -> f32
    DivF32,
    /// (operand left:f64 right:f64) -> f64
    AddF64,
    /// (operand left:f64 right:f64) -> f64
    SubF64,
    /// (operand left:f64 right:f64) -> f64
    MulF64,
    /// (operand left:f64 right:f64) -> f64
    DivF64,

    // ===== Bitwise =====
    /// Bitwise AND: (operand left:i64 right:i64) -> i64
    And = 0x05_00,
    /// Bitwise OR: (operand left:i64 right:i64) -> i64
    Or,
    /// Bitwise XOR: (operand left:i64 right:i64) -> i64
    Xor,
    /// Bitwise NOT: (operand number:i64) -> i64
    Not,
    /// Left shift: (operand number:i32 bits:i32) -> i32, bits in [0, 32)
    ShiftLeftI32,
    /// Arithmetic right shift: (operand number:i32 bits:i32) -> i32
    ShiftRightI32S,
    /// Logical right shift: (operand number:i32 bits:i32) -> i32
    ShiftRightI32U,
    /// Left rotate: (operand number:i32 bits:i32) -> i32
    RotateLeftI32,
    /// Right rotate: (operand number:i32 bits:i32) -> i32
    RotateRightI32,
    /// (operand number:i32) -> i32
    CountLeadingZerosI32,
    /// (operand number:i32) -> i32
    CountLeadingOnesI32,
    /// (operand number:i32) -> i32
    CountTrailingZerosI32,
    /// Population count: (operand number:i32) -> i32
    CountOnesI32,
    /// Left shift: (operand number:i64 bits:i32) -> i64, bits in [0, 64)
    ShiftLeftI64,
    /// Arithmetic right shift: (operand number:i64 bits:i32) -> i64
    ShiftRightI64S,
    /// Logical right shift: (operand number:i64 bits:i32) -> i64
    ShiftRightI64U,
    /// Left rotate: (operand number:i64 bits:i32) -> i64
    RotateLeftI64,
    /// Right rotate: (operand number:i64 bits:i32) -> i64
    RotateRightI64,
    /// (operand number:i64) -> i32
    CountLeadingZerosI64,
    /// (operand number:i64) -> i32
    CountLeadingOnesI64,
    /// (operand number:i64) -> i32
    CountTrailingZerosI64,
    /// Population count: (operand number:i64) -> i32
    CountOnesI64,

    // ===== Math =====
    /// (operand number:i32) -> i32
    AbsI32 = 0x06_00,
    /// (operand number:i32) -> i32
    NegI32,
    /// (operand number:i64) -> i64
    AbsI64,
    /// (operand number:i64) -> i64
    NegI64,
    /// (operand number:f32) -> f32
    AbsF32,
    /// (operand number:f32) -> f32
    NegF32,
    /// Copy the sign of one number to another: (operand num:f32 sign:f32) -> f32
    CopysignF32,
    /// (operand number:f32) -> f32
    SqrtF32,
    /// (operand left:f32 right:f32) -> f32
    MinF32,
    /// (operand left:f32 right:f32) -> f32
    MaxF32,
    /// (operand number:f32) -> f32
    CeilF32,
    /// (operand number:f32) -> f32
    FloorF32,
    /// Round with ties away from zero, e.g. 2.5 -> 3.0, -2.5 -> -3.0:
    /// (operand number:f32) -> f32
    RoundHalfAwayFromZeroF32,
    /// Round with ties to the nearest even integer: (operand number:f32) -> f32
    RoundHalfToEvenF32,
    /// Integer part: (operand number:f32) -> f32
    TruncF32,
    /// Fractional part: (operand number:f32) -> f32
    FractF32,
    /// Cube root: (operand number:f32) -> f32
    CbrtF32,
    /// e^x: (operand number:f32) -> f32
    ExpF32,
    /// 2^x: (operand number:f32) -> f32
    Exp2F32,
    /// Natural logarithm: (operand number:f32) -> f32
    LnF32,
    /// Base-2 logarithm: (operand number:f32) -> f32
    Log2F32,
    /// Base-10 logarithm: (operand number:f32) -> f32
    Log10F32,
    /// (operand number:f32) -> f32
    SinF32,
    /// (operand number:f32) -> f32
    CosF32,
    /// (operand number:f32) -> f32
    TanF32,
    /// (operand number:f32) -> f32
    AsinF32,
    /// (operand number:f32) -> f32
    AcosF32,
    /// (operand number:f32) -> f32
    AtanF32,
    /// base^exponent: (operand base:f32 exponent:f32) -> f32
    PowF32,
    /// Logarithm with a custom base: (operand number:f32 base:f32) -> f32
    LogF32,
    /// (operand number:f64) -> f64
    AbsF64,
    /// (operand number:f64) -> f64
    NegF64,
    /// Copy the sign of one number to another: (operand num:f64 sign:f64) -> f64
    CopysignF64,
    /// (operand number:f64) -> f64
    SqrtF64,
    /// (operand left:f64 right:f64) -> f64
    MinF64,
    /// (operand left:f64 right:f64) -> f64
    MaxF64,
    /// (operand number:f64) -> f64
    CeilF64,
    /// (operand number:f64) -> f64
    FloorF64,
    /// Round with ties away from zero: (operand number:f64) -> f64
    RoundHalfAwayFromZeroF64,
    /// Round with ties to the nearest even integer: (operand number:f64) -> f64
    RoundHalfToEvenF64,
    /// Integer part: (operand number:f64) -> f64
    TruncF64,
    /// Fractional part: (operand number:f64) -> f64
    FractF64,
    /// Cube root: (operand number:f64) -> f64
    CbrtF64,
    /// e^x: (operand number:f64) -> f64
    ExpF64,
    /// 2^x: (operand number:f64) -> f64
    Exp2F64,
    /// Natural logarithm: (operand number:f64) -> f64
    LnF64,
    /// Base-2 logarithm: (operand number:f64) -> f64
    Log2F64,
    /// Base-10 logarithm: (operand number:f64) -> f64
    Log10F64,
    /// (operand number:f64) -> f64
    SinF64,
    /// (operand number:f64) -> f64
    CosF64,
    /// (operand number:f64) -> f64
    TanF64,
    /// (operand number:f64) -> f64
    AsinF64,
    /// (operand number:f64) -> f64
    AcosF64,
    /// (operand number:f64) -> f64
    AtanF64,
    /// base^exponent: (operand base:f64 exponent:f64) -> f64
    PowF64,
    /// Logarithm with a custom base: (operand number:f64 base:f64) -> f64
    LogF64,

    // ===== Conversion =====
    /// Discard the high 32 bits: (operand number:i64) -> i32
    TruncateI64ToI32 = 0x07_00,
    /// Sign-extend: (operand number:i32) -> i64
    ExtendI32SToI64,
    /// Zero-extend: (operand number:i32) -> i64
    ExtendI32UToI64,
    /// May lose precision: (operand number:f64) -> f32
    DemoteF64ToF32,
    /// (operand number:f32) -> f64
    PromoteF32ToF64,
    /// Truncate the fraction: (operand number:f32) -> i32
    ConvertF32ToI32S,
    /// Truncate the fraction, negative inputs produce 0: (operand number:f32) -> i32
    ConvertF32ToI32U,
    /// Truncate the fraction: (operand number:f64) -> i32
    ConvertF64ToI32S,
    /// Truncate the fraction, negative inputs produce 0: (operand number:f64) -> i32
    ConvertF64ToI32U,
    /// Truncate the fraction: (operand number:f32) -> i64
    ConvertF32ToI64S,
    /// Truncate the fraction, negative inputs produce 0: (operand number:f32) -> i64
    ConvertF32ToI64U,
    /// Truncate the fraction: (operand number:f64) -> i64
    ConvertF64ToI64S,
    /// Truncate the fraction, negative inputs produce 0: (operand number:f64) -> i64
    ConvertF64ToI64U,
    /// (operand number:i32) -> f32
    ConvertI32SToF32,
    /// (operand number:i32) -> f32
    ConvertI32UToF32,
    /// (operand number:i64) -> f32
    ConvertI64SToF32,
    /// (operand number:i64) -> f32
    ConvertI64UToF32,
    /// (operand number:i32) -> f64
    ConvertI32SToF64,
    /// (operand number:i32) -> f64
    ConvertI32UToF64,
    /// (operand number:i64) -> f64
    ConvertI64SToF64,
    /// (operand number:i64) -> f64
    ConvertI64UToF64,

    // ===== Comparison =====
    //
    // Both operands must be of the same data type. The result is an i64
    // `1` or `0`.
    /// (operand number:i32) -> i64
    EqzI32 = 0x08_00,
    /// (operand number:i32) -> i64
    NezI32,
    /// (operand left:i32 right:i32) -> i64
    EqI32,
    /// (operand left:i32 right:i32) -> i64
    NeI32,
    /// Signed less-than: (operand left:i32 right:i32) -> i64
    LtI32S,
    /// Unsigned less-than: (operand left:i32 right:i32) -> i64
    LtI32U,
    /// Signed greater-than: (operand left:i32 right:i32) -> i64
    GtI32S,
    /// Unsigned greater-than: (operand left:i32 right:i32) -> i64
    GtI32U,
    /// Signed less-or-equal: (operand left:i32 right:i32) -> i64
    LeI32S,
    /// Unsigned less-or-equal: (operand left:i32 right:i32) -> i64
    LeI32U,
    /// Signed greater-or-equal: (operand left:i32 right:i32) -> i64
    GeI32S,
    /// Unsigned greater-or-equal: (operand left:i32 right:i32) -> i64
    GeI32U,
    /// (operand number:i64) -> i64
    EqzI64,
    /// (operand number:i64) -> i64
    NezI64,
    /// (operand left:i64 right:i64) -> i64
    EqI64,
    /// (operand left:i64 right:i64) -> i64
    NeI64,
    /// Signed less-than: (operand left:i64 right:i64) -> i64
    LtI64S,
    /// Unsigned less-than: (operand left:i64 right:i64) -> i64
    LtI64U,
    /// Signed greater-than: (operand left:i64 right:i64) -> i64
    GtI64S,
    /// Unsigned greater-than: (operand left:i64 right:i64) -> i64
    GtI64U,
    /// Signed less-or-equal: (operand left:i64 right:i64) -> i64
    LeI64S,
    /// Unsigned less-or-equal: (operand left:i64 right:i64) -> i64
    LeI64U,
    /// Signed greater-or-equal: (operand left:i64 right:i64) -> i64
    GeI64S,
    /// Unsigned greater-or-equal: (operand left:i64 right:i64) -> i64
    GeI64U,
    /// (operand left:f32 right:f32) -> i64
    EqF32,
    /// (operand left:f32 right:f32) -> i64
    NeF32,
    /// (operand left:f32 right:f32) -> i64
    LtF32,
    /// (operand left:f32 right:f32) -> i64
    GtF32,
    /// (operand left:f32 right:f32) -> i64
    LeF32,
    /// (operand left:f32 right:f32) -> i64
    GeF32,
    /// (operand left:f64 right:f64) -> i64
    EqF64,
    /// (operand left:f64 right:f64) -> i64
    NeF64,
    /// (operand left:f64 right:f64) -> i64
    LtF64,
    /// (operand left:f64 right:f64) -> i64
    GtF64,
    /// (operand left:f64 right:f64) -> i64
    LeF64,
    /// (operand left:f64 right:f64) -> i64
    GeF64,

    // ===== Control flow =====
    /// Remove the current stack frame and place the block or function
    /// results on top of the operand stack.
    End = 0x09_00,
    /// Open a block scope with its own stack frame. Blocks have a type
    /// (parameters and results) like a function, and block parameters
    /// are local variables accessed with `local_load`/`local_store`:
    /// (param type_index:i32 local_variable_list_index:i32)
    Block,
    /// Exit a block or function, carrying the target frame's results
    /// out. `layers` selects how many frames to unwind (0 for the
    /// current block); `next_inst_offset` is the byte distance from this
    /// instruction to the instruction after the matching `end`, and is
    /// ignored when the target is the function frame:
    /// (param layers:i16 next_inst_offset:i32)
    Break,
    /// Jump back to the first instruction of the target block (or the
    /// function entry), keeping only the operands matching the target's
    /// parameters. Loops and tail calls are built from this:
    /// (param layers:i16 start_inst_offset:i32)
    Recur,
    /// Open a block scope and jump past the matching `break_alt` when
    /// the top operand is zero. Builds if/else chains:
    /// (param type_index:i32 local_variable_list_index:i32 next_inst_offset:i32)
    BlockAlt,
    /// Exit the enclosing `block_alt` scope; equivalent to `break` with
    /// layers 0: (param next_inst_offset:i32)
    BreakAlt,
    /// Open a block scope only when the top operand is non-zero; the
    /// block type must be () -> (), so only a local variable list is
    /// named: (param local_variable_list_index:i32 next_inst_offset:i32)
    BlockNez,
    /// Call a function by public index (imported functions first, then
    /// internal ones): (param function_public_index:i32) (operand args...)
    Call,
    /// Call a function whose module and public index are operands;
    /// closures are built on this:
    /// (operand args... module_index:i32 function_public_index:i32)
    CallDynamic,
    /// Call a VM built-in function: (param envcall_num:i32) (operand args...)
    EnvCall,
    /// Invoke an operating system call. Arguments are pushed first,
    /// then the syscall number and the argument count:
    /// (operand args... params_count:i32 syscall_num:i32) -> (value:i64 errno:i32)
    SysCall,
    /// Call an external (native) function:
    /// (param external_function_index:i32) (operand args...)
    ExtCall,

    // ===== Memory =====
    /// Allocate a memory chunk and return its data public index.
    /// Alignment and size must be multiples of 8; alignment 0 selects
    /// the default of 8: (operand align:i16 size:i64) -> i32
    MemoryAllocate = 0x0a_00,
    /// Resize a memory chunk: (operand data_public_index:i32 new_size:i64) -> i32
    MemoryResize,
    /// Free a memory chunk: (operand data_public_index:i32)
    MemoryFree,
    /// Fill a region with a byte value:
    /// (operand module_index:i32 data_public_index:i32 offset:i64 size:i64 value:i8)
    MemoryFill,
    /// Copy a region between chunks; the regions must not overlap:
    /// (operand src_module:i32 src_index:i32 src_offset:i64
    ///          dst_module:i32 dst_index:i32 dst_offset:i64 size:i64)
    MemoryCopy,
    /// Terminate the process immediately: (param terminate_code:i32)
    Terminate,

    // ===== Machine =====
    /// Push the module index and function public index of a function:
    /// (param function_public_index:i32) -> (module_index:i32 function_public_index:i32)
    GetFunction = 0x0b_00,
    /// Push the module index and data public index of a data item:
    /// (param data_public_index:i32) -> (module_index:i32 data_public_index:i32)
    GetData,
    /// Create (or reuse) a native trampoline for a VM function so the
    /// host or an external library can call it, and push its address:
    /// (param function_public_index:i32) -> pointer
    HostAddrFunction,
    /// (operand module_index:i32 function_public_index:i32) -> pointer
    HostAddrFunctionDynamic,
    /// Push the host address of a data item. Host addresses bypass the
    /// index checks and are only meant for external function interop:
    /// (param offset:i16 data_public_index:i32) -> pointer
    HostAddrData,
    /// (param data_public_index:i32) (operand offset:i64) -> pointer
    HostAddrDataExtend,
    /// (operand module_index:i32 data_public_index:i32 offset:i64) -> pointer
    HostAddrDataDynamic,
}

/// Parameter layout of an instruction.
///
/// The format fixes the instruction length and whether padding is
/// inserted between the opcode and the first parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionFormat {
    /// 16-bit, no parameters
    Unit,
    /// 32-bit, one i16 parameter
    Imm16,
    /// 64-bit, one i32 parameter after 16 bits of padding
    Imm32,
    /// 64-bit, one i16 and one i32 parameter
    Imm16Imm32,
    /// 96-bit, two i32 parameters after 16 bits of padding
    Imm32Imm32,
    /// 128-bit, three i32 parameters after 16 bits of padding
    Imm32Imm32Imm32,
}

impl InstructionFormat {
    /// Encoded instruction length in bytes.
    pub fn length_in_bytes(self) -> usize {
        match self {
            InstructionFormat::Unit => 2,
            InstructionFormat::Imm16 => 4,
            InstructionFormat::Imm32 => 8,
            InstructionFormat::Imm16Imm32 => 8,
            InstructionFormat::Imm32Imm32 => 12,
            InstructionFormat::Imm32Imm32Imm32 => 16,
        }
    }

    /// Whether the instruction carries an i32 parameter and therefore
    /// must start on a 4-byte boundary.
    pub fn requires_alignment(self) -> bool {
        !matches!(self, InstructionFormat::Unit | InstructionFormat::Imm16)
    }

    /// Number of i32 parameters the instruction carries.
    pub fn i32_parameter_count(self) -> usize {
        match self {
            InstructionFormat::Unit | InstructionFormat::Imm16 => 0,
            InstructionFormat::Imm32 | InstructionFormat::Imm16Imm32 => 1,
            InstructionFormat::Imm32Imm32 => 2,
            InstructionFormat::Imm32Imm32Imm32 => 3,
        }
    }
}

impl Opcode {
    /// Every opcode, in encoding order.
    pub const ALL: &'static [Opcode] = &[
        // Fundamental
        Opcode::Nop,
        Opcode::ImmI32,
        Opcode::ImmI64,
        Opcode::ImmF32,
        Opcode::ImmF64,
        // Local variables
        Opcode::LocalLoadI64,
        Opcode::LocalLoadI32S,
        Opcode::LocalLoadI32U,
        Opcode::LocalLoadI16S,
        Opcode::LocalLoadI16U,
        Opcode::LocalLoadI8S,
        Opcode::LocalLoadI8U,
        Opcode::LocalLoadF64,
        Opcode::LocalLoadF32,
        Opcode::LocalStoreI64,
        Opcode::LocalStoreI32,
        Opcode::LocalStoreI16,
        Opcode::LocalStoreI8,
        Opcode::LocalStoreF64,
        Opcode::LocalStoreF32,
        // Data
        Opcode::DataLoadI64,
        Opcode::DataLoadI32S,
        Opcode::DataLoadI32U,
        Opcode::DataLoadI16S,
        Opcode::DataLoadI16U,
        Opcode::DataLoadI8S,
        Opcode::DataLoadI8U,
        Opcode::DataLoadF64,
        Opcode::DataLoadF32,
        Opcode::DataStoreI64,
        Opcode::DataStoreI32,
        Opcode::DataStoreI16,
        Opcode::DataStoreI8,
        Opcode::DataStoreF64,
        Opcode::DataStoreF32,
        Opcode::DataLoadExtendI64,
        Opcode::DataLoadExtendI32S,
        Opcode::DataLoadExtendI32U,
        Opcode::DataLoadExtendI16S,
        Opcode::DataLoadExtendI16U,
        Opcode::DataLoadExtendI8S,
        Opcode::DataLoadExtendI8U,
        Opcode::DataLoadExtendF64,
        Opcode::DataLoadExtendF32,
        Opcode::DataStoreExtendI64,
        Opcode::DataStoreExtendI32,
        Opcode::DataStoreExtendI16,
        Opcode::DataStoreExtendI8,
        Opcode::DataStoreExtendF64,
        Opcode::DataStoreExtendF32,
        Opcode::DataLoadDynamicI64,
        Opcode::DataLoadDynamicI32S,
        Opcode::DataLoadDynamicI32U,
        Opcode::DataLoadDynamicI16S,
        Opcode::DataLoadDynamicI16U,
        Opcode::DataLoadDynamicI8S,
        Opcode::DataLoadDynamicI8U,
        Opcode::DataLoadDynamicF64,
        Opcode::DataLoadDynamicF32,
        Opcode::DataStoreDynamicI64,
        Opcode::DataStoreDynamicI32,
        Opcode::DataStoreDynamicI16,
        Opcode::DataStoreDynamicI8,
        Opcode::DataStoreDynamicF64,
        Opcode::DataStoreDynamicF32,
        // Arithmetic
        Opcode::AddI32,
        Opcode::SubI32,
        Opcode::AddImmI32,
        Opcode::SubImmI32,
        Opcode::MulI32,
        Opcode::DivI32S,
        Opcode::DivI32U,
        Opcode::RemI32S,
        Opcode::RemI32U,
        Opcode::AddI64,
        Opcode::SubI64,
        Opcode::AddImmI64,
        Opcode::SubImmI64,
        Opcode::MulI64,
        Opcode::DivI64S,
        Opcode::DivI64U,
        Opcode::RemI64S,
        Opcode::RemI64U,
        Opcode::AddF32,
        Opcode::SubF32,
        Opcode::MulF32,
        Opcode::DivF32,
        Opcode::AddF64,
        Opcode::SubF64,
        Opcode::MulF64,
        Opcode::DivF64,
        // Bitwise
        Opcode::And,
        Opcode::Or,
        Opcode::Xor,
        Opcode::Not,
        Opcode::ShiftLeftI32,
        Opcode::ShiftRightI32S,
        Opcode::ShiftRightI32U,
        Opcode::RotateLeftI32,
        Opcode::RotateRightI32,
        Opcode::CountLeadingZerosI32,
        Opcode::CountLeadingOnesI32,
        Opcode::CountTrailingZerosI32,
        Opcode::CountOnesI32,
        Opcode::ShiftLeftI64,
        Opcode::ShiftRightI64S,
        Opcode::ShiftRightI64U,
        Opcode::RotateLeftI64,
        Opcode::RotateRightI64,
        Opcode::CountLeadingZerosI64,
        Opcode::CountLeadingOnesI64,
        Opcode::CountTrailingZerosI64,
        Opcode::CountOnesI64,
        // Math
        Opcode::AbsI32,
        Opcode::NegI32,
        Opcode::AbsI64,
        Opcode::NegI64,
        Opcode::AbsF32,
        Opcode::NegF32,
        Opcode::CopysignF32,
        Opcode::SqrtF32,
        Opcode::MinF32,
        Opcode::MaxF32,
        Opcode::CeilF32,
        Opcode::FloorF32,
        Opcode::RoundHalfAwayFromZeroF32,
        Opcode::RoundHalfToEvenF32,
        Opcode::TruncF32,
        Opcode::FractF32,
        Opcode::CbrtF32,
        Opcode::ExpF32,
        Opcode::Exp2F32,
        Opcode::LnF32,
        Opcode::Log2F32,
        Opcode::Log10F32,
        Opcode::SinF32,
        Opcode::CosF32,
        Opcode::TanF32,
        Opcode::AsinF32,
        Opcode::AcosF32,
        Opcode::AtanF32,
        Opcode::PowF32,
        Opcode::LogF32,
        Opcode::AbsF64,
        Opcode::NegF64,
        Opcode::CopysignF64,
        Opcode::SqrtF64,
        Opcode::MinF64,
        Opcode::MaxF64,
        Opcode::CeilF64,
        Opcode::FloorF64,
        Opcode::RoundHalfAwayFromZeroF64,
        Opcode::RoundHalfToEvenF64,
        Opcode::TruncF64,
        Opcode::FractF64,
        Opcode::CbrtF64,
        Opcode::ExpF64,
        Opcode::Exp2F64,
        Opcode::LnF64,
        Opcode::Log2F64,
        Opcode::Log10F64,
        Opcode::SinF64,
        Opcode::CosF64,
        Opcode::TanF64,
        Opcode::AsinF64,
        Opcode::AcosF64,
        Opcode::AtanF64,
        Opcode::PowF64,
        Opcode::LogF64,
        // Conversion
        Opcode::TruncateI64ToI32,
        Opcode::ExtendI32SToI64,
        Opcode::ExtendI32UToI64,
        Opcode::DemoteF64ToF32,
        Opcode::PromoteF32ToF64,
        Opcode::ConvertF32ToI32S,
        Opcode::ConvertF32ToI32U,
        Opcode::ConvertF64ToI32S,
        Opcode::ConvertF64ToI32U,
        Opcode::ConvertF32ToI64S,
        Opcode::ConvertF32ToI64U,
        Opcode::ConvertF64ToI64S,
        Opcode::ConvertF64ToI64U,
        Opcode::ConvertI32SToF32,
        Opcode::ConvertI32UToF32,
        Opcode::ConvertI64SToF32,
        Opcode::ConvertI64UToF32,
        Opcode::ConvertI32SToF64,
        Opcode::ConvertI32UToF64,
        Opcode::ConvertI64SToF64,
        Opcode::ConvertI64UToF64,
        // Comparison
        Opcode::EqzI32,
        Opcode::NezI32,
        Opcode::EqI32,
        Opcode::NeI32,
        Opcode::LtI32S,
        Opcode::LtI32U,
        Opcode::GtI32S,
        Opcode::GtI32U,
        Opcode::LeI32S,
        Opcode::LeI32U,
        Opcode::GeI32S,
        Opcode::GeI32U,
        Opcode::EqzI64,
        Opcode::NezI64,
        Opcode::EqI64,
        Opcode::NeI64,
        Opcode::LtI64S,
        Opcode::LtI64U,
        Opcode::GtI64S,
        Opcode::GtI64U,
        Opcode::LeI64S,
        Opcode::LeI64U,
        Opcode::GeI64S,
        Opcode::GeI64U,
        Opcode::EqF32,
        Opcode::NeF32,
        Opcode::LtF32,
        Opcode::GtF32,
        Opcode::LeF32,
        Opcode::GeF32,
        Opcode::EqF64,
        Opcode::NeF64,
        Opcode::LtF64,
        Opcode::GtF64,
        Opcode::LeF64,
        Opcode::GeF64,
        // Control flow
        Opcode::End,
        Opcode::Block,
        Opcode::Break,
        Opcode::Recur,
        Opcode::BlockAlt,
        Opcode::BreakAlt,
        Opcode::BlockNez,
        Opcode::Call,
        Opcode::CallDynamic,
        Opcode::EnvCall,
        Opcode::SysCall,
        Opcode::ExtCall,
        // Memory
        Opcode::MemoryAllocate,
        Opcode::MemoryResize,
        Opcode::MemoryFree,
        Opcode::MemoryFill,
        Opcode::MemoryCopy,
        Opcode::Terminate,
        // Machine
        Opcode::GetFunction,
        Opcode::GetData,
        Opcode::HostAddrFunction,
        Opcode::HostAddrFunctionDynamic,
        Opcode::HostAddrData,
        Opcode::HostAddrDataExtend,
        Opcode::HostAddrDataDynamic,
    ];

    /// Get opcode from its 16-bit encoded value
    pub fn from_u16(value: u16) -> Option<Self> {
        Opcode::ALL.iter().copied().find(|op| *op as u16 == value)
    }

    /// Get opcode from its assembly name
    pub fn from_name(name: &str) -> Option<Self> {
        Opcode::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Convert opcode to its 16-bit encoded value
    #[inline]
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Category byte (high byte of the encoded value)
    #[inline]
    pub fn category(self) -> u8 {
        (self as u16 >> 8) as u8
    }

    /// Parameter layout of this instruction
    pub fn format(self) -> InstructionFormat {
        use Opcode::*;
        match self {
            // one i32 parameter
            ImmI32 | ImmF32 | DataLoadExtendI64 | DataLoadExtendI32S | DataLoadExtendI32U
            | DataLoadExtendI16S | DataLoadExtendI16U | DataLoadExtendI8S | DataLoadExtendI8U
            | DataLoadExtendF64 | DataLoadExtendF32 | DataStoreExtendI64 | DataStoreExtendI32
            | DataStoreExtendI16 | DataStoreExtendI8 | DataStoreExtendF64 | DataStoreExtendF32
            | BreakAlt | Call | EnvCall | ExtCall | Terminate | GetFunction | GetData
            | HostAddrFunction | HostAddrDataExtend => InstructionFormat::Imm32,

            // two i32 parameters
            ImmI64 | ImmF64 | Block | BlockNez => InstructionFormat::Imm32Imm32,

            // three i32 parameters
            BlockAlt => InstructionFormat::Imm32Imm32Imm32,

            // one i16 parameter
            AddImmI32 | SubImmI32 | AddImmI64 | SubImmI64 => InstructionFormat::Imm16,

            // one i16 and one i32 parameter
            LocalLoadI64 | LocalLoadI32S | LocalLoadI32U | LocalLoadI16S | LocalLoadI16U
            | LocalLoadI8S | LocalLoadI8U | LocalLoadF64 | LocalLoadF32 | LocalStoreI64
            | LocalStoreI32 | LocalStoreI16 | LocalStoreI8 | LocalStoreF64 | LocalStoreF32
            | DataLoadI64 | DataLoadI32S | DataLoadI32U | DataLoadI16S | DataLoadI16U
            | DataLoadI8S | DataLoadI8U | DataLoadF64 | DataLoadF32 | DataStoreI64
            | DataStoreI32 | DataStoreI16 | DataStoreI8 | DataStoreF64 | DataStoreF32
            | Break | Recur | HostAddrData => InstructionFormat::Imm16Imm32,

            // everything else takes its inputs from the operand stack
            _ => InstructionFormat::Unit,
        }
    }

    /// Assembly name of the instruction
    pub fn name(self) -> &'static str {
        match self {
            // Fundamental
            Opcode::Nop => "nop",
            Opcode::ImmI32 => "imm_i32",
            Opcode::ImmI64 => "imm_i64",
            Opcode::ImmF32 => "imm_f32",
            Opcode::ImmF64 => "imm_f64",
            // Local variables
            Opcode::LocalLoadI64 => "local_load_i64",
            Opcode::LocalLoadI32S => "local_load_i32_s",
            Opcode::LocalLoadI32U => "local_load_i32_u",
            Opcode::LocalLoadI16S => "local_load_i16_s",
            Opcode::LocalLoadI16U => "local_load_i16_u",
            Opcode::LocalLoadI8S => "local_load_i8_s",
            Opcode::LocalLoadI8U => "local_load_i8_u",
            Opcode::LocalLoadF64 => "local_load_f64",
            Opcode::LocalLoadF32 => "local_load_f32",
            Opcode::LocalStoreI64 => "local_store_i64",
            Opcode::LocalStoreI32 => "local_store_i32",
            Opcode::LocalStoreI16 => "local_store_i16",
            Opcode::LocalStoreI8 => "local_store_i8",
            Opcode::LocalStoreF64 => "local_store_f64",
            Opcode::LocalStoreF32 => "local_store_f32",
            // Data
            Opcode::DataLoadI64 => "data_load_i64",
            Opcode::DataLoadI32S => "data_load_i32_s",
            Opcode::DataLoadI32U => "data_load_i32_u",
            Opcode::DataLoadI16S => "data_load_i16_s",
            Opcode::DataLoadI16U => "data_load_i16_u",
            Opcode::DataLoadI8S => "data_load_i8_s",
            Opcode::DataLoadI8U => "data_load_i8_u",
            Opcode::DataLoadF64 => "data_load_f64",
            Opcode::DataLoadF32 => "data_load_f32",
            Opcode::DataStoreI64 => "data_store_i64",
            Opcode::DataStoreI32 => "data_store_i32",
            Opcode::DataStoreI16 => "data_store_i16",
            Opcode::DataStoreI8 => "data_store_i8",
            Opcode::DataStoreF64 => "data_store_f64",
            Opcode::DataStoreF32 => "data_store_f32",
            Opcode::DataLoadExtendI64 => "data_load_extend_i64",
            Opcode::DataLoadExtendI32S => "data_load_extend_i32_s",
            Opcode::DataLoadExtendI32U => "data_load_extend_i32_u",
            Opcode::DataLoadExtendI16S => "data_load_extend_i16_s",
            Opcode::DataLoadExtendI16U => "data_load_extend_i16_u",
            Opcode::DataLoadExtendI8S => "data_load_extend_i8_s",
            Opcode::DataLoadExtendI8U => "data_load_extend_i8_u",
            Opcode::DataLoadExtendF64 => "data_load_extend_f64",
            Opcode::DataLoadExtendF32 => "data_load_extend_f32",
            Opcode::DataStoreExtendI64 => "data_store_extend_i64",
            Opcode::DataStoreExtendI32 => "data_store_extend_i32",
            Opcode::DataStoreExtendI16 => "data_store_extend_i16",
            Opcode::DataStoreExtendI8 => "data_store_extend_i8",
            Opcode::DataStoreExtendF64 => "data_store_extend_f64",
            Opcode::DataStoreExtendF32 => "data_store_extend_f32",
            Opcode::DataLoadDynamicI64 => "data_load_dynamic_i64",
            Opcode::DataLoadDynamicI32S => "data_load_dynamic_i32_s",
            Opcode::DataLoadDynamicI32U => "data_load_dynamic_i32_u",
            Opcode::DataLoadDynamicI16S => "data_load_dynamic_i16_s",
            Opcode::DataLoadDynamicI16U => "data_load_dynamic_i16_u",
            Opcode::DataLoadDynamicI8S => "data_load_dynamic_i8_s",
            Opcode::DataLoadDynamicI8U => "data_load_dynamic_i8_u",
            Opcode::DataLoadDynamicF64 => "data_load_dynamic_f64",
            Opcode::DataLoadDynamicF32 => "data_load_dynamic_f32",
            Opcode::DataStoreDynamicI64 => "data_store_dynamic_i64",
            Opcode::DataStoreDynamicI32 => "data_store_dynamic_i32",
            Opcode::DataStoreDynamicI16 => "data_store_dynamic_i16",
            Opcode::DataStoreDynamicI8 => "data_store_dynamic_i8",
            Opcode::DataStoreDynamicF64 => "data_store_dynamic_f64",
            Opcode::DataStoreDynamicF32 => "data_store_dynamic_f32",
            // Arithmetic
            Opcode::AddI32 => "add_i32",
            Opcode::SubI32 => "sub_i32",
            Opcode::AddImmI32 => "add_imm_i32",
            Opcode::SubImmI32 => "sub_imm_i32",
            Opcode::MulI32 => "mul_i32",
            Opcode::DivI32S => "div_i32_s",
            Opcode::DivI32U => "div_i32_u",
            Opcode::RemI32S => "rem_i32_s",
            Opcode::RemI32U => "rem_i32_u",
            Opcode::AddI64 => "add_i64",
            Opcode::SubI64 => "sub_i64",
            Opcode::AddImmI64 => "add_imm_i64",
            Opcode::SubImmI64 => "sub_imm_i64",
            Opcode::MulI64 => "mul_i64",
            Opcode::DivI64S => "div_i64_s",
            Opcode::DivI64U => "div_i64_u",
            Opcode::RemI64S => "rem_i64_s",
            Opcode::RemI64U => "rem_i64_u",
            Opcode::AddF32 => "add_f32",
            Opcode::SubF32 => "sub_f32",
            Opcode::MulF32 => "mul_f32",
            Opcode::DivF32 => "div_f32",
            Opcode::AddF64 => "add_f64",
            Opcode::SubF64 => "sub_f64",
            Opcode::MulF64 => "mul_f64",
            Opcode::DivF64 => "div_f64",
            // Bitwise
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Not => "not",
            Opcode::ShiftLeftI32 => "shift_left_i32",
            Opcode::ShiftRightI32S => "shift_right_i32_s",
            Opcode::ShiftRightI32U => "shift_right_i32_u",
            Opcode::RotateLeftI32 => "rotate_left_i32",
            Opcode::RotateRightI32 => "rotate_right_i32",
            Opcode::CountLeadingZerosI32 => "count_leading_zeros_i32",
            Opcode::CountLeadingOnesI32 => "count_leading_ones_i32",
            Opcode::CountTrailingZerosI32 => "count_trailing_zeros_i32",
            Opcode::CountOnesI32 => "count_ones_i32",
            Opcode::ShiftLeftI64 => "shift_left_i64",
            Opcode::ShiftRightI64S => "shift_right_i64_s",
            Opcode::ShiftRightI64U => "shift_right_i64_u",
            Opcode::RotateLeftI64 => "rotate_left_i64",
            Opcode::RotateRightI64 => "rotate_right_i64",
            Opcode::CountLeadingZerosI64 => "count_leading_zeros_i64",
            Opcode::CountLeadingOnesI64 => "count_leading_ones_i64",
            Opcode::CountTrailingZerosI64 => "count_trailing_zeros_i64",
            Opcode::CountOnesI64 => "count_ones_i64",
            // Math
            Opcode::AbsI32 => "abs_i32",
            Opcode::NegI32 => "neg_i32",
            Opcode::AbsI64 => "abs_i64",
            Opcode::NegI64 => "neg_i64",
            Opcode::AbsF32 => "abs_f32",
            Opcode::NegF32 => "neg_f32",
            Opcode::CopysignF32 => "copysign_f32",
            Opcode::SqrtF32 => "sqrt_f32",
            Opcode::MinF32 => "min_f32",
            Opcode::MaxF32 => "max_f32",
            Opcode::CeilF32 => "ceil_f32",
            Opcode::FloorF32 => "floor_f32",
            Opcode::RoundHalfAwayFromZeroF32 => "round_half_away_from_zero_f32",
            Opcode::RoundHalfToEvenF32 => "round_half_to_even_f32",
            Opcode::TruncF32 => "trunc_f32",
            Opcode::FractF32 => "fract_f32",
            Opcode::CbrtF32 => "cbrt_f32",
            Opcode::ExpF32 => "exp_f32",
            Opcode::Exp2F32 => "exp2_f32",
            Opcode::LnF32 => "ln_f32",
            Opcode::Log2F32 => "log2_f32",
            Opcode::Log10F32 => "log10_f32",
            Opcode::SinF32 => "sin_f32",
            Opcode::CosF32 => "cos_f32",
            Opcode::TanF32 => "tan_f32",
            Opcode::AsinF32 => "asin_f32",
            Opcode::AcosF32 => "acos_f32",
            Opcode::AtanF32 => "atan_f32",
            Opcode::PowF32 => "pow_f32",
            Opcode::LogF32 => "log_f32",
            Opcode::AbsF64 => "abs_f64",
            Opcode::NegF64 => "neg_f64",
            Opcode::CopysignF64 => "copysign_f64",
            Opcode::SqrtF64 => "sqrt_f64",
            Opcode::MinF64 => "min_f64",
            Opcode::MaxF64 => "max_f64",
            Opcode::CeilF64 => "ceil_f64",
            Opcode::FloorF64 => "floor_f64",
            Opcode::RoundHalfAwayFromZeroF64 => "round_half_away_from_zero_f64",
            Opcode::RoundHalfToEvenF64 => "round_half_to_even_f64",
            Opcode::TruncF64 => "trunc_f64",
            Opcode::FractF64 => "fract_f64",
            Opcode::CbrtF64 => "cbrt_f64",
            Opcode::ExpF64 => "exp_f64",
            Opcode::Exp2F64 => "exp2_f64",
            Opcode::LnF64 => "ln_f64",
            Opcode::Log2F64 => "log2_f64",
            Opcode::Log10F64 => "log10_f64",
            Opcode::SinF64 => "sin_f64",
            Opcode::CosF64 => "cos_f64",
            Opcode::TanF64 => "tan_f64",
            Opcode::AsinF64 => "asin_f64",
            Opcode::AcosF64 => "acos_f64",
            Opcode::AtanF64 => "atan_f64",
            Opcode::PowF64 => "pow_f64",
            Opcode::LogF64 => "log_f64",
            // Conversion
            Opcode::TruncateI64ToI32 => "truncate_i64_to_i32",
            Opcode::ExtendI32SToI64 => "extend_i32_s_to_i64",
            Opcode::ExtendI32UToI64 => "extend_i32_u_to_i64",
            Opcode::DemoteF64ToF32 => "demote_f64_to_f32",
            Opcode::PromoteF32ToF64 => "promote_f32_to_f64",
            Opcode::ConvertF32ToI32S => "convert_f32_to_i32_s",
            Opcode::ConvertF32ToI32U => "convert_f32_to_i32_u",
            Opcode::ConvertF64ToI32S => "convert_f64_to_i32_s",
            Opcode::ConvertF64ToI32U => "convert_f64_to_i32_u",
            Opcode::ConvertF32ToI64S => "convert_f32_to_i64_s",
            Opcode::ConvertF32ToI64U => "convert_f32_to_i64_u",
            Opcode::ConvertF64ToI64S => "convert_f64_to_i64_s",
            Opcode::ConvertF64ToI64U => "convert_f64_to_i64_u",
            Opcode::ConvertI32SToF32 => "convert_i32_s_to_f32",
            Opcode::ConvertI32UToF32 => "convert_i32_u_to_f32",
            Opcode::ConvertI64SToF32 => "convert_i64_s_to_f32",
            Opcode::ConvertI64UToF32 => "convert_i64_u_to_f32",
            Opcode::ConvertI32SToF64 => "convert_i32_s_to_f64",
            Opcode::ConvertI32UToF64 => "convert_i32_u_to_f64",
            Opcode::ConvertI64SToF64 => "convert_i64_s_to_f64",
            Opcode::ConvertI64UToF64 => "convert_i64_u_to_f64",
            // Comparison
            Opcode::EqzI32 => "eqz_i32",
            Opcode::NezI32 => "nez_i32",
            Opcode::EqI32 => "eq_i32",
            Opcode::NeI32 => "ne_i32",
            Opcode::LtI32S => "lt_i32_s",
            Opcode::LtI32U => "lt_i32_u",
            Opcode::GtI32S => "gt_i32_s",
            Opcode::GtI32U => "gt_i32_u",
            Opcode::LeI32S => "le_i32_s",
            Opcode::LeI32U => "le_i32_u",
            Opcode::GeI32S => "ge_i32_s",
            Opcode::GeI32U => "ge_i32_u",
            Opcode::EqzI64 => "eqz_i64",
            Opcode::NezI64 => "nez_i64",
            Opcode::EqI64 => "eq_i64",
            Opcode::NeI64 => "ne_i64",
            Opcode::LtI64S => "lt_i64_s",
            Opcode::LtI64U => "lt_i64_u",
            Opcode::GtI64S => "gt_i64_s",
            Opcode::GtI64U => "gt_i64_u",
            Opcode::LeI64S => "le_i64_s",
            Opcode::LeI64U => "le_i64_u",
            Opcode::GeI64S => "ge_i64_s",
            Opcode::GeI64U => "ge_i64_u",
            Opcode::EqF32 => "eq_f32",
            Opcode::NeF32 => "ne_f32",
            Opcode::LtF32 => "lt_f32",
            Opcode::GtF32 => "gt_f32",
            Opcode::LeF32 => "le_f32",
            Opcode::GeF32 => "ge_f32",
            Opcode::EqF64 => "eq_f64",
            Opcode::NeF64 => "ne_f64",
            Opcode::LtF64 => "lt_f64",
            Opcode::GtF64 => "gt_f64",
            Opcode::LeF64 => "le_f64",
            Opcode::GeF64 => "ge_f64",
            // Control flow
            Opcode::End => "end",
            Opcode::Block => "block",
            Opcode::Break => "break",
            Opcode::Recur => "recur",
            Opcode::BlockAlt => "block_alt",
            Opcode::BreakAlt => "break_alt",
            Opcode::BlockNez => "block_nez",
            Opcode::Call => "call",
            Opcode::CallDynamic => "call_dynamic",
            Opcode::EnvCall => "envcall",
            Opcode::SysCall => "syscall",
            Opcode::ExtCall => "extcall",
            // Memory
            Opcode::MemoryAllocate => "memory_allocate",
            Opcode::MemoryResize => "memory_resize",
            Opcode::MemoryFree => "memory_free",
            Opcode::MemoryFill => "memory_fill",
            Opcode::MemoryCopy => "memory_copy",
            Opcode::Terminate => "terminate",
            // Machine
            Opcode::GetFunction => "get_function",
            Opcode::GetData => "get_data",
            Opcode::HostAddrFunction => "host_addr_function",
            Opcode::HostAddrFunctionDynamic => "host_addr_function_dynamic",
            Opcode::HostAddrData => "host_addr_data",
            Opcode::HostAddrDataExtend => "host_addr_data_extend",
            Opcode::HostAddrDataDynamic => "host_addr_data_dynamic",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_conversion() {
        assert_eq!(Opcode::Nop.as_u16(), 0x01_00);
        assert_eq!(Opcode::AddI32.as_u16(), 0x04_00);
        assert_eq!(Opcode::from_u16(0x04_00), Some(Opcode::AddI32));
        assert_eq!(Opcode::from_u16(0x04_01), Some(Opcode::SubI32));
        // item beyond the end of the arithmetic category
        assert_eq!(Opcode::from_u16(0x04_ff), None);
        // unknown category
        assert_eq!(Opcode::from_u16(0x0c_00), None);
    }

    #[test]
    fn test_opcode_names() {
        assert_eq!(Opcode::LocalLoadI64.name(), "local_load_i64");
        assert_eq!(Opcode::Break.name(), "break");
        assert_eq!(Opcode::from_name("break"), Some(Opcode::Break));
        assert_eq!(Opcode::from_name("rotate_right_i64"), Some(Opcode::RotateRightI64));
        assert_eq!(Opcode::from_name("no_such_instruction"), None);
    }

    #[test]
    fn test_names_are_unique_and_total() {
        let mut seen = std::collections::HashSet::new();
        for op in Opcode::ALL {
            assert!(seen.insert(op.name()), "duplicate name: {}", op.name());
            assert_eq!(Opcode::from_name(op.name()), Some(*op));
            assert_eq!(Opcode::from_u16(op.as_u16()), Some(*op));
        }
    }

    #[test]
    fn test_all_opcodes_below_limit() {
        assert_eq!(Opcode::ALL.len(), 251);
        for op in Opcode::ALL {
            assert!((op.as_u16() as usize) < MAX_OPCODE_NUMBER);
        }
    }

    #[test]
    fn test_category_numbering() {
        assert_eq!(Opcode::Nop.category(), 0x01);
        assert_eq!(Opcode::LocalLoadI64.category(), 0x02);
        assert_eq!(Opcode::DataLoadI64.category(), 0x03);
        assert_eq!(Opcode::AddI32.category(), 0x04);
        assert_eq!(Opcode::And.category(), 0x05);
        assert_eq!(Opcode::AbsI32.category(), 0x06);
        assert_eq!(Opcode::TruncateI64ToI32.category(), 0x07);
        assert_eq!(Opcode::EqzI32.category(), 0x08);
        assert_eq!(Opcode::End.category(), 0x09);
        assert_eq!(Opcode::MemoryAllocate.category(), 0x0a);
        assert_eq!(Opcode::GetFunction.category(), 0x0b);
    }

    #[test]
    fn test_instruction_formats() {
        assert_eq!(Opcode::Nop.format(), InstructionFormat::Unit);
        assert_eq!(Opcode::AddImmI32.format(), InstructionFormat::Imm16);
        assert_eq!(Opcode::ImmI32.format(), InstructionFormat::Imm32);
        assert_eq!(Opcode::LocalLoadI64.format(), InstructionFormat::Imm16Imm32);
        assert_eq!(Opcode::ImmI64.format(), InstructionFormat::Imm32Imm32);
        assert_eq!(Opcode::BlockAlt.format(), InstructionFormat::Imm32Imm32Imm32);

        assert_eq!(InstructionFormat::Unit.length_in_bytes(), 2);
        assert_eq!(InstructionFormat::Imm16.length_in_bytes(), 4);
        assert_eq!(InstructionFormat::Imm16Imm32.length_in_bytes(), 8);
        assert_eq!(InstructionFormat::Imm32Imm32Imm32.length_in_bytes(), 16);

        assert!(!Opcode::AddImmI32.format().requires_alignment());
        assert!(Opcode::Block.format().requires_alignment());

        assert_eq!(InstructionFormat::Unit.i32_parameter_count(), 0);
        assert_eq!(InstructionFormat::Imm16.i32_parameter_count(), 0);
        assert_eq!(InstructionFormat::Imm16Imm32.i32_parameter_count(), 1);
        assert_eq!(InstructionFormat::Imm32Imm32Imm32.i32_parameter_count(), 3);
    }
}
