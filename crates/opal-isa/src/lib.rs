//! Opal VM Instruction Set Architecture
//!
//! This crate defines the instruction set of the Opal virtual machine: the
//! opcode inventory and its 16-bit encoding, the instruction parameter
//! formats, the primitive data types visible to programs, and the version
//! and dependency model shared by the compiler, linker and runtime.
//!
//! # Architecture
//!
//! The Opal VM is a stack-based machine with variable-length instructions
//! (16 to 128 bits). It addresses functions, data and local variables by
//! index rather than by raw pointer, so every access can be bounds- and
//! type-checked by the runtime.
//!
//! # Modules
//!
//! - `opcode`: the complete instruction set (251 opcodes) and per-opcode
//!   parameter formats
//! - `data_type`: operand and memory data types, FFI value wrappers
//! - `version`: effective versions, compatibility rules, runtime edition
//! - `dependency`: module and external library dependency descriptors

pub mod data_type;
pub mod dependency;
pub mod opcode;
pub mod version;

// Re-export main types
pub use data_type::{
    DataSectionType, ForeignValue, MemoryDataType, Operand, OperandDataType,
    OPERAND_SIZE_IN_BYTES,
};
pub use dependency::{
    DependencyCondition, DependencyLocal, DependencyRemote, DependencyShare,
    ExternalLibraryDependency, ExternalLibraryDependencyType, ModuleDependency,
    ModuleDependencyType, ParameterValue, SELF_REFERENCE_MODULE_NAME,
};
pub use opcode::{InstructionFormat, Opcode, MAX_OPCODE_NUMBER};
pub use version::{
    EffectiveVersion, VersionCompatibility, IMAGE_FORMAT_MAJOR_VERSION,
    IMAGE_FORMAT_MINOR_VERSION, RUNTIME_EDITION, RUNTIME_EDITION_STRING,
};
