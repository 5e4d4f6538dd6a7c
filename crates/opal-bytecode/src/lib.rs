//! Bytecode encoding and decoding for the Opal VM
//!
//! Instructions are encoded little-endian with variable lengths (16 to
//! 128 bits). The writer inserts `nop` padding automatically so that
//! every instruction carrying an i32 parameter starts on a 4-byte
//! boundary, and supports patching parameters after the fact for
//! forward jumps. The reader walks an encoded stream back into
//! `(offset, opcode, parameters)` triples, and the disassembler renders
//! a stream as assembly text.

pub mod disassemble;
pub mod reader;
pub mod writer;

pub use disassemble::disassemble;
pub use reader::{BytecodeError, BytecodeReader, Instruction, Parameters};
pub use writer::BytecodeWriter;
