//! Bytecode reader

use opal_isa::{InstructionFormat, Opcode};
use thiserror::Error;

/// Errors from decoding an instruction stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytecodeError {
    #[error("unknown opcode 0x{value:04x} at offset 0x{offset:04x}")]
    UnknownOpcode { value: u16, offset: usize },

    #[error("instruction at offset 0x{offset:04x} is truncated")]
    TruncatedInstruction { offset: usize },

    #[error("instruction at offset 0x{offset:04x} carries an i32 parameter but is not 4-byte aligned")]
    MisalignedInstruction { offset: usize },
}

/// Decoded parameters of one instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameters {
    None,
    One16(u16),
    One32(u32),
    Mixed(u16, u32),
    Two32(u32, u32),
    Three32(u32, u32, u32),
}

/// One decoded instruction and the offset it was read from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instruction {
    pub offset: usize,
    pub opcode: Opcode,
    pub parameters: Parameters,
}

/// Walks an encoded instruction stream.
///
/// The reader yields one `Instruction` per encoded instruction,
/// including the `nop` padding the writer inserted for alignment.
/// Decoding stops at the first malformed instruction.
pub struct BytecodeReader<'a> {
    code: &'a [u8],
    position: usize,
}

impl<'a> BytecodeReader<'a> {
    pub fn new(code: &'a [u8]) -> Self {
        Self { code, position: 0 }
    }

    /// Decode the whole stream
    pub fn read_all(self) -> Result<Vec<Instruction>, BytecodeError> {
        self.collect()
    }

    fn read_u16(&mut self) -> Option<u16> {
        let bytes = self.code.get(self.position..self.position + 2)?;
        self.position += 2;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Option<u32> {
        let bytes = self.code.get(self.position..self.position + 4)?;
        self.position += 4;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_instruction(&mut self) -> Result<Instruction, BytecodeError> {
        let offset = self.position;
        let truncated = BytecodeError::TruncatedInstruction { offset };

        let value = self.read_u16().ok_or(truncated.clone())?;
        let opcode = Opcode::from_u16(value).ok_or(BytecodeError::UnknownOpcode { value, offset })?;

        let format = opcode.format();
        if format.requires_alignment() && offset % 4 != 0 {
            return Err(BytecodeError::MisalignedInstruction { offset });
        }

        let parameters = match format {
            InstructionFormat::Unit => Parameters::None,
            InstructionFormat::Imm16 => {
                Parameters::One16(self.read_u16().ok_or(truncated.clone())?)
            }
            InstructionFormat::Imm32 => {
                self.read_u16().ok_or(truncated.clone())?; // padding
                Parameters::One32(self.read_u32().ok_or(truncated.clone())?)
            }
            InstructionFormat::Imm16Imm32 => Parameters::Mixed(
                self.read_u16().ok_or(truncated.clone())?,
                self.read_u32().ok_or(truncated.clone())?,
            ),
            InstructionFormat::Imm32Imm32 => {
                self.read_u16().ok_or(truncated.clone())?; // padding
                Parameters::Two32(
                    self.read_u32().ok_or(truncated.clone())?,
                    self.read_u32().ok_or(truncated.clone())?,
                )
            }
            InstructionFormat::Imm32Imm32Imm32 => {
                self.read_u16().ok_or(truncated.clone())?; // padding
                Parameters::Three32(
                    self.read_u32().ok_or(truncated.clone())?,
                    self.read_u32().ok_or(truncated.clone())?,
                    self.read_u32().ok_or(truncated)?,
                )
            }
        };

        Ok(Instruction {
            offset,
            opcode,
            parameters,
        })
    }
}

impl Iterator for BytecodeReader<'_> {
    type Item = Result<Instruction, BytecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.code.len() {
            return None;
        }

        let result = self.read_instruction();
        if result.is_err() {
            // stop after reporting the malformed instruction
            self.position = self.code.len();
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::BytecodeWriter;

    #[test]
    fn test_read_instruction_stream() {
        let mut writer = BytecodeWriter::new();
        writer.write_opcode_i32(Opcode::ImmI32, 0x11);
        writer.write_opcode_i16_i32(Opcode::LocalLoadI64, 1, 2);
        writer.write_opcode(Opcode::AddI32);
        writer.write_opcode(Opcode::End);
        let code = writer.into_bytes();

        let instructions = BytecodeReader::new(&code).read_all().unwrap();
        assert_eq!(
            instructions,
            vec![
                Instruction {
                    offset: 0,
                    opcode: Opcode::ImmI32,
                    parameters: Parameters::One32(0x11),
                },
                Instruction {
                    offset: 8,
                    opcode: Opcode::LocalLoadI64,
                    parameters: Parameters::Mixed(1, 2),
                },
                Instruction {
                    offset: 16,
                    opcode: Opcode::AddI32,
                    parameters: Parameters::None,
                },
                Instruction {
                    offset: 18,
                    opcode: Opcode::End,
                    parameters: Parameters::None,
                },
            ]
        );
    }

    #[test]
    fn test_read_includes_alignment_nop() {
        let mut writer = BytecodeWriter::new();
        writer.write_opcode(Opcode::End);
        writer.write_opcode_i32(Opcode::Call, 7);
        let code = writer.into_bytes();

        let instructions = BytecodeReader::new(&code).read_all().unwrap();
        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[1].opcode, Opcode::Nop);
        assert_eq!(instructions[2].offset, 4);
    }

    #[test]
    fn test_unknown_opcode() {
        let code = [0xff, 0x0f];
        let result = BytecodeReader::new(&code).read_all();
        assert_eq!(
            result,
            Err(BytecodeError::UnknownOpcode {
                value: 0x0fff,
                offset: 0,
            })
        );
    }

    #[test]
    fn test_truncated_instruction() {
        // imm_i32 claims 8 bytes but only 4 are present
        let code = [0x01, 0x01, 0x00, 0x00];
        let result = BytecodeReader::new(&code).read_all();
        assert_eq!(
            result,
            Err(BytecodeError::TruncatedInstruction { offset: 0 })
        );
    }

    #[test]
    fn test_misaligned_instruction() {
        // end (2 bytes) followed by imm_i32 at offset 2
        let mut code = vec![0x00, 0x09];
        code.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x11, 0x00, 0x00, 0x00]);
        let result = BytecodeReader::new(&code).read_all();
        assert_eq!(
            result,
            Err(BytecodeError::MisalignedInstruction { offset: 2 })
        );
    }

    #[test]
    fn test_decoding_stops_after_error() {
        let code = [0xff, 0x0f, 0x00, 0x09];
        let mut reader = BytecodeReader::new(&code);
        assert!(reader.next().is_some_and(|r| r.is_err()));
        assert!(reader.next().is_none());
    }
}
