//! Bytecode writer

use opal_isa::{InstructionFormat, Opcode};

/// Incremental encoder for an instruction stream.
///
/// Parameters are passed as raw bit patterns (u16/u32); the instruction
/// decides how to interpret them. Emit methods return the byte offset
/// of the instruction they wrote, which is the handle later used for
/// patching jump offsets.
#[derive(Debug, Default)]
pub struct BytecodeWriter {
    buffer: Vec<u8>,
}

impl BytecodeWriter {
    /// Create a new empty writer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Current length of the encoded stream in bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the writer and return the encoded stream
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Emit an instruction without parameters
    pub fn write_opcode(&mut self, opcode: Opcode) -> usize {
        debug_assert_eq!(opcode.format(), InstructionFormat::Unit);
        let offset = self.buffer.len();
        self.push_opcode(opcode);
        offset
    }

    /// Emit an instruction with one i16 parameter
    pub fn write_opcode_i16(&mut self, opcode: Opcode, value: u16) -> usize {
        debug_assert_eq!(opcode.format(), InstructionFormat::Imm16);
        let offset = self.buffer.len();
        self.push_opcode(opcode);
        self.push_u16(value);
        offset
    }

    /// Emit an instruction with one i32 parameter
    pub fn write_opcode_i32(&mut self, opcode: Opcode, value: u32) -> usize {
        debug_assert_eq!(opcode.format(), InstructionFormat::Imm32);
        let offset = self.align();
        self.push_opcode(opcode);
        self.push_u16(0); // padding
        self.push_u32(value);
        offset
    }

    /// Emit an instruction with one i16 and one i32 parameter
    pub fn write_opcode_i16_i32(&mut self, opcode: Opcode, value0: u16, value1: u32) -> usize {
        debug_assert_eq!(opcode.format(), InstructionFormat::Imm16Imm32);
        let offset = self.align();
        self.push_opcode(opcode);
        self.push_u16(value0);
        self.push_u32(value1);
        offset
    }

    /// Emit an instruction with two i32 parameters
    pub fn write_opcode_i32_i32(&mut self, opcode: Opcode, value0: u32, value1: u32) -> usize {
        debug_assert_eq!(opcode.format(), InstructionFormat::Imm32Imm32);
        let offset = self.align();
        self.push_opcode(opcode);
        self.push_u16(0); // padding
        self.push_u32(value0);
        self.push_u32(value1);
        offset
    }

    /// Emit an instruction with three i32 parameters
    pub fn write_opcode_i32_i32_i32(
        &mut self,
        opcode: Opcode,
        value0: u32,
        value1: u32,
        value2: u32,
    ) -> usize {
        debug_assert_eq!(opcode.format(), InstructionFormat::Imm32Imm32Imm32);
        let offset = self.align();
        self.push_opcode(opcode);
        self.push_u16(0); // padding
        self.push_u32(value0);
        self.push_u32(value1);
        self.push_u32(value2);
        offset
    }

    /// Emit a 64-bit immediate as two i32 parameters
    pub fn write_imm_i64(&mut self, value: u64) -> usize {
        self.write_opcode_i32_i32(
            Opcode::ImmI64,
            (value & 0xffff_ffff) as u32,
            (value >> 32) as u32,
        )
    }

    /// Emit a 64-bit float immediate as two i32 parameters
    pub fn write_imm_f64(&mut self, value: f64) -> usize {
        let bits = value.to_bits();
        self.write_opcode_i32_i32(
            Opcode::ImmF64,
            (bits & 0xffff_ffff) as u32,
            (bits >> 32) as u32,
        )
    }

    /// Emit a 32-bit float immediate
    pub fn write_imm_f32(&mut self, value: f32) -> usize {
        self.write_opcode_i32(Opcode::ImmF32, value.to_bits())
    }

    /// Overwrite the n-th i32 parameter of the instruction at
    /// `instruction_offset`. The opcode at that offset is decoded and
    /// `param_index` checked against its format; a patch aimed past the
    /// instruction's i32 parameters is ignored, as is an offset that
    /// does not hold an instruction.
    pub fn patch_i32(&mut self, instruction_offset: usize, param_index: usize, value: u32) {
        let opcode = self
            .buffer
            .get(instruction_offset..instruction_offset + 2)
            .map(|bytes| u16::from_le_bytes([bytes[0], bytes[1]]))
            .and_then(Opcode::from_u16);

        let param_count = match opcode {
            Some(opcode) => opcode.format().i32_parameter_count(),
            None => return,
        };
        if param_index >= param_count {
            return;
        }

        // the i32 parameter area always starts 4 bytes into the
        // instruction (after the opcode plus padding or the i16)
        let start = instruction_offset + 4 + param_index * 4;
        if start + 4 <= self.buffer.len() {
            self.buffer[start..start + 4].copy_from_slice(&value.to_le_bytes());
        }
    }

    /// Insert a `nop` when the next instruction would place an i32
    /// parameter off a 4-byte boundary, and return the offset the next
    /// instruction will start at.
    fn align(&mut self) -> usize {
        if self.buffer.len() % 4 != 0 {
            self.push_opcode(Opcode::Nop);
        }
        self.buffer.len()
    }

    fn push_opcode(&mut self, opcode: Opcode) {
        self.push_u16(opcode.as_u16());
    }

    fn push_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    fn push_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_unit_instruction() {
        let mut writer = BytecodeWriter::new();
        writer.write_opcode(Opcode::AddI32);
        writer.write_opcode(Opcode::End);
        assert_eq!(writer.into_bytes(), vec![0x00, 0x04, 0x00, 0x09]);
    }

    #[test]
    fn test_write_parameters_little_endian() {
        let mut writer = BytecodeWriter::new();
        writer.write_opcode_i16(Opcode::AddImmI32, 0x1122);
        assert_eq!(writer.into_bytes(), vec![0x02, 0x04, 0x22, 0x11]);

        let mut writer = BytecodeWriter::new();
        writer.write_opcode_i16_i32(Opcode::LocalLoadI64, 0x1122, 0x3344_5566);
        assert_eq!(
            writer.into_bytes(),
            vec![0x00, 0x02, 0x22, 0x11, 0x66, 0x55, 0x44, 0x33]
        );
    }

    #[test]
    fn test_automatic_nop_padding() {
        // a 16-bit instruction leaves the stream 2-byte aligned, so the
        // following imm_i32 must be preceded by a nop
        let mut writer = BytecodeWriter::new();
        writer.write_opcode(Opcode::End);
        let offset = writer.write_opcode_i32(Opcode::ImmI32, 0x11);
        assert_eq!(offset, 4);
        assert_eq!(
            writer.into_bytes(),
            vec![
                0x00, 0x09, // end
                0x00, 0x01, // nop
                0x01, 0x01, 0x00, 0x00, // imm_i32 + padding
                0x11, 0x00, 0x00, 0x00, // parameter
            ]
        );
    }

    #[test]
    fn test_no_padding_when_aligned() {
        let mut writer = BytecodeWriter::new();
        writer.write_opcode(Opcode::End);
        writer.write_opcode(Opcode::End);
        let offset = writer.write_opcode_i32(Opcode::Call, 7);
        assert_eq!(offset, 4);
        assert_eq!(writer.len(), 12);
    }

    #[test]
    fn test_wide_immediates() {
        let mut writer = BytecodeWriter::new();
        writer.write_imm_i64(0x1122_3344_5566_7788);
        assert_eq!(
            writer.into_bytes(),
            vec![
                0x02, 0x01, 0x00, 0x00, // imm_i64 + padding
                0x88, 0x77, 0x66, 0x55, // low
                0x44, 0x33, 0x22, 0x11, // high
            ]
        );

        let mut writer = BytecodeWriter::new();
        writer.write_imm_f32(1.5);
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[4..8], &1.5_f32.to_bits().to_le_bytes());

        let mut writer = BytecodeWriter::new();
        let offset = writer.write_imm_f64(2.5);
        assert_eq!(offset, 0);
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[4..12], &2.5_f64.to_bits().to_le_bytes());
    }

    #[test]
    fn test_patch_i32() {
        let mut writer = BytecodeWriter::new();
        let block = writer.write_opcode_i32_i32(Opcode::Block, 0, 0);
        writer.write_opcode(Opcode::End);

        writer.patch_i32(block, 0, 3);
        writer.patch_i32(block, 1, 5);

        let bytes = writer.into_bytes();
        assert_eq!(&bytes[4..8], &3u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &5u32.to_le_bytes());
    }

    #[test]
    fn test_patch_out_of_range_is_ignored() {
        let mut writer = BytecodeWriter::new();
        writer.write_opcode(Opcode::End);
        writer.patch_i32(0, 0, 0xdead_beef);
        writer.patch_i32(100, 0, 0xdead_beef);
        assert_eq!(writer.into_bytes(), vec![0x00, 0x09]);
    }

    #[test]
    fn test_patch_unit_instruction_leaves_following_instructions_intact() {
        // "end" carries no i32 parameters; a patch aimed at it must not
        // touch the bytes of the instructions written after it
        let mut writer = BytecodeWriter::new();
        let end = writer.write_opcode(Opcode::End);
        writer.write_opcode(Opcode::AddI32);
        writer.write_opcode(Opcode::AddI64);
        writer.write_opcode(Opcode::SubI32);

        writer.patch_i32(end, 0, 0xdead_beef);

        assert_eq!(
            writer.into_bytes(),
            vec![0x00, 0x09, 0x00, 0x04, 0x09, 0x04, 0x01, 0x04]
        );
    }

    #[test]
    fn test_patch_past_parameter_count_is_ignored() {
        // imm_i32 has a single i32 parameter; index 1 would land on the
        // next instruction
        let mut writer = BytecodeWriter::new();
        let imm = writer.write_opcode_i32(Opcode::ImmI32, 0x11);
        writer.write_opcode_i32(Opcode::Call, 7);

        writer.patch_i32(imm, 1, 0xdead_beef);
        writer.patch_i32(imm, 0, 0x22);

        let bytes = writer.into_bytes();
        assert_eq!(&bytes[4..8], &0x22u32.to_le_bytes());
        assert_eq!(&bytes[8..10], &Opcode::Call.as_u16().to_le_bytes());
        assert_eq!(&bytes[12..16], &7u32.to_le_bytes());
    }
}
