//! Writer/reader agreement on arbitrary instruction streams

use opal_bytecode::{BytecodeReader, BytecodeWriter, Parameters};
use opal_isa::{InstructionFormat, Opcode};
use proptest::prelude::*;

// Explicit nops are excluded so the decoded stream can be compared
// against the emitted one after dropping the writer's padding nops.
fn arbitrary_instruction() -> impl Strategy<Value = (Opcode, u16, u32, u32, u32)> {
    let opcodes: Vec<Opcode> = Opcode::ALL
        .iter()
        .copied()
        .filter(|op| *op != Opcode::Nop)
        .collect();

    (
        prop::sample::select(opcodes),
        any::<u16>(),
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
    )
}

proptest! {
    #[test]
    fn writer_reader_roundtrip(
        instructions in prop::collection::vec(arbitrary_instruction(), 1..64)
    ) {
        let mut writer = BytecodeWriter::new();
        let mut expected = Vec::new();

        for (opcode, p16, p0, p1, p2) in instructions {
            let parameters = match opcode.format() {
                InstructionFormat::Unit => {
                    writer.write_opcode(opcode);
                    Parameters::None
                }
                InstructionFormat::Imm16 => {
                    writer.write_opcode_i16(opcode, p16);
                    Parameters::One16(p16)
                }
                InstructionFormat::Imm32 => {
                    writer.write_opcode_i32(opcode, p0);
                    Parameters::One32(p0)
                }
                InstructionFormat::Imm16Imm32 => {
                    writer.write_opcode_i16_i32(opcode, p16, p0);
                    Parameters::Mixed(p16, p0)
                }
                InstructionFormat::Imm32Imm32 => {
                    writer.write_opcode_i32_i32(opcode, p0, p1);
                    Parameters::Two32(p0, p1)
                }
                InstructionFormat::Imm32Imm32Imm32 => {
                    writer.write_opcode_i32_i32_i32(opcode, p0, p1, p2);
                    Parameters::Three32(p0, p1, p2)
                }
            };
            expected.push((opcode, parameters));
        }

        let code = writer.into_bytes();
        let decoded = BytecodeReader::new(&code).read_all().unwrap();

        let actual: Vec<_> = decoded
            .into_iter()
            .filter(|instruction| instruction.opcode != Opcode::Nop)
            .map(|instruction| (instruction.opcode, instruction.parameters))
            .collect();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn instructions_with_i32_parameters_are_aligned(
        instructions in prop::collection::vec(arbitrary_instruction(), 1..64)
    ) {
        let mut writer = BytecodeWriter::new();
        for (opcode, p16, p0, p1, p2) in instructions {
            match opcode.format() {
                InstructionFormat::Unit => writer.write_opcode(opcode),
                InstructionFormat::Imm16 => writer.write_opcode_i16(opcode, p16),
                InstructionFormat::Imm32 => writer.write_opcode_i32(opcode, p0),
                InstructionFormat::Imm16Imm32 => writer.write_opcode_i16_i32(opcode, p16, p0),
                InstructionFormat::Imm32Imm32 => writer.write_opcode_i32_i32(opcode, p0, p1),
                InstructionFormat::Imm32Imm32Imm32 => {
                    writer.write_opcode_i32_i32_i32(opcode, p0, p1, p2)
                }
            };
        }

        let code = writer.into_bytes();
        for instruction in BytecodeReader::new(&code).read_all().unwrap() {
            if instruction.opcode.format().requires_alignment() {
                prop_assert_eq!(instruction.offset % 4, 0);
            }
        }
    }
}
