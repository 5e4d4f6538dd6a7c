//! Bytecode disassembly

use std::fmt::Write;

use crate::reader::{BytecodeError, BytecodeReader, Parameters};

/// Render an encoded instruction stream as assembly text, one
/// instruction per line with its byte offset.
pub fn disassemble(code: &[u8]) -> Result<String, BytecodeError> {
    let mut text = String::new();

    for item in BytecodeReader::new(code) {
        let instruction = item?;
        let mut line = format!("0x{:04x}  {}", instruction.offset, instruction.opcode);

        match instruction.parameters {
            Parameters::None => {}
            Parameters::One16(v) => {
                let _ = write!(line, " {}", v);
            }
            Parameters::One32(v) => {
                let _ = write!(line, " {}", v);
            }
            Parameters::Mixed(v0, v1) => {
                let _ = write!(line, " {} {}", v0, v1);
            }
            Parameters::Two32(v0, v1) => {
                let _ = write!(line, " {} {}", v0, v1);
            }
            Parameters::Three32(v0, v1, v2) => {
                let _ = write!(line, " {} {} {}", v0, v1, v2);
            }
        }

        text.push_str(&line);
        text.push('\n');
    }

    Ok(text)
}
