//! C5's other half: a one-shot address-to-mnemonic decoder, used both for
//! user-facing output and by `Cpu::next`'s step-over primitive (§4.5).
//!
//! Reads straight from the same `OPCODE_TABLE` the interpreter dispatches
//! through (Design Notes: "both execute and disassemble read from the same
//! table"), so a disassembled mnemonic can never drift from what `step`
//! would actually do with that byte.

use crate::addressing::Mode;
use crate::memory::MemoryBus;
use crate::opcodes::OPCODE_TABLE;

/// Disassembles the instruction at `addr`. Returns the formatted line and
/// the number of bytes consumed (1 for an illegal opcode, 1-3 for a legal
/// one). Reading past the end of memory wraps the address space, per §6 —
/// there is no out-of-range access, so the wrapped read is simply whatever
/// byte lives at the wrapped address.
pub fn disassemble(memory: &dyn MemoryBus, addr: u16) -> (String, u16) {
    let opcode = memory.get_byte(addr);
    let info = match OPCODE_TABLE[opcode as usize] {
        Some(info) => info,
        None => return (format!("{:02X} (???)", opcode), 1),
    };

    let operand_addr = addr.wrapping_add(1);
    let text = match info.mode {
        Mode::Implied => info.mnemonic.as_str().to_string(),
        Mode::Accumulator => format!("{} a", info.mnemonic.as_str()),
        Mode::Immediate => format!("{} #${:02X}", info.mnemonic.as_str(), memory.get_byte(operand_addr)),
        Mode::ZeroPage => format!("{} ${:02X}", info.mnemonic.as_str(), memory.get_byte(operand_addr)),
        Mode::ZeroPageX => format!("{} ${:02X},x", info.mnemonic.as_str(), memory.get_byte(operand_addr)),
        Mode::ZeroPageY => format!("{} ${:02X},y", info.mnemonic.as_str(), memory.get_byte(operand_addr)),
        Mode::Absolute => format!("{} ${:04X}", info.mnemonic.as_str(), memory.get_word(operand_addr)),
        Mode::AbsoluteX => format!("{} ${:04X},x", info.mnemonic.as_str(), memory.get_word(operand_addr)),
        Mode::AbsoluteY => format!("{} ${:04X},y", info.mnemonic.as_str(), memory.get_word(operand_addr)),
        Mode::Indirect => format!("{} (${:04X})", info.mnemonic.as_str(), memory.get_word(operand_addr)),
        Mode::IndirectX => format!("{} (${:02X},x)", info.mnemonic.as_str(), memory.get_byte(operand_addr)),
        Mode::IndirectY => format!("{} (${:02X}),y", info.mnemonic.as_str(), memory.get_byte(operand_addr)),
        Mode::Relative => {
            let offset = memory.get_byte(operand_addr) as i8;
            let next_instruction = addr.wrapping_add(2);
            let target = next_instruction.wrapping_add(offset as i16 as u16);
            let sign = if offset < 0 { "-" } else { "" };
            format!(
                "{} ${}{:02X} ; (${:04X})",
                info.mnemonic.as_str(),
                sign,
                offset.unsigned_abs(),
                target
            )
        }
    };

    (text, 1 + info.mode.operand_len())
}

/// The length in bytes of the instruction at `addr`, without formatting it.
/// Used by `Cpu::next` to place its temporary step-over breakpoint.
pub fn instruction_len(memory: &dyn MemoryBus, addr: u16) -> u16 {
    let opcode = memory.get_byte(addr);
    match OPCODE_TABLE[opcode as usize] {
        Some(info) => 1 + info.mode.operand_len(),
        None => 1,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::memory::FlatMemory;

    #[test]
    fn disassembles_immediate_mode() {
        let mut mem = FlatMemory::new();
        mem.memset(0x0600, &[0xA9, 0x66]);
        let (text, len) = disassemble(&mem, 0x0600);
        assert_eq!(text, "lda #$66");
        assert_eq!(len, 2);
    }

    #[test]
    fn disassembles_absolute_indexed() {
        let mut mem = FlatMemory::new();
        mem.memset(0x0600, &[0xBD, 0x34, 0x12]);
        let (text, len) = disassemble(&mem, 0x0600);
        assert_eq!(text, "lda $1234,x");
        assert_eq!(len, 3);
    }

    #[test]
    fn disassembles_accumulator_mode() {
        let mut mem = FlatMemory::new();
        mem.memset(0x0600, &[0x0A]);
        let (text, len) = disassemble(&mem, 0x0600);
        assert_eq!(text, "asl a");
        assert_eq!(len, 1);
    }

    #[test]
    fn disassembles_relative_branch_with_absolute_target() {
        let mut mem = FlatMemory::new();
        mem.memset(0x00FE, &[0xF0, 0x04]);
        let (text, len) = disassemble(&mem, 0x00FE);
        assert_eq!(text, "beq $04 ; ($0104)");
        assert_eq!(len, 2);
    }

    #[test]
    fn disassembles_negative_relative_offset() {
        let mut mem = FlatMemory::new();
        // BPL -3, at $0600: target = $0600 + 2 - 3 = $05FF
        mem.memset(0x0600, &[0x10, 0xFD]);
        let (text, _) = disassemble(&mem, 0x0600);
        assert_eq!(text, "bpl $-03 ; ($05FF)");
    }

    #[test]
    fn illegal_opcode_disassembles_as_a_placeholder_and_consumes_one_byte() {
        let mut mem = FlatMemory::new();
        mem.memset(0x0600, &[0x02]);
        let (text, len) = disassemble(&mem, 0x0600);
        assert_eq!(text, "02 (???)");
        assert_eq!(len, 1);
    }

    #[test]
    fn instruction_len_matches_disassemble_length() {
        let mut mem = FlatMemory::new();
        mem.memset(0x0600, &[0x20, 0x00, 0x02]); // JSR abs
        assert_eq!(instruction_len(&mem, 0x0600), 3);
    }

    #[test]
    fn reading_past_the_top_of_memory_wraps_the_address_space() {
        let mut mem = FlatMemory::new();
        mem.set_byte(0xFFFF, 0xA9); // LDA #imm straddling the wrap
        mem.set_byte(0x0000, 0x42);
        let (text, len) = disassemble(&mem, 0xFFFF);
        assert_eq!(text, "lda #$42");
        assert_eq!(len, 2);
    }
}
