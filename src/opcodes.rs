//! The static opcode table of §4.4 / Design Notes: "the large opcode switch
//! (256 cases replicated across step and disassemble) becomes a single
//! static table of `{mnemonic, addressing_mode, base_cycles}` keyed by
//! opcode byte; both execute and disassemble read from the same table.
//! Unknown entries are a distinct variant" — here, simply `None`.
//!
//! Layout and cycle counts are the standard 6502 legal-opcode map; undocumented
//! opcodes (including byte-identical duplicates of legal ones, like `0xEB`
//! aliasing `SBC #imm`) are deliberately left `None` per the "halt on unknown
//! opcode" non-goal.

use crate::addressing::Mode;

/// The 56 documented 6502 mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS, CLC, CLD,
    CLI, CLV, CMP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX, INY, JMP, JSR, LDA,
    LDX, LDY, LSR, NOP, ORA, PHA, PHP, PLA, PLP, ROL, ROR, RTI, RTS, SBC, SEC,
    SED, SEI, STA, STX, STY, TAX, TAY, TSX, TXA, TXS, TYA,
}

impl Mnemonic {
    /// Lowercase mnemonic text, as printed by the disassembler.
    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::ADC => "adc", Mnemonic::AND => "and", Mnemonic::ASL => "asl",
            Mnemonic::BCC => "bcc", Mnemonic::BCS => "bcs", Mnemonic::BEQ => "beq",
            Mnemonic::BIT => "bit", Mnemonic::BMI => "bmi", Mnemonic::BNE => "bne",
            Mnemonic::BPL => "bpl", Mnemonic::BRK => "brk", Mnemonic::BVC => "bvc",
            Mnemonic::BVS => "bvs", Mnemonic::CLC => "clc", Mnemonic::CLD => "cld",
            Mnemonic::CLI => "cli", Mnemonic::CLV => "clv", Mnemonic::CMP => "cmp",
            Mnemonic::CPX => "cpx", Mnemonic::CPY => "cpy", Mnemonic::DEC => "dec",
            Mnemonic::DEX => "dex", Mnemonic::DEY => "dey", Mnemonic::EOR => "eor",
            Mnemonic::INC => "inc", Mnemonic::INX => "inx", Mnemonic::INY => "iny",
            Mnemonic::JMP => "jmp", Mnemonic::JSR => "jsr", Mnemonic::LDA => "lda",
            Mnemonic::LDX => "ldx", Mnemonic::LDY => "ldy", Mnemonic::LSR => "lsr",
            Mnemonic::NOP => "nop", Mnemonic::ORA => "ora", Mnemonic::PHA => "pha",
            Mnemonic::PHP => "php", Mnemonic::PLA => "pla", Mnemonic::PLP => "plp",
            Mnemonic::ROL => "rol", Mnemonic::ROR => "ror", Mnemonic::RTI => "rti",
            Mnemonic::RTS => "rts", Mnemonic::SBC => "sbc", Mnemonic::SEC => "sec",
            Mnemonic::SED => "sed", Mnemonic::SEI => "sei", Mnemonic::STA => "sta",
            Mnemonic::STX => "stx", Mnemonic::STY => "sty", Mnemonic::TAX => "tax",
            Mnemonic::TAY => "tay", Mnemonic::TSX => "tsx", Mnemonic::TXA => "txa",
            Mnemonic::TXS => "txs", Mnemonic::TYA => "tya",
        }
    }

    /// Parse the text form used by the assembler. Case-insensitive per the
    /// grammar in §6 (mnemonics aren't `Ident`, so no casing rule is implied
    /// there, but every assembler in the wild accepts either case).
    pub fn parse(text: &str) -> Option<Mnemonic> {
        Some(match text.to_ascii_uppercase().as_str() {
            "ADC" => Mnemonic::ADC, "AND" => Mnemonic::AND, "ASL" => Mnemonic::ASL,
            "BCC" => Mnemonic::BCC, "BCS" => Mnemonic::BCS, "BEQ" => Mnemonic::BEQ,
            "BIT" => Mnemonic::BIT, "BMI" => Mnemonic::BMI, "BNE" => Mnemonic::BNE,
            "BPL" => Mnemonic::BPL, "BRK" => Mnemonic::BRK, "BVC" => Mnemonic::BVC,
            "BVS" => Mnemonic::BVS, "CLC" => Mnemonic::CLC, "CLD" => Mnemonic::CLD,
            "CLI" => Mnemonic::CLI, "CLV" => Mnemonic::CLV, "CMP" => Mnemonic::CMP,
            "CPX" => Mnemonic::CPX, "CPY" => Mnemonic::CPY, "DEC" => Mnemonic::DEC,
            "DEX" => Mnemonic::DEX, "DEY" => Mnemonic::DEY, "EOR" => Mnemonic::EOR,
            "INC" => Mnemonic::INC, "INX" => Mnemonic::INX, "INY" => Mnemonic::INY,
            "JMP" => Mnemonic::JMP, "JSR" => Mnemonic::JSR, "LDA" => Mnemonic::LDA,
            "LDX" => Mnemonic::LDX, "LDY" => Mnemonic::LDY, "LSR" => Mnemonic::LSR,
            "NOP" => Mnemonic::NOP, "ORA" => Mnemonic::ORA, "PHA" => Mnemonic::PHA,
            "PHP" => Mnemonic::PHP, "PLA" => Mnemonic::PLA, "PLP" => Mnemonic::PLP,
            "ROL" => Mnemonic::ROL, "ROR" => Mnemonic::ROR, "RTI" => Mnemonic::RTI,
            "RTS" => Mnemonic::RTS, "SBC" => Mnemonic::SBC, "SEC" => Mnemonic::SEC,
            "SED" => Mnemonic::SED, "SEI" => Mnemonic::SEI, "STA" => Mnemonic::STA,
            "STX" => Mnemonic::STX, "STY" => Mnemonic::STY, "TAX" => Mnemonic::TAX,
            "TAY" => Mnemonic::TAY, "TSX" => Mnemonic::TSX, "TXA" => Mnemonic::TXA,
            "TXS" => Mnemonic::TXS, "TYA" => Mnemonic::TYA,
            _ => return None,
        })
    }
}

/// One entry of the opcode table: what to run, how to fetch its operand,
/// and how many cycles to charge.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub mnemonic: Mnemonic,
    pub mode: Mode,
    pub cycles: u8,
}

/// Indexed by opcode byte. `None` means illegal/undocumented — the
/// interpreter reports it and halts rather than emulating it.
pub static OPCODE_TABLE: [Option<OpcodeInfo>; 256] = [
    Some(OpcodeInfo { mnemonic: Mnemonic::BRK, mode: Mode::Implied, cycles: 7 }), // 0x00
    Some(OpcodeInfo { mnemonic: Mnemonic::ORA, mode: Mode::IndirectX, cycles: 6 }), // 0x01
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::ORA, mode: Mode::ZeroPage, cycles: 3 }), // 0x05
    Some(OpcodeInfo { mnemonic: Mnemonic::ASL, mode: Mode::ZeroPage, cycles: 5 }), // 0x06
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::PHP, mode: Mode::Implied, cycles: 3 }), // 0x08
    Some(OpcodeInfo { mnemonic: Mnemonic::ORA, mode: Mode::Immediate, cycles: 2 }), // 0x09
    Some(OpcodeInfo { mnemonic: Mnemonic::ASL, mode: Mode::Accumulator, cycles: 2 }), // 0x0A
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::ORA, mode: Mode::Absolute, cycles: 4 }), // 0x0D
    Some(OpcodeInfo { mnemonic: Mnemonic::ASL, mode: Mode::Absolute, cycles: 6 }), // 0x0E
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::BPL, mode: Mode::Relative, cycles: 2 }), // 0x10
    Some(OpcodeInfo { mnemonic: Mnemonic::ORA, mode: Mode::IndirectY, cycles: 5 }), // 0x11
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::ORA, mode: Mode::ZeroPageX, cycles: 4 }), // 0x15
    Some(OpcodeInfo { mnemonic: Mnemonic::ASL, mode: Mode::ZeroPageX, cycles: 6 }), // 0x16
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CLC, mode: Mode::Implied, cycles: 2 }), // 0x18
    Some(OpcodeInfo { mnemonic: Mnemonic::ORA, mode: Mode::AbsoluteY, cycles: 4 }), // 0x19
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::ORA, mode: Mode::AbsoluteX, cycles: 4 }), // 0x1D
    Some(OpcodeInfo { mnemonic: Mnemonic::ASL, mode: Mode::AbsoluteX, cycles: 7 }), // 0x1E
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::JSR, mode: Mode::Absolute, cycles: 6 }), // 0x20
    Some(OpcodeInfo { mnemonic: Mnemonic::AND, mode: Mode::IndirectX, cycles: 6 }), // 0x21
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::BIT, mode: Mode::ZeroPage, cycles: 3 }), // 0x24
    Some(OpcodeInfo { mnemonic: Mnemonic::AND, mode: Mode::ZeroPage, cycles: 3 }), // 0x25
    Some(OpcodeInfo { mnemonic: Mnemonic::ROL, mode: Mode::ZeroPage, cycles: 5 }), // 0x26
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::PLP, mode: Mode::Implied, cycles: 4 }), // 0x28
    Some(OpcodeInfo { mnemonic: Mnemonic::AND, mode: Mode::Immediate, cycles: 2 }), // 0x29
    Some(OpcodeInfo { mnemonic: Mnemonic::ROL, mode: Mode::Accumulator, cycles: 2 }), // 0x2A
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::BIT, mode: Mode::Absolute, cycles: 4 }), // 0x2C
    Some(OpcodeInfo { mnemonic: Mnemonic::AND, mode: Mode::Absolute, cycles: 4 }), // 0x2D
    Some(OpcodeInfo { mnemonic: Mnemonic::ROL, mode: Mode::Absolute, cycles: 6 }), // 0x2E
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::BMI, mode: Mode::Relative, cycles: 2 }), // 0x30
    Some(OpcodeInfo { mnemonic: Mnemonic::AND, mode: Mode::IndirectY, cycles: 5 }), // 0x31
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::AND, mode: Mode::ZeroPageX, cycles: 4 }), // 0x35
    Some(OpcodeInfo { mnemonic: Mnemonic::ROL, mode: Mode::ZeroPageX, cycles: 6 }), // 0x36
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::SEC, mode: Mode::Implied, cycles: 2 }), // 0x38
    Some(OpcodeInfo { mnemonic: Mnemonic::AND, mode: Mode::AbsoluteY, cycles: 4 }), // 0x39
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::AND, mode: Mode::AbsoluteX, cycles: 4 }), // 0x3D
    Some(OpcodeInfo { mnemonic: Mnemonic::ROL, mode: Mode::AbsoluteX, cycles: 7 }), // 0x3E
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::RTI, mode: Mode::Implied, cycles: 6 }), // 0x40
    Some(OpcodeInfo { mnemonic: Mnemonic::EOR, mode: Mode::IndirectX, cycles: 6 }), // 0x41
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::EOR, mode: Mode::ZeroPage, cycles: 3 }), // 0x45
    Some(OpcodeInfo { mnemonic: Mnemonic::LSR, mode: Mode::ZeroPage, cycles: 5 }), // 0x46
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::PHA, mode: Mode::Implied, cycles: 3 }), // 0x48
    Some(OpcodeInfo { mnemonic: Mnemonic::EOR, mode: Mode::Immediate, cycles: 2 }), // 0x49
    Some(OpcodeInfo { mnemonic: Mnemonic::LSR, mode: Mode::Accumulator, cycles: 2 }), // 0x4A
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::JMP, mode: Mode::Absolute, cycles: 3 }), // 0x4C
    Some(OpcodeInfo { mnemonic: Mnemonic::EOR, mode: Mode::Absolute, cycles: 4 }), // 0x4D
    Some(OpcodeInfo { mnemonic: Mnemonic::LSR, mode: Mode::Absolute, cycles: 6 }), // 0x4E
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::BVC, mode: Mode::Relative, cycles: 2 }), // 0x50
    Some(OpcodeInfo { mnemonic: Mnemonic::EOR, mode: Mode::IndirectY, cycles: 5 }), // 0x51
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::EOR, mode: Mode::ZeroPageX, cycles: 4 }), // 0x55
    Some(OpcodeInfo { mnemonic: Mnemonic::LSR, mode: Mode::ZeroPageX, cycles: 6 }), // 0x56
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CLI, mode: Mode::Implied, cycles: 2 }), // 0x58
    Some(OpcodeInfo { mnemonic: Mnemonic::EOR, mode: Mode::AbsoluteY, cycles: 4 }), // 0x59
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::EOR, mode: Mode::AbsoluteX, cycles: 4 }), // 0x5D
    Some(OpcodeInfo { mnemonic: Mnemonic::LSR, mode: Mode::AbsoluteX, cycles: 7 }), // 0x5E
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::RTS, mode: Mode::Implied, cycles: 6 }), // 0x60
    Some(OpcodeInfo { mnemonic: Mnemonic::ADC, mode: Mode::IndirectX, cycles: 6 }), // 0x61
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::ADC, mode: Mode::ZeroPage, cycles: 3 }), // 0x65
    Some(OpcodeInfo { mnemonic: Mnemonic::ROR, mode: Mode::ZeroPage, cycles: 5 }), // 0x66
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::PLA, mode: Mode::Implied, cycles: 4 }), // 0x68
    Some(OpcodeInfo { mnemonic: Mnemonic::ADC, mode: Mode::Immediate, cycles: 2 }), // 0x69
    Some(OpcodeInfo { mnemonic: Mnemonic::ROR, mode: Mode::Accumulator, cycles: 2 }), // 0x6A
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::JMP, mode: Mode::Indirect, cycles: 5 }), // 0x6C
    Some(OpcodeInfo { mnemonic: Mnemonic::ADC, mode: Mode::Absolute, cycles: 4 }), // 0x6D
    Some(OpcodeInfo { mnemonic: Mnemonic::ROR, mode: Mode::Absolute, cycles: 6 }), // 0x6E
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::BVS, mode: Mode::Relative, cycles: 2 }), // 0x70
    Some(OpcodeInfo { mnemonic: Mnemonic::ADC, mode: Mode::IndirectY, cycles: 5 }), // 0x71
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::ADC, mode: Mode::ZeroPageX, cycles: 4 }), // 0x75
    Some(OpcodeInfo { mnemonic: Mnemonic::ROR, mode: Mode::ZeroPageX, cycles: 6 }), // 0x76
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::SEI, mode: Mode::Implied, cycles: 2 }), // 0x78
    Some(OpcodeInfo { mnemonic: Mnemonic::ADC, mode: Mode::AbsoluteY, cycles: 4 }), // 0x79
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::ADC, mode: Mode::AbsoluteX, cycles: 4 }), // 0x7D
    Some(OpcodeInfo { mnemonic: Mnemonic::ROR, mode: Mode::AbsoluteX, cycles: 7 }), // 0x7E
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::STA, mode: Mode::IndirectX, cycles: 6 }), // 0x81
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::STY, mode: Mode::ZeroPage, cycles: 3 }), // 0x84
    Some(OpcodeInfo { mnemonic: Mnemonic::STA, mode: Mode::ZeroPage, cycles: 3 }), // 0x85
    Some(OpcodeInfo { mnemonic: Mnemonic::STX, mode: Mode::ZeroPage, cycles: 3 }), // 0x86
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::DEY, mode: Mode::Implied, cycles: 2 }), // 0x88
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::TXA, mode: Mode::Implied, cycles: 2 }), // 0x8A
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::STY, mode: Mode::Absolute, cycles: 4 }), // 0x8C
    Some(OpcodeInfo { mnemonic: Mnemonic::STA, mode: Mode::Absolute, cycles: 4 }), // 0x8D
    Some(OpcodeInfo { mnemonic: Mnemonic::STX, mode: Mode::Absolute, cycles: 4 }), // 0x8E
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::BCC, mode: Mode::Relative, cycles: 2 }), // 0x90
    Some(OpcodeInfo { mnemonic: Mnemonic::STA, mode: Mode::IndirectY, cycles: 6 }), // 0x91
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::STY, mode: Mode::ZeroPageX, cycles: 4 }), // 0x94
    Some(OpcodeInfo { mnemonic: Mnemonic::STA, mode: Mode::ZeroPageX, cycles: 4 }), // 0x95
    Some(OpcodeInfo { mnemonic: Mnemonic::STX, mode: Mode::ZeroPageY, cycles: 4 }), // 0x96
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::TYA, mode: Mode::Implied, cycles: 2 }), // 0x98
    Some(OpcodeInfo { mnemonic: Mnemonic::STA, mode: Mode::AbsoluteY, cycles: 5 }), // 0x99
    Some(OpcodeInfo { mnemonic: Mnemonic::TXS, mode: Mode::Implied, cycles: 2 }), // 0x9A
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::STA, mode: Mode::AbsoluteX, cycles: 5 }), // 0x9D
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::LDY, mode: Mode::Immediate, cycles: 2 }), // 0xA0
    Some(OpcodeInfo { mnemonic: Mnemonic::LDA, mode: Mode::IndirectX, cycles: 6 }), // 0xA1
    Some(OpcodeInfo { mnemonic: Mnemonic::LDX, mode: Mode::Immediate, cycles: 2 }), // 0xA2
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::LDY, mode: Mode::ZeroPage, cycles: 3 }), // 0xA4
    Some(OpcodeInfo { mnemonic: Mnemonic::LDA, mode: Mode::ZeroPage, cycles: 3 }), // 0xA5
    Some(OpcodeInfo { mnemonic: Mnemonic::LDX, mode: Mode::ZeroPage, cycles: 3 }), // 0xA6
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::TAY, mode: Mode::Implied, cycles: 2 }), // 0xA8
    Some(OpcodeInfo { mnemonic: Mnemonic::LDA, mode: Mode::Immediate, cycles: 2 }), // 0xA9
    Some(OpcodeInfo { mnemonic: Mnemonic::TAX, mode: Mode::Implied, cycles: 2 }), // 0xAA
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::LDY, mode: Mode::Absolute, cycles: 4 }), // 0xAC
    Some(OpcodeInfo { mnemonic: Mnemonic::LDA, mode: Mode::Absolute, cycles: 4 }), // 0xAD
    Some(OpcodeInfo { mnemonic: Mnemonic::LDX, mode: Mode::Absolute, cycles: 4 }), // 0xAE
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::BCS, mode: Mode::Relative, cycles: 2 }), // 0xB0
    Some(OpcodeInfo { mnemonic: Mnemonic::LDA, mode: Mode::IndirectY, cycles: 5 }), // 0xB1
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::LDY, mode: Mode::ZeroPageX, cycles: 4 }), // 0xB4
    Some(OpcodeInfo { mnemonic: Mnemonic::LDA, mode: Mode::ZeroPageX, cycles: 4 }), // 0xB5
    Some(OpcodeInfo { mnemonic: Mnemonic::LDX, mode: Mode::ZeroPageY, cycles: 4 }), // 0xB6
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CLV, mode: Mode::Implied, cycles: 2 }), // 0xB8
    Some(OpcodeInfo { mnemonic: Mnemonic::LDA, mode: Mode::AbsoluteY, cycles: 4 }), // 0xB9
    Some(OpcodeInfo { mnemonic: Mnemonic::TSX, mode: Mode::Implied, cycles: 2 }), // 0xBA
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::LDY, mode: Mode::AbsoluteX, cycles: 4 }), // 0xBC
    Some(OpcodeInfo { mnemonic: Mnemonic::LDA, mode: Mode::AbsoluteX, cycles: 4 }), // 0xBD
    Some(OpcodeInfo { mnemonic: Mnemonic::LDX, mode: Mode::AbsoluteY, cycles: 4 }), // 0xBE
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CPY, mode: Mode::Immediate, cycles: 2 }), // 0xC0
    Some(OpcodeInfo { mnemonic: Mnemonic::CMP, mode: Mode::IndirectX, cycles: 6 }), // 0xC1
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CPY, mode: Mode::ZeroPage, cycles: 3 }), // 0xC4
    Some(OpcodeInfo { mnemonic: Mnemonic::CMP, mode: Mode::ZeroPage, cycles: 3 }), // 0xC5
    Some(OpcodeInfo { mnemonic: Mnemonic::DEC, mode: Mode::ZeroPage, cycles: 5 }), // 0xC6
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::INY, mode: Mode::Implied, cycles: 2 }), // 0xC8
    Some(OpcodeInfo { mnemonic: Mnemonic::CMP, mode: Mode::Immediate, cycles: 2 }), // 0xC9
    Some(OpcodeInfo { mnemonic: Mnemonic::DEX, mode: Mode::Implied, cycles: 2 }), // 0xCA
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CPY, mode: Mode::Absolute, cycles: 4 }), // 0xCC
    Some(OpcodeInfo { mnemonic: Mnemonic::CMP, mode: Mode::Absolute, cycles: 4 }), // 0xCD
    Some(OpcodeInfo { mnemonic: Mnemonic::DEC, mode: Mode::Absolute, cycles: 6 }), // 0xCE
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::BNE, mode: Mode::Relative, cycles: 2 }), // 0xD0
    Some(OpcodeInfo { mnemonic: Mnemonic::CMP, mode: Mode::IndirectY, cycles: 5 }), // 0xD1
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CMP, mode: Mode::ZeroPageX, cycles: 4 }), // 0xD5
    Some(OpcodeInfo { mnemonic: Mnemonic::DEC, mode: Mode::ZeroPageX, cycles: 6 }), // 0xD6
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CLD, mode: Mode::Implied, cycles: 2 }), // 0xD8
    Some(OpcodeInfo { mnemonic: Mnemonic::CMP, mode: Mode::AbsoluteY, cycles: 4 }), // 0xD9
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CMP, mode: Mode::AbsoluteX, cycles: 4 }), // 0xDD
    Some(OpcodeInfo { mnemonic: Mnemonic::DEC, mode: Mode::AbsoluteX, cycles: 7 }), // 0xDE
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CPX, mode: Mode::Immediate, cycles: 2 }), // 0xE0
    Some(OpcodeInfo { mnemonic: Mnemonic::SBC, mode: Mode::IndirectX, cycles: 6 }), // 0xE1
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CPX, mode: Mode::ZeroPage, cycles: 3 }), // 0xE4
    Some(OpcodeInfo { mnemonic: Mnemonic::SBC, mode: Mode::ZeroPage, cycles: 3 }), // 0xE5
    Some(OpcodeInfo { mnemonic: Mnemonic::INC, mode: Mode::ZeroPage, cycles: 5 }), // 0xE6
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::INX, mode: Mode::Implied, cycles: 2 }), // 0xE8
    Some(OpcodeInfo { mnemonic: Mnemonic::SBC, mode: Mode::Immediate, cycles: 2 }), // 0xE9
    Some(OpcodeInfo { mnemonic: Mnemonic::NOP, mode: Mode::Implied, cycles: 2 }), // 0xEA
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::CPX, mode: Mode::Absolute, cycles: 4 }), // 0xEC
    Some(OpcodeInfo { mnemonic: Mnemonic::SBC, mode: Mode::Absolute, cycles: 4 }), // 0xED
    Some(OpcodeInfo { mnemonic: Mnemonic::INC, mode: Mode::Absolute, cycles: 6 }), // 0xEE
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::BEQ, mode: Mode::Relative, cycles: 2 }), // 0xF0
    Some(OpcodeInfo { mnemonic: Mnemonic::SBC, mode: Mode::IndirectY, cycles: 5 }), // 0xF1
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::SBC, mode: Mode::ZeroPageX, cycles: 4 }), // 0xF5
    Some(OpcodeInfo { mnemonic: Mnemonic::INC, mode: Mode::ZeroPageX, cycles: 6 }), // 0xF6
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::SED, mode: Mode::Implied, cycles: 2 }), // 0xF8
    Some(OpcodeInfo { mnemonic: Mnemonic::SBC, mode: Mode::AbsoluteY, cycles: 4 }), // 0xF9
    None,
    None,
    None,
    Some(OpcodeInfo { mnemonic: Mnemonic::SBC, mode: Mode::AbsoluteX, cycles: 4 }), // 0xFD
    Some(OpcodeInfo { mnemonic: Mnemonic::INC, mode: Mode::AbsoluteX, cycles: 7 }), // 0xFE
    None,];

/// Reverse lookup used by the assembler: the opcode byte for a given
/// mnemonic assembled in a given addressing mode, if the combination
/// exists in the legal instruction set.
pub fn find_opcode(mnemonic: Mnemonic, mode: Mode) -> Option<u8> {
    for (byte, entry) in OPCODE_TABLE.iter().enumerate() {
        if let Some(info) = entry {
            if info.mnemonic == mnemonic && info.mode == mode {
                return Some(byte as u8);
            }
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn table_has_exactly_151_legal_entries() {
        let count = OPCODE_TABLE.iter().filter(|e| e.is_some()).count();
        assert_eq!(count, 151);
    }

    #[test]
    fn brk_is_opcode_zero() {
        let info = OPCODE_TABLE[0x00].unwrap();
        assert_eq!(info.mnemonic, Mnemonic::BRK);
        assert_eq!(info.mode, Mode::Implied);
        assert_eq!(info.cycles, 7);
    }

    #[test]
    fn undocumented_sbc_duplicate_is_not_in_the_table() {
        assert!(OPCODE_TABLE[0xEB].is_none());
    }

    #[test]
    fn find_opcode_round_trips_with_the_table() {
        let byte = find_opcode(Mnemonic::LDA, Mode::Immediate).unwrap();
        assert_eq!(byte, 0xA9);
        assert!(find_opcode(Mnemonic::LDX, Mode::ZeroPageX).is_none());
        assert!(find_opcode(Mnemonic::LDX, Mode::ZeroPageY).is_some());
    }

    #[test]
    fn mnemonic_parse_is_case_insensitive() {
        assert_eq!(Mnemonic::parse("lda"), Some(Mnemonic::LDA));
        assert_eq!(Mnemonic::parse("LDA"), Some(Mnemonic::LDA));
        assert_eq!(Mnemonic::parse("bogus"), None);
    }
}
