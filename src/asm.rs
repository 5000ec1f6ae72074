//! C5's assembler half: a two-pass, label-resolving text-to-bytes translator
//! for 6502 mnemonics, per §4.5/§6.
//!
//! Byte/word emission during a pass is done through `Emitter`, a small value
//! holding a mutable write cursor; operand decoding is a small
//! recursive-descent parser over the operand substring (`decode_operand`).

use std::collections::HashMap;

use crate::addressing::Mode;
use crate::diagnostics;
use crate::memory::MemoryBus;
use crate::opcodes::{find_opcode, Mnemonic};

/// Whether a resolved value fits in one byte (selects a zero-page-family
/// addressing mode) or needs two (selects the absolute-family one), per
/// §4.5 "Width inference". Width is derived from the literal's numeric
/// magnitude rather than its digit count, so a padded decimal like `250`
/// still selects the zero-page form — see DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    One,
    Two,
}

fn width_of(value: u16) -> Width {
    if value <= 0xFF {
        Width::One
    } else {
        Width::Two
    }
}

/// An assembler symbol: either a label (defined by a trailing-colon line,
/// always treated as a 2-byte-wide address so a forward reference never
/// flips an instruction's addressing mode between the first and second
/// pass — see DESIGN.md §9 Open Question 5) or a `DEFINE`d constant
/// (keeps the literal's own width).
#[derive(Debug, Clone, Copy)]
enum Symbol {
    Label(u16),
    Define(u16, Width),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Index {
    None,
    X,
    Y,
}

/// The decoded shape of an operand, before it is matched against the
/// opcode table for a specific mnemonic.
#[derive(Debug, Clone, Copy)]
enum Decoded {
    None,
    Accumulator,
    Immediate(u16),
    Memory { value: u16, width: Width, index: Index, resolved: bool },
    Indirect(u16),
    IndirectX(u8),
    IndirectY(u8),
}

/// The five relocatable magic addresses of §4.4's host-mediated print
/// directives, plus the global enable flag — the assembler's view of the
/// same configuration `Cpu` carries (§9 Design Notes: "Global enable output
/// procs becomes a single configuration flag... the magic addresses are
/// also fields").
#[derive(Debug, Clone, Copy)]
pub struct PrintProcAddrs {
    pub enabled: bool,
    pub out: u16,
    pub outn: u16,
    pub outmem: u16,
    pub outmemn: u16,
    pub outs: u16,
}

impl PrintProcAddrs {
    pub fn disabled() -> Self {
        PrintProcAddrs {
            enabled: false,
            out: 0,
            outn: 0,
            outmem: 0,
            outmemn: 0,
            outs: 0,
        }
    }
}

/// Holds the mutable write cursor through `assemble_op`, per the Design
/// Notes' `Emitter` guidance.
struct Emitter<'a> {
    memory: &'a mut dyn MemoryBus,
    cursor: u16,
}

impl<'a> Emitter<'a> {
    fn add_byte(&mut self, value: u8) {
        self.memory.set_byte(self.cursor, value);
        self.cursor = self.cursor.wrapping_add(1);
    }

    fn add_word(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.add_byte(lo);
        self.add_byte(hi);
    }
}

/// Assembles `text` into `memory` starting at `start`, with host print
/// directives disabled. Returns the number of bytes emitted.
pub fn assemble(memory: &mut dyn MemoryBus, start: u16, text: &str) -> Result<usize, String> {
    assemble_with_print_procs(memory, start, text, &PrintProcAddrs::disabled())
}

/// Assembles `text` into `memory` starting at `start`, per the two-pass
/// algorithm of §4.5:
///   1. Run a full emit pass, accepting unresolved labels (counted as bad).
///   2. If any label was unresolved, reset the cursor to `start` and run a
///      second pass; the symbol table is now fully populated.
pub fn assemble_with_print_procs(
    memory: &mut dyn MemoryBus,
    start: u16,
    text: &str,
    print_procs: &PrintProcAddrs,
) -> Result<usize, String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut symbols: HashMap<String, Symbol> = HashMap::new();

    let (len, bad_labels) = assemble_pass(memory, start, &lines, &mut symbols, print_procs)?;
    if bad_labels == 0 {
        return Ok(len);
    }
    let (len, _) = assemble_pass(memory, start, &lines, &mut symbols, print_procs)?;
    Ok(len)
}

fn assemble_pass(
    memory: &mut dyn MemoryBus,
    start: u16,
    lines: &[&str],
    symbols: &mut HashMap<String, Symbol>,
    print_procs: &PrintProcAddrs,
) -> Result<(usize, usize), String> {
    let mut emitter = Emitter { memory, cursor: start };
    let mut bad_labels = 0usize;

    for (line_index, raw_line) in lines.iter().enumerate() {
        let stripped = strip_comment(raw_line).trim();
        if stripped.is_empty() {
            continue;
        }

        let rest = if let Some(colon) = stripped.find(':') {
            let label = stripped[..colon].trim();
            if !is_valid_ident(label) {
                let message = format!("invalid label '{}'", label);
                diagnostics::assemble_error(line_index + 1, raw_line, &message);
                return Err(message);
            }
            symbols.insert(label.to_string(), Symbol::Label(emitter.cursor));
            stripped[colon + 1..].trim()
        } else {
            stripped
        };

        if rest.is_empty() {
            continue;
        }

        let (word, arg) = split_first_word(rest);
        let result = assemble_line(word, arg, symbols, print_procs, &mut emitter, &mut bad_labels);

        if let Err(message) = result {
            diagnostics::assemble_error(line_index + 1, raw_line, &message);
            return Err(message);
        }
    }

    Ok((emitter.cursor.wrapping_sub(start) as usize, bad_labels))
}

fn assemble_line(
    word: &str,
    arg: &str,
    symbols: &mut HashMap<String, Symbol>,
    print_procs: &PrintProcAddrs,
    emitter: &mut Emitter,
    bad_labels: &mut usize,
) -> Result<(), String> {
    match word.to_ascii_uppercase().as_str() {
        "ORG" => {
            let (value, _, _) = resolve_value(arg, symbols, bad_labels)?;
            emitter.cursor = value;
            Ok(())
        }
        "DB" => {
            for item in split_top_level_commas(arg) {
                if item.len() >= 2 && item.starts_with('"') && item.ends_with('"') {
                    for ch in item[1..item.len() - 1].chars() {
                        emitter.add_byte(ch as u8);
                    }
                } else {
                    let (value, width, _) = resolve_value(item, symbols, bad_labels)?;
                    match width {
                        Width::One => emitter.add_byte(value as u8),
                        Width::Two => emitter.add_word(value),
                    }
                }
            }
            Ok(())
        }
        "DEFINE" => {
            let (name, value_text) = split_first_word(arg);
            if name.is_empty() || value_text.is_empty() {
                return Err("DEFINE requires a name and a value".to_string());
            }
            let (value, width, _) = resolve_value(value_text, symbols, bad_labels)?;
            symbols.insert(name.to_string(), Symbol::Define(value, width));
            Ok(())
        }
        "OUT" | "OUTN" | "OUTMEM" | "OUTMEMN" | "OUTS" => {
            assemble_print_directive(word, arg, symbols, print_procs, emitter, bad_labels)
        }
        other => {
            let mnemonic = Mnemonic::parse(other).ok_or_else(|| format!("unknown mnemonic '{}'", word))?;
            let decoded = decode_operand(arg, symbols, bad_labels)?;
            assemble_instruction(mnemonic, decoded, emitter)
        }
    }
}

/// `OUT`/`OUTN`/`OUTMEM`/`OUTMEMN`/`OUTS` — emits a `JSR` to the
/// corresponding magic address. `OUTMEM`/`OUTMEMN`/`OUTS` additionally take
/// an inline absolute-address argument, per §4.4's runtime semantics (the
/// EBNF in §6 only lists `OUT`/`OUTN`/`OUTS`; `OUTMEM`/`OUTMEMN` are
/// supplemented here for parity with the five-variant print-directive set
/// the interpreter actually implements — see DESIGN.md).
fn assemble_print_directive(
    word: &str,
    arg: &str,
    symbols: &mut HashMap<String, Symbol>,
    print_procs: &PrintProcAddrs,
    emitter: &mut Emitter,
    bad_labels: &mut usize,
) -> Result<(), String> {
    if !print_procs.enabled {
        return Err(format!(
            "print directive '{}' used but print procedures are disabled",
            word
        ));
    }
    let upper = word.to_ascii_uppercase();
    let target = match upper.as_str() {
        "OUT" => print_procs.out,
        "OUTN" => print_procs.outn,
        "OUTMEM" => print_procs.outmem,
        "OUTMEMN" => print_procs.outmemn,
        "OUTS" => print_procs.outs,
        _ => unreachable!(),
    };
    let jsr = find_opcode(Mnemonic::JSR, Mode::Absolute).expect("JSR absolute is always legal");
    emitter.add_byte(jsr);
    emitter.add_word(target);
    if matches!(upper.as_str(), "OUTMEM" | "OUTMEMN" | "OUTS") {
        let (value, _, _) = resolve_value(arg, symbols, bad_labels)?;
        emitter.add_word(value);
    }
    Ok(())
}

fn is_branch(mnemonic: Mnemonic) -> bool {
    matches!(
        mnemonic,
        Mnemonic::BCC
            | Mnemonic::BCS
            | Mnemonic::BEQ
            | Mnemonic::BNE
            | Mnemonic::BMI
            | Mnemonic::BPL
            | Mnemonic::BVC
            | Mnemonic::BVS
    )
}

/// Picks the first mode in `candidates` that this mnemonic actually
/// supports. This is how "width ≤ 1 byte selects zero page, otherwise the
/// selection falls through to absolute" (§4.5) is implemented: callers pass
/// `[ZeroPage, Absolute]` and the zero-page-only or absolute-only
/// instructions naturally narrow to whichever one exists.
fn find_candidate(mnemonic: Mnemonic, candidates: &[Mode]) -> Option<(u8, Mode)> {
    candidates.iter().find_map(|&mode| find_opcode(mnemonic, mode).map(|op| (op, mode)))
}

fn assemble_instruction(mnemonic: Mnemonic, decoded: Decoded, emitter: &mut Emitter) -> Result<(), String> {
    if is_branch(mnemonic) {
        return assemble_branch(mnemonic, decoded, emitter);
    }

    let (opcode, mode) = match decoded {
        Decoded::None => find_candidate(mnemonic, &[Mode::Implied, Mode::Accumulator])
            .ok_or_else(|| format!("{} requires an operand", mnemonic.as_str()))?,
        Decoded::Accumulator => find_candidate(mnemonic, &[Mode::Accumulator])
            .ok_or_else(|| format!("{} has no accumulator form", mnemonic.as_str()))?,
        Decoded::Immediate(_) => find_candidate(mnemonic, &[Mode::Immediate])
            .ok_or_else(|| format!("{} has no immediate form", mnemonic.as_str()))?,
        Decoded::Memory { width, index: Index::None, .. } => {
            let candidates: &[Mode] = if width == Width::One {
                &[Mode::ZeroPage, Mode::Absolute]
            } else {
                &[Mode::Absolute]
            };
            find_candidate(mnemonic, candidates)
                .ok_or_else(|| format!("{} has no memory addressing form", mnemonic.as_str()))?
        }
        Decoded::Memory { width, index: Index::X, .. } => {
            let candidates: &[Mode] = if width == Width::One {
                &[Mode::ZeroPageX, Mode::AbsoluteX]
            } else {
                &[Mode::AbsoluteX]
            };
            find_candidate(mnemonic, candidates)
                .ok_or_else(|| format!("{} has no ,X form for a {:?}-byte operand", mnemonic.as_str(), width))?
        }
        Decoded::Memory { width, index: Index::Y, .. } => {
            let candidates: &[Mode] = if width == Width::One {
                &[Mode::ZeroPageY, Mode::AbsoluteY]
            } else {
                &[Mode::AbsoluteY]
            };
            find_candidate(mnemonic, candidates)
                .ok_or_else(|| format!("{} has no ,Y form for a {:?}-byte operand", mnemonic.as_str(), width))?
        }
        Decoded::Indirect(_) => find_candidate(mnemonic, &[Mode::Indirect])
            .ok_or_else(|| format!("{} has no indirect form", mnemonic.as_str()))?,
        Decoded::IndirectX(_) => find_candidate(mnemonic, &[Mode::IndirectX])
            .ok_or_else(|| format!("{} has no (indirect,X) form", mnemonic.as_str()))?,
        Decoded::IndirectY(_) => find_candidate(mnemonic, &[Mode::IndirectY])
            .ok_or_else(|| format!("{} has no (indirect),Y form", mnemonic.as_str()))?,
    };

    emitter.add_byte(opcode);
    match (mode, decoded) {
        (Mode::Implied, _) | (Mode::Accumulator, _) => {}
        (Mode::Immediate, Decoded::Immediate(value)) => emitter.add_byte(value as u8),
        (Mode::ZeroPage, Decoded::Memory { value, .. })
        | (Mode::ZeroPageX, Decoded::Memory { value, .. })
        | (Mode::ZeroPageY, Decoded::Memory { value, .. }) => emitter.add_byte(value as u8),
        (Mode::Absolute, Decoded::Memory { value, .. })
        | (Mode::AbsoluteX, Decoded::Memory { value, .. })
        | (Mode::AbsoluteY, Decoded::Memory { value, .. }) => emitter.add_word(value),
        (Mode::Indirect, Decoded::Indirect(value)) => emitter.add_word(value),
        (Mode::IndirectX, Decoded::IndirectX(value)) => emitter.add_byte(value),
        (Mode::IndirectY, Decoded::IndirectY(value)) => emitter.add_byte(value),
        _ => unreachable!("candidate selection guarantees mode and operand agree"),
    }
    Ok(())
}

/// §4.5 "Mnemonic selection... for branches the value is converted to a
/// signed 8-bit offset: `rel = int(target) - int(next_instruction_address)`".
///
/// On pass 1, a forward-referenced label is still unresolved: `resolve_value`
/// hands back a `0` placeholder rather than the real address, so `rel` here
/// is meaningless and almost always falls outside `-128..127`. Validating
/// the range against that placeholder would abort the whole assembly before
/// pass 2 — the pass that actually knows the label's address — ever runs.
/// So the range check only runs once the target is `resolved`; an
/// unresolved target still emits a placeholder byte, overwritten correctly
/// on the next pass.
fn assemble_branch(mnemonic: Mnemonic, decoded: Decoded, emitter: &mut Emitter) -> Result<(), String> {
    let (target, resolved) = match decoded {
        Decoded::Memory { value, index: Index::None, resolved, .. } => (value, resolved),
        Decoded::None => return Err(format!("{} requires a branch target", mnemonic.as_str())),
        _ => return Err(format!("{} takes a plain address operand", mnemonic.as_str())),
    };
    let opcode = find_opcode(mnemonic, Mode::Relative).expect("every Bcc mnemonic has a relative form");
    let next_instruction = emitter.cursor.wrapping_add(2);
    let rel = target as i32 - next_instruction as i32;
    if resolved && !(-128..=127).contains(&rel) {
        return Err(format!(
            "branch target out of range for {} ({} bytes, must fit in -128..127)",
            mnemonic.as_str(),
            rel
        ));
    }
    emitter.add_byte(opcode);
    emitter.add_byte(rel as i8 as u8);
    Ok(())
}

/// Recursive-descent operand decode over the substring following the
/// mnemonic, matching the grammar of §6: immediate `#`, indirect `(...)`,
/// bare `A`, memory value with optional `,X`/`,Y`, bare label.
fn decode_operand(text: &str, symbols: &HashMap<String, Symbol>, bad_labels: &mut usize) -> Result<Decoded, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Decoded::None);
    }
    if text.eq_ignore_ascii_case("a") {
        return Ok(Decoded::Accumulator);
    }
    if let Some(rest) = text.strip_prefix('#') {
        let (value, _, _) = resolve_value(rest, symbols, bad_labels)?;
        return Ok(Decoded::Immediate(value));
    }
    if let Some(rest) = text.strip_prefix('(') {
        return decode_indirect(text, rest, symbols, bad_labels);
    }

    if let Some(comma) = text.find(',') {
        let (value_text, index_text) = (&text[..comma], text[comma + 1..].trim());
        let (value, width, resolved) = resolve_value(value_text, symbols, bad_labels)?;
        let index = parse_index(index_text)?;
        return Ok(Decoded::Memory { value, width, index, resolved });
    }

    let (value, width, resolved) = resolve_value(text, symbols, bad_labels)?;
    Ok(Decoded::Memory { value, width, index: Index::None, resolved })
}

fn decode_indirect(
    full_text: &str,
    rest: &str,
    symbols: &HashMap<String, Symbol>,
    bad_labels: &mut usize,
) -> Result<Decoded, String> {
    let close = rest
        .find(')')
        .ok_or_else(|| format!("unterminated '(' in operand '{}'", full_text))?;
    let inner = rest[..close].trim();
    let after = rest[close + 1..].trim();

    if let Some(comma) = inner.find(',') {
        // (value,X) — indirect indexed by X; the pointer lives in zero page.
        let (value_text, index_text) = (&inner[..comma], inner[comma + 1..].trim());
        if !after.is_empty() {
            return Err(format!("unexpected text after ')' in operand '{}'", full_text));
        }
        if !index_text.eq_ignore_ascii_case("x") {
            return Err(format!("expected ',X' inside operand '{}'", full_text));
        }
        let (value, width, _) = resolve_value(value_text, symbols, bad_labels)?;
        if width != Width::One {
            return Err(format!("indirect,X operand '{}' must be a zero-page address", value_text.trim()));
        }
        return Ok(Decoded::IndirectX(value as u8));
    }

    let (value, width, _) = resolve_value(inner, symbols, bad_labels)?;
    if after.is_empty() {
        // (value) — indirect, JMP only.
        return Ok(Decoded::Indirect(value));
    }
    let index_text = after
        .strip_prefix(',')
        .ok_or_else(|| format!("expected ',Y' after operand '{}'", full_text))?
        .trim();
    if !index_text.eq_ignore_ascii_case("y") {
        return Err(format!("expected ',Y' after operand '{}'", full_text));
    }
    if width != Width::One {
        return Err(format!("indirect),Y operand '{}' must be a zero-page address", inner));
    }
    Ok(Decoded::IndirectY(value as u8))
}

fn parse_index(text: &str) -> Result<Index, String> {
    if text.eq_ignore_ascii_case("x") {
        Ok(Index::X)
    } else if text.eq_ignore_ascii_case("y") {
        Ok(Index::Y)
    } else {
        Err(format!("unexpected index register '{}'", text))
    }
}

/// Resolves a `$hex`, decimal, or bare-identifier (label/`DEFINE`) operand
/// token to `(value, width, resolved)`. An unresolved identifier increments
/// `bad_labels`, returns a `0`/`Width::Two` placeholder (so the caller in the
/// opcode-selection step always picks the absolute-family form for an
/// as-yet-unknown label — see `Symbol::Label`), and reports `resolved =
/// false` so callers that validate the placeholder's *value* (the branch
/// range check) know to defer that validation to the pass where the symbol
/// is actually known. A literal or a found symbol is always `resolved = true`.
fn resolve_value(token: &str, symbols: &HashMap<String, Symbol>, bad_labels: &mut usize) -> Result<(u16, Width, bool), String> {
    let token = token.trim();
    if let Some(hex) = token.strip_prefix('$') {
        let value = u16::from_str_radix(hex, 16).map_err(|_| format!("invalid hex literal '${}'", hex))?;
        return Ok((value, width_of(value), true));
    }
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        let value: u16 = token.parse().map_err(|_| format!("invalid decimal literal '{}'", token))?;
        return Ok((value, width_of(value), true));
    }
    if !is_valid_ident(token) {
        return Err(format!("invalid operand '{}'", token));
    }
    match symbols.get(token) {
        Some(Symbol::Label(addr)) => Ok((*addr, Width::Two, true)),
        Some(Symbol::Define(value, width)) => Ok((*value, *width, true)),
        None => {
            *bad_labels += 1;
            Ok((0, Width::Two, false))
        }
    }
}

fn is_valid_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn split_first_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim()),
        None => (s, ""),
    }
}

fn split_top_level_commas(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::memory::FlatMemory;

    fn assemble_bytes(start: u16, text: &str) -> (FlatMemory, usize) {
        let mut mem = FlatMemory::new();
        let len = assemble(&mut mem, start, text).unwrap();
        (mem, len)
    }

    #[test]
    fn immediate_mode_assembles() {
        let (mem, len) = assemble_bytes(0x0600, "LDA #$66");
        assert_eq!(len, 2);
        assert_eq!(mem.get_byte(0x0600), 0xA9);
        assert_eq!(mem.get_byte(0x0601), 0x66);
    }

    #[test]
    fn zero_page_operand_selects_the_short_form() {
        let (mem, len) = assemble_bytes(0x0600, "LDA $05");
        assert_eq!(len, 2);
        assert_eq!(mem.get_byte(0x0600), 0xA5); // LDA zp
        assert_eq!(mem.get_byte(0x0601), 0x05);
    }

    #[test]
    fn wide_operand_selects_the_absolute_form() {
        let (mem, len) = assemble_bytes(0x0600, "LDA $1234");
        assert_eq!(len, 3);
        assert_eq!(mem.get_byte(0x0600), 0xAD); // LDA abs
    }

    #[test]
    fn zero_page_only_instruction_errors_on_a_wide_operand() {
        // STX has no AbsoluteY form (only ZeroPage/ZeroPageY/Absolute), unlike
        // LDX which legally supports AbsoluteY.
        let mut mem = FlatMemory::new();
        let err = assemble(&mut mem, 0x0600, "STX $1234,Y").unwrap_err();
        assert!(err.contains("STX"));
    }

    #[test]
    fn indirect_indexed_modes_assemble() {
        let (mem, _) = assemble_bytes(0x0600, "LDA ($05,X)");
        assert_eq!(mem.get_byte(0x0600), 0xA1);
        assert_eq!(mem.get_byte(0x0601), 0x05);

        let (mem, _) = assemble_bytes(0x0600, "LDA ($06),Y");
        assert_eq!(mem.get_byte(0x0600), 0xB1);
        assert_eq!(mem.get_byte(0x0601), 0x06);
    }

    #[test]
    fn jmp_indirect_assembles() {
        let (mem, _) = assemble_bytes(0x0600, "JMP ($1234)");
        assert_eq!(mem.get_byte(0x0600), 0x6C);
        assert_eq!(mem.get_word(0x0601), 0x1234);
    }

    #[test]
    fn accumulator_shift_with_no_operand_defaults_to_register_a() {
        let (mem, len) = assemble_bytes(0x0600, "ASL");
        assert_eq!(len, 1);
        assert_eq!(mem.get_byte(0x0600), 0x0A);
    }

    #[test]
    fn forward_label_resolves_on_the_second_pass() {
        let (mem, _) = assemble_bytes(
            0x0600,
            "JMP target\nLDA #$11\ntarget: LDA #$22",
        );
        assert_eq!(mem.get_byte(0x0600), 0x4C); // JMP abs
        assert_eq!(mem.get_word(0x0601), 0x0605);
        assert_eq!(mem.get_byte(0x0605), 0xA9);
        assert_eq!(mem.get_byte(0x0606), 0x22);
    }

    #[test]
    fn branch_backward_within_range_resolves() {
        let (mem, _) = assemble_bytes(
            0x0600,
            "loop: CLC\nCLC\nCLC\nBPL loop",
        );
        // BPL opcode at 0x0603, operand at 0x0604; next_instruction=0x0605.
        // target (loop) = 0x0600; rel = 0x0600 - 0x0605 = -5.
        assert_eq!(mem.get_byte(0x0603), 0x10);
        assert_eq!(mem.get_byte(0x0604) as i8, -5);
    }

    #[test]
    fn branch_forward_to_a_not_yet_defined_label_resolves_on_the_second_pass() {
        // BNE done; NOP; done: NOP. On pass 1 "done" is unresolved, so the
        // placeholder-based range check must be skipped rather than aborting
        // before pass 2 ever runs.
        let (mem, _) = assemble_bytes(0x0600, "BNE done\nNOP\ndone: NOP");
        // BNE opcode at 0x0600, operand at 0x0601; next_instruction=0x0602.
        // target (done) = 0x0603; rel = 0x0603 - 0x0602 = 1.
        assert_eq!(mem.get_byte(0x0600), 0xD0);
        assert_eq!(mem.get_byte(0x0601) as i8, 1);
        assert_eq!(mem.get_byte(0x0603), 0xEA);
    }

    #[test]
    fn branch_out_of_range_is_an_assemble_error() {
        let mut mem = FlatMemory::new();
        let mut text = String::from("BPL target\n");
        for _ in 0..200 {
            text.push_str("NOP\n");
        }
        text.push_str("target: NOP\n");
        let err = assemble(&mut mem, 0x0600, &text).unwrap_err();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn org_moves_the_write_cursor() {
        let mut mem = FlatMemory::new();
        assemble(&mut mem, 0x0600, "ORG $0700\nLDA #$01").unwrap();
        assert_eq!(mem.get_byte(0x0700), 0xA9);
        assert_eq!(mem.get_byte(0x0600), 0x00);
    }

    #[test]
    fn db_emits_string_and_numeric_literals() {
        let (mem, len) = assemble_bytes(0x0600, r#"DB "hi", $41, 66"#);
        assert_eq!(len, 4);
        assert_eq!(mem.get_byte(0x0600), b'h');
        assert_eq!(mem.get_byte(0x0601), b'i');
        assert_eq!(mem.get_byte(0x0602), 0x41);
        assert_eq!(mem.get_byte(0x0603), 66);
    }

    #[test]
    fn db_emits_a_wide_numeric_literal_as_two_bytes() {
        let (mem, len) = assemble_bytes(0x0600, "DB $1234");
        assert_eq!(len, 2);
        assert_eq!(mem.get_word(0x0600), 0x1234);
    }

    #[test]
    fn define_records_a_symbol_with_its_own_width() {
        let (mem, _) = assemble_bytes(0x0600, "DEFINE SCREEN $05\nLDA SCREEN");
        assert_eq!(mem.get_byte(0x0600), 0xA5); // zero page, since SCREEN is 1 byte wide
        assert_eq!(mem.get_byte(0x0601), 0x05);
    }

    #[test]
    fn unknown_mnemonic_is_an_assemble_error() {
        let mut mem = FlatMemory::new();
        let err = assemble(&mut mem, 0x0600, "FROB #$01").unwrap_err();
        assert!(err.contains("FROB"));
    }

    #[test]
    fn print_directive_errors_when_disabled() {
        let mut mem = FlatMemory::new();
        let err = assemble(&mut mem, 0x0600, "OUT").unwrap_err();
        assert!(err.contains("disabled"));
    }

    #[test]
    fn print_directive_emits_jsr_when_enabled() {
        let mut mem = FlatMemory::new();
        let print_procs = PrintProcAddrs {
            enabled: true,
            out: 0xFF00,
            ..PrintProcAddrs::disabled()
        };
        assemble_with_print_procs(&mut mem, 0x0600, "OUT", &print_procs).unwrap();
        assert_eq!(mem.get_byte(0x0600), 0x20); // JSR
        assert_eq!(mem.get_word(0x0601), 0xFF00);
    }

    #[test]
    fn outmem_emits_jsr_plus_an_inline_address() {
        let mut mem = FlatMemory::new();
        let print_procs = PrintProcAddrs {
            enabled: true,
            outmem: 0xFF10,
            ..PrintProcAddrs::disabled()
        };
        assemble_with_print_procs(&mut mem, 0x0600, "OUTMEM $0200", &print_procs).unwrap();
        assert_eq!(mem.get_byte(0x0600), 0x20);
        assert_eq!(mem.get_word(0x0601), 0xFF10);
        assert_eq!(mem.get_word(0x0603), 0x0200);
    }

    #[test]
    fn jsr_rts_round_trip_matches_testable_property_scenario() {
        let mut mem = FlatMemory::new();
        assemble(&mut mem, 0x0600, "JSR $0200\nNOP").unwrap();
        assemble(&mut mem, 0x0200, "RTS").unwrap();
        assert_eq!(mem.get_byte(0x0600), 0x20);
        assert_eq!(mem.get_word(0x0601), 0x0200);
        assert_eq!(mem.get_byte(0x0603), 0xEA);
        assert_eq!(mem.get_byte(0x0200), 0x60);
    }
}
