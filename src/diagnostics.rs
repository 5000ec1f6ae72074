//! Small stderr reporters for the error kinds of §7. None of these panic or
//! abort `step`/`cont` — they are purely informational, the same way the
//! assembler's parse-error printer in `asm.rs` builds a message and hands
//! control back to the caller.

use colored::*;

pub fn illegal_opcode(byte: u8, addr: u16) {
    eprintln!(
        "{} {} at {}",
        "illegal opcode".bright_red(),
        format!("{:#04X}", byte).bright_white(),
        format!("{:#06X}", addr).cyan(),
    );
}

pub fn interrupt_nesting(which: &str) {
    eprintln!(
        "{} {} while already in an interrupt of the same kind",
        "interrupt nesting:".yellow(),
        which.bright_white(),
    );
}

pub fn rti_with_nothing_active() {
    eprintln!("{}", "rti with no interrupt in progress".yellow());
}

pub fn assemble_error(line_no: usize, line: &str, message: &str) {
    eprintln!(
        "{} line {}: {}\n  {}",
        "assemble error:".bright_red(),
        line_no,
        message,
        line.trim().bright_white(),
    );
}
