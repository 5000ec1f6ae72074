//! A MOS 6502 interpreter, assembler, and disassembler over a flat 64 KiB
//! address space: cycle-counted instruction execution, a two-pass
//! label-resolving assembler, and a linear disassembler, sharing a single
//! opcode table.
#![allow(clippy::new_without_default)]

pub mod addressing;
pub mod alu;
pub mod asm;
pub mod cpu;
pub mod diagnostics;
pub mod disasm;
pub mod memory;
pub mod observer;
pub mod opcodes;
pub mod status;

pub use cpu::Cpu;
pub use memory::{FlatMemory, MemoryBus};
pub use observer::{NullObserver, Observer};
