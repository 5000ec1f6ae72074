//! C1's register half plus C4, the instruction interpreter: fetch-decode-
//! dispatch, interrupt entry/return, breakpoints, jump-points, and the
//! host-mediated print directives of §4.4.

use std::collections::HashSet;

use crate::addressing::{Mode, Operand};
use crate::alu;
use crate::diagnostics;
use crate::memory::{FlatMemory, MemoryBus};
use crate::observer::{NullObserver, Observer, Reg};
use crate::opcodes::{Mnemonic, OpcodeInfo, OPCODE_TABLE};
use crate::status::{self, StatusFlag};

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_BRK_VECTOR: u16 = 0xFFFE;
const STACK_PAGE: u16 = 0x0100;

/// The break/halt state machine of §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Running,
    Break,
    Halt,
}

/// The CPU: register file, memory, observer, and the bits of debugger state
/// (breakpoints, jump-points) the interpreter threads through `cont`/`next`.
pub struct Cpu {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub sr: u8,
    pub t: u64,

    pub in_nmi: bool,
    pub in_irq: bool,
    pub in_brk: bool,

    pub state: ExecutionState,
    pub breakpoints: HashSet<u16>,
    pub temp_breakpoint: Option<u16>,
    pub jump_points: HashSet<u16>,

    /// Global enable for the host-mediated print directives (§9 design
    /// note: "a single configuration flag on the CPU struct").
    pub print_procs_enabled: bool,
    pub out_addr: u16,
    pub outn_addr: u16,
    pub outmem_addr: u16,
    pub outmemn_addr: u16,
    pub outs_addr: u16,

    memory: Box<dyn MemoryBus>,
    observer: Box<dyn Observer>,
}

impl Cpu {
    /// A CPU over a fresh flat 64 KiB memory with no observer attached.
    pub fn new() -> Self {
        Cpu::with_memory_and_observer(Box::new(FlatMemory::new()), Box::new(NullObserver))
    }

    pub fn with_memory_and_observer(memory: Box<dyn MemoryBus>, observer: Box<dyn Observer>) -> Self {
        Cpu {
            pc: 0,
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFF,
            sr: status::RESET_SR,
            t: 0,
            in_nmi: false,
            in_irq: false,
            in_brk: false,
            state: ExecutionState::Running,
            breakpoints: HashSet::new(),
            temp_breakpoint: None,
            jump_points: HashSet::new(),
            print_procs_enabled: false,
            out_addr: 0,
            outn_addr: 0,
            outmem_addr: 0,
            outmemn_addr: 0,
            outs_addr: 0,
            memory,
            observer,
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn Observer>) {
        self.observer = observer;
    }

    pub fn memory(&self) -> &dyn MemoryBus {
        self.memory.as_ref()
    }

    pub fn memory_mut(&mut self) -> &mut dyn MemoryBus {
        self.memory.as_mut()
    }

    /// Restores the "just constructed" state (zeroed except `SP=0xFF`,
    /// `I=1`) and zeroes `t`. Memory, breakpoints, and jump-points persist.
    pub fn reset(&mut self) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.pc = 0;
        self.sp = 0xFF;
        self.sr = status::RESET_SR;
        self.t = 0;
        self.in_nmi = false;
        self.in_irq = false;
        self.in_brk = false;
        self.state = ExecutionState::Running;
        self.observer.register_changed(Reg::None);
    }

    /// Loads `PC` from the Reset vector without saving any state.
    pub fn reset_system(&mut self) {
        self.pc = self.memory.get_word(RESET_VECTOR);
        self.t = self.t.wrapping_add(7);
        self.observer.pc_changed();
        self.observer.tick(7);
    }

    // -- stack --------------------------------------------------------

    fn push_byte(&mut self, value: u8) {
        let addr = STACK_PAGE | self.sp as u16;
        self.memory.set_byte(addr, value);
        self.sp = self.sp.wrapping_sub(1);
        self.observer.mem_changed(addr, 1);
        self.observer.stack_changed();
    }

    fn pop_byte(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        let addr = STACK_PAGE | self.sp as u16;
        let value = self.memory.get_byte(addr);
        self.observer.stack_changed();
        value
    }

    fn push_word(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push_byte(hi);
        self.push_byte(lo);
    }

    fn pop_word(&mut self) -> u16 {
        let lo = self.pop_byte();
        let hi = self.pop_byte();
        u16::from_le_bytes([lo, hi])
    }

    // -- interrupts -----------------------------------------------------

    /// Always triggers, per §4.4.
    pub fn reset_nmi(&mut self) {
        if self.in_nmi {
            diagnostics::interrupt_nesting("NMI");
            self.state = ExecutionState::Break;
            return;
        }
        self.in_nmi = true;
        self.enter_interrupt(NMI_VECTOR);
        self.observer.handle_nmi();
    }

    /// Triggers only if `I=0`, per §4.4.
    pub fn reset_irq(&mut self) {
        if status::is_set(self.sr, StatusFlag::InterruptDisable) {
            return;
        }
        if self.in_irq {
            diagnostics::interrupt_nesting("IRQ");
            self.state = ExecutionState::Break;
            return;
        }
        self.in_irq = true;
        self.enter_interrupt(IRQ_BRK_VECTOR);
        self.observer.handle_irq();
    }

    fn enter_interrupt(&mut self, vector: u16) {
        let pc = self.pc;
        self.push_word(pc);
        let sr = self.sr;
        self.push_byte(sr);
        status::set(&mut self.sr, StatusFlag::InterruptDisable, true);
        self.pc = self.memory.get_word(vector);
        self.t = self.t.wrapping_add(7);
        self.observer.flags_changed();
        self.observer.pc_changed();
        self.observer.tick(7);
    }

    // -- fetch / addressing ---------------------------------------------

    fn fetch_byte(&mut self) -> u8 {
        let b = self.memory.get_byte(self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.observer.pc_changed();
        b
    }

    fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte();
        let hi = self.fetch_byte();
        u16::from_le_bytes([lo, hi])
    }

    /// Resolves `mode` into an `Operand`, consuming whatever operand bytes
    /// the mode calls for (§4.2). `Relative`'s "effective address" is the
    /// branch target itself, not a byte to dereference.
    fn resolve(&mut self, mode: Mode) -> Operand {
        match mode {
            Mode::Implied => Operand::Implied,
            Mode::Accumulator => Operand::Accumulator,
            Mode::Immediate => Operand::Immediate(self.fetch_byte()),
            Mode::ZeroPage => Operand::Memory(self.fetch_byte() as u16),
            Mode::ZeroPageX => {
                let zp = self.fetch_byte();
                Operand::Memory(zp.wrapping_add(self.x) as u16)
            }
            Mode::ZeroPageY => {
                let zp = self.fetch_byte();
                Operand::Memory(zp.wrapping_add(self.y) as u16)
            }
            Mode::Absolute => Operand::Memory(self.fetch_word()),
            Mode::AbsoluteX => {
                let abs = self.fetch_word();
                Operand::Memory(abs.wrapping_add(self.x as u16))
            }
            Mode::AbsoluteY => {
                let abs = self.fetch_word();
                Operand::Memory(abs.wrapping_add(self.y as u16))
            }
            Mode::Indirect => {
                // The hardware page-wrap bug in `JMP ($xxFF)` is not
                // reproduced (§9 open question 2): the high byte is always
                // read from `ptr + 1`, even across a page boundary.
                let ptr = self.fetch_word();
                Operand::Memory(self.memory.get_word(ptr))
            }
            Mode::IndirectX => {
                let zp = self.fetch_byte().wrapping_add(self.x);
                Operand::Memory(self.read_zp_pointer(zp))
            }
            Mode::IndirectY => {
                let zp = self.fetch_byte();
                let base = self.read_zp_pointer(zp);
                Operand::Memory(base.wrapping_add(self.y as u16))
            }
            Mode::Relative => {
                let offset = self.fetch_byte() as i8;
                Operand::Memory(self.pc.wrapping_add(offset as i16 as u16))
            }
        }
    }

    /// Reads a little-endian pointer out of zero page, wrapping the pointer
    /// address within page 0 (invariant 2).
    fn read_zp_pointer(&self, zp: u8) -> u16 {
        let lo = self.memory.get_byte(zp as u16);
        let hi = self.memory.get_byte(zp.wrapping_add(1) as u16);
        u16::from_le_bytes([lo, hi])
    }

    fn load(&mut self, operand: Operand) -> u8 {
        match operand {
            Operand::Implied => 0,
            Operand::Accumulator => self.a,
            Operand::Immediate(v) => v,
            Operand::Memory(addr) => self.memory.get_byte(addr),
        }
    }

    fn store(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Accumulator => {
                self.a = value;
                self.observer.register_changed(Reg::A);
            }
            Operand::Memory(addr) => {
                self.memory.set_byte(addr, value);
                self.observer.mem_changed(addr, 1);
            }
            Operand::Implied | Operand::Immediate(_) => {}
        }
    }

    fn load_operand(&mut self, mode: Mode) -> u8 {
        let operand = self.resolve(mode);
        self.load(operand)
    }

    fn store_operand(&mut self, mode: Mode, value: u8) {
        let operand = self.resolve(mode);
        self.store(operand, value);
    }

    // -- the step loop ----------------------------------------------------

    /// Executes exactly one instruction (§4.4). A no-op once `Halt`.
    pub fn step(&mut self) {
        if self.state == ExecutionState::Halt {
            return;
        }
        self.state = ExecutionState::Running;
        let instruction_pc = self.pc;
        let opcode = self.fetch_byte();
        let info = match OPCODE_TABLE[opcode as usize] {
            Some(info) => info,
            None => {
                diagnostics::illegal_opcode(opcode, instruction_pc);
                self.state = ExecutionState::Break;
                return;
            }
        };
        self.execute(opcode, info, instruction_pc);
        self.t = self.t.wrapping_add(info.cycles as u64);
        self.observer.tick(info.cycles);
    }

    /// Steps until `Break` or `Halt`. Checks the breakpoint set and the
    /// temporary breakpoint after every instruction.
    pub fn cont(&mut self) {
        while self.state == ExecutionState::Running {
            self.step();
            if self.state != ExecutionState::Running {
                break;
            }
            if self.breakpoints.contains(&self.pc) || self.temp_breakpoint == Some(self.pc) {
                self.state = ExecutionState::Break;
                self.observer.breakpoint_hit();
            }
        }
    }

    /// Unconditional run, identical to `cont` from a fresh `Running` state.
    /// Kept distinct from `cont` because a host may call `run` to mean "go"
    /// regardless of whatever state the CPU is currently sitting in.
    pub fn run(&mut self) {
        self.state = ExecutionState::Running;
        self.cont();
    }

    /// Step-over: disassemble the instruction at `PC` to find its length,
    /// set a temporary breakpoint past it, and `cont()`.
    pub fn next(&mut self) {
        let len = crate::disasm::instruction_len(self.memory.as_ref(), self.pc);
        let after = self.pc.wrapping_add(len);
        self.temp_breakpoint = Some(after);
        self.state = ExecutionState::Running;
        self.cont();
        self.temp_breakpoint = None;
    }

    /// Adds `addr` to the breakpoint set and notifies `breakpointsChanged`.
    pub fn add_breakpoint(&mut self, addr: u16) {
        self.breakpoints.insert(addr);
        self.observer.breakpoints_changed();
    }

    /// Removes `addr` from the breakpoint set and notifies `breakpointsChanged`.
    pub fn remove_breakpoint(&mut self, addr: u16) {
        self.breakpoints.remove(&addr);
        self.observer.breakpoints_changed();
    }

    /// Adds `addr` to the jump-point set and notifies `jumpPointsChanged`.
    pub fn add_jump_point(&mut self, addr: u16) {
        self.jump_points.insert(addr);
        self.observer.jump_points_changed();
    }

    /// Removes `addr` from the jump-point set and notifies `jumpPointsChanged`.
    pub fn remove_jump_point(&mut self, addr: u16) {
        self.jump_points.remove(&addr);
        self.observer.jump_points_changed();
    }

    fn check_illegal_jump(&mut self, target: u16, instruction_pc: u16) {
        if target == instruction_pc {
            self.observer.illegal_jump();
        }
    }

    fn maybe_jump_point(&mut self, target: u16, opcode: u8) {
        if self.jump_points.contains(&target) {
            self.observer.jump_point_hit(opcode);
        }
    }

    // -- instruction dispatch ---------------------------------------------

    fn execute(&mut self, opcode: u8, info: OpcodeInfo, instruction_pc: u16) {
        use Mnemonic::*;
        match info.mnemonic {
            JMP => self.op_jmp(info.mode, instruction_pc),
            JSR => self.op_jsr(opcode),
            RTS => self.op_rts(),
            BRK => self.op_brk(),
            RTI => self.op_rti(),

            BCC => self.op_branch(info.mode, instruction_pc, !status::is_set(self.sr, StatusFlag::Carry)),
            BCS => self.op_branch(info.mode, instruction_pc, status::is_set(self.sr, StatusFlag::Carry)),
            BEQ => self.op_branch(info.mode, instruction_pc, status::is_set(self.sr, StatusFlag::Zero)),
            BNE => self.op_branch(info.mode, instruction_pc, !status::is_set(self.sr, StatusFlag::Zero)),
            BMI => self.op_branch(info.mode, instruction_pc, status::is_set(self.sr, StatusFlag::Negative)),
            BPL => self.op_branch(info.mode, instruction_pc, !status::is_set(self.sr, StatusFlag::Negative)),
            BVC => self.op_branch(info.mode, instruction_pc, !status::is_set(self.sr, StatusFlag::Overflow)),
            BVS => self.op_branch(info.mode, instruction_pc, status::is_set(self.sr, StatusFlag::Overflow)),

            CLC => status::set(&mut self.sr, StatusFlag::Carry, false),
            SEC => status::set(&mut self.sr, StatusFlag::Carry, true),
            CLD => status::set(&mut self.sr, StatusFlag::Decimal, false),
            SED => status::set(&mut self.sr, StatusFlag::Decimal, true),
            CLI => status::set(&mut self.sr, StatusFlag::InterruptDisable, false),
            SEI => status::set(&mut self.sr, StatusFlag::InterruptDisable, true),
            CLV => status::set(&mut self.sr, StatusFlag::Overflow, false),
            NOP => {}

            PHA => {
                let a = self.a;
                self.push_byte(a);
            }
            PLA => {
                let v = self.pop_byte();
                self.a = v;
                status::set_nz(&mut self.sr, v);
                self.observer.register_changed(Reg::A);
                self.observer.flags_changed();
            }
            PHP => {
                let pushed = self.sr | StatusFlag::Break as u8 | StatusFlag::Reserved as u8;
                self.push_byte(pushed);
            }
            PLP => {
                self.sr = self.pop_byte();
                self.observer.flags_changed();
            }

            TAX => self.transfer(self.a, Reg::X, |cpu, v| cpu.x = v),
            TXA => self.transfer(self.x, Reg::A, |cpu, v| cpu.a = v),
            TAY => self.transfer(self.a, Reg::Y, |cpu, v| cpu.y = v),
            TYA => self.transfer(self.y, Reg::A, |cpu, v| cpu.a = v),
            TSX => self.transfer(self.sp, Reg::X, |cpu, v| cpu.x = v),
            TXS => {
                // TXS does not touch N/Z, unlike every other transfer.
                self.sp = self.x;
                self.observer.register_changed(Reg::Sp);
            }

            INX => self.increment(self.x, Reg::X, 1, |cpu, v| cpu.x = v),
            DEX => self.increment(self.x, Reg::X, -1, |cpu, v| cpu.x = v),
            INY => self.increment(self.y, Reg::Y, 1, |cpu, v| cpu.y = v),
            DEY => self.increment(self.y, Reg::Y, -1, |cpu, v| cpu.y = v),

            LDA => {
                let v = self.load_operand(info.mode);
                self.a = v;
                status::set_nz(&mut self.sr, v);
                self.observer.register_changed(Reg::A);
            }
            LDX => {
                let v = self.load_operand(info.mode);
                self.x = v;
                status::set_nz(&mut self.sr, v);
                self.observer.register_changed(Reg::X);
            }
            LDY => {
                let v = self.load_operand(info.mode);
                self.y = v;
                status::set_nz(&mut self.sr, v);
                self.observer.register_changed(Reg::Y);
            }
            STA => {
                let a = self.a;
                self.store_operand(info.mode, a);
            }
            STX => {
                let x = self.x;
                self.store_operand(info.mode, x);
            }
            STY => {
                let y = self.y;
                self.store_operand(info.mode, y);
            }

            AND => {
                let m = self.load_operand(info.mode);
                self.a &= m;
                status::set_nz(&mut self.sr, self.a);
                self.observer.register_changed(Reg::A);
            }
            ORA => {
                let m = self.load_operand(info.mode);
                self.a |= m;
                status::set_nz(&mut self.sr, self.a);
                self.observer.register_changed(Reg::A);
            }
            EOR => {
                let m = self.load_operand(info.mode);
                self.a ^= m;
                status::set_nz(&mut self.sr, self.a);
                self.observer.register_changed(Reg::A);
            }
            BIT => {
                let m = self.load_operand(info.mode);
                let a = self.a;
                alu::bit(&mut self.sr, a, m);
                self.observer.flags_changed();
            }
            CMP => {
                let m = self.load_operand(info.mode);
                let a = self.a;
                alu::compare(&mut self.sr, a, m);
                self.observer.flags_changed();
            }
            CPX => {
                let m = self.load_operand(info.mode);
                let x = self.x;
                alu::compare(&mut self.sr, x, m);
                self.observer.flags_changed();
            }
            CPY => {
                let m = self.load_operand(info.mode);
                let y = self.y;
                alu::compare(&mut self.sr, y, m);
                self.observer.flags_changed();
            }

            ADC => self.op_adc(info.mode),
            SBC => self.op_sbc(info.mode),

            INC => self.op_rmw(info.mode, |v| v.wrapping_add(1)),
            DEC => self.op_rmw(info.mode, |v| v.wrapping_sub(1)),
            ASL => self.op_shift(info.mode, alu::asl),
            LSR => self.op_shift(info.mode, alu::lsr),
            ROL => self.op_rotate(info.mode, alu::rol),
            ROR => self.op_rotate(info.mode, alu::ror),
        }
    }

    fn transfer(&mut self, value: u8, which: Reg, write: impl FnOnce(&mut Cpu, u8)) {
        write(self, value);
        status::set_nz(&mut self.sr, value);
        self.observer.register_changed(which);
    }

    fn increment(&mut self, value: u8, which: Reg, delta: i8, write: impl FnOnce(&mut Cpu, u8)) {
        let result = if delta < 0 {
            value.wrapping_sub(1)
        } else {
            value.wrapping_add(1)
        };
        write(self, result);
        status::set_nz(&mut self.sr, result);
        self.observer.register_changed(which);
    }

    fn op_adc(&mut self, mode: Mode) {
        let m = self.load_operand(mode);
        let carry_in = status::is_set(self.sr, StatusFlag::Carry);
        let (result, carry, overflow) = if status::is_set(self.sr, StatusFlag::Decimal) {
            alu::adc_decimal(self.a, m, carry_in)
        } else {
            alu::adc_binary(self.a, m, carry_in)
        };
        self.a = result;
        status::set_nz(&mut self.sr, result);
        status::set(&mut self.sr, StatusFlag::Carry, carry);
        status::set(&mut self.sr, StatusFlag::Overflow, overflow);
        self.observer.register_changed(Reg::A);
        self.observer.flags_changed();
    }

    fn op_sbc(&mut self, mode: Mode) {
        let m = self.load_operand(mode);
        let carry_in = status::is_set(self.sr, StatusFlag::Carry);
        let (result, carry, overflow) = if status::is_set(self.sr, StatusFlag::Decimal) {
            alu::sbc_decimal(self.a, m, carry_in)
        } else {
            alu::sbc_binary(self.a, m, carry_in)
        };
        self.a = result;
        status::set_nz(&mut self.sr, result);
        status::set(&mut self.sr, StatusFlag::Carry, carry);
        status::set(&mut self.sr, StatusFlag::Overflow, overflow);
        self.observer.register_changed(Reg::A);
        self.observer.flags_changed();
    }

    fn op_rmw(&mut self, mode: Mode, f: impl FnOnce(u8) -> u8) {
        let operand = self.resolve(mode);
        let value = self.load(operand);
        let result = f(value);
        self.store(operand, result);
        status::set_nz(&mut self.sr, result);
        self.observer.flags_changed();
    }

    fn op_shift(&mut self, mode: Mode, f: impl FnOnce(u8) -> (u8, bool)) {
        let operand = self.resolve(mode);
        let value = self.load(operand);
        let (result, carry) = f(value);
        self.store(operand, result);
        status::set_nz(&mut self.sr, result);
        status::set(&mut self.sr, StatusFlag::Carry, carry);
        self.observer.flags_changed();
    }

    fn op_rotate(&mut self, mode: Mode, f: impl FnOnce(u8, bool) -> (u8, bool)) {
        let carry_in = status::is_set(self.sr, StatusFlag::Carry);
        let operand = self.resolve(mode);
        let value = self.load(operand);
        let (result, carry) = f(value, carry_in);
        self.store(operand, result);
        status::set_nz(&mut self.sr, result);
        status::set(&mut self.sr, StatusFlag::Carry, carry);
        self.observer.flags_changed();
    }

    fn op_jmp(&mut self, mode: Mode, instruction_pc: u16) {
        let operand = self.resolve(mode);
        let target = match operand {
            Operand::Memory(addr) => addr,
            _ => unreachable!("JMP is always a memory-target mode"),
        };
        self.check_illegal_jump(target, instruction_pc);
        self.pc = target;
        self.observer.pc_changed();
        self.maybe_jump_point(target, 0x4C);
    }

    fn op_jsr(&mut self, opcode: u8) {
        let target = self.fetch_word();
        if self.print_procs_enabled {
            if let Some(consumed) = self.try_print_directive(target) {
                self.pc = self.pc.wrapping_add(consumed);
                self.observer.pc_changed();
                return;
            }
        }
        let return_addr = self.pc.wrapping_sub(1);
        self.push_word(return_addr);
        self.pc = target;
        self.observer.pc_changed();
        self.maybe_jump_point(target, opcode);
    }

    fn op_rts(&mut self) {
        let addr = self.pop_word();
        self.pc = addr.wrapping_add(1);
        self.observer.pc_changed();
    }

    fn op_branch(&mut self, mode: Mode, instruction_pc: u16, condition: bool) {
        let operand = self.resolve(mode);
        let target = match operand {
            Operand::Memory(addr) => addr,
            _ => unreachable!("Relative always resolves to a target address"),
        };
        if condition {
            self.check_illegal_jump(target, instruction_pc);
            self.pc = target;
            self.observer.pc_changed();
        }
    }

    fn op_brk(&mut self) {
        if self.in_brk {
            diagnostics::interrupt_nesting("BRK");
            self.state = ExecutionState::Break;
            return;
        }
        self.in_brk = true;
        status::set(&mut self.sr, StatusFlag::Break, true);
        status::set(&mut self.sr, StatusFlag::Reserved, true);
        let return_addr = self.pc.wrapping_add(1);
        self.push_word(return_addr);
        let sr = self.sr;
        self.push_byte(sr);
        status::set(&mut self.sr, StatusFlag::InterruptDisable, true);
        self.pc = self.memory.get_word(IRQ_BRK_VECTOR);
        self.observer.flags_changed();
        self.observer.pc_changed();
        self.observer.handle_break();
        self.state = ExecutionState::Break;
    }

    fn op_rti(&mut self) {
        self.sr = self.pop_byte();
        let addr = self.pop_word();
        self.pc = addr;
        self.observer.flags_changed();
        self.observer.pc_changed();
        if self.in_nmi {
            self.in_nmi = false;
        } else if self.in_irq {
            self.in_irq = false;
        } else if self.in_brk {
            self.in_brk = false;
        } else {
            diagnostics::rti_with_nothing_active();
            self.state = ExecutionState::Break;
        }
    }

    // -- print directives -------------------------------------------------

    /// If `target` is one of the five magic addresses, performs the print
    /// and returns how many inline argument bytes to skip. Returns `None`
    /// for an ordinary call, leaving the stack and `PC` untouched.
    fn try_print_directive(&mut self, target: u16) -> Option<u16> {
        if target == self.out_addr {
            print!("{}", self.format_registers());
            println!();
            Some(0)
        } else if target == self.outn_addr {
            print!("{}", self.format_registers());
            Some(0)
        } else if target == self.outmem_addr {
            let addr = self.fetch_word_peek();
            println!("{:02X}", self.memory.get_byte(addr));
            Some(2)
        } else if target == self.outmemn_addr {
            let addr = self.fetch_word_peek();
            print!("{:02X}", self.memory.get_byte(addr));
            Some(2)
        } else if target == self.outs_addr {
            let addr = self.fetch_word_peek();
            print!("{}", self.read_cstring(addr));
            Some(2)
        } else {
            None
        }
    }

    /// Reads the 2-byte inline argument sitting right after the `JSR`
    /// operand, without advancing `PC` (the caller advances it once, by
    /// the total number of consumed bytes, after the print completes).
    fn fetch_word_peek(&self) -> u16 {
        self.memory.get_word(self.pc)
    }

    fn read_cstring(&self, start: u16) -> String {
        let mut addr = start;
        let mut out = String::new();
        loop {
            let b = self.memory.get_byte(addr);
            if b == 0 {
                break;
            }
            out.push(b as char);
            addr = addr.wrapping_add(1);
        }
        out
    }

    fn format_registers(&self) -> String {
        format!(
            "A={:02X} X={:02X} Y={:02X} SP={:02X} PC={:04X} SR={:08b}",
            self.a, self.x, self.y, self.sp, self.pc, self.sr
        )
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Cpu::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cpu_with(program: &[u8], load_addr: u16) -> Cpu {
        let mut cpu = Cpu::new();
        cpu.memory_mut().memset(load_addr, program);
        cpu.pc = load_addr;
        cpu
    }

    #[test]
    fn adc_binary_with_overflow() {
        // LDA #$50; ADC #$50
        let mut cpu = cpu_with(&[0xA9, 0x50, 0x69, 0x50], 0x0600);
        cpu.step();
        cpu.step();
        assert_eq!(cpu.a, 0xA0);
        assert!(status::is_set(cpu.sr, StatusFlag::Negative));
        assert!(status::is_set(cpu.sr, StatusFlag::Overflow));
        assert!(!status::is_set(cpu.sr, StatusFlag::Carry));
        assert!(!status::is_set(cpu.sr, StatusFlag::Zero));
    }

    #[test]
    fn adc_decimal_mode() {
        // SED; LDA #$15; ADC #$27
        let mut cpu = cpu_with(&[0xF8, 0xA9, 0x15, 0x69, 0x27], 0x0600);
        cpu.step();
        cpu.step();
        cpu.step();
        assert_eq!(cpu.a, 0x42);
        assert!(!status::is_set(cpu.sr, StatusFlag::Carry));
    }

    #[test]
    fn cmp_leaves_register_unchanged_and_sets_flags() {
        // LDA #$40; CMP #$40
        let mut cpu = cpu_with(&[0xA9, 0x40, 0xC9, 0x40], 0x0600);
        cpu.step();
        cpu.step();
        assert_eq!(cpu.a, 0x40);
        assert!(status::is_set(cpu.sr, StatusFlag::Zero));
        assert!(status::is_set(cpu.sr, StatusFlag::Carry));
        assert!(!status::is_set(cpu.sr, StatusFlag::Negative));
    }

    #[test]
    fn jsr_rts_round_trip_restores_stack_pointer() {
        // JSR $0200; NOP, with RTS at $0200.
        let mut cpu = Cpu::new();
        cpu.memory_mut().memset(0x0600, &[0x20, 0x00, 0x02, 0xEA]);
        cpu.memory_mut().set_byte(0x0200, 0x60);
        cpu.pc = 0x0600;
        let initial_sp = cpu.sp;
        cpu.step(); // JSR
        cpu.step(); // RTS
        cpu.step(); // NOP
        assert_eq!(cpu.pc, 0x0604);
        assert_eq!(cpu.sp, initial_sp);
    }

    #[test]
    fn branch_taken_does_not_cross_a_page_and_charges_two_cycles() {
        // BEQ $04 at $00FE, Z set.
        let mut cpu = cpu_with(&[0xF0, 0x04], 0x00FE);
        status::set(&mut cpu.sr, StatusFlag::Zero, true);
        let t0 = cpu.t;
        cpu.step();
        assert_eq!(cpu.pc, 0x0104);
        assert_eq!(cpu.t - t0, 2);
    }

    #[test]
    fn branch_not_taken_falls_through() {
        let mut cpu = cpu_with(&[0xF0, 0x04], 0x00FE);
        status::set(&mut cpu.sr, StatusFlag::Zero, false);
        cpu.step();
        assert_eq!(cpu.pc, 0x0100);
    }

    #[test]
    fn zero_page_indexed_wraps_within_page_zero() {
        // LDX #$01; LDA ($FF,X) should read its pointer from $00, not $0100.
        let mut cpu = cpu_with(&[0xA2, 0x01, 0xA1, 0xFF], 0x0600);
        cpu.memory_mut().set_word(0x00, 0x0300);
        cpu.memory_mut().set_byte(0x0300, 0x99);
        cpu.step();
        cpu.step();
        assert_eq!(cpu.a, 0x99);
    }

    #[test]
    fn illegal_opcode_sets_break_and_leaves_pc_after_the_byte() {
        let mut cpu = cpu_with(&[0x02], 0x0600); // 0x02 is illegal (KIL)
        cpu.step();
        assert_eq!(cpu.state, ExecutionState::Break);
        assert_eq!(cpu.pc, 0x0601);
    }

    #[test]
    fn breakpoint_stops_cont() {
        let mut cpu = cpu_with(&[0xEA, 0xEA, 0xEA], 0x0600);
        cpu.breakpoints.insert(0x0601);
        cpu.cont();
        assert_eq!(cpu.pc, 0x0601);
        assert_eq!(cpu.state, ExecutionState::Break);
    }

    #[test]
    fn reset_restores_initial_register_state() {
        let mut cpu = Cpu::new();
        cpu.a = 0x42;
        cpu.t = 100;
        cpu.reset();
        assert_eq!(cpu.a, 0);
        assert_eq!(cpu.sp, 0xFF);
        assert_eq!(cpu.t, 0);
        assert!(status::is_set(cpu.sr, StatusFlag::InterruptDisable));
    }

    #[test]
    fn php_sets_break_and_reserved_in_the_pushed_byte_only() {
        let mut cpu = cpu_with(&[0x08], 0x0600);
        cpu.sr = 0;
        cpu.step();
        let pushed = cpu.memory().get_byte(0x01FF);
        assert_eq!(pushed & 0b0011_0000, 0b0011_0000);
        assert_eq!(cpu.sr, 0);
    }

    #[test]
    fn brk_pushes_return_address_plus_one_and_jumps_through_vector() {
        let mut cpu = cpu_with(&[0x00, 0xEA], 0x0600);
        cpu.memory_mut().set_word(IRQ_BRK_VECTOR, 0x9000);
        cpu.step();
        assert_eq!(cpu.pc, 0x9000);
        assert!(status::is_set(cpu.sr, StatusFlag::InterruptDisable));
        let sp_after = cpu.sp;
        let pushed_sr = cpu.memory().get_byte(STACK_PAGE | (sp_after.wrapping_add(1)) as u16);
        assert_eq!(pushed_sr & 0b0011_0000, 0b0011_0000);
    }

    #[test]
    fn nmi_pushes_pc_and_sr_and_jumps_through_its_vector() {
        let mut cpu = Cpu::new();
        cpu.pc = 0x1234;
        cpu.memory_mut().set_word(NMI_VECTOR, 0x8000);
        cpu.reset_nmi();
        assert_eq!(cpu.pc, 0x8000);
        assert!(cpu.in_nmi);
        assert!(status::is_set(cpu.sr, StatusFlag::InterruptDisable));
    }

    #[test]
    fn add_and_remove_breakpoint_notify_the_observer() {
        struct Counter {
            changes: u32,
        }
        impl Observer for Counter {
            fn breakpoints_changed(&mut self) {
                self.changes += 1;
            }
        }
        let mut cpu = Cpu::new();
        cpu.set_observer(Box::new(Counter { changes: 0 }));
        cpu.add_breakpoint(0x1234);
        assert!(cpu.breakpoints.contains(&0x1234));
        cpu.remove_breakpoint(0x1234);
        assert!(!cpu.breakpoints.contains(&0x1234));
    }

    #[test]
    fn jump_point_hit_fires_on_jsr_landing() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Recorder(Rc<RefCell<bool>>);
        impl Observer for Recorder {
            fn jump_point_hit(&mut self, _opcode: u8) {
                *self.0.borrow_mut() = true;
            }
        }
        let hit = Rc::new(RefCell::new(false));
        let mut cpu = cpu_with(&[0x20, 0x00, 0x02], 0x0600); // JSR $0200
        cpu.set_observer(Box::new(Recorder(hit.clone())));
        cpu.add_jump_point(0x0200);
        cpu.step();
        assert_eq!(cpu.pc, 0x0200);
        assert!(*hit.borrow());
    }

    #[test]
    fn irq_is_masked_when_interrupt_disable_is_set() {
        let mut cpu = Cpu::new();
        status::set(&mut cpu.sr, StatusFlag::InterruptDisable, true);
        let pc_before = cpu.pc;
        cpu.reset_irq();
        assert_eq!(cpu.pc, pc_before);
        assert!(!cpu.in_irq);
    }
}
