//! The observer contract described in §6: everything the graphical debugger
//! and host machine would otherwise have hooked directly now goes through a
//! single trait the core holds by reference, with no-op defaults so a host
//! that wants nothing gets nothing.

/// Which register a `register_changed` notification refers to. `None` means
/// "bulk update, re-read everything" (the `registerChanged(NONE)` case).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    None,
    A,
    X,
    Y,
    Sr,
    Sp,
    Pc,
}

/// Collaborator surface presented to the debugger/host. All methods are
/// no-ops by default; implementors override only the ones they care about.
/// Per §5, a hook must never mutate CPU state — it can only read and react.
pub trait Observer {
    fn register_changed(&mut self, _which: Reg) {}
    fn flags_changed(&mut self) {}
    fn stack_changed(&mut self) {}
    fn pc_changed(&mut self) {}
    fn mem_changed(&mut self, _addr: u16, _len: u16) {}
    fn tick(&mut self, _cycles: u8) {}

    fn handle_nmi(&mut self) {}
    fn handle_irq(&mut self) {}
    fn handle_break(&mut self) {}
    fn illegal_jump(&mut self) {}

    fn breakpoint_hit(&mut self) {}
    fn breakpoints_changed(&mut self) {}
    fn jump_point_hit(&mut self, _opcode: u8) {}
    fn jump_points_changed(&mut self) {}

    /// Advisory only — the core never consults this to refuse a write.
    fn is_read_only(&self, _addr: u16, _len: u16) -> bool {
        false
    }

    /// Advisory only — used by observers deciding what to redraw.
    fn is_screen(&self, _addr: u16, _len: u16) -> bool {
        false
    }
}

/// An observer that ignores everything. The default for a `Cpu` built
/// without a host attached.
pub struct NullObserver;

impl Observer for NullObserver {}

#[cfg(test)]
mod test {
    use super::*;

    struct Counter {
        ticks: u32,
    }

    impl Observer for Counter {
        fn tick(&mut self, _cycles: u8) {
            self.ticks += 1;
        }
    }

    #[test]
    fn null_observer_accepts_every_call() {
        let mut obs = NullObserver;
        obs.register_changed(Reg::A);
        obs.tick(2);
        obs.handle_break();
        assert!(!obs.is_read_only(0, 1));
    }

    #[test]
    fn custom_observer_overrides_selectively() {
        let mut obs = Counter { ticks: 0 };
        obs.tick(7);
        obs.flags_changed();
        assert_eq!(obs.ticks, 1);
    }
}
