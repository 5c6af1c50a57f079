use std::time::Duration;

use log::debug;

use crate::error::Error;
use crate::font::{C8_FONT, C8_FONT_BASE};
use crate::framebuffer::Framebuffer;

pub use crate::framebuffer::{C8_DISPLAY_HEIGHT, C8_DISPLAY_WIDTH};

pub const C8_MEMORY_SIZE: usize = 0x1000;
pub const C8_ROM_START: u16 = 0x200;
pub const C8_STACK_SIZE: usize = 100;
pub const C8_REGISTER_COUNT: usize = 0x10;
pub const C8_KEY_COUNT: usize = 0x10;
pub const C8_FLAG_REGISTER: usize = 0xf;
pub const C8_TIMER_HZ: u32 = 60;
pub const C8_TIMER_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / C8_TIMER_HZ as u64);

/// Everything a running program can observe.
///
/// The interpreter is the only thing that changes registers, memory, the
/// stack and the screen. A driver refreshes `keys` before each step and
/// calls [`Machine::tick_timers`] at [`C8_TIMER_HZ`].
#[derive(Debug, Clone)]
pub struct Machine {
    pub memory: [u8; C8_MEMORY_SIZE],
    pub v: [u8; C8_REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub stack: [u16; C8_STACK_SIZE],
    pub sp: usize, // next free slot, 0 when empty
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub framebuffer: Framebuffer,
    pub keys: [bool; C8_KEY_COUNT],
}

impl Machine {
    pub fn new() -> Self {
        let mut memory = [0x00; C8_MEMORY_SIZE];
        let font_start = C8_FONT_BASE as usize;
        memory[font_start..font_start + C8_FONT.len()].copy_from_slice(&C8_FONT);

        Self {
            memory,
            v: [0x00; C8_REGISTER_COUNT],
            i: 0x000,
            pc: C8_ROM_START,
            stack: [0x000; C8_STACK_SIZE],
            sp: 0,
            delay_timer: 0x00,
            sound_timer: 0x00,
            framebuffer: Framebuffer::new(),
            keys: [false; C8_KEY_COUNT],
        }
    }

    /// Fresh machine with `program` placed at the usual start address.
    pub fn with_program(program: &[u8]) -> Result<Self, Error> {
        let mut machine = Self::new();
        machine.load_program(program)?;
        Ok(machine)
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        self.load_program_at(program, C8_ROM_START)
    }

    /// Copies `program` into memory at `address` and points the program
    /// counter at it.
    pub fn load_program_at(&mut self, program: &[u8], address: u16) -> Result<(), Error> {
        let start = address as usize;
        if start > C8_MEMORY_SIZE {
            return Err(Error::LoadAddressOutOfBounds { address });
        }
        let max_size = C8_MEMORY_SIZE - start;
        if program.len() > max_size {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max_size,
            });
        }

        self.memory[start..start + program.len()].copy_from_slice(program);
        self.pc = address;
        debug!("loaded {} byte program at {:#06X}", program.len(), address);
        Ok(())
    }

    pub fn set_key(&mut self, k: usize, held: bool) {
        if k < C8_KEY_COUNT {
            self.keys[k] = held;
        }
    }

    /// Keys are numbered 0x0-0xF, anything above is never held.
    pub fn is_key_held(&self, k: u8) -> bool {
        self.keys.get(k as usize).copied().unwrap_or(false)
    }

    /// Lowest numbered key currently held down.
    pub fn held_key(&self) -> Option<u8> {
        self.keys.iter().position(|held| *held).map(|k| k as u8)
    }

    /// One 60Hz tick for both timers.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Runs one tick per whole timer period in `backlog` and leaves the
    /// remainder there for the next call. Returns the number of ticks.
    pub fn catch_up_timers(&mut self, backlog: &mut Duration) -> u32 {
        let mut ticks = 0;
        while *backlog >= C8_TIMER_PERIOD {
            self.tick_timers();
            *backlog -= C8_TIMER_PERIOD;
            ticks += 1;
        }
        ticks
    }

    pub fn is_tone_on(&self) -> bool {
        self.sound_timer != 0
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let machine = Machine::new();

        assert_eq!(machine.pc, 0x200);
        assert_eq!(machine.sp, 0);
        assert_eq!(machine.i, 0);
        assert_eq!(machine.v, [0; 16]);
        assert_eq!(machine.delay_timer, 0);
        assert_eq!(machine.sound_timer, 0);
        assert!(machine.framebuffer.is_blank());
        assert_eq!(machine.held_key(), None);
    }

    #[test]
    fn test_memory_zeroed_except_font() {
        let machine = Machine::new();

        assert_eq!(machine.memory[0x050..0x0a0], C8_FONT);
        assert!(machine.memory[..0x050].iter().all(|b| *b == 0));
        assert!(machine.memory[0x0a0..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_load_program() {
        let machine = Machine::with_program(&[0x00, 0xe0, 0x12, 0x00]).unwrap();

        assert_eq!(machine.memory[0x200..0x204], [0x00, 0xe0, 0x12, 0x00]);
        assert_eq!(machine.memory[0x204], 0x00);
        assert_eq!(machine.pc, 0x200);
    }

    #[test]
    fn test_load_program_at_address() {
        let mut machine = Machine::new();
        machine.load_program_at(&[0x60, 0x01], 0x600).unwrap();

        assert_eq!(machine.memory[0x600..0x602], [0x60, 0x01]);
        assert_eq!(machine.pc, 0x600);
    }

    #[test]
    fn test_load_program_filling_memory() {
        let rom = vec![0xaa; C8_MEMORY_SIZE - 0x200];
        let machine = Machine::with_program(&rom).unwrap();

        assert_eq!(machine.memory[C8_MEMORY_SIZE - 1], 0xaa);
    }

    #[test]
    fn test_load_program_too_large() {
        let rom = vec![0x00; C8_MEMORY_SIZE - 0x200 + 1];

        let err = Machine::with_program(&rom).unwrap_err();

        assert_eq!(err, Error::ProgramTooLarge { size: 0xe01, max_size: 0xe00 });
    }

    #[test]
    fn test_load_program_past_end_of_memory() {
        let mut machine = Machine::new();

        let err = machine.load_program_at(&[], 0x2000).unwrap_err();

        assert_eq!(err, Error::LoadAddressOutOfBounds { address: 0x2000 });
        assert_eq!(machine.pc, C8_ROM_START);
    }

    #[test]
    fn test_load_empty_program_at_end_of_memory() {
        let mut machine = Machine::new();

        machine.load_program_at(&[], 0x1000).unwrap();

        assert_eq!(machine.pc, 0x1000);
    }

    #[test]
    fn test_keys() {
        let mut machine = Machine::new();
        machine.set_key(0xc, true);
        machine.set_key(0x3, true);
        machine.set_key(0x10, true);

        assert!(machine.is_key_held(0x3));
        assert!(machine.is_key_held(0xc));
        assert!(!machine.is_key_held(0x4));
        assert!(!machine.is_key_held(0x10));
        assert_eq!(machine.held_key(), Some(0x3));

        machine.set_key(0x3, false);
        assert_eq!(machine.held_key(), Some(0xc));
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut machine = Machine::new();
        machine.delay_timer = 2;
        machine.sound_timer = 1;
        assert!(machine.is_tone_on());

        machine.tick_timers();
        assert_eq!(machine.delay_timer, 1);
        assert_eq!(machine.sound_timer, 0);
        assert!(!machine.is_tone_on());

        machine.tick_timers();
        machine.tick_timers();
        assert_eq!(machine.delay_timer, 0);
        assert_eq!(machine.sound_timer, 0);
    }

    #[test]
    fn test_catch_up_timers() {
        let mut machine = Machine::new();
        machine.delay_timer = 0xff;

        let mut backlog = Duration::from_millis(10);
        assert_eq!(machine.catch_up_timers(&mut backlog), 0);
        assert_eq!(backlog, Duration::from_millis(10));

        let mut backlog = Duration::from_secs(1) / C8_TIMER_HZ;
        assert_eq!(machine.catch_up_timers(&mut backlog), 1);
        assert_eq!(backlog, Duration::ZERO);
        assert_eq!(machine.delay_timer, 0xfe);

        let mut backlog = Duration::from_secs(1);
        assert_eq!(machine.catch_up_timers(&mut backlog), 60);
        assert!(backlog < C8_TIMER_PERIOD);
        assert_eq!(machine.delay_timer, 0xfe - 60);
    }

    #[test]
    fn test_catch_up_timers_keeps_remainder() {
        let mut machine = Machine::new();
        machine.sound_timer = 10;
        let mut backlog = Duration::ZERO;

        for _ in 0..3 {
            backlog += Duration::from_millis(10);
            machine.catch_up_timers(&mut backlog);
        }

        assert_eq!(machine.sound_timer, 9);
        assert_eq!(backlog, Duration::from_millis(30) - C8_TIMER_PERIOD);
    }
}
