use std::ops::Range;

use log::{debug, trace};

use crate::error::Error;
use crate::font::glyph_address;
use crate::framebuffer::{C8_DISPLAY_HEIGHT, C8_DISPLAY_WIDTH};
use crate::instruction::{Instruction, Opcode};
use crate::machine::{Machine, C8_FLAG_REGISTER, C8_MEMORY_SIZE, C8_STACK_SIZE};

const VF: usize = C8_FLAG_REGISTER;

/// Runs instructions against a [`Machine`], one per [`Interpreter::step`].
pub struct Interpreter {
    get_random: fn() -> u8,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_random(|| -> u8 { rand::random::<u8>() })
    }

    /// Interpreter drawing `CXNN` bytes from `get_random`.
    pub fn with_random(get_random: fn() -> u8) -> Self {
        Self { get_random }
    }

    /// Fetches, decodes and executes the instruction at the program counter.
    ///
    /// Returns whether the framebuffer was touched, so the caller knows when
    /// to redraw. Errors are fatal. A faulting instruction changes nothing
    /// but the program counter, which has already moved past it unless the
    /// fetch itself failed.
    pub fn step(&mut self, machine: &mut Machine) -> Result<bool, Error> {
        let pc = machine.pc;
        let word = fetch(machine)?;
        machine.pc = pc + 2;

        let opcode = Opcode::from(word);
        let instruction = match opcode.decode() {
            Some(instruction) => instruction,
            None => return Err(Error::UnknownInstruction { instruction: word, pc }),
        };
        trace!("{:#06X}: {:04X} {:?}", pc, word, instruction);

        self.execute(machine, instruction, word, pc)
    }

    fn execute(
        &mut self,
        machine: &mut Machine,
        instruction: Instruction,
        word: u16,
        pc: u16,
    ) -> Result<bool, Error> {
        let v = &mut machine.v;

        match instruction {
            Instruction::ClearScreen => {
                machine.framebuffer.clear();
                return Ok(true);
            }
            Instruction::Return => {
                if machine.sp == 0 {
                    return Err(Error::StackUnderflow { instruction: word, pc });
                }
                machine.sp -= 1;
                machine.pc = machine.stack[machine.sp];
                debug!("return to {:#06X}, depth {}", machine.pc, machine.sp);
            }
            Instruction::Jump { nnn } => machine.pc = nnn,
            Instruction::Call { nnn } => {
                if machine.sp == C8_STACK_SIZE {
                    return Err(Error::StackOverflow { instruction: word, pc });
                }
                machine.stack[machine.sp] = machine.pc;
                machine.sp += 1;
                machine.pc = nnn;
                debug!("call {:#06X}, depth {}", nnn, machine.sp);
            }
            Instruction::SkipIfEqual { x, nn } => {
                if v[x] == nn {
                    machine.pc += 2;
                }
            }
            Instruction::SkipIfNotEqual { x, nn } => {
                if v[x] != nn {
                    machine.pc += 2;
                }
            }
            Instruction::SkipIfRegistersEqual { x, y } => {
                if v[x] == v[y] {
                    machine.pc += 2;
                }
            }
            Instruction::SkipIfRegistersNotEqual { x, y } => {
                if v[x] != v[y] {
                    machine.pc += 2;
                }
            }
            Instruction::Load { x, nn } => v[x] = nn,
            Instruction::AddImmediate { x, nn } => v[x] = v[x].wrapping_add(nn),
            Instruction::Copy { x, y } => v[x] = v[y],
            Instruction::Or { x, y } => v[x] |= v[y],
            Instruction::And { x, y } => v[x] &= v[y],
            Instruction::Xor { x, y } => v[x] ^= v[y],
            // The flag goes in first, so with X = F the result overwrites it.
            Instruction::Add { x, y } => {
                let (sum, carry) = v[x].overflowing_add(v[y]);
                v[VF] = carry as u8;
                v[x] = sum;
            }
            Instruction::Sub { x, y } => {
                let difference = v[x].wrapping_sub(v[y]);
                v[VF] = (v[x] > v[y]) as u8;
                v[x] = difference;
            }
            Instruction::ShiftRight { x } => {
                let shifted = v[x] >> 1;
                v[VF] = v[x] & 0x01;
                v[x] = shifted;
            }
            Instruction::SubReversed { x, y } => {
                let difference = v[y].wrapping_sub(v[x]);
                v[VF] = (v[y] > v[x]) as u8;
                v[x] = difference;
            }
            Instruction::ShiftLeft { x } => {
                let shifted = v[x] << 1;
                v[VF] = (v[x] & 0x80) >> 7;
                v[x] = shifted;
            }
            Instruction::SetIndex { nnn } => machine.i = nnn,
            Instruction::JumpOffset { x, nnn } => machine.pc = v[x] as u16 + nnn,
            Instruction::Random { x, nn } => v[x] = (self.get_random)() & nn,
            Instruction::Draw { x, y, n } => {
                draw(machine, x, y, n, word, pc)?;
                return Ok(true);
            }
            Instruction::SkipIfKeyDown { x } => {
                let k = v[x];
                if machine.is_key_held(k) {
                    machine.pc += 2;
                }
            }
            Instruction::SkipIfKeyUp { x } => {
                let k = v[x];
                if !machine.is_key_held(k) {
                    machine.pc += 2;
                }
            }
            Instruction::ReadDelay { x } => v[x] = machine.delay_timer,
            Instruction::WaitKey { x } => match machine.held_key() {
                Some(k) => machine.v[x] = k,
                None => {
                    // Run this instruction again on the next step
                    machine.pc = pc;
                    debug!("waiting for key at {:#06X}", pc);
                }
            },
            Instruction::SetDelay { x } => machine.delay_timer = v[x],
            Instruction::SetSound { x } => machine.sound_timer = v[x],
            Instruction::AddIndex { x } => {
                let addend = v[x] as u16;
                let sum = machine.i.wrapping_add(addend);
                v[VF] = (sum < addend) as u8;
                machine.i = sum;
            }
            Instruction::LoadGlyph { x } => machine.i = glyph_address(v[x]),
            Instruction::StoreBcd { x } => {
                let range = memory_range(machine.i, 3, word, pc)?;
                let value = machine.v[x];
                machine.memory[range].copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
            }
            Instruction::StoreRegisters { x } => {
                let range = memory_range(machine.i, x + 1, word, pc)?;
                machine.memory[range].copy_from_slice(&machine.v[..=x]);
            }
            Instruction::LoadRegisters { x } => {
                let range = memory_range(machine.i, x + 1, word, pc)?;
                machine.v[..=x].copy_from_slice(&machine.memory[range]);
            }
        }
        Ok(false)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch(machine: &Machine) -> Result<u16, Error> {
    let pc = machine.pc;
    let at = pc as usize;
    if at + 1 >= C8_MEMORY_SIZE {
        return Err(Error::FetchOutOfBounds { pc });
    }
    Ok(u16::from_be_bytes([machine.memory[at], machine.memory[at + 1]]))
}

fn memory_range(address: u16, len: usize, instruction: u16, pc: u16) -> Result<Range<usize>, Error> {
    let start = address as usize;
    let end = start + len;
    if end > C8_MEMORY_SIZE {
        return Err(Error::MemoryOutOfBounds {
            address: start.max(C8_MEMORY_SIZE),
            instruction,
            pc,
        });
    }
    Ok(start..end)
}

/// XORs an `n` row sprite from memory at I onto the screen. The origin wraps
/// around the screen, the sprite itself is clipped at the right and bottom
/// edges. VF ends up 1 if any lit pixel was switched off.
fn draw(machine: &mut Machine, x: usize, y: usize, n: u8, word: u16, pc: u16) -> Result<(), Error> {
    let origin_x = machine.v[x] as usize % C8_DISPLAY_WIDTH;
    let origin_y = machine.v[y] as usize % C8_DISPLAY_HEIGHT;

    let rows = (n as usize).min(C8_DISPLAY_HEIGHT - origin_y);
    let columns = 8.min(C8_DISPLAY_WIDTH - origin_x);
    // A zero row sprite reads nothing, so I may point anywhere.
    let sprite = match rows {
        0 => 0..0,
        _ => memory_range(machine.i, rows, word, pc)?,
    };
    machine.v[VF] = 0;

    let mut collision = false;
    for (row, byte) in machine.memory[sprite].iter().enumerate() {
        for column in 0..columns {
            let bit = (byte >> (7 - column)) & 0x01 != 0;
            collision |= machine
                .framebuffer
                .toggle(origin_x + column, origin_y + row, bit);
        }
    }
    if collision {
        machine.v[VF] = 1;
    }
    Ok(())
}
