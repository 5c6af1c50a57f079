// CHIP-8 virtual machine core based on:
// - RCA COSMAC VIP CDP18S711 Instruction Manual
// - https://github.com/mattmikolay/chip-8/wiki/CHIP%E2%80%908-Instruction-Set
// - http://devernay.free.fr/hacks/chip8/C8TECH10.HTM
//
// The crate only knows about machine state and how to run one instruction
// against it. Windows, keyboards, ROM files and pacing live in the driver.

pub mod error;
pub mod font;
pub mod framebuffer;
pub mod instruction;
pub mod interpreter;
pub mod machine;

pub use error::Error;
pub use framebuffer::Framebuffer;
pub use instruction::{Instruction, Opcode};
pub use interpreter::Interpreter;
pub use machine::*;
