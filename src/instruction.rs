/// A raw instruction word split into the fields every instruction draws
/// its operands from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub word: u16,
    pub group: u8,
    pub x: usize,
    pub y: usize,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl From<u16> for Opcode {
    fn from(word: u16) -> Self {
        Self {
            word,
            group: ((word & 0xf000) >> 12) as u8,
            x: ((word & 0x0f00) >> 8) as usize,
            y: ((word & 0x00f0) >> 4) as usize,
            n: (word & 0x000f) as u8,
            nn: (word & 0x00ff) as u8,
            nnn: word & 0x0fff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SkipIfEqual { x: usize, nn: u8 },
    /// 4XNN
    SkipIfNotEqual { x: usize, nn: u8 },
    /// 5XY0
    SkipIfRegistersEqual { x: usize, y: usize },
    /// 9XY0
    SkipIfRegistersNotEqual { x: usize, y: usize },
    /// 6XNN
    Load { x: usize, nn: u8 },
    /// 7XNN, no carry
    AddImmediate { x: usize, nn: u8 },
    /// 8XY0
    Copy { x: usize, y: usize },
    /// 8XY1
    Or { x: usize, y: usize },
    /// 8XY2
    And { x: usize, y: usize },
    /// 8XY3
    Xor { x: usize, y: usize },
    /// 8XY4, VF = carry
    Add { x: usize, y: usize },
    /// 8XY5, VF = no borrow
    Sub { x: usize, y: usize },
    /// 8XY6, VF = bit shifted out
    ShiftRight { x: usize },
    /// 8XY7, VF = no borrow
    SubReversed { x: usize, y: usize },
    /// 8XYE, VF = bit shifted out
    ShiftLeft { x: usize },
    /// ANNN
    SetIndex { nnn: u16 },
    /// BNNN
    JumpOffset { x: usize, nnn: u16 },
    /// CXNN
    Random { x: usize, nn: u8 },
    /// DXYN
    Draw { x: usize, y: usize, n: u8 },
    /// EX9E
    SkipIfKeyDown { x: usize },
    /// EXA1
    SkipIfKeyUp { x: usize },
    /// FX07
    ReadDelay { x: usize },
    /// FX0A
    WaitKey { x: usize },
    /// FX15
    SetDelay { x: usize },
    /// FX18
    SetSound { x: usize },
    /// FX1E
    AddIndex { x: usize },
    /// FX29
    LoadGlyph { x: usize },
    /// FX33
    StoreBcd { x: usize },
    /// FX55
    StoreRegisters { x: usize },
    /// FX65
    LoadRegisters { x: usize },
}

impl Opcode {
    /// Maps the fields onto an instruction, `None` if the word is not a
    /// valid one.
    pub fn decode(&self) -> Option<Instruction> {
        let Opcode { x, y, n, nn, nnn, .. } = *self;

        let instruction = match (self.group, n) {
            (0x0, _) => match nnn {
                0x0e0 => Instruction::ClearScreen,
                0x0ee => Instruction::Return,
                _ => return None,
            },
            (0x1, _) => Instruction::Jump { nnn },
            (0x2, _) => Instruction::Call { nnn },
            (0x3, _) => Instruction::SkipIfEqual { x, nn },
            (0x4, _) => Instruction::SkipIfNotEqual { x, nn },
            (0x5, 0x0) => Instruction::SkipIfRegistersEqual { x, y },
            (0x6, _) => Instruction::Load { x, nn },
            (0x7, _) => Instruction::AddImmediate { x, nn },
            (0x8, 0x0) => Instruction::Copy { x, y },
            (0x8, 0x1) => Instruction::Or { x, y },
            (0x8, 0x2) => Instruction::And { x, y },
            (0x8, 0x3) => Instruction::Xor { x, y },
            (0x8, 0x4) => Instruction::Add { x, y },
            (0x8, 0x5) => Instruction::Sub { x, y },
            (0x8, 0x6) => Instruction::ShiftRight { x },
            (0x8, 0x7) => Instruction::SubReversed { x, y },
            (0x8, 0xe) => Instruction::ShiftLeft { x },
            (0x9, 0x0) => Instruction::SkipIfRegistersNotEqual { x, y },
            (0xa, _) => Instruction::SetIndex { nnn },
            (0xb, _) => Instruction::JumpOffset { x, nnn },
            (0xc, _) => Instruction::Random { x, nn },
            (0xd, _) => Instruction::Draw { x, y, n },
            (0xe, _) => match nn {
                0x9e => Instruction::SkipIfKeyDown { x },
                0xa1 => Instruction::SkipIfKeyUp { x },
                _ => return None,
            },
            (0xf, _) => match nn {
                0x07 => Instruction::ReadDelay { x },
                0x0a => Instruction::WaitKey { x },
                0x15 => Instruction::SetDelay { x },
                0x18 => Instruction::SetSound { x },
                0x1e => Instruction::AddIndex { x },
                0x29 => Instruction::LoadGlyph { x },
                0x33 => Instruction::StoreBcd { x },
                0x55 => Instruction::StoreRegisters { x },
                0x65 => Instruction::LoadRegisters { x },
                _ => return None,
            },
            _ => return None,
        };
        Some(instruction)
    }
}
