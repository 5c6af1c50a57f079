use thiserror::Error;

/// Faults that halt the machine. `pc` is always the address the faulting
/// instruction was fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("instruction fetch out of bounds at {pc:#06X}")]
    FetchOutOfBounds { pc: u16 },

    #[error("unknown instruction {instruction:#06X} at {pc:#06X}")]
    UnknownInstruction { instruction: u16, pc: u16 },

    #[error("return with empty call stack, instruction {instruction:#06X} at {pc:#06X}")]
    StackUnderflow { instruction: u16, pc: u16 },

    #[error("call stack overflow, instruction {instruction:#06X} at {pc:#06X}")]
    StackOverflow { instruction: u16, pc: u16 },

    #[error("memory access out of bounds at {address:#06X}, instruction {instruction:#06X} at {pc:#06X}")]
    MemoryOutOfBounds { address: usize, instruction: u16, pc: u16 },

    #[error("program is too large ({size} bytes), at most {max_size} bytes fit")]
    ProgramTooLarge { size: usize, max_size: usize },

    #[error("load address {address:#06X} is past the end of memory")]
    LoadAddressOutOfBounds { address: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = Error::UnknownInstruction { instruction: 0x5121, pc: 0x204 };
        assert_eq!(err.to_string(), "unknown instruction 0x5121 at 0x0204");

        let err = Error::ProgramTooLarge { size: 4000, max_size: 3584 };
        assert_eq!(err.to_string(), "program is too large (4000 bytes), at most 3584 bytes fit");

        let err = Error::LoadAddressOutOfBounds { address: 0x2000 };
        assert_eq!(err.to_string(), "load address 0x2000 is past the end of memory");
    }
}
