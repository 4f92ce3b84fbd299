use thiserror::Error;

#[derive(Debug, Error)]
pub enum VmError {
    #[error("failed to load image `{path}`: {source}")]
    ImageLoad {
        path: String,
        source: std::io::Error,
    },

    #[error("register index out of bound: {0}")]
    BadRegister(u16),

    #[error("wrong condition flag `{0}`")]
    BadFlag(u16),

    #[error("unknown opcode `{0}`")]
    UnknownOpcode(u16),

    #[error("RTI executed outside a trap context")]
    PrivilegedOpcode,

    #[error("reserved opcode executed")]
    ReservedOpcode,

    #[error("unknown trap vector x{0:02X}")]
    UnknownTrap(u16),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
