use core::fmt;

/// Failure kinds shared by every kernel subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A fixed-capacity buffer or table would overflow
    CapacityExceeded,
    /// A keystroke arrived while no line edit was open
    InputClosed,
    /// Terminal buffers only carry ASCII
    NotAscii,
    /// Empty or over-long program / share name
    InvalidName,
    RegistryFull,
    ShareTableFull,
    /// The shared arena has no room left for the requested block
    OutOfMemory,
    /// Zero-sized arena request
    EmptyInput,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::CapacityExceeded => "buffer capacity exceeded",
            Error::InputClosed => "no line edit is open",
            Error::NotAscii => "non-ASCII data",
            Error::InvalidName => "invalid name",
            Error::RegistryFull => "program registry is full",
            Error::ShareTableFull => "share table is full",
            Error::OutOfMemory => "out of memory",
            Error::EmptyInput => "empty request",
        };
        f.write_str(msg)
    }
}
