#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate byteorder;
extern crate libc;
#[macro_use]
extern crate log;

pub mod core;

#[cfg(target_os = "linux")]
pub mod linux;

#[derive(Debug)]
pub enum Error {
    /// Indicates an error where an address or account could not be resolved.
    Address,
    /// Indicates an error where a device is temporarily unable to transmit.
    Busy,
    /// Indicates an error where a buffer or field capacity was exceeded.
    Exhausted,
    /// Indicates an error where a frame or configuration line is malformed.
    Malformed,
    /// Indicates a situation where no data was available.
    Nothing,
    /// Indicates a generic IO error.
    IO(std::io::Error),
}

impl Error {
    /// Returns the process exit code for a fatal error, derived from the
    /// OS errno where one exists.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Error::IO(ref err) => err.raw_os_error().unwrap_or(1),
            _ => 1,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IO(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
