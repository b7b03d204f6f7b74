use alloc::string::String;
use core::fmt;

#[cfg(feature = "std")]
use std::io;

#[derive(Debug)]
pub enum Error {
    Validation(String),
    Format(String),
    #[cfg(feature = "std")]
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
            Error::Format(msg) => write!(f, "Format error: {}", msg),
            #[cfg(feature = "std")]
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
