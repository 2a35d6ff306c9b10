use core::fmt::{self, Display};
use engine::StoreError;

#[derive(Debug)]
pub enum Error {
    /// A value does not fit the column it is stored in.
    BadInput,
    /// A row does not match the expected schema.
    Schema,
    /// Unrecoverable error.
    Fatal,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BadInput => "value out of range for its column",
            Self::Schema => "row does not match the expected schema",
            Self::Fatal => "database request failed",
        })
    }
}

impl std::error::Error for Error {}

impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        log::error!("postgres: {err}");
        Self::Fatal
    }
}

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        match err {
            Error::BadInput | Error::Schema => Self::Corrupt,
            Error::Fatal => Self::Unreachable,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
