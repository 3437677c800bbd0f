//! HTTP status codes as a typed enum.
//!
//! petit only ever answers with three statuses. Anything else a handler might
//! want to say is folded into one of these.
//!
//! ```rust
//! use petit::{Response, Status};
//!
//! Response::status(Status::Created);
//! assert_eq!(Status::NotFound.to_string(), "404 Not Found");
//! ```

use std::fmt;

/// The statuses petit emits.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Status {
    Ok,       // 200
    Created,  // 201
    NotFound, // 404
}

impl Status {
    /// Numeric status code.
    pub fn code(self) -> u16 {
        self.into()
    }

    /// Canonical reason phrase, as written on the status line.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok       => "OK",
            Self::Created  => "Created",
            Self::NotFound => "Not Found",
        }
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok       => 200,
            Status::Created  => 201,
            Status::NotFound => 404,
        }
    }
}

/// `"200 OK"`, `"404 Not Found"`: the part of the status line after the version.
impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}
