//! HTTP method as a typed enum.
//!
//! Only the two methods the router distinguishes are modelled. Any other
//! method string still parses as a request; it simply never matches a
//! method-specific route.

use std::str::FromStr;

/// A method the router knows how to dispatch on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Get,
    Post,
}

/// Parses an uppercase method string. Case-sensitive per RFC 9110 §9.1.
impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET"  => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _      => Err(()),
        }
    }
}
