use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role stored on every user row. Signup always creates attendees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[default]
    Attendee,
    Host,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attendee => "Attendee",
            Self::Host => "Host",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Attendee" => Ok(Self::Attendee),
            "Host" => Ok(Self::Host),
            other => Err(format!("unknown user type: {other}")),
        }
    }
}

// -- Session --

/// Claims carried by the signed session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub name: String,
    pub email: String,
    pub exp: usize,
}
