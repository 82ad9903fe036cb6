use alloc::{format, string::String};
use serde::{Deserialize, Serialize};

/// Acceptable schema for score submissions.
#[derive(Debug, Deserialize, Serialize)]
pub struct Score {
    /// Display name of the player. Matched case-sensitively.
    pub user: String,
    /// Any JSON number is accepted, including negative ones.
    pub score: f64,
}

/// A user row created on the first score submission of an unseen name.
#[derive(Debug, PartialEq, Eq)]
pub struct NewUser<'name> {
    pub name: &'name str,
    pub email: String,
    pub password: &'static str,
    pub phone: &'static str,
}

impl<'name> NewUser<'name> {
    pub const PASSWORD: &'static str = "123";
    pub const PHONE: &'static str = "00000000000";

    /// Fills in the contact fields with placeholders derived from the name.
    pub fn placeholder(name: &'name str) -> Self {
        Self { name, email: format!("{name}@exemplo.com"), password: Self::PASSWORD, phone: Self::PHONE }
    }
}
