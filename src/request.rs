// src/request.rs
use std::fmt;

use crate::error::RequestError;

/// Whose data to fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    User(u64),
    AllUsers,
}

impl Target {
    /// CLI spelling: `all` or a positive integer id.
    pub fn parse(s: &str) -> Result<Self, RequestError> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Target::AllUsers);
        }
        match s.parse::<u64>() {
            Ok(id) if id >= 1 => Ok(Target::User(id)),
            _ => Err(RequestError::InvalidTarget(s!(s))),
        }
    }

    /// Filename prefix: `user_42` or `all_users`.
    pub fn stem(&self) -> String {
        match self {
            Target::User(id) => format!("user_{id}"),
            Target::AllUsers => s!("all_users"),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::User(id) => write!(f, "user {id}"),
            Target::AllUsers => f.write_str("all users"),
        }
    }
}

/// A validated fetch: at least one field, non-empty token.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchRequest {
    target: Target,
    fields: Vec<String>,
    token: String,
}

// Hand-written so the token never lands in logs.
impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("target", &self.target)
            .field("fields", &self.fields)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl FetchRequest {
    /// Field names are trimmed, blanks dropped, duplicates removed (first wins).
    pub fn new<I, S>(target: Target, fields: I, token: &str) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let token = token.trim();
        if token.is_empty() {
            return Err(RequestError::MissingToken);
        }

        let mut deduped: Vec<String> = Vec::new();
        for f in fields {
            let f = f.as_ref().trim();
            if f.is_empty() || deduped.iter().any(|d| d == f) {
                continue;
            }
            deduped.push(s!(f));
        }
        if deduped.is_empty() {
            return Err(RequestError::NoFields);
        }

        Ok(Self { target, fields: deduped, token: s!(token) })
    }

    pub fn target(&self) -> Target { self.target }
    pub fn fields(&self) -> &[String] { &self.fields }
    pub fn token(&self) -> &str { &self.token }

    /// Wire format of the `fetch` form parameter.
    pub fn fetch_param(&self) -> String {
        self.fields.join(",")
    }

    /// Form body, minus the token (that goes in the query string).
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        match self.target {
            Target::User(id) => pairs.push(("user_id", id.to_string())),
            Target::AllUsers => pairs.push(("all_users", s!("1"))),
        }
        pairs.push(("fetch", self.fetch_param()));
        pairs
    }
}
