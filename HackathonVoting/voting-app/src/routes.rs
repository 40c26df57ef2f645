use std::fmt;

use crate::types::Address;

pub const PROJECT_PREFIX: &str = "/project/";

/// Presentation routes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/project/{creator}`; the creator is kept as typed so an
    /// unparsable address still reaches the not-found screen
    Detail { creator: String },
}

impl Route {
    pub fn detail(creator: &Address) -> Self {
        Route::Detail {
            creator: creator.to_string(),
        }
    }

    /// Unknown paths fall back to the list
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');

        match path.strip_prefix(PROJECT_PREFIX) {
            Some(creator) if !creator.is_empty() && !creator.contains('/') => Route::Detail {
                creator: creator.to_string(),
            },
            _ => Route::List,
        }
    }

    pub fn creator(&self) -> Option<Address> {
        match self {
            Route::Detail { creator } => creator.parse().ok(),
            Route::List => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => f.write_str("/"),
            Route::Detail { creator } => write!(f, "{}{}", PROJECT_PREFIX, creator),
        }
    }
}
