use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Garage,
    Winners,
    NotFound,
}

impl Route {
    /// Parses `location.hash`, with or without the leading `#`.
    pub fn from_hash(hash: &str) -> Self {
        let path = hash.trim_start_matches('#').trim_end_matches('/');
        match path {
            "" | "/garage" | "garage" => Route::Garage,
            "/winners" | "winners" => Route::Winners,
            _ => Route::NotFound,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Garage => "/garage",
            Route::Winners => "/winners",
            Route::NotFound => "/404",
        }
    }
}
