use std::fmt;

use serde::{Deserialize, Serialize};

/// A language content can be sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Cy,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => f.write_str("en"),
            Language::Cy => f.write_str("cy"),
        }
    }
}

/// How an actor is contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Online,
    Paper,
}

impl Channel {
    pub fn is_paper(self) -> bool {
        self == Channel::Paper
    }
}
