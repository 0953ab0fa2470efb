//! Whitespace-injection labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// What to inject between two real tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WsCategory {
    /// Tokens abut
    None,
    /// A single space
    Space,
    /// A newline followed by indentation
    Newline,
}

impl WsCategory {
    pub const ALL: [WsCategory; 3] = [WsCategory::None, WsCategory::Space, WsCategory::Newline];

    pub fn as_str(self) -> &'static str {
        match self {
            WsCategory::None => "none",
            WsCategory::Space => "space",
            WsCategory::Newline => "newline",
        }
    }
}

impl fmt::Display for WsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A whitespace category plus, for newlines, the alignment to apply
///
/// The alignment is an indent delta: the column of the token starting the
/// new line minus the indentation of the line holding the previous token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Label {
    pub category: WsCategory,
    #[serde(default)]
    pub alignment: Option<i32>,
}

impl Label {
    #[inline]
    pub const fn none() -> Self {
        Self {
            category: WsCategory::None,
            alignment: None,
        }
    }

    #[inline]
    pub const fn space() -> Self {
        Self {
            category: WsCategory::Space,
            alignment: None,
        }
    }

    #[inline]
    pub const fn newline(alignment: i32) -> Self {
        Self {
            category: WsCategory::Newline,
            alignment: Some(alignment),
        }
    }

    #[inline]
    pub fn is_newline(&self) -> bool {
        self.category == WsCategory::Newline
    }

    /// Alignment is only meaningful for newlines; other categories report 0.
    #[inline]
    pub fn alignment_or_zero(&self) -> i32 {
        self.alignment.unwrap_or(0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alignment {
            Some(delta) => write!(f, "{}({:+})", self.category, delta),
            None => write!(f, "{}", self.category),
        }
    }
}
