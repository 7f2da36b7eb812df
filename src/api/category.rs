//! Profile categories.

use std::fmt;
use std::str::FromStr;

use crate::error::ProxyError;

/// Class of a slicer profile. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileCategory {
    Printer,
    Process,
    Filament,
}

impl ProfileCategory {
    pub const ALL: [ProfileCategory; 3] = [
        ProfileCategory::Printer,
        ProfileCategory::Process,
        ProfileCategory::Filament,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileCategory::Printer => "printer",
            ProfileCategory::Process => "process",
            ProfileCategory::Filament => "filament",
        }
    }

    /// Valid names, sorted alphabetically and comma-separated.
    pub fn valid_names() -> String {
        let mut names = Self::ALL.map(Self::as_str);
        names.sort_unstable();
        names.join(", ")
    }
}

impl fmt::Display for ProfileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileCategory {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ProxyError::InvalidCategory {
                given: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}
