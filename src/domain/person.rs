use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::BillError;

/// One of the two fixed parties sharing every bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Person {
    Ire,
    Ebe,
}

impl Person {
    pub const BOTH: [Person; 2] = [Person::Ire, Person::Ebe];

    pub fn label(self) -> &'static str {
        match self {
            Person::Ire => "Ire",
            Person::Ebe => "Ebe",
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Person {
    type Err = BillError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ire" => Ok(Person::Ire),
            "ebe" => Ok(Person::Ebe),
            other => Err(BillError::InvalidInput(format!(
                "unknown person `{other}` (expected ire or ebe)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("IRE".parse::<Person>().unwrap(), Person::Ire);
        assert_eq!(" ebe ".parse::<Person>().unwrap(), Person::Ebe);
        assert!("bob".parse::<Person>().is_err());
    }
}
