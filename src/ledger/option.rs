//! Vote options.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The accepted option set. Raw codes are `Yes = 1`, `No = 2`, `Abstain = 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOption {
    Yes = 1,
    No = 2,
    Abstain = 3,
}

impl VoteOption {
    /// All options in code order.
    pub const ALL: [VoteOption; 3] = [VoteOption::Yes, VoteOption::No, VoteOption::Abstain];

    /// Raw option code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for VoteOption {
    type Error = RegistryError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(VoteOption::Yes),
            2 => Ok(VoteOption::No),
            3 => Ok(VoteOption::Abstain),
            _ => Err(RegistryError::InvalidOption { code }),
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VoteOption::Yes => "yes",
            VoteOption::No => "no",
            VoteOption::Abstain => "abstain",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_map_to_options() {
        for option in VoteOption::ALL {
            assert_eq!(VoteOption::try_from(option.code()).unwrap(), option);
        }
    }

    #[test]
    fn test_out_of_range_codes_rejected() {
        for code in [0u8, 4, 200, u8::MAX] {
            assert_eq!(
                VoteOption::try_from(code),
                Err(RegistryError::InvalidOption { code })
            );
        }
    }
}
