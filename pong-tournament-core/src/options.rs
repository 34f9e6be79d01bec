//! # Engine Options
//!
//! The [`BracketEngine`] accepts a small set of options that change how the bracket is seeded
//! and how a tied score is treated. The defaults are a uniformly shuffled seeding and rejecting
//! ties.
//!
//! [`BracketEngine`]: crate::BracketEngine
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {key}: expected one of {expected}")]
pub struct ParseOptionError {
    key: &'static str,
    value: String,
    expected: &'static str,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineOptions {
    pub seeding: Seeding,
    pub tie_policy: TiePolicy,
}

impl EngineOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    #[inline]
    pub fn tie_policy(mut self, tie_policy: TiePolicy) -> Self {
        self.tie_policy = tie_policy;
        self
    }
}

/// How entrants are placed into the first round.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Seeding {
    /// A uniform random permutation of the entrants.
    #[default]
    Shuffle,
    /// Seeds follow the registration order.
    Registration,
}

impl Display for Seeding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shuffle => "shuffle",
            Self::Registration => "registration",
        })
    }
}

impl FromStr for Seeding {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shuffle" => Ok(Self::Shuffle),
            "registration" => Ok(Self::Registration),
            _ => Err(ParseOptionError {
                key: "seeding",
                value: s.to_owned(),
                expected: "shuffle, registration",
            }),
        }
    }
}

/// What happens when a result is reported with equal scores.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TiePolicy {
    /// The result is rejected with [`Error::Tie`].
    ///
    /// [`Error::Tie`]: crate::Error::Tie
    #[default]
    Reject,
    /// The second player is awarded the win.
    SecondPlayer,
}

impl Display for TiePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reject => "reject",
            Self::SecondPlayer => "second_player",
        })
    }
}

impl FromStr for TiePolicy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "second_player" => Ok(Self::SecondPlayer),
            _ => Err(ParseOptionError {
                key: "tie_policy",
                value: s.to_owned(),
                expected: "reject, second_player",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineOptions, Seeding, TiePolicy};

    #[test]
    fn test_engine_options_default() {
        let options = EngineOptions::default();
        assert_eq!(options.seeding, Seeding::Shuffle);
        assert_eq!(options.tie_policy, TiePolicy::Reject);

        let options = EngineOptions::new()
            .seeding(Seeding::Registration)
            .tie_policy(TiePolicy::SecondPlayer);
        assert_eq!(options.seeding, Seeding::Registration);
        assert_eq!(options.tie_policy, TiePolicy::SecondPlayer);
    }

    #[test]
    fn test_options_parse() {
        for seeding in [Seeding::Shuffle, Seeding::Registration] {
            assert_eq!(seeding.to_string().parse::<Seeding>().unwrap(), seeding);
        }

        for policy in [TiePolicy::Reject, TiePolicy::SecondPlayer] {
            assert_eq!(policy.to_string().parse::<TiePolicy>().unwrap(), policy);
        }

        let err = "random".parse::<Seeding>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value \"random\" for seeding: expected one of shuffle, registration"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_options_serde() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(
            &Seeding::Registration,
            &[Token::UnitVariant {
                name: "Seeding",
                variant: "registration",
            }],
        );
        assert_tokens(
            &TiePolicy::SecondPlayer,
            &[Token::UnitVariant {
                name: "TiePolicy",
                variant: "second_player",
            }],
        );
    }
}
