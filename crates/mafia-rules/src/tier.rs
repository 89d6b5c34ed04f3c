//! Attack and defense tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Strength of an attack or a defense.
///
/// Tiers are totally ordered: `None < Basic < Powerful < Unstoppable`.
/// An attack lands only if it is strictly stronger than the defense it
/// meets; equal tiers favour the defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Tier {
    #[default]
    None,
    Basic,
    Powerful,
    Unstoppable,
}

impl Tier {
    /// Returns `true` if an attack of tier `self` kills through `defense`.
    pub fn pierces(self, defense: Tier) -> bool {
        self > defense
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Basic => write!(f, "basic"),
            Self::Powerful => write!(f, "powerful"),
            Self::Unstoppable => write!(f, "unstoppable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Tier; 4] = [Tier::None, Tier::Basic, Tier::Powerful, Tier::Unstoppable];

    #[test]
    fn test_attack_lands_iff_strictly_greater() {
        for attack in ALL {
            for defense in ALL {
                assert_eq!(
                    attack.pierces(defense),
                    attack > defense,
                    "{attack} vs {defense}"
                );
            }
        }
    }

    #[test]
    fn test_equal_tiers_never_kill() {
        for tier in ALL {
            assert!(!tier.pierces(tier));
        }
    }

    #[test]
    fn test_order_is_total() {
        assert!(Tier::None < Tier::Basic);
        assert!(Tier::Basic < Tier::Powerful);
        assert!(Tier::Powerful < Tier::Unstoppable);
        assert!(Tier::Unstoppable.pierces(Tier::Powerful));
        assert!(!Tier::None.pierces(Tier::None));
    }
}
