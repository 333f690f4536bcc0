//! Pool names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named donor pool
///
/// Every node joins `Atomic`, at most one structural pool (`Block`,
/// `Expression`, `Statement`) and, through its parent, any number of role
/// pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoolName {
    Atomic,
    Expression,
    Statement,
    Block,
    Identity,
    CallTarget,
    CallArg,
    SwitchExpr,
    Guard,
    ForInit,
    ForAfter,
    Rhs,
    Lhs,
}

impl PoolName {
    pub const ALL: [PoolName; 13] = [
        PoolName::Atomic,
        PoolName::Expression,
        PoolName::Statement,
        PoolName::Block,
        PoolName::Identity,
        PoolName::CallTarget,
        PoolName::CallArg,
        PoolName::SwitchExpr,
        PoolName::Guard,
        PoolName::ForInit,
        PoolName::ForAfter,
        PoolName::Rhs,
        PoolName::Lhs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolName::Atomic => "atomic",
            PoolName::Expression => "expression",
            PoolName::Statement => "statement",
            PoolName::Block => "block",
            PoolName::Identity => "identity",
            PoolName::CallTarget => "call-target",
            PoolName::CallArg => "call-arg",
            PoolName::SwitchExpr => "switch-expr",
            PoolName::Guard => "guard",
            PoolName::ForInit => "for-init",
            PoolName::ForAfter => "for-after",
            PoolName::Rhs => "rhs",
            PoolName::Lhs => "lhs",
        }
    }
}

impl fmt::Display for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PoolName::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown donor pool '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_names_match_serde() {
        for pool in PoolName::ALL {
            let json = serde_json::to_string(&pool).unwrap();
            assert_eq!(json, format!("\"{}\"", pool.as_str()));
            assert_eq!(pool.as_str().parse::<PoolName>().unwrap(), pool);
        }
    }

    #[test]
    fn test_unknown_name() {
        assert!("loop-body".parse::<PoolName>().is_err());
    }
}
