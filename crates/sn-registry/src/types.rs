use crate::money::Amount;

/// Opaque externally issued account identity (stable string).
///
/// The registry never inspects the contents; identities are only compared
/// and used as map keys.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller-chosen star identifier.  Externally assigned; unique per registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StarId(pub u64);

impl std::fmt::Display for StarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered star: a named, ownable record.
///
/// `name` is immutable after creation; `owner` mutates on purchase,
/// transfer, and exchange.  Stars are never destroyed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Star {
    pub name: String,
    pub owner: AccountId,
}

/// The invocation context supplied by the execution environment for every
/// mutating operation: who is calling, and how much value is attached.
///
/// Attached value is an authorization cap for purchases: the registry
/// draws at most the listing price from the caller's balance, never the
/// full attachment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerContext {
    pub caller: AccountId,
    pub value: Amount,
}

impl CallerContext {
    /// Context with no attached value (everything except `buy_star`).
    pub fn of(caller: impl Into<String>) -> Self {
        Self {
            caller: AccountId::new(caller),
            value: Amount::ZERO,
        }
    }

    /// Context with attached value, for purchases.
    pub fn with_value(caller: impl Into<String>, value: Amount) -> Self {
        Self {
            caller: AccountId::new(caller),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_ids_compare_by_content() {
        assert_eq!(AccountId::new("alice"), AccountId::new("alice"));
        assert_ne!(AccountId::new("alice"), AccountId::new("bob"));
    }

    #[test]
    fn caller_context_of_attaches_zero() {
        let ctx = CallerContext::of("alice");
        assert_eq!(ctx.value, Amount::ZERO);
        assert_eq!(ctx.caller.as_str(), "alice");
    }
}
