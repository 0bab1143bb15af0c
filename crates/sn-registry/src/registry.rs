//! Registry: the single consistency domain for star state.
//!
//! # Purpose
//! Creation, sale listing, purchase, direct transfer, and owner exchange all
//! mutate the same three maps under the same invariants, so one type owns
//! them all:
//!
//! - `stars`: `StarId -> Star` (name + current owner)
//! - `listings`: `StarId -> Amount` (present only while listed)
//! - `holdings`: derived `AccountId -> set<StarId>` index
//!
//! # Invariants
//! - An id exists at most once; creation on an existing id is rejected.
//! - Every star has exactly one owner; the holdings index always agrees
//!   with the owner field ([`Registry::verify_integrity`]).
//! - A listing exists only for an existing star, set by its current owner,
//!   and is consumed by exactly one successful purchase.
//! - Every mutating operation validates completely before the first write;
//!   on any error the registry (and the settlement ledger) is unchanged.
//!
//! # Determinism
//! Pure logic: no IO, no time, no randomness.  The execution environment
//! serializes operation application; the registry itself needs no locking.

use std::collections::{BTreeMap, BTreeSet};

use crate::money::Amount;
use crate::settlement::{Accounts, SettlementError};
use crate::types::{AccountId, CallerContext, Star, StarId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// All rejections the registry can surface.  Every variant is a caller-input
/// or authorization error, never transient; no retry is meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// `create_star` on an id that already exists.
    DuplicateId { id: StarId },
    /// The star id is not present in the registry.
    UnknownStar { id: StarId },
    /// The caller is not the current owner of the star.
    NotOwner { id: StarId, caller: AccountId },
    /// `buy_star` on a star with no active listing.
    NotForSale { id: StarId },
    /// Attached value does not cover the listing price.
    InsufficientValue { attached: Amount, price: Amount },
    /// Both sides of the operation resolve to one owner (self-purchase,
    /// transfer to the current owner, or exchange within one account).
    SameOwner { owner: AccountId },
    /// `create_star` with an empty (or whitespace-only) name.
    EmptyName,
    /// `put_star_up_for_sale` with a negative price.
    NegativePrice { price: Amount },
    /// The value transfer inside a purchase was rejected by the ledger.
    Settlement(SettlementError),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "star {id} already exists"),
            Self::UnknownStar { id } => write!(f, "unknown star: {id}"),
            Self::NotOwner { id, caller } => {
                write!(f, "{caller} is not the owner of star {id}")
            }
            Self::NotForSale { id } => write!(f, "star {id} is not for sale"),
            Self::InsufficientValue { attached, price } => write!(
                f,
                "attached value {attached} does not cover the listing price {price}"
            ),
            Self::SameOwner { owner } => {
                write!(f, "both parties resolve to the same owner: {owner}")
            }
            Self::EmptyName => write!(f, "star name must not be empty"),
            Self::NegativePrice { price } => {
                write!(f, "listing price must be >= 0, got {price}")
            }
            Self::Settlement(e) => write!(f, "settlement failed: {e}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Settlement(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SettlementError> for RegistryError {
    fn from(e: SettlementError) -> Self {
        Self::Settlement(e)
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Immutable per-deployment identification, fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryMetadata {
    pub name: String,
    pub symbol: String,
}

impl RegistryMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

impl Default for RegistryMetadata {
    /// The reference deployment's identification.
    fn default() -> Self {
        Self::new("SuStarToken", "SuM")
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// The effect record returned by every successful mutating operation.
/// The front end journals these; tests assert on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    StarCreated {
        id: StarId,
        name: String,
        owner: AccountId,
    },
    StarListed {
        id: StarId,
        price: Amount,
    },
    StarSold {
        id: StarId,
        seller: AccountId,
        buyer: AccountId,
        price: Amount,
    },
    StarTransferred {
        id: StarId,
        from: AccountId,
        to: AccountId,
        listing_cleared: bool,
    },
    StarsExchanged {
        id_a: StarId,
        id_b: StarId,
        new_owner_a: AccountId,
        new_owner_b: AccountId,
    },
}

impl RegistryEvent {
    /// Stable event-type tag (journal `event_type` field).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StarCreated { .. } => "STAR_CREATED",
            Self::StarListed { .. } => "STAR_LISTED",
            Self::StarSold { .. } => "STAR_SOLD",
            Self::StarTransferred { .. } => "STAR_TRANSFERRED",
            Self::StarsExchanged { .. } => "STARS_EXCHANGED",
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The star registry.  See the module docs for the invariant set.
#[derive(Clone, Debug)]
pub struct Registry {
    metadata: RegistryMetadata,
    stars: BTreeMap<StarId, Star>,
    listings: BTreeMap<StarId, Amount>,
    holdings: BTreeMap<AccountId, BTreeSet<StarId>>,
}

impl Registry {
    pub fn new(metadata: RegistryMetadata) -> Self {
        Self {
            metadata,
            stars: BTreeMap::new(),
            listings: BTreeMap::new(),
            holdings: BTreeMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------------

    /// Deployment name (e.g. "SuStarToken").
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Deployment symbol (e.g. "SuM").
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    // -----------------------------------------------------------------------
    // Write surface
    // -----------------------------------------------------------------------

    /// Register a new star owned by the caller.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateId`] if the id exists (the original star is
    /// left intact), [`RegistryError::EmptyName`] for a blank name.
    pub fn create_star(
        &mut self,
        name: impl Into<String>,
        id: StarId,
        ctx: &CallerContext,
    ) -> Result<RegistryEvent, RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.stars.contains_key(&id) {
            return Err(RegistryError::DuplicateId { id });
        }

        self.stars.insert(
            id,
            Star {
                name: name.clone(),
                owner: ctx.caller.clone(),
            },
        );
        self.holdings
            .entry(ctx.caller.clone())
            .or_default()
            .insert(id);

        Ok(RegistryEvent::StarCreated {
            id,
            name,
            owner: ctx.caller.clone(),
        })
    }

    /// List a star for sale at `price` (zero is a valid price).  Relisting
    /// by the owner overwrites the previous price.
    pub fn put_star_up_for_sale(
        &mut self,
        id: StarId,
        price: Amount,
        ctx: &CallerContext,
    ) -> Result<RegistryEvent, RegistryError> {
        let star = self
            .stars
            .get(&id)
            .ok_or(RegistryError::UnknownStar { id })?;
        if star.owner != ctx.caller {
            return Err(RegistryError::NotOwner {
                id,
                caller: ctx.caller.clone(),
            });
        }
        if price.is_negative() {
            return Err(RegistryError::NegativePrice { price });
        }

        self.listings.insert(id, price);
        Ok(RegistryEvent::StarListed { id, price })
    }

    /// Purchase a listed star.
    ///
    /// Atomically: moves exactly the listing price from the buyer to the
    /// seller through `accounts`, transfers ownership to the caller, and
    /// clears the listing.  Attached value is an authorization cap: only
    /// `price` is ever drawn, so excess attachment is never consumed and
    /// there is nothing to refund.
    ///
    /// # Errors
    /// The validation order is: existence, listing, distinct owner,
    /// attached-value cover, then ledger settlement.  Any failure leaves
    /// the registry and both balances untouched.
    pub fn buy_star(
        &mut self,
        id: StarId,
        ctx: &CallerContext,
        accounts: &mut Accounts,
    ) -> Result<RegistryEvent, RegistryError> {
        let seller = self
            .stars
            .get(&id)
            .ok_or(RegistryError::UnknownStar { id })?
            .owner
            .clone();
        let price = *self
            .listings
            .get(&id)
            .ok_or(RegistryError::NotForSale { id })?;
        if seller == ctx.caller {
            return Err(RegistryError::SameOwner { owner: seller });
        }
        if ctx.value < price {
            return Err(RegistryError::InsufficientValue {
                attached: ctx.value,
                price,
            });
        }

        // The ledger transfer is itself all-or-nothing; it runs before any
        // registry mutation so a settlement failure cannot strand ownership.
        accounts.transfer(&ctx.caller, &seller, price)?;

        self.listings.remove(&id);
        self.set_owner(id, ctx.caller.clone());

        Ok(RegistryEvent::StarSold {
            id,
            seller,
            buyer: ctx.caller.clone(),
            price,
        })
    }

    /// Transfer a star to another identity.  No value moves.  An active
    /// listing is cleared: it was the previous owner's offer.
    pub fn transfer_star(
        &mut self,
        to: &AccountId,
        id: StarId,
        ctx: &CallerContext,
    ) -> Result<RegistryEvent, RegistryError> {
        let owner = self
            .stars
            .get(&id)
            .ok_or(RegistryError::UnknownStar { id })?
            .owner
            .clone();
        if owner != ctx.caller {
            return Err(RegistryError::NotOwner {
                id,
                caller: ctx.caller.clone(),
            });
        }
        if *to == owner {
            return Err(RegistryError::SameOwner { owner });
        }

        let listing_cleared = self.listings.remove(&id).is_some();
        self.set_owner(id, to.clone());

        Ok(RegistryEvent::StarTransferred {
            id,
            from: owner,
            to: to.clone(),
            listing_cleared,
        })
    }

    /// Atomically swap the owners of two stars.
    ///
    /// The caller must own at least one of the two (the stricter of the two
    /// candidate authorization policies; see DESIGN.md).  Active listings on
    /// either star are cleared, as with `transfer_star`.
    pub fn exchange_stars(
        &mut self,
        id_a: StarId,
        id_b: StarId,
        ctx: &CallerContext,
    ) -> Result<RegistryEvent, RegistryError> {
        let owner_a = self
            .stars
            .get(&id_a)
            .ok_or(RegistryError::UnknownStar { id: id_a })?
            .owner
            .clone();
        let owner_b = self
            .stars
            .get(&id_b)
            .ok_or(RegistryError::UnknownStar { id: id_b })?
            .owner
            .clone();
        if owner_a == owner_b {
            return Err(RegistryError::SameOwner { owner: owner_a });
        }
        if ctx.caller != owner_a && ctx.caller != owner_b {
            return Err(RegistryError::NotOwner {
                id: id_a,
                caller: ctx.caller.clone(),
            });
        }

        self.listings.remove(&id_a);
        self.listings.remove(&id_b);
        self.set_owner(id_a, owner_b.clone());
        self.set_owner(id_b, owner_a.clone());

        Ok(RegistryEvent::StarsExchanged {
            id_a,
            id_b,
            new_owner_a: owner_b,
            new_owner_b: owner_a,
        })
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    /// Name of star `id`.  Missing ids are an error, never an empty string.
    pub fn star_info(&self, id: StarId) -> Result<&str, RegistryError> {
        self.stars
            .get(&id)
            .map(|s| s.name.as_str())
            .ok_or(RegistryError::UnknownStar { id })
    }

    /// Current owner of star `id`.
    pub fn owner_of(&self, id: StarId) -> Result<&AccountId, RegistryError> {
        self.stars
            .get(&id)
            .map(|s| &s.owner)
            .ok_or(RegistryError::UnknownStar { id })
    }

    /// Active listing price of star `id` (`None` when unlisted).
    pub fn listing(&self, id: StarId) -> Result<Option<Amount>, RegistryError> {
        if !self.stars.contains_key(&id) {
            return Err(RegistryError::UnknownStar { id });
        }
        Ok(self.listings.get(&id).copied())
    }

    /// Ids held by `owner`, ascending.  Unknown owners hold nothing.
    pub fn stars_of(&self, owner: &AccountId) -> Vec<StarId> {
        self.holdings
            .get(owner)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Total number of registered stars.
    pub fn star_count(&self) -> usize {
        self.stars.len()
    }

    /// Iterate all stars with their active listing, ascending by id.
    pub fn iter(&self) -> impl Iterator<Item = (StarId, &Star, Option<Amount>)> {
        self.stars
            .iter()
            .map(|(id, star)| (*id, star, self.listings.get(id).copied()))
    }

    /// Recompute the holdings index from the star map and compare, and check
    /// every listing refers to an existing star.  Returns `true` if
    /// consistent.
    ///
    /// This is an **integrity check** (O(n) recompute) for tests, startup
    /// verification, and audit flows only.
    pub fn verify_integrity(&self) -> bool {
        let mut recomputed: BTreeMap<AccountId, BTreeSet<StarId>> = BTreeMap::new();
        for (id, star) in &self.stars {
            recomputed
                .entry(star.owner.clone())
                .or_default()
                .insert(*id);
        }
        recomputed == self.holdings && self.listings.keys().all(|id| self.stars.contains_key(id))
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    // Commit-phase ownership move; callers have already validated existence.
    fn set_owner(&mut self, id: StarId, to: AccountId) {
        if let Some(star) = self.stars.get_mut(&id) {
            let from = std::mem::replace(&mut star.owner, to.clone());
            if let Some(held) = self.holdings.get_mut(&from) {
                held.remove(&id);
                if held.is_empty() {
                    self.holdings.remove(&from);
                }
            }
            self.holdings.entry(to).or_default().insert(id);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryMetadata::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(s: &str) -> AccountId {
        AccountId::new(s)
    }

    fn ctx(s: &str) -> CallerContext {
        CallerContext::of(s)
    }

    fn funded(pairs: &[(&str, i64)]) -> Accounts {
        let mut accounts = Accounts::new();
        for (id, micros) in pairs {
            let id = acct(id);
            accounts.open(id.clone());
            accounts.deposit(&id, Amount::new(*micros)).unwrap();
        }
        accounts
    }

    // --- creation ---

    #[test]
    fn create_then_lookup_returns_exact_name() {
        let mut reg = Registry::default();
        reg.create_star("Awesome Star!", StarId(1), &ctx("owner"))
            .unwrap();
        assert_eq!(reg.star_info(StarId(1)).unwrap(), "Awesome Star!");
        assert_eq!(reg.owner_of(StarId(1)).unwrap(), &acct("owner"));
        assert!(reg.verify_integrity());
    }

    #[test]
    fn duplicate_id_rejected_and_original_intact() {
        let mut reg = Registry::default();
        reg.create_star("first", StarId(7), &ctx("alice")).unwrap();
        let err = reg.create_star("second", StarId(7), &ctx("bob"));
        assert_eq!(err, Err(RegistryError::DuplicateId { id: StarId(7) }));
        assert_eq!(reg.star_info(StarId(7)).unwrap(), "first");
        assert_eq!(reg.owner_of(StarId(7)).unwrap(), &acct("alice"));
    }

    #[test]
    fn empty_name_rejected() {
        let mut reg = Registry::default();
        assert_eq!(
            reg.create_star("", StarId(1), &ctx("alice")),
            Err(RegistryError::EmptyName)
        );
        assert_eq!(
            reg.create_star("   ", StarId(1), &ctx("alice")),
            Err(RegistryError::EmptyName)
        );
        assert_eq!(reg.star_count(), 0);
    }

    #[test]
    fn new_star_has_no_listing() {
        let mut reg = Registry::default();
        reg.create_star("star", StarId(1), &ctx("alice")).unwrap();
        assert_eq!(reg.listing(StarId(1)).unwrap(), None);
    }

    // --- listing ---

    #[test]
    fn owner_can_list_and_price_is_queryable() {
        let mut reg = Registry::default();
        reg.create_star("star", StarId(2), &ctx("u1")).unwrap();
        reg.put_star_up_for_sale(StarId(2), Amount::new(10_000), &ctx("u1"))
            .unwrap();
        assert_eq!(reg.listing(StarId(2)).unwrap(), Some(Amount::new(10_000)));
    }

    #[test]
    fn non_owner_listing_rejected_and_listing_unchanged() {
        let mut reg = Registry::default();
        reg.create_star("star", StarId(2), &ctx("u1")).unwrap();
        reg.put_star_up_for_sale(StarId(2), Amount::new(10_000), &ctx("u1"))
            .unwrap();
        let err = reg.put_star_up_for_sale(StarId(2), Amount::new(99), &ctx("mallory"));
        assert_eq!(
            err,
            Err(RegistryError::NotOwner {
                id: StarId(2),
                caller: acct("mallory"),
            })
        );
        assert_eq!(reg.listing(StarId(2)).unwrap(), Some(Amount::new(10_000)));
    }

    #[test]
    fn listing_unknown_star_rejected() {
        let mut reg = Registry::default();
        assert_eq!(
            reg.put_star_up_for_sale(StarId(9), Amount::ZERO, &ctx("u1")),
            Err(RegistryError::UnknownStar { id: StarId(9) })
        );
    }

    #[test]
    fn zero_price_is_a_valid_listing() {
        let mut reg = Registry::default();
        reg.create_star("free", StarId(3), &ctx("u1")).unwrap();
        reg.put_star_up_for_sale(StarId(3), Amount::ZERO, &ctx("u1"))
            .unwrap();
        assert_eq!(reg.listing(StarId(3)).unwrap(), Some(Amount::ZERO));
    }

    #[test]
    fn negative_price_rejected() {
        let mut reg = Registry::default();
        reg.create_star("star", StarId(3), &ctx("u1")).unwrap();
        assert_eq!(
            reg.put_star_up_for_sale(StarId(3), Amount::new(-1), &ctx("u1")),
            Err(RegistryError::NegativePrice {
                price: Amount::new(-1)
            })
        );
        assert_eq!(reg.listing(StarId(3)).unwrap(), None);
    }

    #[test]
    fn owner_relisting_overwrites_price() {
        let mut reg = Registry::default();
        reg.create_star("star", StarId(3), &ctx("u1")).unwrap();
        reg.put_star_up_for_sale(StarId(3), Amount::new(10_000), &ctx("u1"))
            .unwrap();
        reg.put_star_up_for_sale(StarId(3), Amount::new(20_000), &ctx("u1"))
            .unwrap();
        assert_eq!(reg.listing(StarId(3)).unwrap(), Some(Amount::new(20_000)));
    }

    // --- purchase ---

    #[test]
    fn buy_moves_exact_price_and_ownership() {
        let mut reg = Registry::default();
        let mut accounts = funded(&[("u1", 0), ("u2", 50_000)]);
        reg.create_star("star", StarId(4), &ctx("u1")).unwrap();
        reg.put_star_up_for_sale(StarId(4), Amount::new(10_000), &ctx("u1"))
            .unwrap();

        let event = reg
            .buy_star(
                StarId(4),
                &CallerContext::with_value("u2", Amount::new(50_000)),
                &mut accounts,
            )
            .unwrap();

        assert_eq!(
            event,
            RegistryEvent::StarSold {
                id: StarId(4),
                seller: acct("u1"),
                buyer: acct("u2"),
                price: Amount::new(10_000),
            }
        );
        assert_eq!(reg.owner_of(StarId(4)).unwrap(), &acct("u2"));
        // Seller gains exactly the price; the buyer's excess attachment is
        // never drawn.
        assert_eq!(accounts.balance(&acct("u1")).unwrap(), Amount::new(10_000));
        assert_eq!(accounts.balance(&acct("u2")).unwrap(), Amount::new(40_000));
        assert!(reg.verify_integrity());
    }

    #[test]
    fn purchase_consumes_the_listing() {
        let mut reg = Registry::default();
        let mut accounts = funded(&[("u1", 0), ("u2", 50_000), ("u3", 50_000)]);
        reg.create_star("star", StarId(4), &ctx("u1")).unwrap();
        reg.put_star_up_for_sale(StarId(4), Amount::new(10_000), &ctx("u1"))
            .unwrap();
        reg.buy_star(
            StarId(4),
            &CallerContext::with_value("u2", Amount::new(10_000)),
            &mut accounts,
        )
        .unwrap();

        assert_eq!(reg.listing(StarId(4)).unwrap(), None);
        let err = reg.buy_star(
            StarId(4),
            &CallerContext::with_value("u3", Amount::new(10_000)),
            &mut accounts,
        );
        assert_eq!(err, Err(RegistryError::NotForSale { id: StarId(4) }));
    }

    #[test]
    fn insufficient_attached_value_rejected_without_mutation() {
        let mut reg = Registry::default();
        let mut accounts = funded(&[("u1", 0), ("u2", 50_000)]);
        reg.create_star("star", StarId(4), &ctx("u1")).unwrap();
        reg.put_star_up_for_sale(StarId(4), Amount::new(10_000), &ctx("u1"))
            .unwrap();

        let before = accounts.clone();
        let err = reg.buy_star(
            StarId(4),
            &CallerContext::with_value("u2", Amount::new(9_999)),
            &mut accounts,
        );
        assert_eq!(
            err,
            Err(RegistryError::InsufficientValue {
                attached: Amount::new(9_999),
                price: Amount::new(10_000),
            })
        );
        assert_eq!(accounts, before);
        assert_eq!(reg.owner_of(StarId(4)).unwrap(), &acct("u1"));
        assert_eq!(reg.listing(StarId(4)).unwrap(), Some(Amount::new(10_000)));
    }

    #[test]
    fn ledger_shortfall_rejected_without_mutation() {
        // Attached value covers the price but the buyer's actual balance
        // does not: the settlement rejects and nothing changes.
        let mut reg = Registry::default();
        let mut accounts = funded(&[("u1", 0), ("u2", 5_000)]);
        reg.create_star("star", StarId(4), &ctx("u1")).unwrap();
        reg.put_star_up_for_sale(StarId(4), Amount::new(10_000), &ctx("u1"))
            .unwrap();

        let before = accounts.clone();
        let err = reg.buy_star(
            StarId(4),
            &CallerContext::with_value("u2", Amount::new(10_000)),
            &mut accounts,
        );
        assert!(matches!(
            err,
            Err(RegistryError::Settlement(
                SettlementError::InsufficientFunds { .. }
            ))
        ));
        assert_eq!(accounts, before);
        assert_eq!(reg.owner_of(StarId(4)).unwrap(), &acct("u1"));
        assert_eq!(reg.listing(StarId(4)).unwrap(), Some(Amount::new(10_000)));
    }

    #[test]
    fn buying_own_listing_rejected() {
        let mut reg = Registry::default();
        let mut accounts = funded(&[("u1", 50_000)]);
        reg.create_star("star", StarId(4), &ctx("u1")).unwrap();
        reg.put_star_up_for_sale(StarId(4), Amount::new(10_000), &ctx("u1"))
            .unwrap();
        let err = reg.buy_star(
            StarId(4),
            &CallerContext::with_value("u1", Amount::new(10_000)),
            &mut accounts,
        );
        assert_eq!(err, Err(RegistryError::SameOwner { owner: acct("u1") }));
        assert_eq!(accounts.balance(&acct("u1")).unwrap(), Amount::new(50_000));
    }

    #[test]
    fn buying_unknown_star_rejected() {
        let mut reg = Registry::default();
        let mut accounts = funded(&[("u2", 50_000)]);
        let err = reg.buy_star(
            StarId(99),
            &CallerContext::with_value("u2", Amount::new(10_000)),
            &mut accounts,
        );
        assert_eq!(err, Err(RegistryError::UnknownStar { id: StarId(99) }));
    }

    #[test]
    fn zero_priced_listing_settles_for_nothing() {
        let mut reg = Registry::default();
        let mut accounts = funded(&[("u1", 0), ("u2", 0)]);
        reg.create_star("free", StarId(4), &ctx("u1")).unwrap();
        reg.put_star_up_for_sale(StarId(4), Amount::ZERO, &ctx("u1"))
            .unwrap();
        reg.buy_star(StarId(4), &ctx("u2"), &mut accounts).unwrap();
        assert_eq!(reg.owner_of(StarId(4)).unwrap(), &acct("u2"));
        assert_eq!(accounts.balance(&acct("u1")).unwrap(), Amount::ZERO);
    }

    // --- transfer ---

    #[test]
    fn owner_can_transfer() {
        let mut reg = Registry::default();
        reg.create_star("The_Star", StarId(9), &ctx("usr1")).unwrap();
        reg.transfer_star(&acct("usr2"), StarId(9), &ctx("usr1"))
            .unwrap();
        assert_eq!(reg.owner_of(StarId(9)).unwrap(), &acct("usr2"));
        assert_eq!(reg.stars_of(&acct("usr1")), Vec::<StarId>::new());
        assert_eq!(reg.stars_of(&acct("usr2")), vec![StarId(9)]);
        assert!(reg.verify_integrity());
    }

    #[test]
    fn non_owner_transfer_rejected_ownership_unchanged() {
        let mut reg = Registry::default();
        reg.create_star("star", StarId(9), &ctx("usr1")).unwrap();
        let err = reg.transfer_star(&acct("mallory"), StarId(9), &ctx("mallory"));
        assert_eq!(
            err,
            Err(RegistryError::NotOwner {
                id: StarId(9),
                caller: acct("mallory"),
            })
        );
        assert_eq!(reg.owner_of(StarId(9)).unwrap(), &acct("usr1"));
    }

    #[test]
    fn transfer_to_current_owner_rejected() {
        let mut reg = Registry::default();
        reg.create_star("star", StarId(9), &ctx("usr1")).unwrap();
        let err = reg.transfer_star(&acct("usr1"), StarId(9), &ctx("usr1"));
        assert_eq!(err, Err(RegistryError::SameOwner { owner: acct("usr1") }));
    }

    #[test]
    fn transfer_clears_an_active_listing() {
        let mut reg = Registry::default();
        reg.create_star("star", StarId(9), &ctx("usr1")).unwrap();
        reg.put_star_up_for_sale(StarId(9), Amount::new(10_000), &ctx("usr1"))
            .unwrap();
        let event = reg
            .transfer_star(&acct("usr2"), StarId(9), &ctx("usr1"))
            .unwrap();
        assert_eq!(
            event,
            RegistryEvent::StarTransferred {
                id: StarId(9),
                from: acct("usr1"),
                to: acct("usr2"),
                listing_cleared: true,
            }
        );
        assert_eq!(reg.listing(StarId(9)).unwrap(), None);
    }

    // --- exchange ---

    #[test]
    fn exchange_swaps_owners() {
        let mut reg = Registry::default();
        reg.create_star("Str_1", StarId(25), &ctx("mr_x")).unwrap();
        reg.create_star("Str_2", StarId(45), &ctx("mr_y")).unwrap();
        reg.exchange_stars(StarId(25), StarId(45), &ctx("mr_x"))
            .unwrap();
        assert_eq!(reg.owner_of(StarId(25)).unwrap(), &acct("mr_y"));
        assert_eq!(reg.owner_of(StarId(45)).unwrap(), &acct("mr_x"));
        assert!(reg.verify_integrity());
    }

    #[test]
    fn exchange_twice_swaps_back() {
        let mut reg = Registry::default();
        reg.create_star("a", StarId(1), &ctx("x")).unwrap();
        reg.create_star("b", StarId(2), &ctx("y")).unwrap();
        reg.exchange_stars(StarId(1), StarId(2), &ctx("x")).unwrap();
        reg.exchange_stars(StarId(1), StarId(2), &ctx("y")).unwrap();
        assert_eq!(reg.owner_of(StarId(1)).unwrap(), &acct("x"));
        assert_eq!(reg.owner_of(StarId(2)).unwrap(), &acct("y"));
    }

    #[test]
    fn exchange_callable_by_either_owner() {
        let mut reg = Registry::default();
        reg.create_star("a", StarId(1), &ctx("x")).unwrap();
        reg.create_star("b", StarId(2), &ctx("y")).unwrap();
        // Caller owns id_b, not id_a.
        reg.exchange_stars(StarId(1), StarId(2), &ctx("y")).unwrap();
        assert_eq!(reg.owner_of(StarId(1)).unwrap(), &acct("y"));
    }

    #[test]
    fn exchange_same_owner_rejected() {
        let mut reg = Registry::default();
        reg.create_star("a", StarId(1), &ctx("x")).unwrap();
        reg.create_star("b", StarId(2), &ctx("x")).unwrap();
        let err = reg.exchange_stars(StarId(1), StarId(2), &ctx("x"));
        assert_eq!(err, Err(RegistryError::SameOwner { owner: acct("x") }));
    }

    #[test]
    fn exchange_by_third_party_rejected() {
        let mut reg = Registry::default();
        reg.create_star("a", StarId(1), &ctx("x")).unwrap();
        reg.create_star("b", StarId(2), &ctx("y")).unwrap();
        let err = reg.exchange_stars(StarId(1), StarId(2), &ctx("mallory"));
        assert_eq!(
            err,
            Err(RegistryError::NotOwner {
                id: StarId(1),
                caller: acct("mallory"),
            })
        );
        assert_eq!(reg.owner_of(StarId(1)).unwrap(), &acct("x"));
        assert_eq!(reg.owner_of(StarId(2)).unwrap(), &acct("y"));
    }

    #[test]
    fn exchange_missing_star_rejected() {
        let mut reg = Registry::default();
        reg.create_star("a", StarId(1), &ctx("x")).unwrap();
        let err = reg.exchange_stars(StarId(1), StarId(2), &ctx("x"));
        assert_eq!(err, Err(RegistryError::UnknownStar { id: StarId(2) }));
    }

    #[test]
    fn exchange_clears_listings_on_both_sides() {
        let mut reg = Registry::default();
        reg.create_star("a", StarId(1), &ctx("x")).unwrap();
        reg.create_star("b", StarId(2), &ctx("y")).unwrap();
        reg.put_star_up_for_sale(StarId(1), Amount::new(10_000), &ctx("x"))
            .unwrap();
        reg.exchange_stars(StarId(1), StarId(2), &ctx("x")).unwrap();
        assert_eq!(reg.listing(StarId(1)).unwrap(), None);
        assert_eq!(reg.listing(StarId(2)).unwrap(), None);
    }

    // --- reads / metadata ---

    #[test]
    fn reads_on_unknown_star_fail() {
        let reg = Registry::default();
        assert_eq!(
            reg.star_info(StarId(1)),
            Err(RegistryError::UnknownStar { id: StarId(1) })
        );
        assert_eq!(
            reg.owner_of(StarId(1)),
            Err(RegistryError::UnknownStar { id: StarId(1) })
        );
        assert_eq!(
            reg.listing(StarId(1)),
            Err(RegistryError::UnknownStar { id: StarId(1) })
        );
    }

    #[test]
    fn metadata_is_fixed_at_construction() {
        let reg = Registry::new(RegistryMetadata::new("SuStarToken", "SuM"));
        assert_eq!(reg.name(), "SuStarToken");
        assert_eq!(reg.symbol(), "SuM");
    }

    #[test]
    fn event_kinds_are_stable() {
        let mut reg = Registry::default();
        let ev = reg
            .create_star("star", StarId(1), &ctx("alice"))
            .unwrap();
        assert_eq!(ev.kind(), "STAR_CREATED");
    }
}
