use sn_registry::{
    AccountId, Accounts, Amount, CallerContext, Registry, RegistryError, RegistryEvent,
    RegistryMetadata, SettlementError, StarId,
};

/// Why a submitted operation did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The environment could not collect its processing cost; the operation
    /// was never applied.
    Fee(SettlementError),
    /// The registry rejected the operation. The processing cost was still
    /// charged; submission is metered, acceptance is not.
    Rejected(RegistryError),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fee(e) => write!(f, "processing cost not collectable: {e}"),
            Self::Rejected(e) => write!(f, "operation rejected: {e}"),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fee(e) => Some(e),
            Self::Rejected(e) => Some(e),
        }
    }
}

/// In-process execution environment wrapping a registry and its settlement
/// ledger. Operations are applied strictly one at a time, each to a
/// definite success/failure outcome.
pub struct Harness {
    registry: Registry,
    accounts: Accounts,
    processing_cost: Amount,
    events: Vec<RegistryEvent>,
}

impl Harness {
    pub fn new(metadata: RegistryMetadata, processing_cost: Amount) -> Self {
        Self {
            registry: Registry::new(metadata),
            accounts: Accounts::new(),
            processing_cost,
            events: Vec::new(),
        }
    }

    /// Reference-deployment harness: default metadata, given cost, and the
    /// listed accounts funded up front.
    pub fn with_accounts(
        processing_cost: Amount,
        funded: &[(&str, Amount)],
    ) -> Result<Self, SettlementError> {
        let mut harness = Self::new(RegistryMetadata::default(), processing_cost);
        for (id, amount) in funded {
            harness.fund(id, *amount)?;
        }
        Ok(harness)
    }

    /// Open (if needed) and credit an account.
    pub fn fund(&mut self, account: &str, amount: Amount) -> Result<(), SettlementError> {
        let id = AccountId::new(account);
        self.accounts.open(id.clone());
        self.accounts.deposit(&id, amount)
    }

    // -----------------------------------------------------------------------
    // Operation submission
    // -----------------------------------------------------------------------

    pub fn create_star(
        &mut self,
        caller: &str,
        name: &str,
        id: StarId,
    ) -> Result<RegistryEvent, SubmitError> {
        let ctx = CallerContext::of(caller);
        self.charge(&ctx.caller)?;
        self.apply(|reg, _| reg.create_star(name, id, &ctx))
    }

    pub fn put_star_up_for_sale(
        &mut self,
        caller: &str,
        id: StarId,
        price: Amount,
    ) -> Result<RegistryEvent, SubmitError> {
        let ctx = CallerContext::of(caller);
        self.charge(&ctx.caller)?;
        self.apply(|reg, _| reg.put_star_up_for_sale(id, price, &ctx))
    }

    pub fn buy_star(
        &mut self,
        buyer: &str,
        attached: Amount,
        id: StarId,
    ) -> Result<RegistryEvent, SubmitError> {
        let ctx = CallerContext::with_value(buyer, attached);
        self.charge(&ctx.caller)?;
        self.apply(|reg, accounts| reg.buy_star(id, &ctx, accounts))
    }

    pub fn transfer_star(
        &mut self,
        caller: &str,
        to: &str,
        id: StarId,
    ) -> Result<RegistryEvent, SubmitError> {
        let ctx = CallerContext::of(caller);
        self.charge(&ctx.caller)?;
        self.apply(|reg, _| reg.transfer_star(&AccountId::new(to), id, &ctx))
    }

    pub fn exchange_stars(
        &mut self,
        caller: &str,
        id_a: StarId,
        id_b: StarId,
    ) -> Result<RegistryEvent, SubmitError> {
        let ctx = CallerContext::of(caller);
        self.charge(&ctx.caller)?;
        self.apply(|reg, _| reg.exchange_stars(id_a, id_b, &ctx))
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn balance(&self, account: &str) -> Result<Amount, SettlementError> {
        self.accounts.balance(&AccountId::new(account))
    }

    pub fn processing_cost(&self) -> Amount {
        self.processing_cost
    }

    /// Every successful operation's effect record, in submission order.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    // Collect the processing cost up front. With a zero cost the caller's
    // account is never touched (identities without balances can still own
    // stars).
    fn charge(&mut self, caller: &AccountId) -> Result<(), SubmitError> {
        if self.processing_cost > Amount::ZERO {
            self.accounts
                .withdraw(caller, self.processing_cost)
                .map_err(SubmitError::Fee)?;
        }
        Ok(())
    }

    fn apply<F>(&mut self, op: F) -> Result<RegistryEvent, SubmitError>
    where
        F: FnOnce(&mut Registry, &mut Accounts) -> Result<RegistryEvent, RegistryError>,
    {
        match op(&mut self.registry, &mut self.accounts) {
            Ok(event) => {
                self.events.push(event.clone());
                Ok(event)
            }
            Err(e) => Err(SubmitError::Rejected(e)),
        }
    }
}
