use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use sn_registry::{AccountId, Amount, CallerContext, StarId};

use crate::state::Workspace;

pub fn create(ws: &Workspace, caller: &str, id: u64, name: &str) -> Result<()> {
    let mut state = ws.load()?;
    let ctx = CallerContext::of(caller);
    let event = state.submit(&ctx.caller, |reg, _| {
        reg.create_star(name, StarId(id), &ctx)
    })?;
    ws.store(&state)?;
    ws.journal(state.registry.name(), &event)?;
    info!(id, caller, name, "star created");
    Ok(())
}

pub fn sell(ws: &Workspace, caller: &str, id: u64, price: &str) -> Result<()> {
    let price: Amount = price.parse().context("parse --price")?;
    let mut state = ws.load()?;
    let ctx = CallerContext::of(caller);
    let event = state.submit(&ctx.caller, |reg, _| {
        reg.put_star_up_for_sale(StarId(id), price, &ctx)
    })?;
    ws.store(&state)?;
    ws.journal(state.registry.name(), &event)?;
    info!(id, caller, price = %price, "star listed for sale");
    Ok(())
}

pub fn buy(ws: &Workspace, caller: &str, id: u64, value: &str) -> Result<()> {
    let attached: Amount = value.parse().context("parse --value")?;
    let mut state = ws.load()?;
    let ctx = CallerContext::with_value(caller, attached);
    let event = state.submit(&ctx.caller, |reg, accounts| {
        reg.buy_star(StarId(id), &ctx, accounts)
    })?;
    ws.store(&state)?;
    ws.journal(state.registry.name(), &event)?;
    info!(id, buyer = caller, attached = %attached, "star purchased");
    Ok(())
}

pub fn transfer(ws: &Workspace, caller: &str, to: &str, id: u64) -> Result<()> {
    let mut state = ws.load()?;
    let ctx = CallerContext::of(caller);
    let recipient = AccountId::new(to);
    let event = state.submit(&ctx.caller, |reg, _| {
        reg.transfer_star(&recipient, StarId(id), &ctx)
    })?;
    ws.store(&state)?;
    ws.journal(state.registry.name(), &event)?;
    info!(id, from = caller, to, "star transferred");
    Ok(())
}

pub fn exchange(ws: &Workspace, caller: &str, id_a: u64, id_b: u64) -> Result<()> {
    let mut state = ws.load()?;
    let ctx = CallerContext::of(caller);
    let event = state.submit(&ctx.caller, |reg, _| {
        reg.exchange_stars(StarId(id_a), StarId(id_b), &ctx)
    })?;
    ws.store(&state)?;
    ws.journal(state.registry.name(), &event)?;
    info!(id_a, id_b, caller, "stars exchanged");
    Ok(())
}

pub fn info(ws: &Workspace, id: u64) -> Result<()> {
    let state = ws.load()?;
    let name = state.registry.star_info(StarId(id))?;
    let owner = state.registry.owner_of(StarId(id))?;
    let price = state.registry.listing(StarId(id))?;
    println!(
        "{}",
        json!({
            "id": id,
            "name": name,
            "owner": owner.as_str(),
            "price": price.map(|p| p.to_string()),
        })
    );
    Ok(())
}
