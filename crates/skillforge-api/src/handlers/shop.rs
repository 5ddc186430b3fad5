//! Shop and economy handlers: catalog, purchase, equip, penalty.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use skillforge_engine::{catalog, economy};
use skillforge_types::{EquippedCosmetics, ShopItem, UserId};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Body of `POST /api/shop/buy` and `POST /api/shop/equip`.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    /// The acting user.
    pub user_id: String,
    /// The catalog item id.
    pub item_id: String,
}

/// Response after a successful purchase.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// Spendable balance after the debit.
    pub spendable_xp: u32,
    /// Owned item ids after the purchase.
    pub inventory: Vec<String>,
}

/// Response after a successful equip.
#[derive(Debug, Serialize)]
pub struct EquipResponse {
    /// The active theme and title after the change.
    pub equipped: EquippedCosmetics,
}

/// Body of `POST /api/users/penalize`.
#[derive(Debug, Deserialize)]
pub struct PenalizeRequest {
    /// The penalized user.
    pub user_id: String,
    /// XP removed from both balances (floored at zero).
    pub amount: u32,
}

/// Response after a penalty.
#[derive(Debug, Serialize)]
pub struct PenalizeResponse {
    /// Spendable balance after the penalty.
    pub spendable_xp: u32,
    /// Lifetime balance after the penalty.
    pub lifetime_xp: u64,
    /// Rank recomputed from the new lifetime balance.
    pub rank: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/shop/items` -- the immutable catalog.
pub async fn list_items() -> Json<Vec<ShopItem>> {
    Json(catalog::all_items())
}

/// `POST /api/shop/buy` -- purchase a catalog item.
pub async fn buy(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ItemRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let user = UserId::from(req.user_id);
    let now = Utc::now();

    let response = state
        .store
        .update_ledger(&user, now, |ledger| {
            economy::purchase(ledger, &req.item_id)?;
            Ok(PurchaseResponse {
                spendable_xp: ledger.spendable_xp,
                inventory: ledger.inventory.iter().cloned().collect(),
            })
        })
        .await?;

    Ok(Json(response))
}

/// `POST /api/shop/equip` -- equip an owned item into its slot.
pub async fn equip(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ItemRequest>,
) -> Result<Json<EquipResponse>, ApiError> {
    let user = UserId::from(req.user_id);
    let now = Utc::now();

    let response = state
        .store
        .update_ledger(&user, now, |ledger| {
            economy::equip(ledger, &req.item_id)?;
            Ok(EquipResponse {
                equipped: ledger.equipped.clone(),
            })
        })
        .await?;

    Ok(Json(response))
}

/// `POST /api/users/penalize` -- apply an out-of-session penalty to both
/// balances.
pub async fn penalize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PenalizeRequest>,
) -> Result<Json<PenalizeResponse>, ApiError> {
    let user = UserId::from(req.user_id);
    let now = Utc::now();

    let response = state
        .store
        .update_ledger(&user, now, |ledger| {
            economy::penalize(ledger, req.amount);
            Ok(PenalizeResponse {
                spendable_xp: ledger.spendable_xp,
                lifetime_xp: ledger.lifetime_xp,
                rank: ledger.rank(),
            })
        })
        .await?;

    Ok(Json(response))
}
