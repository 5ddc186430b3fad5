//! XP economy operations on the [`ProgressLedger`].
//!
//! Two currencies with different rules:
//!
//! - **Spendable XP** can be earned and spent (hints, shop) and is never
//!   allowed to go negative. Every debit is checked up front and rejected
//!   whole if the balance is short.
//! - **Lifetime XP** only grows with credits and exists solely to derive
//!   rank. Spending never touches it; the one sanctioned decrease is an
//!   explicit [`penalize`].
//!
//! All arithmetic is checked or saturating. There is no code path that
//! silently wraps a balance.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use skillforge_types::{EquippedCosmetics, ProgressLedger, UserId};

use crate::catalog::{self, CatalogItem, DEFAULT_THEME, DEFAULT_TITLE};
use crate::error::EngineError;

/// Create the default ledger for a user on first touch.
///
/// The free default theme and title are owned and equipped from the start,
/// and the activity streak opens at 1.
pub fn open_ledger(user: UserId, now: DateTime<Utc>) -> ProgressLedger {
    let mut inventory = std::collections::BTreeSet::new();
    inventory.insert(String::from(DEFAULT_THEME));
    inventory.insert(String::from(DEFAULT_TITLE));

    ProgressLedger {
        user,
        spendable_xp: 0,
        lifetime_xp: 0,
        streak: 1,
        last_activity_at: now,
        inventory,
        equipped: EquippedCosmetics {
            theme: String::from(DEFAULT_THEME),
            title: String::from(DEFAULT_TITLE),
        },
    }
}

/// Refresh the consecutive-day streak for an activity happening at `now`.
///
/// Same calendar day: streak unchanged. Exactly one day since the last
/// activity: streak increments. A longer gap resets the streak to 1.
/// `last_activity_at` is always updated.
pub fn touch(ledger: &mut ProgressLedger, now: DateTime<Utc>) {
    let today = now.date_naive();
    let last_day = ledger.last_activity_at.date_naive();
    let gap_days = today.signed_duration_since(last_day).num_days();

    if gap_days == 1 {
        ledger.streak = ledger.streak.saturating_add(1);
    } else if gap_days > 1 {
        ledger.streak = 1;
    }

    ledger.last_activity_at = now;
}

/// Credit `amount` XP to both balances.
pub fn credit(ledger: &mut ProgressLedger, amount: u32) -> Result<(), EngineError> {
    let spendable = ledger.spendable_xp.checked_add(amount).ok_or_else(|| {
        EngineError::ArithmeticOverflow {
            context: String::from("spendable balance overflow on credit"),
        }
    })?;
    let lifetime = ledger
        .lifetime_xp
        .checked_add(u64::from(amount))
        .ok_or_else(|| EngineError::ArithmeticOverflow {
            context: String::from("lifetime balance overflow on credit"),
        })?;

    ledger.spendable_xp = spendable;
    ledger.lifetime_xp = lifetime;

    info!(
        user = %ledger.user,
        amount,
        spendable = ledger.spendable_xp,
        rank = ledger.rank(),
        "XP credited"
    );
    Ok(())
}

/// Debit `amount` from the spendable balance only.
///
/// Rejected whole with [`EngineError::InsufficientBalance`] if the balance
/// is short; lifetime XP and rank are never affected by spending.
pub fn debit(ledger: &mut ProgressLedger, amount: u32) -> Result<(), EngineError> {
    let remaining =
        ledger
            .spendable_xp
            .checked_sub(amount)
            .ok_or(EngineError::InsufficientBalance {
                requested: amount,
                available: ledger.spendable_xp,
            })?;
    ledger.spendable_xp = remaining;
    Ok(())
}

/// Apply a penalty to both balances, each floored at zero independently.
///
/// Reserved for violations detected outside a challenge session. This is
/// the one operation allowed to lower lifetime XP, so rank can drop.
pub fn penalize(ledger: &mut ProgressLedger, amount: u32) {
    ledger.spendable_xp = ledger.spendable_xp.saturating_sub(amount);
    ledger.lifetime_xp = ledger.lifetime_xp.saturating_sub(u64::from(amount));

    warn!(
        user = %ledger.user,
        amount,
        spendable = ledger.spendable_xp,
        lifetime = ledger.lifetime_xp,
        "penalty applied"
    );
}

/// Purchase a catalog item: debit its cost, then add it to the inventory.
///
/// Fails without mutation if the item id is unknown, already owned, or the
/// balance is short.
pub fn purchase(ledger: &mut ProgressLedger, item_id: &str) -> Result<(), EngineError> {
    let item = resolve_item(item_id)?;

    if ledger.inventory.contains(item.id) {
        return Err(EngineError::AlreadyOwned(String::from(item.id)));
    }

    debit(ledger, item.cost)?;
    ledger.inventory.insert(String::from(item.id));

    info!(
        user = %ledger.user,
        item = item.id,
        cost = item.cost,
        spendable = ledger.spendable_xp,
        "item purchased"
    );
    Ok(())
}

/// Equip an owned item into its slot, replacing the previous occupant.
pub fn equip(ledger: &mut ProgressLedger, item_id: &str) -> Result<(), EngineError> {
    let item = resolve_item(item_id)?;

    if !ledger.inventory.contains(item.id) {
        return Err(EngineError::NotOwned(String::from(item.id)));
    }

    match item.kind {
        skillforge_types::ItemKind::Theme => ledger.equipped.theme = String::from(item.id),
        skillforge_types::ItemKind::Title => ledger.equipped.title = String::from(item.id),
    }
    Ok(())
}

/// Look up a catalog item, mapping a miss to [`EngineError::UnknownItem`].
fn resolve_item(item_id: &str) -> Result<&'static CatalogItem, EngineError> {
    catalog::find(item_id).ok_or_else(|| EngineError::UnknownItem(String::from(item_id)))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn day(day_of_month: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day_of_month, hour, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn fresh_ledger() -> ProgressLedger {
        open_ledger(UserId::from("user_test"), day(10, 9))
    }

    // -----------------------------------------------------------------------
    // Open / defaults
    // -----------------------------------------------------------------------

    #[test]
    fn new_ledger_owns_and_equips_defaults() {
        let ledger = fresh_ledger();
        assert!(ledger.inventory.contains(DEFAULT_THEME));
        assert!(ledger.inventory.contains(DEFAULT_TITLE));
        assert_eq!(ledger.equipped.theme, DEFAULT_THEME);
        assert_eq!(ledger.equipped.title, DEFAULT_TITLE);
        assert_eq!(ledger.spendable_xp, 0);
        assert_eq!(ledger.lifetime_xp, 0);
        assert_eq!(ledger.rank(), 1);
    }

    // -----------------------------------------------------------------------
    // Credit / debit
    // -----------------------------------------------------------------------

    #[test]
    fn credit_raises_both_balances() {
        let mut ledger = fresh_ledger();
        assert!(credit(&mut ledger, 250).is_ok());
        assert_eq!(ledger.spendable_xp, 250);
        assert_eq!(ledger.lifetime_xp, 250);
        assert_eq!(ledger.rank(), 3);
        assert_eq!(ledger.rank_progress(), 50);
    }

    #[test]
    fn debit_touches_spendable_only() {
        let mut ledger = fresh_ledger();
        assert!(credit(&mut ledger, 500).is_ok());
        assert!(debit(&mut ledger, 200).is_ok());
        assert_eq!(ledger.spendable_xp, 300);
        assert_eq!(ledger.lifetime_xp, 500);
        assert_eq!(ledger.rank(), 6);
    }

    #[test]
    fn debit_beyond_balance_is_rejected_without_mutation() {
        let mut ledger = fresh_ledger();
        assert!(credit(&mut ledger, 150).is_ok());

        let result = debit(&mut ledger, 200);
        assert!(matches!(
            result,
            Err(EngineError::InsufficientBalance {
                requested: 200,
                available: 150
            })
        ));
        assert_eq!(ledger.spendable_xp, 150);
    }

    #[test]
    fn debit_exact_balance_reaches_zero() {
        let mut ledger = fresh_ledger();
        assert!(credit(&mut ledger, 200).is_ok());
        assert!(debit(&mut ledger, 200).is_ok());
        assert_eq!(ledger.spendable_xp, 0);
    }

    // -----------------------------------------------------------------------
    // Penalize
    // -----------------------------------------------------------------------

    #[test]
    fn penalize_floors_both_balances_at_zero() {
        let mut ledger = fresh_ledger();
        assert!(credit(&mut ledger, 120).is_ok());
        assert!(debit(&mut ledger, 100).is_ok());
        // spendable 20, lifetime 120

        penalize(&mut ledger, 50);
        assert_eq!(ledger.spendable_xp, 0);
        assert_eq!(ledger.lifetime_xp, 70);

        penalize(&mut ledger, 500);
        assert_eq!(ledger.spendable_xp, 0);
        assert_eq!(ledger.lifetime_xp, 0);
        assert_eq!(ledger.rank(), 1);
    }

    // -----------------------------------------------------------------------
    // Purchase / equip
    // -----------------------------------------------------------------------

    #[test]
    fn purchase_debits_and_adds_to_inventory() {
        let mut ledger = fresh_ledger();
        assert!(credit(&mut ledger, 400).is_ok());

        assert!(purchase(&mut ledger, "theme-dracula").is_ok());
        assert_eq!(ledger.spendable_xp, 100);
        assert!(ledger.inventory.contains("theme-dracula"));
        // Lifetime untouched by the spend.
        assert_eq!(ledger.lifetime_xp, 400);
    }

    #[test]
    fn purchase_already_owned_fails_without_debit() {
        let mut ledger = fresh_ledger();
        assert!(credit(&mut ledger, 1000).is_ok());
        assert!(purchase(&mut ledger, "theme-dracula").is_ok());

        let result = purchase(&mut ledger, "theme-dracula");
        assert!(matches!(result, Err(EngineError::AlreadyOwned(_))));
        assert_eq!(ledger.spendable_xp, 700);
    }

    #[test]
    fn purchase_with_short_balance_fails_without_mutation() {
        let mut ledger = fresh_ledger();
        assert!(credit(&mut ledger, 299).is_ok());

        let result = purchase(&mut ledger, "theme-dracula");
        assert!(matches!(result, Err(EngineError::InsufficientBalance { .. })));
        assert_eq!(ledger.spendable_xp, 299);
        assert!(!ledger.inventory.contains("theme-dracula"));
    }

    #[test]
    fn purchase_unknown_item_fails() {
        let mut ledger = fresh_ledger();
        let result = purchase(&mut ledger, "theme-vaporwave");
        assert!(matches!(result, Err(EngineError::UnknownItem(_))));
    }

    #[test]
    fn equip_owned_item_replaces_slot() {
        let mut ledger = fresh_ledger();
        assert!(credit(&mut ledger, 300).is_ok());
        assert!(purchase(&mut ledger, "theme-dracula").is_ok());

        assert!(equip(&mut ledger, "theme-dracula").is_ok());
        assert_eq!(ledger.equipped.theme, "theme-dracula");
        // The title slot is untouched.
        assert_eq!(ledger.equipped.title, DEFAULT_TITLE);

        // Re-equipping the default swaps back.
        assert!(equip(&mut ledger, DEFAULT_THEME).is_ok());
        assert_eq!(ledger.equipped.theme, DEFAULT_THEME);
    }

    #[test]
    fn equip_unowned_item_fails() {
        let mut ledger = fresh_ledger();
        let result = equip(&mut ledger, "title-architect");
        assert!(matches!(result, Err(EngineError::NotOwned(_))));
        assert_eq!(ledger.equipped.title, DEFAULT_TITLE);
    }

    // -----------------------------------------------------------------------
    // Streak
    // -----------------------------------------------------------------------

    #[test]
    fn same_day_activity_keeps_streak() {
        let mut ledger = fresh_ledger();
        let later_same_day = day(10, 21);
        touch(&mut ledger, later_same_day);
        assert_eq!(ledger.streak, 1);
        assert_eq!(ledger.last_activity_at, later_same_day);
    }

    #[test]
    fn next_day_activity_increments_streak() {
        let mut ledger = fresh_ledger();
        touch(&mut ledger, day(11, 7));
        assert_eq!(ledger.streak, 2);
    }

    #[test]
    fn next_day_counts_by_calendar_date_not_hours() {
        let mut ledger = fresh_ledger();
        // 23:00 on the 10th to 01:00 on the 11th is two hours but one day.
        touch(&mut ledger, day(10, 23));
        touch(&mut ledger, day(11, 1));
        assert_eq!(ledger.streak, 2);
    }

    #[test]
    fn gap_resets_streak_to_one() {
        let mut ledger = fresh_ledger();
        touch(&mut ledger, day(11, 9));
        assert_eq!(ledger.streak, 2);

        touch(&mut ledger, day(14, 9));
        assert_eq!(ledger.streak, 1);
    }
}
