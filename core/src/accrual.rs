//! Time accrual: converting elapsed wall-clock time into resources
//!
//! Both accrual steps are infallible. A caller clock running behind the
//! stored timestamp contributes zero elapsed time; the stored timestamps
//! never move backward.

use chrono::{DateTime, Duration, Utc};

use crate::account::Account;

/// Seconds elapsed between two instants, clamped at zero
pub(crate) fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    if delta < Duration::zero() {
        return 0.0;
    }
    delta
        .num_microseconds()
        .map(|us| us as f64 / 1_000_000.0)
        .unwrap_or_else(|| delta.num_seconds() as f64)
}

/// Regenerate energy for the time elapsed since the last energy update.
///
/// The energy clock advances to `now` even when no energy was gained, so
/// repeated calls with the same instant are idempotent and elapsed time is
/// never counted twice.
pub fn accrue_energy(account: &mut Account, now: DateTime<Utc>) {
    let dt = elapsed_seconds(account.last_energy_update, now);
    if dt > 0.0 && account.energy_regen > 0.0 {
        let cap = account.max_energy as f64;
        account.energy = (account.energy + dt * account.energy_regen).min(cap);
    }
    if now > account.last_energy_update {
        account.last_energy_update = now;
    }
}

/// Credit passive auto-farm income for the time elapsed since the last
/// farm update.
///
/// Only whole coins are credited. The farm clock advances by exactly
/// `earned / auto_farm_level` seconds, so the fractional remainder keeps
/// accruing from the old timestamp instead of being dropped.
pub fn accrue_auto_farm(account: &mut Account, now: DateTime<Utc>) {
    if !account.auto_farm_enabled || account.auto_farm_level == 0 {
        return;
    }

    let dt = elapsed_seconds(account.last_farm_update, now);
    let earned = (dt * account.auto_farm_level as f64).floor() as u64;
    if earned == 0 {
        return;
    }

    account.balance = account.balance.saturating_add(earned);

    // Consume only the time that produced whole coins; earned / level <= dt,
    // so the clock never runs ahead of `now`.
    let consumed_us = (earned as i64).saturating_mul(1_000_000) / account.auto_farm_level as i64;
    account.last_farm_update += Duration::microseconds(consumed_us);
}
