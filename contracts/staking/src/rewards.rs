use soroban_sdk::{Env, I256};

/// Fixed-point scaling factor.
///
/// Reward-per-token values are stored multiplied by this constant so that
/// sub-unit accruals survive integer division. 10^18 keeps precision for
/// pools whose total stake is expressed in 18-decimal units.
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

/// Largest emission rate `initialize` accepts: 10^10 whole 18-decimal
/// tokens per second.
///
/// A staker's accrual never exceeds `reward_rate × elapsed`, so at this cap
/// a pending reward stays inside `i128` for over five centuries of
/// uninterrupted accrual.
pub const MAX_REWARD_RATE: i128 = 10_000_000_000 * PRECISION;

// ── Core reward engine ──────────────────────────────────────────────────────
//
// Intermediate products run in 256 bits. `reward_rate × elapsed × PRECISION`
// and `staked × growth` both leave `i128` long before the quotient does.

/// Advance the global `reward_per_token_stored` accumulator.
///
/// ```text
/// Δrpt = reward_rate × elapsed_seconds × PRECISION / total_staked
/// new_rpt = stored_rpt + Δrpt
/// ```
///
/// An empty pool leaves `stored` untouched: nothing is attributable per
/// token when nothing is staked.
///
/// # Arguments
/// * `stored`       – current `reward_per_token_stored` (scaled by PRECISION)
/// * `reward_rate`  – reward units emitted per second across the whole pool
/// * `elapsed`      – seconds since the last refresh
/// * `total_staked` – sum of all staked balances
pub fn compute_reward_per_token(
    env: &Env,
    stored: &I256,
    reward_rate: i128,
    elapsed: u64,
    total_staked: i128,
) -> I256 {
    if total_staked <= 0 || elapsed == 0 || reward_rate == 0 {
        return stored.clone();
    }

    let delta = I256::from_i128(env, reward_rate)
        .mul(&I256::from_i128(env, i128::from(elapsed)))
        .mul(&I256::from_i128(env, PRECISION))
        .div(&I256::from_i128(env, total_staked));

    stored.add(&delta)
}

/// Total reward owed to one staker, pending plus newly accrued.
///
/// ```text
/// earned = staked × (current_rpt − user_rpt_paid) / PRECISION + user_earned
/// ```
///
/// Only the accumulator growth since the user's last snapshot is credited,
/// so earlier checkpoints are never counted twice. Returns `None` when the
/// result does not fit in `i128`.
pub fn earned(
    env: &Env,
    staked: i128,
    current_rpt: &I256,
    user_rpt_paid: &I256,
    user_earned: i128,
) -> Option<i128> {
    let growth = current_rpt.sub(user_rpt_paid);
    let new_rewards = I256::from_i128(env, staked)
        .mul(&growth)
        .div(&I256::from_i128(env, PRECISION))
        .to_i128()?;

    user_earned.checked_add(new_rewards)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
