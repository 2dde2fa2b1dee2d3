use soroban_sdk::{contracttype, log, Address, Env, I256};

use crate::rewards;
use crate::ContractError;

// ── Storage layout ──────────────────────────────────────────────────────────

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_TTL_EXTEND_TO: u32 = 7 * DAY_IN_LEDGERS; // ~7 days
const INSTANCE_TTL_THRESHOLD: u32 = INSTANCE_TTL_EXTEND_TO - DAY_IN_LEDGERS;
const ACCOUNT_TTL_EXTEND_TO: u32 = 30 * DAY_IN_LEDGERS; // ~30 days
const ACCOUNT_TTL_THRESHOLD: u32 = ACCOUNT_TTL_EXTEND_TO - DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Config,
    State,
    Account(Address),
}

/// Construction-time parameters, immutable after `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    pub stake_token: Address,
    pub reward_token: Address,
    /// Reward units emitted per second, shared across the whole pool.
    pub reward_rate: i128,
}

/// Pool-wide accounting. Stored as a single value so the accumulator,
/// its timestamp and the total stake are always read together.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlobalState {
    pub total_staked: i128,
    /// Cumulative reward per staked unit, scaled by `rewards::PRECISION`.
    /// Held in 256 bits: with a dust-sized pool it outgrows `i128` quickly.
    pub reward_per_token_stored: I256,
    pub last_update_time: u64,
}

impl GlobalState {
    pub fn empty(env: &Env, last_update_time: u64) -> Self {
        Self {
            total_staked: 0,
            reward_per_token_stored: I256::from_i32(env, 0),
            last_update_time,
        }
    }
}

/// Per-staker record. Never removed once written.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserAccount {
    pub staked: i128,
    /// Snapshot of the accumulator at this account's last checkpoint.
    pub reward_per_token_paid: I256,
    /// Reward folded in at past checkpoints and not yet claimed.
    pub pending_reward: i128,
}

impl UserAccount {
    pub fn empty(env: &Env) -> Self {
        Self {
            staked: 0,
            reward_per_token_paid: I256::from_i32(env, 0),
            pending_reward: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.staked == 0 && self.pending_reward == 0
    }
}

/// Current ledger time in seconds.
pub fn now(env: &Env) -> u64 {
    env.ledger().timestamp()
}

// ── StakeLedger ─────────────────────────────────────────────────────────────

/// In-memory working copy of the ledger for one invocation.
///
/// Mutations happen on the copy; nothing reaches storage until `commit`
/// and `save_account` are called, which entry points do only after the
/// matching token transfer has gone through.
pub struct StakeLedger {
    env: Env,
    config: LedgerConfig,
    state: GlobalState,
}

impl StakeLedger {
    /// Write the initial configuration and an empty pool starting at `now`.
    pub fn create(env: &Env, config: LedgerConfig) -> Self {
        env.storage().instance().set(&DataKey::Config, &config);

        let ledger = Self {
            env: env.clone(),
            config,
            state: GlobalState::empty(env, now(env)),
        };
        ledger.commit();
        ledger
    }

    pub fn load(env: &Env) -> Result<Self, ContractError> {
        let storage = env.storage().instance();
        let config: LedgerConfig = storage
            .get(&DataKey::Config)
            .ok_or(ContractError::NotInitialized)?;
        let state: GlobalState = storage
            .get(&DataKey::State)
            .unwrap_or_else(|| GlobalState::empty(env, now(env)));

        Ok(Self {
            env: env.clone(),
            config,
            state,
        })
    }

    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Config)
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn state(&self) -> &GlobalState {
        &self.state
    }

    pub fn now(&self) -> u64 {
        now(&self.env)
    }

    /// Read a staker's account, defaulting to all zeroes.
    pub fn account(&self, user: &Address) -> UserAccount {
        self.env
            .storage()
            .persistent()
            .get(&DataKey::Account(user.clone()))
            .unwrap_or_else(|| UserAccount::empty(&self.env))
    }

    // ── Accumulator ─────────────────────────────────────────────────────────

    /// What `refresh(now)` would set the accumulator to, without applying it.
    pub fn projected_reward_per_token(&self, now: u64) -> I256 {
        let elapsed = now.saturating_sub(self.state.last_update_time);
        rewards::compute_reward_per_token(
            &self.env,
            &self.state.reward_per_token_stored,
            self.config.reward_rate,
            elapsed,
            self.state.total_staked,
        )
    }

    /// Bring the accumulator up to `now`.
    pub fn refresh(&mut self, now: u64) {
        let rpt = self.projected_reward_per_token(now);
        if rpt != self.state.reward_per_token_stored {
            log!(
                &self.env,
                "accumulator refreshed",
                self.state.reward_per_token_stored,
                rpt,
                self.state.total_staked
            );
        }
        self.state.reward_per_token_stored = rpt;
        // A clock reading behind the last refresh never rewinds it.
        self.state.last_update_time = now.max(self.state.last_update_time);
    }

    /// Refresh, then fold the user's accrual since their last checkpoint
    /// into `pending_reward`. Must precede any change to the user's stake.
    pub fn checkpoint(&mut self, user: &Address, now: u64) -> Result<UserAccount, ContractError> {
        self.refresh(now);

        let mut account = self.account(user);
        account.pending_reward = rewards::earned(
            &self.env,
            account.staked,
            &self.state.reward_per_token_stored,
            &account.reward_per_token_paid,
            account.pending_reward,
        )
        .ok_or(ContractError::ArithmeticOverflow)?;
        account.reward_per_token_paid = self.state.reward_per_token_stored.clone();

        Ok(account)
    }

    /// Pending reward the user would hold if checkpointed at `now`.
    pub fn reward_earned(&self, user: &Address, now: u64) -> Result<i128, ContractError> {
        let account = self.account(user);
        if account.is_empty() {
            return Ok(0);
        }
        let rpt = self.projected_reward_per_token(now);
        rewards::earned(
            &self.env,
            account.staked,
            &rpt,
            &account.reward_per_token_paid,
            account.pending_reward,
        )
        .ok_or(ContractError::ArithmeticOverflow)
    }

    // ── Balance transitions ─────────────────────────────────────────────────

    pub fn credit_stake(
        &mut self,
        account: &mut UserAccount,
        amount: i128,
    ) -> Result<(), ContractError> {
        let staked = account
            .staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let total = self
            .state
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        account.staked = staked;
        self.state.total_staked = total;
        Ok(())
    }

    pub fn debit_stake(
        &mut self,
        account: &mut UserAccount,
        amount: i128,
    ) -> Result<(), ContractError> {
        if amount > account.staked {
            return Err(ContractError::InsufficientStakedBalance);
        }
        let total = self
            .state
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        account.staked -= amount;
        self.state.total_staked = total;
        Ok(())
    }

    // ── Persistence ─────────────────────────────────────────────────────────

    pub fn save_account(&self, user: &Address, account: &UserAccount) {
        let key = DataKey::Account(user.clone());
        let storage = self.env.storage().persistent();
        storage.set(&key, account);
        storage.extend_ttl(&key, ACCOUNT_TTL_THRESHOLD, ACCOUNT_TTL_EXTEND_TO);
    }

    pub fn commit(&self) {
        let storage = self.env.storage().instance();
        storage.set(&DataKey::State, &self.state);
        storage.extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
    }
}
