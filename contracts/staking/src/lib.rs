#![no_std]

pub mod custody;
pub mod events;
pub mod ledger;
pub mod rewards;

use soroban_sdk::{contract, contractimpl, contracttype, log, Address, Env, I256};

pub use ledger::{GlobalState, LedgerConfig, UserAccount};
use ledger::StakeLedger;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidConfig = 3,
    TokensIdentical = 4,
    InvalidAmount = 5,
    InsufficientStakedBalance = 6,
    ExternalTransferFailed = 7,
    NothingToClaim = 8,
    RewardPoolInsufficient = 9,
    ArithmeticOverflow = 10,
}

/// Snapshot of a user's staking position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub staked: i128,
    pub pending_rewards: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingLedgerContract;

#[contractimpl]
impl StakingLedgerContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger.
    ///
    /// * `stake_token`  – token users deposit.
    /// * `reward_token` – token paid out as reward.
    /// * `reward_rate`  – reward units emitted **per second** across all stakers,
    ///   at most `rewards::MAX_REWARD_RATE`.
    ///
    /// The configuration is immutable afterwards and no address holds any
    /// privilege over the ledger.
    pub fn initialize(
        env: Env,
        stake_token: Address,
        reward_token: Address,
        reward_rate: i128,
    ) -> Result<(), ContractError> {
        if StakeLedger::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }

        if !(0..=rewards::MAX_REWARD_RATE).contains(&reward_rate) {
            return Err(ContractError::InvalidConfig);
        }
        if stake_token == reward_token {
            return Err(ContractError::TokensIdentical);
        }

        let config = LedgerConfig {
            stake_token: stake_token.clone(),
            reward_token: reward_token.clone(),
            reward_rate,
        };
        StakeLedger::create(&env, config);

        events::publish_initialized(&env, stake_token, reward_token, reward_rate);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens.
    ///
    /// The staker must have approved this contract for at least `amount`.
    /// Tokens are pulled before any accounting changes, and the staker is
    /// checkpointed before the balance grows so the new tokens earn nothing
    /// retroactively.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        let mut ledger = StakeLedger::load(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        custody::pull(&env, &ledger.config().stake_token, &staker, amount)?;

        let mut account = ledger.checkpoint(&staker, ledger.now())?;
        ledger.credit_stake(&mut account, amount)?;

        ledger.save_account(&staker, &account);
        ledger.commit();

        events::publish_staked(
            &env,
            staker,
            amount,
            account.staked,
            ledger.state().total_staked,
        );

        Ok(())
    }

    /// Withdraw `amount` stake tokens.
    ///
    /// Rejects rather than clamps an amount above the current stake. Pending
    /// reward survives unstaking, including unstaking to zero.
    pub fn unstake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        let mut ledger = StakeLedger::load(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let mut account = ledger.checkpoint(&staker, ledger.now())?;
        ledger.debit_stake(&mut account, amount)?;

        custody::push(&env, &ledger.config().stake_token, &staker, amount)?;

        ledger.save_account(&staker, &account);
        ledger.commit();

        events::publish_unstaked(
            &env,
            staker,
            amount,
            account.staked,
            ledger.state().total_staked,
        );

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out everything `staker` has accrued up to now.
    ///
    /// Fails with `NothingToClaim` when nothing is pending and with
    /// `RewardPoolInsufficient` when custody cannot cover the full payout;
    /// the pending amount is kept in both cases.
    pub fn claim_reward(env: Env, staker: Address) -> Result<i128, ContractError> {
        let mut ledger = StakeLedger::load(&env)?;
        staker.require_auth();

        let mut account = ledger.checkpoint(&staker, ledger.now())?;
        let payout = account.pending_reward;
        if payout <= 0 {
            return Err(ContractError::NothingToClaim);
        }

        let reward_token = ledger.config().reward_token.clone();
        let pool = custody::balance(&env, &reward_token)?;
        if pool < payout {
            log!(&env, "reward pool short", pool, payout);
            return Err(ContractError::RewardPoolInsufficient);
        }

        account.pending_reward = 0;
        custody::push(&env, &reward_token, &staker, payout)?;

        ledger.save_account(&staker, &account);
        ledger.commit();

        events::publish_reward_claimed(&env, staker, payout);

        Ok(payout)
    }

    /// Top up the reward pool with `amount` reward tokens from `funder`.
    ///
    /// Open to any caller. Returns the pool balance after the deposit.
    pub fn fund_rewards(env: Env, funder: Address, amount: i128) -> Result<i128, ContractError> {
        let ledger = StakeLedger::load(&env)?;
        funder.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let reward_token = &ledger.config().reward_token;
        custody::deposit(&env, reward_token, &funder, amount)?;
        let pool_balance = custody::balance(&env, reward_token)?;

        events::publish_rewards_funded(&env, funder, amount, pool_balance);

        Ok(pool_balance)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward `staker` could claim right now. Does not mutate state.
    pub fn reward_earned(env: Env, staker: Address) -> Result<i128, ContractError> {
        let ledger = StakeLedger::load(&env)?;
        ledger.reward_earned(&staker, ledger.now())
    }

    /// Return the user's current staked balance.
    pub fn staked_tokens_amount(env: Env, staker: Address) -> i128 {
        StakeLedger::load(&env)
            .map(|ledger| ledger.account(&staker).staked)
            .unwrap_or(0)
    }

    /// Combined staking position for a user.
    pub fn get_staker_info(env: Env, staker: Address) -> Result<StakerInfo, ContractError> {
        let ledger = StakeLedger::load(&env)?;
        Ok(StakerInfo {
            staked: ledger.account(&staker).staked,
            pending_rewards: ledger.reward_earned(&staker, ledger.now())?,
        })
    }

    /// Accumulator value as of now, scaled by `rewards::PRECISION`.
    pub fn reward_per_token(env: Env) -> Result<I256, ContractError> {
        let ledger = StakeLedger::load(&env)?;
        Ok(ledger.projected_reward_per_token(ledger.now()))
    }

    /// Reward tokens currently held in custody for payouts.
    pub fn reward_pool_balance(env: Env) -> Result<i128, ContractError> {
        let ledger = StakeLedger::load(&env)?;
        custody::balance(&env, &ledger.config().reward_token)
    }

    /// Return the sum of all currently staked tokens.
    pub fn get_total_staked(env: Env) -> i128 {
        StakeLedger::load(&env)
            .map(|ledger| ledger.state().total_staked)
            .unwrap_or(0)
    }

    /// Return the configured emission rate (reward units per second).
    pub fn get_reward_rate(env: Env) -> i128 {
        StakeLedger::load(&env)
            .map(|ledger| ledger.config().reward_rate)
            .unwrap_or(0)
    }

    pub fn get_config(env: Env) -> Result<LedgerConfig, ContractError> {
        Ok(StakeLedger::load(&env)?.config().clone())
    }

    pub fn stake_token(env: Env) -> Result<Address, ContractError> {
        Ok(StakeLedger::load(&env)?.config().stake_token.clone())
    }

    pub fn reward_token(env: Env) -> Result<Address, ContractError> {
        Ok(StakeLedger::load(&env)?.config().reward_token.clone())
    }

    pub fn is_initialized(env: Env) -> bool {
        StakeLedger::is_initialized(&env)
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
