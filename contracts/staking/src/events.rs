use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub stake_token: Address,
    pub reward_token: Address,
    pub reward_rate: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub staked: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub staked: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub staker: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsFundedEvent {
    pub funder: Address,
    pub amount: i128,
    pub pool_balance: i128,
}

pub fn publish_initialized(
    env: &Env,
    stake_token: Address,
    reward_token: Address,
    reward_rate: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            stake_token,
            reward_token,
            reward_rate,
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, staked: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            staked,
            total_staked,
        },
    );
}

pub fn publish_unstaked(
    env: &Env,
    staker: Address,
    amount: i128,
    staked: i128,
    total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("UNSTAKED"), staker.clone()),
        UnstakedEvent {
            staker,
            amount,
            staked,
            total_staked,
        },
    );
}

pub fn publish_reward_claimed(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIMED"), staker.clone()),
        RewardClaimedEvent { staker, amount },
    );
}

pub fn publish_rewards_funded(env: &Env, funder: Address, amount: i128, pool_balance: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), funder.clone()),
        RewardsFundedEvent {
            funder,
            amount,
            pool_balance,
        },
    );
}
