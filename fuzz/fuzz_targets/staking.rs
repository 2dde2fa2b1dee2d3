#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{Address, Env};
use staking_ledger::{StakingLedgerContract, StakingLedgerContractClient};

const USERS: usize = 4;
const WALLET: i128 = 1 << 80;

#[derive(Arbitrary, Debug)]
enum Action {
    Stake { user: u8, amount: u64 },
    Unstake { user: u8, amount: u64 },
    Claim { user: u8 },
    Fund { amount: u32 },
    Wait { seconds: u32 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    reward_rate: u64,
    actions: Vec<Action>,
}

fuzz_target!(|input: Input| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.sequence_number = 10);

    let issuer = Address::generate(&env);
    let stake_sac = env.register_stellar_asset_contract_v2(issuer.clone());
    let reward_sac = env.register_stellar_asset_contract_v2(issuer);
    let stake_token = TokenClient::new(&env, &stake_sac.address());
    let stake_minter = StellarAssetClient::new(&env, &stake_sac.address());
    let reward_minter = StellarAssetClient::new(&env, &reward_sac.address());

    let contract_id = env.register(StakingLedgerContract, ());
    let client = StakingLedgerContractClient::new(&env, &contract_id);
    client.initialize(
        &stake_sac.address(),
        &reward_sac.address(),
        &i128::from(input.reward_rate),
    );

    let users: Vec<Address> = (0..USERS)
        .map(|_| {
            let user = Address::generate(&env);
            stake_minter.mint(&user, &WALLET);
            user
        })
        .collect();
    let funder = Address::generate(&env);
    reward_minter.mint(&funder, &WALLET);

    let mut last_rpt = client.reward_per_token();

    for action in input.actions.iter().take(64) {
        match *action {
            Action::Stake { user, amount } => {
                let user = &users[user as usize % USERS];
                let amount = i128::from(amount);
                let expiration = env.ledger().sequence() + 100;
                stake_token.approve(user, &contract_id, &amount, &expiration);
                let _ = client.try_stake(user, &amount);
            }
            Action::Unstake { user, amount } => {
                let user = &users[user as usize % USERS];
                let before = client.staked_tokens_amount(user);
                let amount = i128::from(amount);
                if client.try_unstake(user, &amount).is_err() {
                    assert_eq!(client.staked_tokens_amount(user), before);
                }
            }
            Action::Claim { user } => {
                let user = &users[user as usize % USERS];
                let pending = client.reward_earned(user);
                match client.try_claim_reward(user) {
                    Ok(Ok(paid)) => assert_eq!(paid, pending),
                    _ => assert_eq!(client.reward_earned(user), pending),
                }
            }
            Action::Fund { amount } => {
                let _ = client.try_fund_rewards(&funder, &i128::from(amount));
            }
            Action::Wait { seconds } => {
                env.ledger()
                    .with_mut(|li| li.timestamp = li.timestamp.saturating_add(u64::from(seconds)));
            }
        }

        let total: i128 = users.iter().map(|u| client.staked_tokens_amount(u)).sum();
        assert_eq!(client.get_total_staked(), total);
        assert_eq!(stake_token.balance(&contract_id), total);

        let rpt = client.reward_per_token();
        assert!(rpt >= last_rpt);
        last_rpt = rpt;
    }
});
