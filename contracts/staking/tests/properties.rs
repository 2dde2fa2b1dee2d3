use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{Address, Env};

use staking_ledger::rewards::MAX_REWARD_RATE;
use staking_ledger::{ContractError, StakingLedgerContract, StakingLedgerContractClient};

const RATE: i128 = 100;
const USERS: usize = 3;
const WALLET: i128 = 1_000_000_000;

#[derive(Arbitrary, Clone, Debug)]
enum Op {
    Stake(#[proptest(strategy = "0..USERS")] usize, #[proptest(strategy = "1i128..50_000")] i128),
    Unstake(#[proptest(strategy = "0..USERS")] usize, #[proptest(strategy = "0i128..60_000")] i128),
    Claim(#[proptest(strategy = "0..USERS")] usize),
    Wait(#[proptest(strategy = "0u64..10_000")] u64),
}

struct Harness<'a> {
    env: Env,
    contract_id: Address,
    client: StakingLedgerContractClient<'a>,
    stake_token: TokenClient<'a>,
    users: Vec<Address>,
}

impl<'a> Harness<'a> {
    fn new() -> Self {
        Self::with_rate(RATE)
    }

    fn with_rate(rate: i128) -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().with_mut(|li| li.sequence_number = 10);

        let issuer = Address::generate(&env);
        let stake_sac = env.register_stellar_asset_contract_v2(issuer.clone());
        let reward_sac = env.register_stellar_asset_contract_v2(issuer);

        let contract_id = env.register(StakingLedgerContract, ());
        let client = StakingLedgerContractClient::new(&env, &contract_id);
        client.initialize(&stake_sac.address(), &reward_sac.address(), &rate);

        let stake_minter = StellarAssetClient::new(&env, &stake_sac.address());
        let users: Vec<Address> = (0..USERS)
            .map(|_| {
                let user = Address::generate(&env);
                stake_minter.mint(&user, &WALLET);
                user
            })
            .collect();

        // Ample reward funding so claims only fail for lack of accrual.
        let funder = Address::generate(&env);
        StellarAssetClient::new(&env, &reward_sac.address()).mint(&funder, &i64::MAX.into());
        client.fund_rewards(&funder, &i64::MAX.into());

        Harness {
            stake_token: TokenClient::new(&env, &stake_sac.address()),
            env,
            contract_id,
            client,
            users,
        }
    }

    fn apply(&self, op: &Op) {
        match *op {
            Op::Stake(i, amount) => {
                let user = &self.users[i];
                let expiration = self.env.ledger().sequence() + 100;
                self.stake_token
                    .approve(user, &self.contract_id, &amount, &expiration);
                self.client.stake(user, &amount);
            }
            Op::Unstake(i, amount) => {
                let user = &self.users[i];
                let staked = self.client.staked_tokens_amount(user);
                let result = self.client.try_unstake(user, &amount);
                if amount == 0 {
                    assert_eq!(result, Err(Ok(ContractError::InvalidAmount)));
                } else if amount > staked {
                    assert_eq!(result, Err(Ok(ContractError::InsufficientStakedBalance)));
                    assert_eq!(self.client.staked_tokens_amount(user), staked);
                } else {
                    assert!(result.is_ok());
                }
            }
            Op::Claim(i) => {
                let user = &self.users[i];
                let expected = self.client.reward_earned(user);
                match self.client.try_claim_reward(user) {
                    Ok(Ok(paid)) => assert_eq!(paid, expected),
                    other => {
                        assert_eq!(expected, 0);
                        assert_eq!(other, Err(Ok(ContractError::NothingToClaim)));
                    }
                }
            }
            Op::Wait(seconds) => {
                self.env
                    .ledger()
                    .with_mut(|li| li.timestamp = li.timestamp.saturating_add(seconds));
            }
        }
    }

    fn sum_of_stakes(&self) -> i128 {
        self.users
            .iter()
            .map(|user| self.client.staked_tokens_amount(user))
            .sum()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn total_staked_equals_sum_of_balances(ops in prop::collection::vec(any::<Op>(), 1..30)) {
        let h = Harness::new();
        for op in &ops {
            h.apply(op);
            prop_assert_eq!(h.client.get_total_staked(), h.sum_of_stakes());
            prop_assert_eq!(
                h.stake_token.balance(&h.contract_id),
                h.client.get_total_staked()
            );
        }
    }

    #[test]
    fn accumulator_never_decreases(ops in prop::collection::vec(any::<Op>(), 1..30)) {
        let h = Harness::new();
        let mut last = h.client.reward_per_token();
        for op in &ops {
            h.apply(op);
            let rpt = h.client.reward_per_token();
            prop_assert!(rpt >= last);
            last = rpt;
        }
    }

    #[test]
    fn lone_staker_earns_rate_times_elapsed(
        amount in 1i128..1_000_000,
        waits in prop::collection::vec(0u64..5_000, 1..8),
    ) {
        let h = Harness::new();
        let user = h.users[0].clone();
        h.apply(&Op::Stake(0, amount));

        let mut elapsed: u64 = 0;
        for wait in waits {
            h.apply(&Op::Wait(wait));
            elapsed += wait;
            // Queries in between must not shift the projection.
            h.client.reward_earned(&user);
        }

        let exact = RATE * i128::from(elapsed);
        let earned = h.client.reward_earned(&user);
        // One truncation in the accumulator, one in the per-user share.
        prop_assert!(earned <= exact);
        prop_assert!(exact - earned <= 1);
    }

    #[test]
    fn over_withdrawal_always_rejected(stake in 1i128..50_000, excess in 1i128..50_000) {
        let h = Harness::new();
        h.apply(&Op::Stake(1, stake));
        h.apply(&Op::Unstake(1, stake + excess));
        prop_assert_eq!(h.client.staked_tokens_amount(&h.users[1]), stake);
    }

    #[test]
    fn any_accepted_rate_keeps_unstake_open(
        rate in 0i128..=MAX_REWARD_RATE,
        amount in 1i128..1_000_000,
        idle in 0u64..400_000_000,
    ) {
        let h = Harness::with_rate(rate);
        let user = h.users[0].clone();
        h.apply(&Op::Stake(0, amount));
        h.apply(&Op::Wait(idle));

        let earned = h.client.try_reward_earned(&user);
        prop_assert!(matches!(earned, Ok(Ok(_))));

        h.apply(&Op::Unstake(0, amount));
        prop_assert_eq!(h.client.staked_tokens_amount(&user), 0);
        prop_assert_eq!(h.client.get_total_staked(), 0);
    }
}
