// This file is part of the SORA network and Polkaswap app.

// Copyright (c) 2020, 2021, Polka Biome Ltd. All rights reserved.
// SPDX-License-Identifier: BSD-4-Clause

// Redistribution and use in source and binary forms, with or without modification,
// are permitted provided that the following conditions are met:

// Redistributions of source code must retain the above copyright notice, this list
// of conditions and the following disclaimer.
// Redistributions in binary form must reproduce the above copyright notice, this
// list of conditions and the following disclaimer in the documentation and/or other
// materials provided with the distribution.
//
// All advertising materials mentioning features or use of this software must display
// the following acknowledgement: This product includes software developed by Polka Biome
// Ltd., SORA, and Polkaswap.
//
// Neither the name of the Polka Biome Ltd. nor the names of its contributors may be used
// to endorse or promote products derived from this software without specific prior written permission.

// THIS SOFTWARE IS PROVIDED BY Polka Biome Ltd. AS IS AND ANY EXPRESS OR IMPLIED WARRANTIES,
// INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL Polka Biome Ltd. BE LIABLE FOR ANY
// DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING,
// BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS;
// OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT,
// STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
// USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use crate as cdp;

use crate::traits::PriceFeed;
use crate::{Balance, CdpId, CdpParams, CollateralParam, DebtParam};
use frame_support::traits::{ConstU16, ConstU64};
use frame_support::traits::{Everything, GenesisBuild};
use frame_support::weights::constants::RocksDbWeight;
use frame_support::{parameter_types, PalletId};
use hex_literal::hex;
use orml_traits::parameter_type_with_key;
use sp_arithmetic::traits::One;
use sp_arithmetic::{FixedPointNumber, FixedU128};
use sp_core::H256;
use sp_runtime::{
    testing::Header,
    traits::{BlakeTwo256, IdentityLookup},
    AccountId32,
};
use sp_std::cell::RefCell;
use sp_std::collections::btree_map::BTreeMap;

pub type AccountId = AccountId32;
pub type AssetId = u32;
pub type Moment = u64;
type Amount = i128;
type Block = frame_system::mocking::MockBlock<TestRuntime>;
type UncheckedExtrinsic = frame_system::mocking::MockUncheckedExtrinsic<TestRuntime>;

pub const XRP: AssetId = 1;
pub const BTC: AssetId = 2;
pub const USDX: AssetId = 3;
pub const SUSD: AssetId = 4;
pub const DEBT: AssetId = 5;
/// Neither collateral nor debt
pub const LOL: AssetId = 6;

/// Initial balance of every test account in each collateral asset
pub const INITIAL_BALANCE: Balance = 10_000_000_000_000;

/// 5% per year, compounded per second
pub fn default_stability_fee() -> FixedU128 {
    FixedU128::from_inner(1_547_125_958)
}

thread_local! {
    static PRICES: RefCell<BTreeMap<AssetId, FixedU128>> = RefCell::new(BTreeMap::new());
}

/// Prices are set per test with [`MockPriceFeed::set_price`].
pub struct MockPriceFeed;

impl MockPriceFeed {
    pub fn set_price(asset_id: AssetId, price: FixedU128) {
        PRICES.with(|prices| prices.borrow_mut().insert(asset_id, price));
    }

    pub fn remove_price(asset_id: AssetId) {
        PRICES.with(|prices| prices.borrow_mut().remove(&asset_id));
    }

    fn set_default_prices() {
        PRICES.with(|prices| {
            let mut prices = prices.borrow_mut();
            prices.clear();
            prices.insert(XRP, FixedU128::saturating_from_rational(1, 4));
            prices.insert(BTC, FixedU128::saturating_from_integer(8000));
            prices.insert(USDX, FixedU128::one());
            prices.insert(SUSD, FixedU128::one());
        });
    }
}

impl PriceFeed<AssetId> for MockPriceFeed {
    fn current_price(asset_id: &AssetId) -> Option<FixedU128> {
        PRICES.with(|prices| prices.borrow().get(asset_id).copied())
    }
}

frame_support::construct_runtime!(
    pub enum TestRuntime where
        Block = Block,
        NodeBlock = Block,
        UncheckedExtrinsic = UncheckedExtrinsic,
    {
        System: frame_system::{Pallet, Call, Storage, Event<T>},
        Timestamp: pallet_timestamp::{Pallet, Call, Storage, Inherent},
        Tokens: tokens::{Pallet, Call, Config<T>, Storage, Event<T>},
        Cdp: cdp::{Pallet, Call, Config<T>, Storage, Event<T>},
    }
);

parameter_types! {
    // Timestamp
    pub const MinimumPeriod: u64 = 5;

    // Cdp
    pub const CdpPalletId: PalletId = PalletId(*b"cdp/acnt");
    pub const DebtAssetId: AssetId = DEBT;
    pub const CdpStartingId: CdpId = 1;
}

parameter_type_with_key! {
    pub ExistentialDeposits: |_currency_id: AssetId| -> Balance {
        0
    };
}

impl frame_system::Config for TestRuntime {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Index = u64;
    type BlockNumber = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = AccountId;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Header = Header;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type DbWeight = RocksDbWeight;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = ();
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ConstU16<42>;
    type OnSetCode = ();
    type MaxConsumers = frame_support::traits::ConstU32<16>;
}

impl tokens::Config for TestRuntime {
    type RuntimeEvent = RuntimeEvent;
    type Balance = Balance;
    type Amount = Amount;
    type CurrencyId = AssetId;
    type WeightInfo = ();
    type ExistentialDeposits = ExistentialDeposits;
    type CurrencyHooks = ();
    type MaxLocks = ();
    type MaxReserves = ();
    type ReserveIdentifier = ();
    type DustRemovalWhitelist = Everything;
}

impl pallet_timestamp::Config for TestRuntime {
    type Moment = Moment;
    type OnTimestampSet = Cdp;
    type MinimumPeriod = MinimumPeriod;
    type WeightInfo = ();
}

impl cdp::Config for TestRuntime {
    type RuntimeEvent = RuntimeEvent;
    type AssetId = AssetId;
    type Currency = Tokens;
    type PriceFeed = MockPriceFeed;
    type DebtAssetId = DebtAssetId;
    type PalletId = CdpPalletId;
    type CdpStartingId = CdpStartingId;
    type WeightInfo = cdp::weights::SubstrateWeight<TestRuntime>;
}

pub fn alice_account_id() -> AccountId {
    AccountId32::from(hex!(
        "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d"
    ))
}

pub fn bob_account_id() -> AccountId {
    AccountId32::from(hex!(
        "8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48"
    ))
}

pub fn charlie_account_id() -> AccountId {
    AccountId32::from(hex!(
        "90b5ab205c6974c9ea841be688864633dc9ca8a357843eeacf2314649965fe22"
    ))
}

/// XRP: liquidation ratio 2, BTC: liquidation ratio 1.5. USDX and SUSD are debt.
pub fn default_params() -> CdpParams<AssetId> {
    CdpParams {
        collateral_params: vec![
            CollateralParam {
                asset_id: XRP,
                debt_limit: 500_000_000_000,
                active: true,
                liquidation_ratio: FixedU128::saturating_from_integer(2),
                stability_fee: default_stability_fee(),
            },
            CollateralParam {
                asset_id: BTC,
                debt_limit: 500_000_000_000,
                active: true,
                liquidation_ratio: FixedU128::saturating_from_rational(3, 2),
                stability_fee: default_stability_fee(),
            },
        ],
        debt_params: vec![
            DebtParam {
                asset_id: USDX,
                debt_limit: 1_000_000_000_000,
            },
            DebtParam {
                asset_id: SUSD,
                debt_limit: 1_000_000_000_000,
            },
        ],
    }
}

// Builds testing externalities
pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut storage = frame_system::GenesisConfig::default()
        .build_storage::<TestRuntime>()
        .unwrap();

    let accounts = [alice_account_id(), bob_account_id(), charlie_account_id()];
    tokens::GenesisConfig::<TestRuntime> {
        balances: accounts
            .iter()
            .flat_map(|account| {
                [
                    (account.clone(), XRP, INITIAL_BALANCE),
                    (account.clone(), BTC, INITIAL_BALANCE),
                ]
            })
            .collect(),
    }
    .assimilate_storage(&mut storage)
    .unwrap();

    cdp::GenesisConfig::<TestRuntime> {
        params: default_params(),
    }
    .assimilate_storage(&mut storage)
    .unwrap();

    MockPriceFeed::set_default_prices();

    let mut ext: sp_io::TestExternalities = storage.into();
    ext.execute_with(|| System::set_block_number(1));
    ext
}
