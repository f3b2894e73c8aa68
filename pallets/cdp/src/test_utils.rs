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

use crate::mock::{
    alice_account_id, bob_account_id, charlie_account_id, AccountId, AssetId, Moment,
    RuntimeOrigin, System, TestRuntime, Timestamp, Tokens, DEBT,
};
use crate::{Balance, CdpId, CdpOf, Coins, CollateralParam, CollateralizedDebtPosition, Pallet};

use frame_support::assert_ok;
use frame_support::traits::OnFinalize;
use frame_system::pallet_prelude::OriginFor;
use orml_traits::MultiCurrency;
use sp_arithmetic::{FixedPointNumber, FixedU128};

pub type CdpPallet = Pallet<TestRuntime>;

/// Regular client account Alice
pub fn alice() -> OriginFor<TestRuntime> {
    RuntimeOrigin::signed(alice_account_id())
}

/// Regular client account Bob
pub fn bob() -> OriginFor<TestRuntime> {
    RuntimeOrigin::signed(bob_account_id())
}

pub fn charlie() -> OriginFor<TestRuntime> {
    RuntimeOrigin::signed(charlie_account_id())
}

pub fn coins(entries: &[(AssetId, Balance)]) -> Coins<AssetId> {
    entries.iter().copied().collect()
}

pub fn rational(numerator: u128, denominator: u128) -> FixedU128 {
    FixedU128::saturating_from_rational(numerator, denominator)
}

pub fn free_balance(asset_id: AssetId, account: &AccountId) -> Balance {
    Tokens::free_balance(asset_id, account)
}

/// Debt asset held by the pallet account
pub fn debt_supply() -> Balance {
    free_balance(DEBT, &CdpPallet::account_id())
}

/// Sets the block time in milliseconds through the timestamp inherent, which triggers fee
/// accrual, and finalizes the block.
pub fn run_to_time(now: Moment) {
    System::set_block_number(System::block_number() + 1);
    assert_ok!(Timestamp::set(RuntimeOrigin::none(), now));
    Timestamp::on_finalize(System::block_number());
}

/// Opens a position with a single principal asset.
pub fn create_cdp(
    origin: OriginFor<TestRuntime>,
    collateral: (AssetId, Balance),
    principal: (AssetId, Balance),
) {
    assert_ok!(CdpPallet::create_cdp(
        origin,
        coins(&[collateral]),
        coins(&[principal])
    ));
}

/// Changes the parameters of a collateral asset.
pub fn update_collateral_param(
    asset_id: AssetId,
    update: impl FnOnce(&mut CollateralParam<AssetId>),
) {
    let mut params = CdpPallet::params();
    let param = params
        .collateral_params
        .iter_mut()
        .find(|param| param.asset_id == asset_id)
        .expect("collateral param must exist");
    update(param);
    assert_ok!(CdpPallet::set_params(RuntimeOrigin::root(), params));
}

/// Stores a position directly, bypassing validation, and indexes it under its current
/// collateralization ratio.
pub fn store_cdp(
    cdp_id: CdpId,
    owner: AccountId,
    collateral: (AssetId, Balance),
    principal: Coins<AssetId>,
) -> CdpOf<TestRuntime> {
    let cdp =
        CollateralizedDebtPosition::new(cdp_id, owner, collateral.0, collateral.1, principal, 0);
    let ratio = CdpPallet::calculate_collateralization_ratio(
        &cdp.collateral(),
        &cdp.principal,
        &cdp.accumulated_fees,
    )
    .unwrap();
    CdpPallet::update_cdp_and_collateral_ratio_index(&cdp, ratio);
    CdpPallet::index_cdp_by_owner(&cdp);
    cdp
}
