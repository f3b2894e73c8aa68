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

//! Stability fee accrual.
//!
//! Fees compound per second on principal. A pass only visits positions indexed below the
//! liquidation ratio of their collateral and re-indexes each of them with the new ratio.

use crate::compounding;
use crate::pallet::{CoinsOf, Config, Error, Event, MomentOf, Pallet};
use crate::types::{add_coins, coins_total, CdpId};
use frame_support::dispatch::DispatchError;
use frame_support::log::{debug, warn};
use frame_support::storage::with_transaction;
use sp_runtime::traits::CheckedConversion;
use sp_runtime::TransactionOutcome;

impl<T: Config> Pallet<T> {
    /// Fees owed on `principal` after `periods` seconds at the stability fee of the
    /// collateral. Assets whose fee truncates to zero are omitted.
    pub fn calculate_fees(
        principal: &CoinsOf<T>,
        periods: u64,
        collateral_asset_id: &T::AssetId,
    ) -> Result<CoinsOf<T>, DispatchError> {
        let rate = Self::params()
            .collateral_param(collateral_asset_id)
            .ok_or(Error::<T>::CollateralNotSupported)?
            .stability_fee;
        let mut fees = CoinsOf::<T>::new();
        for (asset_id, amount) in principal.iter() {
            let fee = compounding::accrued_fee(*amount, rate, periods)
                .map_err(|_| Error::<T>::ArithmeticError)?;
            if fee > 0 {
                fees.insert(*asset_id, fee);
            }
        }
        Ok(fees)
    }

    /// Whole seconds between two block times in milliseconds.
    ///
    /// Each moment is floored to its second before subtracting, so consecutive intervals add
    /// up to the seconds between the first and the last block.
    pub(crate) fn elapsed_seconds(
        previous_block_time: MomentOf<T>,
        now: MomentOf<T>,
    ) -> Result<u64, DispatchError> {
        let previous: u64 = previous_block_time
            .checked_into()
            .ok_or(Error::<T>::ArithmeticError)?;
        let now: u64 = now.checked_into().ok_or(Error::<T>::ArithmeticError)?;
        Ok((now / 1000).saturating_sub(previous / 1000))
    }

    /// Adds fees to every position of the collateral indexed below its liquidation ratio.
    ///
    /// Each position is updated in its own transaction, a failing one is rolled back and
    /// skipped. Returns the number of updated positions.
    pub fn update_fees_for_risky_cdps(
        collateral_asset_id: &T::AssetId,
        previous_block_time: MomentOf<T>,
        now: MomentOf<T>,
    ) -> Result<u32, DispatchError> {
        let liquidation_ratio = Self::params()
            .collateral_param(collateral_asset_id)
            .ok_or(Error::<T>::CollateralNotSupported)?
            .liquidation_ratio;
        let periods = Self::elapsed_seconds(previous_block_time, now)?;
        if periods == 0 {
            return Ok(0);
        }
        let mut updated = 0;
        for cdp_id in Self::cdp_ids_by_denom_and_ratio(collateral_asset_id, liquidation_ratio) {
            let result = with_transaction(|| {
                match Self::accrue_cdp_fees(collateral_asset_id, cdp_id, periods, now) {
                    Ok(accrued) => TransactionOutcome::Commit(Ok(accrued)),
                    Err(err) => TransactionOutcome::Rollback(Err(err)),
                }
            });
            match result {
                Ok(true) => updated += 1,
                Ok(false) => {}
                Err(err) => warn!(
                    "Failed to accrue fees for CDP {:?} of {:?}: {:?}",
                    cdp_id, collateral_asset_id, err
                ),
            }
        }
        Ok(updated)
    }

    /// Runs the fee pass for every collateral asset and returns the number of updated
    /// positions.
    pub fn accrue_fees(previous_block_time: MomentOf<T>, now: MomentOf<T>) -> u32 {
        let mut total = 0u32;
        for param in Self::params().collateral_params.iter() {
            match Self::update_fees_for_risky_cdps(&param.asset_id, previous_block_time, now) {
                Ok(updated) => {
                    total = total.saturating_add(updated);
                    debug!(
                        "Fees accrued for {:?} CDPs of {:?}",
                        updated, param.asset_id
                    )
                }
                Err(err) => warn!("Failed to accrue fees for {:?}: {:?}", param.asset_id, err),
            }
        }
        total
    }

    /// Returns false if nothing accrued.
    fn accrue_cdp_fees(
        collateral_asset_id: &T::AssetId,
        cdp_id: CdpId,
        periods: u64,
        now: MomentOf<T>,
    ) -> Result<bool, DispatchError> {
        let mut cdp = Self::cdp(collateral_asset_id, cdp_id).ok_or(Error::<T>::CdpNotFound)?;
        let fees = Self::calculate_fees(&cdp.principal, periods, collateral_asset_id)?;
        if fees.is_empty() {
            return Ok(false);
        }
        add_coins(&mut cdp.accumulated_fees, &fees).map_err(|_| Error::<T>::ArithmeticError)?;
        cdp.fees_updated = now;
        let minted = coins_total(&fees).map_err(|_| Error::<T>::ArithmeticError)?;
        Self::mint_debt_coins(&Self::account_id(), minted)?;
        let ratio = Self::calculate_collateralization_ratio(
            &cdp.collateral(),
            &cdp.principal,
            &cdp.accumulated_fees,
        )?;
        Self::update_cdp_and_collateral_ratio_index(&cdp, ratio);
        Self::deposit_event(Event::FeesAccrued {
            cdp_id,
            collateral_asset_id: *collateral_asset_id,
            fees,
        });
        Ok(true)
    }
}
