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

use crate::decimal;
use crate::pallet::{CoinsOf, Config, Error, Pallet};
use crate::traits::PriceFeed;
use crate::types::add_coins;
use frame_support::dispatch::{DispatchError, DispatchResult};
use frame_support::ensure;
use sp_arithmetic::{FixedPointNumber, FixedU128};

impl<T: Config> Pallet<T> {
    pub(crate) fn price(asset_id: &T::AssetId) -> Result<FixedU128, DispatchError> {
        T::PriceFeed::current_price(asset_id).ok_or_else(|| Error::<T>::PriceNotAvailable.into())
    }

    /// USD value of `coins`.
    pub fn coins_value(coins: &CoinsOf<T>) -> Result<FixedU128, DispatchError> {
        let mut value = FixedU128::from_inner(0);
        for (asset_id, amount) in coins.iter().filter(|(_, amount)| **amount > 0) {
            let price = Self::price(asset_id)?;
            let asset_value = decimal::from_balance(*amount)
                .and_then(|amount| decimal::mul(amount, price))
                .map_err(|_| Error::<T>::ArithmeticError)?;
            value = decimal::add(value, asset_value).map_err(|_| Error::<T>::ArithmeticError)?;
        }
        Ok(value)
    }

    /// Collateral value divided by debt value, the maximal ratio if there is no debt.
    fn value_ratio(collateral: &CoinsOf<T>, debt: &CoinsOf<T>) -> Result<FixedU128, DispatchError> {
        let collateral_value = Self::coins_value(collateral)?;
        let debt_value = Self::coins_value(debt)?;
        if debt_value.into_inner() == 0 {
            return Ok(FixedU128::from_inner(u128::MAX));
        }
        decimal::quo_truncate(collateral_value, debt_value)
            .map_err(|_| Error::<T>::ArithmeticError.into())
    }

    /// Ratio of collateral value to principal value, fees excluded.
    pub fn calculate_collateral_to_debt_ratio(
        collateral: &CoinsOf<T>,
        principal: &CoinsOf<T>,
    ) -> Result<FixedU128, DispatchError> {
        Self::value_ratio(collateral, principal)
    }

    /// Ratio of collateral value to the value of principal and fees.
    pub fn calculate_collateralization_ratio(
        collateral: &CoinsOf<T>,
        principal: &CoinsOf<T>,
        fees: &CoinsOf<T>,
    ) -> Result<FixedU128, DispatchError> {
        let mut debt = principal.clone();
        add_coins(&mut debt, fees).map_err(|_| Error::<T>::ArithmeticError)?;
        Self::value_ratio(collateral, &debt)
    }

    /// Fails if the collateralization ratio is below the liquidation ratio of the collateral.
    pub fn validate_collateralization_ratio(
        collateral: &CoinsOf<T>,
        principal: &CoinsOf<T>,
        fees: &CoinsOf<T>,
    ) -> DispatchResult {
        let collateral_asset_id = collateral
            .keys()
            .next()
            .ok_or(Error::<T>::CollateralLengthInvalid)?;
        let liquidation_ratio = Self::params()
            .collateral_param(collateral_asset_id)
            .ok_or(Error::<T>::CollateralNotSupported)?
            .liquidation_ratio;
        let ratio = Self::calculate_collateralization_ratio(collateral, principal, fees)?;
        ensure!(
            ratio >= liquidation_ratio,
            Error::<T>::InvalidCollateralRatio
        );
        Ok(())
    }
}
