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

use crate::pallet::{CoinsOf, Config, DebtTotals, Error, Pallet, TotalPrincipals};
use crate::types::coins_total;
use crate::types::CollateralParam;
use frame_support::dispatch::{DispatchError, DispatchResult};
use frame_support::ensure;

impl<T: Config> Pallet<T> {
    /// Parameters of a collateral asset which accepts new positions and debt.
    pub(crate) fn active_collateral_param(
        collateral_asset_id: &T::AssetId,
    ) -> Result<CollateralParam<T::AssetId>, DispatchError> {
        match Self::params().collateral_param(collateral_asset_id) {
            Some(param) if param.active => Ok(param.clone()),
            _ => Err(Error::<T>::CollateralNotSupported.into()),
        }
    }

    /// Collateral has to be a single, supported and active asset.
    pub fn validate_collateral(collateral: &CoinsOf<T>) -> DispatchResult {
        for collateral_asset_id in collateral.keys() {
            Self::active_collateral_param(collateral_asset_id)?;
        }
        ensure!(collateral.len() == 1, Error::<T>::CollateralLengthInvalid);
        Ok(())
    }

    /// Every debt asset has to be supported and stay under its debt limit.
    pub fn validate_principal(principal: &CoinsOf<T>) -> DispatchResult {
        let params = Self::params();
        for (asset_id, amount) in principal.iter() {
            let debt_param = params
                .debt_param(asset_id)
                .ok_or(Error::<T>::DebtNotSupported)?;
            let total = Self::debt_total(asset_id)
                .checked_add(*amount)
                .ok_or(Error::<T>::ArithmeticError)?;
            ensure!(
                total <= debt_param.debt_limit,
                Error::<T>::ExceedsDebtLimit
            );
        }
        Ok(())
    }

    /// Principal backed by the collateral asset, all debt assets together, has to stay under
    /// the collateral debt limit.
    pub fn validate_collateral_debt_limit(
        collateral_asset_id: &T::AssetId,
        principal: &CoinsOf<T>,
    ) -> DispatchResult {
        let debt_limit = Self::params()
            .collateral_param(collateral_asset_id)
            .ok_or(Error::<T>::CollateralNotSupported)?
            .debt_limit;
        let outstanding = TotalPrincipals::<T>::iter_prefix_values(collateral_asset_id)
            .try_fold(0u128, |total, amount| total.checked_add(amount))
            .ok_or(Error::<T>::ArithmeticError)?;
        let total = coins_total(principal)
            .ok()
            .and_then(|amount| outstanding.checked_add(amount))
            .ok_or(Error::<T>::ArithmeticError)?;
        ensure!(total <= debt_limit, Error::<T>::ExceedsDebtLimit);
        Ok(())
    }

    pub(crate) fn increase_total_principal(
        collateral_asset_id: &T::AssetId,
        principal: &CoinsOf<T>,
    ) -> DispatchResult {
        for (asset_id, amount) in principal.iter() {
            TotalPrincipals::<T>::try_mutate(collateral_asset_id, asset_id, |total| {
                *total = total
                    .checked_add(*amount)
                    .ok_or(Error::<T>::ArithmeticError)?;
                DispatchResult::Ok(())
            })?;
            DebtTotals::<T>::try_mutate(asset_id, |total| {
                *total = total
                    .checked_add(*amount)
                    .ok_or(Error::<T>::ArithmeticError)?;
                DispatchResult::Ok(())
            })?;
        }
        Ok(())
    }

    pub(crate) fn decrease_total_principal(
        collateral_asset_id: &T::AssetId,
        principal: &CoinsOf<T>,
    ) -> DispatchResult {
        for (asset_id, amount) in principal.iter() {
            TotalPrincipals::<T>::try_mutate(collateral_asset_id, asset_id, |total| {
                *total = total
                    .checked_sub(*amount)
                    .ok_or(Error::<T>::ArithmeticError)?;
                DispatchResult::Ok(())
            })?;
            DebtTotals::<T>::try_mutate(asset_id, |total| {
                *total = total
                    .checked_sub(*amount)
                    .ok_or(Error::<T>::ArithmeticError)?;
                DispatchResult::Ok(())
            })?;
        }
        Ok(())
    }
}
