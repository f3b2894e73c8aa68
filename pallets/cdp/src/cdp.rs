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

//! Position lifecycle.
//!
//! Opening, adjusting and closing positions. User operations do not accrue fees, that is
//! left to the block time hook.

use crate::pallet::{
    AccountIdOf, CdpOf, CoinsOf, Config, Error, Event, NextCdpId, Pallet, Timestamp,
};
use crate::types::{
    add_coins, coins_total, normalize_coins, sub_coins, CdpId, CollateralizedDebtPosition,
};
use crate::Balance;
use frame_support::dispatch::{DispatchError, DispatchResult};
use frame_support::{ensure, transactional};
use orml_traits::MultiCurrency;
use sp_arithmetic::ArithmeticError;

impl<T: Config> Pallet<T> {
    fn single_coin(coins: &CoinsOf<T>) -> Result<(T::AssetId, Balance), DispatchError> {
        ensure!(coins.len() == 1, Error::<T>::CollateralLengthInvalid);
        coins
            .iter()
            .next()
            .map(|(asset_id, amount)| (*asset_id, *amount))
            .ok_or_else(|| Error::<T>::CollateralLengthInvalid.into())
    }

    fn arithmetic(_: ArithmeticError) -> DispatchError {
        Error::<T>::ArithmeticError.into()
    }

    /// Recomputes the ratio of the position, then persists and re-indexes it.
    fn save_cdp(cdp: &CdpOf<T>) -> DispatchResult {
        let ratio = Self::calculate_collateralization_ratio(
            &cdp.collateral(),
            &cdp.principal,
            &cdp.accumulated_fees,
        )?;
        Self::update_cdp_and_collateral_ratio_index(cdp, ratio);
        Ok(())
    }

    /// Mints `principal` to `owner` together with the matching debt asset.
    fn mint_principal(owner: &AccountIdOf<T>, principal: &CoinsOf<T>) -> DispatchResult {
        for (asset_id, amount) in principal.iter() {
            T::Currency::deposit(*asset_id, owner, *amount)?;
        }
        let total = coins_total(principal).map_err(Self::arithmetic)?;
        Self::mint_debt_coins(&Self::account_id(), total)
    }

    /// Opens a position of `owner`. Returns the id of the position.
    #[transactional]
    pub fn add_cdp(
        owner: &AccountIdOf<T>,
        collateral: CoinsOf<T>,
        principal: CoinsOf<T>,
    ) -> Result<CdpId, DispatchError> {
        let collateral = normalize_coins(collateral);
        let principal = normalize_coins(principal);
        Self::validate_collateral(&collateral)?;
        let (collateral_asset_id, collateral_amount) = Self::single_coin(&collateral)?;
        ensure!(
            Self::cdp_id_by_owner(owner, collateral_asset_id).is_none(),
            Error::<T>::CdpAlreadyExists
        );
        ensure!(!principal.is_empty(), Error::<T>::EmptyPrincipal);
        Self::validate_principal(&principal)?;
        Self::validate_collateral_debt_limit(&collateral_asset_id, &principal)?;
        Self::validate_collateralization_ratio(&collateral, &principal, &CoinsOf::<T>::new())?;

        let cdp_id = Self::next_cdp_id(&collateral_asset_id);
        let cdp = CollateralizedDebtPosition::new(
            cdp_id,
            owner.clone(),
            collateral_asset_id,
            collateral_amount,
            principal.clone(),
            Timestamp::<T>::get(),
        );
        T::Currency::transfer(
            collateral_asset_id,
            owner,
            &Self::account_id(),
            collateral_amount,
        )?;
        Self::mint_principal(owner, &principal)?;
        Self::increase_total_principal(&collateral_asset_id, &principal)?;
        Self::save_cdp(&cdp)?;
        Self::index_cdp_by_owner(&cdp);
        NextCdpId::<T>::insert(
            collateral_asset_id,
            cdp_id.checked_add(1).ok_or(Error::<T>::ArithmeticError)?,
        );
        Self::deposit_event(Event::CdpCreated {
            cdp_id,
            owner: owner.clone(),
            collateral_asset_id,
        });
        Ok(cdp_id)
    }

    /// Locks more collateral, paid by `depositor`, in the position of `owner`.
    #[transactional]
    pub fn deposit_collateral_inner(
        depositor: &AccountIdOf<T>,
        owner: &AccountIdOf<T>,
        collateral: CoinsOf<T>,
    ) -> DispatchResult {
        let collateral = normalize_coins(collateral);
        Self::validate_collateral(&collateral)?;
        let (collateral_asset_id, amount) = Self::single_coin(&collateral)?;
        let mut cdp = Self::cdp_by_owner_and_denom(owner, &collateral_asset_id)
            .ok_or(Error::<T>::CdpNotFound)?;
        T::Currency::transfer(collateral_asset_id, depositor, &Self::account_id(), amount)?;
        cdp.collateral_amount = cdp
            .collateral_amount
            .checked_add(amount)
            .ok_or(Error::<T>::ArithmeticError)?;
        Self::save_cdp(&cdp)?;
        Self::deposit_event(Event::CollateralDeposited {
            cdp_id: cdp.id,
            owner: owner.clone(),
            collateral_asset_id,
            amount,
        });
        Ok(())
    }

    /// Returns collateral to `owner` if the position stays above the liquidation ratio.
    #[transactional]
    pub fn withdraw_collateral_inner(
        owner: &AccountIdOf<T>,
        collateral: CoinsOf<T>,
    ) -> DispatchResult {
        let collateral = normalize_coins(collateral);
        let (collateral_asset_id, amount) = Self::single_coin(&collateral)?;
        let mut cdp = Self::cdp_by_owner_and_denom(owner, &collateral_asset_id)
            .ok_or(Error::<T>::CdpNotFound)?;
        ensure!(
            cdp.collateral_amount >= amount,
            Error::<T>::NotEnoughCollateral
        );
        cdp.collateral_amount -= amount;
        ensure!(
            cdp.collateral_amount > 0,
            Error::<T>::InvalidCollateralRatio
        );
        Self::validate_collateralization_ratio(
            &cdp.collateral(),
            &cdp.principal,
            &cdp.accumulated_fees,
        )?;
        T::Currency::transfer(collateral_asset_id, &Self::account_id(), owner, amount)?;
        Self::save_cdp(&cdp)?;
        Self::deposit_event(Event::CollateralWithdrawn {
            cdp_id: cdp.id,
            owner: owner.clone(),
            collateral_asset_id,
            amount,
        });
        Ok(())
    }

    /// Mints more principal against the position of `owner`.
    #[transactional]
    pub fn draw_debt_inner(
        owner: &AccountIdOf<T>,
        collateral_asset_id: &T::AssetId,
        principal: CoinsOf<T>,
    ) -> DispatchResult {
        let principal = normalize_coins(principal);
        ensure!(!principal.is_empty(), Error::<T>::EmptyPrincipal);
        let mut cdp = Self::cdp_by_owner_and_denom(owner, collateral_asset_id)
            .ok_or(Error::<T>::CdpNotFound)?;
        Self::active_collateral_param(collateral_asset_id)?;
        Self::validate_principal(&principal)?;
        Self::validate_collateral_debt_limit(collateral_asset_id, &principal)?;
        add_coins(&mut cdp.principal, &principal).map_err(Self::arithmetic)?;
        Self::validate_collateralization_ratio(
            &cdp.collateral(),
            &cdp.principal,
            &cdp.accumulated_fees,
        )?;
        Self::mint_principal(owner, &principal)?;
        Self::increase_total_principal(collateral_asset_id, &principal)?;
        Self::save_cdp(&cdp)?;
        Self::deposit_event(Event::DebtDrawn {
            cdp_id: cdp.id,
            owner: owner.clone(),
            collateral_asset_id: *collateral_asset_id,
            principal,
        });
        Ok(())
    }

    /// Burns `payment` from `owner`, fees first and principal after. Closes the position once
    /// nothing is owed.
    #[transactional]
    pub fn repay_debt_inner(
        owner: &AccountIdOf<T>,
        collateral_asset_id: &T::AssetId,
        payment: CoinsOf<T>,
    ) -> DispatchResult {
        let payment = normalize_coins(payment);
        ensure!(!payment.is_empty(), Error::<T>::InvalidPayment);
        let mut cdp = Self::cdp_by_owner_and_denom(owner, collateral_asset_id)
            .ok_or(Error::<T>::CdpNotFound)?;

        let mut fee_payment = CoinsOf::<T>::new();
        let mut principal_payment = CoinsOf::<T>::new();
        for (asset_id, amount) in payment.iter() {
            let fees = cdp
                .accumulated_fees
                .get(asset_id)
                .copied()
                .unwrap_or_default();
            let principal = cdp.principal.get(asset_id).copied().unwrap_or_default();
            let owed = fees
                .checked_add(principal)
                .ok_or(Error::<T>::ArithmeticError)?;
            ensure!(owed > 0, Error::<T>::InvalidPayment);
            ensure!(*amount <= owed, Error::<T>::PaymentExceedsDebt);
            let to_fees = fees.min(*amount);
            fee_payment.insert(*asset_id, to_fees);
            principal_payment.insert(*asset_id, *amount - to_fees);
        }
        let fee_payment = normalize_coins(fee_payment);
        let principal_payment = normalize_coins(principal_payment);

        for (asset_id, amount) in payment.iter() {
            T::Currency::withdraw(*asset_id, owner, *amount)?;
        }
        let total = coins_total(&payment).map_err(Self::arithmetic)?;
        Self::burn_debt_coins(&Self::account_id(), total)?;
        Self::decrease_total_principal(collateral_asset_id, &principal_payment)?;
        sub_coins(&mut cdp.accumulated_fees, &fee_payment).map_err(Self::arithmetic)?;
        sub_coins(&mut cdp.principal, &principal_payment).map_err(Self::arithmetic)?;

        Self::deposit_event(Event::DebtRepaid {
            cdp_id: cdp.id,
            owner: owner.clone(),
            collateral_asset_id: *collateral_asset_id,
            payment,
        });

        if cdp.principal.is_empty() && cdp.accumulated_fees.is_empty() {
            T::Currency::transfer(
                *collateral_asset_id,
                &Self::account_id(),
                owner,
                cdp.collateral_amount,
            )?;
            Self::delete_cdp_and_collateral_ratio_index(&cdp);
            Self::deposit_event(Event::CdpClosed {
                cdp_id: cdp.id,
                owner: owner.clone(),
                collateral_asset_id: *collateral_asset_id,
            });
        } else {
            Self::save_cdp(&cdp)?;
        }
        Ok(())
    }
}
