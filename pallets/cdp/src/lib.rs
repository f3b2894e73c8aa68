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

//! Collateralized debt positions.
//!
//! Users lock a single collateral asset and mint debt assets against it. Positions are
//! indexed by owner and by collateralization ratio; the latter lets fee accrual visit only
//! positions below the liquidation ratio of their collateral.

#![cfg_attr(not(feature = "std"), no_std)]

use frame_support::dispatch::DispatchClass;
use frame_support::log::debug;
use frame_support::traits::OnTimestampSet;
use weights::WeightInfo as _;
pub use pallet::*;

#[cfg(test)]
mod mock;

#[cfg(test)]
mod tests;

#[cfg(test)]
mod test_utils;

mod cdp;
mod compounding;
pub mod decimal;
mod fees;
mod ratio;
mod store;
pub mod traits;
pub mod types;
mod validation;
pub mod weights;

pub type Balance = u128;

pub use types::{
    CdpId, CdpParams, CollateralParam, CollateralRatioKey, CollateralizedDebtPosition, Coins,
    DebtParam,
};

#[frame_support::pallet]
pub mod pallet {
    use super::*;
    use crate::traits::PriceFeed;
    use crate::weights::WeightInfo;
    use frame_support::pallet_prelude::*;
    use frame_support::PalletId;
    use frame_system::pallet_prelude::*;
    use orml_traits::MultiCurrency;
    use pallet_timestamp as timestamp;
    use sp_arithmetic::FixedU128;
    use sp_runtime::traits::{AccountIdConversion, MaybeSerializeDeserialize, Member};

    #[pallet::pallet]
    #[pallet::generate_store(pub(super) trait Store)]
    #[pallet::without_storage_info]
    pub struct Pallet<T>(PhantomData<T>);

    #[pallet::config]
    pub trait Config: frame_system::Config + timestamp::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        type AssetId: Parameter + Member + MaxEncodedLen + Copy + Ord + MaybeSerializeDeserialize;

        /// Holds collateral, mints and burns debt assets
        type Currency: MultiCurrency<
            Self::AccountId,
            CurrencyId = Self::AssetId,
            Balance = Balance,
        >;

        /// USD prices of collateral and debt assets
        type PriceFeed: PriceFeed<Self::AssetId>;

        /// Internal asset minted for every unit of principal or fee, its issuance tracks the
        /// debt created by the pallet
        #[pallet::constant]
        type DebtAssetId: Get<Self::AssetId>;

        #[pallet::constant]
        type PalletId: Get<PalletId>;

        /// Id of the first position of every collateral asset
        #[pallet::constant]
        type CdpStartingId: Get<CdpId>;

        /// Weight information for extrinsics in this pallet.
        type WeightInfo: WeightInfo;
    }

    pub type Timestamp<T> = timestamp::Pallet<T>;
    pub type AccountIdOf<T> = <T as frame_system::Config>::AccountId;
    pub type MomentOf<T> = <T as timestamp::Config>::Moment;
    pub type CoinsOf<T> = Coins<<T as Config>::AssetId>;
    pub type CdpOf<T> =
        CollateralizedDebtPosition<AccountIdOf<T>, <T as Config>::AssetId, MomentOf<T>>;

    #[pallet::type_value]
    pub fn DefaultNextCdpId<T: Config>() -> CdpId {
        T::CdpStartingId::get()
    }

    /// Collateral and debt parameters
    #[pallet::storage]
    #[pallet::getter(fn params)]
    pub type Params<T: Config> = StorageValue<_, CdpParams<T::AssetId>, ValueQuery>;

    /// Id the next position of the collateral asset gets
    #[pallet::storage]
    pub type NextCdpId<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AssetId, CdpId, ValueQuery, DefaultNextCdpId<T>>;

    /// All positions, by collateral asset and id
    #[pallet::storage]
    #[pallet::getter(fn cdp)]
    pub type Cdps<T: Config> =
        StorageDoubleMap<_, Blake2_128Concat, T::AssetId, Twox64Concat, CdpId, CdpOf<T>>;

    /// Position id of an owner for a collateral asset
    #[pallet::storage]
    #[pallet::getter(fn cdp_id_by_owner)]
    pub type CdpIdsByOwner<T: Config> =
        StorageDoubleMap<_, Blake2_128Concat, T::AccountId, Blake2_128Concat, T::AssetId, CdpId>;

    /// Range index of positions by collateralization ratio.
    /// The second key is not hashed, so iteration follows ratio order.
    #[pallet::storage]
    pub type CollateralRatioIndex<T: Config> =
        StorageDoubleMap<_, Blake2_128Concat, T::AssetId, Identity, CollateralRatioKey, ()>;

    /// Ratio each position is currently indexed under
    #[pallet::storage]
    pub type IndexedCollateralRatios<T: Config> =
        StorageDoubleMap<_, Blake2_128Concat, T::AssetId, Twox64Concat, CdpId, FixedU128>;

    /// Outstanding principal by collateral asset and debt asset
    #[pallet::storage]
    #[pallet::getter(fn total_principal)]
    pub type TotalPrincipals<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AssetId,
        Blake2_128Concat,
        T::AssetId,
        Balance,
        ValueQuery,
    >;

    /// Outstanding principal by debt asset
    #[pallet::storage]
    #[pallet::getter(fn debt_total)]
    pub type DebtTotals<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AssetId, Balance, ValueQuery>;

    /// Block time of the last fee accrual pass
    #[pallet::storage]
    #[pallet::getter(fn previous_block_time)]
    pub type PreviousBlockTime<T: Config> = StorageValue<_, T::Moment>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        CdpCreated {
            cdp_id: CdpId,
            owner: AccountIdOf<T>,
            collateral_asset_id: T::AssetId,
        },
        CdpClosed {
            cdp_id: CdpId,
            owner: AccountIdOf<T>,
            collateral_asset_id: T::AssetId,
        },
        CollateralDeposited {
            cdp_id: CdpId,
            owner: AccountIdOf<T>,
            collateral_asset_id: T::AssetId,
            amount: Balance,
        },
        CollateralWithdrawn {
            cdp_id: CdpId,
            owner: AccountIdOf<T>,
            collateral_asset_id: T::AssetId,
            amount: Balance,
        },
        DebtDrawn {
            cdp_id: CdpId,
            owner: AccountIdOf<T>,
            collateral_asset_id: T::AssetId,
            principal: CoinsOf<T>,
        },
        DebtRepaid {
            cdp_id: CdpId,
            owner: AccountIdOf<T>,
            collateral_asset_id: T::AssetId,
            payment: CoinsOf<T>,
        },
        FeesAccrued {
            cdp_id: CdpId,
            collateral_asset_id: T::AssetId,
            fees: CoinsOf<T>,
        },
        ParamsUpdated,
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Collateral asset is unknown or inactive
        CollateralNotSupported,
        /// Collateral must be exactly one asset
        CollateralLengthInvalid,
        DebtNotSupported,
        ExceedsDebtLimit,
        /// Collateralization ratio is below the liquidation ratio
        InvalidCollateralRatio,
        PriceNotAvailable,
        ArithmeticError,
        CdpNotFound,
        /// Owner already has a position for the collateral asset
        CdpAlreadyExists,
        EmptyPrincipal,
        NotEnoughCollateral,
        /// Payment in an asset the position does not owe
        InvalidPayment,
        PaymentExceedsDebt,
        /// Only the pallet account mints and burns the debt asset
        UnauthorizedModule,
        InvalidParams,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Opens a position, locking `collateral` and minting `principal` to the caller.
        #[pallet::call_index(0)]
        #[pallet::weight(<T as Config>::WeightInfo::create_cdp())]
        pub fn create_cdp(
            origin: OriginFor<T>,
            collateral: CoinsOf<T>,
            principal: CoinsOf<T>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::add_cdp(&who, collateral, principal)?;
            Ok(())
        }

        /// Adds collateral to the position of `owner`, paid by the caller.
        #[pallet::call_index(1)]
        #[pallet::weight(<T as Config>::WeightInfo::deposit_collateral())]
        pub fn deposit_collateral(
            origin: OriginFor<T>,
            owner: AccountIdOf<T>,
            collateral: CoinsOf<T>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::deposit_collateral_inner(&who, &owner, collateral)
        }

        #[pallet::call_index(2)]
        #[pallet::weight(<T as Config>::WeightInfo::withdraw_collateral())]
        pub fn withdraw_collateral(
            origin: OriginFor<T>,
            collateral: CoinsOf<T>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::withdraw_collateral_inner(&who, collateral)
        }

        #[pallet::call_index(3)]
        #[pallet::weight(<T as Config>::WeightInfo::draw_debt())]
        pub fn draw_debt(
            origin: OriginFor<T>,
            collateral_asset_id: T::AssetId,
            principal: CoinsOf<T>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::draw_debt_inner(&who, &collateral_asset_id, principal)
        }

        /// Repays fees first, then principal. The position is closed and its collateral
        /// returned once nothing is owed.
        #[pallet::call_index(4)]
        #[pallet::weight(<T as Config>::WeightInfo::repay_debt())]
        pub fn repay_debt(
            origin: OriginFor<T>,
            collateral_asset_id: T::AssetId,
            payment: CoinsOf<T>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::repay_debt_inner(&who, &collateral_asset_id, payment)
        }

        #[pallet::call_index(5)]
        #[pallet::weight(<T as Config>::WeightInfo::set_params())]
        pub fn set_params(origin: OriginFor<T>, params: CdpParams<T::AssetId>) -> DispatchResult {
            ensure_root(origin)?;
            ensure!(params.validate(), Error::<T>::InvalidParams);
            Params::<T>::put(params);
            Self::deposit_event(Event::ParamsUpdated);
            Ok(())
        }
    }

    #[pallet::genesis_config]
    pub struct GenesisConfig<T: Config> {
        pub params: CdpParams<T::AssetId>,
    }

    #[cfg(feature = "std")]
    impl<T: Config> Default for GenesisConfig<T> {
        fn default() -> Self {
            Self {
                params: Default::default(),
            }
        }
    }

    #[pallet::genesis_build]
    impl<T: Config> GenesisBuild<T> for GenesisConfig<T> {
        fn build(&self) {
            assert!(self.params.validate(), "invalid cdp params");
            Params::<T>::put(&self.params);
        }
    }

    impl<T: Config> Pallet<T> {
        /// Account holding collateral and the debt asset.
        pub fn account_id() -> AccountIdOf<T> {
            T::PalletId::get().into_account_truncating()
        }

        /// Mints `amount` of the debt asset to `module`.
        pub fn mint_debt_coins(module: &AccountIdOf<T>, amount: Balance) -> DispatchResult {
            ensure!(
                *module == Self::account_id(),
                Error::<T>::UnauthorizedModule
            );
            T::Currency::deposit(T::DebtAssetId::get(), module, amount)
        }

        /// Burns `amount` of the debt asset held by `module`.
        pub fn burn_debt_coins(module: &AccountIdOf<T>, amount: Balance) -> DispatchResult {
            ensure!(
                *module == Self::account_id(),
                Error::<T>::UnauthorizedModule
            );
            T::Currency::withdraw(T::DebtAssetId::get(), module, amount)
        }
    }
}

impl<T: Config> OnTimestampSet<T::Moment> for Pallet<T> {
    /// Accrues fees for the time elapsed since the previous block.
    ///
    /// The work is bounded by the number of positions below their liquidation ratio and is
    /// registered as mandatory weight of the block.
    fn on_timestamp_set(now: T::Moment) {
        let previous_block_time = PreviousBlockTime::<T>::get().unwrap_or(now);
        let updated = Self::accrue_fees(previous_block_time, now);
        PreviousBlockTime::<T>::put(now);
        let collaterals = Self::params().collateral_params.len() as u32;
        frame_system::Pallet::<T>::register_extra_weight_unchecked(
            <T as Config>::WeightInfo::accrue_fees(collaterals, updated),
            DispatchClass::Mandatory,
        );
        debug!(
            "Fees accrued for {:?}, previous block time {:?}",
            now, previous_block_time
        );
    }
}
