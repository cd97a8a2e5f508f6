use bitcoin::Amount;
use chain_dfi::dftx::{
    AccountToAccount, AccountToUtxos, AnyAccountToAccount, AppointOracle, CreateMasternode,
    PoolAddLiquidity, PoolCreatePair, PoolRemoveLiquidity, PoolSwap, RemoveOracle,
    ResignMasternode, SetGovernance, SetOracleData, TokenBalance, TokenCreate, TokenMint,
    TokenUpdate, UtxosToAccount, UpdateOracle,
};
use chain_dfi::{DfTx, Script, TransactionSegWit};

use super::{sum, TxnBuilder};
use crate::error::TxnBuilderError;
use crate::provider::{EllipticPairProvider, FeeRateProvider, PrevoutProvider};

/// Builders for payloads that move no value beyond the fee.
macro_rules! payload_builders {
    ($($(#[$meta:meta])* $name:ident($payload:ty);)+) => {
        $(
            $(#[$meta])*
            pub async fn $name(
                &self,
                payload: $payload,
                change_script: &Script,
            ) -> Result<TransactionSegWit, TxnBuilderError> {
                self.build_custom_tx(DfTx::new(payload), change_script, None)
                    .await
            }
        )+
    };
}

impl<F, P, E> TxnBuilder<F, P, E>
where
    F: FeeRateProvider,
    P: PrevoutProvider,
    E: EllipticPairProvider,
{
    payload_builders! {
        pool_swap(PoolSwap);
        add_liquidity(PoolAddLiquidity);
        remove_liquidity(PoolRemoveLiquidity);
        /// Needs a foundation-authorised input to be accepted by the node.
        create_pool_pair(PoolCreatePair);
        mint_tokens(TokenMint);
        create_token(TokenCreate);
        update_token(TokenUpdate);
        account_to_account(AccountToAccount);
        any_account_to_account(AnyAccountToAccount);
        appoint_oracle(AppointOracle);
        update_oracle(UpdateOracle);
        remove_oracle(RemoveOracle);
        set_oracle_data(SetOracleData);
        create_masternode(CreateMasternode);
        resign_masternode(ResignMasternode);
        set_governance(SetGovernance);
    }

    /// Convert UTXO value into account balances. The native amount credited
    /// to the accounts is carried on the DfTx output.
    pub async fn utxos_to_account(
        &self,
        payload: UtxosToAccount,
        change_script: &Script,
    ) -> Result<TransactionSegWit, TxnBuilderError> {
        let spend = native_total(payload.to.iter().flat_map(|to| to.balances.iter()))?;
        self.build_custom_tx(DfTx::new(payload), change_script, Some(spend))
            .await
    }

    /// Convert account balances back into UTXOs paid to `payload.from`.
    ///
    /// The minted output follows the DfTx output, so `minting_outputs_start`
    /// is set to `1`.
    pub async fn account_to_utxos(
        &self,
        mut payload: AccountToUtxos,
        change_script: &Script,
    ) -> Result<TransactionSegWit, TxnBuilderError> {
        let spend = native_total(payload.balances.iter())?;
        payload.minting_outputs_start = 1;
        self.build_custom_tx(DfTx::new(payload), change_script, Some(spend))
            .await
    }
}

fn native_total<'a>(
    balances: impl Iterator<Item = &'a TokenBalance>,
) -> Result<Amount, TxnBuilderError> {
    sum(balances.filter(|b| b.token == 0).map(|b| b.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_dfi::dftx::ScriptBalances;

    #[test]
    fn native_total_skips_tokens() {
        let to = [ScriptBalances {
            script: Script::p2wpkh(&[1; 20]),
            balances: vec![
                TokenBalance::new(0, Amount::from_sat(300)),
                TokenBalance::new(5, Amount::from_sat(9_999)),
                TokenBalance::new(0, Amount::from_sat(200)),
            ],
        }];
        let total = native_total(to.iter().flat_map(|t| t.balances.iter())).unwrap();
        assert_eq!(total, Amount::from_sat(500));
    }
}
