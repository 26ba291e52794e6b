use alloy::primitives::{Address, B256, Bytes, TxKind, U256};

#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub to: TxKind,
    pub value: U256,
    pub data: Bytes,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub tx_hash: B256,
    pub contract_address: Option<Address>,
    pub success: bool,
}
