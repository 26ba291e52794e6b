/// How the sending account signs transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalletType {
    /// Key read from the `PRIVATE_KEY` environment variable
    #[default]
    PrivateKey,
    Ledger,
    Trezor,
}
