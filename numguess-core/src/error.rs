use thiserror::Error;

pub type Result<T> = std::result::Result<T, NumguessError>;

/// Coarse classification used when rendering a failure as status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before anything reached the wallet or the chain.
    LocalValidation,
    /// Rejected by the wallet, the RPC node or the contract.
    Provider,
    /// Configuration, IO and other ambient failures.
    Internal,
}

#[derive(Error, Debug)]
pub enum NumguessError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Invalid ETH amount: {0}")]
    InvalidAmount(String),

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Only the contract owner can {0}")]
    NotOwner(String),

    #[error("Another transaction is still pending: {0}")]
    Busy(String),

    #[error("maxPrize {max_prize} wei exceeds half of balance {balance} wei")]
    PrizeExceedsHalfBalance { max_prize: String, balance: String },

    #[error("Withdrawal of {amount} wei exceeds contract balance {balance} wei")]
    WithdrawExceedsBalance { amount: String, balance: String },

    #[error("No wallet provider available: {0}")]
    NoProvider(String),

    #[error("Account access rejected: {0}")]
    AccessRejected(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl NumguessError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingInput(field.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_owner(action: impl Into<String>) -> Self {
        Self::NotOwner(action.into())
    }

    pub fn dialog(msg: impl Into<String>) -> Self {
        Self::Dialog(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingInput(_)
            | Self::InvalidNumber(_)
            | Self::InvalidAmount(_)
            | Self::NotConnected
            | Self::NotOwner(_)
            | Self::Busy(_)
            | Self::PrizeExceedsHalfBalance { .. }
            | Self::WithdrawExceedsBalance { .. } => ErrorKind::LocalValidation,
            Self::NoProvider(_)
            | Self::AccessRejected(_)
            | Self::Provider(_)
            | Self::Reverted(_) => ErrorKind::Provider,
            Self::InvalidAddress(_)
            | Self::Config(_)
            | Self::Serialization(_)
            | Self::Io(_)
            | Self::Dialog(_) => ErrorKind::Internal,
        }
    }

    pub fn is_local(&self) -> bool {
        self.kind() == ErrorKind::LocalValidation
    }
}

// conversions from alloy errors; everything the chain side raises is a provider error
impl From<alloy::contract::Error> for NumguessError {
    fn from(err: alloy::contract::Error) -> Self {
        NumguessError::Provider(err.to_string())
    }
}

impl From<alloy::transports::TransportError> for NumguessError {
    fn from(err: alloy::transports::TransportError) -> Self {
        NumguessError::Provider(err.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for NumguessError {
    fn from(err: alloy::providers::PendingTransactionError) -> Self {
        NumguessError::Provider(err.to_string())
    }
}

impl From<dialoguer::Error> for NumguessError {
    fn from(err: dialoguer::Error) -> Self {
        NumguessError::Dialog(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(NumguessError::missing("guess").is_local());
        assert!(NumguessError::NotConnected.is_local());
        assert_eq!(
            NumguessError::provider("execution reverted").kind(),
            ErrorKind::Provider
        );
        assert_eq!(NumguessError::config("bad url").kind(), ErrorKind::Internal);
    }
}
