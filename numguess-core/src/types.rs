use alloy::primitives::{Address, TxHash, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connected wallet account. Ownership is derived from the contract owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    wallet_address: Address,
    owner_address: Address,
}

impl Session {
    pub fn new(wallet_address: Address, owner_address: Address) -> Self {
        Self {
            wallet_address,
            owner_address,
        }
    }

    pub fn wallet_address(&self) -> Address {
        self.wallet_address
    }

    pub fn owner_address(&self) -> Address {
        self.owner_address
    }

    // Address equality is on the raw 20 bytes, so checksum casing never matters.
    pub fn is_owner(&self) -> bool {
        self.wallet_address == self.owner_address
    }
}

/// Last values read from the contract. Advisory only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractView {
    pub max_prize: U256,
    pub balance: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Play,
    SetMaxPrize,
    SetHiddenNumber,
    Withdraw,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Play => "play",
            ActionKind::SetMaxPrize => "update the max prize",
            ActionKind::SetHiddenNumber => "update the hidden number",
            ActionKind::Withdraw => "withdraw funds",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The one transaction allowed in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    pub kind: ActionKind,
    pub started_at: DateTime<Utc>,
}

impl PendingAction {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            started_at: Utc::now(),
        }
    }
}

/// Idle -> Submitting -> (Confirmed | Failed) -> Idle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxPhase {
    #[default]
    Idle,
    Submitting(ActionKind),
    Confirmed(ActionKind),
    Failed(ActionKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Success,
    Error,
    Info,
}

/// Human-readable status line shown after every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_kind(StatusKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_kind(StatusKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_kind(StatusKind::Info, message)
    }

    fn with_kind(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            StatusKind::Success => "OK",
            StatusKind::Error => "ERROR",
            StatusKind::Info => "INFO",
        };
        write!(f, "[{}] {}", marker, self.message)
    }
}

/// Confirmation of a mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}
