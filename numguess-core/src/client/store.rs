use crate::error::{NumguessError, Result};
use crate::types::{ActionKind, ContractView, PendingAction, Session, Status, TxPhase};
use alloy::primitives::U256;

/// All state the session client exposes to a front-end.
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Option<Session>,
    view: ContractView,
    phase: TxPhase,
    pending: Option<PendingAction>,
    status: Option<Status>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_owner(&self) -> bool {
        self.session.as_ref().map_or(false, Session::is_owner)
    }

    pub fn view(&self) -> ContractView {
        self.view
    }

    pub fn phase(&self) -> TxPhase {
        self.phase
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub(crate) fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub(crate) fn clear_session(&mut self) {
        self.session = None;
    }

    pub(crate) fn set_view(&mut self, view: ContractView) {
        self.view = view;
    }

    pub(crate) fn set_balance(&mut self, balance: U256) {
        self.view.balance = balance;
    }

    pub(crate) fn set_max_prize(&mut self, max_prize: U256) {
        self.view.max_prize = max_prize;
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    pub(crate) fn clear_status(&mut self) {
        self.status = None;
    }

    /// Fail if a transaction is already in flight.
    pub(crate) fn ensure_idle(&self) -> Result<()> {
        match &self.pending {
            Some(pending) => Err(NumguessError::Busy(pending.kind.to_string())),
            None => Ok(()),
        }
    }

    /// Idle -> Submitting
    pub(crate) fn begin(&mut self, kind: ActionKind) -> Result<()> {
        self.ensure_idle()?;
        self.pending = Some(PendingAction::new(kind));
        self.phase = TxPhase::Submitting(kind);
        Ok(())
    }

    /// Submitting -> Confirmed | Failed
    pub(crate) fn finish<T>(&mut self, kind: ActionKind, outcome: Result<T>) -> Result<T> {
        self.pending = None;
        self.phase = match outcome {
            Ok(_) => TxPhase::Confirmed(kind),
            Err(_) => TxPhase::Failed(kind),
        };
        outcome
    }

    /// Confirmed | Failed -> Idle
    pub fn acknowledge(&mut self) {
        if !matches!(self.phase, TxPhase::Submitting(_)) {
            self.phase = TxPhase::Idle;
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
