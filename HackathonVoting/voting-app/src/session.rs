use crate::errors::ClientError;
use crate::types::Address;

/// The wallet connection the app acts through
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    user: Option<Address>,
    read_only: bool,
}

impl Session {
    pub fn connected(user: Address) -> Self {
        Self {
            user: Some(user),
            read_only: false,
        }
    }

    pub fn disconnected() -> Self {
        Self {
            user: None,
            read_only: false,
        }
    }

    /// Browse-only access: no wallet, no write affordances
    pub fn visitor() -> Self {
        Self {
            user: None,
            read_only: true,
        }
    }

    pub fn user(&self) -> Option<&Address> {
        self.user.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Address to sign writes with
    pub fn require_writer(&self) -> Result<Address, ClientError> {
        if self.read_only {
            return Err(ClientError::ReadOnly);
        }
        self.user.ok_or(ClientError::NotConnected)
    }
}
