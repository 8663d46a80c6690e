use std::fmt;

use serde::{Deserialize, Serialize};

/// A business operation that can be scheduled.
///
/// Stored as its numeric id. Unknown ids decode as [`Action::Unrecognised`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Action {
    ExpireDonorIdentity,
    RemindCertificateProviderToComplete,
    RemindCertificateProviderToConfirmIdentity,
    RemindAttorneyToComplete,
    Unrecognised(u8),
}

impl Action {
    /// Every action this build can dispatch.
    pub const KNOWN: [Action; 4] = [
        Action::ExpireDonorIdentity,
        Action::RemindCertificateProviderToComplete,
        Action::RemindCertificateProviderToConfirmIdentity,
        Action::RemindAttorneyToComplete,
    ];
}

impl From<u8> for Action {
    fn from(id: u8) -> Self {
        match id {
            1 => Action::ExpireDonorIdentity,
            2 => Action::RemindCertificateProviderToComplete,
            3 => Action::RemindCertificateProviderToConfirmIdentity,
            4 => Action::RemindAttorneyToComplete,
            other => Action::Unrecognised(other),
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        match action {
            Action::ExpireDonorIdentity => 1,
            Action::RemindCertificateProviderToComplete => 2,
            Action::RemindCertificateProviderToConfirmIdentity => 3,
            Action::RemindAttorneyToComplete => 4,
            Action::Unrecognised(id) => id,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ExpireDonorIdentity => f.write_str("ExpireDonorIdentity"),
            Action::RemindCertificateProviderToComplete => {
                f.write_str("RemindCertificateProviderToComplete")
            }
            Action::RemindCertificateProviderToConfirmIdentity => {
                f.write_str("RemindCertificateProviderToConfirmIdentity")
            }
            Action::RemindAttorneyToComplete => f.write_str("RemindAttorneyToComplete"),
            Action::Unrecognised(id) => write!(f, "Action({id})"),
        }
    }
}
