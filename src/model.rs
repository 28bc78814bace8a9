use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Item type discriminator for login records. Only logins participate in dedup.
pub const LOGIN_TYPE: i64 = 1;

/// The flattened, hashed record shape all dedup logic operates over.
///
/// `password` and `totp` hold SHA-256 digests by the time a record is
/// constructed — plaintext secrets never survive past the sanitize step.
/// `username` and `uri` are lower-cased so identity is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub revision_date: DateTime<Utc>,
    pub creation_date: DateTime<Utc>,
    pub deleted_date: Option<DateTime<Utc>>,
    pub uri: Option<String>,
    pub totp: Option<String>,
    #[serde(rename = "type")]
    pub item_type: i64,
}

/// The (uri, username, password-digest) triple deciding whether two records
/// represent the same logical credential. Absent components participate as
/// absent values.
pub type IdentityKey = (Option<String>, Option<String>, Option<String>);

impl CanonicalRecord {
    pub fn identity_key(&self) -> IdentityKey {
        (
            self.uri.clone(),
            self.username.clone(),
            self.password.clone(),
        )
    }

    /// The (uri, username) pair used by reconciliation. Deliberately excludes
    /// the password digest: the survivor's password is the representative for
    /// its group.
    pub fn partial_key(&self) -> (Option<&str>, Option<&str>) {
        (self.uri.as_deref(), self.username.as_deref())
    }

    pub fn is_login(&self) -> bool {
        self.item_type == LOGIN_TYPE
    }
}

/// Aggregate result of a deletion batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeleteSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub failed_ids: Vec<String>,
}
