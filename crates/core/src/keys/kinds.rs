//! Individual key kinds.
//!
//! Each kind owns a literal prefix and knows how to render and parse its
//! payload. Payload parsing rejects anything that would not re-encode to the
//! exact same string.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;

use crate::scheduled::Action;

use super::{KeyError, KeyKind};

// ============================================================================
// Partition key kinds
// ============================================================================

opaque_kind!(
    /// Pattern: `LPA#<lpa id>`
    LpaKey,
    "LPA#"
);

opaque_kind!(
    /// Pattern: `ORGANISATION#<organisation id>`
    ///
    /// Valid in both key positions: as the partition of an organisation's
    /// records and as the owner sort key of an lpa created by an organisation.
    OrganisationKey,
    "ORGANISATION#"
);

opaque_kind!(
    /// Pattern: `DONORSHARE#<share code>`
    DonorShareKey,
    "DONORSHARE#"
);

opaque_kind!(
    /// Pattern: `CERTIFICATEPROVIDERSHARE#<share code>`
    CertificateProviderShareKey,
    "CERTIFICATEPROVIDERSHARE#"
);

opaque_kind!(
    /// Pattern: `ATTORNEYSHARE#<share code>`
    AttorneyShareKey,
    "ATTORNEYSHARE#"
);

// ============================================================================
// Sort key kinds
// ============================================================================

opaque_kind!(
    /// Pattern: `DONOR#<session id>`
    DonorKey,
    "DONOR#"
);

opaque_kind!(
    /// Pattern: `SUB#<subject>`
    SubKey,
    "SUB#"
);

opaque_kind!(
    /// Pattern: `ATTORNEY#<session id>`
    AttorneyKey,
    "ATTORNEY#"
);

opaque_kind!(
    /// Pattern: `CERTIFICATE_PROVIDER#<session id>`
    CertificateProviderKey,
    "CERTIFICATE_PROVIDER#"
);

opaque_kind!(
    /// Pattern: `DOCUMENT#<object key>`
    DocumentKey,
    "DOCUMENT#"
);

opaque_kind!(
    /// Pattern: `MEMBER#<session id>`
    MemberKey,
    "MEMBER#"
);

opaque_kind!(
    /// Pattern: `MEMBERID#<member id>`
    MemberIdKey,
    "MEMBERID#"
);

opaque_kind!(
    /// Pattern: `METADATA#<value>`
    MetadataKey,
    "METADATA#"
);

/// Pattern: `EVIDENCE_RECEIVED`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EvidenceReceivedKey;

impl KeyKind for EvidenceReceivedKey {
    const PREFIX: &'static str = "EVIDENCE_RECEIVED";

    fn payload(&self) -> String {
        String::new()
    }

    fn from_payload(payload: &str) -> Result<Self, KeyError> {
        if payload.is_empty() {
            Ok(Self)
        } else {
            Err(KeyError::invalid(Self::PREFIX, "expected no payload"))
        }
    }
}

kind_display!(EvidenceReceivedKey);

/// Pattern: `MEMBERINVITE#<base64 email>`
///
/// The email is base64 encoded (URL safe, unpadded) so it cannot clash with
/// the `#` separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberInviteKey {
    email: String,
}

impl MemberInviteKey {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl KeyKind for MemberInviteKey {
    const PREFIX: &'static str = "MEMBERINVITE#";

    fn payload(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.email.as_bytes())
    }

    fn from_payload(payload: &str) -> Result<Self, KeyError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| KeyError::invalid(Self::PREFIX, e.to_string()))?;
        let email =
            String::from_utf8(bytes).map_err(|e| KeyError::invalid(Self::PREFIX, e.to_string()))?;

        Ok(Self { email })
    }
}

kind_display!(MemberInviteKey);

/// Pattern: `DONORINVITE#<organisation id>#<lpa id>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DonorInviteKey {
    organisation_id: String,
    lpa_id: String,
}

impl DonorInviteKey {
    /// Fails if the organisation id contains the `#` separator.
    pub fn new(
        organisation_id: impl Into<String>,
        lpa_id: impl Into<String>,
    ) -> Result<Self, KeyError> {
        let organisation_id = organisation_id.into();
        if organisation_id.contains('#') {
            return Err(KeyError::invalid(
                Self::PREFIX,
                "organisation id must not contain '#'",
            ));
        }

        Ok(Self {
            organisation_id,
            lpa_id: lpa_id.into(),
        })
    }

    pub fn organisation_id(&self) -> &str {
        &self.organisation_id
    }

    pub fn lpa_id(&self) -> &str {
        &self.lpa_id
    }
}

impl KeyKind for DonorInviteKey {
    const PREFIX: &'static str = "DONORINVITE#";

    fn payload(&self) -> String {
        format!("{}#{}", self.organisation_id, self.lpa_id)
    }

    fn from_payload(payload: &str) -> Result<Self, KeyError> {
        let (organisation_id, lpa_id) = payload
            .split_once('#')
            .ok_or_else(|| KeyError::invalid(Self::PREFIX, "missing lpa id"))?;

        Self::new(organisation_id, lpa_id)
    }
}

kind_display!(DonorInviteKey);

// ============================================================================
// Scheduling kinds
// ============================================================================

const DAY_FORMAT: &str = "%Y-%m-%d";

fn parse_day(prefix: &'static str, payload: &str) -> Result<NaiveDate, KeyError> {
    let date = NaiveDate::parse_from_str(payload, DAY_FORMAT)
        .map_err(|e| KeyError::invalid(prefix, e.to_string()))?;

    if date.format(DAY_FORMAT).to_string() != payload {
        return Err(KeyError::invalid(prefix, "day is not zero padded"));
    }

    Ok(date)
}

/// Pattern: `SCHEDULEDDAY#<YYYY-MM-DD>`
///
/// The partition holding events that are still waiting to run on that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduledDayKey(NaiveDate);

impl ScheduledDayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The bucket an event due at `at` belongs to.
    pub fn for_time(at: DateTime<Utc>) -> Self {
        Self(at.date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The disjoint partition claimed events from this bucket move to.
    pub fn handled(&self) -> HandledDayKey {
        HandledDayKey(self.0)
    }
}

impl KeyKind for ScheduledDayKey {
    const PREFIX: &'static str = "SCHEDULEDDAY#";

    fn payload(&self) -> String {
        self.0.format(DAY_FORMAT).to_string()
    }

    fn from_payload(payload: &str) -> Result<Self, KeyError> {
        parse_day(Self::PREFIX, payload).map(Self)
    }
}

kind_display!(ScheduledDayKey);

/// Pattern: `HANDLEDDAY#<YYYY-MM-DD>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandledDayKey(NaiveDate);

impl HandledDayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl KeyKind for HandledDayKey {
    const PREFIX: &'static str = "HANDLEDDAY#";

    fn payload(&self) -> String {
        self.0.format(DAY_FORMAT).to_string()
    }

    fn from_payload(payload: &str) -> Result<Self, KeyError> {
        parse_day(Self::PREFIX, payload).map(Self)
    }
}

kind_display!(HandledDayKey);

/// Pattern: `SCHEDULED#<due rfc3339>#<action id>#<uuid>`
///
/// The due time is rendered with a fixed nanosecond precision so keys in a
/// bucket sort by due time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduledKey {
    at: DateTime<Utc>,
    action: Action,
    id: Uuid,
}

impl ScheduledKey {
    pub fn new(at: DateTime<Utc>, action: Action, id: Uuid) -> Self {
        Self { at, action, id }
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The day bucket this key belongs in.
    pub fn day(&self) -> ScheduledDayKey {
        ScheduledDayKey::for_time(self.at)
    }
}

impl KeyKind for ScheduledKey {
    const PREFIX: &'static str = "SCHEDULED#";

    fn payload(&self) -> String {
        format!(
            "{}#{}#{}",
            self.at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            u8::from(self.action),
            self.id
        )
    }

    fn from_payload(payload: &str) -> Result<Self, KeyError> {
        let mut parts = payload.splitn(3, '#');
        let (Some(at), Some(action), Some(id)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(KeyError::invalid(Self::PREFIX, "expected <at>#<action>#<id>"));
        };

        let at = DateTime::parse_from_rfc3339(at)
            .map_err(|e| KeyError::invalid(Self::PREFIX, e.to_string()))?
            .with_timezone(&Utc);
        let action: u8 = action
            .parse()
            .map_err(|_| KeyError::invalid(Self::PREFIX, format!("invalid action: {action}")))?;
        let id = Uuid::parse_str(id).map_err(|e| KeyError::invalid(Self::PREFIX, e.to_string()))?;

        let key = Self::new(at, Action::from(action), id);
        if key.payload() != payload {
            return Err(KeyError::invalid(Self::PREFIX, "payload is not canonical"));
        }

        Ok(key)
    }
}

kind_display!(ScheduledKey);
