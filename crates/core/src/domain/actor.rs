use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Channel, Language};

/// The role an actor plays on an lpa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorType {
    Donor,
    CertificateProvider,
    Attorney,
    ReplacementAttorney,
    TrustCorporation,
    ReplacementTrustCorporation,
    Correspondent,
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActorType::Donor => "donor",
            ActorType::CertificateProvider => "certificateProvider",
            ActorType::Attorney => "attorney",
            ActorType::ReplacementAttorney => "replacementAttorney",
            ActorType::TrustCorporation => "trustCorporation",
            ActorType::ReplacementTrustCorporation => "replacementTrustCorporation",
            ActorType::Correspondent => "correspondent",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub postcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Donor {
    #[serde(rename = "UID")]
    pub uid: Uuid,
    pub first_names: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact_language_preference: Language,
    #[serde(default)]
    pub channel: Channel,
}

impl Donor {
    pub fn full_name(&self) -> String {
        full_name(&self.first_names, &self.last_name)
    }
}

/// Someone the donor nominated to receive correspondence instead of them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Correspondent {
    #[serde(rename = "UID")]
    pub uid: Uuid,
    pub first_names: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Address,
}

impl Correspondent {
    pub fn full_name(&self) -> String {
        full_name(&self.first_names, &self.last_name)
    }
}

/// The certificate provider as the donor entered them, plus what the
/// certificate provider has since provided themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateProvider {
    #[serde(rename = "UID")]
    pub uid: Uuid,
    pub first_names: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub channel: Channel,
    #[serde(default)]
    pub contact_language_preference: Option<Language>,
    #[serde(default)]
    pub signed_at: Option<DateTime<Utc>>,
}

impl CertificateProvider {
    pub fn full_name(&self) -> String {
        full_name(&self.first_names, &self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attorney {
    #[serde(rename = "UID")]
    pub uid: Uuid,
    pub first_names: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub channel: Channel,
}

impl Attorney {
    pub fn full_name(&self) -> String {
        full_name(&self.first_names, &self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustCorporation {
    #[serde(rename = "UID")]
    pub uid: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub channel: Channel,
}

/// Attorneys of one kind (original or replacement).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attorneys {
    #[serde(default)]
    pub attorneys: Vec<Attorney>,
    #[serde(default)]
    pub trust_corporation: Option<TrustCorporation>,
}

fn full_name(first_names: &str, last_name: &str) -> String {
    format!("{first_names} {last_name}")
}
