//! Shared fixtures for action and runner tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use lpa_core::domain::{
    AttorneyProvided, CertificateProvider, CertificateProviderProvided, Channel, Donor,
    DonorProvided, Language, Lpa,
};
use lpa_core::keys::{AttorneyKey, CertificateProviderKey, DonorKey, LpaKey, LpaOwnerKey};
use lpa_core::ports::{
    AttorneyStore, CertificateProviderStore, ClientError, Clock, DonorStore, Email,
    EmailRecipient, EventClient, FixedClock, LetterRequested, LpaResolver, NotificationSent,
    NotifyClient,
};
use lpa_core::scheduled::{Action, Event};
use lpa_core::storage::{Result as StoreResult, StorageClient, StorageClientExt, StoreError};

use super::steps::StepDeps;
use crate::clients::StaticBundle;
use crate::storage::inmemory::InMemoryClient;
use crate::stores::{
    StorageAttorneyStore, StorageCertificateProviderStore, StorageDonorStore, StoreLpaResolver,
};

pub const LPA_UID: &str = "M-1111-2222-3333";

/// Monday 10 June 2024, midday.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
}

/// An unsigned lpa for Sam Smith, with Charlie Cooper as certificate
/// provider. Both are online and prefer English.
pub fn donor_provided() -> DonorProvided {
    let donor = Donor {
        uid: Uuid::from_u128(1),
        first_names: "Sam".to_string(),
        last_name: "Smith".to_string(),
        email: "donor@example.com".to_string(),
        contact_language_preference: Language::En,
        channel: Channel::Online,
    };

    let mut provided = DonorProvided::new(
        LpaKey::new("lpa-1"),
        LpaOwnerKey::donor(DonorKey::new("donor-session")),
        LPA_UID,
        donor,
        now(),
    );
    provided.certificate_provider = CertificateProvider {
        uid: Uuid::from_u128(2),
        first_names: "Charlie".to_string(),
        last_name: "Cooper".to_string(),
        email: "cp@example.com".to_string(),
        ..Default::default()
    };
    provided
}

/// A certificate provider who has started but done nothing yet.
pub fn certificate_provider_provided(donor: &DonorProvided) -> CertificateProviderProvided {
    CertificateProviderProvided {
        pk: donor.pk.clone(),
        sk: CertificateProviderKey::new("cp-session"),
        lpa_id: donor.lpa_id.clone(),
        lpa_uid: donor.lpa_uid.clone(),
        uid: donor.certificate_provider.uid,
        contact_language_preference: None,
        tasks: Default::default(),
        signed_at: None,
        updated_at: now(),
    }
}

/// An attorney who has started but not signed.
pub fn attorney_provided(donor: &DonorProvided, uid: Uuid) -> AttorneyProvided {
    AttorneyProvided {
        pk: donor.pk.clone(),
        sk: AttorneyKey::new(format!("session-{uid}")),
        lpa_id: donor.lpa_id.clone(),
        lpa_uid: donor.lpa_uid.clone(),
        uid,
        is_replacement: false,
        is_trust_corporation: false,
        contact_language_preference: None,
        signed_at: None,
        updated_at: now(),
    }
}

/// An event due now, targeting the donor's lpa.
pub fn event_for(donor: &DonorProvided) -> Event {
    Event::new(
        now(),
        Action::ExpireDonorIdentity,
        donor.pk.clone(),
        donor.sk.clone(),
        donor.lpa_uid.clone(),
        Uuid::new_v4(),
    )
}

/// In-memory storage and recording clients, with the clock fixed at [`now`].
pub struct Fixture {
    pub client: Arc<InMemoryClient>,
    pub clock: FixedClock,
    pub notify: Arc<RecordingNotifyClient>,
    pub events: Arc<RecordingEventClient>,
}

pub fn deps() -> Fixture {
    Fixture {
        client: Arc::new(InMemoryClient::new()),
        clock: FixedClock::new(now()),
        notify: Arc::new(RecordingNotifyClient::default()),
        events: Arc::new(RecordingEventClient::default()),
    }
}

impl Fixture {
    /// Action collaborators backed by the real stores over this fixture.
    pub fn step_deps(&self) -> StepDeps {
        let client: Arc<dyn StorageClient> = self.client.clone();
        let clock: Arc<dyn Clock> = Arc::new(self.clock.clone());
        let certificate_provider_store: Arc<dyn CertificateProviderStore> =
            Arc::new(StorageCertificateProviderStore::new(client.clone()));

        StepDeps {
            donor_store: Arc::new(StorageDonorStore::new(client.clone(), clock.clone())),
            certificate_provider_store: certificate_provider_store.clone(),
            attorney_store: Arc::new(StorageAttorneyStore::new(client)),
            lpa_resolver: Arc::new(StoreLpaResolver::new(certificate_provider_store)),
            notify_client: self.notify.clone(),
            event_client: self.events.clone(),
            bundle: Arc::new(StaticBundle::new()),
            clock,
            app_public_url: "http://app".to_string(),
        }
    }

    pub fn deps(&self) -> Arc<StepDeps> {
        Arc::new(self.step_deps())
    }

    pub async fn save_donor(&self, provided: &DonorProvided) {
        self.client.create_value(provided).await.unwrap();
    }

    pub async fn save_certificate_provider(&self, provided: &CertificateProviderProvided) {
        self.client.create_value(provided).await.unwrap();
    }

    pub async fn save_attorney(&self, provided: &AttorneyProvided) {
        self.client.create_value(provided).await.unwrap();
    }
}

/// Fails every store and resolver call.
pub struct FailingStore;

fn failure() -> StoreError {
    StoreError::QueryFailed("table unavailable".to_string())
}

#[async_trait]
impl DonorStore for FailingStore {
    async fn one(&self, _: &LpaKey, _: &LpaOwnerKey) -> StoreResult<DonorProvided> {
        Err(failure())
    }

    async fn put(&self, _: &DonorProvided) -> StoreResult<()> {
        Err(failure())
    }
}

#[async_trait]
impl CertificateProviderStore for FailingStore {
    async fn one(&self, _: &LpaKey) -> StoreResult<CertificateProviderProvided> {
        Err(failure())
    }
}

#[async_trait]
impl AttorneyStore for FailingStore {
    async fn all(&self, _: &str) -> StoreResult<Vec<AttorneyProvided>> {
        Err(failure())
    }
}

#[async_trait]
impl LpaResolver for FailingStore {
    async fn resolve(&self, _: &DonorProvided) -> StoreResult<Lpa> {
        Err(failure())
    }
}

/// Records sent emails. A failing template is rejected without recording.
#[derive(Default)]
pub struct RecordingNotifyClient {
    emails: Mutex<Vec<(EmailRecipient, String, Email)>>,
    fail_on: Mutex<Option<&'static str>>,
}

impl RecordingNotifyClient {
    pub fn emails(&self) -> Vec<(EmailRecipient, String, Email)> {
        self.emails.lock().unwrap().clone()
    }

    pub fn fail_on(&self, template: &'static str) {
        *self.fail_on.lock().unwrap() = Some(template);
    }
}

#[async_trait]
impl NotifyClient for RecordingNotifyClient {
    async fn send_actor_email(
        &self,
        to: &EmailRecipient,
        lpa_uid: &str,
        email: &Email,
    ) -> Result<(), ClientError> {
        if *self.fail_on.lock().unwrap() == Some(email.template()) {
            return Err(ClientError::Rejected(email.template().to_string()));
        }

        self.emails
            .lock()
            .unwrap()
            .push((to.clone(), lpa_uid.to_string(), email.clone()));
        Ok(())
    }

    fn email_greeting(&self, lpa: &Lpa) -> String {
        format!("Dear {}", lpa.donor.full_name())
    }
}

/// Records published events. A failing letter type is rejected without
/// recording.
#[derive(Default)]
pub struct RecordingEventClient {
    letters: Mutex<Vec<LetterRequested>>,
    notifications: Mutex<Vec<NotificationSent>>,
    fail_on: Mutex<Option<&'static str>>,
}

impl RecordingEventClient {
    pub fn letters(&self) -> Vec<LetterRequested> {
        self.letters.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<NotificationSent> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn fail_on(&self, letter_type: &'static str) {
        *self.fail_on.lock().unwrap() = Some(letter_type);
    }
}

#[async_trait]
impl EventClient for RecordingEventClient {
    async fn send_letter_requested(&self, event: &LetterRequested) -> Result<(), ClientError> {
        if *self.fail_on.lock().unwrap() == Some(event.letter_type) {
            return Err(ClientError::Rejected(event.letter_type.to_string()));
        }

        self.letters.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn send_notification_sent(&self, event: &NotificationSent) -> Result<(), ClientError> {
        self.notifications.lock().unwrap().push(event.clone());
        Ok(())
    }
}
