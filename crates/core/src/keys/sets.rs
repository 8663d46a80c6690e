use super::kinds::{
    AttorneyKey, AttorneyShareKey, CertificateProviderKey, CertificateProviderShareKey,
    DocumentKey, DonorInviteKey, DonorKey, DonorShareKey, EvidenceReceivedKey, HandledDayKey,
    LpaKey, MemberIdKey, MemberInviteKey, MemberKey, MetadataKey, OrganisationKey,
    ScheduledDayKey, ScheduledKey, SubKey,
};

key_set!(
    /// Any kind valid as a partition key.
    PartitionKey {
        Lpa(LpaKey),
        Organisation(OrganisationKey),
        DonorShare(DonorShareKey),
        CertificateProviderShare(CertificateProviderShareKey),
        AttorneyShare(AttorneyShareKey),
        ScheduledDay(ScheduledDayKey),
        HandledDay(HandledDayKey),
    }
);

key_set!(
    /// Any kind valid as a sort key.
    SortKey {
        Donor(DonorKey),
        Sub(SubKey),
        Attorney(AttorneyKey),
        CertificateProvider(CertificateProviderKey),
        Document(DocumentKey),
        EvidenceReceived(EvidenceReceivedKey),
        Organisation(OrganisationKey),
        Member(MemberKey),
        MemberInvite(MemberInviteKey),
        MemberId(MemberIdKey),
        Metadata(MetadataKey),
        DonorInvite(DonorInviteKey),
        Scheduled(ScheduledKey),
    }
);
