//! Conversion of a provider-independent [`RecordChange`] into a Route53
//! change batch.

use aws_sdk_route53::error::BuildError;
use aws_sdk_route53::types::{Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType};
use ddns_core::traits::{self, RecordChange, RecordType};
use ddns_core::{Error, Result};

use crate::PROVIDER_NAME;

fn map_build_err(e: BuildError) -> Error {
    Error::provider(PROVIDER_NAME, format!("cannot build change batch: {}", e))
}

fn action(action: traits::ChangeAction) -> ChangeAction {
    match action {
        traits::ChangeAction::Upsert => ChangeAction::Upsert,
    }
}

fn rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
    }
}

/// Build the record set: one value, fixed TTL
pub fn to_record_set(change: &RecordChange) -> Result<ResourceRecordSet> {
    ResourceRecordSet::builder()
        .name(&change.record_name)
        .r#type(rr_type(change.record_type))
        .ttl(change.ttl_secs)
        .resource_records(
            ResourceRecord::builder()
                .value(&change.value)
                .build()
                .map_err(map_build_err)?,
        )
        .build()
        .map_err(map_build_err)
}

/// Build a change batch holding exactly one change
pub fn to_change_batch(change: &RecordChange) -> Result<ChangeBatch> {
    ChangeBatch::builder()
        .changes(
            Change::builder()
                .action(action(change.action))
                .resource_record_set(to_record_set(change)?)
                .build()
                .map_err(map_build_err)?,
        )
        .comment(&change.comment)
        .build()
        .map_err(map_build_err)
}
