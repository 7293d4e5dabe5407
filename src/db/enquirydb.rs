// db/enquirydb.rs
use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    models::enquirymodel::{Counterparties, Enquiry, EnquiryKind, EnquirySubject},
    service::{error::ServiceError, valuation::money_match},
};

pub trait EnquiryExt {
    fn insert(&mut self, enquiry: Enquiry) -> &Enquiry;

    /// Applies `patch` to the stored record. The record is only replaced when the patch
    /// succeeds, so a failed lifecycle step leaves the store as it was. Id and kind are
    /// fixed, the valuation match is recomputed from the patched subject and
    /// `last_updated` is refreshed whenever the record changed.
    fn update<F>(&mut self, enquiry_id: Uuid, patch: F) -> Result<&Enquiry, ServiceError>
    where
        F: FnOnce(&Enquiry) -> Result<Enquiry, ServiceError>;

    fn find_by_id(&self, enquiry_id: Uuid) -> Option<&Enquiry>;

    fn filter<P>(&self, predicate: P) -> Vec<&Enquiry>
    where
        P: Fn(&Enquiry) -> bool;
}

/// In-memory enquiry collection, kept in insertion order and indexed by id.
/// Records are never removed.
#[derive(Debug, Clone, Default)]
pub struct EnquiryStore {
    enquiries: Vec<Enquiry>,
    index: HashMap<Uuid, usize>,
}

impl EnquiryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.enquiries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enquiries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enquiry> {
        self.enquiries.iter()
    }
}

impl EnquiryExt for EnquiryStore {
    fn insert(&mut self, enquiry: Enquiry) -> &Enquiry {
        let position = match self.index.get(&enquiry.id) {
            Some(&position) => {
                // Re-inserting a known id replaces the record in its original slot.
                tracing::debug!("Enquiry {} already stored, replacing", enquiry.id);
                self.enquiries[position] = enquiry;
                position
            }
            None => {
                let position = self.enquiries.len();
                self.index.insert(enquiry.id, position);
                self.enquiries.push(enquiry);
                position
            }
        };
        &self.enquiries[position]
    }

    fn update<F>(&mut self, enquiry_id: Uuid, patch: F) -> Result<&Enquiry, ServiceError>
    where
        F: FnOnce(&Enquiry) -> Result<Enquiry, ServiceError>,
    {
        let position = *self
            .index
            .get(&enquiry_id)
            .ok_or(ServiceError::EnquiryNotFound(enquiry_id))?;

        let current = &self.enquiries[position];
        let mut updated = patch(current)?;
        updated.id = enquiry_id;

        if updated.kind != current.kind {
            return Err(ServiceError::validation("kind", "cannot change after creation"));
        }

        updated.valuation_match_percent = match (updated.kind, &updated.subject) {
            (EnquiryKind::Exchange, EnquirySubject::Exchange { offered, received }) => {
                Some(money_match(&offered.value, &received.value)?)
            }
            (EnquiryKind::Buy | EnquiryKind::Sell, EnquirySubject::Single { .. }) => None,
            _ => {
                return Err(ServiceError::validation(
                    "subject",
                    format!("does not fit a {} enquiry", updated.kind.to_str()),
                ));
            }
        };

        let parties_fit = matches!(
            (updated.kind, &updated.counterparties),
            (EnquiryKind::Buy, Counterparties::Buyer { .. })
                | (EnquiryKind::Sell, Counterparties::Seller { .. })
                | (EnquiryKind::Exchange, Counterparties::Both { .. })
        );
        if !parties_fit {
            return Err(ServiceError::validation(
                "counterparties",
                format!("do not fit a {} enquiry", updated.kind.to_str()),
            ));
        }

        if updated != *current {
            updated.touch();
        }
        self.enquiries[position] = updated;

        Ok(&self.enquiries[position])
    }

    fn find_by_id(&self, enquiry_id: Uuid) -> Option<&Enquiry> {
        self.index
            .get(&enquiry_id)
            .map(|&position| &self.enquiries[position])
    }

    fn filter<P>(&self, predicate: P) -> Vec<&Enquiry>
    where
        P: Fn(&Enquiry) -> bool,
    {
        self.enquiries.iter().filter(|e| predicate(*e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::enquirydtos::EnquiryFilter;
    use crate::models::enquirymodel::{EnquiryKind, EnquiryStatus};
    use crate::service::enquiry_factory::tests::{buy_input, exchange_input, test_factory};
    use crate::service::lifecycle::EnquiryLifecycle;

    fn seeded() -> (EnquiryStore, Vec<Uuid>) {
        let factory = test_factory();
        let mut store = EnquiryStore::new();
        let mut ids = Vec::new();
        for enquiry in [
            factory.create(EnquiryKind::Buy, &buy_input()).unwrap(),
            factory.create(EnquiryKind::Exchange, &exchange_input("9500000", "9800000")).unwrap(),
            factory.create(EnquiryKind::Buy, &buy_input()).unwrap(),
        ] {
            ids.push(store.insert(enquiry).id);
        }
        (store, ids)
    }

    #[test]
    fn test_insert_keeps_order() {
        let (store, ids) = seeded();
        assert_eq!(store.len(), 3);
        let stored: Vec<Uuid> = store.iter().map(|e| e.id).collect();
        assert_eq!(stored, ids);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let (mut store, ids) = seeded();
        let mut copy = store.find_by_id(ids[1]).unwrap().clone();
        copy.assigned_agent = Some(Uuid::from_u128(2));
        store.insert(copy);

        assert_eq!(store.len(), 3);
        assert_eq!(store.iter().nth(1).unwrap().assigned_agent, Some(Uuid::from_u128(2)));
    }

    #[test]
    fn test_find_by_id() {
        let (store, ids) = seeded();
        assert_eq!(store.find_by_id(ids[2]).map(|e| e.id), Some(ids[2]));
        assert!(store.find_by_id(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_update_applies_patch() {
        let (mut store, ids) = seeded();
        let updated = store.update(ids[0], EnquiryLifecycle::approve).unwrap();
        assert_eq!(updated.status, EnquiryStatus::Accepted);
        assert_eq!(store.find_by_id(ids[0]).unwrap().status, EnquiryStatus::Accepted);
    }

    #[test]
    fn test_failed_patch_leaves_record() {
        let (mut store, ids) = seeded();
        store.update(ids[0], EnquiryLifecycle::reject).unwrap();
        let before = store.find_by_id(ids[0]).unwrap().clone();

        let err = store.update(ids[0], EnquiryLifecycle::approve).unwrap_err();
        assert_eq!(err.kind(), "invalid_state_transition");
        assert_eq!(store.find_by_id(ids[0]), Some(&before));
    }

    #[test]
    fn test_update_missing_id() {
        let (mut store, _) = seeded();
        let missing = Uuid::new_v4();
        assert_eq!(
            store.update(missing, EnquiryLifecycle::approve).unwrap_err(),
            ServiceError::EnquiryNotFound(missing)
        );
    }

    #[test]
    fn test_filter_with_enquiry_filter() {
        let (mut store, ids) = seeded();
        store.update(ids[2], EnquiryLifecycle::reject).unwrap();
        store
            .update(ids[1], |e| EnquiryLifecycle::assign_agent(e, Uuid::from_u128(4)))
            .unwrap();

        let buys = EnquiryFilter { kind: Some(EnquiryKind::Buy), ..Default::default() };
        assert_eq!(store.filter(|e| buys.matches(e)).len(), 2);

        let open_buys = EnquiryFilter { open_only: true, ..buys.clone() };
        let open: Vec<Uuid> = store.filter(|e| open_buys.matches(e)).iter().map(|e| e.id).collect();
        assert_eq!(open, vec![ids[0]]);

        let by_agent = EnquiryFilter { agent_id: Some(Uuid::from_u128(4)), ..Default::default() };
        assert_eq!(store.filter(|e| by_agent.matches(e))[0].id, ids[1]);

        let search = EnquiryFilter { search: Some("powai".into()), ..Default::default() };
        assert_eq!(store.filter(|e| search.matches(e)).len(), 1);

        let search = EnquiryFilter { search: Some("RAJESH".into()), ..Default::default() };
        assert_eq!(store.filter(|e| search.matches(e)).len(), 2);

        assert_eq!(store.filter(|_| true).len(), 3);
    }

    fn stored_exchange() -> (EnquiryStore, Uuid, chrono::DateTime<chrono::Utc>) {
        let mut enquiry = test_factory()
            .create(EnquiryKind::Exchange, &exchange_input("9500000", "9800000"))
            .unwrap();
        enquiry.last_updated = enquiry.last_updated - chrono::Duration::hours(1);
        let stamp = enquiry.last_updated;

        let mut store = EnquiryStore::new();
        let id = store.insert(enquiry).id;
        (store, id, stamp)
    }

    fn set_received_value(enquiry: &mut Enquiry, amount: i64) {
        if let EnquirySubject::Exchange { received, .. } = &mut enquiry.subject {
            received.value.amount = bigdecimal::BigDecimal::from(amount);
        }
    }

    #[test]
    fn test_update_refuses_kind_change() {
        let (mut store, id, _) = stored_exchange();
        let before = store.find_by_id(id).unwrap().clone();

        let err = store
            .update(id, |e| {
                let mut patched = e.clone();
                set_received_value(&mut patched, 1);
                patched.kind = EnquiryKind::Buy;
                Ok(patched)
            })
            .unwrap_err();
        assert_eq!(err, ServiceError::validation("kind", "cannot change after creation"));
        assert_eq!(store.find_by_id(id), Some(&before));
    }

    #[test]
    fn test_update_recomputes_match_and_timestamp() {
        let (mut store, id, stamp) = stored_exchange();

        let updated = store
            .update(id, |e| {
                let mut patched = e.clone();
                set_received_value(&mut patched, 4_750_000);
                Ok(patched)
            })
            .unwrap();
        assert_eq!(updated.valuation_match_percent(), Some(50));
        assert!(updated.last_updated > stamp);
    }

    #[test]
    fn test_update_without_change_keeps_timestamp() {
        let (mut store, id, stamp) = stored_exchange();
        let updated = store.update(id, |e| Ok(e.clone())).unwrap();
        assert_eq!(updated.last_updated, stamp);
        assert_eq!(updated.valuation_match_percent(), Some(97));
    }

    #[test]
    fn test_update_refuses_mismatched_shape() {
        let (mut store, id, _) = stored_exchange();

        let err = store
            .update(id, |e| {
                let mut patched = e.clone();
                let first = patched.properties()[0].clone();
                patched.subject = EnquirySubject::Single { property: first };
                Ok(patched)
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "subject"));

        let err = store
            .update(id, |e| {
                let mut patched = e.clone();
                let buyer = patched.buyer().cloned().unwrap();
                patched.counterparties = Counterparties::Buyer { buyer };
                Ok(patched)
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { ref field, .. } if field == "counterparties"));

        let err = store
            .update(id, |e| {
                let mut patched = e.clone();
                set_received_value(&mut patched, 0);
                Ok(patched)
            })
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(store.find_by_id(id).unwrap().valuation_match_percent(), Some(97));
    }
}
