// service/enquiry_service.rs
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    db::enquirydb::{EnquiryExt, EnquiryStore},
    dtos::enquirydtos::{CloseEnquiryDto, CreateEnquiryDto, EnquiryFilter, PropertySide},
    models::{
        agentmodel::ReferenceData,
        enquirymodel::{Enquiry, EnquiryKind, EnquiryStage, EnquiryStatus},
    },
    service::{
        enquiry_factory::EnquiryFactory,
        error::ServiceError,
        lifecycle::EnquiryLifecycle,
        stage_tracker::{StageProgress, StageTracker},
    },
};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnquirySummary {
    pub total: usize,
    pub open: usize,
    pub by_status: BTreeMap<EnquiryStatus, usize>,
    pub by_kind: BTreeMap<EnquiryKind, usize>,
    pub fair_exchanges: usize,
}

/// Owns the enquiry store and runs every operator action against it. One instance per
/// desk; callers hold it explicitly and serialize their calls through `&mut self`.
#[derive(Debug)]
pub struct EnquiryService {
    store: EnquiryStore,
    factory: EnquiryFactory,
    reference: Arc<ReferenceData>,
    fair_exchange_threshold: u8,
}

impl EnquiryService {
    pub fn new(config: &Config, reference: Arc<ReferenceData>) -> Self {
        Self::with_store(config, reference, EnquiryStore::new())
    }

    pub fn with_store(config: &Config, reference: Arc<ReferenceData>, store: EnquiryStore) -> Self {
        Self {
            store,
            factory: EnquiryFactory::new(reference.clone(), &config.default_currency),
            reference,
            fair_exchange_threshold: config.fair_exchange_threshold,
        }
    }

    pub fn create_enquiry(
        &mut self,
        kind: EnquiryKind,
        input: &CreateEnquiryDto,
    ) -> Result<Enquiry, ServiceError> {
        let enquiry = self.factory.create(kind, input).map_err(|e| {
            tracing::warn!("Rejected {} enquiry: {}", kind.to_str(), e);
            e
        })?;

        let stored = self.store.insert(enquiry).clone();
        tracing::info!(
            enquiry_id = %stored.id,
            kind = stored.kind.to_str(),
            "Enquiry created"
        );
        Ok(stored)
    }

    pub fn start_negotiation(&mut self, enquiry_id: Uuid) -> Result<Enquiry, ServiceError> {
        self.apply(enquiry_id, "start negotiation", EnquiryLifecycle::start_negotiation)
    }

    pub fn approve(&mut self, enquiry_id: Uuid) -> Result<Enquiry, ServiceError> {
        self.apply(enquiry_id, "approve", EnquiryLifecycle::approve)
    }

    pub fn reject(&mut self, enquiry_id: Uuid) -> Result<Enquiry, ServiceError> {
        self.apply(enquiry_id, "reject", EnquiryLifecycle::reject)
    }

    pub fn close(
        &mut self,
        enquiry_id: Uuid,
        request: &CloseEnquiryDto,
    ) -> Result<Enquiry, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::from_validation("", &e))?;

        self.apply(enquiry_id, "close", |enquiry| {
            EnquiryLifecycle::close(enquiry, &request.reason, request.outcome)
        })
    }

    pub fn assign_agent(
        &mut self,
        enquiry_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Enquiry, ServiceError> {
        let agent = self
            .reference
            .find_agent(agent_id)
            .ok_or(ServiceError::AgentNotFound(agent_id))?;
        tracing::debug!("Assigning agent {} to enquiry {}", agent.name, enquiry_id);

        self.apply(enquiry_id, "assign agent", |enquiry| {
            EnquiryLifecycle::assign_agent(enquiry, agent_id)
        })
    }

    /// Operator stage edit. Terminal enquiries are refused; otherwise any stage is allowed.
    pub fn set_stage(
        &mut self,
        enquiry_id: Uuid,
        stage: EnquiryStage,
    ) -> Result<Enquiry, ServiceError> {
        self.apply(enquiry_id, "set stage", |enquiry| {
            EnquiryLifecycle::ensure_editable(enquiry, "change stage")?;
            Ok(StageTracker::set_stage(enquiry, stage))
        })
    }

    pub fn revalue(
        &mut self,
        enquiry_id: Uuid,
        side: PropertySide,
        value: &str,
    ) -> Result<Enquiry, ServiceError> {
        let factory = &self.factory;
        let enquiry = self
            .store
            .update(enquiry_id, |enquiry| factory.revalue(enquiry, side, value))
            .map_err(|e| {
                tracing::warn!("Revalue of enquiry {} failed: {}", enquiry_id, e);
                e
            })?
            .clone();

        tracing::info!(
            enquiry_id = %enquiry_id,
            valuation_match = ?enquiry.valuation_match_percent(),
            "Enquiry revalued"
        );
        Ok(enquiry)
    }

    pub fn get(&self, enquiry_id: Uuid) -> Result<&Enquiry, ServiceError> {
        self.store
            .find_by_id(enquiry_id)
            .ok_or(ServiceError::EnquiryNotFound(enquiry_id))
    }

    pub fn list(&self, filter: &EnquiryFilter) -> Vec<&Enquiry> {
        self.store.filter(|enquiry| filter.matches(enquiry))
    }

    pub fn progress(&self, enquiry_id: Uuid) -> Result<StageProgress, ServiceError> {
        Ok(StageTracker::progress_of(self.get(enquiry_id)?.stage))
    }

    pub fn summary(&self) -> EnquirySummary {
        let mut summary = EnquirySummary {
            total: self.store.len(),
            open: 0,
            by_status: EnquiryStatus::ALL.iter().map(|s| (*s, 0)).collect(),
            by_kind: BTreeMap::new(),
            fair_exchanges: 0,
        };

        for enquiry in self.store.iter() {
            *summary.by_status.entry(enquiry.status).or_insert(0) += 1;
            *summary.by_kind.entry(enquiry.kind).or_insert(0) += 1;
            if !enquiry.is_terminal() {
                summary.open += 1;
            }
            if enquiry
                .valuation_match_percent()
                .is_some_and(|percent| percent >= self.fair_exchange_threshold)
            {
                summary.fair_exchanges += 1;
            }
        }

        summary
    }

    pub fn store(&self) -> &EnquiryStore {
        &self.store
    }

    fn apply<F>(&mut self, enquiry_id: Uuid, action: &str, patch: F) -> Result<Enquiry, ServiceError>
    where
        F: FnOnce(&Enquiry) -> Result<Enquiry, ServiceError>,
    {
        match self.store.update(enquiry_id, patch) {
            Ok(enquiry) => {
                tracing::info!(
                    enquiry_id = %enquiry_id,
                    status = enquiry.status.to_str(),
                    stage = enquiry.stage.to_str(),
                    "Enquiry {} succeeded",
                    action
                );
                Ok(enquiry.clone())
            }
            Err(e) => {
                tracing::warn!("Cannot {} enquiry {}: {}", action, enquiry_id, e);
                Err(e)
            }
        }
    }
}
