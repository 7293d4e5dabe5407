use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::error::ServiceError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
}

/// Read-only lookup tables consumed by the enquiry desk: the agent directory plus the
/// property-type and currency lists offered by the wizard. An empty list accepts any value.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub property_types: Vec<String>,
    #[serde(default)]
    pub currencies: Vec<String>,
}

impl ReferenceData {
    pub fn builtin() -> Self {
        let agent = |n: u128, name: &str, email: &str, region: &str| Agent {
            id: Uuid::from_u128(n),
            name: name.to_string(),
            email: Some(email.to_string()),
            phone: None,
            region: Some(region.to_string()),
        };

        Self {
            agents: vec![
                agent(1, "Priya Sharma", "priya.sharma@example.com", "Mumbai"),
                agent(2, "Amit Patel", "amit.patel@example.com", "Pune"),
                agent(3, "Sneha Reddy", "sneha.reddy@example.com", "Bengaluru"),
                agent(4, "Vikram Singh", "vikram.singh@example.com", "Delhi NCR"),
            ],
            property_types: [
                "Apartment",
                "Villa",
                "Independent House",
                "Plot",
                "Commercial",
                "Office Space",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            currencies: ["INR", "USD", "AED"].iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ServiceError> {
        serde_json::from_str(raw)
            .map_err(|e| ServiceError::ReferenceData(format!("Invalid reference data: {}", e)))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ServiceError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::ReferenceData(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn find_agent(&self, agent_id: Uuid) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == agent_id)
    }

    /// Canonical spelling of a property type, matched case-insensitively.
    pub fn resolve_property_type(&self, property_type: &str) -> Option<String> {
        if self.property_types.is_empty() {
            return Some(property_type.to_string());
        }
        self.property_types
            .iter()
            .find(|known| known.eq_ignore_ascii_case(property_type))
            .cloned()
    }

    pub fn is_known_currency(&self, currency: &str) -> bool {
        self.currencies.is_empty()
            || self
                .currencies
                .iter()
                .any(|known| known.eq_ignore_ascii_case(currency))
    }
}
