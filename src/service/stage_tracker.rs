// service/stage_tracker.rs
use serde::Serialize;

use crate::models::enquirymodel::{Enquiry, EnquiryStage};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageProgress {
    pub completed_stages: Vec<EnquiryStage>,
    pub current_stage: EnquiryStage,
    pub remaining_stages: Vec<EnquiryStage>,
    pub percent_complete: u8, // 0 at Initial, 100 at Completed
}

pub struct StageTracker;

impl StageTracker {
    pub fn progress_of(stage: EnquiryStage) -> StageProgress {
        let position = stage.position();
        let steps = EnquiryStage::ALL.len() - 1;

        StageProgress {
            completed_stages: EnquiryStage::ALL[..position].to_vec(),
            current_stage: stage,
            remaining_stages: EnquiryStage::ALL[position + 1..].to_vec(),
            percent_complete: (position * 100 / steps) as u8,
        }
    }

    /// Operator overwrite of the stage. Any stage may be chosen, including an earlier one,
    /// and the status is left alone.
    pub fn set_stage(enquiry: &Enquiry, new_stage: EnquiryStage) -> Enquiry {
        let mut updated = enquiry.clone();
        if updated.stage != new_stage {
            updated.stage = new_stage;
            updated.touch();
        }
        updated
    }
}
