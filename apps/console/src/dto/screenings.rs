use evep_application::WizardHandle;
use evep_domain::{
    ScreeningResults, ScreeningSession, ScreeningStatus, WizardFields, WizardStep,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

const ALL_STATUSES: [ScreeningStatus; 4] = [
    ScreeningStatus::Pending,
    ScreeningStatus::InProgress,
    ScreeningStatus::Completed,
    ScreeningStatus::Cancelled,
];

/// Query string of the session table.
#[derive(Debug, Default, Deserialize)]
pub struct SessionListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

/// Incoming payload for a status change.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/update-session-status-request.ts"
)]
pub struct UpdateSessionStatusRequest {
    pub status: String,
}

/// Incoming payload for opening a wizard.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/start-wizard-request.ts"
)]
pub struct StartWizardRequest {
    pub screening_type: String,
}

/// Recorded screening measurements.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/screening-results-response.ts"
)]
pub struct ScreeningResultsResponse {
    pub left_eye_acuity: String,
    pub right_eye_acuity: String,
    pub color_vision: Option<String>,
    pub referral_needed: bool,
    pub notes: Option<String>,
}

impl From<ScreeningResults> for ScreeningResultsResponse {
    fn from(value: ScreeningResults) -> Self {
        Self {
            left_eye_acuity: value.left_eye_acuity,
            right_eye_acuity: value.right_eye_acuity,
            color_vision: value.color_vision,
            referral_needed: value.referral_needed,
            notes: value.notes,
        }
    }
}

/// API representation of a screening session row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/screening-session-response.ts"
)]
pub struct ScreeningSessionResponse {
    pub id: String,
    pub patient_id: String,
    pub examiner_id: String,
    pub screening_type: String,
    pub status: String,
    /// Statuses offered in the row's status menu.
    pub allowed_transitions: Vec<String>,
    pub results: Option<ScreeningResultsResponse>,
    pub created_at: Option<String>,
}

impl From<ScreeningSession> for ScreeningSessionResponse {
    fn from(value: ScreeningSession) -> Self {
        let allowed_transitions = ALL_STATUSES
            .iter()
            .filter(|next| value.status.can_transition_to(**next))
            .map(|next| next.as_str().to_owned())
            .collect();

        Self {
            id: value.id,
            patient_id: value.patient_id,
            examiner_id: value.examiner_id,
            screening_type: value.screening_type.as_str().to_owned(),
            status: value.status.as_str().to_owned(),
            allowed_transitions,
            results: value.results.map(ScreeningResultsResponse::from),
            created_at: value.created_at,
        }
    }
}

/// Wizard form fields; absent fields are left untouched on update.
#[derive(Debug, Default, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/wizard-fields-dto.ts"
)]
pub struct WizardFieldsDto {
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub examiner_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub left_eye_acuity: Option<String>,
    #[serde(default)]
    pub right_eye_acuity: Option<String>,
    #[serde(default)]
    pub color_vision: Option<String>,
    #[serde(default)]
    pub referral_needed: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<WizardFieldsDto> for WizardFields {
    fn from(value: WizardFieldsDto) -> Self {
        Self {
            patient_id: value.patient_id,
            examiner_id: value.examiner_id,
            location: value.location,
            left_eye_acuity: value.left_eye_acuity,
            right_eye_acuity: value.right_eye_acuity,
            color_vision: value.color_vision,
            referral_needed: value.referral_needed,
            notes: value.notes,
        }
    }
}

impl From<&WizardFields> for WizardFieldsDto {
    fn from(value: &WizardFields) -> Self {
        Self {
            patient_id: value.patient_id.clone(),
            examiner_id: value.examiner_id.clone(),
            location: value.location.clone(),
            left_eye_acuity: value.left_eye_acuity.clone(),
            right_eye_acuity: value.right_eye_acuity.clone(),
            color_vision: value.color_vision.clone(),
            referral_needed: value.referral_needed,
            notes: value.notes.clone(),
        }
    }
}

/// Wizard state for the stepper view.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/wizard-response.ts"
)]
pub struct WizardResponse {
    pub wizard_id: String,
    pub screening_type: String,
    pub active_step: String,
    pub step_index: u32,
    pub steps: Vec<String>,
    pub fields: WizardFieldsDto,
    pub error: Option<String>,
}

impl From<WizardHandle> for WizardResponse {
    fn from(value: WizardHandle) -> Self {
        let wizard = value.wizard;
        let step = wizard.active_step();

        Self {
            wizard_id: value.wizard_id.to_string(),
            screening_type: wizard.screening_type().as_str().to_owned(),
            active_step: step.label().to_owned(),
            step_index: u32::try_from(step.index()).unwrap_or_default(),
            steps: WizardStep::all()
                .iter()
                .map(|step| step.label().to_owned())
                .collect(),
            fields: WizardFieldsDto::from(wizard.fields()),
            error: wizard.error().map(ToOwned::to_owned),
        }
    }
}

/// Result of a wizard submission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/submitted-screening-response.ts"
)]
pub struct SubmittedScreeningResponse {
    pub message: String,
    pub session: ScreeningSessionResponse,
}
