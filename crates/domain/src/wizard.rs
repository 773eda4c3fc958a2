//! Five-step screening wizard.
//!
//! The wizard only sequences the screening form. Nothing reaches the
//! platform until the final step produces a [`ScreeningSubmission`].

use evep_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{ScreeningResults, ScreeningStatus, ScreeningType};

/// Wizard steps in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Pick the patient to screen.
    SelectPatient,
    /// Examiner and location.
    Setup,
    /// Acuity measurements.
    Conduct,
    /// Outcome and notes.
    RecordResults,
    /// Review and submit.
    Complete,
}

impl WizardStep {
    const ORDER: [Self; 5] = [
        Self::SelectPatient,
        Self::Setup,
        Self::Conduct,
        Self::RecordResults,
        Self::Complete,
    ];

    /// Returns all steps in order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &Self::ORDER
    }

    /// Returns the zero-based step index.
    #[must_use]
    pub fn index(&self) -> usize {
        Self::ORDER
            .iter()
            .position(|step| step == self)
            .unwrap_or_default()
    }

    /// Returns the stepper label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::SelectPatient => "Select Patient",
            Self::Setup => "Setup",
            Self::Conduct => "Conduct",
            Self::RecordResults => "Record Results",
            Self::Complete => "Complete",
        }
    }

    fn next(self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    fn previous(self) -> Option<Self> {
        self.index()
            .checked_sub(1)
            .and_then(|index| Self::ORDER.get(index).copied())
    }
}

/// Form fields collected across the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardFields {
    /// Selected patient.
    pub patient_id: Option<String>,
    /// Examiner running the screening.
    pub examiner_id: Option<String>,
    /// School, clinic or mobile unit location.
    pub location: Option<String>,
    /// Left eye visual acuity.
    pub left_eye_acuity: Option<String>,
    /// Right eye visual acuity.
    pub right_eye_acuity: Option<String>,
    /// Colour vision outcome.
    pub color_vision: Option<String>,
    /// Referral decision; must be made before completing.
    pub referral_needed: Option<bool>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl WizardFields {
    /// Overwrites fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: WizardFields) {
        fn merge(target: &mut Option<String>, value: Option<String>) {
            if let Some(value) = value {
                let trimmed = value.trim().to_owned();
                *target = (!trimmed.is_empty()).then_some(trimmed);
            }
        }

        merge(&mut self.patient_id, patch.patient_id);
        merge(&mut self.examiner_id, patch.examiner_id);
        merge(&mut self.location, patch.location);
        merge(&mut self.left_eye_acuity, patch.left_eye_acuity);
        merge(&mut self.right_eye_acuity, patch.right_eye_acuity);
        merge(&mut self.color_vision, patch.color_vision);
        merge(&mut self.notes, patch.notes);
        if patch.referral_needed.is_some() {
            self.referral_needed = patch.referral_needed;
        }
    }

    fn missing_for(&self, step: WizardStep) -> Vec<&'static str> {
        let required: Vec<(&'static str, bool)> = match step {
            WizardStep::SelectPatient => vec![("patient", self.patient_id.is_some())],
            WizardStep::Setup => vec![
                ("examiner", self.examiner_id.is_some()),
                ("location", self.location.is_some()),
            ],
            WizardStep::Conduct => vec![
                ("left eye acuity", self.left_eye_acuity.is_some()),
                ("right eye acuity", self.right_eye_acuity.is_some()),
            ],
            WizardStep::RecordResults => {
                vec![("referral decision", self.referral_needed.is_some())]
            }
            WizardStep::Complete => Vec::new(),
        };

        required
            .into_iter()
            .filter_map(|(name, present)| (!present).then_some(name))
            .collect()
    }
}

/// Screening wizard state for one examiner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningWizard {
    screening_type: ScreeningType,
    active_step: WizardStep,
    fields: WizardFields,
    error: Option<String>,
    submitted_session_id: Option<String>,
}

impl ScreeningWizard {
    /// Starts a wizard on the first step.
    #[must_use]
    pub fn new(screening_type: ScreeningType) -> Self {
        Self {
            screening_type,
            active_step: WizardStep::SelectPatient,
            fields: WizardFields::default(),
            error: None,
            submitted_session_id: None,
        }
    }

    /// Returns the screening type chosen when the wizard started.
    #[must_use]
    pub fn screening_type(&self) -> ScreeningType {
        self.screening_type
    }

    /// Returns the current step.
    #[must_use]
    pub fn active_step(&self) -> WizardStep {
        self.active_step
    }

    /// Returns the collected fields.
    #[must_use]
    pub fn fields(&self) -> &WizardFields {
        &self.fields
    }

    /// Returns the error banner text, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the platform session id once submitted.
    #[must_use]
    pub fn submitted_session_id(&self) -> Option<&str> {
        self.submitted_session_id.as_deref()
    }

    /// Merges edited fields into the wizard.
    pub fn update(&mut self, patch: WizardFields) -> AppResult<()> {
        self.ensure_not_submitted()?;
        self.fields.apply(patch);
        Ok(())
    }

    /// Advances one step when the current step's fields are present.
    ///
    /// On failure the step is unchanged and the error banner is set.
    pub fn next(&mut self) -> AppResult<WizardStep> {
        self.ensure_not_submitted()?;

        let missing = self.fields.missing_for(self.active_step);
        if !missing.is_empty() {
            let message = format!("please provide: {}", missing.join(", "));
            self.error = Some(message.clone());
            return Err(AppError::Validation(message));
        }

        let Some(next_step) = self.active_step.next() else {
            let message = "already on the last step; submit to complete".to_owned();
            self.error = Some(message.clone());
            return Err(AppError::Validation(message));
        };

        self.active_step = next_step;
        self.error = None;
        Ok(next_step)
    }

    /// Moves one step back; stays put on the first step.
    pub fn back(&mut self) -> AppResult<WizardStep> {
        self.ensure_not_submitted()?;

        if let Some(previous_step) = self.active_step.previous() {
            self.active_step = previous_step;
        }
        self.error = None;
        Ok(self.active_step)
    }

    /// Builds the payload for the final POST.
    pub fn submission(&self) -> AppResult<ScreeningSubmission> {
        self.ensure_not_submitted()?;

        if self.active_step != WizardStep::Complete {
            return Err(AppError::Validation(format!(
                "screening can only be submitted from the '{}' step",
                WizardStep::Complete.label()
            )));
        }

        let fields = &self.fields;
        match (
            &fields.patient_id,
            &fields.examiner_id,
            &fields.left_eye_acuity,
            &fields.right_eye_acuity,
            fields.referral_needed,
        ) {
            (
                Some(patient_id),
                Some(examiner_id),
                Some(left_eye_acuity),
                Some(right_eye_acuity),
                Some(referral_needed),
            ) => Ok(ScreeningSubmission {
                patient_id: patient_id.clone(),
                examiner_id: examiner_id.clone(),
                screening_type: self.screening_type,
                location: fields.location.clone(),
                status: ScreeningStatus::Completed,
                results: ScreeningResults {
                    left_eye_acuity: left_eye_acuity.clone(),
                    right_eye_acuity: right_eye_acuity.clone(),
                    color_vision: fields.color_vision.clone(),
                    referral_needed,
                    notes: fields.notes.clone(),
                },
            }),
            _ => Err(AppError::Validation(
                "screening is missing required fields".to_owned(),
            )),
        }
    }

    /// Keeps the wizard open with an error banner after a failed submit.
    pub fn record_submission_failure(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Marks the wizard as submitted.
    pub fn mark_submitted(&mut self, session_id: impl Into<String>) {
        self.submitted_session_id = Some(session_id.into());
        self.error = None;
    }

    fn ensure_not_submitted(&self) -> AppResult<()> {
        match &self.submitted_session_id {
            Some(session_id) => Err(AppError::Conflict(format!(
                "screening was already submitted as session '{session_id}'"
            ))),
            None => Ok(()),
        }
    }
}

/// Payload for creating a completed screening session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningSubmission {
    /// Screened patient.
    pub patient_id: String,
    /// Examiner.
    pub examiner_id: String,
    /// Screening flavour.
    pub screening_type: ScreeningType,
    /// Location, when captured.
    pub location: Option<String>,
    /// Always `completed` for wizard submissions.
    pub status: ScreeningStatus,
    /// Recorded results.
    pub results: ScreeningResults,
}

#[cfg(test)]
mod tests {
    use evep_core::AppError;

    use super::{ScreeningWizard, WizardFields, WizardStep};
    use crate::ScreeningType;

    fn walk_to_complete(wizard: &mut ScreeningWizard) {
        let patches = [
            WizardFields {
                patient_id: Some("p-7".to_owned()),
                ..WizardFields::default()
            },
            WizardFields {
                examiner_id: Some("u-3".to_owned()),
                location: Some("Ban Nong School".to_owned()),
                ..WizardFields::default()
            },
            WizardFields {
                left_eye_acuity: Some("6/6".to_owned()),
                right_eye_acuity: Some("6/12".to_owned()),
                ..WizardFields::default()
            },
            WizardFields {
                referral_needed: Some(true),
                ..WizardFields::default()
            },
        ];

        for patch in patches {
            assert!(wizard.update(patch).is_ok());
            assert!(wizard.next().is_ok());
        }
    }

    #[test]
    fn next_without_patient_keeps_step_and_sets_error() {
        let mut wizard = ScreeningWizard::new(ScreeningType::Standard);

        let result = wizard.next();

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(wizard.active_step(), WizardStep::SelectPatient);
        assert_eq!(wizard.active_step().index(), 0);
        assert!(wizard.error().is_some_and(|error| error.contains("patient")));
    }

    #[test]
    fn blank_values_do_not_count_as_present() {
        let mut wizard = ScreeningWizard::new(ScreeningType::Standard);
        assert!(
            wizard
                .update(WizardFields {
                    patient_id: Some("   ".to_owned()),
                    ..WizardFields::default()
                })
                .is_ok()
        );

        assert!(wizard.next().is_err());
        assert_eq!(wizard.active_step(), WizardStep::SelectPatient);
    }

    #[test]
    fn setup_reports_every_missing_field() {
        let mut wizard = ScreeningWizard::new(ScreeningType::MobileUnit);
        assert!(
            wizard
                .update(WizardFields {
                    patient_id: Some("p-1".to_owned()),
                    ..WizardFields::default()
                })
                .is_ok()
        );
        assert!(wizard.next().is_ok());

        assert!(wizard.next().is_err());
        assert_eq!(wizard.error(), Some("please provide: examiner, location"));
    }

    #[test]
    fn back_clears_error_and_stops_at_first_step() {
        let mut wizard = ScreeningWizard::new(ScreeningType::Standard);
        assert!(wizard.next().is_err());

        assert_eq!(wizard.back().ok(), Some(WizardStep::SelectPatient));
        assert_eq!(wizard.error(), None);
    }

    #[test]
    fn submission_only_from_complete_step() {
        let mut wizard = ScreeningWizard::new(ScreeningType::Enhanced);
        assert!(wizard.submission().is_err());

        walk_to_complete(&mut wizard);
        assert_eq!(wizard.active_step(), WizardStep::Complete);

        let Ok(submission) = wizard.submission() else {
            panic!("complete wizard should build a submission");
        };
        assert_eq!(submission.patient_id, "p-7");
        assert_eq!(submission.screening_type, ScreeningType::Enhanced);
        assert!(submission.results.referral_needed);
        assert!(wizard.next().is_err());
    }

    #[test]
    fn failed_submit_keeps_wizard_open_and_success_locks_it() {
        let mut wizard = ScreeningWizard::new(ScreeningType::Standard);
        walk_to_complete(&mut wizard);

        wizard.record_submission_failure("platform unavailable");
        assert_eq!(wizard.active_step(), WizardStep::Complete);
        assert_eq!(wizard.error(), Some("platform unavailable"));
        assert!(wizard.submission().is_ok());

        wizard.mark_submitted("s-42");
        assert_eq!(wizard.error(), None);
        assert!(matches!(wizard.back(), Err(AppError::Conflict(_))));
    }
}
