//! Registration wizard controller
//!
//! Owns one draft for the lifetime of a session. Forward navigation is gated
//! on validation of the current step's fields; the summary step hands the
//! whole draft to the submission collaborator.

use super::error::{WizardError, WizardResult};
use super::registry;
use super::step::WizardStep;
use crate::config::{RuntimeConfig, WizardPreferences};
use crate::draft::{
    FieldPath, FieldUpdate, InvoiceTitle, ProductLine, RegistrationDraft, TitleType,
};
use crate::logging::{self, codes, LogEvent};
use crate::notice::Notice;
use crate::progress::{self, Progress};
use crate::reference::{AddressLookup, ReferenceDataSource};
use crate::submission::{RegistrationId, RegistrationSubmitter, SubmissionError};
use crate::summary::Summary;
use crate::validation::{ValidationOptions, ValidationReport, Validator};
use crate::views::StepSlice;
use crate::{log_error, log_info, log_success, log_warning};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Result of `advance()` and of the submission calls
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Step fields passed; the wizard moved forward
    Moved { from: WizardStep, to: WizardStep },
    /// Step fields failed; the wizard stayed put
    Blocked {
        step: WizardStep,
        errors: ValidationReport,
    },
    /// Full-draft check at submission failed; the wizard moved back to `step`
    Invalid {
        step: WizardStep,
        errors: ValidationReport,
    },
    Submitted(RegistrationId),
    /// Collaborator failed; the draft is kept for another attempt
    SubmissionFailed(SubmissionError),
}

/// Result of `begin_submission()`
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionStart {
    /// The busy flag is set; hand `draft()` to the submitter
    Ready,
    Invalid {
        step: WizardStep,
        errors: ValidationReport,
    },
}

pub struct RegistrationWizard<S> {
    session_id: String,
    started_at: DateTime<Utc>,
    current: WizardStep,
    /// `None` once a submission succeeded
    draft: Option<RegistrationDraft>,
    errors: ValidationReport,
    submitting: bool,
    last_submission_error: Option<SubmissionError>,
    registration_id: Option<RegistrationId>,
    notices: Vec<Notice>,
    preferences: WizardPreferences,
    validator: Validator,
    submitter: S,
}

impl<S: RegistrationSubmitter> RegistrationWizard<S> {
    /// Start a session with preferences read from the environment
    pub fn new(submitter: S) -> WizardResult<Self> {
        Self::with_config(submitter, &RuntimeConfig::from_env())
    }

    pub fn with_config(submitter: S, config: &RuntimeConfig) -> WizardResult<Self> {
        let draft = RegistrationDraft::new(&config.wizard.default_nationality);
        Self::with_draft(submitter, config, draft)
    }

    /// Start a session from an existing draft, positioned at the first step
    pub fn with_draft(
        submitter: S,
        config: &RuntimeConfig,
        draft: RegistrationDraft,
    ) -> WizardResult<Self> {
        let validator = Validator::new(&ValidationOptions::from_preferences(&config.wizard))?;
        let session_id = uuid::Uuid::new_v4().to_string();

        logging::with_session_context(&session_id, || {
            log_success!(
                codes::success::SESSION_STARTED,
                "Registration wizard session started",
                "enforce_invoice_title_type" => config.wizard.enforce_invoice_title_type,
                "validate_full_draft_on_submit" => config.wizard.validate_full_draft_on_submit
            );
        });

        Ok(Self {
            session_id,
            started_at: Utc::now(),
            current: WizardStep::FIRST,
            draft: Some(draft),
            errors: ValidationReport::new(),
            submitting: false,
            last_submission_error: None,
            registration_id: None,
            notices: Vec::new(),
            preferences: config.wizard.clone(),
            validator,
            submitter,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn current_index(&self) -> usize {
        self.current.index()
    }

    /// The draft, or `None` once the session closed on a successful submission
    pub fn draft(&self) -> Option<&RegistrationDraft> {
        self.draft.as_ref()
    }

    /// Field errors from the most recent blocked advance
    pub fn errors(&self) -> &ValidationReport {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_closed(&self) -> bool {
        self.draft.is_none()
    }

    pub fn registration_id(&self) -> Option<&RegistrationId> {
        self.registration_id.as_ref()
    }

    pub fn last_submission_error(&self) -> Option<&SubmissionError> {
        self.last_submission_error.as_ref()
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub fn progress(&self) -> Progress<WizardStep> {
        progress::progress(WizardStep::ALL, self.current.index())
    }

    pub fn view(&self) -> WizardResult<StepSlice<'_>> {
        Ok(StepSlice::for_step(self.current, self.open_draft()?))
    }

    pub fn summary(&self) -> WizardResult<Summary> {
        Ok(Summary::from_draft(self.open_draft()?))
    }

    /// Drain pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    fn open_draft(&self) -> WizardResult<&RegistrationDraft> {
        self.draft
            .as_ref()
            .ok_or_else(|| WizardError::session_closed(&self.session_id))
    }

    /// Draft for editing; refused while closed or while a submission runs
    fn editable_draft(&mut self) -> WizardResult<&mut RegistrationDraft> {
        if self.submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        match self.draft.as_mut() {
            Some(draft) => Ok(draft),
            None => Err(WizardError::session_closed(&self.session_id)),
        }
    }

    fn ensure_idle(&self) -> WizardResult<()> {
        self.open_draft()?;
        if self.submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Merge one field change into the draft. No validation runs here.
    pub fn update_field(&mut self, path: &str, value: impl Into<Value>) -> WizardResult<FieldUpdate> {
        let path = FieldPath::parse(path)?;
        let update = self.editable_draft()?.update_field(&path, value.into())?;

        if let Some(cascade) = &update.cascade {
            let cleared: Vec<String> = cascade.cleared.iter().map(|p| p.to_string()).collect();
            logging::with_session_context(&self.session_id, || {
                log_success!(
                    codes::success::CASCADE_APPLIED,
                    "Address selection cascade applied",
                    "address" => cascade.address,
                    "cleared" => cleared.join(",")
                );
            });
        }

        Ok(update)
    }

    /// Refresh an address's option lists after `update_field` reported a cascade
    pub async fn refresh_lookup<R>(
        &mut self,
        lookup: &mut AddressLookup,
        source: &R,
        update: &FieldUpdate,
    ) -> Option<Notice>
    where
        R: ReferenceDataSource + ?Sized,
    {
        let request = update.lookup_request()?;
        let notice = lookup.apply(source, request).await?;
        self.notices.push(notice.clone());
        Some(notice)
    }

    pub fn record_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn add_product(&mut self, line: ProductLine) -> WizardResult<usize> {
        Ok(self.editable_draft()?.add_product(line))
    }

    pub fn remove_product(&mut self, index: usize) -> WizardResult<ProductLine> {
        let draft = self.editable_draft()?;
        let len = draft.products.len();
        draft
            .remove_product(index)
            .ok_or_else(|| WizardError::index_out_of_range("products", index, len))
    }

    pub fn add_invoice_title(&mut self, title_type: TitleType) -> WizardResult<usize> {
        Ok(self.editable_draft()?.add_invoice_title(title_type))
    }

    pub fn remove_invoice_title(&mut self, index: usize) -> WizardResult<InvoiceTitle> {
        let draft = self.editable_draft()?;
        let len = draft.invoice_titles.len();
        draft
            .remove_invoice_title(index)
            .ok_or_else(|| WizardError::index_out_of_range("invoiceTitles", index, len))
    }

    pub fn set_default_invoice_title(&mut self, index: usize) -> WizardResult<()> {
        let draft = self.editable_draft()?;
        let len = draft.invoice_titles.len();
        if draft.set_default_invoice_title(index) {
            Ok(())
        } else {
            Err(WizardError::index_out_of_range("invoiceTitles", index, len))
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Validate the current step and move forward, or submit from the summary
    pub async fn advance(&mut self) -> WizardResult<AdvanceOutcome> {
        self.ensure_idle()?;

        if self.current.is_summary() {
            return self.submit().await;
        }

        let step = self.current;
        let report = {
            let draft = self.open_draft()?;
            let fields = registry::step_fields(step, draft)?;
            self.validator.validate_fields(draft, &fields)?
        };

        if !report.is_valid() {
            logging::with_session_context(&self.session_id, || {
                log_error!(
                    codes::validation::STEP_BLOCKED,
                    "Step validation failed; staying on step",
                    "step" => step,
                    "error_count" => report.len()
                );
                for (path, message) in report.iter() {
                    let field = path.to_string();
                    logging::log_with_context(
                        LogEvent::warning_with_code(codes::validation::FIELD_INVALID, "Field invalid"),
                        vec![("field", field.as_str()), ("message", message)],
                    );
                }
            });
            self.errors = report.clone();
            return Ok(AdvanceOutcome::Blocked {
                step,
                errors: report,
            });
        }

        self.errors = ValidationReport::new();
        let to = step.next().unwrap_or(WizardStep::LAST);
        self.current = to;

        logging::with_session_context(&self.session_id, || {
            log_success!(
                codes::success::STEP_VALIDATED,
                "Step fields valid",
                "step" => step
            );
            log_success!(
                codes::success::STEP_ADVANCED,
                "Wizard advanced",
                "from" => step,
                "to" => to
            );
        });

        Ok(AdvanceOutcome::Moved { from: step, to })
    }

    /// Step back without validating; stays put on the first step
    pub fn retreat(&mut self) -> WizardResult<WizardStep> {
        self.ensure_idle()?;

        if let Some(previous) = self.current.previous() {
            let from = self.current;
            self.current = previous;
            logging::with_session_context(&self.session_id, || {
                log_info!("Wizard stepped back", "from" => from, "to" => previous);
            });
        }

        Ok(self.current)
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Enter the in-flight state, after an optional whole-draft check
    pub fn begin_submission(&mut self) -> WizardResult<SubmissionStart> {
        self.ensure_idle()?;
        if !self.current.is_summary() {
            return Err(WizardError::NotAtSummary { step: self.current });
        }

        if self.preferences.validate_full_draft_on_submit {
            let report = self.validator.validate(self.open_draft()?)?;
            if !report.is_valid() {
                let step = registry::earliest_step(&report).unwrap_or(WizardStep::FIRST);
                logging::with_session_context(&self.session_id, || {
                    log_error!(
                        codes::validation::FULL_DRAFT_INVALID,
                        "Draft failed validation at submission",
                        "error_count" => report.len(),
                        "return_to" => step
                    );
                });
                self.current = step;
                self.errors = report.clone();
                return Ok(SubmissionStart::Invalid {
                    step,
                    errors: report,
                });
            }
        }

        self.submitting = true;
        self.last_submission_error = None;
        logging::with_session_context(&self.session_id, || {
            log_info!("Submission started");
        });
        Ok(SubmissionStart::Ready)
    }

    /// Leave the in-flight state with the collaborator's answer
    pub fn finish_submission(
        &mut self,
        result: Result<RegistrationId, SubmissionError>,
    ) -> WizardResult<AdvanceOutcome> {
        if !self.submitting {
            return Err(WizardError::NoPendingSubmission);
        }
        self.submitting = false;

        match result {
            Ok(id) => {
                logging::with_session_context(&self.session_id, || {
                    log_success!(
                        codes::success::SUBMISSION_ACCEPTED,
                        "Registration submitted",
                        "registration_id" => id
                    );
                });
                self.draft = None;
                self.errors = ValidationReport::new();
                self.registration_id = Some(id.clone());
                Ok(AdvanceOutcome::Submitted(id))
            }
            Err(error) => {
                logging::with_session_context(&self.session_id, || {
                    log_error!(
                        error.error_code(),
                        "Registration submission failed",
                        "error_type" => error.error_type(),
                        "error" => error
                    );
                });
                self.notices.push(Notice::submission(error.to_string()));
                self.last_submission_error = Some(error.clone());
                Ok(AdvanceOutcome::SubmissionFailed(error))
            }
        }
    }

    /// Hand the whole draft to the submitter. Only valid on the summary step.
    pub async fn submit(&mut self) -> WizardResult<AdvanceOutcome> {
        if let SubmissionStart::Invalid { step, errors } = self.begin_submission()? {
            return Ok(AdvanceOutcome::Invalid { step, errors });
        }

        let in_flight = InFlight::new(&mut self.submitting, &self.session_id);
        let result = match self.draft.as_ref() {
            Some(draft) => self.submitter.submit(draft).await,
            None => return Err(WizardError::session_closed(&self.session_id)),
        };
        in_flight.complete();

        self.finish_submission(result)
    }
}

/// Clears the busy flag if the submission future is dropped before the
/// submitter answers
struct InFlight<'a> {
    submitting: &'a mut bool,
    session_id: &'a str,
    completed: bool,
}

impl<'a> InFlight<'a> {
    fn new(submitting: &'a mut bool, session_id: &'a str) -> Self {
        Self {
            submitting,
            session_id,
            completed: false,
        }
    }

    /// The submitter answered; `finish_submission` clears the flag
    fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        *self.submitting = false;
        logging::with_session_context(self.session_id, || {
            log_warning!("Submission abandoned before the submitter answered");
        });
    }
}
