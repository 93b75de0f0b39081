//! Create-or-update form drafts and multi-step wizards
//!
//! A [`FormDraft`] is opened either from an existing record (edit mode, the
//! draft starts as the record's fields) or from defaults (create mode).
//! Submitting issues exactly one `update` or `create` call. On failure the
//! draft stays intact so the user can retry.

use serde_json::Value;
use tracing::{debug, warn};

use crate::api::service::CollectionService;
use crate::domain::{Draft, Record, Status};
use crate::error::{Result, SiteworkError};

/// The editing mode of an open form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing { id: String },
}

/// The single request a submit issues
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRequest {
    Create(Draft),
    Update { id: String, draft: Draft },
}

#[derive(Debug)]
pub enum SubmitOutcome<R> {
    Created(R),
    Updated(R),
    Failed(SiteworkError),
    /// A submit was already in flight; nothing was sent
    Busy,
}

impl<R> SubmitOutcome<R> {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_) | SubmitOutcome::Updated(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub mode: FormMode,
    pub draft: Draft,
    /// Message of the last failed submit
    pub error: Option<String>,
    submitting: bool,
}

impl FormDraft {
    /// Open a create form prefilled with `defaults`
    pub fn create(defaults: Draft) -> Self {
        Self {
            mode: FormMode::Creating,
            draft: defaults,
            error: None,
            submitting: false,
        }
    }

    /// Open a create form for `R` with its initial status and, when given,
    /// the owning project.
    pub fn create_for<R: Record>(project_id: Option<&str>) -> Self {
        let mut defaults = Draft::new();
        defaults.insert(
            "status".to_string(),
            Value::String(R::Status::initial().to_string()),
        );
        if let Some(project_id) = project_id {
            defaults.insert("projectId".to_string(), Value::String(project_id.to_string()));
        }
        Self::create(defaults)
    }

    /// Open an edit form whose draft is the record's fields
    pub fn edit<R: Record>(record: &R) -> Result<Self> {
        let Value::Object(draft) = serde_json::to_value(record)? else {
            return Err(SiteworkError::Other(format!(
                "{} did not serialize to an object",
                R::LABEL
            )));
        };
        Ok(Self {
            mode: FormMode::Editing {
                id: record.id().to_string(),
            },
            draft,
            error: None,
            submitting: false,
        })
    }

    pub fn is_creating(&self) -> bool {
        self.mode == FormMode::Creating
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.draft.get(name)
    }

    /// Shallow merge of one field
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.draft.insert(name.into(), value.into());
    }

    /// Start a submit. Returns `None` when one is already in flight.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if self.submitting {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(match &self.mode {
            FormMode::Creating => SubmitRequest::Create(self.draft.clone()),
            FormMode::Editing { id } => SubmitRequest::Update {
                id: id.clone(),
                draft: self.draft.clone(),
            },
        })
    }

    /// Record the result of the in-flight submit.
    pub fn finish_submit<R>(&mut self, result: Result<R>) -> SubmitOutcome<R> {
        self.submitting = false;
        match result {
            Ok(record) => match self.mode {
                FormMode::Creating => SubmitOutcome::Created(record),
                FormMode::Editing { .. } => SubmitOutcome::Updated(record),
            },
            Err(err) => {
                self.error = Some(err.to_string());
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Submit through `service`: `update(id, draft)` when editing,
    /// `create(draft)` when creating.
    pub async fn submit<R: Record>(&mut self, service: &dyn CollectionService<R>) -> SubmitOutcome<R> {
        let Some(request) = self.begin_submit() else {
            return SubmitOutcome::Busy;
        };
        let result = send(service, &request).await;
        if let Err(err) = &result {
            warn!(entity = R::LABEL, error = %err, "submit failed");
        }
        self.finish_submit(result)
    }
}

/// Issue the request a submit produced
pub async fn send<R: Record>(
    service: &dyn CollectionService<R>,
    request: &SubmitRequest,
) -> Result<R> {
    match request {
        SubmitRequest::Create(draft) => {
            debug!(entity = R::LABEL, "creating");
            service.create(draft).await
        }
        SubmitRequest::Update { id, draft } => {
            debug!(entity = R::LABEL, id = %id, "updating");
            service.update(id, draft).await
        }
    }
}

/// Result of form validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            is_valid: false,
            error: Some(message),
        }
    }
}

/// A required field of a wizard step: wire name and the label shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub title: &'static str,
    pub required: Vec<RequiredField>,
}

impl WizardStep {
    pub fn new(title: &'static str, required: &[(&'static str, &'static str)]) -> Self {
        Self {
            title,
            required: required
                .iter()
                .map(|&(name, label)| RequiredField { name, label })
                .collect(),
        }
    }

    /// The first required field missing from `draft` blocks the step
    pub fn validate(&self, draft: &Draft) -> ValidationResult {
        match self.required.iter().find(|f| is_blank(draft.get(f.name))) {
            Some(field) => ValidationResult::failure(format!("{} is required", field.label)),
            None => ValidationResult::success(),
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Multi-step create flow. Each step's required fields must be present
/// before advancing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    steps: Vec<WizardStep>,
    current: usize,
}

impl Wizard {
    pub fn new(steps: Vec<WizardStep>) -> Self {
        Self { steps, current: 0 }
    }

    /// Bid creation: details, then pricing, then review
    pub fn bid() -> Self {
        Self::new(vec![
            WizardStep::new("Details", &[("title", "Title"), ("trade", "Trade")]),
            WizardStep::new("Pricing", &[("amount", "Amount"), ("dueDate", "Due date")]),
            WizardStep::new("Review", &[]),
        ])
    }

    pub fn rfi() -> Self {
        Self::new(vec![
            WizardStep::new("Question", &[("subject", "Subject"), ("question", "Question")]),
            WizardStep::new("Routing", &[("priority", "Priority"), ("dueDate", "Due date")]),
        ])
    }

    /// Wizard used when creating records of the given resource, if any
    pub fn for_resource(resource: &str) -> Option<Self> {
        match resource {
            "bids" => Some(Self::bid()),
            "rfis" => Some(Self::rfi()),
            _ => None,
        }
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&WizardStep> {
        self.steps.get(self.current)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    /// Validate the current step and advance when it passes
    pub fn next(&mut self, draft: &Draft) -> ValidationResult {
        let result = self
            .current()
            .map(|step| step.validate(draft))
            .unwrap_or_else(ValidationResult::success);
        if result.is_valid && !self.is_last() {
            self.current += 1;
        }
        result
    }

    pub fn back(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Validate every step in order, stopping at the first blocking message
    pub fn validate_all(&self, draft: &Draft) -> ValidationResult {
        self.steps
            .iter()
            .map(|step| step.validate(draft))
            .find(|result| !result.is_valid)
            .unwrap_or_else(ValidationResult::success)
    }
}
