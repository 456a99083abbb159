use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::cli::FlowArg;
use crate::errors::{Result, WizardError};
use crate::form::{Field, FormData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Article,
    Blog,
    Prompt,
}

impl Flow {
    pub fn as_str(self) -> &'static str {
        match self {
            Flow::Article => "article",
            Flow::Blog => "blog",
            Flow::Prompt => "prompt",
        }
    }

    pub fn storage_key(self) -> String {
        format!("contentgen.{}.formData", self.as_str())
    }

    /// Steps for this flow given the current form data. The advanced step
    /// only exists while the advanced branch is enabled.
    pub fn steps(self, data: &FormData) -> Vec<StepId> {
        use StepId::*;
        let advanced = data.advanced.enabled;
        let mut steps = match self {
            Flow::Article => vec![Keyword, Title, Description, Tags, Settings, Advanced, Article, Schema],
            Flow::Blog => vec![Keyword, Title, Description, Settings, Article],
            Flow::Prompt => vec![Keyword, Settings, Advanced, Prompt],
        };
        if !advanced {
            steps.retain(|s| *s != Advanced);
        }
        steps
    }
}

impl From<FlowArg> for Flow {
    fn from(f: FlowArg) -> Self {
        match f {
            FlowArg::Article => Flow::Article,
            FlowArg::Blog => Flow::Blog,
            FlowArg::Prompt => Flow::Prompt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    Keyword,
    Title,
    Description,
    Tags,
    Settings,
    Advanced,
    Article,
    Schema,
    Prompt,
}

impl StepId {
    /// Fields that must be non-empty before the wizard leaves this step.
    pub fn required_fields(self) -> &'static [Field] {
        match self {
            StepId::Keyword => &[Field::FocusKeyword],
            StepId::Title => &[Field::MetaTitle],
            StepId::Description => &[Field::MetaDescription],
            StepId::Tags => &[Field::Tags],
            StepId::Settings | StepId::Advanced => &[],
            StepId::Article => &[Field::GeneratedArticle],
            StepId::Schema => &[Field::SchemaMarkup],
            StepId::Prompt => &[Field::GeneratedPrompt],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StepId::Keyword => "Focus keyword",
            StepId::Title => "Title",
            StepId::Description => "Meta description",
            StepId::Tags => "Tags",
            StepId::Settings => "Content settings",
            StepId::Advanced => "Advanced settings",
            StepId::Article => "Article",
            StepId::Schema => "Schema markup",
            StepId::Prompt => "Prompt",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Keyword => "keyword",
            StepId::Title => "title",
            StepId::Description => "description",
            StepId::Tags => "tags",
            StepId::Settings => "settings",
            StepId::Advanced => "advanced",
            StepId::Article => "article",
            StepId::Schema => "schema",
            StepId::Prompt => "prompt",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    Advanced(usize),
    /// `next` was called on the last step.
    Finished,
}

/// Navigation state for one wizard run. Not persisted; completion is
/// derived from the form data on every [`WizardController::refresh`].
#[derive(Debug)]
pub struct WizardController {
    flow: Flow,
    steps: Vec<StepId>,
    current: usize,
    completed: BTreeSet<usize>,
    passed: HashSet<StepId>,
}

impl WizardController {
    pub fn new(flow: Flow, data: &FormData) -> Self {
        let mut wizard = Self {
            flow,
            steps: Vec::new(),
            current: 0,
            completed: BTreeSet::new(),
            passed: HashSet::new(),
        };
        wizard.refresh(data);
        wizard
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> StepId {
        self.steps[self.current]
    }

    pub fn completed_steps(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    /// Recompute the step list and completion after the form data changed.
    pub fn refresh(&mut self, data: &FormData) {
        let current_id = self.steps.get(self.current).copied();
        self.steps = self.flow.steps(data);

        // Stay on the same logical step when the advanced branch toggles.
        if let Some(id) = current_id {
            if let Some(idx) = self.steps.iter().position(|s| *s == id) {
                self.current = idx;
            }
        }
        if self.current >= self.steps.len() {
            self.current = self.steps.len() - 1;
        }

        self.completed = self
            .steps
            .iter()
            .enumerate()
            .filter(|(_, step)| self.step_complete(**step, data))
            .map(|(i, _)| i)
            .collect();
    }

    fn step_complete(&self, step: StepId, data: &FormData) -> bool {
        let required = step.required_fields();
        let filled = !required.is_empty() && required.iter().all(|f| data.is_filled(*f));
        filled || self.passed.contains(&step)
    }

    /// First required field of the current step that is still empty.
    pub fn missing_field(&self, data: &FormData) -> Option<Field> {
        self.current_step()
            .required_fields()
            .iter()
            .copied()
            .find(|f| !data.is_filled(*f))
    }

    pub fn next(&mut self, data: &FormData) -> Result<NextOutcome> {
        if let Some(field) = self.missing_field(data) {
            return Err(WizardError::MissingInput(format!(
                "{} is required before leaving the {} step",
                field,
                self.current_step()
            )));
        }

        self.passed.insert(self.current_step());
        let outcome = if self.current + 1 < self.steps.len() {
            self.current += 1;
            NextOutcome::Advanced(self.current)
        } else {
            NextOutcome::Finished
        };
        self.refresh(data);
        Ok(outcome)
    }

    pub fn previous(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    /// Jump to `index` if it is reachable; otherwise leave the state alone.
    pub fn go_to(&mut self, index: usize) -> bool {
        let allowed = self.completed.contains(&index)
            || index == self.current
            || (index == self.current + 1 && self.completed.contains(&self.current));
        if !allowed || index >= self.steps.len() {
            tracing::warn!(
                requested = index,
                current = self.current,
                "ignoring navigation to unreachable step"
            );
            return false;
        }
        self.current = index;
        true
    }
}
