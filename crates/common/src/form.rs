//! Guest form steps: welcome → question → thanks

/// Answers offered on the question step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Value stored in the record's `response` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "Ja",
            Answer::No => "Nee",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Ja" => Some(Answer::Yes),
            "Nee" => Some(Answer::No),
            _ => None,
        }
    }
}

/// User actions on the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Confirm the name on the welcome step
    Continue { name: String },
    Choose(Answer),
    Back,
    Submit,
}

/// Current step of the guest form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStep {
    Welcome { name: String },
    Question { name: String, answer: Option<Answer> },
    Thanks { name: String, answer: Answer },
}

impl Default for FormStep {
    fn default() -> Self {
        FormStep::Welcome {
            name: String::new(),
        }
    }
}

impl FormStep {
    pub const COUNT: usize = 3;

    /// Apply an action. Actions that do not fit the step leave it unchanged.
    ///
    /// `Submit` only moves to `Thanks`; persisting the answer is up to the
    /// caller, which should keep the old step if the save fails.
    pub fn apply(self, action: FormAction) -> FormStep {
        match (self, action) {
            (FormStep::Welcome { .. }, FormAction::Continue { name }) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    FormStep::Welcome { name }
                } else {
                    FormStep::Question {
                        name: trimmed.to_string(),
                        answer: None,
                    }
                }
            }
            (FormStep::Question { name, .. }, FormAction::Choose(answer)) => FormStep::Question {
                name,
                answer: Some(answer),
            },
            (FormStep::Question { name, .. }, FormAction::Back) => FormStep::Welcome { name },
            (
                FormStep::Question {
                    name,
                    answer: Some(answer),
                },
                FormAction::Submit,
            ) => FormStep::Thanks { name, answer },
            (step, _) => step,
        }
    }

    /// 1-based position, for the "1 → 3" indicator
    pub fn number(&self) -> usize {
        match self {
            FormStep::Welcome { .. } => 1,
            FormStep::Question { .. } => 2,
            FormStep::Thanks { .. } => 3,
        }
    }
}
