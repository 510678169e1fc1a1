//! Form Collector — immutable form state and its reducer.
//!
//! Phases: Idle → Collecting → Submitting → {Success, Failed}.
//! Any field edit returns to Collecting. Submit is a no-op without a
//! credential. Edits behave like the browser widgets: numbers are clamped
//! into range and unparsable input leaves the field unchanged.

pub mod handlers;

use crate::advice::profile::{
    ExpenseCategory, FinancialHabit, ProfileInput, AGE_MAX, AGE_MIN, PERCENT_MAX,
};
use crate::advice::schema::AdviceResult;
use crate::advice::{AdviceError, Credential};

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Collecting,
    Submitting,
    Success(AdviceResult),
    Failed,
}

/// One field change, already decoded from its form representation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Age(i64),
    MonthlyIncome(i64),
    MonthlyExpenses(i64),
    CurrentSavings(i64),
    MonthlySavings(i64),
    Category(ExpenseCategory, i64),
    SelectHabit(FinancialHabit),
    Credential(String),
}

impl FieldEdit {
    /// Decodes one submitted `name=value` pair. Unknown names, unknown
    /// habits and unparsable numbers yield `None`.
    pub fn from_pair(name: &str, value: &str) -> Option<Self> {
        let edit = match name {
            "credential" => FieldEdit::Credential(value.to_string()),
            "age" => FieldEdit::Age(parse_whole_number(value)?),
            "monthly_income" => FieldEdit::MonthlyIncome(parse_whole_number(value)?),
            "monthly_expenses" => FieldEdit::MonthlyExpenses(parse_whole_number(value)?),
            "current_savings" => FieldEdit::CurrentSavings(parse_whole_number(value)?),
            "monthly_savings" => FieldEdit::MonthlySavings(parse_whole_number(value)?),
            "habit" => FieldEdit::SelectHabit(FinancialHabit::from_label(value)?),
            _ => {
                let category = ExpenseCategory::from_key(name.strip_prefix("category_")?)?;
                FieldEdit::Category(category, parse_whole_number(value)?)
            }
        };
        Some(edit)
    }
}

/// Accepts `42`, ` 42 `, `42.4` (rounded). Rejects empty and non-finite input.
fn parse_whole_number(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    let n = value.parse::<f64>().ok()?;
    n.is_finite().then(|| n.round() as i64)
}

#[derive(Debug)]
pub enum FormAction {
    Edit(FieldEdit),
    Submit,
    Resolve(Result<AdviceResult, AdviceError>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub profile: ProfileInput,
    pub credential: Credential,
    pub phase: Phase,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            profile: ProfileInput::default(),
            credential: Credential::default(),
            phase: Phase::Idle,
        }
    }
}

impl FormState {
    /// Rebuilds the form from a posted submission. Checkboxes are only
    /// posted when checked, so habits start empty and are selected per pair.
    pub fn from_submission(pairs: &[(String, String)]) -> Self {
        pairs
            .iter()
            .filter_map(|(name, value)| FieldEdit::from_pair(name, value))
            .fold(FormState::default(), |state, edit| {
                state.reduce(FormAction::Edit(edit))
            })
    }

    pub fn reduce(self, action: FormAction) -> Self {
        match action {
            FormAction::Edit(edit) => self.apply_edit(edit),
            FormAction::Submit => {
                if self.credential.is_blank() {
                    self
                } else {
                    Self {
                        phase: Phase::Submitting,
                        ..self
                    }
                }
            }
            FormAction::Resolve(outcome) => {
                if self.phase != Phase::Submitting {
                    return self;
                }
                let phase = match outcome {
                    Ok(advice) => Phase::Success(advice),
                    Err(_) => Phase::Failed,
                };
                Self { phase, ..self }
            }
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    fn apply_edit(self, edit: FieldEdit) -> Self {
        let mut profile = self.profile;
        let mut credential = self.credential;

        match edit {
            FieldEdit::Age(n) => {
                profile.age = n.clamp(i64::from(AGE_MIN), i64::from(AGE_MAX)) as u32
            }
            FieldEdit::MonthlyIncome(n) => profile.monthly_income = non_negative(n),
            FieldEdit::MonthlyExpenses(n) => profile.monthly_expenses = non_negative(n),
            FieldEdit::CurrentSavings(n) => profile.current_savings = non_negative(n),
            FieldEdit::MonthlySavings(n) => profile.monthly_savings = non_negative(n),
            FieldEdit::Category(category, n) => profile
                .expense_categories
                .set(category, n.clamp(0, i64::from(PERCENT_MAX)) as u8),
            FieldEdit::SelectHabit(habit) => profile.select_habit(habit),
            FieldEdit::Credential(value) => credential = Credential::new(value),
        }

        Self {
            profile,
            credential,
            phase: Phase::Collecting,
        }
    }
}

fn non_negative(n: i64) -> u64 {
    n.max(0) as u64
}
