//! ProfileInput — the financial profile collected by the form.

use std::collections::BTreeMap;
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const AGE_MIN: u32 = 18;
pub const AGE_MAX: u32 = 80;
pub const PERCENT_MAX: u8 = 100;

pub const DEFAULT_AGE: u32 = 30;
pub const DEFAULT_MONTHLY_INCOME: u64 = 5000;
pub const DEFAULT_CURRENT_SAVINGS: u64 = 10000;
pub const DEFAULT_MONTHLY_SAVINGS: u64 = 1000;
pub const DEFAULT_MONTHLY_EXPENSES: u64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("age must be between 18 and 80, got {0}")]
    AgeOutOfRange(i64),

    #[error("{category} percentage must be between 0 and 100, got {value}")]
    PercentOutOfRange {
        category: ExpenseCategory,
        value: i64,
    },

    #[error("expense category '{0}' is missing")]
    MissingCategory(ExpenseCategory),

    #[error("financial habit '{0}' selected more than once")]
    DuplicateHabit(FinancialHabit),
}

// ────────────────────────────────────────────────────────────────────────────
// Expense categories
// ────────────────────────────────────────────────────────────────────────────

/// Fixed set of expense categories. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Housing,
    Transportation,
    Food,
    Healthcare,
    Entertainment,
    Others,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Housing,
        ExpenseCategory::Transportation,
        ExpenseCategory::Food,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Others,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Others => "Others",
        }
    }

    /// Lowercase key used in form field names (`category_housing`).
    pub fn key(self) -> &'static str {
        match self {
            ExpenseCategory::Housing => "housing",
            ExpenseCategory::Transportation => "transportation",
            ExpenseCategory::Food => "food",
            ExpenseCategory::Healthcare => "healthcare",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Others => "others",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// round(100 / number of categories)
    pub fn default_percent() -> u8 {
        (f64::from(PERCENT_MAX) / Self::ALL.len() as f64).round() as u8
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentage of monthly expenses per category.
///
/// Every category is always present. Percentages are independent of each
/// other and are not required to sum to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<ExpenseCategory, i64>")]
pub struct ExpenseCategories(BTreeMap<ExpenseCategory, u8>);

impl ExpenseCategories {
    pub fn get(&self, category: ExpenseCategory) -> u8 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn set(&mut self, category: ExpenseCategory, percent: u8) {
        self.0.insert(category, percent);
    }

    /// Iterates in fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, u8)> + '_ {
        self.0.iter().map(|(c, p)| (*c, *p))
    }

    pub fn total(&self) -> u32 {
        self.0.values().map(|p| u32::from(*p)).sum()
    }
}

impl Default for ExpenseCategories {
    fn default() -> Self {
        let percent = ExpenseCategory::default_percent();
        Self(ExpenseCategory::ALL.into_iter().map(|c| (c, percent)).collect())
    }
}

/// Read as `i64` so an out-of-range percentage is reported against its
/// category instead of as a bare integer overflow.
impl TryFrom<BTreeMap<ExpenseCategory, i64>> for ExpenseCategories {
    type Error = ProfileError;

    fn try_from(map: BTreeMap<ExpenseCategory, i64>) -> Result<Self, Self::Error> {
        if let Some(missing) = ExpenseCategory::ALL.into_iter().find(|c| !map.contains_key(c)) {
            return Err(ProfileError::MissingCategory(missing));
        }

        map.into_iter()
            .map(|(category, value)| {
                u8::try_from(value)
                    .ok()
                    .filter(|percent| *percent <= PERCENT_MAX)
                    .map(|percent| (category, percent))
                    .ok_or(ProfileError::PercentOutOfRange { category, value })
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }
}

/// `{Housing: 17, Transportation: 17, ...}`
impl fmt::Display for ExpenseCategories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (category, percent)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{category}: {percent}")?;
        }
        f.write_str("}")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Financial habits
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancialHabit {
    #[serde(rename = "Regular budgeting")]
    RegularBudgeting,
    #[serde(rename = "Impulse buying")]
    ImpulseBuying,
    #[serde(rename = "Investment in stocks")]
    InvestmentInStocks,
    #[serde(rename = "Investment in real estate")]
    InvestmentInRealEstate,
    #[serde(rename = "Credit card debt")]
    CreditCardDebt,
    #[serde(rename = "Emergency fund maintenance")]
    EmergencyFundMaintenance,
    #[serde(rename = "Regular financial review")]
    RegularFinancialReview,
}

impl FinancialHabit {
    pub const ALL: [FinancialHabit; 7] = [
        FinancialHabit::RegularBudgeting,
        FinancialHabit::ImpulseBuying,
        FinancialHabit::InvestmentInStocks,
        FinancialHabit::InvestmentInRealEstate,
        FinancialHabit::CreditCardDebt,
        FinancialHabit::EmergencyFundMaintenance,
        FinancialHabit::RegularFinancialReview,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FinancialHabit::RegularBudgeting => "Regular budgeting",
            FinancialHabit::ImpulseBuying => "Impulse buying",
            FinancialHabit::InvestmentInStocks => "Investment in stocks",
            FinancialHabit::InvestmentInRealEstate => "Investment in real estate",
            FinancialHabit::CreditCardDebt => "Credit card debt",
            FinancialHabit::EmergencyFundMaintenance => "Emergency fund maintenance",
            FinancialHabit::RegularFinancialReview => "Regular financial review",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.label() == label)
    }
}

impl fmt::Display for FinancialHabit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `[Regular budgeting, Impulse buying]`, `[]` when nothing is selected.
pub fn format_habits(habits: &[FinancialHabit]) -> String {
    let labels: Vec<&str> = habits.iter().map(|h| h.label()).collect();
    format!("[{}]", labels.join(", "))
}

// ────────────────────────────────────────────────────────────────────────────
// ProfileInput
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    #[serde(deserialize_with = "deserialize_age")]
    pub age: u32,
    pub monthly_income: u64,
    pub monthly_expenses: u64,
    pub current_savings: u64,
    pub monthly_savings: u64,
    pub expense_categories: ExpenseCategories,
    /// Selection order; no duplicates.
    pub financial_habits: Vec<FinancialHabit>,
}

/// Accepts any JSON integer so a negative or oversized age surfaces as
/// `AgeOutOfRange`; the 18..=80 bound itself is checked by `validate`.
fn deserialize_age<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let age = i64::deserialize(deserializer)?;
    u32::try_from(age).map_err(|_| de::Error::custom(ProfileError::AgeOutOfRange(age)))
}

impl Default for ProfileInput {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            monthly_income: DEFAULT_MONTHLY_INCOME,
            monthly_expenses: DEFAULT_MONTHLY_EXPENSES,
            current_savings: DEFAULT_CURRENT_SAVINGS,
            monthly_savings: DEFAULT_MONTHLY_SAVINGS,
            expense_categories: ExpenseCategories::default(),
            financial_habits: Vec::new(),
        }
    }
}

impl ProfileInput {
    /// Checks the ranges the form widgets enforce in the browser.
    /// Used for profiles that arrive through the JSON surface.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(AGE_MIN..=AGE_MAX).contains(&self.age) {
            return Err(ProfileError::AgeOutOfRange(self.age.into()));
        }

        for (category, value) in self.expense_categories.iter() {
            if value > PERCENT_MAX {
                return Err(ProfileError::PercentOutOfRange {
                    category,
                    value: value.into(),
                });
            }
        }

        for (i, habit) in self.financial_habits.iter().enumerate() {
            if self.financial_habits[..i].contains(habit) {
                return Err(ProfileError::DuplicateHabit(*habit));
            }
        }

        Ok(())
    }

    pub fn select_habit(&mut self, habit: FinancialHabit) {
        if !self.financial_habits.contains(&habit) {
            self.financial_habits.push(habit);
        }
    }
}
