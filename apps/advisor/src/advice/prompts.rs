// Prompt text for the advice request.

use crate::advice::profile::{format_habits, ProfileInput};

/// Advice prompt template.
/// Replace: {age}, {monthly_income}, {monthly_expenses}, {current_savings},
///          {monthly_savings}, {expense_categories}, {financial_habits}
pub const ADVICE_PROMPT_TEMPLATE: &str = r#"Based on the following financial information, estimate the retirement age and provide brief financial advice:
- Current Age: {age}
- Monthly Income: ${monthly_income}
- Monthly Expenses: ${monthly_expenses}
- Current Savings: ${current_savings}
- Monthly Savings: ${monthly_savings}
- Expense Categories (% of monthly expenses): {expense_categories}
- Financial Habits: {financial_habits}

Provide the response in JSON format with exactly these keys:
- estimated_retirement_age (number)
- monthly_savings_needed (number, in dollars)
- recommendations (array of strings)

Respond with the JSON object only. Do NOT use markdown code fences."#;

/// Builds the single natural-language prompt for a profile.
pub fn build_prompt(profile: &ProfileInput) -> String {
    ADVICE_PROMPT_TEMPLATE
        .replace("{age}", &profile.age.to_string())
        .replace("{monthly_income}", &profile.monthly_income.to_string())
        .replace("{monthly_expenses}", &profile.monthly_expenses.to_string())
        .replace("{current_savings}", &profile.current_savings.to_string())
        .replace("{monthly_savings}", &profile.monthly_savings.to_string())
        .replace(
            "{expense_categories}",
            &profile.expense_categories.to_string(),
        )
        .replace(
            "{financial_habits}",
            &format_habits(&profile.financial_habits),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::profile::{ExpenseCategory, FinancialHabit};
    use crate::advice::schema::{KEY_MONTHLY_SAVINGS, KEY_RECOMMENDATIONS, KEY_RETIREMENT_AGE};

    #[test]
    fn test_prompt_embeds_default_profile() {
        let prompt = build_prompt(&ProfileInput::default());
        assert!(prompt.contains("- Current Age: 30\n"));
        assert!(prompt.contains("- Monthly Income: $5000\n"));
        assert!(prompt.contains("- Monthly Expenses: $3000\n"));
        assert!(prompt.contains("- Current Savings: $10000\n"));
        assert!(prompt.contains("- Monthly Savings: $1000\n"));
        assert!(prompt.contains(
            "{Housing: 17, Transportation: 17, Food: 17, Healthcare: 17, Entertainment: 17, Others: 17}"
        ));
        assert!(prompt.contains("- Financial Habits: []\n"));
    }

    #[test]
    fn test_prompt_embeds_every_field() {
        let mut profile = ProfileInput {
            age: 47,
            monthly_income: 8123,
            monthly_expenses: 4567,
            current_savings: 250001,
            monthly_savings: 1299,
            ..ProfileInput::default()
        };
        for (i, category) in ExpenseCategory::ALL.into_iter().enumerate() {
            profile.expense_categories.set(category, 10 + i as u8);
        }
        profile.select_habit(FinancialHabit::InvestmentInRealEstate);
        profile.select_habit(FinancialHabit::ImpulseBuying);

        let prompt = build_prompt(&profile);

        assert!(prompt.contains("Current Age: 47"));
        assert!(prompt.contains("$8123"));
        assert!(prompt.contains("$4567"));
        assert!(prompt.contains("$250001"));
        assert!(prompt.contains("$1299"));
        for (i, category) in ExpenseCategory::ALL.into_iter().enumerate() {
            assert!(prompt.contains(&format!("{}: {}", category.label(), 10 + i)));
        }
        assert!(prompt.contains("[Investment in real estate, Impulse buying]"));
    }

    #[test]
    fn test_prompt_has_no_unfilled_placeholders() {
        let prompt = build_prompt(&ProfileInput::default());
        assert!(!prompt.contains("{age}"));
        assert!(!prompt.contains("{monthly_"));
        assert!(!prompt.contains("{current_savings}"));
        assert!(!prompt.contains("{expense_categories}"));
        assert!(!prompt.contains("{financial_habits}"));
    }

    #[test]
    fn test_prompt_names_all_response_keys() {
        let prompt = build_prompt(&ProfileInput::default());
        for key in [KEY_RETIREMENT_AGE, KEY_MONTHLY_SAVINGS, KEY_RECOMMENDATIONS] {
            assert!(prompt.contains(key), "prompt is missing key {key}");
        }
    }
}
