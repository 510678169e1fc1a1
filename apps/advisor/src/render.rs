//! Result Renderer and the single HTML page.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use serde::Serialize;
use serde_json::Number;

use crate::advice::profile::{ExpenseCategory, FinancialHabit, ProfileInput, AGE_MAX, AGE_MIN};
use crate::advice::schema::AdviceResult;
use crate::errors::REQUEST_FAILED_MESSAGE;
use crate::form::{FormState, Phase};

pub const PAGE_TITLE: &str = "AI Retirement Planning Assistant";

/// Display lines for one AdviceResult.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub retirement_age: String,
    pub monthly_savings: String,
    /// `1. ...`, `2. ...` in response order.
    pub recommendations: Vec<String>,
}

pub fn render_result(advice: &AdviceResult) -> ResultView {
    ResultView {
        retirement_age: format!(
            "Estimated Retirement Age: {}",
            advice.estimated_retirement_age
        ),
        monthly_savings: format!(
            "Recommended Monthly Savings: ${}",
            advice.monthly_savings_needed
        ),
        recommendations: advice
            .recommendations
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {r}", i + 1))
            .collect(),
    }
}

/// The output shown in the preview block before any request is made.
pub fn example_result() -> AdviceResult {
    AdviceResult {
        estimated_retirement_age: Number::from(65),
        monthly_savings_needed: Number::from(2500),
        recommendations: vec![
            "Increase your emergency fund".to_string(),
            "Diversify your investment portfolio".to_string(),
            "Reduce discretionary spending".to_string(),
        ],
    }
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
label { display: block; margin: 0.5rem 0; }
input[type=number], input[type=password] { width: 100%; }
details { margin: 1rem 0; }
pre.example { background: #f4f6f8; padding: 1rem; }
.info { background: #e8f1fb; padding: 0.5rem; }
.success { background: #e6f4ea; padding: 0.5rem; }
.error { background: #fdecea; padding: 0.5rem; }
.warning { background: #fff8e1; padding: 0.5rem; }
"#;

const SCRIPT: &str = r#"
const form = document.getElementById("advice-form");
const credential = document.getElementById("credential");
const submit = document.getElementById("submit");
credential.addEventListener("input", () => { submit.disabled = credential.value.trim() === ""; });
form.addEventListener("submit", () => {
  submit.disabled = true;
  document.getElementById("spinner").hidden = false;
});
document.querySelectorAll("input[type=range]").forEach((slider) => {
  slider.addEventListener("input", () => { slider.nextElementSibling.value = slider.value; });
});
"#;

/// Renders the full page for a form state. The credential is never written
/// back into the page.
pub fn render_page(form: &FormState) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{PAGE_TITLE}</h1>\n<form method=\"post\" action=\"/advice\" id=\"advice-form\">\n\
         <div class=\"columns\">\n"
    ));

    render_credential_column(&mut html);
    render_profile_column(&mut html, &form.profile);
    html.push_str("</div>\n");

    render_categories(&mut html, &form.profile);
    render_habits(&mut html, &form.profile);

    html.push_str(
        "<button type=\"submit\" id=\"submit\" disabled>Calculate Retirement Age</button>\n\
         <p id=\"spinner\" hidden>Analyzing your financial situation...</p>\n</form>\n",
    );

    render_status(&mut html, &form.phase);

    html.push_str(&format!("<script>{SCRIPT}</script>\n</body>\n</html>\n"));
    html
}

fn render_credential_column(html: &mut String) {
    let example = serde_json::to_string_pretty(&example_result()).unwrap_or_default();
    html.push_str(&format!(
        "<section>\n<h2>Enter Your Gemini API Key</h2>\n\
         <label for=\"credential\">Gemini API Key</label>\n\
         <input type=\"password\" name=\"credential\" id=\"credential\" autocomplete=\"off\">\n\
         <h2>Example Output Preview</h2>\n\
         <p class=\"info\">Your results will look like this:</p>\n\
         <pre class=\"example\" id=\"example-output\">{}</pre>\n</section>\n",
        text(&example)
    ));
}

fn render_profile_column(html: &mut String, profile: &ProfileInput) {
    html.push_str("<section>\n<h2>Enter Your Financial Information</h2>\n");
    html.push_str(&format!(
        "<label>Current Age <input type=\"number\" name=\"age\" min=\"{AGE_MIN}\" max=\"{AGE_MAX}\" step=\"1\" value=\"{}\"></label>\n",
        profile.age
    ));
    number_input(html, "Monthly Income ($)", "monthly_income", profile.monthly_income);
    number_input(html, "Current Savings ($)", "current_savings", profile.current_savings);
    number_input(html, "Current Monthly Savings ($)", "monthly_savings", profile.monthly_savings);
    number_input(html, "Total Monthly Expenses ($)", "monthly_expenses", profile.monthly_expenses);
    html.push_str("</section>\n");
}

fn number_input(html: &mut String, label: &str, name: &str, value: u64) {
    html.push_str(&format!(
        "<label>{label} <input type=\"number\" name=\"{name}\" min=\"0\" step=\"1\" value=\"{value}\"></label>\n"
    ));
}

fn render_categories(html: &mut String, profile: &ProfileInput) {
    html.push_str("<details>\n<summary>Expense Categories</summary>\n");
    for category in ExpenseCategory::ALL {
        let percent = profile.expense_categories.get(category);
        html.push_str(&format!(
            "<label>{label} (% of monthly expenses) \
             <input type=\"range\" name=\"category_{key}\" min=\"0\" max=\"100\" value=\"{percent}\">\
             <output>{percent}</output></label>\n",
            label = category.label(),
            key = category.key(),
        ));
    }
    html.push_str("</details>\n");
}

fn render_habits(html: &mut String, profile: &ProfileInput) {
    html.push_str(
        "<details>\n<summary>Financial Habits</summary>\n<p>Select your financial habits</p>\n",
    );
    for habit in FinancialHabit::ALL {
        let checked = if profile.financial_habits.contains(&habit) {
            " checked"
        } else {
            ""
        };
        html.push_str(&format!(
            "<label><input type=\"checkbox\" name=\"habit\" value=\"{}\"{checked}> {}</label>\n",
            attr(habit.label()),
            text(habit.label())
        ));
    }
    html.push_str("</details>\n");
}

fn render_status(html: &mut String, phase: &Phase) {
    match phase {
        Phase::Idle | Phase::Submitting => {}
        Phase::Collecting => {
            html.push_str(
                "<p class=\"warning\">Enter your Gemini API key to calculate your retirement age.</p>\n",
            );
        }
        Phase::Success(advice) => {
            let view = render_result(advice);
            html.push_str(&format!(
                "<p class=\"success\">Analysis Complete!</p>\n<section id=\"results\">\n\
                 <h2>Results</h2>\n<p>{}</p>\n<p>{}</p>\n<h2>Recommendations</h2>\n",
                text(&view.retirement_age),
                text(&view.monthly_savings)
            ));
            for line in &view.recommendations {
                html.push_str(&format!("<p>{}</p>\n", text(line)));
            }
            html.push_str("</section>\n");
        }
        Phase::Failed => {
            html.push_str(&format!("<p class=\"error\">{REQUEST_FAILED_MESSAGE}</p>\n"));
        }
    }
}
