//! Prompt templates for the AI oracle bridge.
//!
//! The templates are fixed strings with `{...}` slots filled by the render
//! helpers. The bridge owns model selection and token budgets; these only
//! shape the task.

use crate::oracle::PlanInput;

/// Template for the concept-explainer ("AI Oracle") feature.
pub const EXPLAIN_CONCEPT_PROMPT: &str = r#"You are a patient financial educator for a retirement savings dashboard.

YOUR TASK: Explain the concept below to a non-expert saver in plain language.

CONSTRAINTS:
- At most 3 short paragraphs
- No investment advice, no product recommendations
- Define any jargon you must use
- If the text is not a financial concept, say so briefly instead of guessing

CONCEPT:
{concept}"#;

/// Template for the structured financial-planner feature. The bridge is
/// asked for JSON only; the response is schema-validated in `oracle`.
pub const FINANCIAL_PLAN_PROMPT: &str = r#"You are a financial planning assistant for a retirement savings dashboard.

YOUR TASK: Produce a savings plan for the profile below.

OUTPUT: respond with a single JSON object and nothing else, with exactly these fields:
- "summary": one-paragraph plain-language summary (string)
- "monthly_savings_target": suggested monthly savings in the user's currency (number)
- "allocations": array of {"name": string, "pct": number}; percentages must sum to 100
- "steps": array of 3 to 6 concrete next steps (strings)

CONSTRAINTS:
- Stay within the user's stated income; never suggest saving more than income minus expenses
- Keep allocations coarse (3-5 buckets)
- No specific securities or products

PROFILE:
- monthly income: {monthly_income}
- monthly expenses: {monthly_expenses}
- current savings: {current_savings}
- risk tolerance: {risk_tolerance}
- horizon: {horizon_years} years"#;

/// Render the explainer prompt around the user's concept text.
pub fn render_explain(concept: &str) -> String {
    EXPLAIN_CONCEPT_PROMPT.replace("{concept}", concept.trim())
}

/// Render the planner prompt from a validated profile.
pub fn render_plan(input: &PlanInput) -> String {
    FINANCIAL_PLAN_PROMPT
        .replace("{monthly_income}", &input.monthly_income.to_string())
        .replace("{monthly_expenses}", &input.monthly_expenses.to_string())
        .replace("{current_savings}", &input.current_savings.to_string())
        .replace("{risk_tolerance}", &input.risk_tolerance)
        .replace("{horizon_years}", &input.horizon_years.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_prompt_embeds_concept() {
        let prompt = render_explain("  dollar-cost averaging ");
        assert!(prompt.contains("dollar-cost averaging"));
        assert!(!prompt.contains("{concept}"));
    }

    #[test]
    fn plan_prompt_fills_every_slot() {
        let input = PlanInput {
            monthly_income: 5000.0,
            monthly_expenses: 3200.0,
            current_savings: 15000.0,
            risk_tolerance: "moderate".to_string(),
            horizon_years: 20,
        };
        let prompt = render_plan(&input);
        assert!(prompt.contains("5000"));
        assert!(prompt.contains("moderate"));
        assert!(prompt.contains("20 years"));
        assert!(!prompt.contains("{monthly_income}"));
        assert!(!prompt.contains("{horizon_years}"));
    }
}
