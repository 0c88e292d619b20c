//! Prompt construction.
//!
//! `build_prompt` is a pure function of the source selection and the target:
//! fixed instructional templates, no interpolation of file contents. File
//! contents and prior-stage scenarios are appended by the request composers
//! just before the model call.

use crate::state::SourceSelection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptTarget {
    Scenarios,
    Automation,
}

/// Shown in place of the automation template when only analysis documents are
/// provided. The guard in the command layer rejects the generation outright;
/// this text is what the automation tab displays.
pub const AUTOMATION_UNAVAILABLE: &str = "\
Automation Not Available

Automation code cannot be generated from analysis documentation only.
Please include source code files as well to enable automation script generation.";

pub fn build_prompt(selection: SourceSelection, target: PromptTarget) -> String {
    match target {
        PromptTarget::Scenarios => scenario_prompt(selection),
        PromptTarget::Automation => {
            if selection == SourceSelection::Analysis {
                AUTOMATION_UNAVAILABLE.to_string()
            } else {
                AUTOMATION_TEMPLATE.trim().to_string()
            }
        }
    }
}

/* ============================================================
   Scenario prompt
   ============================================================ */

fn provided_preamble(selection: SourceSelection) -> &'static str {
    match selection {
        SourceSelection::Code => {
            "You are provided the following:\n\
             - Frontend and backend source code files for a web application"
        }
        SourceSelection::Analysis => {
            "You are provided the following:\n\
             - Design documents or functional specifications for a web application"
        }
        SourceSelection::Both => {
            "You are provided the following:\n\
             - Frontend and backend source code files for a web application\n\
             - Design documents or functional specifications"
        }
    }
}

fn scenario_prompt(selection: SourceSelection) -> String {
    let mut out = String::new();

    out.push_str("You are a senior QA test engineer.\n\n");
    out.push_str(provided_preamble(selection));
    out.push_str("\n\n");
    out.push_str(SCENARIO_TASK);

    out
}

const SCENARIO_TASK: &str = "\
Your task:

Based only on the available files, infer the business logic and user functionality of the application.
- Represent realistic user behaviors and flows
- Cover happy paths (successful actions)
- Cover edge cases and error scenarios (invalid inputs, system limits, empty fields, etc.)
- Include validation scenarios (required fields, format checks)
- Are **independent and clearly described**
- Are suitable for use in a UI test automation project

Each scenario should include:
1. A short title
2. A one-line goal or description
3. Steps the user would follow
4. Expected results or validation points

The output should be a numbered list of test scenarios.";

/* ============================================================
   Automation prompt (stable, selection-independent)
   ============================================================ */

const AUTOMATION_TEMPLATE: &str = r#"
You are a senior QA automation engineer.

You are given:
- The source code files of a web application (frontend and backend)
- A set of test scenarios written from the user's perspective
- (Optional) Analysis or design documentation

Your task:

Write complete, high-quality Playwright automation tests in **TypeScript** that:
1. Follow the official @playwright/test format
2. Include meaningful test() blocks with descriptive titles
3. Contain expect() assertions that fully validate UI behavior and logic
4. Cover:
   - Happy paths (successful flows)
   - Edge cases (invalid inputs, boundary values)
   - Negative flows (failed login, empty fields)
   - Optional conditions (user cancels, prompt is dismissed)

Additional Instructions:
- Maximize code coverage across all components and logic in the source code
- Use element selectors that reflect the actual HTML structure
- Group related tests logically in the same file
- Keep the code clean and directly executable in a standard Playwright project
"#;

/* ============================================================
   Request composition
   ============================================================ */

pub fn compose_scenario_request(prompt: &str, file_contents: &str) -> String {
    format!("{}\n\nSource Files:\n{}", prompt, file_contents)
}

pub fn compose_automation_request(prompt: &str, scenarios: &str, file_contents: &str) -> String {
    format!(
        "{}\n\nTest Scenarios:\n{}\n\nSource Files:\n{}",
        prompt, scenarios, file_contents
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_prompt_is_deterministic() {
        for selection in [
            SourceSelection::Code,
            SourceSelection::Analysis,
            SourceSelection::Both,
        ] {
            for target in [PromptTarget::Scenarios, PromptTarget::Automation] {
                assert_eq!(
                    build_prompt(selection, target),
                    build_prompt(selection, target)
                );
            }
        }
    }

    #[test]
    fn analysis_automation_yields_unavailability_message() {
        let prompt = build_prompt(SourceSelection::Analysis, PromptTarget::Automation);
        assert_eq!(prompt, AUTOMATION_UNAVAILABLE);
    }

    #[test]
    fn scenario_preamble_tracks_selection() {
        let code = build_prompt(SourceSelection::Code, PromptTarget::Scenarios);
        let analysis = build_prompt(SourceSelection::Analysis, PromptTarget::Scenarios);
        let both = build_prompt(SourceSelection::Both, PromptTarget::Scenarios);

        assert!(code.contains("source code files"));
        assert!(!code.contains("Design documents"));
        assert!(analysis.contains("Design documents"));
        assert!(!analysis.contains("source code files"));
        assert!(both.contains("source code files"));
        assert!(both.contains("Design documents"));
    }

    #[test]
    fn scenario_prompt_always_asks_for_numbered_list() {
        for selection in [
            SourceSelection::Code,
            SourceSelection::Analysis,
            SourceSelection::Both,
        ] {
            let prompt = build_prompt(selection, PromptTarget::Scenarios);
            assert!(prompt.starts_with("You are a senior QA test engineer."));
            assert!(prompt.ends_with("numbered list of test scenarios."));
        }
    }

    #[test]
    fn automation_prompt_is_selection_independent_outside_analysis() {
        assert_eq!(
            build_prompt(SourceSelection::Code, PromptTarget::Automation),
            build_prompt(SourceSelection::Both, PromptTarget::Automation)
        );
    }

    #[test]
    fn composed_requests_carry_all_sections() {
        let scenario = compose_scenario_request("PROMPT", "FILES");
        assert_eq!(scenario, "PROMPT\n\nSource Files:\nFILES");

        let automation = compose_automation_request("PROMPT", "SCENARIOS", "FILES");
        assert_eq!(
            automation,
            "PROMPT\n\nTest Scenarios:\nSCENARIOS\n\nSource Files:\nFILES"
        );
    }
}
