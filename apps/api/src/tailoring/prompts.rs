// Prompt templates for the Tailoring module.

/// Cover-letter prompt template. Placeholders are replaced by `build_cover_letter_prompt`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = "Based on the following resume:
{resume_text}

And this example cover letter structure and style:
{cover_template}

Generate a completely unique, personalized cover letter for the position of {job_title} at {company_name}. The job description is:
{job_description}

Highlight relevant experiences, skills, and achievements from the resume that match the job. \
Keep the tone professional, enthusiastic, and aligned with the example's spirit. \
Structure it with header, date, greeting (Dear {company_name} Team,), body paragraphs, and closing. \
Do not fabricate any information.";

/// Fills the cover-letter template.
///
/// Free-text fields go in last so a `{placeholder}` typed by the user is never substituted.
pub fn build_cover_letter_prompt(
    resume_text: &str,
    cover_template: &str,
    job_title: &str,
    company_name: &str,
    job_description: &str,
) -> String {
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{company_name}", company_name)
        .replace("{job_description}", job_description)
        .replace("{cover_template}", cover_template)
        .replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_all_inputs() {
        let prompt = build_cover_letter_prompt(
            "Jane Doe SKILLS: Rust",
            "Dear Hiring Manager,",
            "Backend Engineer",
            "Acme",
            "Build APIs in Rust",
        );
        assert!(prompt.starts_with("Based on the following resume:\nJane Doe SKILLS: Rust\n"));
        assert!(prompt.contains("Dear Hiring Manager,"));
        assert!(prompt.contains("position of Backend Engineer at Acme"));
        assert!(prompt.contains("Build APIs in Rust"));
        assert!(prompt.contains("(Dear Acme Team,)"));
        assert!(prompt.ends_with("Do not fabricate any information."));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_braces_in_resume_are_left_alone() {
        let prompt = build_cover_letter_prompt("uses {job_title} literally", "", "T", "C", "D");
        assert!(prompt.contains("uses {job_title} literally"));
    }
}
