//! Prompt sent to the model for every résumé.

const RESUME_TEXT_PLACEHOLDER: &str = "{resume_text}";

const ATS_AUDIT_TEMPLATE: &str = r#"You are a Senior Technical Recruiter and ATS Auditor. You review resumes the way an Applicant Tracking System and an experienced recruiter would, and you give precise, actionable feedback.

Analyze the resume text below.

Return ONLY valid JSON. Do not wrap it in Markdown, do not add commentary before or after it.

The JSON must follow this exact schema:

{
  "ats_score": 0,
  "summary": "",
  "summary_upgrade": {
    "found": false,
    "original_summary": "",
    "weak_highlights": [],
    "best_summary": ""
  },
  "detailed_points": [
    {
      "section": "",
      "category": "strength | weakness | suggestion",
      "status": "red | yellow | green",
      "issue": "",
      "original_phrase": "",
      "weak_highlights": [],
      "correction": "",
      "explanation": ""
    }
  ]
}

Rules:
- "ats_score" is an integer from 0 to 100.
- "summary" is a short overall assessment of the resume.
- "summary_upgrade": set "found" to true only if the resume has a professional summary or objective paragraph. Copy that paragraph verbatim into "original_summary", list the weak words or phrases from it (copied exactly as written) in "weak_highlights", and write an improved version in "best_summary". If there is no summary, set "found" to false and leave the other fields empty.
- "category" must be exactly one of: "strength", "weakness", "suggestion".
- "status" must be exactly one of: "red" (critical problem), "yellow" (should be improved), "green" (already strong).
- "section" names the resume section the point refers to, for example "Experience", "Skills", "Education".
- "original_phrase" must be copied verbatim from the resume text so it can be highlighted. Use an empty string if the point is not about a specific phrase.
- "weak_highlights" lists the exact weak words inside "original_phrase".
- "correction" is the rewritten phrase. For work experience bullets, rewrite using the STAR method (Situation, Task, Action, Result) with measurable results. Use "N/A" for strengths or when no rewrite applies.
- "explanation" says why the change matters for ATS screening or for a recruiter.

Resume text:
{resume_text}"#;

/// Interpolates the extracted résumé text into the audit template.
pub fn build_prompt(resume_text: &str) -> String {
    ATS_AUDIT_TEMPLATE.replace(RESUME_TEXT_PLACEHOLDER, resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_resume_text_once_at_the_end() {
        let prompt = build_prompt("Responsible for managing a team and doing sales.");
        assert!(prompt.ends_with("Resume text:\nResponsible for managing a team and doing sales."));
        assert!(!prompt.contains(RESUME_TEXT_PLACEHOLDER));
    }

    #[test]
    fn constrains_categories_and_statuses() {
        let prompt = build_prompt("x");
        assert!(prompt.contains("Senior Technical Recruiter and ATS Auditor"));
        assert!(prompt.contains(r#""strength", "weakness", "suggestion""#));
        assert!(prompt.contains(r#""red" (critical problem)"#));
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert!(prompt.contains("verbatim"));
    }

    #[test]
    fn is_deterministic_and_does_not_expand_placeholders_in_input() {
        let text = "My objective: {resume_text}";
        assert_eq!(build_prompt(text), build_prompt(text));
        assert!(build_prompt(text).ends_with("My objective: {resume_text}"));
    }
}
