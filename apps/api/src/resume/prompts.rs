// All LLM prompt constants for the resume module.

/// Résumé clean-up prompt. Placeholder: `{raw_resume_text}`.
pub const NORMALIZE_PROMPT_TEMPLATE: &str = r#"You are a text processing assistant.
The following text was extracted from a resume file and might contain formatting errors,
unnecessary characters, or be poorly structured.
Please clean and reformat this text into a clear, well-structured resume in Markdown.
Ensure that all key information (experience, education, skills, etc.) is preserved and presented logically.
Remove any artifacts from the text extraction process. The output should be only the cleaned resume text.
---
Raw Resume Text:
```
{raw_resume_text}
```
---
Cleaned and Formatted Resume Text:
"#;
