// All LLM prompt constants for the answers module.
// Rendered with llm_client::prompts::fill_template.

/// Answer prompt template. Placeholders: `{resume}`, `{role}`, `{company}`,
/// `{company_context}`, `{word_limit}`, `{question}`, `{culture_guideline}`.
pub const ANSWER_PROMPT_TEMPLATE: &str = r#"You are an expert interview coach and career advisor.

Below is the candidate's résumé (Markdown):
```
{resume}
```

They are applying for the role of **{role}** at **{company}**{company_context}.

Your task: craft a clear, concise answer (≤ {word_limit} words) to the interview question below.

Question:
{question}

Formatting guidelines:
1. Start with a one-sentence summary of why this candidate is a great fit.
2. Then use 3–4 bullet points that each:
   • Reference a specific skill or achievement from the résumé
   • Include metrics or outcomes whenever possible{culture_guideline}
3. Maintain a professional, confident tone.
4. Only draw on evidence present in the résumé; do not invent experience.

Answer:
"#;

/// Bullet added to the guidelines only when company context is available.
pub const CULTURE_GUIDELINE: &str =
    "\n   • Tie back to the company's mission, values or culture described above";
