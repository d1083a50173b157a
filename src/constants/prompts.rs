use crate::models::domain::ExamConfig;
use crate::models::dto::MissedQuestion;

pub const QUIZ_QUESTION_COUNT: usize = 20;

pub const EXPLANATION_UNAVAILABLE: &str = "Explanation unavailable. Please try again later.";

pub const FORMATTING_RULES: &str = "## FORMATTING RULES

- Use `#`, `##` and `###` headings to structure sections.
- Use `- ` for bullet points and `1. ` for numbered steps, one item per line.
- Use **double asterisks** for key terms.
- Write every mathematical expression as inline LaTeX between single dollar signs, for example $x^2 + 2x + 1$.
- Never use `$$` display math, HTML, tables or code blocks.
- Separate sections with a line containing only `---`.";

pub fn tutorial_prompt(config: &ExamConfig, freshness_token: &str) -> String {
    format!(
        r#"You are an experienced {exam} examiner and tutor preparing a candidate for the {year} {exam} examination in {subject}.

## TASK

Write a complete study tutorial on the topic "{topic}" as it is examined in {exam} {subject}.

## CONTENT REQUIREMENTS

1. Start with a short overview of why the topic matters in the {exam} syllabus.
2. Explain every core concept from first principles, in the order a candidate should learn them.
3. Include at least two fully worked examples in the style of past {exam} questions, showing every step.
4. List the common mistakes candidates make on this topic and how to avoid them.
5. Finish with a concise summary of the key facts and formulas to memorise.

{rules}

Session reference: {token}. Write fresh material for this session rather than repeating a stock answer."#,
        exam = config.exam_type,
        year = config.year,
        subject = config.subject,
        topic = config.topic_or_default(),
        rules = FORMATTING_RULES,
        token = freshness_token,
    )
}

pub fn quiz_prompt(config: &ExamConfig, question_count: usize, freshness_token: &str) -> String {
    format!(
        r#"You are a {exam} question setter writing a practice paper for the {year} {exam} examination in {subject}.

## TASK

Generate exactly {count} multiple-choice questions on the topic "{topic}", matching the difficulty and style of real {exam} {subject} papers.

## QUESTION REQUIREMENTS

- Each question has exactly 4 options, of which exactly one is correct.
- Distractors must be plausible and reflect common candidate errors.
- Vary the position of the correct option across questions.
- Cover different sub-areas of the topic; do not repeat questions.
- Write mathematical expressions as inline LaTeX between single dollar signs.

## OUTPUT FORMAT

Return ONLY a JSON array of {count} objects. Each object has:
- questionText: string (the question, never empty)
- options: array of exactly 4 strings
- correctOptionIndex: integer from 0 to 3 (index of the correct option)

No prose, no markdown code fences, no extra keys.

Paper reference: {token}. Produce a new set of questions for this paper."#,
        exam = config.exam_type,
        year = config.year,
        subject = config.subject,
        topic = config.topic_or_default(),
        count = question_count,
        token = freshness_token,
    )
}

pub fn explanation_prompt(config: &ExamConfig, missed: &[MissedQuestion]) -> String {
    let items: String = missed
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "### Item {}\nQuestion: {}\nCandidate's answer: {}\nCorrect answer: {}\n\n",
                index + 1,
                item.question_text,
                item.selected_text,
                item.correct_text
            )
        })
        .collect();

    format!(
        r#"You are a patient {exam} {subject} tutor. A candidate answered the following questions incorrectly.

{items}## TASK

For each item, write a step-by-step explanation that shows how to reach the correct answer and why the candidate's answer is wrong.

{rules}

## OUTPUT FORMAT

Return ONLY a JSON array of {count} strings, one explanation per item, in the same order as the items above."#,
        exam = config.exam_type,
        subject = config.subject,
        items = items,
        rules = FORMATTING_RULES,
        count = missed.len(),
    )
}
