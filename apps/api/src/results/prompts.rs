// Prompt constants for the final report.

pub const REPORT_SYSTEM: &str = "You are an expert examiner writing a concise, plain-text \
    assessment report for a hiring panel. Do NOT use markdown formatting or code fences.";

/// Report prompt. Replace: {total_marks_rule}, {test_details_json}, {consolidated_json}.
pub const REPORT_PROMPT_TEMPLATE: &str = r#"Below are the answers a candidate submitted in an interview exam, with the MCQs already graded (`is_correct`, and `mcq_summary` for the totals).
Theory answers may not match the expected answer word for word; award marks on the substance of each answer.

EXAM CONFIGURATION (question counts and marks per question):
{test_details_json}

{total_marks_rule}

CANDIDATE SUBMISSION:
{consolidated_json}

Write the report in exactly this plain-text layout:

Candidate Name: <name>
MCQ Score: <correct> out of <total>
    - what the MCQ results say about the candidate's skills

Theory Questions Attempted:
    - one bullet per question with its score ("Score: x/y") and a short assessment

Coding Questions Attempted:
    - one bullet per question with its score ("Score: x/y") and a short assessment

Overall Feedback:
    - two or three bullets

Briefly explain how the obtained and total marks were calculated.

The LAST line of the report MUST be exactly:
Marks: <obtained>/<total>
where both are whole numbers and obtained is not greater than total. Do NOT write "Marks:" anywhere else in the report."#;

pub const TOTAL_MARKS_KNOWN: &str = "The exam is worth {total} marks in total; the final line must use {total} as the total.";
pub const TOTAL_MARKS_UNKNOWN: &str = "Marks per question are not configured for every section; choose a sensible marking scheme and state it.";
