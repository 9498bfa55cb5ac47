// Prompt constants for exam generation.

use crate::models::job::DifficultyLevel;

pub const EXAM_PERSONA: &str = "You are an expert exam creator writing technically correct, \
    unambiguous interview exams calibrated to a requested difficulty level.";

/// What each difficulty level means for the three sections.
pub struct LevelRubric {
    pub mcq: &'static str,
    pub theory: &'static str,
    pub coding: &'static str,
}

pub fn rubric(level: DifficultyLevel) -> LevelRubric {
    match level {
        DifficultyLevel::Beginner => LevelRubric {
            mcq: "basic conceptual questions",
            theory: "basic definitions",
            coding: "simple operations, loops or conditionals",
        },
        DifficultyLevel::Intermediate => LevelRubric {
            mcq: "practical understanding",
            theory: "explain how it works",
            coding: "string manipulation and arrays",
        },
        DifficultyLevel::Advanced => LevelRubric {
            mcq: "debugging and tricky scenarios",
            theory: "comparisons, pros and cons",
            coding: "recursion and algorithmic thinking",
        },
        DifficultyLevel::Expert => LevelRubric {
            mcq: "integration and real-world architecture",
            theory: "architectural decisions",
            coding: "optimization and complex data structures",
        },
        DifficultyLevel::Master => LevelRubric {
            mcq: "advanced scenarios, optimization and pitfalls",
            theory: "advanced pitfalls, security and performance",
            coding: "algorithm design with many edge cases and large input constraints",
        },
    }
}

/// Exam prompt. Replace: {level}, {mcq_count}, {theory_count}, {coding_count},
/// {mcq_rubric}, {theory_rubric}, {coding_rubric}, {skills_json}.
pub const EXAM_PROMPT_TEMPLATE: &str = r#"Create an interview exam at difficulty level "{level}".

SKILLS TO TEST:
{skills_json}

SKILL PRIORITIES:
- mandatory_skills: high priority, 60% of the exam weight
- important_skills: medium priority, 40% of the exam weight
- unnecessary_skills: ignore entirely

SECTION 1: MULTIPLE CHOICE
- Exactly {mcq_count} questions.
- Difficulty "{level}" means: {mcq_rubric}.
- Exactly 4 options per question and exactly one correct option.
- "answer" MUST be copied verbatim from "options".
- Cover corner cases where relevant.

SECTION 2: THEORY
- Exactly {theory_count} questions, each answerable in 4-5 lines.
- Difficulty "{level}" means: {theory_rubric}.
- Ask why/how questions that test conceptual depth.

SECTION 3: CODING
- Exactly {coding_count} self-contained problems.
- Difficulty "{level}" means: {coding_rubric}.
- No databases, files, network APIs or frameworks; test data structures, algorithms and problem solving.
- Each problem has a name, a description with constraints, at least 2 examples and at least 1 test case (include edge cases).

Return a JSON object with this EXACT schema (no extra fields):
{
  "level": "{level}",
  "mcq_questions": [
    {"question": "...", "options": ["...", "...", "...", "..."], "answer": "..."}
  ],
  "theory_questions": [
    {"question": "...", "expected_answer": "..."}
  ],
  "coding_questions": [
    {
      "name": "...",
      "description": "...",
      "examples": [{"input": "...", "expected_output": "...", "explanation": "..."}],
      "test_cases": [{"input": "...", "expected_output": "...", "explanation": "..."}]
    }
  ]
}"#;
