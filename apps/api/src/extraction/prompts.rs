// Prompt constants for profile extraction.

/// Persona for profile extraction; the JSON-only instruction is appended at call time.
pub const PROFILE_PERSONA: &str = "You are an expert technical examiner who reads resumes \
    and job descriptions and decides which skills an interview exam must test.";

/// Profile extraction prompt. Replace `{job_requirements}` and `{resume_text}` (in that order).
pub const PROFILE_PROMPT_TEMPLATE: &str = r#"Read the candidate resume and the job requirements below.

1. Extract the candidate profile details.
2. Partition the skills worth testing in an interview into three lists:
   - mandatory_skills: skills the job requirements explicitly demand
   - important_skills: skills that show the candidate's overall knowledge and are worth testing
   - unnecessary_skills: skills unrelated to the job requirements

Return a JSON object with this EXACT schema (no extra fields). Use "" or [] when the resume has no data:
{
  "name": "Full name of the candidate",
  "qualification": "Highest qualification",
  "technical_skills": ["..."],
  "soft_skills": ["..."],
  "programming_languages": ["..."],
  "email": "candidate@example.com",
  "contact_no": "+1 555 0100",
  "skills_in_jd": ["skills required by the job requirements"],
  "exam_skills": {
    "mandatory_skills": ["..."],
    "important_skills": ["..."],
    "unnecessary_skills": ["..."]
  }
}

JOB REQUIREMENTS:
{job_requirements}

RESUME TEXT:
{resume_text}"#;
