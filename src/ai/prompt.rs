//! Annotation Prompt
//!
//! The fixed system instruction sent with every annotation request.
//! The service is asked for a bare JSON object; response parsing still
//! tolerates surrounding prose (see [`super::response`]).

pub const SYSTEM_PROMPT: &str = "You are a professional Python code summarizer. \
Given the Python source code, return a JSON object with two keys: \
`summary` (a 1-2 sentence summary) and `docstrings` (a list of strings, each \
representing a suggested docstring for a class or function). \
Respond with valid JSON only, no additional text.";
