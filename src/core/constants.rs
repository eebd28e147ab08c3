/// Assistant turn appended whenever a request fails for any reason.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Try Again!";

/// Prompts offered on the welcome panel while the conversation is empty.
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "What is JavaScript?",
    "Tell me some basic concepts of JavaScript.",
    "What are data types in JavaScript?",
];

pub const WELCOME_TITLE: &str = "Welcome to CodeGPT";
pub const WELCOME_TAGLINE: &str =
    "Explore coding concepts and conquer challenges with your dedicated coding buddy by your side.";

pub const DEFAULT_HOST: &str = "generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "text-bison-001";
pub const DEFAULT_THEME: &str = "dark";

pub const API_KEY_ENV: &str = "CODEGPT_API_KEY";
pub const HOST_ENV: &str = "CODEGPT_HOST";
pub const MODEL_ENV: &str = "CODEGPT_MODEL";
pub const LOG_FILTER_ENV: &str = "CODEGPT_LOG";

/// Rows the input field may grow to before it starts scrolling.
pub const MAX_INPUT_ROWS: u16 = 6;
