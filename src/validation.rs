//! Input validation for puppy names and chat text

/// Longest accepted puppy name, in characters
pub const MAX_PUPPY_NAME: usize = 32;

/// Chat text beyond this many characters is cut before matching
pub const MAX_CHAT_CHARS: usize = 500;

/// How user-supplied text treats a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextChar {
    /// Printable; kept as is.
    Plain,
    /// Line break or tab; chat turns it into a space.
    Spacing,
    /// Any other control character; chat drops it.
    Control,
}

pub fn classify_char(c: char) -> TextChar {
    match c {
        '\n' | '\r' | '\t' => TextChar::Spacing,
        c if c.is_control() => TextChar::Control,
        _ => TextChar::Plain,
    }
}

/// Puppy name validation errors with helpful messages
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Puppy name cannot be empty")]
    Empty,

    #[error("Puppy name is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Puppy name contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },
}

/// Validate a puppy name, returning the trimmed form.
pub fn validate_puppy_name(name: &str) -> Result<String, NameError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    if trimmed.chars().count() > MAX_PUPPY_NAME {
        return Err(NameError::TooLong { max: MAX_PUPPY_NAME });
    }

    let rejected: Vec<String> = trimmed
        .chars()
        .filter(|&c| classify_char(c) != TextChar::Plain)
        .map(|c| format!("\\u{{{:04x}}}", c as u32))
        .collect();
    if !rejected.is_empty() {
        return Err(NameError::InvalidCharacters {
            chars: rejected.join(", "),
        });
    }

    Ok(trimmed.to_string())
}

/// Sanitize chat text: drop control characters (newlines become spaces) and cap the length.
pub fn sanitize_chat_text(text: &str) -> String {
    text.chars()
        .filter_map(|c| match classify_char(c) {
            TextChar::Plain => Some(c),
            TextChar::Spacing => Some(' '),
            TextChar::Control => None,
        })
        .take(MAX_CHAT_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}
