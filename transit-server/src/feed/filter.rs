//! Search filter expressions for the feed's `q` parameter.
//!
//! Clauses have the form `field==value`; clauses joined with `,` are OR-ed.
//! Values that contain filter metacharacters or whitespace are wrapped in
//! double quotes with inner quotes and backslashes escaped.

const RESERVED: &[char] = &['"', '\'', '(', ')', ';', ',', '=', '!', '<', '>', '*', '\\'];

/// Quote a value if it would otherwise be misparsed.
pub fn quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || RESERVED.contains(&c));

    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// `field==value`
pub fn equals(field: &str, value: &str) -> String {
    format!("{field}=={}", quote(value))
}

/// `field==a,field==b,...`
pub fn any_of<'a>(field: &str, values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(|v| equals(field, v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Case-insensitive substring match on a text field.
///
/// Wildcards are added around the value, so reserved characters inside the
/// search text are stripped rather than quoted.
pub fn contains(field: &str, text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !RESERVED.contains(c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("*");
    format!("{field}==*{cleaned}*")
}
