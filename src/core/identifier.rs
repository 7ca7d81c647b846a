//! Identifier casing shared with `protoc-gen-go`.
//!
//! Generated Go bindings name each proto message with a specific CamelCase rule.
//! Stubs reference those names directly, so the conversion here has to agree
//! with the generator character for character:
//!
//! | Input | Output |
//! |-------|--------|
//! | `foo_bar` | `FooBar` |
//! | `a2b_cd` | `A2BCd` |
//! | `Thing_KEYS` | `Thing_KEYS` |
//! | `already_Capital_case` | `Already_CapitalCase` |

/// Convert a proto identifier to the name `protoc-gen-go` gives it.
///
/// Three passes, in order:
/// 1. uppercase a leading ASCII lowercase letter,
/// 2. drop each `_` that precedes an ASCII lowercase letter and uppercase that letter,
/// 3. uppercase each ASCII lowercase letter that follows an ASCII digit.
///
/// Anything else passes through, so the conversion is idempotent.
///
/// # Examples
///
/// ```
/// use protoplug::core::identifier::to_camel_case;
///
/// assert_eq!(to_camel_case("foo_bar"), "FooBar");
/// assert_eq!(to_camel_case("a2b_cd"), "A2BCd");
/// assert_eq!(to_camel_case("FooBar"), "FooBar");
/// ```
pub fn to_camel_case(ident: &str) -> String {
    let capitalized = capitalize_first(ident);
    let joined = join_underscores(&capitalized);
    capitalize_after_digits(&joined)
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        }
        _ => s.to_string(),
    }
}

fn join_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('_', Some(next)) if next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }

    out
}

fn capitalize_after_digits(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if c.is_ascii_digit()
            && let Some(next) = chars.peek()
            && next.is_ascii_lowercase()
        {
            out.push(next.to_ascii_uppercase());
            chars.next();
        }
    }

    out
}
