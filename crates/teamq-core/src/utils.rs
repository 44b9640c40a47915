/// Convert snake_case or kebab-case to PascalCase.
///
/// Normalizes words separated by `_`, `-`, or `.`. If the input is already
/// PascalCase (starts uppercase, no separators), it is returned unchanged.
///
/// # Examples
/// ```
/// use teamq_core::utils::to_pascal_case;
/// assert_eq!(to_pascal_case("post_id"), "PostId");
/// assert_eq!(to_pascal_case("POST_ID"), "PostId");
/// assert_eq!(to_pascal_case("GetAuthorById"), "GetAuthorById");  // idempotent
/// ```
pub fn to_pascal_case(s: &str) -> String {
    let has_separator = s.chars().any(is_separator);
    let has_lowercase = s.chars().any(|c| c.is_ascii_lowercase());
    let starts_uppercase = s.chars().next().is_some_and(|c| c.is_ascii_uppercase());

    // Already PascalCase: starts uppercase, has lowercase, no separators
    if starts_uppercase && has_lowercase && !has_separator {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;
    for c in s.chars() {
        if is_separator(c) {
            capitalize_next = true;
            continue;
        }
        if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c.to_ascii_lowercase());
        }
    }
    result
}

/// Convert any supported casing to camelCase.
///
/// # Examples
/// ```
/// use teamq_core::utils::to_camel_case;
/// assert_eq!(to_camel_case("GetAuthorById"), "getAuthorById");
/// assert_eq!(to_camel_case("approved_only"), "approvedOnly");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert PascalCase, camelCase or kebab-case to snake_case.
///
/// Runs of capitals are kept together, so acronyms stay readable.
///
/// # Examples
/// ```
/// use teamq_core::utils::to_snake_case;
/// assert_eq!(to_snake_case("GetAuthorById"), "get_author_by_id");
/// assert_eq!(to_snake_case("ListHTTPLogs"), "list_http_logs");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Make `name` usable as an identifier in a target language.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, a leading digit gets a `_`
/// prefix, and names that collide with `reserved` get a trailing `_`.
///
/// # Examples
/// ```
/// use teamq_core::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("blog-posts", &[]), "blog_posts");
/// assert_eq!(sanitize_identifier("2fa", &[]), "_2fa");
/// assert_eq!(sanitize_identifier("class", &["class"]), "class_");
/// ```
pub fn sanitize_identifier(name: &str, reserved: &[&str]) -> String {
    let mut result: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if reserved.contains(&result.as_str()) {
        result.push('_');
    }
    result
}

/// Whether `s` is a plain identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | '.')
}
