//! Name inflection helpers shared by the form builder and the scaffold generator.

/// Convert a snake_case string to CamelCase
///
/// Used to derive model names from relation and field names.
///
/// # Example
///
/// ```rust
/// use formbox::naming::to_camel_case;
/// assert_eq!(to_camel_case("line_item"), "LineItem");
/// ```
pub fn to_camel_case(s: &str) -> String {
    s.split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert CamelCase to snake_case (`LineItem` → `line_item`).
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c == '-' || c == ' ' {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}

/// Human-readable label for a field name: drops a trailing `_id`, turns
/// underscores into spaces and capitalizes the first letter.
pub fn humanize(field: &str) -> String {
    let base = field.strip_suffix("_id").unwrap_or(field);
    let spaced = base.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// English plural for a snake_case word.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if word.ends_with("ss")
        || word.ends_with('x')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if word.ends_with('s') {
        return word.to_string();
    }
    format!("{word}s")
}

/// English singular for a snake_case word.
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if ["ss", "us", "is"].iter().any(|suffix| word.ends_with(suffix)) {
        return word.to_string();
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}

/// Whether `word` looks like a plural (its singular differs from it).
pub fn is_plural(word: &str) -> bool {
    singularize(word) != word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("hello_world"), "HelloWorld");
        assert_eq!(to_camel_case("user_id"), "UserId");
        assert_eq!(to_camel_case("single"), "Single");
        assert_eq!(to_camel_case(""), "");
        assert_eq!(to_camel_case("_leading_underscore"), "LeadingUnderscore");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("LineItem"), "line_item");
        assert_eq!(to_snake_case("Product"), "product");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("published_on"), "Published on");
        assert_eq!(humanize("category_id"), "Category");
        assert_eq!(humanize("name"), "Name");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_pluralize_and_singularize() {
        assert_eq!(pluralize("product"), "products");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("products"), "product");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("address"), "address");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("analysis"), "analysis");
        assert!(!is_plural("status"));
        assert!(is_plural("products"));
        assert!(!is_plural("product"));
    }
}
