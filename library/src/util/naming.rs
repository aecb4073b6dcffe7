//! Operation naming helpers.

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `operation_name("set", "radius")` is `"setRadius"`.
pub fn operation_name(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, capitalize(name))
}

/// True when `candidate` equals `operation_name(prefix, name)`, without
/// building the name.
pub fn is_operation_name(candidate: &str, prefix: &str, name: &str) -> bool {
    let Some(rest) = candidate.strip_prefix(prefix) else {
        return false;
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut rest_chars = rest.chars();
            first.to_uppercase().all(|upper| rest_chars.next() == Some(upper))
                && rest_chars.as_str() == chars.as_str()
        }
        None => rest.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalizes_first_char_only() {
        assert_eq!(capitalize("resolution"), "Resolution");
        assert_eq!(capitalize("xRange"), "XRange");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn test_builds_operation_names() {
        assert_eq!(operation_name("invoke", "startInteraction"), "invokeStartInteraction");
        assert_eq!(operation_name("get", "origin"), "getOrigin");
    }

    #[test]
    fn test_matches_operation_names() {
        assert!(is_operation_name("setRadius", "set", "radius"));
        assert!(is_operation_name("onÉlan", "on", "élan"));
        assert!(!is_operation_name("setradius", "set", "radius"));
        assert!(!is_operation_name("setRadiusX", "set", "radius"));
        assert!(!is_operation_name("getRadius", "set", "radius"));
        assert!(is_operation_name("set", "set", ""));
    }
}
