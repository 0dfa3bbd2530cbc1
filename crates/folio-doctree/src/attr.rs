/*
 * attr.rs
 * Copyright (c) 2025 Posit, PBC
 */

use hashlink::LinkedHashMap;

pub type Attr = (String, Vec<String>, LinkedHashMap<String, String>);

pub fn empty_attr() -> Attr {
    (String::new(), vec![], LinkedHashMap::new())
}

pub fn is_empty_attr(attr: &Attr) -> bool {
    attr.0.is_empty() && attr.1.is_empty() && attr.2.is_empty()
}

/// Check whether an attr carries a class.
pub fn has_class(attr: &Attr, class: &str) -> bool {
    attr.1.iter().any(|c| c == class)
}

/// Look up a key-value attribute.
pub fn attr_value<'a>(attr: &'a Attr, key: &str) -> Option<&'a str> {
    attr.2.get(key).map(|v| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_attr() {
        let attr = empty_attr();
        assert!(is_empty_attr(&attr));
        assert!(!has_class(&attr, "appendix"));
        assert!(attr_value(&attr, "max-chars").is_none());
    }

    #[test]
    fn test_has_class() {
        let mut attr = empty_attr();
        attr.1.push("appendix".to_string());
        assert!(has_class(&attr, "appendix"));
        assert!(!has_class(&attr, "abstract"));
        assert!(!is_empty_attr(&attr));
    }

    #[test]
    fn test_attr_value() {
        let mut attr = empty_attr();
        attr.2.insert("max-chars".to_string(), "140".to_string());
        assert_eq!(attr_value(&attr, "max-chars"), Some("140"));
        assert_eq!(attr_value(&attr, "max-words"), None);
    }
}
