//! Small helpers over quick-xml names and attributes.

use quick_xml::events::BytesStart;

/// Extract the local name from a potentially namespaced XML name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Value of the first attribute whose local name matches.
///
/// With `prefixed` set, only namespaced attributes (`r:id`) match, which
/// keeps `id="256"` and `r:id="rId2"` apart on the same element.
pub fn attr_value(e: &BytesStart, local: &[u8], prefixed: bool) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        let key = attr.key.as_ref();
        let is_prefixed = key.contains(&b':');
        if local_name(key) == local && (is_prefixed || !prefixed) {
            Some(String::from_utf8_lossy(&attr.value).to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_attr_value_prefixed() {
        let e = BytesStart::from_content(r#"p:sldId id="256" r:id="rId2""#, 7);
        assert_eq!(attr_value(&e, b"id", true), Some("rId2".to_string()));
        assert_eq!(attr_value(&e, b"id", false), Some("256".to_string()));
        assert_eq!(attr_value(&e, b"embed", false), None);
    }
}
