use xmltree::{Element, XMLNode};

/// Describe cómo localizar un elemento por nombre local y espacio de nombres.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ElementSpec<'a> {
    pub(crate) local_name: &'a str,
    pub(crate) namespace: Option<&'a str>,
}

impl<'a> ElementSpec<'a> {
    pub(crate) const fn new(local_name: &'a str, namespace: &'a str) -> Self {
        Self {
            local_name,
            namespace: Some(namespace),
        }
    }
}

/// Comprueba si un elemento coincide con la especificación de búsqueda.
pub(crate) fn element_matches(element: &Element, spec: &ElementSpec<'_>) -> bool {
    element.name == spec.local_name && namespace_matches(element, spec.namespace)
}

fn namespace_matches(element: &Element, namespace: Option<&str>) -> bool {
    match (namespace, element.namespace.as_deref()) {
        (Some(expected), Some(actual)) => expected == actual,
        (Some(_), None) => false,
        (None, _) => true,
    }
}

/// Primer descendiente (incluida la raíz) que coincide, en orden de documento.
pub(crate) fn find_element<'a>(
    element: &'a Element,
    spec: &ElementSpec<'_>,
) -> Option<&'a Element> {
    if element_matches(element, spec) {
        return Some(element);
    }
    for node in &element.children {
        if let XMLNode::Element(child) = node
            && let Some(found) = find_element(child, spec)
        {
            return Some(found);
        }
    }
    None
}

/// Hijos directos que coinciden con la especificación.
pub(crate) fn child_elements<'a, 'b>(
    element: &'a Element,
    spec: &'b ElementSpec<'b>,
) -> impl Iterator<Item = &'a Element> {
    element.children.iter().filter_map(move |node| match node {
        XMLNode::Element(child) if element_matches(child, spec) => Some(child),
        _ => None,
    })
}

/// Quita el prefijo de espacio de nombres (`w:edit` → `edit`).
pub(crate) fn strip_prefix(key: &str) -> &str {
    key.rsplit_once(':').map_or(key, |(_, local)| local)
}

pub(crate) fn get_attr_value(element: &Element, key: &str) -> Option<String> {
    element
        .attributes
        .iter()
        .find(|(attr_key, _)| strip_prefix(attr_key) == key)
        .map(|(_, value)| value.to_string())
}
