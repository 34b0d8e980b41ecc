//! FineReader schema variant resolution and namespace-agnostic queries.
//!
//! ABBYY FineReader exports come in two XML schema variants that share element
//! names but live in different namespaces. Everything above this module asks
//! for elements with schema-agnostic paths (`"text/par"`) and lets
//! [`CompoundQuery`] expand them to the equivalent path under either
//! namespace.

use std::fmt;

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Namespace of FineReader 6 exports, schema v1.
pub const FR6V1_NAMESPACE: &str = "http://www.abbyy.com/FineReader_xml/FineReader6-schema-v1.xml";

/// Namespace of FineReader 8 exports, schema v2.
pub const FR8V2_NAMESPACE: &str = "http://www.abbyy.com/FineReader_xml/FineReader8-schema-v2.xml";

/// How many leading bytes [`detect_variant_from_bytes`] looks at.
const SNIFF_LEN: usize = 4096;

/// A supported FineReader schema variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// FineReader 6, schema v1
    #[serde(rename = "fr6v1")]
    FineReader6V1,
    /// FineReader 8, schema v2
    #[serde(rename = "fr8v2")]
    FineReader8V2,
}

impl Variant {
    /// All supported variants, in the order query branches are rendered.
    pub const ALL: [Variant; 2] = [Variant::FineReader6V1, Variant::FineReader8V2];

    /// Namespace URI of the variant.
    pub fn namespace(self) -> &'static str {
        match self {
            Variant::FineReader6V1 => FR6V1_NAMESPACE,
            Variant::FineReader8V2 => FR8V2_NAMESPACE,
        }
    }

    /// Conventional namespace prefix of the variant.
    pub fn prefix(self) -> &'static str {
        match self {
            Variant::FineReader6V1 => "fr6v1",
            Variant::FineReader8V2 => "fr8v2",
        }
    }

    /// Look up a variant by namespace URI.
    pub fn from_namespace(namespace: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.namespace() == namespace)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::FineReader6V1 => write!(f, "FineReader 6 (schema v1)"),
            Variant::FineReader8V2 => write!(f, "FineReader 8 (schema v2)"),
        }
    }
}

/// Resolve the schema variant of a parsed document from its root element.
///
/// # Returns
/// * `Ok(Variant)` if the root element is in a FineReader namespace
/// * `Err(Error::UnrecognizedSchema)` otherwise
pub fn resolve_variant(root: Node<'_, '_>) -> Result<Variant> {
    let namespace = root.tag_name().namespace();
    match namespace.and_then(Variant::from_namespace) {
        Some(variant) => {
            log::debug!("Resolved schema variant: {}", variant);
            Ok(variant)
        }
        None => Err(Error::UnrecognizedSchema {
            namespace: namespace.map(str::to_string),
        }),
    }
}

/// Guess the schema variant from the leading bytes of a document.
///
/// This is a cheap sniff on the namespace URI and does not validate the XML.
/// The leading bytes are decoded the same way the parser decodes a source.
pub fn detect_variant_from_bytes(data: &[u8]) -> Result<Variant> {
    let (encoding, bom_len) = crate::parser::detect_encoding(data)?;
    let head = &data[bom_len..data.len().min(SNIFF_LEN).max(bom_len)];
    // The cut may split a character
    let (head, _) = encoding.decode_without_bom_handling(head);
    Variant::ALL
        .into_iter()
        .find(|v| head.contains(v.namespace()))
        .ok_or(Error::UnrecognizedSchema { namespace: None })
}

/// Check if bytes look like a FineReader export.
pub fn is_abbyy_bytes(data: &[u8]) -> bool {
    detect_variant_from_bytes(data).is_ok()
}

/// Build a [`CompoundQuery`] from a schema-agnostic path.
///
/// `frns("text/par")` matches `text/par` under either namespace and renders
/// as `fr6v1:text/fr6v1:par|fr8v2:text/fr8v2:par`.
pub fn frns(path: &str) -> CompoundQuery {
    CompoundQuery::new(path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    name: String,
}

/// A relative path expanded into one branch per schema variant.
///
/// Steps are separated by `/` (child axis) or `//` (descendant axis). Every
/// step of a branch is bound to that branch's namespace, so a path can never
/// match an ancestor from one variant and a descendant from the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundQuery {
    steps: Vec<Step>,
}

impl CompoundQuery {
    /// Parse a schema-agnostic path such as `"text/par"` or `"line//formatting"`.
    pub fn new(path: &str) -> Self {
        let mut steps = Vec::new();
        let mut axis = Axis::Child;
        for segment in path.split('/') {
            let segment = segment.trim();
            if segment.is_empty() {
                axis = Axis::Descendant;
                continue;
            }
            steps.push(Step {
                axis,
                name: segment.to_string(),
            });
            axis = Axis::Child;
        }
        Self { steps }
    }

    /// Render the branch of this query for a single variant.
    pub fn branch(&self, variant: Variant) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            match (i, step.axis) {
                (0, Axis::Descendant) => out.push_str(".//"),
                (0, Axis::Child) => {}
                (_, Axis::Child) => out.push('/'),
                (_, Axis::Descendant) => out.push_str("//"),
            }
            out.push_str(variant.prefix());
            out.push(':');
            out.push_str(&step.name);
        }
        out
    }

    /// Evaluate the query against `context` for every variant.
    ///
    /// Results are in document order without duplicates.
    pub fn select<'a, 'input>(&self, context: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        let mut nodes: Vec<_> = Variant::ALL
            .into_iter()
            .flat_map(|v| self.select_in(v, context))
            .collect();
        nodes.sort_by_key(|n| n.id().get());
        nodes.dedup_by_key(|n| n.id().get());
        nodes
    }

    /// Evaluate only the branch belonging to `variant`.
    pub fn select_in<'a, 'input>(
        &self,
        variant: Variant,
        context: Node<'a, 'input>,
    ) -> Vec<Node<'a, 'input>> {
        let namespace = variant.namespace();
        let mut current = vec![context];

        for step in &self.steps {
            let matches = |n: &Node<'a, 'input>| {
                n.is_element()
                    && n.tag_name().name() == step.name
                    && n.tag_name().namespace() == Some(namespace)
            };

            let mut next: Vec<Node<'a, 'input>> = Vec::new();
            for node in &current {
                match step.axis {
                    Axis::Child => next.extend(node.children().filter(|n| matches(n))),
                    Axis::Descendant => {
                        next.extend(node.descendants().skip(1).filter(|n| matches(n)))
                    }
                }
            }
            // Descendant steps from nested contexts can reach the same node twice.
            if step.axis == Axis::Descendant {
                next.sort_by_key(|n| n.id().get());
                next.dedup_by_key(|n| n.id().get());
            }
            current = next;
        }

        current
    }
}

impl fmt::Display for CompoundQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let branches: Vec<String> = Variant::ALL.iter().map(|v| self.branch(*v)).collect();
        write!(f, "{}", branches.join("|"))
    }
}

/// Query surface bound to the resolved variant of one document.
///
/// The parser goes through this type for every structural lookup; the
/// variant tag is consulted nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaAdapter {
    variant: Variant,
}

impl SchemaAdapter {
    /// Resolve the variant from a root element and bind an adapter to it.
    pub fn for_root(root: Node<'_, '_>) -> Result<Self> {
        Ok(Self {
            variant: resolve_variant(root)?,
        })
    }

    /// Bind an adapter to a known variant.
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    /// The resolved variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Select all nodes matching `path` relative to `context`.
    pub fn select<'a, 'input>(
        &self,
        context: Node<'a, 'input>,
        path: &CompoundQuery,
    ) -> Vec<Node<'a, 'input>> {
        path.select_in(self.variant, context)
    }

    /// Select the first node matching `path` relative to `context`.
    pub fn first<'a, 'input>(
        &self,
        context: Node<'a, 'input>,
        path: &CompoundQuery,
    ) -> Option<Node<'a, 'input>> {
        self.select(context, path).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xml(namespace: &str, body: &str) -> String {
        format!(r#"<document xmlns="{}">{}</document>"#, namespace, body)
    }

    #[test]
    fn test_frns_rendering() {
        assert_eq!(frns("par").to_string(), "fr6v1:par|fr8v2:par");
        assert_eq!(
            frns("text/par").to_string(),
            "fr6v1:text/fr6v1:par|fr8v2:text/fr8v2:par"
        );
        assert_eq!(
            frns("line//formatting").to_string(),
            "fr6v1:line//fr6v1:formatting|fr8v2:line//fr8v2:formatting"
        );
        assert_eq!(frns("//par").to_string(), ".//fr6v1:par|.//fr8v2:par");
    }

    #[test]
    fn test_resolve_variant() {
        for variant in Variant::ALL {
            let source = xml(variant.namespace(), "");
            let doc = roxmltree::Document::parse(&source).unwrap();
            assert_eq!(resolve_variant(doc.root_element()).unwrap(), variant);
        }
    }

    #[test]
    fn test_resolve_variant_unknown_namespace() {
        let source = xml("urn:not-abbyy", "");
        let doc = roxmltree::Document::parse(&source).unwrap();
        let err = resolve_variant(doc.root_element()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnrecognizedSchema { namespace: Some(ref ns) } if ns == "urn:not-abbyy"
        ));

        let doc = roxmltree::Document::parse("<document/>").unwrap();
        assert!(matches!(
            resolve_variant(doc.root_element()),
            Err(Error::UnrecognizedSchema { namespace: None })
        ));
    }

    #[test]
    fn test_select_matches_either_variant() {
        let body = "<page><block><text><par/><par/></text></block></page>";
        for variant in Variant::ALL {
            let source = xml(variant.namespace(), body);
            let doc = roxmltree::Document::parse(&source).unwrap();
            let pages = frns("page").select(doc.root_element());
            assert_eq!(pages.len(), 1);
            let pars = frns("block/text/par").select(pages[0]);
            assert_eq!(pars.len(), 2);
        }
    }

    #[test]
    fn test_select_rejects_mixed_namespaces() {
        // An fr8v2 paragraph nested in an fr6v1 text element matches neither branch.
        let source = format!(
            r#"<document xmlns="{}"><text><par xmlns="{}"/></text></document>"#,
            FR6V1_NAMESPACE, FR8V2_NAMESPACE
        );
        let doc = roxmltree::Document::parse(&source).unwrap();
        assert!(frns("text/par").select(doc.root_element()).is_empty());
        assert_eq!(frns("text").select(doc.root_element()).len(), 1);
    }

    #[test]
    fn test_select_ignores_foreign_namespace() {
        let source = r#"<document xmlns="urn:other"><page/></document>"#;
        let doc = roxmltree::Document::parse(source).unwrap();
        assert!(frns("page").select(doc.root_element()).is_empty());
    }

    #[test]
    fn test_descendant_axis() {
        let body = "<line><formatting>a</formatting><group><formatting>b</formatting></group></line>";
        let source = xml(FR8V2_NAMESPACE, body);
        let doc = roxmltree::Document::parse(&source).unwrap();
        let adapter = SchemaAdapter::for_root(doc.root_element()).unwrap();

        let runs = adapter.select(doc.root_element(), &frns("line//formatting"));
        let texts: Vec<_> = runs.iter().filter_map(|n| n.text()).collect();
        assert_eq!(texts, vec!["a", "b"]);

        let direct = adapter.select(doc.root_element(), &frns("line/formatting"));
        assert_eq!(direct.len(), 1);
    }

    #[test]
    fn test_adapter_first() {
        let source = xml(FR6V1_NAMESPACE, "<page n='1'/><page n='2'/>");
        let doc = roxmltree::Document::parse(&source).unwrap();
        let adapter = SchemaAdapter::for_root(doc.root_element()).unwrap();
        assert_eq!(adapter.variant(), Variant::FineReader6V1);
        let first = adapter.first(doc.root_element(), &frns("page")).unwrap();
        assert_eq!(first.attribute("n"), Some("1"));
        assert!(adapter.first(doc.root_element(), &frns("block")).is_none());

        // An adapter bound to the other variant sees nothing
        let other = SchemaAdapter::new(Variant::FineReader8V2);
        assert!(other.select(doc.root_element(), &frns("page")).is_empty());
        assert_eq!(frns("page").select(doc.root_element()).len(), 2);
    }

    #[test]
    fn test_detect_variant_from_bytes() {
        let source = xml(FR8V2_NAMESPACE, "");
        assert_eq!(
            detect_variant_from_bytes(source.as_bytes()).unwrap(),
            Variant::FineReader8V2
        );
        assert!(is_abbyy_bytes(source.as_bytes()));
        assert!(!is_abbyy_bytes(b"<html></html>"));
        assert!(!is_abbyy_bytes(b""));

        let mut utf16 = vec![0xFF, 0xFE];
        for unit in source.encode_utf16() {
            utf16.extend_from_slice(&unit.to_le_bytes());
        }
        assert!(is_abbyy_bytes(&utf16));
    }
}
