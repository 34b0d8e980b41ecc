//! Integration tests for schema variant handling.

use abbyyocr::schema::{FR6V1_NAMESPACE, FR8V2_NAMESPACE};
use abbyyocr::{
    detect_variant_from_bytes, extract_text_from_bytes, frns, is_abbyy_bytes, parse_bytes,
    parse_bytes_with_options, Error, ParseOptions, Variant,
};

const BODY: &str = r#"<page width="1500" height="2174" resolution="300">
<block blockType="Text" l="262" t="220" r="1220" b="700"><text>
<par><line baseline="283" l="262" t="220" r="1220" b="294"><formatting lang="EnglishUnitedStates">MABEL  MEREDITH;</formatting></line></par>
<par><line baseline="420" l="262" t="380" r="1220" b="432"><formatting lang="EnglishUnitedStates">It was late in the autumn,</formatting></line>
<line baseline="488" l="262" t="448" r="1220" b="500"><formatting lang="EnglishUnitedStates">the vines yet kept their leaves.</formatting></line></par>
</text></block>
<block blockType="Table" l="262" t="800" r="1220" b="900">
<row><cell><text><par><line baseline="850" l="280" t="812" r="480" b="860"><formatting>Modern.</formatting></line></par></text></cell>
<cell><text><par><line baseline="850" l="600" t="810" r="860" b="858"><formatting>New Standard.</formatting></line></par></text></cell></row>
</block>
</page>
<page width="1500" height="2174" resolution="300">
<block blockType="Picture" l="144" t="62" r="1358" b="2114"/>
</page>"#;

fn export(namespace: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<document xmlns="{}" pagesCount="2" mainLanguage="EnglishUnitedStates" languages="EnglishUnitedStates,Latin">{}</document>"#,
        namespace, BODY
    )
}

#[test]
fn test_same_structure_in_both_variants() {
    let fr6 = parse_bytes(export(FR6V1_NAMESPACE).as_bytes()).unwrap();
    let fr8 = parse_bytes(export(FR8V2_NAMESPACE).as_bytes()).unwrap();

    assert_eq!(fr6.variant, Variant::FineReader6V1);
    assert_eq!(fr8.variant, Variant::FineReader8V2);

    // Everything but the variant tag is identical
    assert_eq!(fr6.pages, fr8.pages);
    assert_eq!(fr6.page_count, fr8.page_count);
    assert_eq!(fr6.language, fr8.language);
    assert_eq!(fr6.languages.as_deref(), Some("EnglishUnitedStates,Latin"));

    assert_eq!(
        extract_text_from_bytes(export(FR6V1_NAMESPACE).as_bytes()).unwrap(),
        extract_text_from_bytes(export(FR8V2_NAMESPACE).as_bytes()).unwrap()
    );
}

#[test]
fn test_extracted_text_layout() {
    let text = extract_text_from_bytes(export(FR8V2_NAMESPACE).as_bytes()).unwrap();
    assert_eq!(
        text,
        "MABEL  MEREDITH;\n\n\
         It was late in the autumn,\nthe vines yet kept their leaves.\n\n\
         Modern.  New Standard.\n"
    );
}

#[test]
fn test_foreign_namespace_is_unrecognized() {
    let source = export("http://www.abbyy.com/FineReader_xml/FineReader10-schema-v1.xml");
    let err = parse_bytes(source.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedSchema { namespace: Some(_) }));
}

#[test]
fn test_no_namespace_is_unrecognized() {
    let source = format!(r#"<document pagesCount="2">{}</document>"#, BODY);
    let err = parse_bytes(source.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedSchema { namespace: None }));
}

#[test]
fn test_lenient_mode_does_not_accept_unknown_schema() {
    let source = format!(r#"<document pagesCount="2">{}</document>"#, BODY);
    let result = parse_bytes_with_options(source.as_bytes(), ParseOptions::new().lenient());
    assert!(matches!(result, Err(Error::UnrecognizedSchema { .. })));
}

#[test]
fn test_garbage_is_xml_error() {
    assert!(matches!(parse_bytes(b"not xml at all"), Err(Error::Xml(_))));
    assert!(matches!(
        parse_bytes(export(FR6V1_NAMESPACE).replace("</document>", "").as_bytes()),
        Err(Error::Xml(_))
    ));
}

#[test]
fn test_mixed_namespace_elements_are_not_matched() {
    // A page in the other variant's namespace is not part of this document
    let source = format!(
        r#"<document xmlns="{}" xmlns:other="{}" pagesCount="1"><page width="10" height="10" resolution="300"/><other:page width="10" height="10" resolution="300"/></document>"#,
        FR6V1_NAMESPACE, FR8V2_NAMESPACE
    );
    let doc = parse_bytes(source.as_bytes()).unwrap();
    assert_eq!(doc.pages.len(), 1);
    assert!(doc.structural_mismatch().is_none());
}

#[test]
fn test_sniff_variant() {
    assert_eq!(
        detect_variant_from_bytes(export(FR6V1_NAMESPACE).as_bytes()).unwrap(),
        Variant::FineReader6V1
    );
    assert_eq!(
        detect_variant_from_bytes(export(FR8V2_NAMESPACE).as_bytes()).unwrap(),
        Variant::FineReader8V2
    );
    assert!(!is_abbyy_bytes(b"<alto/>"));
}

#[test]
fn test_frns_rendering() {
    assert_eq!(frns("par").to_string(), "fr6v1:par|fr8v2:par");
    assert_eq!(
        frns("text/par").to_string(),
        "fr6v1:text/fr6v1:par|fr8v2:text/fr8v2:par"
    );
}
