//! Encode markup, wrap it in an ODT document, and decode it again.

use ywodt::odf::core::Attributes;
use ywodt::odf::odt::is_balanced;
use ywodt::{DecoderOptions, EncoderOptions, Error, OdtSource, StructuralEvent, decode_source, encode};

fn content_xml(options: &EncoderOptions, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
  xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0"
  xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"
  xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0"
  xmlns:dc="http://purl.org/dc/elements/1.1/">
<office:automatic-styles>{}</office:automatic-styles>
<office:body><office:text>
{}
</office:text></office:body>
</office:document-content>"#,
        options.language_styles(),
        body
    )
}

fn styles_xml(options: &EncoderOptions) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
  xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0"
  xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0">
<office:styles>
<style:default-style style:family="paragraph"><style:text-properties fo:language="en" fo:country="GB"/></style:default-style>
{}
<style:style style:name="Quotations" style:family="paragraph"/>
</office:styles>
</office:document-styles>"#,
        options.character_styles()
    )
}

fn round_trip(markup: &str, options: &EncoderOptions) -> Vec<StructuralEvent> {
    let source = OdtSource::from_parts(
        content_xml(options, &encode(markup, options)),
        Some(styles_xml(options)),
        None,
    );
    decode_source(&source, &DecoderOptions::new().with_preamble(false)).unwrap()
}

fn open(name: &str) -> StructuralEvent {
    StructuralEvent::open(name)
}

fn close(name: &str) -> StructuralEvent {
    StructuralEvent::close(name)
}

fn text(content: &str) -> StructuralEvent {
    StructuralEvent::text(content)
}

#[test]
fn bold_run_across_paragraphs() {
    let events = round_trip("plain [b]bold\ncontinues[/b] plain", &EncoderOptions::default());
    assert_eq!(
        events,
        vec![
            open("p"),
            text("plain "),
            open("strong"),
            text("bold"),
            close("strong"),
            close("p"),
            open("p"),
            open("strong"),
            text("continues"),
            close("strong"),
            text(" plain"),
            close("p"),
        ]
    );
}

#[test]
fn nested_language_and_emphasis() {
    let options = EncoderOptions::new().with_languages(["fr"]);
    let events = round_trip("Il dit [lang=fr][i]merci[/i][/lang=fr].", &options);
    assert_eq!(
        events,
        vec![
            open("p"),
            text("Il dit "),
            open("lang_fr"),
            open("em"),
            text("merci"),
            close("em"),
            close("lang_fr"),
            text("."),
            close("p"),
        ]
    );
}

#[test]
fn comment_and_escaped_text() {
    let options = EncoderOptions::new().with_author("Jane Roe");
    let events = round_trip("Fish & chips /* verify the menu */ today", &options);
    assert_eq!(
        events,
        vec![
            open("p"),
            text("Fish & chips "),
            StructuralEvent::comment("verify the menu"),
            text(" today"),
            close("p"),
        ]
    );
}

#[test]
fn quotation_becomes_blockquote() {
    let events = round_trip("She wrote:\n> [i]Come home.[/i]", &EncoderOptions::default());
    let class: Attributes = [("class", "quotations")].into_iter().collect();
    assert_eq!(events[3], StructuralEvent::open_with("blockquote", class));
    assert_eq!(events[4], open("em"));
    assert_eq!(events.last(), Some(&close("blockquote")));
}

#[test]
fn decoded_output_is_balanced() {
    let options = EncoderOptions::new().with_languages(["de-CH", "fr"]).with_author("A");
    let markup = "[b]one [i]two\n\nthree[/b] [lang=de-CH]vier[/i]\n> f[lang=fr]ü/*nf*/[/lang=de-CH] x";
    let events = round_trip(markup, &options);
    assert!(is_balanced(&events));
}

#[test]
fn preamble_uses_default_language() {
    let options = EncoderOptions::default();
    let source = OdtSource::from_parts(
        content_xml(&options, &encode("x", &options)),
        Some(styles_xml(&options)),
        None,
    );
    let events = decode_source(&source, &DecoderOptions::default()).unwrap();
    let body: Attributes = [("language", "en"), ("country", "GB")].into_iter().collect();
    assert_eq!(events[0], StructuralEvent::open_with("body", body));
    assert_eq!(events[1], close("body"));
    assert_eq!(events[2], open("p"));
}

#[cfg(feature = "odf")]
mod container {
    use super::*;
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};

    fn write_odt(path: &std::path::Path, parts: &[(&str, String)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (name, body) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    const META: &str = r#"<office:document-meta><office:meta>
<dc:title>Harbour Lights</dc:title><dc:creator>Jane Roe</dc:creator><dc:description>A short story.</dc:description>
</office:meta></office:document-meta>"#;

    #[test]
    fn decode_file_reads_package() {
        let options = EncoderOptions::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.odt");
        write_odt(
            &path,
            &[
                ("mimetype", "application/vnd.oasis.opendocument.text".to_string()),
                ("content.xml", content_xml(&options, &encode("[i]Fog.[/i]", &options))),
                ("styles.xml", styles_xml(&options)),
                ("meta.xml", META.to_string()),
            ],
        );

        let events = ywodt::decode_file(&path).unwrap();
        assert_eq!(
            &events[2..],
            &[
                open("title"),
                text("Harbour Lights"),
                close("title"),
                open("author"),
                text("Jane Roe"),
                close("author"),
                open("description"),
                text("A short story."),
                close("description"),
                open("p"),
                open("em"),
                text("Fog."),
                close("em"),
                close("p"),
            ]
        );
    }

    #[test]
    fn decode_file_without_styles_reports_path() {
        let options = EncoderOptions::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.odt");
        write_odt(&path, &[("content.xml", content_xml(&options, "<text:p>x</text:p>"))]);

        match ywodt::decode_file(&path) {
            Err(Error::UnreadableSource { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected UnreadableSource, got {:?}", other.map(|e| e.len())),
        }
    }
}
