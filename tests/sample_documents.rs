//! Integration tests compiling the vetted sample documents end to end
//!
//! Every sample is compiled with a processor whose fallback date is pinned, so the
//! assertions hold regardless of the day the suite runs.

use pipp::pipp::document::{Block, SectionKind};
use pipp::pipp::error::PippError;
use pipp::pipp::processor::Processor;
use pipp::pipp::style::{ContentAlignment, NumerationPosition, NumerationType, StructureType};
use pipp::pipp::testing::{
    assert_outline, entry_texts, fixed_processor, line_texts, paragraph_texts, warning_messages,
    PippSources, SampleError,
};
use rstest::rstest;
use StructureType::*;

fn structure(structure: StructureType) -> SectionKind {
    SectionKind::Structure(structure)
}

#[test]
fn test_mla9_paper_outline_and_heading() {
    let compilation = PippSources::compile("010-mla9-paper.pipp", &fixed_processor()).unwrap();
    let document = &compilation.document;

    assert_eq!(document.style, "MLA9");
    assert_outline(
        document,
        &[SectionKind::Body, structure(Endnotes), structure(Bibliography)],
    );
    assert_eq!(
        document.heading,
        vec!["Jane Doe", "Prof. Ada Smith", "English 204", "3 June 2023"]
    );
    assert_eq!(document.metadata.date.as_deref(), Some("3 June 2023"));
}

#[test]
fn test_mla9_paper_body_text() {
    let compilation = PippSources::compile("010-mla9-paper.pipp", &fixed_processor()).unwrap();
    let body = compilation.document.body().expect("a body section");

    let paragraphs = paragraph_texts(body);
    assert_eq!(paragraphs.len(), 2);
    assert!(
        paragraphs[0].starts_with("Poe's raven repeats a single word (Poe 12). The bird never explains itself.1"),
        "unexpected first paragraph: {}",
        paragraphs[0]
    );
    assert!(body
        .blocks
        .iter()
        .any(|block| matches!(block, Block::Heading { text, level: 1 } if text == "Context")));
}

#[test]
fn test_mla9_paper_endnotes() {
    let compilation = PippSources::compile("010-mla9-paper.pipp", &fixed_processor()).unwrap();
    let notes = compilation.document.section(Endnotes).expect("an endnotes section");

    assert_eq!(notes.heading.as_deref(), Some("Notes"));
    match notes.blocks.as_slice() {
        [Block::Note { number, paragraph }] => {
            assert_eq!(*number, 1);
            assert_eq!(paragraph.text(), "Compare the parrot in Austen's letters.");
        }
        other => panic!("expected a single note, got {:?}", other),
    }
}

#[test]
fn test_mla9_bibliography_is_sorted_by_surname() {
    let compilation = PippSources::compile("010-mla9-paper.pipp", &fixed_processor()).unwrap();
    let document = &compilation.document;
    let bibliography = document.section(Bibliography).expect("a bibliography section");

    assert_eq!(bibliography.heading.as_deref(), Some("Works Cited"));
    let ids: Vec<_> = bibliography
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Entry(entry) => entry.id.as_deref(),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec!["austen", "yesterday", "tetris", "poe", "style"]);

    let entries = entry_texts(document);
    assert!(entries[0].starts_with("Austen, Jane."), "{}", entries[0]);
    assert!(entries[3].starts_with("Poe, Edgar Allan."), "{}", entries[3]);
}

#[test]
fn test_every_mla9_source_is_cited() {
    let compilation = PippSources::compile("010-mla9-paper.pipp", &fixed_processor()).unwrap();
    let messages = warning_messages(&compilation.warnings);
    assert!(
        messages.iter().all(|message| !message.contains("is never cited")),
        "unexpected warnings: {:?}",
        messages
    );
}

#[test]
fn test_pipp_seminar_outline() {
    let compilation = PippSources::compile("020-pipp-seminar.pipp", &fixed_processor()).unwrap();
    let document = &compilation.document;

    assert_eq!(document.style, "Pipp");
    assert_outline(
        document,
        &[
            structure(TitlePage),
            structure(Abstract),
            structure(TableOfContents),
            SectionKind::Body,
            structure(Endnotes),
            structure(Bibliography),
            structure(AcademicIntegrity),
        ],
    );
    assert!(document.heading.is_empty());
}

#[test]
fn test_pipp_seminar_style_overrides() {
    let compilation = PippSources::compile("020-pipp-seminar.pipp", &fixed_processor()).unwrap();
    let document = &compilation.document;

    assert_eq!(document.font.name, "Helvetica");
    assert_eq!(document.font.size, 12);
    assert_eq!(document.font.colour.to_string(), "#202020");
    assert_eq!(document.page.line_spacing, 1.5);
    assert!((document.page.margin - 70.866).abs() < 0.01);
    assert_eq!(document.numeration.body, NumerationType::Arabic);
    assert_eq!(document.numeration.position, NumerationPosition::Bottom);
    assert_eq!(document.numeration.skipped_pages, vec![1, 3, 4]);
}

#[test]
fn test_pipp_seminar_title_page_and_contents() {
    let compilation = PippSources::compile("020-pipp-seminar.pipp", &fixed_processor()).unwrap();
    let document = &compilation.document;

    let title_page = line_texts(document.section(TitlePage).expect("a title page"));
    assert_eq!(&title_page[..3], ["Indentation as Syntax", "Jane Doe", "John Roe"]);
    assert!(title_page.contains(&"Supervisor: Prof. Dr. Ada Smith".to_string()));
    assert_eq!(title_page.last().map(String::as_str), Some("January 15, 2024"));

    let contents = line_texts(document.section(TableOfContents).expect("a table of contents"));
    assert_eq!(
        contents,
        vec![
            "Introduction",
            "Endnotes",
            "Bibliography",
            "Declaration of Academic Integrity"
        ]
    );
}

#[test]
fn test_pipp_seminar_keeps_lowercase_text() {
    let compilation = PippSources::compile("020-pipp-seminar.pipp", &fixed_processor()).unwrap();
    let document = &compilation.document;

    let abstract_section = document.section(Abstract).expect("an abstract");
    assert_eq!(paragraph_texts(abstract_section), vec!["this paper studies off-side rules"]);

    let body = document.body().expect("a body section");
    let paragraphs = paragraph_texts(body);
    assert!(paragraphs[0].starts_with("Python made indentation popular1"));
    assert!(paragraphs[0].contains("[Landin, p. 157]"), "{}", paragraphs[0]);
}

#[test]
fn test_mla9_book_front_matter() {
    let compilation = PippSources::compile("030-mla9-book.pipp", &fixed_processor()).unwrap();
    let document = &compilation.document;

    assert_outline(
        document,
        &[
            structure(TitlePage),
            structure(Preface),
            structure(Acknowledgements),
            structure(TableOfContents),
            SectionKind::Body,
            structure(Appendix),
        ],
    );
    assert_eq!(document.metadata.date, None);
    assert_eq!(
        document.section(Preface).map(|section| section.numeration),
        Some(NumerationType::Roman)
    );
    assert_eq!(
        document.body().map(|section| section.numeration),
        Some(NumerationType::Arabic)
    );

    let contents = line_texts(document.section(TableOfContents).expect("a table of contents"));
    assert_eq!(contents, vec!["Crows", "Ravens", "Appendix"]);
}

#[test]
fn test_parse_errors_are_all_reported() {
    match PippSources::compile("040-parse-errors.pipp", &fixed_processor()) {
        Err(SampleError::Compile(PippError::Parse(errors))) => {
            let lines: Vec<usize> = errors.iter().map(|error| error.position.line).collect();
            assert_eq!(lines, vec![2, 3, 5]);
        }
        other => panic!("expected parse errors, got {:?}", other.map(|c| c.document.outline())),
    }
}

#[test]
fn test_endnotes_before_required_section_is_fatal() {
    let result = PippSources::compile("050-structure-order.pipp", &fixed_processor());
    match result {
        Err(SampleError::Compile(error @ PippError::StructureOrder { .. })) => {
            assert_eq!(
                error.to_string(),
                "structure error: the preface section must come before the endnotes section"
            );
        }
        other => panic!("expected a structure error, got {:?}", other.map(|c| c.document.outline())),
    }
}

#[test]
fn test_layout_instructions_stay_in_place() {
    let compilation = PippSources::compile("060-layout.pipp", &fixed_processor()).unwrap();
    let body = compilation.document.body().expect("a body section");

    match body.blocks.as_slice() {
        [Block::Header { lines }, Block::Paragraph(paragraph), Block::Image(crow), Block::BlankPage, Block::Image(raven)] =>
        {
            assert_eq!(
                lines,
                &[
                    "TU Darmstadt",
                    "Ornithology",
                    "Jane Doe",
                    "Field Notes on Corvids",
                    "WS 2023"
                ]
            );
            assert_eq!(paragraph.text(), "Crows gather at dusk.");
            assert_eq!(crow.id, "crow.png");
            assert_eq!(crow.scale, Some(40));
            assert_eq!(crow.alignment, ContentAlignment::Centre);
            assert_eq!(raven.alignment, ContentAlignment::Right);
            assert!((raven.width.unwrap_or_default() - 226.77).abs() < 0.01);
            assert_eq!(raven.height, Some(144.0));
        }
        other => panic!("unexpected body blocks: {:?}", other),
    }
}

#[rstest]
#[case("pipp", "Pipp", Some(TitlePage))]
#[case("MLA9", "MLA9", None)]
#[case(" mla9 ", "MLA9", None)]
fn test_default_style_applies_to_unstyled_documents(
    #[case] default_style: &str,
    #[case] expected: &str,
    #[case] first: Option<StructureType>,
) {
    let processor = Processor::new(default_style);
    let compilation = PippSources::compile("000-minimal.pipp", &processor).unwrap();
    let document = &compilation.document;
    assert_eq!(document.style, expected);
    assert_eq!(document.sections[0].structure(), first);
}

#[test]
fn test_unknown_default_style_is_fatal() {
    let processor = Processor::new("Chicago");
    let result = PippSources::compile("000-minimal.pipp", &processor);
    assert!(matches!(
        result,
        Err(SampleError::Compile(PippError::UnknownStyle { position: None, .. }))
    ));
}

#[test]
fn test_document_model_serializes() {
    let compilation = PippSources::compile("000-minimal.pipp", &fixed_processor()).unwrap();
    let json = compilation.document.to_json(false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["style"], "Pipp");
    assert_eq!(value["metadata"]["title"], "On Ravens");
    assert_eq!(value["metadata"]["date"], "June 3, 2023");
}
