//! Processing engine
//!
//!     [Processor::process_ast] turns a parsed [Configuration] into a [DocumentModel]:
//!
//!         version gate -> validation -> style sheet -> skeleton and ordering checks
//!             -> body formatting -> bibliography -> sections
//!
//!     Fatal findings stop the run with a [PippError]. Everything else is pushed into the
//!     caller's [WarningQueue] and processing continues.
//!
//! Layout
//!
//!     sheet.rs: the effective style settings ([StyleSheet]).
//!     structure.rs: skeleton, body placement and ordering rules.
//!     content.rs: sentence, note and citation formatting.

mod content;
mod sheet;
mod structure;

pub use content::{ContentFormatter, FormattedContent};
pub use sheet::StyleSheet;
pub use structure::{check_structure_order, default_structure, outline, skeleton, ContentSummary};

use super::ast::{ConfigNode, Configuration, ContentKind, Scalar};
use super::bibliography::{sort_entries, Work};
use super::diagnostics::{Severity, Warning, WarningQueue};
use super::document::{
    BibliographyEntry, Block, DocumentModel, FontData, Metadata, NumerationSettings,
    PageGeometry, Section, SectionKind, Span,
};
use super::error::PippError;
use super::style::{StructureType, StyleGuide, StyleTable};
use super::token::Position;
use chrono::NaiveDate;
use std::collections::HashMap;

pub const SUPPORTED_VERSIONS: [&str; 1] = ["1.0"];
pub const COMPILER_VERSION: &str = "1.0";

/// Compatibility gate for a declared specification version
pub fn check_version(version: &str, position: Option<Position>) -> Result<(), PippError> {
    let version = version.trim();
    if SUPPORTED_VERSIONS.contains(&version) {
        Ok(())
    } else {
        Err(PippError::UnsupportedVersion {
            version: version.to_string(),
            supported: SUPPORTED_VERSIONS.join(", "),
            position,
        })
    }
}

pub struct Processor {
    styles: StyleTable,
    default_style: String,
    /// Date used for undated documents; the current day when unset
    today: Option<NaiveDate>,
}

impl Processor {
    pub fn new(default_style: impl Into<String>) -> Self {
        Self {
            styles: StyleTable::with_defaults(),
            default_style: default_style.into(),
            today: None,
        }
    }

    /// Fix the date used for documents without a publication date
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn default_style(&self) -> &str {
        &self.default_style
    }

    pub fn process_ast(
        &self,
        configuration: &Configuration,
        warnings: &mut WarningQueue,
    ) -> Result<DocumentModel, PippError> {
        if let Some(version) = &configuration.version {
            check_version(&version.value, Some(version.position))?;
        }

        configuration.validate_errors()?;
        configuration.validate_warnings(warnings);
        log::debug!("validation passed with {} warnings", warnings.len());

        let sheet = StyleSheet::resolve(
            configuration.style.as_ref(),
            &self.default_style,
            configuration.document_type()?,
            &self.styles,
        )?;

        let mut works = Vec::new();
        if let Some(bibliography) = &configuration.bibliography {
            for source in &bibliography.sources {
                works.push(Work::from_source(source)?);
            }
        }
        let by_id: HashMap<String, Work> = works
            .iter()
            .filter_map(|work| work.common().id.clone().map(|id| (id, work.clone())))
            .collect();

        let metadata = self.metadata(configuration, &sheet)?;
        let formatted = ContentFormatter::new(&sheet, &by_id, warnings)
            .with_header(header_lines(configuration, &metadata))
            .format(&configuration.body);

        let summary = ContentSummary {
            has_abstract: configuration.body.has_content(ContentKind::Abstract),
            has_preface: configuration.body.has_content(ContentKind::Preface),
            has_acknowledgements: configuration.body.has_content(ContentKind::Acknowledgements),
            has_appendix: configuration.body.has_content(ContentKind::Appendix),
            has_notes: !formatted.notes.is_empty(),
            has_sources: !works.is_empty(),
            has_assessors: !configuration.assessors.members.is_empty(),
        };
        let structures = skeleton(&sheet, &summary);
        check_structure_order(&structures, &sheet, summary.has_notes)?;
        structure_warnings(configuration, &structures, &summary, &sheet, warnings);
        citation_warnings(configuration, &formatted, warnings);

        let mut entries: Vec<_> = works
            .iter()
            .map(|work| work.to_bibliography(sheet.citation))
            .collect();
        sort_entries(&mut entries);

        let has_title_page = structures.contains(&StructureType::TitlePage);
        let heading = if !has_title_page && sheet.guide == StyleGuide::Mla9 {
            mla9_heading(configuration, &metadata)
        } else {
            Vec::new()
        };

        let mut builder = SectionBuilder {
            configuration,
            sheet: &sheet,
            metadata: &metadata,
            formatted,
            entries,
            has_title_page,
        };
        let mut sections: Vec<Section> = outline(&structures)
            .into_iter()
            .map(|kind| builder.section(kind))
            .collect();
        fill_table_of_contents(&mut sections);

        let document = DocumentModel {
            compiler_version: COMPILER_VERSION.to_string(),
            style: sheet.guide.name().to_string(),
            document_type: sheet.document_type,
            metadata,
            page: PageGeometry {
                format: sheet.page_format,
                margin: sheet.margin.to_points(),
                line_spacing: sheet.spacing,
            },
            font: FontData {
                name: sheet.font.clone(),
                size: sheet.font_size,
                colour: sheet.font_colour,
            },
            numeration: NumerationSettings {
                body: sheet.numeration,
                front_matter: sheet.front_matter_numeration,
                position: sheet.numeration_position,
                margin: sheet.numeration_margin.to_points(),
                skipped_pages: sheet.skipped_pages.clone(),
            },
            heading,
            sections,
        };
        log::debug!(
            "processed {} as {} ({} sections)",
            document.document_type,
            document.style,
            document.sections.len()
        );
        Ok(document)
    }

    fn metadata(&self, configuration: &Configuration, sheet: &StyleSheet) -> Result<Metadata, PippError> {
        let declared = configuration
            .publication
            .as_ref()
            .and_then(|publication| publication.date.as_ref());
        let date = match declared {
            Some(date) => date.parse_date()?,
            None => Some(
                self.today
                    .unwrap_or_else(|| chrono::Local::now().date_naive()),
            ),
        };
        Ok(Metadata {
            title: configuration.title.text(),
            authors: configuration
                .authors
                .members
                .iter()
                .map(|author| author.full_name())
                .collect(),
            assessors: configuration
                .assessors
                .members
                .iter()
                .map(|assessor| assessor.full_name())
                .collect(),
            date: date.map(|date| sheet.guide.date_to_string(date)),
        })
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new("pipp")
    }
}

/// Builds the sections of the outline in order
struct SectionBuilder<'a> {
    configuration: &'a Configuration,
    sheet: &'a StyleSheet,
    metadata: &'a Metadata,
    formatted: FormattedContent,
    entries: Vec<BibliographyEntry>,
    has_title_page: bool,
}

impl SectionBuilder<'_> {
    fn section(&mut self, kind: SectionKind) -> Section {
        let structure = match kind {
            SectionKind::Body => return self.body(),
            SectionKind::Structure(structure) => structure,
        };
        let numeration = self.sheet.numeration_for(Some(structure));
        let heading = match structure {
            StructureType::Endnotes => Some(self.sheet.guide.endnotes_title().to_string()),
            StructureType::Bibliography => {
                Some(self.sheet.citation.bibliography_title(self.entries.len()))
            }
            other => other.heading().map(str::to_string),
        };
        let mut section = Section::new(kind, heading, numeration);
        section.blocks = match structure {
            StructureType::TitlePage => self.title_page(),
            StructureType::Endnotes => std::mem::take(&mut self.formatted.notes),
            StructureType::Bibliography => std::mem::take(&mut self.entries)
                .into_iter()
                .map(Block::Entry)
                .collect(),
            StructureType::AcademicIntegrity => self.integrity(),
            other => self.formatted.sections.remove(&other).unwrap_or_default(),
        };
        section
    }

    fn body(&mut self) -> Section {
        let heading = (!self.has_title_page).then(|| self.metadata.title.clone());
        let mut section = Section::new(SectionKind::Body, heading, self.sheet.numeration);
        section.blocks = std::mem::take(&mut self.formatted.body);
        section
    }

    fn title_page(&self) -> Vec<Block> {
        let line = |text: String| Block::Line { text };
        let mut blocks = vec![line(self.metadata.title.clone())];
        blocks.extend(self.metadata.authors.iter().cloned().map(line));
        for assessor in &self.configuration.assessors.members {
            let name = assessor.full_name();
            blocks.push(line(match &assessor.role {
                Some(role) => format!("{}: {name}", role.value.trim()),
                None => name,
            }));
        }
        if let Some(publication) = &self.configuration.publication {
            let fields = [
                &publication.title,
                &publication.institution,
                &publication.chair,
                &publication.venue,
                &publication.semester,
            ];
            blocks.extend(
                fields
                    .into_iter()
                    .flatten()
                    .map(|scalar| line(scalar.value.trim().to_string())),
            );
        }
        blocks.extend(self.metadata.date.clone().map(line));
        blocks
    }

    fn integrity(&self) -> Vec<Block> {
        let authors = self.metadata.authors.join(" and ");
        let statement = self
            .sheet
            .guide
            .integrity_statement(&authors, self.sheet.document_type);
        let mut blocks = vec![Block::Paragraph(
            self.sheet.format_paragraph(&[vec![Span::regular(statement)]]),
        )];
        blocks.extend(self.metadata.date.clone().map(|text| Block::Line { text }));
        blocks.extend(
            self.metadata
                .authors
                .iter()
                .map(|author| Block::Line { text: author.clone() }),
        );
        blocks
    }
}

/// One line per heading that follows the table of contents, chapters included
fn fill_table_of_contents(sections: &mut [Section]) {
    let Some(at) = sections
        .iter()
        .position(|section| section.structure() == Some(StructureType::TableOfContents))
    else {
        return;
    };
    let mut lines = Vec::new();
    for section in &sections[at + 1..] {
        if let Some(heading) = &section.heading {
            lines.push(Block::Line { text: heading.clone() });
        }
        if section.kind == SectionKind::Body {
            lines.extend(section.blocks.iter().filter_map(|block| match block {
                Block::Heading { text, .. } => Some(Block::Line { text: text.clone() }),
                _ => None,
            }));
        }
    }
    sections[at].blocks = lines;
}

/// Lines of an in-text `header`: institution, chair, people, title, then date or semester
fn header_lines(configuration: &Configuration, metadata: &Metadata) -> Vec<String> {
    let text = |field: &Option<Scalar>| {
        field
            .as_ref()
            .map(|scalar| scalar.value.trim().to_string())
    };
    let publication = configuration.publication.as_ref();
    let mut lines = Vec::new();
    if let Some(publication) = publication {
        lines.extend(text(&publication.institution));
        lines.extend(text(&publication.chair));
    }
    lines.extend(metadata.authors.iter().cloned());
    lines.extend(metadata.assessors.iter().cloned());
    lines.push(metadata.title.clone());
    lines.extend(
        metadata
            .date
            .clone()
            .or_else(|| publication.and_then(|publication| text(&publication.semester))),
    );
    lines
}

/// First-page heading of a document without a title page
fn mla9_heading(configuration: &Configuration, metadata: &Metadata) -> Vec<String> {
    let mut lines = metadata.authors.clone();
    lines.extend(metadata.assessors.iter().cloned());
    if let Some(title) = configuration
        .publication
        .as_ref()
        .and_then(|publication| publication.title.as_ref())
    {
        lines.push(title.value.trim().to_string());
    }
    lines.extend(metadata.date.clone());
    lines
}

fn structure_warnings(
    configuration: &Configuration,
    structures: &[StructureType],
    summary: &ContentSummary,
    sheet: &StyleSheet,
    warnings: &mut WarningQueue,
) {
    let declared_at = configuration
        .style
        .as_ref()
        .and_then(|style| style.structure.as_ref())
        .map(|list| list.position);

    if sheet.structure.is_some() {
        for structure in structures {
            if !summary.has_content(*structure) {
                warnings.push(
                    Warning::missing_member(
                        Severity::Low,
                        format!("The {structure} section is declared but has no content"),
                    )
                    .at_opt(declared_at),
                );
            }
        }
    }

    let with_content = [
        StructureType::Abstract,
        StructureType::Preface,
        StructureType::Acknowledgements,
        StructureType::Appendix,
        StructureType::Endnotes,
    ];
    for structure in with_content {
        if summary.has_content(structure) && !structures.contains(&structure) {
            warnings.push(
                Warning::missing_member(
                    Severity::High,
                    format!("The document has {structure} content but no {structure} section"),
                )
                .at_opt(declared_at),
            );
        }
    }
    if summary.has_sources && !structures.contains(&StructureType::Bibliography) {
        warnings.push(
            Warning::missing_member(
                Severity::High,
                "The document lists sources but has no bibliography section",
            )
            .at_opt(configuration.bibliography.as_ref().and_then(|b| b.position)),
        );
    }
}

fn citation_warnings(
    configuration: &Configuration,
    formatted: &FormattedContent,
    warnings: &mut WarningQueue,
) {
    let Some(bibliography) = &configuration.bibliography else {
        return;
    };
    for source in &bibliography.sources {
        let cited = source.id().is_some_and(|id| formatted.cited.contains(id));
        if !cited {
            let label = source
                .title
                .as_ref()
                .map_or_else(|| source.kind.to_string(), |title| title.value.trim().to_string());
            warnings.push(
                Warning::self_check(
                    Severity::Low,
                    format!("The source \"{label}\" is never cited"),
                )
                .at(source.position),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipp::bridge::Bridge;

    fn process(source: &str, processor: &Processor) -> Result<(DocumentModel, WarningQueue), PippError> {
        let configuration = Bridge::new(source).parse()?;
        let mut warnings = WarningQueue::new();
        let document = processor.process_ast(&configuration, &mut warnings)?;
        Ok((document, warnings))
    }

    fn fixed() -> Processor {
        Processor::new("pipp").with_date(NaiveDate::from_ymd_opt(2023, 6, 3).unwrap())
    }

    #[test]
    fn test_version_gate() {
        assert!(check_version("1.0", None).is_ok());
        assert!(check_version(" 1.0 ", None).is_ok());
        match check_version("0.9", Some(Position::new(1, 9))) {
            Err(PippError::UnsupportedVersion { supported, .. }) => assert_eq!(supported, "1.0"),
            other => panic!("expected a version error, got {:?}", other),
        }
    }

    #[test]
    fn test_programmatic_tree_is_gated() {
        let mut configuration = Bridge::new("title \"T\"\nauthor \"A\"\n").parse().unwrap();
        configuration.version = Some(crate::pipp::ast::Scalar::new("3.1", Position::new(1, 9)));
        let mut warnings = WarningQueue::new();
        assert!(matches!(
            fixed().process_ast(&configuration, &mut warnings),
            Err(PippError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_mla9_paper_without_title_page() {
        let source = "title \"On Ravens\"\nauthor \"Jane Doe\"\nstyle \"MLA9\"\n\
                      publication\n    title \"English 101\"\n    date \"03/06/2023\"\n\
                      paragraph \"ravens are clever\"\n";
        let (document, _) = process(source, &fixed()).unwrap();
        assert_eq!(document.style, "MLA9");
        assert_eq!(document.heading, vec!["Jane Doe", "English 101", "3 June 2023"]);
        let body = document.body().unwrap();
        assert_eq!(body.heading.as_deref(), Some("On Ravens"));
        assert_eq!(document.outline(), vec![SectionKind::Body]);
    }

    #[test]
    fn test_pipp_paper_sections() {
        let source = "title \"Report\"\nauthor \"Jane Doe\"\nassessor \"Prof. Smith\"\n\
                      paragraph \"Text\" note \"A note\"\n";
        let (document, warnings) = process(source, &fixed()).unwrap();
        assert_eq!(
            document.outline(),
            vec![
                SectionKind::Structure(StructureType::TitlePage),
                SectionKind::Body,
                SectionKind::Structure(StructureType::Endnotes),
                SectionKind::Structure(StructureType::AcademicIntegrity),
            ]
        );
        let endnotes = document.section(StructureType::Endnotes).unwrap();
        assert_eq!(endnotes.heading.as_deref(), Some("Endnotes"));
        assert_eq!(endnotes.blocks.len(), 1);
        assert_eq!(document.metadata.date.as_deref(), Some("June 3, 2023"));
        assert!(warnings.iter().all(|w| w.severity < Severity::High));
    }

    #[test]
    fn test_bibliography_sorted_and_uncited_warned() {
        let source = "title \"T\"\nauthor \"A\"\nparagraph \"See\" citation \"poe\"\n\
                      bibliography\n\
                      \tpoem\n\t\tid \"poe\"\n\t\tauthor \"Edgar Allan Poe\"\n\t\ttitle \"The Raven\"\n\
                      \tbook\n\t\tid \"austen\"\n\t\tauthor \"Jane Austen\"\n\t\ttitle \"Emma\"\n\t\tpublisher \"John Murray\"\n";
        let (document, warnings) = process(source, &fixed()).unwrap();
        let bibliography = document.section(StructureType::Bibliography).unwrap();
        let ids: Vec<_> = bibliography
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Entry(entry) => entry.id.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["austen", "poe"]);
        assert!(warnings
            .iter()
            .any(|w| w.message == "The source \"Emma\" is never cited"));
    }

    #[test]
    fn test_structure_order_is_fatal() {
        let source = "title \"T\"\nauthor \"A\"\nstyle\n    of \"MLA9\"\n    structure \"endnotes\", \"preface\"\n\
                      preface \"Thanks\"\nparagraph \"Body\" note \"n\"\n";
        assert!(matches!(
            process(source, &fixed()),
            Err(PippError::StructureOrder {
                section: StructureType::Preface,
                anchor: StructureType::Endnotes
            })
        ));
    }

    #[test]
    fn test_unknown_style_is_fatal() {
        let result = process("title \"T\"\nauthor \"A\"\nstyle \"Chicago\"\n", &fixed());
        assert!(matches!(result, Err(PippError::UnknownStyle { .. })));
    }

    #[test]
    fn test_unknown_default_style_is_fatal() {
        let result = process("title \"T\"\nauthor \"A\"\n", &Processor::new("apa"));
        assert!(matches!(result, Err(PippError::UnknownStyle { position: None, .. })));
    }

    #[test]
    fn test_validation_error_stops_processing() {
        let result = process("title \"T\"\nauthor \"A\"\nparagraph \"x\" citation \"nobody\"\n", &fixed());
        assert!(matches!(result, Err(PippError::Config(_))));
    }

    #[test]
    fn test_header_block_in_body() {
        let source = "title \"On Ravens\"\nauthor \"Jane Doe\"\nassessor \"Prof. Smith\"\n\
                      publication\n    institution \"TU Darmstadt\"\n    semester \"WS 2023\"\n    date \"None\"\n\
                      header\nparagraph \"Text\"\nblank\nimage \"raven.png\", \"50%\"\n";
        let (document, _) = process(source, &fixed()).unwrap();
        let body = document.body().unwrap();
        assert_eq!(
            body.blocks[0],
            Block::Header {
                lines: vec![
                    "TU Darmstadt".to_string(),
                    "Jane Doe".to_string(),
                    "Prof. Smith".to_string(),
                    "On Ravens".to_string(),
                    "WS 2023".to_string(),
                ]
            }
        );
        assert!(matches!(body.blocks[1], Block::Paragraph(_)));
        assert_eq!(body.blocks[2], Block::BlankPage);
        assert!(matches!(&body.blocks[3], Block::Image(image) if image.scale == Some(50)));
    }

    #[test]
    fn test_invalid_image_is_fatal() {
        let result = process("title \"T\"\nauthor \"A\"\nimage \"raven.png\", \"huge\"\n", &fixed());
        assert!(matches!(result, Err(PippError::Config(_))));
    }
}
