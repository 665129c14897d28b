//! End-to-end pipeline tests with stub capabilities.

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use segmenter::prelude::*;

/// Embedder returning the same vector for every text: no distances exceed
/// the breakpoint threshold, so nothing gets split further.
struct UniformEmbedder;

#[async_trait]
impl Embedder for UniformEmbedder {
    async fn batch_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(vec![vec![1.0, 0.0, 0.0]; texts.len()])
    }
}

struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn batch_embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(SegmenterError::Embedding("service down".to_string()))
    }
}

struct FixedCaptioner;

#[async_trait]
impl Captioner for FixedCaptioner {
    async fn caption(&self, _image: &ImageRef) -> Result<String> {
        Ok("a bar chart of enrollment by term".to_string())
    }
}

const TABLE_HTML: &str = "<table>\
    <tr><th>Course</th><th>Credits</th><th>Term</th><th>Room</th></tr>\
    <tr><td>Math</td><td>3</td><td>Fall</td><td>101</td></tr>\
    <tr><td>Physics</td><td>4</td><td>Winter</td><td>202</td></tr>\
    </table>";

fn title(text: &str) -> Element {
    Element::new(ElementKind::Title, text)
}

fn narrative(text: &str) -> Element {
    Element::new(ElementKind::NarrativeText, text)
}

fn list_item(text: &str) -> Element {
    Element::new(ElementKind::ListItem, text)
}

fn table() -> Element {
    Element::new(ElementKind::Table, "Course Credits Term Room").with_metadata(ElementMetadata {
        html: Some(TABLE_HTML.to_string()),
        ..Default::default()
    })
}

fn pipeline() -> Pipeline {
    Pipeline::new(PipelineConfig::default(), Arc::new(UniformEmbedder), None).unwrap()
}

#[tokio::test]
async fn end_to_end_chunk_order() {
    let elements = vec![
        title("Introduction"),
        narrative("Apples are tasty."),
        list_item("first topic item"),
        list_item("second topic item"),
        table(),
    ];

    let (chunks, _stats) = pipeline().run(elements).await.unwrap();

    assert_eq!(chunks.len(), 5);
    assert_eq!(chunks[0].text, "Introduction");
    assert_eq!(chunks[1].text, "## Introduction\nApples are tasty.");
    assert_eq!(chunks[2].text, "- first topic item\n- second topic item");
    assert_eq!(chunks[3].kind, ElementKind::Table);
    assert!(chunks[4].text.starts_with("*Introduction*"));
    assert!(chunks[4].text.contains("The following Course: Math has "));
}

#[tokio::test]
async fn windows_attached_at_boundaries() {
    let elements = vec![
        title("Introduction"),
        narrative("Apples are tasty."),
        narrative("Pears are fine too."),
    ];

    let (chunks, _stats) = pipeline().run(elements).await.unwrap();

    let first = chunks.first().unwrap();
    let last = chunks.last().unwrap();

    // First chunk's window has no "previous" segment, last has no "next".
    let first_window = first.metadata.window.as_deref().unwrap();
    let last_window = last.metadata.window.as_deref().unwrap();
    assert!(first_window.starts_with(&first.text));
    assert!(last_window.ends_with(&last.text));
    assert!(first_window.len() > first.text.len());
}

#[tokio::test]
async fn small_chunks_filtered() {
    let elements = vec![
        narrative("This sentence clearly survives the filter."),
        narrative("tiny"),
    ];

    let (chunks, _stats) = pipeline().run(elements).await.unwrap();

    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].text.contains("survives"));
}

#[tokio::test]
async fn hyperlinks_rewritten_into_text() {
    let mut element = narrative("Consult the course syllabus before week one begins.");
    element.metadata.links = vec![Link {
        start_index: 19,
        end_index: 27,
        text: "syllabus".to_string(),
        url: "https://example.edu/syllabus".to_string(),
    }];

    let (chunks, _stats) = pipeline().run(vec![element]).await.unwrap();

    assert!(chunks[0]
        .text
        .contains("[syllabus](https://example.edu/syllabus)"));
}

#[tokio::test]
async fn embedding_failure_names_the_stage() {
    let pipeline = Pipeline::new(
        PipelineConfig::default(),
        Arc::new(FailingEmbedder),
        None,
    )
    .unwrap();

    let elements = vec![narrative(
        "One sentence about apples. Another sentence about rockets.",
    )];

    let err = pipeline.run(elements).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::SemanticSplit));
}

#[tokio::test]
async fn failed_document_yields_no_chunks() {
    let pipeline = Pipeline::new(
        PipelineConfig::default(),
        Arc::new(FailingEmbedder),
        None,
    )
    .unwrap();

    let elements = vec![
        narrative("Splittable prose. With two sentences."),
        narrative("More splittable prose. With two more."),
    ];

    // The run returns an error, never a partially segmented sequence.
    assert!(pipeline.run(elements).await.is_err());
}

#[tokio::test]
async fn images_captioned_when_captioner_configured() {
    let pipeline = Pipeline::new(
        PipelineConfig::default(),
        Arc::new(UniformEmbedder),
        Some(Arc::new(FixedCaptioner)),
    )
    .unwrap();

    let image = Element::new(ElementKind::Image, "enrollment chart").with_metadata(
        ElementMetadata {
            image: Some(ImageRef {
                data: "aGVsbG8=".to_string(),
                mime_type: "image/png".to_string(),
            }),
            ..Default::default()
        },
    );

    let (chunks, stats) = pipeline.run(vec![image]).await.unwrap();

    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].text.contains("a bar chart of enrollment by term"));
    assert_eq!(
        chunks[0].metadata.auto_caption.as_deref(),
        Some("enrollment chart")
    );
    assert!(stats.caption_ms.is_some());
}

#[tokio::test]
async fn table_description_stays_one_generated_chunk() {
    // The table description is produced before the splitter runs, and the
    // splitter passes it through as GENERATED rather than re-splitting.
    let elements = vec![title("Schedule"), table()];

    let (chunks, _stats) = pipeline().run(elements).await.unwrap();

    let description = chunks
        .iter()
        .find(|c| c.text.starts_with("*Schedule*"))
        .unwrap();
    assert_eq!(description.metadata.provenance, Provenance::Generated);
}

#[tokio::test]
async fn page_breaks_never_reach_output() {
    let elements = vec![
        narrative("Prose before the page boundary."),
        Element::new(ElementKind::PageBreak, ""),
        narrative("Prose after the page boundary."),
    ];

    let (chunks, _stats) = pipeline().run(elements).await.unwrap();
    assert!(chunks.iter().all(|c| c.kind != ElementKind::PageBreak));
    assert_eq!(chunks.len(), 2);
}
