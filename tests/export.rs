use liedblatt::{
    AssetFetcher, CancellationToken, ContentNode, DirectoryFetcher, ExportError, Exporter,
    FetchError, MemoryFetcher, PageFormat, StyleConfig,
};
use std::cell::RefCell;
use std::io::Cursor;

const DEJAVU: &str = "/usr/share/fonts/truetype/dejavu";

// Tests embedding a real font are ignored by default; run them with
// `cargo test -- --ignored` on a system with DejaVu Sans installed.

/// DejaVu Sans served under the URLs the font resolver asks for
fn dejavu_fonts() -> Vec<(String, Vec<u8>)> {
    let regular = std::fs::read(format!("{DEJAVU}/DejaVuSans.ttf"))
        .unwrap_or_else(|e| panic!("DejaVu Sans must be installed in {DEJAVU}: {e}"));
    let mut fonts = vec![("/ttf/DejaVuSans-Regular.ttf".to_string(), regular)];
    if let Ok(bold) = std::fs::read(format!("{DEJAVU}/DejaVuSans-Bold.ttf")) {
        fonts.push(("/ttf/DejaVuSans-Bold.ttf".to_string(), bold));
    }
    fonts
}

fn fetcher() -> MemoryFetcher {
    let mut fetcher = MemoryFetcher::new();
    for (url, bytes) in dejavu_fonts() {
        fetcher.insert(url, bytes);
    }
    fetcher
}

fn style(format: PageFormat) -> StyleConfig {
    StyleConfig {
        font_family: "DejaVuSans".to_string(),
        page_format: format,
        ..Default::default()
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([200, 30, 30]),
    ));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageOutputFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn song(title: &str, strophes: usize) -> ContentNode {
    let mut children = vec![ContentNode::element("h2", vec![ContentNode::text(title)])];
    for i in 1..=strophes {
        children.push(ContentNode::element(
            "p",
            vec![
                ContentNode::element("strong", vec![ContentNode::text(format!("{i}."))]),
                ContentNode::text(" "),
                ContentNode::text(lipsum::lipsum_words(24)),
            ],
        ));
    }
    children.push(
        ContentNode::element("p", vec![ContentNode::text("Text und Melodie: überliefert")])
            .class("copyright"),
    );
    ContentNode::element("div", children)
}

fn document(songs: usize) -> ContentNode {
    let objects = (0..songs)
        .map(|i| song(&format!("Lied {}", i + 1), 4))
        .collect();
    ContentNode::element("body", objects)
}

fn count(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|window| *window == needle.as_bytes())
        .count()
}

#[test]
#[ignore = "needs DejaVu Sans in /usr/share/fonts/truetype/dejavu"]
fn paginated_export_writes_one_pdf_page_per_logical_page() {
    let fetcher = fetcher();
    let style = style(PageFormat::A5);
    let artifact = Exporter::new(&style, &fetcher)
        .export(&document(3), false)
        .unwrap();

    assert_eq!(artifact.file_name, "liedblatt_a5.pdf");
    assert!(artifact.bytes.starts_with(b"%PDF-"));
    assert!(artifact.page_count >= 2);
    assert_eq!(artifact.page_count % 2, 0);
    assert_eq!(artifact.sheet_count, artifact.page_count);
    assert_eq!(count(&artifact.bytes, "/Type /Pages"), 1);
    assert_eq!(
        count(&artifact.bytes, "/Type /Page") - 1,
        artifact.page_count
    );
    assert!(count(&artifact.bytes, "/FontFile2") >= 1);
}

#[test]
#[ignore = "needs DejaVu Sans in /usr/share/fonts/truetype/dejavu"]
fn brochure_export_imposes_pages_onto_sheets() {
    let fetcher = fetcher();
    let style = style(PageFormat::A5);
    let artifact = Exporter::new(&style, &fetcher)
        .export(&document(2), true)
        .unwrap();

    assert_eq!(artifact.file_name, "liedblatt_brochure_a5.pdf");
    assert_eq!(artifact.page_count % 2, 0);
    assert_eq!(artifact.sheet_count, artifact.page_count / 2);
    // every logical page becomes exactly one form
    assert_eq!(count(&artifact.bytes, "/Subtype /Form"), artifact.page_count);
}

#[test]
#[ignore = "needs DejaVu Sans in /usr/share/fonts/truetype/dejavu"]
fn dl_brochures_use_three_slot_sheets() {
    let fetcher = fetcher();
    let style = style(PageFormat::Dl);
    let content = ContentNode::element(
        "body",
        vec![ContentNode::element("p", vec![ContentNode::text("Eingang")])],
    );
    let artifact = Exporter::new(&style, &fetcher)
        .export(&content, true)
        .unwrap();

    // one page of content is padded to two, which share a single sheet
    assert_eq!(artifact.page_count, 2);
    assert_eq!(artifact.sheet_count, 1);
}

#[test]
#[ignore = "needs DejaVu Sans in /usr/share/fonts/truetype/dejavu"]
fn missing_images_are_skipped() {
    let fetcher = fetcher();
    let fetcher = fetcher.with("/img/notes.png", png(40, 20));
    let style = style(PageFormat::NarrowA4);
    let content = ContentNode::element(
        "body",
        vec![ContentNode::element(
            "div",
            vec![
                ContentNode::element("img", vec![]).attr("src", "/img/notes.png"),
                ContentNode::element("img", vec![]).attr("src", "/img/missing.png"),
                ContentNode::element("p", vec![ContentNode::text("Amen.")]),
            ],
        )],
    );
    let artifact = Exporter::new(&style, &fetcher)
        .export(&content, false)
        .unwrap();
    assert_eq!(count(&artifact.bytes, "/Subtype /Image"), 1);
}

#[test]
fn missing_regular_face_aborts_the_export() {
    let style = style(PageFormat::A5);
    let fetcher = MemoryFetcher::new();
    let result = Exporter::new(&style, &fetcher).export(&document(1), false);
    assert!(matches!(result, Err(ExportError::Font(_))));
}

#[test]
fn cancelled_exports_stop_before_fetching() {
    struct Recording(RefCell<Vec<String>>);
    impl AssetFetcher for Recording {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.0.borrow_mut().push(url.to_string());
            Err(FetchError::NotFound(url.to_string()))
        }
    }

    let style = StyleConfig::default();
    let fetcher = Recording(RefCell::new(Vec::new()));
    let token = CancellationToken::new();
    token.cancel();
    let result = Exporter::new(&style, &fetcher)
        .with_cancellation(&token)
        .export(&document(1), false);
    assert!(matches!(result, Err(ExportError::Cancelled)));
    assert!(fetcher.0.borrow().is_empty());
}

#[test]
#[ignore = "needs DejaVu Sans in /usr/share/fonts/truetype/dejavu"]
fn progress_ends_at_one_hundred() {
    let fetcher = fetcher();
    let reports = RefCell::new(Vec::new());
    let observer = |percent: u8, _phase: &str| reports.borrow_mut().push(percent);
    let style = style(PageFormat::A5);
    Exporter::new(&style, &fetcher)
        .with_progress(&observer)
        .export(&document(1), false)
        .unwrap();

    let reports = reports.into_inner();
    assert_eq!(reports.first(), Some(&0));
    assert_eq!(reports.last(), Some(&100));
    assert!(reports.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
#[ignore = "needs DejaVu Sans in /usr/share/fonts/truetype/dejavu"]
fn directory_fetcher_serves_assets_from_disk() {
    let fonts = dejavu_fonts();
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("ttf")).unwrap();
    for (url, bytes) in fonts {
        std::fs::write(dir.path().join(url.trim_start_matches('/')), bytes).unwrap();
    }

    let fetcher = DirectoryFetcher::new(dir.path());
    let style = style(PageFormat::NarrowA3);
    let artifact = Exporter::new(&style, &fetcher)
        .export(&document(1), true)
        .unwrap();
    assert_eq!(artifact.file_name, "liedblatt_brochure_narrow-a3.pdf");
    assert!(artifact.sheet_count >= 1);
}
