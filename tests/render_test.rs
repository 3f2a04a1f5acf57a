// Render tests
//
// Viewport sizing is pure and always tested. Rasterization through pdfium
// runs only when PDFIUM_DYNAMIC_LIB_PATH points at the shared library.
// Test PDFs are generated with lopdf to avoid fixture files.

use pdf_snapshot::render::units::Dpi;
use pdf_snapshot::render::viewport::page_viewport;

// ---- Viewport ----

/// At low DPI one point is one pixel.
#[test]
fn test_viewport_low_dpi_is_native() {
    let viewport = page_viewport(612.0, 792.0, Dpi::Low);
    assert_eq!((viewport.width, viewport.height), (612, 792));
    assert_eq!(viewport.scale, 1.0);
}

/// High DPI goes through whole millimeters: A4 (595.28 x 841.89 pt) is 210 x 297 mm.
#[test]
fn test_viewport_high_dpi_rounds_through_millimeters() {
    let viewport = page_viewport(595.28, 841.89, Dpi::High);
    // 210mm @144dpi = 1191px, 297mm @144dpi = 1684px; the smaller ratio wins.
    let expected_scale = (1191.0 / 595.28f64).min(1684.0 / 841.89);
    assert!((viewport.scale - expected_scale).abs() < 1e-9);
    assert_eq!(viewport.width, (595.28 * expected_scale).round() as u32);
    assert_eq!(viewport.height, (841.89 * expected_scale).round() as u32);
    assert!(viewport.width <= 1191 && viewport.height <= 1684);
}

/// Aspect ratio is preserved at custom resolutions.
#[test]
fn test_viewport_custom_dpi_preserves_aspect() {
    let viewport = page_viewport(612.0, 792.0, Dpi::Custom(300));
    let ratio = viewport.width as f64 / viewport.height as f64;
    assert!((ratio - 612.0 / 792.0).abs() < 0.01);
    assert!(viewport.width > 2500 && viewport.width < 2560);
}

/// Degenerate pages produce an empty viewport rather than NaN sizes.
#[test]
fn test_viewport_degenerate_page() {
    let viewport = page_viewport(0.0, 792.0, Dpi::High);
    assert_eq!((viewport.width, viewport.height), (0, 0));
}

// ---- pdfium ----

#[cfg(feature = "pdfium")]
mod pdfium {
    use std::fs;
    use std::panic::AssertUnwindSafe;
    use std::path::Path;

    use lopdf::{Document, Object, Stream, dictionary};
    use pdf_snapshot::render::pdfium::{PdfiumRasterizer, RasterizerConfig};
    use pdf_snapshot::snapshot::assert::test_snapshot_name;
    use pdf_snapshot::{
        CompareOptions, Dpi, PageRasterizer, SNAPSHOTS_DIR_NAME, SnapshotError,
        compare_pdf_to_snapshot,
    };

    const SQUARE_LEFT: &[u8] = b"0 0 0 rg 10 10 50 50 re f";
    const SQUARE_RIGHT: &[u8] = b"0 0 0 rg 100 10 50 50 re f";

    /// Check whether pdfium is available via environment variable.
    fn pdfium_available() -> bool {
        std::env::var("PDFIUM_DYNAMIC_LIB_PATH").is_ok()
    }

    /// Build a PDF with one page per `(width, height)` entry, in points.
    /// Each page carries a filled square so renders are not blank.
    fn create_pdf(page_sizes: &[(i64, i64)]) -> Vec<u8> {
        create_pdf_with_content(page_sizes, SQUARE_LEFT)
    }

    /// Like [`create_pdf`], with `content` as every page's content stream.
    fn create_pdf_with_content(page_sizes: &[(i64, i64)], content: &[u8]) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        for &(width, height) in page_sizes {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
            let page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(height),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! {},
            };
            kids.push(doc.add_object(page).into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(count),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("failed to serialize test PDF");
        bytes
    }

    fn rasterizer() -> PdfiumRasterizer {
        PdfiumRasterizer::new(&RasterizerConfig::default()).expect("pdfium should load")
    }

    /// Letter size at 72 DPI renders to 612x792 pixels.
    #[test]
    fn test_rasterize_letter_at_low_dpi() {
        if !pdfium_available() {
            eprintln!("SKIPPING: PDFIUM_DYNAMIC_LIB_PATH not set");
            return;
        }
        let pages = rasterizer()
            .rasterize(&create_pdf(&[(612, 792)]), Dpi::Low)
            .expect("rasterize should succeed");

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].dimensions(), (612, 792));
    }

    /// Pages come back in PDF order with their own sizes.
    #[test]
    fn test_rasterize_preserves_page_order() {
        if !pdfium_available() {
            eprintln!("SKIPPING: PDFIUM_DYNAMIC_LIB_PATH not set");
            return;
        }
        let pdf = create_pdf(&[(200, 100), (100, 300), (150, 150)]);
        let pages = rasterizer().rasterize(&pdf, Dpi::Low).unwrap();

        let sizes: Vec<(u32, u32)> = pages.iter().map(|p| p.dimensions()).collect();
        assert_eq!(sizes, vec![(200, 100), (100, 300), (150, 150)]);
    }

    /// High DPI roughly doubles the native size.
    #[test]
    fn test_rasterize_high_dpi() {
        if !pdfium_available() {
            eprintln!("SKIPPING: PDFIUM_DYNAMIC_LIB_PATH not set");
            return;
        }
        let pdf = create_pdf(&[(612, 792)]);
        let page = &rasterizer().rasterize(&pdf, Dpi::High).unwrap()[0];

        assert!((page.width() as i64 - 1224).abs() <= 2, "width {}", page.width());
        assert!((page.height() as i64 - 1584).abs() <= 2, "height {}", page.height());
    }

    /// Garbage bytes are reported as malformed input.
    #[test]
    fn test_rasterize_malformed_pdf() {
        if !pdfium_available() {
            eprintln!("SKIPPING: PDFIUM_DYNAMIC_LIB_PATH not set");
            return;
        }
        let result = rasterizer().rasterize(b"definitely not a pdf", Dpi::Low);
        assert!(matches!(result, Err(SnapshotError::MalformedInput(_))));
    }

    /// A configured library path that does not exist is a configuration error.
    #[test]
    fn test_missing_library_path() {
        let config = RasterizerConfig {
            library_path: Some("/nonexistent/pdfium/lib".into()),
        };
        let result = PdfiumRasterizer::new(&config);
        assert!(matches!(result, Err(SnapshotError::ConfigError(_))));
    }

    // ---- compare_pdf_to_snapshot ----

    /// Create, match and mismatch through the pdfium-backed entry point.
    #[test]
    fn test_compare_pdf_to_snapshot_lifecycle() {
        if !pdfium_available() {
            eprintln!("SKIPPING: PDFIUM_DYNAMIC_LIB_PATH not set");
            return;
        }
        let dir = tempfile::tempdir().expect("create temp dir");
        let snapshots = dir.path().join(SNAPSHOTS_DIR_NAME);
        let options = CompareOptions::new().dpi(Dpi::Low);
        let original = create_pdf(&[(200, 100)]);
        let changed = create_pdf_with_content(&[(200, 100)], SQUARE_RIGHT);

        assert!(compare_pdf_to_snapshot(original.clone(), dir.path(), "doc", &options).unwrap());
        assert!(snapshots.join("doc.png").exists());

        assert!(compare_pdf_to_snapshot(original, dir.path(), "doc", &options).unwrap());
        assert!(!snapshots.join("doc.new.png").exists());

        assert!(!compare_pdf_to_snapshot(changed, dir.path(), "doc", &options).unwrap());
        assert!(snapshots.join("doc.new.png").exists());
        assert!(snapshots.join("doc.diff.png").exists());
    }

    /// Per-page snapshots from a PDF file on disk.
    #[test]
    fn test_compare_pdf_to_snapshot_per_page_from_path() {
        if !pdfium_available() {
            eprintln!("SKIPPING: PDFIUM_DYNAMIC_LIB_PATH not set");
            return;
        }
        let dir = tempfile::tempdir().expect("create temp dir");
        let pdf_path = dir.path().join("two-page.pdf");
        fs::write(&pdf_path, create_pdf(&[(200, 100), (100, 200)])).unwrap();
        let options = CompareOptions::new().dpi(Dpi::Low).combine_pages(false);

        assert!(compare_pdf_to_snapshot(pdf_path.as_path(), dir.path(), "two", &options).unwrap());
        assert!(compare_pdf_to_snapshot(pdf_path.as_path(), dir.path(), "two", &options).unwrap());

        let snapshots = dir.path().join(SNAPSHOTS_DIR_NAME);
        assert!(snapshots.join("two.page-1.png").exists());
        assert!(snapshots.join("two.page-2.png").exists());
    }

    // ---- assert_pdf_snapshot! ----

    /// The macro stores snapshots next to this file, named after the test.
    #[test]
    fn test_assert_pdf_snapshot_macro() {
        if !pdfium_available() {
            eprintln!("SKIPPING: PDFIUM_DYNAMIC_LIB_PATH not set");
            return;
        }
        let Some(name) = test_snapshot_name() else {
            eprintln!("SKIPPING: test thread is unnamed");
            return;
        };
        let snapshots = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join(SNAPSHOTS_DIR_NAME);
        let files = ["png", "new.png", "diff.png"].map(|ext| snapshots.join(format!("{name}.{ext}")));
        let cleanup = || {
            for file in &files {
                let _ = fs::remove_file(file);
            }
            let _ = fs::remove_dir(&snapshots);
        };
        cleanup();

        let options = CompareOptions::new().dpi(Dpi::Low);
        let original = create_pdf(&[(120, 80)]);
        let changed = create_pdf_with_content(&[(120, 80)], SQUARE_RIGHT);

        pdf_snapshot::assert_pdf_snapshot!(original.clone(), &options);
        assert!(files[0].exists(), "baseline should be created");
        pdf_snapshot::assert_pdf_snapshot!(original, &options);

        let mismatch = std::panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_snapshot::assert_pdf_snapshot!(changed, &options);
        }));
        let new_written = files[1].exists();
        cleanup();

        assert!(mismatch.is_err(), "a changed PDF should fail the assertion");
        assert!(new_written);
    }
}
