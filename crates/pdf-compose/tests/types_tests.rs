use pdf_compose::*;

#[test]
fn test_orientation_apply() {
    assert_eq!(Orientation::Landscape.apply(148.0, 210.0), (210.0, 148.0));
    assert_eq!(Orientation::Landscape.apply(210.0, 148.0), (210.0, 148.0));
    assert_eq!(Orientation::Portrait.apply(210.0, 148.0), (148.0, 210.0));
    assert_eq!(Orientation::default(), Orientation::Landscape);
}

#[test]
fn test_media_kind_from_media_type() {
    assert_eq!(
        MediaKind::from_media_type("application/pdf"),
        Some(MediaKind::Pdf)
    );
    assert_eq!(
        MediaKind::from_media_type("image/png"),
        Some(MediaKind::Image)
    );
    assert_eq!(
        MediaKind::from_media_type(" IMAGE/JPEG "),
        Some(MediaKind::Image)
    );
    assert_eq!(MediaKind::from_media_type("text/plain"), None);
}

#[test]
fn test_media_type_for_extension() {
    assert_eq!(
        MediaKind::media_type_for_extension("PDF"),
        Some("application/pdf")
    );
    assert_eq!(MediaKind::media_type_for_extension("jpeg"), Some("image/jpeg"));
    assert_eq!(MediaKind::media_type_for_extension("docx"), None);
}

#[test]
fn test_unsupported_files_are_dropped() {
    assert!(InputFile::from_media_type("notes.txt", vec![1u8], "text/plain").is_none());

    let file = InputFile::from_media_type("scan.pdf", vec![1u8], "application/pdf").unwrap();
    assert!(file.is_pdf());
    assert_eq!(file.name, "scan.pdf");

    // Clones share the payload
    let copy = file.clone();
    assert!(std::sync::Arc::ptr_eq(&file.bytes, &copy.bytes));
}

#[test]
fn test_error_messages() {
    let err = ComposeError::from(SelectionError::IncompletePick {
        selected: 1,
        capacity: 2,
    });
    assert!(err.to_string().contains("exactly 2"));
    assert_eq!(ComposeError::EmptySelection.to_string(), "No files selected");
}
