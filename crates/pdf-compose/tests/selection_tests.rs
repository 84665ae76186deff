use pdf_compose::*;

fn image(name: &str) -> InputFile {
    InputFile::new(name, MediaKind::Image, vec![1u8, 2, 3])
}

fn pdf(name: &str) -> InputFile {
    InputFile::new(name, MediaKind::Pdf, b"%PDF-1.7".to_vec())
}

fn names(files: &[InputFile]) -> Vec<String> {
    files.iter().map(|f| f.name.clone()).collect()
}

#[test]
fn test_ingest_within_capacity() {
    let mut selection = Selection::new(3, PdfQueue::Shared);

    let outcome = selection.ingest(vec![image("a.png")]).unwrap();
    assert_eq!(
        outcome,
        IngestOutcome::Queued {
            accepted: 1,
            dropped: 0
        }
    );

    selection
        .ingest(vec![image("b.png"), image("c.png")])
        .unwrap();
    assert_eq!(names(selection.pending()), ["a.png", "b.png", "c.png"]);
    assert_eq!(selection.mode(), CapacityMode::Direct);
}

#[test]
fn test_running_total_truncated() {
    let mut selection = Selection::new(2, PdfQueue::Shared);
    selection.ingest(vec![image("a.png")]).unwrap();

    let outcome = selection
        .ingest(vec![image("b.png"), image("c.png")])
        .unwrap();
    assert_eq!(
        outcome,
        IngestOutcome::Queued {
            accepted: 1,
            dropped: 1
        }
    );
    assert_eq!(names(selection.pending()), ["a.png", "b.png"]);
}

#[test]
fn test_oversized_batch_enters_picker() {
    let mut selection = Selection::new(2, PdfQueue::Shared);
    selection.ingest(vec![image("keep.png")]).unwrap();

    let outcome = selection
        .ingest(vec![image("a.png"), image("b.png"), pdf("c.pdf")])
        .unwrap();

    assert_eq!(outcome, IngestOutcome::PickerRequired { candidates: 3 });
    assert_eq!(selection.mode(), CapacityMode::PickerRequired);
    assert!(selection.pending().is_empty());
    assert_eq!(names(selection.candidates()), ["a.png", "b.png", "c.pdf"]);
}

#[test]
fn test_ingest_rejected_while_picking() {
    let mut selection = Selection::new(1, PdfQueue::Shared);
    selection
        .ingest(vec![image("a.png"), image("b.png")])
        .unwrap();

    let result = selection.ingest(vec![image("c.png")]);
    assert_eq!(result, Err(SelectionError::PickerActive));
    assert_eq!(selection.candidates().len(), 2);
}

#[test]
fn test_toggle_pick() {
    let mut selection = Selection::new(2, PdfQueue::Shared);
    selection
        .ingest(vec![image("a.png"), image("b.png"), image("c.png")])
        .unwrap();

    assert_eq!(selection.toggle_candidate(2), Ok(ToggleOutcome::Added));
    assert_eq!(selection.toggle_candidate(0), Ok(ToggleOutcome::Added));
    assert_eq!(selection.toggle_candidate(1), Ok(ToggleOutcome::AtCapacity));
    assert_eq!(names(selection.pending()), ["c.png", "a.png"]);

    assert_eq!(
        selection.toggle_pick(&image("c.png")),
        Ok(ToggleOutcome::Removed)
    );
    assert!(!selection.is_picked(&image("c.png")));
    assert!(selection.is_picked(&image("a.png")));

    assert_eq!(
        selection.toggle_candidate(9),
        Err(SelectionError::NoSuchCandidate(9))
    );
}

#[test]
fn test_toggle_outside_picker() {
    let mut selection = Selection::new(2, PdfQueue::Shared);
    assert_eq!(
        selection.toggle_pick(&image("a.png")),
        Err(SelectionError::NotPicking)
    );
}

#[test]
fn test_confirm_requires_full_pick() {
    let mut selection = Selection::new(2, PdfQueue::Shared);
    selection
        .ingest(vec![image("a.png"), image("b.png"), image("c.png")])
        .unwrap();
    selection.toggle_candidate(1).unwrap();

    assert_eq!(
        selection.confirm_pick(),
        Err(SelectionError::IncompletePick {
            selected: 1,
            capacity: 2
        })
    );
    assert_eq!(selection.mode(), CapacityMode::PickerRequired);
    assert_eq!(selection.candidates().len(), 3);

    selection.toggle_candidate(2).unwrap();
    selection.confirm_pick().unwrap();

    assert_eq!(selection.mode(), CapacityMode::Direct);
    assert!(selection.candidates().is_empty());
    assert_eq!(names(selection.pending()), ["b.png", "c.png"]);
}

#[test]
fn test_confirm_outside_picker() {
    let mut selection = Selection::new(2, PdfQueue::Shared);
    assert_eq!(selection.confirm_pick(), Err(SelectionError::NotPicking));
    assert_eq!(selection.cancel_pick(), Err(SelectionError::NotPicking));
}

#[test]
fn test_cancel_pick_empties_selection() {
    let mut selection = Selection::new(1, PdfQueue::Shared);
    selection
        .ingest(vec![image("a.png"), image("b.png")])
        .unwrap();
    selection.toggle_candidate(0).unwrap();

    selection.cancel_pick().unwrap();
    assert_eq!(selection.mode(), CapacityMode::Direct);
    assert!(selection.pending().is_empty());
    assert!(selection.candidates().is_empty());

    // Direct ingestion works again
    selection.ingest(vec![image("c.png")]).unwrap();
    assert_eq!(names(selection.pending()), ["c.png"]);
}

#[test]
fn test_clear_then_ingest_has_no_residue() {
    let mut selection = Selection::new(3, PdfQueue::Shared);
    selection
        .ingest(vec![image("old1.png"), image("old2.png")])
        .unwrap();
    selection.clear_all();
    assert!(selection.is_empty());

    selection
        .ingest(vec![image("new1.png"), image("new2.png")])
        .unwrap();
    assert_eq!(names(selection.pending()), ["new1.png", "new2.png"]);
}

#[test]
fn test_separate_pdf_queue() {
    let mut selection = Selection::new(2, PdfQueue::Separate);
    let outcome = selection
        .ingest(vec![
            pdf("one.pdf"),
            image("a.png"),
            pdf("two.pdf"),
            pdf("three.pdf"),
            image("b.png"),
        ])
        .unwrap();

    assert_eq!(
        outcome,
        IngestOutcome::Queued {
            accepted: 2,
            dropped: 0
        }
    );
    assert_eq!(names(selection.pending()), ["a.png", "b.png"]);
    assert_eq!(
        names(selection.attachments()),
        ["one.pdf", "two.pdf", "three.pdf"]
    );
    assert_eq!(
        names(&selection.layout_inputs()),
        ["a.png", "b.png", "one.pdf", "two.pdf", "three.pdf"]
    );

    selection.clear_all();
    assert!(selection.attachments().is_empty());
    assert!(selection.is_empty());
}

#[test]
fn test_for_layout_uses_capacity() {
    let selection = Selection::for_layout(&LayoutConfig::columns());
    assert_eq!(selection.capacity(), 3);
    assert_eq!(selection.pdf_queue(), PdfQueue::Shared);
}
