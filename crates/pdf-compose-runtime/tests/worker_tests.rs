use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use pdf_compose::{MediaKind, MemoryCounterStore, NoRasterizer};
use pdf_compose_runtime::*;
use std::io::Cursor;
use std::sync::Arc;
use tokio::sync::mpsc;

fn image(name: &str) -> InputFile {
    let bitmap = DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 4, Rgb([10, 120, 10])));
    let mut bytes = Vec::new();
    bitmap
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    InputFile::new(name, MediaKind::Image, bytes)
}

/// Run a session over `commands` and collect every update it sent
async fn run_session(commands: Vec<SessionCommand>) -> Vec<SessionUpdate> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();

    for cmd in commands {
        command_tx.send(cmd).unwrap();
    }
    command_tx.send(SessionCommand::Shutdown).unwrap();

    worker_task(
        command_rx,
        update_tx,
        LayoutConfig::strip(),
        MemoryCounterStore::new(),
        Arc::new(NoRasterizer),
        GenerateOptions::default(),
    )
    .await;

    let mut updates = Vec::new();
    while let Ok(update) = update_rx.try_recv() {
        updates.push(update);
    }
    updates
}

#[tokio::test]
async fn test_ingest_and_generate() {
    let updates = run_session(vec![
        SessionCommand::Ingest {
            files: vec![image("a.png"), image("b.png")],
        },
        SessionCommand::Generate { output_dir: None },
    ])
    .await;

    assert_eq!(updates.len(), 3);
    match &updates[0] {
        SessionUpdate::SelectionChanged { snapshot } => {
            assert_eq!(snapshot.pending, ["a.png", "b.png"]);
            assert!(snapshot.is_full());
        }
        other => panic!("Expected SelectionChanged, got {:?}", other),
    }
    match &updates[1] {
        SessionUpdate::Generated { pdf, path } => {
            assert_eq!(pdf.file_name, "finaloutput.001.pdf");
            assert_eq!(pdf.placements.len(), 2);
            assert!(path.is_none());
        }
        other => panic!("Expected Generated, got {:?}", other),
    }
    match &updates[2] {
        SessionUpdate::SelectionChanged { snapshot } => assert!(snapshot.pending.is_empty()),
        other => panic!("Expected SelectionChanged, got {:?}", other),
    }
}

#[tokio::test]
async fn test_picker_flow() {
    let updates = run_session(vec![
        SessionCommand::Ingest {
            files: vec![image("a.png"), image("b.png"), image("c.png")],
        },
        SessionCommand::ConfirmPick,
        SessionCommand::TogglePick { index: 2 },
        SessionCommand::TogglePick { index: 0 },
        SessionCommand::ConfirmPick,
    ])
    .await;

    match &updates[0] {
        SessionUpdate::PickerRequired {
            candidates,
            capacity,
        } => {
            assert_eq!(candidates, &["a.png", "b.png", "c.png"]);
            assert_eq!(*capacity, 2);
        }
        other => panic!("Expected PickerRequired, got {:?}", other),
    }
    assert!(matches!(updates[1], SessionUpdate::Error { .. }));

    match updates.last() {
        Some(SessionUpdate::SelectionChanged { snapshot }) => {
            assert_eq!(snapshot.mode, CapacityMode::Direct);
            assert_eq!(snapshot.pending, ["c.png", "a.png"]);
        }
        other => panic!("Expected SelectionChanged, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_empty_reports_error() {
    let updates = run_session(vec![SessionCommand::Generate { output_dir: None }]).await;

    match updates.as_slice() {
        [SessionUpdate::Error { message }] => assert_eq!(message, "No files selected"),
        other => panic!("Expected a single error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_set_layout_resets_selection() {
    let mut invalid = LayoutConfig::columns();
    invalid.capacity = 7;

    let updates = run_session(vec![
        SessionCommand::Ingest {
            files: vec![image("a.png")],
        },
        SessionCommand::SetLayout { config: invalid },
        SessionCommand::SetLayout {
            config: LayoutConfig::columns(),
        },
    ])
    .await;

    assert_eq!(updates.len(), 3);
    assert!(matches!(updates[1], SessionUpdate::Error { .. }));
    match &updates[2] {
        SessionUpdate::SelectionChanged { snapshot } => {
            assert_eq!(snapshot.layout, "columns");
            assert_eq!(snapshot.capacity, 3);
            assert!(snapshot.pending.is_empty());
        }
        other => panic!("Expected SelectionChanged, got {:?}", other),
    }
}

#[tokio::test]
async fn test_remove_and_clear() {
    let updates = run_session(vec![
        SessionCommand::Ingest {
            files: vec![image("a.png"), image("b.png")],
        },
        SessionCommand::Remove { index: 0 },
        SessionCommand::Remove { index: 9 },
        SessionCommand::ClearAll,
    ])
    .await;

    // Every remove answers with a snapshot, even when nothing was removed
    assert_eq!(updates.len(), 4);
    for update in &updates[1..3] {
        match update {
            SessionUpdate::SelectionChanged { snapshot } => {
                assert_eq!(snapshot.pending, ["b.png"])
            }
            other => panic!("Expected SelectionChanged, got {:?}", other),
        }
    }
    match &updates[3] {
        SessionUpdate::SelectionChanged { snapshot } => assert!(snapshot.pending.is_empty()),
        other => panic!("Expected SelectionChanged, got {:?}", other),
    }
}
