//! Shelf nesting over color groups.

use quiltkit_core::Polygon;
use quiltkit_patterns::{
    CancelToken, Nester, NestingRequest, PatternError, PatternMaker, PatternParameters, Piece,
    PiecePosition, SheetSpec, ShelfNester,
};
use std::collections::HashMap;
use tokio::sync::mpsc;

fn square_pieces(count: usize, size: f64, color: usize) -> Vec<Piece> {
    (0..count)
        .map(|i| {
            let mut piece = Piece::new(
                Polygon::rectangle(i as f64 * size, 0.0, size, size),
                color,
                i,
                i,
                PiecePosition::Full,
                false,
            );
            piece.color = Some(color);
            piece
        })
        .collect()
}

#[tokio::test]
async fn test_every_piece_is_placed_inside_its_sheet() {
    let pattern = PatternMaker::new(PatternParameters::default()).generate();
    let cut = pattern.cut_layout();
    let sheet = SheetSpec {
        width: 400.0,
        height: 300.0,
        spacing: 4.0,
    };
    let request = NestingRequest::from_pieces(&cut.cut_lines, sheet);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let outcome = ShelfNester
        .nest(&request, tx, CancelToken::new())
        .await
        .expect("nesting");

    assert!(outcome.unplaced.is_empty());
    assert_eq!(outcome.placements.len(), cut.cut_lines.len());

    let polygons: HashMap<&str, &Polygon> = cut
        .cut_lines
        .iter()
        .map(|p| (p.id.as_str(), &p.polygon))
        .collect();
    for placement in &outcome.placements {
        let placed = placement.place(polygons[placement.piece_id.as_str()]);
        let bbox = placed.bounding_box().unwrap();
        assert!(bbox.min_x >= sheet.spacing - 1e-9);
        assert!(bbox.min_y >= sheet.spacing - 1e-9);
        assert!(bbox.max_x <= sheet.width - sheet.spacing + 1e-9);
        assert!(bbox.max_y <= sheet.height - sheet.spacing + 1e-9);
    }

    let mut last = None;
    while let Ok(progress) = rx.try_recv() {
        last = Some(progress);
    }
    let last = last.expect("progress reported");
    assert_eq!(last.placed, last.total);
    assert_eq!(last.fraction(), 1.0);
}

#[tokio::test]
async fn test_groups_are_nested_separately() {
    let mut pieces = square_pieces(4, 50.0, 0);
    pieces.extend(square_pieces(2, 50.0, 1));
    let sheet = SheetSpec {
        width: 120.0,
        height: 120.0,
        spacing: 5.0,
    };
    let request = NestingRequest::from_pieces(&pieces, sheet);
    let (tx, _rx) = mpsc::unbounded_channel();

    let outcome = ShelfNester
        .nest(&request, tx, CancelToken::new())
        .await
        .expect("nesting");

    // two 50 mm squares per shelf, two shelves per sheet
    assert_eq!(outcome.groups.len(), 2);
    assert_eq!(outcome.groups[0].color, Some(0));
    assert_eq!(outcome.groups[0].sheets, 1);
    assert_eq!(outcome.groups[0].placed, 4);
    assert_eq!(outcome.groups[1].sheets, 1);
    assert!(outcome
        .placements
        .iter()
        .filter(|p| p.color == Some(1))
        .all(|p| p.sheet == 0));
}

#[tokio::test]
async fn test_overflow_opens_new_sheet_and_oversize_is_unplaced() {
    let mut pieces = square_pieces(5, 50.0, 0);
    let mut huge = Piece::new(
        Polygon::rectangle(0.0, 0.0, 500.0, 20.0),
        1,
        0,
        0,
        PiecePosition::Full,
        false,
    );
    huge.color = Some(0);
    pieces.push(huge);

    let sheet = SheetSpec {
        width: 120.0,
        height: 120.0,
        spacing: 5.0,
    };
    let request = NestingRequest::from_pieces(&pieces, sheet);
    let (tx, _rx) = mpsc::unbounded_channel();
    let outcome = ShelfNester
        .nest(&request, tx, CancelToken::new())
        .await
        .expect("nesting");

    assert_eq!(outcome.unplaced, vec!["piece-1-0".to_string()]);
    assert_eq!(outcome.placements.len(), 5);
    assert_eq!(outcome.groups[0].sheets, 2);
}

#[tokio::test]
async fn test_cancel_stops_nesting() {
    let pieces = square_pieces(10, 20.0, 0);
    let request = NestingRequest::from_pieces(&pieces, SheetSpec::default());
    let (tx, _rx) = mpsc::unbounded_channel();
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = ShelfNester.nest(&request, tx, cancel).await;
    assert!(matches!(result, Err(PatternError::Cancelled)));
}

#[tokio::test]
async fn test_dropped_receiver_does_not_abort() {
    let pieces = square_pieces(3, 20.0, 2);
    let request = NestingRequest::from_pieces(&pieces, SheetSpec::default());
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);

    let outcome = ShelfNester
        .nest(&request, tx, CancelToken::new())
        .await
        .expect("nesting");
    assert_eq!(outcome.placements.len(), 3);
}

#[tokio::test]
async fn test_invalid_sheet_is_rejected() {
    let pieces = square_pieces(1, 20.0, 0);
    let sheet = SheetSpec {
        width: 0.0,
        height: 100.0,
        spacing: 1.0,
    };
    let request = NestingRequest::from_pieces(&pieces, sheet);
    let (tx, _rx) = mpsc::unbounded_channel();
    let result = ShelfNester.nest(&request, tx, CancelToken::new()).await;
    assert!(matches!(result, Err(PatternError::Nesting(_))));
}

#[tokio::test]
async fn test_group_with_nothing_placed_uses_no_sheets() {
    let mut pieces = square_pieces(2, 30.0, 0);
    let mut huge = Piece::new(
        Polygon::rectangle(0.0, 0.0, 400.0, 400.0),
        1,
        0,
        0,
        PiecePosition::Full,
        false,
    );
    huge.color = Some(1);
    pieces.push(huge);

    let sheet = SheetSpec {
        width: 100.0,
        height: 100.0,
        spacing: 2.0,
    };
    let request = NestingRequest::from_pieces(&pieces, sheet);
    let (tx, _rx) = mpsc::unbounded_channel();
    let outcome = ShelfNester
        .nest(&request, tx, CancelToken::new())
        .await
        .expect("nesting");

    assert_eq!(outcome.groups.len(), 2);
    assert_eq!(outcome.groups[0].sheets, 1);
    assert_eq!(outcome.groups[1].color, Some(1));
    assert_eq!(outcome.groups[1].placed, 0);
    assert_eq!(outcome.groups[1].sheets, 0);
    assert_eq!(outcome.unplaced, vec!["piece-1-0".to_string()]);
}
