//! Nesting interface
//!
//! Pieces are nested per color, one fabric per color group. The optimizer
//! itself is an external collaborator behind the [`Nester`] trait: it gets a
//! color-grouped request plus sheet dimensions, reports progress over a
//! channel and stops when its [`CancelToken`] is set.
//!
//! [`ShelfNester`] is a bounding-box shelf packer. It wastes material on
//! non-rectangular pieces but gives a working default and a reference for
//! the progress and cancel contract.

use crate::error::{PatternError, PatternResult};
use crate::piece::Piece;
use async_trait::async_trait;
use quiltkit_core::{Point, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Material sheet dimensions in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub width: f64,
    pub height: f64,
    /// Gap kept between pieces and from the sheet edges
    pub spacing: f64,
}

impl Default for SheetSpec {
    fn default() -> Self {
        // width of a standard quilting cotton bolt, one yard long
        Self {
            width: 1100.0,
            height: 914.4,
            spacing: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestItem {
    pub piece_id: String,
    pub polygon: Polygon,
}

/// All pieces sharing one color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGroup {
    pub color: Option<usize>,
    pub items: Vec<NestItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestingRequest {
    pub sheet: SheetSpec,
    pub groups: Vec<ColorGroup>,
}

impl NestingRequest {
    /// Groups pieces by color index in ascending order, uncolored pieces last.
    pub fn from_pieces(pieces: &[Piece], sheet: SheetSpec) -> Self {
        let mut colored: BTreeMap<usize, Vec<NestItem>> = BTreeMap::new();
        let mut uncolored = Vec::new();

        for piece in pieces {
            let item = NestItem {
                piece_id: piece.id.clone(),
                polygon: piece.polygon.clone(),
            };
            match piece.color {
                Some(color) => colored.entry(color).or_default().push(item),
                None => uncolored.push(item),
            }
        }

        let mut groups: Vec<ColorGroup> = colored
            .into_iter()
            .map(|(color, items)| ColorGroup {
                color: Some(color),
                items,
            })
            .collect();
        if !uncolored.is_empty() {
            groups.push(ColorGroup {
                color: None,
                items: uncolored,
            });
        }

        Self { sheet, groups }
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

/// Where one piece ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub piece_id: String,
    pub color: Option<usize>,
    /// Sheet index within the piece's color group
    pub sheet: usize,
    /// Translation applied to the piece polygon
    pub offset_x: f64,
    pub offset_y: f64,
    /// Rotation in degrees, applied before translation
    pub rotation: f64,
}

impl Placement {
    /// The polygon moved to its placed position.
    pub fn place(&self, polygon: &Polygon) -> Polygon {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        Polygon::new(
            polygon
                .points()
                .iter()
                .map(|p| {
                    Point::new(
                        p.x * cos - p.y * sin + self.offset_x,
                        p.x * sin + p.y * cos + self.offset_y,
                    )
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestingProgress {
    pub color: Option<usize>,
    pub placed: usize,
    pub total: usize,
}

impl NestingProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.placed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub color: Option<usize>,
    pub sheets: usize,
    pub placed: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestingOutcome {
    pub placements: Vec<Placement>,
    /// Pieces that do not fit on an empty sheet
    pub unplaced: Vec<String>,
    pub groups: Vec<GroupSummary>,
}

/// Cloneable stop flag shared between the caller and a running nester.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[async_trait]
pub trait Nester: Send + Sync {
    /// Places every item of `request`, sending progress as it goes.
    ///
    /// Implementations return [`PatternError::Cancelled`] once `cancel` is set.
    /// A dropped progress receiver must not abort the run.
    async fn nest(
        &self,
        request: &NestingRequest,
        progress: mpsc::UnboundedSender<NestingProgress>,
        cancel: CancelToken,
    ) -> PatternResult<NestingOutcome>;
}

/// Packs bounding boxes into horizontal shelves, tallest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShelfNester;

struct Shelf {
    sheet: usize,
    cursor_x: f64,
    cursor_y: f64,
    height: f64,
}

#[async_trait]
impl Nester for ShelfNester {
    async fn nest(
        &self,
        request: &NestingRequest,
        progress: mpsc::UnboundedSender<NestingProgress>,
        cancel: CancelToken,
    ) -> PatternResult<NestingOutcome> {
        let sheet = request.sheet;
        if !(sheet.width > 0.0 && sheet.height > 0.0 && sheet.spacing >= 0.0) {
            return Err(PatternError::Nesting(format!(
                "invalid sheet {}x{} with spacing {}",
                sheet.width, sheet.height, sheet.spacing
            )));
        }

        let total = request.item_count();
        let mut placed = 0;
        let mut outcome = NestingOutcome::default();

        for group in &request.groups {
            let mut items: Vec<(&NestItem, f64, f64, Point)> = group
                .items
                .iter()
                .filter_map(|item| {
                    item.polygon.bounding_box().map(|b| {
                        (item, b.width(), b.height(), Point::new(b.min_x, b.min_y))
                    })
                })
                .collect();
            items.sort_by(|a, b| b.2.total_cmp(&a.2));

            let mut shelf = Shelf {
                sheet: 0,
                cursor_x: sheet.spacing,
                cursor_y: sheet.spacing,
                height: 0.0,
            };
            let mut group_placed = 0;

            for (item, width, height, origin) in items {
                if cancel.is_cancelled() {
                    info!(placed, total, "Nesting cancelled");
                    return Err(PatternError::Cancelled);
                }

                if width + 2.0 * sheet.spacing > sheet.width
                    || height + 2.0 * sheet.spacing > sheet.height
                {
                    outcome.unplaced.push(item.piece_id.clone());
                    continue;
                }

                if shelf.cursor_x + width + sheet.spacing > sheet.width {
                    shelf.cursor_x = sheet.spacing;
                    shelf.cursor_y += shelf.height + sheet.spacing;
                    shelf.height = 0.0;
                }
                if shelf.cursor_y + height + sheet.spacing > sheet.height {
                    shelf.sheet += 1;
                    shelf.cursor_x = sheet.spacing;
                    shelf.cursor_y = sheet.spacing;
                    shelf.height = 0.0;
                }

                outcome.placements.push(Placement {
                    piece_id: item.piece_id.clone(),
                    color: group.color,
                    sheet: shelf.sheet,
                    offset_x: shelf.cursor_x - origin.x,
                    offset_y: shelf.cursor_y - origin.y,
                    rotation: 0.0,
                });
                shelf.cursor_x += width + sheet.spacing;
                shelf.height = shelf.height.max(height);
                placed += 1;
                group_placed += 1;

                // receiver may have gone away; keep nesting
                let _ = progress.send(NestingProgress {
                    color: group.color,
                    placed,
                    total,
                });
                tokio::task::yield_now().await;
            }

            let summary = GroupSummary {
                color: group.color,
                sheets: if group_placed == 0 { 0 } else { shelf.sheet + 1 },
                placed: group_placed,
            };
            debug!(
                color = ?summary.color,
                sheets = summary.sheets,
                placed = summary.placed,
                "Nested color group"
            );
            outcome.groups.push(summary);
        }

        info!(
            placed,
            unplaced = outcome.unplaced.len(),
            groups = outcome.groups.len(),
            "Nesting finished"
        );
        Ok(outcome)
    }
}
