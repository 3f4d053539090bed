//! Draw-mode interaction state machine.
//!
//! Owns the transient selection state of the map: the search mode, the
//! selected point, the polygon draft and the rubber-band preview cursor.
//! Map pointer events feed in; the outcome tells the composer whether a
//! query should be issued. A point selection and a polygon draft are
//! mutually exclusive.

use super::state::{DrawState, SearchMode};
use crate::model::LatLng;

/// Minimum vertex count for a searchable polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Result of feeding a click into the drawing board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClickAction {
    /// A point was selected; issue a point query at the coordinate.
    QueryPoint(LatLng),
    /// A polygon vertex was appended.
    VertexAdded,
    /// The click was ignored (a completed polygon is awaiting review).
    Ignored,
}

#[derive(Clone, Debug)]
pub struct DrawingBoard {
    mode: SearchMode,
    state: DrawState,
    selected_point: Option<LatLng>,
    draft: Vec<LatLng>,
    preview_cursor: Option<LatLng>,
}

impl DrawingBoard {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            state: DrawState::Idle,
            selected_point: None,
            draft: Vec::new(),
            preview_cursor: None,
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn selected_point(&self) -> Option<LatLng> {
        self.selected_point
    }

    /// Vertices of the in-progress or completed polygon, in click order.
    pub fn draft(&self) -> &[LatLng] {
        &self.draft
    }

    /// Cursor position for the rubber-band line, while drawing.
    pub fn preview_cursor(&self) -> Option<LatLng> {
        self.preview_cursor
    }

    /// Switches the search mode, resetting every transient selection.
    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
        self.clear();
    }

    /// Returns to `Idle`, dropping the selected point, the draft and the
    /// preview cursor.
    pub fn clear(&mut self) {
        self.state = DrawState::Idle;
        self.selected_point = None;
        self.draft.clear();
        self.preview_cursor = None;
    }

    /// Handles a primary click at a map coordinate.
    ///
    /// In point mode every click re-selects and queries. In area mode clicks
    /// append vertices while drawing; once a polygon is completed, further
    /// clicks are ignored until an explicit clear (review before re-draw).
    pub fn on_click(&mut self, at: LatLng) -> ClickAction {
        match (self.mode, self.state) {
            (SearchMode::Point, DrawState::Idle | DrawState::PointSelected) => {
                self.selected_point = Some(at);
                self.draft.clear();
                self.state = DrawState::PointSelected;
                ClickAction::QueryPoint(at)
            }
            (SearchMode::Area, DrawState::Idle) => {
                self.selected_point = None;
                self.draft.push(at);
                self.state = DrawState::Drawing;
                ClickAction::VertexAdded
            }
            (SearchMode::Area, DrawState::Drawing) => {
                self.draft.push(at);
                ClickAction::VertexAdded
            }
            _ => ClickAction::Ignored,
        }
    }

    /// Closes the draft if it has enough vertices; otherwise a no-op.
    ///
    /// Completing a polygon never issues a query by itself; the user
    /// triggers the area search explicitly.
    pub fn on_double_click(&mut self) {
        if self.state == DrawState::Drawing && self.draft.len() >= MIN_POLYGON_VERTICES {
            self.state = DrawState::PolygonReady;
            self.preview_cursor = None;
        }
    }

    /// Tracks the cursor for the rubber-band line from the last vertex.
    pub fn on_mouse_move(&mut self, at: LatLng) {
        if self.state == DrawState::Drawing && !self.draft.is_empty() {
            self.preview_cursor = Some(at);
        } else {
            self.preview_cursor = None;
        }
    }

    /// True when the draft can be submitted as an area search.
    pub fn search_ready(&self) -> bool {
        self.state == DrawState::PolygonReady
    }
}

impl Default for DrawingBoard {
    fn default() -> Self {
        Self::new(SearchMode::Point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng)
    }

    #[test]
    fn point_mode_click_selects_and_queries() {
        let mut board = DrawingBoard::new(SearchMode::Point);

        let action = board.on_click(at(52.63, -1.13));

        assert_eq!(action, ClickAction::QueryPoint(at(52.63, -1.13)));
        assert_eq!(board.state(), DrawState::PointSelected);
        assert_eq!(board.selected_point(), Some(at(52.63, -1.13)));
        assert!(board.draft().is_empty());
    }

    #[test]
    fn point_mode_reclick_replaces_the_selection() {
        let mut board = DrawingBoard::new(SearchMode::Point);
        board.on_click(at(52.63, -1.13));

        let action = board.on_click(at(52.70, -1.20));

        assert_eq!(action, ClickAction::QueryPoint(at(52.70, -1.20)));
        assert_eq!(board.selected_point(), Some(at(52.70, -1.20)));
    }

    #[test]
    fn area_mode_clicks_append_vertices() {
        let mut board = DrawingBoard::new(SearchMode::Area);

        assert_eq!(board.on_click(at(52.63, -1.13)), ClickAction::VertexAdded);
        assert_eq!(board.state(), DrawState::Drawing);
        assert_eq!(board.on_click(at(52.64, -1.12)), ClickAction::VertexAdded);
        assert_eq!(board.draft().len(), 2);
        assert_eq!(board.selected_point(), None);
    }

    #[test]
    fn search_stays_disabled_below_three_vertices() {
        let mut board = DrawingBoard::new(SearchMode::Area);

        board.on_click(at(52.63, -1.13));
        assert!(!board.search_ready());
        board.on_double_click();
        assert_eq!(board.state(), DrawState::Drawing);
        assert!(!board.search_ready());

        board.on_click(at(52.64, -1.12));
        board.on_double_click();
        assert_eq!(board.state(), DrawState::Drawing);
        assert!(!board.search_ready());
    }

    #[test]
    fn double_click_completes_a_three_vertex_draft() {
        let mut board = DrawingBoard::new(SearchMode::Area);
        board.on_click(at(52.63, -1.13));
        board.on_click(at(52.64, -1.12));
        board.on_click(at(52.62, -1.11));

        board.on_double_click();

        assert_eq!(board.state(), DrawState::PolygonReady);
        assert!(board.search_ready());
        assert_eq!(board.draft().len(), 3);
    }

    #[test]
    fn completed_polygon_ignores_further_clicks() {
        let mut board = DrawingBoard::new(SearchMode::Area);
        board.on_click(at(52.63, -1.13));
        board.on_click(at(52.64, -1.12));
        board.on_click(at(52.62, -1.11));
        board.on_double_click();

        assert_eq!(board.on_click(at(52.60, -1.10)), ClickAction::Ignored);
        assert_eq!(board.draft().len(), 3);
        assert_eq!(board.state(), DrawState::PolygonReady);
    }

    #[test]
    fn mouse_move_tracks_preview_only_while_drawing() {
        let mut board = DrawingBoard::new(SearchMode::Area);

        board.on_mouse_move(at(52.63, -1.13));
        assert_eq!(board.preview_cursor(), None);

        board.on_click(at(52.63, -1.13));
        board.on_mouse_move(at(52.65, -1.14));
        assert_eq!(board.preview_cursor(), Some(at(52.65, -1.14)));

        board.on_click(at(52.64, -1.12));
        board.on_click(at(52.62, -1.11));
        board.on_double_click();
        assert_eq!(board.preview_cursor(), None);
    }

    #[test]
    fn mode_switch_resets_all_transient_state() {
        let mut board = DrawingBoard::new(SearchMode::Area);
        board.on_click(at(52.63, -1.13));
        board.on_mouse_move(at(52.65, -1.14));

        board.set_mode(SearchMode::Point);

        assert_eq!(board.state(), DrawState::Idle);
        assert!(board.draft().is_empty());
        assert_eq!(board.selected_point(), None);
        assert_eq!(board.preview_cursor(), None);

        // Idempotent: switching again from a clean board changes nothing.
        board.set_mode(SearchMode::Area);
        assert_eq!(board.state(), DrawState::Idle);
        assert!(board.draft().is_empty());
    }

    #[test]
    fn clear_resets_from_any_state() {
        let mut board = DrawingBoard::new(SearchMode::Area);
        board.on_click(at(52.63, -1.13));
        board.on_click(at(52.64, -1.12));
        board.on_click(at(52.62, -1.11));
        board.on_double_click();

        board.clear();

        assert_eq!(board.state(), DrawState::Idle);
        assert!(board.draft().is_empty());
        assert!(!board.search_ready());
    }
}
