//! Map layer rendering.
//!
//! Custom layers (selection marker, polygon draft, rubber-band preview,
//! record markers, heat surface) are drawn through the map widget's plugin
//! seam. The widget owns tiles, panning and the geo/screen projection; each
//! plugin only paints on top of it with the provided projector.

use super::results::category_color;
use super::state::MapEvent;
use crate::model::{CrimeRecord, LatLng};
use eframe::egui::{self, Color32, Pos2, Stroke, Ui};
use walkers::{lon_lat, MapMemory, Plugin, Projector};

/// Accent color for the active selection (point marker, polygon outline).
pub(crate) const SELECTION_COLOR: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);

/// Screen radius of a record marker, in points.
const MARKER_RADIUS: f32 = 6.0;

fn project(projector: &Projector, at: LatLng) -> Pos2 {
    let point = projector.project(lon_lat(at.lng, at.lat));
    egui::pos2(point.x, point.y)
}

fn unproject(projector: &Projector, at: Pos2) -> LatLng {
    let position = projector.unproject(at.to_vec2());
    LatLng::new(position.y(), position.x())
}

/// Forwards pointer interactions on the map to the interaction state
/// machine as [`MapEvent`]s, unprojected to map coordinates.
pub(crate) struct PointerBridge<'a> {
    pub events: &'a mut Vec<MapEvent>,
}

impl Plugin for PointerBridge<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let Some(hover) = response.hover_pos() else {
            return;
        };
        let at = unproject(projector, hover);
        self.events.push(MapEvent::MouseMove(at));

        let (clicked, double_clicked) = ui.input(|i| {
            (
                i.pointer.button_clicked(egui::PointerButton::Primary),
                i.pointer.button_double_clicked(egui::PointerButton::Primary),
            )
        });

        // A double click also reports a click; the drawing board wants
        // exactly one of the two.
        if double_clicked {
            self.events.push(MapEvent::DoubleClick);
        } else if clicked {
            self.events.push(MapEvent::Click(at));
        }
    }
}

/// Marker for the point-search selection center.
pub(crate) struct SelectedPointLayer {
    pub at: LatLng,
}

impl Plugin for SelectedPointLayer {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        _response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let center = project(projector, self.at);
        ui.painter().circle(
            center,
            10.0,
            SELECTION_COLOR.gamma_multiply(0.4),
            Stroke::new(2.0, Color32::WHITE),
        );
    }
}

/// In-progress or completed polygon outline with the rubber-band preview
/// line from the last vertex to the cursor.
pub(crate) struct DraftPolygonLayer {
    pub vertices: Vec<LatLng>,
    pub preview: Option<LatLng>,
    pub closed: bool,
}

impl Plugin for DraftPolygonLayer {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        _response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let painter = ui.painter();
        let points: Vec<Pos2> = self
            .vertices
            .iter()
            .map(|v| project(projector, *v))
            .collect();

        let stroke = Stroke::new(2.0, SELECTION_COLOR);
        for pair in points.windows(2) {
            painter.extend(egui::Shape::dashed_line(pair, stroke, 5.0, 10.0));
        }
        if self.closed && points.len() >= 3 {
            let closing = [points[points.len() - 1], points[0]];
            painter.extend(egui::Shape::dashed_line(&closing, stroke, 5.0, 10.0));
        }

        // Rubber band trails the cursor while drawing.
        if let (Some(preview), Some(last)) = (self.preview, points.last()) {
            let cursor = project(projector, preview);
            painter.extend(egui::Shape::dashed_line(
                &[*last, cursor],
                Stroke::new(2.0, SELECTION_COLOR.gamma_multiply(0.6)),
                5.0,
                5.0,
            ));
        }

        for point in &points {
            painter.circle_filled(*point, 3.5, SELECTION_COLOR);
        }
    }
}

/// One colored circle per record, with a detail popup for the marker the
/// user clicked last.
pub(crate) struct MarkerLayer<'a> {
    pub records: &'a [CrimeRecord],
    /// Index of the record whose popup is open.
    pub open_popup: Option<usize>,
    /// Reports the marker clicked this frame, if any.
    pub clicked: &'a mut Option<usize>,
}

impl Plugin for MarkerLayer<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let clicked_at = ui
            .input(|i| i.pointer.button_clicked(egui::PointerButton::Primary))
            .then(|| response.hover_pos())
            .flatten();

        for (index, record) in self.records.iter().enumerate() {
            let Some(coords) = record.coords() else {
                continue;
            };
            let center = project(projector, coords);

            ui.painter().circle(
                center,
                MARKER_RADIUS,
                category_color(&record.category).gamma_multiply(0.8),
                Stroke::new(1.0, Color32::WHITE),
            );

            if let Some(pos) = clicked_at {
                if pos.distance(center) <= MARKER_RADIUS + 2.0 {
                    *self.clicked = Some(index);
                }
            }

            if self.open_popup == Some(index) {
                draw_record_popup(ui, center, record);
            }
        }
    }
}

fn draw_record_popup(ui: &Ui, anchor: Pos2, record: &CrimeRecord) {
    egui::Area::new(egui::Id::new("crime-record-popup"))
        .fixed_pos(anchor + egui::vec2(MARKER_RADIUS + 4.0, -MARKER_RADIUS))
        .show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style())
                .fill(Color32::from_rgb(30, 30, 30))
                .stroke(Stroke::new(1.0, Color32::GRAY))
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_max_width(220.0);
                    ui.strong(record.category_label());
                    ui.label(record.location.street.name.as_str());
                    ui.label(format!("Month: {}", record.month));
                    match &record.outcome_status {
                        Some(outcome) => {
                            ui.label(format!("Outcome: {}", outcome.category));
                        }
                        None => {
                            ui.label(
                                egui::RichText::new("Pending investigation")
                                    .italics()
                                    .color(Color32::LIGHT_GRAY),
                            );
                        }
                    }
                });
        });
}

/// Aggregated density surface: translucent blobs per anchor point whose
/// overlap approximates the gradient of a dedicated heat renderer.
pub(crate) struct HeatSurfaceLayer<'a> {
    pub records: &'a [CrimeRecord],
}

impl Plugin for HeatSurfaceLayer<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        _response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let painter = ui.painter();
        for record in self.records {
            let Some(coords) = record.coords() else {
                continue;
            };
            let center = project(projector, coords);
            painter.circle_filled(
                center,
                25.0,
                Color32::from_rgba_unmultiplied(0x3b, 0x82, 0xf6, 22),
            );
            painter.circle_filled(
                center,
                12.0,
                Color32::from_rgba_unmultiplied(0xef, 0x44, 0x44, 44),
            );
        }
    }
}
