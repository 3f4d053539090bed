//! Main map explorer application.
//!
//! Composes the drawing board, viewport controller and result store into an
//! egui application around the walkers tile map. All asynchronous work (the
//! crime API queries) happens on background worker threads reporting back
//! through a channel; every state transition runs on the UI thread.

use super::drawing::{ClickAction, DrawingBoard};
use super::rendering::{
    DraftPolygonLayer, HeatSurfaceLayer, MarkerLayer, PointerBridge, SelectedPointLayer,
};
use super::results::{self, ResultStore};
use super::settings::Settings;
use super::state::{MapEvent, QueryEvent, SearchMode};
use super::viewport::{RenderMode, Viewport};
use crate::client::{Geometry, PoliceClient};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::model::{is_valid_month, LatLng};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use walkers::sources::OpenStreetMap;
use walkers::{lon_lat, HttpTiles, Map, MapMemory};

/// Map center on launch (Leicester, the canonical demo area of the API).
const HOME: LatLng = LatLng {
    lat: 52.63,
    lng: -1.13,
};

/// Tile zoom on launch.
const HOME_ZOOM: f64 = 13.0;

/// The map explorer window.
///
/// Owns the interaction state machines plus the map widget state, and
/// bridges them: pointer events flow into the drawing board, query events
/// flow out of worker threads into the result store, and the viewport
/// controller reconciles zoom with the heatmap toggle.
pub struct MapExplorer {
    config: Config,
    settings: Settings,

    // Map collaborators
    tiles: HttpTiles,
    map_memory: MapMemory,

    // Interaction state
    board: DrawingBoard,
    viewport: Viewport,
    store: ResultStore,
    month_input: String,
    open_popup: Option<usize>,

    // Query plumbing
    rx: Receiver<QueryEvent>,
    tx: Sender<QueryEvent>,
}

impl MapExplorer {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let (tx, rx) = channel();
        let settings = Settings::load(&config.default_month);

        let mut map_memory = MapMemory::default();
        if let Err(err) = map_memory.set_zoom(HOME_ZOOM) {
            log::warn!("could not apply initial zoom: {err:?}");
        }

        let viewport =
            Viewport::with_thresholds(HOME_ZOOM, settings.heat_max_zoom, settings.detail_zoom);
        let mut store = ResultStore::new();
        store.set_drawer_open(settings.drawer_open);
        let month_input = settings.month.clone();

        Self {
            config,
            settings,
            tiles: HttpTiles::new(OpenStreetMap, cc.egui_ctx.clone()),
            map_memory,
            board: DrawingBoard::new(SearchMode::Point),
            viewport,
            store,
            month_input,
            open_popup: None,
            rx,
            tx,
        }
    }

    /// Issues a crime query on a background thread.
    ///
    /// A new query never cancels an in-flight one; whichever response
    /// arrives last wins the store. A known ordering hazard accepted for a
    /// single-user UI with one search control.
    fn submit_query(&mut self, geometry: Geometry) {
        if !is_valid_month(&self.month_input) {
            self.store.set_warning(format!(
                "Months are formatted as YYYY-MM, got \"{}\"",
                self.month_input
            ));
            return;
        }

        // Persist the month the user actually searched with.
        self.settings.month = self.month_input.clone();
        self.settings.drawer_open = self.store.drawer_open();
        if let Err(e) = self.settings.save() {
            log::warn!("failed to save settings: {e}");
        }

        self.store.dismiss_warning();
        self.store.set_loading(true);
        self.open_popup = None;

        let tx = self.tx.clone();
        let config = self.config.clone();
        let month = self.month_input.clone();

        // Spawn background thread for async work
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build();

            match runtime {
                Ok(rt) => {
                    rt.block_on(async {
                        let client = match PoliceClient::new(&config) {
                            Ok(c) => c,
                            Err(e) => {
                                let _ = tx.send(QueryEvent::Failed(format!(
                                    "Client initialization failed: {e}"
                                )));
                                return;
                            }
                        };

                        let outcome = match &geometry {
                            Geometry::Point(point) => client.fetch_by_point(*point, &month).await,
                            Geometry::Polygon(vertices) => {
                                client.fetch_by_area(vertices, &month).await
                            }
                        };

                        let event = match outcome {
                            Ok(records) => QueryEvent::Loaded(records),
                            Err(AppError::TooManyResults) => QueryEvent::TooManyResults,
                            Err(e) => QueryEvent::Failed(e.to_string()),
                        };
                        let _ = tx.send(event);
                    });
                }
                Err(e) => {
                    let _ = tx.send(QueryEvent::Failed(format!(
                        "Failed to create async runtime: {e}"
                    )));
                }
            }
        });
    }

    /// Drains query events from worker threads into the result store.
    fn process_query_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                QueryEvent::Loaded(records) => {
                    self.store.replace(records);
                    ctx.request_repaint();
                }
                QueryEvent::TooManyResults => {
                    self.store.replace(Vec::new());
                    self.store.set_warning(
                        "The selected area contains too many crimes (>10,000). Try a smaller area.",
                    );
                    ctx.request_repaint();
                }
                QueryEvent::Failed(err) => {
                    log::error!("crime query failed: {err}");
                    self.store.replace(Vec::new());
                    ctx.request_repaint();
                }
            }
        }
    }

    fn clear_all(&mut self) {
        clear_all(
            &mut self.board,
            &mut self.store,
            &mut self.viewport,
            &mut self.open_popup,
        );
    }

    /// Routes pointer events from the map into the drawing board.
    ///
    /// A click that landed on a marker opens its popup instead of feeding
    /// the drawing interaction; a click anywhere else closes it.
    fn handle_map_events(&mut self, events: Vec<MapEvent>, marker_clicked: Option<usize>) {
        if let Some(index) = marker_clicked {
            self.open_popup = Some(index);
        }

        for event in events {
            match event {
                MapEvent::Click(at) => {
                    if marker_clicked.is_some() {
                        continue;
                    }
                    self.open_popup = None;
                    match self.board.on_click(at) {
                        ClickAction::QueryPoint(point) => {
                            self.submit_query(Geometry::Point(point));
                        }
                        ClickAction::VertexAdded | ClickAction::Ignored => {}
                    }
                }
                MapEvent::DoubleClick => self.board.on_double_click(),
                MapEvent::MouseMove(at) => self.board.on_mouse_move(at),
            }
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("UK Crime Watch");
            ui.separator();

            let mode = self.board.mode();
            if ui.selectable_label(mode == SearchMode::Point, "Point").clicked()
                && mode != SearchMode::Point
            {
                self.board.set_mode(SearchMode::Point);
                self.clear_all();
            }
            if ui.selectable_label(mode == SearchMode::Area, "Area").clicked()
                && mode != SearchMode::Area
            {
                self.board.set_mode(SearchMode::Area);
                self.clear_all();
            }

            if self.board.mode() == SearchMode::Area {
                let search = ui.add_enabled(
                    self.board.search_ready(),
                    egui::Button::new("Search Area"),
                );
                if search.clicked() {
                    let vertices = self.board.draft().to_vec();
                    self.submit_query(Geometry::Polygon(vertices));
                }
            }

            if !self.store.is_empty() {
                let heatmap_on = self.viewport.heatmap_enabled();
                if ui.selectable_label(heatmap_on, "Heatmap").clicked() {
                    if let Some(target) = self.viewport.toggle_heatmap() {
                        if let Err(err) = self.map_memory.set_zoom(target) {
                            log::warn!("corrective zoom rejected: {err:?}");
                        }
                    }
                }
            }

            let anything_to_clear = self.board.selected_point().is_some()
                || !self.board.draft().is_empty()
                || !self.store.is_empty();
            if anything_to_clear && ui.button("Clear").clicked() {
                self.clear_all();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.store.loading() {
                    ui.spinner();
                    ui.label("Searching…");
                } else {
                    ui.label(format!("{} crimes found", self.store.len()));
                }
            });
        });

        if let Some(warning) = self.store.warning().map(str::to_owned) {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(warning).color(egui::Color32::from_rgb(0xf8, 0x71, 0x71)),
                );
                if ui.button("Dismiss").clicked() {
                    self.store.dismiss_warning();
                }
            });
        }

        if self.viewport.showing_detail_notice() {
            ui.label(
                egui::RichText::new("Detailed view: showing individual points")
                    .small()
                    .color(egui::Color32::from_rgb(0xfb, 0xbf, 0x24)),
            );
        }
    }

    fn render_dashboard(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Select month").strong());
        ui.add(
            egui::TextEdit::singleline(&mut self.month_input)
                .desired_width(80.0)
                .hint_text("YYYY-MM"),
        );
        if !is_valid_month(&self.month_input) {
            ui.label(
                egui::RichText::new("Use the YYYY-MM format")
                    .small()
                    .color(egui::Color32::from_rgb(0xf8, 0x71, 0x71)),
            );
        }

        ui.separator();
        ui.label(egui::RichText::new("Crime categories").strong());
        for (slug, color) in results::legend() {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("●").color(color));
                ui.label(slug.replace('-', " "));
            });
        }

        ui.separator();
        let hint = match self.board.mode() {
            SearchMode::Point => "Click the map to fetch local crime data.",
            SearchMode::Area => {
                "Click to drop polygon vertices, double click to close, then Search Area."
            }
        };
        ui.label(egui::RichText::new(hint).small().italics());
        ui.label(
            egui::RichText::new("Data provided by the data.police.uk API.")
                .small()
                .italics(),
        );
    }

    fn render_drawer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let label = if self.store.drawer_open() {
                "▼ Crime data explorer"
            } else {
                "▲ Crime data explorer"
            };
            if ui.button(label).clicked() {
                self.store.toggle_drawer();
            }
            ui.label(format!(
                "{} records, {} unique locations",
                self.store.len(),
                self.store.unique_location_count()
            ));
        });

        if !self.store.drawer_open() {
            return;
        }

        egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
            egui::Grid::new("crime-records")
                .striped(true)
                .num_columns(4)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    ui.strong("Category");
                    ui.strong("Location / street");
                    ui.strong("Month");
                    ui.strong("Outcome");
                    ui.end_row();

                    for record in self.store.records() {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new("●")
                                    .color(results::category_color(&record.category)),
                            );
                            ui.label(record.category_label());
                        });
                        ui.label(record.location.street.name.as_str());
                        ui.label(record.month.as_str());
                        match &record.outcome_status {
                            Some(outcome) => ui.label(outcome.category.as_str()),
                            None => ui.label(
                                egui::RichText::new("Pending investigation").italics(),
                            ),
                        };
                        ui.end_row();
                    }
                });
        });
    }
}

impl eframe::App for MapExplorer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Enforce dark mode
        ctx.set_visuals(egui::Visuals::dark());

        // Process any pending query results
        self.process_query_events(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.render_header(ui);
        });

        egui::SidePanel::right("dashboard")
            .default_width(210.0)
            .show(ctx, |ui| {
                self.render_dashboard(ui);
            });

        if !self.store.is_empty() {
            egui::TopBottomPanel::bottom("drawer").show(ctx, |ui| {
                self.render_drawer(ui);
            });
        }

        let mut events = Vec::new();
        let mut marker_clicked = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut map = Map::new(
                Some(&mut self.tiles),
                &mut self.map_memory,
                lon_lat(HOME.lng, HOME.lat),
            )
            .with_plugin(PointerBridge {
                events: &mut events,
            });

            match self.viewport.render_mode() {
                RenderMode::HeatSurface => {
                    map = map.with_plugin(HeatSurfaceLayer {
                        records: self.store.records(),
                    });
                }
                RenderMode::Markers => {
                    map = map.with_plugin(MarkerLayer {
                        records: self.store.records(),
                        open_popup: self.open_popup,
                        clicked: &mut marker_clicked,
                    });
                }
            }

            if !self.board.draft().is_empty() {
                map = map.with_plugin(DraftPolygonLayer {
                    vertices: self.board.draft().to_vec(),
                    preview: self.board.preview_cursor(),
                    closed: self.board.search_ready(),
                });
            }
            if let Some(point) = self.board.selected_point() {
                map = map.with_plugin(SelectedPointLayer { at: point });
            }

            ui.add(map);

            egui::Area::new(egui::Id::new("map-attribution"))
                .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(8.0, -8.0))
                .show(ui.ctx(), |ui| {
                    ui.label(egui::RichText::new("© OpenStreetMap contributors").small());
                });
        });

        // The map widget owns the camera; mirror its zoom after the frame
        // so enabling the heatmap corrects against the current level.
        self.viewport.on_zoom_end(self.map_memory.zoom());
        self.handle_map_events(events, marker_clicked);
    }
}

/// Resets results, drawing state, heatmap and drawer to their initial
/// values in one step; partial clears are not part of the UI vocabulary.
fn clear_all(
    board: &mut DrawingBoard,
    store: &mut ResultStore,
    viewport: &mut Viewport,
    open_popup: &mut Option<usize>,
) {
    board.clear();
    store.clear();
    viewport.set_heatmap(false);
    *open_popup = None;
}

/// Launches the map explorer and returns when the user closes the window.
pub fn run(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Crime Watch"),
        ..Default::default()
    };

    eframe::run_native(
        "Crime Watch",
        options,
        Box::new(move |cc| Ok(Box::new(MapExplorer::new(cc, config)) as Box<dyn eframe::App>)),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {e}")))?;

    Ok(())
}
