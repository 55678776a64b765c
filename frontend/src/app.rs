use std::time::Duration;

use courier::{
    classify::{RoadPolicy, Strictness},
    util, Courier, PlanOutcome, Planner, PlannerConfig, Point,
};
use egui::{pos2, vec2, Color32, ColorImage, Pos2, Rect, Shape, Stroke, TextureHandle};
use image::RgbaImage;
use log::{info, warn};

/// Seconds between two courier moves
const TICK: f64 = 1.0 / 30.0;

const DEFAULT_START: Point = Point::new(100, 100);
const DEFAULT_DESTINATION: Point = Point::new(500, 500);

const FLAG_START: Color32 = Color32::from_rgb(255, 255, 0);
const FLAG_DESTINATION: Color32 = Color32::from_rgb(255, 0, 0);
const COURIER: Color32 = Color32::from_rgb(0, 255, 0);
const ROUTE: Color32 = Color32::from_rgb(0, 0, 255);

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct State {
    map_path: String,
    config: PlannerConfig,
}

impl Default for State {
    fn default() -> Self {
        Self {
            map_path: String::new(),
            config: PlannerConfig::default(),
        }
    }
}

struct LoadedMap {
    image: RgbaImage,
    texture: TextureHandle,
}

#[derive(Debug, PartialEq, Eq)]
enum RouteStatus {
    NotPlanned,
    NoRoute,
    Found { cost: usize },
}

pub struct App {
    state: State,
    planner: Planner,
    map: Option<LoadedMap>,
    courier: Courier,
    start: Point,
    destination: Point,
    route: RouteStatus,
    last_tick: f64,
    message: String,
}

impl App {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, map_path: Option<String>) -> Self {
        // Load previous app state (if any).
        // Note that you must enable the `persistence` feature for this to work.
        let mut state: State = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        };
        if let Some(path) = map_path {
            state.map_path = path;
        }

        let mut app = App::from_state(state);
        if !app.state.map_path.is_empty() {
            app.load_map_from_path(&cc.egui_ctx);
        }
        app
    }

    fn from_state(state: State) -> Self {
        App {
            planner: Planner::new(state.config.clone()),
            state,
            map: None,
            courier: Courier::new(DEFAULT_START),
            start: DEFAULT_START,
            destination: DEFAULT_DESTINATION,
            route: RouteStatus::NotPlanned,
            last_tick: 0.0,
            message: String::new(),
        }
    }

    fn load_map_from_path(&mut self, ctx: &egui::Context) {
        match util::load_map(self.state.map_path.trim()) {
            Ok(image) => self.set_map(ctx, image),
            Err(e) => {
                warn!("{:#}", e);
                self.message = format!("{:#}", e);
            }
        }
    }

    fn set_map(&mut self, ctx: &egui::Context, image: RgbaImage) {
        let size = [image.width() as _, image.height() as _];
        let color_image = ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        let texture = ctx.load_texture("map", color_image, egui::TextureOptions::NEAREST);

        self.map = Some(LoadedMap { image, texture });
        self.courier = Courier::new(DEFAULT_START);
        self.start = DEFAULT_START;
        self.destination = DEFAULT_DESTINATION;
        self.route = RouteStatus::NotPlanned;
        self.message.clear();
    }

    /// Pick new start and destination points and plan between them
    fn randomize(&mut self) {
        let Some(map) = &self.map else {
            return;
        };
        let mut rng = rand::thread_rng();
        self.start = self.planner.sample_random_safe(Some(&map.image), &mut rng);
        self.destination = self.planner.sample_random_safe(Some(&map.image), &mut rng);

        let (route, path) = match self.planner.search(self.start, self.destination, &map.image) {
            PlanOutcome::NoRoute => (RouteStatus::NoRoute, Vec::new()),
            PlanOutcome::Found { waypoints, cost } => (RouteStatus::Found { cost }, waypoints),
        };
        self.route = route;
        self.courier.assign(self.start, path);
    }

    fn set_config(&mut self, config: PlannerConfig) {
        if config != self.state.config {
            info!("planner settings changed: {:?}", config);
            self.planner = Planner::new(config.clone());
            self.state.config = config;

            // the old route was planned under other rules, keep the flags and plan again on demand
            self.route = RouteStatus::NotPlanned;
            self.courier.assign(self.courier.position(), Vec::new());
        }
    }

    fn tick(&mut self, ctx: &egui::Context) {
        if !self.courier.is_moving() {
            return;
        }
        let now = ctx.input(|i| i.time);
        if now - self.last_tick >= TICK {
            self.courier.step();
            self.last_tick = now;
        }
        ctx.request_repaint_after(Duration::from_secs_f64(TICK));
    }

    fn status(&self) -> String {
        match self.route {
            RouteStatus::NotPlanned => "Not planned".to_owned(),
            RouteStatus::NoRoute => "No route between the flags".to_owned(),
            RouteStatus::Found { cost } => format!(
                "Route of {} steps, {} left",
                cost,
                self.courier.remaining_len()
            ),
        }
    }

    fn settings_ui(&mut self, ui: &mut egui::Ui) {
        let mut config = self.state.config.clone();

        let mut tolerant = matches!(config.policy, RoadPolicy::Band { .. });
        ui.checkbox(&mut tolerant, "Accept any gray as road");
        config.policy = config.policy.with_tolerance(tolerant);

        let mut safe = config.strictness == Strictness::Safe;
        ui.checkbox(&mut safe, "Keep clear of road edges");
        config.strictness = if safe {
            Strictness::Safe
        } else {
            Strictness::Road
        };

        ui.add(egui::Slider::new(&mut config.step, 2..=20).text("Step (px)"));

        self.set_config(config);
    }

    fn paint_map(&self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let origin = response.rect.min;
        let at = |p: Point| origin + vec2(p.x as f32, p.y as f32);

        match &self.map {
            Some(map) => {
                painter.image(
                    map.texture.id(),
                    Rect::from_min_size(origin, map.texture.size_vec2()),
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                painter.rect_filled(response.rect, 0.0, Color32::WHITE);
            }
        }

        let route: Vec<Pos2> = std::iter::once(self.courier.position())
            .chain(self.courier.remaining().copied())
            .map(at)
            .collect();
        if route.len() > 1 {
            painter.add(Shape::line(route, Stroke::new(2.0, ROUTE)));
        }

        for (point, color) in [
            (self.start, FLAG_START),
            (self.destination, FLAG_DESTINATION),
        ] {
            let p = at(point);
            painter.rect_filled(
                Rect::from_min_size(p, vec2(5.0, 20.0)),
                0.0,
                Color32::BLACK,
            );
            painter.add(Shape::convex_polygon(
                vec![
                    p + vec2(5.0, 0.0),
                    p + vec2(20.0, 5.0),
                    p + vec2(5.0, 10.0),
                ],
                color,
                Stroke::NONE,
            ));
        }

        // triangle pointing along the heading, y grows downwards on screen
        let center = at(self.courier.position());
        let angle = self.courier.heading().to_radians();
        let corner = |len: f32, a: f32| center + vec2(len * a.cos(), -len * a.sin());
        painter.add(Shape::convex_polygon(
            vec![
                corner(15.0, angle),
                corner(10.0, angle + 2.3),
                corner(10.0, angle - 2.3),
            ],
            COURIER,
            Stroke::NONE,
        ));
    }
}

impl eframe::App for App {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.state);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        egui::SidePanel::left("side_panel").show(ctx, |ui| {
            ui.label("Map file");
            ui.text_edit_singleline(&mut self.state.map_path);
            ui.horizontal(|ui| {
                if ui.button("Load Map").clicked() {
                    self.load_map_from_path(ctx);
                }
                if ui.button("Load Demo").clicked() {
                    info!("loading the demo map");
                    self.set_map(ctx, util::demo_map(1000, 700));
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.map.is_some(), egui::Button::new("Randomize"))
                    .clicked()
                {
                    self.randomize();
                }
                if ui.button("Start").clicked() {
                    self.courier.start();
                    self.last_tick = ctx.input(|i| i.time);
                    ctx.request_repaint();
                }
                if ui.button("Stop").clicked() {
                    self.courier.stop();
                }
            });
            ui.label(self.status());
            if !self.message.is_empty() {
                ui.colored_label(Color32::RED, &self.message);
            }

            ui.separator();
            self.settings_ui(ui);

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                egui::warn_if_debug_build(ui);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.paint_map(ui);
        });
    }
}
