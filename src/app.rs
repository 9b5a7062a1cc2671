use egui::emath::TSTransform;
use egui::{Align, Color32, Layout, Sense, Shape, Stroke, Vec2};

use crate::draw::{ShapeSurface, ShapeSurfaceFactory};
use crate::layout::RegionLayout;
use crate::physics::{BodyId, StaticBodyStore};
use crate::terrain::{FrameContext, Terrain, TerrainConfig};

type ViewerTerrain = Terrain<BodyId, ShapeSurface>;

const SKY: Color32 = Color32::from_rgb(150, 195, 235);
const SCROLL_SPEED: f32 = 1500.0;

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ShuttleTerrainApp {
    seed: u64,
    ocean_waves: bool,
    pollution: f32,
    show_collision: bool,
    camera_x: f32,
    zoom: f32,

    #[serde(skip)]
    viewer: Viewer,
}

/// 运行时状态, 不持久化; 析构时把刚体从物理世界移除
#[derive(Default)]
struct Viewer {
    physics: StaticBodyStore,
    terrain: Option<ViewerTerrain>,
}

impl Viewer {
    fn rebuild(&mut self, seed: u64) {
        self.teardown();
        let config = TerrainConfig::default().with_seed(seed);
        let mut factory = ShapeSurfaceFactory::new();
        self.terrain = Some(Terrain::build(
            config,
            RegionLayout::demo(),
            &mut self.physics,
            &mut factory,
        ));
    }

    fn teardown(&mut self) {
        if let Some(mut old) = self.terrain.take() {
            old.destroy(&mut self.physics);
        }
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Default for ShuttleTerrainApp {
    fn default() -> Self {
        Self {
            seed: TerrainConfig::default().seed,
            ocean_waves: true,
            pollution: 0.0,
            show_collision: false,
            camera_x: 0.0,
            zoom: 1.0,
            viewer: Viewer::default(),
        }
    }
}

impl ShuttleTerrainApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            if let Some(app) = eframe::get_value::<ShuttleTerrainApp>(storage, eframe::APP_KEY) {
                return app;
            }
        }
        Default::default()
    }

    fn regenerate(&mut self) {
        self.viewer.rebuild(self.seed);
    }

    fn ensure_terrain(&mut self) {
        if self.viewer.terrain.is_none() {
            self.regenerate();
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Generation");
        ui.horizontal(|ui| {
            ui.label("Seed");
            ui.add(egui::DragValue::new(&mut self.seed).speed(1));
            if ui.button("Randomize").clicked() {
                self.seed = rand::random();
                self.regenerate();
            }
        });
        if ui.button("Regenerate terrain").clicked() {
            self.regenerate();
        }

        ui.separator();
        ui.heading("View");
        ui.checkbox(&mut self.ocean_waves, "Animated ocean");
        ui.add(egui::Slider::new(&mut self.pollution, 0.0..=1.0).text("Pollution"));
        ui.checkbox(&mut self.show_collision, "Collision overlay");
        ui.add(egui::Slider::new(&mut self.zoom, 0.25..=4.0).logarithmic(true).text("Zoom"));

        let Some(terrain) = &self.viewer.terrain else {
            return;
        };
        ui.separator();
        ui.heading("Terrain");
        let stats = terrain.stats();
        ui.with_layout(Layout::top_down(Align::LEFT), |ui| {
            ui.label(format!("Vertices: {}", stats.vertices));
            ui.label(format!(
                "Bodies: {} ({} skipped)",
                stats.bodies, stats.skipped_bodies
            ));
            ui.label(format!(
                "Chunks: {} visible of {}",
                stats.visible_chunks, stats.chunks
            ));
            ui.label(format!("Flat areas: {}", stats.flat_areas));
            ui.label(format!("Height range: {:.0} .. {:.0}", stats.min_y, stats.max_y));
        });
    }
}

impl eframe::App for ShuttleTerrainApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_terrain();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.heading("Shuttle terrain");
            ui.label("Drag or use the arrow keys to scroll, scroll wheel to zoom.");
        });

        egui::SidePanel::left("controls").show(ctx, |ui| self.controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
                let rect = response.rect;
                painter.rect_filled(rect, 0.0, SKY);

                let Some(terrain) = &mut self.viewer.terrain else {
                    return;
                };
                let (world_start, world_end) = terrain.world_bounds();
                let world_height = terrain.config().world_height;

                let (dt, scroll, zoom_delta) = ctx.input(|i| {
                    let mut scroll = 0.0;
                    if i.key_down(egui::Key::ArrowLeft) {
                        scroll -= 1.0;
                    }
                    if i.key_down(egui::Key::ArrowRight) {
                        scroll += 1.0;
                    }
                    (i.stable_dt, scroll, i.zoom_delta())
                });
                self.zoom = (self.zoom * zoom_delta).clamp(0.25, 4.0);

                let scale = rect.height() / world_height * self.zoom;
                if response.dragged() {
                    self.camera_x -= response.drag_delta().x / scale;
                }
                self.camera_x += scroll * SCROLL_SPEED * dt / self.zoom;
                let view_width = rect.width() / scale;
                self.camera_x = self.camera_x.min(world_end - view_width).max(world_start);

                terrain.update(
                    &FrameContext {
                        camera_x: self.camera_x,
                        viewport_width: view_width,
                        dt,
                    },
                    &self.ocean_waves,
                    &self.pollution,
                );

                let to_screen = TSTransform::new(
                    Vec2::new(rect.min.x - self.camera_x * scale, rect.min.y),
                    scale,
                );
                if let Some(ocean) = terrain.ocean() {
                    ocean.surface().paint(&painter, to_screen);
                }
                for chunk in terrain.chunks().iter() {
                    chunk.surface.paint(&painter, to_screen);
                }

                if self.show_collision {
                    let (left, right) = (self.camera_x, self.camera_x + view_width);
                    let stroke = Stroke::new(1.0, Color32::RED);
                    for (_, body) in self.viewer.physics.iter() {
                        let reach = body.size.x.max(body.size.y);
                        if body.position.x + reach < left || body.position.x - reach > right {
                            continue;
                        }
                        let corners = body.corners().map(|p| to_screen.mul_pos(p));
                        painter.add(Shape::closed_line(corners.to_vec(), stroke));
                    }
                }

                let center_x = self.camera_x + view_width / 2.0;
                let region = terrain
                    .region_at(center_x)
                    .map_or("-", |r| r.name.as_str());
                painter.text(
                    rect.left_bottom() + Vec2::new(8.0, -8.0),
                    egui::Align2::LEFT_BOTTOM,
                    format!(
                        "x {:.0} | {} | ground {:.0} | slope {:.2}{}",
                        center_x,
                        region,
                        terrain.height_at(center_x),
                        terrain.slope_at(center_x),
                        if terrain.is_water(center_x) { " | water" } else { "" }
                    ),
                    egui::FontId::monospace(12.0),
                    Color32::BLACK,
                );
            });

        if self.ocean_waves {
            ctx.request_repaint();
        }

        if ctx.input(|i| {
            i.key_pressed(egui::Key::R) && i.modifiers.matches_logically(egui::Modifiers::CTRL)
        }) {
            self.regenerate();
        }
    }
}
