//! Terminal renderer for simulation draw commands.
//!
//! The simulation works in pixels; here a pixel is one braille dot, so a
//! terminal cell is 2 pixels wide and 4 tall. Debris lives in world space
//! measured in cells, centered on the screen with y up.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Circle, Context, Line, Points},
    },
};
use snowdrift_sim::{DrawCommand, Vec3};

/// Braille dots per cell horizontally.
pub const DOTS_PER_CELL_X: u32 = 2;
/// Braille dots per cell vertically.
pub const DOTS_PER_CELL_Y: u32 = 4;

/// Simulation surface size in pixels for a terminal area.
pub fn surface_size(area: Rect) -> (u32, u32) {
    (
        area.width as u32 * DOTS_PER_CELL_X,
        area.height as u32 * DOTS_PER_CELL_Y,
    )
}

/// Mapping between terminal cells, world space and canvas coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    columns: f64,
    rows: f64,
}

impl Projection {
    pub fn new(area: Rect) -> Self {
        Self {
            columns: area.width as f64,
            rows: area.height as f64,
        }
    }

    /// World position of the top-left corner of a cell.
    pub fn cell_to_world(&self, x: u16, y: u16) -> Vec3 {
        Vec3::new(
            (x as f64 - self.columns / 2.0) as f32,
            (self.rows / 2.0 - y as f64) as f32,
            0.0,
        )
    }

    /// Canvas point for a world position. Depth is dropped: at braille
    /// resolution an orthographic view is indistinguishable.
    pub fn world_to_canvas(&self, p: Vec3) -> (f64, f64) {
        (
            (p.x as f64 + self.columns / 2.0) * DOTS_PER_CELL_X as f64,
            (p.y as f64 + self.rows / 2.0) * DOTS_PER_CELL_Y as f64,
        )
    }

    fn height_px(&self) -> f64 {
        self.rows * DOTS_PER_CELL_Y as f64
    }

    fn width_px(&self) -> f64 {
        self.columns * DOTS_PER_CELL_X as f64
    }

    /// Canvas point for a surface pixel (canvas y grows up).
    fn pixel_to_canvas(&self, x: f32, y: f32) -> (f64, f64) {
        (x as f64, self.height_px() - y as f64)
    }
}

/// Widget that replays one frame of draw commands on a braille canvas.
pub struct SceneWidget<'a> {
    commands: &'a [DrawCommand],
}

impl<'a> SceneWidget<'a> {
    pub fn new(commands: &'a [DrawCommand]) -> Self {
        Self { commands }
    }
}

impl Widget for SceneWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let projection = Projection::new(area);
        let commands = self.commands;

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, projection.width_px()])
            .y_bounds([0.0, projection.height_px()])
            .paint(|ctx| {
                for command in commands {
                    paint_command(ctx, &projection, command);
                }
            })
            .render(area, buf);
    }
}

fn paint_command(ctx: &mut Context, projection: &Projection, command: &DrawCommand) {
    let color: Color = command.color().into();

    match command {
        DrawCommand::FillPath { outline, .. } => {
            // Outlines are closed along the baseline, so vertical spans from
            // the bottom edge up to each vertex fill the region.
            for &(x, y) in outline {
                let (cx, cy) = projection.pixel_to_canvas(x, y);
                if cy > 0.5 {
                    ctx.draw(&Line::new(cx, 0.0, cx, cy, color));
                }
            }
        }
        DrawCommand::FillCircle { x, y, radius, .. } => {
            let (cx, cy) = projection.pixel_to_canvas(*x, *y);
            ctx.draw(&Circle {
                x: cx,
                y: cy,
                radius: *radius as f64,
                color,
            });
        }
        DrawCommand::Sphere { position, .. } => {
            // A single dot: rotation has no visible effect at this size.
            let point = projection.world_to_canvas(*position);
            ctx.draw(&Points {
                coords: &[point],
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowdrift_core::Rgb;

    #[test]
    fn test_surface_size() {
        assert_eq!(surface_size(Rect::new(0, 0, 80, 24)), (160, 96));
    }

    #[test]
    fn test_cell_world_canvas_mapping() {
        let p = Projection::new(Rect::new(0, 0, 80, 24));
        let center = p.cell_to_world(40, 12);
        assert_eq!(center, Vec3::ZERO);
        assert_eq!(p.world_to_canvas(center), (80.0, 48.0));

        let top_left = p.cell_to_world(0, 0);
        assert_eq!(top_left, Vec3::new(-40.0, 12.0, 0.0));
        assert_eq!(p.world_to_canvas(top_left), (0.0, 96.0));
    }

    #[test]
    fn test_pixel_to_canvas_flips_y() {
        let p = Projection::new(Rect::new(0, 0, 10, 5));
        assert_eq!(p.pixel_to_canvas(3.0, 20.0), (3.0, 0.0));
        assert_eq!(p.pixel_to_canvas(3.0, 0.0), (3.0, 20.0));
    }

    #[test]
    fn test_scene_paints_pile() {
        let area = Rect::new(0, 0, 4, 2);
        let commands = vec![DrawCommand::FillPath {
            outline: snowdrift_sim::surface_outline(&[4.0; 8], 8.0, 8.0),
            color: Rgb::WHITE,
        }];
        let mut buf = Buffer::empty(area);
        SceneWidget::new(&commands).render(area, &mut buf);

        let bottom: String = (0..4).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(bottom.chars().all(|c| c != ' '), "bottom row empty: {bottom:?}");
    }

    #[test]
    fn test_sphere_ignores_rotation() {
        let area = Rect::new(0, 0, 10, 6);
        let render = |rotation: Vec3| {
            let commands = vec![DrawCommand::Sphere {
                position: Vec3::new(1.0, 1.0, 0.5),
                rotation,
                radius: 0.1,
                color: Rgb::GREEN,
            }];
            let mut buf = Buffer::empty(area);
            SceneWidget::new(&commands).render(area, &mut buf);
            buf
        };

        let still = render(Vec3::ZERO);
        assert_eq!(still, render(Vec3::new(1.2, -0.4, 3.0)));
        assert!(still.content().iter().any(|cell| cell.fg == Color::Rgb(0, 255, 0)));
    }
}
