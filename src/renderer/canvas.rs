//! Canvas 2D backend

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::palette::{to_css, with_alpha};
use super::shapes::{DrawCommand, DrawList};

pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// CSS pixel size
    size: (f64, f64),
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let size = (canvas.client_width() as f64, canvas.client_height() as f64);
        Ok(Self { canvas, ctx, size })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Match the backing store to the element size at `dpr`
    pub fn resize(&mut self, css_width: f64, css_height: f64, dpr: f64) -> Result<(), JsValue> {
        self.size = (css_width, css_height);
        self.canvas.set_width((css_width * dpr) as u32);
        self.canvas.set_height((css_height * dpr) as u32);
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
    }

    /// Clear and paint a frame
    pub fn paint(&self, list: &DrawList) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, self.size.0, self.size.1);
        ctx.set_line_cap("round");

        for command in &list.commands {
            match command {
                DrawCommand::Dots {
                    centers,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&to_css(*color));
                    ctx.begin_path();
                    for c in centers {
                        ctx.move_to(c.x as f64 + *radius as f64, c.y as f64);
                        ctx.arc(c.x as f64, c.y as f64, *radius as f64, 0.0, TAU)?;
                    }
                    ctx.fill();
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&to_css(*color));
                    ctx.begin_path();
                    ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        radius.max(0.0) as f64,
                        0.0,
                        TAU,
                    )?;
                    ctx.fill();
                }
                DrawCommand::Lines {
                    segments,
                    width,
                    color,
                } => {
                    ctx.set_stroke_style_str(&to_css(*color));
                    ctx.set_line_width(*width as f64);
                    ctx.begin_path();
                    for (a, b) in segments {
                        ctx.move_to(a.x as f64, a.y as f64);
                        ctx.line_to(b.x as f64, b.y as f64);
                    }
                    ctx.stroke();
                }
                DrawCommand::Streak {
                    from,
                    to,
                    width,
                    color,
                } => {
                    let gradient = ctx.create_linear_gradient(
                        from.x as f64,
                        from.y as f64,
                        to.x as f64,
                        to.y as f64,
                    );
                    gradient.add_color_stop(0.0, &to_css(with_alpha(*color, 0.0)))?;
                    gradient.add_color_stop(1.0, &to_css(*color))?;
                    ctx.set_stroke_style_canvas_gradient(&gradient);
                    ctx.set_line_width(*width as f64);
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.stroke();
                }
                DrawCommand::Glyph {
                    at,
                    text,
                    size,
                    alpha,
                } => {
                    ctx.set_global_alpha(*alpha as f64);
                    ctx.set_font(&format!("{}px sans-serif", size));
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                    ctx.fill_text(text, at.x as f64, at.y as f64)?;
                    ctx.set_global_alpha(1.0);
                }
            }
        }
        Ok(())
    }
}
