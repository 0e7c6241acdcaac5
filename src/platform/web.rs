//! Browser bindings: canvas 2D drawing, pooled `<audio>` playback and DOM
//! lookups.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlAudioElement, HtmlCanvasElement, HtmlImageElement,
    TouchList, Window,
};

use crate::Viewport;
use crate::audio::{AudioSink, SoundEffect, Voice, first_idle};
use crate::input::TouchPoint;
use crate::render::{DrawSurface, Sprite};
use crate::settings::GameConfig;

const SPRITES: [Sprite; 5] = [
    Sprite::Ship,
    Sprite::Bullet,
    Sprite::Asteroid,
    Sprite::Explosion,
    Sprite::Background,
];

/// Id of the optional JSON config block in the host page
pub const CONFIG_ELEMENT_ID: &str = "blastroids-config";

/// Window size in CSS pixels
pub fn window_viewport(window: &Window) -> Viewport {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    Viewport::new(width, height)
}

/// Text of the config block, if the page has one
pub fn config_json(document: &Document) -> Option<String> {
    document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
}

/// Changed touches of an event, in client coordinates
pub fn touch_points(list: &TouchList) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| TouchPoint {
            id: t.identifier(),
            x: t.client_x() as f32,
            y: t.client_y() as f32,
        })
        .collect()
}

pub fn canvas_by_id(document: &Document, id: &str) -> Result<HtmlCanvasElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("no #{id} element")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not a canvas")))
}

/// Match the canvas backing store to the viewport
pub fn fit_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
    canvas.set_width(viewport.width as u32);
    canvas.set_height(viewport.height as u32);
}

/// [`DrawSurface`] over a canvas 2D context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    images: HashMap<Sprite, HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement, document: &Document) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut images = HashMap::new();
        for sprite in SPRITES {
            match document
                .get_element_by_id(sprite.element_id())
                .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
            {
                Some(img) => {
                    images.insert(sprite, img);
                }
                None => log::warn!("No <img id=\"{}\"> in page", sprite.element_id()),
            }
        }

        Ok(Self { ctx, images })
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        match self.ctx.canvas() {
            Some(canvas) => (f64::from(canvas.width()), f64::from(canvas.height())),
            None => (0.0, 0.0),
        }
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        let _ = self.ctx.translate(x, y);
    }

    fn rotate(&mut self, angle: f64) {
        let _ = self.ctx.rotate(angle);
    }

    fn scale(&mut self, x: f64, y: f64) {
        let _ = self.ctx.scale(x, y);
    }

    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64, w: f64, h: f64) -> bool {
        let Some(img) = self.images.get(&sprite) else {
            return false;
        };
        if !img.complete() {
            return false;
        }
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)
            .is_ok()
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) {
        self.ctx.set_text_baseline("top");
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU);
        self.ctx.stroke();
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(x, y, w, h);
    }
}

/// Plays effects from pools of `<audio>` children, one container per effect
pub struct DomAudio {
    document: Document,
    /// Zero when muted
    volume: f64,
}

impl DomAudio {
    pub fn new(document: Document, config: &GameConfig) -> Self {
        Self {
            document,
            volume: config.effective_volume(),
        }
    }

    /// `<audio>` children of the effect's container, busy ones included
    fn players(&self, effect: SoundEffect) -> Vec<Option<HtmlAudioElement>> {
        let Some(container) = self.document.get_element_by_id(effect.element_id()) else {
            log::debug!("No element for sound {:?}", effect);
            return Vec::new();
        };
        let children = container.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(|el| el.dyn_into::<HtmlAudioElement>().ok())
            .collect()
    }
}

impl AudioSink for DomAudio {
    fn play(&mut self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let players = self.players(effect);
        let voices: Vec<Voice> = players
            .iter()
            .map(|p| match p {
                Some(audio) => Voice {
                    is_audio: true,
                    current_time: audio.current_time(),
                    ended: audio.ended(),
                },
                None => Voice {
                    is_audio: false,
                    current_time: 0.0,
                    ended: false,
                },
            })
            .collect();

        let Some(audio) = first_idle(&voices).and_then(|i| players[i].as_ref()) else {
            log::trace!("All {:?} players busy", effect);
            return;
        };
        audio.set_volume(self.volume);
        if audio.ended() {
            audio.set_current_time(0.0);
        }
        // Autoplay may be refused until the first user gesture
        let _ = audio.play();
    }
}
