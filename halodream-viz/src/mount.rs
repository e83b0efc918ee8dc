//! Browser entry points
//!
//! Each `mount_*` function looks up its DOM node, builds the effect and hands
//! back a handle that the page's animation loop drives with `frame(dt)`.
//! A missing node or 2D context yields `undefined` and the effect is simply
//! absent from the page.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement};

use crate::accordion::Accordion;
use crate::camera3d::Camera3D;
use crate::canvas2d::Canvas2DRenderer;
use crate::frame::{FrameClock, Viewport};
use crate::grid::{GlyphGrid, GridConfig};
use crate::orbit::{PlanetConfig, PlanetSystem, SpriteSwarm, SwarmConfig};
use crate::particle_field::{ParticleField, ParticleFieldConfig};
use crate::raster::{PointRaster, rasterize_field};
use crate::spotlight::{OVERLAY_PROPERTY, Spotlight, SpotlightConfig};

/// Where the pointer is parked after it leaves the hero, far outside any push radius
const PARKED_POINTER: Vec3 = Vec3::new(1.0e4, 1.0e4, 0.0);

/// Parse an effect config, falling back to defaults on empty or bad input
pub(crate) fn parse_config<T: DeserializeOwned + Default>(effect: &str, json: &str) -> T {
    if json.trim().is_empty() {
        return T::default();
    }
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::warn!(effect, error = %e, "invalid effect config, using defaults");
        T::default()
    })
}

/// CSS transform for a parallax layer
pub(crate) fn translate_css(offset: Vec2) -> String {
    format!("translate({}px, {}px)", offset.x, offset.y)
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn element_by_id(id: &str) -> Option<Element> {
    let element = document()?.get_element_by_id(id);
    if element.is_none() {
        tracing::debug!(id, "mount point not found");
    }
    element
}

fn renderer_for(canvas_id: &str) -> Option<Canvas2DRenderer> {
    let canvas = element_by_id(canvas_id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    match Canvas2DRenderer::new(canvas) {
        Ok(renderer) => Some(renderer),
        Err(e) => {
            tracing::debug!(canvas_id, error = %e, "canvas unavailable");
            None
        }
    }
}

/// Displayed size of an element in CSS pixels
fn client_viewport(element: &Element) -> Viewport {
    Viewport::new(element.client_width() as f32, element.client_height() as f32)
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    element.style().set_property(property, value).ok();
}

/// Hero particle cloud
#[wasm_bindgen]
pub struct ParticleFieldHandle {
    field: ParticleField,
    camera: Camera3D,
    raster: PointRaster,
    renderer: Canvas2DRenderer,
    rng: StdRng,
}

#[wasm_bindgen]
impl ParticleFieldHandle {
    /// Rebuild everything for a new canvas size; zero-sized viewports are ignored
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            return;
        }
        self.renderer.resize(viewport);
        self.camera.resize(viewport);
        self.raster.resize(width as u32, height as u32);
        self.field.regenerate(&mut self.rng);
    }

    /// Pointer position in canvas pixels
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let viewport = self.renderer.viewport();
        if let Some(world) = self.camera.unproject_to_plane(x, y, viewport, 0.0) {
            let anchor = self.field.config.anchor_for(viewport);
            self.field.set_pointer(world - anchor);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.field.park_pointer(PARKED_POINTER);
    }

    /// Whether the last step ran in the explosion regime
    pub fn exploding(&self) -> bool {
        self.field.interaction().exploding
    }

    pub fn frame(&mut self, dt: f32) {
        self.field.tick(dt);

        let viewport = self.renderer.viewport();
        let anchor = self.field.config.anchor_for(viewport);
        rasterize_field(&self.field, &self.camera, anchor, viewport, &mut self.raster);
        if let Err(e) = self.renderer.blit(&mut self.raster) {
            tracing::debug!(error = %e, "particle blit failed");
        }
    }
}

#[wasm_bindgen]
pub fn mount_particle_field(canvas_id: &str, config_json: &str) -> Option<ParticleFieldHandle> {
    let renderer = renderer_for(canvas_id)?;
    let config: ParticleFieldConfig = parse_config("particle_field", config_json);
    let mut rng = StdRng::from_entropy();
    let field = ParticleField::new(config, &mut rng);

    let mut handle = ParticleFieldHandle {
        field,
        camera: Camera3D::new(1.0),
        raster: PointRaster::new(0, 0),
        renderer,
        rng,
    };
    handle.pointer_leave();
    let viewport = client_viewport(handle.renderer.canvas());
    handle.resize(viewport.width, viewport.height);

    tracing::debug!(canvas_id, "mounted particle field");
    Some(handle)
}

/// Background star and moon grid
#[wasm_bindgen]
pub struct GridHandle {
    grid: GlyphGrid,
    renderer: Canvas2DRenderer,
    rng: StdRng,
}

#[wasm_bindgen]
impl GridHandle {
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            return;
        }
        self.renderer.resize(viewport);
        self.grid.layout(viewport, &mut self.rng);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.grid.set_pointer(x, y);
    }

    pub fn pointer_leave(&mut self) {
        self.grid.clear_pointer();
    }

    /// Glyph shapes flip per drawn frame, so `dt` is not used
    pub fn frame(&mut self, _dt: f32) {
        self.renderer.fade(self.grid.config.trail_fade_alpha);
        let visible = self.grid.frame(&mut self.rng);
        self.renderer.render_glyphs(&visible);
    }
}

#[wasm_bindgen]
pub fn mount_grid(canvas_id: &str, config_json: &str) -> Option<GridHandle> {
    let renderer = renderer_for(canvas_id)?;
    let config: GridConfig = parse_config("grid", config_json);
    let mut handle = GridHandle {
        grid: GlyphGrid::new(config),
        renderer,
        rng: StdRng::from_entropy(),
    };
    let viewport = client_viewport(handle.renderer.canvas());
    handle.resize(viewport.width, viewport.height);
    Some(handle)
}

/// Companion section: sprite swarm plus parallax text layers
#[wasm_bindgen]
pub struct CompanionHandle {
    swarm: SpriteSwarm,
    renderer: Canvas2DRenderer,
    clock: FrameClock,
    /// Heading, subheading and button, any of which may be absent
    layers: [Option<HtmlElement>; 3],
    rng: StdRng,
}

#[wasm_bindgen]
impl CompanionHandle {
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            return;
        }
        self.renderer.resize(viewport);
        self.swarm.layout(viewport, &mut self.rng);
        self.clock.reset();
    }

    /// Pointer position relative to the section, in CSS pixels
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.swarm.set_pointer(x, y);
        for (layer, offset) in self.layers.iter().zip(self.swarm.parallax()) {
            if let Some(element) = layer {
                set_style(element, "transform", &translate_css(offset));
            }
        }
    }

    pub fn frame(&mut self, dt: f32) {
        self.clock.drive(dt, &mut self.swarm);
        self.renderer.fade(self.swarm.config.ghost_alpha);
        self.renderer.render_swarm(&self.swarm);
    }
}

#[wasm_bindgen]
pub fn mount_companion(
    section_id: &str,
    canvas_id: &str,
    config_json: &str,
) -> Option<CompanionHandle> {
    let section = element_by_id(section_id)?;
    let renderer = renderer_for(canvas_id)?;
    let config: SwarmConfig = parse_config("companion", config_json);

    let layer = |selector: &str| {
        section
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    };
    let layers = [
        layer(".section-heading"),
        layer(".section-subheading"),
        layer(".button-cta"),
    ];

    let mut handle = CompanionHandle {
        swarm: SpriteSwarm::new(config),
        renderer,
        clock: FrameClock::default(),
        layers,
        rng: StdRng::from_entropy(),
    };
    let viewport = client_viewport(&section);
    handle.resize(viewport.width, viewport.height);
    Some(handle)
}

/// Orbiting planets
#[wasm_bindgen]
pub struct PlanetsHandle {
    system: PlanetSystem,
    renderer: Canvas2DRenderer,
    clock: FrameClock,
    rng: StdRng,
}

#[wasm_bindgen]
impl PlanetsHandle {
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            return;
        }
        self.renderer.resize(viewport);
        self.system.layout(viewport, &mut self.rng);
        self.clock.reset();
    }

    pub fn frame(&mut self, dt: f32) {
        self.clock.drive(dt, &mut self.system);
        self.renderer.fade(self.system.config.ghost_alpha);
        self.renderer.render_planets(&self.system);
    }
}

#[wasm_bindgen]
pub fn mount_planets(canvas_id: &str, config_json: &str) -> Option<PlanetsHandle> {
    let renderer = renderer_for(canvas_id)?;
    let config: PlanetConfig = parse_config("planets", config_json);
    let mut handle = PlanetsHandle {
        system: PlanetSystem::new(config),
        renderer,
        clock: FrameClock::default(),
        rng: StdRng::from_entropy(),
    };
    let viewport = client_viewport(handle.renderer.canvas());
    handle.resize(viewport.width, viewport.height);
    Some(handle)
}

/// FAQ accordion bound to a list of turn elements
#[wasm_bindgen]
pub struct AccordionHandle {
    accordion: Accordion,
    turns: Vec<Element>,
}

#[wasm_bindgen]
impl AccordionHandle {
    pub fn len(&self) -> usize {
        self.accordion.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accordion.is_empty()
    }

    /// Flip turn `index`; `undefined` when out of range
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let expanded = self.accordion.toggle(index)?;
        if let Some(turn) = self.turns.get(index) {
            turn.class_list()
                .toggle_with_force("active", expanded)
                .ok();
        }
        Some(expanded)
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.accordion.is_expanded(index)
    }
}

#[wasm_bindgen]
pub fn mount_accordion(selector: &str) -> Option<AccordionHandle> {
    let nodes = document()?.query_selector_all(selector).ok()?;
    let turns: Vec<Element> = (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect();
    if turns.is_empty() {
        tracing::debug!(selector, "no accordion turns found");
        return None;
    }

    Some(AccordionHandle {
        accordion: Accordion::new(turns.len()),
        turns,
    })
}

/// Footer spotlight reveal
#[wasm_bindgen]
pub struct SpotlightHandle {
    spotlight: Spotlight,
    footer: HtmlElement,
}

#[wasm_bindgen]
impl SpotlightHandle {
    /// Pointer position relative to the footer, in CSS pixels
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.spotlight.pointer_move(x, y);
        self.apply_overlay();
    }

    /// Returns `true` only for the click that lights the footer
    pub fn click(&mut self) -> bool {
        let lit = self.spotlight.click();
        if lit {
            self.footer.class_list().add_1("lit").ok();
            self.apply_overlay();
        }
        lit
    }

    pub fn is_lit(&self) -> bool {
        self.spotlight.mask().is_none()
    }
}

impl SpotlightHandle {
    /// The footer's `::before` overlay paints this property as its background
    fn apply_overlay(&self) {
        match self.spotlight.mask() {
            Some(gradient) => set_style(&self.footer, OVERLAY_PROPERTY, &gradient),
            None => {
                self.footer.style().remove_property(OVERLAY_PROPERTY).ok();
            }
        }
    }
}

#[wasm_bindgen]
pub fn mount_spotlight(footer_id: &str, config_json: &str) -> Option<SpotlightHandle> {
    let footer = element_by_id(footer_id)?
        .dyn_into::<HtmlElement>()
        .ok()?;
    let config: SpotlightConfig = parse_config("spotlight", config_json);
    let handle = SpotlightHandle {
        spotlight: Spotlight::new(config),
        footer,
    };
    handle.apply_overlay();
    Some(handle)
}
