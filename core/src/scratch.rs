use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Handle for one scratchable visual object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

/// What the visual layer tells the engine about a scratchable object.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScratchSurface {
    pub id: SurfaceId,
    pub bounds: Bounds,
    pub texture: Px2,
}

impl ScratchSurface {
    pub fn new(id: SurfaceId, bounds: Bounds, texture: Px2) -> Result<Self> {
        if texture.0 == 0 || texture.1 == 0 {
            return Err(GameError::InvalidGeometry);
        }
        Ok(Self {
            id,
            bounds,
            texture,
        })
    }

    /// Pixel that `point` lands on, may be outside the texture.
    pub fn pixel_at(&self, point: Vec2) -> (i64, i64) {
        let uv = self.bounds.normalize(point);
        (
            (uv.x * self.texture.0 as f32).round() as i64,
            (uv.y * self.texture.1 as f32).round() as i64,
        )
    }

    /// Converts a world-space brush size into pixels on this texture.
    pub fn brush_radius(&self, brush_size_world: f32) -> Px {
        let pixels_per_unit = self.texture.0 as f32 / self.bounds.size().x;
        let radius = (brush_size_world * pixels_per_unit).round();
        if radius > 0.0 { radius as Px } else { 0 }
    }
}

/// Sent to observers after every stroke.
#[derive(Copy, Clone, Debug)]
pub struct MaskUpdate<'a> {
    pub surface: SurfaceId,
    pub mask: &'a ScratchMask,
    /// World-space bounds of the whole mask.
    pub bounds: Bounds,
}

pub trait MaskObserver {
    fn mask_updated(&mut self, update: &MaskUpdate<'_>);
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// Summary of one applied stroke.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    pub surface: SurfaceId,
    pub center: (i64, i64),
    pub radius: Px,
    pub changed: usize,
}

/// Owns every mask and turns pointer samples into erase strokes.
#[derive(Clone, Debug)]
pub struct ScratchEngine {
    brush_size_world: f32,
    surfaces: Vec<ScratchSurface>,
    masks: HashMap<SurfaceId, ScratchMask>,
    pointer: Option<Vec2>,
}

impl ScratchEngine {
    pub fn new(brush_size_world: f32) -> Self {
        Self {
            brush_size_world,
            surfaces: Vec::new(),
            masks: HashMap::new(),
            pointer: None,
        }
    }

    /// Adds a surface, replacing any previous one with the same id.
    pub fn register(&mut self, surface: ScratchSurface) {
        self.masks.remove(&surface.id);
        match self.surfaces.iter_mut().find(|s| s.id == surface.id) {
            Some(existing) => *existing = surface,
            None => self.surfaces.push(surface),
        }
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&ScratchSurface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    pub fn surfaces(&self) -> &[ScratchSurface] {
        &self.surfaces
    }

    /// Mask for `id`, `None` until the surface has been scratched at least once this round.
    pub fn mask(&self, id: SurfaceId) -> Option<&ScratchMask> {
        self.masks.get(&id)
    }

    pub fn brush_size_world(&self) -> f32 {
        self.brush_size_world
    }

    pub fn is_pressed(&self) -> bool {
        self.pointer.is_some()
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(pos) => self.pointer = Some(pos),
            PointerEvent::Move(pos) => {
                if self.pointer.is_some() {
                    self.pointer = Some(pos);
                }
            }
            PointerEvent::Up => self.pointer = None,
        }
    }

    /// Applies at most one stroke at the current pointer position while it is held down.
    pub fn tick(&mut self, observer: &mut dyn MaskObserver) -> Option<Stroke> {
        let pos = self.pointer?;
        self.stroke_at(pos, observer)
    }

    /// Erases a brush-sized circle on the topmost surface under `pos` and notifies `observer`.
    pub fn stroke_at(&mut self, pos: Vec2, observer: &mut dyn MaskObserver) -> Option<Stroke> {
        let surface = *self.surfaces.iter().rev().find(|s| s.bounds.contains(pos))?;

        let center = surface.pixel_at(pos);
        let radius = surface.brush_radius(self.brush_size_world);

        let mask = self
            .masks
            .entry(surface.id)
            .or_insert_with(|| ScratchMask::opaque(surface.texture));
        let changed = mask.erase_circle(center, radius);

        log::trace!(
            "stroke on {:?} at {:?} r={} cleared {}",
            surface.id,
            center,
            radius,
            changed
        );

        observer.mask_updated(&MaskUpdate {
            surface: surface.id,
            mask,
            bounds: surface.bounds,
        });

        Some(Stroke {
            surface: surface.id,
            center,
            radius,
            changed,
        })
    }

    /// Drops every mask; surfaces get fresh opaque masks on their next stroke.
    pub fn reset(&mut self) {
        self.masks.clear();
        self.pointer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(SurfaceId, u64)>);

    impl MaskObserver for Recorder {
        fn mask_updated(&mut self, update: &MaskUpdate<'_>) {
            self.0
                .push((update.surface, update.mask.total_coverage().revealed));
        }
    }

    fn surface(id: u32, x0: f32, y0: f32, x1: f32, y1: f32, texture: Px2) -> ScratchSurface {
        let bounds = Bounds::new(Vec2::new(x0, y0), Vec2::new(x1, y1)).unwrap();
        ScratchSurface::new(SurfaceId(id), bounds, texture).unwrap()
    }

    #[test]
    fn maps_world_position_and_brush_to_pixels() {
        let s = surface(0, 0.0, 0.0, 2.0, 1.0, (200, 100));

        assert_eq!(s.pixel_at(Vec2::new(1.0, 0.5)), (100, 50));
        assert_eq!(s.brush_radius(0.2), 20);
        assert_eq!(s.brush_radius(0.0), 0);
    }

    #[test]
    fn stroke_outside_all_surfaces_is_ignored() {
        let mut engine = ScratchEngine::new(0.2);
        engine.register(surface(0, 0.0, 0.0, 1.0, 1.0, (10, 10)));
        let mut recorder = Recorder::default();

        let stroke = engine.stroke_at(Vec2::new(5.0, 5.0), &mut recorder);

        assert!(stroke.is_none());
        assert!(recorder.0.is_empty());
        assert!(engine.mask(SurfaceId(0)).is_none());
    }

    #[test]
    fn stroke_allocates_mask_and_notifies() {
        let mut engine = ScratchEngine::new(0.1);
        engine.register(surface(3, 0.0, 0.0, 1.0, 1.0, (10, 10)));
        let mut recorder = Recorder::default();

        let stroke = engine.stroke_at(Vec2::new(0.5, 0.5), &mut recorder).unwrap();

        assert_eq!(stroke.center, (5, 5));
        assert_eq!(stroke.radius, 1);
        assert_eq!(recorder.0, vec![(SurfaceId(3), stroke.changed as u64)]);
        assert!(engine.mask(SurfaceId(3)).unwrap().is_revealed_at((5, 5)));
    }

    #[test]
    fn pointer_drives_strokes_only_while_pressed() {
        let mut engine = ScratchEngine::new(0.1);
        engine.register(surface(0, 0.0, 0.0, 1.0, 1.0, (10, 10)));
        let mut noop = Recorder::default();

        engine.handle_pointer(PointerEvent::Move(Vec2::new(0.5, 0.5)));
        assert!(engine.tick(&mut noop).is_none());

        engine.handle_pointer(PointerEvent::Down(Vec2::new(0.2, 0.2)));
        engine.handle_pointer(PointerEvent::Move(Vec2::new(0.8, 0.8)));
        let stroke = engine.tick(&mut noop).unwrap();
        assert_eq!(stroke.center, (8, 8));

        engine.handle_pointer(PointerEvent::Up);
        assert!(engine.tick(&mut noop).is_none());
    }

    #[test]
    fn topmost_surface_wins_and_reset_drops_masks() {
        let mut engine = ScratchEngine::new(0.1);
        engine.register(surface(0, 0.0, 0.0, 2.0, 2.0, (20, 20)));
        engine.register(surface(1, 0.5, 0.5, 1.5, 1.5, (10, 10)));
        let mut noop = Recorder::default();

        let stroke = engine.stroke_at(Vec2::new(1.0, 1.0), &mut noop).unwrap();
        assert_eq!(stroke.surface, SurfaceId(1));

        engine.reset();
        assert!(engine.mask(SurfaceId(1)).is_none());
        assert!(!engine.is_pressed());
    }

    #[test]
    fn zero_sized_texture_is_rejected() {
        let bounds = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)).unwrap();
        assert_eq!(
            ScratchSurface::new(SurfaceId(0), bounds, (0, 10)),
            Err(GameError::InvalidGeometry)
        );
    }
}
