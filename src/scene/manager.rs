use std::collections::HashMap;

use crate::error::SceneError;

use super::{GameContext, Scene, SceneParams, TouchEvent};

/// Builds a fresh scene from explicit construction parameters.
pub type SceneFactory = Box<dyn Fn(SceneParams) -> Box<dyn Scene>>;

/// Owns the single live scene and mediates lifecycle transitions.
///
/// Two states: empty (no scene, all forwarding is a no-op) and active. A
/// switch is atomic from the caller's perspective: the previous scene is
/// destroyed, then the next one is constructed and initialized, all before
/// `switch_to` returns.
pub struct SceneManager {
    registry: HashMap<&'static str, SceneFactory>,
    current: Option<(&'static str, Box<dyn Scene>)>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
            current: None,
        }
    }

    pub fn register(&mut self, name: &'static str, factory: SceneFactory) {
        log::info!("scene registered: {name}");
        let _ = self.registry.insert(name, factory);
    }

    /// Destroys the current scene, then constructs and initializes `name`.
    ///
    /// An unregistered name fails with [`SceneError::NotFound`] and leaves
    /// the manager empty: the previous scene is already gone by the time the
    /// registry is consulted.
    pub fn switch_to(
        &mut self,
        ctx: &mut GameContext,
        name: &str,
        params: SceneParams,
    ) -> Result<(), SceneError> {
        if let Some((old_name, mut scene)) = self.current.take() {
            scene.destroy(ctx);
            log::info!("scene destroyed: {old_name}");
        }

        let (key, factory) =
            self.registry
                .get_key_value(name)
                .ok_or_else(|| SceneError::NotFound {
                    name: name.to_string(),
                })?;
        let key = *key;

        let mut scene = factory(params);
        scene.init(ctx);
        log::info!("scene active: {name}");
        self.current = Some((key, scene));
        Ok(())
    }

    pub fn update(&mut self, ctx: &mut GameContext, dt: f32) {
        if let Some((_, scene)) = &mut self.current {
            scene.update(ctx, dt);
        }
    }

    pub fn render(&mut self, ctx: &mut GameContext) {
        if let Some((_, scene)) = &mut self.current {
            scene.render(ctx);
        }
    }

    pub fn on_touch_start(&mut self, ctx: &mut GameContext, touch: TouchEvent) {
        if let Some((_, scene)) = &mut self.current {
            scene.on_touch_start(ctx, touch);
        }
    }

    pub fn on_touch_move(&mut self, ctx: &mut GameContext, touch: TouchEvent) {
        if let Some((_, scene)) = &mut self.current {
            scene.on_touch_move(ctx, touch);
        }
    }

    pub fn on_touch_end(&mut self, ctx: &mut GameContext, touch: TouchEvent) {
        if let Some((_, scene)) = &mut self.current {
            scene.on_touch_end(ctx, touch);
        }
    }

    pub fn current_scene_name(&self) -> Option<&str> {
        self.current.as_ref().map(|(name, _)| *name)
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}
