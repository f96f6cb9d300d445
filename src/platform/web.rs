//! Browser platform glue
//!
//! JS owns the canvas and the animation frame loop; it forwards key events
//! and frame deltas here and paints the returned draw commands.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::embed::{self, DemoHandle, DemoRuntime, EmbedError, EmbedManifest};
use crate::highscores::GameId;
use crate::input::KeyState;
use crate::persistence::{KeyValueStore, Result, StoreError};
use crate::session::{Screen, open_screen};
use crate::settings::Settings;

pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Browser LocalStorage
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage".to_string()))?;
        Ok(Self { storage })
    }
}

fn js_error(e: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{e:?}"))
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Retro Arcade loaded");
}

/// One game screen driven from JS
#[wasm_bindgen]
pub struct WebArcade {
    screen: Box<dyn Screen>,
}

#[wasm_bindgen]
impl WebArcade {
    /// `game` is a catalog name such as "maze" or "tetris"
    #[wasm_bindgen(constructor)]
    pub fn new(game: &str) -> std::result::Result<WebArcade, JsValue> {
        let game: GameId = game.parse().map_err(|e| JsValue::from_str(&format!("{e}")))?;
        let settings = Settings::load();
        let store = LocalStore::open().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let seed = super::seed(&settings);
        log::info!("{game} initialized with seed: {seed}");
        Ok(Self {
            screen: open_screen(game, &settings, store, seed),
        })
    }

    /// Returns whether the key is bound (so JS can preventDefault)
    pub fn key_down(&mut self, key: &str) -> bool {
        self.screen.key(key, KeyState::Down)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.screen.key(key, KeyState::Up)
    }

    /// Advance by a frame delta in milliseconds; returns ticks run
    pub fn frame(&mut self, dt_ms: f64) -> u32 {
        self.screen.frame((dt_ms / 1000.0) as f32)
    }

    /// Draw commands for the current frame as JSON
    pub fn draw(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.screen.draw()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn snapshot(&self) -> std::result::Result<String, JsValue> {
        self.screen
            .snapshot_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn score(&self) -> f64 {
        self.screen.score() as f64
    }

    pub fn best(&self) -> f64 {
        self.screen.best() as f64
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.screen.phase())
    }

    /// Idle/demo mode
    pub fn set_autopilot(&mut self, on: bool) {
        self.screen.set_autopilot(on);
        log::info!("Idle mode: {on}");
    }

    pub fn restart(&mut self) {
        self.screen.restart();
    }
}

/// The parallax demo's `window.demoquest` object
pub struct JsDemoRuntime {
    window: web_sys::Window,
    demo: JsValue,
}

fn runtime_error(context: &str, e: JsValue) -> EmbedError {
    EmbedError::Runtime(format!("{context}: {e:?}"))
}

impl JsDemoRuntime {
    /// Requires the demo scripts to have been loaded already
    pub fn from_window() -> std::result::Result<Self, EmbedError> {
        let window = web_sys::window().ok_or_else(|| EmbedError::Runtime("no window".to_string()))?;
        let demo = Reflect::get(&window, &JsValue::from_str("demoquest"))
            .map_err(|e| runtime_error("demoquest", e))?;
        if demo.is_undefined() || demo.is_null() {
            return Err(EmbedError::Runtime("demoquest is not loaded".to_string()));
        }
        Ok(Self { window, demo })
    }

    fn call(&self, name: &str, args: &Array) -> std::result::Result<JsValue, EmbedError> {
        let f: Function = Reflect::get(&self.demo, &JsValue::from_str(name))
            .map_err(|e| runtime_error(name, e))?
            .dyn_into()
            .map_err(|e| runtime_error(name, e))?;
        f.apply(&self.demo, args).map_err(|e| runtime_error(name, e))
    }

    fn has(&self, name: &str) -> bool {
        Reflect::get(&self.demo, &JsValue::from_str(name))
            .map(|f| f.is_function())
            .unwrap_or(false)
    }
}

impl DemoRuntime for JsDemoRuntime {
    fn configure(&mut self, mount: &str, media_base: &str) -> std::result::Result<(), EmbedError> {
        Reflect::set(
            &self.window,
            &JsValue::from_str("DEMOQUEST_MEDIA_BASE_PATH"),
            &JsValue::from_str(media_base),
        )
        .map_err(|e| runtime_error("media path", e))?;

        let element = self
            .window
            .document()
            .and_then(|d| d.get_element_by_id(mount))
            .ok_or_else(|| EmbedError::Runtime(format!("no element #{mount}")))?;
        let element: JsValue = element.into();
        self.call("configure", &Array::of1(&element))?;
        Ok(())
    }

    fn resize(&mut self) {
        if let Err(e) = self.call("resize", &Array::new()) {
            log::warn!("Demo resize failed: {e}");
        }
    }

    fn teardown(&mut self) {
        // Older builds of the demo have no teardown entry point
        if self.has("teardown")
            && let Err(e) = self.call("teardown", &Array::new())
        {
            log::warn!("Demo teardown failed: {e}");
        }
    }
}

/// Handle to the embedded demo for JS; dropping it (or `free()`) tears down
#[wasm_bindgen]
pub struct WebDemo {
    handle: DemoHandle<JsDemoRuntime>,
}

#[wasm_bindgen]
impl WebDemo {
    /// `loaded` lists the asset URLs whose load events fired
    pub fn init(mount: &str, base_path: &str, loaded: Vec<String>) -> std::result::Result<WebDemo, JsValue> {
        let manifest = EmbedManifest::new(base_path);
        let assets = |path: &str| loaded.iter().any(|l| l.ends_with(path));
        let to_js = |e: EmbedError| JsValue::from_str(&e.to_string());
        let runtime = JsDemoRuntime::from_window().map_err(|e| {
            log::error!("Failed to load demo: {e}");
            to_js(e)
        })?;
        let handle = embed::init(runtime, &manifest, &assets, mount).map_err(to_js)?;
        Ok(Self { handle })
    }

    pub fn resize(&mut self) -> std::result::Result<(), JsValue> {
        self.handle
            .resize()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
