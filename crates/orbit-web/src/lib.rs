pub mod runner;

pub use orbit_engine;
pub use runner::StageRunner;

/// Generate all `#[wasm_bindgen]` exports for a stage.
///
/// Generates:
/// - `thread_local!` storage for the StageRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (stage_init, stage_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod stage;
/// use stage::CardOrbit;
///
/// orbit_web::export_stage!(CardOrbit, "card-orbit");
/// ```
///
/// # Arguments
///
/// - `$stage_type`: The stage struct type; implements `orbit_engine::Stage` and has `new()`
/// - `$stage_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_stage {
    ($stage_type:ty, $stage_name:literal) => {
        use std::cell::RefCell;
        use $crate::orbit_engine::InputEvent;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::StageRunner<$stage_type>>> = RefCell::new(None);
        }

        /// `None` until `stage_init()` has run.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::StageRunner<$stage_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: not initialized, call stage_init() first", $stage_name);
                        None
                    }
                }
            })
        }

        #[wasm_bindgen]
        pub fn stage_init(seed: u32) {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let stage = <$stage_type>::new();
            let runner = $crate::StageRunner::new(stage, seed as u64);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $stage_name);
        }

        #[wasm_bindgen]
        pub fn stage_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn stage_pointer_click(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerClick { x, y }));
        }

        /// Menu selection; a negative id clears it.
        #[wasm_bindgen]
        pub fn stage_menu_select(id: i32) {
            let id = u32::try_from(id).ok();
            with_runner(|r| r.push_input(InputEvent::MenuSelect { id }));
        }

        #[wasm_bindgen]
        pub fn stage_cycle(backwards: bool) {
            with_runner(|r| r.push_input(InputEvent::Cycle { backwards }));
        }

        #[wasm_bindgen]
        pub fn stage_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn stage_resize(width: f32, height: f32) {
            with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_buffer_ptr() -> *const f32 {
            with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_events_len() -> u32 {
            with_runner(|r| r.events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_view_projection() -> Vec<f32> {
            with_runner(|r| r.view_projection().to_vec()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_time() -> f32 {
            with_runner(|r| r.now()).unwrap_or(0.0)
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
        }
    };
}
