use orbit_engine::{
    Stage, StageConfig, StageContext,
    InputEvent, InputQueue, RenderBuffer,
    FrameClock, ProtocolLayout,
};
use orbit_engine::systems::render::build_render_buffer;

/// Generic stage runner that wires up the frame loop.
///
/// Each concrete stage (e.g., `card-orbit`) creates a `thread_local!`
/// StageRunner and exports free functions via `#[wasm_bindgen]`, because
/// wasm-bindgen cannot export generic structs directly.
pub struct StageRunner<S: Stage> {
    stage: S,
    ctx: StageContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    clock: FrameClock,
    config: StageConfig,
    layout: ProtocolLayout,
    /// Header, instances and events, as laid out by `layout`.
    shared: Vec<f32>,
    initialized: bool,
}

impl<S: Stage> StageRunner<S> {
    pub fn new(stage: S, seed: u64) -> Self {
        let config = stage.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            stage,
            ctx: StageContext::new(&config, seed),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::new(config.max_instances),
            clock: FrameClock::new(config.max_dt),
            shared: layout.allocate(),
            layout,
            config,
            initialized: false,
        }
    }

    /// Initialize the stage. Call once after construction.
    pub fn init(&mut self) {
        self.stage.init(&mut self.ctx);
        build_render_buffer(&self.ctx.scene, &mut self.render_buffer);
        self.publish();
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: advance the clock, update the stage, rebuild the render buffer.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        for event in self.input.iter() {
            if let InputEvent::Resize { width, height } = *event {
                self.ctx.camera.resize(width, height);
            }
        }

        self.ctx.now = self.clock.advance(dt);
        self.stage.update(&mut self.ctx, &self.input);

        // Drain input after update
        self.input.drain();

        build_render_buffer(&self.ctx.scene, &mut self.render_buffer);

        if self.ctx.events.len() > self.layout.max_events {
            log::warn!(
                "{} events this frame, dropping all but {}",
                self.ctx.events.len(),
                self.layout.max_events
            );
            self.ctx.events.truncate(self.layout.max_events);
        }
        self.publish();
    }

    fn publish(&mut self) {
        self.layout.publish(
            &mut self.shared,
            self.clock.frames(),
            self.clock.now(),
            &self.render_buffer,
            &self.ctx.events,
        );
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    // ---- SharedArrayBuffer reads ----

    /// Start of the published frame: header, then instances, then events.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.shared.as_ptr()
    }

    pub fn shared(&self) -> &[f32] {
        &self.shared
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn viewport_width(&self) -> f32 {
        self.ctx.camera.viewport.x
    }

    /// Camera view-projection matrix, column-major.
    pub fn view_projection(&self) -> [f32; 16] {
        self.ctx.camera.view_projection().to_cols_array()
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }
}
