//! Ordered, single-threaded tick driver.

use crate::input::InputDevice;
use crate::session::Session;
use crate::systems;

/// One step of the per-tick pipeline.
///
/// Systems run to completion in registration order and never fail: bad input
/// is coerced, not reported.
pub trait System {
    fn name(&self) -> &str;

    fn run(&mut self, session: &mut Session, input: &dyn InputDevice);
}

/// Adapter turning a closure into a [`System`].
pub struct FnSystem<F> {
    name: String,
    f: F,
}

impl<F> FnSystem<F>
where
    F: FnMut(&mut Session, &dyn InputDevice),
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut Session, &dyn InputDevice),
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, session: &mut Session, input: &dyn InputDevice) {
        (self.f)(session, input);
    }
}

/// Drives a fixed list of systems once per tick.
#[derive(Default)]
pub struct FrameClock {
    systems: Vec<Box<dyn System>>,
    ticks: u64,
}

impl FrameClock {
    /// Create an empty clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// The game's standard order: input, zoom, movement, animation,
    /// proximity triggers, camera, cursor hover. The cursor runs last so its
    /// hover box uses this tick's camera.
    pub fn standard() -> Self {
        let mut clock = Self::new();
        clock.add_system(systems::SampleInput);
        clock.add_system(systems::ApplyZoom);
        clock.add_system(systems::ResolveMovement);
        clock.add_system(systems::AnimatePlayer);
        clock.add_system(systems::ProximityTriggers);
        clock.add_system(systems::FollowPointer);
        clock.add_system(systems::CursorHover);
        clock
    }

    /// Append a system; it runs after every system registered before it.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> &mut Self {
        self.systems.push(Box::new(system));
        self
    }

    /// Append a closure as a system.
    pub fn add_fn<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: FnMut(&mut Session, &dyn InputDevice) + 'static,
    {
        self.add_system(FnSystem::new(name, f))
    }

    /// Run every system once, in order.
    pub fn tick(&mut self, session: &mut Session, input: &dyn InputDevice) {
        session.begin_tick();
        for system in &mut self.systems {
            system.run(session, input);
        }
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
