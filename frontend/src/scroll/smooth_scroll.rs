//! Eased interpolation of the page scroll offset towards a target.
//!
//! Pure state: the controller feeds it input deltas and frame deltas and
//! writes the resulting position to the host.

pub type Easing = fn(f64) -> f64;

/// Exponential ease-out used for all smooth scrolling.
pub fn default_easing(t: f64) -> f64 {
    (1.001 - 2f64.powf(-10.0 * t)).min(1.0)
}

// WheelEvent.deltaMode values.
const DOM_DELTA_LINE: u32 = 1;
const DOM_DELTA_PAGE: u32 = 2;
const LINE_HEIGHT_PX: f64 = 100.0 / 6.0;

/// Converts a wheel delta in any `deltaMode` to pixels.
pub fn wheel_delta_px(delta: f64, delta_mode: u32, viewport_height: f64) -> f64 {
    match delta_mode {
        DOM_DELTA_LINE => delta * LINE_HEIGHT_PX,
        DOM_DELTA_PAGE => delta * viewport_height,
        _ => delta,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Wheel,
    Touch,
}

#[derive(Debug, Clone, Copy)]
pub struct SmoothScrollOptions {
    pub duration_secs: f64,
    pub easing: Easing,
    pub wheel_multiplier: f64,
    pub touch_multiplier: f64,
    pub infinite: bool,
}

impl Default for SmoothScrollOptions {
    fn default() -> Self {
        Self {
            duration_secs: 1.2,
            easing: default_easing,
            wheel_multiplier: 1.0,
            touch_multiplier: 1.5,
            infinite: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f64,
    to: f64,
    duration_ms: f64,
    elapsed_ms: f64,
    easing: Easing,
}

impl Tween {
    fn value(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * (self.easing)(t)
    }

    fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

#[derive(Debug, Clone)]
pub struct SmoothScroll {
    options: SmoothScrollOptions,
    position: f64,
    target: f64,
    limit: f64,
    stopped: bool,
    tween: Option<Tween>,
}

impl SmoothScroll {
    pub fn new(options: SmoothScrollOptions, position: f64, limit: f64) -> Self {
        let limit = limit.max(0.0);
        let mut engine = Self {
            options,
            position,
            target: position,
            limit,
            stopped: false,
            tween: None,
        };
        engine.position = engine.normalize(position);
        engine.target = engine.position;
        engine
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        if !self.options.infinite {
            self.target = self.target.clamp(0.0, self.limit);
        }
    }

    /// Freezes at the current position. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        self.stopped = true;
        self.tween = None;
        self.target = self.position;
        true
    }

    pub fn start(&mut self) -> bool {
        if !self.stopped {
            return false;
        }
        self.stopped = false;
        true
    }

    /// Applies a wheel or touch delta. Returns whether the native scroll
    /// should be suppressed.
    pub fn on_input(&mut self, delta: f64, source: InputSource) -> bool {
        if self.stopped {
            return true;
        }
        if delta == 0.0 {
            return false;
        }
        let multiplier = match source {
            InputSource::Wheel => self.options.wheel_multiplier,
            InputSource::Touch => self.options.touch_multiplier,
        };
        let to = self.normalize(self.target + delta * multiplier);
        self.animate_to(to, self.options.duration_secs);
        true
    }

    /// Starts an eased move to `y`. Returns false when ignored because the
    /// engine is stopped and `force` was not set.
    pub fn scroll_to(&mut self, y: f64, duration_secs: Option<f64>, immediate: bool, force: bool) -> bool {
        if self.stopped && !force {
            return false;
        }
        let to = self.normalize(y);
        if immediate {
            self.tween = None;
            self.position = to;
            self.target = to;
        } else {
            self.animate_to(to, duration_secs.unwrap_or(self.options.duration_secs));
        }
        true
    }

    /// Steps the tween by one frame. Returns the new position if it moved.
    pub fn advance(&mut self, delta_ms: f64) -> Option<f64> {
        let tween = self.tween.as_mut()?;
        tween.elapsed_ms += delta_ms.max(0.0);
        let next = tween.value();
        if tween.is_done() {
            self.tween = None;
        }

        let moved = (next - self.position).abs() > f64::EPSILON;
        self.position = next;
        moved.then_some(next)
    }

    /// Adopts a position the host reached on its own (scrollbar, keyboard).
    pub fn sync_native(&mut self, y: f64) {
        if self.tween.is_some() {
            return;
        }
        let y = self.normalize(y);
        self.position = y;
        self.target = y;
    }

    fn animate_to(&mut self, to: f64, duration_secs: f64) {
        self.target = to;
        self.tween = Some(Tween {
            from: self.position,
            to,
            duration_ms: (duration_secs * 1000.0).max(0.0),
            elapsed_ms: 0.0,
            easing: self.options.easing,
        });
    }

    fn normalize(&self, y: f64) -> f64 {
        if self.options.infinite {
            if self.limit > 0.0 {
                y.rem_euclid(self.limit)
            } else {
                0.0
            }
        } else {
            y.clamp(0.0, self.limit)
        }
    }
}
