use std::str::FromStr;

use crate::error::ScriptError;

/// Directional and jump intent for one tick. How it is produced (keyboard,
/// gamepad, script) does not matter to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputIntent {
    pub left: bool,
    pub right: bool,
    /// Toward -Z, across the lanes.
    pub forward: bool,
    pub back: bool,
    pub jump: bool,
}

impl InputIntent {
    pub const IDLE: Self = Self {
        left: false,
        right: false,
        forward: false,
        back: false,
        jump: false,
    };

    fn set(&mut self, name: &str) -> Result<(), ScriptError> {
        match name {
            "left" => self.left = true,
            "right" => self.right = true,
            "forward" | "up" => self.forward = true,
            "back" | "down" => self.back = true,
            "jump" => self.jump = true,
            "idle" => {}
            other => return Err(ScriptError::UnknownIntent(other.to_string())),
        }
        Ok(())
    }
}

/// Timed sequence of intents for headless runs.
///
/// Written as comma-separated `intents:seconds` segments, where intents are
/// joined with `+`: `"forward:0.5,forward+jump:0.1,idle:1"`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputScript {
    segments: Vec<(InputIntent, f32)>,
    repeat: bool,
}

impl InputScript {
    pub fn repeating(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Total length of one pass through the script, in seconds.
    pub fn duration(&self) -> f32 {
        self.segments.iter().map(|(_, secs)| secs).sum()
    }

    /// Intent active at `time` seconds. Idle once a non-repeating script ends.
    pub fn intent_at(&self, time: f64) -> InputIntent {
        let total = self.duration() as f64;
        if total <= 0.0 {
            return InputIntent::IDLE;
        }
        let mut t = if self.repeat { time.rem_euclid(total) } else { time };
        for (intent, secs) in &self.segments {
            if t < *secs as f64 {
                return *intent;
            }
            t -= *secs as f64;
        }
        InputIntent::IDLE
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for raw in s.split(',').map(str::trim).filter(|seg| !seg.is_empty()) {
            let (names, secs) = raw
                .split_once(':')
                .ok_or_else(|| ScriptError::MissingDuration(raw.to_string()))?;
            let secs: f32 = secs
                .trim()
                .parse()
                .map_err(|_| ScriptError::BadDuration(raw.to_string()))?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(ScriptError::BadDuration(raw.to_string()));
            }
            let mut intent = InputIntent::IDLE;
            for name in names.split('+') {
                intent.set(name.trim())?;
            }
            segments.push((intent, secs));
        }
        Ok(Self {
            segments,
            repeat: false,
        })
    }
}
