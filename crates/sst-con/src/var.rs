//! Typed console variable storage with min/max clamping and change
//! callbacks.
//!
//! Converted from: examples/mattx86-myq2-rust/crates/myq2-common/src/cvar.rs
//! (`Cvar` struct, `variable_value`/`variable_string`, `set2`'s
//! force/validate checks), generalized against
//! examples/original_source/src/con_.h's `con_var_common` (min/max clamp
//! fields, which the teacher's `Cvar` didn't have at all).

/// A registered console variable. Values are always stored as a string
/// internally; `ival`/`fval` are parsed interpretations of it, matching the
/// host engine's own representation.
pub struct Var {
    pub name: String,
    pub help: String,
    pub flags: u32,
    pub string: String,
    pub fval: f32,
    pub ival: i32,
    pub hasmin: bool,
    pub minval: f32,
    pub hasmax: bool,
    pub maxval: f32,
    pub default: String,
    pub on_change: Option<Box<dyn Fn(&str, &str) + Send>>,
}

impl Var {
    pub fn new(name: &str, help: &str, default: &str, flags: u32) -> Self {
        let (fval, ival) = parse_numeric(default);
        Var {
            name: name.to_string(),
            help: help.to_string(),
            flags,
            string: default.to_string(),
            fval,
            ival,
            hasmin: false,
            minval: 0.0,
            hasmax: false,
            maxval: 0.0,
            default: default.to_string(),
            on_change: None,
        }
    }

    pub fn with_min(mut self, min: f32) -> Self {
        self.hasmin = true;
        self.minval = min;
        self
    }

    pub fn with_max(mut self, max: f32) -> Self {
        self.hasmax = true;
        self.maxval = max;
        self
    }

    /// Sets the variable from a string, clamping numerically if the value
    /// parses and a min/max is set, then dispatching `on_change` if the
    /// resulting string differs from the prior one.
    ///
    /// A value that fails to parse as a number when a min/max is in effect
    /// falls back to the variable's own default (mirrors spec's "malformed
    /// set-from-string falls back to the default with a warning").
    pub fn set_string(&mut self, value: &str) {
        if self.hasmin || self.hasmax {
            match value.parse::<f32>() {
                Ok(mut f) => {
                    if self.hasmin && f < self.minval {
                        f = self.minval;
                    }
                    if self.hasmax && f > self.maxval {
                        f = self.maxval;
                    }
                    self.assign(&format_number(f));
                }
                Err(_) => {
                    log::warn!("'{}': malformed value '{}', using default", self.name, value);
                    let default = self.default.clone();
                    self.assign(&default);
                }
            }
        } else {
            self.assign(value);
        }
    }

    pub fn set_int(&mut self, value: i32) {
        self.set_string(&value.to_string());
    }

    pub fn set_float(&mut self, value: f32) {
        self.set_string(&format_number(value));
    }

    fn assign(&mut self, value: &str) {
        if value == self.string {
            return;
        }
        let old = std::mem::replace(&mut self.string, value.to_string());
        let (fval, ival) = parse_numeric(value);
        self.fval = fval;
        self.ival = ival;
        if let Some(cb) = &self.on_change {
            cb(&old, value);
        }
    }
}

fn parse_numeric(s: &str) -> (f32, i32) {
    let fval = s.parse::<f32>().unwrap_or(0.0);
    (fval, fval as i32)
}

fn format_number(f: f32) -> String {
    if f.fract() == 0.0 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_below_min() {
        let mut v = Var::new("sst_test", "", "5", 0).with_min(1.0).with_max(10.0);
        v.set_string("-3");
        assert_eq!(v.fval, 1.0);
    }

    #[test]
    fn clamps_above_max() {
        let mut v = Var::new("sst_test", "", "5", 0).with_min(1.0).with_max(10.0);
        v.set_string("999");
        assert_eq!(v.fval, 10.0);
    }

    #[test]
    fn in_range_passes_through() {
        let mut v = Var::new("sst_test", "", "5", 0).with_min(1.0).with_max(10.0);
        v.set_string("7");
        assert_eq!(v.fval, 7.0);
        assert_eq!(v.string, "7");
    }

    #[test]
    fn malformed_falls_back_to_default() {
        let mut v = Var::new("sst_test", "", "5", 0).with_min(1.0).with_max(10.0);
        v.set_string("not-a-number");
        assert_eq!(v.string, "5");
    }

    #[test]
    fn clamping_applies_regardless_of_protected_or_noprint_flags() {
        let mut v = Var::new("sst_test", "", "5", crate::flags::PROTECTED | crate::flags::NOPRINT)
            .with_min(1.0)
            .with_max(10.0);
        v.set_string("999");
        assert_eq!(v.fval, 10.0);
    }

    #[test]
    fn on_change_fires_with_old_and_new() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(None));
        let seen2 = seen.clone();
        let mut v = Var::new("sst_test", "", "0", 0);
        v.on_change = Some(Box::new(move |old, new| {
            *seen2.lock().unwrap() = Some((old.to_string(), new.to_string()));
        }));
        v.set_string("1");
        assert_eq!(*seen.lock().unwrap(), Some(("0".to_string(), "1".to_string())));
    }
}
