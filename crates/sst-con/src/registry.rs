//! The console registry: name -> variable/command lookup, typed get/set,
//! and command-hooking shims.
//!
//! Converted from: examples/mattx86-myq2-rust/crates/myq2-common/src/cvar.rs's
//! `CvarContext` (`Vec` storage + `HashMap<String, usize>` index for O(1)
//! lookup by name, `find_var_index`/`find_var`/`find_var_mut`), doubled up
//! for commands per
//! examples/mattx86-myq2-rust/crates/myq2-common/src/cmd.rs's
//! `cmd_functions`/`cmd_functions_index` pair.

use std::collections::HashMap;

use crate::abi::VtableShape;
use crate::cmd::{shim, Cmd, CmdFn, HookOrder};
use crate::error::{ConError, Result};
use crate::var::Var;

#[derive(Default)]
pub struct Registry {
    vars: Vec<Var>,
    var_index: HashMap<String, usize>,
    cmds: Vec<Cmd>,
    cmd_index: HashMap<String, usize>,
    /// Raw callback pointers for commands discovered in the host binary
    /// (as opposed to ones we registered ourselves), kept so `sst-hook`'s
    /// inline-hook prologue walker can scan them.
    native_callbacks: HashMap<String, *const u8>,
    shape: Option<VtableShape>,
}

// `native_callbacks` holds raw host function pointers, which are immutable
// for the plugin's lifetime once discovered; the registry itself is only
// ever accessed from the host's single game thread.
unsafe impl Send for Registry {}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abi_shape(&self) -> Option<VtableShape> {
        self.shape
    }

    pub fn set_abi_shape(&mut self, shape: VtableShape) {
        self.shape = Some(shape);
    }

    pub fn find_variable(&self, name: &str) -> Option<&Var> {
        self.var_index.get(name).map(|&i| &self.vars[i])
    }

    pub fn find_variable_mut(&mut self, name: &str) -> Option<&mut Var> {
        if let Some(&i) = self.var_index.get(name) {
            Some(&mut self.vars[i])
        } else {
            None
        }
    }

    pub fn find_command(&self, name: &str) -> Option<&Cmd> {
        self.cmd_index.get(name).map(|&i| &self.cmds[i])
    }

    /// Registers a variable. No-op if the name is already taken, matching
    /// the "register_variable is a no-op if a variable by that name already
    /// exists" failure mode.
    pub fn register_variable(&mut self, var: Var) -> bool {
        if self.var_index.contains_key(&var.name) {
            return false;
        }
        let idx = self.vars.len();
        self.var_index.insert(var.name.clone(), idx);
        self.vars.push(var);
        true
    }

    pub fn register_command(&mut self, cmd: Cmd) -> bool {
        if self.cmd_index.contains_key(&cmd.name) {
            return false;
        }
        let idx = self.cmds.len();
        self.cmd_index.insert(cmd.name.clone(), idx);
        self.cmds.push(cmd);
        true
    }

    pub fn register_native_callback(&mut self, name: &str, callback: *const u8) {
        self.native_callbacks.insert(name.to_string(), callback);
    }

    /// Returns the raw callback pointer for a host-discovered command, for
    /// feeding into `sst_decode::x86_len`-based prologue scanning.
    pub fn native_callback_bytes(&self, name: &str) -> Option<*const u8> {
        self.native_callbacks.get(name).copied()
    }

    pub fn variable_string(&self, name: &str) -> &str {
        self.find_variable(name).map(|v| v.string.as_str()).unwrap_or("")
    }

    pub fn variable_float(&self, name: &str) -> f32 {
        self.find_variable(name).map(|v| v.fval).unwrap_or(0.0)
    }

    pub fn variable_int(&self, name: &str) -> i32 {
        self.find_variable(name).map(|v| v.ival).unwrap_or(0)
    }

    pub fn set_variable_string(&mut self, name: &str, value: &str) {
        if let Some(v) = self.find_variable_mut(name) {
            v.set_string(value);
        }
    }

    /// Replaces a registered command's callback with a shim that also runs
    /// `extra`, in the requested order relative to the original. Used to
    /// intercept `record`/`stop`/`plugin_load`/`plugin_unload`.
    pub fn hook_command(&mut self, name: &str, extra: CmdFn, order: HookOrder) -> Result<()> {
        let idx = *self
            .cmd_index
            .get(name)
            .ok_or_else(|| ConError::NotACommand(name.to_string()))?;
        let original = std::mem::replace(&mut self.cmds[idx].callback, Box::new(|_| {}));
        self.cmds[idx].callback = shim(original, extra, order);
        Ok(())
    }
}
