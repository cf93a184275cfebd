use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("can't trampoline a call instruction in {0}'s prologue")]
    CallInPrologue(&'static str),
    #[error("can't trampoline a jump instruction in {0}'s prologue")]
    JumpInPrologue(&'static str),
    #[error("unknown or invalid instruction in {0}'s prologue")]
    UnknownInstruction(&'static str),
    #[error("trampoline arena exhausted")]
    ArenaFull,
    #[error("couldn't make prologue writable: {0}")]
    Mprotect(#[from] sst_platform::error::PlatformError),
}

pub type Result<T> = std::result::Result<T, HookError>;
