use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("couldn't set up memory for function hooking: {0}")]
    HookInit(#[from] sst_hook::HookError),
    #[error("couldn't determine the plugin's own file path")]
    OwnPath,
    #[error("couldn't create addons directory: {0}")]
    Mkdir(#[source] sst_platform::PlatformError),
    #[error("couldn't write autoload file: {0}")]
    Write(#[source] sst_platform::PlatformError),
    #[error("couldn't remove autoload file: {0}")]
    Remove(#[source] sst_platform::PlatformError),
    #[error("plugin and game install are on different drives")]
    CrossDrive,
}

pub type Result<T> = std::result::Result<T, PluginError>;
