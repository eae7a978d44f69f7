//! Execution backends implementing `JobLauncher`.

pub mod memory;
pub mod process;

pub use memory::{Script, ScriptedHandle, ScriptedLauncher};
pub use process::{check_executable, exit_code, ProcessHandle, ProcessLauncher};
