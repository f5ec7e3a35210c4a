//! Log-line templates for external control commands.
//!
//! Pure functions: no state, no failure paths.

/// A command handled by a pipeline module.
///
/// ```rust
/// use pipeline_failsafe::logging::pipe_command;
///
/// assert_eq!(
///     pipe_command("ModA", "PipeA", "START", "5"),
///     "Command <START> handled by <ModA> in pipe <PipeA> with parameter <5>"
/// );
/// ```
pub fn pipe_command(symbolic_name: &str, pipe_name: &str, command: &str, parameter: &str) -> String {
    format!(
        "Command <{command}> handled by <{symbolic_name}> in pipe <{pipe_name}> with parameter <{parameter}>"
    )
}

/// A command handled by the framework itself.
pub fn framework_command(command: &str, parameter: &str) -> String {
    format!("Command <{command}> handled by <Framework> with parameter <{parameter}>")
}

/// A command handled by a cache module, which belongs to no pipe.
pub fn cache_command(symbolic_name: &str, command: &str, parameter: &str) -> String {
    format!("Command <{command}> handled by <{symbolic_name}> with parameter <{parameter}>")
}
