use crate::process::{ExecOptions, ProcessRunner};
use crate::shared::env_var::EnvVars;

use super::{Backend, kdialog, zenity};

/// Desktop identifiers that prefer kdialog.
const KDE_DESKTOPS: &[&str] = &["kde", "plasma", "lxqt", "trinity"];

/// Desktop identifiers that prefer zenity.
const GTK_DESKTOPS: &[&str] = &[
    "gnome", "unity", "xfce", "mate", "cinnamon", "pantheon", "budgie", "lxde", "gtk",
];

/// Checks whether `binary` can be found with `which`.
///
/// Never fails: a probe that cannot run counts as "not found".
pub fn is_available(runner: &dyn ProcessRunner, binary: &str) -> bool {
    runner
        .exec("which", &[binary.to_string()], &ExecOptions::default())
        .map(|output| output.success && !output.value().trim().is_empty())
        .unwrap_or(false)
}

/// Picks the backend to use.
///
/// Priority: the only installed binary, then the override variable, then the
/// desktop environment, then zenity.
pub fn resolve(runner: &dyn ProcessRunner, env: &EnvVars) -> Backend {
    let has_kdialog = is_available(runner, kdialog::BINARY);
    let has_zenity = is_available(runner, zenity::BINARY);

    match (has_kdialog, has_zenity) {
        (true, false) => return Backend::Kdialog,
        (false, true) => return Backend::Zenity,
        (false, false) => {
            tracing::warn!("neither kdialog nor zenity is installed; dialogs will fail");
        }
        (true, true) => {
            if let Some(backend) = env_override(env) {
                return backend;
            }
            if let Some(backend) = env.desktop.as_deref().and_then(desktop_backend) {
                return backend;
            }
        }
    }

    tracing::warn!("could not determine a preferred dialog backend, defaulting to zenity");
    Backend::Zenity
}

fn env_override(env: &EnvVars) -> Option<Backend> {
    let name = env.backend_override.as_deref()?;
    match Backend::from_name(name) {
        Some(backend) if backend != Backend::None => Some(backend),
        _ => {
            tracing::warn!(
                "ignoring unrecognized {}={name:?}",
                EnvVars::backend_name()
            );
            None
        }
    }
}

/// Maps a desktop identifier (possibly a colon-separated list) to a backend.
pub(crate) fn desktop_backend(desktop: &str) -> Option<Backend> {
    desktop.split(':').find_map(|entry| {
        let entry = entry.trim().to_ascii_lowercase();
        if KDE_DESKTOPS.iter().any(|d| entry.contains(d)) {
            Some(Backend::Kdialog)
        } else if GTK_DESKTOPS.iter().any(|d| entry.contains(d)) {
            Some(Backend::Zenity)
        } else {
            None
        }
    })
}
