#![forbid(unsafe_code)]

//! Execution of parsed `qdash` commands.
//!
//! Every command takes the preference store explicitly and writes its
//! report to a caller-supplied writer, so tests can run them against a
//! [`qdash_runtime::MemoryStore`] and inspect the output.

use std::io::Write;

use qdash_runtime::{PersistedPreference, SharedStore, StorageError};
use qdash_widgets::{
    DEFAULT_EXPANDABLE, DashboardContainer, EXPANDABLE_PREFERENCE_KEY, QueryEditor, SaveDialog,
};

use crate::cli::{Command, EditorArgs, HELP_TEXT, PrefAction, StyleArgs, VERSION};
use crate::Result;

/// Run `command`, writing its report to `out`.
pub fn run(command: &Command, store: SharedStore, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Help => writeln!(out, "{HELP_TEXT}")?,
        Command::Version => writeln!(out, "qdash {VERSION}")?,
        Command::Pref(action) => run_pref(*action, store, out)?,
        Command::Style(args) => run_style(args, out)?,
        Command::Editor(args) => run_editor(*args, store, out)?,
    }
    Ok(())
}

fn run_pref(action: PrefAction, store: SharedStore, out: &mut impl Write) -> Result<()> {
    let mut pref = PersistedPreference::read(store, EXPANDABLE_PREFERENCE_KEY, DEFAULT_EXPANDABLE);
    match action {
        PrefAction::Get => {}
        PrefAction::Set(value) => pref.set(value),
        PrefAction::Toggle => {
            pref.toggle();
        }
    }
    if action != PrefAction::Get {
        ensure_durable(&pref)?;
    }
    writeln!(out, "{}", pref.get())?;
    Ok(())
}

/// The CLI exists to change stored state, so a write that only reached
/// memory is reported instead of swallowed.
fn ensure_durable(pref: &PersistedPreference<bool>) -> Result<()> {
    if pref.is_durable() {
        return Ok(());
    }
    Err(StorageError::Unavailable(format!(
        "could not write {:?} to {}",
        pref.key(),
        pref.backend_name()
    ))
    .into())
}

fn run_style(args: &StyleArgs, out: &mut impl Write) -> Result<()> {
    let mut container = DashboardContainer::new(args.margins.resolve());
    let mut dialog = SaveDialog::open_for(&container.height());
    if let Some(height) = &args.height {
        dialog.set_use_fixed_height(true);
        dialog.set_height_text(height.as_str());
    }
    let save = dialog.confirm()?;
    container.apply(&save);
    writeln!(out, "{}", container.style())?;
    Ok(())
}

fn run_editor(args: EditorArgs, store: SharedStore, out: &mut impl Write) -> Result<()> {
    let mut editor = QueryEditor::new(store).with_focused(args.focused);
    if args.toggle {
        editor.toggle_expandable();
    }
    let view = editor.view();
    writeln!(out, "state: {}", view.state)?;
    writeln!(out, "class: {}", view.class_name)?;
    writeln!(out, "toggle: {} ({})", view.toggle.label, view.toggle.title)?;
    writeln!(out, "{}", view.status)?;
    writeln!(out, "container: {}", view.container_style)?;
    Ok(())
}
