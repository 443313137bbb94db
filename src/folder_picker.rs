use std::path::PathBuf;

/// Source of folder choices. The desktop build asks the native dialog.
pub trait FolderDialog {
    fn pick_folder(&self) -> Option<PathBuf>;
}

pub struct NativeFolderDialog;

impl FolderDialog for NativeFolderDialog {
    fn pick_folder(&self) -> Option<PathBuf> {
        rfd::FileDialog::new().pick_folder()
    }
}

/// Asks `dialog` for a folder and, if one was chosen, replaces `field` with it.
/// Returns whether the field changed.
pub fn browse_into(dialog: &impl FolderDialog, field: &mut String) -> bool {
    match dialog.pick_folder() {
        Some(path) => {
            log::debug!("Selected folder {}", path.display());
            *field = path.display().to_string();
            true
        }
        None => false,
    }
}
