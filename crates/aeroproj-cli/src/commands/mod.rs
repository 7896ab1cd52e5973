//! One module per subcommand, each exposing an args struct and a `run`.

pub mod close;
pub mod doctor;
pub mod exit;
pub mod init;
pub mod list;
pub mod open;
pub mod recover;

use aeroproj_core::FocusRestore;

pub(crate) fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

pub(crate) fn describe_restore(restore: &FocusRestore) -> String {
    match restore {
        FocusRestore::HistoryWindow(id) => format!("focus returned to window {id}"),
        FocusRestore::MostRecentWindow(id) => format!("focus returned to last window {id}"),
        FocusRestore::Workspace(name) => format!("focus returned to workspace {name}"),
    }
}
