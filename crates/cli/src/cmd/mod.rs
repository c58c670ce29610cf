mod check;
mod install;
mod run;

pub use check::cmd_check;
pub use install::cmd_install;
pub use run::cmd_run;
