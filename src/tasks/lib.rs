/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Command line tools for densemat matrix files.
//!
//! The binaries themselves are shims that call into [`entry_points`].

extern crate densemat_matrix;
extern crate densemat_io;
extern crate densemat_tasks_config;

#[macro_use] extern crate failure;
#[macro_use] extern crate log;
extern crate fern;
extern crate ansi_term;
extern crate clap;
#[cfg(test)]
extern crate tempdir;

pub type FailResult<T> = Result<T, ::failure::Error>;

mod ui;
mod cmd;
pub mod entry_points;

pub use crate::cmd::{run_convert, run_inspect, read_matrices, write_matrices, Summary};
pub use crate::ui::logging::GlobalLogger;
pub use ::densemat_tasks_config::{Settings, FileFormat, Format};
