/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::FailResult;
use crate::ui::cli_deserialize::{CliDeserialize, ConfigArgs, LoggingArgs};
use crate::ui::logging::GlobalLogger;

use ::clap;
use ::std::ffi::OsStr;
use ::std::path::PathBuf;

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> FailResult<()>,
{
    main().unwrap_or_else(|e| {
        // the logger may not exist yet
        if ::log::max_level() == ::log::LevelFilter::Off {
            for cause in e.iter_chain() {
                eprintln!("Error: {}", cause);
            }
            ::std::process::exit(1);
        }

        for cause in e.iter_chain() {
            error!("{}", cause);
        }

        if ::std::env::var_os("RUST_BACKTRACE") == Some(OsStr::new("1").to_owned()) {
            error!("{}", e.backtrace());
        } else {
            error!("(for a backtrace, try again with RUST_BACKTRACE=1)");
        }
        ::std::process::exit(1);
    });
}

fn positional(name: &'static str, help: &'static str) -> clap::Arg<'static, 'static> {
    clap::Arg::with_name(name)
        .required(true)
        .help(help)
}

// clap has already enforced `required(true)`
fn required_path(m: &clap::ArgMatches<'_>, name: &str) -> FailResult<PathBuf> {
    m.value_of_os(name)
        .map(PathBuf::from)
        .ok_or_else(|| format_err!("missing argument {}", name))
}

// -------------------------------------------------------------------------------------

pub fn convert() {
    wrap_result_main(|| {
        let (app, de) = CliDeserialize::augment_clap_app({
            clap::App::new("densemat-convert")
                .version(env!("CARGO_PKG_VERSION"))
                .about("Convert a file of matrices between the binary and text formats.")
                .args(&[
                    positional("input", "input file (.bin, .txt, .csv, or see format.input)"),
                    positional("output", "output file (.bin, .txt, .csv, or see format.output)"),
                ])
        });
        let matches = app.get_matches();
        let (config, logging): (ConfigArgs, LoggingArgs) = de.resolve_args(&matches)?;
        logging.logger().apply()?;

        let settings = config.read_settings()?;
        let input = required_path(&matches, "input")?;
        let output = required_path(&matches, "output")?;
        crate::cmd::run_convert(&settings, &input, &output)
    });
}

pub fn inspect() {
    wrap_result_main(|| {
        let (app, de) = CliDeserialize::augment_clap_app({
            clap::App::new("densemat-inspect")
                .version(env!("CARGO_PKG_VERSION"))
                .about("Show the shape, trace, and structure of each matrix in a file.")
                .args(&[
                    positional("input", "input file (.bin, .txt, .csv, or see format.input)"),
                ])
        });
        let matches = app.get_matches();
        let config: ConfigArgs = de.resolve_args(&matches)?;
        GlobalLogger::default().apply()?;

        let settings = config.read_settings()?;
        let input = required_path(&matches, "input")?;
        let _ = crate::cmd::run_inspect(&settings, &input)?;
        Ok(())
    });
}
