/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use clap;
use crate::FailResult;
use crate::ui::logging::GlobalLogger;
use ::densemat_tasks_config::Settings;
use ::std::path::PathBuf;

/// Trait used to factor out code for adding arguments to a binary and parsing them,
/// leveraging type inference to help reduce boilerplate.
pub trait CliDeserialize: Sized {
    fn augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> (clap::App<'a, 'b>, ClapDeserializer<Self>)
    {
        let app = Self::_augment_clap_app(app);
        let token = ClapDeserializer(Default::default());
        (app, token)
    }

    /// Don't use this. Call 'augment_clap_app' instead.
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>;
    /// Don't use this. Call 'resolve_args' on the ClapDeserializer instead.
    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>;
}

/// Token of "proof" that a clap app was augmented to be capable of deserializing A.
pub struct ClapDeserializer<A>(::std::marker::PhantomData<A>);

impl<A> ClapDeserializer<A>
where A: CliDeserialize,
{
    /// Deserialize the arguments.  This may perform IO such as eagerly reading input files.
    pub fn resolve_args(self, matches: &clap::ArgMatches<'_>) -> FailResult<A>
    { A::_resolve_args(matches) }
}

impl CliDeserialize for () {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>
    { app }

    fn _resolve_args(_: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok(()) }
}

// Tuple as product combinator
impl<A, B> CliDeserialize for (A, B)
where
    A: CliDeserialize,
    B: CliDeserialize,
{
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>
    {
        let app = A::_augment_clap_app(app);
        let app = B::_augment_clap_app(app);
        app
    }

    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok((A::_resolve_args(matches)?, B::_resolve_args(matches)?)) }
}

// -------------------------------------------------------------------------------------

/// `-c CONFIG`. Reading is deferred so that warnings about the file can be logged.
#[derive(Debug, Clone, Default)]
pub struct ConfigArgs {
    pub path: Option<PathBuf>,
}

impl CliDeserialize for ConfigArgs {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
        app.arg({
            clap::Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("CONFIG")
                .takes_value(true)
                .number_of_values(1)
                .help("settings yaml (all settings are optional)")
        })
    }

    fn _resolve_args(m: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok(ConfigArgs { path: m.value_of_os("config").map(PathBuf::from) }) }
}

impl ConfigArgs {
    pub fn read_settings(&self) -> FailResult<Settings> {
        match &self.path {
            Some(path) => {
                info!("reading settings from '{}'", path.display());
                Settings::from_path(path)
            },
            None => Ok(Settings::default()),
        }
    }
}

/// `--verbose` and `--log FILE`.
#[derive(Debug, Clone, Default)]
pub struct LoggingArgs {
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
}

impl CliDeserialize for LoggingArgs {
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
        app.args(&[
            clap::Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("show debug and trace output from the densemat crates"),
            clap::Arg::with_name("log")
                .long("log")
                .value_name("FILE")
                .takes_value(true)
                .number_of_values(1)
                .help("also write the log to FILE"),
        ])
    }

    fn _resolve_args(m: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok(LoggingArgs {
        verbose: m.is_present("verbose"),
        log_file: m.value_of_os("log").map(PathBuf::from),
    })}
}

impl LoggingArgs {
    pub fn logger(&self) -> GlobalLogger {
        let mut logger = GlobalLogger::default();
        logger.verbosity(self.verbose as i32);
        if let Some(path) = &self.log_file {
            logger.path(path);
        }
        logger
    }
}
