/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Settings file for the densemat command line tools.
//!
//! Unknown keys are not an error, but are reported through `warn!`, since
//! they are most likely typos.

#![allow(non_snake_case)]

// NOTE: Use the YamlRead trait rather than serde_yaml::from_* so that the
//       unused key warnings are not lost.

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;
extern crate serde;
extern crate serde_yaml;
extern crate serde_ignored;
extern crate densemat_matrix;

use ::std::io::Read;
use ::std::path::Path;

pub type FailResult<T> = Result<T, ::failure::Error>;

/// Provides an alternative to serde_yaml::from_reader that reports unused keys.
pub trait YamlRead: for <'de> ::serde::Deserialize<'de> {
    fn from_reader(mut r: impl Read) -> Result<Self, ::serde_yaml::Error>
    { YamlRead::from_dyn_reader(&mut r) }

    fn from_dyn_reader(r: &mut dyn Read) -> Result<Self, ::serde_yaml::Error> {
        // serde_ignored needs a Deserializer, which serde_yaml only gives us by way of Value
        Self::from_value(value_from_dyn_reader(r)?)
    }

    fn from_value(value: ::serde_yaml::Value) -> Result<Self, ::serde_yaml::Error>;
}

macro_rules! derive_yaml_read {
    ($Type:ty) => {
        impl YamlRead for $Type {
            fn from_value(value: ::serde_yaml::Value) -> Result<$Type, ::serde_yaml::Error> {
                ::serde_ignored::deserialize(
                    value,
                    |path| warn!("Unused config item (possible typo?): {}", path),
                )
            }
        }
    };
}

derive_yaml_read!{::serde_yaml::Value}

fn value_from_dyn_reader(r: &mut dyn Read) -> Result<::serde_yaml::Value, ::serde_yaml::Error>
{ ::serde_yaml::from_reader(r) }

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Absolute tolerance used by the structural checks of `densemat-inspect`
    /// (symmetric, diagonal, identity, zeros).
    #[serde(default = "_settings__threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub text: TextSettings,

    #[serde(default)]
    pub format: FormatSettings,
}
derive_yaml_read!{Settings}
fn _settings__threshold() -> f64 { ::densemat_matrix::DEFAULT_THRESHOLD }

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TextSettings {
    /// Number of values written on each line of a text file.
    #[serde(default = "_text__elements_per_line")]
    pub elements_per_line: usize,
}
fn _text__elements_per_line() -> usize { 5 }

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct FormatSettings {
    #[serde(default)]
    pub input: FileFormat,

    #[serde(default)]
    pub output: FileFormat,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileFormat {
    /// Decide from the file extension.
    Guess,
    Binary,
    Text,
}

/// A [`FileFormat`] after guessing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    Binary,
    Text,
}

// --------------------------------------------------------

impl Default for Settings {
    fn default() -> Self {
        Settings {
            threshold: _settings__threshold(),
            text: Default::default(),
            format: Default::default(),
        }
    }
}

impl Default for TextSettings {
    fn default() -> Self { TextSettings { elements_per_line: _text__elements_per_line() } }
}

impl Default for FileFormat {
    fn default() -> Self { FileFormat::Guess }
}

impl FileFormat {
    /// Resolve `Guess` by looking at the extension of `path`.
    ///
    /// `.bin` is binary; `.txt` and `.csv` are text.
    pub fn resolve(self, path: &Path) -> FailResult<Format> {
        match self {
            FileFormat::Binary => Ok(Format::Binary),
            FileFormat::Text => Ok(Format::Text),
            FileFormat::Guess => {
                match path.extension().and_then(|s| s.to_str()) {
                    Some("bin") => Ok(Format::Binary),
                    Some("txt") | Some("csv") => Ok(Format::Text),
                    _ => bail!(
                        "cannot guess the format of '{}' from its extension; \
                        set format.input or format.output to 'binary' or 'text'",
                        path.display(),
                    ),
                }
            },
        }
    }
}

impl Settings {
    /// Read settings from a YAML file. An empty file gives the defaults.
    pub fn from_path(path: impl AsRef<Path>) -> FailResult<Settings> {
        let path = path.as_ref();
        let text = ::std::fs::read_to_string(path)
            .map_err(|e| format_err!("could not read config file '{}': {}", path.display(), e))?;
        let settings = match text.trim() {
            "" => Settings::default(),
            _ => <Settings as YamlRead>::from_reader(text.as_bytes())
                .map_err(|e| format_err!("in config file '{}': {}", path.display(), e))?,
        };
        settings.validate()
    }

    pub fn validate(self) -> FailResult<Settings> {
        if self.text.elements_per_line == 0 {
            bail!("text.elements-per-line must be at least 1");
        }
        if !(self.threshold >= 0.0) {
            bail!("threshold must be a non-negative number (got {})", self.threshold);
        }
        Ok(self)
    }
}

#[cfg(test)]
fn from_empty_mapping<T: for<'de> ::serde::Deserialize<'de>>() -> ::serde_yaml::Result<T> {
    use ::serde_yaml::{from_value, Value, Mapping};
    from_value(Value::Mapping(Mapping::new()))
}
