/* ************************************************************************ **
** This file is part of densemat, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Implementations of the command line tools, separated from argument parsing.

use crate::FailResult;
use ::densemat_matrix::{Matrix, OwnedMatrix};
use ::densemat_tasks_config::{Settings, Format};
use ::std::fmt;
use ::std::path::Path;

pub fn read_matrices(path: &Path, format: Format) -> FailResult<Vec<OwnedMatrix>> {
    Ok(match format {
        Format::Binary => ::densemat_io::read_matrices_from_binary(path)?,
        Format::Text => ::densemat_io::read_matrices_from_text(path)?,
    })
}

pub fn write_matrices(path: &Path, format: Format, matrices: &[&Matrix], settings: &Settings) -> FailResult<()> {
    match format {
        Format::Binary => ::densemat_io::write_matrices_to_binary(path, matrices)?,
        Format::Text => {
            let per_line = settings.text.elements_per_line;
            ::densemat_io::write_matrices_to_text(path, matrices, per_line)?
        },
    }
    Ok(())
}

/// Read a collection of matrices and write it back out, possibly in another format.
pub fn run_convert(settings: &Settings, input: &Path, output: &Path) -> FailResult<()> {
    let input_format = settings.format.input.resolve(input)?;
    let output_format = settings.format.output.resolve(output)?;

    let matrices = read_matrices(input, input_format)?;
    info!("read {} matrices from '{}' ({:?})", matrices.len(), input.display(), input_format);

    let refs: Vec<&Matrix> = matrices.iter().collect();
    write_matrices(output, output_format, &refs, settings)?;
    info!("wrote {} matrices to '{}' ({:?})", matrices.len(), output.display(), output_format);
    Ok(())
}

/// Log a [`Summary`] of every matrix in a file.
pub fn run_inspect(settings: &Settings, input: &Path) -> FailResult<Vec<Summary>> {
    let format = settings.format.input.resolve(input)?;
    let matrices = read_matrices(input, format)?;
    info!("'{}' holds {} matrices", input.display(), matrices.len());

    let summaries: Vec<_> = matrices.iter().map(|m| Summary::of(m, settings.threshold)).collect();
    for (index, summary) in summaries.iter().enumerate() {
        info!("matrix {}: {}", index, summary);
    }
    for (index, matrix) in matrices.iter().enumerate() {
        trace!("matrix {}:\n{}", index, matrix);
    }
    Ok(summaries)
}

/// Structural facts about one matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub shape: (usize, usize),
    /// `None` unless square.
    pub trace: Option<f64>,
    pub symmetric: bool,
    pub diagonal: bool,
    pub identity: bool,
    pub zeros: bool,
}

impl Summary {
    pub fn of(matrix: &Matrix, threshold: f64) -> Summary {
        Summary {
            shape: matrix.shape(),
            trace: matrix.trace().ok(),
            symmetric: matrix.is_symmetric_within(threshold),
            diagonal: matrix.is_diagonal_within(threshold),
            identity: matrix.is_identity_within(threshold),
            zeros: matrix.is_zeros_within(threshold),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} x {}", self.shape.0, self.shape.1)?;
        if let Some(trace) = self.trace {
            write!(f, ", trace {}", ::densemat_matrix::c_style_exp(trace, 8))?;
        }
        let flags = [
            ("symmetric", self.symmetric),
            ("diagonal", self.diagonal),
            ("identity", self.identity),
            ("zeros", self.zeros),
        ];
        let names: Vec<_> = flags.iter().filter(|&&(_, set)| set).map(|&(name, _)| name).collect();
        if !names.is_empty() {
            write!(f, " ({})", names.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::densemat_tasks_config::FileFormat;
    use ::tempdir::TempDir;

    fn sample() -> Vec<OwnedMatrix> {
        let mut general = Matrix::new(3, 4);
        general.randomize_seed_fixed(-2.0, 2.0);
        let mut identity = Matrix::new(3, 3);
        identity.set_identity().unwrap();
        vec![general, identity, Matrix::new(2, 2)]
    }

    #[test]
    fn convert_through_every_format() {
        let dir = TempDir::new("densemat-tasks").unwrap();
        let matrices = sample();
        let refs: Vec<&Matrix> = matrices.iter().collect();
        let settings = Settings::default();

        let bin = dir.path().join("a.bin");
        write_matrices(&bin, Format::Binary, &refs, &settings).unwrap();

        let txt = dir.path().join("b.csv");
        run_convert(&settings, &bin, &txt).unwrap();
        assert_eq!(read_matrices(&txt, Format::Text).unwrap(), matrices);

        // explicit formats override the extension
        let mut settings = Settings::default();
        settings.format.input = FileFormat::Text;
        settings.format.output = FileFormat::Binary;
        let odd = dir.path().join("c.txt");
        run_convert(&settings, &txt, &odd).unwrap();
        assert_eq!(read_matrices(&odd, Format::Binary).unwrap(), matrices);
    }

    #[test]
    fn convert_needs_a_known_format() {
        let dir = TempDir::new("densemat-tasks").unwrap();
        let settings = Settings::default();
        let input = dir.path().join("a.bin");
        write_matrices(&input, Format::Binary, &[], &settings).unwrap();
        assert!(run_convert(&settings, &input, &dir.path().join("b.dat")).is_err());
        assert!(run_convert(&settings, &dir.path().join("missing.bin"), &input).is_err());
    }

    #[test]
    fn inspect_reports_structure() {
        let dir = TempDir::new("densemat-tasks").unwrap();
        let matrices = sample();
        let refs: Vec<&Matrix> = matrices.iter().collect();
        let settings = Settings::default();
        let path = dir.path().join("a.txt");
        write_matrices(&path, Format::Text, &refs, &settings).unwrap();

        let summaries = run_inspect(&settings, &path).unwrap();
        assert_eq!(summaries.len(), 3);

        assert_eq!(summaries[0].shape, (3, 4));
        assert_eq!(summaries[0].trace, None);
        assert!(!summaries[0].symmetric);

        assert_eq!(summaries[1], Summary {
            shape: (3, 3),
            trace: Some(3.0),
            symmetric: true,
            diagonal: true,
            identity: true,
            zeros: false,
        });
        assert!(summaries[2].zeros && summaries[2].symmetric && !summaries[2].identity);
        assert_eq!(summaries[1].to_string(), "3 x 3, trace 3.00000000e+00 (symmetric, diagonal, identity)");
    }

    #[test]
    fn threshold_is_used() {
        let m = Matrix::from_slice(2, 2, &[1.0, 1e-3, 0.0, 1.0]).unwrap();
        assert!(!Summary::of(&m, 1e-10).identity);
        assert!(Summary::of(&m, 1e-2).identity);
    }
}
