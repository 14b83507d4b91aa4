//! Batch conversion of coordinates between two coordinate systems.
//!
//! ```text
//! galileo-proj [-I] [--ri] [--ro] <source definition> +to <target definition> [files...]
//! ```
//!
//! Every input line holds two coordinates separated by spaces, `;` or `,`. Coordinates are
//! numbers or angles like `11d13'56.19"E`. Lines are read from the files or from stdin if no
//! files are given.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use galileo_proj::coord::EastNorth;
use galileo_proj::{parse_angle, Catalog, ChainProjection, DirectoryGridSource, Projection};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

const TO: &str = "+to";

#[derive(Parser, Debug)]
#[command(name = "galileo-proj", version, about = "Converts coordinates between coordinate systems")]
struct Cli {
    /// Swap the source and the target systems
    #[arg(short = 'I')]
    invert: bool,

    /// Input coordinates are in north/east (lat/lon) order
    #[arg(long = "ri")]
    reverse_input: bool,

    /// Print coordinates in north/east (lat/lon) order
    #[arg(long = "ro")]
    reverse_output: bool,

    /// Folder with NTv2 grid files
    #[arg(long, env = "GALILEO_PROJ_GRID_DIR")]
    grid_dir: Option<PathBuf>,

    /// Additional definitions in the epsg file format
    #[arg(long)]
    epsg_file: Option<PathBuf>,

    /// Source definition, `+to`, target definition and the input files
    #[arg(required = true, allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

#[derive(Debug, PartialEq)]
struct Invocation {
    source: String,
    target: String,
    files: Vec<PathBuf>,
}

/// Splits the free arguments into the two definitions and the file list. Definition parameters
/// start with `+`, everything else is a file.
fn split_arguments(args: &[String]) -> Result<Invocation> {
    let mut source = vec![];
    let mut target = vec![];
    let mut files = vec![];
    let mut seen_to = false;

    for arg in args {
        if arg == TO {
            if seen_to {
                bail!("'{TO}' is given more than once");
            }
            seen_to = true;
        } else if arg.starts_with('+') {
            if seen_to {
                target.push(arg.as_str());
            } else {
                source.push(arg.as_str());
            }
        } else {
            files.push(PathBuf::from(arg));
        }
    }

    if !seen_to {
        bail!("missing '{TO}' between the source and the target definitions");
    }

    Ok(Invocation {
        source: source.join(" "),
        target: target.join(" "),
        files,
    })
}

struct Converter {
    chain: ChainProjection,
    reverse_input: bool,
    reverse_output: bool,
}

impl Converter {
    /// Converts one input line. Empty lines give `None`.
    fn convert_line(&self, line: &str) -> Result<Option<String>> {
        let values: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ';' || c == ',')
            .filter(|v| !v.is_empty())
            .collect();

        let (first, second) = match values[..] {
            [] => return Ok(None),
            [first, second] => (parse_coordinate(first)?, parse_coordinate(second)?),
            _ => bail!("expected two coordinates, found '{}'", line.trim()),
        };

        let input = if self.reverse_input {
            EastNorth::new(second, first)
        } else {
            EastNorth::new(first, second)
        };

        let output = self.chain.convert(&input);
        if !output.is_finite() {
            warn!("Conversion of '{}' gave non-finite result", line.trim());
        }

        Ok(Some(if self.reverse_output {
            format!("{} {}", output.north(), output.east())
        } else {
            format!("{} {}", output.east(), output.north())
        }))
    }

    fn convert(&self, reader: impl BufRead, mut writer: impl Write) -> Result<()> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let converted = self
                .convert_line(&line)
                .with_context(|| format!("line {}", index + 1))?;

            if let Some(converted) = converted {
                writeln!(writer, "{converted}")?;
            }
        }

        Ok(writer.flush()?)
    }
}

fn parse_coordinate(value: &str) -> Result<f64> {
    if let Ok(number) = value.parse::<f64>() {
        return Ok(number);
    }

    parse_angle(value, "coordinate")
        .map_err(|_| anyhow!("unable to parse coordinate value '{value}'"))
}

fn build_catalog(cli: &Cli) -> Result<Catalog> {
    let mut catalog = Catalog::new();

    if let Some(path) = &cli.epsg_file {
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        catalog = catalog
            .with_definitions_from(BufReader::new(file))
            .with_context(|| format!("cannot read definitions from {}", path.display()))?;
    }

    if let Some(dir) = &cli.grid_dir {
        debug!("Grid files are loaded from {}", dir.display());
        catalog = catalog.with_grid_source(DirectoryGridSource::new(dir));
    }

    Ok(catalog)
}

fn run(cli: Cli) -> Result<()> {
    let invocation = split_arguments(&cli.args)?;
    let catalog = build_catalog(&cli)?;

    let source: Arc<dyn Projection> = catalog
        .projection(&invocation.source)
        .with_context(|| format!("invalid source definition '{}'", invocation.source))?;
    let target: Arc<dyn Projection> = catalog
        .projection(&invocation.target)
        .with_context(|| format!("invalid target definition '{}'", invocation.target))?;
    debug!("Converting from {} to {}", source.to_code(), target.to_code());

    let chain = ChainProjection::new(source, target);
    let converter = Converter {
        chain: if cli.invert { chain.inverted() } else { chain },
        reverse_input: cli.reverse_input,
        reverse_output: cli.reverse_output,
    };

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    if invocation.files.is_empty() {
        return converter.convert(std::io::stdin().lock(), &mut writer);
    }

    for path in &invocation.files {
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        converter
            .convert(BufReader::new(file), &mut writer)
            .with_context(|| format!("in {}", path.display()))?;
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use clap::CommandFactory;

    const WGS84: &str = "+proj=lonlat +datum=WGS84";
    const MERCATOR: &str = "+proj=merc +a=6378137 +b=6378137 +nadgrids=@null";

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    fn converter(source: &str, target: &str) -> Converter {
        let catalog = Catalog::new();
        Converter {
            chain: ChainProjection::new(
                catalog.projection(source).unwrap(),
                catalog.projection(target).unwrap(),
            ),
            reverse_input: false,
            reverse_output: false,
        }
    }

    fn values(line: &str) -> (f64, f64) {
        let values: Vec<f64> = line.split(' ').map(|v| v.parse().unwrap()).collect();
        (values[0], values[1])
    }

    #[test]
    fn command_line_definition() {
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from(args(
            "galileo-proj -I --ri +proj=lonlat +to +init=epsg:3857 points.txt",
        ))
        .unwrap();
        assert!(cli.invert);
        assert!(cli.reverse_input);
        assert!(!cli.reverse_output);
        assert_eq!(cli.args.len(), 4);
    }

    #[test]
    fn argument_splitting() {
        let invocation =
            split_arguments(&args("+proj=lonlat +datum=WGS84 +to +init=epsg:3857 a.txt b.txt"))
                .unwrap();
        assert_eq!(
            invocation,
            Invocation {
                source: WGS84.into(),
                target: "+init=epsg:3857".into(),
                files: vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")],
            }
        );

        assert_matches!(split_arguments(&args("+proj=lonlat")), Err(_));
        assert_matches!(split_arguments(&args("+proj=lonlat +to +to")), Err(_));
    }

    #[test]
    fn converts_angles() {
        let converter = converter(WGS84, MERCATOR);

        let (east, north) = values(
            &converter
                .convert_line("11d13'56.19\"E 50d34'6.86\"N")
                .unwrap()
                .unwrap(),
        );
        assert_abs_diff_eq!(east, 1_250_371.1334500168, epsilon = 1e-6);
        assert_abs_diff_eq!(north, 6_545_331.055189664, epsilon = 1e-6);

        let (east, north) = values(
            &converter
                .convert_line("118d39'30.42\"W; 37d20'18.76\"N")
                .unwrap()
                .unwrap(),
        );
        assert_abs_diff_eq!(east, -13_208_998.232319113, epsilon = 1e-6);
        assert_abs_diff_eq!(north, 4_486_401.160664663, epsilon = 1e-6);

        assert_eq!(converter.convert_line("   ").unwrap(), None);
    }

    #[test]
    fn converts_with_init() {
        let converter = converter("+init=epsg:4326", "+init=epsg:3857");
        let (east, north) = values(
            &converter
                .convert_line("11.232274,50.5685716")
                .unwrap()
                .unwrap(),
        );
        assert_abs_diff_eq!(east, 1_250_371.0221305261, epsilon = 1e-6);
        assert_abs_diff_eq!(north, 6_545_330.946136694, epsilon = 1e-6);
    }

    #[test]
    fn swapped_orders() {
        let mut converter = converter(WGS84, MERCATOR);
        converter.reverse_input = true;
        converter.reverse_output = true;
        let (north, east) = values(
            &converter
                .convert_line("50.5685716 11.232274")
                .unwrap()
                .unwrap(),
        );
        assert_abs_diff_eq!(east, 1_250_371.0221305261, epsilon = 1e-6);
        assert_abs_diff_eq!(north, 6_545_330.946136694, epsilon = 1e-6);

        let inverted = Converter {
            chain: converter.chain.inverted(),
            reverse_input: false,
            reverse_output: false,
        };
        let (lon, lat) = values(
            &inverted
                .convert_line("1250371.0221305261 6545330.946136694")
                .unwrap()
                .unwrap(),
        );
        assert_abs_diff_eq!(lon, 11.232274, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, 50.5685716, epsilon = 1e-9);
    }

    #[test]
    fn malformed_lines() {
        let converter = converter(WGS84, MERCATOR);

        let err = converter.convert_line("11.2 abc").unwrap_err();
        assert!(err.to_string().contains("'abc'"));
        assert!(converter.convert_line("11.2").is_err());
        assert!(converter.convert_line("1 2 3").is_err());

        let mut output = vec![];
        let err = converter
            .convert("0 0\n\n1 x\n".as_bytes(), &mut output)
            .unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));
        assert_eq!(String::from_utf8(output).unwrap().lines().count(), 1);
    }

    #[test]
    fn non_finite_results_are_printed() {
        let converter = converter(WGS84, MERCATOR);
        let mut output = vec![];
        converter.convert("0 NaN\n".as_bytes(), &mut output).unwrap();
        let line = String::from_utf8(output).unwrap();
        let (_, north) = values(line.trim());
        assert!(!north.is_finite());
    }
}
