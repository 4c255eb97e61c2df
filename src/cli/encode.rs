use std::{
    fmt, fs,
    io::{Read, Write},
    path::{Path, PathBuf},
    str::FromStr,
    time::Instant,
};

use structopt::StructOpt;

use crate::{
    errors::{SemanticError, SemanticResult},
    names::{self, CollectOptions, PositionEncoding, RawName},
    tokens,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Pretty,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "json" => Ok(OutputFormat::Json),
            "pretty" => Ok(OutputFormat::Pretty),
            other => Err(format!("unsupported output format `{}`", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Pretty => write!(f, "pretty"),
        }
    }
}

#[derive(Debug, StructOpt)]
pub struct EncodeOptions {
    #[structopt(
        name = "INPUT",
        parse(from_os_str),
        help = "JSON file of name occurrences, or `-` for stdin"
    )]
    pub input_path: PathBuf,

    #[structopt(
        long,
        default_value = "json",
        possible_values = &["json", "pretty"],
        help = "Output the LSP payload as JSON or a per-token listing"
    )]
    pub format: OutputFormat,

    #[structopt(
        long,
        default_value = "utf-32",
        possible_values = &["utf-8", "utf-16", "utf-32"],
        help = "Code unit used to measure token lengths"
    )]
    pub encoding: PositionEncoding,

    #[structopt(long, help = "Encode names in input order instead of sorting by position")]
    pub no_sort: bool,

    #[structopt(
        long,
        default_value = "4",
        help = "Maximum inference steps used to classify `statement` names"
    )]
    pub inference_limit: usize,

    #[structopt(
        long,
        parse(from_os_str),
        help = "Source document, used to show covered text in the pretty listing",
        long_help = "Source document, used to show covered text in the pretty listing. \
                     Columns and lengths are counted in --encoding units."
    )]
    pub source: Option<PathBuf>,
}

impl EncodeOptions {
    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            encoding: self.encoding,
            sort_positions: !self.no_sort,
            inference_limit: self.inference_limit,
        }
    }
}

fn read_input<R: Read>(path: &Path, mut stdin: R) -> SemanticResult<String> {
    let mut buf = String::new();
    if path == Path::new("-") {
        stdin.read_to_string(&mut buf)?;
    } else {
        buf = fs::read_to_string(path).map_err(|e| SemanticError::from(e).with_path(path))?;
    }
    Ok(buf)
}

/// Runs `encode`, reading `-` input from `stdin` and writing the result to
/// `out`.
pub(super) fn action<R: Read, W: Write>(
    options: EncodeOptions,
    stdin: R,
    out: &mut W,
) -> SemanticResult {
    if options.source.is_some() && options.format != OutputFormat::Pretty {
        return Err(SemanticError::config(
            "--source is only used with --format pretty",
        ));
    }

    let start_time = Instant::now();
    let input = read_input(&options.input_path, stdin)?;
    let occurrences: Vec<RawName> = serde_json::from_str(&input)
        .map_err(|e| SemanticError::from(e).with_path(&options.input_path))?;
    log::info!(
        "read {} names from {}",
        occurrences.len(),
        options.input_path.display()
    );

    let annotations = names::collect(&occurrences, &options.collect_options());

    match options.format {
        OutputFormat::Json => {
            let tokens = tokens::encode_semantic_tokens(&annotations);
            serde_json::to_writer(&mut *out, &tokens)?;
        }
        OutputFormat::Pretty => {
            let source = match &options.source {
                Some(path) => Some(
                    fs::read_to_string(path).map_err(|e| SemanticError::from(e).with_path(path))?,
                ),
                None => None,
            };
            let data = tokens::encode(&annotations);
            let listing = tokens::dump(
                &data,
                source.as_deref(),
                options.encoding,
                &tokens::legend(),
            );
            write!(out, "{}", listing)?;
        }
    }
    writeln!(out)?;

    log::info!(
        "encoded {} tokens in {:?}",
        annotations.len(),
        start_time.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;
    use crate::errors::SemanticErrorKind;

    const NAMES: &str = r#"[
        {"name": "import", "line": 1, "column": 0, "type": "keyword"},
        {"name": "os", "line": 1, "column": 7, "type": "module", "is_definition": true},
        {"name": "main", "line": 3, "column": 4, "type": "function", "is_definition": true}
    ]"#;

    fn options(input_path: &str) -> EncodeOptions {
        EncodeOptions {
            input_path: PathBuf::from(input_path),
            format: OutputFormat::Json,
            encoding: PositionEncoding::Utf32,
            no_sort: false,
            inference_limit: 4,
            source: None,
        }
    }

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    fn run(options: EncodeOptions, stdin: &str) -> SemanticResult<String> {
        let mut out = Vec::new();
        action(options, stdin.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn source_requires_pretty_format() {
        let mut opts = options("does-not-exist.json");
        opts.source = Some(PathBuf::from("doc.py"));
        let err = run(opts, "").unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::Config);
    }

    #[test]
    fn json_payload_from_file() {
        let input = write_temp(NAMES);
        let out = run(options(&input.path().to_string_lossy()), "").expect("encoded");
        assert_eq!(out, "{\"data\":[0,0,6,1,0,0,7,2,2,0,2,4,4,3,1]}\n");
    }

    #[test]
    fn dash_reads_from_stdin() {
        let out = run(options("-"), NAMES).expect("encoded");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json output");
        assert_eq!(value["data"].as_array().map(Vec::len), Some(15));
    }

    #[test]
    fn pretty_listing_shows_source_text() {
        let input = write_temp(NAMES);
        let source = write_temp("import os\n\ndef main():\n    pass\n");
        let mut opts = options(&input.path().to_string_lossy());
        opts.format = OutputFormat::Pretty;
        opts.source = Some(source.path().to_path_buf());
        let out = run(opts, "").expect("encoded");
        assert_eq!(
            out,
            "#001 L0:0 len=6 keyword \"import\"\n\
             #002 L0:7 len=2 module \"os\"\n\
             #003 L2:4 len=4 function [declaration] \"main\"\n"
        );
    }

    #[test]
    fn malformed_input_is_a_parse_error_with_path() {
        let input = write_temp("[{\"name\": \"x\"");
        let err = run(options(&input.path().to_string_lossy()), "").unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::Parse);
        assert_eq!(err.path.as_deref(), Some(input.path()));
    }

    #[test]
    fn missing_input_is_an_io_error_with_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("names.json");
        let err = run(options(&missing.to_string_lossy()), "").unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::Io);
        assert_eq!(err.path, Some(missing));
    }
}
