//! Print the OpenAPI document as JSON or YAML.

use std::io::{self, Write};

use clap::{Parser, ValueEnum};
use gacha_backend::doc::ApiDoc;
use utoipa::OpenApi;

/// Output encodings for the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Print the gacha backend OpenAPI document",
    version
)]
struct CliArgs {
    /// Encoding written to stdout.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn render(format: Format) -> io::Result<String> {
    let doc = ApiDoc::openapi();
    match format {
        Format::Json => doc.to_pretty_json().map_err(io::Error::other),
        Format::Yaml => doc.to_yaml().map_err(io::Error::other),
    }
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let rendered = render(args.format)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn json_is_the_default_format() {
        let args = CliArgs::try_parse_from(["openapi-dump"]).expect("no flags needed");
        assert_eq!(args.format, Format::Json);
    }

    #[rstest]
    fn unknown_formats_are_rejected() {
        assert!(CliArgs::try_parse_from(["openapi-dump", "--format", "toml"]).is_err());
    }

    #[rstest]
    #[case(Format::Json, "\"/api/gacha/pull\"")]
    #[case(Format::Yaml, "/api/gacha/pull:")]
    fn both_encodings_list_the_draw_path(#[case] format: Format, #[case] needle: &str) {
        let rendered = render(format).expect("document renders");
        assert!(rendered.contains(needle), "{format:?} output missing {needle}");
    }
}
