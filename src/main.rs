use anyhow::{Context, Result};
use yaap::{ArgParser, Argument, ArgumentDeclarer, MutexSwitch, ParsedArgs, ParserOptions};

fn build_parser() -> Result<ArgParser> {
    let mut parser = ArgParser::with_options(
        "yaap-demo",
        ParserOptions {
            allow_config: true,
            ..ParserOptions::default()
        },
    )
    .about("Resolve path arguments relative to the config file that set them");

    parser.a(Argument::option("foo").path().help("File whose contents are printed"))?;
    parser.add_mutex_switch(MutexSwitch::from_names("bar", ["this", "that"]))?;

    let mut output = parser.g("Output");
    output.a(Argument::flag("json").help("Print the resolved arguments as JSON"))?;
    output.a(Argument::flag("debug").help("Enable debug logging for internal details"))?;

    Ok(parser)
}

fn parse_or_exit(parser: &ArgParser) -> ParsedArgs {
    match parser.parse_args() {
        Ok(args) => args,
        Err(e) => e.exit(),
    }
}

fn main() -> Result<()> {
    let parser = build_parser()?;
    // --debug may also come from an argument file or the config file
    let args = parse_or_exit(&parser);
    let debug = args.get_flag("debug");

    // Initialize logging based on debug flag
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Parse again with the subscriber installed so the parse itself is logged
    let args = if debug { parse_or_exit(&parser) } else { args };
    tracing::debug!("Parsed {} arguments", args.len());

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&args)?);
    } else {
        println!("Arguments:");
        println!("{}", args);
    }

    if let Some(foo) = args
        .get_path("foo")
        .filter(|foo| !foo.as_os_str().is_empty())
    {
        let text = std::fs::read_to_string(foo)
            .with_context(|| format!("Failed to read foo: {}", foo.display()))?;
        println!("Contents of foo:");
        println!("{}", text);
    }

    Ok(())
}
