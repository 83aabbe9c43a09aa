use crate::config::{argfile, loader, ConfigOverrides, ParserOptions, CONFIG_DEST};
use crate::declare::registry::{Registry, Scope};
use crate::declare::{Argument, ArgumentDeclarer, ArgumentGroup, MutexGroup, MutexSwitch};
use crate::error::Result;
use crate::parsed::ParsedArgs;
use crate::resolve;
use clap::Command;
use std::ffi::OsString;
use std::path::Path;

/// Argument parser whose path-typed arguments come back as absolute paths.
#[derive(Debug)]
pub struct ArgParser {
    name: String,
    about: Option<String>,
    options: ParserOptions,
    registry: Registry,
    scope: Scope,
}

impl ArgParser {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, ParserOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: ParserOptions) -> Self {
        let registry = if options.allow_config {
            Registry::with_config_argument()
        } else {
            Registry::default()
        };
        Self {
            name: name.into(),
            about: None,
            options,
            registry,
            scope: Scope::default(),
        }
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    fn base_command(&self) -> Command {
        // A repeated single-valued option keeps its last value.
        let mut command = Command::new(self.name.clone()).args_override_self(true);
        if let Some(about) = &self.about {
            command = command.about(about.clone());
        }
        command
    }

    /// The clap command as declared, without any config file applied.
    pub fn command(&self) -> Command {
        self.registry
            .command(self.base_command(), &ConfigOverrides::default())
    }

    /// Parse the process arguments.
    pub fn parse_args(&self) -> Result<ParsedArgs> {
        self.parse_args_from(std::env::args_os())
    }

    /// Parse `args`; the first item is the binary name.
    pub fn parse_args_from<I, T>(&self, args: I) -> Result<ParsedArgs>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if let Some(prefix) = self.options.from_file_prefix {
            args = argfile::expand(args, prefix)?;
        }

        let config_path = self.find_config_path(&args);
        let overrides = match &config_path {
            Some(path) => loader::load_config(Path::new(path), &self.registry)?,
            None => ConfigOverrides::default(),
        };

        let mut command = self.registry.command(self.base_command(), &overrides);
        let matches = command.try_get_matches_from_mut(args)?;
        self.registry
            .check_groups(&mut command, &matches, &overrides)?;
        let mut parsed = self.registry.extract(&matches, &overrides);

        let config = parsed
            .get_text(CONFIG_DEST)
            .filter(|path| !path.is_empty())
            .map(Path::new);
        let base_dir = resolve::base_directory(config, self.options.config_path_base)?;
        resolve::resolve_paths(&mut parsed, self.registry.path_destinations(), &base_dir);
        Ok(parsed)
    }

    /// Lenient first pass that only looks for `--config`.
    fn find_config_path(&self, args: &[OsString]) -> Option<String> {
        if !self.options.allow_config {
            return None;
        }
        let matches = self
            .command()
            .ignore_errors(true)
            .try_get_matches_from(args)
            .ok()?;
        let path = matches.get_one::<String>(CONFIG_DEST)?;
        if path.is_empty() {
            None
        } else {
            tracing::debug!("Found config file argument: {}", path);
            Some(path.clone())
        }
    }
}

impl ArgumentDeclarer for ArgParser {
    fn add(&mut self, argument: Argument) -> Result<&mut Self> {
        self.registry.declare_argument(argument, &self.scope)?;
        Ok(self)
    }

    fn add_group(&mut self, title: &str) -> ArgumentGroup<'_> {
        ArgumentGroup::new(&mut self.registry, self.scope.with_heading(title))
    }

    fn add_mutex_group(&mut self, required: bool) -> MutexGroup<'_> {
        let scope = self.registry.open_exclusive(&self.scope, required);
        MutexGroup::new(&mut self.registry, scope)
    }

    fn add_mutex_switch(&mut self, switch: MutexSwitch) -> Result<&mut Self> {
        self.registry.declare_switch(switch, &self.scope)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare::ValueKind;
    use crate::error::YaapError;
    use std::path::PathBuf;

    #[test]
    fn test_relative_path_resolves_against_cwd() {
        let mut parser = ArgParser::new("test");
        parser.a(Argument::option("foo").path()).unwrap();
        let args = parser.parse_args_from(["test", "--foo", "a.txt"]).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(args.get_path("foo"), Some(cwd.join("a.txt").as_path()));
    }

    #[test]
    fn test_absolute_path_untouched() {
        let mut parser = ArgParser::new("test");
        parser.add(Argument::option("foo").path()).unwrap();
        let args = parser.parse_args_from(["test", "--foo", "/etc/hosts"]).unwrap();
        assert_eq!(args.get_path("foo"), Some(Path::new("/etc/hosts")));
    }

    #[test]
    fn test_absent_path_stays_absent() {
        let mut parser = ArgParser::new("test");
        parser.add(Argument::option("foo").path()).unwrap();
        let args = parser.parse_args_from(["test"]).unwrap();
        assert!(!args.contains("foo"));
    }

    #[test]
    fn test_non_path_values_untouched() {
        let mut parser = ArgParser::new("test");
        parser
            .add(Argument::option("name"))
            .unwrap()
            .add(Argument::option("count").kind(ValueKind::Integer))
            .unwrap();
        let args = parser
            .parse_args_from(["test", "--name", "a.txt", "--count", "3"])
            .unwrap();
        assert_eq!(args.get_text("name"), Some("a.txt"));
        assert_eq!(args.get_integer("count"), Some(3));
    }

    #[test]
    fn test_groups_expose_the_same_shorthand() {
        let mut parser = ArgParser::new("test");
        {
            let mut group = parser.g("io");
            group.a(Argument::option("input").path()).unwrap();
            let mut nested = group.add_group("advanced");
            nested
                .add_mutex_switch(MutexSwitch::from_names("mode", ["fast", "slow"]))
                .unwrap();
            let mut exclusive = nested.add_mutex_group(false);
            exclusive.add(Argument::flag("quiet")).unwrap();
            exclusive.add(Argument::flag("loud")).unwrap();
        }
        let args = parser
            .parse_args_from(["test", "--input", "/in", "--slow", "--quiet"])
            .unwrap();
        assert_eq!(args.get_path("input"), Some(Path::new("/in")));
        assert_eq!(args.get_text("mode"), Some("slow"));
        assert!(args.get_flag("quiet"));
        assert!(parser
            .parse_args_from(["test", "--quiet", "--loud"])
            .is_err());
    }

    #[test]
    fn test_repeated_option_keeps_last_value() {
        let mut parser = ArgParser::new("test");
        parser.add(Argument::option("foo").path()).unwrap();
        parser
            .add_mutex_switch(MutexSwitch::from_names("bar", ["this", "that"]))
            .unwrap();
        let args = parser
            .parse_args_from(["test", "--foo", "/a", "--foo", "/b", "--this", "--this"])
            .unwrap();
        assert_eq!(args.get_path("foo"), Some(Path::new("/b")));
        assert_eq!(args.get_text("bar"), Some("this"));
    }

    #[test]
    fn test_empty_path_is_left_unresolved() {
        let mut parser = ArgParser::new("test");
        parser.add(Argument::option("foo").path()).unwrap();
        let args = parser.parse_args_from(["test", "--foo", ""]).unwrap();
        assert_eq!(args.get_path("foo"), Some(Path::new("")));
    }

    #[test]
    fn test_list_paths_resolve_each_element() {
        let mut parser = ArgParser::new("test");
        parser.add(Argument::option("inputs").path().many()).unwrap();
        let args = parser
            .parse_args_from(["test", "--inputs", "a", "/b"])
            .unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            args.get_paths("inputs"),
            Some(vec![cwd.join("a").as_path(), Path::new("/b")])
        );
    }

    #[test]
    fn test_default_path_is_resolved() {
        let mut parser = ArgParser::new("test");
        parser
            .add(Argument::option("out").path().default_value("build"))
            .unwrap();
        let args = parser.parse_args_from(["test"]).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(args.get_path("out"), Some(cwd.join("build").as_path()));
    }

    #[test]
    fn test_config_flag_only_with_allow_config() {
        let parser = ArgParser::new("test");
        let result = parser.parse_args_from(["test", "--config", "x.yml"]);
        assert!(matches!(result, Err(YaapError::Parse(_))));

        let mut parser = ArgParser::with_options(
            "test",
            ParserOptions {
                allow_config: true,
                ..ParserOptions::default()
            },
        );
        let result = parser.add(Argument::option("config"));
        assert!(matches!(result, Err(YaapError::Configuration(_))));
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let parser = ArgParser::with_options(
            "test",
            ParserOptions {
                allow_config: true,
                ..ParserOptions::default()
            },
        );
        let result = parser.parse_args_from(["test", "--config", "/nonexistent/config.yml"]);
        match result {
            Err(YaapError::ConfigRead { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/config.yml"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_help_lists_declared_flags() {
        let mut parser = ArgParser::new("test").about("Example parser");
        parser.add(Argument::option("foo").path().help("Input file")).unwrap();
        let switch = MutexSwitch::from_help("mode", [("fast", "go fast"), ("slow", "go slow")])
            .single_arg(true);
        parser.add_mutex_switch(switch).unwrap();
        let help = parser.command().render_help().to_string();
        assert!(help.contains("--foo"));
        assert!(help.contains("Input file"));
        assert!(help.contains("--mode"));
        assert!(help.contains("fast: go fast"));
    }
}
