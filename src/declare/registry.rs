use super::argument::{Argument, ValueKind};
use super::switch::MutexSwitch;
use crate::config::{ConfigOverrides, CONFIG_DEST};
use crate::error::{Result, YaapError};
use crate::parsed::{ParsedArgs, Value};
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use std::collections::HashSet;

const EXCLUSIVE_GROUP_PREFIX: &str = "yaap:exclusive:";

/// Where a declaration sits: its help heading and enclosing exclusive groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Scope {
    heading: Option<String>,
    exclusive: Vec<String>,
}

impl Scope {
    pub(crate) fn with_heading(&self, heading: &str) -> Self {
        Self {
            heading: Some(heading.to_string()),
            exclusive: self.exclusive.clone(),
        }
    }

    fn with_exclusive(&self, group: String) -> Self {
        let mut exclusive = self.exclusive.clone();
        exclusive.push(group);
        Self {
            heading: self.heading.clone(),
            exclusive,
        }
    }

    fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SwitchFlag {
    pub(crate) id: String,
    pub(crate) name: String,
    help: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) enum Declaration {
    Argument {
        argument: Argument,
        scope: Scope,
    },
    Switch {
        dest: String,
        flags: Vec<SwitchFlag>,
        default: Option<String>,
        group: String,
        scope: Scope,
    },
}

#[derive(Debug, Clone)]
struct ExclusiveGroup {
    id: String,
    required: bool,
}

/// One declaration inside an exclusive group.
struct GroupMember {
    ids: Vec<String>,
    name: String,
    /// The value came from the config file.
    configured: bool,
}

struct GroupMembers<'a> {
    group: &'a ExclusiveGroup,
    members: Vec<GroupMember>,
}

impl GroupMembers<'_> {
    fn ids(&self) -> Vec<String> {
        self.members.iter().flat_map(|m| m.ids.clone()).collect()
    }

    fn names(&self) -> String {
        self.members
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// What a config file key refers to.
#[derive(Debug)]
pub(crate) enum ConfigTarget<'a> {
    Argument(&'a Argument),
    Switch { dest: &'a str, flags: &'a [SwitchFlag] },
    SwitchOption { dest: &'a str, name: &'a str },
}

/// Every declaration made on a parser and its groups.
#[derive(Debug)]
pub(crate) struct Registry {
    declarations: Vec<Declaration>,
    groups: Vec<ExclusiveGroup>,
    ids: HashSet<String>,
    longs: HashSet<String>,
    shorts: HashSet<char>,
}

impl Default for Registry {
    /// Empty registry; `-h`/`--help` stay reserved for clap.
    fn default() -> Self {
        Self {
            declarations: Vec::new(),
            groups: Vec::new(),
            ids: HashSet::from(["help".to_string()]),
            longs: HashSet::from(["help".to_string()]),
            shorts: HashSet::from(['h']),
        }
    }
}

impl Registry {
    /// Registry pre-populated with the `--config` argument.
    pub(crate) fn with_config_argument() -> Self {
        let mut registry = Self::default();
        let argument = Argument::option(CONFIG_DEST).help("Path to config YAML file");
        registry.ids.insert(CONFIG_DEST.to_string());
        registry.longs.insert(CONFIG_DEST.to_string());
        registry.declarations.push(Declaration::Argument {
            argument,
            scope: Scope::default(),
        });
        registry
    }

    fn claim(&mut self, id: &str, long: Option<&str>, short: Option<char>) -> Result<()> {
        if self.ids.contains(id) {
            return Err(YaapError::configuration(format!(
                "destination '{}' is already declared",
                id
            )));
        }
        if let Some(long) = long {
            if self.longs.contains(long) {
                return Err(YaapError::configuration(format!(
                    "flag '--{}' is already declared",
                    long
                )));
            }
        }
        if let Some(short) = short {
            if self.shorts.contains(&short) {
                return Err(YaapError::configuration(format!(
                    "flag '-{}' is already declared",
                    short
                )));
            }
        }
        self.ids.insert(id.to_string());
        if let Some(long) = long {
            self.longs.insert(long.to_string());
        }
        if let Some(short) = short {
            self.shorts.insert(short);
        }
        Ok(())
    }

    pub(crate) fn declare_argument(&mut self, argument: Argument, scope: &Scope) -> Result<()> {
        argument.validate()?;
        self.claim(argument.dest(), argument.long_name(), argument.short_name())?;
        tracing::debug!(
            "Declared argument '{}' ({:?})",
            argument.dest(),
            argument.value_kind()
        );
        self.declarations.push(Declaration::Argument {
            argument,
            scope: scope.clone(),
        });
        Ok(())
    }

    fn new_group(&mut self, required: bool) -> String {
        let id = format!("{}{}", EXCLUSIVE_GROUP_PREFIX, self.groups.len());
        self.groups.push(ExclusiveGroup {
            id: id.clone(),
            required,
        });
        id
    }

    pub(crate) fn open_exclusive(&mut self, parent: &Scope, required: bool) -> Scope {
        let id = self.new_group(required);
        parent.with_exclusive(id)
    }

    pub(crate) fn declare_switch(&mut self, switch: MutexSwitch, scope: &Scope) -> Result<()> {
        switch.validate()?;
        if switch.is_single_arg() {
            return self.declare_argument(switch.to_argument(), scope);
        }

        // Check everything up front so a rejected switch claims nothing.
        let mut seen = HashSet::new();
        if self.ids.contains(switch.dest()) {
            return Err(YaapError::configuration(format!(
                "destination '{}' is already declared",
                switch.dest()
            )));
        }
        for option in switch.options() {
            if self.longs.contains(&option.name) || !seen.insert(option.name.as_str()) {
                return Err(YaapError::configuration(format!(
                    "flag '--{}' is already declared",
                    option.name
                )));
            }
        }

        self.claim(switch.dest(), None, None)?;
        let mut flags = Vec::with_capacity(switch.options().len());
        for option in switch.options() {
            let id = format!("{}={}", switch.dest(), option.name);
            self.claim(&id, Some(option.name.as_str()), None)?;
            flags.push(SwitchFlag {
                id,
                name: option.name.clone(),
                help: option.help.clone(),
            });
        }
        let group = self.new_group(switch.is_required());

        tracing::debug!(
            "Declared switch '{}' over {} options",
            switch.dest(),
            flags.len()
        );
        self.declarations.push(Declaration::Switch {
            dest: switch.dest().to_string(),
            flags,
            default: switch.default_choice().map(str::to_string),
            group,
            scope: scope.clone(),
        });
        Ok(())
    }

    /// Destinations whose values are filesystem paths.
    pub(crate) fn path_destinations(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Argument { argument, .. } if argument.value_kind() == ValueKind::Path => {
                Some(argument.dest())
            }
            _ => None,
        })
    }

    pub(crate) fn config_target(&self, key: &str) -> Option<ConfigTarget<'_>> {
        let normalized = key.replace('-', "_");
        for declaration in &self.declarations {
            match declaration {
                Declaration::Argument { argument, .. } => {
                    if argument.dest() == key
                        || argument.dest() == normalized
                        || argument.long_name() == Some(key)
                    {
                        return Some(ConfigTarget::Argument(argument));
                    }
                }
                Declaration::Switch { dest, flags, .. } => {
                    if dest == key || *dest == normalized {
                        return Some(ConfigTarget::Switch { dest, flags });
                    }
                    if let Some(flag) = flags.iter().find(|f| f.name == key) {
                        return Some(ConfigTarget::SwitchOption {
                            dest,
                            name: &flag.name,
                        });
                    }
                }
            }
        }
        None
    }

    fn group_members(&self, overrides: &ConfigOverrides) -> Vec<GroupMembers<'_>> {
        let mut groups: Vec<GroupMembers<'_>> = self
            .groups
            .iter()
            .map(|group| GroupMembers {
                group,
                members: Vec::new(),
            })
            .collect();

        for declaration in &self.declarations {
            let (exclusive, ids, name, configured) = match declaration {
                Declaration::Argument { argument, scope } => (
                    scope.exclusive.iter().map(String::as_str).collect::<Vec<_>>(),
                    vec![argument.dest().to_string()],
                    argument.display_name(),
                    overrides.contains(argument.dest()),
                ),
                Declaration::Switch {
                    dest,
                    flags,
                    group,
                    scope,
                    ..
                } => {
                    let mut exclusive: Vec<&str> =
                        scope.exclusive.iter().map(String::as_str).collect();
                    exclusive.push(group);
                    let ids = flags.iter().map(|f| f.id.clone()).collect();
                    let name = flags
                        .iter()
                        .map(|f| format!("--{}", f.name))
                        .collect::<Vec<_>>()
                        .join(", ");
                    (exclusive, ids, name, overrides.contains(dest))
                }
            };
            for entry in groups
                .iter_mut()
                .filter(|g| exclusive.contains(&g.group.id.as_str()))
            {
                entry.members.push(GroupMember {
                    ids: ids.clone(),
                    name: name.clone(),
                    configured,
                });
            }
        }
        groups
    }

    /// Build the clap command for one parse.
    pub(crate) fn command(&self, mut command: Command, overrides: &ConfigOverrides) -> Command {
        for declaration in &self.declarations {
            match declaration {
                Declaration::Argument { argument, scope } => {
                    let config = overrides.get(argument.dest());
                    command = command.arg(argument.to_clap(scope.heading(), config));
                }
                Declaration::Switch { flags, scope, .. } => {
                    for flag in flags {
                        let mut arg = Arg::new(flag.id.clone())
                            .long(flag.name.clone())
                            .action(ArgAction::SetTrue);
                        if let Some(help) = &flag.help {
                            arg = arg.help(help.clone());
                        }
                        if let Some(heading) = scope.heading() {
                            arg = arg.help_heading(heading.to_string());
                        }
                        command = command.arg(arg);
                    }
                }
            }
        }

        for entry in self.group_members(overrides) {
            let ids = entry.ids();
            if ids.is_empty() {
                continue;
            }
            command = command.group(
                ArgGroup::new(entry.group.id.clone())
                    .args(ids)
                    .multiple(false),
            );
        }
        command
    }

    /// Enforce exclusive groups across the command line and the config file.
    /// Config values reach clap as defaults, which its group checks ignore.
    pub(crate) fn check_groups(
        &self,
        command: &mut Command,
        matches: &ArgMatches,
        overrides: &ConfigOverrides,
    ) -> std::result::Result<(), clap::Error> {
        for entry in self.group_members(overrides) {
            if entry.members.is_empty() {
                continue;
            }
            let present: Vec<&GroupMember> = entry
                .members
                .iter()
                .filter(|m| {
                    m.configured
                        || m.ids
                            .iter()
                            .any(|id| matches.value_source(id) == Some(ValueSource::CommandLine))
                })
                .collect();
            if let [first, second, ..] = present.as_slice() {
                return Err(command.error(
                    ErrorKind::ArgumentConflict,
                    format!(
                        "the argument '{}' cannot be used with '{}'",
                        first.name, second.name
                    ),
                ));
            }
            if entry.group.required && present.is_empty() {
                return Err(command.error(
                    ErrorKind::MissingRequiredArgument,
                    format!(
                        "one of the following arguments is required: {}",
                        entry.names()
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Collect every destination's value out of clap's matches.
    pub(crate) fn extract(&self, matches: &ArgMatches, overrides: &ConfigOverrides) -> ParsedArgs {
        let mut parsed = ParsedArgs::new();
        for declaration in &self.declarations {
            match declaration {
                Declaration::Argument { argument, .. } => {
                    if let Some(value) = argument.extract(matches) {
                        parsed.insert(argument.dest(), value);
                    }
                }
                Declaration::Switch {
                    dest,
                    flags,
                    default,
                    ..
                } => {
                    let selected = flags
                        .iter()
                        .find(|f| matches.get_flag(&f.id))
                        .map(|f| f.name.clone())
                        .or_else(|| overrides.choice(dest).map(str::to_string))
                        .or_else(|| default.clone());
                    if let Some(name) = selected {
                        parsed.insert(dest, Value::Text(name));
                    }
                }
            }
        }
        parsed
    }
}
